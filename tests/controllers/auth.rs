use axum::{body::Body, http::Request, http::StatusCode};

use crate::AppStateTest;

fn json_request(uri: &str, body: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(axum::http::header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

#[tokio::test]
async fn link_request_with_invalid_email_is_rejected() {
    let test_state = AppStateTest::new().await;

    let response = test_state
        .generate_response(json_request("/auth/link", r#"{"email":"not-an-email"}"#))
        .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn link_request_with_overlong_email_is_rejected() {
    let test_state = AppStateTest::new().await;

    let local = "a".repeat(120);
    let body = format!(r#"{{"email":"{}@example.com"}}"#, local);
    let response = test_state
        .generate_response(json_request("/auth/link", &body))
        .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn session_request_without_code_or_pair_is_rejected() {
    let test_state = AppStateTest::new().await;

    let response = test_state
        .generate_response(json_request("/auth/session", "{}"))
        .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn session_request_with_garbage_refresh_token_is_rejected() {
    let test_state = AppStateTest::new().await;

    let body = r#"{"access_token":"junk","refresh_token":"junk"}"#;
    let response = test_state
        .generate_response(json_request("/auth/session", body))
        .await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn refresh_token_alone_is_an_accepted_shape() {
    // No access token in the body: the request reaches token
    // validation (401) instead of failing shape validation (400).
    let test_state = AppStateTest::new().await;

    let response = test_state
        .generate_response(json_request(
            "/auth/session",
            r#"{"refresh_token":"junk"}"#,
        ))
        .await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn session_request_rejects_foreign_signed_pair() {
    // A refresh token signed with a different secret must not establish
    // a session.
    let test_state = AppStateTest::new().await;

    let foreign_auth = kiroku_server::config::Auth {
        secret: "some-other-secret".into(),
        iss: "kiroku".into(),
        aud: "kiroku".into(),
        access_ttl_minutes: 30,
        refresh_ttl_days: 30,
        login_code_ttl_minutes: 15,
    };
    let pair = kiroku_server::auth::issue_token_pair(1, &foreign_auth).unwrap();

    let body = format!(
        r#"{{"access_token":"{}","refresh_token":"{}"}}"#,
        pair.access_token, pair.refresh_token
    );
    let response = test_state
        .generate_response(json_request("/auth/session", &body))
        .await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}
