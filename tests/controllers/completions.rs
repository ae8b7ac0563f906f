use axum::{body::Body, http::Request, http::StatusCode};

use crate::AppStateTest;

#[tokio::test]
async fn index_should_reject_out_of_range_limit() {
    let test_state = AppStateTest::new().await;

    for uri in [
        "/profiles/someone/completions?limit=0",
        "/profiles/someone/completions?limit=101",
    ] {
        let request = Request::builder().uri(uri).body(Body::empty()).unwrap();
        let response = test_state.generate_response(request).await;

        assert_eq!(response.status(), StatusCode::BAD_REQUEST, "uri={}", uri);
    }
}

#[tokio::test]
async fn index_should_reject_out_of_range_percent_bounds() {
    let test_state = AppStateTest::new().await;

    let request = Request::builder()
        .uri("/profiles/someone/completions?pct_min=120")
        .body(Body::empty())
        .unwrap();
    let response = test_state.generate_response(request).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn index_should_reject_inverted_percent_bounds() {
    let test_state = AppStateTest::new().await;

    let request = Request::builder()
        .uri("/profiles/someone/completions?pct_min=80&pct_max=20")
        .body(Body::empty())
        .unwrap();
    let response = test_state.generate_response(request).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn index_should_reject_garbage_cursor() {
    let test_state = AppStateTest::new().await;

    let request = Request::builder()
        .uri("/profiles/someone/completions?cursor=definitely-not-a-cursor")
        .body(Body::empty())
        .unwrap();
    let response = test_state.generate_response(request).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn stats_variant_applies_the_same_validation() {
    let test_state = AppStateTest::new().await;

    let request = Request::builder()
        .uri("/profiles/someone/completions/stats?limit=0")
        .body(Body::empty())
        .unwrap();
    let response = test_state.generate_response(request).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}
