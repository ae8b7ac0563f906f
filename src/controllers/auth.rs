use std::borrow::Cow;

use axum::{Json, extract::State};
use chrono::{Duration, Utc};
use serde::{Deserialize, Serialize};
use validator::{Validate, ValidateEmail, ValidateLength, ValidationError, ValidationErrors};

use crate::{
    auth::{
        TokenPair, decode_refresh_token, generate_login_code, issue_token_pair,
    },
    db::{
        login_tokens::{consume_login_token, create_login_token},
        users::get_or_create_user,
    },
    email::{EmailClient, login_link},
    error::Error,
    state::SharedAppState,
};

#[derive(Deserialize)]
pub struct LinkRequest {
    pub email: String,
}

impl Validate for LinkRequest {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();

        if !self.email.validate_email() {
            errors.add(
                "email",
                ValidationError::new("email_email")
                    .with_message(Cow::from("Incorrect email format")),
            );
        }
        if !self.email.validate_length(Some(1), Some(100), None) {
            errors.add(
                "email",
                ValidationError::new("email_length")
                    .with_message(Cow::from("Email length must be between 1 and 100")),
            );
        }

        if !errors.errors().is_empty() {
            return Err(errors);
        }

        Ok(())
    }
}

#[derive(Serialize)]
pub struct LinkResponse {
    pub ok: bool,
}

/// Request a magic login link. The response is a static confirmation
/// either way; it never reveals whether the address was known.
#[tracing::instrument(name = "[POST] auth/link", skip_all)]
pub async fn request_link(
    State(app_state): State<SharedAppState>,
    Json(request): Json<LinkRequest>,
) -> Result<Json<LinkResponse>, Error> {
    request.validate().map_err(Error::Validation)?;

    let user = get_or_create_user(
        &app_state.pool,
        &request.email,
        app_state.config.application.allow_registration,
    )
    .await?;

    let code = generate_login_code();
    let expires_at =
        Utc::now() + Duration::minutes(app_state.config.auth.login_code_ttl_minutes);
    create_login_token(&app_state.pool, user.id, &code, expires_at).await?;

    let email_client = EmailClient::new(
        app_state.http_client.clone(),
        app_state.config.email.clone(),
    );
    let url = login_link(&app_state.config, &code);
    email_client
        .send_login_link(&user.email, &url)
        .await
        .map_err(Error::Upstream)?;

    Ok(Json(LinkResponse { ok: true }))
}

/// Exchange body: either a one-time `code` from the magic link, or a
/// still-valid `refresh_token`. The refresh token alone is the
/// credential; an accompanying access token is ignored since it may
/// have expired long before the refresh half.
#[derive(Deserialize)]
pub struct SessionRequest {
    pub code: Option<String>,
    pub refresh_token: Option<String>,
}

#[tracing::instrument(name = "[POST] auth/session", skip_all)]
pub async fn create_session(
    State(app_state): State<SharedAppState>,
    Json(request): Json<SessionRequest>,
) -> Result<Json<TokenPair>, Error> {
    if let Some(code) = &request.code {
        let user_id = consume_login_token(&app_state.pool, code).await?;
        let pair = issue_token_pair(user_id, &app_state.config.auth)?;

        return Ok(Json(pair));
    }

    if let Some(refresh_token) = &request.refresh_token {
        let token_data = decode_refresh_token(refresh_token, &app_state.config.auth)?;
        let pair = issue_token_pair(token_data.claims.user_id, &app_state.config.auth)?;

        return Ok(Json(pair));
    }

    let mut errors = ValidationErrors::new();
    errors.add(
        "code",
        ValidationError::new("session_request").with_message(Cow::from(
            "Provide either a login code or a refresh token",
        )),
    );
    Err(Error::Validation(errors))
}
