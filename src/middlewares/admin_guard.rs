use axum::{
    body::Body,
    extract::{Query, Request, State},
    middleware::Next,
    response::Response,
};
use secrecy::ExposeSecret;

use crate::{error::Error, state::SharedAppState};

pub const ADMIN_SECRET_HEADER: &str = "x-admin-secret";

#[derive(serde::Deserialize, Default)]
struct GuardQuery {
    token: Option<String>,
}

fn admin_header_matches(req: &Request, app_state: &SharedAppState) -> bool {
    req.headers()
        .get(ADMIN_SECRET_HEADER)
        .and_then(|value| value.to_str().ok())
        .map(|value| value == app_state.config.admin.secret.expose_secret())
        .unwrap_or(false)
}

/// Rejects with 401 before any handler work unless the `x-admin-secret`
/// header matches the configured secret.
#[tracing::instrument(name = "[MIDDLEWARE] admin guard", skip_all)]
pub async fn admin_guard_middleware(
    State(app_state): State<SharedAppState>,
    req: Request,
    next: Next,
) -> Result<Response<Body>, Error> {
    if admin_header_matches(&req, &app_state) {
        return Ok(next.run(req).await);
    }

    Err(Error::AdminUnauthorized)
}

/// Guard for the cron-triggered cleanup route only: the admin header
/// works as everywhere else, and the scheduler's `token` query
/// parameter is accepted as an alternative. The token authorizes
/// nothing besides this route.
#[tracing::instrument(name = "[MIDDLEWARE] cleanup guard", skip_all)]
pub async fn cleanup_guard_middleware(
    State(app_state): State<SharedAppState>,
    req: Request,
    next: Next,
) -> Result<Response<Body>, Error> {
    if admin_header_matches(&req, &app_state) {
        return Ok(next.run(req).await);
    }

    let query = Query::<GuardQuery>::try_from_uri(req.uri())
        .map(|Query(q)| q)
        .unwrap_or_default();
    let token_matches = query
        .token
        .as_deref()
        .map(|token| token == app_state.config.admin.cron_token.expose_secret())
        .unwrap_or(false);

    if token_matches {
        return Ok(next.run(req).await);
    }

    Err(Error::AdminUnauthorized)
}
