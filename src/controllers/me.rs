use std::sync::Arc;

use anyhow::Context;
use axum::{Extension, Json, extract::State};
use serde::Deserialize;
use validator::Validate;

use crate::{
    db::profiles::{get_profile_by_user_id, update_about},
    error::Error,
    markdown::render_about,
    model::{Profile, User},
    state::SharedAppState,
    telemetry::spawn_blocking_with_tracing,
};

#[tracing::instrument(name = "[GET] me", skip_all)]
pub async fn index(Extension(user): Extension<Arc<User>>) -> Result<Json<Arc<User>>, Error> {
    Ok(Json(user))
}

#[derive(Deserialize, Validate)]
pub struct AboutRequest {
    #[validate(length(max = 10000, message = "About text is too long"))]
    pub about: String,
}

/// Store both the markdown source and the sanitized HTML; rendering
/// happens once at write time so reads stay cheap.
#[tracing::instrument(name = "[PUT] me/about", skip_all)]
pub async fn update(
    Extension(user): Extension<Arc<User>>,
    State(app_state): State<SharedAppState>,
    Json(request): Json<AboutRequest>,
) -> Result<Json<Profile>, Error> {
    request.validate().map_err(Error::Validation)?;

    let markdown = request.about.clone();
    let html = spawn_blocking_with_tracing(move || render_about(&markdown))
        .await
        .context("Rendering about text")
        .map_err(Error::Other)?;
    update_about(&app_state.pool, user.id, &request.about, &html).await?;

    let profile = get_profile_by_user_id(&app_state.pool, user.id).await?;

    Ok(Json(profile))
}
