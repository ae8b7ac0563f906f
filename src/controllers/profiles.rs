use axum::{
    Json,
    extract::{Path, State},
};

use crate::{
    db::profiles::get_profile_by_username, error::Error, model::Profile, state::SharedAppState,
};

#[derive(serde::Serialize, serde::Deserialize, Debug)]
pub struct UrlPath {
    pub username: String,
}

#[tracing::instrument(name = "[GET] profiles/{username}", skip_all, fields(path.username))]
pub async fn show(
    State(app_state): State<SharedAppState>,
    Path(path): Path<UrlPath>,
) -> Result<Json<Profile>, Error> {
    let result = get_profile_by_username(&app_state.pool, &path.username).await?;

    Ok(Json(result))
}
