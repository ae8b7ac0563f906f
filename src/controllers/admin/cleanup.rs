use anyhow::Context;
use axum::{Json, extract::State};
use serde_json::{Value, json};

use crate::{
    db::uploads::{delete_uploads, get_orphaned_uploads},
    error::Error,
    state::SharedAppState,
};

/// Remove storage objects whose upload rows lost their owner. Objects
/// are deleted one by one; the first failure aborts the run and already
/// deleted objects stay deleted.
#[tracing::instrument(name = "[POST] admin/cleanup", skip_all)]
pub async fn cleanup(State(app_state): State<SharedAppState>) -> Result<Json<Value>, Error> {
    let orphans = get_orphaned_uploads(&app_state.pool).await?;

    let mut removed_ids = Vec::with_capacity(orphans.len());
    for upload in &orphans {
        app_state
            .http_client
            .delete(format!(
                "{}/{}",
                app_state.config.sync.storage_url, upload.path
            ))
            .send()
            .await
            .with_context(|| format!("deleting storage object {}", upload.path))
            .map_err(Error::Upstream)?
            .error_for_status()
            .with_context(|| format!("storage delete status for {}", upload.path))
            .map_err(Error::Upstream)?;

        removed_ids.push(upload.id);
    }

    delete_uploads(&app_state.pool, &removed_ids).await?;

    Ok(Json(json!({
        "ok": true,
        "removed": removed_ids.len(),
    })))
}
