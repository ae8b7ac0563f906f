use sqlx::{PgPool, Row};

use crate::{error::Error, model::Upload};

use super::error::DatabaseError;

/// Upload rows without an owner are leftovers from abandoned avatar and
/// backdrop edits; the cleanup pipeline removes them.
#[tracing::instrument(name = "get orphaned uploads", skip_all)]
pub async fn get_orphaned_uploads(pool: &PgPool) -> Result<Vec<Upload>, Error> {
    let rows = sqlx::query(
        r#"
        SELECT
            id, path
        FROM
            uploads
        WHERE
            owner_id IS NULL;
    "#,
    )
    .fetch_all(pool)
    .await
    .map_err(DatabaseError::DatabaseError)?;

    Ok(rows
        .into_iter()
        .map(|row| Upload {
            id: row.get("id"),
            path: row.get("path"),
        })
        .collect())
}

#[tracing::instrument(name = "delete uploads", skip_all, fields(count = ids.len()))]
pub async fn delete_uploads(pool: &PgPool, ids: &[i64]) -> Result<(), Error> {
    if ids.is_empty() {
        return Ok(());
    }

    sqlx::query(
        r#"
        DELETE FROM uploads
        WHERE id = ANY($1);
    "#,
    )
    .bind(ids)
    .execute(pool)
    .await
    .map_err(DatabaseError::DatabaseError)?;

    Ok(())
}
