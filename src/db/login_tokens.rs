use chrono::{DateTime, Utc};
use sqlx::{PgPool, Row};

use crate::{auth::error::AuthError, error::Error};

use super::error::DatabaseError;

#[tracing::instrument(name = "create login token", skip_all, fields(user_id))]
pub async fn create_login_token(
    pool: &PgPool,
    user_id: i64,
    code: &str,
    expires_at: DateTime<Utc>,
) -> Result<(), Error> {
    sqlx::query(
        r#"
        INSERT INTO login_tokens
            (user_id, code, expires_at)
        VALUES
            ($1, $2, $3);
    "#,
    )
    .bind(user_id)
    .bind(code)
    .bind(expires_at)
    .execute(pool)
    .await
    .map_err(DatabaseError::DatabaseError)?;

    Ok(())
}

/// Consume a one-time code. Marks it used and returns the owning user id;
/// a missing, expired, or already-consumed code is a single auth error —
/// callers cannot distinguish which, on purpose.
#[tracing::instrument(name = "consume login token", skip_all)]
pub async fn consume_login_token(pool: &PgPool, code: &str) -> Result<i64, Error> {
    let row = sqlx::query(
        r#"
        UPDATE login_tokens
        SET
            consumed_at = now()
        WHERE
            code = $1
            AND consumed_at IS NULL
            AND expires_at > now()
        RETURNING user_id;
    "#,
    )
    .bind(code)
    .fetch_optional(pool)
    .await
    .map_err(DatabaseError::DatabaseError)?;

    match row {
        Some(row) => Ok(row.get("user_id")),
        None => Err(Error::Auth(AuthError::LoginCodeInvalid)),
    }
}
