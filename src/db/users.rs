use sqlx::{PgPool, Row};

use crate::{auth::error::AuthError, error::Error, model::User};

use super::error::DatabaseError;

#[tracing::instrument(name = "get or create user", skip_all, fields(allow_registration))]
pub async fn get_or_create_user(
    pool: &PgPool,
    email: &str,
    allow_registration: bool,
) -> Result<User, Error> {
    let existing = sqlx::query_as::<_, User>(
        r#"
        SELECT
            id, email
        FROM
            users
        WHERE
            email = $1
    "#,
    )
    .bind(email)
    .fetch_optional(pool)
    .await
    .map_err(DatabaseError::DatabaseError)?;

    if let Some(user) = existing {
        return Ok(user);
    }

    if !allow_registration {
        return Err(Error::Auth(AuthError::RegistrationClosed));
    }

    create_user(pool, email).await
}

#[tracing::instrument(name = "create user", skip_all)]
pub async fn create_user(pool: &PgPool, email: &str) -> Result<User, Error> {
    let mut tx = pool.begin().await.map_err(DatabaseError::DatabaseError)?;

    let user_id: i64 = sqlx::query(
        r#"
        INSERT INTO users
            (email)
        VALUES
            ($1)
        RETURNING id;
    "#,
    )
    .bind(email)
    .fetch_one(&mut *tx)
    .await
    .map_err(DatabaseError::DatabaseError)?
    .get("id");

    // A fresh user always gets a profile row. The username starts as the
    // email local part, suffixed with the user id on collision.
    let local_part = email.split('@').next().unwrap_or(email);
    let inserted = sqlx::query(
        r#"
        INSERT INTO profiles
            (user_id, username)
        VALUES
            ($1, $2)
        ON CONFLICT (username) DO NOTHING;
    "#,
    )
    .bind(user_id)
    .bind(local_part)
    .execute(&mut *tx)
    .await
    .map_err(DatabaseError::DatabaseError)?;

    if inserted.rows_affected() == 0 {
        sqlx::query(
            r#"
            INSERT INTO profiles
                (user_id, username)
            VALUES
                ($1, $2);
        "#,
        )
        .bind(user_id)
        .bind(format!("{}-{}", local_part, user_id))
        .execute(&mut *tx)
        .await
        .map_err(DatabaseError::DatabaseError)?;
    }

    tx.commit().await.map_err(DatabaseError::DatabaseError)?;

    Ok(User {
        id: user_id,
        email: email.to_string(),
    })
}

#[tracing::instrument(name = "get user by id", skip_all, fields(user_id))]
pub async fn get_user_by_id_optional(pool: &PgPool, user_id: i64) -> Result<Option<User>, Error> {
    sqlx::query_as::<_, User>(
        r#"
        SELECT
            id, email
        FROM
            users
        WHERE
            id = $1;
    "#,
    )
    .bind(user_id)
    .fetch_optional(pool)
    .await
    .map_err(|e| Error::Database(DatabaseError::DatabaseError(e)))
}
