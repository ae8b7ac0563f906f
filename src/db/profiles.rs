use sqlx::{PgPool, Row, postgres::PgRow};

use crate::{error::Error, model::Profile};

use super::error::DatabaseError;

fn profile_from_row(row: PgRow) -> Profile {
    Profile {
        user_id: row.get("user_id"),
        username: row.get("username"),
        avatar_url: row.get("avatar_url"),
        backdrop_url: row.get("backdrop_url"),
        backdrop_position: row.get("backdrop_position"),
        backdrop_zoom: row.get("backdrop_zoom"),
        about_markdown: row.get("about_markdown"),
        about_html: row.get("about_html"),
        pinned_post_id: row.get("pinned_post_id"),
        follower_count: row.get("follower_count"),
        following_count: row.get("following_count"),
    }
}

const PROFILE_COLUMNS: &str = r#"
    user_id, username, avatar_url,
    backdrop_url, backdrop_position, backdrop_zoom,
    about_markdown, about_html, pinned_post_id,
    (SELECT count(*) FROM follows WHERE followee_id = profiles.user_id) AS follower_count,
    (SELECT count(*) FROM follows WHERE follower_id = profiles.user_id) AS following_count
"#;

#[tracing::instrument(name = "get profile by username", skip_all, fields(username))]
pub async fn get_profile_by_username(pool: &PgPool, username: &str) -> Result<Profile, Error> {
    let row = sqlx::query(&format!(
        r#"
        SELECT {}
        FROM profiles
        WHERE username = $1;
    "#,
        PROFILE_COLUMNS
    ))
    .bind(username)
    .fetch_optional(pool)
    .await
    .map_err(DatabaseError::DatabaseError)?;

    match row {
        Some(row) => Ok(profile_from_row(row)),
        None => Err(Error::Database(DatabaseError::NotFound)),
    }
}

#[tracing::instrument(name = "get profile by user id", skip_all, fields(user_id))]
pub async fn get_profile_by_user_id(pool: &PgPool, user_id: i64) -> Result<Profile, Error> {
    let row = sqlx::query(&format!(
        r#"
        SELECT {}
        FROM profiles
        WHERE user_id = $1;
    "#,
        PROFILE_COLUMNS
    ))
    .bind(user_id)
    .fetch_optional(pool)
    .await
    .map_err(DatabaseError::DatabaseError)?;

    match row {
        Some(row) => Ok(profile_from_row(row)),
        None => Err(Error::Database(DatabaseError::NotFound)),
    }
}

#[tracing::instrument(name = "update profile about", skip_all, fields(user_id))]
pub async fn update_about(
    pool: &PgPool,
    user_id: i64,
    about_markdown: &str,
    about_html: &str,
) -> Result<(), Error> {
    let result = sqlx::query(
        r#"
        UPDATE profiles
        SET
            about_markdown = $1,
            about_html = $2
        WHERE
            user_id = $3;
    "#,
    )
    .bind(about_markdown)
    .bind(about_html)
    .bind(user_id)
    .execute(pool)
    .await
    .map_err(DatabaseError::DatabaseError)?;

    if result.rows_affected() == 0 {
        return Err(Error::Database(DatabaseError::NotFound));
    }

    Ok(())
}
