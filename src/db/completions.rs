use anyhow::anyhow;
use futures::TryStreamExt;
use sqlx::{PgPool, Postgres, QueryBuilder, Row, postgres::PgRow};

use crate::{
    error::Error,
    model::{
        CompletionCursor, CompletionItem, CompletionKind, CompletionSort, CompletionStats,
        KindFilter,
    },
};

use super::error::DatabaseError;

/// Validated arguments for one page query. The db layer performs no
/// filtering or sorting of its own; everything happens server-side in
/// the single statement built here.
#[derive(Debug, Clone)]
pub struct CompletionPageParams {
    pub limit: i64,
    pub cursor: Option<CompletionCursor>,
    pub kind: KindFilter,
    pub sort: CompletionSort,
    pub pct_min: Option<f32>,
    pub pct_max: Option<f32>,
}

fn item_from_row(row: &PgRow) -> Result<CompletionItem, Error> {
    let kind_raw: String = row.get("kind");
    let kind = CompletionKind::parse(&kind_raw)
        .ok_or_else(|| Error::Other(anyhow!("unknown completion kind: {}", kind_raw)))?;

    Ok(CompletionItem {
        kind,
        media_id: row.get("media_id"),
        title: row.get("title"),
        image_url: row.get("image_url"),
        slug: row.get("slug"),
        last_logged_at: row.get("last_logged_at"),
        progress_current: row.get("progress_current"),
        progress_total: row.get("progress_total"),
        pct: row.get("pct"),
        review_count: row.get("review_count"),
        rating_count: row.get("rating_count"),
    })
}

#[tracing::instrument(name = "get user completions", skip_all, fields(user_id))]
pub async fn get_user_completions(
    pool: &PgPool,
    user_id: i64,
    params: &CompletionPageParams,
) -> Result<Vec<CompletionItem>, Error> {
    let mut builder: QueryBuilder<Postgres> = QueryBuilder::new(
        r#"
        SELECT
            kind, media_id, title,
            image_url, slug, last_logged_at,
            progress_current, progress_total, pct,
            review_count, rating_count
        FROM
            completions
        WHERE
            user_id = "#,
    );
    builder.push_bind(user_id);

    match params.kind {
        KindFilter::All => {}
        KindFilter::Anime => {
            builder.push(" AND kind = ");
            builder.push_bind(CompletionKind::Anime.as_str());
        }
        KindFilter::Manga => {
            builder.push(" AND kind = ");
            builder.push_bind(CompletionKind::Manga.as_str());
        }
    }

    if let Some(pct_min) = params.pct_min {
        builder.push(" AND pct >= ");
        builder.push_bind(pct_min);
    }
    if let Some(pct_max) = params.pct_max {
        builder.push(" AND pct <= ");
        builder.push_bind(pct_max);
    }

    if let Some(cursor) = &params.cursor {
        push_cursor_predicate(&mut builder, params.sort, cursor)?;
    }

    // The ordering key must match the cursor fields exactly, or
    // pagination resumes from the wrong position. Tie-break columns run
    // in the same direction as the leading key so a single row-value
    // comparison expresses the keyset predicate.
    builder.push(match params.sort {
        CompletionSort::Recent => " ORDER BY last_logged_at DESC, kind DESC, media_id DESC",
        CompletionSort::PctDesc => {
            " ORDER BY pct DESC, last_logged_at DESC, kind DESC, media_id DESC"
        }
        CompletionSort::PctAsc => " ORDER BY pct ASC, last_logged_at ASC, kind ASC, media_id ASC",
    });

    builder.push(" LIMIT ");
    builder.push_bind(params.limit);

    let mut stream = builder.build().fetch(pool);

    let mut items = Vec::new();
    while let Some(row) = stream
        .try_next()
        .await
        .map_err(DatabaseError::DatabaseError)?
    {
        items.push(item_from_row(&row)?);
    }

    Ok(items)
}

fn push_cursor_predicate(
    builder: &mut QueryBuilder<'_, Postgres>,
    sort: CompletionSort,
    cursor: &CompletionCursor,
) -> Result<(), Error> {
    let logged_at = cursor
        .last_logged_at()
        .map_err(|e| Error::Other(e.into()))?;

    match sort {
        CompletionSort::Recent => {
            builder.push(" AND (last_logged_at, kind, media_id) < (");
            builder.push_bind(logged_at);
            builder.push(", ");
            builder.push_bind(cursor.kind.as_str());
            builder.push(", ");
            builder.push_bind(cursor.media_id);
            builder.push(")");
        }
        CompletionSort::PctDesc | CompletionSort::PctAsc => {
            let comparison = if sort == CompletionSort::PctDesc {
                " < ("
            } else {
                " > ("
            };
            builder.push(" AND (pct, last_logged_at, kind, media_id)");
            builder.push(comparison);
            builder.push_bind(cursor.pct);
            builder.push(", ");
            builder.push_bind(logged_at);
            builder.push(", ");
            builder.push_bind(cursor.kind.as_str());
            builder.push(", ");
            builder.push_bind(cursor.media_id);
            builder.push(")");
        }
    }

    Ok(())
}

#[tracing::instrument(name = "get user completion stats", skip_all, fields(user_id))]
pub async fn get_user_completion_stats(
    pool: &PgPool,
    user_id: i64,
) -> Result<CompletionStats, Error> {
    let row = sqlx::query(
        r#"
        SELECT
            count(*) AS total,
            count(*) FILTER (WHERE kind = 'anime') AS anime,
            count(*) FILTER (WHERE kind = 'manga') AS manga,
            avg(pct)::float8 AS mean_pct
        FROM
            completions
        WHERE
            user_id = $1;
    "#,
    )
    .bind(user_id)
    .fetch_one(pool)
    .await
    .map_err(DatabaseError::DatabaseError)?;

    Ok(CompletionStats {
        total: row.get("total"),
        anime: row.get("anime"),
        manga: row.get("manga"),
        mean_pct: row.get("mean_pct"),
    })
}
