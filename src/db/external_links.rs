use sqlx::{PgPool, Postgres, QueryBuilder};

use crate::{error::Error, model::ExternalLink};

use super::error::DatabaseError;

#[tracing::instrument(name = "upsert external links", skip_all, fields(count = links.len()))]
pub async fn upsert_external_links(pool: &PgPool, links: &[ExternalLink]) -> Result<u64, Error> {
    if links.is_empty() {
        return Ok(0);
    }

    let mut upserted = 0u64;

    for batch in links.chunks(100) {
        let mut builder: QueryBuilder<Postgres> = QueryBuilder::new(
            r#"
            INSERT INTO external_links
                (provider, external_id, kind, title, url, updated_at)
        "#,
        );

        builder.push_values(batch, |mut b, link| {
            b.push_bind(link.provider.as_str())
                .push_bind(&link.external_id)
                .push_bind(link.kind.as_str())
                .push_bind(&link.title)
                .push_bind(&link.url)
                .push("now()");
        });

        builder.push(
            r#"
            ON CONFLICT (provider, external_id)
            DO UPDATE SET
                kind = EXCLUDED.kind,
                title = EXCLUDED.title,
                url = EXCLUDED.url,
                updated_at = EXCLUDED.updated_at;
        "#,
        );

        let result = builder
            .build()
            .execute(pool)
            .await
            .map_err(DatabaseError::DatabaseError)?;

        upserted += result.rows_affected();
    }

    Ok(upserted)
}
