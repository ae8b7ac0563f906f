use std::collections::BTreeMap;

use anyhow::Context;
use axum::{Json, extract::State};
use secrecy::ExposeSecret;
use serde_json::{Value, json};

use crate::{
    db::external_links::upsert_external_links,
    error::Error,
    middlewares::admin_guard::ADMIN_SECRET_HEADER,
    model::{CompletionKind, ExternalLink, LinkProvider},
    state::SharedAppState,
    title::{TitleOptions, pick_title},
};

/// Run both provider syncs in sequence and relay the combined payload.
/// One failed sub-call aborts the whole chain; re-invocation re-runs it
/// from the start.
#[tracing::instrument(name = "[POST] admin/sync", skip_all)]
pub async fn pipeline(State(app_state): State<SharedAppState>) -> Result<Json<Value>, Error> {
    let mangadex = call_sibling(&app_state, "mangadex").await?;
    let tmdb = call_sibling(&app_state, "tmdb").await?;

    Ok(Json(json!({
        "ok": true,
        "mangadex": mangadex,
        "tmdb": tmdb,
    })))
}

async fn call_sibling(app_state: &SharedAppState, provider: &str) -> Result<Value, Error> {
    let url = format!(
        "{}/admin/sync/{}",
        app_state.config.admin.internal_base_url, provider
    );

    let response = app_state
        .http_client
        .post(&url)
        .header(
            ADMIN_SECRET_HEADER,
            app_state.config.admin.secret.expose_secret(),
        )
        .send()
        .await
        .with_context(|| format!("calling {} sync", provider))
        .map_err(Error::Upstream)?
        .error_for_status()
        .with_context(|| format!("{} sync status", provider))
        .map_err(Error::Upstream)?;

    response
        .json()
        .await
        .with_context(|| format!("decoding {} sync response", provider))
        .map_err(Error::Upstream)
}

#[derive(serde::Deserialize)]
struct MangaDexResponse {
    data: Vec<MangaDexManga>,
}

#[derive(serde::Deserialize)]
struct MangaDexManga {
    id: String,
    attributes: MangaDexAttributes,
}

#[derive(serde::Deserialize)]
struct MangaDexAttributes {
    #[serde(default)]
    title: BTreeMap<String, String>,
    #[serde(default, rename = "altTitles")]
    alt_titles: Vec<BTreeMap<String, String>>,
}

impl MangaDexAttributes {
    /// Flatten the localized title map plus alt titles into candidate
    /// pairs, canonical languages first so tie-breaks stay stable.
    fn title_candidates(&self) -> Vec<(String, Option<String>)> {
        let mut candidates = Vec::new();

        for lang in ["en", "ja-ro", "ja"] {
            if let Some(value) = self.title.get(lang) {
                candidates.push((lang.to_string(), Some(value.clone())));
            }
        }
        for (lang, value) in &self.title {
            if !["en", "ja-ro", "ja"].contains(&lang.as_str()) {
                candidates.push((lang.clone(), Some(value.clone())));
            }
        }
        for alt in &self.alt_titles {
            for (lang, value) in alt {
                candidates.push((format!("alt:{}", lang), Some(value.clone())));
            }
        }

        candidates
    }
}

#[tracing::instrument(name = "[POST] admin/sync/mangadex", skip_all)]
pub async fn mangadex(State(app_state): State<SharedAppState>) -> Result<Json<Value>, Error> {
    let url = format!(
        "{}/manga?limit={}",
        app_state.config.sync.mangadex_url, app_state.config.sync.page_size
    );

    let response: MangaDexResponse = app_state
        .http_client
        .get(&url)
        .send()
        .await
        .context("fetching mangadex page")
        .map_err(Error::Upstream)?
        .error_for_status()
        .context("mangadex status")
        .map_err(Error::Upstream)?
        .json()
        .await
        .context("decoding mangadex page")
        .map_err(Error::Upstream)?;

    let options = TitleOptions::default();
    let links: Vec<ExternalLink> = response
        .data
        .into_iter()
        .filter_map(|manga| {
            let choice = pick_title(&manga.attributes.title_candidates(), &options)?;
            Some(ExternalLink {
                provider: LinkProvider::Mangadex,
                url: format!("https://mangadex.org/title/{}", manga.id),
                external_id: manga.id,
                kind: CompletionKind::Manga,
                title: choice.title,
            })
        })
        .collect();

    let upserted = upsert_external_links(&app_state.pool, &links).await?;

    Ok(Json(json!({
        "ok": true,
        "provider": "mangadex",
        "upserted": upserted,
    })))
}

#[derive(serde::Deserialize)]
struct TmdbResponse {
    results: Vec<TmdbEntry>,
}

#[derive(serde::Deserialize)]
struct TmdbEntry {
    id: i64,
    name: Option<String>,
    original_name: Option<String>,
}

#[tracing::instrument(name = "[POST] admin/sync/tmdb", skip_all)]
pub async fn tmdb(State(app_state): State<SharedAppState>) -> Result<Json<Value>, Error> {
    let url = format!(
        "{}/trending/tv/week?api_key={}",
        app_state.config.sync.tmdb_url,
        app_state.config.sync.tmdb_api_key.expose_secret()
    );

    let response: TmdbResponse = app_state
        .http_client
        .get(&url)
        .send()
        .await
        .context("fetching tmdb page")
        .map_err(Error::Upstream)?
        .error_for_status()
        .context("tmdb status")
        .map_err(Error::Upstream)?
        .json()
        .await
        .context("decoding tmdb page")
        .map_err(Error::Upstream)?;

    let options = TitleOptions {
        preferred: vec!["name".to_string()],
        fallback: vec!["original_name".to_string()],
        ..Default::default()
    };
    let links: Vec<ExternalLink> = response
        .results
        .into_iter()
        .filter_map(|entry| {
            let candidates = vec![
                ("name".to_string(), entry.name),
                ("original_name".to_string(), entry.original_name),
            ];
            let choice = pick_title(&candidates, &options)?;
            Some(ExternalLink {
                provider: LinkProvider::Tmdb,
                external_id: entry.id.to_string(),
                kind: CompletionKind::Anime,
                title: choice.title,
                url: format!("https://www.themoviedb.org/tv/{}", entry.id),
            })
        })
        .collect();

    let upserted = upsert_external_links(&app_state.pool, &links).await?;

    Ok(Json(json!({
        "ok": true,
        "provider": "tmdb",
        "upserted": upserted,
    })))
}
