use std::borrow::Cow;

use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde_aux::field_attributes::deserialize_option_number_from_string;
use validator::{Validate, ValidationError, ValidationErrors};

use crate::{
    db::{
        completions::{CompletionPageParams, get_user_completion_stats, get_user_completions},
        profiles::get_profile_by_username,
    },
    error::Error,
    model::{
        CompletionCursor, CompletionPage, CompletionSort, CompletionStats, KindFilter,
    },
    state::SharedAppState,
};

use super::profiles::UrlPath;

const DEFAULT_LIMIT: i64 = 20;
const MAX_LIMIT: i64 = 100;

#[derive(serde::Deserialize, serde::Serialize, Debug, Default)]
pub struct CompletionQuery {
    #[serde(default, deserialize_with = "deserialize_option_number_from_string")]
    limit: Option<i64>,

    cursor: Option<String>,

    #[serde(default)]
    kind: KindFilter,

    #[serde(default)]
    sort: CompletionSort,

    #[serde(default, deserialize_with = "deserialize_option_number_from_string")]
    pct_min: Option<f32>,

    #[serde(default, deserialize_with = "deserialize_option_number_from_string")]
    pct_max: Option<f32>,
}

impl Validate for CompletionQuery {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();

        if let Some(limit) = self.limit {
            if !(1..=MAX_LIMIT).contains(&limit) {
                errors.add(
                    "limit",
                    ValidationError::new("limit_range")
                        .with_message(Cow::from("Limit must be between 1 and 100")),
                );
            }
        }

        for (field, value) in [("pct_min", self.pct_min), ("pct_max", self.pct_max)] {
            if let Some(pct) = value {
                if !(0.0..=100.0).contains(&pct) {
                    errors.add(
                        field,
                        ValidationError::new("pct_range")
                            .with_message(Cow::from("Percent bounds must be between 0 and 100")),
                    );
                }
            }
        }

        if let (Some(min), Some(max)) = (self.pct_min, self.pct_max) {
            if min > max {
                errors.add(
                    "pct_min",
                    ValidationError::new("pct_order")
                        .with_message(Cow::from("pct_min must not exceed pct_max")),
                );
            }
        }

        if !errors.errors().is_empty() {
            return Err(errors);
        }

        Ok(())
    }
}

impl CompletionQuery {
    /// Defaults and decodes into db arguments. An undecodable cursor is
    /// a validation failure, never a silent restart from page one.
    fn into_params(self) -> Result<CompletionPageParams, Error> {
        let cursor = match self.cursor.as_deref() {
            Some(token) => Some(CompletionCursor::decode(token).map_err(|_| {
                let mut errors = ValidationErrors::new();
                errors.add(
                    "cursor",
                    ValidationError::new("cursor_invalid")
                        .with_message(Cow::from("Cursor token is not valid")),
                );
                Error::Validation(errors)
            })?),
            None => None,
        };

        Ok(CompletionPageParams {
            limit: self.limit.unwrap_or(DEFAULT_LIMIT),
            cursor,
            kind: self.kind,
            sort: self.sort,
            pct_min: self.pct_min,
            pct_max: self.pct_max,
        })
    }
}

#[tracing::instrument(name = "[GET] profiles/{username}/completions", skip_all, fields(path.username))]
pub async fn index(
    State(app_state): State<SharedAppState>,
    Path(path): Path<UrlPath>,
    Query(query): Query<CompletionQuery>,
) -> Result<Json<CompletionPage>, Error> {
    query.validate().map_err(Error::Validation)?;
    let params = query.into_params()?;

    let profile = get_profile_by_username(&app_state.pool, &path.username).await?;

    let items = get_user_completions(&app_state.pool, profile.user_id, &params).await?;

    let next_cursor = if items.len() as i64 == params.limit {
        items.last().map(|item| CompletionCursor::from_item(item).encode())
    } else {
        None
    };

    Ok(Json(CompletionPage { items, next_cursor }))
}

#[derive(serde::Serialize, Debug)]
pub struct CompletionPageWithStats {
    pub items: Vec<crate::model::CompletionItem>,
    pub next_cursor: Option<String>,
    pub stats: CompletionStats,
}

#[tracing::instrument(
    name = "[GET] profiles/{username}/completions/stats",
    skip_all,
    fields(path.username)
)]
pub async fn with_stats(
    State(app_state): State<SharedAppState>,
    Path(path): Path<UrlPath>,
    Query(query): Query<CompletionQuery>,
) -> Result<Json<CompletionPageWithStats>, Error> {
    query.validate().map_err(Error::Validation)?;
    let params = query.into_params()?;

    let profile = get_profile_by_username(&app_state.pool, &path.username).await?;

    let items = get_user_completions(&app_state.pool, profile.user_id, &params).await?;
    let stats = get_user_completion_stats(&app_state.pool, profile.user_id).await?;

    let next_cursor = if items.len() as i64 == params.limit {
        items.last().map(|item| CompletionCursor::from_item(item).encode())
    } else {
        None
    };

    Ok(Json(CompletionPageWithStats {
        items,
        next_cursor,
        stats,
    }))
}
