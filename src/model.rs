use base64::{Engine as _, engine::general_purpose::URL_SAFE_NO_PAD};
use chrono::{DateTime, Utc};

#[derive(serde::Serialize, serde::Deserialize, sqlx::FromRow, Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub id: i64,
    pub email: String,
}

#[derive(serde::Serialize, serde::Deserialize, Debug, Clone)]
pub struct Profile {
    pub user_id: i64,
    pub username: String,
    pub avatar_url: Option<String>,
    pub backdrop_url: Option<String>,
    pub backdrop_position: Option<String>,
    pub backdrop_zoom: Option<f32>,
    pub about_markdown: Option<String>,
    pub about_html: Option<String>,
    pub pinned_post_id: Option<i64>,
    pub follower_count: i64,
    pub following_count: i64,
}

#[derive(serde::Serialize, serde::Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum CompletionKind {
    Anime,
    Manga,
}

impl CompletionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            CompletionKind::Anime => "anime",
            CompletionKind::Manga => "manga",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "anime" => Some(CompletionKind::Anime),
            "manga" => Some(CompletionKind::Manga),
            _ => None,
        }
    }
}

#[derive(serde::Serialize, serde::Deserialize, Debug, Clone, Copy, Default, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum KindFilter {
    #[default]
    All,
    Anime,
    Manga,
}

#[derive(serde::Serialize, serde::Deserialize, Debug, Clone, Copy, Default, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum CompletionSort {
    #[default]
    Recent,
    PctDesc,
    PctAsc,
}

#[derive(serde::Serialize, serde::Deserialize, Debug, Clone)]
pub struct CompletionItem {
    pub kind: CompletionKind,
    pub media_id: i64,
    pub title: String,
    pub image_url: Option<String>,
    pub slug: String,
    pub last_logged_at: DateTime<Utc>,
    pub progress_current: i32,
    pub progress_total: i32,
    pub pct: f32,
    pub review_count: i32,
    pub rating_count: i32,
}

/// Opaque pagination token. Carries the full ordering key of the active
/// sort mode: `pct` is present because percent-based sorts lead on it,
/// and `(last_logged_at, kind, media_id)` are the tie-break columns.
/// The timestamp is stored in microseconds, the precision of the
/// `TIMESTAMPTZ` column it is compared against; anything coarser would
/// skip rows whose timestamps differ only below the stored precision.
#[derive(serde::Serialize, serde::Deserialize, Debug, Clone, PartialEq)]
pub struct CompletionCursor {
    pub last_logged_at_us: i64,
    pub kind: CompletionKind,
    pub media_id: i64,
    pub pct: f32,
}

#[derive(thiserror::Error, Debug)]
#[error("Invalid completion cursor")]
pub struct CursorError;

impl CompletionCursor {
    pub fn from_item(item: &CompletionItem) -> Self {
        CompletionCursor {
            last_logged_at_us: item.last_logged_at.timestamp_micros(),
            kind: item.kind,
            media_id: item.media_id,
            pct: item.pct,
        }
    }

    pub fn encode(&self) -> String {
        let payload = serde_json::to_vec(self).expect("cursor serialization is infallible");
        URL_SAFE_NO_PAD.encode(payload)
    }

    pub fn decode(token: &str) -> Result<Self, CursorError> {
        let payload = URL_SAFE_NO_PAD.decode(token).map_err(|_| CursorError)?;
        serde_json::from_slice(&payload).map_err(|_| CursorError)
    }

    pub fn last_logged_at(&self) -> Result<DateTime<Utc>, CursorError> {
        DateTime::from_timestamp_micros(self.last_logged_at_us).ok_or(CursorError)
    }
}

#[derive(serde::Serialize, serde::Deserialize, Debug)]
pub struct CompletionPage {
    pub items: Vec<CompletionItem>,
    pub next_cursor: Option<String>,
}

#[derive(serde::Serialize, serde::Deserialize, Debug, PartialEq)]
pub struct CompletionStats {
    pub total: i64,
    pub anime: i64,
    pub manga: i64,
    pub mean_pct: Option<f64>,
}

#[derive(serde::Serialize, serde::Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum LinkProvider {
    Mangadex,
    Tmdb,
}

impl LinkProvider {
    pub fn as_str(&self) -> &'static str {
        match self {
            LinkProvider::Mangadex => "mangadex",
            LinkProvider::Tmdb => "tmdb",
        }
    }
}

#[derive(serde::Serialize, serde::Deserialize, Debug, Clone)]
pub struct ExternalLink {
    pub provider: LinkProvider,
    pub external_id: String,
    pub kind: CompletionKind,
    pub title: String,
    pub url: String,
}

#[derive(serde::Serialize, Debug, Clone)]
pub struct Upload {
    pub id: i64,
    pub path: String,
}

#[cfg(test)]
mod tests {
    use chrono::DateTime;

    use super::{CompletionCursor, CompletionItem, CompletionKind};

    fn item() -> CompletionItem {
        CompletionItem {
            kind: CompletionKind::Manga,
            media_id: 42,
            title: "Berserk".to_string(),
            image_url: None,
            slug: "berserk".to_string(),
            // Microsecond precision, like a TIMESTAMPTZ column.
            last_logged_at: DateTime::from_timestamp_micros(1_740_000_000_123_456).unwrap(),
            progress_current: 120,
            progress_total: 364,
            pct: 32.9,
            review_count: 3,
            rating_count: 18,
        }
    }

    #[test]
    fn cursor_round_trips_through_token() {
        let cursor = CompletionCursor::from_item(&item());

        let token = cursor.encode();
        let decoded = CompletionCursor::decode(&token).unwrap();

        assert_eq!(cursor, decoded);
    }

    #[test]
    fn cursor_preserves_timestamp_to_the_microsecond() {
        let item = item();

        let cursor = CompletionCursor::from_item(&item);
        let decoded = CompletionCursor::decode(&cursor.encode()).unwrap();

        assert_eq!(decoded.last_logged_at().unwrap(), item.last_logged_at);
    }

    #[test]
    fn cursor_token_is_opaque_not_raw_json() {
        let token = CompletionCursor::from_item(&item()).encode();

        assert!(!token.contains('{'));
        assert!(!token.contains("media_id"));
    }

    #[test]
    fn garbage_token_is_rejected() {
        assert!(CompletionCursor::decode("not a cursor").is_err());
        assert!(CompletionCursor::decode("aGVsbG8").is_err());
        assert!(CompletionCursor::decode("").is_err());
    }
}
