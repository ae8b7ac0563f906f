use anyhow::{Context, Error};
use serde_json::json;

use super::count::PageOracle;

const PAGE_QUERY: &str = r#"
query ($page: Int, $perPage: Int) {
  Page(page: $page, perPage: $perPage) {
    pageInfo {
      hasNextPage
    }
    media {
      id
    }
  }
}
"#;

/// `PageOracle` backed by a public paginated GraphQL API.
pub struct GraphqlPageOracle {
    client: reqwest::Client,
    endpoint: String,
    per_page: u32,
}

#[derive(serde::Deserialize)]
struct PageResponse {
    data: PageData,
}

#[derive(serde::Deserialize)]
struct PageData {
    #[serde(rename = "Page")]
    page: PagePayload,
}

#[derive(serde::Deserialize)]
struct PagePayload {
    #[serde(rename = "pageInfo")]
    page_info: PageInfo,
    media: Vec<serde_json::Value>,
}

#[derive(serde::Deserialize)]
struct PageInfo {
    #[serde(rename = "hasNextPage")]
    has_next_page: bool,
}

impl GraphqlPageOracle {
    pub fn new(client: reqwest::Client, endpoint: String, per_page: u32) -> Self {
        GraphqlPageOracle {
            client,
            endpoint,
            per_page,
        }
    }

    #[tracing::instrument(name = "fetch catalog page", skip(self))]
    async fn fetch_page(&self, page: u32) -> Result<PagePayload, Error> {
        let response = self
            .client
            .post(&self.endpoint)
            .json(&json!({
                "query": PAGE_QUERY,
                "variables": { "page": page, "perPage": self.per_page },
            }))
            .send()
            .await
            .context("sending page query")?
            .error_for_status()
            .context("page query status")?;

        let body: PageResponse = response.json().await.context("decoding page response")?;

        Ok(body.data.page)
    }
}

impl PageOracle for GraphqlPageOracle {
    async fn has_next_page(&self, page: u32) -> Result<bool, Error> {
        Ok(self.fetch_page(page).await?.page_info.has_next_page)
    }

    async fn page_len(&self, page: u32) -> Result<u32, Error> {
        Ok(self.fetch_page(page).await?.media.len() as u32)
    }
}
