//! HTTP transport for the Bubberstation ban API

use reqwest::Client;
use serde_json::Value;
use tracing::{debug, instrument};

use centcom_common::HttpConfig;

use super::models::BubberRecord;
use crate::error::FetchError;

/// Client for `GET {base_url}/api/bans?page={n}`
#[derive(Debug, Clone)]
pub struct BubberBanService {
    client: Client,
    base_url: String,
}

impl BubberBanService {
    /// Build a service with its own HTTP client
    pub fn new(base_url: impl Into<String>, http: &HttpConfig) -> Result<Self, FetchError> {
        let client = Client::builder()
            .timeout(http.timeout())
            .user_agent(http.user_agent.clone())
            .build()?;
        Ok(Self::with_client(client, base_url))
    }

    /// Build a service around an existing client
    pub fn with_client(client: Client, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { client, base_url }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// URL of a 1-based result page
    pub fn page_url(&self, page: u32) -> String {
        format!("{}/api/bans?page={page}", self.base_url)
    }

    /// Fetch one page of raw records
    #[instrument(skip(self))]
    pub async fn get_bans(&self, page: u32) -> Result<Vec<BubberRecord>, FetchError> {
        let url = self.page_url(page);
        let response = self.client.get(&url).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                status: status.as_u16(),
                url,
            });
        }

        let body: Value = response.json().await?;
        let records = decode_page(body)?;
        debug!(count = records.len(), "Received page");
        Ok(records)
    }
}

/// Split a page body into records, accepting a bare array or `{"bans": [...]}`
pub(crate) fn decode_page(body: Value) -> Result<Vec<BubberRecord>, FetchError> {
    let items = match body {
        Value::Array(items) => items,
        Value::Object(mut map) => match map.remove("bans") {
            Some(Value::Array(items)) => items,
            Some(Value::Null) | None => Vec::new(),
            Some(other) => {
                return Err(FetchError::Decode(format!(
                    "expected \"bans\" to be an array, got {other}"
                )))
            }
        },
        Value::Null => Vec::new(),
        other => {
            return Err(FetchError::Decode(format!(
                "expected an array of bans, got {other}"
            )))
        }
    };
    Ok(items.into_iter().map(BubberRecord::from).collect())
}
