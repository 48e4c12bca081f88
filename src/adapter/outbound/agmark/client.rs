//! HTTP client for the Agmarknet daily commodity price resource.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client as HttpClient;
use tracing::{debug, info, warn};

use super::dto::RecordsResponse;
use super::settings::AgmarkConfig;
use crate::domain::MarketSnapshot;
use crate::error::FetchError;
use crate::port::outbound::MarketDataSource;

/// Market data source backed by the data.gov.in records API.
///
/// Every [`fetch`](MarketDataSource::fetch) performs one bounded GET. There
/// is no retry: callers decide whether to try again.
pub struct AgmarkClient {
    http: HttpClient,
    api_url: String,
    api_key: String,
    limit: usize,
}

impl AgmarkClient {
    #[must_use]
    pub fn from_config(config: &AgmarkConfig) -> Self {
        let http = HttpClient::builder()
            .timeout(Duration::from_millis(config.timeout_ms))
            .connect_timeout(Duration::from_millis(config.connect_timeout_ms))
            .build()
            .unwrap_or_else(|err| {
                warn!(error = %err, "Failed to build HTTP client, using defaults");
                HttpClient::new()
            });

        Self {
            http,
            api_url: config.api_url.clone(),
            api_key: config.api_key.clone(),
            limit: config.limit,
        }
    }

    fn query(&self) -> [(&'static str, String); 3] {
        [
            ("api-key", self.api_key.clone()),
            ("format", "json".to_string()),
            ("limit", self.limit.to_string()),
        ]
    }
}

#[async_trait]
impl MarketDataSource for AgmarkClient {
    fn name(&self) -> &'static str {
        "agmarknet"
    }

    async fn fetch(&self) -> Result<MarketSnapshot, FetchError> {
        debug!(url = %self.api_url, limit = self.limit, "Fetching market records");

        let response = self
            .http
            .get(&self.api_url)
            .query(&self.query())
            .send()
            .await?
            .error_for_status()?;

        let body: RecordsResponse = response.json().await?;
        let snapshot = body.into_snapshot();
        info!(records = snapshot.len(), "Fetched market records");
        Ok(snapshot)
    }
}
