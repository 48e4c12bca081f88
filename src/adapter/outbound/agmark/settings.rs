//! Agmarknet market data source configuration.

use serde::Deserialize;

/// Environment variable that overrides [`AgmarkConfig::api_key`].
pub const API_KEY_ENV: &str = "AGMARK_API_KEY";

/// Connection settings for the Agmarknet daily price resource.
#[derive(Debug, Clone, Deserialize)]
pub struct AgmarkConfig {
    /// Resource URL on the open data portal.
    #[serde(default = "default_api_url")]
    pub api_url: String,
    /// Portal API key. Prefer setting `AGMARK_API_KEY` instead.
    #[serde(default)]
    pub api_key: String,
    /// Maximum records per fetch.
    #[serde(default = "default_limit")]
    pub limit: usize,
    /// Whole-request timeout in milliseconds.
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
    /// Connect timeout in milliseconds.
    #[serde(default = "default_connect_timeout_ms")]
    pub connect_timeout_ms: u64,
}

fn default_api_url() -> String {
    "https://api.data.gov.in/resource/9ef84268-d588-465a-a308-a864a43d0070".into()
}

const fn default_limit() -> usize {
    1000
}

const fn default_timeout_ms() -> u64 {
    20_000
}

const fn default_connect_timeout_ms() -> u64 {
    5_000
}

impl Default for AgmarkConfig {
    fn default() -> Self {
        Self {
            api_url: default_api_url(),
            api_key: String::new(),
            limit: default_limit(),
            timeout_ms: default_timeout_ms(),
            connect_timeout_ms: default_connect_timeout_ms(),
        }
    }
}
