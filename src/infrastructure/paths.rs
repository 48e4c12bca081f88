//! Path utilities for pricewarden.
//!
//! All data lives under `~/.pricewarden/`:
//! - `~/.pricewarden/config.toml` - configuration
//! - `~/.pricewarden/price_anomaly_model.json` - trained model artifact

use std::path::PathBuf;

/// Returns the pricewarden home directory (`~/.pricewarden/`).
pub fn home_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".pricewarden")
}

/// Returns the default config file path (`~/.pricewarden/config.toml`).
pub fn default_config() -> PathBuf {
    home_dir().join("config.toml")
}

/// Returns the default model artifact path.
pub fn default_model() -> PathBuf {
    home_dir().join("price_anomaly_model.json")
}
