//! Market data port.

use async_trait::async_trait;

use crate::domain::MarketSnapshot;
use crate::error::FetchError;

/// Source of current market records.
///
/// Every call returns a fresh snapshot; implementations must not cache
/// between calls. Implementations must bound each fetch with a finite
/// timeout so a scoring request can never hang.
///
/// # Thread Safety
///
/// Implementations must be thread-safe (`Send + Sync`).
#[async_trait]
pub trait MarketDataSource: Send + Sync {
    /// Return the source name for logging.
    fn name(&self) -> &'static str;

    /// Fetch the current snapshot. An empty snapshot is not an error.
    ///
    /// # Errors
    ///
    /// Returns a [`FetchError`] when the source is unreachable, times out,
    /// answers with a non-success status, or sends an undecodable body.
    async fn fetch(&self) -> Result<MarketSnapshot, FetchError>;
}
