//! Handler for the `status` command.

use serde_json::json;

use crate::adapter::inbound::cli::output;
use crate::domain::Verdict;
use crate::infrastructure::bootstrap;
use crate::infrastructure::config::settings::Config;

/// Establish the model and report its health.
pub async fn execute(config: &Config) {
    match bootstrap::build_services(config).await {
        Ok(services) => output::emit(&json!({
            "status": "ok",
            "model": services.engine.model().status(),
            "location": services.store.location(),
        })),
        Err(err) => output::emit(&Verdict::from(err)),
    }
}
