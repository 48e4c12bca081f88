//! Handler for the `check` command.

use crate::adapter::inbound::cli::output;
use crate::domain::{PriceQuery, Verdict};
use crate::infrastructure::bootstrap;
use crate::infrastructure::config::settings::Config;

/// Score one vendor quote and print the verdict.
pub async fn execute(config: &Config, query: &PriceQuery) {
    let verdict = match bootstrap::build_services(config).await {
        Ok(services) => services.engine.score(query).await,
        Err(err) => Verdict::from(err),
    };
    output::emit(&verdict);
}
