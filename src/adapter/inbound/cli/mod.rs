//! CLI module graph.

pub mod check;
pub mod command;
pub mod output;
pub mod status;

use crate::domain::Verdict;
use crate::infrastructure::config::settings::Config;
use command::{Cli, Invocation};

/// Serve one invocation. Every outcome is a JSON document on stdout.
pub async fn run(cli: Cli) {
    let invocation = match cli.invocation() {
        Ok(invocation) => invocation,
        Err(message) => {
            output::emit(&Verdict::error(message));
            return;
        }
    };

    let config = match Config::load_or_default(cli.config_path()) {
        Ok(config) => config,
        Err(err) => {
            output::emit(&Verdict::from(err));
            return;
        }
    };
    config.init_logging();

    match invocation {
        Invocation::Check(query) => check::execute(&config, &query).await,
        Invocation::Status => status::execute(&config).await,
    }
}
