//! Command-line interface definitions.
//!
//! Defines the CLI structure for pricewarden using `clap`. The command and its
//! payload are plain positionals so that every malformed invocation can still
//! be answered with a JSON error envelope.

use std::path::PathBuf;

use clap::Parser;
use serde_json::Value;

use crate::domain::PriceQuery;
use crate::infrastructure::paths;

pub const INVALID_ARGUMENTS: &str = "invalid arguments";
pub const INVALID_JSON: &str = "invalid JSON payload";
pub const UNKNOWN_COMMAND: &str = "unknown command";

/// Vendor price fraud checks against live mandi market records
#[derive(Parser, Debug)]
#[command(name = "pricewarden")]
#[command(version)]
pub struct Cli {
    /// Path to the configuration file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Command to run: `check` or `status`
    pub command: Option<String>,

    /// JSON payload for `check`
    pub payload: Option<String>,
}

/// A validated request, ready to be served.
#[derive(Debug)]
pub enum Invocation {
    /// Score a vendor quote.
    Check(PriceQuery),
    /// Report model health.
    Status,
}

impl Cli {
    /// Config file path, defaulting to `~/.pricewarden/config.toml`.
    #[must_use]
    pub fn config_path(&self) -> PathBuf {
        self.config.clone().unwrap_or_else(paths::default_config)
    }

    /// Validate the command and payload without touching the network.
    ///
    /// # Errors
    ///
    /// Returns the message for the error envelope.
    pub fn invocation(&self) -> Result<Invocation, &'static str> {
        let command = self.command.as_deref().ok_or(INVALID_ARGUMENTS)?;
        if command == "status" {
            return Ok(Invocation::Status);
        }

        let payload = self.payload.as_deref().ok_or(INVALID_ARGUMENTS)?;
        let value: Value = serde_json::from_str(payload).map_err(|_| INVALID_JSON)?;

        if command != "check" {
            return Err(UNKNOWN_COMMAND);
        }

        serde_json::from_value(value)
            .map(Invocation::Check)
            .map_err(|_| INVALID_JSON)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("pricewarden").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn check_with_payload_yields_query() {
        let cli = parse(&[
            "check",
            r#"{"commodity":"Wheat","state":"Punjab","district":"Ludhiana","market":"Khanna","vendor_price":2100}"#,
        ]);
        match cli.invocation().unwrap() {
            Invocation::Check(query) => {
                assert_eq!(query.commodity, "Wheat");
                assert_eq!(query.vendor_price().unwrap(), 2100.0);
            }
            Invocation::Status => panic!("expected check"),
        }
    }

    #[test]
    fn malformed_invocations_map_to_envelope_messages() {
        assert_eq!(parse(&[]).invocation().unwrap_err(), INVALID_ARGUMENTS);
        assert_eq!(parse(&["check"]).invocation().unwrap_err(), INVALID_ARGUMENTS);
        assert_eq!(parse(&["check", "{not json"]).invocation().unwrap_err(), INVALID_JSON);
        assert_eq!(parse(&["check", "[1,2]"]).invocation().unwrap_err(), INVALID_JSON);
        assert_eq!(parse(&["audit", "{}"]).invocation().unwrap_err(), UNKNOWN_COMMAND);
    }

    #[test]
    fn status_needs_no_payload() {
        assert!(matches!(parse(&["status"]).invocation(), Ok(Invocation::Status)));
    }

    #[test]
    fn check_and_status_are_the_only_commands() {
        for command in ["STATUS", "Check", "health", "check-status"] {
            assert_eq!(
                parse(&[command, "{}"]).invocation().unwrap_err(),
                UNKNOWN_COMMAND,
                "{command}"
            );
        }
    }

    #[test]
    fn explicit_config_path_wins() {
        let cli = parse(&["--config", "/tmp/pw.toml", "status"]);
        assert_eq!(cli.config_path(), PathBuf::from("/tmp/pw.toml"));
        assert!(parse(&["status"]).config_path().ends_with("config.toml"));
    }
}
