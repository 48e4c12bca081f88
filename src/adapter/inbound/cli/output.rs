//! JSON output for CLI handlers.
//!
//! Stdout carries exactly one JSON document per invocation; logs go to stderr.

use serde::Serialize;
use tracing::error;

/// Fallback when a response cannot be serialized.
const SERIALIZATION_FAILED: &str = r#"{"status":"error","message":"failed to serialize response"}"#;

/// Print a response document on stdout.
pub fn emit<T: Serialize>(value: &T) {
    match serde_json::to_string(value) {
        Ok(line) => println!("{line}"),
        Err(err) => {
            error!(error = %err, "Failed to serialize response");
            println!("{SERIALIZATION_FAILED}");
        }
    }
}
