//! Anomaly model lifecycle.

mod bundle;
mod manager;

pub use bundle::{ModelBundle, ModelHealth, ModelStatus};
pub use manager::ModelManager;
