//! Model artifact and training configuration.

use std::path::PathBuf;

use serde::Deserialize;

use crate::infrastructure::paths;

#[derive(Debug, Clone, Deserialize)]
pub struct ModelConfig {
    /// Where the trained model is stored.
    #[serde(default = "paths::default_model")]
    pub path: PathBuf,
    /// Trees per forest when training.
    #[serde(default = "default_trees")]
    pub trees: usize,
    /// Fail startup when a freshly trained model cannot be written.
    #[serde(default)]
    pub require_persist: bool,
}

const fn default_trees() -> usize {
    100
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            path: paths::default_model(),
            trees: default_trees(),
            require_persist: false,
        }
    }
}
