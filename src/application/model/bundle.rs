//! A ready-to-use model paired with its normalization.

use serde::Serialize;

use crate::domain::{IsolationForest, Normalization};

/// How the current model came to be.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ModelHealth {
    /// Loaded from storage and trained on real data.
    Loaded,
    /// Trained in this process on real data.
    Trained,
    /// Placeholder fitted on a single zero vector. Accepts every quote the
    /// threshold rule lets through.
    Degenerate,
}

impl ModelHealth {
    #[must_use]
    pub const fn is_degraded(self) -> bool {
        matches!(self, Self::Degenerate)
    }
}

/// The model and normalization that together define the scoring space.
///
/// Built once per process and shared read-only afterwards.
#[derive(Debug, Clone)]
pub struct ModelBundle {
    forest: IsolationForest,
    normalization: Normalization,
    health: ModelHealth,
    persisted: bool,
}

impl ModelBundle {
    #[must_use]
    pub const fn new(
        forest: IsolationForest,
        normalization: Normalization,
        health: ModelHealth,
        persisted: bool,
    ) -> Self {
        Self {
            forest,
            normalization,
            health,
            persisted,
        }
    }

    #[must_use]
    pub const fn forest(&self) -> &IsolationForest {
        &self.forest
    }

    #[must_use]
    pub const fn normalization(&self) -> Normalization {
        self.normalization
    }

    #[must_use]
    pub const fn health(&self) -> ModelHealth {
        self.health
    }

    /// Whether the model is backed by a stored artifact.
    #[must_use]
    pub const fn persisted(&self) -> bool {
        self.persisted
    }

    #[must_use]
    pub fn status(&self) -> ModelStatus {
        ModelStatus {
            health: self.health,
            persisted: self.persisted,
            train_modal_max: self.normalization.train_modal_max(),
            trees: self.forest.tree_count(),
            training_rows: self.forest.training_rows(),
        }
    }
}

/// Operator-facing summary of the loaded model.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ModelStatus {
    pub health: ModelHealth,
    pub persisted: bool,
    pub train_modal_max: Option<f64>,
    pub trees: usize,
    pub training_rows: usize,
}
