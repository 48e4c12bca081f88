//! Model artifact persistence port.

use crate::domain::IsolationForest;
use crate::error::StorageError;

/// A single durable slot holding one serialized model.
///
/// The slot is either absent or holds the last model written. Writes
/// replace it wholesale.
pub trait ModelStore: Send + Sync {
    /// Human-readable location for logs and status output.
    fn location(&self) -> String;

    /// Whether an artifact is present. Says nothing about readability.
    fn exists(&self) -> bool;

    /// Read and decode the stored model.
    fn load(&self) -> Result<IsolationForest, StorageError>;

    /// Replace the stored model.
    fn save(&self, forest: &IsolationForest) -> Result<(), StorageError>;
}
