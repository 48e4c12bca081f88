//! Model artifact stored as a JSON file.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::domain::IsolationForest;
use crate::error::StorageError;
use crate::port::outbound::ModelStore;

/// Stores the model at a single path, replaced atomically on save.
#[derive(Debug, Clone)]
pub struct FileModelStore {
    path: PathBuf,
}

impl FileModelStore {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ModelStore for FileModelStore {
    fn location(&self) -> String {
        self.path.display().to_string()
    }

    fn exists(&self) -> bool {
        self.path.is_file()
    }

    fn load(&self) -> Result<IsolationForest, StorageError> {
        let bytes = fs::read(&self.path).map_err(StorageError::Read)?;
        let forest: IsolationForest =
            serde_json::from_slice(&bytes).map_err(StorageError::Decode)?;
        forest.validate().map_err(StorageError::Corrupt)?;
        debug!(path = %self.path.display(), trees = forest.tree_count(), "Loaded model artifact");
        Ok(forest)
    }

    /// Write to a sibling temp file, sync, then rename over the target so a
    /// reader never observes a partially written artifact.
    fn save(&self, forest: &IsolationForest) -> Result<(), StorageError> {
        let json = serde_json::to_vec(forest).map_err(StorageError::Encode)?;

        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).map_err(StorageError::Write)?;
            }
        }

        let temp_path = self.path.with_extension("tmp");
        let cleanup_and_err = |e| {
            let _ = fs::remove_file(&temp_path);
            StorageError::Write(e)
        };

        let mut file = fs::File::create(&temp_path).map_err(StorageError::Write)?;
        file.write_all(&json).map_err(cleanup_and_err)?;
        file.sync_all().map_err(cleanup_and_err)?;
        fs::rename(&temp_path, &self.path).map_err(cleanup_and_err)?;

        debug!(path = %self.path.display(), bytes = json.len(), "Saved model artifact");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{FeatureVector, ForestParams};

    fn small_forest() -> IsolationForest {
        let rows: Vec<FeatureVector> = (0..32)
            .map(|i| FeatureVector::new([f64::from(i), 1.0, 2.0, 1.0, 0.5, 0.1]))
            .collect();
        IsolationForest::fit(
            &rows,
            ForestParams {
                trees: 5,
                ..ForestParams::default()
            },
        )
        .unwrap()
    }

    #[test]
    fn save_then_load_returns_the_same_model() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileModelStore::new(dir.path().join("nested").join("model.json"));
        assert!(!store.exists());

        let forest = small_forest();
        store.save(&forest).unwrap();

        assert!(store.exists());
        assert!(!store.path().with_extension("tmp").exists());
        assert_eq!(store.load().unwrap(), forest);
    }

    #[test]
    fn garbage_artifact_fails_to_decode() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("model.json");
        fs::write(&path, b"\x80\x04pickle").unwrap();

        let store = FileModelStore::new(&path);
        assert!(store.exists());
        assert!(matches!(store.load(), Err(StorageError::Decode(_))));
    }

    #[test]
    fn missing_artifact_is_a_read_error() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileModelStore::new(dir.path().join("absent.json"));
        assert!(matches!(store.load(), Err(StorageError::Read(_))));
    }
}
