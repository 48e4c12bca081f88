//! Load-or-train management of the anomaly model.
//!
//! ```text
//! artifact present? ──yes──> load ──ok──> refetch snapshot ──> normalization
//!        │                    │
//!        no                 error
//!        ▼                    ▼
//!   fetch snapshot ──> usable rows? ──no──> degenerate model
//!                          │
//!                         yes
//!                          ▼
//!              normalization + features ──> fit ──> persist
//! ```

use std::sync::Arc;

use tracing::{info, warn};

use super::bundle::{ModelBundle, ModelHealth};
use crate::domain::{
    FeatureBuilder, FeatureVector, ForestParams, IsolationForest, MarketSnapshot, Normalization,
};
use crate::error::{Error, Result};
use crate::port::outbound::{MarketDataSource, ModelStore};

/// Produces the process-wide [`ModelBundle`].
///
/// The manager is the only writer of the model artifact. Concurrent managers
/// sharing one store location are not coordinated.
pub struct ModelManager {
    source: Arc<dyn MarketDataSource>,
    store: Arc<dyn ModelStore>,
    params: ForestParams,
    require_persist: bool,
}

impl ModelManager {
    #[must_use]
    pub fn new(source: Arc<dyn MarketDataSource>, store: Arc<dyn ModelStore>) -> Self {
        Self {
            source,
            store,
            params: ForestParams::default(),
            require_persist: false,
        }
    }

    /// Number of trees for newly trained models.
    #[must_use]
    pub fn trees(mut self, trees: usize) -> Self {
        self.params.trees = trees;
        self
    }

    /// Treat a failed artifact write after training as fatal.
    #[must_use]
    pub fn require_persist(mut self, require: bool) -> Self {
        self.require_persist = require;
        self
    }

    /// Load the stored model or train a new one.
    ///
    /// A stored model that cannot be read or decoded is replaced by
    /// retraining. Training never fails for lack of data: an unusable
    /// snapshot yields a [`ModelHealth::Degenerate`] placeholder.
    ///
    /// # Errors
    ///
    /// Only when `require_persist` is set and the artifact write fails.
    pub async fn ensure_model(&self) -> Result<ModelBundle> {
        if self.store.exists() {
            match self.store.load() {
                Ok(forest) => {
                    let normalization = self.rederive_normalization().await;
                    let health = if forest.training_rows() <= 1 {
                        ModelHealth::Degenerate
                    } else {
                        ModelHealth::Loaded
                    };
                    info!(
                        location = %self.store.location(),
                        trees = forest.tree_count(),
                        train_modal_max = ?normalization.train_modal_max(),
                        "Loaded stored model"
                    );
                    let bundle = ModelBundle::new(forest, normalization, health, true);
                    warn_if_degraded(&bundle);
                    return Ok(bundle);
                }
                Err(err) => {
                    warn!(
                        location = %self.store.location(),
                        error = %err,
                        "Stored model unusable, retraining"
                    );
                }
            }
        }

        self.train().await
    }

    /// Fit a fresh model from the current snapshot and persist it.
    ///
    /// # Errors
    ///
    /// Only when `require_persist` is set and the artifact write fails.
    pub async fn train(&self) -> Result<ModelBundle> {
        let snapshot = match self.source.fetch().await {
            Ok(snapshot) => snapshot,
            Err(err) => {
                warn!(source = self.source.name(), error = %err, "Training fetch failed");
                MarketSnapshot::default()
            }
        };

        let (forest, normalization, health) = match self.fit_snapshot(&snapshot)? {
            Some((forest, normalization)) => (forest, normalization, ModelHealth::Trained),
            None => {
                let forest = IsolationForest::fit(&[FeatureVector::zero()], self.params)?;
                (forest, Normalization::UNSET, ModelHealth::Degenerate)
            }
        };

        let persisted = self.persist(&forest)?;
        let bundle = ModelBundle::new(forest, normalization, health, persisted);
        warn_if_degraded(&bundle);
        Ok(bundle)
    }

    /// `None` when the snapshot has no usable training rows.
    fn fit_snapshot(
        &self,
        snapshot: &MarketSnapshot,
    ) -> Result<Option<(IsolationForest, Normalization)>> {
        let prices = snapshot.training_prices();
        let modal_max = prices.iter().map(|p| p.modal).reduce(f64::max);
        let normalization = Normalization::from_modal_max(modal_max);
        let builder = FeatureBuilder::new(normalization);

        let rows: Vec<FeatureVector> = prices
            .iter()
            .map(|p| builder.training(p))
            .filter(FeatureVector::is_finite)
            .collect();

        let skipped = snapshot.len() - rows.len();
        if rows.is_empty() {
            warn!(records = snapshot.len(), "No usable training rows");
            return Ok(None);
        }

        let forest = IsolationForest::fit(&rows, self.params)?;
        info!(
            rows = rows.len(),
            skipped,
            trees = forest.tree_count(),
            train_modal_max = ?normalization.train_modal_max(),
            "Trained model"
        );
        Ok(Some((forest, normalization)))
    }

    async fn rederive_normalization(&self) -> Normalization {
        match self.source.fetch().await {
            Ok(snapshot) => Normalization::from_snapshot(&snapshot),
            Err(err) => {
                warn!(
                    source = self.source.name(),
                    error = %err,
                    "Could not refetch snapshot, normalization unset"
                );
                Normalization::UNSET
            }
        }
    }

    fn persist(&self, forest: &IsolationForest) -> Result<bool> {
        match self.store.save(forest) {
            Ok(()) => {
                info!(location = %self.store.location(), "Persisted model");
                Ok(true)
            }
            Err(err) if self.require_persist => Err(Error::Storage(err)),
            Err(err) => {
                warn!(
                    location = %self.store.location(),
                    error = %err,
                    "Model not persisted, keeping it in memory"
                );
                Ok(false)
            }
        }
    }
}

fn warn_if_degraded(bundle: &ModelBundle) {
    if bundle.health().is_degraded() {
        warn!("Using degenerate placeholder model; anomaly checks accept every quote");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapter::outbound::memory::{MemoryModelStore, StaticSource};
    use crate::domain::{Label, MarketRecord};
    use crate::error::StorageError;

    fn record(modal: f64, min: f64, max: f64) -> MarketRecord {
        MarketRecord {
            commodity: Some("Tomato".into()),
            state: Some("Maharashtra".into()),
            district: Some("Pune".into()),
            market: Some("Pune".into()),
            arrival_date: Some("01/02/2024".into()),
            modal_price: Some(modal),
            min_price: Some(min),
            max_price: Some(max),
            ..MarketRecord::default()
        }
    }

    fn market(n: usize) -> Vec<MarketRecord> {
        (0..n)
            .map(|i| {
                let modal = 800.0 + (i % 40) as f64 * 10.0;
                record(modal, modal - 100.0, modal + 120.0)
            })
            .collect()
    }

    fn manager(source: StaticSource, store: Arc<MemoryModelStore>) -> ModelManager {
        ModelManager::new(Arc::new(source), store).trees(25)
    }

    #[tokio::test]
    async fn trains_and_persists_when_no_artifact() {
        let store = Arc::new(MemoryModelStore::new());
        let bundle = manager(StaticSource::from_records(market(120)), store.clone())
            .ensure_model()
            .await
            .unwrap();

        assert_eq!(bundle.health(), ModelHealth::Trained);
        assert!(bundle.persisted());
        assert_eq!(bundle.normalization().train_modal_max(), Some(1190.0));
        assert_eq!(bundle.forest().training_rows(), 120);
        assert_eq!(store.write_count(), 1);
    }

    #[tokio::test]
    async fn loading_rederives_normalization_from_fresh_snapshot() {
        let store = Arc::new(MemoryModelStore::new());
        manager(StaticSource::from_records(market(120)), store.clone())
            .ensure_model()
            .await
            .unwrap();

        let mut later = market(10);
        later.push(record(2500.0, 2400.0, 2600.0));
        let source = Arc::new(StaticSource::from_records(later));
        let bundle = ModelManager::new(source.clone(), store.clone())
            .ensure_model()
            .await
            .unwrap();

        assert_eq!(bundle.health(), ModelHealth::Loaded);
        assert_eq!(bundle.normalization().train_modal_max(), Some(2500.0));
        assert_eq!(bundle.forest().training_rows(), 120);
        assert_eq!(source.fetch_count(), 1);
        assert_eq!(store.write_count(), 1);
    }

    #[tokio::test]
    async fn reload_normalization_counts_rows_with_only_a_modal_price() {
        let store = Arc::new(MemoryModelStore::new());
        let trained = manager(StaticSource::from_records(market(40)), store.clone())
            .ensure_model()
            .await
            .unwrap();
        assert_eq!(trained.normalization().train_modal_max(), Some(1190.0));

        let mut partial = record(5000.0, 4900.0, 5100.0);
        partial.min_price = None;
        let mut later = market(40);
        later.push(partial);
        let bundle = manager(StaticSource::from_records(later), store)
            .ensure_model()
            .await
            .unwrap();

        assert_eq!(bundle.health(), ModelHealth::Loaded);
        assert_eq!(bundle.normalization().train_modal_max(), Some(5000.0));
    }

    #[tokio::test]
    async fn training_normalization_ignores_rows_missing_min_or_max() {
        let mut partial = record(5000.0, 4900.0, 5100.0);
        partial.max_price = None;
        let mut rows = market(40);
        rows.push(partial);
        let bundle = manager(
            StaticSource::from_records(rows),
            Arc::new(MemoryModelStore::new()),
        )
        .train()
        .await
        .unwrap();

        assert_eq!(bundle.normalization().train_modal_max(), Some(1190.0));
        assert_eq!(bundle.forest().training_rows(), 40);
    }

    #[tokio::test]
    async fn loaded_model_keeps_unset_normalization_when_refetch_fails() {
        let store = Arc::new(MemoryModelStore::new());
        manager(StaticSource::from_records(market(60)), store.clone())
            .ensure_model()
            .await
            .unwrap();

        let bundle = manager(StaticSource::failing("timeout"), store.clone())
            .ensure_model()
            .await
            .unwrap();

        assert_eq!(bundle.health(), ModelHealth::Loaded);
        assert!(!bundle.normalization().is_set());
    }

    #[tokio::test]
    async fn unreadable_artifact_triggers_retraining() {
        let store = Arc::new(MemoryModelStore::with_artifact(b"not a model".to_vec()));
        let bundle = manager(StaticSource::from_records(market(50)), store.clone())
            .ensure_model()
            .await
            .unwrap();

        assert_eq!(bundle.health(), ModelHealth::Trained);
        assert_eq!(store.write_count(), 1);
        assert!(store.load().is_ok());
    }

    #[tokio::test]
    async fn empty_snapshot_yields_persisted_degenerate_model() {
        let store = Arc::new(MemoryModelStore::new());
        let bundle = manager(StaticSource::from_records(Vec::new()), store.clone())
            .ensure_model()
            .await
            .unwrap();

        assert_eq!(bundle.health(), ModelHealth::Degenerate);
        assert!(!bundle.normalization().is_set());
        assert!(bundle.persisted());
        let query = FeatureVector::new([100.0, 90.0, 105.0, 10.0, 0.05, 0.0]);
        assert_eq!(bundle.forest().predict(&query).unwrap(), Label::Inlier);
    }

    #[tokio::test]
    async fn failed_fetch_and_unparseable_rows_also_degrade() {
        let failed = manager(
            StaticSource::failing("dns"),
            Arc::new(MemoryModelStore::new()),
        )
        .ensure_model()
        .await
        .unwrap();
        assert_eq!(failed.health(), ModelHealth::Degenerate);

        let mut broken = record(100.0, 90.0, 110.0);
        broken.max_price = None;
        let zero_modal = record(0.0, 0.0, 10.0);
        let unusable = manager(
            StaticSource::from_records(vec![broken, zero_modal]),
            Arc::new(MemoryModelStore::new()),
        )
        .ensure_model()
        .await
        .unwrap();
        assert_eq!(unusable.health(), ModelHealth::Degenerate);
    }

    #[tokio::test]
    async fn stored_degenerate_model_is_reported_as_degenerate() {
        let store = Arc::new(MemoryModelStore::new());
        manager(StaticSource::from_records(Vec::new()), store.clone())
            .ensure_model()
            .await
            .unwrap();

        let reloaded = manager(StaticSource::from_records(market(30)), store)
            .ensure_model()
            .await
            .unwrap();
        assert_eq!(reloaded.health(), ModelHealth::Degenerate);
        assert!(reloaded.persisted());
    }

    #[tokio::test]
    async fn persist_failure_is_tolerated_unless_required() {
        let bundle = manager(
            StaticSource::from_records(market(40)),
            Arc::new(MemoryModelStore::read_only()),
        )
        .ensure_model()
        .await
        .unwrap();
        assert_eq!(bundle.health(), ModelHealth::Trained);
        assert!(!bundle.persisted());

        let result = manager(
            StaticSource::from_records(market(40)),
            Arc::new(MemoryModelStore::read_only()),
        )
        .require_persist(true)
        .ensure_model()
        .await;
        assert!(matches!(
            result,
            Err(Error::Storage(StorageError::Write(_)))
        ));
    }

    #[tokio::test]
    async fn retraining_same_snapshot_classifies_a_query_identically() {
        let query = FeatureVector::new([900.0, 800.0, 2400.0, 220.0, 1.6, 0.75]);
        let mut labels = Vec::new();
        for _ in 0..2 {
            let bundle = manager(
                StaticSource::from_records(market(200)),
                Arc::new(MemoryModelStore::new()),
            )
            .train()
            .await
            .unwrap();
            labels.push(bundle.forest().predict(&query).unwrap());
        }
        assert_eq!(labels[0], labels[1]);
    }
}
