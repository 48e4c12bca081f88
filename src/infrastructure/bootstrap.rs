//! Infrastructure bootstrap helpers for runtime wiring.

use std::sync::Arc;

use tracing::info;

use crate::adapter::outbound::agmark::AgmarkClient;
use crate::adapter::outbound::file_store::FileModelStore;
use crate::application::decision::DecisionEngine;
use crate::application::model::{ModelBundle, ModelManager};
use crate::error::Result;
use crate::infrastructure::config::settings::Config;
use crate::port::outbound::{MarketDataSource, ModelStore};

/// Wired services for a single command invocation.
pub struct Services {
    pub engine: DecisionEngine,
    pub store: Arc<dyn ModelStore>,
}

/// Build the market data source from configuration.
pub(crate) fn build_source(config: &Config) -> Arc<dyn MarketDataSource> {
    Arc::new(AgmarkClient::from_config(&config.source))
}

/// Build the model artifact store from configuration.
pub(crate) fn build_store(config: &Config) -> Arc<dyn ModelStore> {
    Arc::new(FileModelStore::new(config.model.path.clone()))
}

/// Build the model manager from configuration and wired adapters.
pub(crate) fn build_manager(
    config: &Config,
    source: Arc<dyn MarketDataSource>,
    store: Arc<dyn ModelStore>,
) -> ModelManager {
    ModelManager::new(source, store)
        .trees(config.model.trees)
        .require_persist(config.model.require_persist)
}

/// Load or train the model and wire the decision engine around it.
///
/// # Errors
///
/// Returns an error when the model cannot be established, which only happens
/// when a persisted artifact is required and cannot be written.
pub async fn build_services(config: &Config) -> Result<Services> {
    let source = build_source(config);
    let store = build_store(config);
    build_services_with(config, source, store).await
}

/// Same as [`build_services`] with caller-supplied adapters.
///
/// # Errors
///
/// See [`build_services`].
pub async fn build_services_with(
    config: &Config,
    source: Arc<dyn MarketDataSource>,
    store: Arc<dyn ModelStore>,
) -> Result<Services> {
    let manager = build_manager(config, Arc::clone(&source), Arc::clone(&store));
    let bundle: Arc<ModelBundle> = Arc::new(manager.ensure_model().await?);

    info!(
        source = source.name(),
        location = %store.location(),
        health = ?bundle.health(),
        "Services ready"
    );

    Ok(Services {
        engine: DecisionEngine::new(source, bundle),
        store,
    })
}
