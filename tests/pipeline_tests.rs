//! End-to-end scoring over in-memory market data and an on-disk model.

mod support;

use std::sync::Arc;

use pricewarden::adapter::outbound::file_store::FileModelStore;
use pricewarden::adapter::outbound::memory::StaticSource;
use pricewarden::application::model::ModelHealth;
use pricewarden::domain::{PriceQuery, Verdict, REASON_ABOVE_THRESHOLD};
use pricewarden::infrastructure::bootstrap::{build_services_with, Services};
use pricewarden::infrastructure::config::settings::Config;
use pricewarden::port::outbound::ModelStore;

use support::{daily_snapshot, DISTRICT, STATE};

fn config() -> Config {
    let mut config = Config::default();
    config.model.trees = 50;
    config
}

async fn services(source: Arc<StaticSource>, store: Arc<FileModelStore>) -> Services {
    build_services_with(&config(), source, store)
        .await
        .expect("services")
}

fn wheat_quote(vendor_price: f64) -> PriceQuery {
    PriceQuery::new("Wheat", STATE, DISTRICT, "Yeshwanthpur", vendor_price)
}

#[tokio::test]
async fn latest_record_is_the_reference_for_a_quote_within_tolerance() {
    let dir = tempfile::tempdir().unwrap();
    let source = Arc::new(StaticSource::from_records(daily_snapshot()));
    let store = Arc::new(FileModelStore::new(dir.path().join("model.json")));

    let services = services(source, store).await;
    let verdict = services.engine.score(&wheat_quote(1200.0)).await;

    assert!(!verdict.is_error(), "unexpected error: {verdict:?}");
    assert_eq!(verdict.market_modal_price(), Some(1100.0));
    match verdict {
        Verdict::Accept { vendor_price, .. } | Verdict::Reject { vendor_price, .. } => {
            assert_eq!(vendor_price, 1200.0);
        }
        Verdict::Error { .. } => unreachable!(),
    }
}

#[tokio::test]
async fn threshold_rule_rejects_before_the_model() {
    let dir = tempfile::tempdir().unwrap();
    let source = Arc::new(StaticSource::from_records(daily_snapshot()));
    let store = Arc::new(FileModelStore::new(dir.path().join("model.json")));

    let services = services(source, store).await;
    let verdict = services.engine.score(&wheat_quote(1211.0)).await;

    assert_eq!(
        verdict,
        Verdict::reject(REASON_ABOVE_THRESHOLD, 1100.0, 1211.0)
    );
}

#[tokio::test]
async fn matching_ignores_case_and_whitespace() {
    let dir = tempfile::tempdir().unwrap();
    let source = Arc::new(StaticSource::from_records(daily_snapshot()));
    let store = Arc::new(FileModelStore::new(dir.path().join("model.json")));

    let services = services(source, store).await;
    let query = PriceQuery::new(" wheat ", "KARNATAKA", " bengaluru", "yeshwanthpur ", 1000.0);
    let verdict = services.engine.score(&query).await;

    assert_eq!(verdict.market_modal_price(), Some(1100.0));
}

#[tokio::test]
async fn unknown_market_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    let source = Arc::new(StaticSource::from_records(daily_snapshot()));
    let store = Arc::new(FileModelStore::new(dir.path().join("model.json")));

    let services = services(source, store).await;
    let query = PriceQuery::new("Wheat", STATE, DISTRICT, "Mysuru", 1000.0);

    assert_eq!(
        services.engine.score(&query).await,
        Verdict::error("no market data available")
    );
}

#[tokio::test]
async fn restart_reuses_the_stored_model() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("model.json");
    let source = Arc::new(StaticSource::from_records(daily_snapshot()));

    let first = services(source.clone(), Arc::new(FileModelStore::new(&path))).await;
    assert_eq!(first.engine.model().health(), ModelHealth::Trained);
    assert!(first.engine.model().persisted());
    assert!(path.is_file());

    let second = services(source, Arc::new(FileModelStore::new(&path))).await;
    assert_eq!(second.engine.model().health(), ModelHealth::Loaded);
    assert_eq!(second.engine.model().forest(), first.engine.model().forest());
    assert_eq!(
        second.engine.model().normalization(),
        first.engine.model().normalization()
    );

    for price in [800.0, 1000.0, 1100.0, 1210.0] {
        assert_eq!(
            first.engine.score(&wheat_quote(price)).await,
            second.engine.score(&wheat_quote(price)).await
        );
    }
}

#[tokio::test]
async fn corrupt_artifact_is_replaced_by_retraining() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("model.json");
    std::fs::write(&path, b"{ this is not a model").unwrap();

    let source = Arc::new(StaticSource::from_records(daily_snapshot()));
    let store = Arc::new(FileModelStore::new(&path));
    let services = services(source, store.clone()).await;

    assert_eq!(services.engine.model().health(), ModelHealth::Trained);
    assert!(store.load().is_ok());
}

#[tokio::test]
async fn unreachable_source_yields_degenerate_model_and_error_verdicts() {
    let dir = tempfile::tempdir().unwrap();
    let source = Arc::new(StaticSource::failing("connection refused"));
    let store = Arc::new(FileModelStore::new(dir.path().join("model.json")));

    let services = services(source, store).await;
    let status = services.engine.model().status();
    assert_eq!(status.health, ModelHealth::Degenerate);
    assert_eq!(status.train_modal_max, None);
    assert_eq!(status.training_rows, 1);

    let verdict = services.engine.score(&wheat_quote(1000.0)).await;
    assert_eq!(
        verdict,
        Verdict::error("market data source unavailable: connection refused")
    );
}
