//! Install and resolution behavior of the premium loader.

mod common;

use std::sync::Arc;
use std::time::Duration;

use common::{init_tracing, test_bundle, MockProvider};
use folio_premium::{BundleRegistry, PremiumError, PremiumLoader};
use serde_json::json;

fn loader_with(provider: Arc<MockProvider>, registry: Arc<BundleRegistry>) -> PremiumLoader {
    PremiumLoader::new(provider, registry)
}

#[tokio::test]
async fn test_sequential_installs_fetch_once() {
    init_tracing();
    let registry = Arc::new(BundleRegistry::new());
    let provider = Arc::new(MockProvider::new(registry.clone()));
    let loader = loader_with(provider.clone(), registry);

    let first = loader.ensure_bundle_installed().await.unwrap();
    let second = loader.ensure_bundle_installed().await.unwrap();

    assert!(Arc::ptr_eq(&first, &second));
    assert_eq!(provider.loads(), 1);
}

#[tokio::test]
async fn test_concurrent_installs_share_one_fetch() {
    let registry = Arc::new(BundleRegistry::new());
    let provider = Arc::new(
        MockProvider::new(registry.clone()).with_delay(Duration::from_millis(50)),
    );
    let loader = loader_with(provider.clone(), registry);

    let (a, b) = tokio::join!(
        loader.ensure_bundle_installed(),
        loader.ensure_bundle_installed()
    );

    assert!(Arc::ptr_eq(&a.unwrap(), &b.unwrap()));
    assert_eq!(provider.loads(), 1);
}

#[tokio::test]
async fn test_discovery_hit_skips_fetch() {
    let registry = Arc::new(BundleRegistry::new());
    registry.register(test_bundle());
    let provider = Arc::new(MockProvider::new(registry.clone()));
    let loader = loader_with(provider.clone(), registry);

    let bundle = loader.ensure_bundle_installed().await.unwrap();
    assert_eq!(bundle.name(), "PremiumComponentsTest");
    assert_eq!(provider.loads(), 0);
}

#[tokio::test]
async fn test_missing_capability_is_typed_and_fetch_free() {
    let registry = Arc::new(BundleRegistry::new());
    let provider = Arc::new(MockProvider::new(registry.clone()));
    let loader = loader_with(provider.clone(), registry);

    let err = loader.resolve_capability("Bar").await.unwrap_err();
    assert!(matches!(err, PremiumError::CapabilityNotFound(ref name) if name == "Bar"));
    assert_eq!(provider.loads(), 1);

    // Retrying the lookup does not refetch either.
    let err = loader.resolve_capability("Bar").await.unwrap_err();
    assert!(matches!(err, PremiumError::CapabilityNotFound(_)));
    assert_eq!(provider.loads(), 1);
}

#[tokio::test]
async fn test_end_to_end_resolution() {
    init_tracing();
    let registry = Arc::new(BundleRegistry::new());
    let provider = Arc::new(MockProvider::new(registry.clone()));
    let loader = loader_with(provider.clone(), registry.clone());

    // Nothing installed yet.
    assert!(loader.discover_installed_bundles().is_empty());

    // First resolution installs the bundle and resolves the capability.
    let foo = loader.resolve_capability("Foo").await.unwrap();
    assert_eq!(foo.name(), "Foo");
    let rendered = foo.render(&json!({"currency": "EUR"})).unwrap();
    assert_eq!(rendered["props"]["currency"], "EUR");

    // The bundle is discoverable and its setup ran exactly once.
    let installed = loader.discover_installed_bundles();
    assert_eq!(installed.len(), 1);
    assert!(installed[0].is_installed());

    // An absent name on the same process fails typed, with zero refetches.
    let err = loader.resolve_capability("Bar").await.unwrap_err();
    assert!(matches!(err, PremiumError::CapabilityNotFound(_)));
    assert_eq!(provider.loads(), 1);
}

#[tokio::test]
async fn test_failed_install_can_be_retried() {
    let registry = Arc::new(BundleRegistry::new());
    let provider = Arc::new(MockProvider::new(registry.clone()).failing(1));
    let loader = loader_with(provider.clone(), registry);

    let err = loader.ensure_bundle_installed().await.unwrap_err();
    assert!(matches!(err, PremiumError::BundleFetch(_)));

    let bundle = loader.ensure_bundle_installed().await.unwrap();
    assert_eq!(bundle.name(), "PremiumComponentsTest");
    assert_eq!(provider.loads(), 2);
}

#[tokio::test]
async fn test_install_boundary_reports_uniform_error() {
    let registry = Arc::new(BundleRegistry::new());
    let provider = Arc::new(MockProvider::new(registry.clone()).failing(usize::MAX));
    let loader = loader_with(provider.clone(), registry);

    let err = loader.install_library().await.unwrap_err();
    assert!(matches!(err, PremiumError::ComponentLoadFailed));

    let err = loader.resolve_capability("Foo").await.unwrap_err();
    assert!(matches!(err, PremiumError::ComponentLoadFailed));
}
