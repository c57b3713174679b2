//! Shared fixtures for loader integration tests.
#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use folio_premium::{
    BundleHandle, Capability, CapabilityProvider, PremiumError, Result, SharedRegistry,
};
use serde_json::json;

/// Provider with scriptable behavior and a load counter.
pub struct MockProvider {
    registry: SharedRegistry,
    delay: Duration,
    fail_times: AtomicUsize,
    loads: AtomicUsize,
}

impl MockProvider {
    pub fn new(registry: SharedRegistry) -> Self {
        Self {
            registry,
            delay: Duration::ZERO,
            fail_times: AtomicUsize::new(0),
            loads: AtomicUsize::new(0),
        }
    }

    /// Sleep this long inside every load.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    /// Fail the first `times` loads before succeeding.
    pub fn failing(self, times: usize) -> Self {
        self.fail_times.store(times, Ordering::SeqCst);
        self
    }

    /// Number of loads attempted so far.
    pub fn loads(&self) -> usize {
        self.loads.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl CapabilityProvider for MockProvider {
    async fn load(&self) -> Result<Arc<BundleHandle>> {
        self.loads.fetch_add(1, Ordering::SeqCst);
        if self.delay > Duration::ZERO {
            tokio::time::sleep(self.delay).await;
        }
        let should_fail = self
            .fail_times
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok();
        if should_fail {
            return Err(PremiumError::BundleFetch("connection refused".to_string()));
        }
        let bundle = test_bundle();
        self.registry.register(bundle.clone());
        Ok(bundle)
    }
}

/// A bundle exporting the capabilities the tests resolve.
pub fn test_bundle() -> Arc<BundleHandle> {
    Arc::new(BundleHandle::new(
        "PremiumComponentsTest",
        semver::Version::new(1, 4, 2),
        vec![
            Capability::from_fn("Foo", |props| {
                Ok(json!({ "component": "Foo", "props": props.clone() }))
            }),
            Capability::from_fn("PremiumStatistics", |_| {
                Ok(json!({ "component": "PremiumStatistics" }))
            }),
        ],
    ))
}

pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter("folio_premium=debug")
        .try_init();
}
