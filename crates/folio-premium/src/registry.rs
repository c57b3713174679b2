//! Process-wide registry of installed premium bundles.
//!
//! The registry replaces the global namespace the original mechanism
//! scanned: an explicit init-once, read-many singleton keyed by registered
//! bundle name. It lives for the process lifetime and is never persisted.

use std::collections::HashMap;
use std::sync::{Arc, OnceLock, RwLock};

use folio_premium_sdk::BUNDLE_NAME_PREFIX;
use tracing::warn;

use crate::bundle::BundleHandle;

/// Shared handle to a registry.
pub type SharedRegistry = Arc<BundleRegistry>;

/// Registry of bundles keyed by their registered name.
#[derive(Default)]
pub struct BundleRegistry {
    bundles: RwLock<HashMap<String, Arc<BundleHandle>>>,
}

impl BundleRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a bundle under its own name.
    ///
    /// Registering the same name again replaces the previous handle; in
    /// practice installation happens once per process so this only comes
    /// up when a provider is re-run after a partial failure.
    pub fn register(&self, bundle: Arc<BundleHandle>) {
        if !bundle.name().starts_with(BUNDLE_NAME_PREFIX) {
            warn!(
                name = bundle.name(),
                "registered bundle name lacks the recognized prefix; discovery will skip it"
            );
        }
        let mut bundles = self.bundles.write().unwrap();
        bundles.insert(bundle.name().to_string(), bundle);
    }

    /// Bundles whose registered name carries the recognized prefix.
    ///
    /// Pure read, repeatable, typically 0- or 1-element. Sorted by name so
    /// "the first discovered bundle" is deterministic.
    pub fn discover(&self) -> Vec<Arc<BundleHandle>> {
        let bundles = self.bundles.read().unwrap();
        let mut found: Vec<_> = bundles
            .values()
            .filter(|bundle| bundle.name().starts_with(BUNDLE_NAME_PREFIX))
            .cloned()
            .collect();
        found.sort_by(|a, b| a.name().cmp(b.name()));
        found
    }

    /// Look up a bundle by registered name.
    pub fn get(&self, name: &str) -> Option<Arc<BundleHandle>> {
        self.bundles.read().unwrap().get(name).cloned()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.bundles.read().unwrap().contains_key(name)
    }

    pub fn count(&self) -> usize {
        self.bundles.read().unwrap().len()
    }
}

/// Process-wide registry instance.
pub fn global_registry() -> SharedRegistry {
    static REGISTRY: OnceLock<SharedRegistry> = OnceLock::new();
    REGISTRY
        .get_or_init(|| Arc::new(BundleRegistry::new()))
        .clone()
}
