//! The premium loader: discovery, single-flight install, capability
//! resolution.
//!
//! Everything here is sequenced on the event loop; installation side
//! effects happen-before any capability resolution that depends on them
//! because resolution always goes through [`PremiumLoader::install_library`].

use std::sync::{Arc, OnceLock};

use tokio::sync::OnceCell;
use tracing::{debug, error, info, warn};

use crate::bundle::{BundleHandle, Capability};
use crate::config::PremiumConfig;
use crate::error::{PremiumError, Result};
use crate::lazy::{LazyCapability, LazyOptions};
use crate::provider::{CapabilityProvider, RemoteBundleProvider};
use crate::registry::{global_registry, SharedRegistry};

/// Loads the premium bundle at most once and resolves named capabilities
/// from it.
pub struct PremiumLoader {
    provider: Arc<dyn CapabilityProvider>,
    registry: SharedRegistry,
    install: OnceCell<Arc<BundleHandle>>,
}

impl PremiumLoader {
    pub fn new(provider: Arc<dyn CapabilityProvider>, registry: SharedRegistry) -> Self {
        Self {
            provider,
            registry,
            install: OnceCell::new(),
        }
    }

    /// Loader wired to the production provider and the process-wide
    /// registry.
    pub fn with_config(config: PremiumConfig) -> Self {
        let registry = global_registry();
        let provider = Arc::new(RemoteBundleProvider::new(config, registry.clone()));
        Self::new(provider, registry)
    }

    /// Process-wide loader used by the named capability factories.
    pub fn global() -> &'static Arc<PremiumLoader> {
        static LOADER: OnceLock<Arc<PremiumLoader>> = OnceLock::new();
        LOADER.get_or_init(|| Arc::new(PremiumLoader::with_config(PremiumConfig::default())))
    }

    /// Bundles already present in the registry. Pure read, repeatable.
    pub fn discover_installed_bundles(&self) -> Vec<Arc<BundleHandle>> {
        self.registry.discover()
    }

    /// Return the installed bundle, installing it on first use.
    ///
    /// Concurrent first calls share one in-flight install. A failed
    /// attempt is not cached, so a later call may try again; a successful
    /// one is cached for the process lifetime.
    pub async fn ensure_bundle_installed(&self) -> Result<Arc<BundleHandle>> {
        self.install
            .get_or_try_init(|| self.install_once())
            .await
            .map(Arc::clone)
    }

    async fn install_once(&self) -> Result<Arc<BundleHandle>> {
        if let Some(bundle) = self.discover_installed_bundles().into_iter().next() {
            debug!(name = bundle.name(), "premium bundle already present");
            return Ok(bundle);
        }

        self.provider.load().await?;

        self.discover_installed_bundles()
            .into_iter()
            .next()
            .ok_or_else(|| {
                PremiumError::BundleRegistration(
                    "no component was registered after load".to_string(),
                )
            })
    }

    /// Install the bundle and run its one-time setup.
    ///
    /// This is the loader's error boundary: fetch and registration
    /// failures are logged with their cause here and reported uniformly
    /// to consumers.
    pub async fn install_library(&self) -> Result<Arc<BundleHandle>> {
        let bundle = match self.ensure_bundle_installed().await {
            Ok(bundle) => bundle,
            Err(err @ (PremiumError::BundleFetch(_) | PremiumError::BundleRegistration(_))) => {
                error!(%err, "premium bundle install failed");
                return Err(PremiumError::ComponentLoadFailed);
            }
            Err(err) => return Err(err),
        };

        if bundle.mark_installed() {
            bundle.run_setup();
            info!(name = bundle.name(), "premium bundle setup complete");
        }
        Ok(bundle)
    }

    /// Resolve one named capability from the installed bundle.
    pub async fn resolve_capability(&self, name: &str) -> Result<Capability> {
        let bundle = self.install_library().await?;
        match bundle.capability(name) {
            Some(capability) => Ok(capability),
            None => {
                warn!(
                    name,
                    bundle = bundle.name(),
                    "capability missing from premium bundle"
                );
                Err(PremiumError::CapabilityNotFound(name.to_string()))
            }
        }
    }

    /// Build a lazy descriptor around [`resolve_capability`].
    ///
    /// This is the call most consumers make, one call site per named
    /// capability.
    ///
    /// [`resolve_capability`]: PremiumLoader::resolve_capability
    pub fn make_lazy_capability(
        self: &Arc<Self>,
        name: impl Into<String>,
        options: LazyOptions,
    ) -> LazyCapability {
        LazyCapability::new(self.clone(), name.into(), options)
    }
}
