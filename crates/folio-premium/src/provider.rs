//! Capability providers: how an installed bundle comes into existence.
//!
//! The provider seam is what keeps raw code-text execution out of the
//! design: a bundle is a precompiled dynamic library loaded through the
//! SDK's descriptor ABI, never evaluated source.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;
use folio_premium_sdk::descriptor::{CBundleDescriptor, ParsedBundleDescriptor};
use folio_premium_sdk::{
    ABI_VERSION_SYMBOL, BUNDLE_NAME_PREFIX, DESCRIPTOR_SYMBOL, PREMIUM_ABI_VERSION,
};
use tracing::{debug, info};

use crate::bundle::BundleHandle;
use crate::client::PremiumApiClient;
use crate::config::PremiumConfig;
use crate::error::{PremiumError, Result};
use crate::registry::SharedRegistry;

/// Source of installed bundle handles.
///
/// `load` performs the whole installation: obtain the artifact, bring its
/// capabilities into the process, and register the handle so discovery
/// finds it afterwards.
#[async_trait]
pub trait CapabilityProvider: Send + Sync {
    async fn load(&self) -> Result<Arc<BundleHandle>>;
}

/// Production provider: fetches the precompiled bundle from the backend,
/// loads it as a dynamic library, and registers the parsed handle.
pub struct RemoteBundleProvider {
    client: PremiumApiClient,
    config: PremiumConfig,
    registry: SharedRegistry,
}

impl RemoteBundleProvider {
    pub fn new(config: PremiumConfig, registry: SharedRegistry) -> Self {
        Self {
            client: PremiumApiClient::new(&config),
            config,
            registry,
        }
    }

    fn artifact_path(&self) -> PathBuf {
        self.config.bundle_dir.join(artifact_file_name())
    }

    fn write_artifact(&self, bytes: &[u8]) -> Result<PathBuf> {
        fs::create_dir_all(&self.config.bundle_dir).map_err(|e| {
            PremiumError::BundleFetch(format!("creating bundle directory failed: {e}"))
        })?;
        let path = self.artifact_path();
        fs::write(&path, bytes)
            .map_err(|e| PremiumError::BundleFetch(format!("writing bundle artifact failed: {e}")))?;
        Ok(path)
    }

    /// Load the artifact and parse its descriptor. The library is moved
    /// into the returned handle and stays alive with it.
    fn load_artifact(&self, path: &Path) -> Result<Arc<BundleHandle>> {
        let library = unsafe { libloading::Library::new(path) }.map_err(|e| {
            PremiumError::BundleRegistration(format!("loading bundle library failed: {e}"))
        })?;

        let abi = {
            let symbol: libloading::Symbol<unsafe extern "C" fn() -> u32> =
                unsafe { library.get(ABI_VERSION_SYMBOL) }.map_err(|e| {
                    PremiumError::BundleRegistration(format!("missing ABI version export: {e}"))
                })?;
            unsafe { symbol() }
        };
        if abi != PREMIUM_ABI_VERSION {
            return Err(PremiumError::BundleRegistration(format!(
                "incompatible bundle ABI: expected {PREMIUM_ABI_VERSION}, got {abi}"
            )));
        }

        let parsed = {
            let symbol: libloading::Symbol<unsafe extern "C" fn() -> *const CBundleDescriptor> =
                unsafe { library.get(DESCRIPTOR_SYMBOL) }.map_err(|e| {
                    PremiumError::BundleRegistration(format!("missing descriptor export: {e}"))
                })?;
            let raw = unsafe { symbol() };
            if raw.is_null() {
                return Err(PremiumError::BundleRegistration(
                    "bundle exported a null descriptor".to_string(),
                ));
            }
            unsafe { ParsedBundleDescriptor::from_raw(&*raw) }.map_err(|e| {
                PremiumError::BundleRegistration(format!("invalid bundle descriptor: {e}"))
            })?
        };

        if !parsed.name.starts_with(BUNDLE_NAME_PREFIX) {
            return Err(PremiumError::BundleRegistration(format!(
                "bundle name {} does not carry the recognized prefix",
                parsed.name
            )));
        }

        Ok(Arc::new(BundleHandle::from_descriptor(parsed, library)))
    }
}

#[async_trait]
impl CapabilityProvider for RemoteBundleProvider {
    async fn load(&self) -> Result<Arc<BundleHandle>> {
        let path = match &self.config.local_bundle {
            Some(path) => {
                info!(path = %path.display(), "loading locally built premium bundle");
                path.clone()
            }
            None => {
                let bytes = self.client.fetch_bundle().await?;
                debug!(len = bytes.len(), "premium bundle fetched");
                self.write_artifact(&bytes)?
            }
        };

        let bundle = self.load_artifact(&path)?;
        info!(
            name = bundle.name(),
            version = %bundle.version(),
            capabilities = bundle.capability_names().len(),
            "premium bundle registered"
        );
        self.registry.register(bundle.clone());
        Ok(bundle)
    }
}

/// Platform file name of the cached bundle artifact.
fn artifact_file_name() -> &'static str {
    match std::env::consts::OS {
        "macos" => "premium_components.dylib",
        "windows" => "premium_components.dll",
        _ => "premium_components.so",
    }
}
