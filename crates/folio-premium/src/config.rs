//! Loader configuration.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Configuration for the premium capability loader.
///
/// All fields default to values suitable for a locally running backend
/// daemon, so a plain `PremiumConfig::default()` works out of the box.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PremiumConfig {
    /// Base URL of the local backend daemon
    #[serde(default = "default_backend_url")]
    pub backend_url: String,

    /// Request timeout in seconds for the bundle fetch
    #[serde(default = "default_timeout")]
    pub timeout: u64,

    /// Directory where fetched bundle artifacts are written before loading
    #[serde(default = "default_bundle_dir")]
    pub bundle_dir: PathBuf,

    /// Locally built bundle to load instead of fetching (development)
    #[serde(default)]
    pub local_bundle: Option<PathBuf>,
}

fn default_backend_url() -> String {
    "http://127.0.0.1:4242/api/1".to_string()
}

fn default_timeout() -> u64 {
    30
}

fn default_bundle_dir() -> PathBuf {
    std::env::temp_dir().join("folio-premium")
}

impl Default for PremiumConfig {
    fn default() -> Self {
        Self {
            backend_url: default_backend_url(),
            timeout: default_timeout(),
            bundle_dir: default_bundle_dir(),
            local_bundle: None,
        }
    }
}
