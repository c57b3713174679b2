//! HTTP client for the backend premium endpoint.
//!
//! The loader needs exactly one backend call: a GET returning the
//! precompiled bundle artifact. No parameters, no parsing beyond
//! "success status, non-empty body".

use std::time::Duration;

use tracing::debug;

use crate::config::PremiumConfig;
use crate::error::{PremiumError, Result};

/// Path of the bundle endpoint, relative to the backend base URL.
const BUNDLE_PATH: &str = "/premium/components";

/// Thin client for the single backend call the loader performs.
#[derive(Debug, Clone)]
pub struct PremiumApiClient {
    client: reqwest::Client,
    base_url: String,
}

impl PremiumApiClient {
    pub fn new(config: &PremiumConfig) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout))
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());
        Self {
            client,
            base_url: config.backend_url.trim_end_matches('/').to_string(),
        }
    }

    /// URL of the bundle endpoint.
    pub fn bundle_url(&self) -> String {
        format!("{}{}", self.base_url, BUNDLE_PATH)
    }

    /// Fetch the premium bundle artifact.
    pub async fn fetch_bundle(&self) -> Result<Vec<u8>> {
        let url = self.bundle_url();
        debug!(%url, "fetching premium bundle");

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| PremiumError::BundleFetch(format!("request failed: {e}")))?;

        if !response.status().is_success() {
            return Err(PremiumError::BundleFetch(format!(
                "backend returned status {}",
                response.status()
            )));
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| PremiumError::BundleFetch(format!("reading body failed: {e}")))?;
        if body.is_empty() {
            return Err(PremiumError::BundleFetch(
                "backend returned an empty bundle".to_string(),
            ));
        }

        Ok(body.to_vec())
    }
}
