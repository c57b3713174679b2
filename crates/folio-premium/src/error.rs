//! Error types for the premium loader.

/// Errors produced while installing the premium bundle or resolving
/// capabilities from it.
///
/// `BundleFetch` and `BundleRegistration` describe what actually went
/// wrong and exist for the loader's own logging; consumers only ever see
/// `ComponentLoadFailed` for either of them.
#[derive(Debug, thiserror::Error)]
pub enum PremiumError {
    /// The outbound request for the bundle artifact did not succeed
    #[error("premium bundle fetch failed: {0}")]
    BundleFetch(String),

    /// The artifact was retrieved but no bundle ended up registered
    #[error("premium bundle registration failed: {0}")]
    BundleRegistration(String),

    /// The bundle is installed but does not export the requested name
    #[error("premium capability not found: {0}")]
    CapabilityNotFound(String),

    /// Uniform kind reported to consumers for any install-time failure
    #[error("premium component could not be loaded")]
    ComponentLoadFailed,

    /// A capability's render entry point reported a fault
    #[error("capability render failed: {0}")]
    RenderFailed(String),
}

/// Result type for loader operations.
pub type Result<T> = std::result::Result<T, PremiumError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = PremiumError::CapabilityNotFound("PremiumStatistics".to_string());
        assert_eq!(
            err.to_string(),
            "premium capability not found: PremiumStatistics"
        );
    }
}
