//! Bundle-side error types.

/// Errors raised by code running inside a capability bundle.
#[derive(Debug, thiserror::Error)]
pub enum BundleError {
    /// Rendering failed
    #[error("render failed: {0}")]
    Render(String),

    /// Props were missing or of the wrong shape
    #[error("invalid props: {0}")]
    InvalidProps(String),

    /// Serialization error
    #[error("serialization error: {0}")]
    Serialization(String),

    /// Custom error
    #[error("{0}")]
    Custom(String),
}

/// Bundle result type
pub type BundleResult<T> = Result<T, BundleError>;

impl From<serde_json::Error> for BundleError {
    fn from(err: serde_json::Error) -> Self {
        BundleError::Serialization(err.to_string())
    }
}
