//! Error types for the wallet standard core

use thiserror::Error;

/// Boxed error returned by capability methods and approval steps.
///
/// Provider code owns these errors; the core passes them through untouched.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Result type alias for core operations
pub type Result<T> = std::result::Result<T, CoreError>;

/// Errors raised by the capability model and account validation
#[derive(Debug, Error)]
pub enum CoreError {
    /// Chain identifier is not of the form `namespace:reference`
    #[error("Invalid chain identifier: {0:?}")]
    InvalidChainId(String),

    /// Feature or extension name is empty or contains whitespace
    #[error("Invalid capability name: {0:?}")]
    InvalidCapabilityName(String),

    /// Capability version is not a semantic version
    #[error("Invalid capability version: {0}")]
    InvalidVersion(#[from] semver::Error),

    /// Icon could not be decoded
    #[error("Invalid icon: {0}")]
    InvalidIcon(String),

    /// Account violates the wallet's chain or capability declarations
    #[error("Invalid account: {0}")]
    InvalidAccount(String),

    /// The requested capability is not present
    #[error("Capability not available: {0}")]
    FeatureUnavailable(String),

    /// The capability is present under a major version the caller does not speak
    #[error("Incompatible version for {name}: found {found}, expected major {expected_major}")]
    IncompatibleVersion {
        name: String,
        found: semver::Version,
        expected_major: u64,
    },

    /// The capability record has no method with this name
    #[error("Method not found: {0}")]
    MethodNotFound(String),

    /// A capability method failed
    #[error("Method {method} failed: {source}")]
    Method {
        method: String,
        #[source]
        source: BoxError,
    },

    /// Method input or output did not match its declared shape
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
