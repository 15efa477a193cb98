//! Error types for the demo wallets and CLI

use thiserror::Error;
use wallet_standard_core::CoreError;
use wallet_standard_registry::{ConnectError, NotifyError};

/// Result type alias for demo operations
pub type Result<T> = std::result::Result<T, DemoError>;

/// Errors that can occur in the demo wallets
#[derive(Debug, Error)]
pub enum DemoError {
    /// Core library error
    #[error("Core error: {0}")]
    Core(#[from] CoreError),

    /// Connection negotiation failed
    #[error("Connect failed: {0}")]
    Connect(#[from] ConnectError),

    /// Registry notification handlers failed
    #[error("Registry error: {0}")]
    Registry(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Key or signature error
    #[error("Signing failed: {0}")]
    Signing(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// No registered wallet matches
    #[error("Wallet not found: {0}")]
    WalletNotFound(String),

    /// The connection granted no usable account
    #[error("No account available: {0}")]
    NoAccount(String),
}

impl<T> From<NotifyError<T>> for DemoError {
    fn from(e: NotifyError<T>) -> Self {
        DemoError::Registry(e.to_string())
    }
}

impl From<k256::ecdsa::Error> for DemoError {
    fn from(e: k256::ecdsa::Error) -> Self {
        DemoError::Signing(e.to_string())
    }
}
