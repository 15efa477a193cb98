//! Wallet Standard Core - capability model, accounts and the wallet contract
//!
//! This crate holds the data shapes shared by wallets (providers) and the
//! applications that consume them:
//!
//! - chain identifiers and capability names
//! - versioned capability records and the feature/extension maps built from them
//! - accounts and the [`Wallet`] trait, with a ready-made [`StandardWallet`]
//! - the standard feature vocabulary in [`features`]
//!
//! Registration, discovery and negotiation live in `wallet-standard-registry`.

pub mod account;
pub mod capability;
pub mod chain;
pub mod error;
pub mod features;
pub mod request;
pub mod standard;
pub mod summary;
pub mod types;
pub mod wallet;

pub use account::Account;
pub use capability::{
    typed_method, Capability, CapabilityMap, ExtensionMap, ExtensionName, FeatureMap, FeatureName,
    Method,
};
pub use chain::{
    ChainId, ETHEREUM_MAINNET, SOLANA_DEVNET, SOLANA_LOCALNET, SOLANA_MAINNET, SOLANA_TESTNET,
};
pub use error::{BoxError, CoreError, Result};
pub use request::ConnectRequest;
pub use standard::{StandardWallet, StandardWalletBuilder};
pub use summary::{AccountSummary, WalletSummary};
pub use types::{Icon, PublicKeyBytes, WalletId};
pub use wallet::{
    validate_accounts, validate_wallet, Approval, Approver, AutoApprove, AutoReject, Wallet,
};

pub use semver::Version;
