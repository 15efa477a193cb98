//! Wallet Standard Demo - example providers and the `wallet-standard` CLI
//!
//! Demo wallets sign with in-memory keys (Ed25519 [`signer::SolanaSigner`],
//! secp256k1 [`signer::EthereumSigner`]) and are built on [`wallet_standard_core::StandardWallet`]:
//!
//! - **MultiChain Wallet**: Solana signer, Ledger-style Solana and Ethereum accounts
//! - **Solana Wallet**: Solana signer and Ledger-style accounts
//! - **Ethereum Wallet**: one Ethereum signer
//!
//! Nothing is broadcast and no key leaves the process.

pub mod accounts;
pub mod approval;
pub mod config;
pub mod error;
pub mod signer;
pub mod wallets;

pub use accounts::{AccountKind, SubscribeInput, SubscribeOutput, SUBSCRIBE};
pub use approval::{ApprovalPolicy, PromptApprover};
pub use config::DemoConfig;
pub use error::{DemoError, Result};
pub use signer::{EthereumSigner, SolanaSigner};
pub use wallets::{
    account_with_feature, register_demo_wallets, resolve_wallet, DemoWallet, WalletKind,
};
