//! The wallet (provider) contract

use std::fmt;

use async_trait::async_trait;

use crate::account::Account;
use crate::capability::{ExtensionMap, FeatureMap};
use crate::chain::ChainId;
use crate::error::{BoxError, CoreError, Result};
use crate::request::ConnectRequest;
use crate::types::{Icon, WalletId};

/// Outcome of the approval step of a connect request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Approval {
    Approved,
    Rejected,
}

/// A provider that registers itself and exposes accounts
///
/// Identity, name, icon, chains and declared capabilities are fixed for the
/// lifetime of the wallet. The account set may change; implementations must
/// then announce it through the registry.
#[async_trait]
pub trait Wallet: Send + Sync {
    /// Stable identity used for registry deduplication
    fn id(&self) -> WalletId;

    /// Human-readable name
    fn name(&self) -> &str;

    fn icon(&self) -> Option<&Icon> {
        None
    }

    /// Every chain any account of this wallet may support
    fn chains(&self) -> &[ChainId];

    /// Every standard feature any account of this wallet may grant
    fn features(&self) -> &FeatureMap;

    /// Every extension any account of this wallet may grant
    fn extensions(&self) -> &ExtensionMap;

    /// Current accounts, in the wallet's native order
    fn accounts(&self) -> Vec<Account>;

    /// Ask the wallet's user to approve a connect request.
    ///
    /// This is the only place a connect request suspends; it may take as
    /// long as the user does.
    async fn approve(&self, request: &ConnectRequest) -> std::result::Result<Approval, BoxError>;
}

impl fmt::Debug for dyn Wallet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Wallet")
            .field("id", &self.id())
            .field("name", &self.name())
            .finish_non_exhaustive()
    }
}

/// Check every account of a wallet against its declarations
pub fn validate_wallet(wallet: &dyn Wallet) -> Result<()> {
    let accounts = wallet.accounts();
    validate_accounts(
        &accounts,
        wallet.chains(),
        wallet.features(),
        wallet.extensions(),
    )
}

/// Validate an account set: each account individually, plus unique addresses
pub fn validate_accounts(
    accounts: &[Account],
    chains: &[ChainId],
    features: &FeatureMap,
    extensions: &ExtensionMap,
) -> Result<()> {
    for (i, account) in accounts.iter().enumerate() {
        account.validate(chains, features, extensions)?;
        if accounts[..i].iter().any(|a| a.address == account.address) {
            return Err(CoreError::InvalidAccount(format!(
                "duplicate account address {}",
                account.address
            )));
        }
    }
    Ok(())
}

/// User-approval step used by [`crate::StandardWallet`]
#[async_trait]
pub trait Approver: Send + Sync {
    async fn approve(
        &self,
        wallet_name: &str,
        request: &ConnectRequest,
    ) -> std::result::Result<Approval, BoxError>;
}

/// Approves every request
#[derive(Debug, Clone, Copy, Default)]
pub struct AutoApprove;

#[async_trait]
impl Approver for AutoApprove {
    async fn approve(
        &self,
        _: &str,
        _: &ConnectRequest,
    ) -> std::result::Result<Approval, BoxError> {
        Ok(Approval::Approved)
    }
}

/// Rejects every request
#[derive(Debug, Clone, Copy, Default)]
pub struct AutoReject;

#[async_trait]
impl Approver for AutoReject {
    async fn approve(
        &self,
        _: &str,
        _: &ConnectRequest,
    ) -> std::result::Result<Approval, BoxError> {
        Ok(Approval::Rejected)
    }
}
