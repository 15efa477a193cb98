//! Ready-made [`Wallet`] implementation for provider authors

use std::sync::{Arc, PoisonError, RwLock};

use async_trait::async_trait;
use tracing::debug;

use crate::account::Account;
use crate::capability::{Capability, ExtensionMap, ExtensionName, FeatureMap, FeatureName};
use crate::chain::ChainId;
use crate::error::{BoxError, Result};
use crate::request::ConnectRequest;
use crate::types::{Icon, WalletId};
use crate::wallet::{validate_accounts, Approval, Approver, AutoApprove, Wallet};

/// A wallet with fixed declarations and a mutable, validated account set
pub struct StandardWallet {
    id: WalletId,
    name: String,
    icon: Option<Icon>,
    chains: Vec<ChainId>,
    features: FeatureMap,
    extensions: ExtensionMap,
    accounts: RwLock<Vec<Account>>,
    approver: Arc<dyn Approver>,
}

impl StandardWallet {
    pub fn builder(name: impl Into<String>) -> StandardWalletBuilder {
        StandardWalletBuilder::new(name)
    }

    /// Replace the account set.
    ///
    /// The caller is responsible for notifying the registry afterwards.
    pub fn set_accounts(&self, accounts: Vec<Account>) -> Result<()> {
        validate_accounts(&accounts, &self.chains, &self.features, &self.extensions)?;
        debug!(wallet = %self.name, count = accounts.len(), "Replacing accounts");
        *self.accounts.write().unwrap_or_else(PoisonError::into_inner) = accounts;
        Ok(())
    }

    /// Append one account
    pub fn add_account(&self, account: Account) -> Result<()> {
        let mut accounts = self.accounts();
        accounts.push(account);
        self.set_accounts(accounts)
    }

    /// Remove an account by address; returns whether it existed
    pub fn remove_account(&self, address: &str) -> bool {
        let mut accounts = self.accounts.write().unwrap_or_else(PoisonError::into_inner);
        let before = accounts.len();
        accounts.retain(|a| a.address != address);
        accounts.len() != before
    }
}

#[async_trait]
impl Wallet for StandardWallet {
    fn id(&self) -> WalletId {
        self.id
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn icon(&self) -> Option<&Icon> {
        self.icon.as_ref()
    }

    fn chains(&self) -> &[ChainId] {
        &self.chains
    }

    fn features(&self) -> &FeatureMap {
        &self.features
    }

    fn extensions(&self) -> &ExtensionMap {
        &self.extensions
    }

    fn accounts(&self) -> Vec<Account> {
        self.accounts
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    async fn approve(&self, request: &ConnectRequest) -> std::result::Result<Approval, BoxError> {
        self.approver.approve(&self.name, request).await
    }
}

/// Builder for [`StandardWallet`]
pub struct StandardWalletBuilder {
    id: WalletId,
    name: String,
    icon: Option<Icon>,
    chains: Vec<ChainId>,
    features: FeatureMap,
    extensions: ExtensionMap,
    accounts: Vec<Account>,
    approver: Arc<dyn Approver>,
}

impl StandardWalletBuilder {
    fn new(name: impl Into<String>) -> Self {
        Self {
            id: WalletId::generate(),
            name: name.into(),
            icon: None,
            chains: Vec::new(),
            features: FeatureMap::new(),
            extensions: ExtensionMap::new(),
            accounts: Vec::new(),
            approver: Arc::new(AutoApprove),
        }
    }

    /// Use a fixed identity instead of a generated one
    pub fn id(mut self, id: WalletId) -> Self {
        self.id = id;
        self
    }

    pub fn icon(mut self, icon: Icon) -> Self {
        self.icon = Some(icon);
        self
    }

    pub fn chain(mut self, chain: ChainId) -> Self {
        if !self.chains.contains(&chain) {
            self.chains.push(chain);
        }
        self
    }

    pub fn chains(self, chains: impl IntoIterator<Item = ChainId>) -> Self {
        chains.into_iter().fold(self, Self::chain)
    }

    pub fn feature(mut self, name: FeatureName, capability: Capability) -> Self {
        self.features.insert(name, capability);
        self
    }

    pub fn extension(mut self, name: ExtensionName, capability: Capability) -> Self {
        self.extensions.insert(name, capability);
        self
    }

    pub fn account(mut self, account: Account) -> Self {
        self.accounts.push(account);
        self
    }

    /// Set the approval step (defaults to [`AutoApprove`])
    pub fn approver(mut self, approver: Arc<dyn Approver>) -> Self {
        self.approver = approver;
        self
    }

    /// Validate the initial accounts and build the wallet
    pub fn build(self) -> Result<StandardWallet> {
        validate_accounts(&self.accounts, &self.chains, &self.features, &self.extensions)?;
        Ok(StandardWallet {
            id: self.id,
            name: self.name,
            icon: self.icon,
            chains: self.chains,
            features: self.features,
            extensions: self.extensions,
            accounts: RwLock::new(self.accounts),
            approver: self.approver,
        })
    }
}
