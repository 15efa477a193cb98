//! Serialisable snapshots of wallets and accounts

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::account::Account;
use crate::chain::ChainId;
use crate::types::WalletId;
use crate::wallet::Wallet;

/// Display snapshot of an account
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountSummary {
    pub address: String,
    /// Hex-encoded public key
    pub public_key: String,
    pub chains: Vec<ChainId>,
    /// Feature name to version
    pub features: BTreeMap<String, String>,
    /// Extension name to version
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub extensions: BTreeMap<String, String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

impl From<&Account> for AccountSummary {
    fn from(account: &Account) -> Self {
        Self {
            address: account.address.clone(),
            public_key: account.public_key.to_hex(),
            chains: account.chains.clone(),
            features: account.features.versions(),
            extensions: account.extensions.versions(),
            label: account.label.clone(),
        }
    }
}

/// Display snapshot of a wallet
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WalletSummary {
    pub id: WalletId,
    pub name: String,
    /// Icon as a data URI
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    pub chains: Vec<ChainId>,
    pub features: BTreeMap<String, String>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub extensions: BTreeMap<String, String>,
    pub accounts: Vec<AccountSummary>,
}

impl WalletSummary {
    pub fn from_wallet(wallet: &dyn Wallet) -> Self {
        Self {
            id: wallet.id(),
            name: wallet.name().to_string(),
            icon: wallet.icon().map(|icon| icon.to_data_uri()),
            chains: wallet.chains().to_vec(),
            features: wallet.features().versions(),
            extensions: wallet.extensions().versions(),
            accounts: wallet.accounts().iter().map(AccountSummary::from).collect(),
        }
    }
}
