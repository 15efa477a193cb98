//! Demo wallets
//!
//! Three providers built on [`StandardWallet`]: a multi-chain wallet holding
//! Solana, Ledger and Ethereum accounts, and single-chain Solana and Ethereum
//! wallets.

use std::sync::Arc;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use tracing::info;
use wallet_standard_core::{
    Account, Approver, ChainId, FeatureName, Icon, StandardWallet, Wallet, WalletId,
    ETHEREUM_MAINNET, SOLANA_DEVNET, SOLANA_MAINNET, SOLANA_TESTNET,
};
use wallet_standard_registry::{Connection, Registry};

use crate::accounts::AccountKind;
use crate::approval::ApprovalPolicy;
use crate::error::{DemoError, Result};

/// Which demo wallet to build
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum WalletKind {
    MultiChain,
    Solana,
    Ethereum,
}

impl WalletKind {
    pub const ALL: [WalletKind; 3] = [Self::MultiChain, Self::Solana, Self::Ethereum];

    pub fn display_name(self) -> &'static str {
        match self {
            Self::MultiChain => "MultiChain Wallet",
            Self::Solana => "Solana Wallet",
            Self::Ethereum => "Ethereum Wallet",
        }
    }

    pub fn chains(self) -> Vec<ChainId> {
        match self {
            Self::MultiChain => vec![SOLANA_MAINNET, SOLANA_DEVNET, ETHEREUM_MAINNET],
            Self::Solana => vec![SOLANA_MAINNET, SOLANA_DEVNET, SOLANA_TESTNET],
            Self::Ethereum => vec![ETHEREUM_MAINNET],
        }
    }

    /// Accounts a freshly built wallet starts with
    fn initial_accounts(self) -> Vec<(AccountKind, Vec<ChainId>)> {
        match self {
            Self::MultiChain => vec![
                (AccountKind::SolanaSigner, vec![SOLANA_MAINNET, SOLANA_DEVNET]),
                (AccountKind::Ledger, vec![SOLANA_MAINNET]),
                (AccountKind::EthereumSigner, vec![ETHEREUM_MAINNET]),
            ],
            Self::Solana => vec![
                (AccountKind::SolanaSigner, self.chains()),
                (AccountKind::Ledger, vec![SOLANA_MAINNET]),
            ],
            Self::Ethereum => vec![(AccountKind::EthereumSigner, self.chains())],
        }
    }

    /// Kind of account added by [`DemoWallet::add_account`]
    fn rotation(self) -> (AccountKind, Vec<ChainId>) {
        match self {
            Self::MultiChain | Self::Solana => (AccountKind::SolanaSigner, vec![SOLANA_MAINNET]),
            Self::Ethereum => (AccountKind::EthereumSigner, vec![ETHEREUM_MAINNET]),
        }
    }

    fn icon(self) -> Icon {
        let color = match self {
            Self::MultiChain => "#7b61ff",
            Self::Solana => "#14f195",
            Self::Ethereum => "#627eea",
        };
        let svg = format!(
            concat!(
                r#"<svg xmlns="http://www.w3.org/2000/svg" width="32" height="32">"#,
                r#"<circle cx="16" cy="16" r="16" fill="{color}"/></svg>"#,
            ),
            color = color
        );
        Icon::new("image/svg+xml", svg.into_bytes())
    }
}

/// A demo provider and the kind it was built as
#[derive(Clone)]
pub struct DemoWallet {
    kind: WalletKind,
    wallet: Arc<StandardWallet>,
}

impl DemoWallet {
    pub fn new(kind: WalletKind, approver: Arc<dyn Approver>) -> Result<Self> {
        let accounts: Vec<Account> = kind
            .initial_accounts()
            .into_iter()
            .map(|(account_kind, chains)| account_kind.create(&chains))
            .collect();

        let mut builder = StandardWallet::builder(kind.display_name())
            .icon(kind.icon())
            .chains(kind.chains())
            .approver(approver);

        // Declare every capability any account grants
        for account in &accounts {
            for (name, capability) in account.features.iter() {
                builder = builder.feature(name.clone(), capability.clone());
            }
            for (name, capability) in account.extensions.iter() {
                builder = builder.extension(name.clone(), capability.clone());
            }
        }
        for account in accounts {
            builder = builder.account(account);
        }

        Ok(Self {
            kind,
            wallet: Arc::new(builder.build()?),
        })
    }

    pub fn kind(&self) -> WalletKind {
        self.kind
    }

    pub fn id(&self) -> WalletId {
        self.wallet.id()
    }

    pub fn name(&self) -> &str {
        self.wallet.name()
    }

    /// The wallet as registered
    pub fn wallet(&self) -> Arc<dyn Wallet> {
        self.wallet.clone()
    }

    /// Add a new account and announce the change to the registry
    pub fn add_account(&self, registry: &Registry) -> Result<Account> {
        let (kind, chains) = self.kind.rotation();
        let account = kind.create(&chains);
        self.wallet.add_account(account.clone())?;
        info!(wallet = %self.name(), address = %account.address, "Account added");
        registry.notify_accounts_changed(self.id())?;
        Ok(account)
    }
}

/// Build and register the given demo wallets in one batch
pub fn register_demo_wallets(
    registry: &Registry,
    kinds: &[WalletKind],
    approval: ApprovalPolicy,
) -> Result<Vec<DemoWallet>> {
    let approver = approval.approver();
    let wallets = kinds
        .iter()
        .map(|&kind| DemoWallet::new(kind, Arc::clone(&approver)))
        .collect::<Result<Vec<_>>>()?;
    registry.register_all(wallets.iter().map(DemoWallet::wallet))?;
    Ok(wallets)
}

/// Find a registered wallet by case-insensitive name or id prefix
pub fn resolve_wallet(registry: &Registry, query: &str) -> Result<Arc<dyn Wallet>> {
    let query_lower = query.to_lowercase();
    registry
        .get_all()
        .into_iter()
        .find(|w| {
            w.name().to_lowercase() == query_lower
                || w.id().as_uuid().simple().to_string().starts_with(&query_lower)
        })
        .ok_or_else(|| DemoError::WalletNotFound(query.to_string()))
}

/// First account in `connection` whose view grants `feature`
pub fn account_with_feature<'a>(
    connection: &'a Connection,
    feature: &FeatureName,
) -> Result<&'a Account> {
    connection
        .accounts
        .iter()
        .find(|a| a.has_feature(feature))
        .ok_or_else(|| {
            DemoError::NoAccount(format!("{} granted none with {feature}", connection.wallet_name))
        })
}

impl std::fmt::Debug for DemoWallet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DemoWallet")
            .field("kind", &self.kind)
            .field("id", &self.id())
            .finish()
    }
}
