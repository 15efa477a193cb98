//! Capability negotiation
//!
//! Given a consumer's [`ConnectRequest`], compute the scoped view of a
//! wallet the consumer is allowed to use:
//!
//! 1. Reject requests the wallet can never satisfy (no chains, or no chain
//!    in common).
//! 2. Ask the wallet's user to approve.
//! 3. Keep each account that shares a chain with the request, with its
//!    features and extensions restricted to what was requested.

use serde::Serialize;
use tracing::{debug, info};
use wallet_standard_core::{
    Account, AccountSummary, Approval, ChainId, ConnectRequest, Wallet, WalletId,
};

use crate::error::ConnectError;

/// A scoped connection to one wallet
///
/// A plain value: there is nothing to release when it is dropped.
#[derive(Debug, Clone, PartialEq)]
pub struct Connection {
    pub wallet_id: WalletId,
    pub wallet_name: String,

    /// Requested chains the wallet supports, in request order
    pub chains: Vec<ChainId>,

    /// Account views in the wallet's native order; may be empty
    pub accounts: Vec<Account>,
}

impl Connection {
    pub fn is_empty(&self) -> bool {
        self.accounts.is_empty()
    }

    pub fn account(&self, address: &str) -> Option<&Account> {
        self.accounts.iter().find(|a| a.address == address)
    }

    pub fn summary(&self) -> ConnectionSummary {
        ConnectionSummary {
            wallet_id: self.wallet_id,
            wallet_name: self.wallet_name.clone(),
            chains: self.chains.clone(),
            accounts: self.accounts.iter().map(AccountSummary::from).collect(),
        }
    }
}

/// Serialisable snapshot of a [`Connection`]
#[derive(Debug, Clone, Serialize)]
pub struct ConnectionSummary {
    pub wallet_id: WalletId,
    pub wallet_name: String,
    pub chains: Vec<ChainId>,
    pub accounts: Vec<AccountSummary>,
}

/// Negotiate a connection with `wallet`.
///
/// Feature names the wallet does not know are left out of the views, never
/// reported as errors. An approved request matching no account yields an
/// empty connection.
pub async fn connect(
    wallet: &dyn Wallet,
    request: &ConnectRequest,
) -> Result<Connection, ConnectError> {
    if request.chains.is_empty() {
        return Err(ConnectError::NoChainsRequested);
    }

    let chains = request.supported_chains(wallet.chains());
    if chains.is_empty() {
        return Err(ConnectError::UnsupportedChains {
            wallet: wallet.name().to_string(),
            requested: request.chains.clone(),
        });
    }

    debug!(wallet = %wallet.name(), ?chains, "Requesting approval");
    match wallet.approve(request).await {
        Ok(Approval::Approved) => {}
        Ok(Approval::Rejected) => return Err(ConnectError::UserRejected),
        Err(source) => return Err(ConnectError::Approval(source)),
    }

    let accounts: Vec<Account> = wallet
        .accounts()
        .iter()
        .filter(|account| account.supports_any(&chains))
        .map(|account| scope_account(account, request))
        .collect();

    info!(
        wallet = %wallet.name(),
        accounts = accounts.len(),
        "Connection approved"
    );

    Ok(Connection {
        wallet_id: wallet.id(),
        wallet_name: wallet.name().to_string(),
        chains,
        accounts,
    })
}

/// An account's view under a request: its features and extensions
/// restricted independently, everything else unchanged.
pub fn scope_account(account: &Account, request: &ConnectRequest) -> Account {
    Account {
        features: account.features.restrict(request.features.as_deref()),
        extensions: account.extensions.restrict(request.extensions.as_deref()),
        ..account.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::Arc;
    use wallet_standard_core::{
        AutoReject, BoxError, Capability, ExtensionName, FeatureName, StandardWallet, Version,
        ETHEREUM_MAINNET, SOLANA_DEVNET, SOLANA_MAINNET,
    };

    const F1: FeatureName = FeatureName::from_static("standard:signMessage");
    const F2: FeatureName = FeatureName::from_static("standard:signTransaction");
    const X1: ExtensionName = ExtensionName::from_static("multichain:subscribe");

    fn v1() -> Capability {
        Capability::new(Version::new(1, 0, 0))
    }

    fn wallet() -> StandardWallet {
        StandardWallet::builder("Provider")
            .chains([SOLANA_MAINNET, SOLANA_DEVNET, ETHEREUM_MAINNET])
            .feature(F1, v1())
            .feature(F2, v1())
            .extension(X1, v1())
            .account(
                Account::new("sol", vec![1u8], vec![SOLANA_MAINNET, SOLANA_DEVNET])
                    .with_feature(F1, v1())
                    .with_feature(F2, v1()),
            )
            .account(
                Account::new("ledger", vec![2u8], vec![SOLANA_MAINNET]).with_feature(F2, v1()),
            )
            .account(
                Account::new("eth", vec![3u8], vec![ETHEREUM_MAINNET])
                    .with_feature(F1, v1())
                    .with_extension(X1, v1()),
            )
            .build()
            .unwrap()
    }

    #[tokio::test]
    async fn test_features_are_restricted_to_request() {
        let request = ConnectRequest::new([SOLANA_MAINNET]).with_features([F1]);
        let connection = connect(&wallet(), &request).await.unwrap();

        let addresses: Vec<_> = connection.accounts.iter().map(|a| a.address.as_str()).collect();
        assert_eq!(addresses, vec!["sol", "ledger"]);
        let sol = connection.account("sol").unwrap();
        assert!(sol.has_feature(&F1));
        assert!(!sol.has_feature(&F2));
        assert!(connection.account("ledger").unwrap().features.is_empty());
    }

    #[tokio::test]
    async fn test_omitted_features_grant_everything() {
        let connection = connect(&wallet(), &ConnectRequest::new([SOLANA_MAINNET]))
            .await
            .unwrap();
        let native = wallet().accounts();
        assert_eq!(connection.accounts[0].features, native[0].features);
    }

    #[tokio::test]
    async fn test_empty_feature_list_is_read_only() {
        let request = ConnectRequest::new([SOLANA_MAINNET, ETHEREUM_MAINNET]).read_only();
        let connection = connect(&wallet(), &request).await.unwrap();

        assert_eq!(connection.accounts.len(), 3);
        assert!(connection.accounts.iter().all(|a| a.features.is_empty()));
        // Extensions are scoped independently
        assert!(connection.account("eth").unwrap().has_extension(&X1));
    }

    #[tokio::test]
    async fn test_unknown_feature_names_are_ignored() {
        let unknown = FeatureName::from_static("acme:teleport");
        let request = ConnectRequest::new([ETHEREUM_MAINNET])
            .with_features([F1, unknown.clone()])
            .with_extensions(Vec::<ExtensionName>::new());
        let connection = connect(&wallet(), &request).await.unwrap();

        let eth = connection.account("eth").unwrap();
        assert!(eth.has_feature(&F1));
        assert!(!eth.has_feature(&unknown));
        assert!(eth.extensions.is_empty());
    }

    #[tokio::test]
    async fn test_chain_errors_are_caller_errors() {
        let empty = ConnectRequest::new(Vec::<ChainId>::new());
        let no_chains = connect(&wallet(), &empty).await.unwrap_err();
        assert!(matches!(no_chains, ConnectError::NoChainsRequested));

        let other = ChainId::parse("cosmos:hub").unwrap();
        let mismatch = connect(&wallet(), &ConnectRequest::new([other]))
            .await
            .unwrap_err();
        assert!(matches!(mismatch, ConnectError::UnsupportedChains { .. }));
        assert!(mismatch.is_caller_error());
    }

    #[tokio::test]
    async fn test_chains_keep_request_order() {
        let request = ConnectRequest::new([ETHEREUM_MAINNET, SOLANA_MAINNET]);
        let connection = connect(&wallet(), &request).await.unwrap();
        assert_eq!(connection.chains, vec![ETHEREUM_MAINNET, SOLANA_MAINNET]);
        let addresses: Vec<_> = connection.accounts.iter().map(|a| a.address.as_str()).collect();
        assert_eq!(addresses, vec!["sol", "ledger", "eth"]);
    }

    #[tokio::test]
    async fn test_no_matching_accounts_is_empty_success() {
        let provider = StandardWallet::builder("Empty")
            .chain(SOLANA_MAINNET)
            .build()
            .unwrap();
        let connection = connect(&provider, &ConnectRequest::new([SOLANA_MAINNET]))
            .await
            .unwrap();
        assert!(connection.is_empty());
    }

    #[tokio::test]
    async fn test_rejection_is_distinct() {
        let provider = StandardWallet::builder("Shy")
            .chain(SOLANA_MAINNET)
            .approver(Arc::new(AutoReject))
            .build()
            .unwrap();
        let err = connect(&provider, &ConnectRequest::new([SOLANA_MAINNET]))
            .await
            .unwrap_err();
        assert!(err.is_user_rejection());
    }

    struct BrokenApproval;

    #[async_trait]
    impl wallet_standard_core::Approver for BrokenApproval {
        async fn approve(&self, _: &str, _: &ConnectRequest) -> Result<Approval, BoxError> {
            Err("prompt window closed".into())
        }
    }

    #[tokio::test]
    async fn test_approval_failure_keeps_source() {
        let provider = StandardWallet::builder("Broken")
            .chain(SOLANA_MAINNET)
            .approver(Arc::new(BrokenApproval))
            .build()
            .unwrap();
        let err = connect(&provider, &ConnectRequest::new([SOLANA_MAINNET]))
            .await
            .unwrap_err();

        assert!(!err.is_caller_error());
        assert!(!err.is_user_rejection());
        let source = std::error::Error::source(&err).unwrap();
        assert_eq!(source.to_string(), "prompt window closed");
    }

    #[tokio::test]
    async fn test_summary_serializes() {
        let request = ConnectRequest::new([ETHEREUM_MAINNET]);
        let connection = connect(&wallet(), &request).await.unwrap();
        let json = serde_json::to_value(connection.summary()).unwrap();
        assert_eq!(json["wallet_name"], "Provider");
        assert_eq!(json["chains"][0], "ethereum:mainnet");
    }
}
