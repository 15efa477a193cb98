//! Wallet accounts
//!
//! An account is one address/key controlled by a wallet, scoped to a subset
//! of the wallet's chains and capabilities.

use crate::capability::{Capability, ExtensionMap, ExtensionName, FeatureMap, FeatureName};
use crate::chain::ChainId;
use crate::error::{CoreError, Result};
use crate::types::{Icon, PublicKeyBytes};

/// One address/key under a wallet
#[derive(Debug, Clone, PartialEq)]
pub struct Account {
    /// Chain-specific address string
    pub address: String,

    /// Opaque public key material
    pub public_key: PublicKeyBytes,

    /// Chains this account operates on (non-empty, subset of the wallet's)
    pub chains: Vec<ChainId>,

    /// Standard features this account grants
    pub features: FeatureMap,

    /// Provider-specific extensions this account grants
    pub extensions: ExtensionMap,

    /// Optional human-readable label
    pub label: Option<String>,

    /// Optional account icon
    pub icon: Option<Icon>,
}

impl Account {
    /// Create an account with no capabilities
    pub fn new(
        address: impl Into<String>,
        public_key: impl Into<PublicKeyBytes>,
        chains: Vec<ChainId>,
    ) -> Self {
        Self {
            address: address.into(),
            public_key: public_key.into(),
            chains,
            features: FeatureMap::new(),
            extensions: ExtensionMap::new(),
            label: None,
            icon: None,
        }
    }

    pub fn with_feature(mut self, name: FeatureName, capability: Capability) -> Self {
        self.features.insert(name, capability);
        self
    }

    pub fn with_extension(mut self, name: ExtensionName, capability: Capability) -> Self {
        self.extensions.insert(name, capability);
        self
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn with_icon(mut self, icon: Icon) -> Self {
        self.icon = Some(icon);
        self
    }

    pub fn supports_chain(&self, chain: &ChainId) -> bool {
        self.chains.contains(chain)
    }

    /// True if any of `chains` is supported by this account
    pub fn supports_any(&self, chains: &[ChainId]) -> bool {
        chains.iter().any(|chain| self.supports_chain(chain))
    }

    pub fn has_feature(&self, name: &FeatureName) -> bool {
        self.features.contains(name)
    }

    pub fn has_extension(&self, name: &ExtensionName) -> bool {
        self.extensions.contains(name)
    }

    /// Check this account against the declarations of its owning wallet
    pub fn validate(
        &self,
        wallet_chains: &[ChainId],
        wallet_features: &FeatureMap,
        wallet_extensions: &ExtensionMap,
    ) -> Result<()> {
        if self.chains.is_empty() {
            return Err(CoreError::InvalidAccount(format!(
                "{}: no chains",
                self.address
            )));
        }

        for (i, chain) in self.chains.iter().enumerate() {
            if self.chains[..i].contains(chain) {
                return Err(CoreError::InvalidAccount(format!(
                    "{}: duplicate chain {}",
                    self.address, chain
                )));
            }
            if !wallet_chains.contains(chain) {
                return Err(CoreError::InvalidAccount(format!(
                    "{}: chain {} not supported by wallet",
                    self.address, chain
                )));
            }
        }

        if let Some(name) = self.features.names().find(|n| !wallet_features.contains(n)) {
            return Err(CoreError::InvalidAccount(format!(
                "{}: feature {} not declared by wallet",
                self.address, name
            )));
        }

        if let Some(name) = self
            .extensions
            .names()
            .find(|n| !wallet_extensions.contains(n))
        {
            return Err(CoreError::InvalidAccount(format!(
                "{}: extension {} not declared by wallet",
                self.address, name
            )));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chain::{ETHEREUM_MAINNET, SOLANA_DEVNET, SOLANA_MAINNET};
    use semver::Version;

    const SIGN: FeatureName = FeatureName::from_static("standard:signMessage");
    const SUBSCRIBE: ExtensionName = ExtensionName::from_static("multichain:subscribe");

    fn capability() -> Capability {
        Capability::new(Version::new(1, 0, 0))
    }

    #[test]
    fn test_valid_account() {
        let account = Account::new("addr", vec![1u8, 2, 3], vec![SOLANA_MAINNET])
            .with_feature(SIGN, capability())
            .with_label("main");
        let features = FeatureMap::new().with(SIGN, capability());

        assert!(account
            .validate(&[SOLANA_MAINNET, ETHEREUM_MAINNET], &features, &ExtensionMap::new())
            .is_ok());
        assert!(account.supports_any(&[SOLANA_DEVNET, SOLANA_MAINNET]));
        assert!(!account.supports_any(&[SOLANA_DEVNET]));
    }

    #[test]
    fn test_account_needs_chains() {
        let account = Account::new("addr", vec![1u8], vec![]);
        assert!(account
            .validate(&[SOLANA_MAINNET], &FeatureMap::new(), &ExtensionMap::new())
            .is_err());
    }

    #[test]
    fn test_account_chain_must_belong_to_wallet() {
        let account = Account::new("addr", vec![1u8], vec![SOLANA_DEVNET]);
        assert!(account
            .validate(&[SOLANA_MAINNET], &FeatureMap::new(), &ExtensionMap::new())
            .is_err());
    }

    #[test]
    fn test_account_rejects_duplicate_chains() {
        let account = Account::new("addr", vec![1u8], vec![SOLANA_MAINNET, SOLANA_MAINNET]);
        assert!(account
            .validate(&[SOLANA_MAINNET], &FeatureMap::new(), &ExtensionMap::new())
            .is_err());
    }

    #[test]
    fn test_account_capabilities_must_be_declared() {
        let account =
            Account::new("addr", vec![1u8], vec![SOLANA_MAINNET]).with_feature(SIGN, capability());
        assert!(account
            .validate(&[SOLANA_MAINNET], &FeatureMap::new(), &ExtensionMap::new())
            .is_err());

        let account =
            Account::new("addr", vec![1u8], vec![SOLANA_MAINNET])
                .with_extension(SUBSCRIBE, capability());
        let features = FeatureMap::new();
        assert!(account
            .validate(&[SOLANA_MAINNET], &features, &ExtensionMap::new())
            .is_err());
        assert!(account
            .validate(
                &[SOLANA_MAINNET],
                &features,
                &ExtensionMap::new().with(SUBSCRIBE, capability())
            )
            .is_ok());
    }
}
