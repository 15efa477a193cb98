//! Demo configuration

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::info;
use wallet_standard_core::{ChainId, SOLANA_MAINNET};

use crate::approval::ApprovalPolicy;
use crate::error::{DemoError, Result};
use crate::wallets::WalletKind;

/// Environment variable overriding the config file location
pub const CONFIG_ENV: &str = "WALLET_STANDARD_CONFIG";

/// Demo configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DemoConfig {
    /// How the demo wallets answer connect requests
    pub approval: ApprovalPolicy,

    /// Wallets registered at startup, in registration order
    pub wallets: Vec<WalletKind>,

    /// Chains requested when a command names none
    pub default_chains: Vec<ChainId>,

    /// Tracing filter used when `RUST_LOG` is unset
    pub log_filter: String,
}

impl Default for DemoConfig {
    fn default() -> Self {
        Self {
            approval: ApprovalPolicy::Approve,
            wallets: WalletKind::ALL.to_vec(),
            default_chains: vec![SOLANA_MAINNET],
            log_filter: "wallet_standard=info".to_string(),
        }
    }
}

impl DemoConfig {
    /// `$WALLET_STANDARD_CONFIG`, else `<config dir>/wallet-standard/config.json`
    pub fn default_path() -> PathBuf {
        std::env::var_os(CONFIG_ENV)
            .map(PathBuf::from)
            .unwrap_or_else(|| {
                dirs::config_dir()
                    .unwrap_or_else(|| PathBuf::from("."))
                    .join("wallet-standard")
                    .join("config.json")
            })
    }

    /// Load configuration from file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Save configuration to file
    pub fn save(&self, path: &Path) -> Result<()> {
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Load the file, or write the defaults there when it does not exist
    pub fn load_or_create(path: &Path) -> Result<Self> {
        if path.exists() {
            return Self::load(path);
        }
        let config = Self::default();
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        config.save(path)?;
        info!("Created default config at {:?}", path);
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        if self.default_chains.is_empty() {
            return Err(DemoError::Config(
                "default_chains must name at least one chain".to_string(),
            ));
        }
        Ok(())
    }
}
