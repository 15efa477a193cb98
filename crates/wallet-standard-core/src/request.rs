//! Connect requests
//!
//! A consumer's requested scope. The three states of `features` and
//! `extensions` matter:
//!
//! | Field value | Grant |
//! |-------------|-------|
//! | absent (`None`) | every capability the account has |
//! | `Some([])` | none (read-only access) |
//! | `Some([a, b])` | the subset of `a`, `b` the account has |

use serde::{Deserialize, Serialize};

use crate::capability::{ExtensionName, FeatureName};
use crate::chain::{intersect_chains, ChainId};

/// Scope requested by a consumer when connecting to a wallet
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConnectRequest {
    /// Chains the consumer wants to operate on
    pub chains: Vec<ChainId>,

    /// Requested standard features
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub features: Option<Vec<FeatureName>>,

    /// Requested provider-specific extensions
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extensions: Option<Vec<ExtensionName>>,
}

impl ConnectRequest {
    /// Request all capabilities on the given chains
    pub fn new(chains: impl IntoIterator<Item = ChainId>) -> Self {
        Self {
            chains: chains.into_iter().collect(),
            features: None,
            extensions: None,
        }
    }

    pub fn with_features(mut self, features: impl IntoIterator<Item = FeatureName>) -> Self {
        self.features = Some(features.into_iter().collect());
        self
    }

    pub fn with_extensions(mut self, extensions: impl IntoIterator<Item = ExtensionName>) -> Self {
        self.extensions = Some(extensions.into_iter().collect());
        self
    }

    /// Request no features at all
    pub fn read_only(mut self) -> Self {
        self.features = Some(Vec::new());
        self
    }

    /// Requested chains that `supported` also lists
    pub fn supported_chains(&self, supported: &[ChainId]) -> Vec<ChainId> {
        intersect_chains(&self.chains, supported)
    }
}
