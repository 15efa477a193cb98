//! Chain identifiers
//!
//! A chain is named `namespace:reference`, e.g. `solana:mainnet` or
//! `ethereum:mainnet`. Identifiers are otherwise opaque: the registry and the
//! negotiation engine only compare them for equality.

use std::borrow::Cow;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::{CoreError, Result};

/// Chain identifier
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ChainId(Cow<'static, str>);

/// Solana mainnet-beta
pub const SOLANA_MAINNET: ChainId = ChainId::from_static("solana:mainnet");
/// Solana devnet
pub const SOLANA_DEVNET: ChainId = ChainId::from_static("solana:devnet");
/// Solana testnet
pub const SOLANA_TESTNET: ChainId = ChainId::from_static("solana:testnet");
/// Solana local validator
pub const SOLANA_LOCALNET: ChainId = ChainId::from_static("solana:localnet");
/// Ethereum mainnet
pub const ETHEREUM_MAINNET: ChainId = ChainId::from_static("ethereum:mainnet");

impl ChainId {
    /// Build a chain id from a static string without validation.
    ///
    /// The string must already be of the form `namespace:reference`.
    pub const fn from_static(id: &'static str) -> Self {
        Self(Cow::Borrowed(id))
    }

    /// Parse and validate a chain id
    pub fn parse(id: &str) -> Result<Self> {
        let (namespace, reference) = id
            .split_once(':')
            .ok_or_else(|| CoreError::InvalidChainId(id.to_string()))?;

        let namespace_ok = !namespace.is_empty()
            && namespace
                .chars()
                .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-');
        let reference_ok = !reference.is_empty()
            && reference
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | ':' | '.'));

        if !namespace_ok || !reference_ok {
            return Err(CoreError::InvalidChainId(id.to_string()));
        }

        Ok(Self(Cow::Owned(id.to_string())))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The part before the first `:`
    pub fn namespace(&self) -> &str {
        self.0.split_once(':').map(|(ns, _)| ns).unwrap_or(&self.0)
    }

    /// The part after the first `:`
    pub fn reference(&self) -> &str {
        self.0.split_once(':').map(|(_, r)| r).unwrap_or("")
    }
}

impl fmt::Display for ChainId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for ChainId {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl AsRef<str> for ChainId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Serialize for ChainId {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for ChainId {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Self::parse(&s).map_err(serde::de::Error::custom)
    }
}

/// Chains of `requested` that also appear in `supported`, in requested order
pub fn intersect_chains(requested: &[ChainId], supported: &[ChainId]) -> Vec<ChainId> {
    let mut out: Vec<ChainId> = Vec::new();
    for chain in requested {
        if supported.contains(chain) && !out.contains(chain) {
            out.push(chain.clone());
        }
    }
    out
}
