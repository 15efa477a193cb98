//! `solana:signAndSendTransaction`: the generic sign-and-send feature plus
//! Solana RPC submission options

use std::future::Future;

use semver::Version;
use serde::{Deserialize, Serialize};

use crate::capability::{typed_method, Capability, FeatureMap, FeatureName};
use crate::error::{BoxError, Result};
use crate::features::sign_and_send_transaction::{
    SignAndSendTransactionInput, SignAndSendTransactionOutput,
};

pub const SOLANA_SIGN_AND_SEND_TRANSACTION: FeatureName =
    FeatureName::from_static("solana:signAndSendTransaction");
pub const VERSION: Version = Version::new(1, 0, 0);
pub const METHOD: &str = "signAndSendTransaction";

/// Commitment level for preflight and confirmation of transactions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SolanaCommitment {
    Processed,
    Confirmed,
    Finalized,
}

/// Options for signing and sending transactions
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SolanaSignAndSendTransactionOptions {
    /// Desired commitment level. If set, confirm the transaction after sending.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub commitment: Option<SolanaCommitment>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub preflight_commitment: Option<SolanaCommitment>,

    /// Disable transaction verification at the RPC
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub skip_preflight: Option<bool>,

    /// Maximum number of times the RPC node retries sending to the leader
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_retries: Option<u32>,

    /// Minimum slot the request can be evaluated at
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_context_slot: Option<u64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SolanaSignAndSendTransactionInput {
    #[serde(flatten)]
    pub base: SignAndSendTransactionInput,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub options: Option<SolanaSignAndSendTransactionOptions>,
}

pub type SolanaSignAndSendTransactionOutput = SignAndSendTransactionOutput;

pub fn capability<F, Fut>(send: F) -> Capability
where
    F: Fn(SolanaSignAndSendTransactionInput) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = std::result::Result<SolanaSignAndSendTransactionOutput, BoxError>>
        + Send
        + 'static,
{
    Capability::new(VERSION).with_method(METHOD, typed_method(send))
}

pub async fn sign_and_send_transaction(
    features: &FeatureMap,
    input: &SolanaSignAndSendTransactionInput,
) -> Result<SolanaSignAndSendTransactionOutput> {
    features
        .require(&SOLANA_SIGN_AND_SEND_TRANSACTION, VERSION.major)?
        .call(METHOD, input)
        .await
}
