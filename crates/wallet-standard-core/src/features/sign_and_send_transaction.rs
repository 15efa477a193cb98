//! `standard:signAndSendTransaction`: sign a transaction and submit it

use std::future::Future;

use semver::Version;
use serde::{Deserialize, Serialize};

use crate::capability::{typed_method, Capability, FeatureMap, FeatureName};
use crate::chain::ChainId;
use crate::error::{BoxError, Result};
use crate::types::hex_bytes;

pub const SIGN_AND_SEND_TRANSACTION: FeatureName =
    FeatureName::from_static("standard:signAndSendTransaction");
pub const VERSION: Version = Version::new(1, 0, 0);
pub const METHOD: &str = "signAndSendTransaction";

/// Input for signing and sending a transaction
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignAndSendTransactionInput {
    #[serde(with = "hex_bytes")]
    pub transaction: Vec<u8>,
    pub chain: ChainId,
}

/// Output of signing and sending a transaction
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignAndSendTransactionOutput {
    /// Transaction signature, which also identifies it on most chains
    #[serde(with = "hex_bytes")]
    pub signature: Vec<u8>,
}

pub fn capability<F, Fut>(send: F) -> Capability
where
    F: Fn(SignAndSendTransactionInput) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = std::result::Result<SignAndSendTransactionOutput, BoxError>>
        + Send
        + 'static,
{
    Capability::new(VERSION).with_method(METHOD, typed_method(send))
}

pub async fn sign_and_send_transaction(
    features: &FeatureMap,
    input: &SignAndSendTransactionInput,
) -> Result<SignAndSendTransactionOutput> {
    features
        .require(&SIGN_AND_SEND_TRANSACTION, VERSION.major)?
        .call(METHOD, input)
        .await
}
