//! `standard:signTransaction`: sign a serialized transaction without sending it

use std::future::Future;

use semver::Version;
use serde::{Deserialize, Serialize};

use crate::capability::{typed_method, Capability, FeatureMap, FeatureName};
use crate::chain::ChainId;
use crate::error::{BoxError, Result};
use crate::types::hex_bytes;

pub const SIGN_TRANSACTION: FeatureName = FeatureName::from_static("standard:signTransaction");
pub const VERSION: Version = Version::new(1, 0, 0);
pub const METHOD: &str = "signTransaction";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignTransactionInput {
    /// Serialized transaction, in the chain's own wire encoding
    #[serde(with = "hex_bytes")]
    pub transaction: Vec<u8>,

    /// Chain the transaction is for
    pub chain: ChainId,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignTransactionOutput {
    #[serde(with = "hex_bytes")]
    pub signed_transaction: Vec<u8>,
}

pub fn capability<F, Fut>(sign: F) -> Capability
where
    F: Fn(SignTransactionInput) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = std::result::Result<SignTransactionOutput, BoxError>> + Send + 'static,
{
    Capability::new(VERSION).with_method(METHOD, typed_method(sign))
}

pub async fn sign_transaction(
    features: &FeatureMap,
    input: &SignTransactionInput,
) -> Result<SignTransactionOutput> {
    features
        .require(&SIGN_TRANSACTION, VERSION.major)?
        .call(METHOD, input)
        .await
}
