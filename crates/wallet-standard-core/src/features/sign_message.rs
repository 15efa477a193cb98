//! `standard:signMessage`: sign arbitrary bytes with the account's key

use std::future::Future;

use semver::Version;
use serde::{Deserialize, Serialize};

use crate::capability::{typed_method, Capability, FeatureMap, FeatureName};
use crate::error::{BoxError, Result};
use crate::types::hex_bytes;

pub const SIGN_MESSAGE: FeatureName = FeatureName::from_static("standard:signMessage");
pub const VERSION: Version = Version::new(1, 0, 0);
pub const METHOD: &str = "signMessage";

/// Input for signing a message
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignMessageInput {
    /// Message to sign, as raw bytes
    #[serde(with = "hex_bytes")]
    pub message: Vec<u8>,
}

/// Output of signing a message
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignMessageOutput {
    /// The bytes that were actually signed; a wallet may prefix the message
    #[serde(with = "hex_bytes")]
    pub signed_message: Vec<u8>,

    #[serde(with = "hex_bytes")]
    pub signature: Vec<u8>,
}

/// Build the capability record from a signing function
pub fn capability<F, Fut>(sign: F) -> Capability
where
    F: Fn(SignMessageInput) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = std::result::Result<SignMessageOutput, BoxError>> + Send + 'static,
{
    Capability::new(VERSION).with_method(METHOD, typed_method(sign))
}

/// Sign a message through a granted feature map
pub async fn sign_message(
    features: &FeatureMap,
    input: &SignMessageInput,
) -> Result<SignMessageOutput> {
    features
        .require(&SIGN_MESSAGE, VERSION.major)?
        .call(METHOD, input)
        .await
}
