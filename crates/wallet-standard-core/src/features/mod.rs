//! Standard feature vocabulary
//!
//! Each module defines one feature: its name, version, method name and the
//! input/output shapes of its method, plus two helpers:
//!
//! - `capability(f)` builds the record a wallet attaches to its accounts
//! - a typed caller that a consumer uses on a granted [`crate::FeatureMap`]
//!
//! The negotiation engine never looks inside these records; it only checks
//! whether a name is present.

pub mod sign_and_send_transaction;
pub mod sign_message;
pub mod sign_transaction;
pub mod solana;

pub use sign_and_send_transaction::{
    SignAndSendTransactionInput, SignAndSendTransactionOutput, SIGN_AND_SEND_TRANSACTION,
};
pub use sign_message::{SignMessageInput, SignMessageOutput, SIGN_MESSAGE};
pub use sign_transaction::{SignTransactionInput, SignTransactionOutput, SIGN_TRANSACTION};
pub use solana::{
    SolanaCommitment, SolanaSignAndSendTransactionInput, SolanaSignAndSendTransactionOptions,
    SOLANA_SIGN_AND_SEND_TRANSACTION,
};
