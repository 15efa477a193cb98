//! Demo account kinds
//!
//! Solana accounts own a [`SolanaSigner`] (Ed25519), Ethereum accounts an
//! [`EthereumSigner`] (secp256k1). Each exposes its key through capability
//! records:
//!
//! | Kind | Chains | Features | Extensions |
//! |------|--------|----------|------------|
//! | Solana signer | Solana | signMessage, signTransaction, solana:signAndSendTransaction | - |
//! | Ledger (Solana) | Solana | signTransaction | - |
//! | Ethereum signer | Ethereum | signMessage | multichain:subscribe |

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::info;
use wallet_standard_core::{
    features::{
        sign_message, sign_transaction, solana, SignMessageInput, SignMessageOutput,
        SignTransactionInput, SignTransactionOutput, SolanaSignAndSendTransactionInput,
        SIGN_MESSAGE, SIGN_TRANSACTION, SOLANA_SIGN_AND_SEND_TRANSACTION,
    },
    typed_method, Account, BoxError, Capability, ChainId, ExtensionName, Version,
};

use crate::signer::{EthereumSigner, SolanaSigner};

pub const SUBSCRIBE: ExtensionName = ExtensionName::from_static("multichain:subscribe");
pub const SUBSCRIBE_VERSION: Version = Version::new(1, 0, 0);
pub const SUBSCRIBE_METHOD: &str = "subscribe";

/// Input of the `multichain:subscribe` extension
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubscribeInput {
    pub event: String,
}

/// Output of the `multichain:subscribe` extension
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubscribeOutput {
    pub event: String,
    pub subscribed: bool,
}

/// The kinds of account the demo wallets hold
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccountKind {
    SolanaSigner,
    Ledger,
    EthereumSigner,
}

impl AccountKind {
    /// Build an account of this kind around a fresh key
    pub fn create(self, chains: &[ChainId]) -> Account {
        match self {
            Self::SolanaSigner => solana_signer_account(Arc::new(SolanaSigner::random()), chains),
            Self::Ledger => ledger_account(Arc::new(SolanaSigner::random()), chains),
            Self::EthereumSigner => {
                ethereum_signer_account(Arc::new(EthereumSigner::random()), chains)
            }
        }
    }
}

fn ensure_chain(chains: &[ChainId], chain: &ChainId) -> Result<(), BoxError> {
    if chains.contains(chain) {
        Ok(())
    } else {
        Err(format!("chain {chain} is not supported by this account").into())
    }
}

fn sign_transaction_capability(signer: Arc<SolanaSigner>, chains: Vec<ChainId>) -> Capability {
    sign_transaction::capability(move |input: SignTransactionInput| {
        let signer = Arc::clone(&signer);
        let chains = chains.clone();
        async move {
            ensure_chain(&chains, &input.chain)?;
            // Signature first, as in a Solana wire transaction
            let mut signed_transaction = signer.sign(&input.transaction);
            signed_transaction.extend_from_slice(&input.transaction);
            Ok::<_, BoxError>(SignTransactionOutput { signed_transaction })
        }
    })
}

/// Solana hot-wallet account with every Solana feature
pub fn solana_signer_account(signer: Arc<SolanaSigner>, chains: &[ChainId]) -> Account {
    let chains = chains.to_vec();

    let sign_message = sign_message::capability({
        let signer = Arc::clone(&signer);
        move |input: SignMessageInput| {
            let signer = Arc::clone(&signer);
            async move {
                let signature = signer.sign(&input.message);
                Ok::<_, BoxError>(SignMessageOutput {
                    signed_message: input.message,
                    signature,
                })
            }
        }
    });

    let sign_and_send = solana::capability({
        let signer = Arc::clone(&signer);
        let chains = chains.clone();
        move |input: SolanaSignAndSendTransactionInput| {
            let signer = Arc::clone(&signer);
            let chains = chains.clone();
            async move {
                ensure_chain(&chains, &input.base.chain)?;
                let signature = signer.sign(&input.base.transaction);
                info!(
                    chain = %input.base.chain,
                    options = ?input.options,
                    "Demo wallet does not broadcast; returning signature"
                );
                Ok::<_, BoxError>(solana::SolanaSignAndSendTransactionOutput { signature })
            }
        }
    });

    Account::new(signer.address(), signer.public_key(), chains.clone())
        .with_label("Solana Signer")
        .with_feature(SIGN_MESSAGE, sign_message)
        .with_feature(
            SIGN_TRANSACTION,
            sign_transaction_capability(Arc::clone(&signer), chains),
        )
        .with_feature(SOLANA_SIGN_AND_SEND_TRANSACTION, sign_and_send)
}

/// Hardware-style Solana account that can only sign transactions
pub fn ledger_account(signer: Arc<SolanaSigner>, chains: &[ChainId]) -> Account {
    let chains = chains.to_vec();
    Account::new(signer.address(), signer.public_key(), chains.clone())
        .with_label("Ledger")
        .with_feature(
            SIGN_TRANSACTION,
            sign_transaction_capability(Arc::clone(&signer), chains),
        )
}

/// Ethereum account with personal-message signing and event subscription
pub fn ethereum_signer_account(signer: Arc<EthereumSigner>, chains: &[ChainId]) -> Account {
    let sign_message = sign_message::capability({
        let signer = Arc::clone(&signer);
        move |input: SignMessageInput| {
            let signer = Arc::clone(&signer);
            async move {
                let signature = signer.sign_message(&input.message)?;
                Ok::<_, BoxError>(SignMessageOutput {
                    signed_message: input.message,
                    signature,
                })
            }
        }
    });

    let subscribe = Capability::new(SUBSCRIBE_VERSION).with_method(
        SUBSCRIBE_METHOD,
        typed_method(|input: SubscribeInput| async move {
            Ok::<_, BoxError>(SubscribeOutput {
                event: input.event,
                subscribed: true,
            })
        }),
    );

    Account::new(signer.address(), signer.public_key(), chains.to_vec())
        .with_label("Ethereum Signer")
        .with_feature(SIGN_MESSAGE, sign_message)
        .with_extension(SUBSCRIBE, subscribe)
}
