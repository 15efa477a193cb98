//! Error types for the registry and the negotiation engine

use std::fmt;

use thiserror::Error;
use wallet_standard_core::{BoxError, ChainId, WalletId};

use crate::event::SubscriptionId;

/// Why a connect request did not produce a connection
///
/// The variants keep three situations apart: the caller asked for something
/// the wallet cannot do, the user said no, or the approval step itself broke.
/// A connection with zero accounts is not an error.
#[derive(Debug, Error)]
pub enum ConnectError {
    /// The request named no chains
    #[error("Connect request names no chains")]
    NoChainsRequested,

    /// None of the requested chains is supported by the wallet
    #[error("Wallet {wallet} supports none of the requested chains: {}", join_chains(.requested))]
    UnsupportedChains {
        wallet: String,
        requested: Vec<ChainId>,
    },

    /// The wallet is not in the registry
    #[error("Wallet not registered: {0}")]
    UnknownWallet(WalletId),

    /// The user declined the request
    #[error("User rejected the connection request")]
    UserRejected,

    /// The approval step failed
    #[error("Approval failed: {0}")]
    Approval(#[source] BoxError),
}

impl ConnectError {
    /// The request itself was wrong and can be fixed by the caller
    pub fn is_caller_error(&self) -> bool {
        matches!(
            self,
            Self::NoChainsRequested | Self::UnsupportedChains { .. } | Self::UnknownWallet(_)
        )
    }

    pub fn is_user_rejection(&self) -> bool {
        matches!(self, Self::UserRejected)
    }
}

fn join_chains(chains: &[ChainId]) -> String {
    chains
        .iter()
        .map(ChainId::as_str)
        .collect::<Vec<_>>()
        .join(", ")
}

/// What went wrong inside one notification handler
#[derive(Debug, Error)]
pub enum HandlerFault {
    #[error("handler returned an error: {0}")]
    Error(#[source] BoxError),

    #[error("handler panicked: {0}")]
    Panic(String),
}

/// One handler's failure during a notification
#[derive(Debug)]
pub struct HandlerFailure {
    /// Subscription whose handler failed
    pub subscription: SubscriptionId,

    /// Event label: `register`, `unregister` or `change`
    pub event: &'static str,

    pub fault: HandlerFault,
}

impl fmt::Display for HandlerFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} handler {} failed: {}",
            self.event, self.subscription, self.fault
        )
    }
}

impl std::error::Error for HandlerFailure {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.fault)
    }
}

/// A registry call whose state change was applied but whose notification
/// had failing handlers.
///
/// Every handler still ran. The operation's outcome (for example the
/// [`crate::Registration`] of a `register` call) travels with the error so
/// the caller never loses it.
pub struct NotifyError<T> {
    outcome: T,
    failures: Vec<HandlerFailure>,
}

impl<T> NotifyError<T> {
    pub(crate) fn check(outcome: T, failures: Vec<HandlerFailure>) -> Result<T, Self> {
        if failures.is_empty() {
            Ok(outcome)
        } else {
            Err(Self { outcome, failures })
        }
    }

    pub fn outcome(&self) -> &T {
        &self.outcome
    }

    pub fn into_outcome(self) -> T {
        self.outcome
    }

    pub fn failures(&self) -> &[HandlerFailure] {
        &self.failures
    }

    pub fn into_parts(self) -> (T, Vec<HandlerFailure>) {
        (self.outcome, self.failures)
    }

    /// Transform the carried outcome, keeping the failures
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> NotifyError<U> {
        NotifyError {
            outcome: f(self.outcome),
            failures: self.failures,
        }
    }
}

impl<T> fmt::Debug for NotifyError<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NotifyError")
            .field("failures", &self.failures)
            .finish_non_exhaustive()
    }
}

impl<T> fmt::Display for NotifyError<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} notification handler(s) failed", self.failures.len())?;
        if let Some(first) = self.failures.first() {
            write!(f, "; first: {}", first)?;
        }
        Ok(())
    }
}

impl<T> std::error::Error for NotifyError<T> {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.failures
            .first()
            .map(|failure| failure as &(dyn std::error::Error + 'static))
    }
}
