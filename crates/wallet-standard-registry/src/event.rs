//! Registry events and subscription kinds

use std::fmt;
use std::sync::Arc;

use wallet_standard_core::{Wallet, WalletId};

/// Identity of one subscription
///
/// Handlers are removed by this id, never by comparing closures, so two
/// structurally identical handlers stay independent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SubscriptionId(u64);

impl SubscriptionId {
    pub(crate) fn new(raw: u64) -> Self {
        Self(raw)
    }

    pub fn as_u64(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for SubscriptionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// What a subscriber wants to hear about
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    /// Wallets were added to the registry
    Register,
    /// Wallets were removed from the registry
    Unregister,
    /// The account set of one registered wallet changed
    Change(WalletId),
}

/// A notification delivered to handlers
#[derive(Debug, Clone)]
pub enum RegistryEvent {
    /// Newly added wallets, in registration order
    Registered(Vec<Arc<dyn Wallet>>),
    /// Exactly the wallets that were removed
    Unregistered(Vec<Arc<dyn Wallet>>),
    /// A wallet whose accounts changed
    AccountsChanged(Arc<dyn Wallet>),
}

impl RegistryEvent {
    pub fn matches(&self, kind: &EventKind) -> bool {
        match (self, kind) {
            (Self::Registered(_), EventKind::Register) => true,
            (Self::Unregistered(_), EventKind::Unregister) => true,
            (Self::AccountsChanged(wallet), EventKind::Change(id)) => wallet.id() == *id,
            _ => false,
        }
    }

    /// Wallets carried by this event
    pub fn wallets(&self) -> &[Arc<dyn Wallet>] {
        match self {
            Self::Registered(wallets) | Self::Unregistered(wallets) => wallets,
            Self::AccountsChanged(wallet) => std::slice::from_ref(wallet),
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Registered(_) => "register",
            Self::Unregistered(_) => "unregister",
            Self::AccountsChanged(_) => "change",
        }
    }
}
