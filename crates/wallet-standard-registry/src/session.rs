//! Discovery sessions
//!
//! A consumer-side live view of the registry: a snapshot taken at
//! initialisation, kept current by `register` and `unregister` events until
//! the session is disposed.

use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tracing::debug;
use wallet_standard_core::{Wallet, WalletId};

use crate::registry::{Registry, Subscription};

/// Called with the full collection after every change
pub type Listener = dyn Fn(&[Arc<dyn Wallet>]) + Send + Sync;

/// Lifecycle of a [`DiscoverySession`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Uninitialized,
    Initialized,
    Disposed,
}

struct Shared {
    wallets: Mutex<Vec<Arc<dyn Wallet>>>,
    open: AtomicBool,
    listener: Option<Arc<Listener>>,
}

impl Shared {
    fn wallets(&self) -> MutexGuard<'_, Vec<Arc<dyn Wallet>>> {
        self.wallets.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn publish(&self) {
        if let Some(listener) = &self.listener {
            let snapshot = self.wallets().clone();
            listener(&snapshot);
        }
    }

    fn added(&self, wallets: &[Arc<dyn Wallet>]) {
        if !self.open.load(Ordering::SeqCst) {
            return;
        }
        let changed = {
            let mut current = self.wallets();
            let before = current.len();
            for wallet in wallets {
                if !current.iter().any(|w| w.id() == wallet.id()) {
                    current.push(Arc::clone(wallet));
                }
            }
            current.len() != before
        };
        if changed {
            self.publish();
        }
    }

    fn removed(&self, wallets: &[Arc<dyn Wallet>]) {
        if !self.open.load(Ordering::SeqCst) {
            return;
        }
        let changed = {
            let mut current = self.wallets();
            let before = current.len();
            current.retain(|w| !wallets.iter().any(|gone| gone.id() == w.id()));
            current.len() != before
        };
        if changed {
            self.publish();
        }
    }
}

struct Live {
    shared: Arc<Shared>,
    _subscriptions: [Subscription; 2],
}

/// Live, consumer-side view of registered wallets
///
/// Sessions are independent of each other. Dropping one disposes it.
pub struct DiscoverySession {
    registry: Registry,
    listener: Option<Arc<Listener>>,
    state: SessionState,
    live: Option<Live>,
}

impl DiscoverySession {
    pub fn new(registry: &Registry) -> Self {
        Self {
            registry: registry.clone(),
            listener: None,
            state: SessionState::Uninitialized,
            live: None,
        }
    }

    /// Attach a listener, invoked with the new collection after
    /// initialisation and after every change.
    pub fn with_listener<F>(mut self, listener: F) -> Self
    where
        F: Fn(&[Arc<dyn Wallet>]) + Send + Sync + 'static,
    {
        self.listener = Some(Arc::new(listener));
        self
    }

    /// Create and initialise a session in one step
    pub fn open(registry: &Registry) -> Self {
        let mut session = Self::new(registry);
        session.initialize();
        session
    }

    /// Take the snapshot and start following the registry.
    ///
    /// No-op when already initialised. After [`dispose`](Self::dispose) this
    /// starts over from a fresh snapshot.
    pub fn initialize(&mut self) {
        if self.state == SessionState::Initialized {
            return;
        }

        let shared = Arc::new(Shared {
            wallets: Mutex::new(Vec::new()),
            open: AtomicBool::new(true),
            listener: self.listener.clone(),
        });

        // Handlers block on this lock until the snapshot is in place, so an
        // event racing initialisation is applied on top of it.
        {
            let mut wallets = shared.wallets();
            let on_register = self.registry.on_register({
                let shared = Arc::clone(&shared);
                move |added| {
                    shared.added(added);
                    Ok(())
                }
            });
            let on_unregister = self.registry.on_unregister({
                let shared = Arc::clone(&shared);
                move |removed| {
                    shared.removed(removed);
                    Ok(())
                }
            });
            *wallets = self.registry.get_all();
            debug!(wallets = wallets.len(), "Discovery session initialized");

            self.live = Some(Live {
                shared: Arc::clone(&shared),
                _subscriptions: [on_register, on_unregister],
            });
        }

        self.state = SessionState::Initialized;
        shared.publish();
    }

    /// Stop following the registry. Late events are ignored.
    pub fn dispose(&mut self) {
        if let Some(live) = self.live.take() {
            live.shared.open.store(false, Ordering::SeqCst);
            debug!("Discovery session disposed");
        }
        self.state = SessionState::Disposed;
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    /// Current collection, in the order wallets were observed.
    /// Empty unless initialised.
    pub fn wallets(&self) -> Vec<Arc<dyn Wallet>> {
        self.live
            .as_ref()
            .map(|live| live.shared.wallets().clone())
            .unwrap_or_default()
    }

    pub fn len(&self) -> usize {
        self.live
            .as_ref()
            .map_or(0, |live| live.shared.wallets().len())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn contains(&self, id: WalletId) -> bool {
        self.live
            .as_ref()
            .is_some_and(|live| live.shared.wallets().iter().any(|w| w.id() == id))
    }
}

impl Drop for DiscoverySession {
    fn drop(&mut self) {
        self.dispose();
    }
}

impl fmt::Debug for DiscoverySession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DiscoverySession")
            .field("state", &self.state)
            .field("wallets", &self.len())
            .finish()
    }
}
