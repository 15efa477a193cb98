//! Provider registry
//!
//! Single source of truth for which wallets exist in the process. Wallets
//! register themselves; consumers read snapshots and subscribe to changes.

use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, OnceLock, PoisonError, Weak};

use chrono::{DateTime, Utc};
use tracing::{debug, info, warn};
use wallet_standard_core::{validate_wallet, BoxError, ConnectRequest, Wallet, WalletId};

use crate::dispatch::EventHub;
use crate::error::{ConnectError, NotifyError};
use crate::event::{EventKind, RegistryEvent, SubscriptionId};
use crate::negotiate::{self, Connection};

/// Result of a registry mutation whose handlers may have failed
pub type NotifyResult<T> = std::result::Result<T, NotifyError<T>>;

struct Entry {
    wallet: Arc<dyn Wallet>,
    generation: u64,
    registered_at: DateTime<Utc>,
}

#[derive(Default)]
struct Entries {
    list: Vec<Entry>,
    next_generation: u64,
}

struct RegistryInner {
    hub: EventHub,
    entries: Mutex<Entries>,
}

impl RegistryInner {
    fn entries(&self) -> MutexGuard<'_, Entries> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn contains(&self, id: WalletId) -> bool {
        self.entries().list.iter().any(|e| e.wallet.id() == id)
    }

    /// Change events for wallets that are gone by delivery time are dropped
    fn deliverable(&self, event: &RegistryEvent) -> bool {
        match event {
            RegistryEvent::AccountsChanged(wallet) => self.contains(wallet.id()),
            _ => true,
        }
    }

    fn remove_where(
        &self,
        mut predicate: impl FnMut(&Entry) -> bool,
    ) -> NotifyResult<Vec<Arc<dyn Wallet>>> {
        let gate = self.hub.enter();

        let removed: Vec<Arc<dyn Wallet>> = {
            let mut entries = self.entries();
            let mut removed = Vec::new();
            entries.list.retain(|entry| {
                if predicate(entry) {
                    removed.push(Arc::clone(&entry.wallet));
                    false
                } else {
                    true
                }
            });
            removed
        };

        if !removed.is_empty() {
            for wallet in &removed {
                info!(wallet = %wallet.name(), id = %wallet.id().short(), "Wallet unregistered");
            }
            gate.raise(RegistryEvent::Unregistered(removed.clone()));
        }

        let failures = gate.finish(|event| self.deliverable(event));
        NotifyError::check(removed, failures)
    }

    fn unsubscribe(&self, id: SubscriptionId) -> bool {
        self.hub.unsubscribe(id)
    }
}

/// Handle to a wallet registry
///
/// Cloning is cheap and every clone refers to the same registry. Use
/// [`Registry::global`] for the process-wide instance shared by all wallets
/// and applications, or [`Registry::new`] for an isolated one.
#[derive(Clone)]
pub struct Registry {
    inner: Arc<RegistryInner>,
}

/// A registered wallet with its position and registration time
#[derive(Debug, Clone)]
pub struct RegistryEntry {
    pub wallet: Arc<dyn Wallet>,

    /// Monotonic registration sequence number
    pub order: u64,

    pub registered_at: DateTime<Utc>,
}

impl Registry {
    /// The process-wide registry
    pub fn global() -> &'static Registry {
        static GLOBAL: OnceLock<Registry> = OnceLock::new();
        GLOBAL.get_or_init(Registry::new)
    }

    /// Create an isolated, empty registry
    pub fn new() -> Self {
        Self {
            inner: Arc::new(RegistryInner {
                hub: EventHub::new(),
                entries: Mutex::new(Entries::default()),
            }),
        }
    }

    /// Register one wallet.
    ///
    /// A wallet whose id is already present is not added again and raises
    /// no event; the returned handle then refers to the existing entry.
    pub fn register(&self, wallet: Arc<dyn Wallet>) -> NotifyResult<Registration> {
        warn_if_invalid(wallet.as_ref());
        let gate = self.inner.hub.enter();

        let (registration, added) = self.insert(&mut self.inner.entries(), wallet);
        if let Some(wallet) = added {
            gate.raise(RegistryEvent::Registered(vec![wallet]));
        }

        let failures = gate.finish(|event| self.inner.deliverable(event));
        NotifyError::check(registration, failures)
    }

    /// Register several wallets with a single `register` notification
    /// carrying the ones that were actually added.
    pub fn register_all(
        &self,
        wallets: impl IntoIterator<Item = Arc<dyn Wallet>>,
    ) -> NotifyResult<Vec<Registration>> {
        let wallets: Vec<_> = wallets.into_iter().collect();
        for wallet in &wallets {
            warn_if_invalid(wallet.as_ref());
        }
        let gate = self.inner.hub.enter();

        let mut registrations = Vec::with_capacity(wallets.len());
        let mut added = Vec::new();
        {
            let mut entries = self.inner.entries();
            for wallet in wallets {
                let (registration, new) = self.insert(&mut entries, wallet);
                registrations.push(registration);
                added.extend(new);
            }
        }

        if !added.is_empty() {
            gate.raise(RegistryEvent::Registered(added));
        }

        let failures = gate.finish(|event| self.inner.deliverable(event));
        NotifyError::check(registrations, failures)
    }

    /// Add a wallet unless its id is present. Returns the handle and the
    /// wallet when it was actually added.
    fn insert(
        &self,
        entries: &mut Entries,
        wallet: Arc<dyn Wallet>,
    ) -> (Registration, Option<Arc<dyn Wallet>>) {
        let id = wallet.id();
        let (generation, added) = match entries.list.iter().find(|e| e.wallet.id() == id) {
            Some(existing) => {
                debug!(wallet = %wallet.name(), id = %id.short(), "Wallet already registered");
                (existing.generation, None)
            }
            None => {
                let generation = entries.next_generation;
                entries.next_generation += 1;
                entries.list.push(Entry {
                    wallet: Arc::clone(&wallet),
                    generation,
                    registered_at: Utc::now(),
                });
                info!(wallet = %wallet.name(), id = %id.short(), "Wallet registered");
                (generation, Some(Arc::clone(&wallet)))
            }
        };
        let registration = Registration {
            registry: Arc::downgrade(&self.inner),
            wallet,
            generation,
            done: AtomicBool::new(false),
        };
        (registration, added)
    }

    /// Remove the wallets with the given ids.
    ///
    /// Returns exactly the removed wallets; ids that are not present are
    /// ignored. Nothing removed means no notification.
    pub fn deregister(&self, ids: &[WalletId]) -> NotifyResult<Vec<Arc<dyn Wallet>>> {
        self.inner.remove_where(|entry| ids.contains(&entry.wallet.id()))
    }

    /// Snapshot of all wallets in registration order
    pub fn get_all(&self) -> Vec<Arc<dyn Wallet>> {
        self.inner
            .entries()
            .list
            .iter()
            .map(|e| Arc::clone(&e.wallet))
            .collect()
    }

    pub fn entries(&self) -> Vec<RegistryEntry> {
        self.inner
            .entries()
            .list
            .iter()
            .map(|e| RegistryEntry {
                wallet: Arc::clone(&e.wallet),
                order: e.generation,
                registered_at: e.registered_at,
            })
            .collect()
    }

    pub fn get(&self, id: WalletId) -> Option<Arc<dyn Wallet>> {
        self.inner
            .entries()
            .list
            .iter()
            .find(|e| e.wallet.id() == id)
            .map(|e| Arc::clone(&e.wallet))
    }

    /// First registered wallet with this name. Names are not unique.
    pub fn find_by_name(&self, name: &str) -> Option<Arc<dyn Wallet>> {
        self.inner
            .entries()
            .list
            .iter()
            .find(|e| e.wallet.name() == name)
            .map(|e| Arc::clone(&e.wallet))
    }

    pub fn contains(&self, id: WalletId) -> bool {
        self.inner.contains(id)
    }

    pub fn len(&self) -> usize {
        self.inner.entries().list.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Subscribe to one kind of event.
    ///
    /// The handler receives events raised after this call. Dropping the
    /// returned [`Subscription`] unsubscribes it.
    pub fn on<F>(&self, kind: EventKind, handler: F) -> Subscription
    where
        F: Fn(&RegistryEvent) -> Result<(), BoxError> + Send + Sync + 'static,
    {
        let id = self.inner.hub.subscribe(kind, Box::new(handler));
        Subscription {
            registry: Arc::downgrade(&self.inner),
            id,
            done: AtomicBool::new(false),
        }
    }

    /// Subscribe to registrations; the handler receives the added wallets
    pub fn on_register<F>(&self, handler: F) -> Subscription
    where
        F: Fn(&[Arc<dyn Wallet>]) -> Result<(), BoxError> + Send + Sync + 'static,
    {
        self.on(EventKind::Register, move |event| handler(event.wallets()))
    }

    /// Subscribe to deregistrations; the handler receives the removed wallets
    pub fn on_unregister<F>(&self, handler: F) -> Subscription
    where
        F: Fn(&[Arc<dyn Wallet>]) -> Result<(), BoxError> + Send + Sync + 'static,
    {
        self.on(EventKind::Unregister, move |event| handler(event.wallets()))
    }

    /// Subscribe to account changes of one wallet
    pub fn on_change<F>(&self, id: WalletId, handler: F) -> Subscription
    where
        F: Fn(&Arc<dyn Wallet>) -> Result<(), BoxError> + Send + Sync + 'static,
    {
        self.on(EventKind::Change(id), move |event| match event {
            RegistryEvent::AccountsChanged(wallet) => handler(wallet),
            _ => Ok(()),
        })
    }

    /// Announce that a wallet's account set changed.
    ///
    /// Returns `false` without notifying anyone when the wallet is not
    /// registered.
    pub fn notify_accounts_changed(&self, id: WalletId) -> NotifyResult<bool> {
        let gate = self.inner.hub.enter();

        let Some(wallet) = self.get(id) else {
            warn!(id = %id.short(), "Suppressing account change for unregistered wallet");
            return Ok(false);
        };

        debug!(wallet = %wallet.name(), "Accounts changed");
        gate.raise(RegistryEvent::AccountsChanged(wallet));

        let failures = gate.finish(|event| self.inner.deliverable(event));
        NotifyError::check(true, failures)
    }

    /// Negotiate a connection with a registered wallet
    pub async fn connect(
        &self,
        id: WalletId,
        request: &ConnectRequest,
    ) -> Result<Connection, ConnectError> {
        let wallet = self.get(id).ok_or(ConnectError::UnknownWallet(id))?;
        negotiate::connect(wallet.as_ref(), request).await
    }

    /// Number of live subscriptions
    pub fn subscriber_count(&self) -> usize {
        self.inner.hub.handler_count()
    }
}

impl Default for Registry {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Registry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Registry")
            .field("wallets", &self.len())
            .field("subscribers", &self.subscriber_count())
            .finish()
    }
}

fn warn_if_invalid(wallet: &dyn Wallet) {
    if let Err(e) = validate_wallet(wallet) {
        warn!(wallet = %wallet.name(), error = %e, "Registering wallet with invalid accounts");
    }
}

/// Proof of one registration, able to undo it
///
/// Unlike [`Subscription`], dropping a `Registration` leaves the wallet
/// registered.
pub struct Registration {
    registry: Weak<RegistryInner>,
    wallet: Arc<dyn Wallet>,
    generation: u64,
    done: AtomicBool,
}

impl Registration {
    pub fn wallet(&self) -> &Arc<dyn Wallet> {
        &self.wallet
    }

    pub fn wallet_id(&self) -> WalletId {
        self.wallet.id()
    }

    /// Remove exactly this registration.
    ///
    /// Idempotent. Returns `false` when the entry was already removed or
    /// replaced by a later registration of the same wallet.
    pub fn unregister(&self) -> NotifyResult<bool> {
        if self.done.swap(true, Ordering::SeqCst) {
            return Ok(false);
        }
        let Some(inner) = self.registry.upgrade() else {
            return Ok(false);
        };

        let id = self.wallet.id();
        let generation = self.generation;
        inner
            .remove_where(|e| e.wallet.id() == id && e.generation == generation)
            .map(|removed| !removed.is_empty())
            .map_err(|err| err.map(|removed| !removed.is_empty()))
    }
}

impl fmt::Debug for Registration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Registration")
            .field("wallet", &self.wallet.name())
            .field("id", &self.wallet.id())
            .field("generation", &self.generation)
            .finish()
    }
}

/// A live event handler; dropping it unsubscribes
#[must_use = "dropping a Subscription unsubscribes its handler"]
pub struct Subscription {
    registry: Weak<RegistryInner>,
    id: SubscriptionId,
    done: AtomicBool,
}

impl Subscription {
    pub fn id(&self) -> SubscriptionId {
        self.id
    }

    /// Remove this handler. Idempotent; never touches other handlers.
    pub fn unsubscribe(&self) -> bool {
        if self.done.swap(true, Ordering::SeqCst) {
            return false;
        }
        self.registry
            .upgrade()
            .map(|inner| inner.unsubscribe(self.id))
            .unwrap_or(false)
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.unsubscribe();
    }
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription")
            .field("id", &self.id)
            .field("active", &!self.done.load(Ordering::SeqCst))
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::HandlerFault;
    use std::sync::Mutex as StdMutex;
    use wallet_standard_core::{StandardWallet, SOLANA_MAINNET};

    fn wallet(name: &str) -> Arc<dyn Wallet> {
        Arc::new(
            StandardWallet::builder(name)
                .chain(SOLANA_MAINNET)
                .build()
                .unwrap(),
        )
    }

    fn names(wallets: &[Arc<dyn Wallet>]) -> Vec<String> {
        wallets.iter().map(|w| w.name().to_string()).collect()
    }

    type Log = Arc<StdMutex<Vec<String>>>;

    fn log() -> Log {
        Arc::new(StdMutex::new(Vec::new()))
    }

    fn recorder(
        log: &Log,
        tag: &'static str,
    ) -> impl Fn(&[Arc<dyn Wallet>]) -> Result<(), BoxError> + Send + Sync + 'static {
        let log = Arc::clone(log);
        move |wallets: &[Arc<dyn Wallet>]| {
            for name in names(wallets) {
                log.lock().unwrap().push(format!("{tag}:{name}"));
            }
            Ok(())
        }
    }

    #[test]
    fn test_register_is_idempotent() {
        let registry = Registry::new();
        let events = log();
        let _sub = registry.on_register(recorder(&events, "reg"));

        let a = wallet("A");
        let first = registry.register(Arc::clone(&a)).unwrap();
        let second = registry.register(Arc::clone(&a)).unwrap();

        assert_eq!(registry.len(), 1);
        assert_eq!(*events.lock().unwrap(), vec!["reg:A"]);
        assert_eq!(first.wallet_id(), second.wallet_id());
    }

    #[test]
    fn test_register_all_batches_new_wallets() {
        let registry = Registry::new();
        let events = log();
        let _sub = registry.on(EventKind::Register, {
            let events = Arc::clone(&events);
            move |event| {
                events.lock().unwrap().push(names(event.wallets()).join(","));
                Ok(())
            }
        });

        let a = wallet("A");
        registry.register(Arc::clone(&a)).unwrap();
        let regs = registry
            .register_all([Arc::clone(&a), wallet("B"), wallet("C")])
            .unwrap();

        assert_eq!(regs.len(), 3);
        assert_eq!(*events.lock().unwrap(), vec!["A", "B,C"]);
        assert_eq!(names(&registry.get_all()), vec!["A", "B", "C"]);
    }

    #[test]
    fn test_unregister_is_idempotent() {
        let registry = Registry::new();
        let events = log();
        let _sub = registry.on_unregister(recorder(&events, "unreg"));

        let registration = registry.register(wallet("A")).unwrap();
        assert!(registration.unregister().unwrap());
        assert!(!registration.unregister().unwrap());

        assert!(registry.is_empty());
        assert_eq!(*events.lock().unwrap(), vec!["unreg:A"]);
    }

    #[test]
    fn test_stale_registration_handle_does_nothing() {
        let registry = Registry::new();
        let a = wallet("A");

        let old = registry.register(Arc::clone(&a)).unwrap();
        registry.deregister(&[a.id()]).unwrap();
        let _new = registry.register(Arc::clone(&a)).unwrap();

        assert!(!old.unregister().unwrap());
        assert!(registry.contains(a.id()));
    }

    #[test]
    fn test_deregister_reports_exactly_removed() {
        let registry = Registry::new();
        let events = log();
        let _sub = registry.on_unregister(recorder(&events, "unreg"));

        let a = wallet("A");
        let b = wallet("B");
        registry.register_all([Arc::clone(&a), Arc::clone(&b)]).unwrap();

        let removed = registry
            .deregister(&[a.id(), WalletId::generate()])
            .unwrap();
        assert_eq!(names(&removed), vec!["A"]);

        let removed = registry.deregister(&[a.id()]).unwrap();
        assert!(removed.is_empty());

        assert_eq!(*events.lock().unwrap(), vec!["unreg:A"]);
        assert_eq!(names(&registry.get_all()), vec!["B"]);
    }

    #[test]
    fn test_entries_keep_order() {
        let registry = Registry::new();
        registry.register_all([wallet("A"), wallet("B")]).unwrap();

        let entries = registry.entries();
        assert!(entries[0].order < entries[1].order);
        assert!(entries[0].registered_at <= entries[1].registered_at);
        assert_eq!(registry.find_by_name("B").unwrap().name(), "B");
        assert!(registry.find_by_name("Z").is_none());
    }

    #[test]
    fn test_handler_failures_are_isolated_and_aggregated() {
        let registry = Registry::new();
        let events = log();
        let _failing = registry.on_register(|_| Err("handler broke".into()));
        let _panicking = registry.on_register(|_| panic!("handler panicked"));
        let _ok = registry.on_register(recorder(&events, "reg"));

        let err = registry.register(wallet("A")).unwrap_err();

        assert_eq!(err.failures().len(), 2);
        assert!(matches!(err.failures()[0].fault, HandlerFault::Error(_)));
        assert!(matches!(err.failures()[1].fault, HandlerFault::Panic(_)));
        assert_eq!(err.outcome().wallet().name(), "A");
        assert_eq!(*events.lock().unwrap(), vec!["reg:A"]);
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_reentrant_events_are_delivered_in_order() {
        let registry = Registry::new();
        let events = log();

        let b = wallet("B");
        let _first = registry.on_register({
            let events = Arc::clone(&events);
            let registry = registry.clone();
            let b = Arc::clone(&b);
            move |wallets| {
                for name in names(wallets) {
                    events.lock().unwrap().push(format!("h1:{name}"));
                    if name == "A" {
                        registry.register(Arc::clone(&b)).map_err(|e| e.to_string())?;
                    }
                }
                Ok(())
            }
        });
        let _second = registry.on_register(recorder(&events, "h2"));

        registry.register(wallet("A")).unwrap();

        assert_eq!(
            *events.lock().unwrap(),
            vec!["h1:A", "h2:A", "h1:B", "h2:B"]
        );
        assert_eq!(names(&registry.get_all()), vec!["A", "B"]);
    }

    #[test]
    fn test_nested_failures_surface_through_outer_call() {
        let registry = Registry::new();
        let nested_ok = Arc::new(StdMutex::new(None));

        let b = wallet("B");
        let _handler = registry.on_register({
            let registry = registry.clone();
            let nested_ok = Arc::clone(&nested_ok);
            move |wallets| {
                if names(wallets) == ["B"] {
                    return Err("rejects B".into());
                }
                let nested = registry.register(Arc::clone(&b));
                *nested_ok.lock().unwrap() = Some(nested.is_ok());
                Ok(())
            }
        });

        let err = registry.register(wallet("A")).unwrap_err();

        // B's event ran after the nested call returned
        assert_eq!(*nested_ok.lock().unwrap(), Some(true));
        assert_eq!(err.failures().len(), 1);
        assert_eq!(err.failures()[0].event, "register");
        assert!(matches!(err.failures()[0].fault, HandlerFault::Error(_)));
        assert_eq!(err.outcome().wallet().name(), "A");
        assert_eq!(names(&registry.get_all()), vec!["A", "B"]);
    }

    #[test]
    fn test_subscription_during_dispatch_sees_only_later_events() {
        let registry = Registry::new();
        let events = log();
        let late: Arc<StdMutex<Vec<Subscription>>> = Arc::new(StdMutex::new(Vec::new()));

        let _subscriber = registry.on_register({
            let registry = registry.clone();
            let events = Arc::clone(&events);
            let late = Arc::clone(&late);
            move |_| {
                let mut late = late.lock().unwrap();
                if late.is_empty() {
                    late.push(registry.on_register(recorder(&events, "late")));
                }
                Ok(())
            }
        });

        registry.register(wallet("A")).unwrap();
        assert!(events.lock().unwrap().is_empty());

        registry.register(wallet("B")).unwrap();
        assert_eq!(*events.lock().unwrap(), vec!["late:B"]);
    }

    #[test]
    fn test_unsubscribe_is_idempotent_and_runs_on_drop() {
        let registry = Registry::new();
        let events = log();

        let sub = registry.on_register(recorder(&events, "a"));
        let other = registry.on_register(recorder(&events, "b"));
        assert_eq!(registry.subscriber_count(), 2);

        assert!(sub.unsubscribe());
        assert!(!sub.unsubscribe());
        assert_eq!(registry.subscriber_count(), 1);

        drop(other);
        assert_eq!(registry.subscriber_count(), 0);

        registry.register(wallet("A")).unwrap();
        assert!(events.lock().unwrap().is_empty());
    }

    #[test]
    fn test_change_for_unregistered_wallet_is_suppressed() {
        let registry = Registry::new();
        let a = wallet("A");
        let changes = Arc::new(StdMutex::new(0));
        let _sub = registry.on_change(a.id(), {
            let changes = Arc::clone(&changes);
            move |_| {
                *changes.lock().unwrap() += 1;
                Ok(())
            }
        });

        assert!(!registry.notify_accounts_changed(a.id()).unwrap());

        registry.register(Arc::clone(&a)).unwrap();
        assert!(registry.notify_accounts_changed(a.id()).unwrap());
        assert_eq!(*changes.lock().unwrap(), 1);
    }

    #[test]
    fn test_deregistration_wins_over_queued_change() {
        let registry = Registry::new();
        let a = wallet("A");
        registry.register(Arc::clone(&a)).unwrap();

        let changes = Arc::new(StdMutex::new(0));
        let _change = registry.on_change(a.id(), {
            let changes = Arc::clone(&changes);
            move |_| {
                *changes.lock().unwrap() += 1;
                Ok(())
            }
        });

        // The change is queued behind the trigger event, then A is removed
        // before it goes out.
        let _trigger = registry.on_register({
            let registry = registry.clone();
            let id = a.id();
            move |_| {
                registry.notify_accounts_changed(id).map_err(|e| e.to_string())?;
                registry.deregister(&[id]).map_err(|e| e.to_string())?;
                Ok(())
            }
        });

        registry.register(wallet("B")).unwrap();
        assert_eq!(*changes.lock().unwrap(), 0);
        assert!(!registry.contains(a.id()));
    }

    #[test]
    fn test_change_subscription_is_per_wallet() {
        let registry = Registry::new();
        let a = wallet("A");
        let b = wallet("B");
        registry.register_all([Arc::clone(&a), Arc::clone(&b)]).unwrap();

        let seen = log();
        let _sub = registry.on_change(a.id(), {
            let seen = Arc::clone(&seen);
            move |wallet| {
                seen.lock().unwrap().push(wallet.name().to_string());
                Ok(())
            }
        });

        registry.notify_accounts_changed(b.id()).unwrap();
        registry.notify_accounts_changed(a.id()).unwrap();
        assert_eq!(*seen.lock().unwrap(), vec!["A"]);
    }

    #[test]
    fn test_concurrent_registration_notifies_each_once() {
        let registry = Registry::new();
        let events = log();
        let _sub = registry.on_register(recorder(&events, "reg"));

        let handles: Vec<_> = (0..8)
            .map(|i| {
                let registry = registry.clone();
                std::thread::spawn(move || {
                    let w = wallet(&format!("W{i}"));
                    registry.register(Arc::clone(&w)).unwrap();
                    registry.register(w).unwrap();
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        assert_eq!(registry.len(), 8);
        let mut seen = events.lock().unwrap().clone();
        seen.sort();
        seen.dedup();
        assert_eq!(seen.len(), 8);
        assert_eq!(events.lock().unwrap().len(), 8);
    }

    #[test]
    fn test_subscription_outliving_registry_is_harmless() {
        let sub = {
            let registry = Registry::new();
            registry.on_register(|_| Ok(()))
        };
        assert!(!sub.unsubscribe());
    }
}
