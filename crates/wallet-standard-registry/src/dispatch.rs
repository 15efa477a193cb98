//! Event dispatch
//!
//! Handler records per event kind plus an emit routine, without any tie to a
//! UI state primitive.
//!
//! Every registry mutation runs inside a [`DispatchGate`]. The first gate
//! opened on a thread is the *outermost* one: it owns dispatch until it is
//! finished. Events raised while a gate is open (including from inside
//! handlers, re-entrantly) are queued with the recipients subscribed at that
//! moment and delivered breadth-first by the outermost gate:
//!
//! ```text
//! register(A) ── raise E1 ──► drain: H1(E1) ── register(B) ── raise E2 (queued)
//!                                    H2(E1)
//!                                    H1(E2)
//!                                    H2(E2)
//! ```
//!
//! Another thread entering while a dispatch is in progress waits for it to
//! finish, so mutation and delivery order agree across threads.
//! A handler must not block on another thread that calls into the same
//! registry: that thread waits for the handler, which deadlocks.

use std::collections::VecDeque;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Condvar, Mutex, MutexGuard, PoisonError};
use std::thread::{self, ThreadId};

use tracing::{debug, warn};
use wallet_standard_core::BoxError;

use crate::error::{HandlerFailure, HandlerFault};
use crate::event::{EventKind, RegistryEvent, SubscriptionId};

/// Notification handler
pub type Handler = dyn Fn(&RegistryEvent) -> Result<(), BoxError> + Send + Sync;

struct HandlerRecord {
    id: SubscriptionId,
    kind: EventKind,
    active: AtomicBool,
    handler: Box<Handler>,
}

struct Pending {
    event: RegistryEvent,
    recipients: Vec<Arc<HandlerRecord>>,
}

#[derive(Default)]
struct HubState {
    handlers: Vec<Arc<HandlerRecord>>,
    queue: VecDeque<Pending>,
    owner: Option<ThreadId>,
}

pub(crate) struct EventHub {
    state: Mutex<HubState>,
    idle: Condvar,
    next_id: AtomicU64,
}

impl EventHub {
    pub(crate) fn new() -> Self {
        Self {
            state: Mutex::new(HubState::default()),
            idle: Condvar::new(),
            next_id: AtomicU64::new(1),
        }
    }

    fn lock(&self) -> MutexGuard<'_, HubState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Append a handler; it receives events raised from now on
    pub(crate) fn subscribe(&self, kind: EventKind, handler: Box<Handler>) -> SubscriptionId {
        let id = SubscriptionId::new(self.next_id.fetch_add(1, Ordering::Relaxed));
        let record = Arc::new(HandlerRecord {
            id,
            kind,
            active: AtomicBool::new(true),
            handler,
        });
        self.lock().handlers.push(record);
        debug!(subscription = %id, ?kind, "Handler subscribed");
        id
    }

    /// Remove a handler by id. Queued deliveries to it are dropped.
    pub(crate) fn unsubscribe(&self, id: SubscriptionId) -> bool {
        let mut state = self.lock();
        match state.handlers.iter().position(|record| record.id == id) {
            Some(index) => {
                let record = state.handlers.remove(index);
                record.active.store(false, Ordering::SeqCst);
                debug!(subscription = %id, "Handler unsubscribed");
                true
            }
            None => false,
        }
    }

    pub(crate) fn handler_count(&self) -> usize {
        self.lock().handlers.len()
    }

    /// Open a gate for one registry operation.
    ///
    /// Blocks while another thread owns dispatch; re-entrant on the owning
    /// thread.
    pub(crate) fn enter(&self) -> DispatchGate<'_> {
        let me = thread::current().id();
        let mut state = self.lock();
        loop {
            match state.owner {
                None => {
                    state.owner = Some(me);
                    return DispatchGate {
                        hub: self,
                        outermost: true,
                    };
                }
                Some(owner) if owner == me => {
                    return DispatchGate {
                        hub: self,
                        outermost: false,
                    };
                }
                Some(_) => {
                    state = self.idle.wait(state).unwrap_or_else(PoisonError::into_inner);
                }
            }
        }
    }
}

/// Scope of one registry operation; see the module docs
pub(crate) struct DispatchGate<'a> {
    hub: &'a EventHub,
    outermost: bool,
}

impl DispatchGate<'_> {
    /// Queue an event for the handlers subscribed right now
    pub(crate) fn raise(&self, event: RegistryEvent) {
        let mut state = self.hub.lock();
        let recipients: Vec<_> = state
            .handlers
            .iter()
            .filter(|record| event.matches(&record.kind))
            .cloned()
            .collect();
        debug!(
            event = event.label(),
            recipients = recipients.len(),
            nested = !self.outermost,
            "Event raised"
        );
        state.queue.push_back(Pending { event, recipients });
    }

    /// Deliver queued events if this is the outermost gate.
    ///
    /// `deliverable` is checked right before each event goes out; events it
    /// rejects are dropped. Nested gates return no failures: their events
    /// and any handler faults are reported by the outermost gate.
    pub(crate) fn finish(
        self,
        deliverable: impl Fn(&RegistryEvent) -> bool,
    ) -> Vec<HandlerFailure> {
        let mut failures = Vec::new();
        if !self.outermost {
            return failures;
        }

        loop {
            let next = self.hub.lock().queue.pop_front();
            let Some(pending) = next else { break };

            if !deliverable(&pending.event) {
                debug!(event = pending.event.label(), "Dropping stale event");
                continue;
            }

            for record in &pending.recipients {
                if !record.active.load(Ordering::SeqCst) {
                    continue;
                }
                let outcome = catch_unwind(AssertUnwindSafe(|| (record.handler)(&pending.event)));
                let fault = match outcome {
                    Ok(Ok(())) => continue,
                    Ok(Err(error)) => HandlerFault::Error(error),
                    Err(payload) => HandlerFault::Panic(panic_message(payload.as_ref())),
                };
                warn!(
                    subscription = %record.id,
                    event = pending.event.label(),
                    %fault,
                    "Notification handler failed"
                );
                failures.push(HandlerFailure {
                    subscription: record.id,
                    event: pending.event.label(),
                    fault,
                });
            }
        }

        failures
    }
}

impl Drop for DispatchGate<'_> {
    fn drop(&mut self) {
        if self.outermost {
            let mut state = self.hub.lock();
            state.queue.clear();
            state.owner = None;
            drop(state);
            self.hub.idle.notify_all();
        }
    }
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "non-string panic payload".to_string()
    }
}
