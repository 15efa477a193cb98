//! Wallet Standard Registry - discovery and capability negotiation
//!
//! This crate provides:
//! - [`Registry`]: the process-wide set of registered wallets with
//!   `register` / `unregister` / `change` notifications
//! - [`DiscoverySession`]: a consumer's live view of that set
//! - [`negotiate::connect`]: the least-privilege view of a wallet for a
//!   [`ConnectRequest`](wallet_standard_core::ConnectRequest)
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use wallet_standard_core::{ConnectRequest, StandardWallet, SOLANA_MAINNET};
//! use wallet_standard_registry::{DiscoverySession, Registry};
//!
//! # async fn demo() -> Result<(), Box<dyn std::error::Error>> {
//! let registry = Registry::global();
//! let session = DiscoverySession::open(registry);
//!
//! let wallet = StandardWallet::builder("Demo").chain(SOLANA_MAINNET).build()?;
//! let registration = registry.register(Arc::new(wallet))?;
//! assert_eq!(session.len(), 1);
//!
//! let request = ConnectRequest::new([SOLANA_MAINNET]);
//! let connection = registry.connect(registration.wallet_id(), &request).await?;
//! println!("{} accounts", connection.accounts.len());
//! # Ok(())
//! # }
//! ```

mod dispatch;
pub mod error;
pub mod event;
pub mod negotiate;
pub mod registry;
pub mod session;

pub use dispatch::Handler;
pub use error::{ConnectError, HandlerFailure, HandlerFault, NotifyError};
pub use event::{EventKind, RegistryEvent, SubscriptionId};
pub use negotiate::{connect, scope_account, Connection, ConnectionSummary};
pub use registry::{NotifyResult, Registration, Registry, RegistryEntry, Subscription};
pub use session::{DiscoverySession, Listener, SessionState};
