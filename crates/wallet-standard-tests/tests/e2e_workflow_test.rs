//! End-to-end workflow tests for the wallet standard
//!
//! These tests drive a registry the way a provider and a consuming
//! application would together: registration, discovery, negotiation,
//! account changes and deregistration.

use std::sync::{Arc, Mutex};

use wallet_standard_core::{
    features::{sign_message, SignMessageInput, SIGN_MESSAGE, SIGN_TRANSACTION},
    Account, AutoReject, Capability, ChainId, ConnectRequest, StandardWallet, Version, Wallet,
    WalletId, ETHEREUM_MAINNET, SOLANA_DEVNET, SOLANA_MAINNET,
};
use wallet_standard_demo::{register_demo_wallets, ApprovalPolicy, DemoWallet, WalletKind};
use wallet_standard_registry::{
    ConnectError, DiscoverySession, EventKind, Registry, RegistryEvent, SessionState,
};

fn capability() -> Capability {
    Capability::new(Version::new(1, 0, 0))
}

/// Provider P with a single account A1 on `chain` holding signMessage and signTransaction
fn provider(name: &str, chain: ChainId) -> Arc<StandardWallet> {
    let account = Account::new(format!("{name}-A1"), vec![0x02; 33], vec![chain.clone()])
        .with_feature(SIGN_MESSAGE, capability())
        .with_feature(SIGN_TRANSACTION, capability());
    let wallet = StandardWallet::builder(name)
        .chain(chain)
        .feature(SIGN_MESSAGE, capability())
        .feature(SIGN_TRANSACTION, capability())
        .account(account)
        .build()
        .unwrap();
    Arc::new(wallet)
}

fn ids(wallets: &[Arc<dyn Wallet>]) -> Vec<WalletId> {
    wallets.iter().map(|w| w.id()).collect()
}

/// Simulates a provider's full lifetime as seen by one application
#[tokio::test]
async fn test_full_discovery_lifecycle() {
    // ==========================================
    // STEP 1: Empty registry, application opens a session
    // ==========================================
    let registry = Registry::new();
    assert!(registry.is_empty());

    let unregistered = Arc::new(Mutex::new(Vec::new()));
    let _unregister_sub = registry.on_unregister({
        let unregistered = Arc::clone(&unregistered);
        move |wallets| {
            unregistered.lock().unwrap().push(ids(wallets));
            Ok(())
        }
    });

    let renders = Arc::new(Mutex::new(Vec::new()));
    let mut session = DiscoverySession::new(&registry).with_listener({
        let renders = Arc::clone(&renders);
        move |wallets| renders.lock().unwrap().push(wallets.len())
    });
    session.initialize();
    assert_eq!(session.state(), SessionState::Initialized);
    assert!(session.is_empty());

    // ==========================================
    // STEP 2: Provider registers
    // ==========================================
    let wallet = provider("P", SOLANA_MAINNET);
    let registration = registry.register(wallet.clone()).unwrap();
    let wallet_id = registration.wallet_id();

    assert!(session.contains(wallet_id));
    assert_eq!(registry.get_all().len(), 1);

    // ==========================================
    // STEP 3: Application connects with a narrowed scope
    // ==========================================
    let request = ConnectRequest::new([SOLANA_MAINNET]).with_features([SIGN_MESSAGE]);
    let connection = registry.connect(wallet_id, &request).await.unwrap();

    assert_eq!(connection.accounts.len(), 1);
    let view = &connection.accounts[0];
    assert_eq!(view.address, "P-A1");
    assert!(view.has_feature(&SIGN_MESSAGE));
    assert!(!view.has_feature(&SIGN_TRANSACTION));

    // The wallet's own account is untouched by the scoped view
    assert!(wallet.accounts()[0].has_feature(&SIGN_TRANSACTION));

    // ==========================================
    // STEP 4: Provider leaves
    // ==========================================
    assert!(registration.unregister().unwrap());
    assert!(!registration.unregister().unwrap());

    assert_eq!(*unregistered.lock().unwrap(), vec![vec![wallet_id]]);
    assert!(registry.get_all().is_empty());
    assert!(session.is_empty());

    // Initial snapshot, register, unregister
    assert_eq!(*renders.lock().unwrap(), vec![0, 1, 0]);

    // ==========================================
    // STEP 5: Dispose and confirm the session stopped listening
    // ==========================================
    session.dispose();
    assert_eq!(session.state(), SessionState::Disposed);

    registry.register(provider("Q", SOLANA_MAINNET)).unwrap();
    assert!(session.is_empty());
    assert_eq!(renders.lock().unwrap().len(), 3);
}

#[tokio::test]
async fn test_connect_outcomes_are_distinguished() {
    let registry = Registry::new();
    let wallet = provider("P", SOLANA_MAINNET);
    registry.register(wallet.clone()).unwrap();

    // Unsupported chain
    let err = registry
        .connect(wallet.id(), &ConnectRequest::new([ETHEREUM_MAINNET]))
        .await
        .unwrap_err();
    assert!(matches!(err, ConnectError::UnsupportedChains { .. }));
    assert!(err.is_caller_error());

    // Unknown wallet
    let err = registry
        .connect(WalletId::generate(), &ConnectRequest::new([SOLANA_MAINNET]))
        .await
        .unwrap_err();
    assert!(matches!(err, ConnectError::UnknownWallet(_)));

    // Read-only request keeps the account but grants nothing
    let connection = registry
        .connect(wallet.id(), &ConnectRequest::new([SOLANA_MAINNET]).read_only())
        .await
        .unwrap();
    assert_eq!(connection.accounts.len(), 1);
    assert!(connection.accounts[0].features.is_empty());

    // A user rejection is neither a caller error nor an empty connection
    let rejecting = StandardWallet::builder("Rejecting")
        .chain(SOLANA_MAINNET)
        .approver(Arc::new(AutoReject))
        .build()
        .unwrap();
    let rejecting_id = rejecting.id();
    registry.register(Arc::new(rejecting)).unwrap();

    let err = registry
        .connect(rejecting_id, &ConnectRequest::new([SOLANA_MAINNET]))
        .await
        .unwrap_err();
    assert!(err.is_user_rejection());
    assert!(!err.is_caller_error());
}

#[test]
fn test_account_change_reaches_session_and_change_subscribers() {
    let registry = Registry::new();
    let demo = DemoWallet::new(WalletKind::Solana, ApprovalPolicy::Approve.approver()).unwrap();
    let other = DemoWallet::new(WalletKind::Ethereum, ApprovalPolicy::Approve.approver()).unwrap();
    registry.register_all([demo.wallet(), other.wallet()]).unwrap();

    let session = DiscoverySession::open(&registry);

    let seen = Arc::new(Mutex::new(Vec::new()));
    let _any_change = registry.on(EventKind::Change(demo.id()), {
        let seen = Arc::clone(&seen);
        move |event| {
            if let RegistryEvent::AccountsChanged(wallet) = event {
                seen.lock().unwrap().push(wallet.accounts().len());
            }
            Ok(())
        }
    });
    let other_changes = Arc::new(Mutex::new(0));
    let _other_sub = registry.on_change(other.id(), {
        let other_changes = Arc::clone(&other_changes);
        move |_| {
            *other_changes.lock().unwrap() += 1;
            Ok(())
        }
    });

    let before = demo.wallet().accounts().len();
    demo.add_account(&registry).unwrap();

    assert_eq!(*seen.lock().unwrap(), vec![before + 1]);
    assert_eq!(*other_changes.lock().unwrap(), 0);
    assert_eq!(session.len(), 2);

    // A change for a departed wallet is not announced
    registry.deregister(&[demo.id()]).unwrap();
    assert!(!registry.notify_accounts_changed(demo.id()).unwrap());
    assert_eq!(seen.lock().unwrap().len(), 1);
    assert_eq!(session.len(), 1);
}

#[test]
fn test_late_session_sees_existing_wallets() {
    let registry = Registry::new();
    let wallets =
        register_demo_wallets(&registry, &WalletKind::ALL, ApprovalPolicy::Approve).unwrap();

    let session = DiscoverySession::open(&registry);
    assert_eq!(session.len(), wallets.len());

    let order: Vec<_> = registry.entries().iter().map(|e| e.order).collect();
    assert!(order.windows(2).all(|pair| pair[0] < pair[1]));
}

#[tokio::test]
async fn test_scoped_view_can_sign() {
    let registry = Registry::new();
    let demo = DemoWallet::new(WalletKind::MultiChain, ApprovalPolicy::Approve.approver()).unwrap();
    registry.register(demo.wallet()).unwrap();

    let request = ConnectRequest::new([SOLANA_DEVNET]).with_features([SIGN_MESSAGE]);
    let connection = registry.connect(demo.id(), &request).await.unwrap();

    // Only the Solana signer lives on devnet
    assert_eq!(connection.accounts.len(), 1);
    let view = &connection.accounts[0];
    assert_eq!(view.features.len(), 1);

    let output = sign_message::sign_message(
        &view.features,
        &SignMessageInput {
            message: b"hello".to_vec(),
        },
    )
    .await
    .unwrap();
    assert_eq!(output.signed_message, b"hello");
    assert_eq!(output.signature.len(), 64);
}
