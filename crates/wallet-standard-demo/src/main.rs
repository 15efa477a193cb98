//! Wallet Standard CLI - discover demo wallets and negotiate scoped connections
//!
//! Every run registers the configured demo wallets into the process-wide
//! registry, then acts as a consuming application against them.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use wallet_standard_core::{
    features::{sign_message, SignMessageInput, SIGN_MESSAGE},
    ChainId, ConnectRequest, ExtensionName, FeatureName, Wallet, WalletSummary,
};
use wallet_standard_demo::{
    account_with_feature, register_demo_wallets, resolve_wallet, ApprovalPolicy, DemoConfig,
    WalletKind,
};
use wallet_standard_registry::{Connection, DiscoverySession, Registry};

#[derive(Parser)]
#[command(name = "wallet-standard")]
#[command(about = "Discover demo wallets and negotiate scoped connections", long_about = None)]
#[command(version)]
struct Cli {
    /// Config file (defaults to $WALLET_STANDARD_CONFIG or the user config dir)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Override the configured approval policy
    #[arg(long, global = true, value_enum)]
    approval: Option<ApprovalPolicy>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List registered wallets with their chains, capabilities and accounts
    List {
        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },

    /// Connect to a wallet and show the granted account views
    Connect {
        /// Wallet name or id prefix
        #[arg(short, long)]
        wallet: String,

        /// Chain to request (repeatable; defaults to the configured chains)
        #[arg(long = "chain")]
        chains: Vec<ChainId>,

        /// Feature to request (repeatable; omit to request all)
        #[arg(long = "feature")]
        features: Vec<FeatureName>,

        /// Request no features at all
        #[arg(long, conflicts_with = "features")]
        read_only: bool,

        /// Extension to request (repeatable; omit to request all)
        #[arg(long = "extension")]
        extensions: Vec<ExtensionName>,

        /// Request no extensions at all
        #[arg(long, conflicts_with = "extensions")]
        no_extensions: bool,

        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },

    /// Sign a message with the first account granted signMessage
    SignMessage {
        /// Wallet name or id prefix
        #[arg(short, long)]
        wallet: String,

        /// Message text
        #[arg(short, long)]
        message: String,

        /// Chain to request (defaults to the configured chains)
        #[arg(long)]
        chain: Option<ChainId>,
    },

    /// Follow the registry while wallets register, rotate accounts and leave
    Watch {
        /// Accounts to add to each wallet
        #[arg(short, long, default_value_t = 1)]
        rotations: usize,

        /// Pause between steps (milliseconds)
        #[arg(long, default_value_t = 250)]
        interval_ms: u64,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config_path = cli.config.clone().unwrap_or_else(DemoConfig::default_path);
    let config = DemoConfig::load_or_create(&config_path)
        .with_context(|| format!("loading config from {}", config_path.display()))?;

    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| config.log_filter.clone().into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    info!("wallet-standard v{}", env!("CARGO_PKG_VERSION"));

    let approval = cli.approval.unwrap_or(config.approval);
    let registry = Registry::global();

    match cli.command {
        Commands::List { json } => {
            register_demo_wallets(registry, &config.wallets, approval)?;
            list(registry, json)
        }
        Commands::Connect {
            wallet,
            chains,
            features,
            read_only,
            extensions,
            no_extensions,
            json,
        } => {
            register_demo_wallets(registry, &config.wallets, approval)?;
            let wallet = resolve_wallet(registry, &wallet)?;

            let chains = if chains.is_empty() {
                config.default_chains.clone()
            } else {
                chains
            };
            let mut request = ConnectRequest::new(chains);
            if read_only {
                request = request.read_only();
            } else if !features.is_empty() {
                request = request.with_features(features);
            }
            if no_extensions {
                request = request.with_extensions(Vec::new());
            } else if !extensions.is_empty() {
                request = request.with_extensions(extensions);
            }

            let connection = registry.connect(wallet.id(), &request).await?;
            print_connection(&connection, json)
        }
        Commands::SignMessage {
            wallet,
            message,
            chain,
        } => {
            register_demo_wallets(registry, &config.wallets, approval)?;
            let wallet = resolve_wallet(registry, &wallet)?;
            let chains = chain.map_or_else(|| config.default_chains.clone(), |c| vec![c]);
            sign(registry, wallet, chains, message).await
        }
        Commands::Watch {
            rotations,
            interval_ms,
        } => {
            watch(
                registry,
                &config.wallets,
                approval,
                rotations,
                Duration::from_millis(interval_ms),
            )
            .await
        }
    }
}

fn list(registry: &Registry, json: bool) -> Result<()> {
    let summaries: Vec<_> = registry
        .get_all()
        .iter()
        .map(|w| WalletSummary::from_wallet(w.as_ref()))
        .collect();

    if json {
        println!("{}", serde_json::to_string_pretty(&summaries)?);
        return Ok(());
    }

    for summary in summaries {
        println!("{} ({})", summary.name, summary.id.short());
        println!("  chains:     {}", join(summary.chains.iter()));
        println!("  features:   {}", join_versions(&summary.features));
        if !summary.extensions.is_empty() {
            println!("  extensions: {}", join_versions(&summary.extensions));
        }
        println!("  accounts:");
        for account in summary.accounts {
            println!(
                "    {:<16} {} [{}]",
                account.label.as_deref().unwrap_or("-"),
                account.address,
                join(account.chains.iter())
            );
        }
        println!();
    }
    Ok(())
}

fn print_connection(connection: &Connection, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(&connection.summary())?);
        return Ok(());
    }

    println!(
        "Connected to {} on {}",
        connection.wallet_name,
        join(connection.chains.iter())
    );
    if connection.is_empty() {
        println!("  (no accounts on the requested chains)");
    }
    for account in &connection.accounts {
        println!(
            "  {} {}",
            account.label.as_deref().unwrap_or("-"),
            account.address
        );
        println!("    features:   {}", join_versions(&account.features.versions()));
        if !account.extensions.is_empty() {
            println!("    extensions: {}", join_versions(&account.extensions.versions()));
        }
    }
    Ok(())
}

async fn sign(
    registry: &Registry,
    wallet: Arc<dyn Wallet>,
    chains: Vec<ChainId>,
    message: String,
) -> Result<()> {
    let request = ConnectRequest::new(chains).with_features([SIGN_MESSAGE]);
    let connection = registry.connect(wallet.id(), &request).await?;

    let account = account_with_feature(&connection, &SIGN_MESSAGE)?;

    let output = sign_message::sign_message(
        &account.features,
        &SignMessageInput {
            message: message.into_bytes(),
        },
    )
    .await?;

    println!(
        "{}",
        serde_json::to_string_pretty(&serde_json::json!({
            "wallet": wallet.name(),
            "address": account.address,
            "public_key": account.public_key.to_hex(),
            "signed_message": hex::encode(&output.signed_message),
            "signature": hex::encode(&output.signature),
        }))?
    );
    Ok(())
}

async fn watch(
    registry: &Registry,
    kinds: &[WalletKind],
    approval: ApprovalPolicy,
    rotations: usize,
    interval: Duration,
) -> Result<()> {
    let mut session = DiscoverySession::new(registry).with_listener(|wallets| {
        let names: Vec<_> = wallets.iter().map(|w| w.name()).collect();
        println!("[session] {} wallet(s): {}", wallets.len(), names.join(", "));
    });
    session.initialize();

    let wallets = register_demo_wallets(registry, kinds, approval)?;

    let _changes: Vec<_> = wallets
        .iter()
        .map(|demo| {
            registry.on_change(demo.id(), |wallet| {
                println!(
                    "[change] {} now has {} account(s)",
                    wallet.name(),
                    wallet.accounts().len()
                );
                Ok(())
            })
        })
        .collect();

    for _ in 0..rotations {
        tokio::time::sleep(interval).await;
        for demo in &wallets {
            demo.add_account(registry)?;
        }
    }

    tokio::time::sleep(interval).await;
    let ids: Vec<_> = wallets.iter().map(|w| w.id()).collect();
    let removed = registry.deregister(&ids)?;
    println!("[registry] deregistered {} wallet(s)", removed.len());

    session.dispose();
    Ok(())
}

fn join<T: std::fmt::Display>(items: impl Iterator<Item = T>) -> String {
    items.map(|i| i.to_string()).collect::<Vec<_>>().join(", ")
}

fn join_versions(versions: &std::collections::BTreeMap<String, String>) -> String {
    if versions.is_empty() {
        return "(none)".to_string();
    }
    join(versions.iter().map(|(name, version)| format!("{name}@{version}")))
}
