//! One-click trading session CLI.
//!
//! `link` establishes a delegated trading session for the configured
//! subaccount; the trading commands (`balance`, `orders`, `place`)
//! re-derive the same delegate key locally and resume the session
//! without submitting another link authorization.

mod config;
mod error;
mod logging;

use std::sync::Arc;
use std::time::Instant;

use anyhow::Result;
use chrono::Utc;
use clap::{Parser, Subcommand};
use rust_decimal::Decimal;
use tracing::info;

use onect_core::{
    ExpirationKind, ExpirationSpec, LinkResult, LocalWallet, OrderRequest, Subaccount,
    WalletProvider,
};
use onect_session::{
    derive_delegate_key, BudgetTracker, SessionManager, SessionState, TradingGateway,
};
use onect_venue::{RestVenueClient, VenueClient, VenueNetwork};

use crate::config::CliConfig;
use crate::error::CliResult;

/// One-click trading session manager
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Cli {
    /// Configuration file path (can also be set via ONECT_CONFIG env var)
    #[arg(short, long)]
    config: Option<String>,

    /// Network override (arbitrum-sepolia or arbitrum-one)
    #[arg(short, long)]
    network: Option<VenueNetwork>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Link a delegate signer for one-click trading
    Link,
    /// Show the venue's remaining link allowance
    Budget,
    /// Show subaccount balance and health figures
    Balance,
    /// List open orders per product
    Orders {
        /// Product ids (defaults to the configured list)
        #[arg(long, value_delimiter = ',')]
        products: Option<Vec<u32>>,
    },
    /// Place an order through the linked delegate
    Place {
        #[arg(long)]
        product: u32,
        #[arg(long)]
        price: Decimal,
        #[arg(long)]
        amount: Decimal,
        /// Immediate-or-cancel instead of a resting order
        #[arg(long)]
        ioc: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    logging::init_logging();

    let config_path = cli
        .config
        .or_else(|| std::env::var("ONECT_CONFIG").ok())
        .unwrap_or_else(|| "config/default.toml".to_string());

    let mut config = CliConfig::load(&config_path)?;
    if let Some(network) = cli.network {
        config.network = network;
    }
    info!(network = %config.network, subaccount = %config.subaccount_name, "Configuration loaded");

    match cli.command {
        Command::Link => cmd_link(&config).await?,
        Command::Budget => cmd_budget(&config).await?,
        Command::Balance => cmd_balance(&config).await?,
        Command::Orders { products } => cmd_orders(&config, products).await?,
        Command::Place {
            product,
            price,
            amount,
            ioc,
        } => cmd_place(&config, product, price, amount, ioc).await?,
    }

    Ok(())
}

fn primary_wallet(config: &CliConfig) -> CliResult<Arc<LocalWallet>> {
    Ok(Arc::new(LocalWallet::from_env(&config.private_key_env)?))
}

/// Rebuild a previously linked session without touching the venue: the
/// delegate key is deterministic, so one local signature recovers the
/// same signer the `link` command registered. Consumes no link budget.
async fn resume_session(config: &CliConfig) -> CliResult<(Arc<SessionState>, Subaccount)> {
    let state = Arc::new(SessionState::new());
    state.connect(primary_wallet(config)?);

    let primary = state.begin_link()?;
    let subaccount = Subaccount::new(primary.address(), &config.subaccount_name)?;

    let key = derive_delegate_key(config.network, &subaccount, primary.as_ref()).await?;
    let delegate = Arc::new(key.into_signer()?);

    let client = RestVenueClient::new(config.network, primary)?;
    client.set_linked_signer(Some(delegate.clone() as Arc<dyn WalletProvider>));
    state.commit_link(delegate, Arc::new(client))?;

    Ok((state, subaccount))
}

async fn cmd_link(config: &CliConfig) -> CliResult<()> {
    let state = Arc::new(SessionState::new());
    state.connect(primary_wallet(config)?);

    let manager = SessionManager::for_network(config.network, Arc::clone(&state))?;
    let started = Instant::now();
    let outcome = manager.create_link(&config.subaccount_name).await?;
    let elapsed_ms = started.elapsed().as_millis();

    match outcome.result {
        LinkResult::Success => {
            let delegate = state
                .delegate_address()
                .map(|a| a.to_string())
                .unwrap_or_default();
            println!("Link succeeded in {elapsed_ms}ms");
            println!("Delegate signer: {delegate}");
        }
        LinkResult::Failure(reason) => {
            println!("Link failed after {elapsed_ms}ms: {reason}");
        }
    }
    if let Some(budget) = outcome.budget {
        println!("Remaining link budget: {}", budget.remaining);
    }
    Ok(())
}

async fn cmd_budget(config: &CliConfig) -> CliResult<()> {
    // Read-only: the wallet is used for its address, never for signing.
    let wallet = primary_wallet(config)?;
    let subaccount = Subaccount::new(wallet.address(), &config.subaccount_name)?;

    let tracker = BudgetTracker::for_network(config.network)?;
    let budget = tracker.remaining(&subaccount).await?;
    println!(
        "Remaining link budget for {}: {}",
        subaccount.truncated_owner(),
        budget.remaining
    );
    Ok(())
}

async fn cmd_balance(config: &CliConfig) -> CliResult<()> {
    let (state, subaccount) = resume_session(config).await?;
    let gateway = TradingGateway::new(state);

    let started = Instant::now();
    let summary = gateway.account_summary(&subaccount).await?;
    let elapsed_ms = started.elapsed().as_millis();

    if !summary.exists {
        println!("Subaccount {subaccount} does not exist on the venue yet");
        return Ok(());
    }
    println!("Subaccount {subaccount} ({elapsed_ms}ms)");
    println!("  assets:      {}", summary.assets.display_rounded()?);
    println!("  liabilities: {}", summary.liabilities.display_rounded()?);
    println!("  health:      {}", summary.health.display_rounded()?);
    Ok(())
}

async fn cmd_orders(config: &CliConfig, products: Option<Vec<u32>>) -> CliResult<()> {
    let (state, subaccount) = resume_session(config).await?;
    let gateway = TradingGateway::new(state);
    let products = products.unwrap_or_else(|| config.products.clone());

    let result = gateway.open_orders(&subaccount, &products).await?;
    let now_secs = Utc::now().timestamp().max(0) as u64;

    for per_product in &result.product_orders {
        println!(
            "Product {}: {} open order(s)",
            per_product.product_id,
            per_product.orders.len()
        );
        for order in &per_product.orders {
            println!(
                "  {} @ {}  expires in {}s  {}",
                order.amount.display_rounded()?,
                order.price,
                order.expires_in_secs(now_secs),
                order.digest
            );
        }
    }
    Ok(())
}

async fn cmd_place(
    config: &CliConfig,
    product: u32,
    price: Decimal,
    amount: Decimal,
    ioc: bool,
) -> CliResult<()> {
    let (state, subaccount) = resume_session(config).await?;
    let gateway = TradingGateway::new(state);

    let expiration = if ioc {
        ExpirationSpec {
            kind: ExpirationKind::ImmediateOrCancel,
            ..ExpirationSpec::default()
        }
    } else {
        ExpirationSpec::default()
    };
    let request = OrderRequest {
        subaccount,
        product_id: product,
        price,
        amount,
        expiration,
    };

    let started = Instant::now();
    let receipt = gateway.place_order(&request).await?;
    let elapsed_ms = started.elapsed().as_millis();

    println!("Order accepted in {elapsed_ms}ms");
    println!("  product: {}", receipt.product_id);
    println!("  digest:  {}", receipt.digest);
    Ok(())
}
