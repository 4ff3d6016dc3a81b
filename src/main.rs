//! DeFi Liquidity Agent CLI
//!
//! Command-line access to amount resolution and receipt analysis.

use clap::{Parser, Subcommand};
use defi_liquidity_agent::meteora::{resolve, LiquidityAmountRequest, ReceiptAnalyzer};
use defi_liquidity_agent::solana::SolanaRpcClient;
use defi_liquidity_agent::tokens::registry;
use defi_liquidity_agent::tools::{MeteoraTool, Tool};
use defi_liquidity_agent::units::format_units;
use defi_liquidity_agent::{Chain, Config, Result, RetryPolicy, RpcConfig};
use std::path::PathBuf;
use std::time::Duration;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[derive(Parser)]
#[command(name = "liquidity-agent")]
#[command(about = "Meteora DLMM liquidity helper")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Path to config file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Emit logs as JSON lines
    #[arg(long, global = true)]
    json_logs: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Resolve deposit amounts into base units
    Amounts {
        /// Amount of token X, or "auto"
        #[arg(long)]
        amount: String,

        /// Amount of token Y, or "auto"
        #[arg(long)]
        amount_b: String,

        /// Price of one X in Y at the active bin
        #[arg(short, long, default_value = "")]
        price: String,

        /// Decimals of token X
        #[arg(long)]
        x_decimals: u8,

        /// Decimals of token Y
        #[arg(long)]
        y_decimals: u8,
    },

    /// Extract liquidity removed and fees claimed by a withdrawal transaction
    Receipt {
        /// Transaction signature
        #[arg(short, long)]
        signature: String,

        /// Token X (symbol or mint)
        #[arg(short = 'x', long)]
        token_x: String,

        /// Token Y (symbol or mint)
        #[arg(short = 'y', long)]
        token_y: String,
    },

    /// Print the agent tool schemas
    Tools,

    /// Show current configuration
    Config,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present (ignore if not found)
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    // Initialize logging; RUST_LOG wins over --verbose
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        if cli.verbose {
            EnvFilter::new("debug")
        } else {
            EnvFilter::new("info")
        }
    });

    if cli.json_logs {
        tracing_subscriber::registry()
            .with(fmt::layer().json())
            .with(filter)
            .init();
    } else {
        tracing_subscriber::registry()
            .with(fmt::layer())
            .with(filter)
            .init();
    }

    let config = match &cli.config {
        Some(path) => Config::load(path)?,
        None => Config::default(),
    };

    match cli.command {
        Commands::Amounts {
            amount,
            amount_b,
            price,
            x_decimals,
            y_decimals,
        } => {
            let request = LiquidityAmountRequest {
                amount,
                amount_b,
                active_bin_price_per_token: price,
                token_x_decimals: x_decimals,
                token_y_decimals: y_decimals,
            };
            let resolved = resolve(&request)?;
            let output = serde_json::json!({
                "total_x_amount": resolved.total_x_amount.to_string(),
                "total_y_amount": resolved.total_y_amount.to_string(),
                "total_x_formatted": format_units(resolved.total_x_amount, x_decimals),
                "total_y_formatted": format_units(resolved.total_y_amount, y_decimals),
            });
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        Commands::Receipt {
            signature,
            token_x,
            token_y,
        } => {
            let analyzer = build_analyzer(&config)?;
            let token_x_mint = registry().resolve_mint(&token_x);
            let token_y_mint = registry().resolve_mint(&token_y);

            tracing::info!(
                signature = %signature,
                token_x = %token_x_mint,
                token_y = %token_y_mint,
                "Extracting balance changes"
            );

            let changes = analyzer
                .extract_balance_changes(&signature, token_x_mint, token_y_mint)
                .await?;
            println!("{}", serde_json::to_string_pretty(&changes)?);
        }
        Commands::Tools => {
            let tool = MeteoraTool::new(build_analyzer(&config)?);
            let output = serde_json::json!([{
                "name": <MeteoraTool<SolanaRpcClient> as Tool>::NAME,
                "description": tool.description(),
                "input_schema": tool.input_schema()?,
            }]);
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        Commands::Config => {
            let rpc = RpcConfig::from_env();
            let endpoints: serde_json::Map<String, serde_json::Value> = Chain::ALL
                .iter()
                .filter_map(|chain| {
                    rpc.get(*chain)
                        .map(|url| (chain.name().to_string(), redact(url).into()))
                })
                .collect();
            let output = serde_json::json!({
                "config": config,
                "rpc": endpoints,
            });
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
    }

    Ok(())
}

fn build_analyzer(config: &Config) -> Result<ReceiptAnalyzer<SolanaRpcClient>> {
    let rpc = RpcConfig::from_env();
    let client =
        SolanaRpcClient::from_rpc_config(&rpc, Duration::from_millis(config.request_timeout_ms))?;
    tracing::debug!(rpc = %client.url(), "Using Solana RPC");
    Ok(ReceiptAnalyzer::new(client).with_retry(RetryPolicy::from(&config.retry)))
}

/// Hide API keys carried in query strings or path segments
fn redact(url: &str) -> String {
    match url::Url::parse(url) {
        Ok(parsed) => {
            let host = parsed.host_str().unwrap_or_default();
            let has_secret = parsed.query().is_some() || parsed.path().len() > 1;
            if has_secret {
                format!("{}://{}/***", parsed.scheme(), host)
            } else {
                format!("{}://{}", parsed.scheme(), host)
            }
        }
        Err(_) => "***".to_string(),
    }
}
