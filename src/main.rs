//! token-client
//!
//! Mints ERC20 tokens through an owner-only `mint(address,uint256)` and
//! serves the same operation over HTTP.
//!
//! # Architecture Overview
//!
//! ```text
//!   CLI / HTTP request
//!        │
//!        ▼
//!   ┌────────────┐   ┌──────────────────────────────────────────────┐
//!   │ TokenClient│──▶│ validate → verify → read state → authorize    │
//!   │   (mint)   │   │ → simulate → construct → sign → submit        │
//!   └────────────┘   │ → await receipt → interpret                   │
//!        │           └──────────────────────────────────────────────┘
//!        ▼
//!   ┌────────────────┐      JSON-RPC       ┌──────────────┐
//!   │ChainConnection │ ──────────────────▶ │  EVM node    │
//!   │ wallet + ABI   │ ◀────────────────── │              │
//!   └────────────────┘                     └──────────────┘
//! ```
//!
//! The signing key is read from `TOKEN_CLIENT_PRIVATE_KEY`.

use alloy::primitives::U256;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tokio::net::TcpListener;

use token_client::config::validation::validate_config;
use token_client::config::{load_config, ClientConfig, ConfigError};
use token_client::observability::{logging, metrics};
use token_client::{HttpServer, TokenClient};

#[derive(Parser)]
#[command(name = "token-client")]
#[command(about = "Mint ERC20 tokens from the contract owner account", long_about = None)]
struct Cli {
    /// TOML configuration file.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// JSON-RPC endpoint, overrides `chain.rpc_url`.
    #[arg(long)]
    rpc_url: Option<String>,

    /// Token contract address, overrides `token.address`.
    #[arg(long)]
    token: Option<String>,

    /// Compiled contract artifact, overrides `token.artifact_path`.
    #[arg(long)]
    artifact: Option<String>,

    /// Expected chain ID, overrides `chain.chain_id`.
    #[arg(long)]
    chain_id: Option<u64>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Mint tokens and print the receipt
    Mint {
        /// Recipient address
        #[arg(long)]
        to: String,
        /// Amount in base units
        #[arg(long)]
        amount: String,
    },
    /// Show token name, symbol, owner and pause state
    Info,
    /// Show the token balance of an address
    Balance {
        #[arg(long)]
        of: String,
    },
    /// Run the HTTP mint service
    Serve,
}

impl Cli {
    fn resolve_config(&self) -> Result<ClientConfig, ConfigError> {
        let mut config = match &self.config {
            Some(path) => load_config(path)?,
            None => ClientConfig::default(),
        };

        if let Some(url) = &self.rpc_url {
            config.chain.rpc_url = url.clone();
        }
        if let Some(token) = &self.token {
            config.token.address = token.clone();
        }
        if let Some(artifact) = &self.artifact {
            config.token.artifact_path = artifact.clone();
        }
        if let Some(chain_id) = self.chain_id {
            config.chain.chain_id = chain_id;
        }

        validate_config(&config).map_err(ConfigError::Validation)?;
        Ok(config)
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let config = cli.resolve_config()?;

    logging::init_logging(&config.observability.log_level);
    tracing::info!(version = env!("CARGO_PKG_VERSION"), "token-client starting");

    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse() {
            Ok(addr) => metrics::init_metrics(addr),
            Err(_) => tracing::error!(
                metrics_address = %config.observability.metrics_address,
                "Failed to parse metrics address"
            ),
        }
    }

    let client = TokenClient::connect_from_env(&config).await?;

    match cli.command {
        Commands::Mint { to, amount } => {
            let receipt = client.mint_text(&to, &amount).await?;
            println!("{}", serde_json::to_string_pretty(&receipt)?);
        }
        Commands::Info => {
            let state = client.contract_state().await?;
            let info = serde_json::json!({
                "address": client.token_address(),
                "signer": client.signer_address(),
                "chain_id": client.connection().chain_id(),
                "name": state.name,
                "symbol": state.symbol,
                "owner": state.owner,
                "paused": state.paused,
            });
            println!("{}", serde_json::to_string_pretty(&info)?);
        }
        Commands::Balance { of } => {
            let balance: U256 = client.balance_of(&of).await?;
            println!("{}", balance);
        }
        Commands::Serve => {
            let listener = TcpListener::bind(&config.server.bind_address).await?;
            tracing::info!(address = %listener.local_addr()?, "Listening for connections");

            HttpServer::new(client, config.server.clone())
                .run(listener)
                .await?;
            tracing::info!("Shutdown complete");
        }
    }

    Ok(())
}
