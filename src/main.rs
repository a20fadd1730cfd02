//! Huma SDK CLI
//!
//! Command-line access to Huma pools, receivables and subgraph data.

use alloy::primitives::{Address, U256};
use alloy::providers::DynProvider;
use clap::{Parser, Subcommand};
use huma_sdk::config::{rpc::chains, PRIVATE_KEY_ENV};
use huma_sdk::contracts::{FirstLossCoverIndex, TrancheKind};
use huma_sdk::wallet::{read_only_provider, SecureWallet};
use huma_sdk::{
    Config, CreditEventKind, Error, GasOptions, Pagination, PoolHelper, PoolName, PoolType,
    ReceivableHelper, Result, SubgraphService,
};
use serde::Serialize;
use serde_json::json;
use std::path::PathBuf;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[derive(Parser)]
#[command(name = "huma")]
#[command(about = "Huma Finance protocol client")]
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

/// Pool selection shared by pool-scoped commands
#[derive(clap::Args)]
struct PoolArgs {
    /// Chain name or id (polygon, mumbai, celo, alfajores, 80001, ...)
    #[arg(long, value_parser = parse_chain)]
    chain: u64,

    /// Pool name (HumaCreditLineV2, ArfCreditPool1, ...)
    #[arg(long)]
    pool: PoolName,

    /// Pool type
    #[arg(long, default_value = "CreditLine")]
    pool_type: PoolType,
}

#[derive(Subcommand)]
enum Commands {
    /// List a user's credit events, newest first
    Events {
        #[command(flatten)]
        pool: PoolArgs,

        /// User address
        #[arg(long)]
        user: Address,

        /// Event codes to include (0 deposit, 2 drawdown, 3 receivable drawdown, ...)
        #[arg(long = "kind", required = true)]
        kinds: Vec<u8>,
    },

    /// Amount of the user's most recent receivable-backed drawdown
    LastFactorized {
        #[command(flatten)]
        pool: PoolArgs,

        #[arg(long)]
        user: Address,
    },

    /// List receivables owned by a user
    Receivables {
        #[command(flatten)]
        pool: PoolArgs,

        #[arg(long)]
        user: Address,

        /// Page size
        #[arg(long)]
        first: Option<u32>,

        /// Rows to skip
        #[arg(long)]
        skip: Option<u32>,

        #[arg(long, default_value = "tokenId")]
        order_by: String,

        /// Sort ascending instead of descending
        #[arg(long)]
        asc: bool,
    },

    /// Aggregate subgraph stats for a pool address
    PoolStats {
        #[arg(long, value_parser = parse_chain)]
        chain: u64,

        #[arg(long)]
        pool_address: String,
    },

    /// Whether a user has borrowed from or lent to a pool
    History {
        #[arg(long, value_parser = parse_chain)]
        chain: u64,

        #[arg(long)]
        pool_address: String,

        #[arg(long)]
        user: String,
    },

    /// On-chain pool state, optionally with a lender's tranche position
    Overview {
        #[command(flatten)]
        pool: PoolArgs,

        /// Lender address to report a position for
        #[arg(long)]
        lender: Option<Address>,

        /// Tranche of the lender position
        #[arg(long, default_value = "senior", value_parser = parse_tranche)]
        tranche: TrancheKind,

        /// Also report the lender's stake in a first loss cover (borrower, affiliate)
        #[arg(long, value_parser = parse_cover)]
        cover: Option<FirstLossCoverIndex>,
    },

    /// Token id registered for a receivable reference
    TokenId {
        #[command(flatten)]
        pool: PoolArgs,

        #[arg(long)]
        reference_id: String,

        /// Creator address (defaults to the PRIVATE_KEY wallet)
        #[arg(long)]
        creator: Option<Address>,
    },

    /// Whether a receivable reference has been minted
    ReferenceExists {
        #[command(flatten)]
        pool: PoolArgs,

        #[arg(long)]
        reference_id: String,

        /// Creator address (defaults to the PRIVATE_KEY wallet)
        #[arg(long)]
        creator: Option<Address>,
    },

    /// Approve the pool's credit contract to transfer a receivable
    Approve {
        #[command(flatten)]
        pool: PoolArgs,

        /// Receivable token id (decimal or 0x hex)
        #[arg(long)]
        token_id: String,

        #[arg(long)]
        gas_limit: Option<u64>,

        /// Wait for the transaction receipt
        #[arg(long)]
        wait: bool,
    },

    /// List registered pools
    Pools {
        /// Restrict to one chain
        #[arg(long, value_parser = parse_chain)]
        chain: Option<u64>,
    },

    /// Show current configuration
    Config,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present (ignore if not found)
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    // Logs go to stderr so stdout stays machine readable
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };

    tracing_subscriber::registry()
        .with(cli.json_logs.then(|| fmt::layer().json().with_writer(std::io::stderr)))
        .with((!cli.json_logs).then(|| fmt::layer().with_writer(std::io::stderr)))
        .with(filter)
        .init();

    let config = match cli.config {
        Some(path) => Config::from_file(path)?,
        None => Config::default(),
    };

    match cli.command {
        Commands::Events { pool, user, kinds } => {
            let kinds: Vec<CreditEventKind> =
                kinds.into_iter().map(CreditEventKind::from_code).collect();
            let events = SubgraphService::from_config(&config)
                .credit_events_for_user(user, pool.chain, pool.pool, pool.pool_type, &kinds)
                .await?;
            print_json(&events)?;
        }
        Commands::LastFactorized { pool, user } => {
            let amount = SubgraphService::from_config(&config)
                .last_factorized_amount(user, pool.chain, pool.pool, pool.pool_type)
                .await?;
            print_json(&json!({ "amount": amount.map(|a| a.to_string()) }))?;
        }
        Commands::Receivables {
            pool,
            user,
            first,
            skip,
            order_by,
            asc,
        } => {
            let mut pagination = Pagination {
                first,
                skip,
                order_by,
                ..Pagination::default()
            };
            if asc {
                pagination.order_direction = huma_sdk::subgraph::OrderDirection::Asc;
            }
            let receivables = SubgraphService::from_config(&config)
                .receivables_for_user(user, pool.chain, pool.pool, pool.pool_type, &pagination)
                .await?;
            print_json(&receivables)?;
        }
        Commands::PoolStats {
            chain,
            pool_address,
        } => {
            let stats = SubgraphService::from_config(&config)
                .pool_stats(chain, &pool_address)
                .await?;
            print_json(&stats)?;
        }
        Commands::History {
            chain,
            pool_address,
            user,
        } => {
            let history = SubgraphService::from_config(&config)
                .borrow_and_lend_history(chain, &pool_address, &user)
                .await?;
            print_json(&history)?;
        }
        Commands::Overview {
            pool,
            lender,
            tranche,
            cover,
        } => {
            run_overview(&config, pool, lender, tranche, cover).await?;
        }
        Commands::TokenId {
            pool,
            reference_id,
            creator,
        } => {
            let provider = provider_for(&config, pool.chain)?;
            let creator = creator_or_wallet(creator)?;
            let token_id = ReceivableHelper::new(&config.pools)
                .resolve_token_id(&reference_id, creator, pool.pool, &provider)
                .await?;
            print_json(&json!({ "tokenId": token_id.to_string() }))?;
        }
        Commands::ReferenceExists {
            pool,
            reference_id,
            creator,
        } => {
            let provider = provider_for(&config, pool.chain)?;
            let creator = creator_or_wallet(creator)?;
            let exists = ReceivableHelper::new(&config.pools)
                .reference_exists(&reference_id, creator, pool.pool, &provider)
                .await?;
            print_json(&json!({ "exists": exists }))?;
        }
        Commands::Approve {
            pool,
            token_id,
            gas_limit,
            wait,
        } => {
            run_approve(&config, pool, &token_id, gas_limit, wait).await?;
        }
        Commands::Pools { chain } => {
            let pools: Vec<_> = config
                .pools
                .pools()
                .iter()
                .filter(|p| chain.map_or(true, |c| p.chain_id == c))
                .collect();
            print_json(&pools)?;
        }
        Commands::Config => {
            let rpc = config.rpc();
            let rpc_chains: Vec<_> = [
                chains::POLYGON,
                chains::MUMBAI,
                chains::CELO,
                chains::ALFAJORES,
                chains::LOCALHOST,
            ]
            .into_iter()
            .filter(|c| rpc.has_chain(*c))
            .collect();
            print_json(&json!({
                "subgraphs": config.subgraphs,
                "pools": config.pools,
                "rpcChains": rpc_chains,
            }))?;
        }
    }

    Ok(())
}

async fn run_overview(
    config: &Config,
    pool: PoolArgs,
    lender: Option<Address>,
    tranche: TrancheKind,
    cover: Option<FirstLossCoverIndex>,
) -> Result<()> {
    let provider = provider_for(config, pool.chain)?;
    let helper = PoolHelper::new(&config.pools);

    let overview = helper.pool_overview(pool.pool, &provider).await?;
    let position = match lender {
        Some(lender) => Some(
            helper
                .lender_position(pool.pool, tranche, lender, &provider)
                .await?,
        ),
        None => None,
    };
    let cover_position = match (lender, cover) {
        (Some(lender), Some(index)) => Some(
            helper
                .first_loss_cover_position(pool.pool, index, lender, &provider)
                .await?,
        ),
        _ => None,
    };

    print_json(&json!({
        "pool": overview,
        "position": position,
        "firstLossCover": cover_position,
    }))
}

async fn run_approve(
    config: &Config,
    pool: PoolArgs,
    token_id: &str,
    gas_limit: Option<u64>,
    wait: bool,
) -> Result<()> {
    let token_id: U256 = token_id
        .parse()
        .map_err(|e| Error::InvalidArgument(format!("Invalid token id {}: {}", token_id, e)))?;
    let rpc_url = config
        .rpc()
        .get(pool.chain)
        .map(str::to_string)
        .ok_or_else(|| Error::Config(format!("No RPC URL for chain {}", pool.chain)))?;

    let wallet = SecureWallet::from_env(PRIVATE_KEY_ENV)?;
    tracing::info!(address = %wallet.address(), "Loaded wallet from {}", PRIVATE_KEY_ENV);
    let signer = wallet.connect(&rpc_url)?;

    let gas = GasOptions {
        gas_limit,
        ..GasOptions::default()
    };
    let pending = ReceivableHelper::new(&config.pools)
        .ensure_transfer_approval(&signer, pool.pool, token_id, gas)
        .await?;

    let Some(pending) = pending else {
        return print_json(&json!({ "submitted": false }));
    };
    let tx_hash = *pending.tx_hash();

    if !wait {
        return print_json(&json!({ "submitted": true, "txHash": tx_hash }));
    }

    let receipt = pending
        .get_receipt()
        .await
        .map_err(|e| Error::Transaction(e.to_string()))?;
    print_json(&json!({
        "submitted": true,
        "txHash": tx_hash,
        "status": receipt.status(),
        "blockNumber": receipt.block_number,
    }))
}

fn provider_for(config: &Config, chain_id: u64) -> Result<DynProvider> {
    let rpc = config.rpc();
    let url = rpc
        .get(chain_id)
        .ok_or_else(|| Error::Config(format!("No RPC URL for chain {}", chain_id)))?;
    read_only_provider(url)
}

fn creator_or_wallet(creator: Option<Address>) -> Result<Address> {
    match creator {
        Some(address) => Ok(address),
        None => Ok(SecureWallet::from_env(PRIVATE_KEY_ENV)?.address()),
    }
}

fn parse_chain(value: &str) -> std::result::Result<u64, String> {
    chains::parse(value).ok_or_else(|| format!("unknown chain: {}", value))
}

fn parse_tranche(value: &str) -> std::result::Result<TrancheKind, String> {
    match value.to_lowercase().as_str() {
        "senior" => Ok(TrancheKind::Senior),
        "junior" => Ok(TrancheKind::Junior),
        other => Err(format!("unknown tranche: {}", other)),
    }
}

fn parse_cover(value: &str) -> std::result::Result<FirstLossCoverIndex, String> {
    match value.to_lowercase().as_str() {
        "borrower" => Ok(FirstLossCoverIndex::Borrower),
        "affiliate" => Ok(FirstLossCoverIndex::Affiliate),
        other => Err(format!("unknown first loss cover: {}", other)),
    }
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
