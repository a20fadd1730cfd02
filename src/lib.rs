//! Huma Finance SDK
//!
//! Client library for the Huma credit-pool protocol:
//! - Resolve `(chain, pool)` to bound contract handles
//! - Look up and approve tokenized receivables
//! - Query the per-chain Huma subgraphs for events, receivables and pool stats
//!
//! # Security Model
//!
//! - Private keys live only in [`wallet::SecureWallet`] and are never logged
//! - Subgraph input travels as GraphQL variables, never as query text
//! - Pool metadata is an injected, read-only [`PoolRegistry`]

pub mod config;
pub mod contracts;
pub mod pools;
pub mod subgraph;
pub mod wallet;

mod error;

// Re-export commonly used types
pub use config::{Config, RpcConfig, SubgraphEndpoints};
pub use contracts::{ContractResolver, GasOptions, PoolHelper, ReceivableHelper};
pub use error::{Error, Result};
pub use pools::{PoolInfo, PoolName, PoolRegistry, PoolType, PoolVersion};
pub use subgraph::{CreditEventKind, Pagination, SubgraphService};
