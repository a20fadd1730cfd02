//! RPC endpoint configuration
//!
//! Resolution order per chain:
//! 1. Per-chain env vars (POLYGON_RPC_URL, MUMBAI_RPC_URL, ...) - highest priority
//! 2. ALCHEMY_API_KEY - builds URLs for the chains Alchemy serves
//! 3. Public RPC fallbacks - for testing only
//!
//! # Examples
//!
//! ```bash
//! export POLYGON_RPC_URL="https://polygon-mainnet.g.alchemy.com/v2/YOUR_KEY"
//! export ALCHEMY_API_KEY="YOUR_KEY"
//! ```

use std::collections::HashMap;

/// RPC configuration for multiple chains
#[derive(Debug, Clone)]
pub struct RpcConfig {
    /// RPC URLs indexed by chain ID
    urls: HashMap<u64, String>,
}

/// Chain ID constants for the networks Huma is deployed on
pub mod chains {
    pub const POLYGON: u64 = 137;
    pub const MUMBAI: u64 = 80001;
    pub const CELO: u64 = 42220;
    pub const ALFAJORES: u64 = 44787;
    pub const LOCALHOST: u64 = 31337;

    /// Human readable chain name
    pub fn name(chain_id: u64) -> Option<&'static str> {
        match chain_id {
            POLYGON => Some("polygon"),
            MUMBAI => Some("mumbai"),
            CELO => Some("celo"),
            ALFAJORES => Some("alfajores"),
            LOCALHOST => Some("localhost"),
            _ => None,
        }
    }

    /// Parse a chain name or numeric id
    pub fn parse(network: &str) -> Option<u64> {
        match network.to_lowercase().as_str() {
            "polygon" | "matic" => Some(POLYGON),
            "mumbai" => Some(MUMBAI),
            "celo" => Some(CELO),
            "alfajores" => Some(ALFAJORES),
            "localhost" | "hardhat" => Some(LOCALHOST),
            other => other.parse().ok(),
        }
    }
}

/// Environment variable names
mod env_vars {
    pub const POLYGON_RPC_URL: &str = "POLYGON_RPC_URL";
    pub const MUMBAI_RPC_URL: &str = "MUMBAI_RPC_URL";
    pub const CELO_RPC_URL: &str = "CELO_RPC_URL";
    pub const ALFAJORES_RPC_URL: &str = "ALFAJORES_RPC_URL";
    pub const LOCALHOST_RPC_URL: &str = "LOCALHOST_RPC_URL";

    pub const ALCHEMY_API_KEY: &str = "ALCHEMY_API_KEY";
}

/// Public RPC endpoints (rate limited, for testing only)
mod public_rpcs {
    pub const POLYGON: &str = "https://polygon-rpc.com";
    pub const MUMBAI: &str = "https://rpc-mumbai.maticvigil.com";
    pub const CELO: &str = "https://forno.celo.org";
    pub const ALFAJORES: &str = "https://alfajores-forno.celo-testnet.org";
    pub const LOCALHOST: &str = "http://127.0.0.1:8545";
}

impl RpcConfig {
    /// Create RPC config from environment variables
    pub fn from_env() -> Self {
        let mut urls = HashMap::new();

        let per_chain = [
            (chains::POLYGON, env_vars::POLYGON_RPC_URL),
            (chains::MUMBAI, env_vars::MUMBAI_RPC_URL),
            (chains::CELO, env_vars::CELO_RPC_URL),
            (chains::ALFAJORES, env_vars::ALFAJORES_RPC_URL),
            (chains::LOCALHOST, env_vars::LOCALHOST_RPC_URL),
        ];
        for (chain_id, var) in per_chain {
            if let Ok(url) = std::env::var(var) {
                tracing::debug!(chain_id, "Using {} for RPC", var);
                urls.insert(chain_id, url);
            }
        }

        // Alchemy only serves the Polygon networks among ours
        if let Ok(key) = std::env::var(env_vars::ALCHEMY_API_KEY) {
            if !urls.contains_key(&chains::POLYGON) || !urls.contains_key(&chains::MUMBAI) {
                tracing::info!("Building Polygon RPC URLs from ALCHEMY_API_KEY");
            }
            urls.entry(chains::POLYGON)
                .or_insert_with(|| format!("https://polygon-mainnet.g.alchemy.com/v2/{}", key));
            urls.entry(chains::MUMBAI)
                .or_insert_with(|| format!("https://polygon-mumbai.g.alchemy.com/v2/{}", key));
        }

        if !urls.contains_key(&chains::POLYGON) {
            tracing::warn!("No RPC configured for Polygon, using public RPC (rate limited)");
        }
        urls.entry(chains::POLYGON)
            .or_insert_with(|| public_rpcs::POLYGON.to_string());
        urls.entry(chains::MUMBAI)
            .or_insert_with(|| public_rpcs::MUMBAI.to_string());
        urls.entry(chains::CELO)
            .or_insert_with(|| public_rpcs::CELO.to_string());
        urls.entry(chains::ALFAJORES)
            .or_insert_with(|| public_rpcs::ALFAJORES.to_string());
        urls.entry(chains::LOCALHOST)
            .or_insert_with(|| public_rpcs::LOCALHOST.to_string());

        Self { urls }
    }

    /// Create with explicit RPC URLs
    pub fn with_urls(urls: HashMap<u64, String>) -> Self {
        Self { urls }
    }

    /// Layer explicit URLs over the current ones
    pub fn merge(mut self, overrides: &HashMap<u64, String>) -> Self {
        for (chain_id, url) in overrides {
            self.urls.insert(*chain_id, url.clone());
        }
        self
    }

    /// Get RPC URL for a chain
    pub fn get(&self, chain_id: u64) -> Option<&str> {
        self.urls.get(&chain_id).map(|s| s.as_str())
    }

    /// Check if a chain is configured
    pub fn has_chain(&self, chain_id: u64) -> bool {
        self.urls.contains_key(&chain_id)
    }
}

impl Default for RpcConfig {
    fn default() -> Self {
        Self::from_env()
    }
}
