//! Configuration for the Huma SDK

pub mod rpc;

use crate::pools::PoolRegistry;
use crate::{Error, Result};
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::HashMap;
use std::path::Path;
use url::Url;

pub use rpc::RpcConfig;

/// Prefix of the per-chain subgraph override variables (`HUMA_SUBGRAPH_URL_<CHAIN_ID>`)
pub const SUBGRAPH_URL_ENV_PREFIX: &str = "HUMA_SUBGRAPH_URL_";

/// Environment variable holding the signer's private key
pub const PRIVATE_KEY_ENV: &str = "PRIVATE_KEY";

/// Hosted Huma subgraph endpoints
pub mod subgraph_urls {
    pub const POLYGON: &str = "https://api.thegraph.com/subgraphs/name/00labs/huma-polygon";
    pub const MUMBAI: &str = "https://api.thegraph.com/subgraphs/name/00labs/huma-mumbai";
    pub const CELO: &str = "https://api.thegraph.com/subgraphs/name/00labs/huma-celo";
    pub const ALFAJORES: &str = "https://api.thegraph.com/subgraphs/name/00labs/huma-alfajores";
}

/// Subgraph endpoint per chain ID
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubgraphEndpoints {
    pub endpoints: HashMap<u64, Url>,
}

impl SubgraphEndpoints {
    /// No chain configured
    pub fn empty() -> Self {
        Self {
            endpoints: HashMap::new(),
        }
    }

    /// Add or replace the endpoint for a chain
    pub fn with_endpoint(mut self, chain_id: u64, url: Url) -> Self {
        self.endpoints.insert(chain_id, url);
        self
    }

    /// Hosted endpoints plus `HUMA_SUBGRAPH_URL_<CHAIN_ID>` overrides
    pub fn from_env() -> Self {
        let mut endpoints = Self::hosted();
        for (key, value) in std::env::vars() {
            let Some(chain) = key.strip_prefix(SUBGRAPH_URL_ENV_PREFIX) else {
                continue;
            };
            match (chain.parse::<u64>(), value.parse::<Url>()) {
                (Ok(chain_id), Ok(url)) => {
                    tracing::debug!(chain_id, %url, "Using subgraph override from {}", key);
                    endpoints.endpoints.insert(chain_id, url);
                }
                _ => tracing::warn!("Ignoring malformed subgraph override {}", key),
            }
        }
        endpoints
    }

    fn hosted() -> Self {
        use rpc::chains;

        let mut endpoints = HashMap::new();
        for (chain_id, url) in [
            (chains::POLYGON, subgraph_urls::POLYGON),
            (chains::MUMBAI, subgraph_urls::MUMBAI),
            (chains::CELO, subgraph_urls::CELO),
            (chains::ALFAJORES, subgraph_urls::ALFAJORES),
        ] {
            if let Ok(url) = url.parse() {
                endpoints.insert(chain_id, url);
            }
        }
        Self { endpoints }
    }

    /// Layer explicit endpoints over the current ones
    pub fn merge(mut self, overrides: &SubgraphEndpoints) -> Self {
        for (chain_id, url) in &overrides.endpoints {
            self.endpoints.insert(*chain_id, url.clone());
        }
        self
    }

    /// Endpoint for a chain, if one is configured
    pub fn get(&self, chain_id: u64) -> Option<&Url> {
        self.endpoints.get(&chain_id)
    }
}

impl Default for SubgraphEndpoints {
    fn default() -> Self {
        Self::from_env()
    }
}

/// Main configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Subgraph endpoints; file entries override the environment per chain
    #[serde(default, deserialize_with = "endpoints_over_env")]
    pub subgraphs: SubgraphEndpoints,
    /// Pool metadata
    #[serde(default)]
    pub pools: PoolRegistry,
    /// RPC URL overrides layered over the environment
    #[serde(default)]
    pub rpc_urls: HashMap<u64, String>,
}

impl Config {
    /// Load configuration from a JSON file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("Failed to read {}: {}", path.display(), e)))?;
        serde_json::from_str(&content)
            .map_err(|e| Error::Config(format!("Invalid config {}: {}", path.display(), e)))
    }

    /// RPC configuration with this config's overrides applied
    pub fn rpc(&self) -> RpcConfig {
        RpcConfig::from_env().merge(&self.rpc_urls)
    }
}

fn endpoints_over_env<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> std::result::Result<SubgraphEndpoints, D::Error> {
    let overrides = SubgraphEndpoints::deserialize(deserializer)?;
    Ok(SubgraphEndpoints::from_env().merge(&overrides))
}

impl Default for Config {
    fn default() -> Self {
        Self {
            subgraphs: SubgraphEndpoints::default(),
            pools: PoolRegistry::default(),
            rpc_urls: HashMap::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pools::PoolName;
    use std::io::Write;

    #[test]
    fn test_hosted_endpoints() {
        let endpoints = SubgraphEndpoints::hosted();
        assert_eq!(
            endpoints.get(rpc::chains::MUMBAI).map(Url::as_str),
            Some(subgraph_urls::MUMBAI)
        );
        assert!(endpoints.get(rpc::chains::LOCALHOST).is_none());
    }

    #[test]
    fn test_config_from_file_defaults_missing_sections() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{
                "subgraphs": {{ "endpoints": {{ "31337": "http://localhost:8000/subgraphs/name/huma" }} }},
                "rpc_urls": {{ "31337": "http://localhost:8545" }}
            }}"#
        )
        .unwrap();

        let config = Config::from_file(file.path()).unwrap();
        assert_eq!(
            config.subgraphs.get(31337).map(Url::as_str),
            Some("http://localhost:8000/subgraphs/name/huma")
        );
        assert_eq!(config.rpc().get(31337), Some("http://localhost:8545"));
        assert_eq!(
            config.pools.chain_pool_names(rpc::chains::MUMBAI),
            vec![PoolName::HumaCreditLineV2]
        );
    }

    #[test]
    fn test_file_endpoints_keep_hosted_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{ "subgraphs": {{ "endpoints": {{ "31337": "http://localhost:8000/subgraphs/name/huma" }} }} }}"#
        )
        .unwrap();

        let config = Config::from_file(file.path()).unwrap();
        let defaults = SubgraphEndpoints::from_env();
        assert!(config.subgraphs.get(31337).is_some());
        for chain in [
            rpc::chains::POLYGON,
            rpc::chains::MUMBAI,
            rpc::chains::CELO,
            rpc::chains::ALFAJORES,
        ] {
            assert!(config.subgraphs.get(chain).is_some());
            assert_eq!(config.subgraphs.get(chain), defaults.get(chain));
        }
    }

    #[test]
    fn test_file_endpoint_replaces_hosted_one() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{ "subgraphs": {{ "endpoints": {{ "80001": "https://indexer.example/mumbai" }} }} }}"#
        )
        .unwrap();

        let config = Config::from_file(file.path()).unwrap();
        assert_eq!(
            config.subgraphs.get(rpc::chains::MUMBAI).map(Url::as_str),
            Some("https://indexer.example/mumbai")
        );
    }

    #[test]
    fn test_config_from_file_rejects_garbage() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "not json").unwrap();

        let err = Config::from_file(file.path()).unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn test_config_from_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = Config::from_file(dir.path().join("missing.json")).unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }
}
