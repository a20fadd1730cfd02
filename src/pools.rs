//! Pool metadata registry
//!
//! Static per-chain pool metadata (addresses, versions, tranche vaults). The
//! registry is handed to the contract resolver and the subgraph service at
//! construction time and is never mutated afterwards.

use crate::config::rpc::chains;
use crate::{Error, Result};
use alloy::primitives::{address, Address};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Known Huma pools
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PoolName {
    HumaCreditLine,
    RequestNetwork,
    Superfluid,
    Jia,
    ArfCreditPool1,
    HumaCreditLineV2,
}

impl PoolName {
    pub const ALL: [PoolName; 6] = [
        PoolName::HumaCreditLine,
        PoolName::RequestNetwork,
        PoolName::Superfluid,
        PoolName::Jia,
        PoolName::ArfCreditPool1,
        PoolName::HumaCreditLineV2,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            PoolName::HumaCreditLine => "HumaCreditLine",
            PoolName::RequestNetwork => "RequestNetwork",
            PoolName::Superfluid => "Superfluid",
            PoolName::Jia => "Jia",
            PoolName::ArfCreditPool1 => "ArfCreditPool1",
            PoolName::HumaCreditLineV2 => "HumaCreditLineV2",
        }
    }
}

impl fmt::Display for PoolName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for PoolName {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|name| name.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| Error::InvalidArgument(format!("Unknown pool name: {}", s)))
    }
}

/// Credit product offered by a pool
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PoolType {
    CreditLine,
    Invoice,
    Stream,
}

impl PoolType {
    pub fn name(&self) -> &'static str {
        match self {
            PoolType::CreditLine => "CreditLine",
            PoolType::Invoice => "Invoice",
            PoolType::Stream => "Stream",
        }
    }
}

impl fmt::Display for PoolType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for PoolType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "creditline" | "credit_line" => Ok(PoolType::CreditLine),
            "invoice" => Ok(PoolType::Invoice),
            "stream" => Ok(PoolType::Stream),
            _ => Err(Error::InvalidArgument(format!(
                "Unknown pool type: {}. Supported: CreditLine, Invoice, Stream",
                s
            ))),
        }
    }
}

/// Protocol generation a pool was deployed with
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PoolVersion {
    V1,
    V2,
}

/// Underlying asset of a pool
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnderlyingToken {
    pub address: Address,
    pub symbol: String,
    pub decimals: u8,
}

/// Metadata for a single deployed pool
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PoolInfo {
    pub chain_id: u64,
    pub pool_name: PoolName,
    pub pool_type: PoolType,
    pub version: PoolVersion,
    pub pool: Address,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pool_config: Option<Address>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pool_safe: Option<Address>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub senior_tranche_vault: Option<Address>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub junior_tranche_vault: Option<Address>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub underlying_token: Option<UnderlyingToken>,
    #[serde(default)]
    pub title: String,
}

/// Published pool deployments
pub mod deployments {
    use super::*;

    // === Mumbai: HumaCreditLineV2 ===
    pub const MUMBAI_CREDIT_LINE_V2_POOL: Address =
        address!("3e638f5a36c885c68f0f05143cbb617affa29e4e");
    pub const MUMBAI_CREDIT_LINE_V2_POOL_CONFIG: Address =
        address!("9dfb193bf5315ce717b5c1426619c43d4098f0a3");
    pub const MUMBAI_CREDIT_LINE_V2_POOL_SAFE: Address =
        address!("d05e4be51758b987b959924d7e8b4cb728c386fd");
    pub const MUMBAI_CREDIT_LINE_V2_SENIOR_VAULT: Address =
        address!("3dc3b427b75672f6738d036f68b3146daa1cafc1");
    pub const MUMBAI_CREDIT_LINE_V2_JUNIOR_VAULT: Address =
        address!("d76d80992b8698d6d8e3ef166c3879a1d8574a90");
}

/// Read-only lookup over pool metadata
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PoolRegistry {
    pools: Vec<PoolInfo>,
}

impl PoolRegistry {
    /// Create a registry from explicit entries
    pub fn with_pools(pools: Vec<PoolInfo>) -> Self {
        Self { pools }
    }

    /// Registry with the published deployments
    pub fn builtin() -> Self {
        use deployments::*;

        Self::with_pools(vec![PoolInfo {
            chain_id: chains::MUMBAI,
            pool_name: PoolName::HumaCreditLineV2,
            pool_type: PoolType::CreditLine,
            version: PoolVersion::V2,
            pool: MUMBAI_CREDIT_LINE_V2_POOL,
            pool_config: Some(MUMBAI_CREDIT_LINE_V2_POOL_CONFIG),
            pool_safe: Some(MUMBAI_CREDIT_LINE_V2_POOL_SAFE),
            senior_tranche_vault: Some(MUMBAI_CREDIT_LINE_V2_SENIOR_VAULT),
            junior_tranche_vault: Some(MUMBAI_CREDIT_LINE_V2_JUNIOR_VAULT),
            underlying_token: None,
            title: "Huma Credit Line V2".to_string(),
        }])
    }

    pub fn pools(&self) -> &[PoolInfo] {
        &self.pools
    }

    /// Entry from the live (V1) pool table
    pub fn live_pool(
        &self,
        chain_id: u64,
        pool_name: PoolName,
        pool_type: PoolType,
    ) -> Option<&PoolInfo> {
        self.pools.iter().find(|p| {
            p.version == PoolVersion::V1
                && p.chain_id == chain_id
                && p.pool_name == pool_name
                && p.pool_type == pool_type
        })
    }

    /// Entry from the versioned V2 table
    pub fn v2_pool(&self, chain_id: u64, pool_name: PoolName) -> Option<&PoolInfo> {
        self.pools.iter().find(|p| {
            p.version == PoolVersion::V2 && p.chain_id == chain_id && p.pool_name == pool_name
        })
    }

    /// Pool address, preferring the live table over the V2 table
    pub fn pool_address(
        &self,
        chain_id: u64,
        pool_name: PoolName,
        pool_type: PoolType,
    ) -> Option<Address> {
        self.live_pool(chain_id, pool_name, pool_type)
            .or_else(|| self.v2_pool(chain_id, pool_name))
            .map(|p| p.pool)
    }

    /// Whether `pool` names a V2 pool on `chain_id`
    ///
    /// Accepts any hex casing; unparseable input is never a V2 pool.
    pub fn is_v2_pool(&self, chain_id: u64, pool: &str) -> bool {
        let Ok(pool) = pool.parse::<Address>() else {
            return false;
        };
        self.pools
            .iter()
            .any(|p| p.version == PoolVersion::V2 && p.chain_id == chain_id && p.pool == pool)
    }

    /// Pool names deployed on a chain, in registry order
    pub fn chain_pool_names(&self, chain_id: u64) -> Vec<PoolName> {
        let mut names = Vec::new();
        for pool in self.pools.iter().filter(|p| p.chain_id == chain_id) {
            if !names.contains(&pool.pool_name) {
                names.push(pool.pool_name);
            }
        }
        names
    }
}

impl Default for PoolRegistry {
    fn default() -> Self {
        Self::builtin()
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    pub(crate) const LIVE_POOL: Address = address!("1111111111111111111111111111111111111111");

    pub(crate) fn registry_with_live_pool() -> PoolRegistry {
        let mut pools = PoolRegistry::builtin().pools().to_vec();
        pools.push(PoolInfo {
            chain_id: chains::POLYGON,
            pool_name: PoolName::ArfCreditPool1,
            pool_type: PoolType::CreditLine,
            version: PoolVersion::V1,
            pool: LIVE_POOL,
            pool_config: None,
            pool_safe: None,
            senior_tranche_vault: None,
            junior_tranche_vault: None,
            underlying_token: None,
            title: "Arf Credit Pool".to_string(),
        });
        PoolRegistry::with_pools(pools)
    }

    #[test]
    fn test_pool_name_parse() {
        assert_eq!(
            "humacreditlinev2".parse::<PoolName>().unwrap(),
            PoolName::HumaCreditLineV2
        );
        assert_eq!("Jia".parse::<PoolName>().unwrap(), PoolName::Jia);
        assert!("NotAPool".parse::<PoolName>().is_err());
    }

    #[test]
    fn test_pool_type_parse() {
        assert_eq!("invoice".parse::<PoolType>().unwrap(), PoolType::Invoice);
        assert_eq!("CreditLine".parse::<PoolType>().unwrap(), PoolType::CreditLine);
        assert!("loan".parse::<PoolType>().is_err());
    }

    #[test]
    fn test_pool_address_prefers_live_table() {
        let registry = registry_with_live_pool();
        assert_eq!(
            registry.pool_address(chains::POLYGON, PoolName::ArfCreditPool1, PoolType::CreditLine),
            Some(LIVE_POOL)
        );
    }

    #[test]
    fn test_pool_address_falls_back_to_v2() {
        let registry = PoolRegistry::builtin();
        assert_eq!(
            registry.pool_address(chains::MUMBAI, PoolName::HumaCreditLineV2, PoolType::CreditLine),
            Some(deployments::MUMBAI_CREDIT_LINE_V2_POOL)
        );
        assert_eq!(
            registry.pool_address(chains::POLYGON, PoolName::HumaCreditLineV2, PoolType::CreditLine),
            None
        );
    }

    #[test]
    fn test_is_v2_pool_ignores_case() {
        let registry = registry_with_live_pool();
        assert!(registry.is_v2_pool(chains::MUMBAI, "0x3E638f5A36C885c68f0F05143cbb617affA29e4e"));
        assert!(registry.is_v2_pool(chains::MUMBAI, "0x3e638f5a36c885c68f0f05143cbb617affa29e4e"));
        assert!(!registry.is_v2_pool(chains::POLYGON, "0x1111111111111111111111111111111111111111"));
        assert!(!registry.is_v2_pool(chains::MUMBAI, "not-an-address"));
    }

    #[test]
    fn test_chain_pool_names() {
        let registry = registry_with_live_pool();
        assert_eq!(
            registry.chain_pool_names(chains::MUMBAI),
            vec![PoolName::HumaCreditLineV2]
        );
        assert!(registry.chain_pool_names(chains::CELO).is_empty());
    }

    #[test]
    fn test_registry_json_roundtrip_shape() {
        let json = serde_json::to_value(PoolRegistry::builtin()).unwrap();
        let first = &json["pools"][0];
        assert_eq!(first["poolName"], "HumaCreditLineV2");
        assert_eq!(first["version"], "v2");
        assert_eq!(first["chainId"], 80001);
    }
}
