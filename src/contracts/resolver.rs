//! Contract resolution
//!
//! Turns a pool name plus a chain handle into bound contract instances. The
//! PoolConfig address comes from the registry; everything it points at is read
//! from chain on every call.

use super::bindings::{
    IFirstLossCover, IFirstLossCoverInstance, IPool, IPoolConfig, IPoolConfigInstance,
    IPoolCredit, IPoolCreditInstance, IPoolInstance, IReceivable, IReceivableInstance,
    ITrancheVault, ITrancheVaultInstance,
};
use crate::pools::{PoolInfo, PoolName, PoolRegistry};
use crate::wallet::ChainAccess;
use crate::{Error, Result};
use alloy::primitives::{Address, U256};
use alloy::providers::Provider;
use serde::{Deserialize, Serialize};

/// Tranche of a V2 pool
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TrancheKind {
    Senior,
    Junior,
}

impl TrancheKind {
    /// Index used by `Pool.trancheTotalAssets`
    pub fn index(&self) -> u8 {
        match self {
            TrancheKind::Senior => 0,
            TrancheKind::Junior => 1,
        }
    }
}

/// Slot of a first loss cover in the PoolConfig
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FirstLossCoverIndex {
    Borrower,
    Affiliate,
}

impl FirstLossCoverIndex {
    pub fn index(&self) -> u8 {
        match self {
            FirstLossCoverIndex::Borrower => 0,
            FirstLossCoverIndex::Affiliate => 1,
        }
    }
}

/// Resolves bound contract handles for registered pools
#[derive(Debug, Clone, Copy)]
pub struct ContractResolver<'r> {
    registry: &'r PoolRegistry,
}

impl<'r> ContractResolver<'r> {
    pub fn new(registry: &'r PoolRegistry) -> Self {
        Self { registry }
    }

    pub fn registry(&self) -> &'r PoolRegistry {
        self.registry
    }

    /// V2 metadata for `pool_name` on the provider's chain
    pub async fn pool_info<P: Provider>(
        &self,
        pool_name: PoolName,
        provider: &P,
    ) -> Result<&'r PoolInfo> {
        let chain_id = provider.get_chain_id().await?;
        self.registry.v2_pool(chain_id, pool_name).ok_or_else(|| {
            Error::NotFound(format!(
                "No V2 pool {} registered on chain {}",
                pool_name, chain_id
            ))
        })
    }

    /// PoolConfig contract of a pool
    pub async fn pool_config_contract<P: Provider + Clone>(
        &self,
        pool_name: PoolName,
        provider: &P,
    ) -> Result<IPoolConfigInstance<P>> {
        let info = self.pool_info(pool_name, provider).await?;
        let address = info.pool_config.ok_or_else(|| {
            Error::NotFound(format!("Could not find PoolConfig contract for {}", pool_name))
        })?;

        Ok(IPoolConfig::new(address, provider.clone()))
    }

    /// Receivable contract referenced by the pool's `receivableAsset()`
    ///
    /// The handle is bound to `access` as given, so a signer stays able to
    /// submit transactions through it.
    pub async fn receivable_contract<P: Provider + Clone>(
        &self,
        pool_name: PoolName,
        access: &ChainAccess<P>,
    ) -> Result<IReceivableInstance<P>> {
        let config = self
            .pool_config_contract(pool_name, access.read_provider())
            .await?;
        let asset = config.receivableAsset().call().await?;
        let asset = non_zero(asset, "Receivable", pool_name)?;

        tracing::debug!(pool = %pool_name, receivable = %asset, "Resolved Receivable contract");
        Ok(IReceivable::new(asset, access.read_provider().clone()))
    }

    /// Credit contract referenced by the pool's `poolCredit()`
    pub async fn pool_credit_contract<P: Provider + Clone>(
        &self,
        pool_name: PoolName,
        access: &ChainAccess<P>,
    ) -> Result<IPoolCreditInstance<P>> {
        let config = self
            .pool_config_contract(pool_name, access.read_provider())
            .await?;
        let credit = config.poolCredit().call().await?;
        let credit = non_zero(credit, "PoolCredit", pool_name)?;

        tracing::debug!(pool = %pool_name, credit = %credit, "Resolved PoolCredit contract");
        Ok(IPoolCredit::new(credit, access.read_provider().clone()))
    }

    /// Pool contract at the registered pool address
    pub async fn pool_contract<P: Provider + Clone>(
        &self,
        pool_name: PoolName,
        access: &ChainAccess<P>,
    ) -> Result<IPoolInstance<P>> {
        let info = self.pool_info(pool_name, access.read_provider()).await?;
        Ok(IPool::new(info.pool, access.read_provider().clone()))
    }

    /// Senior or junior tranche vault of a pool
    pub async fn tranche_vault_contract<P: Provider + Clone>(
        &self,
        pool_name: PoolName,
        tranche: TrancheKind,
        access: &ChainAccess<P>,
    ) -> Result<ITrancheVaultInstance<P>> {
        let info = self.pool_info(pool_name, access.read_provider()).await?;
        let vault = match tranche {
            TrancheKind::Senior => info.senior_tranche_vault,
            TrancheKind::Junior => info.junior_tranche_vault,
        }
        .ok_or_else(|| {
            Error::NotFound(format!(
                "Could not find {:?} tranche vault for {}",
                tranche, pool_name
            ))
        })?;

        Ok(ITrancheVault::new(vault, access.read_provider().clone()))
    }

    /// First loss cover registered in the pool's config
    pub async fn first_loss_cover_contract<P: Provider + Clone>(
        &self,
        pool_name: PoolName,
        index: FirstLossCoverIndex,
        access: &ChainAccess<P>,
    ) -> Result<IFirstLossCoverInstance<P>> {
        let config = self
            .pool_config_contract(pool_name, access.read_provider())
            .await?;
        let cover = config
            .getFirstLossCover(U256::from(index.index()))
            .call()
            .await?;
        let cover = non_zero(cover, "FirstLossCover", pool_name)?;

        Ok(IFirstLossCover::new(cover, access.read_provider().clone()))
    }
}

fn non_zero(address: Address, contract: &str, pool_name: PoolName) -> Result<Address> {
    if address.is_zero() {
        return Err(Error::NotFound(format!(
            "Could not find {} contract for {}",
            contract, pool_name
        )));
    }
    Ok(address)
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::config::rpc::chains;
    use crate::pools::deployments;
    use alloy::primitives::{address, Bytes, B256, U64};
    use alloy::providers::{DynProvider, ProviderBuilder};
    use alloy::transports::mock::Asserter;
    use tokio_test::assert_ok;

    pub(crate) const RECEIVABLE: Address = address!("5555555555555555555555555555555555555555");
    pub(crate) const POOL_CREDIT: Address = address!("6666666666666666666666666666666666666666");

    pub(crate) fn mocked_provider() -> (Asserter, DynProvider) {
        let asserter = Asserter::new();
        let provider = ProviderBuilder::new()
            .disable_recommended_fillers()
            .connect_mocked_client(asserter.clone())
            .erased();
        (asserter, provider)
    }

    pub(crate) fn push_chain_id(asserter: &Asserter, chain_id: u64) {
        asserter.push_success(&U64::from(chain_id));
    }

    pub(crate) fn push_address(asserter: &Asserter, address: Address) {
        asserter.push_success(&Bytes::from(address.into_word().to_vec()));
    }

    pub(crate) fn push_word(asserter: &Asserter, word: B256) {
        asserter.push_success(&Bytes::from(word.to_vec()));
    }

    pub(crate) fn push_uint(asserter: &Asserter, value: U256) {
        asserter.push_success(&Bytes::from(value.to_be_bytes::<32>().to_vec()));
    }

    #[tokio::test]
    async fn test_unknown_chain_is_not_found() {
        let registry = PoolRegistry::builtin();
        let resolver = ContractResolver::new(&registry);
        let (asserter, provider) = mocked_provider();
        push_chain_id(&asserter, chains::CELO);

        let err = resolver
            .receivable_contract(PoolName::HumaCreditLineV2, &ChainAccess::Provider(provider))
            .await
            .err()
            .expect("resolution should fail");
        assert!(matches!(err, Error::NotFound(_)));
    }

    #[tokio::test]
    async fn test_unregistered_pool_is_not_found() {
        let registry = PoolRegistry::builtin();
        let resolver = ContractResolver::new(&registry);
        let (asserter, provider) = mocked_provider();
        push_chain_id(&asserter, chains::MUMBAI);

        let err = resolver
            .pool_config_contract(PoolName::Jia, &provider)
            .await
            .err()
            .expect("resolution should fail");
        assert!(matches!(err, Error::NotFound(_)));
    }

    #[tokio::test]
    async fn test_receivable_contract_reads_receivable_asset() {
        let registry = PoolRegistry::builtin();
        let resolver = ContractResolver::new(&registry);
        let (asserter, provider) = mocked_provider();
        push_chain_id(&asserter, chains::MUMBAI);
        push_address(&asserter, RECEIVABLE);

        let receivable = assert_ok!(
            resolver
                .receivable_contract(PoolName::HumaCreditLineV2, &ChainAccess::Provider(provider))
                .await
        );
        assert_eq!(*receivable.address(), RECEIVABLE);
    }

    #[tokio::test]
    async fn test_zero_receivable_asset_is_not_found() {
        let registry = PoolRegistry::builtin();
        let resolver = ContractResolver::new(&registry);
        let (asserter, provider) = mocked_provider();
        push_chain_id(&asserter, chains::MUMBAI);
        push_address(&asserter, Address::ZERO);

        let err = resolver
            .receivable_contract(PoolName::HumaCreditLineV2, &ChainAccess::Provider(provider))
            .await
            .err()
            .expect("resolution should fail");
        assert!(matches!(err, Error::NotFound(_)));
    }

    #[tokio::test]
    async fn test_tranche_vaults_come_from_registry() {
        let registry = PoolRegistry::builtin();
        let resolver = ContractResolver::new(&registry);
        let (asserter, provider) = mocked_provider();
        let access = ChainAccess::Provider(provider);

        push_chain_id(&asserter, chains::MUMBAI);
        let senior = assert_ok!(
            resolver
                .tranche_vault_contract(PoolName::HumaCreditLineV2, TrancheKind::Senior, &access)
                .await
        );
        assert_eq!(*senior.address(), deployments::MUMBAI_CREDIT_LINE_V2_SENIOR_VAULT);

        push_chain_id(&asserter, chains::MUMBAI);
        let junior = assert_ok!(
            resolver
                .tranche_vault_contract(PoolName::HumaCreditLineV2, TrancheKind::Junior, &access)
                .await
        );
        assert_eq!(*junior.address(), deployments::MUMBAI_CREDIT_LINE_V2_JUNIOR_VAULT);
    }

    #[tokio::test]
    async fn test_first_loss_cover_lookup() {
        let registry = PoolRegistry::builtin();
        let resolver = ContractResolver::new(&registry);
        let (asserter, provider) = mocked_provider();
        let cover = address!("7777777777777777777777777777777777777777");
        push_chain_id(&asserter, chains::MUMBAI);
        push_address(&asserter, cover);

        let contract = assert_ok!(
            resolver
                .first_loss_cover_contract(
                    PoolName::HumaCreditLineV2,
                    FirstLossCoverIndex::Affiliate,
                    &ChainAccess::Provider(provider),
                )
                .await
        );
        assert_eq!(*contract.address(), cover);
    }
}
