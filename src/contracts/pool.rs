//! Pool and tranche reads

use super::resolver::{ContractResolver, FirstLossCoverIndex, TrancheKind};
use crate::pools::{PoolName, PoolRegistry};
use crate::wallet::ChainAccess;
use crate::Result;
use alloy::primitives::{Address, U256};
use alloy::providers::Provider;
use serde::Serialize;

/// Current on-chain state of a pool
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PoolOverview {
    pub pool: Address,
    pub is_on: bool,
    pub total_assets: U256,
    pub senior_assets: U256,
    pub junior_assets: U256,
}

/// A lender's holding in one tranche
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LenderPosition {
    pub tranche: TrancheKind,
    pub shares: U256,
    pub assets: U256,
}

/// A holder's stake in a first loss cover, with the cover's total capital
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FirstLossCoverPosition {
    pub index: FirstLossCoverIndex,
    pub cover: Address,
    pub total_assets: U256,
    pub shares: U256,
    pub assets: U256,
}

#[derive(Debug, Clone, Copy)]
pub struct PoolHelper<'r> {
    resolver: ContractResolver<'r>,
}

impl<'r> PoolHelper<'r> {
    pub fn new(registry: &'r PoolRegistry) -> Self {
        Self {
            resolver: ContractResolver::new(registry),
        }
    }

    pub async fn pool_overview<P: Provider + Clone>(
        &self,
        pool_name: PoolName,
        provider: &P,
    ) -> Result<PoolOverview> {
        let pool = self
            .resolver
            .pool_contract(pool_name, &ChainAccess::Provider(provider.clone()))
            .await?;

        let is_on = pool.isPoolOn().call().await?;
        let total_assets = pool.totalAssets().call().await?;
        let senior_assets = pool
            .trancheTotalAssets(U256::from(TrancheKind::Senior.index()))
            .call()
            .await?;
        let junior_assets = pool
            .trancheTotalAssets(U256::from(TrancheKind::Junior.index()))
            .call()
            .await?;

        Ok(PoolOverview {
            pool: *pool.address(),
            is_on,
            total_assets,
            senior_assets,
            junior_assets,
        })
    }

    /// Shares held by `lender` in a tranche and their current asset value
    pub async fn lender_position<P: Provider + Clone>(
        &self,
        pool_name: PoolName,
        tranche: TrancheKind,
        lender: Address,
        provider: &P,
    ) -> Result<LenderPosition> {
        let vault = self
            .resolver
            .tranche_vault_contract(pool_name, tranche, &ChainAccess::Provider(provider.clone()))
            .await?;

        let shares = vault.balanceOf(lender).call().await?;
        let assets = if shares.is_zero() {
            U256::ZERO
        } else {
            vault.convertToAssets(shares).call().await?
        };

        Ok(LenderPosition {
            tranche,
            shares,
            assets,
        })
    }

    pub async fn first_loss_cover_position<P: Provider + Clone>(
        &self,
        pool_name: PoolName,
        index: FirstLossCoverIndex,
        holder: Address,
        provider: &P,
    ) -> Result<FirstLossCoverPosition> {
        let cover = self
            .resolver
            .first_loss_cover_contract(pool_name, index, &ChainAccess::Provider(provider.clone()))
            .await?;

        let total_assets = cover.totalAssets().call().await?;
        let shares = cover.balanceOf(holder).call().await?;
        let assets = if shares.is_zero() {
            U256::ZERO
        } else {
            cover.convertToAssets(shares).call().await?
        };

        Ok(FirstLossCoverPosition {
            index,
            cover: *cover.address(),
            total_assets,
            shares,
            assets,
        })
    }
}
