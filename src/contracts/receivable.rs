//! Receivable helpers
//!
//! Reference-id lookups and transfer approval for tokenized receivables.

use super::resolver::ContractResolver;
use crate::pools::{PoolName, PoolRegistry};
use crate::wallet::{ChainAccess, SigningProvider};
use crate::{Error, Result};
use alloy::network::Ethereum;
use alloy::primitives::{Address, U256};
use alloy::providers::{PendingTransactionBuilder, Provider};
use serde::{Deserialize, Serialize};

/// Optional gas overrides for submitted transactions
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GasOptions {
    pub gas_limit: Option<u64>,
    pub gas_price: Option<u128>,
    pub max_fee_per_gas: Option<u128>,
    pub max_priority_fee_per_gas: Option<u128>,
}

/// Receivable operations layered on the contract resolver
#[derive(Debug, Clone, Copy)]
pub struct ReceivableHelper<'r> {
    resolver: ContractResolver<'r>,
}

impl<'r> ReceivableHelper<'r> {
    pub fn new(registry: &'r PoolRegistry) -> Self {
        Self {
            resolver: ContractResolver::new(registry),
        }
    }

    pub fn resolver(&self) -> &ContractResolver<'r> {
        &self.resolver
    }

    /// Token id registered for `(reference_id, creator)`; zero when unregistered
    pub async fn resolve_token_id<P: Provider + Clone>(
        &self,
        reference_id: &str,
        creator: Address,
        pool_name: PoolName,
        provider: &P,
    ) -> Result<U256> {
        let receivable = self
            .resolver
            .receivable_contract(pool_name, &ChainAccess::Provider(provider.clone()))
            .await?;

        let reference_hash = receivable
            .getReferenceIdHash(reference_id.to_string(), creator)
            .call()
            .await?;
        let token_id = receivable
            .referenceIdHashToTokenId(reference_hash)
            .call()
            .await?;

        tracing::debug!(
            reference_id,
            creator = %creator,
            token_id = %token_id,
            "Resolved receivable token id"
        );
        Ok(token_id)
    }

    /// Whether a receivable has been minted for `(reference_id, signer_address)`
    pub async fn reference_exists<P: Provider + Clone>(
        &self,
        reference_id: &str,
        signer_address: Address,
        pool_name: PoolName,
        provider: &P,
    ) -> Result<bool> {
        let token_id = self
            .resolve_token_id(reference_id, signer_address, pool_name, provider)
            .await?;
        Ok(!token_id.is_zero())
    }

    /// Approve the pool's credit contract to transfer `receivable_id`
    ///
    /// Returns `None` without submitting anything when the credit contract is
    /// already the approved operator.
    pub async fn ensure_transfer_approval<P: Provider + Clone>(
        &self,
        signer: &SigningProvider<P>,
        pool_name: PoolName,
        receivable_id: U256,
        gas: GasOptions,
    ) -> Result<Option<PendingTransactionBuilder<Ethereum>>> {
        let access = ChainAccess::Signer(signer.clone());
        let receivable = self.resolver.receivable_contract(pool_name, &access).await?;
        let credit = self
            .resolver
            .pool_credit_contract(pool_name, &access)
            .await?;
        let operator = *credit.address();

        let approved = receivable.getApproved(receivable_id).call().await?;
        if approved == operator {
            tracing::debug!(
                receivable_id = %receivable_id,
                operator = %operator,
                "Receivable transfer already approved"
            );
            return Ok(None);
        }

        let mut call = receivable
            .approve(operator, receivable_id)
            .from(signer.address());
        if let Some(gas_limit) = gas.gas_limit {
            call = call.gas(gas_limit);
        }
        if let Some(gas_price) = gas.gas_price {
            call = call.gas_price(gas_price);
        }
        if let Some(max_fee) = gas.max_fee_per_gas {
            call = call.max_fee_per_gas(max_fee);
        }
        if let Some(max_priority_fee) = gas.max_priority_fee_per_gas {
            call = call.max_priority_fee_per_gas(max_priority_fee);
        }

        let pending = call
            .send()
            .await
            .map_err(|e| Error::Transaction(format!("Receivable approval failed: {}", e)))?;

        tracing::info!(
            receivable_id = %receivable_id,
            operator = %operator,
            tx_hash = %pending.tx_hash(),
            "Submitted receivable approval"
        );
        Ok(Some(pending))
    }
}
