//! Huma subgraph queries
//!
//! Subgraph data is best-effort: a chain without a configured endpoint yields an
//! empty result without touching the network, and a GraphQL `errors` envelope is
//! logged and turned into an empty result. Transport and decoding failures are
//! still returned as errors.

mod queries;
mod transport;
mod types;

pub use transport::{GraphQLTransport, HttpTransport};
pub use types::{
    BorrowLendHistory, CreditEvent, CreditEventKind, OrderDirection, Pagination, PoolStats,
    ReceivableInfo, FIRST_LOSS_COVER_TRANCHE_TYPE,
};

use crate::config::{Config, SubgraphEndpoints};
use crate::pools::{PoolName, PoolRegistry, PoolType};
use crate::Result;
use alloy::primitives::{Address, U256};
use graphql_client::GraphQLQuery;
use queries::{
    CreditEventsQuery, CreditEventsVariables, HistoryQuery, HistoryV2Query, HistoryVariables,
    PoolStatsQuery, PoolStatsVariables, ReceivablesQuery, ReceivablesVariables,
};
use serde_json::Value;
use url::Url;

/// Client for the per-chain Huma subgraphs
pub struct SubgraphService<T = HttpTransport> {
    endpoints: SubgraphEndpoints,
    registry: PoolRegistry,
    transport: T,
}

impl SubgraphService<HttpTransport> {
    pub fn new(endpoints: SubgraphEndpoints, registry: PoolRegistry) -> Self {
        Self::with_transport(endpoints, registry, HttpTransport::new())
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(config.subgraphs.clone(), config.pools.clone())
    }
}

impl<T: GraphQLTransport> SubgraphService<T> {
    pub fn with_transport(endpoints: SubgraphEndpoints, registry: PoolRegistry, transport: T) -> Self {
        Self {
            endpoints,
            registry,
            transport,
        }
    }

    /// Subgraph endpoint for a chain
    pub fn subgraph_url(&self, chain_id: u64) -> Option<&Url> {
        self.endpoints.get(chain_id)
    }

    /// Run one operation; `None` when the indexer answered with errors or no data
    async fn execute<Q: GraphQLQuery>(
        &self,
        url: &Url,
        variables: Q::Variables,
    ) -> Result<Option<Q::ResponseData>> {
        let body = Q::build_query(variables);
        let operation = body.operation_name;
        tracing::debug!(operation, %url, "Querying subgraph");

        let mut raw = self.transport.post(url, serde_json::to_value(&body)?).await?;

        // Errors win over data: partial or malformed data is never decoded
        if let Some(errors) = error_messages(&raw) {
            tracing::error!(operation, %url, ?errors, "Subgraph returned errors");
            return Ok(None);
        }

        match raw.get_mut("data").map(Value::take) {
            None | Some(Value::Null) => Ok(None),
            Some(data) => Ok(Some(serde_json::from_value(data)?)),
        }
    }

    /// Credit events of `user` in a pool, restricted to `kinds`, newest first
    pub async fn credit_events_for_user(
        &self,
        user: Address,
        chain_id: u64,
        pool_name: PoolName,
        pool_type: PoolType,
        kinds: &[CreditEventKind],
    ) -> Result<Vec<CreditEvent>> {
        let Some(url) = self.subgraph_url(chain_id) else {
            return Ok(Vec::new());
        };
        let Some(pool) = self.registry.pool_address(chain_id, pool_name, pool_type) else {
            tracing::warn!(chain_id, pool = %pool_name, "No pool address registered");
            return Ok(Vec::new());
        };
        if kinds.is_empty() {
            return Ok(Vec::new());
        }

        let variables = CreditEventsVariables {
            owner: hex_lower(user),
            pool: hex_lower(pool),
            events: kinds.iter().map(CreditEventKind::code).collect(),
        };
        let Some(data) = self.execute::<CreditEventsQuery>(url, variables).await? else {
            return Ok(Vec::new());
        };

        let mut events: Vec<CreditEvent> = data
            .credit_events
            .into_iter()
            .filter(|e| e.event.is_some_and(|kind| kinds.contains(&kind)))
            .collect();
        events.sort_by(|a, b| b.timestamp_secs().cmp(&a.timestamp_secs()));
        Ok(events)
    }

    /// Amount of the user's most recent drawdown backed by a receivable
    ///
    /// `None` when the user has no such drawdown in the pool.
    pub async fn last_factorized_amount(
        &self,
        user: Address,
        chain_id: u64,
        pool_name: PoolName,
        pool_type: PoolType,
    ) -> Result<Option<U256>> {
        let events = self
            .credit_events_for_user(
                user,
                chain_id,
                pool_name,
                pool_type,
                &[CreditEventKind::DrawdownMadeWithReceivable],
            )
            .await?;

        let Some(latest) = events.first() else {
            return Ok(None);
        };
        let amount = latest.amount_value();
        if amount.is_none() {
            tracing::warn!(amount = ?latest.amount, "Unparseable factorized amount");
        }
        Ok(amount)
    }

    /// One page of the receivables `user` holds in a pool
    pub async fn receivables_for_user(
        &self,
        user: Address,
        chain_id: u64,
        pool_name: PoolName,
        pool_type: PoolType,
        pagination: &Pagination,
    ) -> Result<Vec<ReceivableInfo>> {
        let Some(url) = self.subgraph_url(chain_id) else {
            return Ok(Vec::new());
        };
        let Some(pool) = self.registry.pool_address(chain_id, pool_name, pool_type) else {
            tracing::warn!(chain_id, pool = %pool_name, "No pool address registered");
            return Ok(Vec::new());
        };

        let variables = ReceivablesVariables {
            owner: hex_lower(user),
            pool: hex_lower(pool),
            first: pagination.first,
            skip: pagination.skip,
            order_by: pagination.order_by.clone(),
            order_direction: pagination.order_direction,
        };
        let receivables = self
            .execute::<ReceivablesQuery>(url, variables)
            .await?
            .map(|data| data.rwreceivables)
            .unwrap_or_default();

        Ok(receivables.into_iter().map(ReceivableInfo::from).collect())
    }

    /// Aggregate stats of the pool at `pool_address`
    pub async fn pool_stats(&self, chain_id: u64, pool_address: &str) -> Result<Option<PoolStats>> {
        let Some(url) = self.subgraph_url(chain_id) else {
            return Ok(None);
        };

        let variables = PoolStatsVariables {
            id: pool_address.to_lowercase(),
        };
        Ok(self
            .execute::<PoolStatsQuery>(url, variables)
            .await?
            .and_then(|data| data.pool_stat))
    }

    /// Whether `user` has ever borrowed from or lent to a pool
    ///
    /// `None` when the chain has no endpoint or either address is empty.
    pub async fn borrow_and_lend_history(
        &self,
        chain_id: u64,
        pool_address: &str,
        user: &str,
    ) -> Result<Option<BorrowLendHistory>> {
        let Some(url) = self.subgraph_url(chain_id) else {
            return Ok(None);
        };
        if user.is_empty() || pool_address.is_empty() {
            return Ok(None);
        }

        let variables = HistoryVariables {
            owner: user.to_lowercase(),
            pool: pool_address.to_lowercase(),
        };
        let is_v2 = self.registry.is_v2_pool(chain_id, pool_address);
        let data = if is_v2 {
            self.execute::<HistoryV2Query>(url, variables).await?
        } else {
            self.execute::<HistoryQuery>(url, variables).await?
        };
        let Some(data) = data else {
            return Ok(None);
        };

        let has_borrow_history = data
            .credit_events
            .iter()
            .any(|e| e.event.is_some_and(|kind| kind.is_drawdown()));
        let mut has_lend_history = data
            .credit_events
            .iter()
            .any(|e| e.event == Some(CreditEventKind::LiquidityDeposited));
        if !has_lend_history && is_v2 {
            has_lend_history = data
                .lenders
                .iter()
                .any(|lender| lender.tranche.kind != FIRST_LOSS_COVER_TRANCHE_TYPE);
        }

        Ok(Some(BorrowLendHistory {
            has_borrow_history,
            has_lend_history,
        }))
    }
}

/// Messages of a non-empty `errors` member, in whatever shape the indexer sent
fn error_messages(envelope: &Value) -> Option<Vec<String>> {
    let errors = match envelope.get("errors")? {
        Value::Null => return None,
        Value::Array(errors) if errors.is_empty() => return None,
        Value::Array(errors) => errors.iter().collect(),
        other => vec![other],
    };
    Some(
        errors
            .into_iter()
            .map(|error| match error.get("message").and_then(Value::as_str) {
                Some(message) => message.to_string(),
                None => error.to_string(),
            })
            .collect(),
    )
}

fn hex_lower(address: Address) -> String {
    address.to_string().to_lowercase()
}
