//! GraphQL operations against the Huma subgraph
//!
//! Caller input only ever travels in `variables`; the documents are static.

use super::types::{CreditEvent, Lender, OrderDirection, PoolStats, RawReceivable};
use graphql_client::{GraphQLQuery, QueryBody};
use serde::{Deserialize, Serialize};

pub(crate) struct CreditEventsQuery;

#[derive(Debug, Clone, Serialize)]
pub(crate) struct CreditEventsVariables {
    pub owner: String,
    pub pool: String,
    pub events: Vec<u8>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct CreditEventsData {
    #[serde(default)]
    pub credit_events: Vec<CreditEvent>,
}

impl GraphQLQuery for CreditEventsQuery {
    type Variables = CreditEventsVariables;
    type ResponseData = CreditEventsData;

    fn build_query(variables: Self::Variables) -> QueryBody<Self::Variables> {
        QueryBody {
            variables,
            query: r#"
                query CreditEventsForUser($owner: String!, $pool: String!, $events: [Int!]!) {
                    creditEvents(
                        where: { owner: $owner, pool: $pool, event_in: $events }
                        orderBy: timestamp
                        orderDirection: desc
                    ) {
                        amount
                        timestamp
                        owner
                        pool
                        event
                    }
                }
            "#,
            operation_name: "CreditEventsForUser",
        }
    }
}

pub(crate) struct ReceivablesQuery;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ReceivablesVariables {
    pub owner: String,
    pub pool: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub skip: Option<u32>,
    pub order_by: String,
    pub order_direction: OrderDirection,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ReceivablesData {
    #[serde(default)]
    pub rwreceivables: Vec<RawReceivable>,
}

impl GraphQLQuery for ReceivablesQuery {
    type Variables = ReceivablesVariables;
    type ResponseData = ReceivablesData;

    fn build_query(variables: Self::Variables) -> QueryBody<Self::Variables> {
        QueryBody {
            variables,
            query: r#"
                query ReceivablesForUser(
                    $owner: String!
                    $pool: String!
                    $first: Int
                    $skip: Int
                    $orderBy: RWReceivable_orderBy
                    $orderDirection: OrderDirection
                ) {
                    rwreceivables(
                        where: { owner: $owner, pool: $pool }
                        first: $first
                        skip: $skip
                        orderBy: $orderBy
                        orderDirection: $orderDirection
                    ) {
                        id
                        tokenId
                        receivableAmount
                        paidAmount
                        owner
                        pool
                        maturityDate
                        currencyCode
                        tokenUri
                        status
                    }
                }
            "#,
            operation_name: "ReceivablesForUser",
        }
    }
}

pub(crate) struct PoolStatsQuery;

#[derive(Debug, Clone, Serialize)]
pub(crate) struct PoolStatsVariables {
    pub id: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct PoolStatsData {
    pub pool_stat: Option<PoolStats>,
}

impl GraphQLQuery for PoolStatsQuery {
    type Variables = PoolStatsVariables;
    type ResponseData = PoolStatsData;

    fn build_query(variables: Self::Variables) -> QueryBody<Self::Variables> {
        QueryBody {
            variables,
            query: r#"
                query PoolStats($id: ID!) {
                    poolStat(id: $id) {
                        id
                        amountCreditOriginated
                        amountCreditRepaid
                        amountCreditDefaulted
                        totalPoolAssets
                    }
                }
            "#,
            operation_name: "PoolStats",
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub(crate) struct HistoryVariables {
    pub owner: String,
    pub pool: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct EventCode {
    pub event: Option<super::types::CreditEventKind>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct HistoryData {
    #[serde(default)]
    pub credit_events: Vec<EventCode>,
    #[serde(default)]
    pub lenders: Vec<Lender>,
}

/// Credit events only, for pools without tranches
pub(crate) struct HistoryQuery;

impl GraphQLQuery for HistoryQuery {
    type Variables = HistoryVariables;
    type ResponseData = HistoryData;

    fn build_query(variables: Self::Variables) -> QueryBody<Self::Variables> {
        QueryBody {
            variables,
            query: r#"
                query BorrowAndLendHistory($owner: String!, $pool: String!) {
                    creditEvents(where: { owner: $owner, pool: $pool }) {
                        event
                    }
                }
            "#,
            operation_name: "BorrowAndLendHistory",
        }
    }
}

/// Credit events plus tranche lender positions for V2 pools
pub(crate) struct HistoryV2Query;

impl GraphQLQuery for HistoryV2Query {
    type Variables = HistoryVariables;
    type ResponseData = HistoryData;

    fn build_query(variables: Self::Variables) -> QueryBody<Self::Variables> {
        QueryBody {
            variables,
            query: r#"
                query BorrowAndLendHistoryV2($owner: String!, $pool: String!) {
                    creditEvents(where: { owner: $owner, pool: $pool }) {
                        event
                    }
                    lenders(where: { owner: $owner, pool: $pool }) {
                        id
                        tranche {
                            id
                            type
                        }
                    }
                }
            "#,
            operation_name: "BorrowAndLendHistoryV2",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_body_carries_variables_not_interpolation() {
        let owner = r#"0xabc", pool_not: "x"#;
        let body = serde_json::to_value(CreditEventsQuery::build_query(CreditEventsVariables {
            owner: owner.to_string(),
            pool: "0xpool".to_string(),
            events: vec![3],
        }))
        .unwrap();

        assert_eq!(body["operationName"], "CreditEventsForUser");
        assert_eq!(body["variables"]["owner"], owner);
        assert_eq!(body["variables"]["events"], serde_json::json!([3]));
        assert!(!body["query"].as_str().unwrap().contains("0xabc"));
    }

    #[test]
    fn test_unset_pagination_is_omitted() {
        let body = serde_json::to_value(ReceivablesQuery::build_query(ReceivablesVariables {
            owner: "0xowner".to_string(),
            pool: "0xpool".to_string(),
            first: None,
            skip: Some(4),
            order_by: "tokenId".to_string(),
            order_direction: OrderDirection::Desc,
        }))
        .unwrap();

        let variables = body["variables"].as_object().unwrap();
        assert!(!variables.contains_key("first"));
        assert_eq!(variables["skip"], 4);
        assert_eq!(variables["orderBy"], "tokenId");
        assert_eq!(variables["orderDirection"], "desc");
    }

    #[test]
    fn test_v2_history_requests_lenders() {
        let vars = HistoryVariables {
            owner: "0xowner".to_string(),
            pool: "0xpool".to_string(),
        };
        assert!(HistoryV2Query::build_query(vars.clone()).query.contains("lenders"));
        assert!(!HistoryQuery::build_query(vars).query.contains("lenders"));
    }
}
