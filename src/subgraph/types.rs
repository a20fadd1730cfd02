//! Subgraph result shapes

use alloy::primitives::U256;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Kind of a protocol credit event as indexed by the subgraph
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CreditEventKind {
    LiquidityDeposited,
    LiquidityWithdrawn,
    DrawdownMade,
    DrawdownMadeWithReceivable,
    PaymentMade,
    ReceivedPaymentProcessed,
    /// Code not known to this SDK version
    Other(u8),
}

impl CreditEventKind {
    pub fn code(&self) -> u8 {
        match self {
            CreditEventKind::LiquidityDeposited => 0,
            CreditEventKind::LiquidityWithdrawn => 1,
            CreditEventKind::DrawdownMade => 2,
            CreditEventKind::DrawdownMadeWithReceivable => 3,
            CreditEventKind::PaymentMade => 4,
            CreditEventKind::ReceivedPaymentProcessed => 5,
            CreditEventKind::Other(code) => *code,
        }
    }

    pub fn from_code(code: u8) -> Self {
        match code {
            0 => CreditEventKind::LiquidityDeposited,
            1 => CreditEventKind::LiquidityWithdrawn,
            2 => CreditEventKind::DrawdownMade,
            3 => CreditEventKind::DrawdownMadeWithReceivable,
            4 => CreditEventKind::PaymentMade,
            5 => CreditEventKind::ReceivedPaymentProcessed,
            other => CreditEventKind::Other(other),
        }
    }

    pub fn is_drawdown(&self) -> bool {
        matches!(
            self,
            CreditEventKind::DrawdownMade | CreditEventKind::DrawdownMadeWithReceivable
        )
    }
}

impl Serialize for CreditEventKind {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u8(self.code())
    }
}

impl<'de> Deserialize<'de> for CreditEventKind {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = string_or_number(deserializer)?;
        raw.parse::<u8>()
            .map(CreditEventKind::from_code)
            .map_err(|_| serde::de::Error::custom(format!("invalid credit event code: {}", raw)))
    }
}

/// A credit event as returned by the indexer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreditEvent {
    #[serde(default, deserialize_with = "opt_string_or_number")]
    pub amount: Option<String>,
    #[serde(default, deserialize_with = "opt_string_or_number")]
    pub timestamp: Option<String>,
    #[serde(default)]
    pub owner: Option<String>,
    #[serde(default)]
    pub pool: Option<String>,
    #[serde(default)]
    pub event: Option<CreditEventKind>,
}

impl CreditEvent {
    /// Unix timestamp in seconds
    pub fn timestamp_secs(&self) -> Option<u64> {
        self.timestamp.as_deref()?.parse().ok()
    }

    pub fn datetime(&self) -> Option<DateTime<Utc>> {
        let secs = i64::try_from(self.timestamp_secs()?).ok()?;
        DateTime::from_timestamp(secs, 0)
    }

    /// Amount in the pool token's smallest unit
    pub fn amount_value(&self) -> Option<U256> {
        self.amount.as_deref()?.parse().ok()
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderDirection {
    Asc,
    #[default]
    Desc,
}

/// Caller-supplied page window
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    pub first: Option<u32>,
    pub skip: Option<u32>,
    pub order_by: String,
    pub order_direction: OrderDirection,
}

impl Pagination {
    pub fn page(first: u32, skip: u32) -> Self {
        Self {
            first: Some(first),
            skip: Some(skip),
            ..Self::default()
        }
    }
}

impl Default for Pagination {
    fn default() -> Self {
        Self {
            first: None,
            skip: None,
            order_by: "tokenId".to_string(),
            order_direction: OrderDirection::Desc,
        }
    }
}

/// Receivable row in the shape the indexer sends it
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct RawReceivable {
    pub id: String,
    #[serde(default, deserialize_with = "opt_string_or_number")]
    pub token_id: Option<String>,
    #[serde(default, deserialize_with = "opt_string_or_number")]
    pub receivable_amount: Option<String>,
    #[serde(default, deserialize_with = "opt_string_or_number")]
    pub paid_amount: Option<String>,
    #[serde(default)]
    pub owner: Option<String>,
    #[serde(default)]
    pub pool: Option<String>,
    #[serde(default, deserialize_with = "opt_string_or_number")]
    pub maturity_date: Option<String>,
    #[serde(default, deserialize_with = "opt_string_or_number")]
    pub currency_code: Option<String>,
    #[serde(default)]
    pub token_uri: Option<String>,
    #[serde(default, deserialize_with = "opt_string_or_number")]
    pub status: Option<String>,
}

/// A tokenized receivable owned by a user
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReceivableInfo {
    pub id: String,
    pub token_id: Option<String>,
    pub receivable_amount: Option<String>,
    pub paid_amount: Option<String>,
    pub owner: Option<String>,
    pub pool_address: Option<String>,
    pub maturity_date: Option<String>,
    pub currency_code: Option<String>,
    #[serde(rename = "tokenURI")]
    pub token_uri: Option<String>,
    pub status: Option<String>,
}

impl From<RawReceivable> for ReceivableInfo {
    fn from(raw: RawReceivable) -> Self {
        Self {
            id: raw.id,
            token_id: raw.token_id,
            receivable_amount: raw.receivable_amount,
            paid_amount: raw.paid_amount,
            owner: raw.owner,
            pool_address: raw.pool,
            maturity_date: raw.maturity_date,
            currency_code: raw.currency_code,
            token_uri: raw.token_uri,
            status: raw.status,
        }
    }
}

/// Aggregate figures for one pool
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PoolStats {
    pub id: String,
    #[serde(deserialize_with = "string_or_number")]
    pub total_pool_assets: String,
    #[serde(deserialize_with = "string_or_number")]
    pub amount_credit_originated: String,
    #[serde(deserialize_with = "string_or_number")]
    pub amount_credit_repaid: String,
    #[serde(deserialize_with = "string_or_number")]
    pub amount_credit_defaulted: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BorrowLendHistory {
    pub has_borrow_history: bool,
    pub has_lend_history: bool,
}

/// Tranche type code of the first loss cover
pub const FIRST_LOSS_COVER_TRANCHE_TYPE: i32 = 2;

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct Tranche {
    #[allow(dead_code)]
    pub id: String,
    #[serde(rename = "type")]
    pub kind: i32,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct Lender {
    #[allow(dead_code)]
    pub id: String,
    pub tranche: Tranche,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum StringOrNumber {
    String(String),
    Number(serde_json::Number),
}

impl From<StringOrNumber> for String {
    fn from(value: StringOrNumber) -> Self {
        match value {
            StringOrNumber::String(s) => s,
            StringOrNumber::Number(n) => n.to_string(),
        }
    }
}

/// The subgraph serializes BigInt as strings and Int as numbers
fn string_or_number<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    StringOrNumber::deserialize(deserializer).map(String::from)
}

fn opt_string_or_number<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<Option<String>, D::Error> {
    Ok(Option::<StringOrNumber>::deserialize(deserializer)?.map(String::from))
}
