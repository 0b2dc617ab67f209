use std::fmt;
use std::str::FromStr;

use bigdecimal::BigDecimal;
use chrono::{DateTime, FixedOffset};
use serde::{Serialize, Serializer};
use tracing::warn;

/// Largest decimal exponent, either direction, accepted from the feed.
/// Rounding and formatting cost grows with the exponent.
const MAX_EXPONENT: i64 = 64;

/// Decimal field of a feed row. Unparseable input is kept as `NaN`
/// instead of failing the row.
#[derive(Debug, Clone, PartialEq)]
pub enum Amount {
    Number(BigDecimal),
    NaN,
}

impl Amount {
    pub fn parse(s: &str) -> Self {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Amount::NaN;
        }
        match BigDecimal::from_str(trimmed) {
            Ok(value) => {
                let (_, scale) = value.as_bigint_and_exponent();
                if scale.abs() > MAX_EXPONENT {
                    warn!("Rejecting amount \"{}\": exponent out of range", trimmed);
                    return Amount::NaN;
                }
                Amount::Number(value)
            }
            Err(_) => Amount::NaN,
        }
    }

    pub fn is_nan(&self) -> bool {
        matches!(self, Amount::NaN)
    }

    pub fn as_decimal(&self) -> Option<&BigDecimal> {
        match self {
            Amount::Number(value) => Some(value),
            Amount::NaN => None,
        }
    }
}

impl Serialize for Amount {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Amount::Number(value) => serializer.serialize_str(&value.to_string()),
            Amount::NaN => serializer.serialize_none(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OrderType {
    Market,
    Limit,
    Other(String),
}

impl OrderType {
    pub fn parse(s: &str) -> Self {
        match s {
            "Market" => OrderType::Market,
            "Limit" => OrderType::Limit,
            other => OrderType::Other(other.to_string()),
        }
    }

    pub fn is_market(&self) -> bool {
        matches!(self, OrderType::Market)
    }
}

impl fmt::Display for OrderType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OrderType::Market => f.write_str("Market"),
            OrderType::Limit => f.write_str("Limit"),
            OrderType::Other(s) => f.write_str(s),
        }
    }
}

impl Serialize for OrderType {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

// One normalized order fill from the buyback feed.
#[derive(Debug, Clone, Serialize)]
pub struct BuybackRecord {
    pub date: DateTime<FixedOffset>,
    pub order_id: String,
    pub batch_id: String,
    #[serde(rename = "type")]
    pub order_type: OrderType,
    pub price: Amount,
    pub quantity_filled: Amount,
    pub usd_amount_filled: Amount,
}
