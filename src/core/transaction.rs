use super::error::TransferError;
use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, NaiveTime};
use rust_decimal::Decimal;
use schemars::JsonSchema;
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;
use std::io::Read;

/// Trade direction of a transaction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
pub enum Direction {
    Buy,
    Sell,
}

impl Direction {
    /// Direction implied by the sign of a quantity
    pub fn from_quantity(quantity: i64) -> Self {
        if quantity < 0 {
            Direction::Sell
        } else {
            Direction::Buy
        }
    }
}

/// Input root for transaction JSON
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct TransactionInput {
    pub transactions: Vec<Transaction>,
}

/// A single securities trade as supplied by the broker export
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct Transaction {
    /// Unique identifier for this transaction
    pub id: String,
    /// When the trade executed (RFC3339 with offset; date-only assumes UTC)
    #[serde(rename = "date", deserialize_with = "deserialize_datetime")]
    #[schemars(with = "String")]
    pub datetime: DateTime<FixedOffset>,
    /// Product code; transactions are matched within a product only
    pub product: String,
    #[serde(default)]
    pub isin: Option<String>,
    #[serde(default)]
    pub exchange_market: Option<String>,
    #[serde(default)]
    pub execution_venue: Option<String>,
    /// Signed number of units: positive for buys, negative for sells
    pub quantity: i64,
    /// Trade direction; derived from the quantity sign when omitted
    #[serde(default)]
    pub direction: Option<Direction>,
    #[serde(default)]
    #[schemars(with = "Option<f64>")]
    pub price: Option<Decimal>,
    /// Gross value in the product's quote currency
    #[serde(default)]
    #[schemars(with = "Option<f64>")]
    pub local_value: Option<Decimal>,
    #[serde(default)]
    #[schemars(with = "Option<f64>")]
    pub fx_rate: Option<Decimal>,
    /// Gross value in the reporting currency
    #[serde(default)]
    #[schemars(with = "Option<f64>")]
    pub value: Option<Decimal>,
    /// Fees and charges in the reporting currency
    #[serde(default)]
    #[schemars(with = "Option<f64>")]
    pub fee: Option<Decimal>,
    /// Value including fees and charges
    #[serde(default)]
    #[schemars(with = "Option<f64>")]
    pub total: Option<Decimal>,
}

impl Transaction {
    /// Get just the date portion for consolidation
    pub fn date(&self) -> NaiveDate {
        self.datetime.date_naive()
    }

    pub fn direction(&self) -> Direction {
        self.direction
            .unwrap_or_else(|| Direction::from_quantity(self.quantity))
    }

    pub fn units(&self) -> u64 {
        self.quantity.unsigned_abs()
    }

    pub fn value(&self) -> Result<Decimal, TransferError> {
        self.required(self.value, "value")
    }

    pub fn total(&self) -> Result<Decimal, TransferError> {
        self.required(self.total, "total")
    }

    pub fn fee(&self) -> Result<Decimal, TransferError> {
        self.required(self.fee, "fee")
    }

    fn required(&self, amount: Option<Decimal>, field: &'static str) -> Result<Decimal, TransferError> {
        amount.ok_or_else(|| TransferError::MissingValue {
            id: self.id.clone(),
            field,
        })
    }
}

/// Read transactions from JSON
pub fn read_transactions_json<R: Read>(reader: R) -> anyhow::Result<Vec<Transaction>> {
    let input: TransactionInput = serde_json::from_reader(reader)?;
    let mut transactions = input.transactions;
    for tx in &mut transactions {
        tx.product = tx.product.trim().to_string();
    }
    Ok(transactions)
}

/// JSON schema of the transaction input
pub fn transaction_input_schema() -> schemars::schema::RootSchema {
    schemars::schema_for!(TransactionInput)
}

/// Split a flat transaction list by product, keeping input order within each product
pub fn group_by_product(transactions: Vec<Transaction>) -> BTreeMap<String, Vec<Transaction>> {
    let mut by_product: BTreeMap<String, Vec<Transaction>> = BTreeMap::new();
    for tx in transactions {
        by_product.entry(tx.product.clone()).or_default().push(tx);
    }
    by_product
}

/// Reject transactions the matcher cannot process: zero quantities and an
/// explicit direction that disagrees with the quantity sign
pub fn validate_transactions(transactions: &[Transaction]) -> Result<(), TransferError> {
    for tx in transactions {
        if tx.quantity == 0 {
            return Err(TransferError::InvalidQuantity { id: tx.id.clone() });
        }
        if tx.direction() != Direction::from_quantity(tx.quantity) {
            return Err(TransferError::DirectionMismatch { id: tx.id.clone() });
        }
    }
    Ok(())
}

/// Naive formats read as UTC
const NAIVE_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M",
];

pub fn parse_datetime(s: &str) -> Result<DateTime<FixedOffset>, TransferError> {
    let s = s.trim();
    DateTime::parse_from_rfc3339(s)
        .ok()
        .or_else(|| {
            NAIVE_FORMATS
                .iter()
                .find_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok())
                .or_else(|| {
                    NaiveDate::parse_from_str(s, "%Y-%m-%d")
                        .ok()
                        .map(|date| date.and_time(NaiveTime::MIN))
                })
                .map(|dt| dt.and_utc().fixed_offset())
        })
        .ok_or_else(|| TransferError::InvalidDatetime(s.to_string()))
}

fn deserialize_datetime<'de, D>(deserializer: D) -> Result<DateTime<FixedOffset>, D::Error>
where
    D: Deserializer<'de>,
{
    let s: String = Deserialize::deserialize(deserializer)?;
    parse_datetime(&s).map_err(|err| serde::de::Error::custom(err.to_string()))
}
