//! Transaction value types.
//!
//! A [`Transaction`] is immutable once created. The scoring pipeline never
//! mutates it; every stage borrows it and produces new values.

use std::collections::BTreeMap;

use chrono::{DateTime, Datelike, Timelike, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::ids::{CustomerId, TransactionId};

/// Kind of transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransactionType {
    Purchase,
    Withdrawal,
    Deposit,
    Transfer,
    Payment,
}

/// Merchant category codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MerchantCategory {
    Grocery,
    Restaurant,
    GasStation,
    Retail,
    Entertainment,
    Healthcare,
    Travel,
    Online,
    Atm,
    Unknown,
}

impl MerchantCategory {
    /// Categories that customers overwhelmingly transact with on weekdays.
    #[must_use]
    pub fn is_weekday_typical(self) -> bool {
        matches!(self, Self::Healthcare | Self::Online)
    }
}

/// Where a transaction happened.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub city: String,
    /// Two-letter region code: a US state or an ISO country code.
    pub region: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub latitude: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub longitude: Option<f64>,
}

/// Scenario tag carried by synthetically generated anomalous transactions.
///
/// Upstream simulators mark injected anomalies with one of these so the
/// rule scanner can attribute them directly. The tag is trusted at face
/// value, which is acceptable only because it originates from our own
/// demo stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SyntheticScenario {
    LargeAmount,
    UnusualMerchant,
    UnusualLocation,
    UnusualTime,
    HighFrequency,
    RoundAmount,
    Unknown,
}

/// Free-form transaction metadata.
///
/// Carries the synthetic-anomaly pre-mark plus any extra key/value context
/// the upstream producer attaches.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TransactionMetadata {
    /// Set when the producer injected this transaction as an anomaly.
    #[serde(default)]
    pub synthetic_anomaly: Option<SyntheticScenario>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub extra: BTreeMap<String, String>,
}

/// A single financial transaction handed to the scoring pipeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    pub id: TransactionId,
    pub customer_id: CustomerId,
    pub amount: Decimal,
    pub transaction_type: TransactionType,
    pub merchant_name: String,
    pub merchant_category: MerchantCategory,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<Location>,
    pub timestamp: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<TransactionMetadata>,
}

impl Transaction {
    /// Hour of day (0-23) in UTC.
    #[must_use]
    pub fn hour(&self) -> u32 {
        self.timestamp.hour()
    }

    /// Day of week where Monday is 0 and Sunday is 6.
    #[must_use]
    pub fn weekday(&self) -> u32 {
        self.timestamp.weekday().num_days_from_monday()
    }

    /// Whether the transaction happened on a Saturday or Sunday.
    #[must_use]
    pub fn is_weekend(&self) -> bool {
        self.weekday() >= 5
    }

    /// The synthetic-anomaly pre-mark, if the producer set one.
    #[must_use]
    pub fn synthetic_scenario(&self) -> Option<SyntheticScenario> {
        self.metadata.as_ref().and_then(|m| m.synthetic_anomaly)
    }

    /// Transaction amount as a float for feature math.
    #[must_use]
    pub fn amount_f64(&self) -> f64 {
        use rust_decimal::prelude::ToPrimitive;
        self.amount.to_f64().unwrap_or(0.0)
    }
}
