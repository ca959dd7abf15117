//! Customer behavioral baselines.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::ids::CustomerId;

/// Rolling behavioral profile for one customer.
///
/// Maintained by a background aggregation process; the scoring pipeline
/// only ever reads it. A customer without a baseline is scored with
/// neutral defaults rather than rejected.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CustomerBaseline {
    pub customer_id: CustomerId,
    /// Average transaction amount over the observation window.
    pub avg_amount: Decimal,
    /// Hour of day (0-23) the customer most commonly transacts at.
    pub typical_hour: u32,
    /// Average transactions per day.
    pub daily_frequency: f64,
    /// Merchants this customer regularly uses.
    pub common_merchants: Vec<String>,
    pub last_updated: DateTime<Utc>,
}

impl CustomerBaseline {
    /// Average amount as a float for feature math.
    #[must_use]
    pub fn avg_amount_f64(&self) -> f64 {
        use rust_decimal::prelude::ToPrimitive;
        self.avg_amount.to_f64().unwrap_or(0.0)
    }
}
