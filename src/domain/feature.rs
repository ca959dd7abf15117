//! Feature extraction for the detectors.
//!
//! Converts a transaction plus an optional customer baseline into the
//! fixed-shape numeric vector both the rule scanner and the outlier model
//! consume. Extraction is pure and infallible: a missing baseline degrades
//! to neutral defaults instead of erroring.

use std::collections::BTreeMap;

use crate::domain::baseline::CustomerBaseline;
use crate::domain::transaction::Transaction;

/// Number of features in the vector. The outlier model is fitted against
/// this exact shape.
pub const FEATURE_COUNT: usize = 7;

/// Fixed-shape numeric feature vector for one transaction.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FeatureVector {
    /// Raw transaction amount.
    pub amount: f64,
    /// log1p of the amount, taming the heavy tail.
    pub amount_log: f64,
    /// Hour of day, 0-23.
    pub hour_of_day: f64,
    /// Day of week, Monday = 0.
    pub day_of_week: f64,
    /// Amount relative to the customer's average. 1.0 without a baseline.
    pub amount_vs_avg: f64,
    /// Absolute distance from the customer's typical hour. 0 without a baseline.
    pub hour_deviation: f64,
    /// Customer's daily transaction frequency. 0.5 without a baseline.
    pub frequency_score: f64,
}

impl FeatureVector {
    /// Extract features from a transaction and an optional baseline.
    #[must_use]
    pub fn extract(tx: &Transaction, baseline: Option<&CustomerBaseline>) -> Self {
        let amount = tx.amount_f64();
        let hour = f64::from(tx.hour());

        let (amount_vs_avg, hour_deviation, frequency_score) = match baseline {
            Some(b) => {
                let avg = b.avg_amount_f64().max(1.0);
                let deviation = (hour - f64::from(b.typical_hour)).abs();
                (amount / avg, deviation, b.daily_frequency)
            }
            None => (1.0, 0.0, 0.5),
        };

        Self {
            amount,
            amount_log: amount.max(0.0).ln_1p(),
            hour_of_day: hour,
            day_of_week: f64::from(tx.weekday()),
            amount_vs_avg,
            hour_deviation,
            frequency_score,
        }
    }

    /// The vector as a fixed array in stable field order.
    #[must_use]
    pub fn as_array(&self) -> [f64; FEATURE_COUNT] {
        [
            self.amount,
            self.amount_log,
            self.hour_of_day,
            self.day_of_week,
            self.amount_vs_avg,
            self.hour_deviation,
            self.frequency_score,
        ]
    }

    /// Named feature map for audit records and explanations.
    #[must_use]
    pub fn to_map(&self) -> BTreeMap<String, f64> {
        [
            ("amount", self.amount),
            ("amount_log", self.amount_log),
            ("hour_of_day", self.hour_of_day),
            ("day_of_week", self.day_of_week),
            ("amount_vs_avg", self.amount_vs_avg),
            ("hour_deviation", self.hour_deviation),
            ("frequency_score", self.frequency_score),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v))
        .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ids::{CustomerId, TransactionId};
    use crate::domain::transaction::{MerchantCategory, TransactionType};
    use chrono::{TimeZone, Utc};
    use rust_decimal_macros::dec;

    fn make_tx() -> Transaction {
        Transaction {
            id: TransactionId::from("txn-1"),
            customer_id: CustomerId::from("customer_001"),
            amount: dec!(120),
            transaction_type: TransactionType::Purchase,
            merchant_name: "Safeway".into(),
            merchant_category: MerchantCategory::Grocery,
            location: None,
            timestamp: Utc.with_ymd_and_hms(2024, 3, 5, 20, 15, 0).unwrap(),
            description: None,
            metadata: None,
        }
    }

    #[test]
    fn missing_baseline_uses_neutral_defaults() {
        let features = FeatureVector::extract(&make_tx(), None);
        assert_eq!(features.amount_vs_avg, 1.0);
        assert_eq!(features.hour_deviation, 0.0);
        assert_eq!(features.frequency_score, 0.5);
        assert_eq!(features.amount, 120.0);
        assert_eq!(features.hour_of_day, 20.0);
    }

    #[test]
    fn baseline_drives_ratio_and_deviation() {
        let baseline = CustomerBaseline {
            customer_id: CustomerId::from("customer_001"),
            avg_amount: dec!(60),
            typical_hour: 14,
            daily_frequency: 2.5,
            common_merchants: vec!["Safeway".into()],
            last_updated: Utc::now(),
        };
        let features = FeatureVector::extract(&make_tx(), Some(&baseline));
        assert_eq!(features.amount_vs_avg, 2.0);
        assert_eq!(features.hour_deviation, 6.0);
        assert_eq!(features.frequency_score, 2.5);
    }

    #[test]
    fn array_has_fixed_shape() {
        let arr = FeatureVector::extract(&make_tx(), None).as_array();
        assert_eq!(arr.len(), FEATURE_COUNT);
        assert_eq!(arr[1], 120.0_f64.ln_1p());
    }
}
