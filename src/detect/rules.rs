//! Deterministic rule-based anomaly scanning.
//!
//! Each rule is evaluated independently against the transaction and its
//! feature vector; when several rules hit the same category the maximum
//! severity wins. Scanning is pure and never fails - a transaction that
//! triggers nothing yields an empty map.

use std::collections::BTreeMap;

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;

use crate::config::RulesConfig;
use crate::domain::{AnomalyCategory, AnomalyFlag, FeatureVector, SyntheticScenario, Transaction};

/// Hours at or past these bounds count as deep night and score higher.
const DEEP_NIGHT_BEFORE: u32 = 4;
const DEEP_NIGHT_AFTER: u32 = 23;

/// Deterministic threshold checks producing typed, severity-scored flags.
#[derive(Debug, Clone)]
pub struct RuleScanner {
    config: RulesConfig,
}

impl RuleScanner {
    #[must_use]
    pub fn new(config: RulesConfig) -> Self {
        Self { config }
    }

    /// Scan one transaction, returning at most one flag per category.
    #[must_use]
    pub fn scan(
        &self,
        tx: &Transaction,
        features: &FeatureVector,
    ) -> BTreeMap<AnomalyCategory, AnomalyFlag> {
        let mut flags = BTreeMap::new();

        self.check_synthetic_mark(tx, &mut flags);
        self.check_large_amount(tx, &mut flags);
        self.check_unusual_hour(tx, &mut flags);
        self.check_round_amount(tx, &mut flags);
        self.check_merchant_keywords(tx, &mut flags);
        self.check_foreign_location(tx, &mut flags);
        self.check_weekend_category(tx, &mut flags);
        self.check_baseline_deviation(features, &mut flags);

        if !flags.is_empty() {
            tracing::debug!(
                transaction_id = %tx.id,
                categories = ?flags.keys().collect::<Vec<_>>(),
                amount = %tx.amount,
                merchant = %tx.merchant_name,
                "rule scanner flagged transaction"
            );
        }

        flags
    }

    /// Synthetic pre-marks map directly to a category/severity pair and
    /// boost whatever the computed rules find for that category.
    fn check_synthetic_mark(
        &self,
        tx: &Transaction,
        flags: &mut BTreeMap<AnomalyCategory, AnomalyFlag>,
    ) {
        let Some(scenario) = tx.synthetic_scenario() else {
            return;
        };

        let (category, severity) = match scenario {
            SyntheticScenario::LargeAmount => (AnomalyCategory::UnusualAmount, 0.95),
            SyntheticScenario::UnusualMerchant => (AnomalyCategory::UnusualMerchant, 0.90),
            SyntheticScenario::UnusualLocation => (AnomalyCategory::UnusualLocation, 0.85),
            SyntheticScenario::UnusualTime => (AnomalyCategory::UnusualTime, 0.80),
            SyntheticScenario::HighFrequency => (AnomalyCategory::VelocitySpike, 0.85),
            SyntheticScenario::RoundAmount => (AnomalyCategory::AmountPattern, 0.75),
            SyntheticScenario::Unknown => (AnomalyCategory::UnusualAmount, 0.80),
        };

        upsert(
            flags,
            AnomalyFlag::new(category, severity, "pre-marked synthetic anomaly")
                .with_evidence("scenario", format!("{scenario:?}")),
        );
    }

    fn check_large_amount(
        &self,
        tx: &Transaction,
        flags: &mut BTreeMap<AnomalyCategory, AnomalyFlag>,
    ) {
        if tx.amount <= self.config.amount_floor {
            return;
        }
        let severity = (tx.amount / self.config.amount_scale)
            .to_f64()
            .unwrap_or(1.0)
            .min(1.0);
        upsert(
            flags,
            AnomalyFlag::new(
                AnomalyCategory::UnusualAmount,
                severity,
                format!("amount {} above floor {}", tx.amount, self.config.amount_floor),
            )
            .with_evidence("amount", tx.amount.to_string()),
        );
    }

    fn check_unusual_hour(
        &self,
        tx: &Transaction,
        flags: &mut BTreeMap<AnomalyCategory, AnomalyFlag>,
    ) {
        let hour = tx.hour();
        if (self.config.day_start..=self.config.day_end).contains(&hour) {
            return;
        }
        let severity = if hour <= DEEP_NIGHT_BEFORE || hour >= DEEP_NIGHT_AFTER {
            0.8
        } else {
            0.6
        };
        upsert(
            flags,
            AnomalyFlag::new(
                AnomalyCategory::UnusualTime,
                severity,
                format!("transaction at hour {hour} outside normal day"),
            )
            .with_evidence("hour", hour.to_string()),
        );
    }

    /// Exact multiples of the round unit above it look like structuring.
    fn check_round_amount(
        &self,
        tx: &Transaction,
        flags: &mut BTreeMap<AnomalyCategory, AnomalyFlag>,
    ) {
        if tx.amount < self.config.round_unit {
            return;
        }
        if tx.amount % self.config.round_unit != Decimal::ZERO {
            return;
        }
        upsert(
            flags,
            AnomalyFlag::new(
                AnomalyCategory::AmountPattern,
                0.7,
                format!("amount {} is an exact multiple of {}", tx.amount, self.config.round_unit),
            )
            .with_evidence("amount", tx.amount.to_string())
            .with_evidence("unit", self.config.round_unit.to_string()),
        );
    }

    fn check_merchant_keywords(
        &self,
        tx: &Transaction,
        flags: &mut BTreeMap<AnomalyCategory, AnomalyFlag>,
    ) {
        let Some(keyword) = self
            .config
            .merchant_keywords
            .iter()
            .find(|k| tx.merchant_name.contains(k.as_str()))
        else {
            return;
        };
        upsert(
            flags,
            AnomalyFlag::new(
                AnomalyCategory::UnusualMerchant,
                0.8,
                format!("merchant '{}' matches high-risk keyword", tx.merchant_name),
            )
            .with_evidence("keyword", keyword.clone()),
        );
    }

    fn check_foreign_location(
        &self,
        tx: &Transaction,
        flags: &mut BTreeMap<AnomalyCategory, AnomalyFlag>,
    ) {
        let Some(location) = &tx.location else {
            return;
        };
        if !self.config.foreign_regions.iter().any(|r| r == &location.region) {
            return;
        }
        upsert(
            flags,
            AnomalyFlag::new(
                AnomalyCategory::UnusualLocation,
                0.85,
                format!("transaction from foreign region {}", location.region),
            )
            .with_evidence("region", location.region.clone())
            .with_evidence("city", location.city.clone()),
        );
    }

    /// Weekend activity in categories customers normally hit on weekdays.
    fn check_weekend_category(
        &self,
        tx: &Transaction,
        flags: &mut BTreeMap<AnomalyCategory, AnomalyFlag>,
    ) {
        if !tx.is_weekend() || !tx.merchant_category.is_weekday_typical() {
            return;
        }
        upsert(
            flags,
            AnomalyFlag::new(
                AnomalyCategory::UnusualTime,
                0.5,
                format!("weekend transaction in {:?} category", tx.merchant_category),
            ),
        );
    }

    /// Baseline-relative checks. Without a baseline the feature defaults
    /// (ratio 1.0, deviation 0) cannot trigger either branch.
    fn check_baseline_deviation(
        &self,
        features: &FeatureVector,
        flags: &mut BTreeMap<AnomalyCategory, AnomalyFlag>,
    ) {
        if features.amount_vs_avg > self.config.baseline_ratio {
            let severity = (features.amount_vs_avg / 10.0).min(1.0);
            upsert(
                flags,
                AnomalyFlag::new(
                    AnomalyCategory::UnusualAmount,
                    severity,
                    format!("amount {:.1}x the customer average", features.amount_vs_avg),
                )
                .with_evidence("ratio", format!("{:.2}", features.amount_vs_avg)),
            );
        }

        if features.hour_deviation > self.config.hour_deviation {
            upsert(
                flags,
                AnomalyFlag::new(
                    AnomalyCategory::UnusualTime,
                    0.6,
                    format!(
                        "{:.0} hours from the customer's typical time",
                        features.hour_deviation
                    ),
                )
                .with_evidence("hour_deviation", format!("{:.1}", features.hour_deviation)),
            );
        }
    }
}

/// Insert a flag, keeping whichever severity is higher for the category.
fn upsert(flags: &mut BTreeMap<AnomalyCategory, AnomalyFlag>, flag: AnomalyFlag) {
    match flags.get(&flag.category) {
        Some(existing) if existing.severity >= flag.severity => {}
        _ => {
            flags.insert(flag.category, flag);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{
        CustomerId, Location, MerchantCategory, TransactionId, TransactionMetadata,
        TransactionType,
    };
    use chrono::{TimeZone, Utc};
    use rust_decimal_macros::dec;

    fn scanner() -> RuleScanner {
        RuleScanner::new(RulesConfig::default())
    }

    fn base_tx() -> Transaction {
        Transaction {
            id: TransactionId::from("txn-1"),
            customer_id: CustomerId::from("customer_001"),
            amount: dec!(45),
            transaction_type: TransactionType::Purchase,
            merchant_name: "Safeway".into(),
            merchant_category: MerchantCategory::Grocery,
            location: None,
            // Tuesday, mid-afternoon
            timestamp: Utc.with_ymd_and_hms(2024, 3, 5, 14, 0, 0).unwrap(),
            description: None,
            metadata: None,
        }
    }

    fn features_for(tx: &Transaction) -> FeatureVector {
        FeatureVector::extract(tx, None)
    }

    #[test]
    fn quiet_transaction_yields_no_flags() {
        let tx = base_tx();
        let flags = scanner().scan(&tx, &features_for(&tx));
        assert!(flags.is_empty());
    }

    #[test]
    fn large_amount_scales_with_value() {
        let mut tx = base_tx();
        tx.amount = dec!(1500);
        let flags = scanner().scan(&tx, &features_for(&tx));
        let flag = &flags[&AnomalyCategory::UnusualAmount];
        assert!((flag.severity - 0.5).abs() < 1e-9);

        tx.amount = dec!(9000);
        let flags = scanner().scan(&tx, &features_for(&tx));
        assert_eq!(flags[&AnomalyCategory::UnusualAmount].severity, 1.0);
    }

    #[test]
    fn round_multiple_of_thousand_flags_amount_pattern() {
        let mut tx = base_tx();
        tx.amount = dec!(5000);
        let flags = scanner().scan(&tx, &features_for(&tx));
        let flag = &flags[&AnomalyCategory::AmountPattern];
        assert!(flag.severity >= 0.7);
    }

    #[test]
    fn non_round_amount_does_not_flag_pattern() {
        let mut tx = base_tx();
        tx.amount = dec!(5001);
        let flags = scanner().scan(&tx, &features_for(&tx));
        assert!(!flags.contains_key(&AnomalyCategory::AmountPattern));
    }

    #[test]
    fn deep_night_scores_higher_than_early_evening_gap() {
        let mut tx = base_tx();
        tx.timestamp = Utc.with_ymd_and_hms(2024, 3, 5, 3, 0, 0).unwrap();
        let flags = scanner().scan(&tx, &features_for(&tx));
        assert_eq!(flags[&AnomalyCategory::UnusualTime].severity, 0.8);

        tx.timestamp = Utc.with_ymd_and_hms(2024, 3, 5, 5, 0, 0).unwrap();
        let flags = scanner().scan(&tx, &features_for(&tx));
        assert_eq!(flags[&AnomalyCategory::UnusualTime].severity, 0.6);
    }

    #[test]
    fn high_risk_merchant_keyword_flags() {
        let mut tx = base_tx();
        tx.merchant_name = "Lucky Star Casino".into();
        let flags = scanner().scan(&tx, &features_for(&tx));
        assert_eq!(flags[&AnomalyCategory::UnusualMerchant].severity, 0.8);
    }

    #[test]
    fn foreign_region_flags_location() {
        let mut tx = base_tx();
        tx.location = Some(Location {
            city: "Tokyo".into(),
            region: "JP".into(),
            latitude: None,
            longitude: None,
        });
        let flags = scanner().scan(&tx, &features_for(&tx));
        assert_eq!(flags[&AnomalyCategory::UnusualLocation].severity, 0.85);
    }

    #[test]
    fn domestic_region_does_not_flag() {
        let mut tx = base_tx();
        tx.location = Some(Location {
            city: "New York".into(),
            region: "NY".into(),
            latitude: None,
            longitude: None,
        });
        let flags = scanner().scan(&tx, &features_for(&tx));
        assert!(!flags.contains_key(&AnomalyCategory::UnusualLocation));
    }

    #[test]
    fn weekend_healthcare_adds_mild_time_signal() {
        let mut tx = base_tx();
        tx.merchant_category = MerchantCategory::Healthcare;
        // Saturday afternoon
        tx.timestamp = Utc.with_ymd_and_hms(2024, 3, 9, 14, 0, 0).unwrap();
        let flags = scanner().scan(&tx, &features_for(&tx));
        assert_eq!(flags[&AnomalyCategory::UnusualTime].severity, 0.5);
    }

    #[test]
    fn synthetic_mark_overrides_weaker_computed_severity() {
        let mut tx = base_tx();
        tx.amount = dec!(5000);
        tx.metadata = Some(TransactionMetadata {
            synthetic_anomaly: Some(SyntheticScenario::LargeAmount),
            extra: Default::default(),
        });
        let flags = scanner().scan(&tx, &features_for(&tx));
        // Computed severity min(5000/3000, 1.0) = 1.0 beats the synthetic 0.95.
        assert_eq!(flags[&AnomalyCategory::UnusualAmount].severity, 1.0);

        tx.amount = dec!(600);
        let flags = scanner().scan(&tx, &features_for(&tx));
        // Computed 600/3000 = 0.2 loses to the synthetic 0.95.
        assert_eq!(flags[&AnomalyCategory::UnusualAmount].severity, 0.95);
    }

    #[test]
    fn baseline_ratio_and_hour_deviation_flag_via_features() {
        let tx = base_tx();
        let mut features = features_for(&tx);
        features.amount_vs_avg = 5.0;
        features.hour_deviation = 8.0;
        let flags = scanner().scan(&tx, &features);
        assert_eq!(flags[&AnomalyCategory::UnusualAmount].severity, 0.5);
        assert_eq!(flags[&AnomalyCategory::UnusualTime].severity, 0.6);
    }

    #[test]
    fn severities_stay_in_unit_range() {
        let mut tx = base_tx();
        tx.amount = dec!(1000000);
        tx.merchant_name = "Crypto Wire Transfer Casino".into();
        tx.timestamp = Utc.with_ymd_and_hms(2024, 3, 9, 2, 0, 0).unwrap();
        tx.metadata = Some(TransactionMetadata {
            synthetic_anomaly: Some(SyntheticScenario::HighFrequency),
            extra: Default::default(),
        });
        let mut features = features_for(&tx);
        features.amount_vs_avg = 50.0;
        let flags = scanner().scan(&tx, &features);
        assert!(!flags.is_empty());
        for flag in flags.values() {
            assert!((0.0..=1.0).contains(&flag.severity), "{flag:?}");
        }
    }
}
