//! Combining rule and model scores into a classified result.
//!
//! Confidence weights the deterministic rule score over the statistical
//! likelihood (0.6 / 0.4 by default). Category attribution comes from the
//! rules alone; the model moves confidence, never labels.

use std::collections::BTreeMap;

use chrono::Utc;

use crate::config::ScoringConfig;
use crate::domain::{AnomalyCategory, AnomalyFlag, FeatureVector, RiskTier, ScoreResult};

/// Merge rule flags and the outlier likelihood into a [`ScoreResult`].
///
/// Pure and deterministic given its inputs; never fails.
#[must_use]
pub fn combine(
    flags: BTreeMap<AnomalyCategory, AnomalyFlag>,
    outlier_likelihood: f64,
    features: &FeatureVector,
    config: &ScoringConfig,
) -> ScoreResult {
    let rule_score = flags
        .values()
        .map(|f| f.severity)
        .fold(0.0_f64, f64::max);

    let confidence = (config.rule_weight * rule_score
        + config.model_weight * outlier_likelihood.clamp(0.0, 1.0))
    .clamp(0.0, 1.0);

    let tier = RiskTier::from_confidence(confidence);
    let is_anomaly = confidence > config.confidence_threshold;

    let flags: Vec<AnomalyFlag> = flags.into_values().collect();
    let recommendations = recommendations_for(tier, &flags);

    ScoreResult {
        is_anomaly,
        confidence,
        tier,
        flags,
        features: features.to_map(),
        recommendations,
        scored_at: Utc::now(),
    }
}

/// Analyst-facing follow-up actions by tier and category.
fn recommendations_for(tier: RiskTier, flags: &[AnomalyFlag]) -> Vec<String> {
    let mut out = Vec::new();

    match tier {
        RiskTier::Critical => {
            out.push("Immediately freeze card and contact customer".to_string());
            out.push("Investigate transaction for potential fraud".to_string());
        }
        RiskTier::High => {
            out.push("Contact customer to verify transaction".to_string());
            out.push("Monitor account for additional suspicious activity".to_string());
        }
        RiskTier::Medium => {
            out.push("Flag for manual review".to_string());
            out.push("Increase monitoring on account".to_string());
        }
        RiskTier::Low => {}
    }

    for flag in flags {
        match flag.category {
            AnomalyCategory::UnusualAmount => {
                out.push("Verify large transaction with customer".to_string());
            }
            AnomalyCategory::UnusualTime => {
                out.push("Check if transaction time matches customer pattern".to_string());
            }
            AnomalyCategory::UnusualLocation => {
                out.push("Verify customer location and travel plans".to_string());
            }
            _ => {}
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{
        CustomerId, MerchantCategory, Transaction, TransactionId, TransactionType,
    };
    use chrono::{TimeZone, Utc};
    use rust_decimal_macros::dec;

    fn features() -> FeatureVector {
        let tx = Transaction {
            id: TransactionId::from("txn-1"),
            customer_id: CustomerId::from("customer_001"),
            amount: dec!(100),
            transaction_type: TransactionType::Purchase,
            merchant_name: "Shell".into(),
            merchant_category: MerchantCategory::GasStation,
            location: None,
            timestamp: Utc.with_ymd_and_hms(2024, 3, 5, 12, 0, 0).unwrap(),
            description: None,
            metadata: None,
        };
        FeatureVector::extract(&tx, None)
    }

    fn flag(category: AnomalyCategory, severity: f64) -> (AnomalyCategory, AnomalyFlag) {
        (category, AnomalyFlag::new(category, severity, "test flag"))
    }

    #[test]
    fn weights_combine_rule_and_model_scores() {
        let flags = BTreeMap::from([flag(AnomalyCategory::UnusualAmount, 0.8)]);
        let result = combine(flags, 0.5, &features(), &ScoringConfig::default());
        // 0.6 * 0.8 + 0.4 * 0.5 = 0.68
        assert!((result.confidence - 0.68).abs() < 1e-9);
        assert_eq!(result.tier, RiskTier::Medium);
        assert!(result.is_anomaly);
    }

    #[test]
    fn no_flags_defaults_rule_score_to_zero() {
        let result = combine(BTreeMap::new(), 0.5, &features(), &ScoringConfig::default());
        assert!((result.confidence - 0.2).abs() < 1e-9);
        assert_eq!(result.tier, RiskTier::Low);
        assert!(!result.is_anomaly);
        assert!(result.flags.is_empty());
        assert!(result.recommendations.is_empty());
    }

    #[test]
    fn confidence_is_monotonic_in_rule_severity() {
        let config = ScoringConfig::default();
        let mut last = -1.0;
        for severity in [0.0, 0.2, 0.4, 0.6, 0.8, 1.0] {
            let flags = BTreeMap::from([flag(AnomalyCategory::UnusualAmount, severity)]);
            let confidence = combine(flags, 0.5, &features(), &config).confidence;
            assert!(confidence >= last, "severity {severity} dropped confidence");
            last = confidence;
        }
    }

    #[test]
    fn confidence_is_monotonic_in_outlier_likelihood() {
        let config = ScoringConfig::default();
        let mut last = -1.0;
        for likelihood in [0.0, 0.25, 0.5, 0.75, 1.0] {
            let flags = BTreeMap::from([flag(AnomalyCategory::UnusualMerchant, 0.6)]);
            let confidence = combine(flags, likelihood, &features(), &config).confidence;
            assert!(confidence >= last, "likelihood {likelihood} dropped confidence");
            last = confidence;
        }
    }

    #[test]
    fn confidence_is_clamped_to_unit_range() {
        let flags = BTreeMap::from([flag(AnomalyCategory::UnusualAmount, 1.0)]);
        let result = combine(flags, 2.5, &features(), &ScoringConfig::default());
        assert!(result.confidence <= 1.0);
    }

    #[test]
    fn categories_come_from_rules_only() {
        // A high likelihood with no flags raises confidence but attributes
        // no category.
        let result = combine(BTreeMap::new(), 1.0, &features(), &ScoringConfig::default());
        assert!(result.categories().is_empty());
        assert!((result.confidence - 0.4).abs() < 1e-9);
    }

    #[test]
    fn critical_tier_recommends_freeze() {
        let flags = BTreeMap::from([flag(AnomalyCategory::UnusualAmount, 1.0)]);
        let result = combine(flags, 1.0, &features(), &ScoringConfig::default());
        assert_eq!(result.tier, RiskTier::Critical);
        assert!(result
            .recommendations
            .iter()
            .any(|r| r.contains("freeze card")));
        assert!(result
            .recommendations
            .iter()
            .any(|r| r.contains("Verify large transaction")));
    }
}
