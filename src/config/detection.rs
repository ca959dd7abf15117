//! Detection configuration: rule thresholds, model parameters, scoring weights.

use rust_decimal::Decimal;
use serde::Deserialize;

use crate::error::ConfigError;

/// Thresholds and lists driving the rule anomaly scanner.
#[derive(Debug, Clone, Deserialize)]
pub struct RulesConfig {
    /// Amounts above this floor start scaling the unusual-amount severity.
    #[serde(default = "default_amount_floor")]
    pub amount_floor: Decimal,

    /// Divisor controlling how fast severity approaches 1.0 with amount.
    #[serde(default = "default_amount_scale")]
    pub amount_scale: Decimal,

    /// First hour of the normal transacting day (inclusive).
    #[serde(default = "default_day_start")]
    pub day_start: u32,

    /// Last hour of the normal transacting day (inclusive).
    #[serde(default = "default_day_end")]
    pub day_end: u32,

    /// Round-number unit for structuring detection.
    #[serde(default = "default_round_unit")]
    pub round_unit: Decimal,

    /// Keywords flagging a merchant as high-risk.
    #[serde(default = "default_merchant_keywords")]
    pub merchant_keywords: Vec<String>,

    /// Region codes treated as foreign for location checks.
    #[serde(default = "default_foreign_regions")]
    pub foreign_regions: Vec<String>,

    /// Amount ratio over the customer average that triggers a flag.
    #[serde(default = "default_baseline_ratio")]
    pub baseline_ratio: f64,

    /// Hours away from the customer's typical hour that trigger a flag.
    #[serde(default = "default_hour_deviation")]
    pub hour_deviation: f64,
}

fn default_amount_floor() -> Decimal {
    Decimal::new(500, 0)
}

fn default_amount_scale() -> Decimal {
    Decimal::new(3000, 0)
}

fn default_day_start() -> u32 {
    6
}

fn default_day_end() -> u32 {
    22
}

fn default_round_unit() -> Decimal {
    Decimal::new(1000, 0)
}

fn default_merchant_keywords() -> Vec<String> {
    [
        "Casino",
        "Crypto",
        "Adult",
        "Investigation",
        "Wire Transfer",
        "Money Exchange",
    ]
    .into_iter()
    .map(String::from)
    .collect()
}

fn default_foreign_regions() -> Vec<String> {
    ["JP", "UK", "AE", "RU", "TH", "CN", "DE", "FR"]
        .into_iter()
        .map(String::from)
        .collect()
}

fn default_baseline_ratio() -> f64 {
    3.0
}

fn default_hour_deviation() -> f64 {
    6.0
}

impl Default for RulesConfig {
    fn default() -> Self {
        Self {
            amount_floor: default_amount_floor(),
            amount_scale: default_amount_scale(),
            day_start: default_day_start(),
            day_end: default_day_end(),
            round_unit: default_round_unit(),
            merchant_keywords: default_merchant_keywords(),
            foreign_regions: default_foreign_regions(),
            baseline_ratio: default_baseline_ratio(),
            hour_deviation: default_hour_deviation(),
        }
    }
}

impl RulesConfig {
    pub(crate) fn validate(&self) -> Result<(), ConfigError> {
        if self.day_start > 23 || self.day_end > 23 {
            return Err(ConfigError::InvalidValue {
                field: "rules.day_start/day_end",
                reason: "hours must be 0-23".into(),
            });
        }
        if self.day_start >= self.day_end {
            return Err(ConfigError::InvalidValue {
                field: "rules.day_start",
                reason: format!("must be before day_end ({} >= {})", self.day_start, self.day_end),
            });
        }
        if self.round_unit <= Decimal::ZERO {
            return Err(ConfigError::InvalidValue {
                field: "rules.round_unit",
                reason: "must be positive".into(),
            });
        }
        if self.amount_scale <= Decimal::ZERO {
            return Err(ConfigError::InvalidValue {
                field: "rules.amount_scale",
                reason: "must be positive".into(),
            });
        }
        Ok(())
    }
}

/// Parameters for the isolation-forest outlier model.
#[derive(Debug, Clone, Deserialize)]
pub struct OutlierConfig {
    /// Disabling the model skips scoring and yields the neutral 0.5.
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Number of trees in the ensemble.
    #[serde(default = "default_trees")]
    pub trees: usize,

    /// Subsample size each tree is grown from.
    #[serde(default = "default_sample_size")]
    pub sample_size: usize,

    /// Size of the synthetic training distribution.
    #[serde(default = "default_training_size")]
    pub training_size: usize,

    /// RNG seed for reproducible fits.
    #[serde(default = "default_seed")]
    pub seed: u64,
}

fn default_true() -> bool {
    true
}

fn default_trees() -> usize {
    100
}

fn default_sample_size() -> usize {
    256
}

fn default_training_size() -> usize {
    1000
}

fn default_seed() -> u64 {
    42
}

impl Default for OutlierConfig {
    fn default() -> Self {
        Self {
            enabled: default_true(),
            trees: default_trees(),
            sample_size: default_sample_size(),
            training_size: default_training_size(),
            seed: default_seed(),
        }
    }
}

impl OutlierConfig {
    pub(crate) fn validate(&self) -> Result<(), ConfigError> {
        if self.enabled {
            if self.trees == 0 {
                return Err(ConfigError::InvalidValue {
                    field: "outlier.trees",
                    reason: "must be at least 1".into(),
                });
            }
            if self.sample_size < 2 {
                return Err(ConfigError::InvalidValue {
                    field: "outlier.sample_size",
                    reason: "must be at least 2".into(),
                });
            }
            if self.training_size < self.sample_size {
                return Err(ConfigError::InvalidValue {
                    field: "outlier.training_size",
                    reason: format!(
                        "must be at least sample_size ({} < {})",
                        self.training_size, self.sample_size
                    ),
                });
            }
        }
        Ok(())
    }
}

/// Weights and thresholds for combining rule and model scores.
#[derive(Debug, Clone, Deserialize)]
pub struct ScoringConfig {
    /// Weight of the deterministic rule score.
    #[serde(default = "default_rule_weight")]
    pub rule_weight: f64,

    /// Weight of the statistical outlier likelihood.
    #[serde(default = "default_model_weight")]
    pub model_weight: f64,

    /// Combined confidence above this marks the transaction anomalous.
    #[serde(default = "default_confidence_threshold")]
    pub confidence_threshold: f64,
}

fn default_rule_weight() -> f64 {
    0.6
}

fn default_model_weight() -> f64 {
    0.4
}

fn default_confidence_threshold() -> f64 {
    0.3
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            rule_weight: default_rule_weight(),
            model_weight: default_model_weight(),
            confidence_threshold: default_confidence_threshold(),
        }
    }
}

impl ScoringConfig {
    pub(crate) fn validate(&self) -> Result<(), ConfigError> {
        if self.rule_weight < 0.0 || self.model_weight < 0.0 {
            return Err(ConfigError::InvalidValue {
                field: "scoring.rule_weight/model_weight",
                reason: "weights must be non-negative".into(),
            });
        }
        if self.rule_weight + self.model_weight <= 0.0 {
            return Err(ConfigError::InvalidValue {
                field: "scoring.rule_weight",
                reason: "weights must not both be zero".into(),
            });
        }
        if !(0.0..=1.0).contains(&self.confidence_threshold) {
            return Err(ConfigError::InvalidValue {
                field: "scoring.confidence_threshold",
                reason: format!("must be in [0, 1], got {}", self.confidence_threshold),
            });
        }
        Ok(())
    }
}
