//! Anomaly classification types.
//!
//! The rule scanner produces [`AnomalyFlag`]s, the combiner folds them
//! together with the outlier likelihood into a [`ScoreResult`], and the
//! confidence maps onto an ordered [`RiskTier`]. All of these are
//! immutable values: a `ScoreResult` is created once per transaction and
//! never touched again.

use std::collections::BTreeMap;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Categories of anomaly the rule scanner can attribute.
///
/// Categories are not mutually exclusive; one transaction can carry
/// several flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnomalyCategory {
    UnusualAmount,
    UnusualTime,
    UnusualLocation,
    UnusualMerchant,
    VelocitySpike,
    AmountPattern,
}

impl fmt::Display for AnomalyCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::UnusualAmount => "unusual_amount",
            Self::UnusualTime => "unusual_time",
            Self::UnusualLocation => "unusual_location",
            Self::UnusualMerchant => "unusual_merchant",
            Self::VelocitySpike => "velocity_spike",
            Self::AmountPattern => "amount_pattern",
        };
        write!(f, "{s}")
    }
}

/// A single triggered anomaly rule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnomalyFlag {
    pub category: AnomalyCategory,
    /// Severity in [0, 1]. Clamped at construction.
    pub severity: f64,
    pub description: String,
    /// Supporting values the rule observed, keyed by name.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub evidence: BTreeMap<String, String>,
}

impl AnomalyFlag {
    /// Create a flag, clamping severity into [0, 1].
    #[must_use]
    pub fn new(category: AnomalyCategory, severity: f64, description: impl Into<String>) -> Self {
        Self {
            category,
            severity: severity.clamp(0.0, 1.0),
            description: description.into(),
            evidence: BTreeMap::new(),
        }
    }

    /// Attach an evidence entry (builder style).
    #[must_use]
    pub fn with_evidence(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.evidence.insert(key.into(), value.into());
        self
    }
}

/// Ordered risk classification derived from combined confidence.
///
/// The derived `Ord` gives `Low < Medium < High < Critical`, which is the
/// ordering channel thresholds compare against.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum RiskTier {
    #[default]
    Low,
    Medium,
    High,
    Critical,
}

impl RiskTier {
    /// Map a combined confidence onto a tier using the fixed cut points.
    ///
    /// Deterministic and monotonic: a higher confidence never yields a
    /// lower tier.
    #[must_use]
    pub fn from_confidence(confidence: f64) -> Self {
        if confidence >= 0.9 {
            Self::Critical
        } else if confidence >= 0.7 {
            Self::High
        } else if confidence >= 0.4 {
            Self::Medium
        } else {
            Self::Low
        }
    }
}

impl fmt::Display for RiskTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
            Self::Critical => "critical",
        };
        write!(f, "{s}")
    }
}

/// Outcome of scoring one transaction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreResult {
    /// Whether the combined confidence cleared the anomaly threshold.
    pub is_anomaly: bool,
    /// Combined rule + model confidence in [0, 1].
    pub confidence: f64,
    pub tier: RiskTier,
    /// Triggered rule flags, at most one per category (max severity wins).
    pub flags: Vec<AnomalyFlag>,
    /// Feature values the detectors saw, for audit and explanation.
    pub features: BTreeMap<String, f64>,
    /// Suggested follow-up actions for analysts.
    pub recommendations: Vec<String>,
    pub scored_at: DateTime<Utc>,
}

impl ScoreResult {
    /// Categories attributed by the rule scanner.
    #[must_use]
    pub fn categories(&self) -> Vec<AnomalyCategory> {
        self.flags.iter().map(|f| f.category).collect()
    }

    /// Severity of a given category, if flagged.
    #[must_use]
    pub fn severity(&self, category: AnomalyCategory) -> Option<f64> {
        self.flags
            .iter()
            .find(|f| f.category == category)
            .map(|f| f.severity)
    }
}
