//! Detection stages: rule scanning, outlier scoring, score combination.

mod combiner;
mod outlier;
mod rules;

pub use combiner::combine;
pub use outlier::{OutlierModel, NEUTRAL_SCORE};
pub use rules::RuleScanner;
