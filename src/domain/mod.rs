//! Channel-agnostic domain types for fraud scoring and notification.

mod anomaly;
mod baseline;
mod feature;
mod ids;
mod notification;
mod transaction;

// Core identifiers
pub use ids::{CustomerId, TransactionId};

// Transactions and baselines
pub use baseline::CustomerBaseline;
pub use transaction::{
    Location, MerchantCategory, SyntheticScenario, Transaction, TransactionMetadata,
    TransactionType,
};

// Scoring types
pub use anomaly::{AnomalyCategory, AnomalyFlag, RiskTier, ScoreResult};
pub use feature::{FeatureVector, FEATURE_COUNT};

// Notification types
pub use notification::{
    Channel, CustomerContact, DeliveryOutcome, NotificationRecord, NotificationSettings,
    QuietHours, SuppressionReason,
};
