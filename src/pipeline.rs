//! End-to-end transaction processing.
//!
//! [`FraudEngine`] composes the stages: feature extraction, rule
//! scanning and outlier scoring, score combination, policy evaluation,
//! and dispatch. Scoring is synchronous and per-transaction infallible;
//! only dispatch awaits. The engine owns the rate-limit store and holds
//! the customer's lock from the eligibility check through the state
//! update, which is what keeps two concurrent anomalies for one customer
//! from double-notifying.

use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, info, warn};

use crate::config::Config;
use crate::detect::{combine, OutlierModel, RuleScanner};
use crate::dispatch::{DispatchCoordinator, DispatchReport};
use crate::domain::{
    Channel, FeatureVector, NotificationRecord, ScoreResult, SuppressionReason, Transaction,
};
use crate::error::Result;
use crate::policy::{ChannelVerdict, PolicyDecision, PolicyEngine, RateLimitStore};
use crate::port::{AuditSink, ChannelSender, ContentRenderer, CustomerDirectory};

/// What happened to one transaction end to end.
#[derive(Debug)]
pub struct TransactionOutcome {
    pub score: ScoreResult,
    /// Policy verdicts, when the transaction was anomalous and the
    /// customer is known.
    pub decision: Option<PolicyDecision>,
    /// Channel attempts, empty when nothing was eligible.
    pub report: DispatchReport,
}

impl TransactionOutcome {
    fn scored_only(score: ScoreResult) -> Self {
        Self {
            score,
            decision: None,
            report: DispatchReport::default(),
        }
    }
}

/// The fraud scoring and notification engine.
pub struct FraudEngine {
    scanner: RuleScanner,
    model: OutlierModel,
    scoring: crate::config::ScoringConfig,
    policy: PolicyEngine,
    coordinator: DispatchCoordinator,
    rate_limits: RateLimitStore,
    directory: Arc<dyn CustomerDirectory>,
    audit: Arc<dyn AuditSink>,
}

impl FraudEngine {
    /// Build the engine from configuration and injected collaborators.
    ///
    /// # Errors
    ///
    /// Returns a configuration error when the config is invalid or an
    /// enabled channel has no sender. Nothing is processed after a
    /// construction failure.
    pub fn new(
        config: &Config,
        directory: Arc<dyn CustomerDirectory>,
        renderer: Arc<dyn ContentRenderer>,
        senders: Vec<Arc<dyn ChannelSender>>,
        audit: Arc<dyn AuditSink>,
    ) -> Result<Self> {
        config.validate()?;

        let coordinator = DispatchCoordinator::new(
            &config.notification,
            senders,
            renderer,
            Arc::clone(&audit),
        )?;

        Ok(Self {
            scanner: RuleScanner::new(config.rules.clone()),
            model: OutlierModel::fit(&config.outlier),
            scoring: config.scoring.clone(),
            policy: PolicyEngine::new(config.notification.clone()),
            coordinator,
            rate_limits: RateLimitStore::new(),
            directory,
            audit,
        })
    }

    /// Score a transaction without dispatching anything.
    ///
    /// Synchronous, pure apart from the baseline lookup, and never fails:
    /// missing baselines and a disabled model degrade to neutral values.
    #[must_use]
    pub fn score(&self, tx: &Transaction) -> ScoreResult {
        let baseline = self.directory.baseline(&tx.customer_id);
        let features = FeatureVector::extract(tx, baseline.as_ref());
        let flags = self.scanner.scan(tx, &features);
        let likelihood = self.model.score(&features);
        let result = combine(flags, likelihood, &features, &self.scoring);

        debug!(
            transaction_id = %tx.id,
            customer_id = %tx.customer_id,
            confidence = result.confidence,
            tier = %result.tier,
            is_anomaly = result.is_anomaly,
            "transaction scored"
        );
        result
    }

    /// Score a transaction and, when warranted, notify the customer.
    pub async fn process(&self, tx: &Transaction) -> TransactionOutcome {
        let score = self.score(tx);

        if !score.is_anomaly {
            return TransactionOutcome::scored_only(score);
        }

        let Some(contact) = self.directory.contact(&tx.customer_id) else {
            warn!(
                customer_id = %tx.customer_id,
                transaction_id = %tx.id,
                "anomalous transaction for unknown customer, nothing to dispatch"
            );
            return TransactionOutcome::scored_only(score);
        };
        let settings = self.directory.settings(&tx.customer_id);

        // Serialize against other transactions for the same customer. The
        // guard is held through dispatch so the cooldown/cap read stays
        // valid until the state update.
        let handle = self.rate_limits.handle(&tx.customer_id);
        let mut state = handle.lock().await;

        let now = Utc::now();
        let decision = self
            .policy
            .evaluate(&score, &contact, &settings, &state, now);
        self.audit_suppressions(tx, &score, &decision);

        let eligible = decision.eligible();
        if eligible.is_empty() {
            return TransactionOutcome {
                score,
                decision: Some(decision),
                report: DispatchReport::default(),
            };
        }

        let report = self
            .coordinator
            .dispatch(tx, &score, &contact, &eligible)
            .await;

        // One combined update for the transaction, not one per channel:
        // the cooldown and cap are customer-global.
        if report.any_sent() {
            state.record_notification(Utc::now());
            info!(
                customer_id = %tx.customer_id,
                transaction_id = %tx.id,
                "rate-limit state updated"
            );
        }

        TransactionOutcome {
            score,
            decision: Some(decision),
            report,
        }
    }

    /// Record rate-limit and quiet-hours suppressions for telemetry.
    /// Threshold and preference misses are ordinary non-events and stay
    /// out of the audit log.
    fn audit_suppressions(&self, tx: &Transaction, score: &ScoreResult, decision: &PolicyDecision) {
        for channel in Channel::ALL {
            if let ChannelVerdict::Suppressed(reason) = decision.verdict(channel) {
                if matches!(
                    reason,
                    SuppressionReason::QuietHours
                        | SuppressionReason::CooldownActive
                        | SuppressionReason::DailyCapReached
                ) {
                    self.audit.append(NotificationRecord::new(
                        tx.customer_id.clone(),
                        tx.id.clone(),
                        channel,
                        score.tier,
                        crate::domain::DeliveryOutcome::Suppressed {
                            reason: reason.clone(),
                        },
                    ));
                }
            }
        }
    }

    /// The rate-limit store, mainly for inspection in tests and tooling.
    #[must_use]
    pub fn rate_limits(&self) -> &RateLimitStore {
        &self.rate_limits
    }

    /// Whether the outlier model participates in scoring.
    #[must_use]
    pub fn outlier_enabled(&self) -> bool {
        self.model.is_enabled()
    }
}
