//! Concurrent notification dispatch.
//!
//! The coordinator fans eligible channels out as independent tasks,
//! joins them, and folds every attempt into the audit log. One channel
//! failing, timing out, or hanging never blocks or cancels a sibling.

mod fallback;

pub use fallback::render as fallback_render;

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use futures_util::future::join_all;
use tracing::{info, warn};

use crate::config::NotificationConfig;
use crate::domain::{
    Channel, CustomerContact, DeliveryOutcome, NotificationRecord, ScoreResult, Transaction,
};
use crate::error::{ConfigError, SendError};
use crate::port::{AuditSink, ChannelSender, ContentRenderer, SendContext};

/// Outcome of one channel attempt.
#[derive(Debug, Clone)]
pub struct ChannelAttempt {
    pub channel: Channel,
    pub recipient: String,
    pub outcome: DeliveryOutcome,
    /// Provider-side reference for a successful send.
    pub provider_ref: Option<String>,
}

/// Aggregated result of dispatching one transaction.
#[derive(Debug, Clone, Default)]
pub struct DispatchReport {
    pub attempts: Vec<ChannelAttempt>,
}

impl DispatchReport {
    /// Whether at least one channel accepted the notification.
    #[must_use]
    pub fn any_sent(&self) -> bool {
        self.attempts.iter().any(|a| a.outcome.is_sent())
    }

    /// The outcome for a channel, if it was attempted.
    #[must_use]
    pub fn outcome(&self, channel: Channel) -> Option<&DeliveryOutcome> {
        self.attempts
            .iter()
            .find(|a| a.channel == channel)
            .map(|a| &a.outcome)
    }
}

/// Invokes eligible channel senders concurrently and audits every attempt.
pub struct DispatchCoordinator {
    senders: HashMap<Channel, Arc<dyn ChannelSender>>,
    renderer: Arc<dyn ContentRenderer>,
    audit: Arc<dyn AuditSink>,
    send_timeout: Duration,
}

impl DispatchCoordinator {
    /// Wire up the coordinator.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::ChannelNotWired`] when a globally enabled
    /// channel has no registered sender. This is checked here, at
    /// construction, so a misconfiguration fails before any transaction
    /// is processed.
    pub fn new(
        config: &NotificationConfig,
        senders: Vec<Arc<dyn ChannelSender>>,
        renderer: Arc<dyn ContentRenderer>,
        audit: Arc<dyn AuditSink>,
    ) -> Result<Self, ConfigError> {
        let senders: HashMap<Channel, Arc<dyn ChannelSender>> =
            senders.into_iter().map(|s| (s.channel(), s)).collect();

        for channel in Channel::ALL {
            if config.channel_enabled(channel) && !senders.contains_key(&channel) {
                return Err(ConfigError::ChannelNotWired { channel });
            }
        }

        Ok(Self {
            senders,
            renderer,
            audit,
            send_timeout: Duration::from_secs(config.send_timeout_secs),
        })
    }

    /// Dispatch to the given eligible channels concurrently.
    ///
    /// Every attempt produces a [`NotificationRecord`] regardless of
    /// outcome. The report says whether anything was sent; the caller
    /// updates rate-limit state exactly once when it was.
    pub async fn dispatch(
        &self,
        tx: &Transaction,
        score: &ScoreResult,
        contact: &CustomerContact,
        eligible: &[(Channel, String)],
    ) -> DispatchReport {
        let tasks = eligible
            .iter()
            .filter_map(|(channel, recipient)| {
                let Some(sender) = self.senders.get(channel) else {
                    // Policy only clears globally enabled channels, and
                    // construction checked those are wired.
                    warn!(channel = %channel, "eligible channel has no sender, skipping");
                    return None;
                };
                Some(self.attempt(*channel, recipient.clone(), sender.clone(), tx, score, contact))
            })
            .collect::<Vec<_>>();

        let attempts = join_all(tasks).await;

        for attempt in &attempts {
            let mut record = NotificationRecord::new(
                tx.customer_id.clone(),
                tx.id.clone(),
                attempt.channel,
                score.tier,
                attempt.outcome.clone(),
            )
            .with_recipient(attempt.recipient.clone());
            if let Some(provider_ref) = &attempt.provider_ref {
                record = record.with_provider_ref(provider_ref.clone());
            }
            self.audit.append(record);
        }

        let report = DispatchReport { attempts };
        info!(
            transaction_id = %tx.id,
            customer_id = %tx.customer_id,
            tier = %score.tier,
            attempted = report.attempts.len(),
            sent = report.attempts.iter().filter(|a| a.outcome.is_sent()).count(),
            "dispatch complete"
        );
        report
    }

    async fn attempt(
        &self,
        channel: Channel,
        recipient: String,
        sender: Arc<dyn ChannelSender>,
        tx: &Transaction,
        score: &ScoreResult,
        contact: &CustomerContact,
    ) -> ChannelAttempt {
        let content = match self
            .renderer
            .render(channel, tx, score, &contact.name)
            .await
        {
            Ok(content) => content,
            Err(error) => {
                warn!(channel = %channel, %error, "renderer failed, using fallback template");
                fallback::render(channel, tx, score, &contact.name)
            }
        };

        let context = SendContext {
            customer_id: tx.customer_id.clone(),
            transaction_id: tx.id.clone(),
            tier: score.tier.to_string(),
        };

        let (outcome, provider_ref) = match tokio::time::timeout(
            self.send_timeout,
            sender.send(&recipient, &content, &context),
        )
        .await
        {
            Ok(Ok(receipt)) => {
                info!(
                    channel = %channel,
                    transaction_id = %tx.id,
                    provider_ref = receipt.provider_ref.as_deref().unwrap_or("-"),
                    "notification sent"
                );
                (DeliveryOutcome::Sent, receipt.provider_ref)
            }
            Ok(Err(error)) => {
                warn!(channel = %channel, transaction_id = %tx.id, %error, "send failed");
                (
                    DeliveryOutcome::Failed {
                        error: error.to_string(),
                    },
                    None,
                )
            }
            Err(_) => {
                let error = SendError::Timeout {
                    secs: self.send_timeout.as_secs(),
                };
                warn!(channel = %channel, transaction_id = %tx.id, %error, "send timed out");
                (
                    DeliveryOutcome::Failed {
                        error: error.to_string(),
                    },
                    None,
                )
            }
        };

        ChannelAttempt {
            channel,
            recipient,
            outcome,
            provider_ref,
        }
    }
}
