//! Simulated channel senders.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use tracing::info;

use crate::domain::Channel;
use crate::error::SendError;
use crate::port::{ChannelSender, RenderedContent, SendContext, SendReceipt};

/// How a [`SimulatedSender`] behaves on each send.
#[derive(Debug, Clone)]
pub enum SenderBehavior {
    /// Accept every send after the configured latency.
    Succeed,
    /// Fail every send with the given provider error.
    Fail(String),
    /// Fail every n-th send (1-based), succeed otherwise.
    FailEvery(u64),
    /// Sleep far beyond any dispatch timeout, never answering.
    Hang,
}

/// In-process stand-in for a provider-backed sender.
///
/// Deterministic apart from latency, which makes it suitable for both the
/// demo binary and concurrency tests.
pub struct SimulatedSender {
    channel: Channel,
    latency: Duration,
    behavior: SenderBehavior,
    sent: AtomicU64,
}

impl SimulatedSender {
    #[must_use]
    pub fn new(channel: Channel, latency: Duration, behavior: SenderBehavior) -> Self {
        Self {
            channel,
            latency,
            behavior,
            sent: AtomicU64::new(0),
        }
    }

    /// A sender that accepts everything with negligible latency.
    #[must_use]
    pub fn reliable(channel: Channel) -> Self {
        Self::new(channel, Duration::from_millis(5), SenderBehavior::Succeed)
    }

    /// Number of sends this sender has accepted.
    #[must_use]
    pub fn sent_count(&self) -> u64 {
        self.sent.load(Ordering::Relaxed)
    }

    fn provider_ref(&self, attempt: u64) -> String {
        match self.channel {
            Channel::Email => format!("sim-msg-{attempt:06}"),
            Channel::Voice => format!("sim-call-{attempt:06}"),
        }
    }
}

#[async_trait]
impl ChannelSender for SimulatedSender {
    fn channel(&self) -> Channel {
        self.channel
    }

    async fn send(
        &self,
        recipient: &str,
        content: &RenderedContent,
        context: &SendContext,
    ) -> Result<SendReceipt, SendError> {
        debug_assert_eq!(content.channel(), self.channel);

        tokio::time::sleep(self.latency).await;

        let attempt = self.sent.fetch_add(1, Ordering::Relaxed) + 1;
        match &self.behavior {
            SenderBehavior::Succeed => {}
            SenderBehavior::Fail(error) => {
                return Err(SendError::Provider(error.clone()));
            }
            SenderBehavior::FailEvery(n) => {
                if attempt % n == 0 {
                    return Err(SendError::Provider(format!(
                        "simulated outage on attempt {attempt}"
                    )));
                }
            }
            SenderBehavior::Hang => {
                tokio::time::sleep(Duration::from_secs(3600)).await;
            }
        }

        info!(
            channel = %self.channel,
            recipient,
            customer_id = %context.customer_id,
            tier = %context.tier,
            "simulated delivery"
        );
        Ok(SendReceipt {
            provider_ref: Some(self.provider_ref(attempt)),
        })
    }
}
