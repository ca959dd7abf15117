//! Channel sender port.

use async_trait::async_trait;

use crate::domain::{Channel, CustomerId, TransactionId};
use crate::error::SendError;

/// Context handed to a sender alongside the rendered content.
#[derive(Debug, Clone)]
pub struct SendContext {
    pub customer_id: CustomerId,
    pub transaction_id: TransactionId,
    /// Risk tier as a string, for provider-side tagging.
    pub tier: String,
}

/// Provider acknowledgement for an accepted send.
#[derive(Debug, Clone)]
pub struct SendReceipt {
    /// Provider-side reference (message id, call sid). Optional because
    /// some providers acknowledge without one.
    pub provider_ref: Option<String>,
}

/// Outbound delivery for one notification channel.
///
/// Real implementations wrap a provider (SMTP relay, telephony API) and
/// own their internal retry and timeout behavior. The dispatcher adds its
/// own bounded wait on top, so a hung sender cannot stall a transaction.
///
/// # Thread Safety
///
/// Implementations must be thread-safe (`Send + Sync`); the dispatcher
/// invokes multiple senders concurrently for the same transaction.
#[async_trait]
pub trait ChannelSender: Send + Sync {
    /// The channel this sender delivers to.
    fn channel(&self) -> Channel;

    /// Deliver rendered content to a recipient.
    ///
    /// # Errors
    ///
    /// Returns [`SendError`] when the provider rejects or fails the send.
    /// Errors are recorded in the audit log, never propagated further.
    async fn send(
        &self,
        recipient: &str,
        content: &crate::port::RenderedContent,
        context: &SendContext,
    ) -> Result<SendReceipt, SendError>;
}
