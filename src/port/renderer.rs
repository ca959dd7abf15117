//! Content rendering port.

use async_trait::async_trait;

use crate::domain::{Channel, ScoreResult, Transaction};

/// Channel-appropriate human-readable notification content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RenderedContent {
    /// Email subject and body.
    Email { subject: String, body: String },
    /// Script spoken by the voice channel.
    VoiceScript { script: String },
}

impl RenderedContent {
    /// The channel this content is shaped for.
    #[must_use]
    pub fn channel(&self) -> Channel {
        match self {
            Self::Email { .. } => Channel::Email,
            Self::VoiceScript { .. } => Channel::Voice,
        }
    }
}

/// Produces human-readable notification content.
///
/// Implementations may call out to a generative service; the dispatcher
/// falls back to a deterministic template when rendering fails, so an
/// implementation error never blocks a notification.
#[async_trait]
pub trait ContentRenderer: Send + Sync {
    /// Render content for one channel.
    ///
    /// # Errors
    ///
    /// Returns an error string describing the rendering failure. The
    /// dispatcher substitutes the built-in template on error.
    async fn render(
        &self,
        channel: Channel,
        tx: &Transaction,
        score: &ScoreResult,
        customer_name: &str,
    ) -> Result<RenderedContent, String>;
}
