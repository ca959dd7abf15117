//! Template-backed content renderer.

use async_trait::async_trait;

use crate::dispatch::fallback_render;
use crate::domain::{Channel, ScoreResult, Transaction};
use crate::port::{ContentRenderer, RenderedContent};

/// Renders notifications from the built-in deterministic templates.
///
/// The same templates back the dispatcher's rendering fallback, so with
/// this renderer installed the fallback path produces identical content.
#[derive(Debug, Default)]
pub struct TemplateRenderer;

impl TemplateRenderer {
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl ContentRenderer for TemplateRenderer {
    async fn render(
        &self,
        channel: Channel,
        tx: &Transaction,
        score: &ScoreResult,
        customer_name: &str,
    ) -> Result<RenderedContent, String> {
        Ok(fallback_render(channel, tx, score, customer_name))
    }
}
