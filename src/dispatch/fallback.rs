//! Deterministic fallback content.
//!
//! Used whenever the injected renderer fails, so a rendering outage never
//! blocks a security notification.

use crate::domain::{Channel, ScoreResult, Transaction};
use crate::port::RenderedContent;

/// Render the built-in template for a channel.
#[must_use]
pub fn render(
    channel: Channel,
    tx: &Transaction,
    score: &ScoreResult,
    customer_name: &str,
) -> RenderedContent {
    match channel {
        Channel::Email => email(tx, score, customer_name),
        Channel::Voice => voice(tx, score, customer_name),
    }
}

fn email(tx: &Transaction, score: &ScoreResult, customer_name: &str) -> RenderedContent {
    let amount = format!("${:.2}", tx.amount);
    let tier = score.tier.to_string().to_uppercase();
    let subject = format!(
        "{tier} security alert: {amount} transaction at {} - {customer_name}",
        tx.merchant_name
    );

    let mut body = format!(
        "Dear {customer_name},\n\n\
         Our fraud detection system flagged a {amount} transaction at {} \
         on {} as {} risk.\n",
        tx.merchant_name,
        tx.timestamp.format("%B %d, %Y at %H:%M UTC"),
        score.tier,
    );
    for flag in &score.flags {
        body.push_str(&format!("- {}\n", flag.description));
    }
    body.push_str(
        "\nIf you authorized this transaction, no action is needed. \
         If you do not recognize it, please contact us immediately to \
         secure your account.\n",
    );

    RenderedContent::Email { subject, body }
}

fn voice(tx: &Transaction, score: &ScoreResult, customer_name: &str) -> RenderedContent {
    let script = format!(
        "Hello {customer_name}, this is an automated security alert. \
         We've detected {} risk activity on your account: a transaction of \
         ${:.2} at {} has been flagged by our fraud detection system. \
         If you authorized this transaction, no action is needed. \
         If not, please call us immediately to secure your account. Goodbye.",
        score.tier, tx.amount, tx.merchant_name,
    );
    RenderedContent::VoiceScript { script }
}
