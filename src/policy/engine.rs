//! Notification eligibility policy.
//!
//! Decides, per channel, whether a scored transaction may produce a
//! notification. Per-channel checks are threshold and preference based;
//! cooldown and the daily cap are customer-global: when either is hit,
//! every channel is suppressed for this transaction, protecting the
//! customer from notification fatigue as a whole rather than per channel.

use chrono::{DateTime, Timelike, Utc};

use crate::config::NotificationConfig;
use crate::domain::{
    Channel, CustomerContact, NotificationSettings, ScoreResult, SuppressionReason,
};

use super::rate_limit::RateLimitState;

/// Verdict for one channel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChannelVerdict {
    /// The channel may be attempted, delivering to this recipient.
    Eligible { recipient: String },
    /// The channel is suppressed for this transaction.
    Suppressed(SuppressionReason),
}

impl ChannelVerdict {
    #[must_use]
    pub fn is_eligible(&self) -> bool {
        matches!(self, Self::Eligible { .. })
    }
}

/// Per-channel verdicts for one transaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PolicyDecision {
    pub email: ChannelVerdict,
    pub voice: ChannelVerdict,
}

impl PolicyDecision {
    /// Channels cleared for dispatch, with their recipients.
    #[must_use]
    pub fn eligible(&self) -> Vec<(Channel, String)> {
        let mut out = Vec::new();
        if let ChannelVerdict::Eligible { recipient } = &self.email {
            out.push((Channel::Email, recipient.clone()));
        }
        if let ChannelVerdict::Eligible { recipient } = &self.voice {
            out.push((Channel::Voice, recipient.clone()));
        }
        out
    }

    /// The verdict for a channel.
    #[must_use]
    pub fn verdict(&self, channel: Channel) -> &ChannelVerdict {
        match channel {
            Channel::Email => &self.email,
            Channel::Voice => &self.voice,
        }
    }

    fn suppressed_everywhere(reason: SuppressionReason) -> Self {
        Self {
            email: ChannelVerdict::Suppressed(reason.clone()),
            voice: ChannelVerdict::Suppressed(reason),
        }
    }
}

/// Evaluates notification eligibility against preferences and rate limits.
#[derive(Debug, Clone)]
pub struct PolicyEngine {
    config: NotificationConfig,
}

impl PolicyEngine {
    #[must_use]
    pub fn new(config: NotificationConfig) -> Self {
        Self { config }
    }

    /// Evaluate all channels for one scored transaction.
    ///
    /// The caller must hold the customer's rate-limit lock so the state
    /// read here stays valid through dispatch.
    #[must_use]
    pub fn evaluate(
        &self,
        score: &ScoreResult,
        contact: &CustomerContact,
        settings: &NotificationSettings,
        state: &RateLimitState,
        now: DateTime<Utc>,
    ) -> PolicyDecision {
        // Cooldown and daily cap are checked once and bind every channel.
        if state.in_cooldown(now, settings.cooldown_secs) {
            tracing::debug!(
                customer_id = %contact.customer_id,
                "suppressing all channels: cooldown active"
            );
            return PolicyDecision::suppressed_everywhere(SuppressionReason::CooldownActive);
        }
        if state.count_for(now.date_naive()) >= settings.max_daily {
            tracing::debug!(
                customer_id = %contact.customer_id,
                max_daily = settings.max_daily,
                "suppressing all channels: daily cap reached"
            );
            return PolicyDecision::suppressed_everywhere(SuppressionReason::DailyCapReached);
        }

        PolicyDecision {
            email: self.channel_verdict(Channel::Email, score, contact, settings, now),
            voice: self.channel_verdict(Channel::Voice, score, contact, settings, now),
        }
    }

    fn channel_verdict(
        &self,
        channel: Channel,
        score: &ScoreResult,
        contact: &CustomerContact,
        settings: &NotificationSettings,
        now: DateTime<Utc>,
    ) -> ChannelVerdict {
        if !self.config.channel_enabled(channel)
            || !contact.opted_in(channel)
            || !settings.channel_enabled(channel)
        {
            return ChannelVerdict::Suppressed(SuppressionReason::ChannelDisabled);
        }

        if score.tier < settings.threshold(channel) {
            return ChannelVerdict::Suppressed(SuppressionReason::BelowThreshold);
        }

        // Quiet hours gate the voice channel only; email is silent anyway.
        if channel == Channel::Voice {
            if let Some(window) = settings.quiet_hours {
                if window.contains(now.hour()) {
                    return ChannelVerdict::Suppressed(SuppressionReason::QuietHours);
                }
            }
        }

        match contact.recipient(channel) {
            Some(recipient) => ChannelVerdict::Eligible {
                recipient: recipient.to_string(),
            },
            None => ChannelVerdict::Suppressed(SuppressionReason::NoRecipient),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{CustomerId, QuietHours, RiskTier};
    use chrono::TimeZone;

    fn contact() -> CustomerContact {
        CustomerContact {
            customer_id: CustomerId::from("customer_001"),
            name: "Customer 001".into(),
            email: Some("c001@example.com".into()),
            phone: Some("+1-555-0101".into()),
            email_opt_in: true,
            voice_opt_in: true,
        }
    }

    fn settings() -> NotificationSettings {
        NotificationSettings {
            customer_id: CustomerId::from("customer_001"),
            email_enabled: true,
            voice_enabled: true,
            email_threshold: RiskTier::Low,
            voice_threshold: RiskTier::High,
            cooldown_secs: 300,
            max_daily: 10,
            quiet_hours: Some(QuietHours { start: 22, end: 8 }),
        }
    }

    fn score(tier: RiskTier) -> ScoreResult {
        ScoreResult {
            is_anomaly: tier > RiskTier::Low,
            confidence: match tier {
                RiskTier::Low => 0.2,
                RiskTier::Medium => 0.5,
                RiskTier::High => 0.8,
                RiskTier::Critical => 0.95,
            },
            tier,
            flags: vec![],
            features: Default::default(),
            recommendations: vec![],
            scored_at: Utc::now(),
        }
    }

    fn at(hour: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 5, hour, 0, 0).unwrap()
    }

    fn engine() -> PolicyEngine {
        PolicyEngine::new(NotificationConfig::default())
    }

    #[test]
    fn medium_risk_afternoon_is_email_only() {
        let decision = engine().evaluate(
            &score(RiskTier::Medium),
            &contact(),
            &settings(),
            &RateLimitState::default(),
            at(14),
        );
        assert!(decision.email.is_eligible());
        assert_eq!(
            decision.voice,
            ChannelVerdict::Suppressed(SuppressionReason::BelowThreshold)
        );
    }

    #[test]
    fn critical_late_night_blocks_voice_on_quiet_hours_alone() {
        let decision = engine().evaluate(
            &score(RiskTier::Critical),
            &contact(),
            &settings(),
            &RateLimitState::default(),
            at(23),
        );
        // Risk clears the voice threshold; quiet hours are the only gate.
        assert!(decision.email.is_eligible());
        assert_eq!(
            decision.voice,
            ChannelVerdict::Suppressed(SuppressionReason::QuietHours)
        );
    }

    #[test]
    fn critical_daytime_reaches_both_channels() {
        let decision = engine().evaluate(
            &score(RiskTier::Critical),
            &contact(),
            &settings(),
            &RateLimitState::default(),
            at(14),
        );
        assert_eq!(decision.eligible().len(), 2);
    }

    #[test]
    fn cooldown_suppresses_every_channel() {
        let mut state = RateLimitState::default();
        state.record_notification(at(13) + chrono::Duration::seconds(-60));

        let decision = engine().evaluate(
            &score(RiskTier::Critical),
            &contact(),
            &settings(),
            &state,
            at(13),
        );
        assert_eq!(
            decision.email,
            ChannelVerdict::Suppressed(SuppressionReason::CooldownActive)
        );
        assert_eq!(
            decision.voice,
            ChannelVerdict::Suppressed(SuppressionReason::CooldownActive)
        );
    }

    #[test]
    fn daily_cap_suppresses_every_channel() {
        let mut settings = settings();
        settings.max_daily = 2;
        settings.cooldown_secs = 0;

        let mut state = RateLimitState::default();
        state.record_notification(at(9));
        state.record_notification(at(10));

        let decision = engine().evaluate(
            &score(RiskTier::Critical),
            &contact(),
            &settings,
            &state,
            at(14),
        );
        assert_eq!(
            decision.email,
            ChannelVerdict::Suppressed(SuppressionReason::DailyCapReached)
        );
    }

    #[test]
    fn daily_cap_clears_at_the_next_utc_day() {
        let mut settings = settings();
        settings.max_daily = 2;
        settings.cooldown_secs = 0;

        let mut state = RateLimitState::default();
        state.record_notification(at(9));
        state.record_notification(at(10));

        let capped = engine().evaluate(
            &score(RiskTier::Critical),
            &contact(),
            &settings,
            &state,
            at(14),
        );
        assert_eq!(
            capped.voice,
            ChannelVerdict::Suppressed(SuppressionReason::DailyCapReached)
        );

        // Counts are bucketed by UTC date, so the next day starts fresh.
        let next_day = engine().evaluate(
            &score(RiskTier::Critical),
            &contact(),
            &settings,
            &state,
            at(14) + chrono::Duration::days(1),
        );
        assert!(next_day.email.is_eligible());
        assert!(next_day.voice.is_eligible());
    }

    #[test]
    fn global_switch_disables_a_channel() {
        let config = NotificationConfig {
            voice_enabled: false,
            ..NotificationConfig::default()
        };
        let decision = PolicyEngine::new(config).evaluate(
            &score(RiskTier::Critical),
            &contact(),
            &settings(),
            &RateLimitState::default(),
            at(14),
        );
        assert_eq!(
            decision.voice,
            ChannelVerdict::Suppressed(SuppressionReason::ChannelDisabled)
        );
        assert!(decision.email.is_eligible());
    }

    #[test]
    fn missing_email_address_suppresses_with_no_recipient() {
        let mut contact = contact();
        contact.email = None;
        let decision = engine().evaluate(
            &score(RiskTier::Medium),
            &contact,
            &settings(),
            &RateLimitState::default(),
            at(14),
        );
        assert_eq!(
            decision.email,
            ChannelVerdict::Suppressed(SuppressionReason::NoRecipient)
        );
    }

    #[test]
    fn unset_quiet_hours_never_gate_voice() {
        let mut settings = settings();
        settings.quiet_hours = None;
        let decision = engine().evaluate(
            &score(RiskTier::Critical),
            &contact(),
            &settings,
            &RateLimitState::default(),
            at(23),
        );
        assert!(decision.voice.is_eligible());
    }
}
