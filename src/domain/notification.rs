//! Notification domain types: channels, settings, contacts, audit records.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::anomaly::RiskTier;
use super::ids::{CustomerId, TransactionId};

/// A delivery channel for security notifications.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Channel {
    Email,
    Voice,
}

impl Channel {
    /// All channels the dispatcher knows about.
    pub const ALL: [Channel; 2] = [Channel::Email, Channel::Voice];
}

impl fmt::Display for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Email => write!(f, "email"),
            Self::Voice => write!(f, "voice"),
        }
    }
}

/// Quiet-hours window on a 24h clock. May wrap past midnight
/// (e.g. start 22, end 8).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuietHours {
    /// First quiet hour (inclusive), 0-23.
    pub start: u32,
    /// Last quiet hour (inclusive), 0-23.
    pub end: u32,
}

impl QuietHours {
    /// Whether the given hour falls inside the window.
    #[must_use]
    pub fn contains(&self, hour: u32) -> bool {
        if self.start <= self.end {
            (self.start..=self.end).contains(&hour)
        } else {
            // Window wraps midnight.
            hour >= self.start || hour <= self.end
        }
    }
}

/// Per-customer notification preferences and rate-limit parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NotificationSettings {
    pub customer_id: CustomerId,
    pub email_enabled: bool,
    pub voice_enabled: bool,
    /// Minimum tier that triggers an email.
    pub email_threshold: RiskTier,
    /// Minimum tier that triggers a voice call.
    pub voice_threshold: RiskTier,
    /// Minimum seconds between notifications to this customer.
    pub cooldown_secs: u64,
    /// Maximum notifications per UTC day.
    pub max_daily: u32,
    /// Voice calls are suppressed inside this window when set.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quiet_hours: Option<QuietHours>,
}

impl NotificationSettings {
    /// Defaults mirroring the standard customer profile: email from medium
    /// risk, voice from high risk, 5 minute cooldown, 10 per day.
    #[must_use]
    pub fn defaults_for(customer_id: CustomerId) -> Self {
        Self {
            customer_id,
            email_enabled: true,
            voice_enabled: true,
            email_threshold: RiskTier::Medium,
            voice_threshold: RiskTier::High,
            cooldown_secs: 300,
            max_daily: 10,
            quiet_hours: None,
        }
    }

    /// Whether the channel is enabled in these settings.
    #[must_use]
    pub fn channel_enabled(&self, channel: Channel) -> bool {
        match channel {
            Channel::Email => self.email_enabled,
            Channel::Voice => self.voice_enabled,
        }
    }

    /// The tier threshold configured for a channel.
    #[must_use]
    pub fn threshold(&self, channel: Channel) -> RiskTier {
        match channel {
            Channel::Email => self.email_threshold,
            Channel::Voice => self.voice_threshold,
        }
    }
}

/// Contact details and channel opt-ins for one customer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CustomerContact {
    pub customer_id: CustomerId,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    pub email_opt_in: bool,
    pub voice_opt_in: bool,
}

impl CustomerContact {
    /// The recipient address for a channel, when present and opted in.
    #[must_use]
    pub fn recipient(&self, channel: Channel) -> Option<&str> {
        match channel {
            Channel::Email if self.email_opt_in => self.email.as_deref(),
            Channel::Voice if self.voice_opt_in => self.phone.as_deref(),
            _ => None,
        }
    }

    /// Whether the customer opted into a channel at all.
    #[must_use]
    pub fn opted_in(&self, channel: Channel) -> bool {
        match channel {
            Channel::Email => self.email_opt_in,
            Channel::Voice => self.voice_opt_in,
        }
    }
}

/// Why a channel was not attempted for a transaction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SuppressionReason {
    /// The channel is switched off globally, by the customer, or in settings.
    ChannelDisabled,
    /// Risk tier below the channel's configured threshold.
    BelowThreshold,
    /// Current time is inside the customer's quiet hours (voice only).
    QuietHours,
    /// The customer-wide cooldown window is still open.
    CooldownActive,
    /// The customer hit their daily notification cap.
    DailyCapReached,
    /// No recipient address available for the channel.
    NoRecipient,
}

impl fmt::Display for SuppressionReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::ChannelDisabled => "channel_disabled",
            Self::BelowThreshold => "below_threshold",
            Self::QuietHours => "quiet_hours",
            Self::CooldownActive => "cooldown_active",
            Self::DailyCapReached => "daily_cap_reached",
            Self::NoRecipient => "no_recipient",
        };
        write!(f, "{s}")
    }
}

/// Final outcome of one channel for one transaction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "outcome")]
pub enum DeliveryOutcome {
    /// The sender accepted the notification.
    Sent,
    /// The sender failed, timed out, or rejected the notification.
    Failed { error: String },
    /// Policy suppressed the attempt before any send.
    Suppressed { reason: SuppressionReason },
}

impl DeliveryOutcome {
    #[must_use]
    pub fn is_sent(&self) -> bool {
        matches!(self, Self::Sent)
    }
}

/// Append-only audit entry, one per dispatch attempt or suppression.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NotificationRecord {
    pub id: Uuid,
    pub customer_id: CustomerId,
    pub transaction_id: TransactionId,
    pub channel: Channel,
    pub outcome: DeliveryOutcome,
    pub tier: RiskTier,
    /// Email address or phone number, when an attempt was made.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub recipient: Option<String>,
    /// Provider-side reference for the send (message id, call sid).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub provider_ref: Option<String>,
    pub created_at: DateTime<Utc>,
    /// Set only when the attempt succeeded.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sent_at: Option<DateTime<Utc>>,
}

impl NotificationRecord {
    /// Build a record for a dispatch attempt or suppression.
    #[must_use]
    pub fn new(
        customer_id: CustomerId,
        transaction_id: TransactionId,
        channel: Channel,
        tier: RiskTier,
        outcome: DeliveryOutcome,
    ) -> Self {
        let now = Utc::now();
        let sent_at = outcome.is_sent().then_some(now);
        Self {
            id: Uuid::new_v4(),
            customer_id,
            transaction_id,
            channel,
            outcome,
            tier,
            recipient: None,
            provider_ref: None,
            created_at: now,
            sent_at,
        }
    }

    /// Attach the recipient address (builder style).
    #[must_use]
    pub fn with_recipient(mut self, recipient: impl Into<String>) -> Self {
        self.recipient = Some(recipient.into());
        self
    }

    /// Attach the provider reference (builder style).
    #[must_use]
    pub fn with_provider_ref(mut self, provider_ref: impl Into<String>) -> Self {
        self.provider_ref = Some(provider_ref.into());
        self
    }
}
