//! Notification system configuration.

use serde::Deserialize;

use crate::error::ConfigError;

/// System-level notification switches and dispatch limits.
///
/// Per-customer preferences live in
/// [`NotificationSettings`](crate::domain::NotificationSettings); this is
/// the operator-level layer that can switch a whole channel off.
#[derive(Debug, Clone, Deserialize)]
pub struct NotificationConfig {
    /// Global switch for the email channel.
    #[serde(default = "default_true")]
    pub email_enabled: bool,

    /// Global switch for the voice channel.
    #[serde(default = "default_true")]
    pub voice_enabled: bool,

    /// Bounded wait for a single channel send. A hung sender counts as a
    /// failed attempt after this long.
    #[serde(default = "default_send_timeout")]
    pub send_timeout_secs: u64,

    /// How many audit records the in-memory log retains before evicting
    /// the oldest.
    #[serde(default = "default_audit_retention")]
    pub audit_retention: usize,
}

fn default_true() -> bool {
    true
}

fn default_send_timeout() -> u64 {
    10
}

fn default_audit_retention() -> usize {
    1000
}

impl Default for NotificationConfig {
    fn default() -> Self {
        Self {
            email_enabled: default_true(),
            voice_enabled: default_true(),
            send_timeout_secs: default_send_timeout(),
            audit_retention: default_audit_retention(),
        }
    }
}

impl NotificationConfig {
    pub(crate) fn validate(&self) -> Result<(), ConfigError> {
        if self.send_timeout_secs == 0 {
            return Err(ConfigError::InvalidValue {
                field: "notification.send_timeout_secs",
                reason: "must be positive".into(),
            });
        }
        if self.audit_retention == 0 {
            return Err(ConfigError::InvalidValue {
                field: "notification.audit_retention",
                reason: "must be positive".into(),
            });
        }
        Ok(())
    }

    /// Whether a channel is switched on at the system level.
    #[must_use]
    pub fn channel_enabled(&self, channel: crate::domain::Channel) -> bool {
        match channel {
            crate::domain::Channel::Email => self.email_enabled,
            crate::domain::Channel::Voice => self.voice_enabled,
        }
    }
}
