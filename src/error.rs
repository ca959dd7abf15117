use thiserror::Error;

use crate::domain::Channel;

/// Configuration-related errors with structured variants.
///
/// These surface at load/construction time and are fatal: the pipeline
/// refuses to start with a broken configuration instead of failing per
/// transaction.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("missing required field: {field}")]
    MissingField { field: &'static str },

    #[error("invalid value for {field}: {reason}")]
    InvalidValue { field: &'static str, reason: String },

    #[error("failed to read config file: {0}")]
    ReadFile(#[source] std::io::Error),

    #[error("failed to parse config: {0}")]
    Parse(#[source] toml::de::Error),

    #[error("channel {channel} is enabled but no sender is registered for it")]
    ChannelNotWired { channel: Channel },
}

/// Errors produced by channel senders.
///
/// These never escape the dispatch coordinator; they are folded into the
/// audit record for the failed attempt.
#[derive(Error, Debug, Clone)]
pub enum SendError {
    #[error("provider rejected the notification: {0}")]
    Rejected(String),

    #[error("send timed out after {secs}s")]
    Timeout { secs: u64 },

    #[error("provider error: {0}")]
    Provider(String),
}

/// Top-level error for fallible startup paths.
///
/// Send failures never surface here; the dispatcher folds them into
/// audit records instead of propagating.
#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Config(#[from] ConfigError),
}

pub type Result<T> = std::result::Result<T, Error>;
