//! Pulsewatch - Transaction fraud scoring and notification dispatch.
//!
//! This crate scores financial transactions for fraud risk by combining
//! deterministic rule checks with an isolation-forest outlier model, then
//! drives customer notifications through a policy layer (thresholds,
//! cooldowns, daily caps, quiet hours) and a concurrent dispatcher.
//!
//! # Architecture
//!
//! Scoring is a pure synchronous pipeline; only dispatch is async. The
//! pipeline talks to the outside world exclusively through port traits,
//! so senders, renderers, directories, and audit sinks are pluggable.
//!
//! - **`detect`** - Feature-based rule scanner, isolation forest, score
//!   combiner and risk tiering
//! - **`policy`** - Per-customer notification eligibility and rate-limit
//!   state, keyed under one lock per customer
//! - **`dispatch`** - Fan-out coordinator with bounded per-send waits and
//!   per-attempt audit records
//!
//! # Modules
//!
//! - [`config`] - Configuration loading from TOML with validation
//! - [`domain`] - Transactions, baselines, scores, notification types
//! - [`detect`] - Anomaly detection stages
//! - [`policy`] - Notification policy and rate limiting
//! - [`dispatch`] - Concurrent channel dispatch
//! - [`pipeline`] - The [`pipeline::FraudEngine`] tying it all together
//! - [`port`] - Traits at the boundary (senders, renderer, directory, audit)
//! - [`adapter`] - In-process implementations of the ports
//! - [`error`] - Error types for the crate
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//!
//! use pulsewatch::adapter::{
//!     InMemoryDirectory, MemoryAuditLog, SimulatedSender, TemplateRenderer,
//! };
//! use pulsewatch::config::Config;
//! use pulsewatch::domain::Channel;
//! use pulsewatch::pipeline::FraudEngine;
//! use pulsewatch::port::ChannelSender;
//!
//! let senders: Vec<Arc<dyn ChannelSender>> = vec![
//!     Arc::new(SimulatedSender::reliable(Channel::Email)),
//!     Arc::new(SimulatedSender::reliable(Channel::Voice)),
//! ];
//! let config = Config::default();
//! let engine = FraudEngine::new(
//!     &config,
//!     Arc::new(InMemoryDirectory::with_demo_customers()),
//!     Arc::new(TemplateRenderer::new()),
//!     senders,
//!     Arc::new(MemoryAuditLog::new(1000)),
//! )
//! .unwrap();
//! ```

pub mod adapter;
pub mod config;
pub mod detect;
pub mod dispatch;
pub mod domain;
pub mod error;
pub mod pipeline;
pub mod policy;
pub mod port;
