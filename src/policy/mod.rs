//! Notification policy: eligibility rules and rate-limit state.

mod engine;
mod rate_limit;

pub use engine::{ChannelVerdict, PolicyDecision, PolicyEngine};
pub use rate_limit::{RateLimitState, RateLimitStore};
