//! Per-customer rate-limit state and its lock-guarded store.

use std::collections::BTreeMap;
use std::sync::Arc;

use chrono::{DateTime, Duration, NaiveDate, Utc};
use dashmap::DashMap;
use tokio::sync::Mutex;

use crate::domain::CustomerId;

/// How many days of daily counts to keep around. Only today matters for
/// the cap; yesterday is kept so a read near midnight stays coherent.
const COUNT_RETENTION_DAYS: i64 = 2;

/// Notification rate-limit state for one customer.
///
/// Mutated only by the dispatch path while the customer's lock is held;
/// the policy engine reads it under the same lock. Counts are keyed by
/// UTC date and never go negative.
#[derive(Debug, Default, Clone)]
pub struct RateLimitState {
    last_notification: Option<DateTime<Utc>>,
    daily_counts: BTreeMap<NaiveDate, u32>,
}

impl RateLimitState {
    /// Whether `now` still falls inside the cooldown window opened by
    /// the last notification.
    #[must_use]
    pub fn in_cooldown(&self, now: DateTime<Utc>, cooldown_secs: u64) -> bool {
        match self.last_notification {
            Some(last) => now < last + Duration::seconds(cooldown_secs as i64),
            None => false,
        }
    }

    /// Notification count for a UTC date.
    #[must_use]
    pub fn count_for(&self, date: NaiveDate) -> u32 {
        self.daily_counts.get(&date).copied().unwrap_or(0)
    }

    /// When the last notification went out, if any.
    #[must_use]
    pub fn last_notification(&self) -> Option<DateTime<Utc>> {
        self.last_notification
    }

    /// Record one successful dispatch: stamp the cooldown and increment
    /// today's count. Stale date entries are pruned on the way.
    pub fn record_notification(&mut self, now: DateTime<Utc>) {
        self.last_notification = Some(now);
        let today = now.date_naive();
        *self.daily_counts.entry(today).or_insert(0) += 1;

        let cutoff = today - Duration::days(COUNT_RETENTION_DAYS);
        self.daily_counts.retain(|date, _| *date > cutoff);
    }
}

/// Owned, lock-guarded store of per-customer rate-limit state.
///
/// The per-customer `tokio::sync::Mutex` is the serialization point for
/// concurrent transactions of the same customer: the pipeline holds the
/// guard from the eligibility check through dispatch and the state
/// update, so two simultaneous anomalies cannot both pass the cooldown
/// check. Lifecycle is tied to the engine that owns the store, not to
/// global program state.
#[derive(Debug, Default)]
pub struct RateLimitStore {
    states: DashMap<CustomerId, Arc<Mutex<RateLimitState>>>,
}

impl RateLimitStore {
    #[must_use]
    pub fn new() -> Self {
        Self {
            states: DashMap::new(),
        }
    }

    /// The lock handle for one customer, created on first use.
    #[must_use]
    pub fn handle(&self, customer_id: &CustomerId) -> Arc<Mutex<RateLimitState>> {
        self.states
            .entry(customer_id.clone())
            .or_default()
            .clone()
    }

    /// Number of customers with tracked state.
    #[must_use]
    pub fn len(&self) -> usize {
        self.states.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }
}
