//! Bounded in-memory audit log.

use std::collections::VecDeque;

use parking_lot::RwLock;

use crate::domain::{CustomerId, NotificationRecord};
use crate::port::AuditSink;

/// Keeps the most recent records in memory, evicting the oldest once the
/// retention cap is reached.
pub struct MemoryAuditLog {
    records: RwLock<VecDeque<NotificationRecord>>,
    retention: usize,
}

impl MemoryAuditLog {
    #[must_use]
    pub fn new(retention: usize) -> Self {
        Self {
            records: RwLock::new(VecDeque::with_capacity(retention.min(1024))),
            retention,
        }
    }

    /// Number of records currently held.
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.read().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.read().is_empty()
    }
}

impl AuditSink for MemoryAuditLog {
    fn append(&self, record: NotificationRecord) {
        if self.retention == 0 {
            return;
        }
        let mut records = self.records.write();
        while records.len() >= self.retention {
            records.pop_front();
        }
        records.push_back(record);
    }

    fn recent(&self, limit: usize) -> Vec<NotificationRecord> {
        let records = self.records.read();
        let skip = records.len().saturating_sub(limit);
        records.iter().skip(skip).cloned().collect()
    }

    fn for_customer(&self, customer_id: &CustomerId, limit: usize) -> Vec<NotificationRecord> {
        let records = self.records.read();
        let mut out: Vec<NotificationRecord> = records
            .iter()
            .rev()
            .filter(|r| &r.customer_id == customer_id)
            .take(limit)
            .cloned()
            .collect();
        out.reverse();
        out
    }
}
