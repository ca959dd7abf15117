//! Audit sink port.

use crate::domain::{CustomerId, NotificationRecord};

/// Append-only consumer of notification audit records.
///
/// One record is appended for every dispatch attempt regardless of
/// outcome, and for every policy suppression. Implementations own the
/// retention policy; the read-back methods are bounded by it.
pub trait AuditSink: Send + Sync {
    /// Append a record. Must not fail; implementations that can fail
    /// should log and drop rather than propagate.
    fn append(&self, record: NotificationRecord);

    /// Most recent records, newest last, at most `limit`.
    fn recent(&self, limit: usize) -> Vec<NotificationRecord>;

    /// Most recent records for one customer, newest last, at most `limit`.
    fn for_customer(&self, customer_id: &CustomerId, limit: usize) -> Vec<NotificationRecord>;
}
