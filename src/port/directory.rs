//! Customer directory port.

use crate::domain::{CustomerBaseline, CustomerContact, CustomerId, NotificationSettings};

/// Read-only access to customer contact data, notification settings, and
/// behavioral baselines.
///
/// Backed by whatever store the application uses; the pipeline only reads.
/// A missing customer is not an error: scoring proceeds with neutral
/// defaults and dispatch is skipped when there is no contact.
pub trait CustomerDirectory: Send + Sync {
    /// Contact details for a customer, if known.
    fn contact(&self, customer_id: &CustomerId) -> Option<CustomerContact>;

    /// Notification settings for a customer. Implementations should fall
    /// back to [`NotificationSettings::defaults_for`] for unknown customers.
    fn settings(&self, customer_id: &CustomerId) -> NotificationSettings;

    /// Behavioral baseline for a customer, if one has been built.
    fn baseline(&self, customer_id: &CustomerId) -> Option<CustomerBaseline>;
}
