//! In-memory customer directory.

use std::collections::HashMap;

use chrono::Utc;
use parking_lot::RwLock;
use rust_decimal_macros::dec;

use crate::domain::{
    CustomerBaseline, CustomerContact, CustomerId, NotificationSettings, QuietHours, RiskTier,
};
use crate::port::CustomerDirectory;

#[derive(Default)]
struct CustomerEntry {
    contact: Option<CustomerContact>,
    settings: Option<NotificationSettings>,
    baseline: Option<CustomerBaseline>,
}

/// Directory backed by a process-local map.
///
/// Writes go through the insert methods; the pipeline only reads. Unknown
/// customers get default settings and no contact or baseline.
#[derive(Default)]
pub struct InMemoryDirectory {
    entries: RwLock<HashMap<CustomerId, CustomerEntry>>,
}

impl InMemoryDirectory {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A directory seeded with the demo customer roster.
    #[must_use]
    pub fn with_demo_customers() -> Self {
        let dir = Self::new();

        let alice = CustomerId::from("customer_001");
        dir.insert_contact(CustomerContact {
            customer_id: alice.clone(),
            name: "Alice Johnson".to_string(),
            email: Some("alice.johnson@example.com".to_string()),
            phone: Some("+15550100".to_string()),
            email_opt_in: true,
            voice_opt_in: true,
        });
        dir.insert_baseline(CustomerBaseline {
            customer_id: alice.clone(),
            avg_amount: dec!(85.50),
            typical_hour: 14,
            daily_frequency: 3.2,
            common_merchants: vec![
                "Whole Foods".to_string(),
                "Shell".to_string(),
                "Starbucks".to_string(),
            ],
            last_updated: Utc::now(),
        });
        let mut settings = NotificationSettings::defaults_for(alice);
        settings.quiet_hours = Some(QuietHours { start: 22, end: 7 });
        dir.insert_settings(settings);

        let bruno = CustomerId::from("customer_002");
        dir.insert_contact(CustomerContact {
            customer_id: bruno.clone(),
            name: "Bruno Keller".to_string(),
            email: Some("bruno.keller@example.com".to_string()),
            phone: Some("+15550101".to_string()),
            email_opt_in: true,
            voice_opt_in: false,
        });
        dir.insert_baseline(CustomerBaseline {
            customer_id: bruno.clone(),
            avg_amount: dec!(240.00),
            typical_hour: 19,
            daily_frequency: 1.4,
            common_merchants: vec!["Amazon".to_string(), "Target".to_string()],
            last_updated: Utc::now(),
        });
        let mut settings = NotificationSettings::defaults_for(bruno);
        settings.email_threshold = RiskTier::Low;
        dir.insert_settings(settings);

        // No baseline on purpose: exercises the neutral-feature path.
        let chen = CustomerId::from("customer_003");
        dir.insert_contact(CustomerContact {
            customer_id: chen.clone(),
            name: "Chen Wei".to_string(),
            email: Some("chen.wei@example.com".to_string()),
            phone: None,
            email_opt_in: true,
            voice_opt_in: true,
        });
        dir.insert_settings(NotificationSettings::defaults_for(chen));

        dir
    }

    pub fn insert_contact(&self, contact: CustomerContact) {
        let mut entries = self.entries.write();
        let key = contact.customer_id.clone();
        entries.entry(key).or_default().contact = Some(contact);
    }

    pub fn insert_settings(&self, settings: NotificationSettings) {
        let mut entries = self.entries.write();
        let key = settings.customer_id.clone();
        entries.entry(key).or_default().settings = Some(settings);
    }

    pub fn insert_baseline(&self, baseline: CustomerBaseline) {
        let mut entries = self.entries.write();
        let key = baseline.customer_id.clone();
        entries.entry(key).or_default().baseline = Some(baseline);
    }

    /// Customer ids currently in the directory.
    #[must_use]
    pub fn customer_ids(&self) -> Vec<CustomerId> {
        self.entries.read().keys().cloned().collect()
    }
}

impl CustomerDirectory for InMemoryDirectory {
    fn contact(&self, customer_id: &CustomerId) -> Option<CustomerContact> {
        self.entries
            .read()
            .get(customer_id)
            .and_then(|e| e.contact.clone())
    }

    fn settings(&self, customer_id: &CustomerId) -> NotificationSettings {
        self.entries
            .read()
            .get(customer_id)
            .and_then(|e| e.settings.clone())
            .unwrap_or_else(|| NotificationSettings::defaults_for(customer_id.clone()))
    }

    fn baseline(&self, customer_id: &CustomerId) -> Option<CustomerBaseline> {
        self.entries
            .read()
            .get(customer_id)
            .and_then(|e| e.baseline.clone())
    }
}
