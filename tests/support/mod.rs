#![allow(dead_code)]

use std::sync::Arc;
use std::time::Duration;

use chrono::{TimeZone, Utc};
use rust_decimal::Decimal;

use pulsewatch::adapter::{
    InMemoryDirectory, MemoryAuditLog, SenderBehavior, SimulatedSender, TemplateRenderer,
};
use pulsewatch::config::Config;
use pulsewatch::domain::{
    Channel, CustomerBaseline, CustomerContact, CustomerId, Location, MerchantCategory,
    NotificationSettings, Transaction, TransactionId, TransactionType,
};
use pulsewatch::pipeline::FraudEngine;
use pulsewatch::port::ChannelSender;

pub const CUSTOMER: &str = "customer_001";

/// Configuration with a short dispatch timeout so hang tests stay fast.
pub fn test_config() -> Config {
    let mut config = Config::default();
    config.notification.send_timeout_secs = 1;
    config
}

/// Directory with one fully reachable customer and no quiet hours, so
/// outcomes do not depend on the wall clock.
pub fn directory() -> Arc<InMemoryDirectory> {
    let dir = InMemoryDirectory::new();
    let id = CustomerId::from(CUSTOMER);
    dir.insert_contact(CustomerContact {
        customer_id: id.clone(),
        name: "Alice Johnson".to_string(),
        email: Some("alice.johnson@example.com".to_string()),
        phone: Some("+15550100".to_string()),
        email_opt_in: true,
        voice_opt_in: true,
    });
    dir.insert_baseline(CustomerBaseline {
        customer_id: id.clone(),
        avg_amount: Decimal::new(8550, 2),
        typical_hour: 14,
        daily_frequency: 3.0,
        common_merchants: vec!["Whole Foods".to_string()],
        last_updated: Utc::now(),
    });
    dir.insert_settings(NotificationSettings::defaults_for(id));
    Arc::new(dir)
}

/// An engine wired with the given senders, plus the audit log behind it.
pub fn engine(
    config: &Config,
    directory: Arc<InMemoryDirectory>,
    senders: Vec<Arc<dyn ChannelSender>>,
) -> (FraudEngine, Arc<MemoryAuditLog>) {
    let audit = Arc::new(MemoryAuditLog::new(config.notification.audit_retention));
    let engine = FraudEngine::new(
        config,
        directory,
        Arc::new(TemplateRenderer::new()),
        senders,
        audit.clone(),
    )
    .expect("engine construction");
    (engine, audit)
}

pub fn reliable_senders() -> Vec<Arc<dyn ChannelSender>> {
    vec![
        Arc::new(SimulatedSender::reliable(Channel::Email)),
        Arc::new(SimulatedSender::reliable(Channel::Voice)),
    ]
}

pub fn sender(channel: Channel, behavior: SenderBehavior) -> Arc<SimulatedSender> {
    Arc::new(SimulatedSender::new(channel, Duration::ZERO, behavior))
}

/// A benign weekday-afternoon grocery purchase.
pub fn normal_transaction(id: &str) -> Transaction {
    transaction(id, Decimal::new(4250, 2))
}

/// Same shape as [`normal_transaction`] but with the given amount.
pub fn transaction(id: &str, amount: Decimal) -> Transaction {
    Transaction {
        id: TransactionId::from(id),
        customer_id: CustomerId::from(CUSTOMER),
        amount,
        transaction_type: TransactionType::Purchase,
        merchant_name: "Whole Foods".to_string(),
        merchant_category: MerchantCategory::Grocery,
        location: Some(Location {
            city: "Springfield".to_string(),
            region: "IL".to_string(),
            latitude: None,
            longitude: None,
        }),
        // Tuesday 14:00 UTC, inside the customer's typical pattern.
        timestamp: Utc.with_ymd_and_hms(2024, 3, 5, 14, 0, 0).unwrap(),
        description: None,
        metadata: None,
    }
}
