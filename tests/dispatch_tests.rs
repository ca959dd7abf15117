mod support;

use std::sync::Arc;

use rust_decimal_macros::dec;

use pulsewatch::adapter::{SenderBehavior, SimulatedSender};
use pulsewatch::domain::{Channel, CustomerId, DeliveryOutcome};
use pulsewatch::port::AuditSink;
use pulsewatch::port::ChannelSender;

use support::{directory, engine, sender, test_config, transaction};

#[tokio::test]
async fn failing_channel_is_audited_and_sibling_still_sends() {
    let config = test_config();
    let senders: Vec<Arc<dyn ChannelSender>> = vec![
        sender(Channel::Email, SenderBehavior::Fail("smtp relay down".into())),
        Arc::new(SimulatedSender::reliable(Channel::Voice)),
    ];
    let (engine, audit) = engine(&config, directory(), senders);

    let outcome = engine.process(&transaction("txn_partial", dec!(5000.00))).await;

    let email = outcome.report.outcome(Channel::Email).expect("email attempt");
    assert!(matches!(email, DeliveryOutcome::Failed { error } if error.contains("smtp relay down")));
    let voice = outcome.report.outcome(Channel::Voice).expect("voice attempt");
    assert!(voice.is_sent());

    // One sibling succeeding is enough to start the cooldown.
    assert!(outcome.report.any_sent());

    let records = audit.for_customer(&CustomerId::from(support::CUSTOMER), 10);
    assert_eq!(records.len(), 2);
    assert!(records
        .iter()
        .any(|r| r.channel == Channel::Email && matches!(r.outcome, DeliveryOutcome::Failed { .. })));
    assert!(records
        .iter()
        .any(|r| r.channel == Channel::Voice && r.sent_at.is_some()));
}

#[tokio::test]
async fn hung_sender_times_out_without_blocking_sibling() {
    let config = test_config();
    let senders: Vec<Arc<dyn ChannelSender>> = vec![
        sender(Channel::Voice, SenderBehavior::Hang),
        Arc::new(SimulatedSender::reliable(Channel::Email)),
    ];
    let (engine, _) = engine(&config, directory(), senders);

    let outcome = engine.process(&transaction("txn_hang", dec!(5000.00))).await;

    let voice = outcome.report.outcome(Channel::Voice).expect("voice attempt");
    assert!(matches!(voice, DeliveryOutcome::Failed { error } if error.contains("timed out")));
    let email = outcome.report.outcome(Channel::Email).expect("email attempt");
    assert!(email.is_sent());
}

#[tokio::test]
async fn every_sender_failing_still_leaves_audit_records() {
    let config = test_config();
    let senders: Vec<Arc<dyn ChannelSender>> = vec![
        sender(Channel::Email, SenderBehavior::Fail("outage".into())),
        sender(Channel::Voice, SenderBehavior::Fail("outage".into())),
    ];
    let (engine, audit) = engine(&config, directory(), senders);

    let outcome = engine.process(&transaction("txn_outage", dec!(5000.00))).await;
    assert!(!outcome.report.any_sent());

    let records = audit.for_customer(&CustomerId::from(support::CUSTOMER), 10);
    assert_eq!(records.len(), 2);
    assert!(records
        .iter()
        .all(|r| matches!(r.outcome, DeliveryOutcome::Failed { .. }) && r.sent_at.is_none()));

    // No send succeeded, so a retry right away is not rate limited.
    let state = engine.rate_limits().handle(&CustomerId::from(support::CUSTOMER));
    assert!(state.lock().await.last_notification().is_none());
}

#[tokio::test]
async fn sent_attempts_carry_provider_refs() {
    let config = test_config();
    let senders: Vec<Arc<dyn ChannelSender>> = vec![
        Arc::new(SimulatedSender::reliable(Channel::Email)),
        Arc::new(SimulatedSender::reliable(Channel::Voice)),
    ];
    let (engine, audit) = engine(&config, directory(), senders);

    let outcome = engine.process(&transaction("txn_refs", dec!(5000.00))).await;
    for attempt in &outcome.report.attempts {
        assert!(attempt.outcome.is_sent());
        assert!(attempt.provider_ref.is_some());
    }

    let records = audit.for_customer(&CustomerId::from(support::CUSTOMER), 10);
    assert!(records.iter().all(|r| r.provider_ref.is_some()));
}
