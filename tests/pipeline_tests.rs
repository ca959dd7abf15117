mod support;

use rust_decimal_macros::dec;

use pulsewatch::domain::{AnomalyCategory, Channel, CustomerId, RiskTier};
use pulsewatch::port::AuditSink;

use support::{directory, engine, normal_transaction, reliable_senders, test_config, transaction};

#[tokio::test]
async fn large_amount_flags_and_notifies_by_email() {
    let config = test_config();
    let (engine, audit) = engine(&config, directory(), reliable_senders());

    let tx = transaction("txn_large", dec!(5000.00));
    let outcome = engine.process(&tx).await;

    let flag = outcome
        .score
        .flags
        .iter()
        .find(|f| f.category == AnomalyCategory::AmountPattern)
        .expect("amount flag");
    assert!(flag.severity >= 0.7, "severity {}", flag.severity);
    assert!(outcome.score.is_anomaly);
    assert!(outcome.score.tier >= RiskTier::High);

    let report = &outcome.report;
    assert!(report.any_sent());
    assert!(report.outcome(Channel::Email).is_some_and(|o| o.is_sent()));

    let records = audit.for_customer(&CustomerId::from(support::CUSTOMER), 10);
    assert!(!records.is_empty());
    assert!(records.iter().any(|r| r.channel == Channel::Email && r.sent_at.is_some()));
}

#[tokio::test]
async fn normal_transaction_scores_low_and_dispatches_nothing() {
    let config = test_config();
    let (engine, audit) = engine(&config, directory(), reliable_senders());

    let outcome = engine.process(&normal_transaction("txn_normal")).await;

    assert!(!outcome.score.is_anomaly);
    assert_eq!(outcome.score.tier, RiskTier::Low);
    assert!(outcome.decision.is_none());
    assert!(outcome.report.attempts.is_empty());
    assert!(audit.is_empty());
    assert!(engine.rate_limits().is_empty());
}

#[tokio::test]
async fn unknown_customer_is_scored_but_not_notified() {
    let config = test_config();
    let (engine, audit) = engine(&config, directory(), reliable_senders());

    let mut tx = transaction("txn_stranger", dec!(5000.00));
    tx.customer_id = CustomerId::from("customer_404");
    let outcome = engine.process(&tx).await;

    assert!(outcome.score.is_anomaly);
    assert!(outcome.decision.is_none());
    assert!(outcome.report.attempts.is_empty());
    assert!(audit.is_empty());
}

#[tokio::test]
async fn scoring_is_deterministic_for_a_transaction() {
    let config = test_config();
    let (engine, _) = engine(&config, directory(), reliable_senders());

    let tx = transaction("txn_repeat", dec!(5000.00));
    let first = engine.score(&tx);
    let second = engine.score(&tx);
    assert_eq!(first.confidence, second.confidence);
    assert_eq!(first.tier, second.tier);
    assert_eq!(first.flags.len(), second.flags.len());
}

#[tokio::test]
async fn score_never_dispatches() {
    let config = test_config();
    let (engine, audit) = engine(&config, directory(), reliable_senders());

    let score = engine.score(&transaction("txn_score_only", dec!(5000.00)));
    assert!(score.is_anomaly);
    assert!(audit.is_empty());
    assert!(engine.rate_limits().is_empty());
}
