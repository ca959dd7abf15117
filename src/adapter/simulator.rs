//! Seeded transaction stream for the demo binary and tests.

use chrono::{Timelike, Utc};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rust_decimal::prelude::FromPrimitive;
use rust_decimal::Decimal;

use crate::domain::{
    CustomerId, Location, MerchantCategory, SyntheticScenario, Transaction, TransactionId,
    TransactionMetadata, TransactionType,
};

const NORMAL_MERCHANTS: &[(&str, MerchantCategory)] = &[
    ("Whole Foods", MerchantCategory::Grocery),
    ("Starbucks", MerchantCategory::Restaurant),
    ("Shell", MerchantCategory::GasStation),
    ("Target", MerchantCategory::Retail),
    ("Netflix", MerchantCategory::Entertainment),
    ("Amazon", MerchantCategory::Online),
];

const SUSPICIOUS_MERCHANTS: &[(&str, MerchantCategory)] = &[
    ("Golden Casino Resort", MerchantCategory::Entertainment),
    ("Crypto Exchange Ltd", MerchantCategory::Online),
    ("Global Wire Transfer Co", MerchantCategory::Unknown),
];

const FOREIGN_CITIES: &[(&str, &str)] = &[("Tokyo", "JP"), ("Moscow", "RU"), ("Dubai", "AE")];

/// Generates a stream of mostly-normal transactions with a configurable
/// share of injected, scenario-tagged anomalies.
///
/// Deterministic for a given seed, which keeps demo runs and tests
/// reproducible.
pub struct TransactionSimulator {
    rng: StdRng,
    customers: Vec<CustomerId>,
    anomaly_share: f64,
    counter: u64,
}

impl TransactionSimulator {
    /// # Panics
    ///
    /// Panics when `customers` is empty.
    #[must_use]
    pub fn new(seed: u64, customers: Vec<CustomerId>, anomaly_share: f64) -> Self {
        assert!(!customers.is_empty(), "simulator needs at least one customer");
        Self {
            rng: StdRng::seed_from_u64(seed),
            customers,
            anomaly_share: anomaly_share.clamp(0.0, 1.0),
            counter: 0,
        }
    }

    /// Produce the next transaction in the stream.
    pub fn next_transaction(&mut self) -> Transaction {
        self.counter += 1;
        let customer = self.customers[self.rng.gen_range(0..self.customers.len())].clone();
        if self.rng.gen_bool(self.anomaly_share) {
            self.anomalous(customer)
        } else {
            self.normal(customer)
        }
    }

    fn next_id(&self) -> TransactionId {
        TransactionId::from(format!("txn_{:06}", self.counter))
    }

    fn normal(&mut self, customer_id: CustomerId) -> Transaction {
        let (merchant, category) = NORMAL_MERCHANTS[self.rng.gen_range(0..NORMAL_MERCHANTS.len())];
        let amount = self.rng.gen_range(8.0..180.0);
        Transaction {
            id: self.next_id(),
            customer_id,
            amount: decimal(amount),
            transaction_type: TransactionType::Purchase,
            merchant_name: merchant.to_string(),
            merchant_category: category,
            location: Some(Location {
                city: "Springfield".to_string(),
                region: "IL".to_string(),
                latitude: None,
                longitude: None,
            }),
            timestamp: Utc::now(),
            description: None,
            metadata: None,
        }
    }

    fn anomalous(&mut self, customer_id: CustomerId) -> Transaction {
        let scenario = match self.rng.gen_range(0..5u8) {
            0 => SyntheticScenario::LargeAmount,
            1 => SyntheticScenario::UnusualMerchant,
            2 => SyntheticScenario::UnusualLocation,
            3 => SyntheticScenario::UnusualTime,
            _ => SyntheticScenario::RoundAmount,
        };

        let mut tx = self.normal(customer_id);
        tx.metadata = Some(TransactionMetadata {
            synthetic_anomaly: Some(scenario),
            ..TransactionMetadata::default()
        });

        match scenario {
            SyntheticScenario::LargeAmount => {
                tx.amount = decimal(self.rng.gen_range(2500.0..9500.0));
            }
            SyntheticScenario::UnusualMerchant => {
                let (merchant, category) =
                    SUSPICIOUS_MERCHANTS[self.rng.gen_range(0..SUSPICIOUS_MERCHANTS.len())];
                tx.merchant_name = merchant.to_string();
                tx.merchant_category = category;
                tx.amount = decimal(self.rng.gen_range(400.0..2000.0));
            }
            SyntheticScenario::UnusualLocation => {
                let (city, region) = FOREIGN_CITIES[self.rng.gen_range(0..FOREIGN_CITIES.len())];
                tx.location = Some(Location {
                    city: city.to_string(),
                    region: region.to_string(),
                    latitude: None,
                    longitude: None,
                });
            }
            SyntheticScenario::UnusualTime => {
                // Move into the deep-night window regardless of wall clock.
                tx.timestamp = tx.timestamp.with_hour(3).unwrap_or(tx.timestamp);
            }
            SyntheticScenario::RoundAmount => {
                let thousands: f64 = f64::from(self.rng.gen_range(1u32..=8));
                tx.amount = decimal(thousands * 1000.0);
            }
            _ => {}
        }
        tx
    }
}

fn decimal(amount: f64) -> Decimal {
    Decimal::from_f64((amount * 100.0).round() / 100.0).unwrap_or_default()
}
