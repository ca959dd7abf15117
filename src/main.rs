use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use clap::Parser;
use owo_colors::OwoColorize;
use tokio::signal;
use tracing::{error, info};

use pulsewatch::adapter::{
    InMemoryDirectory, MemoryAuditLog, SimulatedSender, TemplateRenderer, TransactionSimulator,
};
use pulsewatch::config::Config;
use pulsewatch::domain::{Channel, RiskTier};
use pulsewatch::pipeline::FraudEngine;
use pulsewatch::port::{AuditSink, ChannelSender};

/// Score a simulated transaction stream and dispatch fraud alerts.
#[derive(Debug, Parser)]
#[command(name = "pulsewatch", version, about)]
struct Cli {
    /// Path to the TOML configuration file.
    #[arg(long, default_value = "config.toml")]
    config: String,

    /// Number of transactions to process before exiting.
    #[arg(long, default_value_t = 50)]
    count: u64,

    /// RNG seed for the transaction stream.
    #[arg(long, default_value_t = 42)]
    seed: u64,

    /// Fraction of generated transactions injected as anomalies.
    #[arg(long, default_value_t = 0.2)]
    anomaly_share: f64,

    /// Delay between transactions, in milliseconds.
    #[arg(long, default_value_t = 100)]
    interval_ms: u64,

    /// Print the last N audit records as JSON lines before exiting.
    #[arg(long)]
    audit_tail: Option<usize>,
}

fn tier_label(tier: RiskTier) -> String {
    let label = tier.to_string().to_uppercase();
    match tier {
        RiskTier::Critical => label.red().bold().to_string(),
        RiskTier::High => label.red().to_string(),
        RiskTier::Medium => label.yellow().to_string(),
        RiskTier::Low => label.green().to_string(),
    }
}

async fn run(cli: Cli, config: Config) -> anyhow::Result<()> {
    let directory = Arc::new(InMemoryDirectory::with_demo_customers());
    let audit = Arc::new(MemoryAuditLog::new(config.notification.audit_retention));
    let senders: Vec<Arc<dyn ChannelSender>> = vec![
        Arc::new(SimulatedSender::reliable(Channel::Email)),
        Arc::new(SimulatedSender::reliable(Channel::Voice)),
    ];
    let engine = FraudEngine::new(
        &config,
        directory.clone(),
        Arc::new(TemplateRenderer::new()),
        senders,
        audit.clone(),
    )
    .context("failed to build the fraud engine")?;

    let mut simulator =
        TransactionSimulator::new(cli.seed, directory.customer_ids(), cli.anomaly_share);

    let mut anomalies = 0u64;
    for _ in 0..cli.count {
        let tx = simulator.next_transaction();
        let outcome = engine.process(&tx).await;

        let sent: Vec<String> = outcome
            .report
            .attempts
            .iter()
            .filter(|a| a.outcome.is_sent())
            .map(|a| a.channel.to_string())
            .collect();
        println!(
            "{}  ${:<9} {:<28} {}  conf {:.2}  sent [{}]",
            tx.id,
            tx.amount,
            tx.merchant_name,
            tier_label(outcome.score.tier),
            outcome.score.confidence,
            sent.join(", "),
        );

        if outcome.score.is_anomaly {
            anomalies += 1;
        }
        tokio::time::sleep(Duration::from_millis(cli.interval_ms)).await;
    }

    info!(
        processed = cli.count,
        anomalies,
        audit_records = audit.len(),
        "stream complete"
    );

    if let Some(tail) = cli.audit_tail {
        for record in audit.recent(tail) {
            let line = serde_json::to_string(&record).context("serialize audit record")?;
            println!("{line}");
        }
    }
    Ok(())
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let config = if Path::new(&cli.config).exists() {
        match Config::load(&cli.config) {
            Ok(c) => c,
            Err(e) => {
                eprintln!("Failed to load config: {e}");
                std::process::exit(1);
            }
        }
    } else {
        Config::default()
    };
    if let Err(e) = config.validate() {
        eprintln!("Invalid config: {e}");
        std::process::exit(1);
    }

    config.init_logging();
    info!("pulsewatch starting");

    tokio::select! {
        result = run(cli, config.clone()) => {
            if let Err(e) = result {
                error!(error = %e, "Fatal error");
                std::process::exit(1);
            }
        }
        _ = signal::ctrl_c() => {
            info!("Shutdown signal received");
        }
    }

    info!("pulsewatch stopped");
}
