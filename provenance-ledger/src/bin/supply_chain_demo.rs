//! Supply-chain demo binary
//!
//! Records a product's journey from factory to retailer and prints the
//! resulting ledger as JSON. Pass a TOML config path as the first argument,
//! otherwise settings come from `LEDGER_*` environment variables.

use anyhow::Context;
use provenance_ledger::{Config, EventKind, Ledger, SupplyChainEvent};

fn sample_events() -> Vec<SupplyChainEvent> {
    vec![
        SupplyChainEvent::new(
            EventKind::Manufactured,
            "Factory A",
            "Product manufactured and packaged.",
        ),
        SupplyChainEvent::new(
            EventKind::Shipped,
            "Factory A to Distributor",
            "Product shipped to distributor.",
        ),
        SupplyChainEvent::new(
            EventKind::Received,
            "Distributor Warehouse",
            "Product received and stored.",
        ),
        SupplyChainEvent::new(
            EventKind::Delivered,
            "Retailer",
            "Product delivered to retailer.",
        ),
    ]
}

fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    let config = match std::env::args().nth(1) {
        Some(path) => Config::from_file(&path)
            .with_context(|| format!("loading config from {}", path))?,
        None => Config::from_env().context("loading config from environment")?,
    };

    tracing::info!(
        difficulty = config.difficulty,
        algorithm = %config.hash_algorithm,
        "Starting supply-chain ledger"
    );

    let mut ledger = Ledger::with_config(&config)?;
    for event in sample_events() {
        ledger
            .add_event(&event)
            .with_context(|| format!("recording {} event", event.event))?;
    }

    println!("{}", ledger.to_json_pretty()?);

    match ledger.verify() {
        Ok(()) => tracing::info!(records = ledger.len(), "Ledger is valid"),
        Err(violation) => anyhow::bail!("ledger failed verification: {}", violation),
    }

    Ok(())
}
