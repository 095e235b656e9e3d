//! Metrics collection for observability
//!
//! This module provides Prometheus metrics for monitoring the ledger.
//!
//! # Metrics
//!
//! - `ledger_records_total` - Total number of records appended
//! - `ledger_mining_attempts` - Histogram of nonces tried per record
//! - `ledger_mining_duration_seconds` - Histogram of mining latencies
//! - `ledger_verifications_total` - Total number of chain verifications
//! - `ledger_verification_failures_total` - Verifications that found a violation

use crate::pow::MiningReport;
use prometheus::{exponential_buckets, Histogram, HistogramOpts, IntCounter, Registry};
use std::fmt;
use std::sync::Arc;

/// Metrics collector
///
/// Collectors live on a private registry, so several ledgers in one process
/// each get their own counters.
#[derive(Clone)]
pub struct Metrics {
    /// Total records appended
    pub records_total: IntCounter,

    /// Nonces tried per mined record
    pub mining_attempts: Histogram,

    /// Mining duration histogram
    pub mining_duration: Histogram,

    /// Total verifications
    pub verifications_total: IntCounter,

    /// Verifications that reported a violation
    pub verification_failures: IntCounter,

    /// Prometheus registry
    pub registry: Arc<Registry>,
}

impl Metrics {
    /// Create new metrics collector
    pub fn new() -> prometheus::Result<Self> {
        let registry = Arc::new(Registry::new());

        let records_total = IntCounter::new(
            "ledger_records_total",
            "Total number of records appended",
        )?;
        registry.register(Box::new(records_total.clone()))?;

        // 1, 16, 256, ... one bucket per difficulty step
        let mining_attempts = Histogram::with_opts(
            HistogramOpts::new("ledger_mining_attempts", "Nonces tried per mined record")
                .buckets(exponential_buckets(1.0, 16.0, 8)?),
        )?;
        registry.register(Box::new(mining_attempts.clone()))?;

        let mining_duration = Histogram::with_opts(
            HistogramOpts::new(
                "ledger_mining_duration_seconds",
                "Histogram of mining latencies",
            )
            .buckets(vec![0.001, 0.005, 0.010, 0.050, 0.100, 0.500, 1.0, 5.0, 30.0]),
        )?;
        registry.register(Box::new(mining_duration.clone()))?;

        let verifications_total = IntCounter::new(
            "ledger_verifications_total",
            "Total number of chain verifications",
        )?;
        registry.register(Box::new(verifications_total.clone()))?;

        let verification_failures = IntCounter::new(
            "ledger_verification_failures_total",
            "Chain verifications that found a violation",
        )?;
        registry.register(Box::new(verification_failures.clone()))?;

        Ok(Self {
            records_total,
            mining_attempts,
            mining_duration,
            verifications_total,
            verification_failures,
            registry,
        })
    }

    /// Record a mined and appended record
    pub fn record_append(&self, report: &MiningReport) {
        self.records_total.inc();
        self.mining_attempts.observe(report.attempts as f64);
        self.mining_duration.observe(report.elapsed.as_secs_f64());
    }

    /// Record a verification pass
    pub fn record_verification(&self, valid: bool) {
        self.verifications_total.inc();
        if !valid {
            self.verification_failures.inc();
        }
    }

    /// Get metrics registry
    pub fn registry(&self) -> &Registry {
        &self.registry
    }
}

impl fmt::Debug for Metrics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Metrics")
            .field("records_total", &self.records_total.get())
            .field("verifications_total", &self.verifications_total.get())
            .finish_non_exhaustive()
    }
}
