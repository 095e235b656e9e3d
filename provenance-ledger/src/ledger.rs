//! Main ledger orchestration layer
//!
//! [`Ledger`] owns the ordered, append-only sequence of records. It creates
//! the genesis record, links and mines every new record before appending it,
//! and re-checks the whole chain on demand.
//!
//! # Example
//!
//! ```
//! use provenance_ledger::{EventKind, Ledger, SupplyChainEvent};
//!
//! let mut ledger = Ledger::new();
//! ledger.add_event(SupplyChainEvent::new(
//!     EventKind::Manufactured,
//!     "Factory A",
//!     "Product manufactured and packaged.",
//! ))?;
//!
//! assert_eq!(ledger.len(), 2);
//! assert!(ledger.is_valid());
//! # Ok::<(), provenance_ledger::Error>(())
//! ```

use crate::{
    config::{GenesisPolicy, DEFAULT_DIFFICULTY},
    crypto::{HashAlgorithm, DIGEST_HEX_LEN},
    metrics::Metrics,
    pow::{CancelToken, Miner},
    record::Record,
    types::{genesis_payload, now_timestamp, GENESIS_PREVIOUS_FINGERPRINT},
    Config, Error, Result,
};
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::{debug, warn};

/// First integrity violation found while walking the chain
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ChainViolation {
    /// Stored position differs from the record's index in the chain
    #[error("record {position}: stored position does not match its index")]
    PositionMismatch {
        /// Index of the offending record
        position: u64,
    },

    /// Stored fingerprint no longer matches the record's contents
    #[error("record {position}: fingerprint does not match contents")]
    FingerprintMismatch {
        /// Index of the offending record
        position: u64,
    },

    /// Record does not point at its predecessor's fingerprint
    #[error("record {position}: previous fingerprint does not match predecessor")]
    BrokenLink {
        /// Index of the offending record
        position: u64,
    },

    /// Fingerprint does not meet the ledger's difficulty
    #[error("record {position}: fingerprint misses difficulty {difficulty}")]
    InsufficientWork {
        /// Index of the offending record
        position: u64,
        /// Ledger difficulty
        difficulty: u32,
    },
}

impl ChainViolation {
    /// Index of the offending record
    pub fn position(&self) -> u64 {
        match self {
            ChainViolation::PositionMismatch { position }
            | ChainViolation::FingerprintMismatch { position }
            | ChainViolation::BrokenLink { position }
            | ChainViolation::InsufficientWork { position, .. } => *position,
        }
    }
}

/// Exported form of a ledger
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerSnapshot {
    /// Required leading zeros
    pub difficulty: u32,

    /// Fingerprint digest
    #[serde(default)]
    pub hash_algorithm: HashAlgorithm,

    /// Genesis policy
    #[serde(default)]
    pub genesis_policy: GenesisPolicy,

    /// Records in chain order
    pub records: Vec<Record>,
}

/// Append-only supply-chain ledger
pub struct Ledger {
    /// Records in chain order, never empty
    records: Vec<Record>,

    /// Required leading zeros
    difficulty: u32,

    /// Fingerprint digest, fixed for the ledger's lifetime
    algorithm: HashAlgorithm,

    /// Genesis policy
    genesis_policy: GenesisPolicy,

    /// Per-record mining cap
    max_mining_attempts: Option<u64>,

    /// Cancellation for in-flight mining (if attached)
    cancel: Option<CancelToken>,

    /// Metrics collector (if attached)
    metrics: Option<Metrics>,
}

impl Ledger {
    /// Create a ledger with default settings
    ///
    /// Difficulty 3, SHA-256, genesis exempt from mining and verification.
    pub fn new() -> Self {
        let algorithm = HashAlgorithm::default();
        let genesis = Record::with_algorithm(
            0,
            now_timestamp(),
            genesis_payload(),
            GENESIS_PREVIOUS_FINGERPRINT,
            algorithm,
        );

        debug!(fingerprint = %genesis.fingerprint(), "Ledger created");

        Self {
            records: vec![genesis],
            difficulty: DEFAULT_DIFFICULTY,
            algorithm,
            genesis_policy: GenesisPolicy::Exempt,
            max_mining_attempts: None,
            cancel: None,
            metrics: None,
        }
    }

    /// Create a ledger from configuration
    ///
    /// With [`GenesisPolicy::Mined`] the genesis record is mined here, so this
    /// can fail with the same mining errors as [`Ledger::add_event`].
    pub fn with_config(config: &Config) -> Result<Self> {
        config.validate()?;

        let mut ledger = Self {
            records: Vec::with_capacity(1),
            difficulty: config.difficulty,
            algorithm: config.hash_algorithm,
            genesis_policy: config.genesis_policy,
            max_mining_attempts: config.max_mining_attempts,
            cancel: None,
            metrics: None,
        };

        let mut genesis = Record::with_algorithm(
            0,
            now_timestamp(),
            genesis_payload(),
            GENESIS_PREVIOUS_FINGERPRINT,
            ledger.algorithm,
        );
        if ledger.genesis_policy == GenesisPolicy::Mined {
            genesis.mine_with(&ledger.miner())?;
        }
        ledger.records.push(genesis);

        debug!(
            difficulty = ledger.difficulty,
            algorithm = %ledger.algorithm,
            genesis_policy = %ledger.genesis_policy,
            "Ledger created"
        );

        Ok(ledger)
    }

    /// Rebuild a ledger from an exported snapshot
    ///
    /// Only emptiness and the difficulty bound are checked; run [`Ledger::verify`] on the
    /// result to validate an imported chain.
    pub fn from_snapshot(snapshot: LedgerSnapshot) -> Result<Self> {
        if snapshot.records.is_empty() {
            return Err(Error::EmptyLedger);
        }
        if snapshot.difficulty as usize > DIGEST_HEX_LEN {
            return Err(Error::Config(format!(
                "Difficulty {} exceeds fingerprint length {}",
                snapshot.difficulty, DIGEST_HEX_LEN
            )));
        }

        Ok(Self {
            records: snapshot.records,
            difficulty: snapshot.difficulty,
            algorithm: snapshot.hash_algorithm,
            genesis_policy: snapshot.genesis_policy,
            max_mining_attempts: None,
            cancel: None,
            metrics: None,
        })
    }

    /// Parse a JSON snapshot and rebuild the ledger
    pub fn from_json(json: &str) -> Result<Self> {
        let snapshot: LedgerSnapshot = serde_json::from_str(json)?;
        Self::from_snapshot(snapshot)
    }

    /// Attach metrics collector
    pub fn with_metrics(mut self, metrics: Metrics) -> Self {
        self.metrics = Some(metrics);
        self
    }

    /// Attach a token that aborts in-flight mining when tripped
    pub fn with_cancel_token(mut self, token: CancelToken) -> Self {
        self.cancel = Some(token);
        self
    }

    /// Miner for this ledger's settings
    fn miner(&self) -> Miner {
        let miner = Miner::new(self.difficulty)
            .with_algorithm(self.algorithm)
            .with_max_attempts(self.max_mining_attempts);

        match &self.cancel {
            Some(token) => miner.with_cancel_token(token.clone()),
            None => miner,
        }
    }

    /// Last record in the chain
    pub fn latest(&self) -> &Record {
        // records always holds genesis
        &self.records[self.records.len() - 1]
    }

    /// Record at a position
    pub fn get(&self, position: u64) -> Option<&Record> {
        usize::try_from(position)
            .ok()
            .and_then(|index| self.records.get(index))
    }

    /// All records in chain order
    pub fn records(&self) -> &[Record] {
        &self.records
    }

    /// Number of records, genesis included
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Always false: a ledger holds at least its genesis record
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Required leading zeros
    pub fn difficulty(&self) -> u32 {
        self.difficulty
    }

    /// Fingerprint digest
    pub fn algorithm(&self) -> HashAlgorithm {
        self.algorithm
    }

    /// Genesis policy
    pub fn genesis_policy(&self) -> GenesisPolicy {
        self.genesis_policy
    }

    /// Record a new event
    ///
    /// Links the event to the current tail, mines it and appends it. Blocks
    /// until mining succeeds. On error the ledger is left unchanged.
    pub fn add_event<P: Serialize>(&mut self, payload: P) -> Result<()> {
        let payload = serde_json::to_value(payload)?;
        let position = self.records.len() as u64;

        let mut record = Record::with_algorithm(
            position,
            now_timestamp(),
            payload,
            self.latest().fingerprint(),
            self.algorithm,
        );
        let report = record.mine_with(&self.miner())?;

        debug!(position, attempts = report.attempts, "Appending record");

        if let Some(ref metrics) = self.metrics {
            metrics.record_append(&report);
        }
        self.records.push(record);

        Ok(())
    }

    /// Check chain integrity
    ///
    /// Stops at the first failing record.
    pub fn is_valid(&self) -> bool {
        self.verify().is_ok()
    }

    /// Check chain integrity, reporting the first violation
    ///
    /// For every checked record: the stored position must equal its index,
    /// the recomputed fingerprint must equal the stored one, the previous fingerprint must equal the predecessor's, and
    /// the fingerprint must meet the difficulty. Under
    /// [`GenesisPolicy::Exempt`] the walk starts at position 1 and genesis is
    /// never inspected.
    pub fn verify(&self) -> std::result::Result<(), ChainViolation> {
        let result = self.walk();

        if let Some(ref metrics) = self.metrics {
            metrics.record_verification(result.is_ok());
        }
        if let Err(ref violation) = result {
            warn!(
                position = violation.position(),
                "Chain verification failed: {}",
                violation
            );
        }

        result
    }

    fn walk(&self) -> std::result::Result<(), ChainViolation> {
        let start = match self.genesis_policy {
            GenesisPolicy::Exempt => 1,
            GenesisPolicy::Mined => 0,
        };

        for index in start..self.records.len() {
            let record = &self.records[index];
            let position = index as u64;

            if record.position() != position {
                return Err(ChainViolation::PositionMismatch { position });
            }

            if !record.verify_fingerprint_with(self.algorithm) {
                return Err(ChainViolation::FingerprintMismatch { position });
            }

            let expected_previous = match index {
                0 => GENESIS_PREVIOUS_FINGERPRINT,
                _ => self.records[index - 1].fingerprint(),
            };
            if record.previous_fingerprint() != expected_previous {
                return Err(ChainViolation::BrokenLink { position });
            }

            if !record.meets_difficulty(self.difficulty) {
                return Err(ChainViolation::InsufficientWork {
                    position,
                    difficulty: self.difficulty,
                });
            }
        }

        Ok(())
    }

    /// Export the ledger
    pub fn snapshot(&self) -> LedgerSnapshot {
        LedgerSnapshot {
            difficulty: self.difficulty,
            hash_algorithm: self.algorithm,
            genesis_policy: self.genesis_policy,
            records: self.records.clone(),
        }
    }

    /// Export the ledger as pretty-printed JSON
    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(&self.snapshot())?)
    }
}

impl Default for Ledger {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Ledger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Ledger")
            .field("records", &self.records)
            .field("difficulty", &self.difficulty)
            .field("algorithm", &self.algorithm)
            .field("genesis_policy", &self.genesis_policy)
            .field("max_mining_attempts", &self.max_mining_attempts)
            .finish_non_exhaustive()
    }
}
