//! Ledger records
//!
//! A [`Record`] holds one supply-chain event plus the link to its
//! predecessor. Its fingerprint is a digest of the plain concatenation
//!
//! ```text
//! position ‖ previous_fingerprint ‖ timestamp ‖ json(payload) ‖ nonce
//! ```
//!
//! with integers in decimal and the payload as compact JSON with sorted
//! object keys.

use crate::{
    crypto::{ContentDigest, HashAlgorithm},
    pow::{self, Miner, MiningReport},
    types::Payload,
    Error, Result,
};
use serde::{Deserialize, Serialize};
use std::time::Instant;
use tracing::info;

/// One entry of the ledger
///
/// Serialized field order: position, timestamp, payload,
/// previous_fingerprint, nonce, fingerprint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    pub(crate) position: u64,
    pub(crate) timestamp: String,
    pub(crate) payload: Payload,
    pub(crate) previous_fingerprint: String,
    pub(crate) nonce: u64,
    pub(crate) fingerprint: String,
}

impl Record {
    /// Create record with nonce 0 and its SHA-256 fingerprint
    pub fn new(
        position: u64,
        timestamp: impl Into<String>,
        payload: Payload,
        previous_fingerprint: impl Into<String>,
    ) -> Self {
        Self::with_algorithm(
            position,
            timestamp,
            payload,
            previous_fingerprint,
            HashAlgorithm::default(),
        )
    }

    /// Create record fingerprinted with an explicit algorithm
    pub fn with_algorithm(
        position: u64,
        timestamp: impl Into<String>,
        payload: Payload,
        previous_fingerprint: impl Into<String>,
        algorithm: HashAlgorithm,
    ) -> Self {
        let mut record = Self {
            position,
            timestamp: timestamp.into(),
            payload,
            previous_fingerprint: previous_fingerprint.into(),
            nonce: 0,
            fingerprint: String::new(),
        };
        record.fingerprint = record.compute_fingerprint_with(algorithm);
        record
    }

    /// Position in the ledger (0 = genesis)
    pub fn position(&self) -> u64 {
        self.position
    }

    /// Construction timestamp
    pub fn timestamp(&self) -> &str {
        &self.timestamp
    }

    /// Event document
    pub fn payload(&self) -> &Payload {
        &self.payload
    }

    /// Fingerprint of the predecessor ("0" for genesis)
    pub fn previous_fingerprint(&self) -> &str {
        &self.previous_fingerprint
    }

    /// Proof-of-work counter
    pub fn nonce(&self) -> u64 {
        self.nonce
    }

    /// Stored fingerprint
    pub fn fingerprint(&self) -> &str {
        &self.fingerprint
    }

    /// Bytes fed to the digest
    fn preimage(&self) -> String {
        format!(
            "{}{}{}{}{}",
            self.position, self.previous_fingerprint, self.timestamp, self.payload, self.nonce
        )
    }

    /// Recompute the SHA-256 fingerprint from the current fields
    pub fn compute_fingerprint(&self) -> String {
        self.compute_fingerprint_with(HashAlgorithm::default())
    }

    /// Recompute the fingerprint with an explicit algorithm
    pub fn compute_fingerprint_with(&self, algorithm: HashAlgorithm) -> String {
        algorithm.digest_hex(self.preimage().as_bytes())
    }

    /// Check the stored fingerprint against the record's contents
    pub fn verify_fingerprint_with(&self, algorithm: HashAlgorithm) -> bool {
        self.fingerprint == self.compute_fingerprint_with(algorithm)
    }

    /// Check the stored fingerprint against a difficulty target
    pub fn meets_difficulty(&self, difficulty: u32) -> bool {
        pow::meets_target(&self.fingerprint, difficulty)
    }

    /// Search for a nonce whose SHA-256 fingerprint meets the difficulty
    ///
    /// Unbounded: blocks until a nonce is found. Difficulties above
    /// [`pow::MAX_DIFFICULTY`] are clamped to it.
    pub fn mine(&mut self, difficulty: u32) -> MiningReport {
        let started = Instant::now();
        let target = pow::target(difficulty);
        let mut attempts = 0u64;

        while !self.fingerprint.starts_with(&target) {
            self.nonce += 1;
            attempts += 1;
            self.fingerprint = self.compute_fingerprint();
        }

        info!(
            position = self.position,
            nonce = self.nonce,
            "Record {} mined: {}",
            self.position,
            self.fingerprint
        );

        MiningReport {
            attempts,
            elapsed: started.elapsed(),
        }
    }

    /// Search for a nonce under the miner's algorithm, cap and cancel token
    ///
    /// On error the record keeps the last nonce tried and must not be
    /// appended.
    pub fn mine_with(&mut self, miner: &Miner) -> Result<MiningReport> {
        let started = Instant::now();
        let target = pow::target(miner.difficulty());
        let mut attempts = 0u64;

        while !self.fingerprint.starts_with(&target) {
            if miner.max_attempts().map_or(false, |max| attempts >= max) {
                return Err(Error::MiningExhausted {
                    position: self.position,
                    attempts,
                });
            }
            if miner.is_cancelled() {
                return Err(Error::MiningCancelled {
                    position: self.position,
                    attempts,
                });
            }

            self.nonce += 1;
            attempts += 1;
            self.fingerprint = self.compute_fingerprint_with(miner.algorithm());
        }

        info!(
            position = self.position,
            nonce = self.nonce,
            attempts,
            "Record {} mined: {}",
            self.position,
            self.fingerprint
        );

        Ok(MiningReport {
            attempts,
            elapsed: started.elapsed(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pow::CancelToken;
    use serde_json::json;

    fn sample_record() -> Record {
        Record::new(
            1,
            "2024-01-01T00:00:00.000Z",
            json!({"event": "Manufactured", "location": "Factory A"}),
            "0",
        )
    }

    #[test]
    fn test_new_record_has_fingerprint() {
        let record = sample_record();
        assert_eq!(record.nonce(), 0);
        assert_eq!(record.fingerprint().len(), 64);
        assert_eq!(record.fingerprint(), record.compute_fingerprint());
    }

    #[test]
    fn test_fingerprint_matches_concatenation() {
        let record = sample_record();
        let preimage = r#"102024-01-01T00:00:00.000Z{"event":"Manufactured","location":"Factory A"}0"#;
        assert_eq!(
            record.fingerprint(),
            HashAlgorithm::Sha256.digest_hex(preimage.as_bytes())
        );
    }

    #[test]
    fn test_fingerprint_ignores_key_insertion_order() {
        let mut forward = serde_json::Map::new();
        forward.insert("a".into(), json!(1));
        forward.insert("b".into(), json!(2));
        let mut backward = serde_json::Map::new();
        backward.insert("b".into(), json!(2));
        backward.insert("a".into(), json!(1));

        let r1 = Record::new(0, "t", forward.into(), "0");
        let r2 = Record::new(0, "t", backward.into(), "0");
        assert_eq!(r1.fingerprint(), r2.fingerprint());
    }

    #[test]
    fn test_fingerprint_sensitive_to_every_field() {
        let base = sample_record();
        let original = base.compute_fingerprint();

        let mut changed = base.clone();
        changed.position = 2;
        assert_ne!(changed.compute_fingerprint(), original);

        let mut changed = base.clone();
        changed.timestamp = "2024-01-01T00:00:00.001Z".into();
        assert_ne!(changed.compute_fingerprint(), original);

        let mut changed = base.clone();
        changed.payload["location"] = json!("Factory B");
        assert_ne!(changed.compute_fingerprint(), original);

        let mut changed = base.clone();
        changed.previous_fingerprint = "1".into();
        assert_ne!(changed.compute_fingerprint(), original);

        let mut changed = base.clone();
        changed.nonce = 1;
        assert_ne!(changed.compute_fingerprint(), original);
    }

    #[test]
    fn test_mine_meets_difficulty() {
        let mut record = sample_record();
        let report = record.mine(2);

        assert!(record.fingerprint().starts_with("00"));
        assert_eq!(record.nonce(), report.attempts);
        assert!(record.verify_fingerprint_with(HashAlgorithm::Sha256));
    }

    #[test]
    fn test_mine_difficulty_zero_is_noop() {
        let mut record = sample_record();
        let before = record.fingerprint().to_string();
        let report = record.mine(0);

        assert_eq!(report.attempts, 0);
        assert_eq!(record.nonce(), 0);
        assert_eq!(record.fingerprint(), before);
    }

    #[test]
    fn test_mine_with_blake3() {
        let mut record = Record::with_algorithm(
            3,
            "2024-01-01T00:00:00.000Z",
            json!({"event": "Delivered"}),
            "abc",
            HashAlgorithm::Blake3,
        );
        record.mine_with(&Miner::new(2).with_algorithm(HashAlgorithm::Blake3)).unwrap();

        assert!(record.meets_difficulty(2));
        assert!(record.verify_fingerprint_with(HashAlgorithm::Blake3));
        assert!(!record.verify_fingerprint_with(HashAlgorithm::Sha256));
    }

    #[test]
    fn test_mine_with_attempt_cap() {
        let mut record = sample_record();
        // 64 leading zeros is unreachable
        let result = record.mine_with(&Miner::new(64).with_max_attempts(Some(50)));

        match result {
            Err(Error::MiningExhausted { position, attempts }) => {
                assert_eq!(position, 1);
                assert_eq!(attempts, 50);
            }
            other => panic!("expected MiningExhausted, got {:?}", other),
        }
    }

    #[test]
    fn test_mine_with_cancelled_token() {
        let token = CancelToken::new();
        token.cancel();

        let mut record = sample_record();
        let result = record.mine_with(&Miner::new(64).with_cancel_token(token));

        assert!(matches!(
            result,
            Err(Error::MiningCancelled { attempts: 0, .. })
        ));
    }

    #[test]
    fn test_mine_with_oversized_difficulty_is_clamped() {
        let mut record = sample_record();
        let result = record.mine_with(&Miner::new(1_000).with_max_attempts(Some(5)));

        assert!(matches!(
            result,
            Err(Error::MiningExhausted { attempts: 5, .. })
        ));
    }
}
