//! Proof-of-work admission control
//!
//! A fingerprint satisfies difficulty `d` when its first `d` hex characters
//! are all `'0'`. Expected search cost is about `16^d` digests, so each step
//! of difficulty multiplies the cost of admitting a record by sixteen.
//!
//! [`Miner`] carries the search parameters; the search itself runs in
//! [`crate::record::Record::mine_with`].

use crate::crypto::{HashAlgorithm, DIGEST_HEX_LEN};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

/// Character a fingerprint must start with
pub const TARGET_CHAR: char = '0';

/// Largest difficulty a fingerprint can satisfy
pub const MAX_DIFFICULTY: u32 = DIGEST_HEX_LEN as u32;

/// Bound a difficulty to [`MAX_DIFFICULTY`]
pub fn clamp_difficulty(difficulty: u32) -> u32 {
    difficulty.min(MAX_DIFFICULTY)
}

/// Target prefix for a difficulty, e.g. 3 => "000"
///
/// Difficulties above [`MAX_DIFFICULTY`] are clamped.
pub fn target(difficulty: u32) -> String {
    std::iter::repeat(TARGET_CHAR)
        .take(clamp_difficulty(difficulty) as usize)
        .collect()
}

/// Check whether a fingerprint satisfies the difficulty target
pub fn meets_target(fingerprint: &str, difficulty: u32) -> bool {
    fingerprint.len() >= difficulty as usize && fingerprint.starts_with(&target(difficulty))
}

/// Shared flag for aborting an in-flight mining search from another thread
#[derive(Debug, Clone, Default)]
pub struct CancelToken {
    cancelled: Arc<AtomicBool>,
}

impl CancelToken {
    /// Create new token (not cancelled)
    pub fn new() -> Self {
        Self::default()
    }

    /// Request cancellation
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::Relaxed);
    }

    /// Clear a previous cancellation so the token can be reused
    pub fn reset(&self) {
        self.cancelled.store(false, Ordering::Relaxed);
    }

    /// Check if cancellation was requested
    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Relaxed)
    }
}

/// Mining parameters
#[derive(Debug, Clone)]
pub struct Miner {
    difficulty: u32,
    algorithm: HashAlgorithm,
    max_attempts: Option<u64>,
    cancel: Option<CancelToken>,
}

impl Miner {
    /// Unbounded SHA-256 miner for a difficulty
    ///
    /// Difficulties above [`MAX_DIFFICULTY`] are clamped to it.
    pub fn new(difficulty: u32) -> Self {
        Self {
            difficulty: clamp_difficulty(difficulty),
            algorithm: HashAlgorithm::default(),
            max_attempts: None,
            cancel: None,
        }
    }

    /// Set digest algorithm
    pub fn with_algorithm(mut self, algorithm: HashAlgorithm) -> Self {
        self.algorithm = algorithm;
        self
    }

    /// Cap the number of nonces tried (`None` = unbounded)
    pub fn with_max_attempts(mut self, max_attempts: Option<u64>) -> Self {
        self.max_attempts = max_attempts;
        self
    }

    /// Attach a cancellation token
    pub fn with_cancel_token(mut self, token: CancelToken) -> Self {
        self.cancel = Some(token);
        self
    }

    /// Required leading zeros
    pub fn difficulty(&self) -> u32 {
        self.difficulty
    }

    /// Digest algorithm
    pub fn algorithm(&self) -> HashAlgorithm {
        self.algorithm
    }

    /// Attempt cap
    pub fn max_attempts(&self) -> Option<u64> {
        self.max_attempts
    }

    /// Whether the attached token (if any) was tripped
    pub fn is_cancelled(&self) -> bool {
        self.cancel.as_ref().map_or(false, CancelToken::is_cancelled)
    }
}

/// Outcome of a successful mining search
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MiningReport {
    /// Nonce increments performed (0 if the record already met the target)
    pub attempts: u64,

    /// Wall-clock time spent searching
    pub elapsed: Duration,
}
