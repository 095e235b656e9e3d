//! Error types for the ledger

use thiserror::Error;

/// Result type for ledger operations
pub type Result<T> = std::result::Result<T, Error>;

/// Ledger errors
///
/// Tampering is not an error: verification reports it as data through
/// [`crate::ledger::ChainViolation`].
#[derive(Error, Debug)]
pub enum Error {
    /// Payload could not be turned into a document
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Mining hit the configured attempt cap
    #[error("Mining exhausted for record {position} after {attempts} attempts")]
    MiningExhausted {
        /// Position of the record being mined
        position: u64,
        /// Nonces tried before giving up
        attempts: u64,
    },

    /// Mining was cancelled through a [`crate::pow::CancelToken`]
    #[error("Mining cancelled for record {position} after {attempts} attempts")]
    MiningCancelled {
        /// Position of the record being mined
        position: u64,
        /// Nonces tried before cancellation was observed
        attempts: u64,
    },

    /// A ledger must always hold its genesis record
    #[error("Ledger snapshot contains no records")]
    EmptyLedger,

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
