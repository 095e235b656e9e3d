//! Provenance Ledger
//!
//! Append-only, tamper-evident ledger of supply-chain events.
//!
//! # Architecture
//!
//! - **Hash Chain**: Every record carries its predecessor's fingerprint
//! - **Proof of Work**: Records are mined to a difficulty before admission
//! - **Single Writer**: Appends take `&mut Ledger`, verification takes `&Ledger`
//! - **In Memory**: The ledger lives as long as its owner; export is JSON
//!
//! # Invariants
//!
//! - Append-only: Records are never modified, removed or reordered
//! - Position: `records[i].position == i`
//! - Linkage: `records[i].previous_fingerprint == records[i-1].fingerprint`
//! - Content addressing: Every fingerprint is the digest of its record
//! - Work: Every mined fingerprint starts with `difficulty` zeros

#![forbid(unsafe_code)]
#![warn(
    missing_docs,
    rust_2018_idioms,
    missing_debug_implementations,
    clippy::all
)]

pub mod types;
pub mod record;
pub mod ledger;
pub mod pow;
pub mod crypto;
pub mod error;
pub mod config;
pub mod metrics;

// Re-exports
pub use error::{Error, Result};
pub use types::{EventKind, Payload, SupplyChainEvent};
pub use record::Record;
pub use ledger::{ChainViolation, Ledger, LedgerSnapshot};
pub use pow::{CancelToken, Miner, MiningReport};
pub use crypto::{ContentDigest, HashAlgorithm};
pub use config::{Config, GenesisPolicy};
pub use metrics::Metrics;
