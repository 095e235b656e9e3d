//! Content digests for record fingerprints
//!
//! This module provides:
//! - The [`ContentDigest`] capability: a 256-bit digest of a byte sequence
//! - SHA-256 (default) and BLAKE3 implementations behind [`HashAlgorithm`]
//! - Lowercase hex encoding of digests
//!
//! A ledger fixes its algorithm for its whole lifetime. Switching algorithms
//! changes every fingerprint, which verification then reports as tampering.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fmt;
use std::str::FromStr;

/// Length of a hex-encoded 256-bit digest
pub const DIGEST_HEX_LEN: usize = 64;

/// Computes a 256-bit content digest of a byte sequence
pub trait ContentDigest {
    /// Raw digest bytes
    fn digest(&self, data: &[u8]) -> [u8; 32];

    /// Digest encoded as 64 lowercase hex characters
    fn digest_hex(&self, data: &[u8]) -> String {
        hex::encode(self.digest(data))
    }
}

/// Supported digest algorithms
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HashAlgorithm {
    /// SHA-256
    #[default]
    Sha256,
    /// BLAKE3 (256-bit output)
    Blake3,
}

impl HashAlgorithm {
    /// Configuration name
    pub fn name(&self) -> &'static str {
        match self {
            HashAlgorithm::Sha256 => "sha256",
            HashAlgorithm::Blake3 => "blake3",
        }
    }
}

impl ContentDigest for HashAlgorithm {
    fn digest(&self, data: &[u8]) -> [u8; 32] {
        match self {
            HashAlgorithm::Sha256 => sha256(data),
            HashAlgorithm::Blake3 => blake3::hash(data).into(),
        }
    }
}

impl fmt::Display for HashAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for HashAlgorithm {
    type Err = crate::Error;

    fn from_str(s: &str) -> crate::Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "sha256" | "sha-256" => Ok(HashAlgorithm::Sha256),
            "blake3" => Ok(HashAlgorithm::Blake3),
            other => Err(crate::Error::Config(format!(
                "Unknown hash algorithm: {}",
                other
            ))),
        }
    }
}

/// Hash arbitrary bytes using SHA-256
pub fn sha256(data: &[u8]) -> [u8; 32] {
    let mut hasher = Sha256::new();
    hasher.update(data);
    hasher.finalize().into()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sha256_known_vector() {
        // FIPS 180-2 "abc"
        assert_eq!(
            HashAlgorithm::Sha256.digest_hex(b"abc"),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
    }

    #[test]
    fn test_digest_hex_length() {
        for algorithm in [HashAlgorithm::Sha256, HashAlgorithm::Blake3] {
            let hex = algorithm.digest_hex(b"supply chain");
            assert_eq!(hex.len(), DIGEST_HEX_LEN);
            assert!(hex.chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));
        }
    }

    #[test]
    fn test_algorithms_disagree() {
        let data = b"same input";
        assert_ne!(
            HashAlgorithm::Sha256.digest(data),
            HashAlgorithm::Blake3.digest(data)
        );
    }

    #[test]
    fn test_digest_deterministic() {
        let hash1 = HashAlgorithm::Blake3.digest(b"test data");
        let hash2 = HashAlgorithm::Blake3.digest(b"test data");
        assert_eq!(hash1, hash2);
        assert_ne!(hash1, HashAlgorithm::Blake3.digest(b"different data"));
    }

    #[test]
    fn test_algorithm_from_str() {
        assert_eq!("sha256".parse::<HashAlgorithm>().unwrap(), HashAlgorithm::Sha256);
        assert_eq!("SHA-256".parse::<HashAlgorithm>().unwrap(), HashAlgorithm::Sha256);
        assert_eq!(" blake3 ".parse::<HashAlgorithm>().unwrap(), HashAlgorithm::Blake3);
        assert!("md5".parse::<HashAlgorithm>().is_err());
    }
}
