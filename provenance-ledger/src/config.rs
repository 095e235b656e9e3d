//! Configuration for the ledger

use crate::crypto::{HashAlgorithm, DIGEST_HEX_LEN};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Difficulty of the reference ledger
pub const DEFAULT_DIFFICULTY: u32 = 3;

/// How the genesis record is treated
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GenesisPolicy {
    /// Genesis is not mined and verification never inspects it
    #[default]
    Exempt,
    /// Genesis is mined at construction and verified like any other record
    Mined,
}

impl GenesisPolicy {
    /// Configuration name
    pub fn name(&self) -> &'static str {
        match self {
            GenesisPolicy::Exempt => "exempt",
            GenesisPolicy::Mined => "mined",
        }
    }
}

impl fmt::Display for GenesisPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for GenesisPolicy {
    type Err = crate::Error;

    fn from_str(s: &str) -> crate::Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "exempt" => Ok(GenesisPolicy::Exempt),
            "mined" => Ok(GenesisPolicy::Mined),
            other => Err(crate::Error::Config(format!(
                "Unknown genesis policy: {}",
                other
            ))),
        }
    }
}

/// Ledger configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Leading '0' hex characters required in every mined fingerprint
    pub difficulty: u32,

    /// Digest used for fingerprints
    pub hash_algorithm: HashAlgorithm,

    /// Genesis mining/verification policy
    pub genesis_policy: GenesisPolicy,

    /// Nonces tried per record before giving up (unbounded if absent)
    pub max_mining_attempts: Option<u64>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            difficulty: DEFAULT_DIFFICULTY,
            hash_algorithm: HashAlgorithm::Sha256,
            genesis_policy: GenesisPolicy::Exempt,
            max_mining_attempts: None,
        }
    }
}

impl Config {
    /// Load from file
    pub fn from_file(path: impl AsRef<std::path::Path>) -> crate::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)
            .map_err(|e| crate::Error::Config(format!("Failed to parse config: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Load from environment variables
    pub fn from_env() -> crate::Result<Self> {
        let mut config = Config::default();

        if let Ok(difficulty) = std::env::var("LEDGER_DIFFICULTY") {
            config.difficulty = difficulty.trim().parse().map_err(|e| {
                crate::Error::Config(format!("Invalid LEDGER_DIFFICULTY: {}", e))
            })?;
        }

        if let Ok(algorithm) = std::env::var("LEDGER_HASH_ALGORITHM") {
            config.hash_algorithm = algorithm.parse()?;
        }

        if let Ok(policy) = std::env::var("LEDGER_GENESIS_POLICY") {
            config.genesis_policy = policy.parse()?;
        }

        if let Ok(attempts) = std::env::var("LEDGER_MAX_MINING_ATTEMPTS") {
            let attempts = attempts.trim().parse().map_err(|e| {
                crate::Error::Config(format!("Invalid LEDGER_MAX_MINING_ATTEMPTS: {}", e))
            })?;
            config.max_mining_attempts = Some(attempts);
        }

        config.validate()?;
        Ok(config)
    }

    /// Reject settings no fingerprint could ever satisfy
    pub fn validate(&self) -> crate::Result<()> {
        if self.difficulty as usize > DIGEST_HEX_LEN {
            return Err(crate::Error::Config(format!(
                "Difficulty {} exceeds fingerprint length {}",
                self.difficulty, DIGEST_HEX_LEN
            )));
        }
        Ok(())
    }
}
