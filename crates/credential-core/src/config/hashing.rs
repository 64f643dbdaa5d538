//! Password hashing configuration.

use serde::{Deserialize, Serialize};

/// Smallest digest output the CryptL7 engine will accept, in bytes.
pub const MIN_HASH_OUTPUT_SIZE: usize = 16;

/// Highest work factor any configuration may allow.
///
/// A work factor of 15 already means 2^32 mixing rounds.
pub const WORK_FACTOR_CEILING: u8 = 15;

/// Digest names accepted by `message_digest_algorithm`, in canonical form.
pub const SUPPORTED_DIGESTS: [&str; 3] = ["SHA-256", "SHA-384", "SHA-512"];

/// Maps a digest name such as `"sha512"` or `"SHA-512"` to its canonical form.
pub fn canonical_digest_name(name: &str) -> Option<&'static str> {
    let compact: String = name
        .chars()
        .filter(|c| *c != '-' && *c != '_')
        .collect::<String>()
        .to_ascii_uppercase();
    SUPPORTED_DIGESTS
        .iter()
        .copied()
        .find(|canonical| canonical.replace('-', "") == compact)
}

/// CryptL7 verifier hashing configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HashingConfig {
    /// Lowest accepted work factor.
    #[serde(default = "default_min_work_factor")]
    pub min_work_factor: u8,
    /// Highest accepted work factor.
    #[serde(default = "default_max_work_factor")]
    pub max_work_factor: u8,
    /// Work factor used for newly created verifiers.
    #[serde(default = "default_work_factor")]
    pub default_work_factor: u8,
    /// Minimum digest output size in bytes; weaker digests are rejected.
    #[serde(default = "default_min_hash_output_size")]
    pub min_hash_output_size: usize,
    /// Number of random salt bytes for newly created verifiers.
    #[serde(default = "default_salt_bytes")]
    pub salt_bytes: usize,
    /// Underlying digest name, e.g. `"SHA-256"` or `"SHA-512"`.
    #[serde(default = "default_digest_algorithm")]
    pub message_digest_algorithm: String,
}

impl Default for HashingConfig {
    fn default() -> Self {
        Self {
            min_work_factor: default_min_work_factor(),
            max_work_factor: default_max_work_factor(),
            default_work_factor: default_work_factor(),
            min_hash_output_size: default_min_hash_output_size(),
            salt_bytes: default_salt_bytes(),
            message_digest_algorithm: default_digest_algorithm(),
        }
    }
}

/// SHA-512-crypt configuration for interoperability hashes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LegacyCryptConfig {
    /// Rounds written into newly generated SHA-512-crypt salts.
    #[serde(default = "default_legacy_rounds")]
    pub rounds: u32,
}

impl Default for LegacyCryptConfig {
    fn default() -> Self {
        Self {
            rounds: default_legacy_rounds(),
        }
    }
}

fn default_min_work_factor() -> u8 {
    3
}

fn default_max_work_factor() -> u8 {
    10
}

fn default_work_factor() -> u8 {
    7
}

fn default_min_hash_output_size() -> usize {
    MIN_HASH_OUTPUT_SIZE
}

fn default_salt_bytes() -> usize {
    10
}

fn default_digest_algorithm() -> String {
    "SHA-256".to_string()
}

fn default_legacy_rounds() -> u32 {
    5000
}
