//! Password policy configuration.

use serde::{Deserialize, Serialize};

/// Default and upper bound for the password expiry period, in days.
pub const DEFAULT_EXPIRY_DAYS: u32 = 90;

/// Lower bound for the password expiry period, in days.
pub const MIN_EXPIRY_DAYS: u32 = 1;

/// STIG-style password policy configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PolicyConfig {
    /// Whether STIG compliance checks run at all.
    #[serde(default = "default_true")]
    pub stig_enabled: bool,
    /// Minimum password length in characters.
    #[serde(default = "default_min_length")]
    pub min_length: usize,
    /// Maximum password length in characters.
    #[serde(default = "default_max_length")]
    pub max_length: usize,
    /// Number of most recent history hashes a new password may not match.
    #[serde(default = "default_reuse_window")]
    pub reuse_window: usize,
    /// Characters of the new password that must be absent from the current one.
    #[serde(default = "default_min_difference")]
    pub min_char_difference: usize,
    /// Minimum time between two password changes, in hours.
    #[serde(default = "default_cooldown_hours")]
    pub rotation_cooldown_hours: i64,
    /// Days until a newly set password expires.
    #[serde(default = "default_expiry_days")]
    pub expiry_days: u32,
}

impl Default for PolicyConfig {
    fn default() -> Self {
        Self {
            stig_enabled: true,
            min_length: default_min_length(),
            max_length: default_max_length(),
            reuse_window: default_reuse_window(),
            min_char_difference: default_min_difference(),
            rotation_cooldown_hours: default_cooldown_hours(),
            expiry_days: default_expiry_days(),
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_min_length() -> usize {
    8
}

fn default_max_length() -> usize {
    32
}

fn default_reuse_window() -> usize {
    10
}

fn default_min_difference() -> usize {
    4
}

fn default_cooldown_hours() -> i64 {
    24
}

fn default_expiry_days() -> u32 {
    DEFAULT_EXPIRY_DAYS
}
