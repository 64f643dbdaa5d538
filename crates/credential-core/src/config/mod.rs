//! Configuration schemas for the credential subsystem.
//!
//! All configuration structs are deserialized from TOML files via the
//! `config` crate. Each sub-module represents a logical configuration
//! section.

pub mod hashing;
pub mod logging;
pub mod policy;
pub mod pool;

use serde::{Deserialize, Serialize};

pub use self::hashing::{HashingConfig, LegacyCryptConfig, MIN_HASH_OUTPUT_SIZE};
pub use self::logging::LoggingConfig;
pub use self::policy::PolicyConfig;
pub use self::pool::PoolConfig;

use self::hashing::{WORK_FACTOR_CEILING, canonical_digest_name};
use crate::error::AppError;

/// Property name carrying the live password expiry period in days.
pub const PASSWORD_EXPIRY_PROPERTY: &str = "password.expiry";

/// Property name toggling STIG password checks.
pub const STIG_ENABLED_PROPERTY: &str = "security.stig.enabled";

/// Root configuration.
///
/// This struct is the top-level deserialization target for the merged
/// TOML configuration files (default.toml + environment overlay).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CredentialConfig {
    /// CryptL7 hashing settings.
    #[serde(default)]
    pub hashing: HashingConfig,
    /// SHA-512-crypt settings.
    #[serde(default)]
    pub legacy: LegacyCryptConfig,
    /// Password policy settings.
    #[serde(default)]
    pub policy: PolicyConfig,
    /// Hashing worker pool settings.
    #[serde(default)]
    pub pool: PoolConfig,
    /// Logging settings.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl CredentialConfig {
    /// Load configuration from TOML files.
    ///
    /// Merges `config/default`, an optional `config/{env}` overlay, and
    /// environment variables prefixed with `CREDENTIAL__`, then validates
    /// the result.
    pub fn load(env: &str) -> Result<Self, AppError> {
        Self::load_from("config/default", env)
    }

    /// Load configuration rooted at an explicit base file path.
    pub fn load_from(base: &str, env: &str) -> Result<Self, AppError> {
        let overlay = match base.rsplit_once('/') {
            Some((dir, _)) => format!("{dir}/{env}"),
            None => env.to_string(),
        };

        let config = config::Config::builder()
            .add_source(config::File::with_name(base).required(false))
            .add_source(config::File::with_name(&overlay).required(false))
            .add_source(
                config::Environment::with_prefix("CREDENTIAL")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .map_err(|e| AppError::configuration(format!("Failed to build config: {e}")))?;

        let loaded: Self = config
            .try_deserialize()
            .map_err(|e| AppError::configuration(format!("Failed to deserialize config: {e}")))?;

        loaded.validate()?;
        Ok(loaded)
    }

    /// Checks cross-field constraints, failing fast on unusable values.
    pub fn validate(&self) -> Result<(), AppError> {
        let h = &self.hashing;
        if h.min_work_factor > h.max_work_factor {
            return Err(AppError::configuration(format!(
                "min_work_factor ({}) exceeds max_work_factor ({})",
                h.min_work_factor, h.max_work_factor
            )));
        }
        if h.max_work_factor > WORK_FACTOR_CEILING {
            return Err(AppError::configuration(format!(
                "max_work_factor must not exceed {WORK_FACTOR_CEILING}"
            )));
        }
        if !(h.min_work_factor..=h.max_work_factor).contains(&h.default_work_factor) {
            return Err(AppError::configuration(format!(
                "default_work_factor ({}) is outside [{}, {}]",
                h.default_work_factor, h.min_work_factor, h.max_work_factor
            )));
        }
        if h.min_hash_output_size < MIN_HASH_OUTPUT_SIZE {
            return Err(AppError::configuration(format!(
                "min_hash_output_size must be at least {MIN_HASH_OUTPUT_SIZE} bytes"
            )));
        }
        if h.salt_bytes == 0 {
            return Err(AppError::configuration("salt_bytes must be at least 1"));
        }
        if canonical_digest_name(&h.message_digest_algorithm).is_none() {
            return Err(AppError::configuration(format!(
                "Unsupported message digest algorithm '{}'",
                h.message_digest_algorithm
            )));
        }

        let p = &self.policy;
        if p.min_length == 0 || p.min_length > p.max_length {
            return Err(AppError::configuration(format!(
                "Invalid password length bounds [{}, {}]",
                p.min_length, p.max_length
            )));
        }
        if p.rotation_cooldown_hours < 0 {
            return Err(AppError::configuration(
                "rotation_cooldown_hours must not be negative",
            ));
        }
        if chrono::Duration::try_hours(p.rotation_cooldown_hours).is_none() {
            return Err(AppError::configuration(format!(
                "rotation_cooldown_hours ({}) is out of range",
                p.rotation_cooldown_hours
            )));
        }

        Ok(())
    }
}
