//! CLI command definitions and dispatch.

pub mod expiry;
pub mod hash;
pub mod inspect;
pub mod legacy;
pub mod policy;
pub mod verify;

use std::sync::Arc;

use clap::{Parser, Subcommand};

use crate::output::OutputFormat;
use credential_core::config::CredentialConfig;
use credential_core::error::AppError;
use credential_hash::{HashingPool, PasswordHasherRegistry};

/// Credential tool: hash, verify, and policy-check gateway passwords
#[derive(Debug, Parser)]
#[command(name = "credential-tool", version, about, long_about = None)]
pub struct Cli {
    /// Base configuration file, without extension
    #[arg(short, long, default_value = "config/default")]
    pub config: String,

    /// Output format
    #[arg(short, long, value_enum, default_value = "table")]
    pub format: OutputFormat,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Top-level commands
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Hash a password into a new verifier
    Hash(hash::HashArgs),
    /// Verify a password against a stored verifier
    Verify(verify::VerifyArgs),
    /// Show what a verifier contains without hashing
    Inspect(inspect::InspectArgs),
    /// Generate a SHA-512-crypt salt setting
    LegacySalt(legacy::LegacySaltArgs),
    /// Run SHA-512-crypt with an explicit salt setting
    LegacyCrypt(legacy::LegacyCryptArgs),
    /// Check a password change against the STIG policy
    PolicyCheck(policy::PolicyCheckArgs),
    /// Compute the expiry date of a password
    Expiry(expiry::ExpiryArgs),
}

impl Cli {
    /// Execute the CLI command
    pub async fn execute(&self, config: &CredentialConfig) -> Result<(), AppError> {
        match &self.command {
            Commands::Hash(args) => hash::execute(args, config, self.format).await,
            Commands::Verify(args) => verify::execute(args, config).await,
            Commands::Inspect(args) => inspect::execute(args, config, self.format),
            Commands::LegacySalt(args) => legacy::execute_salt(args, config, self.format),
            Commands::LegacyCrypt(args) => legacy::execute_crypt(args, self.format),
            Commands::PolicyCheck(args) => policy::execute(args, config, self.format).await,
            Commands::Expiry(args) => expiry::execute(args, config, self.format),
        }
    }
}

/// Helper: build the hashing pool from config
pub fn create_hashing_pool(config: &CredentialConfig) -> Result<HashingPool, AppError> {
    let registry = PasswordHasherRegistry::from_config(config)?;
    Ok(HashingPool::new(
        Arc::new(registry),
        config.pool.effective_concurrency(),
    ))
}

/// Helper: take a password from the command line or prompt for it
pub fn read_password(
    given: Option<&str>,
    prompt: &str,
    confirm: bool,
) -> Result<String, AppError> {
    if let Some(p) = given {
        return Ok(p.to_string());
    }

    let mut input = dialoguer::Password::new().with_prompt(prompt);
    if confirm {
        input = input.with_confirmation("Confirm password", "Passwords do not match");
    }
    input
        .interact()
        .map_err(|e| AppError::internal(format!("Input error: {}", e)))
}
