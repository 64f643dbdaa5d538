//! Verifier inspection command.

use clap::Args;
use serde::Serialize;
use tabled::Tabled;

use crate::output::{self, OutputFormat};
use credential_core::config::CredentialConfig;
use credential_core::error::AppError;
use credential_hash::cryptl7;
use credential_hash::verifier;
use credential_hash::{HashFamily, PasswordHasherRegistry};

/// Arguments for the inspect command
#[derive(Debug, Args)]
pub struct InspectArgs {
    /// Verifier to inspect
    pub verifier: String,
}

/// Verifier display row
#[derive(Debug, Serialize, Tabled)]
struct InspectRow {
    /// Verifier family
    family: String,
    /// Whether the verifier is well formed
    recognized: bool,
    /// Whether the verifier should be replaced
    needs_rehash: bool,
    /// CryptL7 work factor
    work_factor: String,
    /// CryptL7 mixing rounds
    rounds: String,
    /// Salt length in bytes
    salt_bytes: String,
    /// Hash length in bytes
    hash_bytes: String,
}

/// Execute the inspect command
pub fn execute(
    args: &InspectArgs,
    config: &CredentialConfig,
    format: OutputFormat,
) -> Result<(), AppError> {
    let registry = PasswordHasherRegistry::from_config(config)?;
    let family = registry.resolve(&args.verifier)?;

    let mut row = InspectRow {
        family: family.to_string(),
        recognized: registry.is_verifier_recognized(&args.verifier),
        needs_rehash: registry.needs_rehash(&args.verifier),
        work_factor: "-".to_string(),
        rounds: "-".to_string(),
        salt_bytes: "-".to_string(),
        hash_bytes: "-".to_string(),
    };

    if family == HashFamily::CryptL7 {
        let decoded = verifier::decode(&args.verifier)?;
        row.work_factor = decoded.work_factor.to_string();
        row.rounds = cryptl7::rounds(decoded.work_factor).to_string();
        row.salt_bytes = decoded.salt.len().to_string();
        row.hash_bytes = decoded.hash.len().to_string();
    }

    output::print_item(&row, format);
    Ok(())
}
