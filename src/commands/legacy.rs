//! SHA-512-crypt commands for interoperating with imported hashes.

use clap::Args;
use rand::rngs::OsRng;
use serde::Serialize;
use tabled::Tabled;

use crate::output::{self, OutputFormat};
use credential_core::config::CredentialConfig;
use credential_core::error::AppError;
use credential_hash::sha512_crypt;

/// Arguments for the legacy-salt command
#[derive(Debug, Args)]
pub struct LegacySaltArgs {
    /// Rounds to encode (defaults to the configured legacy rounds)
    #[arg(short, long)]
    pub rounds: Option<u32>,
}

/// Arguments for the legacy-crypt command
#[derive(Debug, Args)]
pub struct LegacyCryptArgs {
    /// Salt setting: bare salt, `rounds=N$salt`, or a full `$6$` verifier
    pub salt: String,

    /// Password (will prompt if not provided)
    #[arg(short, long)]
    pub password: Option<String>,
}

/// Single-value display row
#[derive(Debug, Serialize, Tabled)]
struct ValueRow {
    /// Value name
    name: String,
    /// Value
    value: String,
}

/// Execute the legacy-salt command
pub fn execute_salt(
    args: &LegacySaltArgs,
    config: &CredentialConfig,
    format: OutputFormat,
) -> Result<(), AppError> {
    let rounds = args.rounds.unwrap_or(config.legacy.rounds);
    let salt = sha512_crypt::generate_salt(&mut OsRng, rounds);
    output::print_item(
        &ValueRow {
            name: "salt".to_string(),
            value: salt,
        },
        format,
    );
    Ok(())
}

/// Execute the legacy-crypt command
pub fn execute_crypt(args: &LegacyCryptArgs, format: OutputFormat) -> Result<(), AppError> {
    let password = super::read_password(args.password.as_deref(), "Password", false)?;
    let hashed = sha512_crypt::crypt(password.as_bytes(), &args.salt);
    output::print_item(
        &ValueRow {
            name: "verifier".to_string(),
            value: hashed,
        },
        format,
    );
    Ok(())
}
