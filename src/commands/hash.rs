//! Password hashing command.

use clap::Args;
use serde::Serialize;
use tabled::Tabled;

use crate::output::{self, OutputFormat};
use credential_core::config::CredentialConfig;
use credential_core::error::AppError;
use credential_hash::HashFamily;

/// Arguments for the hash command
#[derive(Debug, Args)]
pub struct HashArgs {
    /// Password (will prompt if not provided)
    #[arg(short, long)]
    pub password: Option<String>,

    /// Produce a SHA-512-crypt verifier instead of CryptL7
    #[arg(long)]
    pub legacy: bool,
}

/// Hash display row
#[derive(Debug, Serialize, Tabled)]
struct HashRow {
    /// Verifier family
    family: String,
    /// Verifier string
    verifier: String,
}

/// Execute the hash command
pub async fn execute(
    args: &HashArgs,
    config: &CredentialConfig,
    format: OutputFormat,
) -> Result<(), AppError> {
    let password = super::read_password(args.password.as_deref(), "Password", true)?;
    let pool = super::create_hashing_pool(config)?;

    let (family, verifier) = if args.legacy {
        (
            HashFamily::Sha512Crypt,
            pool.hash_legacy_password(password.into_bytes()).await?,
        )
    } else {
        (
            HashFamily::CryptL7,
            pool.hash_password(password.into_bytes()).await?,
        )
    };

    tracing::info!(family = %family, "Password hashed");

    output::print_item(
        &HashRow {
            family: family.to_string(),
            verifier,
        },
        format,
    );
    Ok(())
}
