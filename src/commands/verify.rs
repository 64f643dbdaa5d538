//! Password verification command.

use clap::Args;

use crate::output;
use credential_core::config::CredentialConfig;
use credential_core::error::AppError;

/// Arguments for the verify command
#[derive(Debug, Args)]
pub struct VerifyArgs {
    /// Stored verifier ($L7H$ or $6$)
    pub verifier: String,

    /// Password (will prompt if not provided)
    #[arg(short, long)]
    pub password: Option<String>,
}

/// Execute the verify command
///
/// A mismatch is reported as an error so the exit status reflects it.
pub async fn execute(args: &VerifyArgs, config: &CredentialConfig) -> Result<(), AppError> {
    let password = super::read_password(args.password.as_deref(), "Password", false)?;
    let pool = super::create_hashing_pool(config)?;

    pool.verify_password(password.into_bytes(), args.verifier.clone())
        .await?;

    if pool.registry().needs_rehash(&args.verifier) {
        output::print_warning("Verifier should be rehashed at the current work factor");
    }
    output::print_success("Password matches");
    Ok(())
}
