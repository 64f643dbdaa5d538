//! Password expiry command.

use chrono::{DateTime, Utc};
use clap::Args;
use serde::Serialize;
use tabled::Tabled;

use crate::output::{self, OutputFormat};
use credential_core::config::{CredentialConfig, PASSWORD_EXPIRY_PROPERTY};
use credential_core::error::AppError;
use credential_core::events::ConfigEvent;
use credential_policy::LivePolicySettings;

/// Arguments for the expiry command
#[derive(Debug, Args)]
pub struct ExpiryArgs {
    /// Time the password was set, RFC 3339 (defaults to now)
    #[arg(long)]
    pub from: Option<DateTime<Utc>>,

    /// Override the expiry period in days (clamped to 1..=90)
    #[arg(long)]
    pub days: Option<String>,
}

/// Expiry display row
#[derive(Debug, Serialize, Tabled)]
struct ExpiryRow {
    /// Time the password was set
    set_at: String,
    /// Expiry period in effect
    expiry_days: u32,
    /// Expiry time
    expires_at: String,
    /// Expiry time in epoch milliseconds
    expires_at_millis: i64,
}

/// Execute the expiry command
pub fn execute(
    args: &ExpiryArgs,
    config: &CredentialConfig,
    format: OutputFormat,
) -> Result<(), AppError> {
    let settings = LivePolicySettings::from_config(&config.policy);
    if let Some(days) = &args.days {
        settings.apply_event(&ConfigEvent::property_changed(PASSWORD_EXPIRY_PROPERTY, days));
    }

    let set_at = args.from.unwrap_or_else(Utc::now);
    let days = settings.expiry_days();
    let expires_at = credential_policy::calc_expiry_date(set_at, days);

    output::print_item(
        &ExpiryRow {
            set_at: set_at.to_rfc3339(),
            expiry_days: days,
            expires_at: expires_at.to_rfc3339(),
            expires_at_millis: credential_policy::calc_expiry_millis(
                set_at.timestamp_millis(),
                days,
            ),
        },
        format,
    );
    Ok(())
}
