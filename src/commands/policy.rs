//! STIG policy check command.
//!
//! Reads the user, their roles, and their password history from a JSON
//! fixture and runs the full compliance check against a candidate password.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use clap::Args;
use serde::{Deserialize, Serialize};
use tabled::Tabled;

use crate::output::{self, OutputFormat};
use credential_core::config::CredentialConfig;
use credential_core::error::AppError;
use credential_core::types::{PasswordChangeRecord, Role, UserAccount};
use credential_policy::{InMemoryDirectory, LivePolicySettings, PasswordPolicyEnforcer};

/// Arguments for the policy-check command
#[derive(Debug, Args)]
pub struct PolicyCheckArgs {
    /// JSON fixture with `user`, `roles`, and `history`
    #[arg(long)]
    pub fixture: String,

    /// Candidate password (will prompt if not provided)
    #[arg(long)]
    pub new_password: Option<String>,

    /// Current password (will prompt if not provided)
    #[arg(long)]
    pub current_password: Option<String>,

    /// Verifier of the candidate to compare with history. When omitted a
    /// fresh salted verifier is used, which never equals a history entry,
    /// so the reuse check cannot fail
    #[arg(long)]
    pub hashed_new: Option<String>,

    /// Evaluate as of this RFC 3339 time instead of now
    #[arg(long)]
    pub at: Option<DateTime<Utc>>,
}

/// Fixture describing the user whose password changes
#[derive(Debug, Deserialize)]
pub struct PolicyFixture {
    /// The account
    pub user: UserAccount,
    /// Roles assigned to the account
    #[serde(default)]
    pub roles: Vec<Role>,
    /// Previous password changes
    #[serde(default)]
    pub history: Vec<PasswordChangeRecord>,
}

impl PolicyFixture {
    /// Parses a fixture from JSON text.
    pub fn from_json(text: &str) -> Result<Self, AppError> {
        Ok(serde_json::from_str(text)?)
    }

    /// Loads the fixture's roles and history into a fresh directory.
    pub async fn into_directory(self) -> (UserAccount, InMemoryDirectory) {
        let directory = InMemoryDirectory::new();
        for role in self.roles {
            directory.assign_role(self.user.id, role).await;
        }
        directory.extend_history(self.history).await;
        (self.user, directory)
    }
}

/// Policy result display row
#[derive(Debug, Serialize, Tabled)]
struct PolicyRow {
    /// Login checked
    login: String,
    /// Whether the password may be adopted
    compliant: bool,
    /// Violation message, if any
    reason: String,
    /// Expiry of the new password if adopted
    expires_at: String,
}

/// Warns when a freshly salted verifier makes the reuse check a no-op.
fn reuse_check_note(hashed_new: Option<&str>, history_len: usize) -> Option<&'static str> {
    (hashed_new.is_none() && history_len > 0).then_some(
        "No --hashed-new given: the candidate is hashed with a new salt and cannot match history, so reuse is not checked",
    )
}

/// Execute the policy-check command
pub async fn execute(
    args: &PolicyCheckArgs,
    config: &CredentialConfig,
    format: OutputFormat,
) -> Result<(), AppError> {
    let text = tokio::fs::read_to_string(&args.fixture).await?;
    let fixture = PolicyFixture::from_json(&text)?;
    if let Some(note) = reuse_check_note(args.hashed_new.as_deref(), fixture.history.len()) {
        output::print_warning(note);
    }
    let (user, directory) = fixture.into_directory().await;

    let new_password = super::read_password(args.new_password.as_deref(), "New password", true)?;
    let current_password =
        super::read_password(args.current_password.as_deref(), "Current password", false)?;

    let hashed_new = match &args.hashed_new {
        Some(h) => h.clone(),
        None => {
            super::create_hashing_pool(config)?
                .hash_password(new_password.clone().into_bytes())
                .await?
        }
    };

    let directory = Arc::new(directory);
    let enforcer = PasswordPolicyEnforcer::new(
        &config.policy,
        Arc::new(LivePolicySettings::from_config(&config.policy)),
        directory.clone(),
        directory,
    )?;

    let now = args.at.unwrap_or_else(Utc::now);
    let result = enforcer
        .is_stig_compliant_at(&user, &new_password, &hashed_new, &current_password, now)
        .await;

    let (compliant, reason) = match result {
        Ok(compliant) => (compliant, String::new()),
        Err(e) if e.is_policy_violation() => (false, e.message),
        Err(e) => return Err(e),
    };

    output::print_item(
        &PolicyRow {
            login: user.login.clone(),
            compliant,
            reason,
            expires_at: enforcer.stig_expiry_password_date(now).to_rfc3339(),
        },
        format,
    );
    Ok(())
}
