//! The user account view needed by password policy checks.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::id::UserId;

/// Password-related state of a user account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserAccount {
    /// Account identifier.
    pub id: UserId,
    /// Login name.
    pub login: String,
    /// Set when the user must choose a new password at next login.
    #[serde(default)]
    pub change_password: bool,
    /// When the current password expires, if it does.
    #[serde(default)]
    pub password_expiry: Option<DateTime<Utc>>,
}

impl UserAccount {
    /// Creates an account with no pending password change and no expiry.
    pub fn new(login: impl Into<String>) -> Self {
        Self {
            id: UserId::new(),
            login: login.into(),
            change_password: false,
            password_expiry: None,
        }
    }
}
