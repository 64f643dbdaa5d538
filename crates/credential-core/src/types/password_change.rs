//! Password change history entries.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::id::UserId;

/// A previous password of a user, as kept by the external history store.
///
/// Records are produced by the store when a password changes; this
/// subsystem only reads them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PasswordChangeRecord {
    /// Owner of the password.
    pub user_id: UserId,
    /// Verifier string of the replaced password.
    pub hashed_password: String,
    /// When the password was changed.
    pub last_changed: DateTime<Utc>,
}

impl PasswordChangeRecord {
    /// Creates a history record.
    pub fn new(
        user_id: UserId,
        hashed_password: impl Into<String>,
        last_changed: DateTime<Utc>,
    ) -> Self {
        Self {
            user_id,
            hashed_password: hashed_password.into(),
            last_changed,
        }
    }
}
