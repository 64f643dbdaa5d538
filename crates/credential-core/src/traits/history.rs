//! Password change history lookup.

use async_trait::async_trait;

use crate::result::AppResult;
use crate::types::{PasswordChangeRecord, UserId};

/// Read access to a user's previous passwords.
#[async_trait]
pub trait PasswordHistoryStore: Send + Sync + 'static {
    /// Returns the user's password change records, most recent first.
    async fn history(&self, user_id: &UserId) -> AppResult<Vec<PasswordChangeRecord>>;
}
