//! Role-assignment lookup.

use async_trait::async_trait;

use crate::result::AppResult;
use crate::types::{Role, UserId};

/// Resolves the roles currently assigned to a user.
///
/// Implementations may fail (directory unreachable, timeouts); callers
/// decide how to degrade.
#[async_trait]
pub trait RoleLookup: Send + Sync + 'static {
    /// Returns every role assigned to `user_id`.
    async fn roles(&self, user_id: &UserId) -> AppResult<Vec<Role>>;
}
