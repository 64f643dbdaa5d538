//! In-memory role and password-history directory for single-node use and
//! tests.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use credential_core::result::AppResult;
use credential_core::traits::{PasswordHistoryStore, RoleLookup};
use credential_core::types::{PasswordChangeRecord, Role, UserId};

/// Internal state for the memory-based directory.
#[derive(Debug, Default)]
struct InnerState {
    /// Roles per user.
    roles: HashMap<UserId, Vec<Role>>,
    /// Password changes per user, most recent first.
    history: HashMap<UserId, Vec<PasswordChangeRecord>>,
}

/// Role assignments and password history held in memory.
#[derive(Debug, Clone, Default)]
pub struct InMemoryDirectory {
    /// Protected inner state.
    state: Arc<RwLock<InnerState>>,
}

impl InMemoryDirectory {
    /// Creates an empty directory.
    pub fn new() -> Self {
        Self::default()
    }

    /// Assigns an additional role to a user.
    pub async fn assign_role(&self, user_id: UserId, role: Role) {
        let mut state = self.state.write().await;
        state.roles.entry(user_id).or_default().push(role);
    }

    /// Records a password change, keeping history ordered most recent first.
    pub async fn record_change(&self, record: PasswordChangeRecord) {
        let mut state = self.state.write().await;
        let entries = state.history.entry(record.user_id).or_default();
        entries.push(record);
        entries.sort_by(|a, b| b.last_changed.cmp(&a.last_changed));
    }

    /// Records every change in `records`.
    pub async fn extend_history(&self, records: impl IntoIterator<Item = PasswordChangeRecord>) {
        for record in records {
            self.record_change(record).await;
        }
    }
}

#[async_trait]
impl RoleLookup for InMemoryDirectory {
    async fn roles(&self, user_id: &UserId) -> AppResult<Vec<Role>> {
        let state = self.state.read().await;
        Ok(state.roles.get(user_id).cloned().unwrap_or_default())
    }
}

#[async_trait]
impl PasswordHistoryStore for InMemoryDirectory {
    async fn history(&self, user_id: &UserId) -> AppResult<Vec<PasswordChangeRecord>> {
        let state = self.state.read().await;
        Ok(state.history.get(user_id).cloned().unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};
    use credential_core::types::RoleTag;

    #[tokio::test]
    async fn test_history_is_most_recent_first() {
        let directory = InMemoryDirectory::new();
        let user = UserId::new();
        let now = Utc::now();
        directory
            .extend_history([
                PasswordChangeRecord::new(user, "old", now - Duration::days(30)),
                PasswordChangeRecord::new(user, "new", now),
                PasswordChangeRecord::new(user, "mid", now - Duration::days(10)),
            ])
            .await;

        let hashes: Vec<String> = directory
            .history(&user)
            .await
            .unwrap()
            .into_iter()
            .map(|r| r.hashed_password)
            .collect();
        assert_eq!(hashes, vec!["new", "mid", "old"]);
    }

    #[tokio::test]
    async fn test_unknown_user_has_nothing() {
        let directory = InMemoryDirectory::new();
        let user = UserId::new();
        assert!(directory.roles(&user).await.unwrap().is_empty());
        assert!(directory.history(&user).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_roles_accumulate() {
        let directory = InMemoryDirectory::new();
        let user = UserId::new();
        directory.assign_role(user, Role::new("Monitor", vec![RoleTag::Monitor])).await;
        directory.assign_role(user, Role::new("Administrator", vec![RoleTag::Admin])).await;
        let roles = directory.roles(&user).await.unwrap();
        assert_eq!(roles.len(), 2);
        assert!(roles[1].has_tag(RoleTag::Admin));
    }
}
