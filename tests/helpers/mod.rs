//! Shared test helpers for integration tests.

#![allow(dead_code)]

use std::sync::Arc;

use chrono::{DateTime, Utc};

use credential_core::config::CredentialConfig;
use credential_core::types::{PasswordChangeRecord, UserAccount};
use credential_hash::{HashingPool, PasswordHasherRegistry};
use credential_policy::{InMemoryDirectory, LivePolicySettings, PasswordPolicyEnforcer};

/// Test context wiring hashing and policy together
pub struct TestContext {
    /// Configuration used to build everything else
    pub config: CredentialConfig,
    /// Hashing pool
    pub pool: HashingPool,
    /// Roles and password history
    pub directory: InMemoryDirectory,
    /// Live policy settings shared with the enforcer
    pub settings: Arc<LivePolicySettings>,
    /// Policy enforcer
    pub enforcer: PasswordPolicyEnforcer,
}

impl TestContext {
    /// Create a context with a cheap work factor
    pub fn new() -> Self {
        let mut config = CredentialConfig::default();
        config.hashing.default_work_factor = 3;
        config.legacy.rounds = 1000;
        config.pool.max_concurrent = 2;
        Self::with_config(config)
    }

    /// Create a context from explicit configuration
    pub fn with_config(config: CredentialConfig) -> Self {
        let registry =
            PasswordHasherRegistry::from_config(&config).expect("Failed to build registry");
        let pool = HashingPool::new(Arc::new(registry), config.pool.effective_concurrency());
        let directory = InMemoryDirectory::new();
        let settings = Arc::new(LivePolicySettings::from_config(&config.policy));
        let enforcer = PasswordPolicyEnforcer::new(
            &config.policy,
            settings.clone(),
            Arc::new(directory.clone()),
            Arc::new(directory.clone()),
        )
        .expect("Failed to build enforcer");

        Self {
            config,
            pool,
            directory,
            settings,
            enforcer,
        }
    }

    /// Hash `password` and record it as changed at `changed_at`
    pub async fn set_password(
        &self,
        user: &UserAccount,
        password: &str,
        changed_at: DateTime<Utc>,
    ) -> String {
        let verifier = self
            .pool
            .hash_password(password.as_bytes().to_vec())
            .await
            .expect("Failed to hash password");
        self.directory
            .record_change(PasswordChangeRecord::new(user.id, verifier.clone(), changed_at))
            .await;
        verifier
    }
}
