//! Bounded blocking pool for hash and verify jobs.
//!
//! Hashing at high work factors takes seconds of CPU. Jobs run on Tokio's
//! blocking threads, and a semaphore caps how many run at once so login
//! bursts cannot starve other blocking work. A job cannot be cancelled once
//! it has started; dropping the returned future only discards the result.

use std::sync::Arc;

use tokio::sync::Semaphore;
use tokio::task;
use tracing::debug;

use credential_core::error::AppError;

use crate::registry::PasswordHasherRegistry;

/// Runs registry operations off the async executor threads.
#[derive(Debug, Clone)]
pub struct HashingPool {
    /// Shared registry.
    registry: Arc<PasswordHasherRegistry>,
    /// Limits concurrent jobs.
    permits: Arc<Semaphore>,
    /// Configured concurrency.
    max_concurrent: usize,
}

impl HashingPool {
    /// Creates a pool running at most `max_concurrent` jobs at once.
    pub fn new(registry: Arc<PasswordHasherRegistry>, max_concurrent: usize) -> Self {
        let max_concurrent = max_concurrent.max(1);
        Self {
            registry,
            permits: Arc::new(Semaphore::new(max_concurrent)),
            max_concurrent,
        }
    }

    /// The registry jobs run against.
    pub fn registry(&self) -> &PasswordHasherRegistry {
        &self.registry
    }

    /// Maximum concurrent jobs.
    pub fn max_concurrent(&self) -> usize {
        self.max_concurrent
    }

    /// Permits currently free.
    pub fn available_permits(&self) -> usize {
        self.permits.available_permits()
    }

    /// Hashes `password` into a new verifier on the pool.
    pub async fn hash_password(&self, password: Vec<u8>) -> Result<String, AppError> {
        self.run(move |registry| registry.hash_password(&password))
            .await
    }

    /// Hashes `password` into a SHA-512-crypt verifier on the pool.
    pub async fn hash_legacy_password(&self, password: Vec<u8>) -> Result<String, AppError> {
        self.run(move |registry| Ok(registry.hash_legacy_password(&password)))
            .await
    }

    /// Verifies `password` against `verifier` on the pool.
    pub async fn verify_password(
        &self,
        password: Vec<u8>,
        verifier: String,
    ) -> Result<(), AppError> {
        self.run(move |registry| registry.verify_password(&password, &verifier))
            .await
    }

    async fn run<T, F>(&self, job: F) -> Result<T, AppError>
    where
        T: Send + 'static,
        F: FnOnce(&PasswordHasherRegistry) -> Result<T, AppError> + Send + 'static,
    {
        let permit = self
            .permits
            .clone()
            .acquire_owned()
            .await
            .map_err(|e| AppError::internal(format!("Hashing pool closed: {e}")))?;

        let registry = Arc::clone(&self.registry);
        debug!(
            available = self.permits.available_permits(),
            "Dispatching hashing job"
        );

        task::spawn_blocking(move || {
            let _permit = permit;
            job(&registry)
        })
        .await
        .map_err(|e| AppError::internal(format!("Hashing job failed: {e}")))?
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use credential_core::config::CredentialConfig;

    fn pool(max_concurrent: usize) -> HashingPool {
        let mut config = CredentialConfig::default();
        config.hashing.default_work_factor = 3;
        let registry = PasswordHasherRegistry::from_config(&config).unwrap();
        HashingPool::new(Arc::new(registry), max_concurrent)
    }

    #[tokio::test]
    async fn test_hash_and_verify_on_pool() {
        let pool = pool(2);
        let verifier = pool.hash_password(b"Secret#1".to_vec()).await.unwrap();
        assert!(pool.verify_password(b"Secret#1".to_vec(), verifier.clone()).await.is_ok());

        let err = pool
            .verify_password(b"Secret#2".to_vec(), verifier)
            .await
            .unwrap_err();
        assert!(err.is_incorrect_password());
        assert_eq!(pool.available_permits(), 2);
    }

    #[tokio::test]
    async fn test_legacy_hash_runs_on_pool() {
        let pool = pool(1);
        let verifier = pool.hash_legacy_password(b"Secret#1".to_vec()).await.unwrap();
        assert!(verifier.starts_with("$6$"));
        assert!(pool.verify_password(b"Secret#1".to_vec(), verifier).await.is_ok());
        assert_eq!(pool.available_permits(), 1);
    }

    #[tokio::test]
    async fn test_concurrent_jobs_share_bounded_pool() {
        let pool = pool(2);
        let mut handles = Vec::new();
        for i in 0..6 {
            let pool = pool.clone();
            handles.push(tokio::spawn(async move {
                let password = format!("Secret#{i}").into_bytes();
                let verifier = pool.hash_password(password.clone()).await?;
                pool.verify_password(password, verifier).await
            }));
        }
        for handle in handles {
            assert!(handle.await.unwrap().is_ok());
        }
        assert_eq!(pool.available_permits(), 2);
    }

    #[test]
    fn test_zero_concurrency_is_raised_to_one() {
        assert_eq!(pool(0).max_concurrent(), 1);
    }
}
