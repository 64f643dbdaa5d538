//! Hashing worker pool configuration.

use serde::{Deserialize, Serialize};

/// Bounds for the blocking pool that runs hash and verify jobs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PoolConfig {
    /// Maximum number of hashing jobs running at once (0 = CPU count).
    #[serde(default)]
    pub max_concurrent: usize,
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self { max_concurrent: 0 }
    }
}

impl PoolConfig {
    /// Resolves `max_concurrent`, substituting the CPU count for zero.
    pub fn effective_concurrency(&self) -> usize {
        if self.max_concurrent > 0 {
            return self.max_concurrent;
        }
        std::thread::available_parallelism()
            .map(|n| n.get())
            .unwrap_or(1)
    }
}
