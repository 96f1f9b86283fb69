//! Registry client contract.
//!
//! # Responsibilities
//! - Define the key-value operations the gateway consumes
//! - Model listed entries with their version stamps
//!
//! # Design Decisions
//! - Trait object so production and test implementations are injected at
//!   construction
//! - `list` is a blocking query: with a non-zero wait index it holds the
//!   request open until the registry index moves past it or the wait expires

use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;

/// One listed key with its value and the version stamp the registry assigned
/// on last write.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegistryEntry {
    pub key: String,
    pub value: Vec<u8>,
    pub version: u64,
}

/// Errors surfaced by registry operations.
#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("registry transport error: {0}")]
    Transport(String),

    #[error("registry returned status {0}")]
    Status(u16),

    #[error("failed to serialize service spec: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("failed to decode registry response: {0}")]
    Decode(String),
}

/// Contract of the external key-value registry.
///
/// `list` returns the full listing under `prefix` together with the
/// registry's current change index. When `wait_index` is non-zero the call
/// long-polls: it returns early once the index passes `wait_index`, or after
/// `wait_time` with the unchanged listing. `wait_index == 0` returns
/// immediately (full resync).
#[async_trait]
pub trait Registry: Send + Sync {
    async fn put(&self, key: &str, value: &[u8]) -> Result<(), RegistryError>;

    /// Deleting an absent key is not an error.
    async fn delete(&self, key: &str) -> Result<(), RegistryError>;

    async fn list(
        &self,
        prefix: &str,
        wait_index: u64,
        wait_time: Duration,
    ) -> Result<(Vec<RegistryEntry>, u64), RegistryError>;
}
