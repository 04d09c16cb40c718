//! Persistence of the interview core as one opaque snapshot.
//!
//! The service writes the whole snapshot after every mutation and reads it
//! once at startup. Backends only move JSON text around.

pub mod memory;
pub mod redis_store;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::interview::session::InterviewSession;
use crate::models::result::CandidateResult;

pub use self::memory::MemoryStore;
pub use self::redis_store::RedisStore;

/// Everything that survives a restart: finished results plus the session in
/// progress.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Snapshot {
    pub results: Vec<CandidateResult>,
    pub session: InterviewSession,
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Redis error: {0}")]
    Redis(#[from] redis::RedisError),

    #[error("Snapshot is not valid JSON: {0}")]
    Serde(#[from] serde_json::Error),
}

#[async_trait]
pub trait SnapshotStore: Send + Sync {
    /// `Ok(None)` when nothing was ever saved.
    async fn load(&self) -> Result<Option<Snapshot>, StoreError>;
    async fn save(&self, snapshot: &Snapshot) -> Result<(), StoreError>;
}
