use async_trait::async_trait;
use redis::{aio::MultiplexedConnection, AsyncCommands};
use tracing::{debug, info};

use super::{Snapshot, SnapshotStore, StoreError};

/// Snapshot stored as a JSON string under a single key.
///
/// ```text
/// {key} -> "{\"results\": [...], \"session\": {...}}"
/// ```
///
/// No TTL: results are kept until someone deletes the key.
#[derive(Clone)]
pub struct RedisStore {
    conn: MultiplexedConnection,
    key: String,
}

impl RedisStore {
    pub async fn connect(url: &str, key: impl Into<String>) -> Result<Self, StoreError> {
        let client = redis::Client::open(url)?;
        let conn = client.get_multiplexed_async_connection().await?;
        let key = key.into();
        info!(%key, "Redis snapshot store connected");
        Ok(Self { conn, key })
    }
}

#[async_trait]
impl SnapshotStore for RedisStore {
    async fn load(&self) -> Result<Option<Snapshot>, StoreError> {
        let mut conn = self.conn.clone();
        let json: Option<String> = conn.get(&self.key).await?;
        match json {
            Some(text) => Ok(Some(serde_json::from_str(&text)?)),
            None => Ok(None),
        }
    }

    async fn save(&self, snapshot: &Snapshot) -> Result<(), StoreError> {
        let text = serde_json::to_string(snapshot)?;
        let mut conn = self.conn.clone();
        conn.set::<_, _, ()>(&self.key, text).await?;
        debug!(key = %self.key, "snapshot written");
        Ok(())
    }
}
