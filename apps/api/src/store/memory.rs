use async_trait::async_trait;
use tokio::sync::Mutex;

use super::{Snapshot, SnapshotStore, StoreError};

/// Keeps the serialized snapshot in process. Used for local runs without
/// Redis and in tests; the JSON round trip matches what Redis would hold.
#[derive(Debug, Default)]
pub struct MemoryStore {
    json: Mutex<Option<String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SnapshotStore for MemoryStore {
    async fn load(&self) -> Result<Option<Snapshot>, StoreError> {
        let json = self.json.lock().await;
        match json.as_deref() {
            Some(text) => Ok(Some(serde_json::from_str(text)?)),
            None => Ok(None),
        }
    }

    async fn save(&self, snapshot: &Snapshot) -> Result<(), StoreError> {
        let text = serde_json::to_string(snapshot)?;
        *self.json.lock().await = Some(text);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_empty_store_loads_nothing() {
        let store = MemoryStore::new();
        assert!(store.load().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_save_then_load_returns_same_snapshot() {
        let store = MemoryStore::new();
        let snapshot = Snapshot::default();
        store.save(&snapshot).await.unwrap();
        assert_eq!(store.load().await.unwrap(), Some(snapshot));
    }

    #[tokio::test]
    async fn test_corrupt_json_is_an_error() {
        let store = MemoryStore {
            json: Mutex::new(Some("{not json".to_string())),
        };
        assert!(matches!(store.load().await, Err(StoreError::Serde(_))));
    }
}
