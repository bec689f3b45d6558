//! In-memory `TtlStore`. Lazily expires entries on read, the same check the
//! teacher's `CacheEntry::is_stale` does, generalised from process-lifetime
//! `Instant`s to wall-clock `Instant` deadlines per entry.

use std::collections::HashMap;
use std::sync::Mutex;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Serialize;

use super::ttl_store::TtlStore;

struct Entry {
    payload: String,
    expires_at: Instant,
}

impl Entry {
    fn is_stale(&self) -> bool {
        Instant::now() >= self.expires_at
    }
}

/// Single-process JSON-serialised store, keyed by string. Values round-trip
/// through `serde_json` so the same store type can back overrides, call
/// sessions or orders without duplicating expiry bookkeeping per type.
#[derive(Default)]
pub struct InMemoryTtlStore {
    entries: Mutex<HashMap<String, Entry>>,
}

impl InMemoryTtlStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl<V> TtlStore<V> for InMemoryTtlStore
where
    V: Serialize + DeserializeOwned + Send + Sync + 'static,
{
    async fn get(&self, key: &str) -> anyhow::Result<Option<V>> {
        let mut guard = self.entries.lock().expect("ttl store mutex poisoned");
        if let Some(entry) = guard.get(key) {
            if entry.is_stale() {
                guard.remove(key);
                return Ok(None);
            }
            let value = serde_json::from_str(&entry.payload)?;
            return Ok(Some(value));
        }
        Ok(None)
    }

    async fn put(&self, key: &str, value: V, ttl: Duration) -> anyhow::Result<()> {
        let payload = serde_json::to_string(&value)?;
        let mut guard = self.entries.lock().expect("ttl store mutex poisoned");
        guard.insert(
            key.to_string(),
            Entry {
                payload,
                expires_at: Instant::now() + ttl,
            },
        );
        Ok(())
    }

    async fn delete(&self, key: &str) -> anyhow::Result<()> {
        let mut guard = self.entries.lock().expect("ttl store mutex poisoned");
        guard.remove(key);
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::domain::model::prelude::Overrides;

    #[tokio::test]
    async fn put_then_get_round_trips() {
        let store = InMemoryTtlStore::new();
        store.put("ov:1", Overrides::default(), Duration::from_secs(60)).await.unwrap();
        let got: Option<Overrides> = store.get("ov:1").await.unwrap();
        assert_eq!(got, Some(Overrides::default()));
    }

    #[tokio::test]
    async fn expired_entries_read_as_absent() {
        let store = InMemoryTtlStore::new();
        store.put("ov:2", Overrides::default(), Duration::from_millis(1)).await.unwrap();
        tokio::time::sleep(Duration::from_millis(20)).await;
        let got: Option<Overrides> = store.get("ov:2").await.unwrap();
        assert_eq!(got, None);
    }

    #[tokio::test]
    async fn delete_removes_entry() {
        let store = InMemoryTtlStore::new();
        store.put("ov:3", Overrides::default(), Duration::from_secs(60)).await.unwrap();
        TtlStore::<Overrides>::delete(&store, "ov:3").await.unwrap();
        let got: Option<Overrides> = store.get("ov:3").await.unwrap();
        assert_eq!(got, None);
    }
}
