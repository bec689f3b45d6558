//! Redis-backed `TtlStore`, for deployments where overrides, call sessions
//! and orders must survive a process restart or be shared across replicas.
//! Uses `redis`'s connection manager so a dropped connection is transparently
//! re-established rather than failing every call until the process restarts.

use std::time::Duration;

use async_trait::async_trait;
use redis::aio::ConnectionManager;
use redis::AsyncCommands;
use serde::de::DeserializeOwned;
use serde::Serialize;

use super::ttl_store::TtlStore;

#[derive(Clone)]
pub struct RedisTtlStore {
    conn: ConnectionManager,
}

impl RedisTtlStore {
    pub async fn connect(redis_url: &str) -> anyhow::Result<Self> {
        let client = redis::Client::open(redis_url)?;
        let conn = client.get_connection_manager().await?;
        Ok(Self { conn })
    }
}

#[async_trait]
impl<V> TtlStore<V> for RedisTtlStore
where
    V: Serialize + DeserializeOwned + Send + Sync + 'static,
{
    async fn get(&self, key: &str) -> anyhow::Result<Option<V>> {
        let mut conn = self.conn.clone();
        let raw: Option<String> = conn.get(key).await?;
        match raw {
            Some(payload) => Ok(Some(serde_json::from_str(&payload)?)),
            None => Ok(None),
        }
    }

    async fn put(&self, key: &str, value: V, ttl: Duration) -> anyhow::Result<()> {
        let payload = serde_json::to_string(&value)?;
        let mut conn = self.conn.clone();
        let seconds = ttl.as_secs().max(1) as usize;
        let _: () = conn.set_ex(key, payload, seconds).await?;
        Ok(())
    }

    async fn delete(&self, key: &str) -> anyhow::Result<()> {
        let mut conn = self.conn.clone();
        let _: () = conn.del(key).await?;
        Ok(())
    }
}
