//! Generic TTL-keyed store abstraction. Generalises the teacher's
//! `CacheEntry`/`is_stale` freshness check (`domain/fetch/cache.rs`) from a
//! single in-process LRU of fetched menus into a trait with two
//! implementations: an in-memory map for local development and single-node
//! deployments, and a Redis-backed one for anything that must survive a
//! process restart or be shared across instances (OS, CSS, OSk).

use std::time::Duration;

use async_trait::async_trait;

#[async_trait]
pub trait TtlStore<V>: Send + Sync
where
    V: Send + Sync,
{
    async fn get(&self, key: &str) -> anyhow::Result<Option<V>>;
    async fn put(&self, key: &str, value: V, ttl: Duration) -> anyhow::Result<()>;
    async fn delete(&self, key: &str) -> anyhow::Result<()>;
}
