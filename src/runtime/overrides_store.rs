//! Override Store (OS) wrapper. One key (`overrides:current`), TTL taken
//! from the record itself so an operator who forgets to clear a `kitchen
//! closed` toggle gets it expired back to `Overrides::default()` instead of
//! leaving the kitchen closed forever (spec.md §4.2).

use std::sync::Arc;
use std::time::Duration;

use crate::domain::model::prelude::Overrides;

use super::ttl_store::TtlStore;

const KEY: &str = "overrides:current";

pub struct OverrideStore {
    backing: Arc<dyn TtlStore<Overrides>>,
}

impl OverrideStore {
    pub fn new(backing: Arc<dyn TtlStore<Overrides>>) -> Self {
        Self { backing }
    }

    pub async fn current(&self) -> anyhow::Result<Overrides> {
        Ok(self.backing.get(KEY).await?.unwrap_or_default())
    }

    pub async fn set(&self, overrides: Overrides) -> anyhow::Result<()> {
        let ttl = Duration::from_secs(overrides.ttl_minutes as u64 * 60);
        self.backing.put(KEY, overrides, ttl).await
    }

    pub async fn clear(&self) -> anyhow::Result<()> {
        self.backing.delete(KEY).await
    }
}
