//! Call Session Store (CSS) wrapper. Keys sessions as `call:<call_id>` with
//! a fixed two-hour TTL — long enough to outlive any single phone call,
//! short enough that an abandoned call doesn't linger indefinitely.

use std::sync::Arc;
use std::time::Duration;

use crate::domain::model::prelude::CallSession;

use super::ttl_store::TtlStore;

const SESSION_TTL: Duration = Duration::from_secs(2 * 60 * 60);

pub struct SessionStore {
    backing: Arc<dyn TtlStore<CallSession>>,
}

impl SessionStore {
    pub fn new(backing: Arc<dyn TtlStore<CallSession>>) -> Self {
        Self { backing }
    }

    fn key(call_id: &str) -> String {
        format!("call:{call_id}")
    }

    pub async fn get(&self, call_id: &str) -> anyhow::Result<Option<CallSession>> {
        self.backing.get(&Self::key(call_id)).await
    }

    pub async fn save(&self, session: &CallSession) -> anyhow::Result<()> {
        self.backing.put(&Self::key(&session.call_id), session.clone(), SESSION_TTL).await
    }

    pub async fn end(&self, call_id: &str) -> anyhow::Result<()> {
        self.backing.delete(&Self::key(call_id)).await
    }
}
