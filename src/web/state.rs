//! Shared application state, assembled once in `main` and handed to every
//! handler via Axum's `State` extractor — the same "build once at startup,
//! inject as a dependency" shape the teacher uses for its
//! `HtmlMenuFetcherWithCache`.

use std::io::Write;
use std::sync::{Arc, Mutex};

use chrono_tz::Tz;

use crate::config::Settings;
use crate::domain::model::prelude::{CustomerDirectory, DeliveryConfig, MenuIndex};
use crate::domain::Clock;
use crate::prompts::Prompts;
use crate::runtime::{OrderSink, OverrideStore, SessionStore};

#[derive(Clone)]
pub struct AppState(pub Arc<Inner>);

pub struct Inner {
    pub settings: Settings,
    pub clock: Arc<dyn Clock>,
    pub menu: MenuIndex,
    pub delivery: DeliveryConfig,
    pub customers: CustomerDirectory,
    pub prompts: Prompts,
    pub overrides: OverrideStore,
    pub sessions: SessionStore,
    pub orders: OrderSink,
    pub status_log: Mutex<std::fs::File>,
}

impl AppState {
    pub fn tz(&self) -> Tz {
        self.0.settings.tz
    }

    /// Appends one provider call-status callback to a durable best-effort
    /// log; failures are logged, never surfaced to the caller (spec.md §6:
    /// "append ... to a durable log (best-effort)").
    pub fn log_status_callback(&self, raw: &str) {
        let mut guard = match self.0.status_log.lock() {
            Ok(g) => g,
            Err(poisoned) => poisoned.into_inner(),
        };
        if let Err(err) = writeln!(guard, "{raw}") {
            tracing::warn!(%err, "failed to append status callback to log");
        }
    }
}

impl std::ops::Deref for AppState {
    type Target = Inner;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}
