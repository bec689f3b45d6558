pub mod config;
pub mod domain;
pub mod error;
pub mod prompts;
pub mod runtime;
pub mod web;

use std::sync::{Arc, Mutex};

use config::Settings;
use domain::clock::SystemClock;
use domain::model::prelude::{CustomerDirectory, DeliveryConfig, MenuIndex};
use prompts::Prompts;
use runtime::memory_store::InMemoryTtlStore;
use runtime::redis_store::RedisTtlStore;
use runtime::ttl_store::TtlStore;
use runtime::{OrderSink, OverrideStore, SessionStore};
use web::state::{AppState, Inner};

/// Assembles the shared application state from `settings`: loads the menu,
/// delivery config, prompts and customer directory, picks an in-memory or
/// Redis-backed store depending on `settings.store_url`, and wires it all
/// into one `AppState` for `web::router`.
pub async fn build_app_state(settings: Settings) -> anyhow::Result<AppState> {
    let menu = MenuIndex::load_from_path(&settings.menu_path);
    let delivery = DeliveryConfig::load_from_path(&settings.delivery_config_path);
    let prompts = Prompts::load_from_path(&settings.prompts_path);
    let customers = CustomerDirectory::new(settings.customers_csv_path.clone());

    tracing::info!(items = menu.items().len(), "menu loaded");

    let (overrides_backing, sessions_backing, orders_backing, orders_index_backing): (
        Arc<dyn TtlStore<domain::model::prelude::Overrides>>,
        Arc<dyn TtlStore<domain::model::prelude::CallSession>>,
        Arc<dyn TtlStore<domain::model::prelude::Order>>,
        Arc<dyn TtlStore<Vec<String>>>,
    ) = match &settings.store_url {
        Some(url) if url.starts_with("redis://") => {
            tracing::info!("connecting to redis-backed store");
            let overrides_store = RedisTtlStore::connect(url).await?;
            let sessions_store = RedisTtlStore::connect(url).await?;
            let orders_store = RedisTtlStore::connect(url).await?;
            let orders_index_store = RedisTtlStore::connect(url).await?;
            (
                Arc::new(overrides_store),
                Arc::new(sessions_store),
                Arc::new(orders_store),
                Arc::new(orders_index_store),
            )
        }
        _ => {
            tracing::info!("using in-memory store (set STORE_URL=redis://... for a durable deployment)");
            (
                Arc::new(InMemoryTtlStore::new()),
                Arc::new(InMemoryTtlStore::new()),
                Arc::new(InMemoryTtlStore::new()),
                Arc::new(InMemoryTtlStore::new()),
            )
        }
    };

    let overrides = OverrideStore::new(overrides_backing);
    let sessions = SessionStore::new(sessions_backing);
    let orders = OrderSink::new(orders_backing, orders_index_backing, settings.order_log_path.clone())?;

    let status_log = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(settings.order_log_path.with_file_name("call_status.ndjson"))?;

    let clock = Arc::new(SystemClock::new(settings.tz));

    Ok(AppState(Arc::new(Inner {
        settings,
        clock,
        menu,
        delivery,
        customers,
        prompts,
        overrides,
        sessions,
        orders,
        status_log: Mutex::new(status_log),
    })))
}
