//! Order Sink (OSk). Every finalised order is appended to a durable
//! newline-delimited JSON log (so a store outage never silently drops an
//! order placed over the phone) and also written to the keyed store under
//! `order:<order_id>` with a seven-day TTL, with its id appended to the
//! `orders:index` list so the admin surface can list recent orders without
//! scanning the log file.

use std::io::Write;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use crate::domain::model::prelude::Order;

use super::ttl_store::TtlStore;

const ORDER_TTL: Duration = Duration::from_secs(7 * 24 * 60 * 60);
const INDEX_KEY: &str = "orders:index";

pub struct OrderSink {
    backing: Arc<dyn TtlStore<Order>>,
    index: Arc<dyn TtlStore<Vec<String>>>,
    log_path: PathBuf,
    log_file: Mutex<std::fs::File>,
}

impl OrderSink {
    pub fn new(
        backing: Arc<dyn TtlStore<Order>>,
        index: Arc<dyn TtlStore<Vec<String>>>,
        log_path: PathBuf,
    ) -> anyhow::Result<Self> {
        let log_file = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&log_path)?;
        Ok(Self {
            backing,
            index,
            log_path,
            log_file: Mutex::new(log_file),
        })
    }

    pub async fn record(&self, order: Order) -> anyhow::Result<()> {
        self.append_to_log(&order)?;

        let key = format!("order:{}", order.order_id);
        let order_id = order.order_id.clone();
        self.backing.put(&key, order, ORDER_TTL).await?;

        let mut ids = self.index.get(INDEX_KEY).await?.unwrap_or_default();
        ids.push(order_id);
        self.index.put(INDEX_KEY, ids, ORDER_TTL).await?;
        Ok(())
    }

    pub async fn lookup(&self, order_id: &str) -> anyhow::Result<Option<Order>> {
        self.backing.get(&format!("order:{order_id}")).await
    }

    pub async fn recent_ids(&self) -> anyhow::Result<Vec<String>> {
        Ok(self.index.get(INDEX_KEY).await?.unwrap_or_default())
    }

    fn append_to_log(&self, order: &Order) -> anyhow::Result<()> {
        let line = serde_json::to_string(order)?;
        let mut file = self.log_file.lock().expect("order log mutex poisoned");
        writeln!(file, "{line}")?;
        file.flush()?;
        Ok(())
    }

    pub fn log_path(&self) -> &PathBuf {
        &self.log_path
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::domain::model::prelude::{CustomerDraft, Fulfilment};

    fn sample_order(id: &str) -> Order {
        Order {
            order_id: id.to_string(),
            call_id: "call-1".to_string(),
            items: Vec::new(),
            total: 12.5,
            fulfilment: Fulfilment::Pickup,
            customer: CustomerDraft::default(),
            payment: None,
            eta_ready_at: chrono::Utc::now(),
            created_at: chrono::Utc::now(),
        }
    }

    #[tokio::test]
    async fn record_then_lookup_round_trips_and_indexes() {
        let log_path = std::env::temp_dir().join(format!("belassistent-test-orders-{}.ndjson", std::process::id()));
        let sink = OrderSink::new(
            Arc::new(crate::runtime::memory_store::InMemoryTtlStore::new()),
            Arc::new(crate::runtime::memory_store::InMemoryTtlStore::new()),
            log_path.clone(),
        )
        .unwrap();

        sink.record(sample_order("ord_1")).await.unwrap();
        sink.record(sample_order("ord_2")).await.unwrap();

        let found = sink.lookup("ord_1").await.unwrap().unwrap();
        assert_eq!(found.total, 12.5);
        assert_eq!(sink.recent_ids().await.unwrap(), vec!["ord_1", "ord_2"]);

        let logged = std::fs::read_to_string(&log_path).unwrap();
        assert_eq!(logged.lines().count(), 2);

        std::fs::remove_file(&log_path).ok();
    }
}
