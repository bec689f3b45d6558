use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::session::{CustomerDraft, Fulfilment, OrderItem, Payment};

/// A finalised order (OSk). Written once; the owning `CallSession` is no
/// longer consulted for that call afterwards (invariant 5).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Order {
    pub order_id: String,
    pub call_id: String,
    pub items: Vec<OrderItem>,
    pub total: f64,
    pub fulfilment: Fulfilment,
    pub customer: CustomerDraft,
    pub payment: Option<Payment>,
    pub eta_ready_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

impl Order {
    pub fn new_id() -> String {
        format!("ord_{}", uuid::Uuid::new_v4().simple())
    }
}
