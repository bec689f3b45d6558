use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderItem {
    pub code: String,
    pub display_name: String,
    pub price: f64,
    pub qty: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Fulfilment {
    Pickup,
    Delivery,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Payment {
    Cash,
    Pin,
    Ideal,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CustomerDraft {
    #[serde(default)]
    pub tel: String,
    #[serde(default)]
    pub postcode: String,
    #[serde(default)]
    pub street: String,
    #[serde(default)]
    pub house_number: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DialogueState {
    Greet,
    AskItems,
    ConfirmMore,
    ConfirmSummary,
    Fulfilment,
    Payment,
    Phone,
    CrmConfirm,
    Address,
    End,
}

/// Per-call record owned by the Call Session Store (CSS).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CallSession {
    pub call_id: String,
    pub state: DialogueState,
    pub items: Vec<OrderItem>,
    pub total: f64,
    pub fulfilment: Option<Fulfilment>,
    pub customer: CustomerDraft,
    pub payment: Option<Payment>,
    pub created_at: DateTime<Utc>,
    pub last_touched: DateTime<Utc>,
}

impl CallSession {
    pub fn fresh(call_id: impl Into<String>, now: DateTime<Utc>) -> Self {
        Self {
            call_id: call_id.into(),
            state: DialogueState::Greet,
            items: Vec::new(),
            total: 0.0,
            fulfilment: None,
            customer: CustomerDraft::default(),
            payment: None,
            created_at: now,
            last_touched: now,
        }
    }

    /// Invariant (4): items with qty <= 0 are never stored; quantities are
    /// clamped to >= 1 (edge case (ii) in spec.md §4.4).
    pub fn add_items(&mut self, new_items: Vec<OrderItem>) {
        for mut item in new_items {
            if item.qty == 0 {
                item.qty = 1;
            }
            self.items.push(item);
        }
        self.recompute_total();
    }

    pub fn reset_basket(&mut self) {
        self.items.clear();
        self.total = 0.0;
    }

    /// Invariant (3): total = sum(qty * price) over items.
    pub fn recompute_total(&mut self) {
        self.total = self
            .items
            .iter()
            .map(|i| i.qty as f64 * i.price)
            .sum::<f64>();
        self.total = (self.total * 100.0).round() / 100.0;
    }

    pub fn items_text(&self) -> String {
        if self.items.is_empty() {
            return "geen items".to_string();
        }
        self.items
            .iter()
            .map(|i| format!("{}× {}", i.qty, i.display_name))
            .collect::<Vec<_>>()
            .join(", ")
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn item(qty: u32, price: f64) -> OrderItem {
        OrderItem {
            code: "x".into(),
            display_name: "X".into(),
            price,
            qty,
        }
    }

    #[test]
    fn total_matches_sum_of_qty_times_price() {
        let mut s = CallSession::fresh("c1", Utc::now());
        s.add_items(vec![item(2, 11.5), item(1, 3.0)]);
        assert!((s.total - 26.0).abs() < 0.005);
    }

    #[test]
    fn zero_qty_items_are_clamped_not_dropped() {
        let mut s = CallSession::fresh("c1", Utc::now());
        s.add_items(vec![item(0, 5.0)]);
        assert_eq!(s.items[0].qty, 1);
    }
}
