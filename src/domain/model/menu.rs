use std::collections::HashSet;
use std::path::Path;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::domain::normalize::{normalize, significant_tokens};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MenuItem {
    pub code: String,
    pub display_name: String,
    pub price: f64,
    pub normalised_name: String,
    pub token_set: HashSet<String>,
}

/// Coarse category used only for the pickup combo-SLA rule (open question
/// (a) in SPEC_FULL.md §9): a basket spanning >= 2 of these counts as combo.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MenuCategory {
    Pizza,
    Pasta,
    Schotel,
    Other,
}

impl MenuItem {
    pub fn category(&self) -> MenuCategory {
        if self.normalised_name.contains("pizza") {
            MenuCategory::Pizza
        } else if self.normalised_name.contains("pasta") {
            MenuCategory::Pasta
        } else if self.normalised_name.contains("schotel") {
            MenuCategory::Schotel
        } else {
            MenuCategory::Other
        }
    }
}

/// Immutable, process-lifetime index of orderable items (MI). Loaded once
/// at startup from a JSON catalogue in one of three documented shapes.
#[derive(Debug, Clone, Default)]
pub struct MenuIndex {
    items: Vec<MenuItem>,
}

impl MenuIndex {
    pub fn empty() -> Self {
        Self { items: Vec::new() }
    }

    pub fn items(&self) -> &[MenuItem] {
        &self.items
    }

    pub fn load_from_path(path: &Path) -> Self {
        match std::fs::read_to_string(path) {
            Ok(raw) => Self::load_from_str(&raw),
            Err(err) => {
                tracing::warn!(?path, %err, "menu catalogue unreadable, starting with empty menu");
                Self::empty()
            }
        }
    }

    pub fn load_from_str(raw: &str) -> Self {
        let data: Value = match serde_json::from_str(raw) {
            Ok(v) => v,
            Err(err) => {
                tracing::warn!(%err, "menu catalogue is not valid JSON, starting with empty menu");
                return Self::empty();
            }
        };

        let mut raw_items: Vec<&Value> = Vec::new();
        match &data {
            Value::Object(map) if map.contains_key("categories") => {
                if let Some(cats) = map.get("categories").and_then(Value::as_array) {
                    for cat in cats {
                        if let Some(items) = cat.get("items").and_then(Value::as_array) {
                            raw_items.extend(items.iter());
                        }
                    }
                }
            }
            Value::Object(map) if map.contains_key("items") => {
                if let Some(items) = map.get("items").and_then(Value::as_array) {
                    raw_items.extend(items.iter());
                }
            }
            Value::Array(list) => {
                for elem in list {
                    if let Some(items) = elem.get("items").and_then(Value::as_array) {
                        raw_items.extend(items.iter());
                    } else {
                        raw_items.push(elem);
                    }
                }
            }
            _ => {}
        }

        let items = raw_items
            .into_iter()
            .filter_map(parse_item)
            .collect::<Vec<_>>();

        Self { items }
    }

    /// Direct substring match on normalised names, falling back to
    /// token-overlap (overlap >= 1). Ties: largest overlap, then
    /// substring-name presence, then menu declaration order.
    pub fn best_match(&self, segment_normalised: &str) -> Option<&MenuItem> {
        if segment_normalised.is_empty() {
            return None;
        }

        for item in &self.items {
            if segment_normalised.contains(&item.normalised_name)
                || item.normalised_name.contains(segment_normalised)
            {
                return Some(item);
            }
        }

        let seg_tokens: HashSet<&str> = significant_tokens(segment_normalised)
            .into_iter()
            .collect();
        if seg_tokens.is_empty() {
            return None;
        }

        let mut best: Option<&MenuItem> = None;
        let mut best_score = 0usize;
        for item in &self.items {
            let overlap = item
                .token_set
                .iter()
                .filter(|t| seg_tokens.contains(t.as_str()))
                .count();
            if overlap > best_score {
                best = Some(item);
                best_score = overlap;
            }
        }
        if best_score >= 1 {
            best
        } else {
            None
        }
    }

    pub fn mentions_unspecified_pizza(&self, utterance_normalised: &str) -> bool {
        let mentions_pizza = utterance_normalised
            .split(' ')
            .any(|w| w == "pizza" || w == "pizzas");
        mentions_pizza && self.best_match(utterance_normalised).is_none()
    }
}

fn parse_item(raw: &Value) -> Option<MenuItem> {
    let obj = raw.as_object()?;
    let name = obj
        .get("name")
        .or_else(|| obj.get("naam"))
        .and_then(Value::as_str)
        .unwrap_or("")
        .trim();
    let price = obj
        .get("price")
        .or_else(|| obj.get("prijs"))
        .and_then(value_as_f64)
        .unwrap_or(0.0);
    if name.is_empty() || price <= 0.0 {
        return None;
    }
    let normalised_name = normalize(name);
    let code = obj
        .get("code")
        .or_else(|| obj.get("id"))
        .and_then(Value::as_str)
        .map(str::to_string)
        .unwrap_or_else(|| normalised_name.replace(' ', "_").chars().take(24).collect());
    let token_set = significant_tokens(&normalised_name)
        .into_iter()
        .map(str::to_string)
        .collect();

    Some(MenuItem {
        code,
        display_name: name.to_string(),
        price,
        normalised_name,
        token_set,
    })
}

fn value_as_f64(v: &Value) -> Option<f64> {
    match v {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.replace(',', ".").parse().ok(),
        _ => None,
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn loads_flat_list_with_aliases() {
        let raw = r#"[{"naam": "Pizza Margherita", "prijs": 11.5}, {"name": "Quattro Formaggi", "price": 13}]"#;
        let menu = MenuIndex::load_from_str(raw);
        assert_eq!(menu.items().len(), 2);
    }

    #[test]
    fn loads_categories_shape() {
        let raw = r#"{"categories":[{"items":[{"name":"Margherita","price":10}]}]}"#;
        let menu = MenuIndex::load_from_str(raw);
        assert_eq!(menu.items().len(), 1);
    }

    #[test]
    fn drops_zero_price_or_empty_name_items() {
        let raw = r#"[{"name":"Free sample","price":0},{"name":"","price":5}]"#;
        let menu = MenuIndex::load_from_str(raw);
        assert!(menu.items().is_empty());
    }

    #[test]
    fn best_match_prefers_substring_then_overlap() {
        let raw = r#"[{"name":"Pizza Margherita","price":10},{"name":"Pizza Hawai","price":11}]"#;
        let menu = MenuIndex::load_from_str(raw);
        let hit = menu.best_match("margherita").unwrap();
        assert_eq!(hit.display_name, "Pizza Margherita");
    }
}
