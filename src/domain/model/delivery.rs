use std::path::Path;

use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct DeliveryZone {
    #[serde(default)]
    pub postcode_prefixes: Vec<String>,
    #[serde(default)]
    pub fee: f64,
}

#[derive(Debug, Clone, Copy, Deserialize)]
pub struct Sla {
    pub pickup_minutes: u32,
    pub pickup_combo_minutes: u32,
    pub delivery_minutes: u32,
}

impl Default for Sla {
    fn default() -> Self {
        Self {
            pickup_minutes: 15,
            pickup_combo_minutes: 30,
            delivery_minutes: 60,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct DeliveryConfig {
    pub zones: Vec<DeliveryZone>,
    pub sla: Sla,
}

#[derive(Debug, Deserialize)]
struct RawZone {
    #[serde(default)]
    postcodes: Vec<String>,
    #[serde(default)]
    fee: f64,
}

#[derive(Debug, Deserialize)]
struct RawConfig {
    #[serde(default)]
    zones: Vec<RawZone>,
    #[serde(default)]
    sla: Sla,
}

impl DeliveryConfig {
    pub fn load_from_path(path: &Path) -> Self {
        match std::fs::read_to_string(path) {
            Ok(raw) => Self::load_from_str(&raw),
            Err(err) => {
                tracing::warn!(?path, %err, "delivery config unreadable, using baseline defaults");
                Self::default()
            }
        }
    }

    pub fn load_from_str(raw: &str) -> Self {
        match serde_json::from_str::<RawConfig>(raw) {
            Ok(cfg) => Self {
                zones: cfg
                    .zones
                    .into_iter()
                    .map(|z| DeliveryZone {
                        postcode_prefixes: z
                            .postcodes
                            .into_iter()
                            .map(|p| p.replace(' ', "").to_uppercase())
                            .collect(),
                        fee: z.fee,
                    })
                    .collect(),
                sla: cfg.sla,
            },
            Err(err) => {
                tracing::warn!(%err, "delivery config is not valid JSON, using baseline defaults");
                Self::default()
            }
        }
    }

    /// Fee of the first zone whose postcode prefix list contains a prefix
    /// of the caller's normalised postcode; else 0.
    pub fn fee_for_postcode(&self, postcode: &str) -> f64 {
        let normalised = postcode.replace(' ', "").to_uppercase();
        if normalised.is_empty() {
            return 0.0;
        }
        self.zones
            .iter()
            .find(|z| {
                z.postcode_prefixes
                    .iter()
                    .any(|prefix| normalised.starts_with(prefix.as_str()))
            })
            .map(|z| z.fee)
            .unwrap_or(0.0)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn finds_fee_by_prefix() {
        let raw = r#"{"zones":[{"postcodes":["6301","6300"],"fee":2.5}],"sla":{"pickup_minutes":15,"pickup_combo_minutes":30,"delivery_minutes":45}}"#;
        let cfg = DeliveryConfig::load_from_str(raw);
        assert_eq!(cfg.fee_for_postcode("6301AB"), 2.5);
        assert_eq!(cfg.fee_for_postcode("9999ZZ"), 0.0);
    }

    #[test]
    fn falls_back_to_baseline_sla_on_bad_json() {
        let cfg = DeliveryConfig::load_from_str("not json");
        assert_eq!(cfg.sla.pickup_minutes, 15);
        assert!(cfg.zones.is_empty());
    }
}
