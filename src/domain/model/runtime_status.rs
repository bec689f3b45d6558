use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OpenMode {
    Open,
    Closed,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DisplayWindow {
    pub open: String,
    pub delivery: String,
    pub close: String,
}

impl Default for DisplayWindow {
    fn default() -> Self {
        Self {
            open: "16:00".to_string(),
            delivery: "17:00-21:30".to_string(),
            close: "22:00".to_string(),
        }
    }
}

/// Output of the Runtime Status Evaluator (RSE). Never persisted — always
/// recomputed fresh from the clock and the current overrides.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RuntimeStatus {
    pub now: DateTime<Utc>,
    pub mode: OpenMode,
    pub delivery_enabled: bool,
    pub pickup_enabled: bool,
    pub kitchen_closed: bool,
    pub bot_enabled: bool,
    pub pasta_available: bool,
    pub delay_pasta_minutes: u32,
    pub delay_schotels_minutes: u32,
    pub close_reason: Option<String>,
    pub window: DisplayWindow,
}

impl RuntimeStatus {
    pub fn is_closed(&self) -> bool {
        matches!(self.mode, OpenMode::Closed)
    }
}
