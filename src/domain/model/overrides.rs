use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Valid delay steps an operator can dial in for a category, in minutes.
pub const ALLOWED_DELAYS: [u32; 6] = [0, 10, 20, 30, 45, 60];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IsOpenOverride {
    Auto,
    Open,
    Closed,
}

impl Default for IsOpenOverride {
    fn default() -> Self {
        Self::Auto
    }
}

/// Operator overrides (OS record). `ttl_minutes` only affects how long the
/// record is kept by the store — it is not part of the stored payload
/// itself.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Overrides {
    #[serde(default = "default_true")]
    pub bot_enabled: bool,
    #[serde(default)]
    pub kitchen_closed: bool,
    #[serde(default = "default_true")]
    pub pasta_available: bool,
    #[serde(default)]
    pub delay_pasta_minutes: u32,
    #[serde(default)]
    pub delay_schotels_minutes: u32,
    #[serde(default)]
    pub is_open_override: IsOpenOverride,
    #[serde(default)]
    pub delivery_enabled: Option<bool>,
    #[serde(default)]
    pub pickup_enabled: Option<bool>,
    #[serde(default = "default_ttl")]
    pub ttl_minutes: u32,
}

fn default_true() -> bool {
    true
}

fn default_ttl() -> u32 {
    180
}

impl Default for Overrides {
    fn default() -> Self {
        Self {
            bot_enabled: true,
            kitchen_closed: false,
            pasta_available: true,
            delay_pasta_minutes: 0,
            delay_schotels_minutes: 0,
            is_open_override: IsOpenOverride::Auto,
            delivery_enabled: None,
            pickup_enabled: None,
            ttl_minutes: default_ttl(),
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum OverridesValidationError {
    #[error("delay_pasta_minutes must be one of {ALLOWED_DELAYS:?}")]
    InvalidPastaDelay,
    #[error("delay_schotels_minutes must be one of {ALLOWED_DELAYS:?}")]
    InvalidSchotelsDelay,
    #[error("ttl_minutes must be between 1 and 720")]
    InvalidTtl,
}

impl Overrides {
    pub fn validate(&self) -> Result<(), OverridesValidationError> {
        if !ALLOWED_DELAYS.contains(&self.delay_pasta_minutes) {
            return Err(OverridesValidationError::InvalidPastaDelay);
        }
        if !ALLOWED_DELAYS.contains(&self.delay_schotels_minutes) {
            return Err(OverridesValidationError::InvalidSchotelsDelay);
        }
        if self.ttl_minutes == 0 || self.ttl_minutes > 720 {
            return Err(OverridesValidationError::InvalidTtl);
        }
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn default_overrides_validate() {
        assert!(Overrides::default().validate().is_ok());
    }

    #[test]
    fn rejects_out_of_set_delay() {
        let mut ov = Overrides::default();
        ov.delay_pasta_minutes = 17;
        assert_eq!(
            ov.validate(),
            Err(OverridesValidationError::InvalidPastaDelay)
        );
    }

    #[test]
    fn rejects_ttl_out_of_range() {
        let mut ov = Overrides::default();
        ov.ttl_minutes = 0;
        assert_eq!(ov.validate(), Err(OverridesValidationError::InvalidTtl));
        ov.ttl_minutes = 721;
        assert_eq!(ov.validate(), Err(OverridesValidationError::InvalidTtl));
    }
}
