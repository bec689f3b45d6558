//! Single source of temporal truth (CC). Every other component asks the
//! clock for "now" instead of calling `chrono::Local::now()` directly, so
//! tests can pin a fixed instant.

use chrono::{DateTime, TimeZone};
use chrono_tz::Tz;

pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Tz>;
}

#[derive(Debug, Clone)]
pub struct SystemClock {
    tz: Tz,
}

impl SystemClock {
    pub fn new(tz: Tz) -> Self {
        Self { tz }
    }
}

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Tz> {
        chrono::Utc::now().with_timezone(&self.tz)
    }
}

/// Fixed clock for deterministic evaluation and tests.
#[derive(Debug, Clone)]
pub struct FixedClock {
    at: DateTime<Tz>,
}

impl FixedClock {
    pub fn new(at: DateTime<Tz>) -> Self {
        Self { at }
    }

    pub fn parse(tz: Tz, rfc3339: &str) -> anyhow::Result<Self> {
        let parsed = DateTime::parse_from_rfc3339(rfc3339)?;
        Ok(Self {
            at: parsed.with_timezone(&tz),
        })
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Tz> {
        self.at
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn fixed_clock_always_returns_same_instant() {
        let tz: Tz = "Europe/Amsterdam".parse().unwrap();
        let clock = FixedClock::parse(tz, "2026-08-01T19:00:00+02:00").unwrap();
        assert_eq!(clock.now(), clock.now());
        assert_eq!(clock.now().format("%H:%M").to_string(), "19:00");
    }
}
