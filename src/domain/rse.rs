//! Runtime Status Evaluator (RSE). Pure function of (clock, overrides,
//! hard-coded windows) -> `RuntimeStatus`. No side effects; must be called
//! on every request that depends on opening state.

use chrono::{DateTime, NaiveTime, TimeZone};
use chrono_tz::Tz;

use super::model::prelude::{IsOpenOverride, Overrides, RuntimeStatus};
use crate::domain::model::runtime_status::{DisplayWindow, OpenMode};

fn t(h: u32, m: u32) -> NaiveTime {
    NaiveTime::from_hms_opt(h, m, 0).unwrap()
}

/// Evaluates the restaurant's runtime status at `now` against `overrides`.
pub fn evaluate(now: DateTime<Tz>, overrides: &Overrides) -> RuntimeStatus {
    let time_of_day = now.time();

    let open_start = t(16, 0);
    let open_end = t(22, 0);
    let delivery_start = t(17, 0);
    let delivery_end = t(21, 30);

    let open_auto = time_of_day >= open_start && time_of_day < open_end;
    let delivery_auto = time_of_day >= delivery_start && time_of_day < delivery_end;
    let pickup_auto = open_auto;

    let open_now = match overrides.is_open_override {
        IsOpenOverride::Closed => false,
        IsOpenOverride::Open => true,
        IsOpenOverride::Auto => open_auto,
    };

    let now_utc = now.with_timezone(&chrono::Utc);

    if overrides.kitchen_closed {
        return RuntimeStatus {
            now: now_utc,
            mode: OpenMode::Closed,
            delivery_enabled: false,
            pickup_enabled: false,
            kitchen_closed: true,
            bot_enabled: overrides.bot_enabled,
            pasta_available: overrides.pasta_available,
            delay_pasta_minutes: overrides.delay_pasta_minutes,
            delay_schotels_minutes: overrides.delay_schotels_minutes,
            close_reason: None,
            window: DisplayWindow::default(),
        };
    }

    if !open_now {
        return RuntimeStatus {
            now: now_utc,
            mode: OpenMode::Closed,
            delivery_enabled: false,
            pickup_enabled: false,
            kitchen_closed: false,
            bot_enabled: overrides.bot_enabled,
            pasta_available: overrides.pasta_available,
            delay_pasta_minutes: overrides.delay_pasta_minutes,
            delay_schotels_minutes: overrides.delay_schotels_minutes,
            close_reason: Some("We zijn op dit moment gesloten.".to_string()),
            window: DisplayWindow::default(),
        };
    }

    let delivery_enabled = delivery_auto && overrides.delivery_enabled.unwrap_or(true);
    let pickup_enabled = pickup_auto && overrides.pickup_enabled.unwrap_or(true);

    RuntimeStatus {
        now: now_utc,
        mode: OpenMode::Open,
        delivery_enabled,
        pickup_enabled,
        kitchen_closed: false,
        bot_enabled: overrides.bot_enabled,
        pasta_available: overrides.pasta_available,
        delay_pasta_minutes: overrides.delay_pasta_minutes,
        delay_schotels_minutes: overrides.delay_schotels_minutes,
        close_reason: None,
        window: DisplayWindow::default(),
    }
}

fn at(tz: Tz, hms: (u32, u32, u32)) -> DateTime<Tz> {
    tz.with_ymd_and_hms(2026, 8, 1, hms.0, hms.1, hms.2).unwrap()
}
