//! Greeting Selector (GS): (RSE, CC) -> one of a small set of canned
//! openings, drawn from the prompt map.

use chrono::{DateTime, NaiveTime};
use chrono_tz::Tz;

use super::model::prelude::RuntimeStatus;
use crate::prompts::Prompts;

pub fn greeting(status: &RuntimeStatus, now: DateTime<Tz>, record_calls_notice: bool, prompts: &Prompts) -> String {
    if status.is_closed() {
        return prompts.get("greet_closed").to_string();
    }

    let noon = NaiveTime::from_hms_opt(12, 0, 0).unwrap();
    let evening = NaiveTime::from_hms_opt(18, 0, 0).unwrap();
    let t = now.time();

    let base = if t < noon {
        prompts.get("greet_open_morning")
    } else if t < evening {
        prompts.get("greet_open_afternoon")
    } else {
        prompts.get("greet_open_evening")
    };

    if record_calls_notice {
        format!("{} {}", base, prompts.get("recording_notice"))
    } else {
        base.to_string()
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::domain::model::runtime_status::{DisplayWindow, OpenMode};
    use chrono::TimeZone;

    fn status(mode: OpenMode) -> RuntimeStatus {
        RuntimeStatus {
            now: chrono::Utc::now(),
            mode,
            delivery_enabled: false,
            pickup_enabled: mode == OpenMode::Open,
            kitchen_closed: false,
            bot_enabled: true,
            pasta_available: true,
            delay_pasta_minutes: 0,
            delay_schotels_minutes: 0,
            close_reason: None,
            window: DisplayWindow::default(),
        }
    }

    #[test]
    fn closed_greeting_is_invariant_across_time_of_day() {
        let prompts = Prompts::defaults();
        let tz: Tz = "Europe/Amsterdam".parse().unwrap();
        let morning = tz.with_ymd_and_hms(2026, 8, 1, 9, 0, 0).unwrap();
        let evening = tz.with_ymd_and_hms(2026, 8, 1, 23, 0, 0).unwrap();
        assert_eq!(
            greeting(&status(OpenMode::Closed), morning, false, &prompts),
            greeting(&status(OpenMode::Closed), evening, false, &prompts)
        );
    }

    #[test]
    fn open_greeting_varies_by_daypart() {
        let prompts = Prompts::defaults();
        let tz: Tz = "Europe/Amsterdam".parse().unwrap();
        let morning = tz.with_ymd_and_hms(2026, 8, 1, 9, 0, 0).unwrap();
        let evening = tz.with_ymd_and_hms(2026, 8, 1, 19, 0, 0).unwrap();
        assert_ne!(
            greeting(&status(OpenMode::Open), morning, false, &prompts),
            greeting(&status(OpenMode::Open), evening, false, &prompts)
        );
    }

    #[test]
    fn recording_notice_appended_when_enabled() {
        let prompts = Prompts::defaults();
        let tz: Tz = "Europe/Amsterdam".parse().unwrap();
        let now = tz.with_ymd_and_hms(2026, 8, 1, 19, 0, 0).unwrap();
        let plain = greeting(&status(OpenMode::Open), now, false, &prompts);
        let with_notice = greeting(&status(OpenMode::Open), now, true, &prompts);
        assert!(with_notice.len() > plain.len());
    }
}
