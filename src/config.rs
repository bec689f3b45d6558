//! Process configuration. Plain `std::env::var` reads with small parsing
//! helpers, in the teacher's `get_token_from_env` style — no config-crate
//! layering, since this service only ever reads a handful of variables.

use std::env;
use std::path::PathBuf;

use chrono_tz::Tz;

/// Bounded-wait constant for the (out-of-core) TTS call, documented here for
/// the deployment that fronts this service with one; this crate itself only
/// ever waits on the override/session store, never on TTS directly.
pub const TTS_TIMEOUT_SECS: u64 = 30;
pub const STORE_TIMEOUT_SECS: u64 = 5;

#[derive(Debug, Clone)]
pub struct Settings {
    pub bind_addr: String,
    pub store_url: Option<String>,
    pub admin_user: String,
    pub admin_password: String,
    pub tz: Tz,
    pub public_base_url: String,
    pub menu_path: PathBuf,
    pub delivery_config_path: PathBuf,
    pub prompts_path: PathBuf,
    pub customers_csv_path: PathBuf,
    pub order_log_path: PathBuf,
    pub overrides_ttl_minutes: u32,
    pub record_calls: bool,
    pub require_signed_callbacks: bool,
    pub webhook_signing_secret: Option<String>,
    pub fallback_phone_number: Option<String>,
    pub caller_id: Option<String>,
}

impl Settings {
    pub fn load() -> Self {
        Self {
            bind_addr: env_or("BIND_ADDR", "0.0.0.0:3000"),
            store_url: env::var("STORE_URL").ok(),
            admin_user: env_or("ADMIN_USER", "admin"),
            admin_password: env_or("ADMIN_PASSWORD", "admin"),
            tz: parse_tz(&env_or("TZ_NAME", "Europe/Amsterdam")),
            public_base_url: env_or("PUBLIC_BASE_URL", "http://localhost:3000"),
            menu_path: env_path("MENU_PATH", "config/menu.json"),
            delivery_config_path: env_path("DELIVERY_CONFIG_PATH", "config/delivery.json"),
            prompts_path: env_path("PROMPTS_PATH", "config/prompts.json"),
            customers_csv_path: env_path("CUSTOMERS_CSV_PATH", "config/customers.csv"),
            order_log_path: env_path("ORDER_LOG_PATH", "config/orders.ndjson"),
            overrides_ttl_minutes: env::var("OVERRIDES_TTL_MINUTES")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(180),
            record_calls: env_flag("RECORD_CALLS"),
            require_signed_callbacks: env_flag("REQUIRE_SIGNED_CALLBACKS"),
            webhook_signing_secret: env::var("WEBHOOK_SIGNING_SECRET").ok(),
            fallback_phone_number: env::var("FALLBACK_PHONE_NUMBER").ok(),
            caller_id: env::var("CALLER_ID").ok(),
        }
    }
}

fn env_or(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_string())
}

fn env_path(key: &str, default: &str) -> PathBuf {
    env::var(key).map(PathBuf::from).unwrap_or_else(|_| PathBuf::from(default))
}

fn env_flag(key: &str) -> bool {
    matches!(env::var(key).as_deref(), Ok("1") | Ok("true") | Ok("yes"))
}

fn parse_tz(name: &str) -> Tz {
    name.parse().unwrap_or_else(|_| {
        tracing::warn!(tz = name, "unrecognised TZ_NAME, falling back to Europe/Amsterdam");
        "Europe/Amsterdam".parse().expect("baseline tz is valid")
    })
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn unknown_tz_name_falls_back_to_baseline() {
        assert_eq!(parse_tz("Not/ARealZone"), "Europe/Amsterdam".parse::<Tz>().unwrap());
    }

    #[test]
    fn env_flag_accepts_common_truthy_spellings() {
        std::env::set_var("BELASSISTENT_TEST_FLAG", "true");
        assert!(env_flag("BELASSISTENT_TEST_FLAG"));
        std::env::remove_var("BELASSISTENT_TEST_FLAG");
        assert!(!env_flag("BELASSISTENT_TEST_FLAG"));
    }
}
