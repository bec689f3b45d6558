//! End-to-end dialogue scenarios from the turn sequences in spec.md §8,
//! driven straight through the public domain API rather than over HTTP, so
//! the clock stays deterministic across the whole call.

use belassistent::domain::dsm::{step, DsmContext};
use belassistent::domain::model::prelude::{
    CallSession, CustomerDirectory, DeliveryConfig, MenuIndex, Overrides,
};
use belassistent::domain::model::session::DialogueState;
use belassistent::domain::rse;
use belassistent::prompts::Prompts;
use chrono::TimeZone;
use chrono_tz::Tz;

fn tz() -> Tz {
    "Europe/Amsterdam".parse().unwrap()
}

fn sample_menu() -> MenuIndex {
    MenuIndex::load_from_str(
        r#"[
            {"code":"pz-margherita","name":"Pizza Margherita","price":10},
            {"code":"pz-salami","name":"Pizza Salami","price":11}
        ]"#,
    )
}

fn sample_delivery() -> DeliveryConfig {
    DeliveryConfig::load_from_str(
        r#"{"zones":[{"postcodes":["1234"],"fee":2}],"sla":{"pickup_minutes":15,"pickup_combo_minutes":30,"delivery_minutes":45}}"#,
    )
}

fn sample_customers() -> CustomerDirectory {
    let path = std::env::temp_dir().join(format!("belassistent-it-customers-{}.csv", std::process::id()));
    std::fs::write(
        &path,
        "phone,mobile,postcode,street1,house_number,fname,iname\n0612345678,0612345678,1234AB,Dorpsstraat,7,Jan,Jansen\n",
    )
    .unwrap();
    CustomerDirectory::new(path)
}

#[test]
fn scenario_1_happy_pickup() {
    let menu = sample_menu();
    let delivery = sample_delivery();
    let customers = sample_customers();
    let prompts = Prompts::defaults();
    let now = tz().with_ymd_and_hms(2026, 8, 1, 19, 0, 0).unwrap();
    let ctx = DsmContext {
        menu: &menu,
        delivery: &delivery,
        customers: &customers,
        prompts: &prompts,
        now,
    };
    let status = rse::evaluate(now, &Overrides::default());

    let mut session = CallSession::fresh("call-scenario-1", chrono::Utc::now());

    step(&mut session, "", &status, &ctx);
    let added = step(&mut session, "twee margherita", &status, &ctx);
    assert!(added.messages[0].contains("2"));
    assert_eq!(added.next_state, DialogueState::ConfirmMore);

    let summary = step(&mut session, "nee", &status, &ctx);
    assert!(summary.messages[0].contains("2× Pizza Margherita"));

    let confirmed = step(&mut session, "ja", &status, &ctx);
    assert_eq!(confirmed.next_state, DialogueState::Fulfilment);

    let done = step(&mut session, "afhalen", &status, &ctx);
    assert_eq!(done.next_state, DialogueState::End);
    let order = done.finished_order.expect("pickup turn finalises an order");
    assert!((order.total - 20.0).abs() < 0.005);
    assert!(done.messages[0].contains("19:15"));
}

#[test]
fn scenario_2_pizza_without_variant_then_delivery_with_known_address() {
    let menu = sample_menu();
    let delivery = sample_delivery();
    let customers = sample_customers();
    let prompts = Prompts::defaults();
    let now = tz().with_ymd_and_hms(2026, 8, 1, 19, 0, 0).unwrap();
    let ctx = DsmContext {
        menu: &menu,
        delivery: &delivery,
        customers: &customers,
        prompts: &prompts,
        now,
    };
    let status = rse::evaluate(now, &Overrides::default());

    let mut session = CallSession::fresh("call-scenario-2", chrono::Utc::now());
    step(&mut session, "", &status, &ctx);

    let which = step(&mut session, "twee pizza's", &status, &ctx);
    assert_eq!(which.messages[0], prompts.get("ask_pizza_which"));
    assert_eq!(which.next_state, DialogueState::AskItems);

    let added = step(&mut session, "een margherita en een salami", &status, &ctx);
    assert_eq!(added.next_state, DialogueState::ConfirmMore);
    assert_eq!(session.items.len(), 2);

    step(&mut session, "nee", &status, &ctx);
    step(&mut session, "ja", &status, &ctx);
    let fulfilled = step(&mut session, "bezorgen", &status, &ctx);
    assert_eq!(fulfilled.next_state, DialogueState::Phone);

    let found = step(&mut session, "0612345678", &status, &ctx);
    assert_eq!(found.next_state, DialogueState::CrmConfirm);
    assert!(found.messages[0].contains("Dorpsstraat"));

    let payment = step(&mut session, "ja", &status, &ctx);
    assert_eq!(payment.next_state, DialogueState::Payment);

    let finalised = step(&mut session, "contant", &status, &ctx);
    assert_eq!(finalised.next_state, DialogueState::End);
    let order = finalised.finished_order.expect("delivery turn finalises an order");
    assert!((order.total - 23.0).abs() < 0.005); // 10 + 11 + 2 fee
}

#[test]
fn scenario_3_kitchen_closed_override_halts_dialogue() {
    let menu = sample_menu();
    let delivery = sample_delivery();
    let customers = sample_customers();
    let prompts = Prompts::defaults();
    let now = tz().with_ymd_and_hms(2026, 8, 1, 19, 0, 0).unwrap();
    let ctx = DsmContext {
        menu: &menu,
        delivery: &delivery,
        customers: &customers,
        prompts: &prompts,
        now,
    };

    let mut overrides = Overrides::default();
    overrides.kitchen_closed = true;
    overrides.ttl_minutes = 30;
    let status = rse::evaluate(now, &overrides);

    let mut session = CallSession::fresh("call-scenario-3", chrono::Utc::now());
    session.state = DialogueState::AskItems;

    let outcome = step(&mut session, "twee margherita", &status, &ctx);
    assert_eq!(outcome.messages, vec![prompts.get("greet_closed").to_string()]);
    assert_eq!(outcome.next_state, DialogueState::AskItems);
    assert!(session.items.is_empty());
}

#[test]
fn scenario_4_invalid_admin_delay_is_rejected() {
    let mut overrides = Overrides::default();
    overrides.delay_pasta_minutes = 17;
    assert!(overrides.validate().is_err());
}

#[test]
fn scenario_5_forced_open_outside_hours_does_not_imply_delivery() {
    let mut overrides = Overrides::default();
    overrides.is_open_override = belassistent::domain::model::prelude::IsOpenOverride::Open;
    let now = tz().with_ymd_and_hms(2026, 8, 1, 10, 0, 0).unwrap();
    let status = rse::evaluate(now, &overrides);
    assert!(!status.is_closed());
    assert!(!status.delivery_enabled);
}

#[test]
fn scenario_6_unknown_phone_falls_back_to_manual_address() {
    let menu = sample_menu();
    let delivery = sample_delivery();
    let customers = sample_customers();
    let prompts = Prompts::defaults();
    let now = tz().with_ymd_and_hms(2026, 8, 1, 19, 0, 0).unwrap();
    let ctx = DsmContext {
        menu: &menu,
        delivery: &delivery,
        customers: &customers,
        prompts: &prompts,
        now,
    };
    let status = rse::evaluate(now, &Overrides::default());

    let mut session = CallSession::fresh("call-scenario-6", chrono::Utc::now());
    step(&mut session, "", &status, &ctx);
    step(&mut session, "een margherita", &status, &ctx);
    step(&mut session, "nee", &status, &ctx);
    step(&mut session, "ja", &status, &ctx);
    step(&mut session, "bezorgen", &status, &ctx);

    let missing = step(&mut session, "0600000000", &status, &ctx);
    assert_eq!(missing.next_state, DialogueState::Address);

    let payment = step(&mut session, "huisnummer 5, postcode 1234 AB", &status, &ctx);
    assert_eq!(payment.next_state, DialogueState::Payment);
    assert_eq!(session.customer.postcode, "1234AB");
    assert_eq!(session.customer.house_number, "5");

    let finalised = step(&mut session, "contant", &status, &ctx);
    assert_eq!(finalised.next_state, DialogueState::End);
}
