//! Dialogue State Machine (DSM) — the core controller. Deterministic in
//! `(call_id, utterance, RuntimeStatus, Overrides)` and, via the session
//! passed in by the caller, the prior turn's state.

use chrono::{DateTime, Duration};
use chrono_tz::Tz;
use std::collections::HashSet;

use super::model::session::DialogueState;
use super::model::prelude::{
    CallSession, CustomerDirectory, DeliveryConfig, Fulfilment, MenuIndex, Order, Payment,
    RuntimeStatus,
};
use super::normalize::normalize;
use super::parser::{self, YesNo};
use crate::prompts::Prompts;

pub struct DsmContext<'a> {
    pub menu: &'a MenuIndex,
    pub delivery: &'a DeliveryConfig,
    pub customers: &'a CustomerDirectory,
    pub prompts: &'a Prompts,
    pub now: DateTime<Tz>,
}

pub struct StepOutcome {
    pub messages: Vec<String>,
    pub next_state: DialogueState,
    pub finished_order: Option<Order>,
}

fn reply(messages: Vec<String>, next: DialogueState) -> StepOutcome {
    StepOutcome {
        messages,
        next_state: next,
        finished_order: None,
    }
}

/// Runs one DSM turn, mutating `session` in place (state, items, customer
/// draft, payment) and returning the messages to speak plus the next
/// state. When the turn finalises the order, `finished_order` is set and
/// invariant (5) applies: this `session` must not be consulted again.
pub fn step(session: &mut CallSession, utterance: &str, status: &RuntimeStatus, ctx: &DsmContext) -> StepOutcome {
    // Overrides short-circuit: any non-greet turn while closed only hears
    // the closed greeting and the dialogue does not advance.
    if session.state != DialogueState::Greet && status.is_closed() {
        return reply(vec![ctx.prompts.get("greet_closed").to_string()], session.state);
    }

    let normalised = normalize(utterance);

    match session.state {
        DialogueState::Greet => {
            session.state = DialogueState::AskItems;
            reply(vec![ctx.prompts.get("ask_items").to_string()], DialogueState::AskItems)
        }

        DialogueState::AskItems => handle_ask_items(session, &normalised, ctx),

        DialogueState::ConfirmMore => handle_confirm_more(session, &normalised, ctx),

        DialogueState::ConfirmSummary => handle_confirm_summary(session, &normalised, ctx),

        DialogueState::Fulfilment => handle_fulfilment(session, &normalised, status, ctx),

        DialogueState::Payment => handle_payment(session, &normalised, status, ctx),

        DialogueState::Phone => handle_phone(session, utterance, ctx),

        DialogueState::CrmConfirm => handle_crm_confirm(session, &normalised, status, ctx),

        DialogueState::Address => handle_address(session, utterance, status, ctx),

        DialogueState::End => reply(vec![ctx.prompts.get("fallback1").to_string()], DialogueState::End),
    }
}

fn handle_ask_items(session: &mut CallSession, normalised: &str, ctx: &DsmContext) -> StepOutcome {
    let items = parser::parse_items(normalised, ctx.menu);

    if items.is_empty() && ctx.menu.mentions_unspecified_pizza(normalised) {
        session.state = DialogueState::AskItems;
        return reply(vec![ctx.prompts.get("ask_pizza_which").to_string()], DialogueState::AskItems);
    }

    if items.is_empty() {
        session.state = DialogueState::AskItems;
        return reply(vec![ctx.prompts.get("ask_items").to_string()], DialogueState::AskItems);
    }

    session.add_items(items);
    let last = session.items.last().unwrap().clone();
    session.state = DialogueState::ConfirmMore;
    reply(
        vec![
            ctx.prompts
                .render("item_added", &[("qty", &last.qty.to_string()), ("name", &last.display_name)]),
            ctx.prompts.get("ask_items_more").to_string(),
        ],
        DialogueState::ConfirmMore,
    )
}

fn handle_confirm_more(session: &mut CallSession, normalised: &str, ctx: &DsmContext) -> StepOutcome {
    // Precedence mirrors the transition table: yes, then additional items,
    // then no, then unknown.
    if parser::yes_no(normalised) == YesNo::Yes {
        session.state = DialogueState::AskItems;
        return reply(vec![ctx.prompts.get("ask_items").to_string()], DialogueState::AskItems);
    }

    let items = parser::parse_items(normalised, ctx.menu);
    if !items.is_empty() {
        session.add_items(items);
        let last = session.items.last().unwrap().clone();
        return reply(
            vec![
                ctx.prompts
                    .render("item_added", &[("qty", &last.qty.to_string()), ("name", &last.display_name)]),
                ctx.prompts.get("ask_items_more").to_string(),
            ],
            DialogueState::ConfirmMore,
        );
    }

    match parser::yes_no(normalised) {
        YesNo::No => {
            session.recompute_total();
            session.state = DialogueState::ConfirmSummary;
            reply(
                vec![
                    ctx.prompts.render("confirm_items", &[("items", &session.items_text())]),
                    ctx.prompts.get("ask_items_confirm_ok").to_string(),
                ],
                DialogueState::ConfirmSummary,
            )
        }
        _ => reply(vec![ctx.prompts.get("ask_items_more").to_string()], DialogueState::ConfirmMore),
    }
}

fn handle_confirm_summary(session: &mut CallSession, normalised: &str, ctx: &DsmContext) -> StepOutcome {
    match parser::yes_no(normalised) {
        YesNo::Yes => {
            let amount = session.total.round();
            session.state = DialogueState::Fulfilment;
            reply(
                vec![
                    ctx.prompts.render("total_after_confirm", &[("amount", &format!("{amount:.0}"))]),
                    ctx.prompts.get("ask_fulfilment").to_string(),
                ],
                DialogueState::Fulfilment,
            )
        }
        YesNo::No => {
            session.reset_basket();
            session.state = DialogueState::AskItems;
            reply(vec![ctx.prompts.get("ask_items").to_string()], DialogueState::AskItems)
        }
        YesNo::Unknown => reply(
            vec![ctx.prompts.get("ask_items_confirm_ok").to_string()],
            DialogueState::ConfirmSummary,
        ),
    }
}

fn handle_fulfilment(session: &mut CallSession, normalised: &str, status: &RuntimeStatus, ctx: &DsmContext) -> StepOutcome {
    if contains_any(normalised, &["afhaal", "afhalen", "ophalen"]) {
        session.fulfilment = Some(Fulfilment::Pickup);
        return finalize_pickup(session, status, ctx);
    }
    if contains_any(normalised, &["bezorg", "bezorgen", "thuis"]) {
        session.fulfilment = Some(Fulfilment::Delivery);
        session.state = DialogueState::Phone;
        return reply(vec![ctx.prompts.get("ask_phone_for_delivery").to_string()], DialogueState::Phone);
    }
    reply(vec![ctx.prompts.get("ask_fulfilment").to_string()], DialogueState::Fulfilment)
}

/// Reached only once the delivery address is resolved (via CRM lookup or
/// manual entry), right before the ETA/closing message — matching
/// `app.py`'s own ordering of `crm_confirm`/`address` -> `ask_payment_delivery`
/// -> `eta`. Pickup orders never reach this state.
fn handle_payment(session: &mut CallSession, normalised: &str, status: &RuntimeStatus, ctx: &DsmContext) -> StepOutcome {
    let payment = if contains_any(normalised, &["ideal", "i deal", "link"]) {
        Some(Payment::Ideal)
    } else if contains_any(normalised, &["contant", "cash"]) {
        Some(Payment::Cash)
    } else if contains_any(normalised, &["pin"]) {
        Some(Payment::Pin)
    } else {
        None
    };

    let Some(payment) = payment else {
        // edge case (iii): unknown payment answers repeat the prompt.
        return reply(vec![ctx.prompts.get("ask_payment_delivery").to_string()], DialogueState::Payment);
    };

    session.payment = Some(payment);
    finalize_delivery(session, status, ctx)
}

fn handle_phone(session: &mut CallSession, raw_utterance: &str, ctx: &DsmContext) -> StepOutcome {
    let digits = parser::phone_digits(raw_utterance);
    session.customer.tel = digits.clone();

    if !digits.is_empty() {
        if let Some(found) = ctx.customers.lookup(&digits) {
            if !found.street.is_empty() || !found.postcode.is_empty() {
                session.customer.street = found.street.clone();
                session.customer.house_number = found.house_number.clone();
                session.customer.postcode = found.postcode.clone();
                session.state = DialogueState::CrmConfirm;
                return reply(
                    vec![ctx.prompts.render(
                        "confirm_lookup_found",
                        &[
                            ("straat", &found.street),
                            ("huisnr", &found.house_number),
                            ("postcode", &found.postcode),
                        ],
                    )],
                    DialogueState::CrmConfirm,
                );
            }
        }
    }

    session.state = DialogueState::Address;
    reply(vec![ctx.prompts.get("confirm_lookup_missing").to_string()], DialogueState::Address)
}

fn handle_crm_confirm(session: &mut CallSession, normalised: &str, _status: &RuntimeStatus, ctx: &DsmContext) -> StepOutcome {
    match parser::yes_no(normalised) {
        YesNo::Yes => {
            session.state = DialogueState::Payment;
            reply(vec![ctx.prompts.get("ask_payment_delivery").to_string()], DialogueState::Payment)
        }
        YesNo::No => {
            session.state = DialogueState::Address;
            reply(vec![ctx.prompts.get("confirm_lookup_missing").to_string()], DialogueState::Address)
        }
        YesNo::Unknown => reply(
            vec![ctx.prompts.render(
                "confirm_lookup_found",
                &[
                    ("straat", &session.customer.street),
                    ("huisnr", &session.customer.house_number),
                    ("postcode", &session.customer.postcode),
                ],
            )],
            DialogueState::CrmConfirm,
        ),
    }
}

fn handle_address(session: &mut CallSession, raw_utterance: &str, _status: &RuntimeStatus, ctx: &DsmContext) -> StepOutcome {
    if let Some(pc) = parser::postcode(raw_utterance) {
        session.customer.postcode = pc;
    }
    if let Some(hn) = parser::house_number(raw_utterance) {
        session.customer.house_number = hn;
    }

    if !session.customer.postcode.is_empty() && !session.customer.house_number.is_empty() {
        session.state = DialogueState::Payment;
        return reply(vec![ctx.prompts.get("ask_payment_delivery").to_string()], DialogueState::Payment);
    }

    reply(vec![ctx.prompts.get("ask_postcode_house").to_string()], DialogueState::Address)
}

fn contains_any(normalised: &str, keys: &[&str]) -> bool {
    keys.iter().any(|k| normalised.contains(k))
}

const COMBO_CATEGORIES: &[&str] = &["pizza", "pasta", "schotel"];

fn basket_is_combo(session: &CallSession) -> bool {
    let categories: HashSet<&str> = session
        .items
        .iter()
        .filter_map(|item| {
            let normalised = normalize(&item.display_name);
            COMBO_CATEGORIES.iter().find(|c| normalised.contains(**c)).copied()
        })
        .collect();
    categories.len() >= 2
}

fn eta_minutes(session: &CallSession, status: &RuntimeStatus, ctx: &DsmContext, fulfilment: Fulfilment) -> u32 {
    let delay = status.delay_pasta_minutes.max(status.delay_schotels_minutes);
    let base = match fulfilment {
        Fulfilment::Pickup if basket_is_combo(session) => ctx.delivery.sla.pickup_combo_minutes,
        Fulfilment::Pickup => ctx.delivery.sla.pickup_minutes,
        Fulfilment::Delivery => ctx.delivery.sla.delivery_minutes,
    };
    base + delay
}

fn finalize_pickup(session: &mut CallSession, status: &RuntimeStatus, ctx: &DsmContext) -> StepOutcome {
    let minutes = eta_minutes(session, status, ctx, Fulfilment::Pickup);
    let ready_at = ctx.now + Duration::minutes(minutes as i64);
    let order = build_order(session, Fulfilment::Pickup, ready_at, session.total);
    session.state = DialogueState::End;
    StepOutcome {
        messages: vec![
            ctx.prompts.render("pickup_eta", &[("time", &ready_at.format("%H:%M").to_string())]),
            ctx.prompts.get("closing_pickup").to_string(),
        ],
        next_state: DialogueState::End,
        finished_order: Some(order),
    }
}

fn finalize_delivery(session: &mut CallSession, status: &RuntimeStatus, ctx: &DsmContext) -> StepOutcome {
    let minutes = eta_minutes(session, status, ctx, Fulfilment::Delivery);
    let ready_at = ctx.now + Duration::minutes(minutes as i64);
    let fee = ctx.delivery.fee_for_postcode(&session.customer.postcode);
    let amount_with_fee = ((session.total + fee) * 100.0).round() / 100.0;
    let order = build_order(session, Fulfilment::Delivery, ready_at, amount_with_fee);
    session.state = DialogueState::End;
    StepOutcome {
        messages: vec![
            ctx.prompts.render("delivery_eta", &[("time", &ready_at.format("%H:%M").to_string())]),
            ctx.prompts.render("total_after_confirm", &[("amount", &format!("{:.0}", amount_with_fee.round()))]),
            ctx.prompts.get("closing_delivery").to_string(),
        ],
        next_state: DialogueState::End,
        finished_order: Some(order),
    }
}

fn build_order(session: &CallSession, fulfilment: Fulfilment, eta_ready_at: DateTime<Tz>, total: f64) -> Order {
    Order {
        order_id: Order::new_id(),
        call_id: session.call_id.clone(),
        items: session.items.clone(),
        total,
        fulfilment,
        customer: session.customer.clone(),
        payment: session.payment,
        eta_ready_at: eta_ready_at.with_timezone(&chrono::Utc),
        created_at: chrono::Utc::now(),
    }
}
