//! Operator-facing HTTP API: `GET /runtime/status`, `POST /admin/toggles`,
//! `GET /healthz`, `GET /crm/lookup`, `POST /order/submit`.

use axum::extract::{Query, State};
use axum::http::HeaderMap;
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::domain::model::prelude::{CustomerDraft, Fulfilment, Order, Overrides, Payment};
use crate::domain::rse;
use crate::error::AppError;
use crate::web::auth::check_basic_auth;
use crate::web::state::AppState;

pub async fn runtime_status(State(state): State<AppState>) -> Result<Json<serde_json::Value>, AppError> {
    let overrides = state.overrides.current().await.unwrap_or_default();
    let status = rse::evaluate(state.clock.now(), &overrides);
    Ok(Json(serde_json::to_value(status).expect("RuntimeStatus always serialises")))
}

pub async fn set_toggles(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(overrides): Json<Overrides>,
) -> Result<Json<serde_json::Value>, AppError> {
    check_basic_auth(&headers, &state.settings.admin_user, &state.settings.admin_password)?;
    overrides.validate()?;

    state
        .overrides
        .set(overrides)
        .await
        .map_err(AppError::StoreUnavailable)?;

    let fresh = state.overrides.current().await.unwrap_or_default();
    let status = rse::evaluate(state.clock.now(), &fresh);
    Ok(Json(serde_json::to_value(status).expect("RuntimeStatus always serialises")))
}

#[derive(Serialize)]
pub struct HealthBody {
    ok: bool,
    time: String,
    tz: String,
}

pub async fn healthz(State(state): State<AppState>) -> Json<HealthBody> {
    let ok = state.overrides.current().await.is_ok();
    Json(HealthBody {
        ok,
        time: state.clock.now().to_rfc3339(),
        tz: state.tz().to_string(),
    })
}

#[derive(Deserialize)]
pub struct CrmLookupQuery {
    tel: String,
}

#[derive(Serialize)]
pub struct CrmLookupBody {
    found: bool,
    tel: String,
    postcode: String,
    street: String,
    house_number: String,
    name: String,
}

pub async fn crm_lookup(State(state): State<AppState>, Query(q): Query<CrmLookupQuery>) -> Json<CrmLookupBody> {
    match state.customers.lookup(&q.tel) {
        Some(record) => Json(CrmLookupBody {
            found: true,
            tel: q.tel,
            postcode: record.postcode,
            street: record.street,
            house_number: record.house_number,
            name: record.name,
        }),
        None => Json(CrmLookupBody {
            found: false,
            tel: q.tel,
            postcode: String::new(),
            street: String::new(),
            house_number: String::new(),
            name: String::new(),
        }),
    }
}

#[derive(Deserialize)]
pub struct OrderSubmission {
    pub call_id: String,
    pub items: Vec<crate::domain::model::prelude::OrderItem>,
    pub total: f64,
    pub fulfilment: Fulfilment,
    pub customer: CustomerDraft,
    pub payment: Option<Payment>,
}

#[derive(Serialize)]
pub struct OrderSubmitBody {
    ok: bool,
    order_id: String,
}

pub async fn submit_order(
    State(state): State<AppState>,
    Json(submission): Json<OrderSubmission>,
) -> Result<Json<OrderSubmitBody>, AppError> {
    let now = state.clock.now();
    let order = Order {
        order_id: Order::new_id(),
        call_id: submission.call_id,
        items: submission.items,
        total: submission.total,
        fulfilment: submission.fulfilment,
        customer: submission.customer,
        payment: submission.payment,
        eta_ready_at: now.with_timezone(&chrono::Utc),
        created_at: chrono::Utc::now(),
    };
    let order_id = order.order_id.clone();

    state.orders.record(order).await.map_err(AppError::StoreUnavailable)?;

    Ok(Json(OrderSubmitBody { ok: true, order_id }))
}
