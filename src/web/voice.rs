//! Webhook Adapter (WA). Translates provider callbacks into Greeting
//! Selector / Dialogue State Machine invocations and renders the internal
//! call-control document.

use axum::extract::{FromRequest, Query, Request, State};
use axum::response::{IntoResponse, Response};
use axum::Form;
use serde::Deserialize;
use std::collections::HashMap;

use crate::domain::dsm::{self, DsmContext};
use crate::domain::greeting::greeting;
use crate::domain::model::prelude::CallSession;
use crate::domain::model::session::DialogueState;
use crate::domain::rse;
use crate::web::call_control::{tts_url, CallControlDoc};
use crate::web::state::AppState;

const STEP_PATH: &str = "/step";
const HANDLE_PATH: &str = "/handle";

#[derive(Debug, Deserialize, Default)]
pub struct CallbackForm {
    #[serde(alias = "CallSid", alias = "call_id")]
    pub call_id: String,
    #[serde(alias = "SpeechResult", alias = "transcript", default)]
    pub speech: String,
}

/// Accepts the callback payload either as a query string (GET, used by some
/// providers for the `incoming`/`step` callbacks) or as a form body (POST),
/// per spec.md §6's "incoming (GET/POST)" / "step (GET/POST)".
#[async_trait::async_trait]
impl<S> FromRequest<S> for CallbackForm
where
    S: Send + Sync,
{
    type Rejection = Response;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        if req.method() == axum::http::Method::GET {
            Query::<CallbackForm>::from_request(req, state)
                .await
                .map(|Query(form)| form)
                .map_err(IntoResponse::into_response)
        } else {
            Form::<CallbackForm>::from_request(req, state)
                .await
                .map(|Form(form)| form)
                .map_err(IntoResponse::into_response)
        }
    }
}

fn xml_response(body: String) -> Response {
    ([(axum::http::header::CONTENT_TYPE, "text/xml")], body).into_response()
}

async fn fallback_if_bot_disabled(state: &AppState) -> Option<Response> {
    let overrides = state.overrides.current().await.unwrap_or_default();
    if overrides.bot_enabled {
        return None;
    }
    let (Some(caller_id), Some(number)) = (state.settings.caller_id.clone(), state.settings.fallback_phone_number.clone()) else {
        tracing::warn!("bot_enabled=false but no fallback caller_id/number configured");
        return Some(xml_response(CallControlDoc::new().hangup().render()));
    };
    Some(xml_response(CallControlDoc::new().dial(caller_id, number).render()))
}

pub async fn incoming(State(state): State<AppState>, form: CallbackForm) -> Response {
    if let Some(resp) = fallback_if_bot_disabled(&state).await {
        return resp;
    }

    let overrides = state.overrides.current().await.unwrap_or_default();
    let status = rse::evaluate(state.clock.now(), &overrides);
    let text = greeting(&status, state.clock.now(), state.settings.record_calls, &state.prompts);

    let doc = CallControlDoc::new()
        .play(tts_url(&state.settings.public_base_url, &text))
        .redirect(format!("{}{STEP_PATH}?call_id={}", state.settings.public_base_url, form.call_id));
    xml_response(doc.render())
}

pub async fn step(State(state): State<AppState>, form: CallbackForm) -> Response {
    if let Some(resp) = fallback_if_bot_disabled(&state).await {
        return resp;
    }

    let doc = CallControlDoc::new()
        .gather(format!("{}{HANDLE_PATH}?call_id={}", state.settings.public_base_url, form.call_id))
        .redirect(format!("{}{STEP_PATH}?call_id={}", state.settings.public_base_url, form.call_id));
    xml_response(doc.render())
}

pub async fn handle(State(state): State<AppState>, form: CallbackForm) -> Response {
    if let Some(resp) = fallback_if_bot_disabled(&state).await {
        return resp;
    }

    let overrides = state.overrides.current().await.unwrap_or_default();
    let status = rse::evaluate(state.clock.now(), &overrides);

    let mut session = match state.sessions.get(&form.call_id).await {
        Ok(Some(existing)) => existing,
        Ok(None) | Err(_) => CallSession::fresh(form.call_id.clone(), chrono::Utc::now()),
    };

    let ctx = DsmContext {
        menu: &state.menu,
        delivery: &state.delivery,
        customers: &state.customers,
        prompts: &state.prompts,
        now: state.clock.now(),
    };

    let outcome = dsm::step(&mut session, &form.speech, &status, &ctx);

    if let Some(order) = outcome.finished_order {
        if let Err(err) = state.orders.record(order).await {
            tracing::error!(%err, call_id = %form.call_id, "failed to record finished order");
        }
        let _ = state.sessions.end(&form.call_id).await;
    } else if let Err(err) = state.sessions.save(&session).await {
        tracing::warn!(%err, call_id = %form.call_id, "failed to persist call session (best-effort)");
    }

    let mut doc = CallControlDoc::new();
    for message in &outcome.messages {
        doc = doc.play(tts_url(&state.settings.public_base_url, message));
    }

    doc = if outcome.next_state == DialogueState::End {
        doc.hangup()
    } else {
        doc.redirect(format!("{}{STEP_PATH}?call_id={}", state.settings.public_base_url, form.call_id))
    };

    xml_response(doc.render())
}

pub async fn status(State(state): State<AppState>, Form(form): Form<HashMap<String, String>>) -> Response {
    let raw = serde_json::to_string(&form).unwrap_or_default();
    state.log_status_callback(&raw);
    axum::http::StatusCode::OK.into_response()
}
