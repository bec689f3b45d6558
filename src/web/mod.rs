pub mod admin;
pub mod auth;
pub mod call_control;
pub mod state;
pub mod voice;

use axum::routing::{get, post};
use axum::Router;
use tower_http::trace::TraceLayer;

use state::AppState;

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/runtime/status", get(admin::runtime_status))
        .route("/admin/toggles", post(admin::set_toggles))
        .route("/healthz", get(admin::healthz))
        .route("/crm/lookup", get(admin::crm_lookup))
        .route("/order/submit", post(admin::submit_order))
        .route("/incoming", get(voice::incoming).post(voice::incoming))
        .route("/step", get(voice::step).post(voice::step))
        .route("/handle", post(voice::handle))
        .route("/status", post(voice::status))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
