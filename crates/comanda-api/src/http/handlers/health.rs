//! Health check endpoint.

use axum::Json;
use axum::extract::State;
use serde::Serialize;

use crate::http::response::{ApiResponse, RequestTimer};
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct HealthStatus {
    pub status: &'static str,
    pub version: &'static str,
    pub open_sessions: usize,
    pub query_service: String,
}

/// GET /api/v1/health
pub async fn health_check(State(state): State<AppState>) -> Json<ApiResponse<HealthStatus>> {
    let timer = RequestTimer::start();
    let status = HealthStatus {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
        open_sessions: state.sessions.len(),
        query_service: state.config.query_service.base_url.clone(),
    };
    Json(timer.respond(status).with_link("self", "/api/v1/health"))
}
