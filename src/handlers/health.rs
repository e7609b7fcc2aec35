use axum::{Json, extract::State};
use serde::Serialize;

use crate::router::CafeState;

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
}

/// Reports whether the process currently holds a live database handle.
/// Never triggers a connection attempt itself.
pub async fn health_handler(State(state): State<CafeState>) -> Json<HealthResponse> {
    let status = if state.manager.is_connected().await {
        "ok"
    } else {
        "degraded"
    };
    Json(HealthResponse { status })
}
