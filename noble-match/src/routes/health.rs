use axum::extract::State;
use axum::Json;
use std::sync::Arc;

use noble_shared::types::api::HealthResponse;

use crate::AppState;

pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse::healthy("noble-match", env!("CARGO_PKG_VERSION")))
}

/// GET /metrics - Prometheus exposition
pub async fn metrics(State(state): State<Arc<AppState>>) -> String {
    state.metrics_handle.render()
}
