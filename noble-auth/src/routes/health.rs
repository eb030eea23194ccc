use axum::Json;
use noble_shared::types::api::HealthResponse;

pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse::healthy("noble-auth", env!("CARGO_PKG_VERSION")))
}
