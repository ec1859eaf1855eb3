use crate::models::HealthResponse;
use axum::{response::Json as ResponseJson, routing::get, Json, Router};

pub fn router() -> Router {
    Router::new().route("/api/health", get(health_check))
}

async fn health_check() -> ResponseJson<HealthResponse> {
    Json(HealthResponse {
        status: "running".to_string(),
        message: "Colloquium research assistant API".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        timestamp: chrono::Utc::now().to_rfc3339(),
    })
}
