//! API Routes
//!
//! This module organizes all HTTP endpoints for the application:
//! - `/api/research` - Full research workflow
//! - `/api/explain` - Concept explanation
//! - `/api/check-paper` - Formatting review
//! - `/api/submit-paper`, `/api/submission/{id}` - Submissions
//! - `/api/health` - Health checks

pub mod health;
pub mod research;
pub mod submissions;

use crate::middleware::apply_cors;
use crate::models::AppState;
use axum::Router;
use tower_http::trace::TraceLayer;
use tracing::info;

/// Create the main application router
pub fn create_router(state: AppState) -> Router {
    info!("Creating application router");

    let api_router = Router::new()
        .merge(research::router(state.clone()))
        .merge(submissions::router(state))
        .merge(health::router());

    apply_cors(api_router.layer(TraceLayer::new_for_http()))
}
