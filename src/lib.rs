// Colloquium - multi-agent research assistant service

pub mod agents;
pub mod config;
pub mod db;
pub mod llm;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod search;
pub mod types;
pub mod utils;

// Re-exports for convenience
pub use config::Config;
pub use models::AppState;
// Note: Import specific items from types module instead of glob to avoid name conflicts
// e.g., use colloquium::types::{LlmRequest, LlmResponse, AppResult};

pub fn create_router(state: AppState) -> axum::Router {
    routes::create_router(state)
}
