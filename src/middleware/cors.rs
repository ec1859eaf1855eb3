// CORS configuration
// The facade is consumed by a browser frontend on another origin

use axum::Router;
use tower_http::cors::{Any, CorsLayer};

pub fn apply_cors(router: Router) -> Router {
    router.layer(
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any),
    )
}
