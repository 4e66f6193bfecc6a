use axum::{Router, http::HeaderValue, routing::get};
use tower_http::{
    cors::{AllowOrigin, Any, CorsLayer},
    trace::TraceLayer,
};

use crate::{Deployment, routes};

pub fn router(deployment: Deployment, allowed_origins: &[String]) -> Router {
    Router::new()
        .route("/health", get(routes::health::health_check))
        .merge(routes::tasks::router(&deployment))
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer(allowed_origins))
        .with_state(deployment)
}

/// Any origin when `allowed_origins` is empty, otherwise exactly the listed ones.
fn cors_layer(allowed_origins: &[String]) -> CorsLayer {
    let cors = CorsLayer::new().allow_methods(Any).allow_headers(Any);
    if allowed_origins.is_empty() {
        return cors.allow_origin(Any);
    }

    let origins: Vec<HeaderValue> = allowed_origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!("Ignoring invalid CORS origin '{origin}'");
                None
            }
        })
        .collect();
    cors.allow_origin(AllowOrigin::list(origins))
}
