//! CORS for the single-page frontend.

use axum::http::{HeaderValue, Method, header::CONTENT_TYPE};
use tower_http::cors::CorsLayer;
use tracing::warn;

/// Allow the configured frontend origin to call the API with cookies.
///
/// Without an origin (or with an unparseable one) no cross-origin access is
/// granted and the frontend must be served from the same origin.
#[must_use]
pub fn cors_layer(frontend_origin: Option<&str>) -> CorsLayer {
    let Some(origin) = frontend_origin else {
        return CorsLayer::new();
    };

    match HeaderValue::from_str(origin) {
        Ok(origin) => CorsLayer::new()
            .allow_origin(origin)
            .allow_credentials(true)
            .allow_methods([Method::GET, Method::POST])
            .allow_headers([CONTENT_TYPE]),
        Err(_) => {
            warn!(origin, "Ignoring invalid frontend origin");
            CorsLayer::new()
        }
    }
}
