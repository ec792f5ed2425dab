//! Response header layers.

use axum::http::HeaderValue;
use axum::http::header::HeaderName;
use tower_http::cors::CorsLayer;
use tower_http::set_header::SetResponseHeaderLayer;

/// Layer that adds `X-Content-Type-Options: nosniff`.
///
/// Raw section files are served with a guessed MIME type; browsers must
/// not second-guess it.
pub(crate) fn content_type_options_layer() -> SetResponseHeaderLayer<HeaderValue> {
    SetResponseHeaderLayer::overriding(
        HeaderName::from_static("x-content-type-options"),
        HeaderValue::from_static("nosniff"),
    )
}

/// Permissive CORS for a frontend served from another origin.
pub(crate) fn cors_layer() -> CorsLayer {
    CorsLayer::permissive()
}
