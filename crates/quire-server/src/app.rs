//! Router construction.

use std::sync::Arc;

use axum::Router;
use axum::routing::get;
use tower_http::trace::TraceLayer;

use crate::handlers;
use crate::middleware::headers;
use crate::state::AppState;

/// Create the application router.
pub(crate) fn create_router(state: Arc<AppState>) -> Router {
    let cors = state.cors;

    let mut router = Router::new()
        .route("/", get(handlers::sites::list_sites))
        .route("/{site}", get(handlers::site::get_site))
        .route("/{site}/", get(handlers::site::get_site))
        .route("/{site}/{section}", get(handlers::sections::get_section))
        .route("/{site}/{section}/", get(handlers::files::get_section_root))
        .route("/{site}/{section}/{*path}", get(handlers::files::get_file))
        .layer(headers::content_type_options_layer())
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    if cors {
        router = router.layer(headers::cors_layer());
    }

    router
}
