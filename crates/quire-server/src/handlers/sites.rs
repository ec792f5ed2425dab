//! Site list endpoint.

use std::sync::Arc;

use axum::Json;
use axum::extract::State;
use quire_content::ListEntry;

use crate::error::ServerError;
use crate::state::AppState;

/// Handle GET /.
pub(crate) async fn list_sites(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<ListEntry>>, ServerError> {
    Ok(Json(state.content.list_sites()?))
}
