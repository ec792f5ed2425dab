//! Section listing endpoint.
//!
//! Lists the top-level entries of a section that contain documents
//! matching the section's pattern.

use std::sync::Arc;

use axum::Json;
use axum::extract::{Path, State};
use quire_content::ListEntry;
use serde::Serialize;

use crate::error::ServerError;
use crate::state::AppState;

/// Response for GET /{site}/{section}.
#[derive(Serialize)]
pub(crate) struct SectionResponse {
    /// Section label.
    label: String,
    /// Matched entries.
    files: Vec<ListEntry>,
}

/// Handle GET /{site}/{section}.
pub(crate) async fn get_section(
    Path((site, section)): Path<(String, String)>,
    State(state): State<Arc<AppState>>,
) -> Result<Json<SectionResponse>, ServerError> {
    let listing = state.content.section_listing(&site, &section)?;
    Ok(Json(SectionResponse {
        label: listing.label,
        files: listing.entries,
    }))
}
