//! File and directory endpoint.
//!
//! Resolves the remainder of the request path inside a section and returns
//! either the file or a listing of the directory.

use std::path::Path as FsPath;
use std::sync::Arc;

use axum::Json;
use axum::extract::{Path, State};
use axum::http::{Uri, header};
use axum::response::{IntoResponse, Redirect, Response};
use chrono::{DateTime, Utc};
use quire_content::front_matter::parse_document;
use quire_content::{ContentKind, ContentRoot, ListEntry, Resolution};
use serde::Serialize;

use crate::error::ServerError;
use crate::state::AppState;

/// Directory listing response.
#[derive(Serialize)]
struct DirResponse {
    kind: &'static str,
    data: Vec<ListEntry>,
}

/// Markdown document response.
#[derive(Serialize)]
struct MarkdownResponse {
    kind: &'static str,
    meta: serde_json::Map<String, serde_json::Value>,
    content: String,
}

/// Handle GET /{site}/{section}/.
pub(crate) async fn get_section_root(
    Path((site, section)): Path<(String, String)>,
    State(state): State<Arc<AppState>>,
    uri: Uri,
) -> Result<Response, ServerError> {
    serve(&state, &uri, &site, &section, "")
}

/// Handle GET /{site}/{section}/{*path}.
pub(crate) async fn get_file(
    Path((site, section, path)): Path<(String, String, String)>,
    State(state): State<Arc<AppState>>,
    uri: Uri,
) -> Result<Response, ServerError> {
    serve(&state, &uri, &site, &section, &path)
}

fn serve(
    state: &AppState,
    uri: &Uri,
    site: &str,
    section: &str,
    remainder: &str,
) -> Result<Response, ServerError> {
    let trailing_slash = uri.path().ends_with('/');

    match state
        .content
        .resolve(site, section, remainder, trailing_slash)?
    {
        Resolution::File(path) => file_response(&state.content, &path),
        Resolution::Directory(path) => Ok(Json(DirResponse {
            kind: "dir",
            data: state.content.list_directory(&path)?,
        })
        .into_response()),
        Resolution::RedirectToDirectory(_) => {
            Ok(Redirect::permanent(&format!("{}/", uri.path())).into_response())
        }
        Resolution::Missing(_) => Err(ServerError::NotFound(uri.path().to_owned())),
    }
}

fn file_response(content: &ContentRoot, path: &FsPath) -> Result<Response, ServerError> {
    let file = content.read_file(path)?;
    let last_modified = http_date(file.modified.into());

    let response = match file.kind {
        ContentKind::Markdown => {
            let document = parse_document(&String::from_utf8_lossy(&file.bytes));
            (
                [(header::LAST_MODIFIED, last_modified)],
                Json(MarkdownResponse {
                    kind: "md",
                    meta: document.meta,
                    content: document.body,
                }),
            )
                .into_response()
        }
        ContentKind::Other(mime) => (
            [
                (header::CONTENT_TYPE, mime),
                (header::LAST_MODIFIED, last_modified),
            ],
            file.bytes,
        )
            .into_response(),
    };

    Ok(response)
}

/// Format a timestamp as an HTTP date.
fn http_date(time: DateTime<Utc>) -> String {
    time.format("%a, %d %b %Y %H:%M:%S GMT").to_string()
}
