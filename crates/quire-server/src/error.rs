//! Error types for the HTTP server.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use quire_content::{ContentError, ErrorKind};
use serde_json::json;

/// Server error type.
#[derive(Debug, thiserror::Error)]
pub(crate) enum ServerError {
    /// Nothing exists at the requested path.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Error from the content engine.
    #[error(transparent)]
    Content(#[from] ContentError),
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let (status, body) = match &self {
            Self::NotFound(path) => (
                StatusCode::NOT_FOUND,
                json!({"error": "Not found", "path": path}),
            ),
            Self::Content(e) => match e.kind() {
                ErrorKind::NotFound | ErrorKind::SectionNotFound => {
                    tracing::debug!(error = %e, "Not found");
                    (StatusCode::NOT_FOUND, json!({"error": e.to_string()}))
                }
                ErrorKind::Config | ErrorKind::Internal => {
                    tracing::error!(error = %e, "Request failed");
                    (
                        StatusCode::INTERNAL_SERVER_ERROR,
                        json!({"error": "Internal server error"}),
                    )
                }
            },
        };

        (status, axum::Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        let cases = [
            (ServerError::NotFound("/blog/posts/x".to_owned()), StatusCode::NOT_FOUND),
            (
                ContentError::SiteNotFound("shop".to_owned()).into(),
                StatusCode::NOT_FOUND,
            ),
            (
                ContentError::SectionNotFound {
                    site: "blog".to_owned(),
                    section: "drafts".to_owned(),
                }
                .into(),
                StatusCode::NOT_FOUND,
            ),
            (
                ContentError::SiteConfig {
                    site: "blog".to_owned(),
                    message: "bad".to_owned(),
                }
                .into(),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];

        for (error, status) in cases {
            assert_eq!(error.into_response().status(), status);
        }
    }
}
