//! Application state.

use quire_content::ContentRoot;

/// State shared by all request handlers.
///
/// Read-only after startup.
pub(crate) struct AppState {
    /// Content engine over the sites directory.
    pub(crate) content: ContentRoot,
    /// Whether CORS headers are added to responses.
    pub(crate) cors: bool,
}
