//! Error types for content resolution.

use std::path::PathBuf;

/// Coarse error category used by the request boundary to pick a status code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Site, file or directory does not exist.
    NotFound,
    /// The site exists but does not declare the requested section.
    SectionNotFound,
    /// The site exists but its configuration is unusable.
    Config,
    /// Anything else (I/O failures other than a missing path).
    Internal,
}

/// Error returned by the content engine.
#[derive(Debug, thiserror::Error)]
pub enum ContentError {
    /// The site directory does not exist.
    #[error("Site not found: {0}")]
    SiteNotFound(String),

    /// The site directory exists but its configuration is missing or invalid.
    #[error("Invalid configuration for site {site}: {message}")]
    SiteConfig {
        /// Site id.
        site: String,
        /// What is wrong with the configuration.
        message: String,
    },

    /// The section key is not declared in the site configuration.
    #[error("Section not found: {site}/{section}")]
    SectionNotFound {
        /// Site id.
        site: String,
        /// Requested section key.
        section: String,
    },

    /// A section's match pattern is not a valid glob.
    #[error("Invalid match pattern {pattern:?}: {source}")]
    InvalidPattern {
        /// The full pattern that failed to compile.
        pattern: String,
        /// Underlying glob error.
        #[source]
        source: glob::PatternError,
    },

    /// A request path tries to leave its section.
    #[error("Invalid path: {0}")]
    InvalidPath(String),

    /// I/O error with path context.
    #[error("I/O error at {}: {source}", path.display())]
    Io {
        /// Path being accessed.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },
}

impl ContentError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn config(site: &str, message: impl Into<String>) -> Self {
        Self::SiteConfig {
            site: site.to_owned(),
            message: message.into(),
        }
    }

    /// Category of this error for the request boundary.
    ///
    /// A path that disappears between two filesystem calls is reported as
    /// [`ErrorKind::NotFound`], not as an internal failure.
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::SiteNotFound(_) | Self::InvalidPath(_) => ErrorKind::NotFound,
            Self::SectionNotFound { .. } => ErrorKind::SectionNotFound,
            Self::SiteConfig { .. } | Self::InvalidPattern { .. } => ErrorKind::Config,
            Self::Io { source, .. } => match source.kind() {
                std::io::ErrorKind::NotFound | std::io::ErrorKind::NotADirectory => {
                    ErrorKind::NotFound
                }
                _ => ErrorKind::Internal,
            },
        }
    }
}
