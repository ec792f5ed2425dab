//! YAML front matter embedded at the top of markdown documents.
//!
//! A document starts with front matter when its first line is exactly
//! [`DELIMITER`]; the block ends at the next line that is exactly
//! [`DELIMITER`]. Everything after the closing line is the body.
//!
//! Reading front matter is best-effort: an unreadable file, a missing
//! closing delimiter or invalid YAML all yield an empty [`FrontMatter`].

use std::path::Path;

use serde::Deserialize;

/// Line that opens and closes a front matter block.
pub const DELIMITER: &str = "---";

/// Front matter fields the engine reads. Other fields are ignored.
#[derive(Debug, Default, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct FrontMatter {
    /// Declared document title; empty when absent.
    pub title: String,
}

/// A markdown document split into metadata and body.
#[derive(Debug, Default, PartialEq)]
pub struct MarkdownDocument {
    /// All front matter fields, as an untyped map.
    pub meta: serde_json::Map<String, serde_json::Value>,
    /// Document text after the front matter block.
    pub body: String,
}

/// Split `content` into the raw front matter YAML and the body.
///
/// Returns `(None, content)` when the document has no complete block.
pub fn split_front_matter(content: &str) -> (Option<&str>, &str) {
    let text = content.strip_prefix('\u{feff}').unwrap_or(content);

    let (first, rest) = text.split_once('\n').unwrap_or((text, ""));
    if first.trim_end_matches('\r') != DELIMITER {
        return (None, content);
    }

    let mut offset = 0;
    for line in rest.split_inclusive('\n') {
        if line.trim_end_matches(['\r', '\n']) == DELIMITER {
            return (Some(&rest[..offset]), &rest[offset + line.len()..]);
        }
        offset += line.len();
    }

    (None, content)
}

/// Parse the front matter of `content`, falling back to the default.
pub fn parse_front_matter(content: &str) -> FrontMatter {
    let (Some(yaml), _) = split_front_matter(content) else {
        return FrontMatter::default();
    };
    let trimmed = yaml.trim();
    if trimmed.is_empty() {
        return FrontMatter::default();
    }
    serde_yaml::from_str(trimmed).unwrap_or_else(|e| {
        tracing::debug!(error = %e, "Ignoring malformed front matter");
        FrontMatter::default()
    })
}

/// Read the front matter of the file at `path`.
///
/// Never fails: read errors are logged at debug level and produce an empty
/// [`FrontMatter`], so a single broken document cannot break a listing.
pub fn load_front_matter(path: &Path) -> FrontMatter {
    match std::fs::read_to_string(path) {
        Ok(content) => parse_front_matter(&content),
        Err(e) => {
            tracing::debug!(path = %path.display(), error = %e, "Cannot read front matter");
            FrontMatter::default()
        }
    }
}

/// Split a markdown document into its front matter map and body.
///
/// Front matter that is not a YAML mapping is dropped.
pub fn parse_document(content: &str) -> MarkdownDocument {
    let (yaml, body) = split_front_matter(content);
    let meta = yaml
        .map(str::trim)
        .filter(|y| !y.is_empty())
        .and_then(|y| match serde_yaml::from_str(y) {
            Ok(map) => Some(map),
            Err(e) => {
                tracing::debug!(error = %e, "Ignoring malformed front matter");
                None
            }
        })
        .unwrap_or_default();

    MarkdownDocument {
        meta,
        body: body.trim().to_owned(),
    }
}
