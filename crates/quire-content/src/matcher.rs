//! Section matching.
//!
//! Expands a section's glob pattern under the section directory and reduces
//! the matches to the unique top-level names they live under, so that
//! `2023/a.md` and `2023/b.md` collapse into a single `2023/` entry.

use std::collections::HashSet;
use std::path::{Component, Path, PathBuf};

use glob::{MatchOptions, Pattern};

use crate::error::ContentError;
use crate::site::Section;

/// `*` never crosses a separator and never matches a leading dot.
const MATCH_OPTIONS: MatchOptions = MatchOptions {
    case_sensitive: true,
    require_literal_separator: true,
    require_literal_leading_dot: true,
};

/// Return the top-level names under `section_root` that contain a match.
///
/// Names are unique and keep the order of their first match. Directory
/// names carry a trailing `/`.
pub fn match_section(section_root: &Path, section: &Section) -> Result<Vec<String>, ContentError> {
    let root = section_root
        .to_str()
        .ok_or_else(|| ContentError::InvalidPath(section_root.display().to_string()))?;
    let pattern = format!(
        "{}/{}",
        Pattern::escape(root.trim_end_matches('/')),
        section.full_pattern()
    );

    let paths = glob::glob_with(&pattern, MATCH_OPTIONS).map_err(|source| {
        ContentError::InvalidPattern {
            pattern: section.full_pattern(),
            source,
        }
    })?;

    let mut seen = HashSet::new();
    let mut names = Vec::new();
    for entry in paths {
        let path = match entry {
            Ok(path) => path,
            Err(e) => {
                tracing::debug!(error = %e, "Skipping unreadable match");
                continue;
            }
        };
        if let Some(name) = top_level_name(section_root, &path)
            && seen.insert(name.clone())
        {
            names.push(name);
        }
    }

    Ok(names)
}

/// First component of `path` below `root`, with `/` appended for directories.
///
/// `glob` drops a leading `./` from its results, so both sides are compared
/// without `.` components.
fn top_level_name(root: &Path, path: &Path) -> Option<String> {
    let stripped = without_cur_dir(path);
    let relative = stripped.strip_prefix(without_cur_dir(root)).ok()?;
    let mut components = relative.components();
    let Some(Component::Normal(first)) = components.next() else {
        return None;
    };
    let first = first.to_string_lossy();

    // A nested match means `first` is a directory; a direct match may be one too.
    if components.next().is_some() || path.is_dir() {
        Some(format!("{first}/"))
    } else {
        Some(first.into_owned())
    }
}

fn without_cur_dir(path: &Path) -> PathBuf {
    path.components()
        .filter(|c| !matches!(c, Component::CurDir))
        .collect()
}
