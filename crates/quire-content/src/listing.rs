//! Directory listing order and display names.
//!
//! Entries are ordered directories first, then (with
//! [`ListingOrder::Modified`]) newest first, then by byte-wise name where a
//! name sorts before every longer name it prefixes. Markdown files are
//! displayed under the `title` of their front matter when it has one.

use std::cmp::Ordering;
use std::fs;
use std::path::Path;
use std::time::SystemTime;

use serde::Serialize;

use crate::error::ContentError;
use crate::front_matter::load_front_matter;

/// Ordering applied to directory listings.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum ListingOrder {
    /// Directories first, most recently modified first, then by name.
    #[default]
    Modified,
    /// Directories first, then by name.
    Name,
}

/// One entry of a directory listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ListEntry {
    /// Name shown to the user.
    pub display_name: String,
    /// Entry name relative to the listed directory.
    pub relative_path: String,
}

/// Filesystem facts needed to order and name an entry.
#[derive(Debug, Clone)]
pub(crate) struct EntryInfo {
    pub(crate) name: String,
    pub(crate) is_dir: bool,
    pub(crate) modified: SystemTime,
}

impl EntryInfo {
    /// Stat `path` (following symlinks) and describe it as `name`.
    ///
    /// Returns `None` if the path is gone, e.g. renamed since it was listed.
    pub(crate) fn stat(path: &Path, name: String) -> Option<Self> {
        let meta = match fs::metadata(path) {
            Ok(meta) => meta,
            Err(e) => {
                tracing::debug!(path = %path.display(), error = %e, "Skipping vanished entry");
                return None;
            }
        };
        Some(Self {
            name,
            is_dir: meta.is_dir(),
            modified: meta.modified().unwrap_or(SystemTime::UNIX_EPOCH),
        })
    }
}

/// Total order over entries.
pub(crate) fn compare_entries(a: &EntryInfo, b: &EntryInfo, order: ListingOrder) -> Ordering {
    b.is_dir
        .cmp(&a.is_dir)
        .then_with(|| match order {
            ListingOrder::Modified => b.modified.cmp(&a.modified),
            ListingOrder::Name => Ordering::Equal,
        })
        .then_with(|| a.name.as_bytes().cmp(b.name.as_bytes()))
}

/// Sort `entries` and compute their display names.
///
/// `dir` is the directory the entry names are relative to.
pub(crate) fn sort_and_name(
    dir: &Path,
    mut entries: Vec<EntryInfo>,
    order: ListingOrder,
) -> Vec<ListEntry> {
    entries.sort_by(|a, b| compare_entries(a, b, order));
    entries
        .into_iter()
        .map(|entry| ListEntry {
            display_name: display_name(dir, &entry),
            relative_path: entry.name,
        })
        .collect()
}

fn display_name(dir: &Path, entry: &EntryInfo) -> String {
    if entry.is_dir {
        return format!("{}/", entry.name);
    }
    if is_markdown(&entry.name) {
        let front_matter = load_front_matter(&dir.join(&entry.name));
        if !front_matter.title.is_empty() {
            return front_matter.title;
        }
    }
    entry.name.clone()
}

/// Whether `name` is a markdown document.
pub(crate) fn is_markdown(name: &str) -> bool {
    Path::new(name).extension().is_some_and(|ext| ext == "md")
}

/// List the immediate entries of `dir`, sorted and named.
///
/// Hidden entries are skipped. Subdirectories are not descended into.
pub fn list_directory(dir: &Path, order: ListingOrder) -> Result<Vec<ListEntry>, ContentError> {
    let read = fs::read_dir(dir).map_err(|e| ContentError::io(dir, e))?;

    let entries = read
        .filter_map(Result::ok)
        .filter_map(|entry| {
            let name = entry.file_name().to_string_lossy().into_owned();
            if name.starts_with('.') {
                return None;
            }
            EntryInfo::stat(&entry.path(), name)
        })
        .collect();

    Ok(sort_and_name(dir, entries, order))
}
