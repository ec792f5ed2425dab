//! Content resolution and listing for quire sites.
//!
//! A sites directory holds one subdirectory per site. Each site declares
//! its sections in `.cms/config.yaml`; a section is a subdirectory plus a
//! glob pattern selecting its documents. This crate turns
//! `(site, section, remainder)` requests into files and directory listings:
//!
//! - [`ContentRoot::resolve`]: map a request to a file, a directory or nothing
//! - [`ContentRoot::section_listing`]: top-level entries matched by a section
//! - [`list_directory`]: entries of a directory, ordered and named
//!
//! Nothing is cached. Every call re-reads the site configuration and the
//! filesystem, so edits on disk are visible on the next request.
//!
//! # Example
//!
//! ```no_run
//! # fn main() -> Result<(), quire_content::ContentError> {
//! use quire_content::{ContentRoot, Resolution};
//!
//! let root = ContentRoot::new("sites");
//! match root.resolve("blog", "posts", "", true)? {
//!     Resolution::Directory(dir) => {
//!         for entry in root.list_directory(&dir)? {
//!             println!("{} -> {}", entry.display_name, entry.relative_path);
//!         }
//!     }
//!     other => println!("{other:?}"),
//! }
//! # Ok(())
//! # }
//! ```

mod error;
pub mod front_matter;
mod listing;
mod matcher;
mod site;
mod templates;

use std::fs;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

pub use error::{ContentError, ErrorKind};
pub use front_matter::{FrontMatter, MarkdownDocument};
pub use listing::{ListEntry, ListingOrder, list_directory};
pub use matcher::match_section;
pub use site::{SITE_CONFIG_PATH, Section, Site, load_site};
pub use templates::{Block, TemplateDef, TemplateRegistry, load_templates};

use listing::{EntryInfo, is_markdown, sort_and_name};
use site::relative_path;

/// Outcome of resolving a request inside a section.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// A regular file.
    File(PathBuf),
    /// A directory requested with a trailing separator; ready to list.
    Directory(PathBuf),
    /// A directory requested without a trailing separator. The boundary
    /// should redirect to the same path with `/` appended.
    RedirectToDirectory(PathBuf),
    /// Nothing exists at the path.
    Missing(PathBuf),
}

/// Kind of a file's content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContentKind {
    /// Markdown document with optional front matter.
    Markdown,
    /// Any other file, with its guessed MIME type.
    Other(String),
}

/// A file read from a section.
#[derive(Debug)]
pub struct FileContent {
    /// Content kind.
    pub kind: ContentKind,
    /// Raw file bytes.
    pub bytes: Vec<u8>,
    /// Last modification time.
    pub modified: SystemTime,
}

/// Entries matched by a section.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SectionListing {
    /// Section label.
    pub label: String,
    /// Matched top-level entries, sorted and named.
    pub entries: Vec<ListEntry>,
}

/// Entry point to all sites below one directory.
///
/// Holds configuration only; every method reads the filesystem afresh,
/// so a single instance can be shared between concurrent requests.
#[derive(Debug, Clone)]
pub struct ContentRoot {
    sites_dir: PathBuf,
    order: ListingOrder,
}

impl ContentRoot {
    /// Create a content root over `sites_dir` with the default ordering.
    pub fn new(sites_dir: impl Into<PathBuf>) -> Self {
        Self {
            sites_dir: sites_dir.into(),
            order: ListingOrder::default(),
        }
    }

    /// Set the listing order.
    #[must_use]
    pub fn with_order(mut self, order: ListingOrder) -> Self {
        self.order = order;
        self
    }

    /// Directory holding the sites.
    #[must_use]
    pub fn sites_dir(&self) -> &Path {
        &self.sites_dir
    }

    /// Listing order in use.
    #[must_use]
    pub fn order(&self) -> ListingOrder {
        self.order
    }

    /// Load a site and its sections.
    pub fn load_site(&self, site_id: &str) -> Result<Site, ContentError> {
        load_site(&self.sites_dir, site_id)
    }

    /// List all sites, named by their configured title.
    ///
    /// A site whose configuration cannot be loaded, or whose title is empty,
    /// is listed under its directory name.
    pub fn list_sites(&self) -> Result<Vec<ListEntry>, ContentError> {
        let read =
            fs::read_dir(&self.sites_dir).map_err(|e| ContentError::io(&self.sites_dir, e))?;

        let mut ids: Vec<String> = read
            .filter_map(Result::ok)
            .filter(|entry| entry.file_type().is_ok_and(|t| t.is_dir()))
            .map(|entry| entry.file_name().to_string_lossy().into_owned())
            .filter(|name| !name.starts_with('.'))
            .collect();
        ids.sort_unstable_by(|a, b| a.as_bytes().cmp(b.as_bytes()));

        Ok(ids
            .into_iter()
            .map(|id| {
                let title = match self.load_site(&id) {
                    Ok(site) => site.title().to_owned(),
                    Err(e) => {
                        tracing::warn!(site = %id, error = %e, "Cannot load site configuration");
                        String::new()
                    }
                };
                ListEntry {
                    display_name: if title.is_empty() { id.clone() } else { title },
                    relative_path: id,
                }
            })
            .collect())
    }

    /// Resolve `remainder` inside a site's section.
    ///
    /// `trailing_slash` tells whether the incoming request path ended with
    /// a separator; directories requested without one resolve to
    /// [`Resolution::RedirectToDirectory`]. A path that does not exist is
    /// [`Resolution::Missing`], not an error.
    pub fn resolve(
        &self,
        site_id: &str,
        section_key: &str,
        remainder: &str,
        trailing_slash: bool,
    ) -> Result<Resolution, ContentError> {
        let site = self.load_site(site_id)?;
        let section = site.require_section(section_key)?;
        let relative = relative_path(remainder)
            .ok_or_else(|| ContentError::InvalidPath(remainder.to_owned()))?;
        let path = site.section_root(section).join(relative);

        match fs::metadata(&path) {
            Ok(meta) if meta.is_dir() => Ok(if trailing_slash {
                Resolution::Directory(path)
            } else {
                Resolution::RedirectToDirectory(path)
            }),
            // `file/` names nothing, as stat on it would report.
            Ok(_) if trailing_slash => Ok(Resolution::Missing(path)),
            Ok(_) => Ok(Resolution::File(path)),
            Err(e)
                if matches!(
                    e.kind(),
                    std::io::ErrorKind::NotFound | std::io::ErrorKind::NotADirectory
                ) =>
            {
                Ok(Resolution::Missing(path))
            }
            Err(e) => Err(ContentError::io(path, e)),
        }
    }

    /// Top-level entries of a section that contain documents matching its
    /// pattern, sorted and named like a directory listing.
    pub fn section_listing(
        &self,
        site_id: &str,
        section_key: &str,
    ) -> Result<SectionListing, ContentError> {
        let site = self.load_site(site_id)?;
        let section = site.require_section(section_key)?;
        let root = site.section_root(section);

        let entries = match_section(&root, section)?
            .into_iter()
            .filter_map(|name| {
                let bare = name.trim_end_matches('/').to_owned();
                EntryInfo::stat(&root.join(&bare), bare)
            })
            .collect();

        Ok(SectionListing {
            label: section.label.clone(),
            entries: sort_and_name(&root, entries, self.order),
        })
    }

    /// List a directory with this root's ordering.
    pub fn list_directory(&self, dir: &Path) -> Result<Vec<ListEntry>, ContentError> {
        list_directory(dir, self.order)
    }

    /// Read a resolved file.
    pub fn read_file(&self, path: &Path) -> Result<FileContent, ContentError> {
        let modified = fs::metadata(path)
            .and_then(|m| m.modified())
            .map_err(|e| ContentError::io(path, e))?;
        let bytes = fs::read(path).map_err(|e| ContentError::io(path, e))?;

        let name = path.file_name().map(|n| n.to_string_lossy()).unwrap_or_default();
        let kind = if is_markdown(&name) {
            ContentKind::Markdown
        } else {
            ContentKind::Other(mime_guess::from_path(path).first_or_octet_stream().to_string())
        };

        Ok(FileContent {
            kind,
            bytes,
            modified,
        })
    }
}
