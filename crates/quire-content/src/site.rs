//! Site configuration and section registry.
//!
//! Each site is a directory under the sites root with its configuration at
//! [`SITE_CONFIG_PATH`]:
//!
//! ```yaml
//! title: My Blog
//! sections:
//!   - label: Posts
//!     path: posts
//!     match: "**/*"
//!     extension: .md
//!     templates: [post]
//! ```
//!
//! A [`Site`] is loaded fresh for every request and never mutated.

use std::collections::HashSet;
use std::path::{Component, Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::ContentError;

/// Directory holding per-site configuration.
pub const CMS_DIR: &str = ".cms";

/// Site configuration file, relative to the site root.
pub const SITE_CONFIG_PATH: &str = ".cms/config.yaml";

/// A glob-matched subtree of a site.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Section {
    /// Human-facing label.
    #[serde(default)]
    pub label: String,
    /// Subdirectory relative to the site root; also the section key.
    pub path: String,
    /// Glob pattern relative to the section directory, without the extension.
    #[serde(rename = "match", default = "default_pattern")]
    pub pattern: String,
    /// Suffix appended to `pattern` (e.g. `.md`).
    #[serde(default)]
    pub extension: String,
    /// Template identifiers used to present documents of this section.
    #[serde(default)]
    pub templates: Vec<String>,
}

fn default_pattern() -> String {
    "*".to_owned()
}

impl Section {
    /// Glob pattern as written in the config, extension included.
    #[must_use]
    pub fn full_pattern(&self) -> String {
        format!("{}{}", self.pattern, self.extension)
    }
}

/// On-disk shape of [`SITE_CONFIG_PATH`].
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct SiteConfigFile {
    title: String,
    sections: Vec<Section>,
}

/// One site and its declared sections.
#[derive(Debug, Clone)]
pub struct Site {
    id: String,
    title: String,
    root: PathBuf,
    sections: Vec<Section>,
}

impl Site {
    /// Directory name of the site.
    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Title from the site configuration.
    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Absolute site directory.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Sections in declaration order.
    #[must_use]
    pub fn sections(&self) -> &[Section] {
        &self.sections
    }

    /// Look up a section by its key (its `path`).
    #[must_use]
    pub fn section(&self, key: &str) -> Option<&Section> {
        self.sections.iter().find(|s| s.path == key)
    }

    /// Like [`Site::section`], but a missing key is an error.
    pub fn require_section(&self, key: &str) -> Result<&Section, ContentError> {
        self.section(key)
            .ok_or_else(|| ContentError::SectionNotFound {
                site: self.id.clone(),
                section: key.to_owned(),
            })
    }

    /// Absolute directory of `section`.
    #[must_use]
    pub fn section_root(&self, section: &Section) -> PathBuf {
        self.root.join(&section.path)
    }
}

/// Load the site `site_id` from `sites_dir`.
///
/// A missing site directory yields [`ContentError::SiteNotFound`]. A site
/// directory whose configuration is missing, unparsable or declares
/// duplicate or unsafe section paths yields [`ContentError::SiteConfig`].
pub fn load_site(sites_dir: &Path, site_id: &str) -> Result<Site, ContentError> {
    if !is_site_id(site_id) {
        return Err(ContentError::SiteNotFound(site_id.to_owned()));
    }

    let root = sites_dir.join(site_id);
    match std::fs::metadata(&root) {
        Ok(meta) if meta.is_dir() => {}
        Ok(_) => return Err(ContentError::SiteNotFound(site_id.to_owned())),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            return Err(ContentError::SiteNotFound(site_id.to_owned()));
        }
        Err(e) => return Err(ContentError::io(root, e)),
    }

    let config_path = root.join(SITE_CONFIG_PATH);
    let content = std::fs::read_to_string(&config_path).map_err(|e| {
        ContentError::config(site_id, format!("cannot read {SITE_CONFIG_PATH}: {e}"))
    })?;
    let config: SiteConfigFile = serde_yaml::from_str(&content)
        .map_err(|e| ContentError::config(site_id, format!("invalid {SITE_CONFIG_PATH}: {e}")))?;

    validate_sections(site_id, &config.sections)?;

    Ok(Site {
        id: site_id.to_owned(),
        title: config.title,
        root,
        sections: config.sections,
    })
}

/// Section paths must be unique, normalized and stay inside the site.
fn validate_sections(site_id: &str, sections: &[Section]) -> Result<(), ContentError> {
    let mut seen = HashSet::new();
    for section in sections {
        let normalized = relative_path(&section.path)
            .filter(|p| !p.as_os_str().is_empty() && p.to_str() == Some(section.path.as_str()));
        let Some(normalized) = normalized else {
            return Err(ContentError::config(
                site_id,
                format!("invalid section path {:?}", section.path),
            ));
        };
        if !seen.insert(normalized) {
            return Err(ContentError::config(
                site_id,
                format!("duplicate section path {:?}", section.path),
            ));
        }
    }
    Ok(())
}

/// A site id is a single visible path component.
fn is_site_id(id: &str) -> bool {
    !id.is_empty() && !id.starts_with('.') && !id.contains(['/', '\\'])
}

/// Convert a `/`-separated request path into a relative path.
///
/// Returns `None` if any component would escape the base directory
/// (`..`, a root, or a drive prefix). `.` and empty segments are dropped.
pub(crate) fn relative_path(path: &str) -> Option<PathBuf> {
    let mut out = PathBuf::new();
    for component in Path::new(path).components() {
        match component {
            Component::Normal(part) => out.push(part),
            Component::CurDir => {}
            Component::ParentDir | Component::RootDir | Component::Prefix(_) => return None,
        }
    }
    Some(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::fs;

    fn write_site(sites: &Path, id: &str, config: &str) {
        let cms = sites.join(id).join(CMS_DIR);
        fs::create_dir_all(&cms).unwrap();
        fs::write(cms.join("config.yaml"), config).unwrap();
    }

    #[test]
    fn test_load_site() {
        let dir = tempfile::tempdir().unwrap();
        write_site(
            dir.path(),
            "blog",
            "title: My Blog\nsections:\n  - label: Posts\n    path: posts\n    match: \"**/*\"\n    extension: .md\n    templates: [post]\n",
        );

        let site = load_site(dir.path(), "blog").unwrap();

        assert_eq!(site.id(), "blog");
        assert_eq!(site.title(), "My Blog");
        assert_eq!(site.root(), dir.path().join("blog"));
        assert_eq!(
            site.sections(),
            &[Section {
                label: "Posts".to_owned(),
                path: "posts".to_owned(),
                pattern: "**/*".to_owned(),
                extension: ".md".to_owned(),
                templates: vec!["post".to_owned()],
            }]
        );
        assert_eq!(
            site.section_root(&site.sections()[0]),
            dir.path().join("blog/posts")
        );
    }

    #[test]
    fn test_section_defaults() {
        let dir = tempfile::tempdir().unwrap();
        write_site(dir.path(), "blog", "sections:\n  - path: pages\n");

        let site = load_site(dir.path(), "blog").unwrap();
        let section = site.section("pages").unwrap();

        assert_eq!(site.title(), "");
        assert_eq!(section.pattern, "*");
        assert_eq!(section.extension, "");
        assert!(section.templates.is_empty());
    }

    #[test]
    fn test_missing_site_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_site(dir.path(), "nope").unwrap_err();
        assert!(matches!(err, ContentError::SiteNotFound(ref id) if id == "nope"));
    }

    #[test]
    fn test_site_id_cannot_escape() {
        let dir = tempfile::tempdir().unwrap();
        for id in ["..", "../x", ".cms", "", "a/b"] {
            let err = load_site(dir.path(), id).unwrap_err();
            assert!(matches!(err, ContentError::SiteNotFound(_)), "{id}: {err:?}");
        }
    }

    #[test]
    fn test_missing_config_is_config_error() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir(dir.path().join("bare")).unwrap();

        let err = load_site(dir.path(), "bare").unwrap_err();
        assert!(matches!(err, ContentError::SiteConfig { .. }), "{err:?}");
    }

    #[test]
    fn test_unparsable_config_is_config_error() {
        let dir = tempfile::tempdir().unwrap();
        write_site(dir.path(), "blog", "sections: [unclosed");

        let err = load_site(dir.path(), "blog").unwrap_err();
        assert!(matches!(err, ContentError::SiteConfig { .. }), "{err:?}");
    }

    #[test]
    fn test_duplicate_section_path_rejected() {
        let dir = tempfile::tempdir().unwrap();
        write_site(
            dir.path(),
            "blog",
            "sections:\n  - path: posts\n  - path: posts\n",
        );

        let err = load_site(dir.path(), "blog").unwrap_err();
        assert!(err.to_string().contains("duplicate section path"));
    }

    #[test]
    fn test_escaping_section_path_rejected() {
        let dir = tempfile::tempdir().unwrap();
        write_site(dir.path(), "blog", "sections:\n  - path: ../other\n");

        let err = load_site(dir.path(), "blog").unwrap_err();
        assert!(err.to_string().contains("invalid section path"));
    }

    #[test]
    fn test_non_normalized_section_path_rejected() {
        for path in ["posts/", "./posts", "a//b"] {
            let dir = tempfile::tempdir().unwrap();
            write_site(dir.path(), "blog", &format!("sections:\n  - path: \"{path}\"\n"));

            let err = load_site(dir.path(), "blog").unwrap_err();
            assert!(err.to_string().contains("invalid section path"), "{path}: {err}");
        }
    }

    #[test]
    fn test_section_lookup() {
        let dir = tempfile::tempdir().unwrap();
        write_site(dir.path(), "blog", "sections:\n  - path: posts\n  - path: pages\n");
        let site = load_site(dir.path(), "blog").unwrap();

        assert!(site.section("pages").is_some());
        assert!(site.section("drafts").is_none());
        let err = site.require_section("drafts").unwrap_err();
        assert!(matches!(
            err,
            ContentError::SectionNotFound { ref section, .. } if section == "drafts"
        ));
    }

    #[test]
    fn test_relative_path() {
        assert_eq!(relative_path(""), Some(PathBuf::new()));
        assert_eq!(relative_path("a/b/"), Some(PathBuf::from("a/b")));
        assert_eq!(relative_path("./a//b"), Some(PathBuf::from("a/b")));
        assert_eq!(relative_path("a/../b"), None);
        assert_eq!(relative_path("/etc/passwd"), None);
    }
}
