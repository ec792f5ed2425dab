//! Per-site template definitions.
//!
//! Every YAML file in `<site>/.cms/templates/` defines one template, keyed
//! by its file stem. The engine only loads and hands these out; block
//! configuration is an opaque value interpreted by the presentation layer.

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ContentError;
use crate::site::{CMS_DIR, Site};

/// Template directory name inside [`CMS_DIR`].
const TEMPLATES_DIR: &str = "templates";

/// Template definitions keyed by template id.
pub type TemplateRegistry = BTreeMap<String, TemplateDef>;

/// How documents using a template are edited and displayed.
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TemplateDef {
    /// Human-facing template name.
    pub label: String,
    /// Hide the document body in the editor.
    #[serde(alias = "hidebody")]
    pub hide_body: bool,
    /// Front matter field used as the document's display name.
    #[serde(alias = "displayfield")]
    pub display_field: String,
    /// Editable blocks, in display order.
    pub blocks: Vec<Block>,
}

/// One editable front matter field.
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Block {
    /// Block kind (e.g. `text`, `date`, `list`).
    pub kind: String,
    /// Human-facing label.
    pub label: String,
    /// Front matter key the block edits.
    pub name: String,
    /// Help text.
    pub description: String,
    /// Kind-specific settings, passed through untouched.
    pub config: serde_json::Map<String, serde_json::Value>,
}

/// Load the template definitions of `site`.
///
/// A site without a templates directory has no templates. Files that are
/// not valid YAML are skipped with a warning.
pub fn load_templates(site: &Site) -> Result<TemplateRegistry, ContentError> {
    let dir = site.root().join(CMS_DIR).join(TEMPLATES_DIR);
    let entries = match std::fs::read_dir(&dir) {
        Ok(entries) => entries,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(TemplateRegistry::new()),
        Err(e) => return Err(ContentError::io(dir, e)),
    };

    let mut registry = TemplateRegistry::new();
    for entry in entries.filter_map(Result::ok) {
        let path = entry.path();
        if !is_yaml(&path) {
            continue;
        }
        let Some(key) = path.file_stem().map(|s| s.to_string_lossy().into_owned()) else {
            continue;
        };
        match read_template(&path) {
            Ok(def) => {
                registry.insert(key, def);
            }
            Err(message) => {
                tracing::warn!(site = site.id(), template = %key, %message, "Skipping template");
            }
        }
    }
    Ok(registry)
}

fn read_template(path: &Path) -> Result<TemplateDef, String> {
    let content = std::fs::read_to_string(path).map_err(|e| e.to_string())?;
    if content.trim().is_empty() {
        return Ok(TemplateDef::default());
    }
    serde_yaml::from_str(&content).map_err(|e| e.to_string())
}

fn is_yaml(path: &Path) -> bool {
    path.extension()
        .is_some_and(|ext| ext == "yaml" || ext == "yml")
}
