//! Configuration management for quire.
//!
//! Parses `quire.toml` with serde and discovers the file by walking up from
//! the current directory. Values from the command line are layered on top
//! through [`CliSettings`].
//!
//! `server.host` and `content.sites_dir` support `${VAR}` and
//! `${VAR:-default}` expansion.
//!
//! This is the process-level configuration only. Per-site configuration
//! (`<site>/.cms/config.yaml`) is read by `quire-content` on every request.

mod expand;

use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Configuration filename to search for.
const CONFIG_FILENAME: &str = "quire.toml";

/// CLI settings that override configuration file values.
///
/// Only `Some` fields override the loaded config.
#[derive(Debug, Default)]
pub struct CliSettings {
    /// Override server host.
    pub host: Option<String>,
    /// Override server port.
    pub port: Option<u16>,
    /// Override the sites directory.
    pub sites_dir: Option<PathBuf>,
    /// Override listing order.
    pub order: Option<ListingOrderConfig>,
}

/// Application configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Server configuration.
    pub server: ServerConfig,
    /// Content configuration as written in TOML (relative paths).
    content: ContentConfigRaw,

    /// Resolved content configuration (set after loading).
    #[serde(skip)]
    pub content_resolved: ContentConfig,
    /// Path to the config file (set after loading).
    #[serde(skip)]
    pub config_path: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self::default_with_base(Path::new("."))
    }
}

/// Server configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Server host address.
    pub host: String,
    /// Server port.
    pub port: u16,
    /// Send permissive CORS headers so a separately hosted frontend can call the API.
    pub cors: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_owned(),
            port: 4120,
            cors: true,
        }
    }
}

/// Directory listing order.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ListingOrderConfig {
    /// Directories first, newest first, then by name.
    #[default]
    Modified,
    /// Directories first, then by name.
    Name,
}

#[derive(Debug, Deserialize, Default)]
#[serde(default)]
struct ContentConfigRaw {
    sites_dir: Option<String>,
    order: Option<ListingOrderConfig>,
}

/// Resolved content configuration with absolute paths.
#[derive(Debug, Default)]
pub struct ContentConfig {
    /// Directory holding one subdirectory per site.
    pub sites_dir: PathBuf,
    /// Ordering applied to directory listings.
    pub order: ListingOrderConfig,
}

/// Configuration error.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// File not found.
    #[error("Configuration file not found: {}", .0.display())]
    NotFound(PathBuf),
    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// TOML parsing error.
    #[error("TOML parse error: {0}")]
    Parse(#[from] toml::de::Error),
    /// Validation error.
    #[error("Configuration error: {0}")]
    Validation(String),
    /// Environment variable error during expansion.
    #[error("Environment variable error in {field}: {message}")]
    EnvVar {
        /// Config field path (e.g. `server.host`).
        field: String,
        /// What went wrong.
        message: String,
    },
}

impl Config {
    /// Load configuration from file with optional CLI settings.
    ///
    /// With an explicit `config_path` that file must exist. Otherwise
    /// `quire.toml` is searched in the current directory and its parents,
    /// and defaults are used when none is found.
    pub fn load(
        config_path: Option<&Path>,
        cli_settings: Option<&CliSettings>,
    ) -> Result<Self, ConfigError> {
        let mut config = if let Some(path) = config_path {
            if !path.exists() {
                return Err(ConfigError::NotFound(path.to_path_buf()));
            }
            Self::load_from_file(path)?
        } else if let Some(discovered) = Self::discover_config() {
            Self::load_from_file(&discovered)?
        } else {
            Self::default_with_cwd()
        };

        if let Some(settings) = cli_settings {
            config.apply_cli_settings(settings);
        }

        Ok(config)
    }

    fn apply_cli_settings(&mut self, settings: &CliSettings) {
        if let Some(host) = &settings.host {
            self.server.host.clone_from(host);
        }
        if let Some(port) = settings.port {
            self.server.port = port;
        }
        if let Some(sites_dir) = &settings.sites_dir {
            self.content_resolved.sites_dir.clone_from(sites_dir);
        }
        if let Some(order) = settings.order {
            self.content_resolved.order = order;
        }
    }

    fn discover_config() -> Option<PathBuf> {
        let mut current = std::env::current_dir().ok()?;
        loop {
            let candidate = current.join(CONFIG_FILENAME);
            if candidate.exists() {
                return Some(candidate);
            }
            if !current.pop() {
                return None;
            }
        }
    }

    fn default_with_cwd() -> Self {
        let cwd = std::env::current_dir().unwrap_or_default();
        Self::default_with_base(&cwd)
    }

    fn default_with_base(base: &Path) -> Self {
        Self {
            server: ServerConfig::default(),
            content: ContentConfigRaw::default(),
            content_resolved: ContentConfig {
                sites_dir: base.join("sites"),
                order: ListingOrderConfig::default(),
            },
            config_path: None,
        }
    }

    fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let mut config: Self = toml::from_str(&content)?;

        config.expand_env_vars()?;

        let config_dir = path.parent().unwrap_or(Path::new("."));
        config.resolve_paths(config_dir);
        config.config_path = Some(path.to_path_buf());

        config.validate()?;

        Ok(config)
    }

    /// Validate configuration values.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.server.host.is_empty() {
            return Err(ConfigError::Validation(
                "server.host cannot be empty".to_owned(),
            ));
        }
        if self.server.port == 0 {
            return Err(ConfigError::Validation(
                "server.port cannot be 0".to_owned(),
            ));
        }
        Ok(())
    }

    fn expand_env_vars(&mut self) -> Result<(), ConfigError> {
        self.server.host = expand::expand_env(&self.server.host, "server.host")?;
        if let Some(ref dir) = self.content.sites_dir {
            self.content.sites_dir = Some(expand::expand_env(dir, "content.sites_dir")?);
        }
        Ok(())
    }

    /// Resolve relative paths against the config file's directory.
    fn resolve_paths(&mut self, config_dir: &Path) {
        self.content_resolved = ContentConfig {
            sites_dir: config_dir.join(self.content.sites_dir.as_deref().unwrap_or("sites")),
            order: self.content.order.unwrap_or_default(),
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_default_config() {
        let config = Config::default_with_base(Path::new("/srv"));
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.server.port, 4120);
        assert!(config.server.cors);
        assert_eq!(config.content_resolved.sites_dir, PathBuf::from("/srv/sites"));
        assert_eq!(config.content_resolved.order, ListingOrderConfig::Modified);
    }

    #[test]
    fn test_parse_empty_config() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config.server.port, 4120);
        assert!(config.content.sites_dir.is_none());
    }

    #[test]
    fn test_parse_full_config() {
        let toml = r#"
[server]
host = "0.0.0.0"
port = 9000
cors = false

[content]
sites_dir = "content/sites"
order = "name"
"#;
        let mut config: Config = toml::from_str(toml).unwrap();
        config.resolve_paths(Path::new("/project"));

        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.server.port, 9000);
        assert!(!config.server.cors);
        assert_eq!(
            config.content_resolved.sites_dir,
            PathBuf::from("/project/content/sites")
        );
        assert_eq!(config.content_resolved.order, ListingOrderConfig::Name);
    }

    #[test]
    fn test_parse_unknown_order_fails() {
        let result: Result<Config, _> = toml::from_str("[content]\norder = \"size\"\n");
        assert!(result.is_err());
    }

    #[test]
    fn test_validate_rejects_zero_port() {
        let mut config = Config::default_with_base(Path::new("/srv"));
        config.server.port = 0;
        let err = config.validate().unwrap_err();
        assert!(matches!(err, ConfigError::Validation(_)));
        assert!(err.to_string().contains("server.port"));
    }

    #[test]
    fn test_validate_rejects_empty_host() {
        let mut config = Config::default_with_base(Path::new("/srv"));
        config.server.host.clear();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_apply_cli_settings() {
        let mut config = Config::default_with_base(Path::new("/srv"));
        config.apply_cli_settings(&CliSettings {
            port: Some(8080),
            sites_dir: Some(PathBuf::from("/data/sites")),
            order: Some(ListingOrderConfig::Name),
            ..Default::default()
        });

        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.content_resolved.sites_dir, PathBuf::from("/data/sites"));
        assert_eq!(config.content_resolved.order, ListingOrderConfig::Name);
    }

    #[test]
    fn test_load_explicit_missing_file() {
        let err = Config::load(Some(Path::new("/nonexistent/quire.toml")), None).unwrap_err();
        assert!(matches!(err, ConfigError::NotFound(_)));
    }

    #[test]
    fn test_load_from_file_resolves_relative_to_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILENAME);
        std::fs::write(&path, "[content]\nsites_dir = \"pages\"\n").unwrap();

        let config = Config::load(Some(&path), None).unwrap();

        assert_eq!(config.content_resolved.sites_dir, dir.path().join("pages"));
        assert_eq!(config.config_path, Some(path));
    }

    #[test]
    fn test_load_from_file_invalid_toml() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILENAME);
        std::fs::write(&path, "[server\nport = 1").unwrap();

        let err = Config::load(Some(&path), None).unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_expand_env_vars_sites_dir() {
        // SAFETY: variable name is unique to this test
        unsafe {
            std::env::set_var("QUIRE_TEST_ROOT", "/var/quire");
        }
        let mut config: Config =
            toml::from_str("[content]\nsites_dir = \"${QUIRE_TEST_ROOT}/sites\"\n").unwrap();
        config.expand_env_vars().unwrap();
        config.resolve_paths(Path::new("/ignored"));

        assert_eq!(
            config.content_resolved.sites_dir,
            PathBuf::from("/var/quire/sites")
        );
        unsafe {
            std::env::remove_var("QUIRE_TEST_ROOT");
        }
    }
}
