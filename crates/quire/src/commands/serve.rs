//! `quire serve` command implementation.

use std::path::PathBuf;

use clap::{Args, ValueEnum};
use quire_config::{CliSettings, Config, ListingOrderConfig};
use quire_server::{run_server, server_config_from_quire_config};

use crate::error::CliError;
use crate::output::Output;

/// Directory listing order accepted on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub(crate) enum OrderArg {
    /// Directories first, newest first, then by name.
    Modified,
    /// Directories first, then by name.
    Name,
}

impl From<OrderArg> for ListingOrderConfig {
    fn from(order: OrderArg) -> Self {
        match order {
            OrderArg::Modified => Self::Modified,
            OrderArg::Name => Self::Name,
        }
    }
}

/// Arguments for the serve command.
#[derive(Args)]
pub(crate) struct ServeArgs {
    /// Path to configuration file (default: auto-discover quire.toml).
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Directory holding one subdirectory per site (overrides config).
    #[arg(short, long, env = "QUIRE_SITES_DIR")]
    sites_dir: Option<PathBuf>,

    /// Host to bind to (overrides config).
    #[arg(long)]
    host: Option<String>,

    /// Port to bind to (overrides config).
    #[arg(short, long)]
    port: Option<u16>,

    /// Directory listing order (overrides config).
    #[arg(long, value_enum)]
    order: Option<OrderArg>,

    /// Enable verbose output (request and startup logs).
    #[arg(short, long)]
    pub verbose: bool,
}

impl ServeArgs {
    /// Execute the serve command.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration fails or the server fails to start.
    pub(crate) async fn execute(self) -> Result<(), CliError> {
        let output = Output::new();

        let cli_settings = CliSettings {
            host: self.host,
            port: self.port,
            sites_dir: self.sites_dir,
            order: self.order.map(Into::into),
        };

        let config = Config::load(self.config.as_deref(), Some(&cli_settings))?;

        let sites_dir = &config.content_resolved.sites_dir;
        if !sites_dir.is_dir() {
            return Err(CliError::Validation(format!(
                "Sites directory not found: {}",
                sites_dir.display()
            )));
        }

        output.highlight(&format!(
            "quire {} listening on http://{}:{}",
            env!("CARGO_PKG_VERSION"),
            config.server.host,
            config.server.port
        ));
        output.info(&format!("Sites directory: {}", sites_dir.display()));
        if let Some(path) = &config.config_path {
            output.info(&format!("Config file: {}", path.display()));
        }

        tracing::info!(
            sites_dir = %sites_dir.display(),
            order = ?config.content_resolved.order,
            cors = config.server.cors,
            "Configuration loaded"
        );

        let server_config = server_config_from_quire_config(&config);
        run_server(server_config)
            .await
            .map_err(|e| CliError::Server(e.to_string()))?;

        Ok(())
    }
}
