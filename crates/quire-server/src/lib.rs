//! HTTP server for quire sites.
//!
//! Exposes the content engine as a read-only JSON API:
//!
//! ```text
//! GET /                                 sites
//! GET /{site}                           site title, sections and templates
//! GET /{site}/{section}                 entries matched by the section
//! GET /{site}/{section}/{*path}         file content or directory listing
//! ```
//!
//! Directories requested without a trailing `/` are answered with a
//! permanent redirect to the same path with `/` appended.
//!
//! # Quick Start
//!
//! ```ignore
//! use std::path::PathBuf;
//! use quire_server::{ServerConfig, run_server};
//!
//! #[tokio::main]
//! async fn main() {
//!     let config = ServerConfig {
//!         sites_dir: PathBuf::from("sites"),
//!         ..ServerConfig::default()
//!     };
//!     run_server(config).await.unwrap();
//! }
//! ```

mod app;
mod error;
mod handlers;
mod middleware;
mod state;

use std::net::SocketAddr;
use std::path::PathBuf;
use std::str::FromStr;
use std::sync::Arc;

use quire_config::ListingOrderConfig;
use quire_content::{ContentRoot, ListingOrder};
use state::AppState;

/// Server configuration.
#[derive(Clone, Debug)]
pub struct ServerConfig {
    /// Host address to bind to.
    pub host: String,
    /// Port to listen on.
    pub port: u16,
    /// Directory holding one subdirectory per site.
    pub sites_dir: PathBuf,
    /// Directory listing order.
    pub order: ListingOrder,
    /// Send permissive CORS headers.
    pub cors: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_owned(),
            port: 4120,
            sites_dir: PathBuf::from("sites"),
            order: ListingOrder::default(),
            cors: true,
        }
    }
}

/// Run the server until Ctrl-C.
///
/// # Errors
///
/// Returns an error if the address is invalid or the listener cannot bind.
pub async fn run_server(config: ServerConfig) -> Result<(), Box<dyn std::error::Error>> {
    let state = Arc::new(AppState {
        content: ContentRoot::new(config.sites_dir.clone()).with_order(config.order),
        cors: config.cors,
    });

    let app = app::create_router(state);

    let addr = SocketAddr::from_str(&format!("{}:{}", config.host, config.port))?;
    tracing::info!(address = %addr, sites_dir = %config.sites_dir.display(), "Starting server");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

/// Wait for shutdown signal (Ctrl-C).
async fn shutdown_signal() {
    tokio::signal::ctrl_c()
        .await
        .expect("Failed to install Ctrl+C handler");
    tracing::info!("Shutdown signal received, stopping server...");
}

/// Create server configuration from the loaded quire config.
#[must_use]
pub fn server_config_from_quire_config(config: &quire_config::Config) -> ServerConfig {
    ServerConfig {
        host: config.server.host.clone(),
        port: config.server.port,
        sites_dir: config.content_resolved.sites_dir.clone(),
        order: match config.content_resolved.order {
            ListingOrderConfig::Modified => ListingOrder::Modified,
            ListingOrderConfig::Name => ListingOrder::Name,
        },
        cors: config.server.cors,
    }
}
