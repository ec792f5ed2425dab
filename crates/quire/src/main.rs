//! Quire CLI.
//!
//! Provides the `serve` command, which exposes a directory of sites over
//! a read-only JSON API.

mod commands;
mod error;
mod output;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use commands::ServeArgs;
use output::Output;

/// Quire - headless CMS for plain file sites.
#[derive(Parser)]
#[command(name = "quire", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the content server.
    Serve(ServeArgs),
}

fn main() {
    let cli = Cli::parse();
    let output = Output::new();

    let verbose = matches!(&cli.command, Commands::Serve(args) if args.verbose);
    tracing_subscriber::fmt()
        .with_env_filter(log_filter(verbose))
        .init();

    let result = match cli.command {
        Commands::Serve(args) => match tokio::runtime::Runtime::new() {
            Ok(rt) => rt.block_on(args.execute()),
            Err(e) => Err(e.into()),
        },
    };

    if let Err(err) = result {
        output.error(&format!("Error: {err}"));
        std::process::exit(1);
    }
}

/// `--verbose` forces INFO; otherwise `RUST_LOG`, falling back to WARN.
fn log_filter(verbose: bool) -> EnvFilter {
    if verbose {
        EnvFilter::new("info")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    }
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;
    use pretty_assertions::assert_eq;
    use tracing_subscriber::filter::LevelFilter;

    use super::*;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_serve_args() {
        let cli = Cli::try_parse_from([
            "quire", "serve", "-s", "content", "--port", "9000", "--order", "name", "-v",
        ])
        .unwrap();

        let Commands::Serve(args) = cli.command;
        assert!(args.verbose);
    }

    #[test]
    fn test_verbose_filter_is_info() {
        assert_eq!(log_filter(true).max_level_hint(), Some(LevelFilter::INFO));
    }

    #[test]
    fn test_default_filter_is_warn_without_rust_log() {
        if std::env::var_os("RUST_LOG").is_some() {
            return;
        }
        assert_eq!(log_filter(false).max_level_hint(), Some(LevelFilter::WARN));
    }
}
