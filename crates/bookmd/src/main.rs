//! bookmd CLI - book chapter markdown to HTML.
//!
//! Provides commands for:
//! - `convert`: Convert a markdown document to sanitized HTML
//! - `css`: Print the stylesheet for highlighted code blocks

mod commands;
mod error;
mod output;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use commands::{ConvertArgs, CssArgs};
use output::Output;

/// bookmd - Book chapter markdown to HTML.
#[derive(Parser)]
#[command(name = "bookmd", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Convert a markdown document to sanitized HTML.
    Convert(ConvertArgs),
    /// Print the stylesheet for highlighted code blocks.
    Css(CssArgs),
}

fn main() {
    let cli = Cli::parse();
    let output = Output::new();

    // Check if verbose flag is set for convert command
    let verbose = matches!(&cli.command, Commands::Convert(args) if args.verbose);

    let rust_log = std::env::var(EnvFilter::DEFAULT_ENV).ok();
    tracing_subscriber::fmt()
        .with_env_filter(log_filter(verbose, rust_log.as_deref()))
        .with_writer(std::io::stderr)
        .init();

    let result = match cli.command {
        Commands::Convert(args) => args.execute(),
        Commands::Css(args) => args.execute(),
    };

    if let Err(err) = result {
        output.error(&format!("Error: {err}"));
        std::process::exit(1);
    }
}

/// Log filter: `--verbose` enables INFO, otherwise `RUST_LOG` or WARN.
fn log_filter(verbose: bool, rust_log: Option<&str>) -> EnvFilter {
    if verbose {
        return EnvFilter::new("info");
    }
    rust_log
        .and_then(|directives| EnvFilter::try_new(directives).ok())
        .unwrap_or_else(|| EnvFilter::new("warn"))
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_log_filter_defaults_to_warn() {
        assert_eq!(log_filter(false, None).to_string(), "warn");
    }

    #[test]
    fn test_log_filter_uses_rust_log() {
        assert_eq!(log_filter(false, Some("debug")).to_string(), "debug");
    }

    #[test]
    fn test_log_filter_verbose_overrides_rust_log() {
        assert_eq!(log_filter(true, Some("debug")).to_string(), "info");
    }
}
