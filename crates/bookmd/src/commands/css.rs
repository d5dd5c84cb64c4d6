//! `bookmd css` command implementation.

use std::path::PathBuf;

use bookmd_config::{CliSettings, Config};
use bookmd_renderer::Highlighter;
use clap::Args;

use super::{highlighter_config, write_output};
use crate::error::CliError;
use crate::output::Output;

/// Arguments for the css command.
#[derive(Args)]
pub(crate) struct CssArgs {
    /// Highlight theme (overrides config).
    #[arg(short, long)]
    theme: Option<String>,

    /// Output CSS file (default: stdout).
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Path to configuration file (default: auto-discover bookmd.toml).
    #[arg(short, long)]
    config: Option<PathBuf>,
}

impl CssArgs {
    /// Execute the css command.
    pub(crate) fn execute(self) -> Result<(), CliError> {
        let output = Output::new();

        let cli_settings = CliSettings {
            theme: self.theme,
            ..CliSettings::default()
        };
        let config = Config::load(self.config.as_deref(), Some(&cli_settings))?;

        let highlighter = Highlighter::new(&highlighter_config(&config))?;
        let css = highlighter.css()?;

        write_output(self.output.as_ref(), &css)?;
        if let Some(path) = &self.output {
            output.info(&format!("Theme: {}", config.highlight.theme));
            output.success(&format!("Wrote {}", path.display()));
        }
        Ok(())
    }
}
