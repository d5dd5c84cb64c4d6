//! `bookmd convert` command implementation.

use std::path::PathBuf;

use bookmd_config::{CliSettings, Config};
use bookmd_renderer::{Converter, HighlightFallback, KnownUrls};
use clap::Args;

use super::{highlighter_config, load_known_urls, read_file, write_output};
use crate::error::CliError;
use crate::output::Output;

/// Arguments for the convert command.
#[derive(Args)]
pub(crate) struct ConvertArgs {
    /// Markdown document to convert.
    input: PathBuf,

    /// Output HTML file (default: stdout).
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Language for code blocks without one (overrides config).
    #[arg(short, long)]
    lang: Option<String>,

    /// File with the book's chapter and article identifiers, one per line
    /// (overrides config).
    #[arg(short, long)]
    known_urls: Option<PathBuf>,

    /// Path to configuration file (default: auto-discover bookmd.toml).
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Fail when a code block cannot be highlighted.
    #[arg(long)]
    strict_highlighting: bool,

    /// Enable verbose output.
    #[arg(short, long)]
    pub verbose: bool,
}

impl ConvertArgs {
    /// Execute the convert command.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration or input files cannot be read, or
    /// the document contains a malformed code block annotation.
    pub(crate) fn execute(self) -> Result<(), CliError> {
        let output = Output::new();

        let cli_settings = CliSettings {
            default_language: self.lang,
            known_urls: self.known_urls,
            strict_highlighting: self.strict_highlighting.then_some(true),
            ..CliSettings::default()
        };
        let config = Config::load(self.config.as_deref(), Some(&cli_settings))?;

        let known_urls = match &config.book_resolved.known_urls {
            Some(path) => load_known_urls(path)?,
            None => KnownUrls::default(),
        };
        known_urls.log_summary();

        let fallback = if config.render.strict_highlighting {
            HighlightFallback::Fail
        } else {
            HighlightFallback::PlainText
        };
        let converter = Converter::new(&highlighter_config(&config))?
            .with_gfm(config.render.gfm)
            .with_smart_punctuation(config.render.smart_punctuation)
            .with_highlight_fallback(fallback);

        let markdown = read_file(&self.input)?;
        tracing::info!(path = %self.input.display(), bytes = markdown.len(), "Converting");

        let result =
            converter.convert(&markdown, &config.render.default_language, &known_urls)?;

        for warning in &result.warnings {
            output.warning(&format!("{}: {warning}", self.input.display()));
        }

        write_output(self.output.as_ref(), &result.html)?;
        if let Some(path) = &self.output {
            output.success(&format!("Wrote {}", path.display()));
        }
        Ok(())
    }
}
