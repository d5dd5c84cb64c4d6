//! Configuration management for bookmd.
//!
//! Parses `bookmd.toml` configuration files with serde and provides
//! auto-discovery of config files in parent directories.
//!
//! CLI settings can be applied during load via [`CliSettings`].
//!
//! ```toml
//! [render]
//! default_language = "go"
//! smart_punctuation = true
//!
//! [highlight]
//! theme = "InspiredGitHub"
//! tab_width = 2
//!
//! [book]
//! known_urls = "known-urls.txt"
//! ```

use serde::Deserialize;
use std::path::{Path, PathBuf};

/// CLI settings that override configuration file values.
///
/// All fields are optional. Only non-None values override the loaded config.
#[derive(Debug, Default)]
pub struct CliSettings {
    /// Override default code block language.
    pub default_language: Option<String>,
    /// Override path to the known cross-reference identifiers file.
    pub known_urls: Option<PathBuf>,
    /// Override highlight theme.
    pub theme: Option<String>,
    /// Override strict highlighting flag.
    pub strict_highlighting: Option<bool>,
}

/// Configuration filename to search for.
const CONFIG_FILENAME: &str = "bookmd.toml";

/// Largest accepted tab width.
const MAX_TAB_WIDTH: usize = 16;

/// Application configuration.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Markdown rendering configuration.
    pub render: RenderConfig,
    /// Syntax highlighting configuration.
    pub highlight: HighlightConfig,
    /// Book configuration (paths are relative strings from TOML).
    book: BookConfigRaw,

    /// Resolved book configuration (set after loading).
    #[serde(skip)]
    pub book_resolved: BookConfig,
    /// Path to the config file (set after loading).
    #[serde(skip)]
    pub config_path: Option<PathBuf>,
}

/// Markdown rendering configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    /// Language for code blocks without one. Empty means detect from content.
    pub default_language: String,
    /// Enable GitHub Flavored Markdown (tables, strikethrough, task lists).
    pub gfm: bool,
    /// Convert quotes, dashes and ellipses to typographic characters.
    pub smart_punctuation: bool,
    /// Fail the document when a code block cannot be highlighted instead of
    /// emitting it as plain text.
    pub strict_highlighting: bool,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            default_language: String::new(),
            gfm: true,
            smart_punctuation: true,
            strict_highlighting: false,
        }
    }
}

/// Syntax highlighting configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct HighlightConfig {
    /// Name of a bundled highlight theme.
    pub theme: String,
    /// Number of spaces a tab expands to.
    pub tab_width: usize,
}

impl Default for HighlightConfig {
    fn default() -> Self {
        Self {
            theme: "InspiredGitHub".to_owned(),
            tab_width: 2,
        }
    }
}

/// Raw book configuration as parsed from TOML (paths as strings).
#[derive(Debug, Deserialize, Default)]
#[serde(default)]
struct BookConfigRaw {
    known_urls: Option<String>,
}

/// Resolved book configuration with absolute paths.
#[derive(Debug, Default)]
pub struct BookConfig {
    /// File listing the book's chapter and article identifiers, one per line.
    pub known_urls: Option<PathBuf>,
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
}

/// Require a string field to be non-empty.
fn require_non_empty(value: &str, field: &str) -> Result<(), ConfigError> {
    if value.trim().is_empty() {
        return Err(ConfigError::Validation(format!("{field} cannot be empty")));
    }
    Ok(())
}

impl Config {
    /// Load configuration from file with optional CLI settings.
    ///
    /// If `config_path` is provided, loads from that file.
    /// Otherwise, searches for `bookmd.toml` in current directory and parents.
    ///
    /// CLI settings are applied after loading and path resolution, allowing CLI
    /// arguments to take precedence over config file values.
    ///
    /// # Errors
    ///
    /// Returns error if explicit `config_path` doesn't exist, parsing fails,
    /// or the resulting configuration is invalid.
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
            Self::default()
        };

        if let Some(settings) = cli_settings {
            config.apply_cli_settings(settings);
            config.validate()?;
        }

        Ok(config)
    }

    /// Apply CLI settings to the configuration.
    fn apply_cli_settings(&mut self, settings: &CliSettings) {
        if let Some(language) = &settings.default_language {
            self.render.default_language.clone_from(language);
        }
        if let Some(known_urls) = &settings.known_urls {
            self.book_resolved.known_urls = Some(known_urls.clone());
        }
        if let Some(theme) = &settings.theme {
            self.highlight.theme.clone_from(theme);
        }
        if let Some(strict) = settings.strict_highlighting {
            self.render.strict_highlighting = strict;
        }
    }

    /// Search for config file in current directory and parents.
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

    /// Load configuration from a specific file.
    fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let mut config: Self = toml::from_str(&content)?;

        let config_dir = path.parent().unwrap_or(Path::new("."));
        config.resolve_paths(config_dir);
        config.config_path = Some(path.to_path_buf());

        config.validate()?;

        Ok(config)
    }

    /// Validate configuration values.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Validation` if any validation fails.
    pub fn validate(&self) -> Result<(), ConfigError> {
        require_non_empty(&self.highlight.theme, "highlight.theme")?;

        let tab_width = self.highlight.tab_width;
        if tab_width == 0 {
            return Err(ConfigError::Validation(
                "highlight.tab_width must be greater than 0".to_owned(),
            ));
        }
        if tab_width > MAX_TAB_WIDTH {
            return Err(ConfigError::Validation(format!(
                "highlight.tab_width cannot exceed {MAX_TAB_WIDTH}"
            )));
        }

        if self.render.default_language.contains('|') {
            return Err(ConfigError::Validation(
                "render.default_language cannot contain '|'".to_owned(),
            ));
        }

        Ok(())
    }

    /// Resolve relative paths to absolute paths based on config directory.
    fn resolve_paths(&mut self, config_dir: &Path) {
        self.book_resolved = BookConfig {
            known_urls: self.book.known_urls.as_deref().map(|p| config_dir.join(p)),
        };
    }
}
