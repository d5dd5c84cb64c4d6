//! CLI command implementations.

pub(crate) mod convert;
pub(crate) mod css;

use std::io::Write;
use std::path::{Path, PathBuf};

use bookmd_config::Config;
use bookmd_renderer::{HighlighterConfig, KnownUrls};

use crate::error::CliError;

pub(crate) use convert::ConvertArgs;
pub(crate) use css::CssArgs;

/// Highlighter settings from the loaded configuration.
fn highlighter_config(config: &Config) -> HighlighterConfig {
    HighlighterConfig {
        theme: config.highlight.theme.clone(),
        tab_width: config.highlight.tab_width,
    }
}

/// Read a file, attaching its path to any I/O error.
fn read_file(path: &Path) -> Result<Vec<u8>, CliError> {
    std::fs::read(path).map_err(|source| CliError::File {
        path: path.to_path_buf(),
        source,
    })
}

/// Load the book's known identifiers, one per line.
///
/// Blank lines and lines starting with `#` are skipped.
fn load_known_urls(path: &Path) -> Result<KnownUrls, CliError> {
    let content = read_file(path)?;
    Ok(parse_known_urls(&String::from_utf8_lossy(&content)))
}

fn parse_known_urls(content: &str) -> KnownUrls {
    content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(str::to_owned)
        .collect()
}

/// Write `content` to `path`, or to stdout when no path is given.
fn write_output(path: Option<&PathBuf>, content: &str) -> Result<(), CliError> {
    match path {
        Some(path) => std::fs::write(path, content).map_err(|source| CliError::File {
            path: path.clone(),
            source,
        }),
        None => {
            let mut stdout = std::io::stdout().lock();
            stdout.write_all(content.as_bytes())?;
            stdout.flush()?;
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_parse_known_urls_skips_blank_and_comments() {
        let urls = parse_known_urls("# go book\na-1-intro\n\n  ch-2-basics  \n# end\n");
        assert_eq!(urls.iter().collect::<Vec<_>>(), vec!["a-1-intro", "ch-2-basics"]);
    }

    #[test]
    fn test_load_known_urls_missing_file() {
        let err = load_known_urls(Path::new("/nonexistent/urls.txt")).unwrap_err();
        assert!(err.to_string().contains("/nonexistent/urls.txt"));
    }

    #[test]
    fn test_load_known_urls_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("urls.txt");
        std::fs::write(&path, "a-42-setup\nch-7-loops\n").unwrap();

        let urls = load_known_urls(&path).unwrap();
        assert_eq!(urls.len(), 2);
        assert_eq!(urls.resolve("a-42").url("a-42"), "a-42-setup");
    }

    #[test]
    fn test_highlighter_config_from_config() {
        let mut config = Config::default();
        config.highlight.theme = "base16-ocean.dark".to_owned();
        config.highlight.tab_width = 4;

        let hl = highlighter_config(&config);
        assert_eq!(hl.theme, "base16-ocean.dark");
        assert_eq!(hl.tab_width, 4);
    }

    #[test]
    fn test_write_output_to_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.html");
        write_output(Some(&path), "<p>x</p>").unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "<p>x</p>");
    }
}
