//! Syntax highlighting for code blocks.
//!
//! Wraps `syntect` with class-based HTML output. The syntax set and theme are
//! loaded once by [`Highlighter::new`] and shared read-only by every render.

use std::fmt::Write;

use syntect::highlighting::{Theme, ThemeSet};
use syntect::html::{ClassStyle, ClassedHTMLGenerator, css_for_theme_with_class_style};
use syntect::parsing::{SyntaxReference, SyntaxSet};
use syntect::util::LinesWithEndings;

use crate::util::{escape_html, expand_tabs};

/// Default highlight theme (one of syntect's bundled themes).
pub const DEFAULT_THEME: &str = "InspiredGitHub";

/// Default number of spaces a tab expands to.
pub const DEFAULT_TAB_WIDTH: usize = 2;

/// Class style for generated spans (`<span class="source go">`).
const CLASS_STYLE: ClassStyle = ClassStyle::Spaced;

/// Configuration for [`Highlighter`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HighlighterConfig {
    /// Name of a bundled syntect theme used for the stylesheet.
    pub theme: String,
    /// Number of spaces a tab character expands to.
    pub tab_width: usize,
}

impl Default for HighlighterConfig {
    fn default() -> Self {
        Self {
            theme: DEFAULT_THEME.to_owned(),
            tab_width: DEFAULT_TAB_WIDTH,
        }
    }
}

/// Error returned by the highlighter.
#[derive(Debug, thiserror::Error)]
pub enum HighlightError {
    /// Theme name not found among the bundled themes.
    #[error("unknown highlight theme '{name}' (available: {available})")]
    UnknownTheme {
        /// Requested theme name.
        name: String,
        /// Comma-separated list of bundled theme names.
        available: String,
    },
    /// Grammar failed to tokenize the source.
    #[error("failed to highlight {language} code: {source}")]
    Tokenize {
        /// Name of the grammar that failed.
        language: String,
        /// Underlying syntect error.
        #[source]
        source: syntect::Error,
    },
    /// Stylesheet generation failed.
    #[error("failed to generate highlight stylesheet: {0}")]
    Css(#[source] syntect::Error),
}

/// Code highlighter with class-based HTML output.
///
/// # Example
///
/// ```
/// use bookmd_renderer::{Highlighter, HighlighterConfig};
///
/// let highlighter = Highlighter::new(&HighlighterConfig::default()).unwrap();
/// let mut out = String::new();
/// highlighter
///     .highlight("package main\n", "go", "", &mut out)
///     .unwrap();
/// assert!(out.contains(r#"class="language-go""#));
/// ```
pub struct Highlighter {
    syntax_set: SyntaxSet,
    theme: Theme,
    tab_width: usize,
}

impl Highlighter {
    /// Load the bundled grammars and the configured theme.
    pub fn new(config: &HighlighterConfig) -> Result<Self, HighlightError> {
        let mut themes = ThemeSet::load_defaults().themes;
        let Some(theme) = themes.remove(&config.theme) else {
            let available: Vec<_> = themes.keys().map(String::as_str).collect();
            return Err(HighlightError::UnknownTheme {
                name: config.theme.clone(),
                available: available.join(", "),
            });
        };

        Ok(Self {
            syntax_set: SyntaxSet::load_defaults_newlines(),
            theme,
            tab_width: config.tab_width,
        })
    }

    /// Pick the grammar for a code fragment.
    ///
    /// Tries the explicit hint, then the default language, then detection from
    /// the first line of the source, and finally plain text.
    pub fn resolve_syntax(&self, source: &str, lang: &str, default_lang: &str) -> &SyntaxReference {
        self.find_by_name(lang)
            .or_else(|| self.find_by_name(default_lang))
            .or_else(|| {
                source
                    .lines()
                    .next()
                    .and_then(|line| self.syntax_set.find_syntax_by_first_line(line))
            })
            .unwrap_or_else(|| self.syntax_set.find_syntax_plain_text())
    }

    /// Highlight `source` and append the markup to `out`.
    ///
    /// On error nothing is appended.
    pub fn highlight(
        &self,
        source: &str,
        lang: &str,
        default_lang: &str,
        out: &mut String,
    ) -> Result<(), HighlightError> {
        let syntax = self.resolve_syntax(source, lang, default_lang);
        let source = expand_tabs(source, self.tab_width);

        let mut generator =
            ClassedHTMLGenerator::new_with_class_style(syntax, &self.syntax_set, CLASS_STYLE);
        for line in LinesWithEndings::from(&source) {
            generator
                .parse_html_for_line_which_includes_newline(line)
                .map_err(|err| HighlightError::Tokenize {
                    language: syntax.name.clone(),
                    source: err,
                })?;
        }

        write!(
            out,
            r#"<pre class="highlight"><code class="language-{}">{}</code></pre>"#,
            escape_html(&class_name(&syntax.name)),
            generator.finalize()
        )
        .unwrap();
        out.push('\n');
        Ok(())
    }

    /// Stylesheet for the configured theme, matching the generated classes.
    pub fn css(&self) -> Result<String, HighlightError> {
        css_for_theme_with_class_style(&self.theme, CLASS_STYLE).map_err(HighlightError::Css)
    }

    fn find_by_name(&self, lang: &str) -> Option<&SyntaxReference> {
        let lang = lang.trim();
        if lang.is_empty() {
            return None;
        }
        let lower = lang.to_ascii_lowercase();
        match normalize_language(&lower) {
            Language::PlainText => Some(self.syntax_set.find_syntax_plain_text()),
            Language::Token(token) => self.syntax_set.find_syntax_by_token(token),
        }
    }
}

/// Result of normalizing a language hint.
enum Language<'a> {
    PlainText,
    Token(&'a str),
}

/// Map common aliases onto tokens syntect knows.
fn normalize_language(lang: &str) -> Language<'_> {
    let token = match lang {
        "text" | "txt" | "plain" | "plaintext" | "none" => return Language::PlainText,
        "golang" => "go",
        "sh" | "shell" | "zsh" | "console" => "bash",
        "js" | "node" => "javascript",
        "py" | "python3" => "python",
        "rs" => "rust",
        "c++" | "cxx" => "cpp",
        "c#" | "csharp" => "cs",
        "yml" => "yaml",
        "objc" | "objective-c" => "m",
        other => other,
    };
    Language::Token(token)
}

/// Lowercase grammar name usable as a CSS class suffix (`C++` → `c++`, `Plain Text` → `plain-text`).
fn class_name(name: &str) -> String {
    name.to_ascii_lowercase().replace(' ', "-")
}
