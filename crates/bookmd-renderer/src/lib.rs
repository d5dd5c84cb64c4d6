//! Book chapter markdown to sanitized HTML.
//!
//! This crate renders one document of a multi-chapter book:
//! - [`Highlighter`]: class-based syntax highlighting of code blocks
//! - [`CodeBlockInfo`]: `language | source path` fence annotations
//! - [`KnownUrls`]: expansion of partial `a-<id>` / `ch-<id>` links
//! - [`MarkdownRenderer`]: render hooks for code blocks and links
//! - [`Sanitizer`]: allow-list cleanup of the rendered HTML
//!
//! [`Converter`] ties them together: parse, render with hooks, sanitize.
//!
//! # Example
//!
//! ```
//! use bookmd_renderer::{Converter, HighlighterConfig, KnownUrls};
//!
//! let converter = Converter::new(&HighlighterConfig::default()).unwrap();
//! let known_urls: KnownUrls = vec!["ch-3-loops".to_owned()].into_iter().collect();
//!
//! let markdown = "See [loops](ch-3).\n\n```go\nfor {}\n```\n";
//! let result = converter.convert(markdown.as_bytes(), "go", &known_urls).unwrap();
//! assert!(result.html.contains(r#"href="ch-3-loops""#));
//! assert!(result.html.contains(r#"class="language-go""#));
//! ```

mod code_block;
mod convert;
mod highlight;
mod renderer;
mod sanitize;
mod util;
mod xref;

pub use code_block::{CodeBlockInfo, InfoError, augment};
pub use convert::Converter;
pub use highlight::{
    DEFAULT_TAB_WIDTH, DEFAULT_THEME, HighlightError, Highlighter, HighlighterConfig,
};
pub use renderer::{HighlightFallback, Hook, MarkdownRenderer, Node, RenderError, RenderResult};
pub use sanitize::Sanitizer;
pub use util::{escape_html, file_name};
pub use xref::{KnownUrls, Resolution, is_internal_reference};
