//! Markdown to sanitized HTML conversion.

use crate::highlight::{HighlightError, Highlighter, HighlighterConfig};
use crate::renderer::{HighlightFallback, MarkdownRenderer, RenderError, RenderResult};
use crate::sanitize::Sanitizer;
use crate::xref::KnownUrls;

/// Converts chapter markdown into HTML ready for publication.
///
/// Owns the highlighter and sanitizer, which are built once and shared by
/// every conversion. A `Converter` is immutable and can be shared between
/// threads converting different documents.
///
/// # Example
///
/// ```
/// use bookmd_renderer::{Converter, HighlighterConfig, KnownUrls};
///
/// let converter = Converter::new(&HighlighterConfig::default()).unwrap();
/// let known_urls: KnownUrls = vec!["a-42-setup".to_owned()].into_iter().collect();
///
/// let result = converter
///     .convert(b"[see](a-42)<script>alert(1)</script>", "go", &known_urls)
///     .unwrap();
/// assert_eq!(result.html, "<p><a href=\"a-42-setup\">see</a></p>\n");
/// ```
pub struct Converter {
    highlighter: Highlighter,
    sanitizer: Sanitizer,
    gfm: bool,
    smart_punctuation: bool,
    fallback: HighlightFallback,
}

impl Converter {
    /// Create a converter, loading grammars and the highlight theme.
    pub fn new(config: &HighlighterConfig) -> Result<Self, HighlightError> {
        Ok(Self {
            highlighter: Highlighter::new(config)?,
            sanitizer: Sanitizer::new(),
            gfm: true,
            smart_punctuation: true,
            fallback: HighlightFallback::default(),
        })
    }

    /// Enable or disable GitHub Flavored Markdown features.
    #[must_use]
    pub fn with_gfm(mut self, enabled: bool) -> Self {
        self.gfm = enabled;
        self
    }

    /// Enable or disable typographic punctuation.
    #[must_use]
    pub fn with_smart_punctuation(mut self, enabled: bool) -> Self {
        self.smart_punctuation = enabled;
        self
    }

    /// Choose how highlighting failures are handled.
    #[must_use]
    pub fn with_highlight_fallback(mut self, fallback: HighlightFallback) -> Self {
        self.fallback = fallback;
        self
    }

    /// Create a renderer for one document.
    pub fn renderer<'r>(
        &'r self,
        default_language: &str,
        known_urls: &'r KnownUrls,
    ) -> MarkdownRenderer<'r> {
        MarkdownRenderer::new(&self.highlighter, known_urls)
            .with_default_language(default_language)
            .with_gfm(self.gfm)
            .with_smart_punctuation(self.smart_punctuation)
            .with_highlight_fallback(self.fallback)
    }

    /// Convert markdown to sanitized HTML.
    ///
    /// Invalid UTF-8 sequences are replaced with U+FFFD.
    pub fn convert(
        &self,
        markdown: &[u8],
        default_language: &str,
        known_urls: &KnownUrls,
    ) -> Result<RenderResult, RenderError> {
        let markdown = String::from_utf8_lossy(markdown);
        let rendered = self
            .renderer(default_language, known_urls)
            .render_markdown(&markdown)?;

        let html = self.sanitizer.clean(&rendered.html);
        tracing::debug!(
            markdown_len = markdown.len(),
            rendered_len = rendered.html.len(),
            sanitized_len = html.len(),
            warnings = rendered.warnings.len(),
            "Converted document"
        );

        Ok(RenderResult {
            html,
            warnings: rendered.warnings,
        })
    }
}
