//! Markdown renderer with code block and link hooks.
//!
//! Parser events are grouped into [`Node`]s. Code blocks are rendered by the
//! hooks (highlighting plus the optional source-file footer), links get their
//! destination resolved against the book index, and everything else goes
//! through `pulldown_cmark::html` unchanged.

use std::fmt::Write;

use pulldown_cmark::{CodeBlockKind, CowStr, Event, LinkType, Options, Parser, Tag, TagEnd};

use crate::code_block::{CodeBlockInfo, InfoError, augment};
use crate::highlight::{HighlightError, Highlighter};
use crate::util::escape_html;
use crate::xref::{KnownUrls, Resolution};

/// Result of rendering markdown.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RenderResult {
    /// Rendered HTML content.
    pub html: String,
    /// Warnings generated during conversion (unresolved cross-references,
    /// code blocks rendered without highlighting).
    pub warnings: Vec<String>,
}

/// Error returned when a document cannot be rendered.
#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    /// Malformed fence info string.
    #[error("{0}")]
    InvalidCodeBlockInfo(#[from] InfoError),
    /// Highlighting failed and [`HighlightFallback::Fail`] was selected.
    #[error("{0}")]
    Highlight(#[from] HighlightError),
}

/// What to do when a code block fails to highlight.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum HighlightFallback {
    /// Emit the escaped source without highlighting and record a warning.
    #[default]
    PlainText,
    /// Abort rendering with [`RenderError::Highlight`].
    Fail,
}

/// A markdown node as seen by the render hooks.
#[derive(Debug)]
pub enum Node<'a> {
    /// A fenced or indented code block with its full literal content.
    CodeBlock {
        /// Fence info string (empty for indented blocks).
        info: CowStr<'a>,
        /// Code block content.
        literal: String,
    },
    /// Start of a link.
    Link {
        link_type: LinkType,
        dest_url: CowStr<'a>,
        title: CowStr<'a>,
        id: CowStr<'a>,
    },
    /// Any other event, rendered by the default HTML writer.
    Other(Event<'a>),
}

/// Decision returned by [`MarkdownRenderer::dispatch`].
#[derive(Debug, PartialEq)]
pub enum Hook<'a> {
    /// Node fully rendered by the hook; default rendering is skipped.
    Handled(String),
    /// Let the default HTML writer render this (possibly rewritten) event.
    Default(Event<'a>),
}

/// Groups parser events into [`Node`]s.
struct Nodes<I> {
    events: I,
}

impl<'a, I> Iterator for Nodes<I>
where
    I: Iterator<Item = Event<'a>>,
{
    type Item = Node<'a>;

    fn next(&mut self) -> Option<Node<'a>> {
        let node = match self.events.next()? {
            Event::Start(Tag::CodeBlock(kind)) => {
                let info = match kind {
                    CodeBlockKind::Fenced(info) => info,
                    CodeBlockKind::Indented => CowStr::Borrowed(""),
                };
                let mut literal = String::new();
                for event in self.events.by_ref() {
                    match event {
                        Event::End(TagEnd::CodeBlock) => break,
                        Event::Text(text) => literal.push_str(&text),
                        _ => {}
                    }
                }
                Node::CodeBlock { info, literal }
            }
            Event::Start(Tag::Link {
                link_type,
                dest_url,
                title,
                id,
            }) => Node::Link {
                link_type,
                dest_url,
                title,
                id,
            },
            event => Node::Other(event),
        };
        Some(node)
    }
}

/// Markdown renderer for one document of a book.
///
/// Holds the per-document state: the default code language, the book's
/// cross-reference index and the warnings collected while rendering.
///
/// # Example
///
/// ```
/// use bookmd_renderer::{Highlighter, HighlighterConfig, KnownUrls, MarkdownRenderer};
///
/// let highlighter = Highlighter::new(&HighlighterConfig::default()).unwrap();
/// let known_urls: KnownUrls = vec!["a-42-setup".to_owned()].into_iter().collect();
///
/// let result = MarkdownRenderer::new(&highlighter, &known_urls)
///     .with_default_language("go")
///     .render_markdown("[see](a-42)")
///     .unwrap();
/// assert!(result.html.contains(r#"href="a-42-setup""#));
/// ```
pub struct MarkdownRenderer<'r> {
    highlighter: &'r Highlighter,
    known_urls: &'r KnownUrls,
    default_language: String,
    gfm: bool,
    smart_punctuation: bool,
    fallback: HighlightFallback,
    warnings: Vec<String>,
}

impl<'r> MarkdownRenderer<'r> {
    /// Create a renderer with GFM and smart punctuation enabled.
    #[must_use]
    pub fn new(highlighter: &'r Highlighter, known_urls: &'r KnownUrls) -> Self {
        Self {
            highlighter,
            known_urls,
            default_language: String::new(),
            gfm: true,
            smart_punctuation: true,
            fallback: HighlightFallback::default(),
            warnings: Vec::new(),
        }
    }

    /// Set the language used for code blocks without one.
    #[must_use]
    pub fn with_default_language(mut self, language: impl Into<String>) -> Self {
        self.default_language = language.into();
        self
    }

    /// Enable or disable GitHub Flavored Markdown features.
    ///
    /// GFM is enabled by default. When enabled, the parser supports:
    /// - Tables
    /// - Strikethrough (`~~text~~`)
    /// - Task lists (`- [ ] item`)
    #[must_use]
    pub fn with_gfm(mut self, enabled: bool) -> Self {
        self.gfm = enabled;
        self
    }

    /// Enable or disable typographic quotes, dashes and ellipses.
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

    /// Get parser options based on configuration.
    #[must_use]
    pub fn parser_options(&self) -> Options {
        let mut options = Options::empty();
        if self.gfm {
            options |= Options::ENABLE_TABLES
                | Options::ENABLE_STRIKETHROUGH
                | Options::ENABLE_TASKLISTS
                | Options::ENABLE_GFM;
        }
        if self.smart_punctuation {
            options |= Options::ENABLE_SMART_PUNCTUATION;
        }
        options
    }

    /// Create a configured parser for the given markdown text.
    #[must_use]
    pub fn create_parser<'a>(&self, markdown: &'a str) -> Parser<'a> {
        Parser::new_ext(markdown, self.parser_options())
    }

    /// Render markdown text directly using configured parser options.
    pub fn render_markdown(&mut self, markdown: &str) -> Result<RenderResult, RenderError> {
        self.render(self.create_parser(markdown))
    }

    /// Render markdown events to (unsanitized) HTML.
    pub fn render<'a, I>(&mut self, events: I) -> Result<RenderResult, RenderError>
    where
        I: Iterator<Item = Event<'a>>,
    {
        let mut rendered = Vec::new();
        for node in (Nodes { events }) {
            match self.dispatch(node)? {
                Hook::Handled(html) => rendered.push(Event::Html(html.into())),
                Hook::Default(event) => rendered.push(event),
            }
        }

        let mut html = String::with_capacity(4096);
        pulldown_cmark::html::push_html(&mut html, rendered.into_iter());

        Ok(RenderResult {
            html,
            warnings: std::mem::take(&mut self.warnings),
        })
    }

    /// Apply the render hooks to a single node.
    ///
    /// Code blocks are rendered here; links are rewritten and handed back for
    /// default rendering, as is every other node.
    pub fn dispatch<'a>(&mut self, node: Node<'a>) -> Result<Hook<'a>, RenderError> {
        match node {
            Node::CodeBlock { info, literal } => {
                Ok(Hook::Handled(self.code_block(&info, &literal)?))
            }
            Node::Link {
                link_type,
                dest_url,
                title,
                id,
            } => Ok(Hook::Default(Event::Start(Tag::Link {
                link_type,
                dest_url: self.resolve_link(dest_url),
                title,
                id,
            }))),
            Node::Other(event) => Ok(Hook::Default(event)),
        }
    }

    fn code_block(&mut self, info: &str, literal: &str) -> Result<String, RenderError> {
        let info = CodeBlockInfo::parse(info)?;

        let mut html = String::with_capacity(literal.len() * 4);
        let highlighted =
            self.highlighter
                .highlight(literal, &info.language, &self.default_language, &mut html);
        self.apply_fallback(highlighted, literal, &mut html)?;

        Ok(augment(&html, &info.source_path).into_owned())
    }

    /// Handle the outcome of highlighting `literal` into `html`.
    ///
    /// On failure `html` is replaced by the escaped source, or the error is
    /// returned, depending on the configured [`HighlightFallback`].
    fn apply_fallback(
        &mut self,
        highlighted: Result<(), HighlightError>,
        literal: &str,
        html: &mut String,
    ) -> Result<(), RenderError> {
        let Err(err) = highlighted else {
            return Ok(());
        };
        match self.fallback {
            HighlightFallback::Fail => Err(err.into()),
            HighlightFallback::PlainText => {
                tracing::warn!(error = %err, "Rendering code block without highlighting");
                self.warnings.push(err.to_string());
                html.clear();
                writeln!(html, "<pre><code>{}</code></pre>", escape_html(literal)).unwrap();
                Ok(())
            }
        }
    }

    fn resolve_link<'a>(&mut self, dest: CowStr<'a>) -> CowStr<'a> {
        let known_urls = self.known_urls;
        match known_urls.resolve(&dest) {
            Resolution::Expanded(full) => {
                tracing::debug!(from = %dest, to = %full, "Expanded cross-reference");
                CowStr::from(full.to_owned())
            }
            Resolution::Unresolved => {
                tracing::warn!(url = %dest, "Unresolved cross-reference");
                self.warnings
                    .push(format!("Unresolved cross-reference: {dest}"));
                dest
            }
            Resolution::External | Resolution::Exact => dest,
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::highlight::HighlighterConfig;

    fn highlighter() -> Highlighter {
        Highlighter::new(&HighlighterConfig::default()).unwrap()
    }

    fn known(urls: &[&str]) -> KnownUrls {
        urls.iter().map(|&s| s.to_owned()).collect()
    }

    fn render(markdown: &str, urls: &[&str]) -> RenderResult {
        let highlighter = highlighter();
        let known_urls = known(urls);
        MarkdownRenderer::new(&highlighter, &known_urls)
            .render_markdown(markdown)
            .unwrap()
    }

    #[test]
    fn test_basic_paragraph() {
        let result = render("Hello, world!", &[]);
        assert_eq!(result.html, "<p>Hello, world!</p>\n");
        assert!(result.warnings.is_empty());
    }

    #[test]
    fn test_emphasis_uses_default_rendering() {
        let result = render("*italic* and **bold**", &[]);
        assert!(result.html.contains("<em>italic</em>"));
        assert!(result.html.contains("<strong>bold</strong>"));
    }

    #[test]
    fn test_partial_link_resolved() {
        let result = render("[see](a-42)", &["a-42-setup"]);
        assert_eq!(result.html, "<p><a href=\"a-42-setup\">see</a></p>\n");
        assert!(result.warnings.is_empty());
    }

    #[test]
    fn test_link_title_preserved() {
        let result = render(r#"[see](ch-7 "Chapter")"#, &["ch-7-loops"]);
        assert!(result.html.contains(r#"<a href="ch-7-loops" title="Chapter">see</a>"#));
    }

    #[test]
    fn test_external_link_unchanged() {
        let result = render("[home](https://example.com)", &["a-1-x"]);
        assert!(result.html.contains(r#"<a href="https://example.com">home</a>"#));
    }

    #[test]
    fn test_unresolved_link_warns() {
        let result = render("[gone](a-999)", &["a-123-install-guide"]);
        assert!(result.html.contains(r#"<a href="a-999">gone</a>"#));
        assert_eq!(result.warnings, vec!["Unresolved cross-reference: a-999"]);
    }

    #[test]
    fn test_reference_style_link_resolved() {
        let result = render("[intro][x]\n\n[x]: ch-1\n", &["ch-1-intro"]);
        assert!(result.html.contains(r#"href="ch-1-intro""#));
    }

    #[test]
    fn test_code_block_highlighted() {
        let result = render("```go\npackage main\n```", &[]);
        assert!(result.html.contains(r#"<pre class="highlight"><code class="language-go">"#));
        assert!(result.html.contains("<span class=\""));
        assert!(!result.html.contains("code-box"));
    }

    #[test]
    fn test_code_block_with_source_path() {
        let result = render("```go | books/go/main.go\npackage main\n```", &[]);
        assert!(result.html.contains(r#"<div class="code-box">"#));
        assert!(result.html.contains(r#"<a href="books/go/main.go" target="_blank">main.go</a>"#));
    }

    #[test]
    fn test_code_block_uses_default_language() {
        let highlighter = highlighter();
        let known_urls = KnownUrls::default();
        let result = MarkdownRenderer::new(&highlighter, &known_urls)
            .with_default_language("go")
            .render_markdown("```\npackage main\n```")
            .unwrap();
        assert!(result.html.contains(r#"class="language-go""#));
    }

    #[test]
    fn test_indented_code_block_highlighted() {
        let highlighter = highlighter();
        let known_urls = KnownUrls::default();
        let result = MarkdownRenderer::new(&highlighter, &known_urls)
            .with_default_language("rust")
            .render_markdown("Text\n\n    fn main() {}\n")
            .unwrap();
        assert!(result.html.contains(r#"class="language-rust""#));
    }

    #[test]
    fn test_code_block_content_not_resolved_as_link() {
        let result = render("```text\n[see](a-42)\n```", &["a-42-setup"]);
        assert!(!result.html.contains("a-42-setup"));
    }

    #[test]
    fn test_malformed_info_fails() {
        let highlighter = highlighter();
        let known_urls = KnownUrls::default();
        let err = MarkdownRenderer::new(&highlighter, &known_urls)
            .render_markdown("```go|x|y\ncode\n```")
            .unwrap_err();
        assert!(matches!(
            err,
            RenderError::InvalidCodeBlockInfo(InfoError::TooManySeparators { count: 2, .. })
        ));
    }

    #[test]
    fn test_code_block_in_list() {
        let result = render("- item\n\n  ```go\n  package main\n  ```\n", &[]);
        assert!(result.html.contains("<li>"));
        assert!(result.html.contains(r#"class="language-go""#));
    }

    #[test]
    fn test_smart_punctuation() {
        let result = render(r#""quoted" -- text..."#, &[]);
        assert!(result.html.contains("\u{201c}quoted\u{201d}"));
        assert!(result.html.contains('\u{2013}'));
        assert!(result.html.contains('\u{2026}'));
    }

    #[test]
    fn test_smart_punctuation_disabled() {
        let highlighter = highlighter();
        let known_urls = KnownUrls::default();
        let result = MarkdownRenderer::new(&highlighter, &known_urls)
            .with_smart_punctuation(false)
            .render_markdown(r#""quoted""#)
            .unwrap();
        assert!(result.html.contains("quoted"));
        assert!(!result.html.contains('\u{201c}'));
    }

    #[test]
    fn test_gfm_table() {
        let result = render("| A | B |\n|---|---|\n| 1 | 2 |", &[]);
        assert!(result.html.contains("<table>"));
    }

    #[test]
    fn test_gfm_disabled() {
        let highlighter = highlighter();
        let known_urls = KnownUrls::default();
        let mut renderer = MarkdownRenderer::new(&highlighter, &known_urls).with_gfm(false);
        let options = renderer.parser_options();
        assert!(!options.contains(Options::ENABLE_TABLES));
        let result = renderer
            .render_markdown("| A | B |\n|---|---|\n| 1 | 2 |")
            .unwrap();
        assert!(!result.html.contains("<table>"));
    }

    #[test]
    fn test_parser_options_default() {
        let highlighter = highlighter();
        let known_urls = KnownUrls::default();
        let options = MarkdownRenderer::new(&highlighter, &known_urls).parser_options();
        assert!(options.contains(Options::ENABLE_TABLES));
        assert!(options.contains(Options::ENABLE_STRIKETHROUGH));
        assert!(options.contains(Options::ENABLE_TASKLISTS));
        assert!(options.contains(Options::ENABLE_GFM));
        assert!(options.contains(Options::ENABLE_SMART_PUNCTUATION));
    }

    #[test]
    fn test_dispatch_other_is_default() {
        let highlighter = highlighter();
        let known_urls = KnownUrls::default();
        let mut renderer = MarkdownRenderer::new(&highlighter, &known_urls);
        let hook = renderer
            .dispatch(Node::Other(Event::Text("hi".into())))
            .unwrap();
        assert_eq!(hook, Hook::Default(Event::Text("hi".into())));
    }

    #[test]
    fn test_dispatch_link_rewrites_destination() {
        let highlighter = highlighter();
        let known_urls = known(&["a-5-five"]);
        let mut renderer = MarkdownRenderer::new(&highlighter, &known_urls);
        let hook = renderer
            .dispatch(Node::Link {
                link_type: LinkType::Inline,
                dest_url: "a-5".into(),
                title: "".into(),
                id: "".into(),
            })
            .unwrap();
        assert_eq!(
            hook,
            Hook::Default(Event::Start(Tag::Link {
                link_type: LinkType::Inline,
                dest_url: "a-5-five".into(),
                title: "".into(),
                id: "".into(),
            }))
        );
    }

    #[test]
    fn test_dispatch_code_block_is_handled() {
        let highlighter = highlighter();
        let known_urls = KnownUrls::default();
        let mut renderer = MarkdownRenderer::new(&highlighter, &known_urls);
        let hook = renderer
            .dispatch(Node::CodeBlock {
                info: "text".into(),
                literal: "a < b\n".to_owned(),
            })
            .unwrap();
        match hook {
            Hook::Handled(html) => assert!(html.contains("a &lt; b")),
            Hook::Default(event) => panic!("code block not handled: {event:?}"),
        }
    }

    fn tokenize_error() -> HighlightError {
        HighlightError::Tokenize {
            language: "Go".to_owned(),
            source: syntect::Error::Fmt(std::fmt::Error),
        }
    }

    #[test]
    fn test_fallback_plain_text_escapes_and_warns() {
        let highlighter = highlighter();
        let known_urls = KnownUrls::default();
        let mut renderer = MarkdownRenderer::new(&highlighter, &known_urls);

        let mut html = String::from("<pre class=\"highlight\"><code>partial");
        renderer
            .apply_fallback(Err(tokenize_error()), "if a < b && c {}\n", &mut html)
            .unwrap();

        assert_eq!(
            html,
            "<pre><code>if a &lt; b &amp;&amp; c {}\n</code></pre>\n"
        );
        assert_eq!(renderer.warnings, vec![tokenize_error().to_string()]);
    }

    #[test]
    fn test_fallback_fail_returns_error() {
        let highlighter = highlighter();
        let known_urls = KnownUrls::default();
        let mut renderer = MarkdownRenderer::new(&highlighter, &known_urls)
            .with_highlight_fallback(HighlightFallback::Fail);

        let mut html = String::new();
        let err = renderer
            .apply_fallback(Err(tokenize_error()), "x", &mut html)
            .unwrap_err();

        assert!(matches!(
            err,
            RenderError::Highlight(HighlightError::Tokenize { .. })
        ));
        assert!(renderer.warnings.is_empty());
    }

    #[test]
    fn test_fallback_success_keeps_highlighted_html() {
        let highlighter = highlighter();
        let known_urls = KnownUrls::default();
        let mut renderer = MarkdownRenderer::new(&highlighter, &known_urls)
            .with_highlight_fallback(HighlightFallback::Fail);

        let mut html = String::from("<pre>ok</pre>");
        renderer.apply_fallback(Ok(()), "ok", &mut html).unwrap();

        assert_eq!(html, "<pre>ok</pre>");
        assert!(renderer.warnings.is_empty());
    }

    #[test]
    fn test_warnings_reset_between_renders() {
        let highlighter = highlighter();
        let known_urls = KnownUrls::default();
        let mut renderer = MarkdownRenderer::new(&highlighter, &known_urls);
        let first = renderer.render_markdown("[x](a-1)").unwrap();
        assert_eq!(first.warnings.len(), 1);
        let second = renderer.render_markdown("plain").unwrap();
        assert!(second.warnings.is_empty());
    }
}
