//! HTML sanitization policy for published pages.

use ammonia::Builder;

/// Allow-list sanitizer for rendered chapter HTML.
///
/// Starts from ammonia's defaults, which cover user-generated content, and
/// additionally keeps:
/// - `class` and `style` on every element (highlighting and styling)
/// - `target` on `<a>` (source-file links open in a new tab)
///
/// No `rel` attribute is forced onto links, so search engines follow both
/// internal and external links of the book.
pub struct Sanitizer {
    builder: Builder<'static>,
}

impl Sanitizer {
    /// Create a sanitizer with the publishing policy.
    #[must_use]
    pub fn new() -> Self {
        let mut builder = Builder::default();
        builder
            .add_generic_attributes(&["class", "style"])
            .add_tag_attributes("a", &["target"])
            .link_rel(None);
        Self { builder }
    }

    /// Strip everything outside the policy from `html`.
    pub fn clean(&self, html: &str) -> String {
        self.builder.clean(html).to_string()
    }
}

impl Default for Sanitizer {
    fn default() -> Self {
        Self::new()
    }
}
