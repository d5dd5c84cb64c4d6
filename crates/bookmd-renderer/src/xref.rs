//! Cross-reference resolution between chapters and articles of a book.
//!
//! Links inside a book may use a partial identifier such as `a-20381` or
//! `ch-198`. The full identifier (`a-20381-installing`) carries a slug that
//! can change when a title is edited, so authors only write the stable
//! numeric prefix and the renderer expands it against the book's index.

/// Prefix of article identifiers.
const ARTICLE_PREFIX: &str = "a-";

/// Prefix of chapter identifiers.
const CHAPTER_PREFIX: &str = "ch-";

/// Whether a link destination refers to an article or chapter of the book.
pub fn is_internal_reference(dest: &str) -> bool {
    dest.starts_with(ARTICLE_PREFIX) || dest.starts_with(CHAPTER_PREFIX)
}

/// Outcome of resolving a link destination.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution<'a> {
    /// Not an article or chapter reference; left as-is.
    External,
    /// Destination is already a full identifier from the index.
    Exact,
    /// Partial identifier expanded to a full one.
    Expanded(&'a str),
    /// Internal reference with no matching identifier; left as-is.
    Unresolved,
}

impl<'a> Resolution<'a> {
    /// Destination to emit for the original `dest`.
    pub fn url(self, dest: &'a str) -> &'a str {
        match self {
            Self::Expanded(full) => full,
            Self::External | Self::Exact | Self::Unresolved => dest,
        }
    }
}

/// Ordered index of full article and chapter identifiers of one book.
///
/// Identifiers look like `a-20381-installing` or `ch-198-getting-started`.
/// Order matters: when several identifiers share a prefix, the first one wins.
///
/// # Example
///
/// ```
/// use bookmd_renderer::{KnownUrls, Resolution};
///
/// let urls = KnownUrls::new(vec!["a-123-install-guide".to_owned()]);
/// assert_eq!(urls.resolve("a-123"), Resolution::Expanded("a-123-install-guide"));
/// assert_eq!(urls.resolve("https://example.com"), Resolution::External);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KnownUrls {
    urls: Vec<String>,
}

impl KnownUrls {
    /// Create an index from identifiers in book order.
    #[must_use]
    pub fn new(urls: Vec<String>) -> Self {
        Self { urls }
    }

    /// Number of identifiers.
    pub fn len(&self) -> usize {
        self.urls.len()
    }

    /// Whether the index has no identifiers.
    pub fn is_empty(&self) -> bool {
        self.urls.is_empty()
    }

    /// Identifiers in book order.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.urls.iter().map(String::as_str)
    }

    /// Resolve a link destination against the index.
    ///
    /// Identifiers are scanned in book order and the first one that equals or
    /// starts with `dest` wins. With `["a-1-x", "a-1"]` the partial `a-1`
    /// resolves to `a-1-x` even though `a-1` itself is listed later.
    pub fn resolve<'a>(&'a self, dest: &str) -> Resolution<'a> {
        if !is_internal_reference(dest) {
            return Resolution::External;
        }
        match self.urls.iter().find(|known| known.starts_with(dest)) {
            Some(known) if known == dest => Resolution::Exact,
            Some(known) => Resolution::Expanded(known.as_str()),
            None => Resolution::Unresolved,
        }
    }

    /// Log the index once before rendering a book.
    pub fn log_summary(&self) {
        tracing::debug!(count = self.urls.len(), "Known cross-reference identifiers");
        for url in &self.urls {
            tracing::trace!(url = %url, "Known identifier");
        }
    }
}

impl FromIterator<String> for KnownUrls {
    fn from_iter<I: IntoIterator<Item = String>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}
