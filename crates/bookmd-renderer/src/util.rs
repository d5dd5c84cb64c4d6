//! Shared utility functions for markdown rendering.

use std::borrow::Cow;

/// Escape HTML special characters for text and attribute contexts.
///
/// # Examples
///
/// ```
/// use bookmd_renderer::escape_html;
///
/// assert_eq!(escape_html("a < b"), "a &lt; b");
/// assert_eq!(escape_html("plain"), "plain");
/// ```
pub fn escape_html(s: &str) -> Cow<'_, str> {
    if !s.contains(['&', '<', '>', '"', '\'']) {
        return Cow::Borrowed(s);
    }

    let mut out = String::with_capacity(s.len() + 16);
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    Cow::Owned(out)
}

/// Final segment of a slash-separated path.
///
/// Trailing slashes are ignored, so `src/main/` yields `main`. A path made
/// only of slashes is returned as-is.
///
/// # Examples
///
/// ```
/// use bookmd_renderer::file_name;
///
/// assert_eq!(file_name("github.com/org/books/go/main.go"), "main.go");
/// assert_eq!(file_name("main.go"), "main.go");
/// ```
pub fn file_name(path: &str) -> &str {
    let trimmed = path.trim_end_matches('/');
    match trimmed.rsplit('/').next() {
        Some(segment) if !segment.is_empty() => segment,
        _ => path,
    }
}

/// Replace tab characters with `width` spaces.
pub(crate) fn expand_tabs(source: &str, width: usize) -> Cow<'_, str> {
    if source.contains('\t') {
        Cow::Owned(source.replace('\t', &" ".repeat(width)))
    } else {
        Cow::Borrowed(source)
    }
}
