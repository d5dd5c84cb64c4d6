//! Fenced code block annotations and the source-file footer.
//!
//! A fence info string has the form `[language] ["|" source path]`, for
//! example `go | github.com/essentialbooks/books/go/main.go`.

use std::borrow::Cow;
use std::fmt::Write;

use crate::util::{escape_html, file_name};

/// Separator between the language and the source path in a fence info string.
const SEPARATOR: char = '|';

/// Error returned for a fence info string that cannot be decoded.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum InfoError {
    /// More than one `|` separator.
    #[error("code block info '{info}' has {count} '|' separators, expected at most 1")]
    TooManySeparators {
        /// The raw info string.
        info: String,
        /// Number of separators found.
        count: usize,
    },
}

/// Decoded fence info string.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CodeBlockInfo {
    /// Language hint, possibly empty.
    pub language: String,
    /// Path or URL of the file the snippet was taken from, possibly empty.
    pub source_path: String,
}

impl CodeBlockInfo {
    /// Parse a fence info string.
    ///
    /// # Examples
    ///
    /// ```
    /// use bookmd_renderer::CodeBlockInfo;
    ///
    /// let info = CodeBlockInfo::parse("go | books/go/main.go").unwrap();
    /// assert_eq!(info.language, "go");
    /// assert_eq!(info.source_path, "books/go/main.go");
    ///
    /// assert!(CodeBlockInfo::parse("go|x|y").is_err());
    /// ```
    pub fn parse(info: &str) -> Result<Self, InfoError> {
        let trimmed = info.trim();
        if trimmed.is_empty() {
            return Ok(Self::default());
        }

        let count = trimmed.matches(SEPARATOR).count();
        match trimmed.split_once(SEPARATOR) {
            None => Ok(Self {
                language: trimmed.to_owned(),
                source_path: String::new(),
            }),
            Some((language, source_path)) if count == 1 => Ok(Self {
                language: language.trim().to_owned(),
                source_path: source_path.trim().to_owned(),
            }),
            Some(_) => Err(InfoError::TooManySeparators {
                info: info.to_owned(),
                count,
            }),
        }
    }
}

/// Wrap highlighted markup with a footer linking to the snippet's source file.
///
/// Returns `highlighted` unchanged when `source_path` is empty. The link label
/// is the final segment of the path and opens in a new tab.
pub fn augment<'a>(highlighted: &'a str, source_path: &str) -> Cow<'a, str> {
    if source_path.is_empty() {
        return Cow::Borrowed(highlighted);
    }

    let mut out = String::with_capacity(highlighted.len() + 256);
    write!(
        out,
        concat!(
            "<div class=\"code-box\">\n",
            "{highlighted}\n",
            "<div class=\"code-box-nav\">\n",
            "<div class=\"code-box-file-name\">\n",
            "<a href=\"{href}\" target=\"_blank\">{label}</a>\n",
            "</div>\n",
            "</div>\n",
            "</div>\n",
        ),
        highlighted = highlighted.trim_end(),
        href = escape_html(source_path),
        label = escape_html(file_name(source_path)),
    )
    .unwrap();
    Cow::Owned(out)
}
