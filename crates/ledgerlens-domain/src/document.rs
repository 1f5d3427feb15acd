//! Raw document text and statement sections

use crate::StatementKind;

/// Prefix of the page-boundary marker inserted by text extraction
pub const PAGE_MARKER_PREFIX: &str = "--- PAGE";

/// Full document text with embedded page markers
///
/// Produced once by the text-extraction collaborator and never mutated.
///
/// # Examples
///
/// ```
/// use ledgerlens_domain::RawDocument;
///
/// let doc = RawDocument::from_pages(["Cover", "Balance sheet"]);
/// assert_eq!(doc.text(), "\n--- PAGE 1 ---\nCover\n--- PAGE 2 ---\nBalance sheet");
/// assert_eq!(doc.page_count(), 2);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawDocument {
    text: String,
}

impl RawDocument {
    /// Wrap already-extracted text
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }

    /// Build the text blob from per-page strings, inserting a marker before each page
    pub fn from_pages<I, S>(pages: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut text = String::new();
        for (idx, page) in pages.into_iter().enumerate() {
            text.push_str(&format!("\n{} {} ---\n", PAGE_MARKER_PREFIX, idx + 1));
            text.push_str(page.as_ref());
        }
        Self { text }
    }

    /// The full text
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Number of page markers in the text
    pub fn page_count(&self) -> usize {
        self.text.matches(PAGE_MARKER_PREFIX).count()
    }

    /// Length in characters (not bytes)
    pub fn char_len(&self) -> usize {
        self.text.chars().count()
    }
}

impl From<String> for RawDocument {
    fn from(text: String) -> Self {
        Self::new(text)
    }
}

/// A slice of document text attributed to one statement
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Section {
    /// Statement this text belongs to
    pub kind: StatementKind,

    /// Section text, never empty or whitespace-only
    pub text: String,
}

impl Section {
    /// Canonical section name
    pub fn name(&self) -> &'static str {
        self.kind.as_str()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_from_pages_empty() {
        let doc = RawDocument::from_pages(Vec::<String>::new());
        assert_eq!(doc.text(), "");
        assert_eq!(doc.page_count(), 0);
    }

    #[test]
    fn test_char_len_counts_chars() {
        let doc = RawDocument::new("Rp 1.000 – ekuitas");
        assert_eq!(doc.char_len(), 18);
        assert!(doc.text().len() > doc.char_len());
    }

    proptest! {
        #[test]
        fn prop_one_marker_per_page(pages in proptest::collection::vec("[a-z ]{0,40}", 0..8)) {
            let doc = RawDocument::from_pages(&pages);
            prop_assert_eq!(doc.page_count(), pages.len());
            for page in &pages {
                prop_assert!(doc.text().contains(page.as_str()));
            }
        }
    }
}
