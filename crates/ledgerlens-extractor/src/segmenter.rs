//! Statement segmentation
//!
//! Locates each statement by its first label match, skips `label_skip`
//! characters and searches for the next boundary marker. The section ends
//! `chunk_size` characters past the label plus the boundary's offset within
//! the searched tail. Offsets are counted in characters so multi-byte text
//! never splits inside a code point.

use crate::config::SegmenterConfig;
use crate::ExtractorError;
use ledgerlens_domain::{RawDocument, Section, StatementKind};
use regex::{Regex, RegexBuilder};
use tracing::debug;

/// Cuts document text into statement sections
#[derive(Debug, Clone)]
pub struct Segmenter {
    labels: Vec<(StatementKind, Regex)>,
    boundary: Regex,
    chunk_size: usize,
    label_skip: usize,
}

impl Segmenter {
    /// Compile the configured patterns
    pub fn new(config: &SegmenterConfig) -> Result<Self, ExtractorError> {
        let labels = StatementKind::ALL
            .iter()
            .map(|&kind| Ok((kind, case_insensitive(config.label_for(kind))?)))
            .collect::<Result<Vec<_>, ExtractorError>>()?;

        Ok(Self {
            labels,
            boundary: case_insensitive(&config.boundary_pattern)?,
            chunk_size: config.chunk_size,
            label_skip: config.label_skip,
        })
    }

    /// Sections found in the document, in statement order
    ///
    /// Statements with no label match, or whose text is blank, are omitted.
    pub fn segment(&self, document: &RawDocument) -> Vec<Section> {
        let text = document.text();
        let sections: Vec<Section> = self
            .labels
            .iter()
            .filter_map(|(kind, label)| {
                let slice = self.cut(text, label);
                if slice.trim().is_empty() {
                    debug!("No text for {}", kind);
                    return None;
                }
                debug!("{}: {} chars", kind, slice.chars().count());
                Some(Section {
                    kind: *kind,
                    text: slice.to_string(),
                })
            })
            .collect();

        debug!("Segmented {} of {} statements", sections.len(), self.labels.len());
        sections
    }

    fn cut<'t>(&self, text: &'t str, label: &Regex) -> &'t str {
        let Some(found) = label.find(text) else {
            return "";
        };
        let start = found.start();
        let search_from = advance(text, start, self.label_skip);

        match self.boundary.find(&text[search_from..]) {
            Some(boundary) => {
                // offset is relative to the search start, not the label
                let rel = text[search_from..search_from + boundary.start()]
                    .chars()
                    .count();
                let end = advance(text, start, rel + self.chunk_size);
                &text[start..end]
            }
            None => &text[start..],
        }
    }
}

fn case_insensitive(pattern: &str) -> Result<Regex, ExtractorError> {
    Ok(RegexBuilder::new(pattern).case_insensitive(true).build()?)
}

/// Byte offset `chars` characters after `from`, clamped to the end of `text`
fn advance(text: &str, from: usize, chars: usize) -> usize {
    text[from..]
        .char_indices()
        .nth(chars)
        .map(|(offset, _)| from + offset)
        .unwrap_or(text.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn segmenter() -> Segmenter {
        Segmenter::new(&SegmenterConfig::default()).unwrap()
    }

    fn small(chunk_size: usize) -> Segmenter {
        Segmenter::new(&SegmenterConfig {
            chunk_size,
            label_skip: 10,
            ..SegmenterConfig::default()
        })
        .unwrap()
    }

    #[test]
    fn test_all_statements_in_order() {
        let doc = RawDocument::new(
            "Statement of cash flows\nOperating 10\n\
             Statement of financial position\nCash 5\n\
             Statement of changes in equity\nCapital 3\n\
             Statement of profit or loss\nRevenue 7\n",
        );
        let sections = segmenter().segment(&doc);
        let kinds: Vec<_> = sections.iter().map(|s| s.kind).collect();
        assert_eq!(kinds, StatementKind::ALL.to_vec());
    }

    #[test]
    fn test_indonesian_label_only() {
        let doc = RawDocument::new("Laporan posisi keuangan\nKas 100\nNotes to the accounts");
        let sections = segmenter().segment(&doc);

        assert_eq!(sections.len(), 1);
        assert_eq!(sections[0].kind, StatementKind::FinancialPosition);
        assert!(sections[0].text.starts_with("Laporan posisi keuangan"));
    }

    #[test]
    fn test_label_match_is_case_insensitive() {
        let doc = RawDocument::new("STATEMENT OF PROFIT OR LOSS\nRevenue 7");
        let sections = segmenter().segment(&doc);
        assert_eq!(sections.len(), 1);
        assert_eq!(sections[0].kind, StatementKind::ProfitOrLoss);
    }

    #[test]
    fn test_no_labels_no_sections() {
        let doc = RawDocument::new("Directors' report\nNothing to see here");
        assert!(segmenter().segment(&doc).is_empty());
    }

    #[test]
    fn test_empty_document() {
        assert!(segmenter().segment(&RawDocument::new("")).is_empty());
    }

    #[test]
    fn test_no_boundary_runs_to_end() {
        let text = "Statement of financial position\nCash 5\nReceivables 9";
        let sections = segmenter().segment(&RawDocument::new(text));
        assert_eq!(sections[0].text, text);
    }

    #[test]
    fn test_section_ends_at_boundary_offset_plus_chunk_size() {
        // label at 0, boundary "Notes to" found after the 10-char skip
        let text = "Statement of financial position\nCash 5\nNotes to abcdefghij";
        let boundary_at = text.find("Notes to").unwrap();
        let sections = small(4).segment(&RawDocument::new(text));
        assert_eq!(sections[0].text, &text[..boundary_at - 10 + 4]);
        assert_eq!(sections[0].text, "Statement of financial position\nC");
    }

    #[test]
    fn test_chunk_size_covers_the_skip_window() {
        let text = "Statement of financial position\nCash 5\nNotes to abcdefghij";
        let sections = small(14).segment(&RawDocument::new(text));
        assert_eq!(sections[0].text, "Statement of financial position\nCash 5\nNote");
    }

    #[test]
    fn test_default_config_cut() {
        let body = "x".repeat(150);
        let text = format!("Statement of profit or loss\n{}\nNotes to the accounts", body);
        let boundary_at = text.find("Notes to").unwrap();
        let section = Segmenter::new(&SegmenterConfig {
            chunk_size: 0,
            ..SegmenterConfig::default()
        })
        .unwrap()
        .segment(&RawDocument::new(text.clone()))
        .remove(0);
        assert_eq!(section.text.len(), boundary_at - 100);
    }

    #[test]
    fn test_label_inside_skip_window_is_not_a_boundary() {
        // "Laporan" sits inside the skipped prefix and must not end the section
        let text = "Laporan posisi keuangan\nKas 100\nAset 200";
        let sections = small(0).segment(&RawDocument::new(text));
        assert_eq!(sections[0].text, text);
    }

    #[test]
    fn test_page_marker_is_a_boundary() {
        let doc = RawDocument::from_pages(["Statement of financial position\nCash 5", "next page"]);
        // 29 chars from the skip window to the marker, plus the skip itself
        let sections = small(10).segment(&doc);
        assert!(sections[0].text.ends_with("Cash 5\n"));
    }

    #[test]
    fn test_multibyte_text_cut_on_char_boundaries() {
        let text = "Laporan laba rugi\nPendapatan € 1.000 § ½\nCatatan ééééé";
        let sections = small(13).segment(&RawDocument::new(text));
        assert_eq!(sections.len(), 1);
        assert!(sections[0].text.ends_with("Cat"));
    }

    #[test]
    fn test_label_override() {
        let mut config = SegmenterConfig::default();
        config.labels.insert(
            StatementKind::CashFlows.as_str().to_string(),
            "arus kas konsolidasian".to_string(),
        );
        let segmenter = Segmenter::new(&config).unwrap();
        let sections = segmenter.segment(&RawDocument::new("ARUS KAS KONSOLIDASIAN\nKas 1"));
        assert_eq!(sections.len(), 1);
        assert_eq!(sections[0].kind, StatementKind::CashFlows);
    }

    #[test]
    fn test_invalid_pattern_rejected() {
        let config = SegmenterConfig {
            boundary_pattern: "(unclosed".to_string(),
            ..SegmenterConfig::default()
        };
        assert!(matches!(
            Segmenter::new(&config),
            Err(ExtractorError::Config(_))
        ));
    }

    proptest! {
        #[test]
        fn prop_sections_never_blank(text in "\\PC{0,400}") {
            for section in segmenter().segment(&RawDocument::new(text.clone())) {
                prop_assert!(!section.text.trim().is_empty());
                prop_assert!(text.contains(&section.text));
            }
        }
    }
}
