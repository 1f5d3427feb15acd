//! Lenient parsing of generator output
//!
//! Generators tend to emit almost-JSON. Before parsing, the text is unwrapped
//! from a markdown code fence and the following rewrites run in order:
//!
//! 1. a comma between two digits is removed (`1,000` becomes `1000`)
//! 2. a comma directly before `}` or `]` is removed
//! 3. the word `None` (any case) becomes `null`

use crate::ExtractorError;
use regex::{Regex, RegexBuilder};
use serde_json::Value;

/// Rewrites near-JSON into parseable JSON
#[derive(Debug, Clone)]
pub struct JsonRepair {
    thousands: Regex,
    trailing_comma: Regex,
    none_literal: Regex,
}

impl JsonRepair {
    /// Compile the rewrite patterns
    pub fn new() -> Result<Self, ExtractorError> {
        Ok(Self {
            thousands: Regex::new(r"(\d),(\d)")?,
            trailing_comma: Regex::new(r",(\s*[}\]])")?,
            none_literal: RegexBuilder::new(r"\bNone\b")
                .case_insensitive(true)
                .build()?,
        })
    }

    /// Apply every rewrite
    pub fn repair(&self, raw: &str) -> String {
        let text = strip_code_fence(raw);
        let text = self.thousands.replace_all(text, "${1}${2}");
        let text = self.trailing_comma.replace_all(&text, "${1}");
        self.none_literal.replace_all(&text, "null").into_owned()
    }

    /// Repair and parse; `None` when the result is still not JSON
    pub fn parse(&self, raw: &str) -> Option<Value> {
        serde_json::from_str(&self.repair(raw)).ok()
    }
}

fn strip_code_fence(response: &str) -> &str {
    let trimmed = response.trim();
    if !trimmed.starts_with("```") {
        return trimmed;
    }
    let body = match trimmed.find('\n') {
        Some(newline) => &trimmed[newline + 1..],
        None => return trimmed,
    };
    body.trim_end().trim_end_matches("```").trim()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn repair() -> JsonRepair {
        JsonRepair::new().unwrap()
    }

    #[test]
    fn test_repairs_thousands_trailing_comma_and_none() {
        let value = repair().parse(r#"{"x": 1,000, "y": None,}"#).unwrap();
        assert_eq!(value, json!({"x": 1000, "y": null}));
    }

    #[test]
    fn test_repairs_multi_group_thousands() {
        let value = repair().parse(r#"{"Revenue": {"current_year": 12,345,678}}"#).unwrap();
        assert_eq!(value["Revenue"]["current_year"], json!(12345678));
    }

    #[test]
    fn test_trailing_comma_in_array() {
        let value = repair().parse("[\"a\", \"b\",\n]").unwrap();
        assert_eq!(value, json!(["a", "b"]));
    }

    #[test]
    fn test_none_any_case_whole_word_only() {
        let value = repair()
            .parse(r#"{"a": NONE, "b": none, "c": "Nonexistent"}"#)
            .unwrap();
        assert_eq!(value, json!({"a": null, "b": null, "c": "Nonexistent"}));
    }

    #[test]
    fn test_code_fence_removed() {
        let raw = "```json\n{\"Cash\": {\"current_year\": 5}}\n```";
        let value = repair().parse(raw).unwrap();
        assert_eq!(value, json!({"Cash": {"current_year": 5}}));
    }

    #[test]
    fn test_plain_json_unchanged() {
        let raw = r#"{"Cash": {"current_year": 5.5, "previous_year": -2}}"#;
        assert_eq!(repair().repair(raw), raw);
    }

    #[test]
    fn test_prose_is_not_json() {
        assert!(repair().parse("I could not find the statement.").is_none());
        assert!(repair().parse("").is_none());
    }
}
