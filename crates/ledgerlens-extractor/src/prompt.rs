//! Prompt templates
//!
//! A template is plain text with two placeholders: `{sections}` (the section
//! name) and `{text}` (the section text). `{{` and `}}` produce literal
//! braces, so JSON examples can be written inline. Any other placeholder is
//! rejected when the template is loaded.

use crate::ExtractorError;
use std::collections::BTreeMap;
use std::path::Path;

/// Built-in extraction prompt
pub const DEFAULT_TEMPLATE: &str = r#"You are a financial analyst reading one section of an annual report.

Section: {sections}

Extract every line item of this section as a JSON object. Use the line item
label as the key and give its values for the current and the previous
reporting period. Add a short category_hint such as "Current Asset",
"Non-current Liability", "Equity" or "Revenue".

Return JSON only, in this form:
{{
  "Cash and cash equivalents": {{"current_year": 1200, "previous_year": 950, "category_hint": "Current Asset"}}
}}

Write numbers without thousands separators. Use null for a value that is not reported.

Section text:
{text}
"#;

#[derive(Debug, Clone, PartialEq)]
enum Piece {
    Literal(String),
    Sections,
    Text,
}

/// A parsed prompt template
#[derive(Debug, Clone, PartialEq)]
pub struct PromptTemplate {
    pieces: Vec<Piece>,
}

impl PromptTemplate {
    /// Parse a template
    ///
    /// # Errors
    ///
    /// Returns `Template` for an unknown placeholder, an unclosed `{` or a
    /// lone `}`.
    pub fn new(template: &str) -> Result<Self, ExtractorError> {
        let mut pieces = Vec::new();
        let mut literal = String::new();
        let mut chars = template.chars().peekable();

        while let Some(c) = chars.next() {
            match c {
                '{' if chars.peek() == Some(&'{') => {
                    chars.next();
                    literal.push('{');
                }
                '}' if chars.peek() == Some(&'}') => {
                    chars.next();
                    literal.push('}');
                }
                '{' => {
                    let mut name = String::new();
                    loop {
                        match chars.next() {
                            Some('}') => break,
                            Some(ch) => name.push(ch),
                            None => {
                                return Err(ExtractorError::Template(
                                    "unclosed '{' in template".to_string(),
                                ))
                            }
                        }
                    }
                    let piece = match name.as_str() {
                        "sections" => Piece::Sections,
                        "text" => Piece::Text,
                        other => {
                            return Err(ExtractorError::Template(format!(
                                "unknown placeholder '{{{}}}'",
                                other
                            )))
                        }
                    };
                    if !literal.is_empty() {
                        pieces.push(Piece::Literal(std::mem::take(&mut literal)));
                    }
                    pieces.push(piece);
                }
                '}' => {
                    return Err(ExtractorError::Template(
                        "single '}' in template".to_string(),
                    ))
                }
                other => literal.push(other),
            }
        }
        if !literal.is_empty() {
            pieces.push(Piece::Literal(literal));
        }

        Ok(Self { pieces })
    }

    /// Load template `key` from a TOML file of named templates
    ///
    /// ```toml
    /// [prompts]
    /// extract = """..."""
    /// ```
    pub fn from_file(path: impl AsRef<Path>, key: &str) -> Result<Self, ExtractorError> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|e| {
            ExtractorError::Config(format!("Failed to read {}: {}", path.display(), e))
        })?;
        Self::from_toml(&contents, key)
    }

    /// Load template `key` from TOML text
    pub fn from_toml(contents: &str, key: &str) -> Result<Self, ExtractorError> {
        #[derive(serde::Deserialize)]
        struct PromptFile {
            prompts: BTreeMap<String, String>,
        }

        let file: PromptFile = toml::from_str(contents)
            .map_err(|e| ExtractorError::Config(format!("Failed to parse prompts: {}", e)))?;
        let template = file.prompts.get(key).ok_or_else(|| {
            ExtractorError::Config(format!("No prompt named '{}'", key))
        })?;
        Self::new(template)
    }

    /// Substitute the section name and text
    pub fn render(&self, section: &str, text: &str) -> String {
        let mut out = String::new();
        for piece in &self.pieces {
            match piece {
                Piece::Literal(s) => out.push_str(s),
                Piece::Sections => out.push_str(section),
                Piece::Text => out.push_str(text),
            }
        }
        out
    }
}

/// The parsed [`DEFAULT_TEMPLATE`]
///
/// `DEFAULT_TEMPLATE` always parses (see `test_default_template_parses`). The
/// fallback is a minimal hand-built prompt, never an empty one.
impl Default for PromptTemplate {
    fn default() -> Self {
        Self::new(DEFAULT_TEMPLATE).unwrap_or_else(|_| Self::minimal())
    }
}

impl PromptTemplate {
    /// `Section: {sections}` followed by the section text
    fn minimal() -> Self {
        Self {
            pieces: vec![
                Piece::Literal("Section: ".to_string()),
                Piece::Sections,
                Piece::Literal("\n".to_string()),
                Piece::Text,
            ],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_substitutes_placeholders() {
        let template = PromptTemplate::new("Section {sections}:\n{text}\nEnd {sections}").unwrap();
        assert_eq!(
            template.render("Statement of cash flows", "Operating 10"),
            "Section Statement of cash flows:\nOperating 10\nEnd Statement of cash flows"
        );
    }

    #[test]
    fn test_escaped_braces_are_literal() {
        let template = PromptTemplate::new(r#"{{"a": 1}} {text}"#).unwrap();
        assert_eq!(template.render("s", "t"), r#"{"a": 1} t"#);
    }

    #[test]
    fn test_braces_in_substituted_text_are_untouched() {
        let template = PromptTemplate::new("{text}").unwrap();
        assert_eq!(template.render("s", "{sections}"), "{sections}");
    }

    #[test]
    fn test_unknown_placeholder_rejected() {
        let err = PromptTemplate::new("Extract {company} data").unwrap_err();
        assert!(matches!(err, ExtractorError::Template(ref m) if m.contains("company")));
    }

    #[test]
    fn test_malformed_braces_rejected() {
        assert!(PromptTemplate::new("open { never closed").is_err());
        assert!(PromptTemplate::new("stray } brace").is_err());
    }

    #[test]
    fn test_default_template_parses() {
        let template = PromptTemplate::new(DEFAULT_TEMPLATE).unwrap();
        let prompt = template.render("Statement of financial position", "Cash 5");
        assert!(prompt.contains("Section: Statement of financial position"));
        assert!(prompt.contains(r#""Cash and cash equivalents": {"current_year""#));
        assert!(prompt.ends_with("Cash 5\n"));
        assert_eq!(PromptTemplate::default(), template);
    }

    #[test]
    fn test_minimal_template_keeps_both_placeholders() {
        let template = PromptTemplate::minimal();
        assert_eq!(
            template.render("Statement of cash flows", "Operating 10"),
            "Section: Statement of cash flows\nOperating 10"
        );
        assert_eq!(template, PromptTemplate::new("Section: {sections}\n{text}").unwrap());
    }

    #[test]
    fn test_from_toml_selects_key() {
        let contents = r#"
            [prompts]
            short = "S={sections}"
            long = "L={sections} {text}"
        "#;
        let template = PromptTemplate::from_toml(contents, "long").unwrap();
        assert_eq!(template.render("a", "b"), "L=a b");
        assert!(PromptTemplate::from_toml(contents, "missing").is_err());
    }
}
