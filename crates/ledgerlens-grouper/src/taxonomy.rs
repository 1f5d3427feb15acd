//! Grouping taxonomy
//!
//! Categories, hint rules and per-statement routing targets. The default is
//! the five-bucket scheme: Assets and Liabilities split into Current and
//! Non-current, Equity, Income Statement Items and Other Indicators.

use crate::GrouperError;
use ledgerlens_domain::GroupedReport;
use serde::{Deserialize, Serialize};

/// A top-level category and its subcategories (empty for a flat category)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategorySpec {
    /// Category name
    pub name: String,

    /// Subcategory names
    #[serde(default)]
    pub subcategories: Vec<String>,
}

impl CategorySpec {
    fn new(name: &str, subcategories: &[&str]) -> Self {
        Self {
            name: name.to_string(),
            subcategories: subcategories.iter().map(|s| s.to_string()).collect(),
        }
    }
}

/// Case-sensitive substring rule: a hint containing `pattern` maps to `target`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HintRule {
    /// Substring looked for in the hint
    pub pattern: String,

    /// Category or subcategory chosen on a match
    pub target: String,
}

impl HintRule {
    fn new(pattern: &str, target: &str) -> Self {
        Self {
            pattern: pattern.to_string(),
            target: target.to_string(),
        }
    }
}

/// Destination categories for statements that bypass hint classification
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Routing {
    /// Promoted profit-or-loss items
    pub profit_or_loss: String,

    /// Named changes-in-equity rows
    pub changes_in_equity: String,

    /// Promoted cash-flow items
    pub cash_flows: String,

    /// Items of sections with no dedicated handler
    pub generic: String,
}

impl Default for Routing {
    fn default() -> Self {
        Self {
            profit_or_loss: "Income Statement Items".to_string(),
            changes_in_equity: "Equity".to_string(),
            cash_flows: "Other Indicators".to_string(),
            generic: "Other Indicators".to_string(),
        }
    }
}

/// Grouping rules
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Taxonomy {
    /// Category used when no hint rule matches
    pub fallback_category: String,

    /// Subcategory used when no subcategory rule matches
    pub default_subcategory: String,

    /// Categories, in declaration order
    pub categories: Vec<CategorySpec>,

    /// Ordered hint → category rules; the first match wins
    pub hint_rules: Vec<HintRule>,

    /// Ordered hint → subcategory rules for split categories
    pub subcategory_rules: Vec<HintRule>,

    /// Per-statement destinations
    pub routing: Routing,
}

impl Default for Taxonomy {
    fn default() -> Self {
        Self {
            fallback_category: "Other Indicators".to_string(),
            default_subcategory: "Non-current".to_string(),
            categories: vec![
                CategorySpec::new("Assets", &["Current", "Non-current"]),
                CategorySpec::new("Liabilities", &["Current", "Non-current"]),
                CategorySpec::new("Equity", &[]),
                CategorySpec::new("Income Statement Items", &[]),
                CategorySpec::new("Other Indicators", &[]),
            ],
            hint_rules: vec![
                HintRule::new("Asset", "Assets"),
                HintRule::new("Liabilit", "Liabilities"),
                HintRule::new("Equity", "Equity"),
            ],
            subcategory_rules: vec![
                HintRule::new("Non-current", "Non-current"),
                HintRule::new("Non-Current", "Non-current"),
                HintRule::new("Noncurrent", "Non-current"),
                HintRule::new("Current", "Current"),
            ],
            routing: Routing::default(),
        }
    }
}

impl Taxonomy {
    /// Load a taxonomy from TOML text
    pub fn from_toml(toml_str: &str) -> Result<Self, GrouperError> {
        let taxonomy: Self = toml::from_str(toml_str)
            .map_err(|e| GrouperError::Config(format!("Failed to parse taxonomy: {}", e)))?;
        taxonomy.validate()?;
        Ok(taxonomy)
    }

    /// Check that every rule and route points at an existing slot
    pub fn validate(&self) -> Result<(), GrouperError> {
        let mut seen = std::collections::BTreeSet::new();
        for category in &self.categories {
            if !seen.insert(category.name.as_str()) {
                return Err(GrouperError::Config(format!(
                    "duplicate category '{}'",
                    category.name
                )));
            }
        }

        for rule in &self.hint_rules {
            let category = self.category(&rule.target)?;
            if !category.subcategories.is_empty()
                && !category.subcategories.contains(&self.default_subcategory)
            {
                return Err(GrouperError::Config(format!(
                    "category '{}' has no default subcategory '{}'",
                    category.name, self.default_subcategory
                )));
            }
        }

        self.flat_category(&self.fallback_category)?;
        self.flat_category(&self.routing.profit_or_loss)?;
        self.flat_category(&self.routing.changes_in_equity)?;
        self.flat_category(&self.routing.cash_flows)?;
        self.flat_category(&self.routing.generic)?;
        Ok(())
    }

    /// An empty report holding every category
    pub fn empty_report(&self) -> GroupedReport {
        let mut report = GroupedReport::new();
        for category in &self.categories {
            report.add_category(&category.name, &category.subcategories);
        }
        report
    }

    /// Category and subcategory for a hint
    ///
    /// The subcategory is `None` for flat categories. A subcategory rule
    /// naming a slot the category lacks falls back to the default.
    pub fn classify(&self, hint: &str) -> (&str, Option<&str>) {
        let category = self
            .hint_rules
            .iter()
            .find(|rule| hint.contains(rule.pattern.as_str()))
            .map(|rule| rule.target.as_str())
            .unwrap_or(self.fallback_category.as_str());

        let split = self
            .categories
            .iter()
            .find(|c| c.name == category)
            .filter(|c| !c.subcategories.is_empty());

        let subcategory = split.map(|spec| {
            self.subcategory_rules
                .iter()
                .find(|rule| hint.contains(rule.pattern.as_str()))
                .map(|rule| rule.target.as_str())
                .filter(|sub| spec.subcategories.iter().any(|s| s.as_str() == *sub))
                .unwrap_or(self.default_subcategory.as_str())
        });

        (category, subcategory)
    }

    fn category(&self, name: &str) -> Result<&CategorySpec, GrouperError> {
        self.categories
            .iter()
            .find(|c| c.name == name)
            .ok_or_else(|| GrouperError::Config(format!("unknown category '{}'", name)))
    }

    fn flat_category(&self, name: &str) -> Result<(), GrouperError> {
        if self.category(name)?.subcategories.is_empty() {
            Ok(())
        } else {
            Err(GrouperError::Config(format!(
                "routing target '{}' must be a flat category",
                name
            )))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_taxonomy_is_valid() {
        let taxonomy = Taxonomy::default();
        assert!(taxonomy.validate().is_ok());
        let report = taxonomy.empty_report();
        assert_eq!(report.categories().count(), 5);
        assert!(report.has_slot("Assets", Some("Non-current")));
        assert!(report.has_slot("Income Statement Items", None));
    }

    #[test]
    fn test_classify_hint_rules() {
        let taxonomy = Taxonomy::default();
        assert_eq!(taxonomy.classify("Current Asset"), ("Assets", Some("Current")));
        assert_eq!(taxonomy.classify("Non-current Asset"), ("Assets", Some("Non-current")));
        assert_eq!(taxonomy.classify("Non-Current Asset"), ("Assets", Some("Non-current")));
        assert_eq!(taxonomy.classify("Noncurrent Assets"), ("Assets", Some("Non-current")));
        assert_eq!(taxonomy.classify("Asset"), ("Assets", Some("Non-current")));
        assert_eq!(
            taxonomy.classify("Current Liabilities"),
            ("Liabilities", Some("Current"))
        );
        assert_eq!(taxonomy.classify("Equity"), ("Equity", None));
        assert_eq!(taxonomy.classify(""), ("Other Indicators", None));
        assert_eq!(taxonomy.classify("Revenue"), ("Other Indicators", None));
    }

    #[test]
    fn test_classify_is_case_sensitive() {
        let taxonomy = Taxonomy::default();
        assert_eq!(taxonomy.classify("current asset"), ("Other Indicators", None));
    }

    #[test]
    fn test_first_rule_wins() {
        let taxonomy = Taxonomy::default();
        assert_eq!(
            taxonomy.classify("Asset held against Liabilities"),
            ("Assets", Some("Non-current"))
        );
    }

    #[test]
    fn test_from_toml_custom_taxonomy() {
        let toml_str = r#"
            fallback_category = "Memo"
            default_subcategory = "Long-term"

            [[categories]]
            name = "Assets"
            subcategories = ["Short-term", "Long-term"]

            [[categories]]
            name = "Memo"

            [[hint_rules]]
            pattern = "Aset"
            target = "Assets"

            [[subcategory_rules]]
            pattern = "lancar"
            target = "Short-term"

            [routing]
            profit_or_loss = "Memo"
            changes_in_equity = "Memo"
            cash_flows = "Memo"
            generic = "Memo"
        "#;
        let taxonomy = Taxonomy::from_toml(toml_str).unwrap();
        assert_eq!(taxonomy.classify("Aset lancar"), ("Assets", Some("Short-term")));
        assert_eq!(taxonomy.classify("Aset tetap"), ("Assets", Some("Long-term")));
        assert_eq!(taxonomy.classify("Kas"), ("Memo", None));
    }

    #[test]
    fn test_unknown_rule_target_rejected() {
        let mut taxonomy = Taxonomy::default();
        taxonomy.hint_rules.push(HintRule::new("Goodwill", "Intangibles"));
        assert!(matches!(taxonomy.validate(), Err(GrouperError::Config(_))));
    }

    #[test]
    fn test_split_routing_target_rejected() {
        let mut taxonomy = Taxonomy::default();
        taxonomy.routing.cash_flows = "Assets".to_string();
        assert!(taxonomy.validate().is_err());
    }

    #[test]
    fn test_duplicate_category_rejected() {
        let mut taxonomy = Taxonomy::default();
        taxonomy.categories.push(CategorySpec::new("Equity", &[]));
        assert!(taxonomy.validate().is_err());
    }
}
