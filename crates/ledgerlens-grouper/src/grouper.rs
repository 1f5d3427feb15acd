//! Reclassification of extracted items into the taxonomy

use crate::{GrouperError, Taxonomy};
use ledgerlens_domain::metric::{NAME, VALIDATION};
use ledgerlens_domain::{
    ExtractionReport, GroupedReport, MetricNode, SectionResult, StatementKind,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use tracing::{debug, info, warn};

const METRICS_KEY: &str = "metrics";
const ITEMS_KEY: &str = "items";
const ITEM_CHECK_KEYS: [&str; 2] = ["missing_values", "negative_values"];
const NO_CURRENT_YEAR: &str = "no current_year";

/// An input item that was not placed
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkippedItem {
    /// Section the item came from
    pub section: String,

    /// Dotted path within the section; empty for a whole section
    pub path: String,

    /// Why it was skipped
    pub reason: String,
}

/// Grouped report plus what was left out
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct GroupingOutcome {
    /// Items by category
    pub grouped: GroupedReport,

    /// Items not placed
    pub skipped: Vec<SkippedItem>,
}

/// Places extracted items into taxonomy categories
pub struct Grouper {
    taxonomy: Taxonomy,
}

struct Placement<'a> {
    section: &'a str,
    outcome: GroupingOutcome,
}

impl Placement<'_> {
    fn place(&mut self, category: &str, subcategory: Option<&str>, name: &str, node: &MetricNode) {
        if !self.outcome.grouped.has_slot(category, subcategory) {
            self.skip(name, format!("no slot {}/{:?}", category, subcategory));
            return;
        }
        if self
            .outcome
            .grouped
            .insert(category, subcategory, name, node.clone())
            .is_some()
        {
            warn!("'{}' from {} replaced an earlier item in {}", name, self.section, category);
        }
    }

    fn skip(&mut self, path: &str, reason: impl Into<String>) {
        let reason = reason.into();
        debug!("Skipping {}:{} ({})", self.section, path, reason);
        self.outcome.skipped.push(SkippedItem {
            section: self.section.to_string(),
            path: path.to_string(),
            reason,
        });
    }
}

impl Grouper {
    /// Create a grouper for a taxonomy
    pub fn new(taxonomy: Taxonomy) -> Result<Self, GrouperError> {
        taxonomy.validate()?;
        Ok(Self { taxonomy })
    }

    /// Create a grouper with the default five-bucket taxonomy
    pub fn default_taxonomy() -> Self {
        Self {
            taxonomy: Taxonomy::default(),
        }
    }

    /// Active taxonomy
    pub fn taxonomy(&self) -> &Taxonomy {
        &self.taxonomy
    }

    /// Group the sections of an extraction report
    pub fn group_report(&self, report: &ExtractionReport) -> Result<GroupingOutcome, GrouperError> {
        self.group(&report.key_metrics_by_section)
    }

    /// Group section results keyed by section name
    ///
    /// # Errors
    ///
    /// Returns `MissingName` when a changes-in-equity row lacks a name.
    pub fn group(
        &self,
        sections: &BTreeMap<String, SectionResult>,
    ) -> Result<GroupingOutcome, GrouperError> {
        let mut outcome = GroupingOutcome {
            grouped: self.taxonomy.empty_report(),
            skipped: Vec::new(),
        };

        for (section, result) in sections {
            let mut placement = Placement { section, outcome };
            match result {
                SectionResult::Failed(failure) => {
                    placement.skip("", format!("section not extracted: {}", failure.error));
                }
                SectionResult::Parsed(value) => {
                    let root = MetricNode::from_value(unwrap_metrics(value));
                    self.group_section(&mut placement, &root)?;
                }
            }
            outcome = placement.outcome;
        }

        info!(
            "Grouped {} items, skipped {}",
            outcome.grouped.item_count(),
            outcome.skipped.len()
        );
        Ok(outcome)
    }

    fn group_section(
        &self,
        placement: &mut Placement<'_>,
        root: &MetricNode,
    ) -> Result<(), GrouperError> {
        let routing = &self.taxonomy.routing;
        match StatementKind::parse(placement.section) {
            Some(StatementKind::FinancialPosition) => self.by_hint(placement, root),
            Some(StatementKind::ProfitOrLoss) => promote(placement, root, &routing.profit_or_loss),
            Some(StatementKind::CashFlows) => promote(placement, root, &routing.cash_flows),
            Some(StatementKind::ChangesInEquity) => {
                return named_rows(placement, root, &routing.changes_in_equity)
            }
            None => verbatim(placement, root, &routing.generic),
        }
        Ok(())
    }

    fn by_hint(&self, placement: &mut Placement<'_>, root: &MetricNode) {
        let Some(items) = root.as_group() else {
            placement.skip("", format!("expected a mapping of items, found {}", root.kind_name()));
            return;
        };
        for (name, node) in items {
            if !node.is_mapping() {
                placement.skip(name, format!("{} is not a mapping", node.kind_name()));
                continue;
            }
            let hint = node.as_entry().map(|e| e.hint()).unwrap_or("");
            let (category, subcategory) = self.taxonomy.classify(hint);
            placement.place(category, subcategory, name, node);
        }
    }
}

/// Items nested in a `metrics` mapping are the section's items
///
/// Without the envelope, a top-level `validation` is dropped only when it
/// looks like an item-check block; otherwise it is an item like any other.
fn unwrap_metrics(value: &Value) -> Value {
    match value {
        Value::Object(root) => match root.get(METRICS_KEY) {
            Some(metrics @ Value::Object(_)) => metrics.clone(),
            _ => {
                let mut root = root.clone();
                if root.get(VALIDATION).is_some_and(is_item_check) {
                    root.remove(VALIDATION);
                }
                Value::Object(root)
            }
        },
        other => other.clone(),
    }
}

fn is_item_check(value: &Value) -> bool {
    value.as_object().is_some_and(|block| {
        ITEM_CHECK_KEYS.iter().all(|key| block.get(*key).is_some_and(Value::is_array))
    })
}

/// Entries at the top level, plus entries one level down and list rows that
/// carry a `current_year` key
fn promote(placement: &mut Placement<'_>, root: &MetricNode, category: &str) {
    let Some(items) = root.as_group() else {
        placement.skip("", format!("expected a mapping of items, found {}", root.kind_name()));
        return;
    };
    for (key, node) in items {
        match node {
            MetricNode::Leaf(_) => placement.place(category, None, key, node),
            MetricNode::Group(children) => {
                for (child_name, child) in children {
                    if reports_current_year(child) {
                        placement.place(category, None, child_name, child);
                    } else {
                        placement.skip(&format!("{}.{}", key, child_name), NO_CURRENT_YEAR);
                    }
                }
            }
            MetricNode::List(rows) => {
                for (index, row) in rows.iter().enumerate() {
                    if reports_current_year(row) {
                        let name = row.str_field(NAME).unwrap_or(key.as_str());
                        placement.place(category, None, name, row);
                    } else {
                        placement.skip(&format!("{}[{}]", key, index), NO_CURRENT_YEAR);
                    }
                }
            }
            MetricNode::Scalar(_) => {
                placement.skip(key, format!("{} is not a mapping", node.kind_name()))
            }
        }
    }
}

fn reports_current_year(node: &MetricNode) -> bool {
    node.as_entry().is_some_and(|entry| entry.has_current_year())
}

/// Rows of an `items` list, or of a bare list, keyed by their `name`
fn named_rows(
    placement: &mut Placement<'_>,
    root: &MetricNode,
    category: &str,
) -> Result<(), GrouperError> {
    let rows = match root {
        MetricNode::List(rows) => rows.as_slice(),
        MetricNode::Group(children) => {
            match children.get(ITEMS_KEY).and_then(MetricNode::as_list) {
                Some(rows) => rows,
                None => {
                    placement.skip("", "no items list");
                    return Ok(());
                }
            }
        }
        other => {
            placement.skip("", format!("expected a list of rows, found {}", other.kind_name()));
            return Ok(());
        }
    };

    for (index, row) in rows.iter().enumerate() {
        if !row.is_mapping() {
            placement.skip(&format!("{}[{}]", ITEMS_KEY, index), "not a mapping");
            continue;
        }
        let name = row.str_field(NAME).ok_or_else(|| GrouperError::MissingName {
            section: placement.section.to_string(),
            index,
        })?;
        placement.place(category, None, name, row);
    }
    Ok(())
}

/// Mapping-valued items kept as they are
fn verbatim(placement: &mut Placement<'_>, root: &MetricNode, category: &str) {
    let Some(items) = root.as_group() else {
        placement.skip("", format!("expected a mapping of items, found {}", root.kind_name()));
        return;
    };
    for (name, node) in items {
        if node.is_mapping() {
            placement.place(category, None, name, node);
        } else {
            placement.skip(name, format!("{} is not a mapping", node.kind_name()));
        }
    }
}
