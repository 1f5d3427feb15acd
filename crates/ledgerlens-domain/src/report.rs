//! Pipeline artifacts: the extraction report and the grouped report

use crate::metric::{is_leaf_object, MetricNode};
use chrono::NaiveDate;
use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;

/// Marker stored in a section's error entry when the generator output
/// could not be parsed
pub const INVALID_JSON: &str = "Invalid JSON";

/// Error entry recorded for a section whose generated text did not parse
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SectionFailure {
    /// Error marker
    pub error: String,

    /// The generator's original text
    pub raw: String,
}

impl SectionFailure {
    /// Error entry for unparseable JSON
    pub fn invalid_json(raw: impl Into<String>) -> Self {
        Self {
            error: INVALID_JSON.to_string(),
            raw: raw.into(),
        }
    }
}

/// Outcome of extracting one section
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SectionResult {
    /// Generator output could not be repaired into JSON
    Failed(SectionFailure),

    /// Parsed generator output
    Parsed(Value),
}

impl SectionResult {
    /// Whether this section failed to parse
    pub fn is_failed(&self) -> bool {
        matches!(self, SectionResult::Failed(_))
    }

    /// Parsed payload, if any
    pub fn parsed(&self) -> Option<&Value> {
        match self {
            SectionResult::Parsed(value) => Some(value),
            SectionResult::Failed(_) => None,
        }
    }
}

/// Persisted output of the extraction stage
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtractionReport {
    /// File name of the source document
    pub source_file: String,

    /// Date the extraction ran
    pub extraction_date: NaiveDate,

    /// Names of the sections found, in statement order
    pub sections: Vec<String>,

    /// Per-section results keyed by section name
    pub key_metrics_by_section: BTreeMap<String, SectionResult>,
}

impl ExtractionReport {
    /// Number of sections whose output failed to parse
    pub fn failed_sections(&self) -> usize {
        self.key_metrics_by_section
            .values()
            .filter(|r| r.is_failed())
            .count()
    }
}

/// Items of one bucket, keyed by item name
pub type ItemMap = BTreeMap<String, MetricNode>;

/// A top-level category of the grouped report
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Bucket {
    /// Category divided into subcategories (e.g. Current / Non-current)
    Split(BTreeMap<String, ItemMap>),

    /// Category holding items directly
    Flat(ItemMap),
}

impl Bucket {
    /// Every item with its subcategory (None for flat buckets)
    pub fn entries(&self) -> Vec<(Option<&str>, &str, &MetricNode)> {
        match self {
            Bucket::Split(subcategories) => subcategories
                .iter()
                .flat_map(|(sub, items)| {
                    items
                        .iter()
                        .map(move |(name, node)| (Some(sub.as_str()), name.as_str(), node))
                })
                .collect(),
            Bucket::Flat(items) => items
                .iter()
                .map(|(name, node)| (None, name.as_str(), node))
                .collect(),
        }
    }

    /// Number of items across all subcategories
    pub fn len(&self) -> usize {
        match self {
            Bucket::Split(subcategories) => subcategories.values().map(BTreeMap::len).sum(),
            Bucket::Flat(items) => items.len(),
        }
    }

    /// Whether the bucket holds no items
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Items of one subcategory
    pub fn subcategory(&self, name: &str) -> Option<&ItemMap> {
        match self {
            Bucket::Split(subcategories) => subcategories.get(name),
            Bucket::Flat(_) => None,
        }
    }

    /// Interpret a persisted bucket whose shape is not known in advance
    ///
    /// A non-empty object whose values are all non-leaf objects is read as
    /// split; anything else is flat.
    fn infer(map: Map<String, Value>) -> Self {
        let split = !map.is_empty()
            && map
                .values()
                .all(|v| v.as_object().is_some_and(|inner| !is_leaf_object(inner)));

        if split {
            Bucket::split(map).unwrap_or_else(|_| Bucket::Flat(ItemMap::new()))
        } else {
            Bucket::flat(map)
        }
    }

    /// Read `map` as items keyed by name
    fn flat(map: Map<String, Value>) -> Self {
        Bucket::Flat(
            map.into_iter()
                .map(|(name, node)| (name, MetricNode::from_value(node)))
                .collect(),
        )
    }

    /// Read `map` as subcategories of items; fails on a non-object subcategory
    fn split(map: Map<String, Value>) -> Result<Self, String> {
        let mut subcategories = BTreeMap::new();
        for (sub, items) in map {
            match items {
                Value::Object(items) => {
                    let items = items
                        .into_iter()
                        .map(|(name, node)| (name, MetricNode::from_value(node)))
                        .collect();
                    subcategories.insert(sub, items);
                }
                other => {
                    return Err(format!(
                        "subcategory '{}' must be an object, found {}",
                        sub,
                        json_type(&other)
                    ))
                }
            }
        }
        Ok(Bucket::Split(subcategories))
    }
}

/// Items reclassified into the financial taxonomy
///
/// # Examples
///
/// ```
/// use ledgerlens_domain::{GroupedReport, MetricEntry};
///
/// let mut report = GroupedReport::new();
/// report.add_category("Assets", &["Current", "Non-current"]);
/// report.add_category("Equity", &[] as &[&str]);
///
/// report.insert("Assets", Some("Current"), "Cash", MetricEntry::new(100i64).into());
/// report.insert("Equity", None, "Share capital", MetricEntry::new(60i64).into());
///
/// assert_eq!(report.item_count(), 2);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct GroupedReport {
    categories: BTreeMap<String, Bucket>,
}

impl GroupedReport {
    /// Create an empty report with no categories
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an empty category; an empty subcategory list makes it flat
    pub fn add_category<S: AsRef<str>>(&mut self, name: &str, subcategories: &[S]) {
        let bucket = if subcategories.is_empty() {
            Bucket::Flat(ItemMap::new())
        } else {
            Bucket::Split(
                subcategories
                    .iter()
                    .map(|s| (s.as_ref().to_string(), ItemMap::new()))
                    .collect(),
            )
        };
        self.categories.insert(name.to_string(), bucket);
    }

    /// Place an item, returning the node it replaced
    ///
    /// Returns `None` without inserting when the category or subcategory does
    /// not exist.
    pub fn insert(
        &mut self,
        category: &str,
        subcategory: Option<&str>,
        name: &str,
        node: MetricNode,
    ) -> Option<MetricNode> {
        let items = match (self.categories.get_mut(category)?, subcategory) {
            (Bucket::Split(subs), Some(sub)) => subs.get_mut(sub)?,
            (Bucket::Flat(items), None) => items,
            _ => return None,
        };
        items.insert(name.to_string(), node)
    }

    /// Whether the (category, subcategory) slot exists
    pub fn has_slot(&self, category: &str, subcategory: Option<&str>) -> bool {
        match (self.categories.get(category), subcategory) {
            (Some(Bucket::Split(subs)), Some(sub)) => subs.contains_key(sub),
            (Some(Bucket::Flat(_)), None) => true,
            _ => false,
        }
    }

    /// Look up a category
    pub fn category(&self, name: &str) -> Option<&Bucket> {
        self.categories.get(name)
    }

    /// Iterate categories in name order
    pub fn categories(&self) -> impl Iterator<Item = (&str, &Bucket)> {
        self.categories.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Total number of items across all categories
    pub fn item_count(&self) -> usize {
        self.categories.values().map(Bucket::len).sum()
    }

    /// Read a persisted report, taking bucket shapes from `layout`
    ///
    /// Categories that `layout` defines are read as split or flat to match it,
    /// whatever their items look like. Categories it does not define fall back
    /// to shape inference. Only categories present in `value` are kept.
    ///
    /// # Examples
    ///
    /// ```
    /// use ledgerlens_domain::{Bucket, GroupedReport};
    /// use serde_json::json;
    ///
    /// let mut layout = GroupedReport::new();
    /// layout.add_category("Equity", &[] as &[&str]);
    ///
    /// let value = json!({"Equity": {"Share capital": {"name": "Share capital", "balance": 100}}});
    /// let report = GroupedReport::from_value_with_layout(value, &layout).unwrap();
    ///
    /// assert!(matches!(report.category("Equity"), Some(Bucket::Flat(_))));
    /// assert_eq!(report.item_count(), 1);
    /// ```
    pub fn from_value_with_layout(
        value: Value,
        layout: &GroupedReport,
    ) -> Result<Self, serde_json::Error> {
        match value {
            Value::Object(raw) => Self::from_categories(raw, |name| layout.category(name)),
            other => Err(serde_json::Error::custom(format!(
                "grouped report must be an object, found {}",
                json_type(&other)
            ))),
        }
    }

    fn from_categories<'l, E, F>(raw: Map<String, Value>, layout: F) -> Result<Self, E>
    where
        E: serde::de::Error,
        F: Fn(&str) -> Option<&'l Bucket>,
    {
        let mut categories = BTreeMap::new();
        for (name, value) in raw {
            let map = match value {
                Value::Object(map) => map,
                other => {
                    return Err(E::custom(format!(
                        "category '{}' must be an object, found {}",
                        name,
                        json_type(&other)
                    )))
                }
            };
            let bucket = match layout(&name) {
                Some(Bucket::Split(_)) => Bucket::split(map)
                    .map_err(|e| E::custom(format!("category '{}': {}", name, e)))?,
                Some(Bucket::Flat(_)) => Bucket::flat(map),
                None => Bucket::infer(map),
            };
            categories.insert(name, bucket);
        }
        Ok(Self { categories })
    }
}

/// Without a layout in scope every category's shape is inferred from its
/// data; use [`GroupedReport::from_value_with_layout`] when the taxonomy is
/// known.
impl<'de> Deserialize<'de> for GroupedReport {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = Map::<String, Value>::deserialize(deserializer)?;
        Self::from_categories(raw, |_| None)
    }
}

fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
