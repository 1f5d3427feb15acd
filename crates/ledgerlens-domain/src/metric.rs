//! Metric module - extracted financial facts and the shapes they arrive in
//!
//! Generator output is irregular: a statement may list flat items, nest them
//! under activity groups, or emit arrays of named rows. [`MetricNode`] captures
//! all of these so each pipeline stage can match exhaustively instead of
//! probing JSON values ad hoc.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Number, Value};
use std::collections::BTreeMap;

/// Field holding the current-period value
pub const CURRENT_YEAR: &str = "current_year";

/// Field holding the comparative-period value
pub const PREVIOUS_YEAR: &str = "previous_year";

/// Field holding the free-text classification signal
pub const CATEGORY_HINT: &str = "category_hint";

/// Field holding per-item check results
pub const VALIDATION: &str = "validation";

/// Field naming a row inside a list
pub const NAME: &str = "name";

/// A reported value: a JSON number, or whatever else the generator wrote
///
/// Non-numeric values are kept as-is and never coerced.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Amount {
    /// A JSON number (integer or float, preserved as written)
    Number(Number),

    /// Any other non-null value, e.g. `"1.2 bn"`
    Other(Value),
}

impl Amount {
    /// Convert a JSON value; `null` is an absent amount
    pub fn from_value(value: Value) -> Option<Self> {
        match value {
            Value::Null => None,
            Value::Number(n) => Some(Amount::Number(n)),
            other => Some(Amount::Other(other)),
        }
    }

    /// Numeric value, if this amount is a number
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Amount::Number(n) => n.as_f64(),
            Amount::Other(_) => None,
        }
    }

    /// Whether this is a negative number
    pub fn is_negative(&self) -> bool {
        self.as_f64().is_some_and(|v| v < 0.0)
    }
}

impl From<f64> for Amount {
    fn from(v: f64) -> Self {
        Number::from_f64(v)
            .map(Amount::Number)
            .unwrap_or(Amount::Other(Value::Null))
    }
}

impl From<i64> for Amount {
    fn from(v: i64) -> Self {
        Amount::Number(Number::from(v))
    }
}

/// A leaf financial fact
///
/// Fields other than the well-known ones are preserved in `extra` so the
/// entry serializes back to what the generator produced.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct MetricEntry {
    /// Current-period value
    pub current_year: Option<Amount>,

    /// Comparative-period value
    pub previous_year: Option<Amount>,

    /// Free-text classification signal from the extraction step
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category_hint: Option<String>,

    /// Per-item check results attached after extraction
    #[serde(skip_serializing_if = "Option::is_none")]
    pub validation: Option<Value>,

    /// Every other field, verbatim
    #[serde(flatten)]
    pub extra: Map<String, Value>,

    /// Whether the source object had a `current_year` key, even if `null`
    ///
    /// `current_year` is always serialized, so a reloaded entry has the key.
    #[serde(skip)]
    pub current_year_key: bool,
}

impl MetricEntry {
    /// Create an entry with a current-period value
    pub fn new(current_year: impl Into<Amount>) -> Self {
        Self {
            current_year: Some(current_year.into()),
            current_year_key: true,
            ..Self::default()
        }
    }

    /// Set the comparative-period value
    pub fn with_previous_year(mut self, previous_year: impl Into<Amount>) -> Self {
        self.previous_year = Some(previous_year.into());
        self
    }

    /// Set the category hint
    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.category_hint = Some(hint.into());
        self
    }

    /// Set the `name` field used by list rows
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.extra.insert(NAME.to_string(), Value::String(name.into()));
        self
    }

    /// Build an entry from a JSON object
    ///
    /// A `category_hint` that is not a string stays in `extra`.
    pub fn from_map(mut map: Map<String, Value>) -> Self {
        let current_year_key = map.contains_key(CURRENT_YEAR);
        let current_year = map.remove(CURRENT_YEAR).and_then(Amount::from_value);
        let previous_year = map.remove(PREVIOUS_YEAR).and_then(Amount::from_value);
        let category_hint = match map.remove(CATEGORY_HINT) {
            Some(Value::String(hint)) => Some(hint),
            Some(Value::Null) | None => None,
            Some(other) => {
                map.insert(CATEGORY_HINT.to_string(), other);
                None
            }
        };
        let validation = map.remove(VALIDATION).filter(|v| !v.is_null());

        Self {
            current_year,
            previous_year,
            category_hint,
            validation,
            extra: map,
            current_year_key,
        }
    }

    /// The `name` field, when present and a string
    pub fn name(&self) -> Option<&str> {
        self.extra.get(NAME).and_then(Value::as_str)
    }

    /// Whether the entry reports a current period at all
    ///
    /// True for an explicit `"current_year": null`, false when the key was
    /// never written.
    pub fn has_current_year(&self) -> bool {
        self.current_year_key || self.current_year.is_some()
    }

    /// Numeric current-period value
    pub fn current_value(&self) -> Option<f64> {
        self.current_year.as_ref().and_then(Amount::as_f64)
    }

    /// Category hint, empty when absent
    pub fn hint(&self) -> &str {
        self.category_hint.as_deref().unwrap_or("")
    }
}

impl<'de> Deserialize<'de> for MetricEntry {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let map = Map::<String, Value>::deserialize(deserializer)?;
        Ok(Self::from_map(map))
    }
}

/// Returns true when a JSON object looks like a leaf fact
pub fn is_leaf_object(map: &Map<String, Value>) -> bool {
    map.contains_key(CURRENT_YEAR)
        || map.contains_key(PREVIOUS_YEAR)
        || map.contains_key(CATEGORY_HINT)
}

/// One node of extracted statement data
///
/// # Examples
///
/// ```
/// use ledgerlens_domain::MetricNode;
/// use serde_json::json;
///
/// let node = MetricNode::from_value(json!({
///     "Operating activities": {
///         "Cash receipts": {"current_year": 120, "previous_year": 100}
///     },
///     "note": "unaudited"
/// }));
///
/// let group = node.as_group().unwrap();
/// assert!(group["Operating activities"].as_group().is_some());
/// assert!(matches!(group["note"], MetricNode::Scalar(_)));
/// ```
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum MetricNode {
    /// An object carrying `current_year`, `previous_year` or `category_hint`
    Leaf(MetricEntry),

    /// Any other object: named children
    Group(BTreeMap<String, MetricNode>),

    /// An array
    List(Vec<MetricNode>),

    /// Strings, numbers, booleans and null
    Scalar(Value),
}

impl MetricNode {
    /// Classify a JSON value
    pub fn from_value(value: Value) -> Self {
        match value {
            Value::Object(map) if is_leaf_object(&map) => {
                MetricNode::Leaf(MetricEntry::from_map(map))
            }
            Value::Object(map) => MetricNode::Group(
                map.into_iter()
                    .map(|(k, v)| (k, MetricNode::from_value(v)))
                    .collect(),
            ),
            Value::Array(items) => {
                MetricNode::List(items.into_iter().map(MetricNode::from_value).collect())
            }
            other => MetricNode::Scalar(other),
        }
    }

    /// Convert back to a JSON value
    pub fn to_value(&self) -> Value {
        serde_json::to_value(self).unwrap_or(Value::Null)
    }

    /// Whether this node came from a JSON object
    pub fn is_mapping(&self) -> bool {
        matches!(self, MetricNode::Leaf(_) | MetricNode::Group(_))
    }

    /// The leaf entry, if this is a leaf
    pub fn as_entry(&self) -> Option<&MetricEntry> {
        match self {
            MetricNode::Leaf(entry) => Some(entry),
            _ => None,
        }
    }

    /// Named children, if this is a group
    pub fn as_group(&self) -> Option<&BTreeMap<String, MetricNode>> {
        match self {
            MetricNode::Group(children) => Some(children),
            _ => None,
        }
    }

    /// Elements, if this is a list
    pub fn as_list(&self) -> Option<&[MetricNode]> {
        match self {
            MetricNode::List(items) => Some(items),
            _ => None,
        }
    }

    /// A string field of a mapping node (leaf extras or group child)
    pub fn str_field(&self, key: &str) -> Option<&str> {
        match self {
            MetricNode::Leaf(entry) => entry.extra.get(key).and_then(Value::as_str),
            MetricNode::Group(children) => match children.get(key) {
                Some(MetricNode::Scalar(Value::String(s))) => Some(s),
                _ => None,
            },
            _ => None,
        }
    }

    /// Short shape name for diagnostics
    pub fn kind_name(&self) -> &'static str {
        match self {
            MetricNode::Leaf(_) => "entry",
            MetricNode::Group(_) => "group",
            MetricNode::List(_) => "list",
            MetricNode::Scalar(Value::Null) => "null",
            MetricNode::Scalar(_) => "scalar",
        }
    }
}

impl From<MetricEntry> for MetricNode {
    fn from(entry: MetricEntry) -> Self {
        MetricNode::Leaf(entry)
    }
}

impl<'de> Deserialize<'de> for MetricNode {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Value::deserialize(deserializer).map(MetricNode::from_value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_leaf_detection() {
        assert!(matches!(
            MetricNode::from_value(json!({"current_year": null})),
            MetricNode::Leaf(_)
        ));
        assert!(matches!(
            MetricNode::from_value(json!({"category_hint": "Current Asset"})),
            MetricNode::Leaf(_)
        ));
        assert!(matches!(
            MetricNode::from_value(json!({"amount": 5})),
            MetricNode::Group(_)
        ));
        assert!(matches!(
            MetricNode::from_value(json!([1, 2])),
            MetricNode::List(_)
        ));
        assert!(matches!(
            MetricNode::from_value(json!("n/a")),
            MetricNode::Scalar(_)
        ));
    }

    #[test]
    fn test_entry_keeps_unknown_fields() {
        let entry = MetricEntry::from_map(
            json!({
                "current_year": 1500,
                "previous_year": "1.2 bn",
                "category_hint": "Current Asset",
                "unit": "IDR",
                "name": "Cash"
            })
            .as_object()
            .cloned()
            .unwrap(),
        );

        assert_eq!(entry.current_value(), Some(1500.0));
        assert_eq!(entry.previous_year, Some(Amount::Other(json!("1.2 bn"))));
        assert_eq!(entry.hint(), "Current Asset");
        assert_eq!(entry.name(), Some("Cash"));
        assert_eq!(entry.extra.get("unit"), Some(&json!("IDR")));
    }

    #[test]
    fn test_current_year_key_presence() {
        let explicit = MetricNode::from_value(json!({"current_year": null}));
        assert!(explicit.as_entry().unwrap().has_current_year());

        let absent = MetricNode::from_value(json!({"previous_year": 5}));
        assert!(!absent.as_entry().unwrap().has_current_year());

        assert!(MetricEntry::new(1i64).has_current_year());
        assert!(!MetricEntry::default().with_hint("Equity").has_current_year());
    }

    #[test]
    fn test_non_string_hint_stays_in_extra() {
        let node = MetricNode::from_value(json!({"current_year": 1, "category_hint": 7}));
        let entry = node.as_entry().unwrap();
        assert!(entry.category_hint.is_none());
        assert_eq!(entry.extra.get("category_hint"), Some(&json!(7)));
    }

    #[test]
    fn test_integers_serialize_as_written() {
        let node = MetricNode::from_value(json!({"current_year": 100, "previous_year": 2.5}));
        let value = node.to_value();
        assert_eq!(value["current_year"], json!(100));
        assert_eq!(value["previous_year"], json!(2.5));
    }

    #[test]
    fn test_absent_amounts_serialize_as_null() {
        let value = MetricNode::from(MetricEntry::default().with_hint("Equity")).to_value();
        assert_eq!(
            value,
            json!({"current_year": null, "previous_year": null, "category_hint": "Equity"})
        );
    }

    #[test]
    fn test_negative_detection() {
        assert!(Amount::from(-3i64).is_negative());
        assert!(!Amount::from(0i64).is_negative());
        assert!(!Amount::Other(json!("-3")).is_negative());
    }

    #[test]
    fn test_str_field() {
        let leaf = MetricNode::from_value(json!({"name": "Capital", "current_year": 1}));
        assert_eq!(leaf.str_field("name"), Some("Capital"));

        let group = MetricNode::from_value(json!({"name": "Reserves", "amount": 1}));
        assert_eq!(group.str_field("name"), Some("Reserves"));

        let missing = MetricNode::from_value(json!({"current_year": 1}));
        assert_eq!(missing.str_field("name"), None);
    }
}
