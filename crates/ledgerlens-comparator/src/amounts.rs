//! Numeric amount extraction

use serde_json::Value;
use std::collections::BTreeMap;

/// Keys whose numeric values are compared
pub const AMOUNT_KEYS: [&str; 2] = ["current_year", "previous_year"];

/// Numeric `current_year` / `previous_year` values by dotted path
///
/// Paths join object keys with `.` and index array elements as `key[i]`.
/// Booleans, strings and nulls under an amount key are ignored.
///
/// # Examples
///
/// ```
/// use ledgerlens_comparator::extract_amounts;
/// use serde_json::json;
///
/// let amounts = extract_amounts(&json!({
///     "Cash": {"current_year": 100, "previous_year": 90},
///     "Dividends": [{"current_year": 5}]
/// }));
/// assert_eq!(amounts["Cash.current_year"], 100.0);
/// assert_eq!(amounts["Dividends[0].current_year"], 5.0);
/// ```
pub fn extract_amounts(value: &Value) -> BTreeMap<String, f64> {
    let mut amounts = BTreeMap::new();
    walk(value, "", &mut amounts);
    amounts
}

fn walk(value: &Value, prefix: &str, amounts: &mut BTreeMap<String, f64>) {
    match value {
        Value::Object(map) => {
            for (key, child) in map {
                let path = if prefix.is_empty() {
                    key.clone()
                } else {
                    format!("{}.{}", prefix, key)
                };
                match child {
                    Value::Number(n) if AMOUNT_KEYS.contains(&key.as_str()) => {
                        if let Some(v) = n.as_f64() {
                            amounts.insert(path, v);
                        }
                    }
                    _ => walk(child, &path, amounts),
                }
            }
        }
        Value::Array(items) => {
            for (index, item) in items.iter().enumerate() {
                walk(item, &format!("{}[{}]", prefix, index), amounts);
            }
        }
        _ => {}
    }
}
