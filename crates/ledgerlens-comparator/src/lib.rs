//! Ledgerlens Comparator
//!
//! Scores a candidate report against a baseline on their numeric
//! `current_year` / `previous_year` values. Any nested JSON works: extraction
//! reports, grouped reports or hand-written baselines.
//!
//! Degenerate statistics (no nonzero true values, zero variance) are reported
//! as `null`, never as errors.
//!
//! # Examples
//!
//! ```
//! use ledgerlens_comparator::compare;
//! use serde_json::json;
//!
//! let base = json!({"a": {"current_year": 100}});
//! let result = compare(&base, &base);
//!
//! assert_eq!(result.summary.common_fields, 1);
//! assert_eq!(result.metrics.unwrap().accuracy_pct, 100.0);
//! assert!(result.missing_in_gpt.is_empty());
//! ```

#![warn(missing_docs)]

mod amounts;
mod metrics;

pub use amounts::{extract_amounts, AMOUNT_KEYS};
pub use metrics::{compute_metrics, Metrics};

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::info;

/// Field counts
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComparisonSummary {
    /// Amount paths in the baseline
    pub total_fields_mine: usize,

    /// Amount paths in the candidate
    pub total_fields_gpt: usize,

    /// Paths present on both sides
    pub common_fields: usize,

    /// Paths only the candidate has
    pub missing_in_mine: usize,

    /// Paths only the baseline has
    pub missing_in_gpt: usize,

    /// One-sided paths as a share of all paths, in percent
    pub missing_rate_pct: f64,
}

/// Outcome of comparing two reports
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComparisonResult {
    /// Field counts
    pub summary: ComparisonSummary,

    /// Statistics over common paths; null when there are none
    pub metrics: Option<Metrics>,

    /// Sorted paths only the candidate has
    pub missing_in_mine: Vec<String>,

    /// Sorted paths only the baseline has
    pub missing_in_gpt: Vec<String>,
}

/// Compare a candidate report against a baseline
pub fn compare(baseline: &Value, candidate: &Value) -> ComparisonResult {
    let base = extract_amounts(baseline);
    let target = extract_amounts(candidate);

    let missing_in_gpt: Vec<String> = base
        .keys()
        .filter(|path| !target.contains_key(*path))
        .cloned()
        .collect();
    let missing_in_mine: Vec<String> = target
        .keys()
        .filter(|path| !base.contains_key(*path))
        .cloned()
        .collect();
    let common_fields = base.len() - missing_in_gpt.len();
    let union = common_fields + missing_in_gpt.len() + missing_in_mine.len();

    let missing_rate_pct = if union == 0 {
        0.0
    } else {
        let rate = (missing_in_gpt.len() + missing_in_mine.len()) as f64 / union as f64 * 100.0;
        (rate * 100.0).round() / 100.0
    };

    let metrics = compute_metrics(&base, &target);
    info!(
        "Compared {} baseline and {} candidate fields, {} in common",
        base.len(),
        target.len(),
        common_fields
    );

    ComparisonResult {
        summary: ComparisonSummary {
            total_fields_mine: base.len(),
            total_fields_gpt: target.len(),
            common_fields,
            missing_in_mine: missing_in_mine.len(),
            missing_in_gpt: missing_in_gpt.len(),
            missing_rate_pct,
        },
        metrics,
        missing_in_mine,
        missing_in_gpt,
    }
}
