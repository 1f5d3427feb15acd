//! Missing/negative scans and the balance-equation check

use crate::{GatekeeperError, ValidationConfig};
use ledgerlens_domain::{Bucket, GroupedReport, MetricNode};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

/// Missing and negative item names
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ItemCheck {
    /// Items with no current-period value, or that are not entries at all
    pub missing_values: Vec<String>,

    /// Items whose current-period value is a negative number
    pub negative_values: Vec<String>,

    /// Length of `missing_values`
    pub missing_count: usize,

    /// Length of `negative_values`
    pub negative_count: usize,
}

impl ItemCheck {
    fn record(&mut self, name: &str, node: &MetricNode) {
        match node.as_entry() {
            Some(entry) => match &entry.current_year {
                None => self.missing_values.push(name.to_string()),
                Some(amount) if amount.is_negative() => {
                    self.negative_values.push(name.to_string())
                }
                Some(_) => {}
            },
            None => self.missing_values.push(name.to_string()),
        }
    }

    fn finish(mut self) -> Self {
        self.missing_count = self.missing_values.len();
        self.negative_count = self.negative_values.len();
        self
    }
}

/// Totals and the balance verdict
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BalanceCheck {
    /// Sum of numeric current-period values under the assets category
    pub total_assets: f64,

    /// Sum under the liabilities category
    pub total_liabilities: f64,

    /// Sum under the equity category
    pub total_equity: f64,

    /// |assets - (liabilities + equity)|; null when total assets are not positive
    pub difference: Option<f64>,

    /// Allowed difference; null when total assets are not positive
    #[serde(rename = "tolerance_5pct")]
    pub tolerance: Option<f64>,

    /// Fraction of total assets used for `tolerance`
    pub tolerance_ratio: f64,

    /// Whether the difference is within tolerance
    pub is_balanced: bool,
}

/// Counts for a quick verdict
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationSummary {
    /// Number of missing items
    pub missing_count: usize,

    /// Number of negative items
    pub negative_count: usize,

    /// Mirrors `balance_check.is_balanced`
    pub balance_ok: bool,
}

/// Result of validating a grouped report
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationResult {
    /// Items with no current-period value
    pub missing_values: Vec<String>,

    /// Items with a negative current-period value
    pub negative_values: Vec<String>,

    /// Balance-equation outcome
    pub balance_check: BalanceCheck,

    /// Counts
    pub summary: ValidationSummary,
}

/// The Gatekeeper checks extracted figures for plausibility
pub struct Gatekeeper {
    config: ValidationConfig,
}

impl Gatekeeper {
    /// Create a new Gatekeeper with the given configuration
    pub fn new(config: ValidationConfig) -> Self {
        Self { config }
    }

    /// Create a Gatekeeper with default configuration
    pub fn default_config() -> Self {
        Self::new(ValidationConfig::default())
    }

    /// Active configuration
    pub fn config(&self) -> &ValidationConfig {
        &self.config
    }

    /// Scan extracted items, descending into groups and lists
    ///
    /// Entries are checked under their own key. List rows are named by their
    /// `name` field, falling back to `parent[index]`. Scalars are missing.
    pub fn check_items<'a, I>(&self, items: I) -> ItemCheck
    where
        I: IntoIterator<Item = (&'a str, &'a MetricNode)>,
    {
        let mut check = ItemCheck::default();
        for (name, node) in items {
            Self::walk(&mut check, name, node);
        }
        check.finish()
    }

    fn walk(check: &mut ItemCheck, name: &str, node: &MetricNode) {
        match node {
            MetricNode::Group(children) => {
                for (child_name, child) in children {
                    Self::walk(check, child_name, child);
                }
            }
            MetricNode::List(rows) => {
                for (index, row) in rows.iter().enumerate() {
                    match row.str_field(ledgerlens_domain::metric::NAME) {
                        Some(row_name) => Self::walk(check, row_name, row),
                        None => Self::walk(check, &format!("{}[{}]", name, index), row),
                    }
                }
            }
            _ => check.record(name, node),
        }
    }

    /// Validate a grouped report
    ///
    /// Every item in every category is scanned; an item that is not an entry
    /// counts as missing. The balance check sums numeric current-period values
    /// of the configured assets, liabilities and equity categories.
    ///
    /// # Errors
    ///
    /// Returns `MissingCategory` when one of the three categories is absent.
    pub fn validate(&self, report: &GroupedReport) -> Result<ValidationResult, GatekeeperError> {
        let assets = self.required(report, &self.config.assets_category)?;
        let liabilities = self.required(report, &self.config.liabilities_category)?;
        let equity = self.required(report, &self.config.equity_category)?;

        let mut check = ItemCheck::default();
        for (category, bucket) in report.categories() {
            for (_, name, node) in bucket.entries() {
                check.record(name, node);
            }
            debug!("Scanned {} items in {}", bucket.len(), category);
        }
        let check = check.finish();

        let total_assets = sum_current(assets);
        let total_liabilities = sum_current(liabilities);
        let total_equity = sum_current(equity);
        let tolerance_ratio = self.config.balance_tolerance;

        let (difference, tolerance, is_balanced) = if total_assets > 0.0 {
            let difference = (total_assets - (total_liabilities + total_equity)).abs();
            let tolerance = tolerance_ratio * total_assets;
            (Some(difference), Some(tolerance), difference <= tolerance)
        } else {
            (None, None, false)
        };

        info!(
            "Balance check: assets={} liabilities={} equity={} balanced={}",
            total_assets, total_liabilities, total_equity, is_balanced
        );

        Ok(ValidationResult {
            summary: ValidationSummary {
                missing_count: check.missing_count,
                negative_count: check.negative_count,
                balance_ok: is_balanced,
            },
            missing_values: check.missing_values,
            negative_values: check.negative_values,
            balance_check: BalanceCheck {
                total_assets,
                total_liabilities,
                total_equity,
                difference,
                tolerance,
                tolerance_ratio,
                is_balanced,
            },
        })
    }

    fn required<'r>(
        &self,
        report: &'r GroupedReport,
        category: &str,
    ) -> Result<&'r Bucket, GatekeeperError> {
        report
            .category(category)
            .ok_or_else(|| GatekeeperError::MissingCategory(category.to_string()))
    }
}

fn sum_current(bucket: &Bucket) -> f64 {
    bucket
        .entries()
        .into_iter()
        .filter_map(|(_, _, node)| node.as_entry().and_then(|e| e.current_value()))
        .sum()
}
