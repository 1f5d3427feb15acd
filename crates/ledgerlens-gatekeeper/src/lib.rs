//! Ledgerlens Gatekeeper
//!
//! Sanity checks for extracted financial statements.
//!
//! The Gatekeeper provides:
//! - Missing and negative value scans (per item, or over a grouped report)
//! - The balance-equation check `Assets = Liabilities + Equity` within a tolerance band
//!
//! Data-quality problems are reported in the result, never raised. The only
//! error is a grouped report that lacks a category the balance check needs.
//!
//! # Examples
//!
//! ```
//! use ledgerlens_domain::{GroupedReport, MetricEntry};
//! use ledgerlens_gatekeeper::{Gatekeeper, ValidationConfig};
//!
//! let mut report = GroupedReport::new();
//! report.add_category("Assets", &["Current", "Non-current"]);
//! report.add_category("Liabilities", &["Current", "Non-current"]);
//! report.add_category("Equity", &[] as &[&str]);
//! report.insert("Assets", Some("Current"), "Cash", MetricEntry::new(100i64).into());
//! report.insert("Liabilities", Some("Current"), "Payables", MetricEntry::new(60i64).into());
//! report.insert("Equity", None, "Share capital", MetricEntry::new(40i64).into());
//!
//! let gatekeeper = Gatekeeper::new(ValidationConfig::default());
//! let result = gatekeeper.validate(&report).unwrap();
//! assert!(result.balance_check.is_balanced);
//! ```

#![warn(missing_docs)]

mod config;
mod error;
mod validator;

pub use config::ValidationConfig;
pub use error::GatekeeperError;
pub use validator::{BalanceCheck, Gatekeeper, ItemCheck, ValidationResult, ValidationSummary};
