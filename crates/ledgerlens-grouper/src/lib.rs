//! Ledgerlens Grouper
//!
//! Reclassifies per-statement extraction output into a financial taxonomy:
//! Assets and Liabilities (Current / Non-current), Equity, Income Statement
//! Items and Other Indicators.
//!
//! Each statement has its own handler:
//!
//! | Statement | Placement |
//! |---|---|
//! | Financial position | by `category_hint`, first matching rule wins |
//! | Profit or loss | entries promoted from one level down |
//! | Cash flows | as profit or loss, routed to Other Indicators |
//! | Changes in equity | rows of an `items` list, keyed by `name` |
//! | anything else | mapping items kept verbatim |
//!
//! Items that cannot be placed are returned in [`GroupingOutcome::skipped`].
//!
//! # Examples
//!
//! ```
//! use ledgerlens_domain::SectionResult;
//! use ledgerlens_grouper::Grouper;
//! use serde_json::json;
//! use std::collections::BTreeMap;
//!
//! let mut sections = BTreeMap::new();
//! sections.insert(
//!     "Statement of financial position".to_string(),
//!     SectionResult::Parsed(json!({
//!         "Cash": {"current_year": 100, "category_hint": "Current Asset"}
//!     })),
//! );
//!
//! let outcome = Grouper::default_taxonomy().group(&sections).unwrap();
//! let current = outcome.grouped.category("Assets").unwrap().subcategory("Current").unwrap();
//! assert!(current.contains_key("Cash"));
//! ```

#![warn(missing_docs)]

mod error;
mod grouper;
mod taxonomy;

pub use error::GrouperError;
pub use grouper::{Grouper, GroupingOutcome, SkippedItem};
pub use taxonomy::{CategorySpec, HintRule, Routing, Taxonomy};
