//! Statement module - the recognized financial statement types

use std::fmt;

/// Kind of financial statement a document section belongs to
///
/// The declaration order is the order sections are emitted in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum StatementKind {
    /// Balance sheet (assets, liabilities, equity)
    FinancialPosition,

    /// Income statement
    ProfitOrLoss,

    /// Cash flow statement
    CashFlows,

    /// Statement of changes in equity
    ChangesInEquity,
}

impl StatementKind {
    /// All statement kinds, in emission order
    pub const ALL: [StatementKind; 4] = [
        StatementKind::FinancialPosition,
        StatementKind::ProfitOrLoss,
        StatementKind::CashFlows,
        StatementKind::ChangesInEquity,
    ];

    /// Canonical section name used as key in every artifact
    pub fn as_str(&self) -> &'static str {
        match self {
            StatementKind::FinancialPosition => "Statement of financial position",
            StatementKind::ProfitOrLoss => "Statement of profit or loss",
            StatementKind::CashFlows => "Statement of cash flows",
            StatementKind::ChangesInEquity => "Statement of changes in equity",
        }
    }

    /// Default heading pattern (English or Indonesian), matched case-insensitively
    pub fn label_pattern(&self) -> &'static str {
        match self {
            StatementKind::FinancialPosition => {
                "Statement of financial position|Laporan posisi keuangan"
            }
            StatementKind::ProfitOrLoss => "Statement of profit or loss|Laporan laba rugi",
            StatementKind::CashFlows => "Statement of cash flows|Laporan arus kas",
            StatementKind::ChangesInEquity => {
                "Statement of changes in equity|Laporan perubahan ekuitas"
            }
        }
    }

    /// Parse a canonical section name (case-insensitive)
    pub fn parse(s: &str) -> Option<Self> {
        let wanted = s.trim();
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str().eq_ignore_ascii_case(wanted))
    }
}

impl fmt::Display for StatementKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for StatementKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| format!("Unknown statement: {}", s))
    }
}
