//! Load reports: what a loader left out and why.

use serde::Serialize;

/// A row excluded from the loaded table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RejectedRow {
    /// 1-based row number in the source file.
    pub row: usize,
    pub reason: String,
}

/// A row that was loaded with a value dropped.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RowWarning {
    /// 1-based row number in the source file.
    pub row: usize,
    pub message: String,
}

/// Outcome of loading one file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct LoadReport {
    /// Rows that made it into the table.
    pub accepted: usize,
    pub rejected: Vec<RejectedRow>,
    pub warnings: Vec<RowWarning>,
}

impl LoadReport {
    pub fn reject(&mut self, row: usize, reason: impl Into<String>) {
        self.rejected.push(RejectedRow {
            row,
            reason: reason.into(),
        });
    }

    pub fn warn(&mut self, row: usize, message: impl Into<String>) {
        self.warnings.push(RowWarning {
            row,
            message: message.into(),
        });
    }

    /// True when nothing was rejected or downgraded.
    pub fn is_clean(&self) -> bool {
        self.rejected.is_empty() && self.warnings.is_empty()
    }
}
