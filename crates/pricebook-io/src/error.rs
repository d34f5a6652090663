//! # IO Error Types
//!
//! Failures that stop a whole file from being read or written.
//!
//! ## Error Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Propagation                                    │
//! │                                                                         │
//! │  calamine / csv / rust_xlsxwriter / std::io                            │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  IoError (this module) ← Adds the path and categorization              │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  CliError (in the shell) ← code IO_ERROR + message                     │
//! │                                                                         │
//! │  Bad rows inside a readable file are NOT here: see LoadReport.         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::path::{Path, PathBuf};

use thiserror::Error;

/// File-level failures.
#[derive(Debug, Error)]
pub enum IoError {
    /// The file could not be opened or read.
    #[error("Cannot read {path}: {message}")]
    Read { path: PathBuf, message: String },

    /// The file extension is not one of the supported formats.
    ///
    /// ## Supported
    /// - Input: `xlsx`, `xlsm`, `xls`, `xlsb`, `ods`, `csv`
    /// - Output: `xlsx`, `csv`
    #[error("Unsupported file type '{extension}' for {path}")]
    UnsupportedExtension { path: PathBuf, extension: String },

    /// The workbook has no worksheet to read.
    #[error("{path} contains no worksheet")]
    WorksheetMissing { path: PathBuf },

    /// The configured header row lies past the last row of the file.
    #[error("Header row {header_row} is beyond the {rows} rows of the file")]
    HeaderRowBeyondData { header_row: usize, rows: usize },

    /// A required column is absent from the header row.
    ///
    /// ## When This Occurs
    /// - Wrong header row offset for the catalog
    /// - A ledger file exported by another tool with renamed columns
    #[error("Missing required column '{column}' (found: {found})")]
    MissingColumn { column: String, found: String },

    /// Building or saving the spreadsheet failed.
    #[error("Spreadsheet write failed: {0}")]
    XlsxWrite(String),

    /// Building the delimited text failed.
    #[error("CSV write failed: {0}")]
    CsvWrite(String),

    /// Writing an export artifact to disk failed.
    #[error("Cannot write {path}: {message}")]
    Write { path: PathBuf, message: String },
}

impl IoError {
    /// Creates a Read error for a path.
    pub fn read(path: &Path, message: impl ToString) -> Self {
        IoError::Read {
            path: path.to_path_buf(),
            message: message.to_string(),
        }
    }

    /// Creates a Write error for a path.
    pub fn write(path: &Path, message: impl ToString) -> Self {
        IoError::Write {
            path: path.to_path_buf(),
            message: message.to_string(),
        }
    }

    /// Creates a MissingColumn error listing the headers that were found.
    pub fn missing_column(column: impl Into<String>, found: &[String]) -> Self {
        IoError::MissingColumn {
            column: column.into(),
            found: found.join(", "),
        }
    }
}

impl From<rust_xlsxwriter::XlsxError> for IoError {
    fn from(err: rust_xlsxwriter::XlsxError) -> Self {
        IoError::XlsxWrite(err.to_string())
    }
}

impl From<csv::Error> for IoError {
    fn from(err: csv::Error) -> Self {
        IoError::CsvWrite(err.to_string())
    }
}

/// Result type for file operations.
pub type IoResult<T> = Result<T, IoError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_column_lists_found_headers() {
        let err = IoError::missing_column("CodProd", &["A".to_string(), "B".to_string()]);
        assert_eq!(
            err.to_string(),
            "Missing required column 'CodProd' (found: A, B)"
        );
    }
}
