//! # Shell Error Type
//!
//! Unified error type for operator commands.
//!
//! ## Error Handling Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Flow in the Shell                              │
//! │                                                                         │
//! │  operator line: "add 54520 1.25"                                       │
//! │         │                                                               │
//! │         ▼                                                               │
//! │  ┌──────────────────────────────────────────────────────────────────┐  │
//! │  │  Command Function                                                │  │
//! │  │  Result<T, CliError>                                             │  │
//! │  │         │                                                        │  │
//! │  │         ▼                                                        │  │
//! │  │  Ledger rule? ──── CoreError::Duplicate ───────────┐            │  │
//! │  │         │                                          │            │  │
//! │  │         ▼                                          ▼            │  │
//! │  │  File problem? ─── IoError::Read ──────────────── CliError ────►│  │
//! │  │         │                                                        │  │
//! │  │         ▼                                                        │  │
//! │  │  Success ──────────────────────────────────────────────────────►│  │
//! │  └──────────────────────────────────────────────────────────────────┘  │
//! │                                                                         │
//! │  stdout:  error [DUPLICATE] Product 54520 is already in the ledger     │
//! │  --json:  {"code":"DUPLICATE","message":"Product 54520 is ..."}        │
//! │                                                                         │
//! │  The session continues after every command error.                      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::fmt;

use pricebook_core::{CoreError, ValidationError};
use pricebook_io::IoError;
use serde::Serialize;

/// Error shown to the operator when a command fails.
///
/// ## Serialization
/// ```json
/// {
///   "code": "NOT_FOUND",
///   "message": "Product 100 is not in the ledger"
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CliError {
    /// Machine-readable error code for scripts
    pub code: ErrorCode,

    /// Human-readable error message for display
    pub message: String,
}

/// Error codes printed with every failed command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// Product code already in the ledger
    Duplicate,

    /// Product code absent from the ledger or the catalog
    NotFound,

    /// Input validation failed
    ValidationError,

    /// A file could not be read or written
    IoError,

    /// The command line could not be parsed
    UsageError,

    /// Invalid environment or startup setting
    ConfigError,

    /// Unexpected failure
    Internal,
}

impl ErrorCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::Duplicate => "DUPLICATE",
            ErrorCode::NotFound => "NOT_FOUND",
            ErrorCode::ValidationError => "VALIDATION_ERROR",
            ErrorCode::IoError => "IO_ERROR",
            ErrorCode::UsageError => "USAGE_ERROR",
            ErrorCode::ConfigError => "CONFIG_ERROR",
            ErrorCode::Internal => "INTERNAL",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl CliError {
    /// Creates a new shell error.
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        CliError {
            code,
            message: message.into(),
        }
    }

    /// Creates a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        CliError::new(ErrorCode::ValidationError, message)
    }

    /// Creates a usage error.
    pub fn usage(message: impl Into<String>) -> Self {
        CliError::new(ErrorCode::UsageError, message)
    }

    /// Creates a configuration error.
    pub fn config(message: impl Into<String>) -> Self {
        CliError::new(ErrorCode::ConfigError, message)
    }

    /// Creates an internal error.
    pub fn internal(message: impl Into<String>) -> Self {
        CliError::new(ErrorCode::Internal, message)
    }
}

/// Converts ledger rule violations to shell errors.
impl From<CoreError> for CliError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::Duplicate { .. } => CliError::new(ErrorCode::Duplicate, err.to_string()),
            CoreError::NotFound { .. } | CoreError::UnknownProduct { .. } => {
                CliError::new(ErrorCode::NotFound, err.to_string())
            }
            CoreError::MissingPackFraction { .. } => CliError::validation(err.to_string()),
            CoreError::Validation(e) => CliError::from(e),
        }
    }
}

impl From<ValidationError> for CliError {
    fn from(err: ValidationError) -> Self {
        CliError::validation(err.to_string())
    }
}

/// Converts file errors to shell errors.
impl From<IoError> for CliError {
    fn from(err: IoError) -> Self {
        match err {
            IoError::XlsxWrite(e) => {
                // Log the actual error but return a generic message
                tracing::error!("Spreadsheet rendering failed: {}", e);
                CliError::new(ErrorCode::IoError, "Spreadsheet export failed")
            }
            IoError::CsvWrite(e) => {
                tracing::error!("CSV rendering failed: {}", e);
                CliError::new(ErrorCode::IoError, "CSV export failed")
            }
            other => CliError::new(ErrorCode::IoError, other.to_string()),
        }
    }
}

impl From<std::io::Error> for CliError {
    fn from(err: std::io::Error) -> Self {
        tracing::error!("Terminal I/O failed: {}", err);
        CliError::internal("Terminal I/O failed")
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.code, self.message)
    }
}

impl std::error::Error for CliError {}

#[cfg(test)]
mod tests {
    use super::*;
    use pricebook_core::ProductCode;

    #[test]
    fn test_core_errors_map_to_codes() {
        let code = ProductCode::new(54520);

        let err = CliError::from(CoreError::Duplicate { product_code: code });
        assert_eq!(err.code, ErrorCode::Duplicate);
        assert_eq!(err.message, "Product 54520 is already in the ledger");

        let err = CliError::from(CoreError::UnknownProduct { product_code: code });
        assert_eq!(err.code, ErrorCode::NotFound);

        let err = CliError::from(CoreError::MissingPackFraction { product_code: code });
        assert_eq!(err.code, ErrorCode::ValidationError);
    }

    #[test]
    fn test_serializes_screaming_code() {
        let err = CliError::validation("bad price");
        let json = serde_json::to_string(&err).unwrap();
        assert_eq!(json, r#"{"code":"VALIDATION_ERROR","message":"bad price"}"#);
        assert_eq!(err.to_string(), "[VALIDATION_ERROR] bad price");
    }

    #[test]
    fn test_render_failures_hide_details() {
        let err = CliError::from(IoError::CsvWrite("buffer".to_string()));
        assert_eq!(err.code, ErrorCode::IoError);
        assert_eq!(err.message, "CSV export failed");
    }
}
