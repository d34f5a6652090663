//! # pricebook-io: File Formats for Pricebook
//!
//! Reads the two operator inputs (catalog and initial ledger) and writes the
//! ledger back out as a typed spreadsheet and as delimited text.
//!
//! ## Data Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  catalog.xlsx ──► table::read_table ──► catalog_loader ──► Catalog      │
//! │                        │                      │                         │
//! │                        │                      └──► LoadReport           │
//! │                        ▼                                                │
//! │  base.xlsx ─────► table::read_table ──► ledger_loader ───► Ledger       │
//! │                                               │                         │
//! │                                               └──► LoadReport           │
//! │                                                                         │
//! │  Ledger ──► export::to_spreadsheet ──► base_actualizada.xlsx            │
//! │        └──► export::to_delimited_text ──► base_actualizada.csv          │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! A row that cannot be coerced is never an error: it is left out and listed
//! in the [`LoadReport`]. Errors are reserved for files that cannot be read
//! at all.

pub mod catalog_loader;
pub mod error;
pub mod export;
pub mod ledger_loader;
pub mod report;
pub mod table;

pub use catalog_loader::{load_catalog, CatalogLoadOptions};
pub use error::{IoError, IoResult};
pub use export::{
    to_delimited_text, to_spreadsheet, write_delimited_text, write_spreadsheet, ExportFormat,
    SheetName, SpreadsheetOptions,
};
pub use ledger_loader::load_ledger;
pub use report::{LoadReport, RejectedRow, RowWarning};

// =============================================================================
// Ledger Columns
// =============================================================================

/// Facility code column of the ledger file.
pub const COL_FACILITY: &str = "CodEstab";

/// Product code column of the ledger file.
pub const COL_PRODUCT: &str = "CodProd";

/// Box price column.
pub const COL_TOTAL_PRICE: &str = "Precio 1";

/// Unit price column.
pub const COL_UNIT_PRICE: &str = "Precio 2";

/// The fixed ledger columns, in export order.
pub const LEDGER_COLUMNS: [&str; 4] = [COL_FACILITY, COL_PRODUCT, COL_TOTAL_PRICE, COL_UNIT_PRICE];

/// Row index of the catalog header when nothing else is configured.
///
/// The catalog files carry six rows of report banner above the table.
pub const DEFAULT_CATALOG_HEADER_ROW: usize = 6;

/// File stem of the export artifacts.
pub const EXPORT_FILE_STEM: &str = "base_actualizada";
