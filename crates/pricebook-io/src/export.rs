//! # Export Serializer
//!
//! Renders the ledger as a typed spreadsheet and as delimited text.
//!
//! ## Column Typing
//! ```text
//! ┌──────────────┬──────────────┬──────────────┬──────────────┬─────────────┐
//! │  CodEstab    │  CodProd     │  Precio 1    │  Precio 2    │ passthrough │
//! ├──────────────┼──────────────┼──────────────┼──────────────┼─────────────┤
//! │  text  "@"   │  text  "@"   │  number 0.00 │  number 0.00 │  as loaded  │
//! │  "0021870"   │  "54520"     │  37.5        │  1.25        │             │
//! └──────────────┴──────────────┴──────────────┴──────────────┴─────────────┘
//!   every column 15 wide; typed columns in Calibri
//! ```
//!
//! Codes are written as strings so a spreadsheet never drops the leading
//! zeros of `CodEstab` or shows a long `CodProd` in exponent notation.

use std::fmt;
use std::path::Path;
use std::str::FromStr;

use pricebook_core::{Ledger, ValidationError};
use rust_xlsxwriter::{Format, Workbook};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::{IoError, IoResult};
use crate::{EXPORT_FILE_STEM, LEDGER_COLUMNS};

const COLUMN_WIDTH: f64 = 15.0;
const FONT_NAME: &str = "Calibri";
const TEXT_FORMAT: &str = "@";
const PRICE_FORMAT: &str = "0.00";

// =============================================================================
// Options
// =============================================================================

/// Name of the single exported worksheet.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SheetName {
    #[default]
    Base,
    Bd,
}

impl SheetName {
    pub fn as_str(&self) -> &'static str {
        match self {
            SheetName::Base => "Base",
            SheetName::Bd => "BD",
        }
    }
}

impl fmt::Display for SheetName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SheetName {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "base" => Ok(SheetName::Base),
            "bd" => Ok(SheetName::Bd),
            other => Err(ValidationError::InvalidFormat {
                field: "sheet name".to_string(),
                reason: format!("'{}' is not one of: base, bd", other),
            }),
        }
    }
}

/// Spreadsheet rendering options.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SpreadsheetOptions {
    pub sheet_name: SheetName,
}

/// The two export artifacts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    Xlsx,
    Csv,
}

impl ExportFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            ExportFormat::Xlsx => "xlsx",
            ExportFormat::Csv => "csv",
        }
    }

    /// `base_actualizada.xlsx` / `base_actualizada.csv`.
    pub fn default_file_name(&self) -> String {
        format!("{}.{}", EXPORT_FILE_STEM, self.extension())
    }
}

// =============================================================================
// Renderers
// =============================================================================

/// Header row: the fixed columns, then the loaded passthrough columns.
fn header_row(ledger: &Ledger) -> Vec<&str> {
    LEDGER_COLUMNS
        .iter()
        .copied()
        .chain(ledger.extra_columns().iter().map(String::as_str))
        .collect()
}

fn cell_index<T: TryFrom<usize>>(index: usize) -> IoResult<T> {
    T::try_from(index).map_err(|_| IoError::XlsxWrite(format!("cell index {} out of range", index)))
}

/// Renders the ledger as an xlsx workbook.
pub fn to_spreadsheet(ledger: &Ledger, options: &SpreadsheetOptions) -> IoResult<Vec<u8>> {
    let text_format = Format::new()
        .set_num_format(TEXT_FORMAT)
        .set_font_name(FONT_NAME);
    let price_format = Format::new()
        .set_num_format(PRICE_FORMAT)
        .set_font_name(FONT_NAME);

    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();
    worksheet.set_name(options.sheet_name.as_str())?;

    for (idx, header) in header_row(ledger).into_iter().enumerate() {
        let col: u16 = cell_index(idx)?;
        worksheet.set_column_width(col, COLUMN_WIDTH)?;
        worksheet.write_string(0, col, header)?;
    }
    worksheet.set_column_format(0, &text_format)?;
    worksheet.set_column_format(1, &text_format)?;
    worksheet.set_column_format(2, &price_format)?;
    worksheet.set_column_format(3, &price_format)?;

    for (idx, record) in ledger.records().iter().enumerate() {
        let row: u32 = cell_index(idx + 1)?;

        worksheet.write_string_with_format(row, 0, record.facility_code.as_str(), &text_format)?;
        worksheet.write_string_with_format(row, 1, record.product_code.to_string(), &text_format)?;
        worksheet.write_number_with_format(row, 2, record.total_price.as_f64(), &price_format)?;
        worksheet.write_number_with_format(row, 3, record.unit_price.as_f64(), &price_format)?;

        for (offset, column) in ledger.extra_columns().iter().enumerate() {
            let value = record.attribute(column).unwrap_or("");
            if !value.is_empty() {
                let col: u16 = cell_index(LEDGER_COLUMNS.len() + offset)?;
                worksheet.write_string(row, col, value)?;
            }
        }
    }

    Ok(workbook.save_to_buffer()?)
}

/// Renders the ledger as comma-separated text with a header row.
///
/// Prices always carry two decimals (`37.50`).
pub fn to_delimited_text(ledger: &Ledger) -> IoResult<String> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(header_row(ledger))?;

    for record in ledger.records() {
        let mut fields = vec![
            record.facility_code.to_string(),
            record.product_code.to_string(),
            record.total_price.to_string(),
            record.unit_price.to_string(),
        ];
        fields.extend(
            ledger
                .extra_columns()
                .iter()
                .map(|column| record.attribute(column).unwrap_or("").to_string()),
        );
        writer.write_record(&fields)?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| IoError::CsvWrite(e.to_string()))?;
    String::from_utf8(bytes).map_err(|e| IoError::CsvWrite(e.to_string()))
}

// =============================================================================
// File Helpers
// =============================================================================

/// Writes the xlsx rendering to `path`.
pub fn write_spreadsheet(ledger: &Ledger, path: &Path, options: &SpreadsheetOptions) -> IoResult<()> {
    let bytes = to_spreadsheet(ledger, options)?;
    std::fs::write(path, &bytes).map_err(|e| IoError::write(path, e))?;

    info!(
        path = %path.display(),
        records = ledger.len(),
        sheet = %options.sheet_name,
        "Exported spreadsheet"
    );
    Ok(())
}

/// Writes the csv rendering to `path`.
pub fn write_delimited_text(ledger: &Ledger, path: &Path) -> IoResult<()> {
    let text = to_delimited_text(ledger)?;
    std::fs::write(path, text).map_err(|e| IoError::write(path, e))?;

    info!(path = %path.display(), records = ledger.len(), "Exported delimited text");
    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================
