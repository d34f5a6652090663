//! # Raw Tables
//!
//! Reads the first worksheet of a workbook, or a csv file, into a header row
//! and text rows. No column is interpreted here.
//!
//! ## Header Offset
//! ```text
//!   row 0   ┌ REPORTE DE PRODUCTOS ┐   ← banner, skipped
//!   ...     │                      │
//!   row 6   │ Cod_Prod │ Nom_Prod  │   ← header_row = 6
//!   row 7   │ 54520    │ A FOLIC   │   ← data, reported as row 8
//! ```
//!
//! Workbook rows are counted from the top of the sheet, empty rows included.
//! Csv files skip blank lines before counting.
//!
//! Repeated header names get a numeric suffix (`Obs`, `Obs.1`, `Obs.2`) so
//! every column can be addressed by name.

use std::collections::HashSet;
use std::path::Path;

use calamine::{open_workbook_auto, Data, Reader, Sheets};
use tracing::debug;

use crate::error::{IoError, IoResult};

// =============================================================================
// Types
// =============================================================================

/// One data row, every cell rendered as text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawRow {
    /// 1-based row number in the source file.
    pub number: usize,
    pub cells: Vec<String>,
}

impl RawRow {
    /// Cell text by column index; missing trailing cells read as empty.
    pub fn cell(&self, column: usize) -> &str {
        self.cells.get(column).map(String::as_str).unwrap_or("")
    }

    pub fn is_blank(&self) -> bool {
        self.cells.iter().all(|c| c.trim().is_empty())
    }
}

/// A header row and the rows below it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawTable {
    /// Trimmed, unique header texts, in column order.
    pub headers: Vec<String>,
    pub rows: Vec<RawRow>,
}

/// A source row before the header is located.
struct SourceRow {
    index: usize,
    number: usize,
    cells: Vec<String>,
}

// =============================================================================
// Reading
// =============================================================================

/// Reads a table whose header sits at `header_row` (0-based).
pub fn read_table(path: &Path, header_row: usize) -> IoResult<RawTable> {
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
        .unwrap_or_default();

    let (rows, total) = match extension.as_str() {
        "xlsx" | "xlsm" | "xls" | "xlsb" | "ods" => read_workbook_rows(path)?,
        "csv" => read_delimited_rows(path)?,
        _ => {
            return Err(IoError::UnsupportedExtension {
                path: path.to_path_buf(),
                extension,
            })
        }
    };

    let table = split_header(rows, total, header_row)?;
    debug!(
        path = %path.display(),
        columns = table.headers.len(),
        rows = table.rows.len(),
        "Read table"
    );
    Ok(table)
}

fn read_workbook_rows(path: &Path) -> IoResult<(Vec<SourceRow>, usize)> {
    let mut workbook: Sheets<_> =
        open_workbook_auto(path).map_err(|e| IoError::read(path, e))?;

    let sheet_name = workbook
        .sheet_names()
        .first()
        .cloned()
        .ok_or_else(|| IoError::WorksheetMissing {
            path: path.to_path_buf(),
        })?;

    let range = workbook
        .worksheet_range(&sheet_name)
        .map_err(|e| IoError::read(path, e))?;

    // The range begins at the first used cell, not at A1
    let start_row = range.start().map(|(row, _)| row as usize).unwrap_or(0);
    let (height, _) = range.get_size();

    let rows = range
        .rows()
        .enumerate()
        .map(|(offset, row)| {
            let index = start_row + offset;
            SourceRow {
                index,
                number: index + 1,
                cells: row.iter().map(cell_text).collect(),
            }
        })
        .collect();

    let total = if height == 0 { 0 } else { start_row + height };
    Ok((rows, total))
}

fn read_delimited_rows(path: &Path) -> IoResult<(Vec<SourceRow>, usize)> {
    let content = read_file_as_utf8(path)?;

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(content.as_bytes());

    let mut rows = Vec::new();
    for (index, result) in reader.records().enumerate() {
        let record = result.map_err(|e| IoError::read(path, e))?;
        let number = record
            .position()
            .map(|p| p.line() as usize)
            .unwrap_or(index + 1);
        rows.push(SourceRow {
            index,
            number,
            cells: record.iter().map(str::to_string).collect(),
        });
    }

    let total = rows.len();
    Ok((rows, total))
}

/// Reads a file as UTF-8, falling back to Windows-1252.
fn read_file_as_utf8(path: &Path) -> IoResult<String> {
    let bytes = std::fs::read(path).map_err(|e| IoError::read(path, e))?;

    match String::from_utf8(bytes) {
        Ok(s) => Ok(s),
        Err(e) => {
            let bytes = e.into_bytes();
            let (decoded, _, _) = encoding_rs::WINDOWS_1252.decode(&bytes);
            Ok(decoded.into_owned())
        }
    }
}

fn split_header(rows: Vec<SourceRow>, total: usize, header_row: usize) -> IoResult<RawTable> {
    if header_row >= total {
        return Err(IoError::HeaderRowBeyondData {
            header_row,
            rows: total,
        });
    }

    let mut table = RawTable::default();

    for row in rows {
        if row.index == header_row {
            table.headers = dedupe_headers(
                row.cells
                    .iter()
                    .map(|h| h.trim_start_matches('\u{feff}').trim().to_string())
                    .collect(),
            );
        } else if row.index > header_row {
            table.rows.push(RawRow {
                number: row.number,
                cells: row.cells,
            });
        }
    }

    Ok(table)
}

/// Renames repeated headers to `name.1`, `name.2`, ... skipping names the row
/// already uses. Blank headers are left alone.
fn dedupe_headers(headers: Vec<String>) -> Vec<String> {
    let original: HashSet<String> = headers.iter().cloned().collect();
    let mut used = HashSet::new();

    headers
        .into_iter()
        .map(|header| {
            if header.is_empty() || used.insert(header.clone()) {
                return header;
            }

            let mut suffix = 1;
            loop {
                let candidate = format!("{}.{}", header, suffix);
                if !original.contains(&candidate) && used.insert(candidate.clone()) {
                    debug!(header = %header, renamed = %candidate, "Renamed repeated header");
                    return candidate;
                }
                suffix += 1;
            }
        })
        .collect()
}

// =============================================================================
// Header Matching
// =============================================================================

/// Folds a header for comparison: trimmed, lower-cased, accents removed.
///
/// ```rust
/// use pricebook_io::table::fold_header;
///
/// assert_eq!(fold_header(" Fracción "), "fraccion");
/// assert_eq!(fold_header("COD_PROD"), "cod_prod");
/// ```
pub fn fold_header(header: &str) -> String {
    header
        .trim()
        .to_lowercase()
        .chars()
        .map(|c| match c {
            'á' | 'à' | 'â' | 'ä' | 'ã' => 'a',
            'é' | 'è' | 'ê' | 'ë' => 'e',
            'í' | 'ì' | 'î' | 'ï' => 'i',
            'ó' | 'ò' | 'ô' | 'ö' | 'õ' => 'o',
            'ú' | 'ù' | 'û' | 'ü' => 'u',
            'ñ' => 'n',
            'ç' => 'c',
            other => other,
        })
        .collect()
}

/// Index of the first header matching any alias, aliases tried in order.
pub fn find_column(headers: &[String], aliases: &[&str]) -> Option<usize> {
    let folded: Vec<String> = headers.iter().map(|h| fold_header(h)).collect();

    aliases.iter().find_map(|alias| {
        let alias = fold_header(alias);
        folded.iter().position(|h| *h == alias)
    })
}

// =============================================================================
// Cell Coercion
// =============================================================================

/// Renders a workbook cell as the text a csv export of it would hold.
///
/// Whole floats lose their `.0` so `54520.0` reads as `54520`.
pub fn cell_text(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        Data::String(s) => s.clone(),
        Data::Float(n) => {
            if n.fract() == 0.0 && n.abs() < 1e15 {
                format!("{}", *n as i64)
            } else {
                format!("{}", n)
            }
        }
        Data::Int(n) => n.to_string(),
        Data::Bool(b) => String::from(if *b { "TRUE" } else { "FALSE" }),
        Data::Error(e) => format!("#{:?}", e),
        Data::DateTime(dt) => format!("{}", dt.as_f64()),
        Data::DateTimeIso(s) => s.clone(),
        Data::DurationIso(s) => s.clone(),
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
