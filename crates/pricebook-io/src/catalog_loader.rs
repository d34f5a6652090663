//! # Catalog Loader
//!
//! Turns the reference catalog file into a [`Catalog`].
//!
//! ## Row Handling
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  per data row                                                           │
//! │       │                                                                 │
//! │       ├── all cells blank ─────────────────► skipped silently           │
//! │       ├── code not a whole number ─────────► rejected (report)          │
//! │       ├── code seen on an earlier row ─────► rejected (report)          │
//! │       ├── fraction present but invalid ────► kept, fraction dropped     │
//! │       │                                      (warning)                  │
//! │       ▼                                                                 │
//! │  CatalogEntry { code, name, fraction, every other column verbatim }     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::collections::HashSet;
use std::path::Path;

use pricebook_core::validation::{normalize_pack_fraction, normalize_product_code};
use pricebook_core::{Attribute, Catalog, CatalogEntry};
use tracing::{info, warn};

use crate::error::{IoError, IoResult};
use crate::report::LoadReport;
use crate::table::{find_column, read_table, RawTable};
use crate::DEFAULT_CATALOG_HEADER_ROW;

/// Accepted headers of the product code column.
pub const CODE_ALIASES: [&str; 4] = ["Cod_Prod", "CodProd", "Codigo", "Code"];

/// Accepted headers of the product name column.
pub const NAME_ALIASES: [&str; 4] = ["Nom_Prod", "Nombre", "Producto", "Name"];

/// Accepted headers of the optional pack fraction column.
pub const FRACTION_ALIASES: [&str; 4] = ["Fraccion", "Fracción", "Frac", "Pack Fraction"];

/// How to find the table inside the catalog file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CatalogLoadOptions {
    /// 0-based row index of the header.
    pub header_row: usize,
}

impl Default for CatalogLoadOptions {
    fn default() -> Self {
        CatalogLoadOptions {
            header_row: DEFAULT_CATALOG_HEADER_ROW,
        }
    }
}

/// Loads and normalizes a catalog file.
pub fn load_catalog(path: &Path, options: &CatalogLoadOptions) -> IoResult<(Catalog, LoadReport)> {
    let table = read_table(path, options.header_row)?;
    let (catalog, report) = catalog_from_table(&table)?;

    info!(
        path = %path.display(),
        entries = catalog.len(),
        rejected = report.rejected.len(),
        warnings = report.warnings.len(),
        "Loaded catalog"
    );

    Ok((catalog, report))
}

/// Builds a catalog from an already read table.
pub fn catalog_from_table(table: &RawTable) -> IoResult<(Catalog, LoadReport)> {
    let code_col = find_column(&table.headers, &CODE_ALIASES)
        .ok_or_else(|| IoError::missing_column(CODE_ALIASES[0], &table.headers))?;
    let name_col = find_column(&table.headers, &NAME_ALIASES)
        .ok_or_else(|| IoError::missing_column(NAME_ALIASES[0], &table.headers))?;
    let fraction_col = find_column(&table.headers, &FRACTION_ALIASES);

    let extra_cols: Vec<(usize, &str)> = table
        .headers
        .iter()
        .enumerate()
        .filter(|(idx, header)| {
            !header.is_empty()
                && *idx != code_col
                && *idx != name_col
                && Some(*idx) != fraction_col
        })
        .map(|(idx, header)| (idx, header.as_str()))
        .collect();

    let mut report = LoadReport::default();
    let mut seen = HashSet::new();
    let mut entries = Vec::new();

    for row in &table.rows {
        if row.is_blank() {
            continue;
        }

        let product_code = match normalize_product_code(row.cell(code_col)) {
            Ok(code) => code,
            Err(err) => {
                warn!(row = row.number, error = %err, "Rejected catalog row");
                report.reject(row.number, err.to_string());
                continue;
            }
        };

        if !seen.insert(product_code) {
            warn!(row = row.number, %product_code, "Duplicate catalog product code");
            report.reject(row.number, format!("duplicate product code {}", product_code));
            continue;
        }

        let pack_fraction = match fraction_col.map(|col| normalize_pack_fraction(row.cell(col))) {
            None => None,
            Some(Ok(fraction)) => fraction,
            Some(Err(err)) => {
                warn!(row = row.number, error = %err, "Ignored pack fraction");
                report.warn(row.number, format!("pack fraction ignored: {}", err));
                None
            }
        };

        let mut entry = CatalogEntry::new(product_code, row.cell(name_col).trim(), pack_fraction);
        entry.extra_attributes = extra_cols
            .iter()
            .map(|(idx, header)| Attribute::new(*header, row.cell(*idx)))
            .collect();

        entries.push(entry);
    }

    let (catalog, _) = Catalog::from_entries(entries);
    report.accepted = catalog.len();

    Ok((catalog, report))
}

// =============================================================================
// Unit Tests
// =============================================================================
