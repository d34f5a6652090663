//! # Ledger Loader
//!
//! Reads the initial ledger (`CodEstab`, `CodProd`, `Precio 1`, `Precio 2`
//! plus any other columns) into a [`Ledger`].
//!
//! Loaded records keep their own facility code. A row with any malformed
//! fixed column is left out; a repeated product code keeps the first row.
//! Either way the row is listed in the [`LoadReport`].

use std::collections::HashSet;
use std::path::Path;

use pricebook_core::validation::{normalize_facility_code, normalize_product_code, parse_unit_price};
use pricebook_core::{Attribute, FacilityCode, Ledger, LedgerRecord, ValidationError};
use tracing::{info, warn};

use crate::error::{IoError, IoResult};
use crate::report::LoadReport;
use crate::table::{find_column, read_table, RawRow, RawTable};
use crate::{COL_FACILITY, COL_PRODUCT, COL_TOTAL_PRICE, COL_UNIT_PRICE};

/// Column positions of the fixed ledger columns.
struct LedgerColumns {
    facility: usize,
    product: usize,
    total_price: usize,
    unit_price: usize,
}

/// Loads a ledger file whose header is its first row.
///
/// `facility_code` is the session code stamped on later inserts.
pub fn load_ledger(path: &Path, facility_code: FacilityCode) -> IoResult<(Ledger, LoadReport)> {
    let table = read_table(path, 0)?;
    let (ledger, report) = ledger_from_table(&table, facility_code)?;

    info!(
        path = %path.display(),
        records = ledger.len(),
        rejected = report.rejected.len(),
        "Loaded ledger"
    );

    Ok((ledger, report))
}

/// Builds a ledger from an already read table.
pub fn ledger_from_table(
    table: &RawTable,
    facility_code: FacilityCode,
) -> IoResult<(Ledger, LoadReport)> {
    let column = |name: &str| {
        find_column(&table.headers, &[name])
            .ok_or_else(|| IoError::missing_column(name, &table.headers))
    };
    let columns = LedgerColumns {
        facility: column(COL_FACILITY)?,
        product: column(COL_PRODUCT)?,
        total_price: column(COL_TOTAL_PRICE)?,
        unit_price: column(COL_UNIT_PRICE)?,
    };

    let fixed = [
        columns.facility,
        columns.product,
        columns.total_price,
        columns.unit_price,
    ];
    let extra_cols: Vec<(usize, &str)> = table
        .headers
        .iter()
        .enumerate()
        .filter(|(idx, header)| !header.is_empty() && !fixed.contains(idx))
        .map(|(idx, header)| (idx, header.as_str()))
        .collect();

    let mut report = LoadReport::default();
    let mut seen = HashSet::new();
    let mut records = Vec::new();

    for row in &table.rows {
        if row.is_blank() {
            continue;
        }

        let mut record = match parse_record(row, &columns) {
            Ok(record) => record,
            Err(reason) => {
                warn!(row = row.number, %reason, "Rejected ledger row");
                report.reject(row.number, reason);
                continue;
            }
        };

        if !seen.insert(record.product_code) {
            warn!(row = row.number, product_code = %record.product_code, "Duplicate ledger product code");
            report.reject(
                row.number,
                format!("duplicate product code {}", record.product_code),
            );
            continue;
        }

        record.extra = extra_cols
            .iter()
            .map(|(idx, header)| Attribute::new(*header, row.cell(*idx)))
            .collect();
        records.push(record);
    }

    let extra_columns = extra_cols.iter().map(|(_, h)| h.to_string()).collect();
    let (ledger, _) = Ledger::from_records(facility_code, extra_columns, records);
    report.accepted = ledger.len();

    Ok((ledger, report))
}

/// Coerces the four fixed columns; the error names the offending column.
fn parse_record(row: &RawRow, columns: &LedgerColumns) -> Result<LedgerRecord, String> {
    let facility_code = normalize_facility_code(row.cell(columns.facility))
        .map_err(|e| in_column(COL_FACILITY, e))?;
    let product_code = normalize_product_code(row.cell(columns.product))
        .map_err(|e| in_column(COL_PRODUCT, e))?;
    let total_price = parse_unit_price(row.cell(columns.total_price))
        .map_err(|e| in_column(COL_TOTAL_PRICE, e))?;
    let unit_price = parse_unit_price(row.cell(columns.unit_price))
        .map_err(|e| in_column(COL_UNIT_PRICE, e))?;

    Ok(LedgerRecord {
        facility_code,
        product_code,
        total_price,
        unit_price,
        extra: Vec::new(),
    })
}

fn in_column(column: &str, err: ValidationError) -> String {
    format!("{}: {}", column, err)
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use pricebook_core::{Money, ProductCode};
    use std::fs;
    use tempfile::tempdir;

    fn write_csv(content: &str) -> (tempfile::TempDir, std::path::PathBuf) {
        let dir = tempdir().unwrap();
        let path = dir.path().join("base.csv");
        fs::write(&path, content).unwrap();
        (dir, path)
    }

    #[test]
    fn test_load_normalizes_facility_code() {
        let (_dir, path) = write_csv(
            "CodEstab,CodProd,Precio 1,Precio 2\n\
             21870,100,20.00,2.00\n\
             21870.0,54520,37.5,1.25\n",
        );

        let (ledger, report) = load_ledger(&path, FacilityCode::default()).unwrap();

        assert!(report.is_clean());
        assert_eq!(ledger.len(), 2);

        let record = ledger.get(ProductCode::new(100)).unwrap();
        assert_eq!(record.facility_code.as_str(), "0021870");
        assert_eq!(record.total_price, Money::from_cents(2000));
        assert_eq!(record.unit_price, Money::from_cents(200));

        let folic = ledger.get(ProductCode::new(54520)).unwrap();
        assert_eq!(folic.total_price, Money::from_cents(3750));
    }

    #[test]
    fn test_malformed_rows_are_reported_and_skipped() {
        let (_dir, path) = write_csv(
            "CodEstab,CodProd,Precio 1,Precio 2\n\
             12345678,1,1.00,1.00\n\
             21870,X1,1.00,1.00\n\
             21870,2,abc,1.00\n\
             21870,3,1.00,-1\n\
             21870,4,8.00,2.00\n",
        );

        let (ledger, report) = load_ledger(&path, FacilityCode::default()).unwrap();

        assert_eq!(ledger.len(), 1);
        assert!(ledger.contains(ProductCode::new(4)));

        let rows: Vec<usize> = report.rejected.iter().map(|r| r.row).collect();
        assert_eq!(rows, vec![2, 3, 4, 5]);
        assert!(report.rejected[0].reason.starts_with("CodEstab"));
        assert!(report.rejected[1].reason.starts_with("CodProd"));
        assert!(report.rejected[2].reason.starts_with("Precio 1"));
        assert!(report.rejected[3].reason.starts_with("Precio 2"));
    }

    #[test]
    fn test_duplicate_product_code_keeps_first_row() {
        let (_dir, path) = write_csv(
            "CodEstab,CodProd,Precio 1,Precio 2\n\
             21870,100,20.00,2.00\n\
             21870,0100,99.00,9.00\n",
        );

        let (ledger, report) = load_ledger(&path, FacilityCode::default()).unwrap();

        assert_eq!(ledger.len(), 1);
        assert_eq!(
            ledger.get(ProductCode::new(100)).unwrap().total_price,
            Money::from_cents(2000)
        );
        assert_eq!(report.rejected.len(), 1);
        assert_eq!(report.rejected[0].row, 3);
    }

    #[test]
    fn test_passthrough_columns_are_kept_in_order() {
        let (_dir, path) = write_csv(
            "Obs,CodEstab,CodProd,Precio 1,Precio 2,Lote\n\
             promo,21870,100,20.00,2.00,L-1\n",
        );

        let (ledger, _) = load_ledger(&path, FacilityCode::default()).unwrap();

        assert_eq!(ledger.extra_columns(), ["Obs".to_string(), "Lote".to_string()]);
        let record = ledger.get(ProductCode::new(100)).unwrap();
        assert_eq!(record.attribute("Obs"), Some("promo"));
        assert_eq!(record.attribute("Lote"), Some("L-1"));
    }

    #[test]
    fn test_missing_price_column_is_an_error() {
        let (_dir, path) = write_csv("CodEstab,CodProd,Precio 1\n21870,100,20.00\n");

        let err = load_ledger(&path, FacilityCode::default()).unwrap_err();
        assert!(matches!(err, IoError::MissingColumn { ref column, .. } if column == "Precio 2"));
    }
}
