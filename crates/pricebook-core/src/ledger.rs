//! # Ledger Store
//!
//! The mutable pricing ledger of a session.
//!
//! ## Operations Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Ledger Operations                                    │
//! │                                                                         │
//! │  Operator Action        Ledger Method           State Change            │
//! │  ───────────────        ─────────────           ────────────            │
//! │                                                                         │
//! │  Add product ─────────► insert() ─────────────► records.push(record)    │
//! │                          └─ code present? ────► Duplicate, no change    │
//! │                                                                         │
//! │  Change prices ───────► edit() ───────────────► prices overwritten      │
//! │                          └─ code absent? ─────► NotFound, no change     │
//! │                                                                         │
//! │  Remove product ──────► delete() ─────────────► records.remove(i)       │
//! │                                                                         │
//! │  Refresh boxes ───────► recalculate_all() ────► totals from catalog     │
//! │                                                                         │
//! │  Every method validates first and mutates last: a failed call leaves   │
//! │  the ledger exactly as it found it.                                     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::catalog::Catalog;
use crate::error::{CoreError, CoreResult};
use crate::money::Money;
use crate::pricing::{implied_quantity, total_for_fraction, total_price, QuantityDriver};
use crate::types::{FacilityCode, LedgerRecord, ProductCode};

// =============================================================================
// Summaries
// =============================================================================

/// Outcome of [`Ledger::recalculate_all`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct RecalcSummary {
    /// Records whose total was recomputed from the catalog fraction.
    pub updated: usize,
    /// Records with no fraction in the catalog, left untouched.
    pub skipped: usize,
}

/// Column sums for display.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct LedgerTotals {
    pub record_count: usize,
    pub total_price_sum: Money,
    pub unit_price_sum: Money,
}

// =============================================================================
// Ledger
// =============================================================================

/// The pricing ledger.
///
/// ## Invariants
/// - Product codes are unique across records
/// - `total_price == unit_price × driver` after every insert/edit/recalculate
/// - Records keep insertion order; delete closes the gap only
///
/// Only built through its constructors, so there is no `Deserialize`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Ledger {
    /// Facility code stamped on inserted records.
    facility_code: FacilityCode,

    /// Passthrough column names of the loaded file, in file order.
    extra_columns: Vec<String>,

    records: Vec<LedgerRecord>,
}

impl Ledger {
    /// Creates an empty ledger.
    pub fn new(facility_code: FacilityCode) -> Self {
        Ledger {
            facility_code,
            extra_columns: Vec::new(),
            records: Vec::new(),
        }
    }

    /// Builds the session ledger from loaded records.
    ///
    /// Records keep their own facility code. Later records repeating a
    /// product code are not added.
    ///
    /// ## Returns
    /// The ledger and the rejected duplicates, in input order.
    pub fn from_records<I>(
        facility_code: FacilityCode,
        extra_columns: Vec<String>,
        records: I,
    ) -> (Self, Vec<LedgerRecord>)
    where
        I: IntoIterator<Item = LedgerRecord>,
    {
        let mut ledger = Ledger {
            facility_code,
            extra_columns,
            records: Vec::new(),
        };
        let mut duplicates = Vec::new();

        for record in records {
            if ledger.contains(record.product_code) {
                duplicates.push(record);
            } else {
                ledger.records.push(record);
            }
        }

        (ledger, duplicates)
    }

    // -------------------------------------------------------------------------
    // Mutations
    // -------------------------------------------------------------------------

    /// Adds a record priced from `unit_price` and `driver`.
    ///
    /// ## Errors
    /// - `Duplicate` if the product code already has a record
    /// - `Validation` if the price or driver is invalid
    pub fn insert(
        &mut self,
        product_code: ProductCode,
        unit_price: Money,
        driver: QuantityDriver,
    ) -> CoreResult<&LedgerRecord> {
        if self.contains(product_code) {
            return Err(CoreError::Duplicate { product_code });
        }

        let total = total_price(unit_price, driver)?;

        self.records.push(LedgerRecord {
            facility_code: self.facility_code.clone(),
            product_code,
            total_price: total,
            unit_price,
            extra: Vec::new(),
        });

        let idx = self.records.len() - 1;
        Ok(&self.records[idx])
    }

    /// Re-prices an existing record in place.
    ///
    /// Only `unit_price` and `total_price` change.
    ///
    /// ## Errors
    /// - `NotFound` if the product code has no record
    /// - `Validation` if the price or driver is invalid
    pub fn edit(
        &mut self,
        product_code: ProductCode,
        unit_price: Money,
        driver: QuantityDriver,
    ) -> CoreResult<&LedgerRecord> {
        let idx = self.position(product_code)?;
        let total = total_price(unit_price, driver)?;

        let record = &mut self.records[idx];
        record.unit_price = unit_price;
        record.total_price = total;

        Ok(&self.records[idx])
    }

    /// Removes a record, returning it.
    pub fn delete(&mut self, product_code: ProductCode) -> CoreResult<LedgerRecord> {
        let idx = self.position(product_code)?;
        Ok(self.records.remove(idx))
    }

    /// Recomputes every total from the catalog pack fraction.
    ///
    /// Records whose product has no fraction are skipped. All new totals are
    /// computed before any is written, so an error changes nothing.
    pub fn recalculate_all(&mut self, catalog: &Catalog) -> CoreResult<RecalcSummary> {
        let mut updates = Vec::new();
        let mut skipped = 0;

        for (idx, record) in self.records.iter().enumerate() {
            match catalog.pack_fraction(record.product_code) {
                Some(fraction) => {
                    updates.push((idx, total_for_fraction(record.unit_price, fraction)?));
                }
                None => skipped += 1,
            }
        }

        let updated = updates.len();
        for (idx, total) in updates {
            self.records[idx].total_price = total;
        }

        Ok(RecalcSummary { updated, skipped })
    }

    // -------------------------------------------------------------------------
    // Queries
    // -------------------------------------------------------------------------

    pub fn get(&self, product_code: ProductCode) -> Option<&LedgerRecord> {
        self.records.iter().find(|r| r.product_code == product_code)
    }

    pub fn contains(&self, product_code: ProductCode) -> bool {
        self.get(product_code).is_some()
    }

    /// Records in display order.
    pub fn records(&self) -> &[LedgerRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn facility_code(&self) -> &FacilityCode {
        &self.facility_code
    }

    /// Passthrough columns exported after the four fixed ones.
    pub fn extra_columns(&self) -> &[String] {
        &self.extra_columns
    }

    /// Pack quantity implied by a record's stored prices.
    ///
    /// Lossy, see [`implied_quantity`].
    pub fn implied_quantity(&self, product_code: ProductCode) -> CoreResult<u32> {
        let record = self
            .get(product_code)
            .ok_or(CoreError::NotFound { product_code })?;
        Ok(implied_quantity(record.total_price, record.unit_price))
    }

    pub fn totals(&self) -> LedgerTotals {
        LedgerTotals {
            record_count: self.records.len(),
            total_price_sum: self.records.iter().map(|r| r.total_price).sum(),
            unit_price_sum: self.records.iter().map(|r| r.unit_price).sum(),
        }
    }

    fn position(&self, product_code: ProductCode) -> CoreResult<usize> {
        self.records
            .iter()
            .position(|r| r.product_code == product_code)
            .ok_or(CoreError::NotFound { product_code })
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
