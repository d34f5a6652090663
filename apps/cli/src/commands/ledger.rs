//! # Ledger Commands
//!
//! `quote`, `add`, `edit`, `delete`, `recalc` and `list`.
//!
//! ## Quantity Driver Resolution
//! ```text
//! ┌──────────────┬──────────────────────────┬───────────────────────────────┐
//! │ mode         │ quantity given           │ quantity omitted              │
//! ├──────────────┼──────────────────────────┼───────────────────────────────┤
//! │ manual       │ Manual(quantity)         │ add/quote: Manual(1)          │
//! │              │                          │ edit: Manual(implied qty)     │
//! ├──────────────┼──────────────────────────┼───────────────────────────────┤
//! │ fraction     │ VALIDATION_ERROR         │ Fraction(catalog fraction)    │
//! └──────────────┴──────────────────────────┴───────────────────────────────┘
//! ```
//!
//! A rejected command never changes the ledger.

use pricebook_core::pricing::total_price;
use pricebook_core::validation::{parse_unit_price, parse_whole_number, validate_quantity};
use pricebook_core::{
    CoreError, LedgerRecord, LedgerTotals, Money, PricingMode, ProductCode, QuantityDriver,
    RecalcSummary, ValidationError,
};
use serde::Serialize;
use tracing::{debug, info};

use crate::commands::CommandOutput;
use crate::error::CliError;
use crate::state::{ConfigState, Session};

// =============================================================================
// Driver Resolution
// =============================================================================

fn parse_quantity(input: &str) -> Result<u32, CliError> {
    let value = parse_whole_number("quantity", input)?;
    let qty = u32::try_from(value).map_err(|_| ValidationError::OutOfRange {
        field: "quantity".to_string(),
        min: 1,
        max: i64::from(u32::MAX),
    })?;
    validate_quantity(qty)?;
    Ok(qty)
}

fn fraction_driver(session: &Session, product_code: ProductCode) -> Result<QuantityDriver, CliError> {
    let entry = session
        .catalog
        .get(product_code)
        .ok_or(CoreError::UnknownProduct { product_code })?;
    let fraction = entry
        .pack_fraction
        .ok_or(CoreError::MissingPackFraction { product_code })?;
    Ok(QuantityDriver::Fraction(fraction))
}

fn reject_fraction_quantity() -> CliError {
    CliError::validation(
        "quantity is not accepted in fraction mode; the catalog pack fraction is used",
    )
}

/// Driver for a product that is not yet priced (`quote`, `add`).
fn driver_for_new(
    session: &Session,
    product_code: ProductCode,
    quantity: Option<&str>,
) -> Result<QuantityDriver, CliError> {
    match (session.config.pricing_mode, quantity) {
        (PricingMode::Manual, Some(qty)) => Ok(QuantityDriver::Manual(parse_quantity(qty)?)),
        (PricingMode::Manual, None) => Ok(QuantityDriver::Manual(1)),
        (PricingMode::Fraction, None) => fraction_driver(session, product_code),
        (PricingMode::Fraction, Some(_)) => Err(reject_fraction_quantity()),
    }
}

/// Driver for re-pricing an existing record (`edit`).
fn driver_for_edit(
    session: &Session,
    product_code: ProductCode,
    quantity: Option<&str>,
) -> Result<QuantityDriver, CliError> {
    match (session.config.pricing_mode, quantity) {
        (PricingMode::Manual, Some(qty)) => Ok(QuantityDriver::Manual(parse_quantity(qty)?)),
        (PricingMode::Manual, None) => {
            let implied = session.ledger.implied_quantity(product_code)?;
            Ok(QuantityDriver::Manual(implied.max(1)))
        }
        (PricingMode::Fraction, None) => fraction_driver(session, product_code),
        (PricingMode::Fraction, Some(_)) => Err(reject_fraction_quantity()),
    }
}

fn require_in_catalog(session: &Session, product_code: ProductCode) -> Result<(), CliError> {
    if session.catalog.contains(product_code) {
        Ok(())
    } else {
        Err(CoreError::UnknownProduct { product_code }.into())
    }
}

// =============================================================================
// quote
// =============================================================================

/// Price preview.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuoteResponse {
    pub product_code: ProductCode,
    pub name: String,
    pub unit_price: Money,
    pub driver: QuantityDriver,
    pub total_price: Money,
    /// Whether `add` would be rejected as a duplicate.
    pub in_ledger: bool,
}

/// Prices a catalog product the way `add` would, without touching the ledger.
pub fn quote(
    session: &Session,
    code: &str,
    unit_price: &str,
    quantity: Option<&str>,
) -> Result<QuoteResponse, CliError> {
    let product_code = ProductCode::parse(code)?;
    let unit_price = parse_unit_price(unit_price)?;
    require_in_catalog(session, product_code)?;

    let driver = driver_for_new(session, product_code, quantity)?;
    let total = total_price(unit_price, driver)?;

    let name = session
        .catalog
        .get(product_code)
        .map(|entry| entry.name.clone())
        .unwrap_or_default();

    debug!(%product_code, %unit_price, %total, "Quote");

    Ok(QuoteResponse {
        product_code,
        name,
        unit_price,
        driver,
        total_price: total,
        in_ledger: session.ledger.contains(product_code),
    })
}

fn driver_text(driver: QuantityDriver) -> String {
    match driver {
        QuantityDriver::Manual(qty) => format!("x {}", qty),
        QuantityDriver::Fraction(fraction) => format!("x {} (fraction)", fraction),
    }
}

impl CommandOutput for QuoteResponse {
    fn to_text(&self, config: &ConfigState) -> String {
        let mut text = format!(
            "{} {}: {} {} = {}",
            self.product_code,
            self.name,
            config.format_currency(self.unit_price),
            driver_text(self.driver),
            config.format_currency(self.total_price)
        );
        if self.in_ledger {
            text.push_str("\n(already in the ledger, use edit)");
        }
        text
    }
}

// =============================================================================
// add / edit / delete
// =============================================================================

/// A ledger record after a mutation.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordResponse {
    /// `added`, `edited` or `deleted`.
    pub action: &'static str,
    pub record: LedgerRecord,
}

fn record_line(record: &LedgerRecord, config: &ConfigState) -> String {
    format!(
        "{:<9}{:>12}{:>12}{:>12}",
        record.facility_code,
        record.product_code,
        config.format_currency(record.total_price),
        config.format_currency(record.unit_price)
    )
}

impl CommandOutput for RecordResponse {
    fn to_text(&self, config: &ConfigState) -> String {
        format!("{}: {}", self.action, record_line(&self.record, config).trim_end())
    }
}

/// Adds a catalog product to the ledger.
///
/// ## Errors
/// - `NOT_FOUND` if the product is not in the catalog
/// - `DUPLICATE` if it is already in the ledger
/// - `VALIDATION_ERROR` for a bad price or quantity, or a missing pack
///   fraction in fraction mode
pub fn add(
    session: &mut Session,
    code: &str,
    unit_price: &str,
    quantity: Option<&str>,
) -> Result<RecordResponse, CliError> {
    let product_code = ProductCode::parse(code)?;
    let unit_price = parse_unit_price(unit_price)?;
    require_in_catalog(session, product_code)?;

    if session.ledger.contains(product_code) {
        return Err(CoreError::Duplicate { product_code }.into());
    }

    let driver = driver_for_new(session, product_code, quantity)?;
    let record = session.ledger.insert(product_code, unit_price, driver)?.clone();

    info!(
        session_id = %session.id,
        %product_code,
        total = %record.total_price,
        unit = %record.unit_price,
        "Record added"
    );

    Ok(RecordResponse {
        action: "added",
        record,
    })
}

/// Re-prices a ledger record.
///
/// Without a quantity, manual mode reuses the quantity implied by the
/// record's current prices and fraction mode uses the catalog fraction.
pub fn edit(
    session: &mut Session,
    code: &str,
    unit_price: &str,
    quantity: Option<&str>,
) -> Result<RecordResponse, CliError> {
    let product_code = ProductCode::parse(code)?;
    let unit_price = parse_unit_price(unit_price)?;

    if !session.ledger.contains(product_code) {
        return Err(CoreError::NotFound { product_code }.into());
    }

    let driver = driver_for_edit(session, product_code, quantity)?;
    let record = session.ledger.edit(product_code, unit_price, driver)?.clone();

    info!(
        session_id = %session.id,
        %product_code,
        total = %record.total_price,
        unit = %record.unit_price,
        "Record edited"
    );

    Ok(RecordResponse {
        action: "edited",
        record,
    })
}

pub fn delete(session: &mut Session, code: &str) -> Result<RecordResponse, CliError> {
    let product_code = ProductCode::parse(code)?;
    let record = session.ledger.delete(product_code)?;

    info!(session_id = %session.id, %product_code, "Record deleted");

    Ok(RecordResponse {
        action: "deleted",
        record,
    })
}

// =============================================================================
// recalc
// =============================================================================

/// Recomputes every total from the catalog pack fractions.
///
/// ## Errors
/// `VALIDATION_ERROR` in manual mode.
pub fn recalc(session: &mut Session) -> Result<RecalcSummary, CliError> {
    if session.config.pricing_mode != PricingMode::Fraction {
        return Err(CliError::validation(
            "recalc needs fraction mode (start with --mode fraction)",
        ));
    }

    let summary = session.ledger.recalculate_all(&session.catalog)?;

    info!(
        session_id = %session.id,
        updated = summary.updated,
        skipped = summary.skipped,
        "Ledger recalculated"
    );

    Ok(summary)
}

impl CommandOutput for RecalcSummary {
    fn to_text(&self, _config: &ConfigState) -> String {
        format!(
            "{} records updated, {} skipped (no pack fraction)",
            self.updated, self.skipped
        )
    }
}

// =============================================================================
// list
// =============================================================================

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ListResponse {
    pub extra_columns: Vec<String>,
    pub records: Vec<LedgerRecord>,
    pub totals: LedgerTotals,
}

pub fn list(session: &Session) -> ListResponse {
    ListResponse {
        extra_columns: session.ledger.extra_columns().to_vec(),
        records: session.ledger.records().to_vec(),
        totals: session.ledger.totals(),
    }
}

impl CommandOutput for ListResponse {
    fn to_text(&self, config: &ConfigState) -> String {
        let mut lines = vec![format!(
            "{:<9}{:>12}{:>12}{:>12}",
            "CodEstab", "CodProd", "Precio 1", "Precio 2"
        )];
        lines.extend(self.records.iter().map(|r| record_line(r, config)));
        lines.push(format!(
            "{} records, Precio 1 total {}, Precio 2 total {}",
            self.totals.record_count,
            config.format_currency(self.totals.total_price_sum),
            config.format_currency(self.totals.unit_price_sum)
        ));
        lines.join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::fixtures;
    use crate::error::ErrorCode;
    use pricebook_core::{FacilityCode, Ledger};

    fn code(value: u64) -> ProductCode {
        ProductCode::new(value)
    }

    #[test]
    fn test_fraction_mode_add_then_duplicate() {
        let mut session = fixtures::session(PricingMode::Fraction);

        let response = add(&mut session, "54520", "1.25", None).unwrap();
        assert_eq!(response.record.total_price.to_string(), "37.50");
        assert_eq!(response.record.facility_code.as_str(), "0021870");
        assert_eq!(session.ledger.len(), 2);

        let err = add(&mut session, "54520", "1.25", None).unwrap_err();
        assert_eq!(err.code, ErrorCode::Duplicate);
        assert_eq!(session.ledger.len(), 2);
    }

    #[test]
    fn test_manual_add_defaults_to_one() {
        let mut session = fixtures::session(PricingMode::Manual);

        let response = add(&mut session, "54520", "1.25", None).unwrap();
        assert_eq!(response.record.total_price.to_string(), "1.25");

        let response = add(&mut session, "2045", "0.50", Some("12")).unwrap();
        assert_eq!(response.record.total_price.to_string(), "6.00");
    }

    #[test]
    fn test_manual_add_accepts_large_quantity() {
        let mut session = fixtures::session(PricingMode::Manual);

        let response = add(&mut session, "54520", "0.01", Some("10000")).unwrap();
        assert_eq!(response.record.total_price.to_string(), "100.00");
    }

    #[test]
    fn test_add_rejections_leave_ledger_unchanged() {
        let mut session = fixtures::session(PricingMode::Manual);
        let before = session.ledger.clone();

        assert_eq!(
            add(&mut session, "999", "1.00", None).unwrap_err().code,
            ErrorCode::NotFound
        );
        assert_eq!(
            add(&mut session, "54520", "-1", None).unwrap_err().code,
            ErrorCode::ValidationError
        );
        assert_eq!(
            add(&mut session, "54520", "1.00", Some("0")).unwrap_err().code,
            ErrorCode::ValidationError
        );
        assert_eq!(
            add(&mut session, "54520", "1.00", Some("4294967296")).unwrap_err().code,
            ErrorCode::ValidationError
        );

        assert_eq!(session.ledger, before);
    }

    #[test]
    fn test_fraction_mode_requires_catalog_fraction() {
        let mut session = fixtures::session(PricingMode::Fraction);

        let err = add(&mut session, "2045", "1.00", None).unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationError);
        assert!(err.message.contains("pack fraction"));

        let err = add(&mut session, "54520", "1.00", Some("3")).unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationError);
        assert!(!session.ledger.contains(code(2045)));
        assert!(!session.ledger.contains(code(54520)));
    }

    #[test]
    fn test_edit_with_explicit_quantity() {
        let mut session = fixtures::session(PricingMode::Manual);

        let response = edit(&mut session, "100", "2.50", Some("10")).unwrap();
        assert_eq!(response.record.total_price.to_string(), "25.00");
        assert_eq!(response.record.unit_price.to_string(), "2.50");
    }

    #[test]
    fn test_edit_without_quantity() {
        // 20.00 / 2.00 implies 10
        let mut session = fixtures::session(PricingMode::Manual);
        let response = edit(&mut session, "100", "3.00", None).unwrap();
        assert_eq!(response.record.total_price.to_string(), "30.00");

        let mut session = fixtures::session(PricingMode::Fraction);
        let response = edit(&mut session, "100", "0.10", None).unwrap();
        assert_eq!(response.record.total_price.to_string(), "10.00");
    }

    #[test]
    fn test_edit_keeps_large_implied_quantity() {
        // 200.00 / 0.01 implies 20000
        let mut session = fixtures::session(PricingMode::Manual);
        let (ledger, _) = Ledger::from_records(
            FacilityCode::default(),
            Vec::new(),
            vec![LedgerRecord {
                facility_code: FacilityCode::default(),
                product_code: code(100),
                total_price: Money::from_cents(20_000),
                unit_price: Money::from_cents(1),
                extra: Vec::new(),
            }],
        );
        session.ledger = ledger;

        let response = edit(&mut session, "100", "0.02", None).unwrap();
        assert_eq!(response.record.total_price.to_string(), "400.00");
    }

    #[test]
    fn test_edit_unknown_record() {
        let mut session = fixtures::session(PricingMode::Manual);
        let err = edit(&mut session, "54520", "1.00", Some("2")).unwrap_err();
        assert_eq!(err.code, ErrorCode::NotFound);
    }

    #[test]
    fn test_delete() {
        let mut session = fixtures::session(PricingMode::Manual);

        let response = delete(&mut session, "100").unwrap();
        assert_eq!(response.action, "deleted");
        assert!(session.ledger.is_empty());

        assert_eq!(
            delete(&mut session, "100").unwrap_err().code,
            ErrorCode::NotFound
        );
    }

    #[test]
    fn test_quote_does_not_mutate() {
        let session = fixtures::session(PricingMode::Fraction);

        let response = quote(&session, "54520", "1.25", None).unwrap();
        assert_eq!(response.total_price.to_string(), "37.50");
        assert_eq!(response.driver, QuantityDriver::Fraction(30));
        assert!(!response.in_ledger);
        assert_eq!(session.ledger.len(), 1);
        assert_eq!(
            response.to_text(&session.config),
            "54520 A FOLIC: 1.25 x 30 (fraction) = 37.50"
        );

        let response = quote(&session, "100", "1.00", None).unwrap();
        assert!(response.in_ledger);
    }

    #[test]
    fn test_recalc_only_in_fraction_mode() {
        let mut session = fixtures::session(PricingMode::Manual);
        assert_eq!(recalc(&mut session).unwrap_err().code, ErrorCode::ValidationError);

        let mut session = fixtures::session(PricingMode::Fraction);
        session
            .ledger
            .insert(code(2045), Money::from_cents(50), QuantityDriver::Manual(4))
            .unwrap();

        let summary = recalc(&mut session).unwrap();
        assert_eq!(summary, RecalcSummary { updated: 1, skipped: 1 });
        assert_eq!(
            session.ledger.get(code(100)).unwrap().total_price.to_string(),
            "200.00"
        );
        assert_eq!(
            session.ledger.get(code(2045)).unwrap().total_price.to_string(),
            "2.00"
        );
    }

    #[test]
    fn test_list_with_totals() {
        let mut session = fixtures::session(PricingMode::Manual);
        add(&mut session, "54520", "1.25", Some("2")).unwrap();

        let response = list(&session);
        assert_eq!(response.totals.record_count, 2);
        assert_eq!(response.totals.total_price_sum.to_string(), "22.50");

        let text = response.to_text(&session.config);
        assert!(text.starts_with("CodEstab"));
        assert!(text.ends_with("2 records, Precio 1 total 22.50, Precio 2 total 3.25"));

        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["records"][1]["total_price"], 250);
    }
}
