//! # Shell Commands Module
//!
//! One function per operator command. Every function takes the session it
//! needs and returns a serializable response or a
//! [`CliError`](crate::error::CliError).
//!
//! ## Command Organization
//! ```text
//! commands/
//! ├── mod.rs      ◄─── You are here (output trait, help, summary)
//! ├── catalog.rs  ◄─── search, show
//! ├── ledger.rs   ◄─── quote, add, edit, delete, recalc, list
//! └── export.rs   ◄─── export xlsx | csv | all
//! ```
//!
//! ## How Commands Work
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Shell Command Flow                                   │
//! │                                                                         │
//! │  stdin: add 54520 1.25                                                  │
//! │         │                                                               │
//! │         ▼                                                               │
//! │  cli::parse_line ──► ShellCommand::Add { code, unit_price, quantity }   │
//! │         │                                                               │
//! │         ▼                                                               │
//! │  commands::ledger::add(&mut session, ...)                               │
//! │      -> Result<RecordResponse, CliError>                                │
//! │         │                                                               │
//! │         ▼                                                               │
//! │  shell: CommandOutput::to_text  or  serde_json (--json)                 │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

pub mod catalog;
pub mod export;
pub mod ledger;

use chrono::{DateTime, Utc};
use pricebook_core::{FacilityCode, PricingMode};
use serde::Serialize;
use uuid::Uuid;

use crate::state::{ConfigState, Session};

/// A command result the shell can print.
///
/// The JSON form is the serde serialization; `to_text` is the form shown to
/// an operator at a terminal.
pub trait CommandOutput: Serialize {
    fn to_text(&self, config: &ConfigState) -> String;
}

// =============================================================================
// Help
// =============================================================================

const COMMANDS: &[(&str, &str)] = &[
    ("search [query]", "List catalog entries matching a query"),
    ("show <code>", "Catalog entry and ledger record of a product"),
    ("quote <code> <unit_price> [quantity]", "Price a product without saving"),
    ("add <code> <unit_price> [quantity]", "Add a product to the ledger"),
    ("edit <code> <unit_price> [quantity]", "Re-price a ledger record"),
    ("delete <code>", "Remove a ledger record"),
    ("recalc", "Recompute totals from catalog pack fractions"),
    ("list", "Ledger records with totals"),
    ("export xlsx|csv|all [path]", "Write export artifacts"),
    ("summary", "Session id, start time and counts"),
    ("help", "This list"),
    ("quit", "End the session"),
];

#[derive(Debug, Clone, Serialize)]
pub struct CommandHelp {
    pub usage: &'static str,
    pub description: &'static str,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HelpResponse {
    pub pricing_mode: PricingMode,
    pub commands: Vec<CommandHelp>,
}

pub fn help(session: &Session) -> HelpResponse {
    HelpResponse {
        pricing_mode: session.config.pricing_mode,
        commands: COMMANDS
            .iter()
            .map(|&(usage, description)| CommandHelp { usage, description })
            .collect(),
    }
}

impl CommandOutput for HelpResponse {
    fn to_text(&self, _config: &ConfigState) -> String {
        let width = self.commands.iter().map(|c| c.usage.len()).max().unwrap_or(0);
        let mut lines: Vec<String> = self
            .commands
            .iter()
            .map(|c| format!("  {:<width$}  {}", c.usage, c.description, width = width))
            .collect();
        lines.push(format!(
            "Pricing mode: {}. In fraction mode the quantity comes from the catalog.",
            self.pricing_mode
        ));
        lines.join("\n")
    }
}

// =============================================================================
// Summary
// =============================================================================

/// Session overview.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SummaryResponse {
    pub session_id: Uuid,
    pub started_at: DateTime<Utc>,
    pub pricing_mode: PricingMode,
    pub facility_code: FacilityCode,
    pub catalog_entries: usize,
    pub catalog_rejected: usize,
    pub catalog_warnings: usize,
    pub ledger_records: usize,
    pub ledger_rejected: usize,
}

pub fn summary(session: &Session) -> SummaryResponse {
    SummaryResponse {
        session_id: session.id,
        started_at: session.started_at,
        pricing_mode: session.config.pricing_mode,
        facility_code: session.config.facility_code.clone(),
        catalog_entries: session.catalog.len(),
        catalog_rejected: session.catalog_report.rejected.len(),
        catalog_warnings: session.catalog_report.warnings.len(),
        ledger_records: session.ledger.len(),
        ledger_rejected: session.ledger_report.rejected.len(),
    }
}

impl CommandOutput for SummaryResponse {
    fn to_text(&self, _config: &ConfigState) -> String {
        format!(
            "Session {}\nStarted   {}\nMode      {}\nFacility  {}\nCatalog   {} entries ({} rejected, {} warnings)\nLedger    {} records ({} rejected at load)",
            self.session_id,
            self.started_at.format("%Y-%m-%d %H:%M:%S UTC"),
            self.pricing_mode,
            self.facility_code,
            self.catalog_entries,
            self.catalog_rejected,
            self.catalog_warnings,
            self.ledger_records,
            self.ledger_rejected,
        )
    }
}

// =============================================================================
// Test Fixtures
// =============================================================================

#[cfg(test)]
pub(crate) mod fixtures {
    use pricebook_core::{
        Attribute, Catalog, CatalogEntry, FacilityCode, Ledger, LedgerRecord, Money, PricingMode,
        ProductCode,
    };

    use crate::state::{ConfigState, Session};

    /// Catalog: 54520 A FOLIC (30), 100 Paracetamol (100), 2045 Ibuprofeno (no fraction).
    /// Ledger: 100 at 20.00 / 2.00.
    pub fn session(mode: PricingMode) -> Session {
        let mut folic = CatalogEntry::new(ProductCode::new(54520), "A FOLIC", Some(30));
        folic.extra_attributes.push(Attribute::new("Laboratorio", "Genfar"));

        let (catalog, _) = Catalog::from_entries(vec![
            folic,
            CatalogEntry::new(ProductCode::new(100), "Paracetamol 500mg", Some(100)),
            CatalogEntry::new(ProductCode::new(2045), "Ibuprofeno 400mg", None),
        ]);

        let (ledger, _) = Ledger::from_records(
            FacilityCode::default(),
            Vec::new(),
            vec![LedgerRecord {
                facility_code: FacilityCode::default(),
                product_code: ProductCode::new(100),
                total_price: Money::from_cents(2000),
                unit_price: Money::from_cents(200),
                extra: Vec::new(),
            }],
        );

        let config = ConfigState {
            pricing_mode: mode,
            ..ConfigState::default()
        };
        Session::new(config, catalog, ledger)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_help_lists_every_command() {
        let session = fixtures::session(PricingMode::Manual);
        let response = help(&session);
        assert_eq!(response.commands.len(), COMMANDS.len());

        let text = response.to_text(&session.config);
        for name in ["search", "quote", "recalc", "export", "quit"] {
            assert!(text.contains(name), "missing {name}");
        }
    }

    #[test]
    fn test_summary_counts() {
        let session = fixtures::session(PricingMode::Fraction);
        let response = summary(&session);

        assert_eq!(response.catalog_entries, 3);
        assert_eq!(response.ledger_records, 1);
        assert_eq!(response.facility_code.as_str(), "0021870");

        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["pricingMode"], "fraction");
        assert_eq!(json["ledgerRecords"], 1);
        assert!(response.to_text(&session.config).contains("fraction"));
    }
}
