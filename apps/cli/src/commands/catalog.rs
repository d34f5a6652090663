//! # Catalog Commands
//!
//! `search` and `show`. Both are read-only.
//!
//! ## Search Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Catalog Search Flow                                  │
//! │                                                                         │
//! │  search folic                                                           │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  validate_search_query (trim, max length)                               │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌───────────────────────────────────────────┐                          │
//! │  │  Empty query?          → whole catalog    │                          │
//! │  │  Shorter than minimum? → NotPerformed     │──► "Type at least N..."  │
//! │  │  Otherwise             → substring match  │                          │
//! │  └───────────────────────────────────────────┘                          │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  SearchResponse (catalog order)                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use pricebook_core::pricing::implied_quantity;
use pricebook_core::validation::validate_search_query;
use pricebook_core::{CatalogEntry, LedgerRecord, ProductCode, SearchOutcome};
use serde::Serialize;
use tracing::debug;

use crate::commands::CommandOutput;
use crate::error::{CliError, ErrorCode};
use crate::state::{ConfigState, Session};

// =============================================================================
// search
// =============================================================================

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResponse {
    pub query: String,
    /// `false` when the query was below the minimum length.
    pub performed: bool,
    pub min_query_len: usize,
    pub total: usize,
    pub matches: Vec<CatalogEntry>,
}

/// Searches the catalog with the session's scope and minimum length.
///
/// ## Returns
/// Matching entries in catalog order. A query below the minimum length
/// returns `performed: false` and no matches, which is not the same as a
/// search that found nothing.
pub fn search(session: &Session, query: &str) -> Result<SearchResponse, CliError> {
    let query = validate_search_query(query)?;
    let options = session.config.search_options();

    let response = match session.catalog.search(&query, &options) {
        SearchOutcome::Matches(entries) => SearchResponse {
            total: entries.len(),
            matches: entries.into_iter().cloned().collect(),
            performed: true,
            min_query_len: options.min_query_len,
            query,
        },
        SearchOutcome::NotPerformed { min_query_len } => SearchResponse {
            query,
            performed: false,
            min_query_len,
            total: 0,
            matches: Vec::new(),
        },
    };

    debug!(
        query = %response.query,
        performed = response.performed,
        total = response.total,
        "Catalog search"
    );

    Ok(response)
}

fn fraction_text(fraction: Option<u32>) -> String {
    fraction.map_or_else(|| "-".to_string(), |f| f.to_string())
}

impl CommandOutput for SearchResponse {
    fn to_text(&self, _config: &ConfigState) -> String {
        if !self.performed {
            return format!("Type at least {} characters to search", self.min_query_len);
        }

        let mut lines: Vec<String> = self
            .matches
            .iter()
            .map(|entry| {
                format!(
                    "{:>10}  {:<40}  frac {}",
                    entry.product_code,
                    entry.name,
                    fraction_text(entry.pack_fraction)
                )
            })
            .collect();

        lines.push(match self.total {
            1 => "1 match".to_string(),
            n => format!("{} matches", n),
        });
        lines.join("\n")
    }
}

// =============================================================================
// show
// =============================================================================

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ShowResponse {
    pub product_code: ProductCode,
    pub catalog_entry: Option<CatalogEntry>,
    pub record: Option<LedgerRecord>,
    /// Pack quantity implied by the record's prices (lossy).
    pub implied_quantity: Option<u32>,
}

/// Looks a product up in both the catalog and the ledger.
///
/// ## Errors
/// `NOT_FOUND` when the code is in neither.
pub fn show(session: &Session, code: &str) -> Result<ShowResponse, CliError> {
    let product_code = ProductCode::parse(code)?;
    let catalog_entry = session.catalog.get(product_code).cloned();
    let record = session.ledger.get(product_code).cloned();

    if catalog_entry.is_none() && record.is_none() {
        return Err(CliError::new(
            ErrorCode::NotFound,
            format!("Product {} is neither in the catalog nor in the ledger", product_code),
        ));
    }

    let implied_quantity = record
        .as_ref()
        .map(|r| implied_quantity(r.total_price, r.unit_price));

    Ok(ShowResponse {
        product_code,
        catalog_entry,
        record,
        implied_quantity,
    })
}

impl CommandOutput for ShowResponse {
    fn to_text(&self, config: &ConfigState) -> String {
        let mut lines = vec![format!("Product {}", self.product_code)];

        match &self.catalog_entry {
            Some(entry) => {
                lines.push(format!("  Name       {}", entry.name));
                lines.push(format!("  Fraction   {}", fraction_text(entry.pack_fraction)));
                for attribute in &entry.extra_attributes {
                    lines.push(format!("  {:<10} {}", attribute.column, attribute.value));
                }
            }
            None => lines.push("  Not in the catalog".to_string()),
        }

        match &self.record {
            Some(record) => {
                lines.push(format!("  CodEstab   {}", record.facility_code));
                lines.push(format!("  Precio 1   {}", config.format_currency(record.total_price)));
                lines.push(format!("  Precio 2   {}", config.format_currency(record.unit_price)));
                if let Some(qty) = self.implied_quantity {
                    lines.push(format!("  Quantity   ~{}", qty));
                }
            }
            None => lines.push("  Not in the ledger".to_string()),
        }

        lines.join("\n")
    }
}
