//! # pricebook-core: Pure Pricing Logic for Pricebook
//!
//! This crate is the **heart** of Pricebook. It holds the pricing ledger
//! engine as plain data and pure functions with zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Pricebook Architecture                           │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                 Operator shell (apps/cli)                       │   │
//! │  │     search ──► quote ──► add / edit / delete ──► export         │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │              ★ pricebook-core (THIS CRATE) ★                    │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │  catalog  │  │  pricing  │  │  ledger   │  │ validation│  │   │
//! │  │   │  Catalog  │  │  totals   │  │  Ledger   │  │ normalize │  │   │
//! │  │   │  search   │  │  drivers  │  │  records  │  │  checks   │  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO FILES • NO GLOBAL STATE • PURE FUNCTIONS          │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                  pricebook-io (File Formats)                    │   │
//! │  │          catalog/ledger ingestion, xlsx and csv export          │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (ProductCode, FacilityCode, CatalogEntry, LedgerRecord)
//! - [`money`] - Money type with integer cents
//! - [`catalog`] - Read-only catalog with substring search
//! - [`pricing`] - Total price derivation from a unit price and a quantity driver
//! - [`ledger`] - The mutable pricing ledger and its uniqueness invariant
//! - [`error`] - Domain error types
//! - [`validation`] - Input validation and ingestion normalization
//!
//! ## Example Usage
//!
//! ```rust
//! use pricebook_core::{FacilityCode, Ledger, Money, ProductCode, QuantityDriver};
//!
//! let mut ledger = Ledger::new(FacilityCode::default());
//! let unit = Money::parse_decimal("1.25").unwrap();
//!
//! let record = ledger
//!     .insert(ProductCode::new(54520), unit, QuantityDriver::Fraction(30))
//!     .unwrap();
//! assert_eq!(record.total_price.to_string(), "37.50");
//!
//! // The product code is the ledger key
//! assert!(ledger
//!     .insert(ProductCode::new(54520), unit, QuantityDriver::Manual(1))
//!     .is_err());
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod catalog;
pub mod error;
pub mod ledger;
pub mod money;
pub mod pricing;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use catalog::{Catalog, SearchOptions, SearchOutcome, SearchScope};
pub use error::{CoreError, CoreResult, ValidationError};
pub use ledger::{Ledger, LedgerTotals, RecalcSummary};
pub use money::Money;
pub use pricing::{PricingMode, QuantityDriver};
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Facility code stamped on records created through [`Ledger::insert`].
///
/// Deployment-time constant. The shell can override it from the environment,
/// operators cannot change it mid-session.
pub const DEFAULT_FACILITY_CODE: &str = "0021870";

/// Facility codes are always this many characters, zero-padded on the left.
pub const FACILITY_CODE_WIDTH: usize = 7;

/// Maximum length of a catalog search query.
pub const MAX_QUERY_LEN: usize = 100;
