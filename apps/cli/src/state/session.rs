//! # Session State
//!
//! One pricing session: the two loaded inputs and the working ledger.

use std::path::Path;

use chrono::{DateTime, Utc};
use pricebook_core::{Catalog, Ledger};
use pricebook_io::{load_catalog, load_ledger, LoadReport};
use tracing::info;
use uuid::Uuid;

use crate::error::CliError;
use crate::state::ConfigState;

/// Session aggregate.
///
/// ## Lifecycle
/// ```text
/// startup ──► Session::load ──► commands mutate `ledger` ──► export ──► exit
///                                                          (discarded)
/// ```
#[derive(Debug)]
pub struct Session {
    /// Correlates log lines of one run.
    pub id: Uuid,
    pub started_at: DateTime<Utc>,
    pub config: ConfigState,
    pub catalog: Catalog,
    pub ledger: Ledger,
    pub catalog_report: LoadReport,
    pub ledger_report: LoadReport,
}

impl Session {
    /// Creates a session over already loaded data.
    pub fn new(config: ConfigState, catalog: Catalog, ledger: Ledger) -> Self {
        Session {
            id: Uuid::new_v4(),
            started_at: Utc::now(),
            config,
            catalog,
            ledger,
            catalog_report: LoadReport::default(),
            ledger_report: LoadReport::default(),
        }
    }

    /// Loads the catalog and the initial ledger.
    ///
    /// Inserts made during the session are stamped with
    /// `config.facility_code`.
    pub fn load(config: ConfigState, catalog_path: &Path, ledger_path: &Path) -> Result<Self, CliError> {
        let (catalog, catalog_report) = load_catalog(catalog_path, &config.catalog_options())?;
        let (ledger, ledger_report) = load_ledger(ledger_path, config.facility_code.clone())?;

        let mut session = Session::new(config, catalog, ledger);
        session.catalog_report = catalog_report;
        session.ledger_report = ledger_report;

        info!(
            session_id = %session.id,
            mode = %session.config.pricing_mode,
            catalog_entries = session.catalog.len(),
            ledger_records = session.ledger.len(),
            "Session started"
        );

        Ok(session)
    }
}
