//! # Configuration State
//!
//! Session settings resolved once at startup.
//!
//! ## Configuration Sources (Priority Order)
//! 1. Command-line flags (`--mode`, `--sheet-name`, ...)
//! 2. Environment variables (`PRICEBOOK_*`)
//! 3. Defaults (this file)
//!
//! Read-only after startup: the facility code in particular is a deployment
//! setting, not something an operator changes mid-session.

use std::path::PathBuf;

use pricebook_core::{FacilityCode, Money, PricingMode, SearchOptions, SearchScope};
use pricebook_io::{CatalogLoadOptions, SheetName, SpreadsheetOptions, DEFAULT_CATALOG_HEADER_ROW};
use serde::{Deserialize, Serialize};

use crate::cli::Args;
use crate::error::CliError;

/// Session configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigState {
    /// Facility code stamped on inserted records.
    /// Default: "0021870"
    pub facility_code: FacilityCode,

    /// Which quantity driver prices new and edited records.
    pub pricing_mode: PricingMode,

    /// 0-based header row of the catalog file.
    pub catalog_header_row: usize,

    /// Minimum length of a non-empty search query (0 = off).
    pub min_query_len: usize,

    /// Columns a search query is matched against.
    pub search_scope: SearchScope,

    /// Worksheet name of the xlsx export.
    pub sheet_name: SheetName,

    /// Directory export artifacts go to when no path is given.
    pub out_dir: PathBuf,

    /// Print command results as JSON lines.
    pub json_output: bool,
}

impl Default for ConfigState {
    fn default() -> Self {
        ConfigState {
            facility_code: FacilityCode::default(),
            pricing_mode: PricingMode::Manual,
            catalog_header_row: DEFAULT_CATALOG_HEADER_ROW,
            min_query_len: 0,
            search_scope: SearchScope::CodeOrName,
            sheet_name: SheetName::Base,
            out_dir: PathBuf::from("."),
            json_output: false,
        }
    }
}

impl ConfigState {
    /// Creates a ConfigState from environment variables and defaults.
    ///
    /// ## Environment Variables
    /// - `PRICEBOOK_FACILITY_CODE`: facility code for inserts (e.g. "21870")
    /// - `PRICEBOOK_PRICING_MODE`: `manual` or `fraction`
    /// - `PRICEBOOK_CATALOG_HEADER_ROW`: header row index of the catalog
    /// - `PRICEBOOK_MIN_QUERY_LEN`: minimum search query length
    /// - `PRICEBOOK_SHEET_NAME`: `base` or `bd`
    /// - `PRICEBOOK_OUT_DIR`: export directory
    ///
    /// ## Errors
    /// Any variable that is set but invalid is a `CONFIG_ERROR`.
    pub fn from_env() -> Result<Self, CliError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Same as [`ConfigState::from_env`] with an injectable variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, CliError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = ConfigState::default();

        if let Some(value) = lookup("PRICEBOOK_FACILITY_CODE") {
            config.facility_code = FacilityCode::parse(&value)
                .map_err(|e| invalid_setting("PRICEBOOK_FACILITY_CODE", e))?;
        }

        if let Some(value) = lookup("PRICEBOOK_PRICING_MODE") {
            config.pricing_mode = value
                .parse()
                .map_err(|e| invalid_setting("PRICEBOOK_PRICING_MODE", e))?;
        }

        if let Some(value) = lookup("PRICEBOOK_CATALOG_HEADER_ROW") {
            config.catalog_header_row = value
                .trim()
                .parse()
                .map_err(|e| invalid_setting("PRICEBOOK_CATALOG_HEADER_ROW", e))?;
        }

        if let Some(value) = lookup("PRICEBOOK_MIN_QUERY_LEN") {
            config.min_query_len = value
                .trim()
                .parse()
                .map_err(|e| invalid_setting("PRICEBOOK_MIN_QUERY_LEN", e))?;
        }

        if let Some(value) = lookup("PRICEBOOK_SHEET_NAME") {
            config.sheet_name = value
                .parse()
                .map_err(|e| invalid_setting("PRICEBOOK_SHEET_NAME", e))?;
        }

        if let Some(value) = lookup("PRICEBOOK_OUT_DIR") {
            config.out_dir = PathBuf::from(value);
        }

        Ok(config)
    }

    /// Applies command-line overrides on top of the environment.
    pub fn apply_args(&mut self, args: &Args) {
        if let Some(mode) = args.mode {
            self.pricing_mode = mode;
        }
        if let Some(row) = args.catalog_header_row {
            self.catalog_header_row = row;
        }
        if let Some(len) = args.min_query_len {
            self.min_query_len = len;
        }
        if let Some(scope) = args.search_scope {
            self.search_scope = scope;
        }
        if let Some(sheet_name) = args.sheet_name {
            self.sheet_name = sheet_name;
        }
        if let Some(dir) = &args.out_dir {
            self.out_dir = dir.clone();
        }
        if args.json {
            self.json_output = true;
        }
    }

    pub fn search_options(&self) -> SearchOptions {
        SearchOptions {
            scope: self.search_scope,
            min_query_len: self.min_query_len,
        }
    }

    pub fn catalog_options(&self) -> CatalogLoadOptions {
        CatalogLoadOptions {
            header_row: self.catalog_header_row,
        }
    }

    pub fn spreadsheet_options(&self) -> SpreadsheetOptions {
        SpreadsheetOptions {
            sheet_name: self.sheet_name,
        }
    }

    /// Formats an amount for shell output.
    ///
    /// ## Example
    /// ```rust
    /// use pricebook_cli::state::ConfigState;
    /// use pricebook_core::Money;
    ///
    /// let config = ConfigState::default();
    /// assert_eq!(config.format_currency(Money::from_cents(1234)), "12.34");
    /// ```
    pub fn format_currency(&self, amount: Money) -> String {
        amount.to_string()
    }
}

fn invalid_setting(name: &str, err: impl std::fmt::Display) -> CliError {
    CliError::config(format!("{} is invalid: {}", name, err))
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = ConfigState::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config, ConfigState::default());
        assert_eq!(config.facility_code.as_str(), "0021870");
        assert_eq!(config.catalog_header_row, 6);
        assert_eq!(config.pricing_mode, PricingMode::Manual);
    }

    #[test]
    fn test_environment_overrides() {
        let config = ConfigState::from_lookup(lookup(&[
            ("PRICEBOOK_FACILITY_CODE", "55"),
            ("PRICEBOOK_PRICING_MODE", "fraction"),
            ("PRICEBOOK_MIN_QUERY_LEN", "2"),
            ("PRICEBOOK_SHEET_NAME", "BD"),
            ("PRICEBOOK_OUT_DIR", "/tmp/out"),
        ]))
        .unwrap();

        assert_eq!(config.facility_code.as_str(), "0000055");
        assert_eq!(config.pricing_mode, PricingMode::Fraction);
        assert_eq!(config.min_query_len, 2);
        assert_eq!(config.sheet_name, SheetName::Bd);
        assert_eq!(config.out_dir, PathBuf::from("/tmp/out"));
    }

    #[test]
    fn test_invalid_environment_is_config_error() {
        let err = ConfigState::from_lookup(lookup(&[("PRICEBOOK_FACILITY_CODE", "123456789")]))
            .unwrap_err();
        assert_eq!(err.code, crate::error::ErrorCode::ConfigError);
        assert!(err.message.starts_with("PRICEBOOK_FACILITY_CODE"));

        assert!(ConfigState::from_lookup(lookup(&[("PRICEBOOK_MIN_QUERY_LEN", "two")])).is_err());
    }

    #[test]
    fn test_flags_win_over_environment() {
        let mut config =
            ConfigState::from_lookup(lookup(&[("PRICEBOOK_PRICING_MODE", "fraction")])).unwrap();
        let args = Args::parse_from([
            "pricebook",
            "--catalog",
            "c.xlsx",
            "--ledger",
            "b.xlsx",
            "--mode",
            "manual",
            "--search-scope",
            "all-columns",
            "--json",
        ]);

        config.apply_args(&args);

        assert_eq!(config.pricing_mode, PricingMode::Manual);
        assert_eq!(config.search_scope, SearchScope::AllColumns);
        assert!(config.json_output);
        assert_eq!(config.catalog_header_row, 6);
    }

    #[test]
    fn test_format_currency() {
        let config = ConfigState::default();
        assert_eq!(config.format_currency(Money::from_cents(1234)), "12.34");
        assert_eq!(config.format_currency(Money::from_cents(5)), "0.05");
        assert_eq!(config.format_currency(Money::zero()), "0.00");
    }
}
