//! # Command-Line Surface
//!
//! Startup flags of the `pricebook` binary and the grammar of the operator
//! commands it reads from stdin. Both are clap derives; a command line is
//! split with shell rules first, so `search "a folic"` and `search a folic`
//! are the same query.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use pricebook_core::{PricingMode, SearchScope};
use pricebook_io::SheetName;

use crate::error::CliError;

/// Startup flags.
#[derive(Debug, Clone, Parser)]
#[command(name = "pricebook", version, about = "Pricing ledger shell")]
pub struct Args {
    /// Reference catalog (xlsx, xls, ods or csv)
    #[arg(long)]
    pub catalog: PathBuf,

    /// Initial ledger (xlsx or csv, header in the first row)
    #[arg(long)]
    pub ledger: PathBuf,

    /// Pricing mode: manual or fraction
    #[arg(long)]
    pub mode: Option<PricingMode>,

    /// 0-based header row of the catalog
    #[arg(long)]
    pub catalog_header_row: Option<usize>,

    /// Minimum length of a non-empty search query
    #[arg(long)]
    pub min_query_len: Option<usize>,

    /// Search scope: code-or-name or all-columns
    #[arg(long)]
    pub search_scope: Option<SearchScope>,

    /// Worksheet name of the xlsx export: base or bd
    #[arg(long)]
    pub sheet_name: Option<SheetName>,

    /// Directory for export artifacts
    #[arg(long)]
    pub out_dir: Option<PathBuf>,

    /// Print command results as JSON lines
    #[arg(long)]
    pub json: bool,

    /// Log filter used when RUST_LOG is not set (e.g. "debug")
    #[arg(long)]
    pub log_level: Option<String>,
}

/// One operator line.
#[derive(Debug, Parser)]
#[command(
    name = "pricebook",
    no_binary_name = true,
    disable_help_flag = true,
    disable_help_subcommand = true,
    disable_version_flag = true
)]
pub struct ShellLine {
    #[command(subcommand)]
    pub command: ShellCommand,
}

/// Operator commands.
#[derive(Debug, Clone, PartialEq, Eq, Subcommand)]
pub enum ShellCommand {
    /// List catalog entries matching a query (all entries when empty)
    Search {
        #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
        query: Vec<String>,
    },

    /// Show the catalog entry and ledger record of a product
    Show { code: String },

    /// Price a product without touching the ledger
    Quote {
        code: String,
        #[arg(allow_hyphen_values = true)]
        unit_price: String,
        #[arg(allow_hyphen_values = true)]
        quantity: Option<String>,
    },

    /// Add a product to the ledger
    Add {
        code: String,
        #[arg(allow_hyphen_values = true)]
        unit_price: String,
        #[arg(allow_hyphen_values = true)]
        quantity: Option<String>,
    },

    /// Re-price a ledger record
    Edit {
        code: String,
        #[arg(allow_hyphen_values = true)]
        unit_price: String,
        #[arg(allow_hyphen_values = true)]
        quantity: Option<String>,
    },

    /// Remove a ledger record
    Delete { code: String },

    /// Recompute every total from catalog pack fractions
    Recalc,

    /// List ledger records with totals
    List,

    /// Write export artifacts
    Export {
        #[arg(value_enum)]
        target: ExportTarget,
        path: Option<PathBuf>,
    },

    /// Session id, start time and counts
    Summary,

    /// List commands
    Help,

    /// End the session
    #[command(alias = "exit")]
    Quit,
}

/// What `export` writes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ExportTarget {
    Xlsx,
    Csv,
    All,
}

/// Parses one operator line; `Ok(None)` for blank lines and `#` comments.
pub fn parse_line(line: &str) -> Result<Option<ShellCommand>, CliError> {
    let trimmed = line.trim();
    if trimmed.is_empty() || trimmed.starts_with('#') {
        return Ok(None);
    }

    let words = shell_words::split(trimmed).map_err(|e| CliError::usage(e.to_string()))?;
    let parsed = ShellLine::try_parse_from(words).map_err(|e| {
        let rendered = e.to_string();
        let first = rendered.lines().next().unwrap_or("invalid command");
        CliError::usage(first.trim_start_matches("error: ").to_string())
    })?;

    Ok(Some(parsed.command))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;

    #[test]
    fn test_parse_search_with_and_without_quotes() {
        let quoted = parse_line(r#"search "a folic""#).unwrap().unwrap();
        assert_eq!(
            quoted,
            ShellCommand::Search {
                query: vec!["a folic".to_string()]
            }
        );

        let bare = parse_line("search").unwrap().unwrap();
        assert_eq!(bare, ShellCommand::Search { query: vec![] });
    }

    #[test]
    fn test_parse_add_with_optional_quantity() {
        let cmd = parse_line("add 54520 1.25").unwrap().unwrap();
        assert_eq!(
            cmd,
            ShellCommand::Add {
                code: "54520".to_string(),
                unit_price: "1.25".to_string(),
                quantity: None
            }
        );

        let cmd = parse_line("add 100 2.50 10").unwrap().unwrap();
        assert!(matches!(cmd, ShellCommand::Add { quantity: Some(ref q), .. } if q == "10"));
    }

    #[test]
    fn test_parse_export_target() {
        let cmd = parse_line("export all /tmp/out").unwrap().unwrap();
        assert_eq!(
            cmd,
            ShellCommand::Export {
                target: ExportTarget::All,
                path: Some(PathBuf::from("/tmp/out"))
            }
        );
        assert!(parse_line("export pdf").is_err());
    }

    #[test]
    fn test_blank_and_comment_lines() {
        assert_eq!(parse_line("   ").unwrap(), None);
        assert_eq!(parse_line("# setup").unwrap(), None);
    }

    #[test]
    fn test_unknown_command_is_usage_error() {
        let err = parse_line("frobnicate").unwrap_err();
        assert_eq!(err.code, ErrorCode::UsageError);

        let err = parse_line(r#"search "unterminated"#).unwrap_err();
        assert_eq!(err.code, ErrorCode::UsageError);
    }

    #[test]
    fn test_quit_alias() {
        assert_eq!(parse_line("exit").unwrap(), Some(ShellCommand::Quit));
    }
}
