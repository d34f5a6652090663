//! # pricebook
//!
//! Entry point of the operator shell.
//!
//! ```text
//! pricebook --catalog catalogo.xlsx --ledger base.xlsx --mode fraction
//! ```
//!
//! Startup errors are printed to stderr and exit with status 1.

use std::process::ExitCode;

use clap::Parser;
use pricebook_cli::cli::Args;

fn main() -> ExitCode {
    // The actual setup is in lib.rs for better testability
    match pricebook_cli::run(Args::parse()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("pricebook: {}", err);
            ExitCode::FAILURE
        }
    }
}
