//! # Pricebook Shell Library
//!
//! The operator shell of Pricebook. `main.rs` only parses flags and calls
//! [`run`]; everything else lives here so it can be driven from tests.
//!
//! ## Module Organization
//! ```text
//! pricebook_cli/
//! ├── lib.rs          ◄─── You are here (startup & run)
//! ├── cli.rs          ◄─── Startup flags and the per-line command grammar
//! ├── shell.rs        ◄─── Read-eval-print loop
//! ├── state/
//! │   ├── config.rs   ◄─── ConfigState (defaults → env → flags)
//! │   └── session.rs  ◄─── Session (catalog, ledger, load reports)
//! ├── commands/
//! │   ├── catalog.rs  ◄─── search, show
//! │   ├── ledger.rs   ◄─── quote, add, edit, delete, recalc, list
//! │   └── export.rs   ◄─── export
//! └── error.rs        ◄─── CliError for every command
//! ```

pub mod cli;
pub mod commands;
pub mod error;
pub mod shell;
pub mod state;

use std::io;

use tracing::info;
use tracing_subscriber::EnvFilter;

use cli::Args;
use error::CliError;
use state::{ConfigState, Session};

/// Runs the shell over stdin and stdout.
///
/// ## Startup Sequence
/// ```text
/// ┌─────────────────────────────────────────────────────────────────────────┐
/// │                       Shell Startup                                     │
/// │                                                                         │
/// │  1. Initialize Logging ───────────────────────────────────────────────► │
/// │     • tracing-subscriber with env filter, written to stderr             │
/// │     • RUST_LOG, else --log-level, else info,pricebook=debug             │
/// │                                                                         │
/// │  2. Resolve Configuration ────────────────────────────────────────────► │
/// │     • defaults → PRICEBOOK_* environment → flags                        │
/// │                                                                         │
/// │  3. Load Inputs ──────────────────────────────────────────────────────► │
/// │     • catalog (header at the configured row)                            │
/// │     • initial ledger (header in the first row)                          │
/// │                                                                         │
/// │  4. Read Commands Until quit / EOF ───────────────────────────────────► │
/// └─────────────────────────────────────────────────────────────────────────┘
/// ```
///
/// ## Errors
/// Configuration and load failures end the program; command failures do not.
pub fn run(args: Args) -> Result<(), CliError> {
    init_tracing(args.log_level.as_deref());

    info!("Starting pricebook shell");

    let mut config = ConfigState::from_env()?;
    config.apply_args(&args);

    let mut session = Session::load(config, &args.catalog, &args.ledger)?;

    let stdin = io::stdin();
    let mut stdout = io::stdout();
    shell::run_shell(&mut session, stdin.lock(), &mut stdout)?;

    info!(session_id = %session.id, records = session.ledger.len(), "Session ended");
    Ok(())
}

/// Initializes the tracing subscriber for structured logging.
///
/// ## Log Levels
/// - `RUST_LOG=debug` - Show debug messages
/// - `RUST_LOG=pricebook_io=trace` - Trace the file loaders only
/// - `--log-level warn` - Used when `RUST_LOG` is not set
/// - Default: `info,pricebook=debug`
fn init_tracing(level: Option<&str>) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(level.unwrap_or("info,pricebook=debug")))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}
