//! # Operator Shell
//!
//! Reads one command per line, runs it against the session and prints the
//! result. Command errors are printed and the loop continues; only `quit`,
//! end of input or a broken terminal end it.
//!
//! ## Output Streams
//! ```text
//! stdout ──► command results (text, or one JSON object per line with --json)
//! stderr ──► tracing logs
//! ```

use std::io::{BufRead, Write};

use serde::Serialize;
use tracing::{debug, warn};

use crate::cli::{parse_line, ShellCommand};
use crate::commands::{self, CommandOutput};
use crate::error::CliError;
use crate::state::{ConfigState, Session};

/// What a processed line asks the loop to do.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reply {
    /// Blank or comment line.
    Empty,
    Output(String),
    Quit,
}

/// Runs the shell until `quit` or end of input.
pub fn run_shell<R: BufRead, W: Write>(
    session: &mut Session,
    input: R,
    output: &mut W,
) -> Result<(), CliError> {
    if !session.config.json_output {
        writeln!(output, "{}", banner(session))?;
    }

    for line in input.lines() {
        let line = line?;

        let rendered = match execute_line(session, &line) {
            Ok(Reply::Empty) => continue,
            Ok(Reply::Quit) => break,
            Ok(Reply::Output(text)) => text,
            Err(err) => {
                warn!(session_id = %session.id, code = %err.code, line = %line.trim(), "{}", err.message);
                render_error(&session.config, &err)
            }
        };

        writeln!(output, "{}", rendered)?;
        output.flush()?;
    }

    debug!(session_id = %session.id, "Shell finished");
    Ok(())
}

/// Parses and runs one line.
pub fn execute_line(session: &mut Session, line: &str) -> Result<Reply, CliError> {
    let Some(command) = parse_line(line)? else {
        return Ok(Reply::Empty);
    };

    debug!(?command, "Running command");

    let text = match command {
        ShellCommand::Search { query } => emit(session, commands::catalog::search(session, &query.join(" "))?),
        ShellCommand::Show { code } => emit(session, commands::catalog::show(session, &code)?),
        ShellCommand::Quote {
            code,
            unit_price,
            quantity,
        } => emit(
            session,
            commands::ledger::quote(session, &code, &unit_price, quantity.as_deref())?,
        ),
        ShellCommand::Add {
            code,
            unit_price,
            quantity,
        } => {
            let response = commands::ledger::add(session, &code, &unit_price, quantity.as_deref())?;
            emit(session, response)
        }
        ShellCommand::Edit {
            code,
            unit_price,
            quantity,
        } => {
            let response = commands::ledger::edit(session, &code, &unit_price, quantity.as_deref())?;
            emit(session, response)
        }
        ShellCommand::Delete { code } => {
            let response = commands::ledger::delete(session, &code)?;
            emit(session, response)
        }
        ShellCommand::Recalc => {
            let summary = commands::ledger::recalc(session)?;
            emit(session, summary)
        }
        ShellCommand::List => emit(session, commands::ledger::list(session)),
        ShellCommand::Export { target, path } => emit(
            session,
            commands::export::export(session, target, path.as_deref())?,
        ),
        ShellCommand::Summary => emit(session, commands::summary(session)),
        ShellCommand::Help => emit(session, commands::help(session)),
        ShellCommand::Quit => return Ok(Reply::Quit),
    };

    Ok(Reply::Output(text?))
}

/// Renders a response as text or as one line of JSON.
fn emit<T: CommandOutput>(session: &Session, response: T) -> Result<String, CliError> {
    if session.config.json_output {
        to_json(&response)
    } else {
        Ok(response.to_text(&session.config))
    }
}

fn to_json<T: Serialize>(value: &T) -> Result<String, CliError> {
    serde_json::to_string(value).map_err(|e| {
        tracing::error!("JSON rendering failed: {}", e);
        CliError::internal("JSON rendering failed")
    })
}

fn render_error(config: &ConfigState, err: &CliError) -> String {
    if config.json_output {
        let envelope = serde_json::json!({ "error": err });
        envelope.to_string()
    } else {
        format!("error {}", err)
    }
}

/// Startup lines: what was loaded and what was left out.
fn banner(session: &Session) -> String {
    let mut lines = vec![format!(
        "pricebook: {} catalog entries, {} ledger records, {} mode",
        session.catalog.len(),
        session.ledger.len(),
        session.config.pricing_mode
    )];

    for (source, report) in [
        ("catalog", &session.catalog_report),
        ("ledger", &session.ledger_report),
    ] {
        for rejected in &report.rejected {
            lines.push(format!("  {} row {} skipped: {}", source, rejected.row, rejected.reason));
        }
        for warning in &report.warnings {
            lines.push(format!("  {} row {}: {}", source, warning.row, warning.message));
        }
    }

    lines.push("Type 'help' for commands.".to_string());
    lines.join("\n")
}
