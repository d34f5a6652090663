//! # Export Command
//!
//! `export xlsx|csv|all [path]`.
//!
//! - `xlsx` / `csv` with a path write exactly that file.
//! - Without a path the file goes to the configured output directory under
//!   its default name (`base_actualizada.xlsx`, `base_actualizada.csv`).
//! - `all` writes both default names; its path, when given, is a directory.

use std::fs;
use std::path::{Path, PathBuf};

use pricebook_io::{write_delimited_text, write_spreadsheet, ExportFormat};
use serde::Serialize;
use tracing::debug;

use crate::cli::ExportTarget;
use crate::commands::CommandOutput;
use crate::error::{CliError, ErrorCode};
use crate::state::{ConfigState, Session};

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportedFile {
    pub format: ExportFormat,
    pub path: PathBuf,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportResponse {
    pub record_count: usize,
    pub files: Vec<ExportedFile>,
}

/// Writes the requested artifacts from the current ledger.
///
/// ## Errors
/// `IO_ERROR` if a directory cannot be created or a file cannot be written.
/// Files written before the failure stay on disk.
pub fn export(
    session: &Session,
    target: ExportTarget,
    path: Option<&Path>,
) -> Result<ExportResponse, CliError> {
    let plan: Vec<(ExportFormat, PathBuf)> = match target {
        ExportTarget::Xlsx => vec![single_target(session, ExportFormat::Xlsx, path)],
        ExportTarget::Csv => vec![single_target(session, ExportFormat::Csv, path)],
        ExportTarget::All => {
            let dir = path.unwrap_or(session.config.out_dir.as_path());
            [ExportFormat::Xlsx, ExportFormat::Csv]
                .into_iter()
                .map(|format| (format, dir.join(format.default_file_name())))
                .collect()
        }
    };

    let mut files = Vec::with_capacity(plan.len());
    for (format, file) in plan {
        ensure_parent_dir(&file)?;
        debug!(?format, path = %file.display(), "Writing export");

        match format {
            ExportFormat::Xlsx => {
                write_spreadsheet(&session.ledger, &file, &session.config.spreadsheet_options())?
            }
            ExportFormat::Csv => write_delimited_text(&session.ledger, &file)?,
        }

        files.push(ExportedFile { format, path: file });
    }

    Ok(ExportResponse {
        record_count: session.ledger.len(),
        files,
    })
}

fn single_target(session: &Session, format: ExportFormat, path: Option<&Path>) -> (ExportFormat, PathBuf) {
    let file = match path {
        Some(p) => p.to_path_buf(),
        None => session.config.out_dir.join(format.default_file_name()),
    };
    (format, file)
}

fn ensure_parent_dir(file: &Path) -> Result<(), CliError> {
    match file.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => fs::create_dir_all(dir).map_err(|e| {
            CliError::new(
                ErrorCode::IoError,
                format!("Cannot create directory '{}': {}", dir.display(), e),
            )
        }),
        _ => Ok(()),
    }
}

impl CommandOutput for ExportResponse {
    fn to_text(&self, _config: &ConfigState) -> String {
        self.files
            .iter()
            .map(|f| format!("wrote {} ({} records)", f.path.display(), self.record_count))
            .collect::<Vec<_>>()
            .join("\n")
    }
}
