//! Restore CLI commands
//!
//! Implements `restore` and `inspect`.

use clap::Args;
use std::path::Path;

use crate::archive::ExportArchive;
use crate::display::{format_inspect_report, format_restore_report};
use crate::error::{BackupError, BackupResult};
use crate::restore::{RestoreOrchestrator, RestoreStatus};

/// Arguments for `restore`
#[derive(Args, Debug)]
pub struct RestoreArgs {
    /// Export filename or path (use 'latest' for most recent)
    pub file: String,

    /// Restore without stopping at the preview
    #[arg(short, long)]
    pub force: bool,
}

/// Arguments for `inspect`
#[derive(Args, Debug)]
pub struct InspectArgs {
    /// Export filename or path (use 'latest' for most recent)
    pub file: String,
}

/// Handle `restore`
///
/// Without `--force` this only previews the file. Returns the status of the
/// restore, or `None` when nothing was restored.
pub fn handle_restore_command(
    orchestrator: &RestoreOrchestrator,
    archive: &ExportArchive,
    args: RestoreArgs,
) -> BackupResult<Option<RestoreStatus>> {
    let path = archive.resolve(&args.file)?;
    let text = read_export(&path)?;

    if !args.force {
        let inspection = orchestrator.inspect(&text)?;
        println!("Restore Preview: {}", path.display());
        println!();
        print!("{}", format_inspect_report(&inspection));
        println!();
        println!("WARNING: Restoring will overwrite the current wallet configuration.");
        println!("To proceed, run again with --force flag:");
        println!("  wallet-backup restore {} --force", args.file);
        return Ok(None);
    }

    let report = orchestrator.restore_all(&text)?;
    print!("{}", format_restore_report(&report));
    Ok(Some(report.status()))
}

/// Handle `inspect`
pub fn handle_inspect_command(
    orchestrator: &RestoreOrchestrator,
    archive: &ExportArchive,
    args: InspectArgs,
) -> BackupResult<()> {
    let path = archive.resolve(&args.file)?;
    let text = read_export(&path)?;
    let inspection = orchestrator.inspect(&text)?;

    println!("Export: {}", path.display());
    print!("{}", format_inspect_report(&inspection));
    Ok(())
}

fn read_export(path: &Path) -> BackupResult<String> {
    std::fs::read_to_string(path)
        .map_err(|e| BackupError::Io(format!("Failed to read {}: {}", path.display(), e)))
}
