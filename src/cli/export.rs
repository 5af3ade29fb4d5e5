//! Export CLI commands
//!
//! Implements `export` and `list`.

use clap::Args;
use std::path::PathBuf;

use crate::archive::ExportArchive;
use crate::display::format_export_list;
use crate::error::{BackupError, BackupResult};
use crate::restore::RestoreOrchestrator;

/// Arguments for `export`
#[derive(Args, Debug)]
pub struct ExportArgs {
    /// Write the export to this file instead of the export directory
    #[arg(short, long, conflicts_with = "stdout")]
    pub output: Option<PathBuf>,

    /// Print the export instead of writing a file
    #[arg(long)]
    pub stdout: bool,
}

/// Handle `export`
pub fn handle_export_command(
    orchestrator: &RestoreOrchestrator,
    archive: &ExportArchive,
    args: ExportArgs,
) -> BackupResult<()> {
    let text = orchestrator.export_all()?;

    if args.stdout {
        println!("{}", text);
        return Ok(());
    }

    let path = match args.output {
        Some(path) => {
            std::fs::write(&path, &text)
                .map_err(|e| BackupError::Io(format!("Failed to write {}: {}", path.display(), e)))?;
            path
        }
        None => archive.export_to_archive(&text)?,
    };

    println!("Exported {} section(s)", orchestrator.section_names().len());
    println!("Location: {}", path.display());
    Ok(())
}

/// Handle `list`
pub fn handle_list_command(archive: &ExportArchive) -> BackupResult<()> {
    let exports = archive.list_exports()?;

    if exports.is_empty() {
        println!("No exports found in {}", archive.export_dir().display());
        println!("Create one with: wallet-backup export");
        return Ok(());
    }

    println!("{}", format_export_list(&exports, chrono::Utc::now()));
    Ok(())
}
