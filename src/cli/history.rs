//! Audit history command

use crate::audit::AuditLogger;
use crate::error::BackupResult;

/// Handle `history`
pub fn handle_history_command(logger: &AuditLogger, limit: usize) -> BackupResult<()> {
    let entries = logger.read_recent(limit)?;

    if entries.is_empty() {
        println!("No export or restore has been recorded yet.");
        return Ok(());
    }

    for entry in &entries {
        println!("{}", entry.format_human_readable());
    }
    Ok(())
}
