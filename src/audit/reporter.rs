//! Telemetry reporter that writes to the audit log

use crate::error::BackupError;
use crate::restore::{RestoreReport, SectionOutcome};
use crate::telemetry::TelemetryReporter;

use super::entry::AuditEntry;
use super::logger::AuditLogger;

/// Records every export and restore in the audit log
///
/// Write failures are logged and otherwise ignored.
pub struct AuditReporter {
    logger: AuditLogger,
}

impl AuditReporter {
    pub fn new(logger: AuditLogger) -> Self {
        Self { logger }
    }

    pub fn logger(&self) -> &AuditLogger {
        &self.logger
    }

    fn write(&self, entries: &[AuditEntry]) {
        if let Err(e) = self.logger.log_batch(entries) {
            tracing::warn!(error = %e, path = %self.logger.path().display(), "Failed to write audit log");
        }
    }
}

impl TelemetryReporter for AuditReporter {
    fn restore_completed(&self, report: &RestoreReport) {
        let mut entries: Vec<AuditEntry> = report
            .sections
            .iter()
            .map(|section| {
                let detail = match &section.outcome {
                    SectionOutcome::Applied { changes } => changes.clone(),
                    SectionOutcome::Failed { cause } => Some(cause.clone()),
                    SectionOutcome::Skipped => None,
                };
                AuditEntry::restore_section(&section.section, section.outcome.as_str(), detail)
            })
            .collect();

        let mut summary = report.summary();
        for warning in &report.warnings {
            summary.push_str(&format!("; warning: {}", warning));
        }
        entries.push(AuditEntry::restore_summary(report.status().to_string(), summary));

        self.write(&entries);
    }

    fn restore_rejected(&self, error: &BackupError) {
        self.write(&[AuditEntry::rejected(error.to_string())]);
    }

    fn export_completed(&self, sections: &[String]) {
        self.write(&[AuditEntry::export(sections)]);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audit::AuditEvent;
    use tempfile::TempDir;

    #[test]
    fn test_restore_writes_section_and_summary_entries() {
        let temp_dir = TempDir::new().unwrap();
        let reporter = AuditReporter::new(AuditLogger::new(temp_dir.path().join("audit.log")));

        let mut report = RestoreReport::new(Some(1));
        report.record(
            "preferences",
            SectionOutcome::Applied {
                changes: Some("theme: \"os\" -> \"dark\"".into()),
            },
        );
        report.record("addressBook", SectionOutcome::Failed { cause: "disk full".into() });
        reporter.restore_completed(&report);

        let entries = reporter.logger().read_all().unwrap();
        assert_eq!(entries.len(), 3);
        assert_eq!(entries[0].detail.as_deref(), Some("theme: \"os\" -> \"dark\""));
        assert_eq!(entries[1].outcome.as_deref(), Some("failed"));
        assert_eq!(entries[2].section, None);
        assert_eq!(entries[2].outcome.as_deref(), Some("partial failure"));
        assert_eq!(
            entries[2].detail.as_deref(),
            Some("1 of 2 sections restored; address book restore failed")
        );
    }

    #[test]
    fn test_rejected_and_export() {
        let temp_dir = TempDir::new().unwrap();
        let reporter = AuditReporter::new(AuditLogger::new(temp_dir.path().join("audit.log")));

        reporter.restore_rejected(&BackupError::MalformedSnapshot("eof".into()));
        reporter.export_completed(&["network".into()]);

        let entries = reporter.logger().read_all().unwrap();
        assert_eq!(entries[0].event, AuditEvent::RestoreRejected);
        assert_eq!(entries[1].event, AuditEvent::Export);
    }

    #[test]
    fn test_unwritable_log_does_not_panic() {
        let temp_dir = TempDir::new().unwrap();
        // a directory where the log file should be
        let reporter = AuditReporter::new(AuditLogger::new(temp_dir.path().to_path_buf()));
        reporter.restore_rejected(&BackupError::RestoreInProgress);
    }
}
