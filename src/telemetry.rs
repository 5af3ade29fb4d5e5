//! Restore telemetry hooks
//!
//! Implement [`TelemetryReporter`] to observe export and restore results.
//! Reporters return nothing, so they cannot influence a restore.

use std::sync::{Arc, Mutex};

use crate::error::BackupError;
use crate::restore::{RestoreReport, RestoreStatus};

/// Receives one notification per finished export or restore
pub trait TelemetryReporter: Send + Sync {
    /// A restore ran to completion, whatever its per-section outcomes
    fn restore_completed(&self, report: &RestoreReport);

    /// A restore was refused before any collaborator was touched
    fn restore_rejected(&self, error: &BackupError);

    /// An export document was produced
    fn export_completed(&self, _sections: &[String]) {}
}

impl<T: TelemetryReporter + ?Sized> TelemetryReporter for Arc<T> {
    fn restore_completed(&self, report: &RestoreReport) {
        (**self).restore_completed(report)
    }

    fn restore_rejected(&self, error: &BackupError) {
        (**self).restore_rejected(error)
    }

    fn export_completed(&self, sections: &[String]) {
        (**self).export_completed(sections)
    }
}

/// Fan out to two reporters
impl<A: TelemetryReporter, B: TelemetryReporter> TelemetryReporter for (A, B) {
    fn restore_completed(&self, report: &RestoreReport) {
        self.0.restore_completed(report);
        self.1.restore_completed(report);
    }

    fn restore_rejected(&self, error: &BackupError) {
        self.0.restore_rejected(error);
        self.1.restore_rejected(error);
    }

    fn export_completed(&self, sections: &[String]) {
        self.0.export_completed(sections);
        self.1.export_completed(sections);
    }
}

/// No-op reporter for when telemetry is disabled
#[derive(Debug, Default)]
pub struct NoopReporter;

impl TelemetryReporter for NoopReporter {
    fn restore_completed(&self, _: &RestoreReport) {}
    fn restore_rejected(&self, _: &BackupError) {}
}

/// Emits restore results as `tracing` events
#[derive(Debug, Default)]
pub struct TracingReporter;

impl TelemetryReporter for TracingReporter {
    fn restore_completed(&self, report: &RestoreReport) {
        let status = report.status();
        match status {
            RestoreStatus::Success => tracing::info!(
                status = %status,
                applied = report.applied_count(),
                skipped = report.skipped_count(),
                warnings = report.warnings.len(),
                "Restore completed"
            ),
            _ => tracing::warn!(
                status = %status,
                applied = report.applied_count(),
                skipped = report.skipped_count(),
                failed = report.failed_count(),
                failures = ?report.failures(),
                "Restore completed with failures"
            ),
        }
    }

    fn restore_rejected(&self, error: &BackupError) {
        tracing::warn!(error = %error, "Restore rejected");
    }

    fn export_completed(&self, sections: &[String]) {
        tracing::info!(sections = ?sections, "Export completed");
    }
}

/// A recorded telemetry notification
#[derive(Debug, Clone, PartialEq)]
pub enum TelemetryEvent {
    RestoreCompleted(RestoreReport),
    RestoreRejected(String),
    ExportCompleted(Vec<String>),
}

/// Keeps every notification in memory
#[derive(Debug, Default)]
pub struct RecordingReporter {
    events: Mutex<Vec<TelemetryEvent>>,
}

impl RecordingReporter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Notifications received so far, oldest first
    pub fn events(&self) -> Vec<TelemetryEvent> {
        self.events
            .lock()
            .map(|events| events.clone())
            .unwrap_or_default()
    }

    /// The most recent restore report, if any
    pub fn last_report(&self) -> Option<RestoreReport> {
        self.events().into_iter().rev().find_map(|event| match event {
            TelemetryEvent::RestoreCompleted(report) => Some(report),
            _ => None,
        })
    }

    fn push(&self, event: TelemetryEvent) {
        if let Ok(mut events) = self.events.lock() {
            events.push(event);
        }
    }
}

impl TelemetryReporter for RecordingReporter {
    fn restore_completed(&self, report: &RestoreReport) {
        self.push(TelemetryEvent::RestoreCompleted(report.clone()));
    }

    fn restore_rejected(&self, error: &BackupError) {
        self.push(TelemetryEvent::RestoreRejected(error.to_string()));
    }

    fn export_completed(&self, sections: &[String]) {
        self.push(TelemetryEvent::ExportCompleted(sections.to_vec()));
    }
}
