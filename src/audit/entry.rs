//! Audit entry data structures
//!
//! Defines the audited events and the format of a single log line.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Kinds of audited events
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuditEvent {
    /// A snapshot was exported
    Export,
    /// A restore ran; one entry per section plus a summary entry
    Restore,
    /// A restore was refused before touching any collaborator
    RestoreRejected,
}

impl std::fmt::Display for AuditEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AuditEvent::Export => write!(f, "EXPORT"),
            AuditEvent::Restore => write!(f, "RESTORE"),
            AuditEvent::RestoreRejected => write!(f, "RESTORE REJECTED"),
        }
    }
}

/// A single audit log entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuditEntry {
    /// When the event occurred (UTC)
    pub timestamp: DateTime<Utc>,

    pub event: AuditEvent,

    /// Section the entry is about; `None` for whole-document entries
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub section: Option<String>,

    /// `applied`, `skipped`, `failed`, or an overall restore status
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub outcome: Option<String>,

    /// Change summary, failure cause or other free text
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

impl AuditEntry {
    fn new(event: AuditEvent) -> Self {
        Self {
            timestamp: Utc::now(),
            event,
            section: None,
            outcome: None,
            detail: None,
        }
    }

    /// Entry for a completed export
    pub fn export(sections: &[String]) -> Self {
        Self {
            detail: Some(sections.join(", ")),
            ..Self::new(AuditEvent::Export)
        }
    }

    /// Entry for one section of a restore
    pub fn restore_section(
        section: impl Into<String>,
        outcome: impl Into<String>,
        detail: Option<String>,
    ) -> Self {
        Self {
            section: Some(section.into()),
            outcome: Some(outcome.into()),
            detail,
            ..Self::new(AuditEvent::Restore)
        }
    }

    /// Whole-document entry closing a restore
    pub fn restore_summary(status: impl Into<String>, summary: impl Into<String>) -> Self {
        Self {
            outcome: Some(status.into()),
            detail: Some(summary.into()),
            ..Self::new(AuditEvent::Restore)
        }
    }

    /// Entry for a refused restore
    pub fn rejected(reason: impl Into<String>) -> Self {
        Self {
            detail: Some(reason.into()),
            ..Self::new(AuditEvent::RestoreRejected)
        }
    }

    /// Format the entry for human-readable output
    pub fn format_human_readable(&self) -> String {
        let mut output = format!(
            "[{}] {}",
            self.timestamp.format("%Y-%m-%d %H:%M:%S UTC"),
            self.event
        );

        if let Some(section) = &self.section {
            output.push_str(&format!(" {}", section));
        }
        if let Some(outcome) = &self.outcome {
            output.push_str(&format!(" ({})", outcome));
        }
        if let Some(detail) = &self.detail {
            output.push_str(&format!("\n  {}", detail));
        }

        output
    }
}
