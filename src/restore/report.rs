//! Restore outcome reporting

use std::fmt;

use serde::Serialize;

use crate::snapshot::SectionName;

/// What happened to one section during a restore
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "lowercase")]
pub enum SectionOutcome {
    /// Merged and handed to the collaborator
    Applied {
        /// Top-level fields that changed, if any did
        #[serde(skip_serializing_if = "Option::is_none")]
        changes: Option<String>,
    },
    /// Not present in the document; collaborator untouched
    Skipped,
    /// The merge or the collaborator rejected the section
    Failed { cause: String },
}

impl SectionOutcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Applied { .. } => "applied",
            Self::Skipped => "skipped",
            Self::Failed { .. } => "failed",
        }
    }

    pub fn is_applied(&self) -> bool {
        matches!(self, Self::Applied { .. })
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, Self::Failed { .. })
    }
}

impl fmt::Display for SectionOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Failed { cause } => write!(f, "failed: {}", cause),
            _ => f.write_str(self.as_str()),
        }
    }
}

/// Non-fatal anomalies noticed during a restore
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RestoreWarning {
    /// A document key with no registered policy or collaborator
    UnknownSection { section: String },

    /// A pointer inside a section names a record the section does not contain
    ReferentialIntegrity { section: String, detail: String },

    /// The document was written by a newer exporter
    UnsupportedVersion { found: u64, supported: u64 },
}

impl fmt::Display for RestoreWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownSection { section } => {
                write!(f, "section {:?} is not recognized and was ignored", section)
            }
            Self::ReferentialIntegrity { section, detail } => write!(f, "{}: {}", section, detail),
            Self::UnsupportedVersion { found, supported } => write!(
                f,
                "backup schema version {} is newer than supported version {}",
                found, supported
            ),
        }
    }
}

/// One row of a restore report
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SectionReport {
    pub section: String,
    #[serde(flatten)]
    pub outcome: SectionOutcome,
}

impl SectionReport {
    /// Name used in user-facing summaries
    pub fn label(&self) -> &str {
        match self.section.parse::<SectionName>() {
            Ok(name) => name.label(),
            Err(_) => self.section.as_str(),
        }
    }
}

/// Overall result class of a finished restore
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RestoreStatus {
    /// Every present section applied
    Success,
    /// Some sections applied, some failed
    PartialFailure,
    /// Sections were present but none applied
    Failure,
}

impl fmt::Display for RestoreStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Success => "success",
            Self::PartialFailure => "partial failure",
            Self::Failure => "failure",
        })
    }
}

/// Per-section outcome summary of one restore
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RestoreReport {
    /// Schema version the document declared
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<u64>,

    /// Outcomes in processing order
    pub sections: Vec<SectionReport>,

    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<RestoreWarning>,
}

impl RestoreReport {
    pub fn new(version: Option<u64>) -> Self {
        Self {
            version,
            ..Self::default()
        }
    }

    pub(crate) fn record(&mut self, section: impl Into<String>, outcome: SectionOutcome) {
        self.sections.push(SectionReport {
            section: section.into(),
            outcome,
        });
    }

    pub(crate) fn warn(&mut self, warning: RestoreWarning) {
        self.warnings.push(warning);
    }

    /// Outcome recorded for a section
    pub fn outcome(&self, section: &str) -> Option<&SectionOutcome> {
        self.sections
            .iter()
            .find(|report| report.section == section)
            .map(|report| &report.outcome)
    }

    pub fn applied_count(&self) -> usize {
        self.sections.iter().filter(|r| r.outcome.is_applied()).count()
    }

    pub fn skipped_count(&self) -> usize {
        self.sections
            .iter()
            .filter(|r| r.outcome == SectionOutcome::Skipped)
            .count()
    }

    pub fn failed_count(&self) -> usize {
        self.sections.iter().filter(|r| r.outcome.is_failed()).count()
    }

    /// Sections that were present in the document and attempted
    pub fn attempted_count(&self) -> usize {
        self.applied_count() + self.failed_count()
    }

    /// `(section, cause)` for every failed section
    pub fn failures(&self) -> Vec<(&str, &str)> {
        self.sections
            .iter()
            .filter_map(|report| match &report.outcome {
                SectionOutcome::Failed { cause } => Some((report.section.as_str(), cause.as_str())),
                _ => None,
            })
            .collect()
    }

    pub fn status(&self) -> RestoreStatus {
        match (self.applied_count(), self.failed_count()) {
            (_, 0) => RestoreStatus::Success,
            (0, _) => RestoreStatus::Failure,
            _ => RestoreStatus::PartialFailure,
        }
    }

    /// User-facing one-line summary
    ///
    /// e.g. `3 of 4 sections restored; address book restore failed`
    pub fn summary(&self) -> String {
        let mut summary = format!(
            "{} of {} sections restored",
            self.applied_count(),
            self.attempted_count()
        );

        for report in self.sections.iter().filter(|r| r.outcome.is_failed()) {
            summary.push_str(&format!("; {} restore failed", report.label()));
        }

        summary
    }
}

/// What a document would restore, computed without touching any collaborator
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct InspectReport {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<u64>,

    /// Registered sections the document carries, in processing order
    pub present: Vec<String>,

    /// Registered sections the document lacks; these would be skipped
    pub missing: Vec<String>,

    /// Document keys no collaborator is registered for
    pub unknown: Vec<String>,

    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<RestoreWarning>,
}

impl InspectReport {
    /// Whether a restore would change anything
    pub fn is_empty(&self) -> bool {
        self.present.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn partial_report() -> RestoreReport {
        let mut report = RestoreReport::new(Some(1));
        report.record("preferences", SectionOutcome::Applied { changes: None });
        report.record(
            "addressBook",
            SectionOutcome::Failed {
                cause: "disk full".into(),
            },
        );
        report.record("network", SectionOutcome::Applied { changes: None });
        report.record("internalAccounts", SectionOutcome::Applied { changes: None });
        report
    }

    #[test]
    fn test_summary_names_failed_sections() {
        assert_eq!(
            partial_report().summary(),
            "3 of 4 sections restored; address book restore failed"
        );
    }

    #[test]
    fn test_counts_and_status() {
        let report = partial_report();
        assert_eq!(report.applied_count(), 3);
        assert_eq!(report.failed_count(), 1);
        assert_eq!(report.skipped_count(), 0);
        assert_eq!(report.status(), RestoreStatus::PartialFailure);
        assert_eq!(report.failures(), vec![("addressBook", "disk full")]);
    }

    #[test]
    fn test_skipped_sections_not_counted_as_attempted() {
        let mut report = RestoreReport::new(None);
        report.record("preferences", SectionOutcome::Applied { changes: None });
        report.record("network", SectionOutcome::Skipped);

        assert_eq!(report.summary(), "1 of 1 sections restored");
        assert_eq!(report.status(), RestoreStatus::Success);
    }

    #[test]
    fn test_all_failed_status() {
        let mut report = RestoreReport::new(None);
        report.record("network", SectionOutcome::Failed { cause: "x".into() });
        assert_eq!(report.status(), RestoreStatus::Failure);
    }

    #[test]
    fn test_custom_section_label() {
        let mut report = RestoreReport::new(None);
        report.record("tokens", SectionOutcome::Failed { cause: "x".into() });
        assert_eq!(report.summary(), "0 of 1 sections restored; tokens restore failed");
    }

    #[test]
    fn test_report_serializes() {
        let json = serde_json::to_value(partial_report()).unwrap();
        assert_eq!(json["sections"][1]["outcome"], "failed");
        assert_eq!(json["sections"][1]["cause"], "disk full");
    }
}
