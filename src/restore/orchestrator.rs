//! Export and restore sequencing
//!
//! The orchestrator owns a registration table of `(section name, adapter)`
//! pairs. Export walks the table and gathers snapshots; restore walks the
//! same table, so sections are always processed in registration order no
//! matter how the document orders its keys.

use std::sync::atomic::{AtomicBool, Ordering};

use serde_json::Value;

use crate::adapter::SectionAdapter;
use crate::audit::generate_diff;
use crate::config::FeatureSet;
use crate::error::{BackupError, BackupResult};
use crate::merge::{MergePolicy, PolicyTable};
use crate::snapshot::{SectionName, SnapshotCodec, SnapshotDocument, SCHEMA_VERSION};
use crate::storage::Storage;
use crate::telemetry::{NoopReporter, TelemetryReporter};

use super::report::{InspectReport, RestoreReport, RestoreWarning, SectionOutcome};

struct Registration {
    section: String,
    adapter: Box<dyn SectionAdapter>,
}

/// Sequences export and restore across registered collaborators
pub struct RestoreOrchestrator {
    registrations: Vec<Registration>,
    policies: PolicyTable,
    codec: SnapshotCodec,
    telemetry: Box<dyn TelemetryReporter>,
    in_flight: AtomicBool,
}

/// Clears the in-flight flag when a restore ends, however it ends
struct InFlightGuard<'a>(&'a AtomicBool);

impl<'a> InFlightGuard<'a> {
    fn acquire(flag: &'a AtomicBool) -> BackupResult<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .map_err(|_| BackupError::RestoreInProgress)?;
        Ok(Self(flag))
    }
}

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

impl RestoreOrchestrator {
    /// Create an orchestrator with no registered sections
    pub fn new(policies: PolicyTable) -> Self {
        Self {
            registrations: Vec::new(),
            policies,
            codec: SnapshotCodec::new(),
            telemetry: Box::new(NoopReporter),
            in_flight: AtomicBool::new(false),
        }
    }

    /// Wire the four built-in collaborators with their standard policies
    pub fn for_storage(storage: &Storage, features: &FeatureSet) -> Self {
        let mut orchestrator = Self::new(PolicyTable::standard(features));
        orchestrator
            .register(SectionName::Preferences.as_str(), storage.preferences.clone())
            .register(SectionName::AddressBook.as_str(), storage.address_book.clone())
            .register(SectionName::Network.as_str(), storage.network.clone())
            .register(
                SectionName::InternalAccounts.as_str(),
                storage.accounts.clone(),
            );
        orchestrator
    }

    pub fn with_telemetry(mut self, reporter: impl TelemetryReporter + 'static) -> Self {
        self.telemetry = Box::new(reporter);
        self
    }

    pub fn with_codec(mut self, codec: SnapshotCodec) -> Self {
        self.codec = codec;
        self
    }

    /// Register a collaborator under a section name
    ///
    /// Re-registering a name swaps the adapter but keeps its position.
    pub fn register(
        &mut self,
        section: impl Into<String>,
        adapter: impl SectionAdapter + 'static,
    ) -> &mut Self {
        let section = section.into();
        let adapter: Box<dyn SectionAdapter> = Box::new(adapter);

        match self.registrations.iter_mut().find(|r| r.section == section) {
            Some(existing) => existing.adapter = adapter,
            None => self.registrations.push(Registration { section, adapter }),
        }
        self
    }

    /// Register a collaborator together with its merge policy
    pub fn register_with_policy(
        &mut self,
        section: impl Into<String>,
        policy: MergePolicy,
        adapter: impl SectionAdapter + 'static,
    ) -> &mut Self {
        let section = section.into();
        self.policies.register(section.clone(), policy);
        self.register(section, adapter)
    }

    /// Registered section names in processing order
    pub fn section_names(&self) -> Vec<&str> {
        self.registrations.iter().map(|r| r.section.as_str()).collect()
    }

    /// Gather every collaborator's snapshot into a versioned document
    ///
    /// Reads only; no collaborator is mutated.
    pub fn export_document(&self) -> BackupResult<SnapshotDocument> {
        let mut document = SnapshotDocument::with_version(SCHEMA_VERSION);
        for registration in &self.registrations {
            let payload = registration.adapter.snapshot()?;
            document.insert(registration.section.clone(), payload);
        }
        Ok(document)
    }

    /// Export every section as snapshot text
    pub fn export_all(&self) -> BackupResult<String> {
        let document = self.export_document()?;
        let text = self.codec.serialize(&document)?;

        let sections: Vec<String> = document.sections().keys().cloned().collect();
        tracing::info!(sections = sections.len(), bytes = text.len(), "Exported snapshot");
        self.telemetry.export_completed(&sections);

        Ok(text)
    }

    /// Restore every section present in `text`
    ///
    /// Fails only when the text is not a snapshot or another restore is
    /// running; in both cases no collaborator is touched. Per-section
    /// failures are recorded in the report and do not stop later sections.
    pub fn restore_all(&self, text: &str) -> BackupResult<RestoreReport> {
        let _guard = InFlightGuard::acquire(&self.in_flight)?;

        let document = match self.codec.parse(text) {
            Ok(document) => document,
            Err(e) => {
                tracing::warn!(error = %e, "Rejected restore input");
                self.telemetry.restore_rejected(&e);
                return Err(e);
            }
        };

        let mut report = RestoreReport::new(document.version());
        for warning in self.document_warnings(&document) {
            report.warn(warning);
        }

        for registration in &self.registrations {
            let section = registration.section.as_str();

            let Some(incoming) = document.get(section).filter(|v| !v.is_null()) else {
                tracing::debug!(section, "Section absent, skipping");
                report.record(section, SectionOutcome::Skipped);
                continue;
            };

            let Some(policy) = self.policies.get(section) else {
                tracing::warn!(section, "No merge policy registered, ignoring section");
                report.warn(RestoreWarning::UnknownSection {
                    section: section.to_string(),
                });
                report.record(section, SectionOutcome::Skipped);
                continue;
            };

            let outcome = match self.restore_section(registration, policy, incoming, &mut report) {
                Ok(changes) => {
                    tracing::info!(section, policy = policy.kind(), "Section restored");
                    SectionOutcome::Applied { changes }
                }
                Err(e) => {
                    tracing::warn!(section, error = %e, "Section restore failed");
                    SectionOutcome::Failed {
                        cause: e.to_string(),
                    }
                }
            };
            report.record(section, outcome);
        }

        tracing::info!(
            applied = report.applied_count(),
            skipped = report.skipped_count(),
            failed = report.failed_count(),
            "{}",
            report.summary()
        );
        self.telemetry.restore_completed(&report);

        Ok(report)
    }

    /// Check a document without touching any collaborator
    pub fn inspect(&self, text: &str) -> BackupResult<InspectReport> {
        let document = self.codec.parse(text)?;

        let mut report = InspectReport {
            version: document.version(),
            warnings: self.document_warnings(&document),
            ..InspectReport::default()
        };

        for registration in &self.registrations {
            let section = registration.section.as_str();
            match document.get(section).filter(|v| !v.is_null()) {
                Some(payload) => {
                    report.present.push(section.to_string());
                    report.warnings.extend(integrity_warning(section, payload));
                }
                None => report.missing.push(section.to_string()),
            }
        }

        report.unknown = self.unknown_keys(&document);
        Ok(report)
    }

    fn restore_section(
        &self,
        registration: &Registration,
        policy: &MergePolicy,
        incoming: &Value,
        report: &mut RestoreReport,
    ) -> BackupResult<Option<String>> {
        let current = registration.adapter.snapshot()?;
        let merged = policy.merge(&current, incoming)?;

        if let Some(warning) = integrity_warning(&registration.section, &merged) {
            tracing::warn!(section = %registration.section, "{}", warning);
            report.warn(warning);
        }

        let changes = generate_diff(&current, &merged);
        registration.adapter.apply_backup(merged)?;
        Ok(changes)
    }

    /// Warnings that depend only on the document as a whole
    fn document_warnings(&self, document: &SnapshotDocument) -> Vec<RestoreWarning> {
        let mut warnings = Vec::new();

        if let Some(found) = document.version().filter(|v| *v > SCHEMA_VERSION) {
            tracing::warn!(found, supported = SCHEMA_VERSION, "Backup is from a newer version");
            warnings.push(RestoreWarning::UnsupportedVersion {
                found,
                supported: SCHEMA_VERSION,
            });
        }

        for section in self.unknown_keys(document) {
            tracing::warn!(section = %section, "Ignoring unrecognized section");
            warnings.push(RestoreWarning::UnknownSection { section });
        }

        warnings
    }

    fn unknown_keys(&self, document: &SnapshotDocument) -> Vec<String> {
        document
            .sections()
            .keys()
            .filter(|key| !self.registrations.iter().any(|r| &r.section == *key))
            .cloned()
            .collect()
    }
}

/// Flag a selected-account pointer that names no account in the section
fn integrity_warning(section: &str, payload: &Value) -> Option<RestoreWarning> {
    if section != SectionName::InternalAccounts.as_str() {
        return None;
    }

    let selected = payload.get("selectedAccount").and_then(Value::as_str).unwrap_or("");
    let accounts = payload.get("accounts").and_then(Value::as_object);
    let dangling = match accounts {
        Some(accounts) if accounts.is_empty() => !selected.is_empty(),
        Some(accounts) => !accounts.contains_key(selected),
        None => !selected.is_empty(),
    };

    dangling.then(|| RestoreWarning::ReferentialIntegrity {
        section: section.to_string(),
        detail: format!("selectedAccount {:?} does not match any account", selected),
    })
}
