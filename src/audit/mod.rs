//! Audit logging for wallet-backup
//!
//! Records every export and restore in an append-only audit log.
//!
//! # Architecture
//!
//! - `AuditEntry`: one log line with timestamp, event, section, outcome and
//!   a free-text detail.
//! - `AuditLogger`: writes entries to the audit log file as line-delimited
//!   JSON (JSONL).
//! - `generate_diff`: human-readable summary of how a section changed.
//! - `AuditReporter`: a [`TelemetryReporter`](crate::telemetry::TelemetryReporter)
//!   that turns restore reports into audit entries.
//!
//! # Example
//!
//! ```rust,ignore
//! use wallet_backup::audit::{AuditLogger, AuditReporter};
//!
//! let reporter = AuditReporter::new(AuditLogger::new(paths.audit_log()));
//! let orchestrator = RestoreOrchestrator::for_storage(&storage, &features)
//!     .with_telemetry(reporter);
//! ```

mod diff;
mod entry;
mod logger;
mod reporter;

pub use diff::generate_diff;
pub use entry::{AuditEntry, AuditEvent};
pub use logger::AuditLogger;
pub use reporter::AuditReporter;
