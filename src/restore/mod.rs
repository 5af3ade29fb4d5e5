//! Restore orchestration
//!
//! [`RestoreOrchestrator`] exports every registered collaborator into one
//! snapshot and restores a snapshot section by section. Each section is
//! merged with the collaborator's current state through its
//! [`MergePolicy`](crate::merge::MergePolicy) before being handed back.
//!
//! # Example
//!
//! ```rust,ignore
//! use wallet_backup::restore::RestoreOrchestrator;
//!
//! let orchestrator = RestoreOrchestrator::for_storage(&storage, &settings.features);
//! let text = orchestrator.export_all()?;
//!
//! let report = orchestrator.restore_all(&text)?;
//! println!("{}", report.summary());
//! ```

mod orchestrator;
mod report;

pub use orchestrator::RestoreOrchestrator;
pub use report::{
    InspectReport, RestoreReport, RestoreStatus, RestoreWarning, SectionOutcome, SectionReport,
};
