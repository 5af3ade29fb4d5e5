//! Collaborator adapter contract
//!
//! Every state owner that takes part in backup and restore exposes its
//! section through this trait. The orchestrator only ever talks to
//! collaborators through it.

use std::sync::Arc;

use serde_json::Value;

use crate::error::BackupResult;

/// A state owner that can hand out and take back its backup section
pub trait SectionAdapter: Send + Sync {
    /// The collaborator's current section, ready to be written into a snapshot
    ///
    /// Must not mutate any state.
    fn snapshot(&self) -> BackupResult<Value>;

    /// Install a restored section
    ///
    /// The adapter owns the meaning of the payload. On error the
    /// collaborator's state is left as it was.
    fn apply_backup(&self, section: Value) -> BackupResult<()>;
}

impl<T: SectionAdapter + ?Sized> SectionAdapter for Arc<T> {
    fn snapshot(&self) -> BackupResult<Value> {
        (**self).snapshot()
    }

    fn apply_backup(&self, section: Value) -> BackupResult<()> {
        (**self).apply_backup(section)
    }
}

impl<T: SectionAdapter + ?Sized> SectionAdapter for &T {
    fn snapshot(&self) -> BackupResult<Value> {
        (**self).snapshot()
    }

    fn apply_backup(&self, section: Value) -> BackupResult<()> {
        (**self).apply_backup(section)
    }
}
