//! Snapshot documents and their text encoding
//!
//! # Document Format
//!
//! A snapshot is one JSON object. Recognized top-level keys:
//! - `preferences`: flat map of preference names to values
//! - `addressBook`: chain id -> address -> contact
//! - `network`: configuration id -> RPC network
//! - `internalAccounts`: `{accounts, selectedAccount}`
//! - `schemaVersion`: integer format version (absent in older exports)
//!
//! Any other key is carried through untouched.

mod codec;
mod document;

pub use codec::{SnapshotCodec, SCHEMA_VERSION, VERSION_KEY};
pub(crate) use codec::json_type_name;
pub use document::{SectionName, SnapshotDocument};
