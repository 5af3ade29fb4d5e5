//! Snapshot document structures
//!
//! A snapshot is a mapping from section name to an opaque section payload,
//! plus an optional schema version.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde_json::Value;

/// Sections this crate knows how to restore
///
/// The declaration order is the order sections are exported and restored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum SectionName {
    Preferences,
    AddressBook,
    Network,
    InternalAccounts,
}

impl SectionName {
    /// All known sections in processing order
    pub const ALL: [SectionName; 4] = [
        Self::Preferences,
        Self::AddressBook,
        Self::Network,
        Self::InternalAccounts,
    ];

    /// The document key for this section
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Preferences => "preferences",
            Self::AddressBook => "addressBook",
            Self::Network => "network",
            Self::InternalAccounts => "internalAccounts",
        }
    }

    /// Human-readable label for summaries
    pub fn label(&self) -> &'static str {
        match self {
            Self::Preferences => "preferences",
            Self::AddressBook => "address book",
            Self::Network => "networks",
            Self::InternalAccounts => "accounts",
        }
    }
}

impl fmt::Display for SectionName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SectionName {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|name| name.as_str() == s)
            .ok_or_else(|| format!("unknown section: {}", s))
    }
}

/// An in-memory snapshot document
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SnapshotDocument {
    version: Option<u64>,
    sections: BTreeMap<String, Value>,
}

impl SnapshotDocument {
    /// Create an empty, unversioned document
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty document stamped with a schema version
    pub fn with_version(version: u64) -> Self {
        Self {
            version: Some(version),
            sections: BTreeMap::new(),
        }
    }

    /// Schema version, if the document carries one
    pub fn version(&self) -> Option<u64> {
        self.version
    }

    pub(crate) fn set_version(&mut self, version: Option<u64>) {
        self.version = version;
    }

    /// Insert or replace a section by raw key
    pub fn insert(&mut self, key: impl Into<String>, payload: Value) {
        self.sections.insert(key.into(), payload);
    }

    /// Insert or replace a known section
    pub fn insert_section(&mut self, name: SectionName, payload: Value) {
        self.insert(name.as_str(), payload);
    }

    /// Raw payload stored under a key, including `null`
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.sections.get(key)
    }

    /// Payload of a known section; a `null` payload counts as absent
    pub fn section(&self, name: SectionName) -> Option<&Value> {
        self.sections.get(name.as_str()).filter(|value| !value.is_null())
    }

    /// Whether a known section is present
    pub fn has_section(&self, name: SectionName) -> bool {
        self.section(name).is_some()
    }

    /// Keys that do not name a known section, in key order
    pub fn unknown_keys(&self) -> Vec<&str> {
        self.sections
            .keys()
            .map(String::as_str)
            .filter(|key| key.parse::<SectionName>().is_err())
            .collect()
    }

    /// All sections keyed by name
    pub fn sections(&self) -> &BTreeMap<String, Value> {
        &self.sections
    }

    pub fn len(&self) -> usize {
        self.sections.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }
}
