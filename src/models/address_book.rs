//! Address book model
//!
//! Contacts are grouped by chain id, then keyed by address.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::network::is_hex_chain_id;

/// A saved contact on a specific chain
///
/// `isEns`, `memo`, `name` and fields written by newer wallets stay in
/// `extra` exactly as read.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddressBookEntry {
    pub address: String,

    pub chain_id: String,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl AddressBookEntry {
    pub fn new(address: impl Into<String>, chain_id: impl Into<String>) -> Self {
        let mut extra = Map::new();
        extra.insert("isEns".into(), Value::Bool(false));
        extra.insert("memo".into(), Value::String(String::new()));
        extra.insert("name".into(), Value::String(String::new()));
        Self {
            address: address.into(),
            chain_id: chain_id.into(),
            extra,
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.extra.insert("name".into(), Value::String(name.into()));
        self
    }

    pub fn name(&self) -> &str {
        self.extra.get("name").and_then(Value::as_str).unwrap_or_default()
    }

    pub fn memo(&self) -> &str {
        self.extra.get("memo").and_then(Value::as_str).unwrap_or_default()
    }

    /// Whether `name` was resolved through ENS
    pub fn is_ens(&self) -> bool {
        self.extra.get("isEns").and_then(Value::as_bool).unwrap_or(false)
    }

    /// Validate the entry
    pub fn validate(&self) -> Result<(), AddressBookValidationError> {
        if self.address.trim().is_empty() {
            return Err(AddressBookValidationError::EmptyAddress);
        }
        if !is_hex_chain_id(&self.chain_id) {
            return Err(AddressBookValidationError::InvalidChainId(self.chain_id.clone()));
        }
        Ok(())
    }
}

/// Chain id -> address -> entry
pub type AddressBook = BTreeMap<String, BTreeMap<String, AddressBookEntry>>;

/// Validation errors for address book entries
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AddressBookValidationError {
    EmptyAddress,
    InvalidChainId(String),
    ChainMismatch { key: String, entry: String },
}

impl fmt::Display for AddressBookValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyAddress => write!(f, "Address book entry has no address"),
            Self::InvalidChainId(id) => write!(f, "Invalid chain id: {}", id),
            Self::ChainMismatch { key, entry } => write!(
                f,
                "Entry filed under chain {} declares chain {}",
                key, entry
            ),
        }
    }
}

impl std::error::Error for AddressBookValidationError {}

/// Validate every entry of an address book
pub fn validate_address_book(book: &AddressBook) -> Result<(), AddressBookValidationError> {
    for (chain_id, entries) in book {
        for entry in entries.values() {
            entry.validate()?;
            if !entry.chain_id.eq_ignore_ascii_case(chain_id) {
                return Err(AddressBookValidationError::ChainMismatch {
                    key: chain_id.clone(),
                    entry: entry.chain_id.clone(),
                });
            }
        }
    }
    Ok(())
}
