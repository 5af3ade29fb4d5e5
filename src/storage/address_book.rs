//! Address book store
//!
//! Snapshot form is `{"addressBook": {<chainId>: {<address>: entry}}}`.
//! Restore also accepts the bare chain map written by older exporters.

use std::path::PathBuf;

use serde_json::{Map, Value};

use crate::adapter::SectionAdapter;
use crate::error::{BackupError, BackupResult};
use crate::models::address_book::validate_address_book;
use crate::models::network::is_hex_chain_id;
use crate::models::{AddressBook, AddressBookEntry};
use crate::snapshot::json_type_name;

use super::file_io::read_json;
use super::observable::{ObservableState, Subscription};
use super::persist;

const SECTION: &str = "addressBook";

/// Repository for saved contacts
pub struct AddressBookStore {
    path: Option<PathBuf>,
    state: ObservableState<AddressBook>,
}

impl AddressBookStore {
    pub fn open(path: PathBuf) -> BackupResult<Self> {
        let book = read_json(&path)?.unwrap_or_default();
        Ok(Self {
            path: Some(path),
            state: ObservableState::new(book),
        })
    }

    pub fn in_memory(book: AddressBook) -> Self {
        Self {
            path: None,
            state: ObservableState::new(book),
        }
    }

    pub fn book(&self) -> BackupResult<AddressBook> {
        self.state.get()
    }

    /// Every entry across all chains
    pub fn entries(&self) -> BackupResult<Vec<AddressBookEntry>> {
        self.state
            .read(|book| book.values().flat_map(|chain| chain.values().cloned()).collect())
    }

    /// Number of saved contacts
    pub fn count(&self) -> BackupResult<usize> {
        self.state.read(|book| book.values().map(|chain| chain.len()).sum())
    }

    /// Add or replace a contact
    pub fn set_entry(&self, entry: AddressBookEntry) -> BackupResult<()> {
        entry
            .validate()
            .map_err(|e| BackupError::Validation(e.to_string()))?;

        self.commit(move |book| {
            book.entry(entry.chain_id.clone())
                .or_default()
                .insert(entry.address.clone(), entry);
            Ok(())
        })
    }

    /// Remove a contact, returning whether it existed
    pub fn delete(&self, chain_id: &str, address: &str) -> BackupResult<bool> {
        let (chain_id, address) = (chain_id.to_string(), address.to_string());
        let mut removed = false;
        self.commit(|book| {
            if let Some(chain) = book.get_mut(&chain_id) {
                removed = chain.remove(&address).is_some();
                if chain.is_empty() {
                    book.remove(&chain_id);
                }
            }
            Ok(())
        })?;
        Ok(removed)
    }

    pub fn subscribe<F>(&self, listener: F) -> BackupResult<Subscription<AddressBook>>
    where
        F: Fn(&AddressBook) + Send + Sync + 'static,
    {
        self.state.subscribe(listener)
    }

    fn commit(&self, f: impl FnOnce(&mut AddressBook) -> BackupResult<()>) -> BackupResult<()> {
        self.state.try_update(|book| {
            f(book)?;
            persist(self.path.as_deref(), book)
        })
    }
}

/// Pull the chain map out of either accepted section shape
fn unwrap_section(section: Value) -> BackupResult<Value> {
    let mut map = match section {
        Value::Object(map) => map,
        other => {
            return Err(BackupError::section_apply(
                SECTION,
                format!("expected an object, found {}", json_type_name(&other)),
            ))
        }
    };

    if map.len() == 1 && map.get(SECTION).map_or(false, Value::is_object) {
        return Ok(map.remove(SECTION).unwrap_or(Value::Object(Map::new())));
    }

    if let Some(key) = map.keys().find(|key| !is_hex_chain_id(key)) {
        return Err(BackupError::section_apply(
            SECTION,
            format!("unrecognized section shape: unexpected key {:?}", key),
        ));
    }

    Ok(Value::Object(map))
}

impl SectionAdapter for AddressBookStore {
    fn snapshot(&self) -> BackupResult<Value> {
        let book = serde_json::to_value(self.book()?)?;
        let mut section = Map::new();
        section.insert(SECTION.to_string(), book);
        Ok(Value::Object(section))
    }

    fn apply_backup(&self, section: Value) -> BackupResult<()> {
        let book: AddressBook = serde_json::from_value(unwrap_section(section)?)
            .map_err(|e| BackupError::section_apply(SECTION, e.to_string()))?;

        validate_address_book(&book).map_err(|e| BackupError::section_apply(SECTION, e.to_string()))?;

        self.commit(move |current| {
            *current = book;
            Ok(())
        })
    }
}
