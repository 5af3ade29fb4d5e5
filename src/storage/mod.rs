//! Storage layer for wallet-backup
//!
//! Each collaborator store owns one slice of wallet state, persists it as a
//! JSON file with atomic writes, and notifies subscribers on change. Every
//! store implements [`SectionAdapter`](crate::adapter::SectionAdapter).

pub mod accounts;
pub mod address_book;
pub mod file_io;
pub mod network;
pub mod observable;
pub mod preferences;

use std::path::Path;
use std::sync::Arc;

use serde::Serialize;

pub use accounts::AccountsStore;
pub use address_book::AddressBookStore;
pub use file_io::{read_json, write_json_atomic};
pub use network::NetworkStore;
pub use observable::{ObservableState, Subscription};
pub use preferences::{FeatureFlagAdmin, PreferencesStore};

use crate::config::paths::WalletPaths;
use crate::config::Settings;
use crate::error::BackupResult;
use crate::models::{AddressBook, InternalAccounts, NetworkConfigurations};

/// Write `state` to `path` if the store is file-backed
pub(crate) fn persist<T: Serialize>(path: Option<&Path>, state: &T) -> BackupResult<()> {
    match path {
        Some(path) => write_json_atomic(path, state),
        None => Ok(()),
    }
}

/// Main storage coordinator that provides access to all collaborator stores
pub struct Storage {
    pub preferences: Arc<PreferencesStore>,
    pub address_book: Arc<AddressBookStore>,
    pub network: Arc<NetworkStore>,
    pub accounts: Arc<AccountsStore>,
}

impl Storage {
    /// Open every store under the configured data directory
    pub fn open(paths: &WalletPaths, settings: &Settings) -> BackupResult<Self> {
        paths.ensure_directories()?;

        let network = NetworkStore::open(paths.network_file())?;
        let chain_ids = network.chain_ids()?;
        let preferences = PreferencesStore::open(
            paths.preferences_file(),
            settings.features,
            &settings.locale,
            &chain_ids,
        )?;

        Ok(Self {
            preferences: Arc::new(preferences),
            address_book: Arc::new(AddressBookStore::open(paths.address_book_file())?),
            network: Arc::new(network),
            accounts: Arc::new(AccountsStore::open(paths.accounts_file())?),
        })
    }

    /// Fresh stores that never touch disk
    pub fn in_memory(settings: &Settings) -> Self {
        let preferences = PreferencesStore::in_memory(
            settings.features,
            PreferencesStore::default_state(&settings.features, &settings.locale, &[]),
        );

        Self {
            preferences: Arc::new(preferences),
            address_book: Arc::new(AddressBookStore::in_memory(AddressBook::new())),
            network: Arc::new(NetworkStore::in_memory(NetworkConfigurations::new())),
            accounts: Arc::new(AccountsStore::in_memory(InternalAccounts::default())),
        }
    }
}
