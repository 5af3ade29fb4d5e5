//! Core data models for wallet-backup
//!
//! Typed views of the records each collaborator store owns: identities,
//! address book contacts, network configurations and internal accounts.

pub mod account;
pub mod address_book;
pub mod identity;
pub mod network;
pub mod preferences;

pub use account::{InternalAccount, InternalAccounts};
pub use address_book::{AddressBook, AddressBookEntry, AddressBookValidationError};
pub use identity::{Identity, IdentityMap};
pub use network::{NetworkConfiguration, NetworkConfigurations, NetworkValidationError};
pub use preferences::{preference_whitelist, TextDirection, IDENTITY_FIELDS};
