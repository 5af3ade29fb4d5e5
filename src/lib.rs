//! wallet-backup - export and restore of wallet configuration snapshots
//!
//! This library gathers the backup-relevant state of a local wallet
//! (preferences, address book, network configurations and internal accounts)
//! into one versioned snapshot document, and restores such a document section
//! by section without letting one failing section abort the others.
//!
//! # Architecture
//!
//! The crate is organized into the following modules:
//!
//! - `config`: Configuration, path management and capability switches
//! - `error`: Custom error types
//! - `models`: Typed records owned by the collaborators
//! - `storage`: Collaborator stores with JSON file persistence
//! - `adapter`: The contract between the orchestrator and a collaborator
//! - `snapshot`: Snapshot document and its text codec
//! - `merge`: Per-section merge policies
//! - `restore`: Export and restore orchestration with per-section reports
//! - `telemetry`: End-of-restore reporting hooks
//! - `audit`: Audit logging of exports and restores
//! - `archive`: Export files on disk
//!
//! # Example
//!
//! ```rust,ignore
//! use wallet_backup::config::{paths::WalletPaths, settings::Settings};
//! use wallet_backup::restore::RestoreOrchestrator;
//! use wallet_backup::storage::Storage;
//!
//! let paths = WalletPaths::new()?;
//! let settings = Settings::load_or_create(&paths)?;
//! let storage = Storage::open(&paths, &settings)?;
//!
//! let orchestrator = RestoreOrchestrator::for_storage(&storage, &settings.features);
//! let text = orchestrator.export_all()?;
//! let report = orchestrator.restore_all(&text)?;
//! println!("{}", report.summary());
//! ```

pub mod adapter;
pub mod archive;
pub mod audit;
pub mod cli;
pub mod config;
pub mod display;
pub mod error;
pub mod merge;
pub mod models;
pub mod restore;
pub mod snapshot;
pub mod storage;
pub mod telemetry;

pub use adapter::SectionAdapter;
pub use error::{BackupError, BackupResult};
