//! Export files for wallet-backup
//!
//! The orchestrator produces snapshot text; this module is where that text
//! lands on disk and where restores find it again.
//!
//! # Example
//!
//! ```rust,ignore
//! use wallet_backup::archive::ExportArchive;
//!
//! let archive = ExportArchive::new(&paths);
//! let path = archive.export_to_archive(&orchestrator.export_all()?)?;
//!
//! // Later
//! let latest = archive.resolve("latest")?;
//! ```

mod manager;

pub use manager::{export_filename, ExportArchive, ExportInfo};
