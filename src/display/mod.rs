//! Display formatting for terminal output
//!
//! Turns restore reports, inspections and export listings into tables.

pub mod archive;
pub mod restore;

pub use archive::{format_age, format_export_list, format_size};
pub use restore::{format_inspect_report, format_restore_report};
