//! CLI command handlers
//!
//! This module contains the implementation of CLI commands,
//! bridging the clap argument parsing with the restore orchestrator.

pub mod debug;
pub mod export;
pub mod history;
pub mod restore;

pub use debug::{handle_debug_command, DebugCommands};
pub use export::{handle_export_command, handle_list_command, ExportArgs};
pub use history::handle_history_command;
pub use restore::{handle_inspect_command, handle_restore_command, InspectArgs, RestoreArgs};
