//! Administrative CLI commands
//!
//! Feature flags in the preferences store are only changed from here.

use clap::Subcommand;

use crate::error::BackupResult;
use crate::storage::{FeatureFlagAdmin, Storage};

/// Debug subcommands
#[derive(Subcommand, Debug)]
pub enum DebugCommands {
    /// Turn a preferences feature flag on or off
    SetFlag {
        /// Flag name
        name: String,

        /// New value (true or false)
        #[arg(action = clap::ArgAction::Set)]
        enabled: bool,
    },

    /// Show all preferences feature flags
    Flags,
}

/// Handle a debug command
pub fn handle_debug_command(storage: &Storage, cmd: DebugCommands) -> BackupResult<()> {
    let admin = FeatureFlagAdmin::new(&storage.preferences);

    match cmd {
        DebugCommands::SetFlag { name, enabled } => {
            admin.set_feature_flag(&name, enabled)?;
            println!("Feature flag '{}' set to {}", name, enabled);
        }

        DebugCommands::Flags => {
            let flags = admin.feature_flags()?;
            if flags.is_empty() {
                println!("No feature flags set.");
                return Ok(());
            }

            for (name, value) in flags {
                println!("  {} = {}", name, value);
            }
        }
    }

    Ok(())
}
