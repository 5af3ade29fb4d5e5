//! Configuration module for wallet-backup
//!
//! This module provides configuration management including:
//! - XDG-compliant path resolution
//! - User settings persistence
//! - Runtime capability switches

pub mod features;
pub mod paths;
pub mod settings;

pub use features::FeatureSet;
pub use paths::WalletPaths;
pub use settings::Settings;
