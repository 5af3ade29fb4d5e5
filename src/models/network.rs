//! Network configuration model
//!
//! User-added RPC endpoints keyed by an opaque configuration id.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

pub const MAINNET: &str = "0x1";
pub const LINEA_MAINNET: &str = "0xe708";
pub const GOERLI: &str = "0x5";
pub const SEPOLIA: &str = "0xaa36a7";
pub const LINEA_GOERLI: &str = "0xe704";

/// Built-in production networks
pub const MAIN_NETWORKS: [&str; 2] = [MAINNET, LINEA_MAINNET];

/// Built-in test networks
pub const TEST_NETWORKS: [&str; 3] = [GOERLI, SEPOLIA, LINEA_GOERLI];

/// A custom RPC network
///
/// `chainId` and `rpcUrl` are typed; `nickname`, `ticker`, `rpcPrefs` and
/// anything else stay in `extra` exactly as read, nulls included.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NetworkConfiguration {
    pub chain_id: String,

    pub rpc_url: String,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl NetworkConfiguration {
    pub fn new(
        chain_id: impl Into<String>,
        rpc_url: impl Into<String>,
        ticker: impl Into<String>,
    ) -> Self {
        let mut extra = Map::new();
        extra.insert("ticker".into(), Value::String(ticker.into()));
        extra.insert("rpcPrefs".into(), Value::Object(Map::new()));
        Self {
            chain_id: chain_id.into(),
            rpc_url: rpc_url.into(),
            extra,
        }
    }

    pub fn with_nickname(mut self, nickname: impl Into<String>) -> Self {
        self.extra.insert("nickname".into(), Value::String(nickname.into()));
        self
    }

    pub fn nickname(&self) -> Option<&str> {
        self.extra.get("nickname").and_then(Value::as_str)
    }

    pub fn ticker(&self) -> Option<&str> {
        self.extra.get("ticker").and_then(Value::as_str)
    }

    /// Block explorer configured for this network, if any
    pub fn block_explorer_url(&self) -> Option<&str> {
        self.extra
            .get("rpcPrefs")
            .and_then(|prefs| prefs.get("blockExplorerUrl"))
            .and_then(Value::as_str)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), NetworkValidationError> {
        if !is_hex_chain_id(&self.chain_id) {
            return Err(NetworkValidationError::InvalidChainId(self.chain_id.clone()));
        }
        if self.rpc_url.trim().is_empty() {
            return Err(NetworkValidationError::EmptyRpcUrl);
        }
        Ok(())
    }
}

impl fmt::Display for NetworkConfiguration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.nickname() {
            Some(name) => write!(f, "{} ({})", name, self.chain_id),
            None => write!(f, "{} ({})", self.rpc_url, self.chain_id),
        }
    }
}

/// Configuration id -> configuration
pub type NetworkConfigurations = BTreeMap<String, NetworkConfiguration>;

/// Validation errors for network configurations
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NetworkValidationError {
    InvalidChainId(String),
    EmptyRpcUrl,
}

impl fmt::Display for NetworkValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidChainId(id) => write!(f, "Invalid chain id: {}", id),
            Self::EmptyRpcUrl => write!(f, "Network configuration has no RPC URL"),
        }
    }
}

impl std::error::Error for NetworkValidationError {}

/// Check that a chain id is a `0x`-prefixed hex quantity
pub fn is_hex_chain_id(chain_id: &str) -> bool {
    match chain_id.strip_prefix("0x") {
        Some(digits) => !digits.is_empty() && digits.chars().all(|c| c.is_ascii_hexdigit()),
        None => false,
    }
}
