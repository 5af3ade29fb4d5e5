//! Network configuration store
//!
//! Snapshot form is `{"networkConfigurations": {<id>: configuration}}`.

use std::path::PathBuf;

use serde_json::{Map, Value};

use crate::adapter::SectionAdapter;
use crate::error::{BackupError, BackupResult};
use crate::models::{NetworkConfiguration, NetworkConfigurations};
use crate::snapshot::json_type_name;

use super::file_io::read_json;
use super::observable::{ObservableState, Subscription};
use super::persist;

const SECTION: &str = "network";
const CONFIGURATIONS_KEY: &str = "networkConfigurations";

/// Repository for custom RPC networks
pub struct NetworkStore {
    path: Option<PathBuf>,
    state: ObservableState<NetworkConfigurations>,
}

impl NetworkStore {
    pub fn open(path: PathBuf) -> BackupResult<Self> {
        let configurations = read_json(&path)?.unwrap_or_default();
        Ok(Self {
            path: Some(path),
            state: ObservableState::new(configurations),
        })
    }

    pub fn in_memory(configurations: NetworkConfigurations) -> Self {
        Self {
            path: None,
            state: ObservableState::new(configurations),
        }
    }

    pub fn configurations(&self) -> BackupResult<NetworkConfigurations> {
        self.state.get()
    }

    pub fn get(&self, id: &str) -> BackupResult<Option<NetworkConfiguration>> {
        self.state.read(|configs| configs.get(id).cloned())
    }

    /// Distinct chain ids of all configured networks, sorted
    pub fn chain_ids(&self) -> BackupResult<Vec<String>> {
        self.state.read(|configs| {
            let mut ids: Vec<String> = configs.values().map(|c| c.chain_id.clone()).collect();
            ids.sort();
            ids.dedup();
            ids
        })
    }

    /// Add or replace a configuration
    pub fn upsert(&self, id: impl Into<String>, config: NetworkConfiguration) -> BackupResult<()> {
        config
            .validate()
            .map_err(|e| BackupError::Validation(e.to_string()))?;

        let id = id.into();
        self.commit(move |configs| {
            configs.insert(id, config);
            Ok(())
        })
    }

    /// Remove a configuration
    pub fn remove(&self, id: &str) -> BackupResult<NetworkConfiguration> {
        let id = id.to_string();
        self.state.try_update(|configs| {
            let removed = configs.remove(&id).ok_or_else(|| BackupError::NotFound {
                entity_type: "Network",
                identifier: id.clone(),
            })?;
            persist(self.path.as_deref(), configs)?;
            Ok(removed)
        })
    }

    pub fn subscribe<F>(&self, listener: F) -> BackupResult<Subscription<NetworkConfigurations>>
    where
        F: Fn(&NetworkConfigurations) + Send + Sync + 'static,
    {
        self.state.subscribe(listener)
    }

    fn commit(
        &self,
        f: impl FnOnce(&mut NetworkConfigurations) -> BackupResult<()>,
    ) -> BackupResult<()> {
        self.state.try_update(|configs| {
            f(configs)?;
            persist(self.path.as_deref(), configs)
        })
    }
}

/// Pull the configuration map out of either accepted section shape
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

    if map.len() == 1 && map.get(CONFIGURATIONS_KEY).map_or(false, Value::is_object) {
        return Ok(map.remove(CONFIGURATIONS_KEY).unwrap_or(Value::Object(Map::new())));
    }

    // Bare form: every value is a configuration object carrying a chain id
    let looks_flat = map
        .values()
        .all(|value| value.get("chainId").map_or(false, Value::is_string));
    if !looks_flat {
        return Err(BackupError::section_apply(
            SECTION,
            format!("unrecognized section shape: expected {:?}", CONFIGURATIONS_KEY),
        ));
    }

    Ok(Value::Object(map))
}

impl SectionAdapter for NetworkStore {
    fn snapshot(&self) -> BackupResult<Value> {
        let configurations = serde_json::to_value(self.configurations()?)?;
        let mut section = Map::new();
        section.insert(CONFIGURATIONS_KEY.to_string(), configurations);
        Ok(Value::Object(section))
    }

    fn apply_backup(&self, section: Value) -> BackupResult<()> {
        let configurations: NetworkConfigurations = serde_json::from_value(unwrap_section(section)?)
            .map_err(|e| BackupError::section_apply(SECTION, e.to_string()))?;

        for (id, config) in &configurations {
            config
                .validate()
                .map_err(|e| BackupError::section_apply(SECTION, format!("{}: {}", id, e)))?;
        }

        self.commit(move |current| {
            *current = configurations;
            Ok(())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn section() -> Value {
        json!({
            "networkConfigurations": {
                "network-configuration-id-1": {
                    "chainId": "0x539",
                    "nickname": "Localhost 8545",
                    "rpcPrefs": {},
                    "rpcUrl": "http://localhost:8545",
                    "ticker": "ETH"
                },
                "network-configuration-id-2": {
                    "chainId": "0x38",
                    "nickname": "Binance Smart Chain Mainnet",
                    "rpcPrefs": {"blockExplorerUrl": "https://bscscan.com"},
                    "rpcUrl": "https://bsc-dataseed1.binance.org",
                    "ticker": "BNB"
                }
            }
        })
    }

    #[test]
    fn test_round_trip_through_adapter() {
        let store = NetworkStore::in_memory(NetworkConfigurations::new());
        store.apply_backup(section()).unwrap();

        assert_eq!(store.snapshot().unwrap(), section());
        assert_eq!(store.chain_ids().unwrap(), vec!["0x38", "0x539"]);
    }

    #[test]
    fn test_sparse_configuration_snapshot_verbatim() {
        let section = json!({
            "networkConfigurations": {
                "n1": {"chainId": "0x1", "nickname": null, "rpcUrl": "http://x"}
            }
        });
        let store = NetworkStore::in_memory(NetworkConfigurations::new());
        store.apply_backup(section.clone()).unwrap();

        let snapshot = store.snapshot().unwrap();
        assert_eq!(snapshot.to_string(), section.to_string());
        assert!(snapshot["networkConfigurations"]["n1"].get("ticker").is_none());
    }

    #[test]
    fn test_apply_flat_shape() {
        let store = NetworkStore::in_memory(NetworkConfigurations::new());
        store
            .apply_backup(section()["networkConfigurations"].clone())
            .unwrap();
        assert_eq!(store.configurations().unwrap().len(), 2);
    }

    #[test]
    fn test_apply_replaces_wholesale() {
        let store = NetworkStore::in_memory(NetworkConfigurations::new());
        store
            .upsert("mine", NetworkConfiguration::new("0x89", "https://polygon-rpc.com", "MATIC"))
            .unwrap();

        store.apply_backup(section()).unwrap();
        assert!(store.get("mine").unwrap().is_none());
    }

    #[test]
    fn test_apply_rejects_unknown_shape() {
        let store = NetworkStore::in_memory(NetworkConfigurations::new());
        let err = store.apply_backup(json!({"providers": [1, 2]})).unwrap_err();
        assert!(matches!(err, BackupError::SectionApply { .. }));
    }

    #[test]
    fn test_apply_rejects_invalid_configuration() {
        let store = NetworkStore::in_memory(NetworkConfigurations::new());
        let bad = json!({"networkConfigurations": {"x": {"chainId": "1337", "rpcUrl": "http://a"}}});
        assert!(store.apply_backup(bad).is_err());
        assert!(store.configurations().unwrap().is_empty());
    }

    #[test]
    fn test_remove() {
        let store = NetworkStore::in_memory(NetworkConfigurations::new());
        store.apply_backup(section()).unwrap();

        let removed = store.remove("network-configuration-id-1").unwrap();
        assert_eq!(removed.chain_id, "0x539");
        assert!(store.remove("network-configuration-id-1").unwrap_err().is_not_found());
    }
}
