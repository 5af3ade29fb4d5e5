//! Preferences store
//!
//! A flat JSON object of user preferences. Identity fields live here too but
//! are never exported and never overwritten by a restore.

use std::path::PathBuf;

use serde_json::{json, Map, Value};

use crate::adapter::SectionAdapter;
use crate::config::FeatureSet;
use crate::error::{BackupError, BackupResult};
use crate::models::network::{MAIN_NETWORKS, TEST_NETWORKS};
use crate::models::preferences::is_identity_field;
use crate::models::{preference_whitelist, IdentityMap, TextDirection};
use crate::snapshot::json_type_name;

use super::file_io::read_json;
use super::observable::{ObservableState, Subscription};
use super::persist;

pub type PreferencesState = Map<String, Value>;

/// Repository for user preferences
pub struct PreferencesStore {
    path: Option<PathBuf>,
    features: FeatureSet,
    state: ObservableState<PreferencesState>,
}

impl PreferencesStore {
    /// Open the store at `path`, seeding defaults for a fresh installation
    ///
    /// Fields added since the file was written are filled from defaults.
    pub fn open(
        path: PathBuf,
        features: FeatureSet,
        locale: &str,
        network_chain_ids: &[String],
    ) -> BackupResult<Self> {
        let mut state = Self::default_state(&features, locale, network_chain_ids);
        if let Some(stored) = read_json::<PreferencesState, _>(&path)? {
            state.extend(stored);
        }

        Ok(Self {
            path: Some(path),
            features,
            state: ObservableState::new(state),
        })
    }

    /// A store that never touches disk
    pub fn in_memory(features: FeatureSet, state: PreferencesState) -> Self {
        Self {
            path: None,
            features,
            state: ObservableState::new(state),
        }
    }

    /// Preferences of a fresh installation
    pub fn default_state(
        features: &FeatureSet,
        locale: &str,
        network_chain_ids: &[String],
    ) -> PreferencesState {
        let mut incoming = Map::new();
        for chain_id in MAIN_NETWORKS
            .iter()
            .map(|id| id.to_string())
            .chain(network_chain_ids.iter().cloned())
            .chain(TEST_NETWORKS.iter().map(|id| id.to_string()))
        {
            incoming.insert(chain_id, Value::Bool(true));
        }

        let defaults = json!({
            "useBlockie": false,
            "useNonceField": false,
            "usePhishDetect": true,
            "dismissSeedBackUpReminder": false,
            "disabledRpcMethodPreferences": {"eth_sign": false},
            "useMultiAccountBalanceChecker": true,
            "useTokenDetection": false,
            "useNftDetection": false,
            "use4ByteResolution": true,
            "useCurrencyRateCheck": true,
            "openSeaEnabled": false,
            "advancedGasFee": {},
            "featureFlags": {},
            "incomingTransactionsPreferences": incoming,
            "knownMethodData": {},
            "currentLocale": locale,
            "forgottenPassword": false,
            "preferences": {
                "showFiatInTestnets": false,
                "showTestNetworks": false,
                "useNativeCurrencyAsPrimaryCurrency": true,
                "hideZeroBalanceTokens": false
            },
            "ipfsGateway": "dweb.link",
            "useAddressBarEnsResolution": true,
            "ledgerTransportType": "webhid",
            "snapRegistryList": {},
            "transactionSecurityCheckEnabled": false,
            "theme": "os",
            "isLineaMainnetReleased": false,
            "textDirection": TextDirection::for_locale(locale).as_str(),
            "identities": {},
            "lostIdentities": {},
            "selectedAddress": ""
        });

        let mut state = match defaults {
            Value::Object(map) => map,
            _ => Map::new(),
        };

        if features.security_alerts {
            state.insert("securityAlertsEnabled".into(), Value::Bool(false));
        }
        if features.snap_accounts {
            state.insert("addSnapAccountEnabled".into(), Value::Bool(false));
            state.insert("snapsAddSnapAccountModalDismissed".into(), Value::Bool(false));
        }

        state
    }

    /// Capabilities this store was opened with
    pub fn features(&self) -> FeatureSet {
        self.features
    }

    /// A copy of every preference field
    pub fn state(&self) -> BackupResult<PreferencesState> {
        self.state.get()
    }

    pub fn get_field(&self, field: &str) -> BackupResult<Option<Value>> {
        self.state.read(|state| state.get(field).cloned())
    }

    /// Set a single field
    pub fn set(&self, field: impl Into<String>, value: Value) -> BackupResult<()> {
        let field = field.into();
        self.commit(move |state| {
            state.insert(field, value);
            Ok(())
        })
    }

    /// Overwrite the given fields, leaving all others alone
    pub fn merge(&self, fields: PreferencesState) -> BackupResult<()> {
        self.commit(move |state| {
            state.extend(fields);
            Ok(())
        })
    }

    pub fn identities(&self) -> BackupResult<IdentityMap> {
        self.identity_map("identities")
    }

    pub fn lost_identities(&self) -> BackupResult<IdentityMap> {
        self.identity_map("lostIdentities")
    }

    pub fn selected_address(&self) -> BackupResult<String> {
        self.state.read(|state| {
            state
                .get("selectedAddress")
                .and_then(Value::as_str)
                .unwrap_or_default()
                .to_string()
        })
    }

    /// Change the UI locale and the text direction that follows from it
    pub fn set_current_locale(&self, locale: &str) -> BackupResult<TextDirection> {
        let direction = TextDirection::for_locale(locale);
        let locale = locale.to_string();
        self.commit(move |state| {
            state.insert("currentLocale".into(), Value::String(locale));
            state.insert(
                "textDirection".into(),
                Value::String(direction.as_str().to_string()),
            );
            Ok(())
        })?;
        Ok(direction)
    }

    /// Get notified after every change
    pub fn subscribe<F>(&self, listener: F) -> BackupResult<Subscription<PreferencesState>>
    where
        F: Fn(&PreferencesState) + Send + Sync + 'static,
    {
        self.state.subscribe(listener)
    }

    fn identity_map(&self, field: &str) -> BackupResult<IdentityMap> {
        let value = self.get_field(field)?.unwrap_or(Value::Null);
        if value.is_null() {
            return Ok(IdentityMap::new());
        }
        serde_json::from_value(value)
            .map_err(|e| BackupError::Storage(format!("Invalid {} in preferences: {}", field, e)))
    }

    fn commit(
        &self,
        f: impl FnOnce(&mut PreferencesState) -> BackupResult<()>,
    ) -> BackupResult<()> {
        self.state.try_update(|state| {
            f(state)?;
            persist(self.path.as_deref(), state)
        })
    }
}

impl SectionAdapter for PreferencesStore {
    fn snapshot(&self) -> BackupResult<Value> {
        let whitelist = preference_whitelist(&self.features);
        self.state.read(|state| {
            let section: Map<String, Value> = state
                .iter()
                .filter(|(field, _)| whitelist.contains(&field.as_str()))
                .map(|(field, value)| (field.clone(), value.clone()))
                .collect();
            Value::Object(section)
        })
    }

    fn apply_backup(&self, section: Value) -> BackupResult<()> {
        let fields = match section {
            Value::Object(map) => map,
            other => {
                return Err(BackupError::section_apply(
                    "preferences",
                    format!("expected an object, found {}", json_type_name(&other)),
                ))
            }
        };

        let fields: PreferencesState = fields
            .into_iter()
            .filter(|(field, _)| {
                let keep = !is_identity_field(field);
                if !keep {
                    tracing::debug!(field = %field, "Keeping local identity field");
                }
                keep
            })
            .collect();

        self.merge(fields)
    }
}

/// The only way to change `featureFlags` outside a restore
pub struct FeatureFlagAdmin<'a> {
    store: &'a PreferencesStore,
}

impl<'a> FeatureFlagAdmin<'a> {
    pub fn new(store: &'a PreferencesStore) -> Self {
        Self { store }
    }

    /// Turn a single flag on or off
    pub fn set_feature_flag(&self, name: &str, enabled: bool) -> BackupResult<()> {
        let mut flags = self.feature_flags()?;
        flags.insert(name.to_string(), Value::Bool(enabled));
        tracing::info!(flag = name, enabled, "Feature flag updated");
        self.store.set("featureFlags", Value::Object(flags))
    }

    pub fn feature_flags(&self) -> BackupResult<Map<String, Value>> {
        Ok(self
            .store
            .get_field("featureFlags")?
            .and_then(|value| value.as_object().cloned())
            .unwrap_or_default())
    }
}
