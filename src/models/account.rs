//! Internal account model
//!
//! Accounts known to the account registry, keyed by account id, plus the
//! pointer to the currently selected account.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};

/// Account type string for externally owned EVM accounts
pub const EOA_ACCOUNT_TYPE: &str = "eip155:eoa";

/// Signing methods supported by an externally owned EVM account
pub const EOA_METHODS: [&str; 6] = [
    "personal_sign",
    "eth_sign",
    "eth_signTransaction",
    "eth_signTypedData_v1",
    "eth_signTypedData_v3",
    "eth_signTypedData_v4",
];

/// Keyring type of accounts derived from the seed phrase
pub const HD_KEYRING: &str = "HD Key Tree";

/// An account held by the account registry
///
/// Only the fields needed to index and select accounts are typed. The
/// metadata object and every other field are kept exactly as they were
/// read, including explicit nulls.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InternalAccount {
    pub address: String,

    pub id: String,

    /// Display and bookkeeping metadata such as `name`, `keyring` and
    /// `lastSelected`
    pub metadata: Map<String, Value>,

    #[serde(rename = "type")]
    pub account_type: String,

    /// `options`, `methods` and anything newer wallets add
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl InternalAccount {
    /// Create an externally owned account backed by an HD keyring
    pub fn new_eoa(id: impl Into<String>, address: impl Into<String>, name: impl Into<String>) -> Self {
        let mut metadata = Map::new();
        metadata.insert("name".into(), Value::String(name.into()));
        metadata.insert("keyring".into(), json!({ "type": HD_KEYRING }));

        let mut extra = Map::new();
        extra.insert("options".into(), Value::Object(Map::new()));
        extra.insert(
            "methods".into(),
            Value::Array(EOA_METHODS.iter().map(|m| Value::from(*m)).collect()),
        );

        Self {
            address: address.into(),
            id: id.into(),
            metadata,
            account_type: EOA_ACCOUNT_TYPE.to_string(),
            extra,
        }
    }

    pub fn name(&self) -> &str {
        self.metadata.get("name").and_then(Value::as_str).unwrap_or_default()
    }

    /// Unix milliseconds of the last selection, if recorded
    pub fn last_selected(&self) -> Option<u64> {
        self.metadata.get("lastSelected").and_then(Value::as_u64)
    }

    pub fn set_last_selected(&mut self, millis: u64) {
        self.metadata.insert("lastSelected".into(), Value::from(millis));
    }

    /// Keyring type from `metadata.keyring.type`
    pub fn keyring_type(&self) -> Option<&str> {
        self.metadata
            .get("keyring")
            .and_then(|keyring| keyring.get("type"))
            .and_then(Value::as_str)
    }

    /// Signing methods the account supports; empty when not recorded
    pub fn methods(&self) -> Vec<&str> {
        self.extra
            .get("methods")
            .and_then(Value::as_array)
            .map(|methods| methods.iter().filter_map(Value::as_str).collect())
            .unwrap_or_default()
    }
}

impl fmt::Display for InternalAccount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name(), self.address)
    }
}

/// The account registry's backup-relevant state
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InternalAccounts {
    #[serde(default)]
    pub accounts: BTreeMap<String, InternalAccount>,

    #[serde(default)]
    pub selected_account: String,
}

impl InternalAccounts {
    /// The selected account, if the pointer resolves
    pub fn selected(&self) -> Option<&InternalAccount> {
        self.accounts.get(&self.selected_account)
    }

    /// Whether the selected pointer references an existing account
    ///
    /// An empty registry with an empty pointer counts as consistent.
    pub fn has_valid_selection(&self) -> bool {
        if self.accounts.is_empty() {
            return self.selected_account.is_empty();
        }
        self.accounts.contains_key(&self.selected_account)
    }

    /// Point the selection at a valid account if it is dangling
    ///
    /// Picks the most recently selected account, falling back to the
    /// smallest id. Returns the previous pointer when it was changed.
    pub fn clamp_selection(&mut self) -> Option<String> {
        if self.has_valid_selection() {
            return None;
        }

        let fallback = self
            .accounts
            .values()
            .max_by(|a, b| {
                a.last_selected()
                    .cmp(&b.last_selected())
                    // BTreeMap iterates ids ascending; prefer the smaller id on ties
                    .then_with(|| b.id.cmp(&a.id))
            })
            .map(|account| account.id.clone())
            .unwrap_or_default();

        Some(std::mem::replace(&mut self.selected_account, fallback))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn registry(ids: &[(&str, Option<u64>)], selected: &str) -> InternalAccounts {
        let mut accounts = BTreeMap::new();
        for (id, last_selected) in ids {
            let mut account = InternalAccount::new_eoa(*id, format!("0x{}", id), *id);
            if let Some(millis) = last_selected {
                account.set_last_selected(*millis);
            }
            accounts.insert(id.to_string(), account);
        }
        InternalAccounts {
            accounts,
            selected_account: selected.to_string(),
        }
    }

    #[test]
    fn test_account_json_shape() {
        let account = InternalAccount::new_eoa(
            "fcbcdca4-cc47-4bc8-b455-b14421e9277e",
            "0x129af01f4b770b30615f049790e1e206ebaa7b10",
            "Account 1",
        );
        let json = serde_json::to_value(&account).unwrap();

        assert_eq!(json["type"], "eip155:eoa");
        assert_eq!(json["metadata"]["keyring"]["type"], "HD Key Tree");
        assert_eq!(json["methods"].as_array().unwrap().len(), 6);
        assert_eq!(account.keyring_type(), Some(HD_KEYRING));
        assert_eq!(account.methods().len(), 6);
    }

    #[test]
    fn test_sparse_account_kept_verbatim() {
        let raw = json!({
            "address": "0xabc",
            "id": "a1",
            "metadata": {"name": "A", "lastSelected": null},
            "options": null,
            "type": "eip155:eoa"
        });
        let account: InternalAccount = serde_json::from_value(raw.clone()).unwrap();

        assert_eq!(account.name(), "A");
        assert_eq!(account.last_selected(), None);
        assert_eq!(account.keyring_type(), None);
        assert!(account.methods().is_empty());
        assert_eq!(serde_json::to_value(&account).unwrap(), raw);
    }

    #[test]
    fn test_valid_selection() {
        assert!(registry(&[("a", None)], "a").has_valid_selection());
        assert!(!registry(&[("a", None)], "b").has_valid_selection());
        assert!(registry(&[], "").has_valid_selection());
        assert!(!registry(&[], "ghost").has_valid_selection());
    }

    #[test]
    fn test_clamp_prefers_most_recent() {
        let mut accounts = registry(&[("a", Some(10)), ("b", Some(30)), ("c", None)], "ghost");

        let previous = accounts.clamp_selection();
        assert_eq!(previous.as_deref(), Some("ghost"));
        assert_eq!(accounts.selected_account, "b");
    }

    #[test]
    fn test_clamp_falls_back_to_smallest_id() {
        let mut accounts = registry(&[("b", None), ("a", None)], "ghost");
        accounts.clamp_selection();
        assert_eq!(accounts.selected_account, "a");
    }

    #[test]
    fn test_clamp_empty_registry() {
        let mut accounts = registry(&[], "ghost");
        accounts.clamp_selection();
        assert_eq!(accounts.selected_account, "");
    }

    #[test]
    fn test_clamp_noop_when_valid() {
        let mut accounts = registry(&[("a", None)], "a");
        assert!(accounts.clamp_selection().is_none());
    }
}
