//! Identity model
//!
//! Address-keyed records of accounts this installation has seen. They live
//! only in the preferences store and never travel inside a snapshot.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// A locally-held record of a known account
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Identity {
    pub address: String,

    /// Unix milliseconds of the last time this account was selected
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_selected: Option<u64>,

    #[serde(default)]
    pub name: String,
}

impl Identity {
    pub fn new(address: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            address: address.into(),
            last_selected: None,
            name: name.into(),
        }
    }
}

/// Identities keyed by address
pub type IdentityMap = BTreeMap<String, Identity>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identity_json_shape() {
        let mut identity = Identity::new("0xfd59bbe569376e3d3e4430297c3c69ea93f77435", "Ledger 1");
        identity.last_selected = Some(1655379648197);

        let json = serde_json::to_value(&identity).unwrap();
        assert_eq!(json["lastSelected"], 1655379648197u64);
        assert_eq!(json["name"], "Ledger 1");
    }

    #[test]
    fn test_last_selected_optional() {
        let identity: Identity = serde_json::from_str(r#"{"address": "0x01", "name": "a"}"#).unwrap();
        assert_eq!(identity.last_selected, None);
    }
}
