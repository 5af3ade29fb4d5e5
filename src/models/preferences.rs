//! Preference field catalogue
//!
//! The preferences store is a flat JSON object. This module names which of
//! its fields belong in a backup and which are local runtime state.

use serde::{Deserialize, Serialize};

use crate::config::FeatureSet;

/// Fields that describe this installation's identities; never exported,
/// never overwritten by a restore
pub const IDENTITY_FIELDS: [&str; 3] = ["identities", "lostIdentities", "selectedAddress"];

/// Preference fields carried by a backup regardless of enabled features
pub const BACKUP_FIELDS: &[&str] = &[
    "useBlockie",
    "useNonceField",
    "usePhishDetect",
    "dismissSeedBackUpReminder",
    "disabledRpcMethodPreferences",
    "useMultiAccountBalanceChecker",
    "useTokenDetection",
    "useNftDetection",
    "use4ByteResolution",
    "useCurrencyRateCheck",
    "openSeaEnabled",
    "advancedGasFee",
    "featureFlags",
    "incomingTransactionsPreferences",
    "knownMethodData",
    "currentLocale",
    "forgottenPassword",
    "preferences",
    "ipfsGateway",
    "useAddressBarEnsResolution",
    "ledgerTransportType",
    "snapRegistryList",
    "transactionSecurityCheckEnabled",
    "theme",
    "isLineaMainnetReleased",
    "textDirection",
    // written by older exporters
    "useCollectibleDetection",
    "customNetworkListEnabled",
];

/// The full backup whitelist for an installation's enabled features
pub fn preference_whitelist(features: &FeatureSet) -> Vec<&'static str> {
    let mut fields = BACKUP_FIELDS.to_vec();
    fields.extend(features.gated_preference_fields());
    fields
}

/// Whether a field holds identity or runtime-only state
pub fn is_identity_field(field: &str) -> bool {
    IDENTITY_FIELDS.contains(&field)
}

/// Text direction implied by the UI locale
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum TextDirection {
    #[default]
    Auto,
    Rtl,
}

impl TextDirection {
    const RTL_LOCALES: [&'static str; 5] = ["ar", "dv", "fa", "he", "ku"];

    pub fn for_locale(locale: &str) -> Self {
        if Self::RTL_LOCALES.contains(&locale) {
            Self::Rtl
        } else {
            Self::Auto
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Auto => "auto",
            Self::Rtl => "rtl",
        }
    }
}
