//! Runtime capability switches
//!
//! Some preference fields only exist when an optional wallet capability is
//! switched on. The set of enabled capabilities is read once at startup and
//! passed to whatever needs it.

use serde::{Deserialize, Serialize};

/// Optional capabilities enabled for this installation
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeatureSet {
    /// Transaction security alerts
    #[serde(default)]
    pub security_alerts: bool,

    /// Accounts managed by third-party keyring snaps
    #[serde(default)]
    pub snap_accounts: bool,
}

impl FeatureSet {
    /// Every optional capability switched on
    pub fn all() -> Self {
        Self {
            security_alerts: true,
            snap_accounts: true,
        }
    }

    /// Preference fields that only exist when their capability is enabled
    pub fn gated_preference_fields(&self) -> Vec<&'static str> {
        let mut fields = Vec::new();
        if self.security_alerts {
            fields.push("securityAlertsEnabled");
        }
        if self.snap_accounts {
            fields.push("addSnapAccountEnabled");
            fields.push("snapsAddSnapAccountModalDismissed");
        }
        fields
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_enables_nothing() {
        assert!(FeatureSet::default().gated_preference_fields().is_empty());
    }

    #[test]
    fn test_snap_accounts_fields() {
        let features = FeatureSet {
            snap_accounts: true,
            ..FeatureSet::default()
        };
        let fields = features.gated_preference_fields();
        assert!(fields.contains(&"addSnapAccountEnabled"));
        assert!(fields.contains(&"snapsAddSnapAccountModalDismissed"));
        assert!(!fields.contains(&"securityAlertsEnabled"));
    }

    #[test]
    fn test_all() {
        assert_eq!(FeatureSet::all().gated_preference_fields().len(), 3);
    }
}
