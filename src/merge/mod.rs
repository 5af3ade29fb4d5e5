//! Section merge policies
//!
//! Maps each section name to the rule used to reconcile an incoming section
//! with the collaborator's current state:
//!
//! - `preferences`: field whitelist (identity fields are never copied)
//! - `addressBook`, `network`, `internalAccounts`: whole replace
//!
//! New sections register their own policy; the keyed-map policy is available
//! for sections whose entries from both sides should coexist.

mod policy;

use std::collections::HashMap;

pub use policy::MergePolicy;

use crate::config::FeatureSet;
use crate::models::preference_whitelist;
use crate::snapshot::SectionName;

/// Section name -> merge policy
#[derive(Debug, Clone, Default)]
pub struct PolicyTable {
    policies: HashMap<String, MergePolicy>,
}

impl PolicyTable {
    /// Create an empty table
    pub fn new() -> Self {
        Self::default()
    }

    /// The policies for the four built-in sections
    pub fn standard(features: &FeatureSet) -> Self {
        let mut table = Self::new();
        table.register(
            SectionName::Preferences.as_str(),
            MergePolicy::field_whitelist(preference_whitelist(features)),
        );
        table.register(SectionName::AddressBook.as_str(), MergePolicy::WholeReplace);
        table.register(SectionName::Network.as_str(), MergePolicy::WholeReplace);
        table.register(SectionName::InternalAccounts.as_str(), MergePolicy::WholeReplace);
        table
    }

    /// Register or replace the policy for a section
    pub fn register(&mut self, section: impl Into<String>, policy: MergePolicy) {
        self.policies.insert(section.into(), policy);
    }

    /// Policy for a section, if one is registered
    pub fn get(&self, section: &str) -> Option<&MergePolicy> {
        self.policies.get(section)
    }

    pub fn contains(&self, section: &str) -> bool {
        self.policies.contains_key(section)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::IDENTITY_FIELDS;

    #[test]
    fn test_standard_table() {
        let table = PolicyTable::standard(&FeatureSet::default());

        assert_eq!(table.get("network"), Some(&MergePolicy::WholeReplace));
        assert_eq!(table.get("addressBook"), Some(&MergePolicy::WholeReplace));
        assert_eq!(table.get("internalAccounts"), Some(&MergePolicy::WholeReplace));
        assert_eq!(table.get("preferences").map(|p| p.kind()), Some("field-whitelist"));
        assert!(table.get("swapsPreferences").is_none());
    }

    #[test]
    fn test_preferences_policy_excludes_identities() {
        let table = PolicyTable::standard(&FeatureSet::all());
        let policy = table.get("preferences").unwrap();

        for field in IDENTITY_FIELDS {
            assert!(!policy.allows_field(field));
        }
        assert!(policy.allows_field("theme"));
        assert!(policy.allows_field("securityAlertsEnabled"));
    }

    #[test]
    fn test_register_new_section() {
        let mut table = PolicyTable::standard(&FeatureSet::default());
        table.register("tokens", MergePolicy::KeyedMap);
        assert_eq!(table.get("tokens"), Some(&MergePolicy::KeyedMap));
    }
}
