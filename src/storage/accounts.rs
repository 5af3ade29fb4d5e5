//! Account registry store
//!
//! Holds internal accounts keyed by id and the selected-account pointer.
//! The pointer is kept valid: a restore that leaves it dangling is clamped
//! to an existing account.

use std::path::PathBuf;

use serde_json::Value;

use crate::adapter::SectionAdapter;
use crate::error::{BackupError, BackupResult};
use crate::models::{InternalAccount, InternalAccounts};

use super::file_io::read_json;
use super::observable::{ObservableState, Subscription};
use super::persist;

const SECTION: &str = "internalAccounts";

/// Repository for internal accounts
pub struct AccountsStore {
    path: Option<PathBuf>,
    state: ObservableState<InternalAccounts>,
}

impl AccountsStore {
    pub fn open(path: PathBuf) -> BackupResult<Self> {
        let accounts = read_json(&path)?.unwrap_or_default();
        Ok(Self {
            path: Some(path),
            state: ObservableState::new(accounts),
        })
    }

    pub fn in_memory(accounts: InternalAccounts) -> Self {
        Self {
            path: None,
            state: ObservableState::new(accounts),
        }
    }

    pub fn accounts(&self) -> BackupResult<InternalAccounts> {
        self.state.get()
    }

    pub fn selected(&self) -> BackupResult<Option<InternalAccount>> {
        self.state.read(|accounts| accounts.selected().cloned())
    }

    pub fn count(&self) -> BackupResult<usize> {
        self.state.read(|accounts| accounts.accounts.len())
    }

    /// Add an account; the first account added becomes selected
    pub fn add_account(&self, account: InternalAccount) -> BackupResult<()> {
        self.commit(move |state| {
            if state.accounts.contains_key(&account.id) {
                return Err(BackupError::Validation(format!(
                    "Account {} already exists",
                    account.id
                )));
            }
            if state.accounts.is_empty() {
                state.selected_account = account.id.clone();
            }
            state.accounts.insert(account.id.clone(), account);
            Ok(())
        })
    }

    /// Point the selection at an existing account
    pub fn set_selected(&self, id: &str) -> BackupResult<()> {
        let id = id.to_string();
        self.commit(move |state| {
            if !state.accounts.contains_key(&id) {
                return Err(BackupError::NotFound {
                    entity_type: "Account",
                    identifier: id,
                });
            }
            state.selected_account = id;
            Ok(())
        })
    }

    pub fn subscribe<F>(&self, listener: F) -> BackupResult<Subscription<InternalAccounts>>
    where
        F: Fn(&InternalAccounts) + Send + Sync + 'static,
    {
        self.state.subscribe(listener)
    }

    fn commit(
        &self,
        f: impl FnOnce(&mut InternalAccounts) -> BackupResult<()>,
    ) -> BackupResult<()> {
        self.state.try_update(|accounts| {
            f(accounts)?;
            persist(self.path.as_deref(), accounts)
        })
    }
}

impl SectionAdapter for AccountsStore {
    fn snapshot(&self) -> BackupResult<Value> {
        Ok(serde_json::to_value(self.accounts()?)?)
    }

    fn apply_backup(&self, section: Value) -> BackupResult<()> {
        let mut incoming: InternalAccounts = serde_json::from_value(section)
            .map_err(|e| BackupError::section_apply(SECTION, e.to_string()))?;

        if let Some(previous) = incoming.clamp_selection() {
            tracing::warn!(
                dangling = %previous,
                selected = %incoming.selected_account,
                "Restored account selection did not match any account; reselected"
            );
        }

        self.commit(move |state| {
            *state = incoming;
            Ok(())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const ACCOUNT_ID: &str = "fcbcdca4-cc47-4bc8-b455-b14421e9277e";

    fn section(selected: &str) -> Value {
        let account = InternalAccount::new_eoa(
            ACCOUNT_ID,
            "0x129af01f4b770b30615f049790e1e206ebaa7b10",
            "Account 1",
        );
        json!({
            "accounts": {ACCOUNT_ID: account},
            "selectedAccount": selected
        })
    }

    #[test]
    fn test_apply_and_snapshot() {
        let store = AccountsStore::in_memory(InternalAccounts::default());
        store.apply_backup(section(ACCOUNT_ID)).unwrap();

        assert_eq!(store.snapshot().unwrap(), section(ACCOUNT_ID));
        assert_eq!(store.selected().unwrap().unwrap().name(), "Account 1");
    }

    #[test]
    fn test_sparse_accounts_snapshot_verbatim() {
        let raw = r#"{"accounts":{"a1":{"address":"0xabc","id":"a1","metadata":{"lastSelected":null,"name":"A"},"options":{},"methods":[],"type":"eip155:eoa"},"a2":{"address":"0xdef","id":"a2","metadata":{"name":"B"},"type":"eip155:eoa"}},"selectedAccount":"a1"}"#;
        let section: Value = serde_json::from_str(raw).unwrap();

        let store = AccountsStore::in_memory(InternalAccounts::default());
        store.apply_backup(section.clone()).unwrap();

        let snapshot = store.snapshot().unwrap();
        assert_eq!(snapshot, section);
        assert_eq!(snapshot.to_string(), section.to_string());
        assert_eq!(store.selected().unwrap().unwrap().last_selected(), None);
    }

    #[test]
    fn test_apply_clamps_dangling_selection() {
        let store = AccountsStore::in_memory(InternalAccounts::default());
        store.apply_backup(section("ghost")).unwrap();

        assert_eq!(store.accounts().unwrap().selected_account, ACCOUNT_ID);
    }

    #[test]
    fn test_apply_rejects_bad_shape() {
        let store = AccountsStore::in_memory(InternalAccounts::default());
        let err = store.apply_backup(json!({"accounts": "nope"})).unwrap_err();
        assert!(matches!(err, BackupError::SectionApply { .. }));
    }

    #[test]
    fn test_add_account_selects_first() {
        let store = AccountsStore::in_memory(InternalAccounts::default());
        store.add_account(InternalAccount::new_eoa("a", "0x01", "One")).unwrap();
        store.add_account(InternalAccount::new_eoa("b", "0x02", "Two")).unwrap();

        assert_eq!(store.accounts().unwrap().selected_account, "a");
        assert!(store.add_account(InternalAccount::new_eoa("a", "0x01", "One")).is_err());
    }

    #[test]
    fn test_set_selected() {
        let store = AccountsStore::in_memory(InternalAccounts::default());
        store.add_account(InternalAccount::new_eoa("a", "0x01", "One")).unwrap();
        store.add_account(InternalAccount::new_eoa("b", "0x02", "Two")).unwrap();

        store.set_selected("b").unwrap();
        assert_eq!(store.selected().unwrap().unwrap().id, "b");
        assert!(store.set_selected("zzz").unwrap_err().is_not_found());
    }
}
