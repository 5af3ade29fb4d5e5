//! Observable state container
//!
//! Holds one collaborator's state behind a lock and notifies subscribers
//! after every mutation. Subscriptions are scoped: dropping the returned
//! [`Subscription`] removes the listener.

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, RwLock, Weak};

use crate::error::{BackupError, BackupResult};

type Listener<T> = Arc<dyn Fn(&T) + Send + Sync>;

struct Listeners<T> {
    next_id: u64,
    entries: BTreeMap<u64, Listener<T>>,
}

/// State plus change subscribers
pub struct ObservableState<T> {
    state: RwLock<T>,
    listeners: Arc<Mutex<Listeners<T>>>,
}

impl<T: Clone> ObservableState<T> {
    pub fn new(initial: T) -> Self {
        Self {
            state: RwLock::new(initial),
            listeners: Arc::new(Mutex::new(Listeners {
                next_id: 0,
                entries: BTreeMap::new(),
            })),
        }
    }

    /// A copy of the current state
    pub fn get(&self) -> BackupResult<T> {
        self.read(T::clone)
    }

    /// Read the state without copying it
    pub fn read<R>(&self, f: impl FnOnce(&T) -> R) -> BackupResult<R> {
        let state = self
            .state
            .read()
            .map_err(|e| BackupError::Storage(format!("Failed to acquire read lock: {}", e)))?;
        Ok(f(&*state))
    }

    /// Replace the state and notify subscribers
    pub fn set(&self, value: T) -> BackupResult<()> {
        self.update(|state| *state = value)
    }

    /// Mutate the state in place and notify subscribers
    pub fn update<R>(&self, f: impl FnOnce(&mut T) -> R) -> BackupResult<R> {
        let (result, snapshot) = {
            let mut state = self.state.write().map_err(|e| {
                BackupError::Storage(format!("Failed to acquire write lock: {}", e))
            })?;
            let result = f(&mut *state);
            (result, state.clone())
        };

        self.notify(&snapshot);
        Ok(result)
    }

    /// Mutate a copy of the state and commit it only if `f` succeeds
    ///
    /// Subscribers are notified only for committed changes. Once committed,
    /// the call reports success even if subscribers could not be reached.
    pub fn try_update<R>(&self, f: impl FnOnce(&mut T) -> BackupResult<R>) -> BackupResult<R> {
        let (result, snapshot) = {
            let mut state = self.state.write().map_err(|e| {
                BackupError::Storage(format!("Failed to acquire write lock: {}", e))
            })?;
            let mut next = state.clone();
            let result = f(&mut next)?;
            *state = next;
            (result, state.clone())
        };

        self.notify(&snapshot);
        Ok(result)
    }

    /// Register a change listener
    pub fn subscribe<F>(&self, listener: F) -> BackupResult<Subscription<T>>
    where
        F: Fn(&T) + Send + Sync + 'static,
    {
        let mut listeners = self.lock_listeners()?;
        let id = listeners.next_id;
        listeners.next_id += 1;
        listeners.entries.insert(id, Arc::new(listener));

        Ok(Subscription {
            id,
            listeners: Arc::downgrade(&self.listeners),
        })
    }

    /// Number of live subscriptions
    pub fn subscriber_count(&self) -> BackupResult<usize> {
        Ok(self.lock_listeners()?.entries.len())
    }

    fn notify(&self, state: &T) {
        // Listeners run outside the lock so they may subscribe or unsubscribe
        let listeners: Vec<Listener<T>> = match self.lock_listeners() {
            Ok(listeners) => listeners.entries.values().cloned().collect(),
            Err(e) => {
                tracing::warn!(error = %e, "Change committed but subscribers were not notified");
                return;
            }
        };
        for listener in listeners {
            listener(state);
        }
    }

    fn lock_listeners(&self) -> BackupResult<std::sync::MutexGuard<'_, Listeners<T>>> {
        self.listeners
            .lock()
            .map_err(|e| BackupError::Storage(format!("Failed to acquire listener lock: {}", e)))
    }
}

/// Handle to a registered listener; unsubscribes on drop
pub struct Subscription<T> {
    id: u64,
    listeners: Weak<Mutex<Listeners<T>>>,
}

impl<T> Drop for Subscription<T> {
    fn drop(&mut self) {
        if let Some(listeners) = self.listeners.upgrade() {
            if let Ok(mut listeners) = listeners.lock() {
                listeners.entries.remove(&self.id);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn test_get_and_set() {
        let state = ObservableState::new(1u32);
        state.set(5).unwrap();
        assert_eq!(state.get().unwrap(), 5);
    }

    #[test]
    fn test_update_returns_closure_result() {
        let state = ObservableState::new(vec![1, 2]);
        let len = state
            .update(|v| {
                v.push(3);
                v.len()
            })
            .unwrap();
        assert_eq!(len, 3);
    }

    #[test]
    fn test_subscribers_see_new_state() {
        let state = ObservableState::new(0u32);
        let seen = Arc::new(AtomicUsize::new(0));

        let sink = Arc::clone(&seen);
        let _sub = state
            .subscribe(move |value: &u32| sink.store(*value as usize, Ordering::SeqCst))
            .unwrap();

        state.set(42).unwrap();
        assert_eq!(seen.load(Ordering::SeqCst), 42);
    }

    #[test]
    fn test_drop_unsubscribes() {
        let state = ObservableState::new(0u32);
        let calls = Arc::new(AtomicUsize::new(0));

        let sink = Arc::clone(&calls);
        let sub = state
            .subscribe(move |_: &u32| {
                sink.fetch_add(1, Ordering::SeqCst);
            })
            .unwrap();

        state.set(1).unwrap();
        assert_eq!(state.subscriber_count().unwrap(), 1);

        drop(sub);
        state.set(2).unwrap();

        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(state.subscriber_count().unwrap(), 0);
    }

    #[test]
    fn test_failed_try_update_leaves_state_untouched() {
        let state = ObservableState::new(vec![1]);
        let calls = Arc::new(AtomicUsize::new(0));
        let sink = Arc::clone(&calls);
        let _sub = state
            .subscribe(move |_: &Vec<i32>| {
                sink.fetch_add(1, Ordering::SeqCst);
            })
            .unwrap();

        let result: BackupResult<()> = state.try_update(|v| {
            v.push(2);
            Err(BackupError::Storage("disk full".into()))
        });

        assert!(result.is_err());
        assert_eq!(state.get().unwrap(), vec![1]);
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_committed_change_survives_unreachable_subscribers() {
        let state = ObservableState::new(vec![1]);

        let listeners = Arc::clone(&state.listeners);
        let _ = std::thread::spawn(move || {
            let _guard = listeners.lock().unwrap();
            panic!("listener registry poisoned");
        })
        .join();
        assert!(state.subscriber_count().is_err());

        let result = state.try_update(|v| {
            v.push(2);
            Ok(v.len())
        });
        assert_eq!(result.unwrap(), 2);
        assert_eq!(state.get().unwrap(), vec![1, 2]);

        state.set(vec![7]).unwrap();
        assert_eq!(state.get().unwrap(), vec![7]);
    }

    #[test]
    fn test_subscription_outlives_state() {
        let state = ObservableState::new(0u32);
        let sub = state.subscribe(|_: &u32| {}).unwrap();
        drop(state);
        drop(sub);
    }
}
