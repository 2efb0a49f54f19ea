//! # Shared keyed registry.
//!
//! One type backs both runtime registries:
//! - the **device registry** maps a serial to its [`DeviceEntry`];
//! - the **tag registry** maps a log tag to its [`Color`].
//!
//! ## Rules
//! - At most one entry per key at any time.
//! - [`Registry::insert_if_absent`] and [`Registry::get_or_insert_with`] are
//!   atomic check-and-insert operations: with M concurrent callers on an
//!   absent key, exactly one inserts and the others observe its value.
//! - Values are cloned out; no lock is ever held across an await point of
//!   the caller.

use std::collections::HashMap;

use tokio::sync::RwLock;
use tokio_util::sync::CancellationToken;

use crate::color::Color;

/// Device registry value: the device's color and its worker's token.
#[derive(Clone, Debug)]
pub struct DeviceEntry {
    /// Color assigned on discovery.
    pub color: Color,
    /// Cancels the device worker only; see [`Supervisor::cancel_device`](crate::Supervisor::cancel_device).
    pub cancel: CancellationToken,
}

/// Concurrent map keyed by string.
#[derive(Debug)]
pub struct Registry<V> {
    entries: RwLock<HashMap<String, V>>,
}

impl<V: Clone> Default for Registry<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V: Clone> Registry<V> {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
        }
    }

    /// Creates a registry pre-populated with `entries`. Later duplicates win.
    pub fn with_entries<I, K>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
    {
        Self {
            entries: RwLock::new(entries.into_iter().map(|(k, v)| (k.into(), v)).collect()),
        }
    }

    /// Returns a clone of the value stored under `key`.
    pub async fn lookup(&self, key: &str) -> Option<V> {
        self.entries.read().await.get(key).cloned()
    }

    /// Returns true if `key` is present.
    pub async fn contains(&self, key: &str) -> bool {
        self.entries.read().await.contains_key(key)
    }

    /// Inserts `value` under `key` unless the key is already present.
    ///
    /// Returns `true` if this call inserted.
    pub async fn insert_if_absent(&self, key: impl Into<String>, value: V) -> bool {
        let mut entries = self.entries.write().await;
        match entries.entry(key.into()) {
            std::collections::hash_map::Entry::Occupied(_) => false,
            std::collections::hash_map::Entry::Vacant(slot) => {
                slot.insert(value);
                true
            }
        }
    }

    /// Returns the value under `key`, inserting `make()` first if absent.
    ///
    /// `make` runs at most once, and only when the key is absent under the
    /// write lock.
    pub async fn get_or_insert_with<F>(&self, key: &str, make: F) -> V
    where
        F: FnOnce() -> V,
    {
        if let Some(v) = self.entries.read().await.get(key) {
            return v.clone();
        }

        let mut entries = self.entries.write().await;
        entries.entry(key.to_string()).or_insert_with(make).clone()
    }

    /// Removes and returns the value under `key`.
    pub async fn remove(&self, key: &str) -> Option<V> {
        self.entries.write().await.remove(key)
    }

    /// Number of entries.
    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    /// Returns true if the registry is empty.
    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }

    /// Returns the sorted list of keys.
    pub async fn keys(&self) -> Vec<String> {
        let entries = self.entries.read().await;
        let mut keys: Vec<String> = entries.keys().cloned().collect();
        keys.sort_unstable();
        keys
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;

    #[tokio::test]
    async fn insert_if_absent_keeps_first_value() {
        let reg = Registry::new();
        assert!(reg.insert_if_absent("abc", 1).await);
        assert!(!reg.insert_if_absent("abc", 2).await);
        assert_eq!(reg.lookup("abc").await, Some(1));
        assert_eq!(reg.len().await, 1);
    }

    #[tokio::test]
    async fn remove_frees_the_key() {
        let reg = Registry::new();
        reg.insert_if_absent("abc", 1).await;
        assert_eq!(reg.remove("abc").await, Some(1));
        assert!(reg.is_empty().await);
        assert!(reg.insert_if_absent("abc", 3).await);
        assert_eq!(reg.remove("missing").await, None);
    }

    #[tokio::test]
    async fn keys_are_sorted() {
        let reg = Registry::with_entries([("b", 0), ("a", 0), ("c", 0)]);
        assert_eq!(reg.keys().await, vec!["a", "b", "c"]);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_inserts_have_one_winner() {
        let reg = Arc::new(Registry::new());
        let mut handles = Vec::new();
        for i in 0..32 {
            let reg = Arc::clone(&reg);
            handles.push(tokio::spawn(
                async move { reg.insert_if_absent("abc", i).await },
            ));
        }

        let mut winners = 0;
        for h in handles {
            if h.await.unwrap() {
                winners += 1;
            }
        }
        assert_eq!(winners, 1);
        assert_eq!(reg.len().await, 1);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn get_or_insert_with_runs_factory_once() {
        let reg = Arc::new(Registry::new());
        let calls = Arc::new(AtomicUsize::new(0));
        let mut handles = Vec::new();
        for _ in 0..32 {
            let reg = Arc::clone(&reg);
            let calls = Arc::clone(&calls);
            handles.push(tokio::spawn(async move {
                reg.get_or_insert_with("Tag", || calls.fetch_add(1, Ordering::SeqCst))
                    .await
            }));
        }

        for h in handles {
            assert_eq!(h.await.unwrap(), 0);
        }
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn seeded_entries_are_returned_as_is() {
        let reg = Registry::with_entries([("ActivityManager", Color::Cyan)]);
        let got = reg
            .get_or_insert_with("ActivityManager", || Color::Red)
            .await;
        assert_eq!(got, Color::Cyan);
    }
}
