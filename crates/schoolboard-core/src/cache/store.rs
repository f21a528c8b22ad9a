use std::collections::HashMap;
use std::fmt;
use std::hash::Hash;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};

use tokio::time::Instant;
use tracing::{debug, error, warn};

use super::entry::{CacheEntry, EntryStatus};
use super::CacheError;

/// Mapping from resource key to its cache entry.
///
/// The key set is fixed at construction. Every read-modify-write happens under a
/// single short lock that is never held across an `.await`, so no other operation
/// on the same key can interleave with it.
pub struct CacheStore<K, V> {
    entries: Mutex<HashMap<K, CacheEntry<V>>>,
    next_fetch_id: AtomicU64,
}

impl<K, V> CacheStore<K, V>
where
    K: Copy + Eq + Hash + fmt::Display,
    V: Clone,
{
    /// Create a store with an empty entry for every key.
    pub fn new(keys: impl IntoIterator<Item = K>) -> Self {
        let entries = keys
            .into_iter()
            .map(|key| (key, CacheEntry::empty()))
            .collect();
        Self {
            entries: Mutex::new(entries),
            next_fetch_id: AtomicU64::new(1),
        }
    }

    // The map is only ever mutated by plain assignments, so a panic on another
    // thread cannot leave it half-written.
    fn lock(&self) -> MutexGuard<'_, HashMap<K, CacheEntry<V>>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Current entry for `key`. An unknown key is a configuration error: it is
    /// logged and reported as an empty entry.
    pub fn read(&self, key: K) -> CacheEntry<V> {
        match self.lock().get(&key) {
            Some(entry) => entry.clone(),
            None => {
                error!(key = %key, "Read of a key this store was not created with");
                CacheEntry::empty()
            }
        }
    }

    /// Replace the entry for `key` wholesale.
    pub(crate) fn write(&self, key: K, entry: CacheEntry<V>) -> Result<(), CacheError> {
        self.update(key, |slot| *slot = entry)
    }

    /// Run `f` against the entry for `key` while holding the lock.
    ///
    /// `f` must not call back into the store.
    pub(crate) fn update<R>(
        &self,
        key: K,
        f: impl FnOnce(&mut CacheEntry<V>) -> R,
    ) -> Result<R, CacheError> {
        let mut entries = self.lock();
        match entries.get_mut(&key) {
            Some(entry) => Ok(f(entry)),
            None => {
                error!(key = %key, "Access to a key this store was not created with");
                Err(CacheError::UnknownKey(key.to_string()))
            }
        }
    }

    pub(crate) fn next_fetch_id(&self) -> u64 {
        self.next_fetch_id.fetch_add(1, Ordering::Relaxed)
    }

    /// Record the outcome of fetch `id`.
    ///
    /// A success always stores its value, even if the entry was invalidated while
    /// the fetch ran. The in-flight marker is only cleared if it still belongs to
    /// this fetch.
    pub(crate) fn settle(&self, key: K, id: u64, result: &Result<V, CacheError>) {
        let settled = self.update(key, |entry| {
            if let Ok(value) = result {
                entry.value = Some(value.clone());
                entry.fetched_at = Some(Instant::now());
            }
            let owns_marker = entry.in_flight.as_ref().is_some_and(|f| f.id == id);
            if owns_marker {
                entry.in_flight = None;
            }
            owns_marker
        });

        match (settled, result) {
            (Ok(true), Ok(_)) => debug!(key = %key, fetch_id = id, "Fetch stored"),
            (Ok(false), Ok(_)) => {
                debug!(key = %key, fetch_id = id, "Fetch stored after its entry was reset")
            }
            (Ok(_), Err(e)) => warn!(key = %key, fetch_id = id, error = %e, "Fetch failed"),
            (Err(_), _) => {}
        }
    }

    pub fn contains(&self, key: K) -> bool {
        self.lock().contains_key(&key)
    }

    pub fn keys(&self) -> Vec<K> {
        self.lock().keys().copied().collect()
    }

    pub fn status(&self, key: K) -> EntryStatus {
        self.read(key).status()
    }

    /// Reset every entry to empty. In-flight fetches keep running and store their
    /// results when they settle.
    pub fn reset_all(&self) {
        for entry in self.lock().values_mut() {
            *entry = CacheEntry::empty();
        }
    }
}

impl<K, V> fmt::Debug for CacheStore<K, V>
where
    K: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        let fetching: Vec<&K> = entries
            .iter()
            .filter(|(_, entry)| entry.is_fetching())
            .map(|(key, _)| key)
            .collect();
        f.debug_struct("CacheStore")
            .field("keys", &entries.len())
            .field("fetching", &fetching)
            .finish()
    }
}
