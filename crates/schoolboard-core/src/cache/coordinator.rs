//! Request coalescing on top of [`CacheStore`].
//!
//! A key has at most one producer running at a time. The first caller that finds
//! a key missing or stale records a shared handle to the pending result in the
//! entry, then (with the store lock released) starts the producer on its own task;
//! every later caller clones that handle and awaits the same outcome. The producer
//! always runs to completion, even if every caller stops waiting for it.

use std::fmt;
use std::future::Future;
use std::hash::Hash;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use futures::FutureExt;
use tokio::sync::oneshot;
use tokio::time::Instant;
use tracing::{debug, info};

use super::entry::{EntryStatus, InFlight, SharedFetch};
use super::store::CacheStore;
use super::ttl::TtlPolicy;
use super::CacheError;

enum Lookup<V> {
    Hit(V),
    Pending(SharedFetch<V>),
    Start {
        id: u64,
        done: oneshot::Sender<Result<V, CacheError>>,
        result: SharedFetch<V>,
    },
}

pub struct FetchCoordinator<K, V> {
    store: Arc<CacheStore<K, V>>,
    ttl: TtlPolicy<K>,
}

impl<K, V> FetchCoordinator<K, V>
where
    K: Copy + Eq + Hash + fmt::Display + Send + Sync + 'static,
    V: Clone + Send + Sync + 'static,
{
    pub fn new(keys: impl IntoIterator<Item = K>, ttl: TtlPolicy<K>) -> Self {
        Self {
            store: Arc::new(CacheStore::new(keys)),
            ttl,
        }
    }

    pub fn store(&self) -> &CacheStore<K, V> {
        &self.store
    }

    pub fn ttl_policy(&self) -> &TtlPolicy<K> {
        &self.ttl
    }

    /// Return the cached value for `key` if it is fresh under the configured TTL,
    /// otherwise fetch it with `producer` (or join the fetch already running).
    ///
    /// Must be called from within a Tokio runtime.
    pub async fn get_or_fetch<F, Fut>(&self, key: K, producer: F) -> Result<V, CacheError>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = anyhow::Result<V>> + Send + 'static,
    {
        let ttl = self.ttl.ttl_for(&key);
        self.get_or_fetch_with_ttl(key, producer, ttl).await
    }

    /// Like [`get_or_fetch`](Self::get_or_fetch) with an explicit TTL.
    ///
    /// `producer` is only called when this call starts a new fetch, after the
    /// entry is marked as fetching and outside the store lock, so it may read the
    /// cache. A failure is delivered to every waiter and leaves the stored value
    /// untouched; nothing about the failure is remembered, so the next call tries
    /// again.
    pub async fn get_or_fetch_with_ttl<F, Fut>(
        &self,
        key: K,
        producer: F,
        ttl: Duration,
    ) -> Result<V, CacheError>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = anyhow::Result<V>> + Send + 'static,
    {
        let lookup = self.store.update(key, |entry| {
            if let Some(in_flight) = &entry.in_flight {
                debug!(key = %key, fetch_id = in_flight.id, "Joining in-flight fetch");
                return Lookup::Pending(in_flight.result.clone());
            }
            if entry.is_fresh(ttl, Instant::now()) {
                if let Some(value) = &entry.value {
                    debug!(key = %key, "Cache hit");
                    return Lookup::Hit(value.clone());
                }
            }

            let id = self.store.next_fetch_id();
            let (done, rx) = oneshot::channel::<Result<V, CacheError>>();
            let result = rx
                .map(move |received| {
                    // The sender only goes away without a result if the runtime
                    // dropped the task.
                    received.unwrap_or_else(|_| Err(CacheError::Abandoned(key.to_string())))
                })
                .boxed()
                .shared();
            entry.in_flight = Some(InFlight {
                id,
                result: result.clone(),
            });
            Lookup::Start { id, done, result }
        })?;

        match lookup {
            Lookup::Hit(value) => Ok(value),
            Lookup::Pending(result) => result.await,
            Lookup::Start { id, done, result } => {
                debug!(key = %key, fetch_id = id, "Starting fetch");
                let fetch = panic::catch_unwind(AssertUnwindSafe(producer));
                self.spawn_fetch(key, id, fetch, done);
                result.await
            }
        }
    }

    fn spawn_fetch<Fut>(
        &self,
        key: K,
        id: u64,
        fetch: thread::Result<Fut>,
        done: oneshot::Sender<Result<V, CacheError>>,
    ) where
        Fut: Future<Output = anyhow::Result<V>> + Send + 'static,
    {
        let store = Arc::clone(&self.store);
        tokio::spawn(async move {
            let outcome = match fetch {
                Ok(fetch) => AssertUnwindSafe(fetch).catch_unwind().await,
                Err(payload) => Err(payload),
            };
            let result = match outcome {
                Ok(Ok(value)) => Ok(value),
                Ok(Err(e)) => Err(CacheError::fetch(e)),
                Err(_) => Err(CacheError::fetch(anyhow::anyhow!(
                    "Fetch for {} panicked",
                    key
                ))),
            };
            store.settle(key, id, &result);
            // Nobody may be waiting any more; the value is stored regardless.
            let _ = done.send(result);
        });
    }

    /// Reset each entry so its next read performs a real fetch. A fetch already
    /// running for one of the keys is not cancelled; its result is stored when it
    /// settles.
    pub fn invalidate(&self, keys: impl IntoIterator<Item = K>) {
        for key in keys {
            if self.store.write(key, Default::default()).is_ok() {
                info!(key = %key, "Cache invalidated");
            }
        }
    }

    pub fn invalidate_all(&self) {
        self.store.reset_all();
        info!("All cache entries invalidated");
    }

    /// Replace the cached value with `updater(current)` and mark it fresh.
    /// Does not start or affect any fetch.
    ///
    /// `updater` runs under the store lock and must not call back into the cache.
    pub fn mutate<F>(&self, key: K, updater: F) -> Result<(), CacheError>
    where
        F: FnOnce(Option<V>) -> Option<V>,
    {
        self.try_mutate(key, |current| Ok(updater(current)))
    }

    /// Fallible [`mutate`](Self::mutate). On error the entry is left unchanged.
    pub fn try_mutate<F>(&self, key: K, updater: F) -> Result<(), CacheError>
    where
        F: FnOnce(Option<V>) -> Result<Option<V>, CacheError>,
    {
        self.store.update(key, |entry| -> Result<(), CacheError> {
            let value = updater(entry.value.clone())?;
            entry.value = value;
            entry.fetched_at = Some(Instant::now());
            debug!(key = %key, has_value = entry.value.is_some(), "Cache mutated");
            Ok(())
        })?
    }

    pub fn set(&self, key: K, value: V) -> Result<(), CacheError> {
        self.mutate(key, |_| Some(value))
    }

    pub fn is_loading(&self, key: K) -> bool {
        self.store.read(key).is_fetching()
    }

    pub fn has_data(&self, key: K) -> bool {
        self.store.read(key).has_value()
    }

    pub fn snapshot(&self) -> Vec<(K, EntryStatus)> {
        self.store
            .keys()
            .into_iter()
            .map(|key| (key, self.store.status(key)))
            .collect()
    }

    /// Tear the cache down. Fetches still running finish on their own and their
    /// results are discarded with the store.
    pub fn dispose(self) {
        self.store.reset_all();
        debug!("Cache disposed");
    }
}

impl<K: fmt::Debug, V> fmt::Debug for FetchCoordinator<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FetchCoordinator")
            .field("store", &self.store)
            .field("ttl", &self.ttl)
            .finish()
    }
}
