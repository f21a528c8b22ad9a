//! In-memory data-access cache for dashboard resources.
//!
//! This module memoizes server responses per [`ResourceKey`], runs at most one
//! fetch per key at a time (concurrent callers share its result), and treats
//! values as stale after a TTL (5 minutes by default). Writes elsewhere in the
//! application keep it consistent through explicit invalidation or optimistic
//! in-place updates.
//!
//! - [`CacheStore`]: key to [`CacheEntry`] mapping
//! - [`FetchCoordinator`]: freshness checks and fetch de-duplication
//! - [`views`]: derived subsets of a cached collection
//! - [`ResourceCache`]: the named getters built on top
//!
//! Nothing is persisted; failed fetches are neither retried nor remembered.

pub mod coordinator;
pub mod entry;
pub mod error;
pub mod key;
pub mod resources;
pub mod store;
pub mod ttl;
pub mod views;

pub use coordinator::FetchCoordinator;
pub use entry::{CacheEntry, EntryStatus};
pub use error::CacheError;
pub use key::ResourceKey;
pub use resources::ResourceCache;
pub use store::CacheStore;
pub use ttl::{TtlPolicy, DEFAULT_TTL};
pub use views::{derive_from, DerivedView};
