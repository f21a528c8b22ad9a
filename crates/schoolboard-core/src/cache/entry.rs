use std::fmt;
use std::time::Duration;

use futures::future::{BoxFuture, Shared};
use serde::Serialize;
use tokio::time::Instant;

use super::CacheError;

/// Handle every concurrent caller of one fetch awaits.
pub(crate) type SharedFetch<V> = Shared<BoxFuture<'static, Result<V, CacheError>>>;

/// An outstanding fetch for a key. The id tells a settling fetch whether the
/// entry is still waiting on it or has since moved on (invalidated and refetched).
#[derive(Clone)]
pub(crate) struct InFlight<V> {
    pub(crate) id: u64,
    pub(crate) result: SharedFetch<V>,
}

/// Stored state for one resource key.
#[derive(Clone)]
pub struct CacheEntry<V> {
    /// Last successfully fetched (or explicitly mutated) payload.
    pub value: Option<V>,
    /// When `value` was last fetched or mutated. Unset until the first success.
    pub fetched_at: Option<Instant>,
    pub(crate) in_flight: Option<InFlight<V>>,
}

impl<V> CacheEntry<V> {
    pub fn empty() -> Self {
        Self {
            value: None,
            fetched_at: None,
            in_flight: None,
        }
    }

    pub fn is_fetching(&self) -> bool {
        self.in_flight.is_some()
    }

    pub fn has_value(&self) -> bool {
        self.value.is_some()
    }

    /// A value exists and was stored less than `ttl` before `now`.
    pub fn is_fresh(&self, ttl: Duration, now: Instant) -> bool {
        self.value.is_some()
            && self
                .fetched_at
                .is_some_and(|at| now.saturating_duration_since(at) < ttl)
    }

    pub fn age(&self) -> Option<Duration> {
        self.fetched_at.map(|at| at.elapsed())
    }

    pub fn age_display(&self) -> String {
        match self.age() {
            Some(age) => format_age(age),
            None => "never".to_string(),
        }
    }

    pub fn status(&self) -> EntryStatus {
        EntryStatus {
            is_fetching: self.is_fetching(),
            has_data: self.has_value(),
            age_secs: self.age().map(|age| age.as_secs()),
        }
    }
}

impl<V> Default for CacheEntry<V> {
    fn default() -> Self {
        Self::empty()
    }
}

impl<V: fmt::Debug> fmt::Debug for CacheEntry<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CacheEntry")
            .field("value", &self.value)
            .field("fetched_at", &self.fetched_at)
            .field("is_fetching", &self.is_fetching())
            .finish()
    }
}

/// Point-in-time summary of an entry, without the payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct EntryStatus {
    pub is_fetching: bool,
    pub has_data: bool,
    pub age_secs: Option<u64>,
}

impl EntryStatus {
    pub fn age_display(&self) -> String {
        match self.age_secs {
            Some(secs) => format_age(Duration::from_secs(secs)),
            None => "never".to_string(),
        }
    }
}

fn format_age(age: Duration) -> String {
    let minutes = age.as_secs() / 60;
    if minutes < 1 {
        "just now".to_string()
    } else if minutes < 60 {
        format!("{}m ago", minutes)
    } else if minutes < 1440 {
        let hours = minutes / 60;
        if minutes % 60 >= 30 {
            // Round up: 1h 30m+ becomes 2h
            format!("{}h ago", hours + 1)
        } else {
            format!("{}h ago", hours)
        }
    } else {
        let days = minutes / 1440;
        if (minutes % 1440) / 60 >= 12 {
            format!("{}d ago", days + 1)
        } else {
            format!("{}d ago", days)
        }
    }
}
