use std::collections::HashMap;
use std::hash::Hash;
use std::time::Duration;

/// Default time a fetched value is served before it is refetched.
pub const DEFAULT_TTL: Duration = Duration::from_secs(5 * 60);

/// How long values stay fresh, with optional per-key overrides.
#[derive(Debug, Clone)]
pub struct TtlPolicy<K> {
    default: Duration,
    overrides: HashMap<K, Duration>,
}

impl<K: Eq + Hash> TtlPolicy<K> {
    pub fn new(default: Duration) -> Self {
        Self {
            default,
            overrides: HashMap::new(),
        }
    }

    pub fn with_override(mut self, key: K, ttl: Duration) -> Self {
        self.overrides.insert(key, ttl);
        self
    }

    pub fn ttl_for(&self, key: &K) -> Duration {
        self.overrides.get(key).copied().unwrap_or(self.default)
    }

    pub fn default_ttl(&self) -> Duration {
        self.default
    }
}

impl<K: Eq + Hash> Default for TtlPolicy<K> {
    fn default() -> Self {
        Self::new(DEFAULT_TTL)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_five_minutes() {
        let policy: TtlPolicy<&str> = TtlPolicy::default();
        assert_eq!(policy.ttl_for(&"events"), Duration::from_secs(300));
    }

    #[test]
    fn test_override_applies_to_one_key() {
        let policy = TtlPolicy::default().with_override("galleryStats", Duration::from_secs(30));
        assert_eq!(policy.ttl_for(&"galleryStats"), Duration::from_secs(30));
        assert_eq!(policy.ttl_for(&"events"), DEFAULT_TTL);
    }
}
