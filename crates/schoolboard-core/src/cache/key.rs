use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::CacheError;

/// Identifies one cached resource category.
///
/// The set is closed: every store is initialized with all of these keys, so a
/// lookup can never hit an entry that was not created up front.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ResourceKey {
    Events,
    AllUsers,
    Schedules,
    GalleryImages,
    GalleryCategories,
    InfrastructureStats,
    GalleryStats,
}

impl ResourceKey {
    pub const ALL: [ResourceKey; 7] = [
        ResourceKey::Events,
        ResourceKey::AllUsers,
        ResourceKey::Schedules,
        ResourceKey::GalleryImages,
        ResourceKey::GalleryCategories,
        ResourceKey::InfrastructureStats,
        ResourceKey::GalleryStats,
    ];

    /// Name used in config files, logs and the command line.
    pub fn as_str(&self) -> &'static str {
        match self {
            ResourceKey::Events => "events",
            ResourceKey::AllUsers => "allUsers",
            ResourceKey::Schedules => "schedules",
            ResourceKey::GalleryImages => "galleryImages",
            ResourceKey::GalleryCategories => "galleryCategories",
            ResourceKey::InfrastructureStats => "infrastructureStats",
            ResourceKey::GalleryStats => "galleryStats",
        }
    }

    /// Whether the payload is a collection (as opposed to a single aggregate object).
    pub fn is_collection(&self) -> bool {
        !matches!(
            self,
            ResourceKey::InfrastructureStats | ResourceKey::GalleryStats
        )
    }
}

impl fmt::Display for ResourceKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ResourceKey {
    type Err = CacheError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ResourceKey::ALL
            .into_iter()
            .find(|key| key.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| CacheError::UnknownKey(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_names_round_trip() {
        for key in ResourceKey::ALL {
            assert_eq!(key.as_str().parse::<ResourceKey>().unwrap(), key);
        }
    }

    #[test]
    fn test_key_parse_ignores_case() {
        assert_eq!("ALLUSERS".parse::<ResourceKey>().unwrap(), ResourceKey::AllUsers);
    }

    #[test]
    fn test_unknown_key_is_rejected() {
        let err = "students".parse::<ResourceKey>().unwrap_err();
        assert!(matches!(err, CacheError::UnknownKey(ref name) if name == "students"));
    }

    #[test]
    fn test_key_serde_uses_camel_case() {
        let json = serde_json::to_string(&ResourceKey::GalleryCategories).unwrap();
        assert_eq!(json, "\"galleryCategories\"");
        let key: ResourceKey = serde_json::from_str("\"infrastructureStats\"").unwrap();
        assert_eq!(key, ResourceKey::InfrastructureStats);
    }

    #[test]
    fn test_collection_keys() {
        assert!(ResourceKey::Events.is_collection());
        assert!(!ResourceKey::GalleryStats.is_collection());
    }
}
