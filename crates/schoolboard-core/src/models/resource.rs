use serde::Serialize;

use crate::cache::{CacheError, ResourceKey};

use super::{Event, GalleryCategory, GalleryImage, GalleryStats, InfrastructureStats, Schedule, User};

/// Payload stored under a [`ResourceKey`]. Serializes as the bare payload.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Resource {
    Events(Vec<Event>),
    AllUsers(Vec<User>),
    Schedules(Vec<Schedule>),
    GalleryImages(Vec<GalleryImage>),
    GalleryCategories(Vec<GalleryCategory>),
    // `None` when the server has no statistics yet
    InfrastructureStats(Option<InfrastructureStats>),
    GalleryStats(Option<GalleryStats>),
}

macro_rules! into_payload {
    ($($method:ident => $variant:ident: $ty:ty),* $(,)?) => {
        $(
            pub fn $method(self) -> Result<$ty, CacheError> {
                match self {
                    Resource::$variant(payload) => Ok(payload),
                    other => Err(CacheError::KeyMismatch {
                        expected: ResourceKey::$variant.to_string(),
                        found: other.key().to_string(),
                    }),
                }
            }
        )*
    };
}

impl Resource {
    /// The key this payload belongs under.
    pub fn key(&self) -> ResourceKey {
        match self {
            Resource::Events(_) => ResourceKey::Events,
            Resource::AllUsers(_) => ResourceKey::AllUsers,
            Resource::Schedules(_) => ResourceKey::Schedules,
            Resource::GalleryImages(_) => ResourceKey::GalleryImages,
            Resource::GalleryCategories(_) => ResourceKey::GalleryCategories,
            Resource::InfrastructureStats(_) => ResourceKey::InfrastructureStats,
            Resource::GalleryStats(_) => ResourceKey::GalleryStats,
        }
    }

    /// Number of records, or 0/1 for aggregate payloads.
    pub fn len(&self) -> usize {
        match self {
            Resource::Events(v) => v.len(),
            Resource::AllUsers(v) => v.len(),
            Resource::Schedules(v) => v.len(),
            Resource::GalleryImages(v) => v.len(),
            Resource::GalleryCategories(v) => v.len(),
            Resource::InfrastructureStats(s) => usize::from(s.is_some()),
            Resource::GalleryStats(s) => usize::from(s.is_some()),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    into_payload! {
        into_events => Events: Vec<Event>,
        into_users => AllUsers: Vec<User>,
        into_schedules => Schedules: Vec<Schedule>,
        into_gallery_images => GalleryImages: Vec<GalleryImage>,
        into_gallery_categories => GalleryCategories: Vec<GalleryCategory>,
        into_infrastructure_stats => InfrastructureStats: Option<InfrastructureStats>,
        into_gallery_stats => GalleryStats: Option<GalleryStats>,
    }
}
