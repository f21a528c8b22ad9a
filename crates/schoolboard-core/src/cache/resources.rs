//! Named getters the dashboard calls, one per resource, plus the derived user
//! views and the invalidation/optimistic-update hooks used after writes.

use std::future::Future;

use anyhow::Result;
use tracing::debug;

use crate::api::ApiClient;
use crate::config::Config;
use crate::models::{
    Event, GalleryCategory, GalleryImage, GalleryStats, InfrastructureStats, Resource, Schedule,
    User,
};

use super::entry::EntryStatus;
use super::views::{derive_from, DerivedView, PENDING_USERS, STUDENTS, TEACHERS};
use super::{CacheError, FetchCoordinator, ResourceKey, TtlPolicy};

/// Resource fetcher for `key`: one request, mapped into the key's payload.
fn fetch_resource(
    client: ApiClient,
    key: ResourceKey,
) -> impl Future<Output = Result<Resource>> + Send + 'static {
    async move {
        match key {
            ResourceKey::Events => client.fetch_events().await.map(Resource::Events),
            ResourceKey::AllUsers => client.fetch_users().await.map(Resource::AllUsers),
            ResourceKey::Schedules => client.fetch_schedules().await.map(Resource::Schedules),
            ResourceKey::GalleryImages => {
                client.fetch_gallery_images().await.map(Resource::GalleryImages)
            }
            ResourceKey::GalleryCategories => client
                .fetch_gallery_categories()
                .await
                .map(Resource::GalleryCategories),
            ResourceKey::InfrastructureStats => client
                .fetch_infrastructure_stats()
                .await
                .map(Resource::InfrastructureStats),
            ResourceKey::GalleryStats => {
                client.fetch_gallery_stats().await.map(Resource::GalleryStats)
            }
        }
    }
}

/// The dashboard's data-access cache.
///
/// Create one per session and share it by reference; independent instances do
/// not share state.
pub struct ResourceCache {
    client: ApiClient,
    coordinator: FetchCoordinator<ResourceKey, Resource>,
}

impl ResourceCache {
    pub fn new(client: ApiClient, ttl: TtlPolicy<ResourceKey>) -> Self {
        Self {
            client,
            coordinator: FetchCoordinator::new(ResourceKey::ALL, ttl),
        }
    }

    pub fn from_config(config: &Config) -> Result<Self> {
        let mut client = ApiClient::new(&config.api_base_url)?;
        if let Some(token) = &config.access_token {
            client.set_token(token.clone());
        }
        Ok(Self::new(client, config.ttl_policy()))
    }

    pub fn client(&self) -> &ApiClient {
        &self.client
    }

    pub fn coordinator(&self) -> &FetchCoordinator<ResourceKey, Resource> {
        &self.coordinator
    }

    /// Resolve any key to its payload.
    pub async fn get(&self, key: ResourceKey) -> Result<Resource, CacheError> {
        let client = self.client.clone();
        self.coordinator
            .get_or_fetch(key, move || fetch_resource(client, key))
            .await
    }

    // ===== Getters =====

    pub async fn get_events(&self) -> Result<Vec<Event>, CacheError> {
        self.get(ResourceKey::Events).await?.into_events()
    }

    pub async fn get_all_users(&self) -> Result<Vec<User>, CacheError> {
        self.get(ResourceKey::AllUsers).await?.into_users()
    }

    pub async fn get_schedules(&self) -> Result<Vec<Schedule>, CacheError> {
        self.get(ResourceKey::Schedules).await?.into_schedules()
    }

    pub async fn get_gallery_images(&self) -> Result<Vec<GalleryImage>, CacheError> {
        self.get(ResourceKey::GalleryImages).await?.into_gallery_images()
    }

    pub async fn get_gallery_categories(&self) -> Result<Vec<GalleryCategory>, CacheError> {
        self.get(ResourceKey::GalleryCategories)
            .await?
            .into_gallery_categories()
    }

    pub async fn get_infrastructure_stats(
        &self,
    ) -> Result<Option<InfrastructureStats>, CacheError> {
        self.get(ResourceKey::InfrastructureStats)
            .await?
            .into_infrastructure_stats()
    }

    pub async fn get_gallery_stats(&self) -> Result<Option<GalleryStats>, CacheError> {
        self.get(ResourceKey::GalleryStats).await?.into_gallery_stats()
    }

    // ===== Derived views =====

    /// Resolve `view.base` through the cache and filter it. A view whose base
    /// is not a user collection fails with [`CacheError::KeyMismatch`].
    pub async fn get_view(&self, view: &DerivedView<User>) -> Result<Vec<User>, CacheError> {
        let base = async { self.get(view.base).await?.into_users() };
        derive_from(base, |user| view.matches(user)).await
    }

    pub async fn get_students(&self) -> Result<Vec<User>, CacheError> {
        self.get_view(&STUDENTS).await
    }

    pub async fn get_teachers(&self) -> Result<Vec<User>, CacheError> {
        self.get_view(&TEACHERS).await
    }

    pub async fn get_pending_users(&self) -> Result<Vec<User>, CacheError> {
        self.get_view(&PENDING_USERS).await
    }

    // ===== Invalidation / mutation =====

    /// Force the next read of each key to go to the server.
    pub fn invalidate_cache(&self, keys: impl IntoIterator<Item = ResourceKey>) {
        self.coordinator.invalidate(keys);
    }

    pub fn invalidate_all(&self) {
        self.coordinator.invalidate_all();
    }

    /// Replace the payload under `key` with `updater(current)`.
    ///
    /// Rejects a payload that belongs to a different key; the entry is left as it was.
    pub fn update_cache<F>(&self, key: ResourceKey, updater: F) -> Result<(), CacheError>
    where
        F: FnOnce(Option<Resource>) -> Option<Resource>,
    {
        self.coordinator.try_mutate(key, |current| {
            let next = updater(current);
            if let Some(resource) = &next {
                if resource.key() != key {
                    return Err(CacheError::KeyMismatch {
                        expected: key.to_string(),
                        found: resource.key().to_string(),
                    });
                }
            }
            Ok(next)
        })
    }

    /// Store `resource` under its own key as if it had just been fetched.
    pub fn set_cache(&self, resource: Resource) -> Result<(), CacheError> {
        self.coordinator.set(resource.key(), resource)
    }

    fn update_collection<T>(
        &self,
        key: ResourceKey,
        unwrap: fn(Resource) -> Result<Vec<T>, CacheError>,
        wrap: fn(Vec<T>) -> Resource,
        updater: impl FnOnce(Option<Vec<T>>) -> Option<Vec<T>>,
    ) -> Result<(), CacheError> {
        self.update_cache(key, |current| {
            // Entries only ever hold their own key's payload, so `unwrap` cannot fail here.
            let items = current.and_then(|resource| unwrap(resource).ok());
            updater(items).map(wrap)
        })
    }

    pub fn update_events(
        &self,
        updater: impl FnOnce(Option<Vec<Event>>) -> Option<Vec<Event>>,
    ) -> Result<(), CacheError> {
        self.update_collection(ResourceKey::Events, Resource::into_events, Resource::Events, updater)
    }

    pub fn update_users(
        &self,
        updater: impl FnOnce(Option<Vec<User>>) -> Option<Vec<User>>,
    ) -> Result<(), CacheError> {
        self.update_collection(ResourceKey::AllUsers, Resource::into_users, Resource::AllUsers, updater)
    }

    pub fn update_schedules(
        &self,
        updater: impl FnOnce(Option<Vec<Schedule>>) -> Option<Vec<Schedule>>,
    ) -> Result<(), CacheError> {
        self.update_collection(
            ResourceKey::Schedules,
            Resource::into_schedules,
            Resource::Schedules,
            updater,
        )
    }

    pub fn update_gallery_images(
        &self,
        updater: impl FnOnce(Option<Vec<GalleryImage>>) -> Option<Vec<GalleryImage>>,
    ) -> Result<(), CacheError> {
        self.update_collection(
            ResourceKey::GalleryImages,
            Resource::into_gallery_images,
            Resource::GalleryImages,
            updater,
        )
    }

    pub fn update_gallery_categories(
        &self,
        updater: impl FnOnce(Option<Vec<GalleryCategory>>) -> Option<Vec<GalleryCategory>>,
    ) -> Result<(), CacheError> {
        self.update_collection(
            ResourceKey::GalleryCategories,
            Resource::into_gallery_categories,
            Resource::GalleryCategories,
            updater,
        )
    }

    // ===== Optimistic updates after writes =====

    /// Mark a user approved in the cached roster. Returns whether the user was cached.
    pub fn approve_user(&self, user_id: &str) -> Result<bool, CacheError> {
        let mut found = false;
        self.update_users(|users| {
            users.map(|mut users| {
                if let Some(user) = users.iter_mut().find(|u| u.id == user_id) {
                    user.approved = true;
                    found = true;
                }
                users
            })
        })?;
        debug!(user_id, found, "Optimistic approve");
        Ok(found)
    }

    /// Drop a user from the cached roster (rejected sign-up or deleted account).
    pub fn remove_user(&self, user_id: &str) -> Result<bool, CacheError> {
        let mut found = false;
        self.update_users(|users| {
            users.map(|mut users| {
                let before = users.len();
                users.retain(|u| u.id != user_id);
                found = users.len() != before;
                users
            })
        })?;
        Ok(found)
    }

    /// Insert or replace an event by id. An empty cache stays empty so the next
    /// read fetches the full list.
    pub fn upsert_event(&self, event: Event) -> Result<(), CacheError> {
        self.update_events(|events| {
            events.map(|mut events| {
                match events.iter_mut().find(|e| e.id == event.id) {
                    Some(existing) => *existing = event,
                    None => events.push(event),
                }
                events
            })
        })
    }

    pub fn remove_event(&self, event_id: i64) -> Result<(), CacheError> {
        self.update_events(|events| {
            events.map(|mut events| {
                events.retain(|e| e.id != event_id);
                events
            })
        })
    }

    pub fn remove_gallery_image(&self, image_id: i64) -> Result<(), CacheError> {
        self.update_gallery_images(|images| {
            images.map(|mut images| {
                images.retain(|i| i.id != image_id);
                images
            })
        })
    }

    // ===== Introspection =====

    pub fn is_loading(&self, key: ResourceKey) -> bool {
        self.coordinator.is_loading(key)
    }

    pub fn has_data(&self, key: ResourceKey) -> bool {
        self.coordinator.has_data(key)
    }

    /// Status of every key, in [`ResourceKey::ALL`] order.
    pub fn status(&self) -> Vec<(ResourceKey, EntryStatus)> {
        ResourceKey::ALL
            .into_iter()
            .map(|key| (key, self.coordinator.store().status(key)))
            .collect()
    }

    pub fn dispose(self) {
        self.coordinator.dispose();
    }
}
