//! Derived views: named subsets of a cached collection.
//!
//! A view has no cache entry of its own. Every call resolves the base key
//! through the coordinator and filters the result, so it is exactly as fresh
//! (or stale) as the base collection and never causes extra requests.

use std::fmt;
use std::future::Future;

use crate::models::User;

use super::{CacheError, ResourceKey};

/// Await the base collection, then keep the items matching `predicate`.
pub async fn derive_from<T, Fut, P>(base: Fut, predicate: P) -> Result<Vec<T>, CacheError>
where
    Fut: Future<Output = Result<Vec<T>, CacheError>>,
    P: Fn(&T) -> bool,
{
    let items = base.await?;
    Ok(items.into_iter().filter(|item| predicate(item)).collect())
}

/// A named, pure filter over the collection stored under `base`.
pub struct DerivedView<T> {
    pub name: &'static str,
    pub base: ResourceKey,
    predicate: fn(&T) -> bool,
}

impl<T> DerivedView<T> {
    pub const fn new(name: &'static str, base: ResourceKey, predicate: fn(&T) -> bool) -> Self {
        Self {
            name,
            base,
            predicate,
        }
    }

    pub fn matches(&self, item: &T) -> bool {
        (self.predicate)(item)
    }

    pub fn apply(&self, items: Vec<T>) -> Vec<T> {
        items.into_iter().filter(|item| self.matches(item)).collect()
    }
}

impl<T> fmt::Debug for DerivedView<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DerivedView")
            .field("name", &self.name)
            .field("base", &self.base)
            .finish()
    }
}

pub const STUDENTS: DerivedView<User> =
    DerivedView::new("students", ResourceKey::AllUsers, User::is_student);

pub const TEACHERS: DerivedView<User> =
    DerivedView::new("teachers", ResourceKey::AllUsers, User::is_teacher);

pub const PENDING_USERS: DerivedView<User> =
    DerivedView::new("pendingUsers", ResourceKey::AllUsers, User::is_pending);

pub static USER_VIEWS: [DerivedView<User>; 3] = [STUDENTS, TEACHERS, PENDING_USERS];

/// Look up a built-in user view by name (case-insensitive).
pub fn user_view(name: &str) -> Option<&'static DerivedView<User>> {
    USER_VIEWS
        .iter()
        .find(|view| view.name.eq_ignore_ascii_case(name))
}
