//! Data models for school dashboard entities.
//!
//! This module contains the records served by the REST backend:
//!
//! - `User` and `Role`: accounts, including pending self sign-ups
//! - `Event`: school calendar events
//! - `Schedule`: weekly class timetable slots
//! - Gallery types: `GalleryImage`, `GalleryCategory`, `GalleryStats`
//! - `InfrastructureStats`: facility counts
//! - `Resource`: the payload stored under each cache key

pub mod event;
pub mod gallery;
pub mod infrastructure;
pub mod resource;
pub mod schedule;
pub mod user;

pub use event::Event;
pub use gallery::{GalleryCategory, GalleryImage, GalleryStats};
pub use infrastructure::InfrastructureStats;
pub use resource::Resource;
pub use schedule::{Schedule, Weekday};
pub use user::{Role, User};
