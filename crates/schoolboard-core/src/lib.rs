//! Core library for the schoolboard dashboard.
//!
//! Provides the data-access cache the dashboard reads through, the REST
//! client that feeds it, the record models, and configuration loading.

pub mod api;
pub mod cache;
pub mod config;
pub mod models;
pub mod utils;

pub use api::{ApiClient, ApiError};
pub use cache::{CacheError, ResourceCache, ResourceKey};
pub use config::Config;
pub use models::Resource;
