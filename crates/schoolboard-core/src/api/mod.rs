//! REST API client module for the school dashboard backend.
//!
//! This module provides the `ApiClient` used by the cache's resource
//! fetchers. Authentication, validation and uploads live on the server;
//! the client only reads.

pub mod client;
pub mod error;
pub mod response;

pub use client::{ApiClient, DEFAULT_API_BASE_URL};
pub use error::ApiError;
