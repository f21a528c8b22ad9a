//! API client for the school dashboard REST backend.
//!
//! This module provides the `ApiClient` struct with one fetcher per cached
//! resource. Each fetcher performs a single GET and normalizes the response
//! shape; failures are returned as-is, without retries.

use std::time::Duration;

use anyhow::{Context, Result};
use reqwest::{header, Client};
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::models::{
    Event, GalleryCategory, GalleryImage, GalleryStats, InfrastructureStats, Schedule, User,
};

use super::response::{parse_list, parse_object};
use super::ApiError;

// ============================================================================
// Constants
// ============================================================================

/// Base URL used when nothing is configured (local development backend).
pub const DEFAULT_API_BASE_URL: &str = "http://localhost:5000";

/// HTTP request timeout in seconds.
/// 30s allows for slow API responses while failing fast enough for good UX.
const REQUEST_TIMEOUT_SECS: u64 = 30;

const EVENTS_PATH: &str = "/api/events";
const USERS_PATH: &str = "/api/users";
const SCHEDULES_PATH: &str = "/api/schedules";
const GALLERY_IMAGES_PATH: &str = "/api/gallery/images";
const GALLERY_CATEGORIES_PATH: &str = "/api/gallery/categories";
const GALLERY_STATS_PATH: &str = "/api/gallery/stats";
const INFRASTRUCTURE_STATS_PATH: &str = "/api/infrastructure/stats";

/// API client for the dashboard backend.
/// Clone is cheap - reqwest::Client uses Arc internally for connection pooling.
#[derive(Clone)]
pub struct ApiClient {
    client: Client,
    base_url: String,
    token: Option<String>,
}

impl ApiClient {
    /// Create a new API client for `base_url`
    pub fn new(base_url: &str) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            token: None,
        })
    }

    /// Set the bearer token for authenticated requests
    pub fn set_token(&mut self, token: String) {
        self.token = Some(token);
    }

    /// Create a new ApiClient with the given token, sharing the connection pool.
    pub fn with_token(&self, token: String) -> Self {
        Self {
            client: self.client.clone(), // Cheap clone, shares connection pool
            base_url: self.base_url.clone(),
            token: Some(token),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn auth_headers(&self) -> Result<header::HeaderMap> {
        let mut headers = header::HeaderMap::new();
        if let Some(ref token) = self.token {
            headers.insert(
                header::AUTHORIZATION,
                header::HeaderValue::from_str(&format!("Bearer {}", token))?,
            );
        }
        Ok(headers)
    }

    /// Check if response is successful, returning an error with body if not.
    async fn check_response(response: reqwest::Response) -> Result<reqwest::Response> {
        if response.status().is_success() {
            Ok(response)
        } else {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            Err(ApiError::from_status(status, &body).into())
        }
    }

    async fn get_text(&self, path: &str) -> Result<String> {
        let url = self.url(path);
        let response = self
            .client
            .get(&url)
            .headers(self.auth_headers()?)
            .send()
            .await
            .map_err(ApiError::from)
            .with_context(|| format!("Failed to send GET request to {}", url))?;

        let response = Self::check_response(response).await?;
        let text = response
            .text()
            .await
            .with_context(|| format!("Failed to read response body from {}", url))?;
        debug!(url = %url, bytes = text.len(), "Response received");
        Ok(text)
    }

    async fn get_list<T: DeserializeOwned>(&self, path: &str) -> Result<Vec<T>> {
        let text = self.get_text(path).await?;
        parse_list(&text).with_context(|| format!("Failed to parse list response from {}", path))
    }

    async fn get_object<T: DeserializeOwned>(&self, path: &str) -> Result<Option<T>> {
        let text = self.get_text(path).await?;
        parse_object(&text)
            .with_context(|| format!("Failed to parse object response from {}", path))
    }

    // ===== Data Fetching Methods =====

    /// Fetch all school calendar events
    pub async fn fetch_events(&self) -> Result<Vec<Event>> {
        self.get_list(EVENTS_PATH).await
    }

    /// Fetch every user account, including pending sign-ups
    pub async fn fetch_users(&self) -> Result<Vec<User>> {
        self.get_list(USERS_PATH).await
    }

    /// Fetch the weekly class timetable
    pub async fn fetch_schedules(&self) -> Result<Vec<Schedule>> {
        self.get_list(SCHEDULES_PATH).await
    }

    pub async fn fetch_gallery_images(&self) -> Result<Vec<GalleryImage>> {
        self.get_list(GALLERY_IMAGES_PATH).await
    }

    pub async fn fetch_gallery_categories(&self) -> Result<Vec<GalleryCategory>> {
        self.get_list(GALLERY_CATEGORIES_PATH).await
    }

    /// Fetch facility counts; `None` if the school has not entered any
    pub async fn fetch_infrastructure_stats(&self) -> Result<Option<InfrastructureStats>> {
        self.get_object(INFRASTRUCTURE_STATS_PATH).await
    }

    /// Fetch gallery storage usage
    pub async fn fetch_gallery_stats(&self) -> Result<Option<GalleryStats>> {
        self.get_object(GALLERY_STATS_PATH).await
    }
}
