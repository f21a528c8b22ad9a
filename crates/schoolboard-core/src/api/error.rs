use thiserror::Error;

use crate::utils::truncate_string;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Access denied: {0}")]
    AccessDenied(String),

    #[error("Unauthorized - token may be expired")]
    Unauthorized,

    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Rate limited - please wait before retrying")]
    RateLimited,

    #[error("Server error: {0}")]
    ServerError(String),

    #[error("Network error")]
    NetworkError(#[from] reqwest::Error),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

/// Maximum length for error response bodies in error messages
const MAX_ERROR_BODY_LENGTH: usize = 500;

impl ApiError {
    /// Human-readable message from an error body.
    ///
    /// The backend answers failures with `{"error": "..."}` or `{"message": "..."}`;
    /// anything else is used verbatim, truncated to avoid logging excessive data.
    fn body_message(body: &str) -> String {
        if let Ok(serde_json::Value::Object(map)) = serde_json::from_str(body) {
            for field in ["error", "message"] {
                if let Some(serde_json::Value::String(msg)) = map.get(field) {
                    return truncate_string(msg, MAX_ERROR_BODY_LENGTH);
                }
            }
        }
        truncate_string(body.trim(), MAX_ERROR_BODY_LENGTH)
    }

    pub fn from_status(status: reqwest::StatusCode, body: &str) -> Self {
        let message = Self::body_message(body);
        match status.as_u16() {
            401 => ApiError::Unauthorized,
            403 => ApiError::AccessDenied(message),
            404 => ApiError::NotFound(message),
            429 => ApiError::RateLimited,
            500..=599 => ApiError::ServerError(message),
            _ => ApiError::InvalidResponse(format!("Status {}: {}", status, message)),
        }
    }
}
