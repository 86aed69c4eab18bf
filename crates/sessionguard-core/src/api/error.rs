use thiserror::Error;

use crate::models::ErrorResponse;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Unauthorized - session is missing or expired")]
    Unauthorized,

    #[error("Access denied: {0}")]
    AccessDenied(String),

    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Validation failed: {message}")]
    Validation {
        message: String,
        details: Vec<String>,
    },

    #[error("Rate limited - please wait before retrying")]
    RateLimited,

    #[error("Server error: {0}")]
    ServerError(String),

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

/// Maximum length for error response bodies in error messages
const MAX_ERROR_BODY_LENGTH: usize = 500;

impl ApiError {
    /// Truncate a response body to avoid logging excessive data
    fn truncate_body(body: &str) -> String {
        if body.len() <= MAX_ERROR_BODY_LENGTH {
            body.to_string()
        } else {
            let mut end = MAX_ERROR_BODY_LENGTH;
            while !body.is_char_boundary(end) {
                end -= 1;
            }
            format!("{}... (truncated, {} total bytes)", &body[..end], body.len())
        }
    }

    /// Prefer the backend's own message when the body is an `ErrorResponse`
    fn describe(body: &str) -> String {
        serde_json::from_str::<ErrorResponse>(body)
            .ok()
            .and_then(|e| e.summary().map(str::to_string))
            .unwrap_or_else(|| Self::truncate_body(body))
    }

    pub fn from_status(status: reqwest::StatusCode, body: &str) -> Self {
        match status.as_u16() {
            400 => {
                let parsed = serde_json::from_str::<ErrorResponse>(body).unwrap_or_default();
                ApiError::Validation {
                    message: parsed
                        .summary()
                        .map(str::to_string)
                        .unwrap_or_else(|| Self::truncate_body(body)),
                    details: parsed.details,
                }
            }
            401 => ApiError::Unauthorized,
            403 => ApiError::AccessDenied(Self::describe(body)),
            404 => ApiError::NotFound(Self::describe(body)),
            429 => ApiError::RateLimited,
            500..=599 => ApiError::ServerError(Self::describe(body)),
            _ => ApiError::InvalidResponse(format!("Status {}: {}", status, Self::truncate_body(body))),
        }
    }

    /// Client-side validation failure, reported the same way the backend would
    pub fn validation(details: Vec<String>) -> Self {
        ApiError::Validation {
            message: "Field validation failed".to_string(),
            details,
        }
    }
}
