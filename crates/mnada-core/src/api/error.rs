use thiserror::Error;

use crate::models::ErrorBody;

/// Shown when a service rejects a request without saying why.
pub const REJECTED_FALLBACK: &str = "Request failed. Please try again.";

/// Shown when no response arrived at all.
pub const TRANSPORT_FALLBACK: &str = "An error occurred. Please try again later.";

#[derive(Error, Debug)]
pub enum ApiError {
    /// The service answered with a non-2xx status.
    #[error("Request rejected ({status}): {}", .message.as_deref().unwrap_or("no message"))]
    Rejected {
        status: u16,
        message: Option<String>,
    },

    #[error("Network error: {0}")]
    NetworkError(#[from] reqwest::Error),

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
            let cut: String = body.chars().take(MAX_ERROR_BODY_LENGTH).collect();
            format!("{}... (truncated, {} total bytes)", cut, body.len())
        }
    }

    /// Build a rejection from a non-2xx response, lifting `{message}` out of the body.
    pub fn from_status(status: reqwest::StatusCode, body: &str) -> Self {
        let message = serde_json::from_str::<ErrorBody>(body)
            .ok()
            .and_then(|parsed| parsed.message)
            .filter(|m| !m.trim().is_empty())
            .map(|m| Self::truncate_body(&m));

        ApiError::Rejected {
            status: status.as_u16(),
            message,
        }
    }

    /// True when the failure happened before any response arrived.
    pub fn is_transport(&self) -> bool {
        matches!(self, ApiError::NetworkError(_))
    }

    /// Message for inline display, using `fallback` when a rejection carries none.
    pub fn user_message(&self, fallback: &str) -> String {
        match self {
            ApiError::Rejected {
                message: Some(message),
                ..
            } => message.clone(),
            ApiError::Rejected { message: None, .. } | ApiError::InvalidResponse(_) => {
                fallback.to_string()
            }
            ApiError::NetworkError(_) => TRANSPORT_FALLBACK.to_string(),
        }
    }
}
