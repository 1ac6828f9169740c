//! Errors surfaced by the backend client

use thiserror::Error;

use super::retry::Retryable;

#[derive(Debug, Error)]
pub enum ApiError {
    /// Connection refused, DNS failure, timeout, or a body that could not be read
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// Backend answered with a status outside 200-299
    #[error("API Error: {}", status_line(*status, status_text))]
    Status { status: u16, status_text: String },

    /// Body was not valid JSON for the expected shape
    #[error("invalid response body: {0}")]
    Parse(#[from] serde_json::Error),
}

impl ApiError {
    pub fn from_status(status: reqwest::StatusCode) -> Self {
        ApiError::Status {
            status: status.as_u16(),
            status_text: status.canonical_reason().unwrap_or("").to_string(),
        }
    }

    /// HTTP status code, when the failure was an HTTP-level one
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Status { status, .. } => Some(*status),
            ApiError::Transport(e) => e.status().map(|s| s.as_u16()),
            ApiError::Parse(_) => None,
        }
    }
}

fn status_line(status: u16, status_text: &str) -> String {
    if status_text.is_empty() {
        status.to_string()
    } else {
        format!("{} {}", status, status_text)
    }
}

impl Retryable for ApiError {
    fn is_retryable(&self) -> bool {
        match self {
            // Builder, decode and redirect errors fail the same way every time
            ApiError::Transport(e) => e.is_timeout() || e.is_connect() || e.is_request() || e.is_body(),
            ApiError::Status { status, .. } => *status >= 500 || *status == 408 || *status == 429,
            ApiError::Parse(_) => false,
        }
    }
}
