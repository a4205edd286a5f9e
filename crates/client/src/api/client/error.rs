use reqwest::StatusCode;
use serde::Deserialize;

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("HTTP error: {0}")]
    Reqwest(#[from] reqwest::Error),
    #[error("HTTP status {0}: {1}")]
    HttpStatus(StatusCode, String),
    #[error("URL error: {0}")]
    Url(#[from] url::ParseError),
    #[error("Failed to decode response: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("Not logged in")]
    Unauthenticated,
    #[error("Pulse is down for maintenance")]
    Maintenance,
    #[error("{0}")]
    Other(String),
}

/// Error body shape used by the backend
#[derive(Deserialize)]
struct ErrorBody {
    #[serde(alias = "error")]
    message: String,
}

impl ApiError {
    /// Build a status error, preferring the server's `message` field over
    /// the raw body
    pub fn from_response(status: StatusCode, body: &str) -> Self {
        let message = match serde_json::from_str::<ErrorBody>(body) {
            Ok(parsed) => parsed.message,
            Err(_) if body.trim().is_empty() => status
                .canonical_reason()
                .unwrap_or("request failed")
                .to_string(),
            Err(_) => body.trim().to_string(),
        };
        ApiError::HttpStatus(status, message)
    }

    pub fn status(&self) -> Option<StatusCode> {
        match self {
            ApiError::HttpStatus(status, _) => Some(*status),
            ApiError::Reqwest(e) => e.status(),
            _ => None,
        }
    }

    pub fn is_unauthorized(&self) -> bool {
        matches!(self, ApiError::Unauthenticated)
            || self.status() == Some(StatusCode::UNAUTHORIZED)
    }

    /// Server-provided validation message, if any
    pub fn server_message(&self) -> Option<&str> {
        match self {
            ApiError::HttpStatus(status, message) if status.is_client_error() => {
                Some(message.as_str())
            }
            _ => None,
        }
    }
}
