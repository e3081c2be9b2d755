//! Custom error types for the backend client

use reqwest::StatusCode;
use thiserror::Error;

/// Custom error type for backend calls
#[derive(Error, Debug)]
pub enum ApiError {
    /// The request did not complete within the configured timeout
    #[error("Request {endpoint} timed out")]
    Timeout { endpoint: String },

    /// The backend could not be reached
    #[error("Network error on {endpoint}: {source}")]
    Network {
        endpoint: String,
        #[source]
        source: reqwest::Error,
    },

    /// The backend rejected the session token
    #[error("Unauthorized")]
    Unauthorized,

    /// The user may not perform this action
    #[error("Forbidden: {endpoint}")]
    Forbidden { endpoint: String },

    /// The resource does not exist
    #[error("Not found: {endpoint}")]
    NotFound { endpoint: String },

    /// The backend refused the payload
    #[error("Invalid data for {endpoint}: {message}")]
    Validation { endpoint: String, message: String },

    /// The backend failed
    #[error("Server error {status} on {endpoint}: {message}")]
    Server {
        endpoint: String,
        status: u16,
        message: String,
    },

    /// Any other non-success status
    #[error("Unexpected status {status} on {endpoint}: {message}")]
    Status {
        endpoint: String,
        status: u16,
        message: String,
    },

    /// The body did not match the agreed response contract
    #[error("Unexpected response shape from {endpoint}: {source}")]
    UnexpectedShape {
        endpoint: String,
        #[source]
        source: serde_json::Error,
    },

    /// Client configuration error
    #[error("Invalid API configuration: {0}")]
    InvalidConfig(String),
}

impl ApiError {
    /// Map a transport failure
    pub(crate) fn transport(endpoint: &str, source: reqwest::Error) -> Self {
        if source.is_timeout() {
            ApiError::Timeout {
                endpoint: endpoint.to_string(),
            }
        } else {
            ApiError::Network {
                endpoint: endpoint.to_string(),
                source,
            }
        }
    }

    /// Map a non-success status
    pub(crate) fn from_status(endpoint: &str, status: StatusCode, message: String) -> Self {
        let endpoint = endpoint.to_string();
        match status {
            StatusCode::UNAUTHORIZED => ApiError::Unauthorized,
            StatusCode::FORBIDDEN => ApiError::Forbidden { endpoint },
            StatusCode::NOT_FOUND => ApiError::NotFound { endpoint },
            StatusCode::UNPROCESSABLE_ENTITY | StatusCode::BAD_REQUEST => {
                ApiError::Validation { endpoint, message }
            }
            s if s.is_server_error() => ApiError::Server {
                endpoint,
                status: s.as_u16(),
                message,
            },
            s => ApiError::Status {
                endpoint,
                status: s.as_u16(),
                message,
            },
        }
    }

    /// Whether the call never reached a response
    pub fn is_transport(&self) -> bool {
        matches!(self, ApiError::Timeout { .. } | ApiError::Network { .. })
    }

    /// One-line message to show the user
    pub fn notice(&self) -> String {
        match self {
            ApiError::Timeout { .. } | ApiError::Network { .. } => {
                "Cannot reach the server. Check that the backend is running.".to_string()
            }
            ApiError::Unauthorized => "Session expired. Please log in again.".to_string(),
            ApiError::Forbidden { .. } => {
                "You do not have permission to perform this action.".to_string()
            }
            ApiError::NotFound { .. } => "Resource not found.".to_string(),
            ApiError::Validation { .. } => {
                "Invalid data. Check the information entered.".to_string()
            }
            ApiError::Server { .. } => "Server error. Try again later.".to_string(),
            ApiError::Status { message, .. } if !message.is_empty() => message.clone(),
            ApiError::Status { .. } => "An unexpected error occurred.".to_string(),
            ApiError::UnexpectedShape { .. } => {
                "The server sent a response the console does not understand.".to_string()
            }
            ApiError::InvalidConfig(msg) => msg.clone(),
        }
    }
}

/// Type alias for API results
pub type ApiResult<T> = Result<T, ApiError>;
