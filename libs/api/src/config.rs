//! Backend connection settings

use std::time::Duration;

use crate::error::{ApiError, ApiResult};

/// Default base URL of the backend, including the `/api` prefix
pub const DEFAULT_BASE_URL: &str = "http://localhost:5105/api";

/// Default request timeout in milliseconds
pub const DEFAULT_TIMEOUT_MS: u64 = 10_000;

/// Backend client configuration
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// Base URL every endpoint path is appended to
    pub base_url: String,
    /// Timeout applied to every request
    pub timeout: Duration,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: Duration::from_millis(DEFAULT_TIMEOUT_MS),
        }
    }
}

impl ApiConfig {
    /// Create a new ApiConfig from environment variables
    ///
    /// # Environment Variables
    /// - `TALLER_API_BASE_URL`: backend base URL (default: "http://localhost:5105/api")
    /// - `TALLER_API_TIMEOUT_MS`: request timeout in milliseconds (default: 10000)
    pub fn from_env() -> ApiResult<Self> {
        let base_url =
            std::env::var("TALLER_API_BASE_URL").unwrap_or_else(|_| DEFAULT_BASE_URL.to_string());

        if !(base_url.starts_with("http://") || base_url.starts_with("https://")) {
            return Err(ApiError::InvalidConfig(format!(
                "TALLER_API_BASE_URL must be an http(s) URL, got {base_url}"
            )));
        }

        let timeout_ms = std::env::var("TALLER_API_TIMEOUT_MS")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(DEFAULT_TIMEOUT_MS);

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            timeout: Duration::from_millis(timeout_ms),
        })
    }
}
