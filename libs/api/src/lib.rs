//! HTTP client for the Taller REST backend
//!
//! Wraps every backend call the console makes behind typed requests and
//! responses. Listings are decoded through a single page envelope, the
//! bearer token is taken from the session store, and a 401 from the backend
//! logs the session out.

pub mod client;
pub mod config;
pub mod error;
pub mod models;

pub use client::ApiClient;
pub use config::ApiConfig;
pub use error::{ApiError, ApiResult};
