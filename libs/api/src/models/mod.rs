//! Request and response payloads exchanged with the backend

use serde::{Deserialize, Serialize};

pub mod catalog;
pub mod orders;

pub use catalog::{Client, Part, ServiceType, Vehicle};
pub use orders::{CreateOrderDetailRequest, CreateOrderRequest, Order};

/// Response of `POST /auth/login`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginResponse {
    pub token: String,
}

/// Envelope every listing endpoint answers with
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Page<T> {
    pub data: Vec<T>,
    #[serde(rename = "totalCount", default)]
    pub total_count: Option<u64>,
    #[serde(rename = "totalPages", default)]
    pub total_pages: Option<u32>,
    #[serde(rename = "currentPage", default)]
    pub current_page: Option<u32>,
}
