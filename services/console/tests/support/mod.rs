//! Shared helpers for the console integration tests

#![allow(dead_code)]

use std::sync::{Arc, Mutex};
use std::time::Duration;

use api::{ApiClient, ApiConfig};
use auth::models::{Role, User};
use auth::session::SessionStore;
use axum::Router;
use chrono::Utc;
use common::storage::DurableStorage;
use jsonwebtoken::{EncodingKey, Header, encode};
use serde_json::{Value, json};

/// Requests seen by the fake backend, in arrival order
pub type Recorded = Arc<Mutex<Vec<(String, Option<String>, Value)>>>;

/// HS256 token for `email` valid for an hour
pub fn mint(email: &str) -> String {
    encode(
        &Header::default(),
        &json!({
            "http://schemas.xmlsoap.org/ws/2005/05/identity/claims/name": email,
            "exp": Utc::now().timestamp() + 3600,
            "iss": "TallerApi",
            "aud": "TallerClient",
        }),
        &EncodingKey::from_secret(b"backend-secret"),
    )
    .expect("Failed to encode token")
}

/// Serve `router` on an ephemeral port and return its `/api` base URL
pub async fn serve(router: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind fake backend");
    let addr = listener.local_addr().expect("Failed to read local address");
    tokio::spawn(async move {
        axum::serve(listener, router).await.ok();
    });
    format!("http://{addr}/api")
}

pub fn client(base_url: String, storage: Arc<dyn DurableStorage>) -> (SessionStore, ApiClient) {
    let session = SessionStore::create(storage);
    let config = ApiConfig {
        base_url,
        timeout: Duration::from_secs(5),
    };
    let api = ApiClient::new(&config, session.clone()).expect("Failed to build client");
    (session, api)
}

pub fn profile(id: i64, role: Role, email: &str) -> User {
    User {
        id,
        role_id: role.backend_id(),
        role_name: role.as_str().to_string(),
        name: email.split('@').next().unwrap_or_default().to_string(),
        email: email.to_string(),
        document: String::new(),
        phone: String::new(),
    }
}
