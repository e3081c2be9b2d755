//! Login and rehydration against an in-process fake backend

mod support;

use std::sync::{Arc, Mutex};

use api::ApiError;
use auth::models::{LoginCredentials, Role};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};
use common::storage::{AUTH_TOKEN_KEY, DurableStorage, FileStorage, MemoryStorage, StorageConfig, USER_ROLE_KEY};
use serde_json::{Value, json};
use taller_console::login::{self, LoginError};

fn credentials(email: &str) -> LoginCredentials {
    LoginCredentials {
        email: email.to_string(),
        password: "secret".to_string(),
    }
}

/// Backend issuing tokens for any email and answering `/Usuario` with `users`
fn backend(users: Value, profile_status: StatusCode) -> Router {
    Router::new()
        .route(
            "/api/auth/login",
            post(|Json(body): Json<Value>| async move {
                let email = body["correo"].as_str().unwrap_or_default().to_string();
                Json(json!({"token": support::mint(&email)}))
            }),
        )
        .route(
            "/api/Usuario",
            get(move || {
                let users = users.clone();
                async move {
                    if profile_status.is_success() {
                        Json(json!({"data": users})).into_response()
                    } else {
                        profile_status.into_response()
                    }
                }
            }),
        )
}

fn open_storage(dir: &tempfile::TempDir) -> Arc<dyn DurableStorage> {
    Arc::new(
        FileStorage::open(&StorageConfig {
            path: dir.path().join("storage.json"),
        })
        .expect("Failed to open storage"),
    )
}

#[tokio::test]
async fn test_role_comes_from_profile_and_survives_restart() {
    let users = json!([{
        "id": 4, "rolUsuarioId": 1, "rolUsuarioNombre": "Admin",
        "nombre": "Ana", "correo": "ana@taller.co"
    }]);
    let base_url = support::serve(backend(users, StatusCode::OK)).await;
    let dir = tempfile::tempdir().unwrap();

    let (session, api) = support::client(base_url.clone(), open_storage(&dir));
    let landing = login::login(&api, &credentials("ana@taller.co")).await.unwrap();
    assert_eq!(landing, "/admin/dashboard");
    let snapshot = session.snapshot();
    assert_eq!(snapshot.role, Some(Role::Admin));
    assert_eq!(snapshot.user.map(|u| u.id), Some(4));
    session.dispose();

    // A later run restores the session and replaces the placeholder profile
    let storage = open_storage(&dir);
    assert_eq!(storage.get(USER_ROLE_KEY).unwrap().as_deref(), Some("Admin"));
    let (session, api) = support::client(base_url, storage);
    assert!(login::rehydrate(&api).await);
    assert!(!session.has_placeholder_user());
    let snapshot = session.snapshot();
    assert!(!snapshot.is_loading);
    assert_eq!(snapshot.user.map(|u| u.name), Some("Ana".to_string()));
}

#[tokio::test]
async fn test_email_heuristic_when_profile_unavailable() {
    let base_url = support::serve(backend(json!([]), StatusCode::INTERNAL_SERVER_ERROR)).await;
    let (session, api) = support::client(base_url, Arc::new(MemoryStorage::new()));

    let landing = login::login(&api, &credentials("mecanico.luis@taller.co"))
        .await
        .unwrap();
    assert_eq!(landing, "/mechanic/orders");
    assert!(session.snapshot().is_authenticated);
    assert!(session.has_placeholder_user());
}

#[tokio::test]
async fn test_rehydrate_keeps_placeholder_when_profile_fails() {
    let base_url = support::serve(backend(json!([]), StatusCode::BAD_GATEWAY)).await;
    let storage: Arc<dyn DurableStorage> = Arc::new(MemoryStorage::new());
    storage
        .set(AUTH_TOKEN_KEY, &support::mint("recepcion@taller.co"))
        .unwrap();
    storage.set(USER_ROLE_KEY, "Recepcionista").unwrap();

    let (session, api) = support::client(base_url, storage);
    assert!(login::rehydrate(&api).await);
    assert!(session.has_placeholder_user());
    assert_eq!(session.snapshot().role, Some(Role::Receptionist));
}

#[tokio::test]
async fn test_rejected_credentials() {
    let router = Router::new().route(
        "/api/auth/login",
        post(|| async { (StatusCode::UNAUTHORIZED, "bad credentials").into_response() }),
    );
    let base_url = support::serve(router).await;
    let (session, api) = support::client(base_url, Arc::new(MemoryStorage::new()));

    let err = login::login(&api, &credentials("ana@taller.co"))
        .await
        .unwrap_err();
    assert!(matches!(err, LoginError::Api(ApiError::Unauthorized)));
    assert_eq!(err.notice(), "Invalid email or password.");
    assert!(!session.snapshot().is_authenticated);
}

#[tokio::test]
async fn test_invalid_email_never_reaches_backend() {
    let calls = Arc::new(Mutex::new(0));
    let counter = calls.clone();
    let router = Router::new().route(
        "/api/auth/login",
        post(move || {
            let counter = counter.clone();
            async move {
                *counter.lock().unwrap() += 1;
                StatusCode::OK
            }
        }),
    );
    let base_url = support::serve(router).await;
    let (_session, api) = support::client(base_url, Arc::new(MemoryStorage::new()));

    let err = login::login(&api, &credentials("not-an-email"))
        .await
        .unwrap_err();
    assert!(matches!(err, LoginError::Invalid(_)));
    assert_eq!(*calls.lock().unwrap(), 0);
}

#[tokio::test]
async fn test_unreadable_token_is_refused() {
    let router = Router::new().route(
        "/api/auth/login",
        post(|| async { Json(json!({"token": "not.a-token"})) }),
    );
    let base_url = support::serve(router).await;
    let (session, api) = support::client(base_url, Arc::new(MemoryStorage::new()));

    let err = login::login(&api, &credentials("ana@taller.co"))
        .await
        .unwrap_err();
    assert!(matches!(err, LoginError::UnreadableToken));
    assert!(!session.snapshot().is_authenticated);
}

#[tokio::test]
async fn test_profile_refusing_fresh_token_is_not_bad_credentials() {
    let base_url = support::serve(backend(json!([]), StatusCode::UNAUTHORIZED)).await;
    let (session, api) = support::client(base_url, Arc::new(MemoryStorage::new()));

    let err = login::login(&api, &credentials("ana@taller.co"))
        .await
        .unwrap_err();
    assert!(matches!(err, LoginError::TokenRejected));
    assert_ne!(err.notice(), "Invalid email or password.");
    assert!(!session.snapshot().is_authenticated);
}
