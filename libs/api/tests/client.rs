//! Integration tests for the backend client against an in-process fake backend

use std::sync::{Arc, Mutex};
use std::time::Duration;

use api::models::CreateOrderDetailRequest;
use api::{ApiClient, ApiConfig, ApiError};
use auth::models::{LoginCredentials, Role, User};
use auth::session::SessionStore;
use axum::Router;
use axum::http::{HeaderMap, StatusCode};
use axum::routing::{get, post};
use axum::Json;
use common::storage::MemoryStorage;
use rust_decimal::Decimal;
use serde_json::{Value, json};

async fn serve(router: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind fake backend");
    let addr = listener.local_addr().expect("Failed to read local address");
    tokio::spawn(async move {
        axum::serve(listener, router).await.ok();
    });
    format!("http://{addr}/api")
}

fn client(base_url: String, timeout: Duration) -> (SessionStore, ApiClient) {
    let session = SessionStore::create(Arc::new(MemoryStorage::new()));
    let config = ApiConfig { base_url, timeout };
    let client = ApiClient::new(&config, session.clone()).expect("Failed to build client");
    (session, client)
}

fn logged_in(session: &SessionStore) {
    session
        .login(
            "tok-123",
            User::placeholder("recepcion@taller.co", Role::Receptionist),
            Role::Receptionist,
        )
        .expect("Failed to open session");
}

fn user(id: i64, role_id: i64, email: &str) -> Value {
    json!({
        "id": id,
        "rolUsuarioId": role_id,
        "rolUsuarioNombre": Role::from_backend_id(role_id).map(|r| r.as_str()).unwrap_or(""),
        "nombre": email,
        "correo": email,
    })
}

#[tokio::test]
async fn test_listing_sends_bearer_token() {
    let seen: Arc<Mutex<Option<String>>> = Arc::default();
    let recorded = seen.clone();
    let router = Router::new().route(
        "/api/Cliente",
        get(move |headers: HeaderMap| {
            let recorded = recorded.clone();
            async move {
                *recorded.lock().unwrap() = headers
                    .get("authorization")
                    .and_then(|v| v.to_str().ok())
                    .map(str::to_string);
                Json(json!({
                    "data": [{"id": 1, "nombre": "Juan Pérez", "telefono": "3001234567",
                              "documento": "10203040", "correo": "juan@correo.co"}],
                    "totalCount": 1, "totalPages": 1, "currentPage": 1
                }))
            }
        }),
    );
    let (session, client) = client(serve(router).await, Duration::from_secs(5));
    logged_in(&session);

    let clients = client.list_clients().await.expect("listing failed");
    assert_eq!(clients.len(), 1);
    assert_eq!(clients[0].name, "Juan Pérez");
    assert_eq!(seen.lock().unwrap().as_deref(), Some("Bearer tok-123"));
}

#[tokio::test]
async fn test_login_is_sent_without_bearer_token() {
    let seen: Arc<Mutex<Option<bool>>> = Arc::default();
    let recorded = seen.clone();
    let router = Router::new().route(
        "/api/auth/login",
        post(move |headers: HeaderMap, Json(body): Json<Value>| {
            let recorded = recorded.clone();
            async move {
                *recorded.lock().unwrap() = Some(headers.contains_key("authorization"));
                assert_eq!(body["correo"], "admin@taller.co");
                Json(json!({"token": "fresh"}))
            }
        }),
    );
    let (session, client) = client(serve(router).await, Duration::from_secs(5));
    logged_in(&session);

    let token = client
        .login(&LoginCredentials {
            email: "admin@taller.co".to_string(),
            password: "secret".to_string(),
        })
        .await
        .expect("login failed");

    assert_eq!(token, "fresh");
    assert_eq!(*seen.lock().unwrap(), Some(false));
}

#[tokio::test]
async fn test_unauthorized_forces_logout() {
    let router = Router::new().route(
        "/api/Repuesto",
        get(|| async { (StatusCode::UNAUTHORIZED, "expired") }),
    );
    let (session, client) = client(serve(router).await, Duration::from_secs(5));
    logged_in(&session);

    let err = client.list_parts().await.unwrap_err();
    assert!(matches!(err, ApiError::Unauthorized));
    assert!(!session.snapshot().is_authenticated);
    assert_eq!(session.bearer_token(), None);
}

#[tokio::test]
async fn test_bare_array_is_an_unexpected_shape() {
    let router = Router::new().route(
        "/api/TipoServicio",
        get(|| async { Json(json!([{"id": 1, "nombre": "Mantenimiento"}])) }),
    );
    let (_session, client) = client(serve(router).await, Duration::from_secs(5));

    let err = client.list_service_types().await.unwrap_err();
    assert!(
        matches!(&err, ApiError::UnexpectedShape { endpoint, .. } if endpoint == "GET /TipoServicio"),
        "got {err:?}"
    );
}

#[tokio::test]
async fn test_mechanics_fall_back_to_filtered_users() {
    let router = Router::new().route(
        "/api/Usuario",
        get(|| async {
            Json(json!({"data": [
                user(1, 1, "admin@taller.co"),
                user(7, 2, "luis@taller.co"),
                user(9, 3, "recepcion@taller.co"),
                user(8, 2, "marta@taller.co"),
            ]}))
        }),
    );
    let (_session, client) = client(serve(router).await, Duration::from_secs(5));

    let mechanics = client.list_mechanics().await.expect("fallback failed");
    let ids: Vec<i64> = mechanics.iter().map(|m| m.id).collect();
    assert_eq!(ids, vec![7, 8]);
}

#[tokio::test]
async fn test_find_user_by_email_ignores_case() {
    let router = Router::new().route(
        "/api/Usuario",
        get(|| async { Json(json!({"data": [user(4, 1, "Admin@Taller.co")]})) }),
    );
    let (_session, client) = client(serve(router).await, Duration::from_secs(5));

    let found = client.find_user_by_email("admin@taller.co").await.unwrap();
    assert_eq!(found.map(|u| u.id), Some(4));
    assert_eq!(client.find_user_by_email("nadie@taller.co").await.unwrap(), None);
}

#[tokio::test]
async fn test_validation_error_keeps_backend_message() {
    let router = Router::new().route(
        "/api/DetalleOrden",
        post(|| async {
            (
                StatusCode::UNPROCESSABLE_ENTITY,
                Json(json!({"message": "Cantidad supera el stock"})),
            )
        }),
    );
    let (_session, client) = client(serve(router).await, Duration::from_secs(5));

    let err = client
        .create_order_detail(&CreateOrderDetailRequest {
            order_id: 55,
            part_id: 3,
            quantity: 99,
            total_price: Decimal::new(99, 0),
        })
        .await
        .unwrap_err();

    match err {
        ApiError::Validation { message, .. } => assert_eq!(message, "Cantidad supera el stock"),
        other => panic!("unexpected error {other:?}"),
    }
}

#[tokio::test]
async fn test_slow_backend_times_out() {
    let router = Router::new().route(
        "/api/Cliente",
        get(|| async {
            tokio::time::sleep(Duration::from_secs(2)).await;
            Json(json!({"data": []}))
        }),
    );
    let (_session, client) = client(serve(router).await, Duration::from_millis(100));

    let err = client.list_clients().await.unwrap_err();
    assert!(matches!(err, ApiError::Timeout { .. }), "got {err:?}");
    assert!(err.is_transport());
}

#[tokio::test]
async fn test_unreachable_backend_is_a_network_error() {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let (_session, client) = client(format!("http://{addr}/api"), Duration::from_secs(2));
    let err = client.list_clients().await.unwrap_err();
    assert!(err.is_transport(), "got {err:?}");
    assert_eq!(
        err.notice(),
        "Cannot reach the server. Check that the backend is running."
    );
}
