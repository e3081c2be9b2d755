//! Backend client
//!
//! Every call goes through [`ApiClient::send`], which attaches the bearer
//! token, maps non-success statuses onto [`ApiError`] and logs the session
//! out when the backend answers 401 to an authenticated request.

use auth::models::{LoginCredentials, Role, User};
use auth::session::SessionStore;
use reqwest::header::{ACCEPT, CONTENT_TYPE, HeaderMap, HeaderValue};
use reqwest::{Method, RequestBuilder, StatusCode};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{Level, debug, error, info, warn};

use crate::config::ApiConfig;
use crate::error::{ApiError, ApiResult};
use crate::models::{
    Client, CreateOrderDetailRequest, CreateOrderRequest, LoginResponse, Order, Page, Part,
    ServiceType, Vehicle,
};

/// Longest backend error body echoed into an error message
const MAX_MESSAGE_LEN: usize = 200;

/// Typed client for the Taller REST backend
#[derive(Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
    session: SessionStore,
}

impl ApiClient {
    /// Build a client sharing `session` for bearer tokens
    pub fn new(config: &ApiConfig, session: SessionStore) -> ApiResult<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let http = reqwest::Client::builder()
            .timeout(config.timeout)
            .default_headers(headers)
            .build()
            .map_err(|e| ApiError::InvalidConfig(format!("Failed to build HTTP client: {e}")))?;

        info!(
            "Backend client ready for {} (timeout {:?})",
            config.base_url, config.timeout
        );

        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            session,
        })
    }

    /// Session this client authenticates with
    pub fn session(&self) -> &SessionStore {
        &self.session
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        self.http.request(method, format!("{}{}", self.base_url, path))
    }

    /// Send a request and return the raw body of a successful response
    async fn send(&self, endpoint: &str, request: RequestBuilder, authorized: bool) -> ApiResult<String> {
        let request = match self.session.bearer_token() {
            Some(token) if authorized => request.bearer_auth(token),
            _ => request,
        };

        debug!("Calling {}", endpoint);
        let response = request.send().await.map_err(|e| {
            error!("{} failed: {}", endpoint, e);
            ApiError::transport(endpoint, e)
        })?;

        let status = response.status();
        let body = response.text().await.map_err(|e| {
            error!("{} failed while reading the body: {}", endpoint, e);
            ApiError::transport(endpoint, e)
        })?;

        if status.is_success() {
            return Ok(body);
        }

        let err = ApiError::from_status(endpoint, status, error_message(&body));
        if matches!(err, ApiError::Unauthorized) && authorized {
            self.session.force_logout();
        }
        let level = failure_level(status);
        if level == Level::ERROR {
            error!("{} failed with {}", endpoint, status);
        } else if level == Level::WARN {
            warn!("{} failed with {}", endpoint, status);
        } else {
            debug!("{} answered {}", endpoint, status);
        }
        Err(err)
    }

    async fn get<T: DeserializeOwned>(&self, path: &str) -> ApiResult<T> {
        let endpoint = format!("GET {path}");
        let body = self.send(&endpoint, self.request(Method::GET, path), true).await?;
        decode(&endpoint, &body)
    }

    /// Fetch a listing through the page envelope
    async fn get_page<T: DeserializeOwned>(&self, path: &str) -> ApiResult<Vec<T>> {
        let page: Page<T> = self.get(path).await?;
        debug!("GET {} returned {} rows", path, page.data.len());
        Ok(page.data)
    }

    async fn post<B: Serialize>(&self, path: &str, body: &B, authorized: bool) -> ApiResult<(String, String)> {
        let endpoint = format!("POST {path}");
        let request = self.request(Method::POST, path).json(body);
        let body = self.send(&endpoint, request, authorized).await?;
        Ok((endpoint, body))
    }

    /// Exchange credentials for a bearer token
    pub async fn login(&self, credentials: &LoginCredentials) -> ApiResult<String> {
        let (endpoint, body) = self.post("/auth/login", credentials, false).await?;
        let response: LoginResponse = decode(&endpoint, &body)?;
        Ok(response.token)
    }

    /// All clients
    pub async fn list_clients(&self) -> ApiResult<Vec<Client>> {
        self.get_page("/Cliente").await
    }

    /// One client by id
    pub async fn get_client(&self, id: i64) -> ApiResult<Client> {
        self.get(&format!("/Cliente/{id}")).await
    }

    /// Vehicles owned by a client
    pub async fn list_vehicles_by_client(&self, client_id: i64) -> ApiResult<Vec<Vehicle>> {
        self.get_page(&format!("/Vehiculo?clienteId={client_id}"))
            .await
    }

    /// All spare parts
    pub async fn list_parts(&self) -> ApiResult<Vec<Part>> {
        self.get_page("/Repuesto").await
    }

    /// All console users
    pub async fn list_users(&self) -> ApiResult<Vec<User>> {
        self.get_page("/Usuario").await
    }

    /// Users with the mechanic role
    ///
    /// Backends without the dedicated endpoint answer 404; the full user
    /// listing is then filtered by role id.
    pub async fn list_mechanics(&self) -> ApiResult<Vec<User>> {
        match self.get_page("/Usuario/mecanicos").await {
            Err(ApiError::NotFound { .. }) => {
                warn!("No dedicated mechanics endpoint; filtering the user listing");
                let mechanic_id = Role::Mechanic.backend_id();
                Ok(self
                    .list_users()
                    .await?
                    .into_iter()
                    .filter(|u| u.role_id == mechanic_id)
                    .collect())
            }
            other => other,
        }
    }

    /// All service types
    pub async fn list_service_types(&self) -> ApiResult<Vec<ServiceType>> {
        self.get_page("/TipoServicio").await
    }

    /// Create a service order header
    pub async fn create_order(&self, request: &CreateOrderRequest) -> ApiResult<Order> {
        let (endpoint, body) = self.post("/OrdenServicio", request, true).await?;
        let order: Order = decode(&endpoint, &body)?;
        info!("Created service order {}", order.id);
        Ok(order)
    }

    /// Attach one part line to an order
    pub async fn create_order_detail(&self, request: &CreateOrderDetailRequest) -> ApiResult<()> {
        self.post("/DetalleOrden", request, true).await?;
        Ok(())
    }

    /// Profile of the user registered under `email`, if any
    pub async fn find_user_by_email(&self, email: &str) -> ApiResult<Option<User>> {
        Ok(self
            .list_users()
            .await?
            .into_iter()
            .find(|u| u.email.eq_ignore_ascii_case(email)))
    }
}

fn decode<T: DeserializeOwned>(endpoint: &str, body: &str) -> ApiResult<T> {
    serde_json::from_str(body).map_err(|source| {
        error!("{} answered an unexpected body: {}", endpoint, source);
        ApiError::UnexpectedShape {
            endpoint: endpoint.to_string(),
            source,
        }
    })
}

/// Human-readable message out of an error body
fn error_message(body: &str) -> String {
    if let Ok(Value::Object(map)) = serde_json::from_str::<Value>(body) {
        for key in ["message", "mensaje", "title", "error"] {
            if let Some(Value::String(msg)) = map.get(key) {
                return msg.clone();
            }
        }
    }

    body.trim().chars().take(MAX_MESSAGE_LEN).collect()
}

/// Log level for a non-success status. Callers branch on 404.
fn failure_level(status: StatusCode) -> Level {
    if status.is_server_error() {
        Level::ERROR
    } else if status == StatusCode::NOT_FOUND {
        Level::DEBUG
    } else {
        Level::WARN
    }
}
