//! Backend calls the order wizard depends on

use std::future::Future;

use api::ApiClient;
use api::error::ApiResult;
use api::models::{Client, CreateOrderDetailRequest, CreateOrderRequest, Order, Part, ServiceType, Vehicle};
use auth::models::User;

/// Listings and writes needed to build and submit an order
pub trait OrderBackend: Send + Sync {
    fn list_clients(&self) -> impl Future<Output = ApiResult<Vec<Client>>> + Send;

    fn list_vehicles_by_client(
        &self,
        client_id: i64,
    ) -> impl Future<Output = ApiResult<Vec<Vehicle>>> + Send;

    fn list_parts(&self) -> impl Future<Output = ApiResult<Vec<Part>>> + Send;

    fn list_mechanics(&self) -> impl Future<Output = ApiResult<Vec<User>>> + Send;

    fn list_service_types(&self) -> impl Future<Output = ApiResult<Vec<ServiceType>>> + Send;

    fn create_order(
        &self,
        request: &CreateOrderRequest,
    ) -> impl Future<Output = ApiResult<Order>> + Send;

    fn create_order_detail(
        &self,
        request: &CreateOrderDetailRequest,
    ) -> impl Future<Output = ApiResult<()>> + Send;
}

impl OrderBackend for ApiClient {
    async fn list_clients(&self) -> ApiResult<Vec<Client>> {
        ApiClient::list_clients(self).await
    }

    async fn list_vehicles_by_client(&self, client_id: i64) -> ApiResult<Vec<Vehicle>> {
        ApiClient::list_vehicles_by_client(self, client_id).await
    }

    async fn list_parts(&self) -> ApiResult<Vec<Part>> {
        ApiClient::list_parts(self).await
    }

    async fn list_mechanics(&self) -> ApiResult<Vec<User>> {
        ApiClient::list_mechanics(self).await
    }

    async fn list_service_types(&self) -> ApiResult<Vec<ServiceType>> {
        ApiClient::list_service_types(self).await
    }

    async fn create_order(&self, request: &CreateOrderRequest) -> ApiResult<Order> {
        ApiClient::create_order(self, request).await
    }

    async fn create_order_detail(&self, request: &CreateOrderDetailRequest) -> ApiResult<()> {
        ApiClient::create_order_detail(self, request).await
    }
}
