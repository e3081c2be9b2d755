//! Service order payloads

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Body of `POST /OrdenServicio`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateOrderRequest {
    #[serde(rename = "vehiculoId")]
    pub vehicle_id: i64,
    #[serde(rename = "tipoServicioId")]
    pub service_type_id: i64,
    #[serde(rename = "usuarioId")]
    pub mechanic_id: i64,
    #[serde(rename = "fechaIngreso")]
    pub received_at: DateTime<Utc>,
    #[serde(rename = "fechaEstimada")]
    pub estimated_at: DateTime<Utc>,
}

/// Body of `POST /DetalleOrden`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateOrderDetailRequest {
    #[serde(rename = "ordenServicioId")]
    pub order_id: i64,
    #[serde(rename = "repuestoId")]
    pub part_id: i64,
    #[serde(rename = "cantidad")]
    pub quantity: u32,
    #[serde(rename = "precioTotal")]
    pub total_price: Decimal,
}

/// Service order as returned by the backend
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Order {
    pub id: i64,
    #[serde(rename = "vehiculoId", default)]
    pub vehicle_id: i64,
    #[serde(rename = "tipoServicioId", default)]
    pub service_type_id: i64,
    #[serde(rename = "usuarioId", default)]
    pub mechanic_id: i64,
    #[serde(rename = "estado", default)]
    pub status: Option<String>,
}
