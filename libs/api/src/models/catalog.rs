//! Catalog entities the order wizard chooses from

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Shop client
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Client {
    pub id: i64,
    #[serde(rename = "nombre")]
    pub name: String,
    #[serde(rename = "telefono", default)]
    pub phone: String,
    #[serde(rename = "documento", default)]
    pub document: String,
    #[serde(rename = "correo", default)]
    pub email: String,
}

/// Vehicle owned by a client
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Vehicle {
    pub id: i64,
    #[serde(rename = "clienteId")]
    pub client_id: i64,
    #[serde(rename = "clienteNombre", default)]
    pub client_name: String,
    #[serde(rename = "marca")]
    pub make: String,
    #[serde(rename = "modelo")]
    pub model: String,
    #[serde(default)]
    pub year: i32,
    #[serde(default)]
    pub vin: String,
    #[serde(rename = "kilometraje", default)]
    pub mileage: i64,
}

impl Vehicle {
    /// "Make Model (year)" label
    pub fn label(&self) -> String {
        format!("{} {} ({})", self.make, self.model, self.year)
    }
}

/// Spare part in stock
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Part {
    pub id: i64,
    #[serde(rename = "nombre")]
    pub name: String,
    #[serde(rename = "codigo", default)]
    pub code: String,
    #[serde(rename = "descripcion", default)]
    pub description: String,
    pub stock: u32,
    #[serde(rename = "precioUnitario")]
    pub unit_price: Decimal,
}

/// Kind of service an order is opened for
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceType {
    pub id: i64,
    #[serde(rename = "nombre")]
    pub name: String,
}
