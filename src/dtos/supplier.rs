// src/dtos/supplier.rs
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateSupplierRequest {
    pub name: String,
    #[serde(default)]
    pub contact: String,
    #[serde(default)]
    pub address: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateSupplierRequest {
    pub supplier_id: String,
    pub name: Option<String>,
    pub contact: Option<String>,
    pub address: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteSupplierRequest {
    pub supplier_id: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SupplierResponse {
    pub supplier_id: String,
    pub name: String,
    pub contact: String,
    pub address: String,
}

impl From<crate::models::supplier::Supplier> for SupplierResponse {
    fn from(supplier: crate::models::supplier::Supplier) -> Self {
        Self {
            supplier_id: supplier.id,
            name: supplier.name,
            contact: supplier.contact,
            address: supplier.address,
        }
    }
}
