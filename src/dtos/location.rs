// src/dtos/location.rs
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

// ==================== Hierarchy ====================

/// Whether a location has a count timestamped today.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum InventoryStatus {
    Recorded,
    Unrecorded,
}

impl InventoryStatus {
    /// Status only moves from unrecorded to recorded.
    pub fn promote(&mut self, other: InventoryStatus) {
        if other == InventoryStatus::Recorded {
            *self = InventoryStatus::Recorded;
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LocationProductStatus {
    pub product_code: String,
    pub product_name: String,
    pub quantity: f64,
    /// Epoch when the product was never counted here.
    pub recorded_at: NaiveDateTime,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DetailNode {
    pub id: String,
    pub name: String,
    pub inventory_status: InventoryStatus,
    pub products: Vec<LocationProductStatus>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StorageAreaNode {
    pub id: String,
    pub name: String,
    pub inventory_status: InventoryStatus,
    pub products: Vec<LocationProductStatus>,
    pub details: Vec<DetailNode>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryGroup {
    pub category: String,
    pub storage_areas: Vec<StorageAreaNode>,
}

// ==================== Location Master ====================

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateLocationRequest {
    /// Generated as `L###` when absent.
    pub location_id: Option<String>,
    pub category: String,
    #[serde(default)]
    pub storage_area: String,
    #[serde(default)]
    pub detail: String,
    #[serde(default)]
    pub notes: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateLocationRequest {
    pub location_id: String,
    pub category: Option<String>,
    pub storage_area: Option<String>,
    pub detail: Option<String>,
    pub notes: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteLocationRequest {
    pub location_id: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LocationResponse {
    pub location_id: String,
    pub category: String,
    pub storage_area: String,
    pub detail: String,
    pub notes: String,
}

impl From<crate::models::location::Location> for LocationResponse {
    fn from(location: crate::models::location::Location) -> Self {
        Self {
            location_id: location.id,
            category: location.category,
            storage_area: location.storage_area,
            detail: location.detail,
            notes: location.notes,
        }
    }
}

// ==================== Location-Product Mapping ====================

#[derive(Debug, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LocationProductRequest {
    pub location_id: String,
    pub product_code: String,
}
