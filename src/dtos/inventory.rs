// src/dtos/inventory.rs
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateInventoryRecordRequest {
    pub location_id: String,
    pub counter: String,
    #[serde(default)]
    pub notes: String,
    pub items: Vec<InventoryItem>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InventoryItem {
    pub product_code: String,
    #[serde(default)]
    pub lot_quantity: f64,
    /// Defaults to the product's lot unit.
    pub lot_unit: Option<String>,
    #[serde(default)]
    pub piece_quantity: f64,
    /// Defaults to the product's loose unit.
    pub piece_unit: Option<String>,
    pub notes: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InventoryRecordResponse {
    pub recorded_at: NaiveDateTime,
    pub product_code: String,
    pub location_id: String,
    pub lot_quantity: f64,
    pub lot_unit: String,
    pub piece_quantity: f64,
    pub piece_unit: String,
    pub unit_price: f64,
    pub counter: String,
    pub notes: String,
}

impl From<crate::models::inventory_record::InventoryRecord> for InventoryRecordResponse {
    fn from(record: crate::models::inventory_record::InventoryRecord) -> Self {
        Self {
            recorded_at: record.recorded_at,
            product_code: record.product_code,
            location_id: record.location_id,
            lot_quantity: record.lot_quantity,
            lot_unit: record.lot_unit,
            piece_quantity: record.piece_quantity,
            piece_unit: record.piece_unit,
            unit_price: record.unit_price,
            counter: record.counter,
            notes: record.notes,
        }
    }
}

/// Optional target month for the report actions. Both absent means the
/// current month.
#[derive(Debug, Default, Clone, Copy)]
pub struct ReportQuery {
    pub year: Option<i32>,
    pub month: Option<u32>,
}

/// One matched record joined with its product, supplier and location.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportRow {
    pub recorded_at: NaiveDateTime,
    pub location_id: String,
    pub location_category: String,
    pub storage_area: String,
    pub detail: String,
    pub product_code: String,
    pub product_name: String,
    pub product_category: String,
    pub supplier_name: String,
    pub lot_quantity: f64,
    pub lot_unit: String,
    pub piece_quantity: f64,
    pub piece_unit: String,
    pub quantity: f64,
    pub unit_price: f64,
    pub amount: f64,
    pub counter: String,
    pub notes: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportFileResponse {
    pub url: String,
    pub file_name: String,
    pub rows: usize,
}
