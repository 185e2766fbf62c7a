// src/dtos/product.rs
use chrono::NaiveDateTime;
use serde::{Deserialize, Deserializer, Serialize};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateProductRequest {
    pub product_code: String,
    pub name: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub internal_name: String,
    #[serde(default)]
    pub supplier_id: String,
    #[serde(default)]
    pub spec: String,
    #[serde(default)]
    pub unit_price: f64,
    pub case_quantity: Option<f64>,
    #[serde(default)]
    pub loose_unit: String,
    pub lot_size: Option<f64>,
    #[serde(default)]
    pub lot_unit: String,
    pub lead_time: Option<f64>,
    pub safety_stock: Option<f64>,
    #[serde(default)]
    pub note1: String,
    #[serde(default)]
    pub note2: String,
    #[serde(default)]
    pub note3: String,
}

/// Present-but-null as `Some(None)`, so an absent field and an explicit
/// `null` stay distinguishable.
fn nullable<'de, D>(deserializer: D) -> Result<Option<Option<f64>>, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<f64>::deserialize(deserializer).map(Some)
}

/// Absent fields keep their stored value. The optional quantities accept
/// `null` to clear them.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProductRequest {
    pub product_code: String,
    pub name: Option<String>,
    pub category: Option<String>,
    pub internal_name: Option<String>,
    pub supplier_id: Option<String>,
    pub spec: Option<String>,
    pub unit_price: Option<f64>,
    #[serde(default, deserialize_with = "nullable")]
    pub case_quantity: Option<Option<f64>>,
    pub loose_unit: Option<String>,
    #[serde(default, deserialize_with = "nullable")]
    pub lot_size: Option<Option<f64>>,
    pub lot_unit: Option<String>,
    #[serde(default, deserialize_with = "nullable")]
    pub lead_time: Option<Option<f64>>,
    #[serde(default, deserialize_with = "nullable")]
    pub safety_stock: Option<Option<f64>>,
    pub note1: Option<String>,
    pub note2: Option<String>,
    pub note3: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteProductRequest {
    pub product_code: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductResponse {
    pub product_code: String,
    pub category: String,
    pub name: String,
    pub internal_name: String,
    pub supplier_id: String,
    pub supplier_name: Option<String>,
    pub spec: String,
    pub unit_price: f64,
    pub case_quantity: Option<f64>,
    pub loose_unit: String,
    pub lot_size: Option<f64>,
    pub lot_unit: String,
    pub lead_time: Option<f64>,
    pub safety_stock: Option<f64>,
    pub note1: String,
    pub note2: String,
    pub note3: String,
    pub updated_at: Option<NaiveDateTime>,
}

// Convert from Model to Response DTO
impl From<crate::models::product::Product> for ProductResponse {
    fn from(product: crate::models::product::Product) -> Self {
        let [note1, note2, note3] = product.notes;
        Self {
            product_code: product.code,
            category: product.category,
            name: product.name,
            internal_name: product.internal_name,
            supplier_id: product.supplier_id,
            supplier_name: None,
            spec: product.spec,
            unit_price: product.unit_price,
            case_quantity: product.case_quantity,
            loose_unit: product.loose_unit,
            lot_size: product.lot_size,
            lot_unit: product.lot_unit,
            lead_time: product.lead_time,
            safety_stock: product.safety_stock,
            note1,
            note2,
            note3,
            updated_at: product.updated_at,
        }
    }
}

/// A product countable at one location, with its last count there.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LocationProductEntry {
    pub product_code: String,
    pub name: String,
    pub category: String,
    pub spec: String,
    pub unit_price: f64,
    pub case_quantity: Option<f64>,
    pub lot_unit: String,
    pub loose_unit: String,
    pub last_lot_quantity: f64,
    pub last_piece_quantity: f64,
    pub quantity: f64,
    pub last_counted_at: Option<NaiveDateTime>,
}
