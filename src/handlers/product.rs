// src/handlers/product.rs
use std::collections::HashMap;

use tracing::{info, instrument};

use crate::dtos::product::{
    CreateProductRequest, DeleteProductRequest, LocationProductEntry, ProductResponse, UpdateProductRequest,
};
use crate::error::AppError;
use crate::models::{
    inventory_record::InventoryRecord,
    location::{Location, LocationProduct},
    product::Product,
    supplier::Supplier,
};
use crate::services::hierarchy::latest_by_location_product;
use crate::store::schema::now_local;
use crate::store::{sheet, TableStore};

fn ensure_supplier_exists(store: &dyn TableStore, supplier_id: &str) -> Result<(), AppError> {
    if supplier_id.is_empty() {
        return Ok(());
    }
    let suppliers = sheet::load::<Supplier>(store)?;
    if suppliers.find(|s| s.id == supplier_id).is_none() {
        return Err(AppError::not_found(format!("Supplier {supplier_id} not found")));
    }
    Ok(())
}

// getProducts - List all products with supplier names
#[instrument(skip(store))]
pub fn list_products(store: &dyn TableStore) -> Result<Vec<ProductResponse>, AppError> {
    let products = sheet::load::<Product>(store)?;
    let suppliers = sheet::load::<Supplier>(store)?;
    let names: HashMap<&str, &str> = suppliers
        .values()
        .map(|s| (s.id.as_str(), s.name.as_str()))
        .collect();

    let response = products
        .values()
        .map(|p| {
            let supplier_name = names.get(p.supplier_id.as_str()).map(|n| n.to_string());
            ProductResponse {
                supplier_name,
                ..ProductResponse::from(p.clone())
            }
        })
        .collect();
    Ok(response)
}

// getProductsByLocation - Products mapped to a location with their last count there
#[instrument(skip(store))]
pub fn products_by_location(store: &dyn TableStore, location_id: &str) -> Result<Vec<LocationProductEntry>, AppError> {
    if location_id.is_empty() {
        return Err(AppError::validation("locationId is required"));
    }
    let locations = sheet::load::<Location>(store)?;
    if locations.find(|l| l.id == location_id).is_none() {
        return Err(AppError::not_found("Location not found"));
    }

    let mappings = sheet::load::<LocationProduct>(store)?;
    let products = sheet::load::<Product>(store)?;
    let records = sheet::load::<InventoryRecord>(store)?.into_values();
    let latest = latest_by_location_product(&records);
    let by_code: HashMap<&str, &Product> = products.values().map(|p| (p.code.as_str(), p)).collect();

    let entries = mappings
        .values()
        .filter(|m| m.location_id == location_id)
        .filter_map(|m| by_code.get(m.product_code.as_str()).copied())
        .map(|product| {
            let last = latest.get(&(location_id, product.code.as_str()));
            LocationProductEntry {
                product_code: product.code.clone(),
                name: product.name.clone(),
                category: product.category.clone(),
                spec: product.spec.clone(),
                unit_price: product.unit_price,
                case_quantity: product.case_quantity,
                lot_unit: product.lot_unit.clone(),
                loose_unit: product.loose_unit.clone(),
                last_lot_quantity: last.map(|r| r.lot_quantity).unwrap_or(0.0),
                last_piece_quantity: last.map(|r| r.piece_quantity).unwrap_or(0.0),
                quantity: last.map(|r| r.quantity()).unwrap_or(0.0),
                last_counted_at: last.map(|r| r.recorded_at),
            }
        })
        .collect();
    Ok(entries)
}

// addProduct - Create new product
#[instrument(skip(store, payload), fields(product_code = %payload.product_code))]
pub fn create_product(store: &dyn TableStore, payload: CreateProductRequest) -> Result<ProductResponse, AppError> {
    let code = payload.product_code.trim().to_string();
    if code.is_empty() {
        return Err(AppError::validation("Product code is required"));
    }
    if payload.name.trim().is_empty() {
        return Err(AppError::validation("Product name is required"));
    }
    if payload.unit_price < 0.0 {
        return Err(AppError::validation("Unit price cannot be negative"));
    }

    let products = sheet::load::<Product>(store)?;
    if products.find(|p| p.code == code).is_some() {
        return Err(AppError::conflict("Product code already exists"));
    }
    let supplier_id = payload.supplier_id.trim().to_string();
    ensure_supplier_exists(store, &supplier_id)?;

    let product = Product {
        code,
        category: payload.category,
        name: payload.name.trim().to_string(),
        internal_name: payload.internal_name,
        supplier_id,
        spec: payload.spec,
        unit_price: payload.unit_price,
        case_quantity: payload.case_quantity,
        loose_unit: payload.loose_unit,
        lot_size: payload.lot_size,
        lot_unit: payload.lot_unit,
        lead_time: payload.lead_time,
        safety_stock: payload.safety_stock,
        notes: [payload.note1, payload.note2, payload.note3],
        updated_at: Some(now_local()),
    };
    sheet::append(store, &products.index, &product)?;

    info!("Product created");
    Ok(ProductResponse::from(product))
}

// editProduct - Update product; recorded inventory prices are left alone
#[instrument(skip(store, payload), fields(product_code = %payload.product_code))]
pub fn update_product(store: &dyn TableStore, payload: UpdateProductRequest) -> Result<ProductResponse, AppError> {
    let code = payload.product_code.trim();
    let products = sheet::load::<Product>(store)?;
    let entry = products
        .find(|p| p.code == code)
        .ok_or_else(|| AppError::not_found("Product not found"))?;

    let mut product = entry.value.clone();
    if let Some(name) = payload.name {
        if name.trim().is_empty() {
            return Err(AppError::validation("Product name is required"));
        }
        product.name = name.trim().to_string();
    }
    if let Some(supplier_id) = payload.supplier_id {
        let supplier_id = supplier_id.trim().to_string();
        ensure_supplier_exists(store, &supplier_id)?;
        product.supplier_id = supplier_id;
    }
    if let Some(unit_price) = payload.unit_price {
        if unit_price < 0.0 {
            return Err(AppError::validation("Unit price cannot be negative"));
        }
        product.unit_price = unit_price;
    }
    if let Some(category) = payload.category {
        product.category = category;
    }
    if let Some(internal_name) = payload.internal_name {
        product.internal_name = internal_name;
    }
    if let Some(spec) = payload.spec {
        product.spec = spec;
    }
    if let Some(loose_unit) = payload.loose_unit {
        product.loose_unit = loose_unit;
    }
    if let Some(lot_unit) = payload.lot_unit {
        product.lot_unit = lot_unit;
    }
    // Some(None) is an explicit null and clears the value
    if let Some(case_quantity) = payload.case_quantity {
        product.case_quantity = case_quantity;
    }
    if let Some(lot_size) = payload.lot_size {
        product.lot_size = lot_size;
    }
    if let Some(lead_time) = payload.lead_time {
        product.lead_time = lead_time;
    }
    if let Some(safety_stock) = payload.safety_stock {
        product.safety_stock = safety_stock;
    }
    for (slot, note) in product.notes.iter_mut().zip([payload.note1, payload.note2, payload.note3]) {
        if let Some(note) = note {
            *slot = note;
        }
    }
    product.updated_at = Some(now_local());

    sheet::update(store, &products.index, entry, &product)?;
    Ok(ProductResponse::from(product))
}

// deleteProduct - Delete product and its location mappings
#[instrument(skip(store, payload), fields(product_code = %payload.product_code))]
pub fn delete_product(store: &dyn TableStore, payload: DeleteProductRequest) -> Result<(), AppError> {
    let code = payload.product_code.trim();
    let products = sheet::load::<Product>(store)?;
    let entry = products
        .find(|p| p.code == code)
        .ok_or_else(|| AppError::not_found("Product not found"))?;
    let mappings = sheet::load::<LocationProduct>(store)?;

    sheet::delete(store, &[entry])?;
    let stale: Vec<_> = mappings
        .entries
        .iter()
        .filter(|m| m.value.product_code == code)
        .collect();
    sheet::delete(store, &stale)?;

    info!(mappings_removed = stale.len(), "Product deleted");
    Ok(())
}
