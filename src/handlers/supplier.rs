// src/handlers/supplier.rs
use tracing::{info, instrument};

use crate::dtos::supplier::{CreateSupplierRequest, DeleteSupplierRequest, SupplierResponse, UpdateSupplierRequest};
use crate::error::AppError;
use crate::handlers::next_sequential_id;
use crate::models::{product::Product, supplier::Supplier};
use crate::store::{sheet, TableStore};

// getSuppliers - List all suppliers
#[instrument(skip(store))]
pub fn list_suppliers(store: &dyn TableStore) -> Result<Vec<SupplierResponse>, AppError> {
    let suppliers = sheet::load::<Supplier>(store)?;
    Ok(suppliers.into_values().into_iter().map(SupplierResponse::from).collect())
}

// addSupplier - Create new supplier with the next S### id
#[instrument(skip(store, req))]
pub fn create_supplier(store: &dyn TableStore, req: CreateSupplierRequest) -> Result<SupplierResponse, AppError> {
    if req.name.trim().is_empty() {
        return Err(AppError::validation("Supplier name is required"));
    }

    let suppliers = sheet::load::<Supplier>(store)?;
    let supplier = Supplier {
        id: next_sequential_id("S", suppliers.values().map(|s| s.id.as_str())),
        name: req.name.trim().to_string(),
        contact: req.contact,
        address: req.address,
    };
    sheet::append(store, &suppliers.index, &supplier)?;

    info!(supplier_id = %supplier.id, "Supplier created");
    Ok(SupplierResponse::from(supplier))
}

// editSupplier - Update supplier fields
#[instrument(skip(store, req), fields(supplier_id = %req.supplier_id))]
pub fn update_supplier(store: &dyn TableStore, req: UpdateSupplierRequest) -> Result<SupplierResponse, AppError> {
    let suppliers = sheet::load::<Supplier>(store)?;
    let entry = suppliers
        .find(|s| s.id == req.supplier_id)
        .ok_or_else(|| AppError::not_found("Supplier not found"))?;

    let mut supplier = entry.value.clone();
    if let Some(name) = req.name {
        if name.trim().is_empty() {
            return Err(AppError::validation("Supplier name is required"));
        }
        supplier.name = name.trim().to_string();
    }
    if let Some(contact) = req.contact {
        supplier.contact = contact;
    }
    if let Some(address) = req.address {
        supplier.address = address;
    }
    sheet::update(store, &suppliers.index, entry, &supplier)?;

    Ok(SupplierResponse::from(supplier))
}

// deleteSupplier - Refused while products still reference the supplier
#[instrument(skip(store, req), fields(supplier_id = %req.supplier_id))]
pub fn delete_supplier(store: &dyn TableStore, req: DeleteSupplierRequest) -> Result<(), AppError> {
    let suppliers = sheet::load::<Supplier>(store)?;
    let entry = suppliers
        .find(|s| s.id == req.supplier_id)
        .ok_or_else(|| AppError::not_found("Supplier not found"))?;

    let products = sheet::load::<Product>(store)?;
    if products.values().any(|p| p.supplier_id == req.supplier_id) {
        return Err(AppError::conflict("Cannot delete supplier with existing products"));
    }

    sheet::delete(store, &[entry])?;
    info!("Supplier deleted");
    Ok(())
}
