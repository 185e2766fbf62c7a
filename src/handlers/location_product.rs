// src/handlers/location_product.rs
use tracing::{info, instrument};

use crate::dtos::location::LocationProductRequest;
use crate::error::AppError;
use crate::models::{
    location::{Location, LocationProduct},
    product::Product,
};
use crate::store::{sheet, TableStore};

// addLocationProduct - Declare a product countable at a location
#[instrument(skip(store, req), fields(location_id = %req.location_id, product_code = %req.product_code))]
pub fn add_location_product(store: &dyn TableStore, req: LocationProductRequest) -> Result<LocationProductRequest, AppError> {
    let location_id = req.location_id.trim();
    let product_code = req.product_code.trim();
    if location_id.is_empty() || product_code.is_empty() {
        return Err(AppError::validation("locationId and productCode are required"));
    }

    let locations = sheet::load::<Location>(store)?;
    if locations.find(|l| l.id == location_id).is_none() {
        return Err(AppError::not_found("Location not found"));
    }
    let products = sheet::load::<Product>(store)?;
    if products.find(|p| p.code == product_code).is_none() {
        return Err(AppError::not_found("Product not found"));
    }

    let mappings = sheet::load::<LocationProduct>(store)?;
    if mappings
        .find(|m| m.location_id == location_id && m.product_code == product_code)
        .is_some()
    {
        return Err(AppError::conflict("Product is already assigned to this location"));
    }

    let mapping = LocationProduct {
        location_id: location_id.to_string(),
        product_code: product_code.to_string(),
    };
    sheet::append(store, &mappings.index, &mapping)?;

    info!("Location product added");
    Ok(LocationProductRequest {
        location_id: mapping.location_id,
        product_code: mapping.product_code,
    })
}

// deleteLocationProduct - Remove a location/product pair
#[instrument(skip(store, req), fields(location_id = %req.location_id, product_code = %req.product_code))]
pub fn delete_location_product(store: &dyn TableStore, req: LocationProductRequest) -> Result<(), AppError> {
    let mappings = sheet::load::<LocationProduct>(store)?;
    let matching: Vec<_> = mappings
        .entries
        .iter()
        .filter(|m| m.value.location_id == req.location_id && m.value.product_code == req.product_code)
        .collect();
    if matching.is_empty() {
        return Err(AppError::not_found("Location product not found"));
    }

    sheet::delete(store, &matching)?;
    Ok(())
}
