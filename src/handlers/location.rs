// src/handlers/location.rs
use chrono::NaiveDate;
use tracing::{info, instrument};

use crate::dtos::location::{
    CategoryGroup, CreateLocationRequest, DeleteLocationRequest, LocationResponse, UpdateLocationRequest,
};
use crate::error::AppError;
use crate::handlers::next_sequential_id;
use crate::models::{
    inventory_record::InventoryRecord,
    location::{Location, LocationProduct},
    product::Product,
};
use crate::services::hierarchy::{build_hierarchy, HierarchyInput};
use crate::store::schema::numeric_suffix;
use crate::store::{sheet, TableStore};

// getLocations - Category / storage area / detail tree with today's status
#[instrument(skip(store, category_order))]
pub fn get_locations(
    store: &dyn TableStore,
    today: NaiveDate,
    category_order: &[String],
) -> Result<Vec<CategoryGroup>, AppError> {
    let locations = sheet::load::<Location>(store)?.into_values();
    let records = sheet::load::<InventoryRecord>(store)?.into_values();
    let mappings = sheet::load::<LocationProduct>(store)?.into_values();
    let products = sheet::load::<Product>(store)?.into_values();

    let input = HierarchyInput {
        locations: &locations,
        records: &records,
        mappings: &mappings,
        products: &products,
    };
    Ok(build_hierarchy(&input, today, category_order))
}

// getLocationsMaster - Flat location rows ordered by id number
#[instrument(skip(store))]
pub fn list_locations(store: &dyn TableStore) -> Result<Vec<LocationResponse>, AppError> {
    let mut locations = sheet::load::<Location>(store)?.into_values();
    locations.sort_by_key(|l| numeric_suffix(&l.id));
    Ok(locations.into_iter().map(LocationResponse::from).collect())
}

// addLocation - Create location, generating an L### id when none is given
#[instrument(skip(store, req))]
pub fn create_location(store: &dyn TableStore, req: CreateLocationRequest) -> Result<LocationResponse, AppError> {
    if req.category.trim().is_empty() {
        return Err(AppError::validation("Category is required"));
    }

    let locations = sheet::load::<Location>(store)?;
    let id = match req.location_id.as_deref().map(str::trim) {
        Some(id) if !id.is_empty() => {
            if locations.find(|l| l.id == id).is_some() {
                return Err(AppError::conflict("Location ID already exists"));
            }
            id.to_string()
        }
        _ => next_sequential_id("L", locations.values().map(|l| l.id.as_str())),
    };

    let location = Location {
        id,
        category: req.category.trim().to_string(),
        storage_area: req.storage_area.trim().to_string(),
        detail: req.detail.trim().to_string(),
        notes: req.notes,
    };
    sheet::append(store, &locations.index, &location)?;

    info!(location_id = %location.id, "Location created");
    Ok(LocationResponse::from(location))
}

// editLocation - Update location fields; the id is the key and stays
#[instrument(skip(store, req), fields(location_id = %req.location_id))]
pub fn update_location(store: &dyn TableStore, req: UpdateLocationRequest) -> Result<LocationResponse, AppError> {
    let locations = sheet::load::<Location>(store)?;
    let entry = locations
        .find(|l| l.id == req.location_id)
        .ok_or_else(|| AppError::not_found("Location not found"))?;

    let mut location = entry.value.clone();
    if let Some(category) = req.category {
        if category.trim().is_empty() {
            return Err(AppError::validation("Category is required"));
        }
        location.category = category.trim().to_string();
    }
    if let Some(storage_area) = req.storage_area {
        location.storage_area = storage_area.trim().to_string();
    }
    if let Some(detail) = req.detail {
        location.detail = detail.trim().to_string();
    }
    if let Some(notes) = req.notes {
        location.notes = notes;
    }
    sheet::update(store, &locations.index, entry, &location)?;

    Ok(LocationResponse::from(location))
}

// deleteLocation - Delete location and its product mappings
#[instrument(skip(store, req), fields(location_id = %req.location_id))]
pub fn delete_location(store: &dyn TableStore, req: DeleteLocationRequest) -> Result<(), AppError> {
    let locations = sheet::load::<Location>(store)?;
    let entry = locations
        .find(|l| l.id == req.location_id)
        .ok_or_else(|| AppError::not_found("Location not found"))?;
    let mappings = sheet::load::<LocationProduct>(store)?;

    sheet::delete(store, &[entry])?;
    let stale: Vec<_> = mappings
        .entries
        .iter()
        .filter(|m| m.value.location_id == req.location_id)
        .collect();
    sheet::delete(store, &stale)?;

    info!(mappings_removed = stale.len(), "Location deleted");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dtos::location::InventoryStatus;
    use crate::store::{MemoryStore, Sheet};

    fn create(store: &MemoryStore, id: Option<&str>, area: &str, detail: &str) -> Result<LocationResponse, AppError> {
        create_location(
            store,
            CreateLocationRequest {
                location_id: id.map(str::to_string),
                category: "Factory 1F".to_string(),
                storage_area: area.to_string(),
                detail: detail.to_string(),
                notes: String::new(),
            },
        )
    }

    fn row_count(store: &MemoryStore) -> usize {
        store.read(Sheet::Locations).unwrap().rows.len()
    }

    #[test]
    fn add_edit_delete_round_trip_keeps_row_count() {
        let store = MemoryStore::seeded();
        create(&store, Some("L001"), "Rack A", "").unwrap();
        let before = row_count(&store);

        let added = create(&store, None, "Rack B", "①").unwrap();
        assert_eq!(added.location_id, "L002");
        assert_eq!(row_count(&store), before + 1);

        let edited = update_location(
            &store,
            UpdateLocationRequest {
                location_id: added.location_id.clone(),
                category: None,
                storage_area: Some("Rack C".to_string()),
                detail: None,
                notes: Some("moved".to_string()),
            },
        )
        .unwrap();
        assert_eq!(edited.storage_area, "Rack C");
        assert_eq!(edited.detail, "①");
        assert_eq!(row_count(&store), before + 1);

        delete_location(
            &store,
            DeleteLocationRequest {
                location_id: added.location_id,
            },
        )
        .unwrap();
        assert_eq!(row_count(&store), before);
    }

    #[test]
    fn duplicate_id_and_blank_category_are_rejected() {
        let store = MemoryStore::seeded();
        create(&store, Some("L001"), "Rack A", "").unwrap();

        let err = create(&store, Some("L001"), "Rack B", "").unwrap_err();
        assert!(matches!(err, AppError::Conflict(_)));

        let err = create_location(
            &store,
            CreateLocationRequest {
                location_id: None,
                category: " ".to_string(),
                storage_area: "Rack".to_string(),
                detail: String::new(),
                notes: String::new(),
            },
        )
        .unwrap_err();
        assert!(matches!(err, AppError::ValidationError(_)));
        assert_eq!(row_count(&store), 1);
    }

    #[test]
    fn delete_also_drops_mappings() {
        let store = MemoryStore::seeded();
        create(&store, Some("L001"), "Rack A", "").unwrap();
        store.append_row(Sheet::LocationProducts, vec!["L001".into(), "P1".into()]).unwrap();
        store.append_row(Sheet::LocationProducts, vec!["L002".into(), "P1".into()]).unwrap();

        delete_location(&store, DeleteLocationRequest { location_id: "L001".into() }).unwrap();

        let mappings = store.read(Sheet::LocationProducts).unwrap();
        assert_eq!(mappings.rows, vec![vec!["L002".to_string(), "P1".to_string()]]);
    }

    #[test]
    fn master_list_is_sorted_by_id_number() {
        let store = MemoryStore::seeded();
        create(&store, Some("L10"), "Rack A", "").unwrap();
        create(&store, Some("L9"), "Rack B", "").unwrap();

        let ids: Vec<String> = list_locations(&store).unwrap().into_iter().map(|l| l.location_id).collect();

        assert_eq!(ids, vec!["L9", "L10"]);
    }

    #[test]
    fn tree_reads_every_sheet() {
        let store = MemoryStore::seeded();
        create(&store, Some("L1"), "Rack A", "").unwrap();
        create(&store, Some("L2"), "Rack A", "①").unwrap();
        let today = NaiveDate::from_ymd_opt(2024, 6, 12).unwrap();
        let mut record = vec![String::new(); Sheet::InventoryRecords.columns().len()];
        record[0] = "2024-06-12 09:00:00".into();
        record[1] = "P1".into();
        record[2] = "L2".into();
        store.append_row(Sheet::InventoryRecords, record).unwrap();

        let tree = get_locations(&store, today, &["Factory 1F".to_string()]).unwrap();

        assert_eq!(tree.len(), 1);
        assert_eq!(tree[0].storage_areas[0].inventory_status, InventoryStatus::Recorded);
    }

    #[test]
    fn missing_sheet_fails_the_whole_tree() {
        let store = MemoryStore::seeded();
        store.remove_sheet(Sheet::LocationProducts);
        let today = NaiveDate::from_ymd_opt(2024, 6, 12).unwrap();

        let err = get_locations(&store, today, &[]).unwrap_err();

        assert!(matches!(err, AppError::StoreError(_)));
    }
}
