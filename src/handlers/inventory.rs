// src/handlers/inventory.rs
use std::collections::HashMap;

use chrono::{Datelike, NaiveDate, NaiveDateTime};
use tracing::{info, instrument};

use crate::dtos::inventory::{CreateInventoryRecordRequest, InventoryRecordResponse, ReportQuery, ReportRow};
use crate::error::AppError;
use crate::models::{
    inventory_record::InventoryRecord,
    location::Location,
    product::Product,
    supplier::Supplier,
};
use crate::services::matcher::records_for_month;
use crate::services::natural::natural_cmp;
use crate::store::{sheet, TableStore};

// addInventoryRecord - Append one row per counted item, freezing today's unit price
#[instrument(skip(store, req), fields(location_id = %req.location_id, items = req.items.len()))]
pub fn add_inventory_record(
    store: &dyn TableStore,
    req: CreateInventoryRecordRequest,
    now: NaiveDateTime,
) -> Result<Vec<InventoryRecordResponse>, AppError> {
    if req.items.is_empty() {
        return Err(AppError::validation("At least one item is required"));
    }
    if req.counter.trim().is_empty() {
        return Err(AppError::validation("Counter name is required"));
    }

    let locations = sheet::load::<Location>(store)?;
    if locations.find(|l| l.id == req.location_id).is_none() {
        return Err(AppError::not_found("Location not found"));
    }
    let products = sheet::load::<Product>(store)?;
    let by_code: HashMap<&str, &Product> = products.values().map(|p| (p.code.as_str(), p)).collect();
    let records_index = sheet::header_index::<InventoryRecord>(store)?;

    // validate everything before the first append
    let mut pending = Vec::with_capacity(req.items.len());
    for item in req.items {
        let product = by_code
            .get(item.product_code.as_str())
            .ok_or_else(|| AppError::not_found(format!("Product {} not found", item.product_code)))?;
        if item.lot_quantity < 0.0 || item.piece_quantity < 0.0 {
            return Err(AppError::validation("Quantities cannot be negative"));
        }
        if !item.lot_quantity.is_finite() || !item.piece_quantity.is_finite() {
            return Err(AppError::validation("Quantities must be numbers"));
        }
        pending.push(InventoryRecord {
            recorded_at: now,
            product_code: product.code.clone(),
            location_id: req.location_id.clone(),
            lot_quantity: item.lot_quantity,
            lot_unit: item.lot_unit.unwrap_or_else(|| product.lot_unit.clone()),
            piece_quantity: item.piece_quantity,
            piece_unit: item.piece_unit.unwrap_or_else(|| product.loose_unit.clone()),
            unit_price: product.unit_price,
            counter: req.counter.trim().to_string(),
            notes: item.notes.unwrap_or_else(|| req.notes.clone()),
        });
    }

    sheet::append_all(store, &records_index, &pending)?;

    info!(count = pending.len(), "Inventory recorded");
    Ok(pending.into_iter().map(InventoryRecordResponse::from).collect())
}

/// Resolves an optional year/month pair, defaulting to the month of `today`.
pub fn resolve_month(query: ReportQuery, today: NaiveDate) -> Result<(i32, u32), AppError> {
    match (query.year, query.month) {
        (None, None) => Ok((today.year(), today.month())),
        (Some(year), Some(month)) if (1..=12).contains(&month) => Ok((year, month)),
        (Some(_), Some(_)) => Err(AppError::validation("month must be between 1 and 12")),
        _ => Err(AppError::validation("year and month must be given together")),
    }
}

// getInventoryRecordsJson - One record per product, closest to the month end
#[instrument(skip(store))]
pub fn report_rows(store: &dyn TableStore, year: i32, month: u32) -> Result<Vec<ReportRow>, AppError> {
    let records = sheet::load::<InventoryRecord>(store)?.into_values();
    let products = sheet::load::<Product>(store)?.into_values();
    let suppliers = sheet::load::<Supplier>(store)?.into_values();
    let locations = sheet::load::<Location>(store)?.into_values();

    let product_by_code: HashMap<&str, &Product> = products.iter().map(|p| (p.code.as_str(), p)).collect();
    let supplier_names: HashMap<&str, &str> = suppliers.iter().map(|s| (s.id.as_str(), s.name.as_str())).collect();
    let location_by_id: HashMap<&str, &Location> = locations.iter().map(|l| (l.id.as_str(), l)).collect();

    let matched = records_for_month(&records, year, month)
        .ok_or_else(|| AppError::validation(format!("Invalid target month {year}-{month}")))?;
    let mut rows: Vec<ReportRow> = matched
        .into_iter()
        .map(|record| {
            let product = product_by_code.get(record.product_code.as_str()).copied();
            let location = location_by_id.get(record.location_id.as_str()).copied();
            let supplier_name = product
                .and_then(|p| supplier_names.get(p.supplier_id.as_str()).copied())
                .unwrap_or_default();
            ReportRow {
                recorded_at: record.recorded_at,
                location_id: record.location_id.clone(),
                location_category: location.map(|l| l.category.clone()).unwrap_or_default(),
                storage_area: location.map(|l| l.storage_area.clone()).unwrap_or_default(),
                detail: location.map(|l| l.detail.clone()).unwrap_or_default(),
                product_code: record.product_code.clone(),
                product_name: product.map(|p| p.name.clone()).unwrap_or_default(),
                product_category: product.map(|p| p.category.clone()).unwrap_or_default(),
                supplier_name: supplier_name.to_string(),
                lot_quantity: record.lot_quantity,
                lot_unit: record.lot_unit.clone(),
                piece_quantity: record.piece_quantity,
                piece_unit: record.piece_unit.clone(),
                quantity: record.quantity(),
                unit_price: record.unit_price,
                amount: record.amount(),
                counter: record.counter.clone(),
                notes: record.notes.clone(),
            }
        })
        .collect();

    rows.sort_by(|a, b| {
        natural_cmp(&a.location_id, &b.location_id).then_with(|| natural_cmp(&a.product_code, &b.product_code))
    });
    info!(rows = rows.len(), "Inventory report built");
    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dtos::inventory::InventoryItem;
    use crate::store::schema::parse_timestamp;
    use crate::store::{MemoryStore, Sheet, StoreError, Table};
    use std::io;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn at(value: &str) -> NaiveDateTime {
        parse_timestamp(value).unwrap()
    }

    fn seeded() -> MemoryStore {
        let store = MemoryStore::seeded();
        store
            .append_row(
                Sheet::Suppliers,
                vec!["S001".into(), "Acme".into(), String::new(), String::new()],
            )
            .unwrap();
        store
            .append_row(Sheet::Locations, vec!["L1".into(), "Factory 1F".into(), "Rack A".into(), "".into(), "".into()])
            .unwrap();
        store
            .append_row(Sheet::Locations, vec!["L2".into(), "Factory 1F".into(), "Rack A".into(), "①".into(), "".into()])
            .unwrap();
        for (code, name, price) in [("P1", "Bolt", "100"), ("P2", "Nut", "5.5")] {
            let mut row = vec![String::new(); Sheet::Products.columns().len()];
            row[0] = code.into();
            row[2] = name.into();
            row[4] = "S001".into();
            row[6] = price.into();
            row[8] = "pc".into();
            row[10] = "case".into();
            store.append_row(Sheet::Products, row).unwrap();
        }
        store
    }

    /// Accepts only whole-batch appends and counts them.
    struct BatchOnlyStore {
        inner: MemoryStore,
        batches: AtomicUsize,
    }

    impl TableStore for BatchOnlyStore {
        fn read(&self, sheet: Sheet) -> Result<Table, StoreError> {
            self.inner.read(sheet)
        }

        fn write(&self, sheet: Sheet, table: &Table) -> Result<(), StoreError> {
            self.inner.write(sheet, table)
        }

        fn has_sheet(&self, sheet: Sheet) -> Result<bool, StoreError> {
            self.inner.has_sheet(sheet)
        }

        fn append_row(&self, sheet: Sheet, _row: Vec<String>) -> Result<(), StoreError> {
            Err(StoreError::Io {
                sheet: sheet.name(),
                source: io::Error::new(io::ErrorKind::Other, "disk full"),
            })
        }

        fn append_rows(&self, sheet: Sheet, rows: Vec<Vec<String>>) -> Result<(), StoreError> {
            self.batches.fetch_add(1, Ordering::SeqCst);
            self.inner.append_rows(sheet, rows)
        }
    }

    fn item(code: &str, lot: f64, piece: f64) -> InventoryItem {
        InventoryItem {
            product_code: code.to_string(),
            lot_quantity: lot,
            lot_unit: None,
            piece_quantity: piece,
            piece_unit: None,
            notes: None,
        }
    }

    fn count(location: &str, items: Vec<InventoryItem>) -> CreateInventoryRecordRequest {
        CreateInventoryRecordRequest {
            location_id: location.to_string(),
            counter: "Sato".to_string(),
            notes: String::new(),
            items,
        }
    }

    fn set_price(store: &MemoryStore, code: &str, price: &str) {
        let mut products = store.read(Sheet::Products).unwrap();
        for row in products.rows.iter_mut().filter(|r| r[0] == code) {
            row[6] = price.to_string();
        }
        store.write(Sheet::Products, &products).unwrap();
    }

    #[test]
    fn records_copy_price_and_default_units() {
        let store = seeded();

        let created = add_inventory_record(
            &store,
            count("L1", vec![item("P1", 2.0, 3.0), item("P2", 0.0, 7.0)]),
            at("2024-05-30 10:00:00"),
        )
        .unwrap();

        assert_eq!(created.len(), 2);
        assert_eq!(created[0].unit_price, 100.0);
        assert_eq!(created[0].lot_unit, "case");
        assert_eq!(created[0].piece_unit, "pc");
        assert_eq!(created[1].unit_price, 5.5);
        assert_eq!(store.read(Sheet::InventoryRecords).unwrap().rows.len(), 2);
    }

    #[test]
    fn submission_is_written_in_one_batch() {
        let store = BatchOnlyStore {
            inner: seeded(),
            batches: AtomicUsize::new(0),
        };

        add_inventory_record(
            &store,
            count("L1", vec![item("P1", 2.0, 0.0), item("P2", 1.0, 4.0)]),
            at("2024-05-30 10:00:00"),
        )
        .unwrap();

        assert_eq!(store.batches.load(Ordering::SeqCst), 1);
        assert_eq!(store.read(Sheet::InventoryRecords).unwrap().rows.len(), 2);
    }

    #[test]
    fn unknown_product_appends_nothing() {
        let store = seeded();

        let err = add_inventory_record(
            &store,
            count("L1", vec![item("P1", 1.0, 0.0), item("P404", 1.0, 0.0)]),
            at("2024-05-30 10:00:00"),
        )
        .unwrap_err();

        assert!(matches!(err, AppError::NotFound(_)));
        assert!(store.read(Sheet::InventoryRecords).unwrap().rows.is_empty());
    }

    #[test]
    fn invalid_submissions_are_rejected() {
        let store = seeded();
        let now = at("2024-05-30 10:00:00");

        let err = add_inventory_record(&store, count("L1", vec![]), now).unwrap_err();
        assert!(matches!(err, AppError::ValidationError(_)));

        let err = add_inventory_record(&store, count("L1", vec![item("P1", -1.0, 0.0)]), now).unwrap_err();
        assert!(matches!(err, AppError::ValidationError(_)));

        let err = add_inventory_record(&store, count("L9", vec![item("P1", 1.0, 0.0)]), now).unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[test]
    fn report_keeps_recorded_price_after_product_price_changes() {
        let store = seeded();
        add_inventory_record(&store, count("L2", vec![item("P1", 2.0, 1.0)]), at("2024-05-30 10:00:00")).unwrap();
        set_price(&store, "P1", "250");

        let rows = report_rows(&store, 2024, 5).unwrap();

        assert_eq!(rows.len(), 1);
        let row = &rows[0];
        assert_eq!(row.quantity, 3.0);
        assert_eq!(row.unit_price, 100.0);
        assert_eq!(row.amount, 300.0);
        assert_eq!(row.product_name, "Bolt");
        assert_eq!(row.supplier_name, "Acme");
        assert_eq!(row.storage_area, "Rack A");
        assert_eq!(row.detail, "①");
    }

    #[test]
    fn report_prefers_the_count_just_after_month_end() {
        let store = seeded();
        add_inventory_record(&store, count("L1", vec![item("P1", 1.0, 0.0)]), at("2024-05-15 10:00:00")).unwrap();
        add_inventory_record(&store, count("L1", vec![item("P1", 9.0, 0.0)]), at("2024-06-10 10:00:00")).unwrap();
        add_inventory_record(&store, count("L2", vec![item("P2", 4.0, 0.0)]), at("2024-04-01 10:00:00")).unwrap();

        let rows = report_rows(&store, 2024, 5).unwrap();

        let summary: Vec<(&str, f64)> = rows.iter().map(|r| (r.product_code.as_str(), r.quantity)).collect();
        assert_eq!(summary, vec![("P1", 9.0), ("P2", 4.0)]);
    }

    #[test]
    fn month_defaults_to_today_and_is_validated() {
        let today = NaiveDate::from_ymd_opt(2024, 7, 3).unwrap();

        assert_eq!(resolve_month(ReportQuery::default(), today).unwrap(), (2024, 7));
        assert_eq!(
            resolve_month(ReportQuery { year: Some(2023), month: Some(12) }, today).unwrap(),
            (2023, 12)
        );
        assert!(resolve_month(ReportQuery { year: Some(2023), month: Some(13) }, today).is_err());
        assert!(resolve_month(ReportQuery { year: None, month: Some(5) }, today).is_err());
    }
}
