// src/services/hierarchy.rs
//! Category -> storage area -> detail tree with same-day count status.

use std::collections::{HashMap, HashSet};

use chrono::{Days, NaiveDate, NaiveDateTime};

use crate::dtos::location::{CategoryGroup, DetailNode, InventoryStatus, LocationProductStatus, StorageAreaNode};
use crate::models::{
    inventory_record::InventoryRecord,
    location::{Location, LocationProduct},
    product::Product,
};
use crate::services::natural::natural_cmp;
use crate::store::schema::{epoch, numeric_suffix};

pub const DEFAULT_CATEGORY_ORDER: [&str; 3] = ["Factory 1F", "Factory 2F", "Other"];

pub struct HierarchyInput<'a> {
    pub locations: &'a [Location],
    pub records: &'a [InventoryRecord],
    pub mappings: &'a [LocationProduct],
    pub products: &'a [Product],
}

/// Most recent record per (location id, product code). Compared by timestamp,
/// not row order; on equal timestamps the earlier row is kept.
pub fn latest_by_location_product(records: &[InventoryRecord]) -> HashMap<(&str, &str), &InventoryRecord> {
    let mut latest: HashMap<(&str, &str), &InventoryRecord> = HashMap::new();
    for record in records {
        let key = (record.location_id.as_str(), record.product_code.as_str());
        match latest.get(&key) {
            Some(current) if current.recorded_at >= record.recorded_at => {}
            _ => {
                latest.insert(key, record);
            }
        }
    }
    latest
}

/// Location ids with at least one record inside `today` (local calendar day).
pub fn recorded_on(records: &[InventoryRecord], today: NaiveDate) -> HashSet<&str> {
    let start = day_start(today);
    let end = today.checked_add_days(Days::new(1)).map(day_start);
    records
        .iter()
        .filter(|r| r.recorded_at >= start && end.map_or(true, |end| r.recorded_at < end))
        .map(|r| r.location_id.as_str())
        .collect()
}

fn day_start(day: NaiveDate) -> NaiveDateTime {
    day.and_hms_opt(0, 0, 0).unwrap_or_else(epoch)
}

struct CategoryBuilder {
    name: String,
    areas: Vec<StorageAreaNode>,
    area_positions: HashMap<String, usize>,
}

pub fn build_hierarchy(input: &HierarchyInput, today: NaiveDate, category_order: &[String]) -> Vec<CategoryGroup> {
    let product_names: HashMap<&str, &str> = input
        .products
        .iter()
        .map(|p| (p.code.as_str(), p.name.as_str()))
        .collect();

    let mut mapped: HashMap<&str, Vec<&str>> = HashMap::new();
    for mapping in input.mappings {
        mapped
            .entry(mapping.location_id.as_str())
            .or_default()
            .push(mapping.product_code.as_str());
    }

    let latest = latest_by_location_product(input.records);
    let recorded_today = recorded_on(input.records, today);
    let status_of = |id: &str| {
        if recorded_today.contains(id) {
            InventoryStatus::Recorded
        } else {
            InventoryStatus::Unrecorded
        }
    };

    let mut rows: Vec<&Location> = input
        .locations
        .iter()
        .filter(|l| !l.category.is_empty())
        .collect();
    rows.sort_by_key(|l| numeric_suffix(&l.id));

    let mut categories: Vec<CategoryBuilder> = Vec::new();
    let mut category_positions: HashMap<String, usize> = HashMap::new();

    for location in rows {
        let ci = *category_positions
            .entry(location.category.clone())
            .or_insert_with(|| {
                categories.push(CategoryBuilder {
                    name: location.category.clone(),
                    areas: Vec::new(),
                    area_positions: HashMap::new(),
                });
                categories.len() - 1
            });
        let category = &mut categories[ci];
        let status = status_of(&location.id);

        let ai = match category.area_positions.get(&location.storage_area) {
            Some(&ai) => {
                if location.detail.is_empty() {
                    category.areas[ai].inventory_status.promote(status);
                }
                ai
            }
            None => {
                category.areas.push(StorageAreaNode {
                    id: location.id.clone(),
                    name: location.storage_area.clone(),
                    inventory_status: status,
                    products: Vec::new(),
                    details: Vec::new(),
                });
                category
                    .area_positions
                    .insert(location.storage_area.clone(), category.areas.len() - 1);
                category.areas.len() - 1
            }
        };

        if !location.detail.is_empty() {
            category.areas[ai].details.push(DetailNode {
                id: location.id.clone(),
                name: location.detail.clone(),
                inventory_status: status,
                products: Vec::new(),
            });
        }
    }

    let products_at = |location_id: &str| -> Vec<LocationProductStatus> {
        mapped
            .get(location_id)
            .map(|codes| {
                codes
                    .iter()
                    .map(|&code| {
                        let last = latest.get(&(location_id, code));
                        LocationProductStatus {
                            product_code: code.to_string(),
                            product_name: product_names.get(code).copied().unwrap_or_default().to_string(),
                            quantity: last.map(|r| r.quantity()).unwrap_or(0.0),
                            recorded_at: last.map(|r| r.recorded_at).unwrap_or_else(epoch),
                        }
                    })
                    .collect()
            })
            .unwrap_or_default()
    };

    let mut groups: Vec<CategoryGroup> = categories
        .into_iter()
        .map(|category| {
            let mut storage_areas: Vec<StorageAreaNode> = category
                .areas
                .into_iter()
                .map(|mut node| {
                    node.products = products_at(&node.id);
                    for detail in &mut node.details {
                        detail.products = products_at(&detail.id);
                    }
                    if node.details.iter().any(|d| d.inventory_status == InventoryStatus::Recorded) {
                        node.inventory_status = InventoryStatus::Recorded;
                    }
                    node.details.sort_by(|a, b| natural_cmp(&a.id, &b.id));
                    node
                })
                .collect();
            storage_areas.sort_by(|a, b| natural_cmp(&a.id, &b.id));
            CategoryGroup {
                category: category.name,
                storage_areas,
            }
        })
        .collect();

    let rank = |name: &str| category_order.iter().position(|c| c == name);
    groups.sort_by(|a, b| match (rank(&a.category), rank(&b.category)) {
        (Some(x), Some(y)) => x.cmp(&y),
        (Some(_), None) => std::cmp::Ordering::Less,
        (None, Some(_)) => std::cmp::Ordering::Greater,
        (None, None) => natural_cmp(&a.category, &b.category),
    });
    groups
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::schema::parse_timestamp;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, 12).unwrap()
    }

    fn order() -> Vec<String> {
        DEFAULT_CATEGORY_ORDER.iter().map(|c| c.to_string()).collect()
    }

    fn location(id: &str, category: &str, area: &str, detail: &str) -> Location {
        Location {
            id: id.to_string(),
            category: category.to_string(),
            storage_area: area.to_string(),
            detail: detail.to_string(),
            notes: String::new(),
        }
    }

    fn record(location: &str, product: &str, at: &str, lot: f64, piece: f64) -> InventoryRecord {
        InventoryRecord {
            recorded_at: parse_timestamp(at).unwrap(),
            product_code: product.to_string(),
            location_id: location.to_string(),
            lot_quantity: lot,
            lot_unit: String::new(),
            piece_quantity: piece,
            piece_unit: String::new(),
            unit_price: 0.0,
            counter: String::new(),
            notes: String::new(),
        }
    }

    fn mapping(location: &str, product: &str) -> LocationProduct {
        LocationProduct {
            location_id: location.to_string(),
            product_code: product.to_string(),
        }
    }

    fn product(code: &str, name: &str) -> Product {
        Product {
            code: code.to_string(),
            category: String::new(),
            name: name.to_string(),
            internal_name: String::new(),
            supplier_id: String::new(),
            spec: String::new(),
            unit_price: 0.0,
            case_quantity: None,
            loose_unit: String::new(),
            lot_size: None,
            lot_unit: String::new(),
            lead_time: None,
            safety_stock: None,
            notes: Default::default(),
            updated_at: None,
        }
    }

    fn build(
        locations: &[Location],
        records: &[InventoryRecord],
        mappings: &[LocationProduct],
        products: &[Product],
    ) -> Vec<CategoryGroup> {
        let input = HierarchyInput {
            locations,
            records,
            mappings,
            products,
        };
        build_hierarchy(&input, today(), &order())
    }

    #[test]
    fn detail_counted_today_promotes_its_storage_area() {
        let locations = vec![location("A", "Factory 1F", "Rack A", ""), location("A-1", "Factory 1F", "Rack A", "①")];
        let records = vec![
            record("A", "P1", "2024-06-01 10:00:00", 1.0, 0.0),
            record("A-1", "P1", "2024-06-12 09:30:00", 2.0, 0.0),
        ];

        let groups = build(&locations, &records, &[], &[]);

        let area = &groups[0].storage_areas[0];
        assert_eq!(area.id, "A");
        assert_eq!(area.inventory_status, InventoryStatus::Recorded);
        assert_eq!(area.details[0].id, "A-1");
        assert_eq!(area.details[0].inventory_status, InventoryStatus::Recorded);
    }

    #[test]
    fn records_outside_today_leave_locations_unrecorded() {
        let locations = vec![location("L1", "Factory 1F", "Rack A", ""), location("L2", "Factory 1F", "Rack A", "①")];
        let records = vec![
            record("L1", "P1", "2024-06-11 23:59:59", 1.0, 0.0),
            record("L2", "P1", "2024-06-13 00:00:00", 1.0, 0.0),
        ];

        let groups = build(&locations, &records, &[], &[]);

        let area = &groups[0].storage_areas[0];
        assert_eq!(area.inventory_status, InventoryStatus::Unrecorded);
        assert_eq!(area.details[0].inventory_status, InventoryStatus::Unrecorded);
    }

    #[test]
    fn area_row_counted_today_is_recorded_even_when_first_seen_via_a_detail() {
        let locations = vec![
            location("L1", "Factory 1F", "Rack A", "①"),
            location("L2", "Factory 1F", "Rack A", ""),
        ];
        let records = vec![record("L2", "P1", "2024-06-12 08:00:00", 1.0, 0.0)];

        let groups = build(&locations, &records, &[], &[]);

        let area = &groups[0].storage_areas[0];
        assert_eq!(area.id, "L1");
        assert_eq!(area.inventory_status, InventoryStatus::Recorded);
        assert_eq!(area.details[0].inventory_status, InventoryStatus::Unrecorded);
    }

    #[test]
    fn categories_follow_preferred_order_then_natural_order() {
        let locations = vec![
            location("L1", "Warehouse 10", "X", ""),
            location("L2", "Other", "X", ""),
            location("L3", "Warehouse 9", "X", ""),
            location("L4", "Factory 2F", "X", ""),
            location("L5", "Factory 1F", "X", ""),
            location("L6", "", "ignored", ""),
        ];

        let groups = build(&locations, &[], &[], &[]);

        let names: Vec<&str> = groups.iter().map(|g| g.category.as_str()).collect();
        assert_eq!(
            names,
            vec!["Factory 1F", "Factory 2F", "Other", "Warehouse 9", "Warehouse 10"]
        );
    }

    #[test]
    fn products_carry_latest_quantity_or_zero() {
        let locations = vec![location("L1", "Factory 1F", "Rack A", "")];
        let records = vec![
            record("L1", "P1", "2024-05-20 10:00:00", 9.0, 9.0),
            record("L1", "P1", "2024-05-31 10:00:00", 2.0, 3.0),
            record("L1", "P1", "2024-05-25 10:00:00", 7.0, 0.0),
            record("L9", "P1", "2024-06-01 10:00:00", 100.0, 0.0),
        ];
        let mappings = vec![mapping("L1", "P1"), mapping("L1", "P2")];
        let products = vec![product("P1", "Bolt"), product("P2", "Nut")];

        let groups = build(&locations, &records, &mappings, &products);

        let products = &groups[0].storage_areas[0].products;
        assert_eq!(products.len(), 2);
        assert_eq!(products[0].product_name, "Bolt");
        assert_eq!(products[0].quantity, 5.0);
        assert_eq!(products[0].recorded_at, parse_timestamp("2024-05-31 10:00:00").unwrap());
        assert_eq!(products[1].product_name, "Nut");
        assert_eq!(products[1].quantity, 0.0);
        assert_eq!(products[1].recorded_at, epoch());
    }

    #[test]
    fn rows_are_grouped_by_numeric_id_order_and_sorted_naturally() {
        let locations = vec![
            location("L10", "Factory 1F", "Rack B", "②"),
            location("L2", "Factory 1F", "Rack A", ""),
            location("L3", "Factory 1F", "Rack A", "②"),
            location("L11", "Factory 1F", "Rack A", "①"),
            location("L9", "Factory 1F", "Rack B", ""),
        ];

        let groups = build(&locations, &[], &[], &[]);

        let areas = &groups[0].storage_areas;
        let area_ids: Vec<&str> = areas.iter().map(|a| a.id.as_str()).collect();
        assert_eq!(area_ids, vec!["L2", "L9"]);
        let detail_ids: Vec<&str> = areas[0].details.iter().map(|d| d.id.as_str()).collect();
        assert_eq!(detail_ids, vec!["L3", "L11"]);
        assert_eq!(areas[1].details[0].name, "②");
    }

    #[test]
    fn empty_tables_give_an_empty_tree() {
        assert!(build(&[], &[], &[], &[]).is_empty());
    }
}
