// src/services/matcher.rs
//! Closest-date selection of one inventory record per product.

use std::collections::HashMap;

use chrono::{Months, NaiveDate, NaiveDateTime, NaiveTime};

use crate::models::inventory_record::InventoryRecord;

/// Last calendar day of the month at 23:59:59.999. `None` for an invalid
/// year/month.
pub fn month_end_cutoff(year: i32, month: u32) -> Option<NaiveDateTime> {
    let first = NaiveDate::from_ymd_opt(year, month, 1)?;
    let last = first.checked_add_months(Months::new(1))?.pred_opt()?;
    let time = NaiveTime::from_hms_milli_opt(23, 59, 59, 999)?;
    Some(last.and_time(time))
}

/// Picks, for every product present in `records`, the record closest to
/// `cutoff`: the earliest one strictly after it if any exists, otherwise the
/// latest one at or before it.
///
/// Output follows the first appearance of each product code. On equal
/// timestamps the earlier row wins.
pub fn closest_records(records: &[InventoryRecord], cutoff: NaiveDateTime) -> Vec<&InventoryRecord> {
    #[derive(Default)]
    struct Best<'a> {
        after: Option<&'a InventoryRecord>,
        before: Option<&'a InventoryRecord>,
    }

    let mut order: Vec<&str> = Vec::new();
    let mut best: HashMap<&str, Best> = HashMap::new();

    for record in records {
        let slot = best.entry(record.product_code.as_str()).or_insert_with(|| {
            order.push(record.product_code.as_str());
            Best::default()
        });
        if record.recorded_at > cutoff {
            if slot.after.map_or(true, |current| record.recorded_at < current.recorded_at) {
                slot.after = Some(record);
            }
        } else if slot.before.map_or(true, |current| record.recorded_at > current.recorded_at) {
            slot.before = Some(record);
        }
    }

    order
        .into_iter()
        .filter_map(|code| {
            let slot = best.get(code)?;
            slot.after.or(slot.before)
        })
        .collect()
}

/// Convenience wrapper over [`closest_records`] for a target month.
pub fn records_for_month(records: &[InventoryRecord], year: i32, month: u32) -> Option<Vec<&InventoryRecord>> {
    month_end_cutoff(year, month).map(|cutoff| closest_records(records, cutoff))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::schema::parse_timestamp;

    fn record(product: &str, location: &str, at: &str, lot: f64, piece: f64) -> InventoryRecord {
        InventoryRecord {
            recorded_at: parse_timestamp(at).unwrap(),
            product_code: product.to_string(),
            location_id: location.to_string(),
            lot_quantity: lot,
            lot_unit: "case".to_string(),
            piece_quantity: piece,
            piece_unit: "pc".to_string(),
            unit_price: 100.0,
            counter: "tester".to_string(),
            notes: String::new(),
        }
    }

    fn dates(selected: &[&InventoryRecord]) -> Vec<String> {
        selected
            .iter()
            .map(|r| format!("{}@{}", r.product_code, r.recorded_at.format("%Y-%m-%d")))
            .collect()
    }

    #[test]
    fn cutoff_is_the_last_millisecond_of_the_month() {
        let cutoff = month_end_cutoff(2024, 2).unwrap();
        assert_eq!(cutoff.to_string(), "2024-02-29 23:59:59.999");
        assert_eq!(month_end_cutoff(2024, 12).unwrap().to_string(), "2024-12-31 23:59:59.999");
        assert!(month_end_cutoff(2024, 13).is_none());
        assert!(month_end_cutoff(2024, 0).is_none());
    }

    #[test]
    fn single_record_before_month_end_is_selected() {
        let records = vec![record("P1", "L1", "2024-05-30", 2.0, 1.0)];

        let selected = records_for_month(&records, 2024, 5).unwrap();

        assert_eq!(selected.len(), 1);
        assert_eq!(selected[0].quantity(), 3.0);
    }

    #[test]
    fn record_after_cutoff_beats_record_before() {
        let records = vec![
            record("P1", "L1", "2024-05-15", 1.0, 0.0),
            record("P1", "L1", "2024-06-10", 5.0, 0.0),
        ];

        let selected = records_for_month(&records, 2024, 5).unwrap();

        assert_eq!(dates(&selected), vec!["P1@2024-06-10"]);
    }

    #[test]
    fn earliest_after_and_latest_before_are_preferred() {
        let records = vec![
            record("P1", "L1", "2024-07-01", 1.0, 0.0),
            record("P1", "L1", "2024-06-02", 1.0, 0.0),
            record("P1", "L1", "2024-06-20", 1.0, 0.0),
            record("P2", "L1", "2024-04-01", 1.0, 0.0),
            record("P2", "L1", "2024-05-31 23:59:59", 1.0, 0.0),
            record("P2", "L1", "2024-05-02", 1.0, 0.0),
        ];

        let selected = records_for_month(&records, 2024, 5).unwrap();

        assert_eq!(dates(&selected), vec!["P1@2024-06-02", "P2@2024-05-31"]);
    }

    #[test]
    fn exactly_one_record_per_product() {
        let records = vec![
            record("P1", "L1", "2024-03-01", 1.0, 0.0),
            record("P2", "L2", "2024-03-05", 1.0, 0.0),
            record("P1", "L2", "2024-03-07", 1.0, 0.0),
            record("P3", "L1", "2024-09-01", 1.0, 0.0),
            record("P2", "L1", "2024-08-01", 1.0, 0.0),
        ];

        let selected = records_for_month(&records, 2024, 3).unwrap();

        let codes: Vec<&str> = selected.iter().map(|r| r.product_code.as_str()).collect();
        assert_eq!(codes, vec!["P1", "P2", "P3"]);
    }

    #[test]
    fn empty_input_gives_empty_output() {
        assert!(records_for_month(&[], 2024, 5).unwrap().is_empty());
    }

    #[test]
    fn equal_timestamps_keep_the_first_row() {
        let records = vec![
            record("P1", "first", "2024-06-03", 1.0, 0.0),
            record("P1", "second", "2024-06-03", 1.0, 0.0),
            record("P2", "first", "2024-05-03", 1.0, 0.0),
            record("P2", "second", "2024-05-03", 1.0, 0.0),
        ];

        let selected = records_for_month(&records, 2024, 5).unwrap();

        assert!(selected.iter().all(|r| r.location_id == "first"));
    }
}
