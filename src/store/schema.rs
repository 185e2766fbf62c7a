// src/store/schema.rs
use std::collections::HashMap;

use chrono::{DateTime, Local, NaiveDate, NaiveDateTime, Timelike, Utc};

use super::StoreError;

/// Format used when writing timestamps into a sheet.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

pub mod columns {
    pub const PRODUCT_CODE: &str = "Product Code";
    pub const CATEGORY: &str = "Category";
    pub const PRODUCT_NAME: &str = "Product Name";
    pub const INTERNAL_NAME: &str = "Internal Name";
    pub const SUPPLIER_ID: &str = "Supplier ID";
    pub const SPEC: &str = "Spec";
    pub const UNIT_PRICE: &str = "Unit Price";
    pub const CASE_QUANTITY: &str = "Case Quantity";
    pub const LOOSE_UNIT: &str = "Loose Unit";
    pub const LOT_SIZE: &str = "Lot Size";
    pub const LOT_UNIT: &str = "Lot Unit";
    pub const LEAD_TIME: &str = "Lead Time";
    pub const SAFETY_STOCK: &str = "Safety Stock";
    pub const NOTE_1: &str = "Note 1";
    pub const NOTE_2: &str = "Note 2";
    pub const NOTE_3: &str = "Note 3";
    pub const UPDATED_AT: &str = "Updated At";

    pub const SUPPLIER_NAME: &str = "Supplier Name";
    pub const CONTACT: &str = "Contact";
    pub const ADDRESS: &str = "Address";

    pub const LOCATION_ID: &str = "Location ID";
    pub const STORAGE_AREA: &str = "Storage Area";
    pub const DETAIL: &str = "Detail";
    pub const NOTES: &str = "Notes";

    pub const RECORDED_AT: &str = "Recorded At";
    pub const LOT_QUANTITY: &str = "Lot Quantity";
    pub const PIECE_QUANTITY: &str = "Piece Quantity";
    pub const PIECE_UNIT: &str = "Piece Unit";
    pub const COUNTER: &str = "Counter";
}

use columns::*;

/// The named sheets of the workbook.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Sheet {
    Products,
    Suppliers,
    Locations,
    LocationProducts,
    InventoryRecords,
}

impl Sheet {
    pub const ALL: [Sheet; 5] = [
        Sheet::Products,
        Sheet::Suppliers,
        Sheet::Locations,
        Sheet::LocationProducts,
        Sheet::InventoryRecords,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Sheet::Products => "Products",
            Sheet::Suppliers => "Suppliers",
            Sheet::Locations => "Locations",
            Sheet::LocationProducts => "LocationProducts",
            Sheet::InventoryRecords => "InventoryRecords",
        }
    }

    /// Canonical header row. Every column listed here is required when the
    /// sheet is loaded.
    pub fn columns(self) -> &'static [&'static str] {
        match self {
            Sheet::Products => &[
                PRODUCT_CODE,
                CATEGORY,
                PRODUCT_NAME,
                INTERNAL_NAME,
                SUPPLIER_ID,
                SPEC,
                UNIT_PRICE,
                CASE_QUANTITY,
                LOOSE_UNIT,
                LOT_SIZE,
                LOT_UNIT,
                LEAD_TIME,
                SAFETY_STOCK,
                NOTE_1,
                NOTE_2,
                NOTE_3,
                UPDATED_AT,
            ],
            Sheet::Suppliers => &[SUPPLIER_ID, SUPPLIER_NAME, CONTACT, ADDRESS],
            Sheet::Locations => &[LOCATION_ID, CATEGORY, STORAGE_AREA, DETAIL, NOTES],
            Sheet::LocationProducts => &[LOCATION_ID, PRODUCT_CODE],
            Sheet::InventoryRecords => &[
                RECORDED_AT,
                PRODUCT_CODE,
                LOCATION_ID,
                LOT_QUANTITY,
                LOT_UNIT,
                PIECE_QUANTITY,
                PIECE_UNIT,
                UNIT_PRICE,
                COUNTER,
                NOTES,
            ],
        }
    }
}

/// Column name to position map for one loaded sheet.
#[derive(Debug, Clone)]
pub struct HeaderIndex {
    sheet: Sheet,
    width: usize,
    positions: HashMap<String, usize>,
}

impl HeaderIndex {
    pub fn new(sheet: Sheet, header: &[String]) -> Self {
        let mut positions = HashMap::with_capacity(header.len());
        for (i, name) in header.iter().enumerate() {
            // first occurrence wins for duplicated header names
            positions.entry(name.trim().to_string()).or_insert(i);
        }
        Self {
            sheet,
            width: header.len(),
            positions,
        }
    }

    /// Builds the index and checks that every canonical column is present.
    pub fn load(sheet: Sheet, header: &[String]) -> Result<Self, StoreError> {
        let index = Self::new(sheet, header);
        for &column in sheet.columns() {
            index.position(column)?;
        }
        Ok(index)
    }

    pub fn position(&self, column: &'static str) -> Result<usize, StoreError> {
        self.positions
            .get(column)
            .copied()
            .ok_or(StoreError::MissingColumn {
                sheet: self.sheet.name(),
                column,
            })
    }

    /// Trimmed cell value; short rows and unknown columns read as blank.
    pub fn cell<'r>(&self, row: &'r [String], column: &str) -> &'r str {
        self.positions
            .get(column)
            .and_then(|&i| row.get(i))
            .map(|v| v.trim())
            .unwrap_or("")
    }

    pub fn blank_row(&self) -> Vec<String> {
        vec![String::new(); self.width]
    }

    /// Writes a cell, padding short rows. Unknown columns are ignored.
    pub fn set(&self, row: &mut Vec<String>, column: &str, value: impl Into<String>) {
        if let Some(&i) = self.positions.get(column) {
            if row.len() <= i {
                row.resize(i + 1, String::new());
            }
            row[i] = value.into();
        }
    }
}

/// Numeric cell coercion: blank or garbage reads as 0.
pub fn parse_number(cell: &str) -> f64 {
    parse_optional_number(cell).unwrap_or(0.0)
}

pub fn parse_optional_number(cell: &str) -> Option<f64> {
    let cleaned: String = cell.trim().chars().filter(|c| *c != ',').collect();
    cleaned.parse::<f64>().ok().filter(|v| v.is_finite())
}

pub fn format_number(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        value.to_string()
    }
}

pub fn format_optional_number(value: Option<f64>) -> String {
    value.map(format_number).unwrap_or_default()
}

pub fn format_timestamp(value: NaiveDateTime) -> String {
    value.format(TIMESTAMP_FORMAT).to_string()
}

/// Current local time at the precision sheets store.
pub fn now_local() -> NaiveDateTime {
    let now = Local::now().naive_local();
    now.with_nanosecond(0).unwrap_or(now)
}

pub fn epoch() -> NaiveDateTime {
    DateTime::<Utc>::UNIX_EPOCH.naive_utc()
}

/// Parses the timestamp shapes that show up in hand-edited sheets.
/// Values with an offset are converted to local time.
pub fn parse_timestamp(cell: &str) -> Option<NaiveDateTime> {
    const DATE_TIME_FORMATS: [&str; 4] = [
        "%Y-%m-%d %H:%M:%S%.f",
        "%Y-%m-%dT%H:%M:%S%.f",
        "%Y/%m/%d %H:%M:%S",
        "%Y-%m-%d %H:%M",
    ];
    const DATE_FORMATS: [&str; 2] = ["%Y-%m-%d", "%Y/%m/%d"];

    let cell = cell.trim();
    if cell.is_empty() {
        return None;
    }
    if let Ok(with_offset) = DateTime::parse_from_rfc3339(cell) {
        return Some(with_offset.with_timezone(&Local).naive_local());
    }
    DATE_TIME_FORMATS
        .iter()
        .find_map(|f| NaiveDateTime::parse_from_str(cell, f).ok())
        .or_else(|| {
            DATE_FORMATS
                .iter()
                .find_map(|f| NaiveDate::parse_from_str(cell, f).ok())
                .and_then(|d| d.and_hms_opt(0, 0, 0))
        })
}

/// Digits embedded in an id, e.g. `L-012` -> 12. Ids without digits give 0.
pub fn numeric_suffix(id: &str) -> u64 {
    let digits: String = id.chars().filter(|c| c.is_ascii_digit()).collect();
    digits.parse().unwrap_or(0)
}
