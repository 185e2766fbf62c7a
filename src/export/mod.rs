// src/export/mod.rs
//! Renderers for the inventory report. All formats share one fixed column
//! order.

pub mod csv;
pub mod excel;
pub mod pdf;

use crate::dtos::inventory::ReportRow;
use crate::store::schema::{format_number, format_timestamp};

pub const EXPORT_HEADERS: [&str; 18] = [
    "Recorded At",
    "Location ID",
    "Category",
    "Storage Area",
    "Detail",
    "Product Code",
    "Product Name",
    "Product Category",
    "Supplier",
    "Lot Quantity",
    "Lot Unit",
    "Piece Quantity",
    "Piece Unit",
    "Quantity",
    "Unit Price",
    "Amount",
    "Counter",
    "Notes",
];

/// A cell in export order. Numbers stay numeric for spreadsheet output.
#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Text(String),
    Number(f64),
}

impl Cell {
    pub fn render(&self) -> String {
        match self {
            Cell::Text(s) => s.clone(),
            Cell::Number(n) => format_number(*n),
        }
    }
}

pub fn row_cells(row: &ReportRow) -> [Cell; 18] {
    [
        Cell::Text(format_timestamp(row.recorded_at)),
        Cell::Text(row.location_id.clone()),
        Cell::Text(row.location_category.clone()),
        Cell::Text(row.storage_area.clone()),
        Cell::Text(row.detail.clone()),
        Cell::Text(row.product_code.clone()),
        Cell::Text(row.product_name.clone()),
        Cell::Text(row.product_category.clone()),
        Cell::Text(row.supplier_name.clone()),
        Cell::Number(row.lot_quantity),
        Cell::Text(row.lot_unit.clone()),
        Cell::Number(row.piece_quantity),
        Cell::Text(row.piece_unit.clone()),
        Cell::Number(row.quantity),
        Cell::Number(row.unit_price),
        Cell::Number(row.amount),
        Cell::Text(row.counter.clone()),
        Cell::Text(row.notes.clone()),
    ]
}

/// File name for a generated export, e.g. `inventory_202405_20240612T101500.xlsx`.
pub fn export_file_name(year: i32, month: u32, generated_at: chrono::NaiveDateTime, extension: &str) -> String {
    format!(
        "inventory_{year:04}{month:02}_{}.{extension}",
        generated_at.format("%Y%m%dT%H%M%S")
    )
}
