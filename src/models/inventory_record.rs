use chrono::NaiveDateTime;

use crate::store::schema::{columns::*, epoch, format_number, format_timestamp, parse_number, parse_timestamp};
use crate::store::sheet::SheetRow;
use crate::store::{HeaderIndex, Sheet};

/// One physical count. Rows are only ever appended.
#[derive(Debug, Clone, PartialEq)]
pub struct InventoryRecord {
    pub recorded_at: NaiveDateTime,
    pub product_code: String,
    pub location_id: String,
    pub lot_quantity: f64,
    pub lot_unit: String,
    pub piece_quantity: f64,
    pub piece_unit: String,
    /// Product price at count time; never refreshed from the product sheet.
    pub unit_price: f64,
    pub counter: String,
    pub notes: String,
}

impl InventoryRecord {
    pub fn quantity(&self) -> f64 {
        self.lot_quantity + self.piece_quantity
    }

    pub fn amount(&self) -> f64 {
        self.quantity() * self.unit_price
    }
}

impl SheetRow for InventoryRecord {
    const SHEET: Sheet = Sheet::InventoryRecords;

    fn from_row(index: &HeaderIndex, row: &[String]) -> Self {
        let raw_time = index.cell(row, RECORDED_AT);
        let recorded_at = parse_timestamp(raw_time).unwrap_or_else(|| {
            tracing::warn!(value = raw_time, "Unparseable inventory timestamp, using epoch");
            epoch()
        });
        Self {
            recorded_at,
            product_code: index.cell(row, PRODUCT_CODE).to_string(),
            location_id: index.cell(row, LOCATION_ID).to_string(),
            lot_quantity: parse_number(index.cell(row, LOT_QUANTITY)),
            lot_unit: index.cell(row, LOT_UNIT).to_string(),
            piece_quantity: parse_number(index.cell(row, PIECE_QUANTITY)),
            piece_unit: index.cell(row, PIECE_UNIT).to_string(),
            unit_price: parse_number(index.cell(row, UNIT_PRICE)),
            counter: index.cell(row, COUNTER).to_string(),
            notes: index.cell(row, NOTES).to_string(),
        }
    }

    fn write_row(&self, index: &HeaderIndex, row: &mut Vec<String>) {
        index.set(row, RECORDED_AT, format_timestamp(self.recorded_at));
        index.set(row, PRODUCT_CODE, self.product_code.as_str());
        index.set(row, LOCATION_ID, self.location_id.as_str());
        index.set(row, LOT_QUANTITY, format_number(self.lot_quantity));
        index.set(row, LOT_UNIT, self.lot_unit.as_str());
        index.set(row, PIECE_QUANTITY, format_number(self.piece_quantity));
        index.set(row, PIECE_UNIT, self.piece_unit.as_str());
        index.set(row, UNIT_PRICE, format_number(self.unit_price));
        index.set(row, COUNTER, self.counter.as_str());
        index.set(row, NOTES, self.notes.as_str());
    }
}
