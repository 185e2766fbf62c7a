use chrono::NaiveDateTime;

use crate::store::schema::{
    columns::*, format_number, format_optional_number, format_timestamp, parse_number, parse_optional_number,
    parse_timestamp,
};
use crate::store::sheet::SheetRow;
use crate::store::{HeaderIndex, Sheet};

#[derive(Debug, Clone, PartialEq)]
pub struct Product {
    pub code: String,
    pub category: String,
    pub name: String,
    pub internal_name: String,
    pub supplier_id: String,
    pub spec: String,
    pub unit_price: f64,
    pub case_quantity: Option<f64>,
    pub loose_unit: String,
    pub lot_size: Option<f64>,
    pub lot_unit: String,
    pub lead_time: Option<f64>,
    pub safety_stock: Option<f64>,
    pub notes: [String; 3],
    pub updated_at: Option<NaiveDateTime>,
}

impl SheetRow for Product {
    const SHEET: Sheet = Sheet::Products;

    fn from_row(index: &HeaderIndex, row: &[String]) -> Self {
        let text = |column: &str| index.cell(row, column).to_string();
        Self {
            code: text(PRODUCT_CODE),
            category: text(CATEGORY),
            name: text(PRODUCT_NAME),
            internal_name: text(INTERNAL_NAME),
            supplier_id: text(SUPPLIER_ID),
            spec: text(SPEC),
            unit_price: parse_number(index.cell(row, UNIT_PRICE)),
            case_quantity: parse_optional_number(index.cell(row, CASE_QUANTITY)),
            loose_unit: text(LOOSE_UNIT),
            lot_size: parse_optional_number(index.cell(row, LOT_SIZE)),
            lot_unit: text(LOT_UNIT),
            lead_time: parse_optional_number(index.cell(row, LEAD_TIME)),
            safety_stock: parse_optional_number(index.cell(row, SAFETY_STOCK)),
            notes: [text(NOTE_1), text(NOTE_2), text(NOTE_3)],
            updated_at: parse_timestamp(index.cell(row, UPDATED_AT)),
        }
    }

    fn write_row(&self, index: &HeaderIndex, row: &mut Vec<String>) {
        index.set(row, PRODUCT_CODE, self.code.as_str());
        index.set(row, CATEGORY, self.category.as_str());
        index.set(row, PRODUCT_NAME, self.name.as_str());
        index.set(row, INTERNAL_NAME, self.internal_name.as_str());
        index.set(row, SUPPLIER_ID, self.supplier_id.as_str());
        index.set(row, SPEC, self.spec.as_str());
        index.set(row, UNIT_PRICE, format_number(self.unit_price));
        index.set(row, CASE_QUANTITY, format_optional_number(self.case_quantity));
        index.set(row, LOOSE_UNIT, self.loose_unit.as_str());
        index.set(row, LOT_SIZE, format_optional_number(self.lot_size));
        index.set(row, LOT_UNIT, self.lot_unit.as_str());
        index.set(row, LEAD_TIME, format_optional_number(self.lead_time));
        index.set(row, SAFETY_STOCK, format_optional_number(self.safety_stock));
        index.set(row, NOTE_1, self.notes[0].as_str());
        index.set(row, NOTE_2, self.notes[1].as_str());
        index.set(row, NOTE_3, self.notes[2].as_str());
        index.set(row, UPDATED_AT, self.updated_at.map(format_timestamp).unwrap_or_default());
    }
}
