use crate::store::schema::columns::*;
use crate::store::sheet::SheetRow;
use crate::store::{HeaderIndex, Sheet};

/// A storage area (blank `detail`) or one detail slot inside a storage area.
/// Rows sharing (category, storage_area) belong to the same area.
#[derive(Debug, Clone, PartialEq)]
pub struct Location {
    pub id: String,
    pub category: String,
    pub storage_area: String,
    pub detail: String,
    pub notes: String,
}

impl SheetRow for Location {
    const SHEET: Sheet = Sheet::Locations;

    fn from_row(index: &HeaderIndex, row: &[String]) -> Self {
        Self {
            id: index.cell(row, LOCATION_ID).to_string(),
            category: index.cell(row, CATEGORY).to_string(),
            storage_area: index.cell(row, STORAGE_AREA).to_string(),
            detail: index.cell(row, DETAIL).to_string(),
            notes: index.cell(row, NOTES).to_string(),
        }
    }

    fn write_row(&self, index: &HeaderIndex, row: &mut Vec<String>) {
        index.set(row, LOCATION_ID, self.id.as_str());
        index.set(row, CATEGORY, self.category.as_str());
        index.set(row, STORAGE_AREA, self.storage_area.as_str());
        index.set(row, DETAIL, self.detail.as_str());
        index.set(row, NOTES, self.notes.as_str());
    }
}

/// Declares that a product is counted at a location.
#[derive(Debug, Clone, PartialEq)]
pub struct LocationProduct {
    pub location_id: String,
    pub product_code: String,
}

impl SheetRow for LocationProduct {
    const SHEET: Sheet = Sheet::LocationProducts;

    fn from_row(index: &HeaderIndex, row: &[String]) -> Self {
        Self {
            location_id: index.cell(row, LOCATION_ID).to_string(),
            product_code: index.cell(row, PRODUCT_CODE).to_string(),
        }
    }

    fn write_row(&self, index: &HeaderIndex, row: &mut Vec<String>) {
        index.set(row, LOCATION_ID, self.location_id.as_str());
        index.set(row, PRODUCT_CODE, self.product_code.as_str());
    }
}
