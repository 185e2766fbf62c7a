use crate::store::schema::columns::*;
use crate::store::sheet::SheetRow;
use crate::store::{HeaderIndex, Sheet};

#[derive(Debug, Clone, PartialEq)]
pub struct Supplier {
    pub id: String,
    pub name: String,
    pub contact: String,
    pub address: String,
}

impl SheetRow for Supplier {
    const SHEET: Sheet = Sheet::Suppliers;

    fn from_row(index: &HeaderIndex, row: &[String]) -> Self {
        Self {
            id: index.cell(row, SUPPLIER_ID).to_string(),
            name: index.cell(row, SUPPLIER_NAME).to_string(),
            contact: index.cell(row, CONTACT).to_string(),
            address: index.cell(row, ADDRESS).to_string(),
        }
    }

    fn write_row(&self, index: &HeaderIndex, row: &mut Vec<String>) {
        index.set(row, SUPPLIER_ID, self.id.as_str());
        index.set(row, SUPPLIER_NAME, self.name.as_str());
        index.set(row, CONTACT, self.contact.as_str());
        index.set(row, ADDRESS, self.address.as_str());
    }
}
