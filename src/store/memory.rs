// src/store/memory.rs
use std::collections::HashMap;
use std::sync::RwLock;

use super::{Sheet, StoreError, Table, TableStore};

/// Process-local store. Contents are lost on restart.
#[derive(Debug, Default)]
pub struct MemoryStore {
    sheets: RwLock<HashMap<Sheet, Table>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// A store with every sheet present and empty.
    pub fn seeded() -> Self {
        let sheets = Sheet::ALL
            .into_iter()
            .map(|sheet| (sheet, Table::with_header(sheet.columns())))
            .collect();
        Self {
            sheets: RwLock::new(sheets),
        }
    }

    #[cfg(test)]
    pub fn remove_sheet(&self, sheet: Sheet) {
        self.sheets
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .remove(&sheet);
    }
}

impl TableStore for MemoryStore {
    fn read(&self, sheet: Sheet) -> Result<Table, StoreError> {
        self.sheets
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .get(&sheet)
            .cloned()
            .ok_or(StoreError::MissingSheet(sheet.name()))
    }

    fn write(&self, sheet: Sheet, table: &Table) -> Result<(), StoreError> {
        self.sheets
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .insert(sheet, table.clone());
        Ok(())
    }

    fn has_sheet(&self, sheet: Sheet) -> Result<bool, StoreError> {
        Ok(self
            .sheets
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .contains_key(&sheet))
    }

    fn append_rows(&self, sheet: Sheet, rows: Vec<Vec<String>>) -> Result<(), StoreError> {
        let mut sheets = self.sheets.write().unwrap_or_else(|poisoned| poisoned.into_inner());
        let table = sheets
            .get_mut(&sheet)
            .ok_or(StoreError::MissingSheet(sheet.name()))?;
        table.rows.extend(rows);
        Ok(())
    }
}
