// src/store/mod.rs
//! Sheet-style tabular storage.
//!
//! Every table is a header row plus data rows of string cells, the same shape
//! as a spreadsheet tab. Handlers never hold a store handle of their own; the
//! [`TableStore`] is injected through `AppState`.

mod csv_dir;
mod memory;
pub mod schema;
pub mod sheet;

pub use csv_dir::CsvDirStore;
pub use memory::MemoryStore;
pub use schema::{HeaderIndex, Sheet};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Sheet '{0}' not found")]
    MissingSheet(&'static str),

    #[error("Column '{column}' not found in sheet '{sheet}'")]
    MissingColumn {
        sheet: &'static str,
        column: &'static str,
    },

    #[error("Row {index} out of range in sheet '{sheet}'")]
    RowOutOfRange { sheet: &'static str, index: usize },

    #[error("I/O error on sheet '{sheet}': {source}")]
    Io {
        sheet: &'static str,
        #[source]
        source: std::io::Error,
    },

    #[error("CSV error on sheet '{sheet}': {source}")]
    Csv {
        sheet: &'static str,
        #[source]
        source: csv::Error,
    },
}

/// A whole sheet: header row plus data rows.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Table {
    pub header: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl Table {
    pub fn with_header(columns: &[&str]) -> Self {
        Self {
            header: columns.iter().map(|c| c.to_string()).collect(),
            rows: Vec::new(),
        }
    }
}

/// Storage backend for the named sheets.
///
/// Row indexes are zero-based positions among the data rows (the header row
/// is not counted). The row-level operations default to a whole-table
/// read-modify-write; backends override them where they can do better.
pub trait TableStore: Send + Sync {
    fn read(&self, sheet: Sheet) -> Result<Table, StoreError>;

    fn write(&self, sheet: Sheet, table: &Table) -> Result<(), StoreError>;

    fn has_sheet(&self, sheet: Sheet) -> Result<bool, StoreError>;

    fn append_row(&self, sheet: Sheet, row: Vec<String>) -> Result<(), StoreError> {
        self.append_rows(sheet, vec![row])
    }

    /// Appends every row in one write, so either all of them land or none do.
    fn append_rows(&self, sheet: Sheet, rows: Vec<Vec<String>>) -> Result<(), StoreError> {
        let mut table = self.read(sheet)?;
        table.rows.extend(rows);
        self.write(sheet, &table)
    }

    fn update_row(&self, sheet: Sheet, index: usize, row: Vec<String>) -> Result<(), StoreError> {
        let mut table = self.read(sheet)?;
        let slot = table.rows.get_mut(index).ok_or(StoreError::RowOutOfRange {
            sheet: sheet.name(),
            index,
        })?;
        *slot = row;
        self.write(sheet, &table)
    }

    fn delete_row(&self, sheet: Sheet, index: usize) -> Result<(), StoreError> {
        self.delete_rows(sheet, &[index])
    }

    /// Removes several rows in one rewrite. Indexes refer to the table as it
    /// was before the call.
    fn delete_rows(&self, sheet: Sheet, indexes: &[usize]) -> Result<(), StoreError> {
        let mut table = self.read(sheet)?;
        if let Some(&index) = indexes.iter().find(|&&i| i >= table.rows.len()) {
            return Err(StoreError::RowOutOfRange {
                sheet: sheet.name(),
                index,
            });
        }
        let mut position = 0;
        table.rows.retain(|_| {
            let keep = !indexes.contains(&position);
            position += 1;
            keep
        });
        self.write(sheet, &table)
    }
}

/// Creates every missing sheet with its canonical header row.
/// Returns the sheets that had to be created.
pub fn ensure_sheets(store: &dyn TableStore) -> Result<Vec<Sheet>, StoreError> {
    let mut created = Vec::new();
    for sheet in Sheet::ALL {
        if !store.has_sheet(sheet)? {
            store.write(sheet, &Table::with_header(sheet.columns()))?;
            created.push(sheet);
        }
    }
    Ok(created)
}
