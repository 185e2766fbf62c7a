// src/store/sheet.rs
//! Typed access on top of [`TableStore`]: rows are zipped against the header
//! once per load and converted into model structs.

use super::{HeaderIndex, Sheet, StoreError, TableStore};

/// A model stored as one row of a sheet.
pub trait SheetRow: Sized {
    const SHEET: Sheet;

    fn from_row(index: &HeaderIndex, row: &[String]) -> Self;

    /// Writes the model's columns into `row`, leaving other columns untouched.
    fn write_row(&self, index: &HeaderIndex, row: &mut Vec<String>);
}

#[derive(Debug, Clone)]
pub struct Entry<T> {
    /// Data row position in the sheet.
    pub row: usize,
    pub value: T,
    raw: Vec<String>,
}

/// One sheet loaded as typed rows. Blank rows are skipped but positions keep
/// counting them.
#[derive(Debug, Clone)]
pub struct Loaded<T> {
    pub index: HeaderIndex,
    pub entries: Vec<Entry<T>>,
}

impl<T: SheetRow> Loaded<T> {
    pub fn values(&self) -> impl Iterator<Item = &T> {
        self.entries.iter().map(|e| &e.value)
    }

    pub fn into_values(self) -> Vec<T> {
        self.entries.into_iter().map(|e| e.value).collect()
    }

    pub fn find(&self, predicate: impl Fn(&T) -> bool) -> Option<&Entry<T>> {
        self.entries.iter().find(|e| predicate(&e.value))
    }
}

pub fn load<T: SheetRow>(store: &dyn TableStore) -> Result<Loaded<T>, StoreError> {
    let table = store.read(T::SHEET)?;
    let index = HeaderIndex::load(T::SHEET, &table.header)?;
    let entries = table
        .rows
        .into_iter()
        .enumerate()
        .filter(|(_, raw)| raw.iter().any(|cell| !cell.trim().is_empty()))
        .map(|(row, raw)| Entry {
            row,
            value: T::from_row(&index, &raw),
            raw,
        })
        .collect();
    Ok(Loaded { index, entries })
}

/// Header of `T`'s sheet, checked for the required columns, without
/// converting any rows.
pub fn header_index<T: SheetRow>(store: &dyn TableStore) -> Result<HeaderIndex, StoreError> {
    let table = store.read(T::SHEET)?;
    HeaderIndex::load(T::SHEET, &table.header)
}

pub fn append<T: SheetRow>(store: &dyn TableStore, index: &HeaderIndex, value: &T) -> Result<(), StoreError> {
    let mut row = index.blank_row();
    value.write_row(index, &mut row);
    store.append_row(T::SHEET, row)
}

/// Appends all values with a single store write.
pub fn append_all<T: SheetRow>(store: &dyn TableStore, index: &HeaderIndex, values: &[T]) -> Result<(), StoreError> {
    let rows = values
        .iter()
        .map(|value| {
            let mut row = index.blank_row();
            value.write_row(index, &mut row);
            row
        })
        .collect();
    store.append_rows(T::SHEET, rows)
}

/// Rewrites an existing row in place, keeping cells of columns the model
/// does not know about.
pub fn update<T: SheetRow>(
    store: &dyn TableStore,
    index: &HeaderIndex,
    entry: &Entry<T>,
    value: &T,
) -> Result<(), StoreError> {
    let mut row = entry.raw.clone();
    value.write_row(index, &mut row);
    store.update_row(T::SHEET, entry.row, row)
}

pub fn delete<T: SheetRow>(store: &dyn TableStore, entries: &[&Entry<T>]) -> Result<(), StoreError> {
    if entries.is_empty() {
        return Ok(());
    }
    let rows: Vec<usize> = entries.iter().map(|e| e.row).collect();
    store.delete_rows(T::SHEET, &rows)
}
