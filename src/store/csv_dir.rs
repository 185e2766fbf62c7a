// src/store/csv_dir.rs
use std::fs::{self, File, OpenOptions};
use std::io::{Read, Seek, SeekFrom, Write};
use std::path::PathBuf;
use std::sync::Mutex;

use super::{Sheet, StoreError, Table, TableStore};

const BOM: char = '\u{feff}';

/// One CSV file per sheet inside a data directory. The first line of each
/// file is the header row.
///
/// Writes go through a temp file and a rename, and are serialized within the
/// process. A read-modify-write made of several calls is still not atomic.
#[derive(Debug)]
pub struct CsvDirStore {
    dir: PathBuf,
    write_lock: Mutex<()>,
}

impl CsvDirStore {
    pub fn open(dir: impl Into<PathBuf>) -> std::io::Result<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir)?;
        Ok(Self {
            dir,
            write_lock: Mutex::new(()),
        })
    }

    fn path(&self, sheet: Sheet) -> PathBuf {
        self.dir.join(format!("{}.csv", sheet.name()))
    }
}

fn io_error(sheet: Sheet) -> impl FnOnce(std::io::Error) -> StoreError {
    move |source| StoreError::Io {
        sheet: sheet.name(),
        source,
    }
}

fn csv_error(sheet: Sheet) -> impl FnOnce(csv::Error) -> StoreError {
    move |source| StoreError::Csv {
        sheet: sheet.name(),
        source,
    }
}

impl TableStore for CsvDirStore {
    fn read(&self, sheet: Sheet) -> Result<Table, StoreError> {
        let path = self.path(sheet);
        if !path.exists() {
            return Err(StoreError::MissingSheet(sheet.name()));
        }
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .from_path(&path)
            .map_err(csv_error(sheet))?;

        let mut records = reader.records();
        let header = match records.next() {
            Some(first) => first
                .map_err(csv_error(sheet))?
                .iter()
                .enumerate()
                .map(|(i, cell)| if i == 0 { cell.trim_start_matches(BOM) } else { cell })
                .map(str::to_string)
                .collect(),
            None => Vec::new(),
        };
        let mut rows = Vec::new();
        for record in records {
            let record = record.map_err(csv_error(sheet))?;
            rows.push(record.iter().map(str::to_string).collect());
        }
        Ok(Table { header, rows })
    }

    fn write(&self, sheet: Sheet, table: &Table) -> Result<(), StoreError> {
        let _guard = self.write_lock.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        let path = self.path(sheet);
        let tmp = path.with_extension("csv.tmp");
        {
            let mut writer = csv::WriterBuilder::new()
                .flexible(true)
                .from_path(&tmp)
                .map_err(csv_error(sheet))?;
            writer.write_record(&table.header).map_err(csv_error(sheet))?;
            for row in &table.rows {
                writer.write_record(row).map_err(csv_error(sheet))?;
            }
            writer.flush().map_err(io_error(sheet))?;
        }
        fs::rename(&tmp, &path).map_err(io_error(sheet))
    }

    fn has_sheet(&self, sheet: Sheet) -> Result<bool, StoreError> {
        Ok(self.path(sheet).is_file())
    }

    fn append_rows(&self, sheet: Sheet, rows: Vec<Vec<String>>) -> Result<(), StoreError> {
        if rows.is_empty() {
            return Ok(());
        }
        let _guard = self.write_lock.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        let path = self.path(sheet);
        if !path.exists() {
            return Err(StoreError::MissingSheet(sheet.name()));
        }
        let mut file: File = OpenOptions::new()
            .read(true)
            .append(true)
            .open(&path)
            .map_err(io_error(sheet))?;

        // hand-saved files often lack the final newline
        let mut encoded = Vec::new();
        if !ends_with_newline(&mut file).map_err(io_error(sheet))? {
            encoded.push(b'\n');
        }
        let mut writer = csv::WriterBuilder::new().flexible(true).from_writer(encoded);
        for row in &rows {
            writer.write_record(row).map_err(csv_error(sheet))?;
        }
        let encoded = writer
            .into_inner()
            .map_err(|e| io_error(sheet)(e.into_error()))?;

        file.write_all(&encoded).map_err(io_error(sheet))?;
        file.flush().map_err(io_error(sheet))
    }
}

/// True for an empty file or one whose last byte is `\n`.
fn ends_with_newline(file: &mut File) -> std::io::Result<bool> {
    let len = file.metadata()?.len();
    if len == 0 {
        return Ok(true);
    }
    file.seek(SeekFrom::Start(len - 1))?;
    let mut last = [0u8; 1];
    file.read_exact(&mut last)?;
    Ok(last[0] == b'\n')
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::ensure_sheets;

    fn row(cells: &[&str]) -> Vec<String> {
        cells.iter().map(|c| c.to_string()).collect()
    }

    #[test]
    fn missing_file_is_a_missing_sheet() {
        let dir = tempfile::tempdir().unwrap();
        let store = CsvDirStore::open(dir.path()).unwrap();

        let err = store.read(Sheet::Products).unwrap_err();
        assert!(matches!(err, StoreError::MissingSheet("Products")));
        assert!(!store.has_sheet(Sheet::Products).unwrap());
    }

    #[test]
    fn writes_and_appends_survive_reopen() {
        let dir = tempfile::tempdir().unwrap();
        {
            let store = CsvDirStore::open(dir.path()).unwrap();
            ensure_sheets(&store).unwrap();
            store
                .append_row(Sheet::Locations, row(&["L001", "Factory 1F", "Rack, A", "", "quoted \"note\""]))
                .unwrap();
            store
                .append_row(Sheet::Locations, row(&["L002", "Factory 1F", "Rack B", "①", ""]))
                .unwrap();
        }

        let store = CsvDirStore::open(dir.path()).unwrap();
        let table = store.read(Sheet::Locations).unwrap();
        assert_eq!(table.header, row(Sheet::Locations.columns()));
        assert_eq!(table.rows.len(), 2);
        assert_eq!(table.rows[0][2], "Rack, A");
        assert_eq!(table.rows[0][4], "quoted \"note\"");
        assert_eq!(table.rows[1][3], "①");

        store.delete_row(Sheet::Locations, 0).unwrap();
        let table = store.read(Sheet::Locations).unwrap();
        assert_eq!(table.rows, vec![row(&["L002", "Factory 1F", "Rack B", "①", ""])]);
    }

    #[test]
    fn append_after_missing_final_newline_keeps_rows_apart() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("LocationProducts.csv"), "Location ID,Product Code\nL001,P1").unwrap();
        let store = CsvDirStore::open(dir.path()).unwrap();

        store.append_row(Sheet::LocationProducts, row(&["L002", "P2"])).unwrap();

        let table = store.read(Sheet::LocationProducts).unwrap();
        assert_eq!(table.rows, vec![row(&["L001", "P1"]), row(&["L002", "P2"])]);
    }

    #[test]
    fn append_rows_writes_the_whole_batch() {
        let dir = tempfile::tempdir().unwrap();
        let store = CsvDirStore::open(dir.path()).unwrap();
        ensure_sheets(&store).unwrap();
        store.append_row(Sheet::LocationProducts, row(&["L001", "P1"])).unwrap();

        store
            .append_rows(Sheet::LocationProducts, vec![row(&["L002", "P2"]), row(&["L003", "P3"])])
            .unwrap();
        store.append_rows(Sheet::LocationProducts, Vec::new()).unwrap();

        let table = store.read(Sheet::LocationProducts).unwrap();
        assert_eq!(
            table.rows,
            vec![row(&["L001", "P1"]), row(&["L002", "P2"]), row(&["L003", "P3"])]
        );
    }

    #[test]
    fn leading_bom_is_stripped_from_the_header() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join("LocationProducts.csv"),
            "\u{feff}Location ID,Product Code\nL001,P1\n",
        )
        .unwrap();
        let store = CsvDirStore::open(dir.path()).unwrap();

        let table = store.read(Sheet::LocationProducts).unwrap();
        assert_eq!(table.header, row(&["Location ID", "Product Code"]));
        assert_eq!(table.rows, vec![row(&["L001", "P1"])]);
    }
}
