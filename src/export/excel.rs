// src/export/excel.rs
use std::path::Path;

use xlsxwriter::{Format, Workbook, XlsxError};

use crate::dtos::inventory::ReportRow;
use crate::export::{row_cells, Cell, EXPORT_HEADERS};

/// Writes the report as a single-sheet workbook at `path`.
pub fn write_workbook(path: &Path, sheet_name: &str, rows: &[ReportRow]) -> Result<(), XlsxError> {
    let path = path.to_string_lossy();
    let workbook = Workbook::new(&path)?;
    let mut worksheet = workbook.add_worksheet(Some(sheet_name))?;

    let mut bold = Format::new();
    bold.set_bold();

    for (col, header) in EXPORT_HEADERS.iter().enumerate() {
        worksheet.write_string(0, col as u16, header, Some(&bold))?;
    }

    for (row_idx, row) in rows.iter().enumerate() {
        let line = (row_idx + 1) as u32;
        for (col, cell) in row_cells(row).iter().enumerate() {
            match cell {
                Cell::Text(text) => worksheet.write_string(line, col as u16, text, None)?,
                Cell::Number(value) => worksheet.write_number(line, col as u16, *value, None)?,
            }
        }
    }

    workbook.close()
}
