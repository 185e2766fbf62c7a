// src/export/csv.rs
use crate::dtos::inventory::ReportRow;
use crate::export::{row_cells, EXPORT_HEADERS};

/// Leading byte-order mark so spreadsheet apps open the file as UTF-8.
pub const UTF8_BOM: &str = "\u{feff}";

pub fn render_csv(rows: &[ReportRow]) -> Result<String, ::csv::Error> {
    let mut writer = ::csv::WriterBuilder::new()
        .terminator(::csv::Terminator::CRLF)
        .from_writer(UTF8_BOM.as_bytes().to_vec());
    writer.write_record(EXPORT_HEADERS)?;
    for row in rows {
        writer.write_record(row_cells(row).iter().map(|c| c.render()))?;
    }
    let bytes = writer.into_inner().map_err(|e| ::csv::Error::from(e.into_error()))?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}
