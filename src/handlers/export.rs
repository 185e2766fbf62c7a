// src/handlers/export.rs
use std::path::Path;

use chrono::NaiveDateTime;
use tracing::{info, instrument};

use crate::dtos::inventory::{ExportFileResponse, ReportQuery, ReportRow};
use crate::error::AppError;
use crate::export::{csv::render_csv, excel::write_workbook, export_file_name, pdf::write_pdf};
use crate::handlers::inventory::{report_rows, resolve_month};
use crate::state::Settings;
use crate::store::TableStore;

fn month_rows(
    store: &dyn TableStore,
    query: ReportQuery,
    now: NaiveDateTime,
) -> Result<(i32, u32, Vec<ReportRow>), AppError> {
    let (year, month) = resolve_month(query, now.date())?;
    let rows = report_rows(store, year, month)?;
    Ok((year, month, rows))
}

fn prepare_export_dir(dir: &Path) -> Result<(), AppError> {
    std::fs::create_dir_all(dir)
        .map_err(|e| AppError::internal(format!("Cannot create export directory {}: {e}", dir.display())))
}

fn file_response(settings: &Settings, file_name: String, rows: usize) -> ExportFileResponse {
    ExportFileResponse {
        url: format!("{}/{file_name}", settings.files_base_url),
        file_name,
        rows,
    }
}

// exportInventoryRecordsCsv - Report as CSV text with a BOM
#[instrument(skip(store))]
pub fn export_csv(store: &dyn TableStore, query: ReportQuery, now: NaiveDateTime) -> Result<String, AppError> {
    let (_, _, rows) = month_rows(store, query, now)?;
    render_csv(&rows).map_err(|e| AppError::internal(format!("CSV export failed: {e}")))
}

// exportInventoryRecordsExcel - Report written to an .xlsx file
#[instrument(skip(store, settings))]
pub fn export_excel(
    store: &dyn TableStore,
    settings: &Settings,
    query: ReportQuery,
    now: NaiveDateTime,
) -> Result<ExportFileResponse, AppError> {
    let (year, month, rows) = month_rows(store, query, now)?;
    prepare_export_dir(&settings.export_dir)?;

    let file_name = export_file_name(year, month, now, "xlsx");
    let sheet_name = format!("{year:04}-{month:02}");
    write_workbook(&settings.export_dir.join(&file_name), &sheet_name, &rows)
        .map_err(|e| AppError::internal(format!("Excel export failed: {e}")))?;

    info!(file = %file_name, rows = rows.len(), "Excel export written");
    Ok(file_response(settings, file_name, rows.len()))
}

// exportInventoryRecordsPdf - Report written to a .pdf file
#[instrument(skip(store, settings))]
pub fn export_pdf(
    store: &dyn TableStore,
    settings: &Settings,
    query: ReportQuery,
    now: NaiveDateTime,
) -> Result<ExportFileResponse, AppError> {
    let (year, month, rows) = month_rows(store, query, now)?;
    prepare_export_dir(&settings.export_dir)?;

    let file_name = export_file_name(year, month, now, "pdf");
    let title = format!("Inventory {year:04}-{month:02} (generated {})", now.date());
    write_pdf(
        &settings.export_dir.join(&file_name),
        &title,
        &rows,
        settings.pdf_font_path.as_deref(),
    )
    .map_err(|e| AppError::internal(format!("PDF export failed: {e}")))?;

    info!(file = %file_name, rows = rows.len(), "PDF export written");
    Ok(file_response(settings, file_name, rows.len()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::schema::parse_timestamp;
    use crate::store::{MemoryStore, Sheet};

    fn settings(dir: &Path) -> Settings {
        Settings {
            category_order: Vec::new(),
            export_dir: dir.join("exports"),
            files_base_url: "http://localhost:3000/api/files".to_string(),
            pdf_font_path: None,
        }
    }

    fn store_with_count() -> MemoryStore {
        let store = MemoryStore::seeded();
        let mut product = vec![String::new(); Sheet::Products.columns().len()];
        product[0] = "P1".into();
        product[2] = "Bolt".into();
        product[6] = "10".into();
        store.append_row(Sheet::Products, product).unwrap();
        let mut record = vec![String::new(); Sheet::InventoryRecords.columns().len()];
        record[0] = "2024-05-31 17:00:00".into();
        record[1] = "P1".into();
        record[2] = "L001".into();
        record[3] = "2".into();
        record[5] = "1".into();
        record[7] = "10".into();
        store.append_row(Sheet::InventoryRecords, record).unwrap();
        store
    }

    fn may() -> ReportQuery {
        ReportQuery {
            year: Some(2024),
            month: Some(5),
        }
    }

    #[test]
    fn csv_export_has_bom_and_data() {
        let store = store_with_count();
        let now = parse_timestamp("2024-06-12 10:15:00").unwrap();

        let csv = export_csv(&store, may(), now).unwrap();

        assert!(csv.starts_with('\u{feff}'));
        assert_eq!(csv.lines().count(), 2);
        assert!(csv.contains("P1,Bolt"));
    }

    #[test]
    fn file_exports_land_in_export_dir() {
        let dir = tempfile::tempdir().unwrap();
        let settings = settings(dir.path());
        let store = store_with_count();
        let now = parse_timestamp("2024-06-12 10:15:00").unwrap();

        let excel = export_excel(&store, &settings, may(), now).unwrap();
        let pdf = export_pdf(&store, &settings, may(), now).unwrap();

        assert_eq!(excel.file_name, "inventory_202405_20240612T101500.xlsx");
        assert_eq!(
            pdf.url,
            "http://localhost:3000/api/files/inventory_202405_20240612T101500.pdf"
        );
        assert_eq!(pdf.rows, 1);
        assert!(settings.export_dir.join(&excel.file_name).is_file());
        assert!(settings.export_dir.join(&pdf.file_name).is_file());
    }

    #[test]
    fn invalid_month_is_rejected_before_writing() {
        let dir = tempfile::tempdir().unwrap();
        let settings = settings(dir.path());
        let store = store_with_count();
        let now = parse_timestamp("2024-06-12 10:15:00").unwrap();
        let query = ReportQuery {
            year: Some(2024),
            month: Some(0),
        };

        let err = export_pdf(&store, &settings, query, now).unwrap_err();

        assert!(matches!(err, AppError::ValidationError(_)));
        assert!(!settings.export_dir.exists());
    }
}
