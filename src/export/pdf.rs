// src/export/pdf.rs
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

use printpdf::{BuiltinFont, IndirectFontRef, Mm, PdfDocument, PdfDocumentReference};

use crate::dtos::inventory::ReportRow;
use crate::export::row_cells;

const PAGE_W: f32 = 297.0;
const PAGE_H: f32 = 210.0;
const MARGIN_X: f32 = 10.0;
const TOP_Y: f32 = 195.0;
const BOTTOM_Y: f32 = 15.0;
const LINE_H: f32 = 5.5;

/// Columns printed in the PDF: (export column index, header, x offset in mm).
const PDF_COLUMNS: [(usize, &str, f32); 9] = [
    (1, "Location", 0.0),
    (3, "Area", 22.0),
    (4, "Detail", 60.0),
    (5, "Code", 80.0),
    (6, "Product", 105.0),
    (13, "Qty", 175.0),
    (14, "Unit Price", 195.0),
    (15, "Amount", 220.0),
    (0, "Counted At", 245.0),
];

#[derive(Debug, thiserror::Error)]
pub enum PdfError {
    #[error("PDF font error: {0}")]
    Font(String),
    #[error("PDF write error: {0}")]
    Write(String),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

fn load_font(doc: &PdfDocumentReference, font_path: Option<&Path>) -> Result<IndirectFontRef, PdfError> {
    match font_path {
        // built-in fonts cannot draw CJK text
        Some(path) => doc
            .add_external_font(File::open(path)?)
            .map_err(|e| PdfError::Font(e.to_string())),
        None => doc
            .add_builtin_font(BuiltinFont::Helvetica)
            .map_err(|e| PdfError::Font(e.to_string())),
    }
}

fn truncate(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        text.to_string()
    } else {
        let mut cut: String = text.chars().take(max_chars.saturating_sub(1)).collect();
        cut.push('~');
        cut
    }
}

/// Landscape A4 table of the report, paginated.
pub fn write_pdf(path: &Path, title: &str, rows: &[ReportRow], font_path: Option<&Path>) -> Result<(), PdfError> {
    let (doc, page1, layer1) = PdfDocument::new(title, Mm(PAGE_W), Mm(PAGE_H), "Layer 1");
    let font = load_font(&doc, font_path)?;

    let mut layer = doc.get_page(page1).get_layer(layer1);
    let mut page_no = 1;

    let draw_header = |layer: &printpdf::PdfLayerReference, page_no: usize| -> f32 {
        layer.use_text(format!("{title}  (p.{page_no})"), 14.0, Mm(MARGIN_X), Mm(TOP_Y), &font);
        let header_y = TOP_Y - 10.0;
        for (_, header, x) in PDF_COLUMNS {
            layer.use_text(header, 9.0, Mm(MARGIN_X + x), Mm(header_y), &font);
        }
        header_y - LINE_H - 2.0
    };

    let mut y = draw_header(&layer, page_no);

    let mut total = 0.0;
    for row in rows {
        if y < BOTTOM_Y {
            let (page, page_layer) = doc.add_page(Mm(PAGE_W), Mm(PAGE_H), "Layer 1");
            layer = doc.get_page(page).get_layer(page_layer);
            page_no += 1;
            y = draw_header(&layer, page_no);
        }
        let cells = row_cells(row);
        for (index, _, x) in PDF_COLUMNS {
            let text = match index {
                6 => truncate(&cells[index].render(), 30),
                3 => truncate(&cells[index].render(), 16),
                _ => cells[index].render(),
            };
            layer.use_text(text, 8.0, Mm(MARGIN_X + x), Mm(y), &font);
        }
        total += row.amount;
        y -= LINE_H;
    }

    layer.use_text(
        format!("Items: {}   Total amount: {}", rows.len(), crate::store::schema::format_number(total)),
        10.0,
        Mm(MARGIN_X),
        Mm(y.max(BOTTOM_Y) - LINE_H),
        &font,
    );

    let mut writer = BufWriter::new(File::create(path)?);
    doc.save(&mut writer).map_err(|e| PdfError::Write(e.to_string()))
}
