//! Reporte PDF apaisado y paginado con fuentes incorporadas (Helvetica).

use log::debug;
use printpdf::{BuiltinFont, IndirectFontRef, Mm, PdfDocument, PdfLayerReference};

use crate::{ExportError, ExportTable, REPORT_TITLE};

const PAGE_WIDTH: f32 = 279.4;
const PAGE_HEIGHT: f32 = 215.9;
const MARGIN: f32 = 12.0;
const LINE_HEIGHT: f32 = 6.0;
const FONT_SIZE: f32 = 9.0;
const LAYER: &str = "Capa 1";
/// Ancho de cada columna en mm (misma cantidad que los encabezados).
const COLUMN_WIDTHS: [f32; 8] = [14.0, 32.0, 70.0, 18.0, 24.0, 26.0, 30.0, 26.0];

fn pdf_err(e: impl std::fmt::Display) -> ExportError { ExportError::Pdf(e.to_string()) }

/// Recorta al ancho aproximado de la columna (Helvetica 9pt ≈ 1.9 mm/car.).
fn fit(text: &str, width: f32) -> String {
    let max_chars = ((width - 2.0) / 1.9).max(1.0) as usize;
    if text.chars().count() <= max_chars {
        return text.to_string();
    }
    let mut cut: String = text.chars().take(max_chars.saturating_sub(1)).collect();
    cut.push('…');
    cut
}

fn write_row(layer: &PdfLayerReference, cells: &[String], y: f32, font: &IndirectFontRef) {
    let mut x = MARGIN;
    for (cell, width) in cells.iter().zip(COLUMN_WIDTHS) {
        layer.use_text(fit(cell, width), FONT_SIZE, Mm(x), Mm(y), font);
        x += width;
    }
}

/// Filas que caben en una página debajo del título y los encabezados.
pub fn rows_per_page() -> usize { ((PAGE_HEIGHT - 2.0 * MARGIN - 3.0 * LINE_HEIGHT) / LINE_HEIGHT) as usize }

pub fn to_pdf(table: &ExportTable) -> Result<Vec<u8>, ExportError> {
    let (doc, first_page, first_layer) = PdfDocument::new(REPORT_TITLE, Mm(PAGE_WIDTH), Mm(PAGE_HEIGHT), LAYER);
    let regular = doc.add_builtin_font(BuiltinFont::Helvetica).map_err(pdf_err)?;
    let bold = doc.add_builtin_font(BuiltinFont::HelveticaBold).map_err(pdf_err)?;

    let per_page = rows_per_page().max(1);
    let chunks: Vec<&[Vec<String>]> = table.rows.chunks(per_page).collect();
    let total_pages = chunks.len();
    for (page_no, chunk) in chunks.into_iter().enumerate() {
        let layer = if page_no == 0 {
            doc.get_page(first_page).get_layer(first_layer)
        } else {
            let (page, layer) = doc.add_page(Mm(PAGE_WIDTH), Mm(PAGE_HEIGHT), LAYER);
            doc.get_page(page).get_layer(layer)
        };
        let mut y = PAGE_HEIGHT - MARGIN;
        layer.use_text(REPORT_TITLE, 14.0, Mm(MARGIN), Mm(y), &bold);
        layer.use_text(format!("Página {} de {}", page_no + 1, total_pages),
                       FONT_SIZE,
                       Mm(PAGE_WIDTH - MARGIN - 30.0),
                       Mm(y),
                       &regular);
        y -= 2.0 * LINE_HEIGHT;
        write_row(&layer, &table.headers, y, &bold);
        for row in chunk {
            y -= LINE_HEIGHT;
            write_row(&layer, row, y, &regular);
        }
    }
    let bytes = doc.save_to_bytes().map_err(pdf_err)?;
    debug!("pdf rows={} pages={total_pages} bytes={}", table.len(), bytes.len());
    Ok(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn long_cells_are_cut_to_column() {
        let cut = fit("bolsa x2, pelota x1, gorra x3, guantes x1, kit x2, accesorio pequeño x9", 70.0);
        assert!(cut.ends_with('…'));
        assert!(cut.chars().count() <= 36);
        assert_eq!(fit("ORD-1", 32.0), "ORD-1");
    }
}
