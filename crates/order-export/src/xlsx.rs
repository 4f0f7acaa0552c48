use log::debug;
use rust_xlsxwriter::{Format, Workbook, XlsxError};

use crate::{ExportError, ExportTable, SHEET_NAME};

impl From<XlsxError> for ExportError {
    fn from(e: XlsxError) -> Self { ExportError::Xlsx(e.to_string()) }
}

/// Libro con una hoja `Ordenes_Accesorios`: encabezados en negrita y una
/// fila por orden.
pub fn to_xlsx(table: &ExportTable) -> Result<Vec<u8>, ExportError> {
    let mut workbook = Workbook::new();
    let bold = Format::new().set_bold();
    let sheet = workbook.add_worksheet();
    sheet.set_name(SHEET_NAME)?;
    for (col, header) in table.headers.iter().enumerate() {
        let col = col as u16;
        sheet.write_string_with_format(0, col, header, &bold)?;
        sheet.set_column_width(col, if header == "Accesorios" { 40 } else { 16 })?;
    }
    for (row_idx, row) in table.rows.iter().enumerate() {
        let row_num = row_idx as u32 + 1;
        for (col, value) in row.iter().enumerate() {
            sheet.write_string(row_num, col as u16, value)?;
        }
    }
    let bytes = workbook.save_to_buffer()?;
    debug!("xlsx rows={} bytes={}", table.len(), bytes.len());
    Ok(bytes)
}
