//! order-export: reporte de las órdenes mostradas en Excel o PDF.
//!
//! `ExportTable` aplana cada orden en una fila (los accesorios como
//! `bolsa x2, gorra x1`). Cada formato vive detrás de su feature (`xlsx`,
//! `pdf`), ambas activas por defecto.

pub mod error;
#[cfg(feature = "pdf")]
pub mod pdf;
pub mod table;
#[cfg(feature = "xlsx")]
pub mod xlsx;

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use chrono::NaiveDateTime;
use log::info;

pub use error::ExportError;
pub use table::ExportTable;

pub const FILE_PREFIX: &str = "ordenes_accesorios";
pub const SHEET_NAME: &str = "Ordenes_Accesorios";
pub const REPORT_TITLE: &str = "Reporte de Órdenes de Accesorios";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Xlsx,
    Pdf,
}

impl ExportFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            ExportFormat::Xlsx => "xlsx",
            ExportFormat::Pdf => "pdf",
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(self.extension()) }
}

impl FromStr for ExportFormat {
    type Err = ExportError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "xlsx" | "excel" => Ok(ExportFormat::Xlsx),
            "pdf" => Ok(ExportFormat::Pdf),
            other => Err(ExportError::UnknownFormat(other.to_string())),
        }
    }
}

/// `ordenes_accesorios_AAAAMMDD_HHMMSS.ext`
pub fn export_file_name(format: ExportFormat, now: NaiveDateTime) -> String {
    format!("{FILE_PREFIX}_{}.{}", now.format("%Y%m%d_%H%M%S"), format.extension())
}

/// Genera los bytes del reporte. Una tabla vacía es un error.
pub fn render(table: &ExportTable, format: ExportFormat) -> Result<Vec<u8>, ExportError> {
    if table.is_empty() {
        return Err(ExportError::Empty);
    }
    match format {
        #[cfg(feature = "xlsx")]
        ExportFormat::Xlsx => xlsx::to_xlsx(table),
        #[cfg(feature = "pdf")]
        ExportFormat::Pdf => pdf::to_pdf(table),
        #[allow(unreachable_patterns)]
        other => Err(ExportError::Disabled(other)),
    }
}

/// Escribe el reporte en `dir` con el nombre estándar y devuelve la ruta.
pub fn write_export(table: &ExportTable, format: ExportFormat, dir: &Path, now: NaiveDateTime) -> Result<PathBuf, ExportError> {
    let bytes = render(table, format)?;
    let path = dir.join(export_file_name(format, now));
    std::fs::write(&path, &bytes)?;
    info!("export {} rows={} bytes={}", path.display(), table.len(), bytes.len());
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn file_name_uses_timestamp() {
        let now = NaiveDate::from_ymd_opt(2024, 3, 9).unwrap().and_hms_opt(7, 5, 3).unwrap();
        assert_eq!(export_file_name(ExportFormat::Xlsx, now), "ordenes_accesorios_20240309_070503.xlsx");
        assert_eq!(export_file_name(ExportFormat::Pdf, now), "ordenes_accesorios_20240309_070503.pdf");
    }

    #[test]
    fn format_parsing() {
        assert_eq!("Excel".parse::<ExportFormat>().unwrap(), ExportFormat::Xlsx);
        assert_eq!("pdf".parse::<ExportFormat>().unwrap(), ExportFormat::Pdf);
        assert!("csv".parse::<ExportFormat>().is_err());
    }
}
