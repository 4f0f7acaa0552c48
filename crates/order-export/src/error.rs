use thiserror::Error;

use crate::ExportFormat;

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("No hay datos para exportar")]
    Empty,
    #[error("Formato de exportación desconocido: {0} (use xlsx o pdf)")]
    UnknownFormat(String),
    #[error("Exportación {0} no disponible en esta compilación")]
    Disabled(ExportFormat),
    #[error("Error al generar Excel: {0}")]
    Xlsx(String),
    #[error("Error al generar PDF: {0}")]
    Pdf(String),
    #[error("Error al escribir el archivo: {0}")]
    Io(#[from] std::io::Error),
}
