use thiserror::Error;

use crate::celda::Celda;

/// Errores de validación del dominio. Los mensajes se muestran tal cual al
/// usuario, por eso van en español.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DomainError {
    #[error("Debe seleccionar \"Accesorio Extra\" para habilitar el formulario y poder agregar órdenes")]
    FormDisabled,
    #[error("Número de orden es requerido")]
    MissingOrderNumber,
    #[error("La orden debe tener al menos un accesorio")]
    NoAccessories,
    #[error("Cantidad inválida para {accessory}: {quantity}")]
    InvalidQuantity { accessory: String, quantity: i64 },
    #[error("Cantidad inválida para {accessory}: {raw}")]
    UnparsableQuantity { accessory: String, raw: String },
    #[error("Tipo de accesorio inválido: {0}")]
    UnknownAccessory(String),
    #[error("Debe seleccionar una celda. Opciones válidas: {}", Celda::options_label())]
    MissingCelda,
    #[error("Celda inválida. Opciones válidas: {}", Celda::options_label())]
    InvalidCelda(String),
    #[error("El texto de confirmación no coincide con el número de orden {expected}")]
    ConfirmationMismatch { expected: String },
    #[error("La orden {0} ya está cerrada")]
    AlreadyClosed(String),
    #[error("Fecha inválida (se espera AAAA-MM-DD): {0}")]
    InvalidDate(String),
    #[error("Esquema desconocido: {0} (use normalized o flat)")]
    UnknownLayout(String),
}
