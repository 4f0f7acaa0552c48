//! Errores del core. La taxonomía es la mínima: validación vs. todo lo demás.

use order_domain::DomainError;
use thiserror::Error;

/// Error devuelto por un `OrderStore`.
#[derive(Debug, Error, PartialEq, Eq, Clone)]
pub enum StoreError {
    #[error("Orden no encontrada")]
    NotFound,
    #[error("{0}")]
    Duplicate(String),
    #[error("datos inválidos en la base: {0}")]
    InvalidData(String),
    #[error("{0}")]
    Backend(String),
}

impl From<DomainError> for StoreError {
    fn from(e: DomainError) -> Self { StoreError::InvalidData(e.to_string()) }
}

/// Error del servicio: el mensaje ya viene listo para el banner.
#[derive(Debug, Error, PartialEq, Eq, Clone)]
pub enum ServiceError {
    #[error(transparent)]
    Validation(#[from] DomainError),
    #[error("El número de orden ya existe")]
    DuplicateOrderNumber(String),
    #[error("Orden no encontrada")]
    NotFound(i64),
    #[error("Database error: {0}")]
    Database(StoreError),
    #[error("Search error: {0}")]
    Search(StoreError),
    #[error("Get error: {0}")]
    Get(StoreError),
    #[error("Insert error: {0}")]
    Insert(StoreError),
    #[error("Update error: {0}")]
    Update(StoreError),
}

impl ServiceError {
    /// Rechazos del usuario (validación, duplicado, orden inexistente)
    /// frente a fallos del backend.
    pub fn is_rejection(&self) -> bool {
        matches!(self,
                 ServiceError::Validation(_) | ServiceError::DuplicateOrderNumber(_) | ServiceError::NotFound(_))
    }
}
