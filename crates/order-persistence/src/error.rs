//! Errores de persistencia.
//! Mapea errores de Diesel / pool / HTTP a variantes semánticas y de ahí a
//! `StoreError` del core.

use diesel::result::{DatabaseErrorKind, Error as DieselError};
use order_core::StoreError;
use order_domain::DomainError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PersistenceError {
    #[error("unique violation: {0}")]
    UniqueViolation(String),
    #[error("check violation: {0}")]
    CheckViolation(String),
    #[error("foreign key violation: {0}")]
    ForeignKeyViolation(String),
    #[error("not found")]
    NotFound,
    #[error("connection error: {0}")]
    Connection(String),
    #[error("http {status}: {message}")]
    Http { status: u16, message: String },
    #[error("invalid row: {0}")]
    InvalidRow(String),
    #[error("configuration error: {0}")]
    Config(String),
    #[error("unknown database error: {0}")]
    Unknown(String),
}

impl From<DieselError> for PersistenceError {
    fn from(err: DieselError) -> Self {
        match err {
            DieselError::NotFound => Self::NotFound,
            DieselError::DatabaseError(kind, info) => match kind {
                DatabaseErrorKind::UniqueViolation => Self::UniqueViolation(info.message().to_string()),
                DatabaseErrorKind::CheckViolation => Self::CheckViolation(info.message().to_string()),
                DatabaseErrorKind::ForeignKeyViolation => Self::ForeignKeyViolation(info.message().to_string()),
                DatabaseErrorKind::ClosedConnection => Self::Connection(info.message().to_string()),
                other => Self::Unknown(format!("db error kind {:?}: {}", other, info.message())),
            },
            DieselError::DeserializationError(e) => Self::InvalidRow(format!("deser: {e}")),
            DieselError::SerializationError(e) => Self::Unknown(format!("ser: {e}")),
            DieselError::QueryBuilderError(e) => Self::Unknown(format!("query builder: {e}")),
            DieselError::BrokenTransactionManager => Self::Connection("broken transaction manager".into()),
            other => Self::Unknown(format!("unhandled diesel error: {other:?}")),
        }
    }
}

impl From<DomainError> for PersistenceError {
    fn from(err: DomainError) -> Self { Self::InvalidRow(err.to_string()) }
}

#[cfg(feature = "rest")]
impl From<reqwest::Error> for PersistenceError {
    fn from(err: reqwest::Error) -> Self {
        match err.status() {
            Some(status) => Self::Http { status: status.as_u16(),
                                         message: err.to_string() },
            None => Self::Connection(err.to_string()),
        }
    }
}

impl From<PersistenceError> for StoreError {
    fn from(err: PersistenceError) -> Self {
        match err {
            PersistenceError::NotFound => StoreError::NotFound,
            PersistenceError::UniqueViolation(msg) => StoreError::Duplicate(msg),
            PersistenceError::InvalidRow(msg) => StoreError::InvalidData(msg),
            other => StoreError::Backend(other.to_string()),
        }
    }
}
