use std::process::ExitCode;

use order_core::ServiceError;
use order_domain::DomainError;
use order_export::ExportError;
use order_persistence::PersistenceError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CliError {
    #[error("{0}")]
    Usage(String),
    /// Validación o confirmación rechazada (mensaje del banner).
    #[error("{0}")]
    Rejected(String),
    /// Fallo del backend (mensaje del banner).
    #[error("{0}")]
    Failed(String),
    #[error(transparent)]
    Service(#[from] ServiceError),
    #[error(transparent)]
    Persistence(#[from] PersistenceError),
    #[error(transparent)]
    Export(#[from] ExportError),
    #[error("{0}")]
    Output(#[from] serde_json::Error),
}

impl From<DomainError> for CliError {
    fn from(e: DomainError) -> Self { CliError::Usage(e.to_string()) }
}

impl CliError {
    /// 2 uso, 4 rechazo, 5 backend.
    pub fn exit_code(&self) -> u8 {
        match self {
            CliError::Usage(_) => 2,
            CliError::Rejected(_) => 4,
            CliError::Service(e) if e.is_rejection() => 4,
            CliError::Export(ExportError::Empty) => 4,
            CliError::Export(ExportError::UnknownFormat(_)) => 2,
            _ => 5,
        }
    }
}

impl From<&CliError> for ExitCode {
    fn from(e: &CliError) -> Self { ExitCode::from(e.exit_code()) }
}
