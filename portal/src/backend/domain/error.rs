//! Error type shared by the record store, the blob store and the services built on them.

use thiserror::Error;

/// Every failure a portal operation can report.
///
/// Callers branch on the variant to decide what to tell the user; no operation
/// reports success after returning one of these.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PortalError {
    /// A student id was referenced that is not registered
    #[error("Unknown student: {0}")]
    UnknownStudent(String),

    /// Lookup by id or handle found nothing
    #[error("Not found: {0}")]
    NotFound(String),

    /// A field failed validation
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Payment amount was negative or not a finite number
    #[error("Invalid amount: {0}")]
    InvalidAmount(f64),

    /// Reading or writing the underlying storage failed
    #[error("Storage failure: {0}")]
    StorageFailure(String),
}

impl PortalError {
    /// Stable machine-readable name used in API error bodies
    pub fn kind(&self) -> &'static str {
        match self {
            PortalError::UnknownStudent(_) => "unknown_student",
            PortalError::NotFound(_) => "not_found",
            PortalError::InvalidInput(_) => "invalid_input",
            PortalError::InvalidAmount(_) => "invalid_amount",
            PortalError::StorageFailure(_) => "storage_failure",
        }
    }
}

impl From<std::io::Error> for PortalError {
    fn from(e: std::io::Error) -> Self {
        PortalError::StorageFailure(e.to_string())
    }
}

impl From<csv::Error> for PortalError {
    fn from(e: csv::Error) -> Self {
        PortalError::StorageFailure(e.to_string())
    }
}

pub type PortalResult<T> = Result<T, PortalError>;
