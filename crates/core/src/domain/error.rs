// Domain Error Types

use thiserror::Error;

#[derive(Error, Debug)]
pub enum DomainError {
    #[error("Empty snapshot: reconciliation window cannot be derived from zero records")]
    EmptySnapshot,

    #[error("Appointment not found: {0}")]
    AppointmentNotFound(String),

    #[error("Validation error: {0}")]
    ValidationError(String),
}

pub type Result<T> = std::result::Result<T, DomainError>;
