// Domain Layer - Pure business logic and entities

pub mod appointment;
pub mod error;

// Re-exports
pub use appointment::{Appointment, AppointmentKey, DEFAULT_VISIT_MINUTES};
pub use error::DomainError;
