// Port Layer - Interfaces for external dependencies

pub mod appointment_repository;
pub mod robot_executor;
pub mod time_provider;

// Re-exports
pub use appointment_repository::AppointmentRepository;
pub use robot_executor::{DispatchError, DispatchOutcome, DispatchRequest, RobotExecutor};
pub use time_provider::TimeProvider;
