// Booking Trigger Use Case
//
// After an appointment is accepted locally, the real-world booking still
// has to happen in the legacy system, which only the 'agendar_cita' robot
// can mutate. This use case shapes the payload and hands it to the
// executor port; it does not retry - rollback on failure is the caller's
// decision.

use crate::domain::Appointment;
use crate::error::Result;
use crate::port::{DispatchOutcome, DispatchRequest, RobotExecutor};
use serde_json::json;
use tracing::{error, info};

/// Robot that performs the booking in the legacy system
pub const BOOKING_ROBOT: &str = "agendar_cita";

/// Trigger the booking robot for one appointment.
///
/// The robot's positional contract requires a visit type; an appointment
/// without one is rejected here rather than deep in the dispatcher.
///
/// # Errors
/// - `AppError::Validation` if the appointment has no visit type
/// - Propagates `DispatchError` from the executor (not found, spawn
///   failure, non-zero exit, timeout)
pub async fn trigger_booking(
    executor: &dyn RobotExecutor,
    appointment: &Appointment,
) -> Result<DispatchOutcome> {
    let Some(visit_type) = appointment.visit_type.as_deref() else {
        return Err(crate::error::AppError::Validation(
            "booking requires a visit type".to_string(),
        ));
    };

    let payload = json!({
        "patient_name": appointment.patient_name,
        "agenda": appointment.agenda.clone().unwrap_or_else(|| appointment.doctor_name.clone()),
        "start_time": appointment.start_time.format("%Y-%m-%dT%H:%M:%S").to_string(),
        "visit_type": visit_type,
    });

    let request = DispatchRequest::new(BOOKING_ROBOT, payload);

    info!(
        patient = %appointment.patient_name,
        start_time = %appointment.start_time,
        "Triggering booking robot"
    );

    match executor.dispatch(&request).await {
        Ok(outcome) => {
            info!(
                robot = %outcome.robot,
                duration_ms = outcome.duration_ms,
                "Booking robot completed"
            );
            Ok(outcome)
        }
        Err(e) => {
            error!(robot = BOOKING_ROBOT, error = %e, "Booking robot failed");
            Err(e.into())
        }
    }
}
