// Appointment Domain Model

use chrono::{Duration, NaiveDateTime};
use serde::{Deserialize, Serialize};

/// Default visit length when the external system omits the end time
pub const DEFAULT_VISIT_MINUTES: i64 = 15;

/// Identity key of an appointment inside the mirror.
///
/// The external scheduling system guarantees that within one agenda no two
/// appointments share a start instant, so (doctor, start) is unique.
/// Reconciliation compares snapshots on this key only.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AppointmentKey {
    pub doctor_name: String,
    pub start_time: NaiveDateTime,
}

/// Appointment entity mirrored from the external scheduling system.
///
/// All instants are naive local clinic time; callers normalize timezones
/// before anything enters the core.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Appointment {
    pub doctor_name: String,
    pub patient_name: String,
    pub start_time: NaiveDateTime,
    pub end_time: NaiveDateTime,
    pub agenda: Option<String>,
    pub center: Option<String>,
    pub visit_type: Option<String>,
}

impl Appointment {
    /// Create an appointment, defaulting the end time to start + 15 minutes
    /// when the snapshot did not carry one.
    pub fn new(
        doctor_name: impl Into<String>,
        patient_name: impl Into<String>,
        start_time: NaiveDateTime,
        end_time: Option<NaiveDateTime>,
    ) -> Self {
        Self {
            doctor_name: doctor_name.into(),
            patient_name: patient_name.into(),
            start_time,
            end_time: end_time
                .unwrap_or_else(|| start_time + Duration::minutes(DEFAULT_VISIT_MINUTES)),
            agenda: None,
            center: None,
            visit_type: None,
        }
    }

    pub fn key(&self) -> AppointmentKey {
        AppointmentKey {
            doctor_name: self.doctor_name.clone(),
            start_time: self.start_time,
        }
    }
}
