// Appointment Repository Port (Interface)
// The relational store itself lives behind this port; the core only ever
// sees the windowed view it asked for.

use crate::domain::Appointment;
use crate::error::Result;
use async_trait::async_trait;
use chrono::NaiveDateTime;

/// Repository interface for the local appointment mirror
#[async_trait]
pub trait AppointmentRepository: Send + Sync {
    /// Insert a new appointment
    async fn insert(&self, appointment: &Appointment) -> Result<()>;

    /// Delete an appointment by identity key (doctor, start instant)
    async fn delete(&self, doctor_name: &str, start_time: NaiveDateTime) -> Result<()>;

    /// Find all appointments whose start instant lies in [start, end],
    /// optionally restricted to one agenda
    async fn find_in_window(
        &self,
        start: NaiveDateTime,
        end: NaiveDateTime,
        agenda: Option<&str>,
    ) -> Result<Vec<Appointment>>;
}

// ============================================================================
// Mock Implementations for Testing
// ============================================================================

pub mod mocks {
    use super::*;
    use std::sync::Mutex;

    /// In-memory repository for tests
    #[derive(Default)]
    pub struct InMemoryAppointmentRepository {
        appointments: Mutex<Vec<Appointment>>,
    }

    impl InMemoryAppointmentRepository {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn with_appointments(appointments: Vec<Appointment>) -> Self {
            Self {
                appointments: Mutex::new(appointments),
            }
        }

        pub fn all(&self) -> Vec<Appointment> {
            self.appointments.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl AppointmentRepository for InMemoryAppointmentRepository {
        async fn insert(&self, appointment: &Appointment) -> Result<()> {
            self.appointments.lock().unwrap().push(appointment.clone());
            Ok(())
        }

        async fn delete(&self, doctor_name: &str, start_time: NaiveDateTime) -> Result<()> {
            self.appointments
                .lock()
                .unwrap()
                .retain(|a| !(a.doctor_name == doctor_name && a.start_time == start_time));
            Ok(())
        }

        async fn find_in_window(
            &self,
            start: NaiveDateTime,
            end: NaiveDateTime,
            agenda: Option<&str>,
        ) -> Result<Vec<Appointment>> {
            Ok(self
                .appointments
                .lock()
                .unwrap()
                .iter()
                .filter(|a| a.start_time >= start && a.start_time <= end)
                .filter(|a| agenda.is_none() || a.agenda.as_deref() == agenda)
                .cloned()
                .collect())
        }
    }
}
