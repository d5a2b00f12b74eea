// Window Sync Use Case
//
// Takes a freshly observed snapshot (typically produced by the listing
// robot), computes the reconciliation plan, and applies it through the
// repository port. Deletes run before creates so a record that moved to a
// colliding start instant never trips the uniqueness invariant.

use crate::application::reconcile::{self, ReconcileSummary, ReconcileWindow};
use crate::domain::{Appointment, DomainError};
use crate::error::Result;
use crate::port::AppointmentRepository;
use tracing::info;

/// Reconcile the local mirror against one snapshot and apply the deltas.
///
/// The window is derived from the snapshot's min/max start instants; the
/// windowed local set is loaded through the repository port.
///
/// # Errors
/// - `AppError::Config` (via `DomainError::EmptySnapshot`) on an empty
///   snapshot
/// - repository errors from the persistence collaborator
pub async fn sync_window(
    repo: &dyn AppointmentRepository,
    incoming: &[Appointment],
    agenda: Option<String>,
) -> Result<ReconcileSummary> {
    // Derive bounds first so we only load the slice we are allowed to touch
    let start = incoming
        .iter()
        .map(|a| a.start_time)
        .min()
        .ok_or(DomainError::EmptySnapshot)?;
    let end = incoming
        .iter()
        .map(|a| a.start_time)
        .max()
        .ok_or(DomainError::EmptySnapshot)?;

    let local = repo.find_in_window(start, end, agenda.as_deref()).await?;

    let window = ReconcileWindow::new(start, end, agenda);
    let plan = reconcile::plan_in_window(window, incoming, &local);

    for appointment in &plan.to_delete {
        repo.delete(&appointment.doctor_name, appointment.start_time)
            .await?;
    }
    for appointment in &plan.to_create {
        repo.insert(appointment).await?;
    }

    let summary = plan.summary();
    info!(
        created = summary.created,
        deleted = summary.deleted,
        window_start = %summary.window_start,
        window_end = %summary.window_end,
        "Window sync applied"
    );

    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::port::appointment_repository::mocks::InMemoryAppointmentRepository;
    use chrono::{NaiveDate, NaiveDateTime};

    fn at(h: u32, m: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, 1, 6)
            .unwrap()
            .and_hms_opt(h, m, 0)
            .unwrap()
    }

    fn appt(doctor: &str, start: NaiveDateTime) -> Appointment {
        Appointment::new(doctor, "patient", start, None)
    }

    #[tokio::test]
    async fn test_sync_creates_and_deletes() {
        let repo = InMemoryAppointmentRepository::with_appointments(vec![
            appt("DrA", at(9, 0)),
            appt("DrA", at(9, 30)),
        ]);
        let incoming = vec![appt("DrA", at(9, 0)), appt("DrA", at(10, 0))];

        let summary = sync_window(&repo, &incoming, None).await.unwrap();
        assert_eq!(summary.created, 1);
        assert_eq!(summary.deleted, 1);

        let keys: Vec<_> = repo.all().iter().map(|a| a.start_time).collect();
        assert!(keys.contains(&at(9, 0)));
        assert!(keys.contains(&at(10, 0)));
        assert!(!keys.contains(&at(9, 30)));
    }

    #[tokio::test]
    async fn test_sync_twice_is_idempotent() {
        let repo = InMemoryAppointmentRepository::new();
        let incoming = vec![appt("DrA", at(9, 0)), appt("DrA", at(10, 0))];

        let first = sync_window(&repo, &incoming, None).await.unwrap();
        assert_eq!(first.created, 2);

        let second = sync_window(&repo, &incoming, None).await.unwrap();
        assert_eq!(second.created, 0);
        assert_eq!(second.deleted, 0);
    }

    #[tokio::test]
    async fn test_sync_empty_snapshot_fails() {
        let repo = InMemoryAppointmentRepository::new();
        let result = sync_window(&repo, &[], None).await;
        assert!(matches!(result, Err(crate::error::AppError::Config(_))));
    }

    #[tokio::test]
    async fn test_sync_leaves_out_of_window_records() {
        let repo = InMemoryAppointmentRepository::with_appointments(vec![
            appt("DrA", at(8, 0)),
            appt("DrA", at(12, 0)),
        ]);
        let incoming = vec![appt("DrA", at(9, 0)), appt("DrA", at(10, 0))];

        sync_window(&repo, &incoming, None).await.unwrap();

        let starts: Vec<_> = repo.all().iter().map(|a| a.start_time).collect();
        assert!(starts.contains(&at(8, 0)));
        assert!(starts.contains(&at(12, 0)));
    }
}
