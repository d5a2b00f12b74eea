// Application Layer - Use Cases and Business Logic

pub mod availability;
pub mod booking;
pub mod calendar;
pub mod reconcile;
pub mod sync;

// Re-exports
pub use availability::{available_slots, canonical_slots};
pub use booking::trigger_booking;
pub use calendar::is_working_day;
pub use reconcile::{ReconcilePlan, ReconcileSummary, ReconcileWindow};
pub use sync::sync_window;
