// Availability - canonical bookable slots for one business day
//
// Working hours are split in two intervals, morning [09:00, 14:00) and
// afternoon [16:00, 20:00), both naive local clinic time. Slots run at a
// fixed 15-minute cadence, start-inclusive end-exclusive. A slot is
// available iff its exact start instant is not occupied; there is no
// tolerance window.

use chrono::{Duration, NaiveDate, NaiveDateTime, NaiveTime};
use std::collections::HashSet;

const MORNING_START: (u32, u32) = (9, 0);
const MORNING_END: (u32, u32) = (14, 0);
const AFTERNOON_START: (u32, u32) = (16, 0);
const AFTERNOON_END: (u32, u32) = (20, 0);
const SLOT_MINUTES: i64 = 15;

fn interval_slots(date: NaiveDate, from: (u32, u32), to: (u32, u32), out: &mut Vec<NaiveDateTime>) {
    // Hard-coded interval bounds are always valid times
    let mut current = date.and_time(NaiveTime::from_hms_opt(from.0, from.1, 0).unwrap());
    let end = date.and_time(NaiveTime::from_hms_opt(to.0, to.1, 0).unwrap());

    while current < end {
        out.push(current);
        current += Duration::minutes(SLOT_MINUTES);
    }
}

/// All canonical slot start instants for one day (36 slots), in order.
pub fn canonical_slots(date: NaiveDate) -> Vec<NaiveDateTime> {
    let mut slots = Vec::with_capacity(36);
    interval_slots(date, MORNING_START, MORNING_END, &mut slots);
    interval_slots(date, AFTERNOON_START, AFTERNOON_END, &mut slots);
    slots
}

/// Bookable slots for one day: the canonical list minus the occupied
/// start instants, in chronological order (morning before afternoon).
///
/// Callers are expected to pre-filter dates through
/// [`crate::application::calendar::is_working_day`]; this function does
/// not reject non-business days itself.
pub fn available_slots(
    date: NaiveDate,
    occupied: &HashSet<NaiveDateTime>,
) -> Vec<NaiveDateTime> {
    canonical_slots(date)
        .into_iter()
        .filter(|slot| !occupied.contains(slot))
        .collect()
}
