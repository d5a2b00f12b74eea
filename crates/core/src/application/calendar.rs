// Working Calendar - Business-day policy for slot offering
//
// A date is a working day if it is a weekday and not a holiday. Holidays
// come in three flavors: fixed national dates, fixed regional dates
// (Comunidad de Madrid), and movable Easter-relative dates. The movable
// ones are kept in an explicit per-year table; years absent from the table
// are treated as having no movable holidays for this check. That is a
// documented limitation, not an approximation - the check degrades to
// weekend + fixed holidays for unknown years.

use chrono::{Datelike, NaiveDate, Weekday};

/// National fixed-date holidays (month, day), valid for every year
const NATIONAL_HOLIDAYS: &[(u32, u32)] = &[
    (1, 1),   // Año Nuevo
    (1, 6),   // Reyes
    (5, 1),   // Día del Trabajador
    (8, 15),  // Asunción
    (10, 12), // Fiesta Nacional
    (11, 1),  // Todos los Santos
    (12, 6),  // Constitución
    (12, 8),  // Inmaculada
    (12, 25), // Navidad
];

/// Regional fixed-date holidays (Comunidad de Madrid)
const REGIONAL_HOLIDAYS: &[(u32, u32)] = &[
    (5, 2),  // Fiesta de la Comunidad
    (11, 9), // Almudena
];

/// Movable Easter-relative holidays (Jueves Santo, Viernes Santo) per year
const MOVABLE_HOLIDAYS: &[(i32, &[(u32, u32)])] = &[
    (2024, &[(3, 28), (3, 29)]),
    (2025, &[(4, 17), (4, 18)]),
    (2026, &[(4, 2), (4, 3)]),
    (2027, &[(3, 25), (3, 26)]),
    (2028, &[(4, 13), (4, 14)]),
];

/// Check whether a calendar date is a business day.
///
/// Pure function: weekday test plus the holiday tables above, no I/O.
pub fn is_working_day(date: NaiveDate) -> bool {
    if matches!(date.weekday(), Weekday::Sat | Weekday::Sun) {
        return false;
    }

    let month_day = (date.month(), date.day());

    if NATIONAL_HOLIDAYS.contains(&month_day) || REGIONAL_HOLIDAYS.contains(&month_day) {
        return false;
    }

    if let Some((_, days)) = MOVABLE_HOLIDAYS.iter().find(|(y, _)| *y == date.year()) {
        if days.contains(&month_day) {
            return false;
        }
    }

    true
}
