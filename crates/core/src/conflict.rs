//! # Schedule Conflict Detection
//!
//! Decides whether two lesson schedules would ever put the same person in two
//! places at once. Two schedules conflict only when all three of these hold:
//!
//! 1. their calendar date ranges overlap (both ends inclusive)
//! 2. their meeting-day sets share at least one weekday label
//! 3. their daily time windows overlap (half-open, so back-to-back lessons
//!    do not conflict)
//!
//! The checks run from coarsest to finest and stop at the first one that
//! fails.

use chrono::{NaiveDate, NaiveTime};
use uuid::Uuid;

use crate::models::lesson::{LessonConflict, LessonSchedule};

const WEEKDAY_LABELS: [&str; 14] = [
    "monday", "mon", "tuesday", "tue", "wednesday", "wed", "thursday", "thu", "friday", "fri",
    "saturday", "sat", "sunday", "sun",
];

/// Trims and lowercases a weekday label.
///
/// Returns `None` for empty or unrecognized labels, which therefore never
/// match anything. Abbreviations are not expanded: `"Mon"` normalizes to
/// `"mon"`, which is a different label from `"monday"`.
pub fn normalize_day(label: &str) -> Option<String> {
    let normalized = label.trim().to_lowercase();
    WEEKDAY_LABELS
        .contains(&normalized.as_str())
        .then_some(normalized)
}

/// Half-open overlap of two daily time windows: `[a_start, a_end)` against
/// `[b_start, b_end)`.
///
/// `NaiveTime` carries no date, so only hour, minute and second take part.
pub fn time_ranges_overlap(
    a_start: NaiveTime,
    a_end: NaiveTime,
    b_start: NaiveTime,
    b_end: NaiveTime,
) -> bool {
    a_start < b_end && a_end > b_start
}

/// Inclusive overlap of two calendar ranges.
pub fn date_ranges_overlap(
    a_start: NaiveDate,
    a_end: NaiveDate,
    b_start: NaiveDate,
    b_end: NaiveDate,
) -> bool {
    a_start <= b_end && a_end >= b_start
}

/// True when the two sets share at least one recognized weekday label.
pub fn day_sets_overlap<A, B>(days_a: &[A], days_b: &[B]) -> bool
where
    A: AsRef<str>,
    B: AsRef<str>,
{
    let normalized_b: Vec<String> = days_b
        .iter()
        .filter_map(|day| normalize_day(day.as_ref()))
        .collect();

    days_a
        .iter()
        .filter_map(|day| normalize_day(day.as_ref()))
        .any(|day| normalized_b.contains(&day))
}

pub fn schedules_conflict(a: &LessonSchedule, b: &LessonSchedule) -> bool {
    if !date_ranges_overlap(a.start_date, a.end_date, b.start_date, b.end_date) {
        return false;
    }

    let days_a: Vec<&String> = a.meeting_days.iter().collect();
    let days_b: Vec<&String> = b.meeting_days.iter().collect();
    if !day_sets_overlap(&days_a, &days_b) {
        return false;
    }

    time_ranges_overlap(a.start_time, a.end_time, b.start_time, b.end_time)
}

/// Ids of every schedule in `others` that conflicts with `candidate`, in the
/// order they were given.
pub fn find_conflicts<'a, I>(candidate: &LessonSchedule, others: I) -> Vec<Uuid>
where
    I: IntoIterator<Item = (Uuid, &'a LessonSchedule)>,
{
    others
        .into_iter()
        .filter(|(_, other)| schedules_conflict(candidate, other))
        .map(|(id, _)| id)
        .collect()
}

/// Every unordered pair of conflicting schedules within one set, e.g. all the
/// lessons a single instructor teaches.
pub fn conflicting_pairs(lessons: &[(Uuid, LessonSchedule)]) -> Vec<LessonConflict> {
    let mut conflicts = Vec::new();
    for (i, (first_id, first)) in lessons.iter().enumerate() {
        for (second_id, second) in &lessons[i + 1..] {
            if schedules_conflict(first, second) {
                conflicts.push(LessonConflict {
                    first: *first_id,
                    second: *second_id,
                });
            }
        }
    }
    conflicts
}
