//! Rules for handing a lesson over to a covering instructor.

use uuid::Uuid;

use crate::{
    conflict::find_conflicts,
    errors::{SwimError, SwimResult},
    models::{
        coverage::{CoverageRequest, CoverageStatus},
        lesson::LessonSchedule,
    },
};

/// Checks that `covering_instructor_id` may take over `request`.
pub fn ensure_acceptable(request: &CoverageRequest, covering_instructor_id: Uuid) -> SwimResult<()> {
    if request.status != CoverageStatus::Open {
        return Err(SwimError::Conflict(format!(
            "Coverage request {} is already {}",
            request.id, request.status
        )));
    }

    if request.requesting_instructor_id == covering_instructor_id {
        return Err(SwimError::InvalidInput(
            "An instructor cannot cover their own lesson".to_string(),
        ));
    }

    Ok(())
}

/// The lesson must still belong to the instructor who asked for cover. A
/// request outlives the assignment it was opened against once the lesson has
/// been handed to someone else.
pub fn ensure_requester_assigned(
    request: &CoverageRequest,
    lesson_instructor_id: Option<Uuid>,
) -> SwimResult<()> {
    if lesson_instructor_id != Some(request.requesting_instructor_id) {
        return Err(SwimError::Conflict(format!(
            "Lesson {} is no longer taught by instructor {}",
            request.lesson_id, request.requesting_instructor_id
        )));
    }

    Ok(())
}

/// Rejects the handover when `lesson` overlaps anything the covering
/// instructor already teaches. `taught` should not contain the lesson itself.
pub fn check_coverage(lesson: &LessonSchedule, taught: &[(Uuid, LessonSchedule)]) -> SwimResult<()> {
    let conflicts = find_conflicts(lesson, taught.iter().map(|(id, schedule)| (*id, schedule)));

    if conflicts.is_empty() {
        return Ok(());
    }

    let ids: Vec<String> = conflicts.iter().map(Uuid::to_string).collect();
    Err(SwimError::Conflict(format!(
        "Lesson overlaps with lessons already taught by this instructor: {}",
        ids.join(", ")
    )))
}
