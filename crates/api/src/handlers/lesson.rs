use axum::{
    Json,
    extract::{Path, State},
};
use std::sync::Arc;
use swimbook_core::{
    conflict::schedules_conflict,
    errors::{SwimError, SwimResult},
    models::lesson::{
        CheckConflictRequest, CheckConflictResponse, CreateLessonRequest, LessonResponse,
        LessonSchedule,
    },
};
use swimbook_db::models::DbLesson;
use uuid::Uuid;

use crate::{ApiState, handlers::require_text, middleware::error_handling::AppError};

pub(crate) fn lesson_response(lesson: DbLesson, enrolled: i64) -> SwimResult<LessonResponse> {
    let schedule = lesson.schedule()?;
    Ok(LessonResponse {
        id: lesson.id,
        name: lesson.name,
        level: lesson.level,
        capacity: lesson.capacity,
        instructor_id: lesson.instructor_id,
        schedule,
        enrolled,
        created_at: lesson.created_at,
    })
}

fn validate_new_lesson(payload: &CreateLessonRequest) -> Result<Option<LessonSchedule>, AppError> {
    require_text(&payload.name, "name")?;

    if payload.capacity <= 0 {
        return Err(AppError(SwimError::InvalidInput(
            "capacity must be greater than zero".to_string(),
        )));
    }

    if payload.level < 0 {
        return Err(AppError(SwimError::InvalidInput(
            "level must not be negative".to_string(),
        )));
    }

    // A lesson may be created without a schedule, but not with half of one
    if payload.schedule.is_empty() {
        return Ok(None);
    }

    let schedule = LessonSchedule::try_from(payload.schedule.clone())?;
    schedule.validate()?;
    Ok(Some(schedule))
}

#[axum::debug_handler]
pub async fn create_lesson(
    State(state): State<Arc<ApiState>>,
    Json(payload): Json<CreateLessonRequest>,
) -> Result<Json<LessonResponse>, AppError> {
    let schedule = validate_new_lesson(&payload)?;

    if let Some(instructor_id) = payload.instructor_id {
        swimbook_db::repositories::instructor::get_instructor_by_id(&state.db_pool, instructor_id)
            .await
            .map_err(SwimError::Database)?
            .ok_or_else(|| {
                SwimError::NotFound(format!("Instructor with ID {} not found", instructor_id))
            })?;
    }

    let db_lesson = swimbook_db::repositories::lesson::create_lesson(
        &state.db_pool,
        payload.name.trim(),
        payload.level,
        payload.capacity,
        payload.instructor_id,
        schedule.as_ref(),
    )
    .await
    .map_err(SwimError::Database)?;

    tracing::info!("Created lesson {} ({})", db_lesson.id, db_lesson.name);
    Ok(Json(lesson_response(db_lesson, 0)?))
}

#[axum::debug_handler]
pub async fn get_lesson(
    State(state): State<Arc<ApiState>>,
    Path(id): Path<Uuid>,
) -> Result<Json<LessonResponse>, AppError> {
    let db_lesson = swimbook_db::repositories::lesson::get_lesson_by_id(&state.db_pool, id)
        .await
        .map_err(SwimError::Database)?
        .ok_or_else(|| SwimError::NotFound(format!("Lesson with ID {} not found", id)))?;

    let enrolled = swimbook_db::repositories::lesson::count_enrollments(&state.db_pool, id)
        .await
        .map_err(SwimError::Database)?;

    Ok(Json(lesson_response(db_lesson, enrolled)?))
}

/// Compares two schedules supplied in the request body, without touching
/// storage.
#[axum::debug_handler]
pub async fn check_conflict(
    Json(payload): Json<CheckConflictRequest>,
) -> Result<Json<CheckConflictResponse>, AppError> {
    let first = LessonSchedule::try_from(payload.first)?;
    let second = LessonSchedule::try_from(payload.second)?;

    Ok(Json(CheckConflictResponse {
        conflict: schedules_conflict(&first, &second),
    }))
}
