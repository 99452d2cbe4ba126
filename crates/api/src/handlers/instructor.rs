use axum::{
    Json,
    extract::{Path, State},
};
use std::sync::Arc;
use swimbook_core::{
    conflict::conflicting_pairs,
    errors::SwimError,
    models::{
        instructor::{CreateInstructorRequest, Instructor},
        lesson::{InstructorConflictsResponse, LessonResponse},
    },
};
use uuid::Uuid;

use crate::{
    ApiState,
    handlers::{lesson::lesson_response, require_text},
    middleware::error_handling::AppError,
};

async fn ensure_instructor(state: &ApiState, id: Uuid) -> Result<(), AppError> {
    swimbook_db::repositories::instructor::get_instructor_by_id(&state.db_pool, id)
        .await
        .map_err(SwimError::Database)?
        .ok_or_else(|| SwimError::NotFound(format!("Instructor with ID {} not found", id)))?;
    Ok(())
}

#[axum::debug_handler]
pub async fn create_instructor(
    State(state): State<Arc<ApiState>>,
    Json(payload): Json<CreateInstructorRequest>,
) -> Result<Json<Instructor>, AppError> {
    require_text(&payload.name, "name")?;
    require_text(&payload.email, "email")?;

    let db_instructor = swimbook_db::repositories::instructor::create_instructor(
        &state.db_pool,
        payload.name.trim(),
        payload.email.trim(),
    )
    .await
    .map_err(SwimError::Database)?;

    Ok(Json(db_instructor.into()))
}

#[axum::debug_handler]
pub async fn get_instructor_lessons(
    State(state): State<Arc<ApiState>>,
    Path(id): Path<Uuid>,
) -> Result<Json<Vec<LessonResponse>>, AppError> {
    ensure_instructor(&state, id).await?;

    let lessons = swimbook_db::repositories::lesson::get_lessons_by_instructor(&state.db_pool, id)
        .await
        .map_err(SwimError::Database)?;

    let mut response = Vec::with_capacity(lessons.len());
    for lesson in lessons {
        let enrolled = swimbook_db::repositories::lesson::count_enrollments(&state.db_pool, lesson.id)
            .await
            .map_err(SwimError::Database)?;
        response.push(lesson_response(lesson, enrolled)?);
    }

    Ok(Json(response))
}

/// Lists every pair of this instructor's lessons that overlap. Unscheduled
/// lessons are left out.
#[axum::debug_handler]
pub async fn get_instructor_conflicts(
    State(state): State<Arc<ApiState>>,
    Path(id): Path<Uuid>,
) -> Result<Json<InstructorConflictsResponse>, AppError> {
    ensure_instructor(&state, id).await?;

    let lessons = swimbook_db::repositories::lesson::get_lessons_by_instructor(&state.db_pool, id)
        .await
        .map_err(SwimError::Database)?;

    let mut scheduled = Vec::with_capacity(lessons.len());
    for lesson in &lessons {
        if let Some(schedule) = lesson.schedule()? {
            scheduled.push((lesson.id, schedule));
        }
    }

    Ok(Json(InstructorConflictsResponse {
        instructor_id: id,
        conflicts: conflicting_pairs(&scheduled),
    }))
}
