use axum::{
    Json,
    extract::{Path, State},
};
use std::sync::Arc;
use swimbook_core::{
    coverage::{check_coverage, ensure_acceptable, ensure_requester_assigned},
    errors::SwimError,
    models::coverage::{
        AcceptCoverageRequest, CoverageListResponse, CoverageRequest, CoverageStatus,
        CreateCoverageRequest,
    },
};
use uuid::Uuid;

use crate::{
    ApiState,
    handlers::{begin, commit},
    middleware::error_handling::AppError,
};

/// Opens a coverage request. Only the assigned instructor may ask, and a
/// lesson has at most one open request at a time.
#[axum::debug_handler]
pub async fn create_coverage_request(
    State(state): State<Arc<ApiState>>,
    Path(lesson_id): Path<Uuid>,
    Json(payload): Json<CreateCoverageRequest>,
) -> Result<Json<CoverageRequest>, AppError> {
    let mut tx = begin(&state).await?;

    let lesson = swimbook_db::repositories::lesson::lock_lesson(&mut tx, lesson_id)
        .await
        .map_err(SwimError::Database)?
        .ok_or_else(|| SwimError::NotFound(format!("Lesson with ID {} not found", lesson_id)))?;

    if lesson.instructor_id != Some(payload.requesting_instructor_id) {
        return Err(AppError(SwimError::InvalidInput(format!(
            "Instructor {} is not assigned to lesson {}",
            payload.requesting_instructor_id, lesson_id
        ))));
    }

    let already_open =
        swimbook_db::repositories::coverage::has_open_coverage_request(&mut *tx, lesson_id)
            .await
            .map_err(SwimError::Database)?;
    if already_open {
        return Err(AppError(SwimError::Conflict(format!(
            "Lesson {} already has an open coverage request",
            lesson_id
        ))));
    }

    let db_request = swimbook_db::repositories::coverage::create_coverage_request(
        &mut tx,
        lesson_id,
        payload.requesting_instructor_id,
        payload.note.as_deref(),
    )
    .await
    .map_err(SwimError::Database)?;

    commit(tx).await?;

    tracing::info!(
        "Instructor {} requested coverage for lesson {}",
        payload.requesting_instructor_id, lesson_id
    );
    Ok(Json(db_request.to_request()?))
}

#[axum::debug_handler]
pub async fn list_open_coverage_requests(
    State(state): State<Arc<ApiState>>,
) -> Result<Json<CoverageListResponse>, AppError> {
    let rows = swimbook_db::repositories::coverage::get_open_coverage_requests(&state.db_pool)
        .await
        .map_err(SwimError::Database)?;

    let requests = rows
        .iter()
        .map(|row| row.to_request())
        .collect::<Result<Vec<_>, _>>()?;

    Ok(Json(CoverageListResponse { requests }))
}

/// Hands the lesson over to the accepting instructor, provided it does not
/// overlap anything they already teach.
#[axum::debug_handler]
pub async fn accept_coverage_request(
    State(state): State<Arc<ApiState>>,
    Path(id): Path<Uuid>,
    Json(payload): Json<AcceptCoverageRequest>,
) -> Result<Json<CoverageRequest>, AppError> {
    swimbook_db::repositories::instructor::get_instructor_by_id(&state.db_pool, payload.instructor_id)
        .await
        .map_err(SwimError::Database)?
        .ok_or_else(|| {
            SwimError::NotFound(format!("Instructor with ID {} not found", payload.instructor_id))
        })?;

    let mut tx = begin(&state).await?;

    let request = swimbook_db::repositories::coverage::lock_coverage_request(&mut tx, id)
        .await
        .map_err(SwimError::Database)?
        .ok_or_else(|| SwimError::NotFound(format!("Coverage request with ID {} not found", id)))?
        .to_request()?;
    ensure_acceptable(&request, payload.instructor_id)?;

    let lesson = swimbook_db::repositories::lesson::lock_lesson(&mut tx, request.lesson_id)
        .await
        .map_err(SwimError::Database)?
        .ok_or_else(|| {
            SwimError::NotFound(format!("Lesson with ID {} not found", request.lesson_id))
        })?;
    ensure_requester_assigned(&request, lesson.instructor_id)?;

    let schedule = lesson.schedule()?.ok_or_else(|| {
        SwimError::InvalidInput(format!("Lesson {} has no schedule to cover", lesson.id))
    })?;

    let taught_rows = swimbook_db::repositories::lesson::get_lessons_by_instructor(
        &mut *tx,
        payload.instructor_id,
    )
    .await
    .map_err(SwimError::Database)?;

    let mut taught = Vec::with_capacity(taught_rows.len());
    for row in taught_rows.iter().filter(|row| row.id != lesson.id) {
        if let Some(other) = row.schedule()? {
            taught.push((row.id, other));
        }
    }

    if let Err(err) = check_coverage(&schedule, &taught) {
        tracing::warn!(
            "Instructor {} cannot cover lesson {}: {}",
            payload.instructor_id, lesson.id, err
        );
        return Err(AppError(err));
    }

    let resolved = swimbook_db::repositories::coverage::resolve_coverage_request(
        &mut tx,
        id,
        CoverageStatus::Filled,
        Some(payload.instructor_id),
    )
    .await
    .map_err(SwimError::Database)?;

    swimbook_db::repositories::lesson::update_lesson_instructor(
        &mut tx,
        lesson.id,
        payload.instructor_id,
    )
    .await
    .map_err(SwimError::Database)?;

    commit(tx).await?;

    tracing::info!(
        "Instructor {} now covers lesson {}",
        payload.instructor_id, lesson.id
    );
    Ok(Json(resolved.to_request()?))
}

#[axum::debug_handler]
pub async fn cancel_coverage_request(
    State(state): State<Arc<ApiState>>,
    Path(id): Path<Uuid>,
) -> Result<Json<CoverageRequest>, AppError> {
    let mut tx = begin(&state).await?;

    let request = swimbook_db::repositories::coverage::lock_coverage_request(&mut tx, id)
        .await
        .map_err(SwimError::Database)?
        .ok_or_else(|| SwimError::NotFound(format!("Coverage request with ID {} not found", id)))?
        .to_request()?;

    if request.status != CoverageStatus::Open {
        return Err(AppError(SwimError::Conflict(format!(
            "Coverage request {} is already {}",
            id, request.status
        ))));
    }

    let resolved = swimbook_db::repositories::coverage::resolve_coverage_request(
        &mut tx,
        id,
        CoverageStatus::Cancelled,
        None,
    )
    .await
    .map_err(SwimError::Database)?;

    commit(tx).await?;

    Ok(Json(resolved.to_request()?))
}
