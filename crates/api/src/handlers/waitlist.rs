//! # Waitlist Handlers
//!
//! Every write follows the same read-modify-write cycle:
//!
//! 1. open a transaction and lock the lesson row
//! 2. load the full waitlist snapshot for that lesson
//! 3. let `swimbook_core::waitlist` compute the plan
//! 4. write only the rows whose position changed, then commit
//!
//! The lesson lock serializes concurrent promotions and cancellations for
//! the same lesson. Reads skip the lock and present positions through
//! `reorder_positions`, so a half-applied plan is never visible to clients.

use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde::Deserialize;
use sqlx::PgConnection;
use std::{collections::HashMap, sync::Arc};
use swimbook_core::{
    errors::{SwimError, SwimResult},
    models::waitlist::{
        ExitReason, JoinWaitlistRequest, NextCandidateResponse, PositionAssignment, PromotionPlan,
        ReorderResponse, WaitlistEntry, WaitlistEntryResponse, WaitlistResponse, WithdrawResponse,
    },
    waitlist::{
        cancel, changed_positions, next_candidate, next_position, promote, reorder_positions,
    },
};
use swimbook_db::models::{DbLesson, DbWaitlistEntry};
use uuid::Uuid;

use crate::{
    ApiState,
    handlers::{begin, commit},
    middleware::error_handling::AppError,
};

/// Query parameters for the next-candidate endpoint
#[derive(Debug, Deserialize)]
pub struct NextCandidateQuery {
    /// Only consider swimmers whose level matches the lesson level
    pub eligible_only: Option<bool>,
}

fn to_entries(rows: &[DbWaitlistEntry]) -> SwimResult<Vec<WaitlistEntry>> {
    rows.iter().map(DbWaitlistEntry::to_entry).collect()
}

/// Active rows in queue order, with the positions `reorder_positions` assigns
/// rather than whatever is currently stored.
fn present_active(
    rows: &[DbWaitlistEntry],
    plan: &[PositionAssignment],
) -> SwimResult<Vec<WaitlistEntryResponse>> {
    let by_id: HashMap<Uuid, &DbWaitlistEntry> = rows.iter().map(|row| (row.id, row)).collect();

    plan.iter()
        .filter_map(|assignment| by_id.get(&assignment.id).map(|row| (row, assignment.position)))
        .map(|(row, position)| {
            let mut response = row.to_response()?;
            response.position = position;
            Ok(response)
        })
        .collect()
}

fn not_found_lesson(id: Uuid) -> SwimError {
    SwimError::NotFound(format!("Lesson with ID {} not found", id))
}

async fn lock_lesson(conn: &mut PgConnection, lesson_id: Uuid) -> Result<DbLesson, AppError> {
    let lesson = swimbook_db::repositories::lesson::lock_lesson(conn, lesson_id)
        .await
        .map_err(SwimError::Database)?
        .ok_or_else(|| not_found_lesson(lesson_id))?;
    Ok(lesson)
}

async fn load_snapshot(
    conn: &mut PgConnection,
    lesson_id: Uuid,
) -> Result<(Vec<DbWaitlistEntry>, Vec<WaitlistEntry>), AppError> {
    let rows = swimbook_db::repositories::waitlist::get_entries_by_lesson(conn, lesson_id)
        .await
        .map_err(SwimError::Database)?;
    let entries = to_entries(&rows)?;
    Ok((rows, entries))
}

/// Persists the assignments of `plan` that differ from `entries`.
async fn persist_plan(
    conn: &mut PgConnection,
    entries: &[WaitlistEntry],
    plan: &[PositionAssignment],
) -> Result<u64, AppError> {
    let changed = changed_positions(entries, plan);
    let updated = swimbook_db::repositories::waitlist::apply_positions(conn, &changed)
        .await
        .map_err(SwimError::Database)?;
    Ok(updated)
}

/// Reloads the lesson's entries and renumbers them. Caller holds the lesson
/// lock.
async fn repair_positions(
    conn: &mut PgConnection,
    lesson_id: Uuid,
) -> Result<(Vec<PositionAssignment>, u64), AppError> {
    let (_, entries) = load_snapshot(&mut *conn, lesson_id).await?;
    let plan = reorder_positions(&entries);
    let updated = persist_plan(conn, &entries, &plan).await?;

    if updated > 0 {
        tracing::warn!(
            "Repaired {} waitlist positions for lesson {}",
            updated, lesson_id
        );
    }

    Ok((plan, updated))
}

#[axum::debug_handler]
pub async fn join_waitlist(
    State(state): State<Arc<ApiState>>,
    Path(lesson_id): Path<Uuid>,
    Json(payload): Json<JoinWaitlistRequest>,
) -> Result<Json<WaitlistEntryResponse>, AppError> {
    swimbook_db::repositories::swimmer::get_swimmer_by_id(&state.db_pool, payload.swimmer_id)
        .await
        .map_err(SwimError::Database)?
        .ok_or_else(|| {
            SwimError::NotFound(format!("Swimmer with ID {} not found", payload.swimmer_id))
        })?;

    let mut tx = begin(&state).await?;
    lock_lesson(&mut tx, lesson_id).await?;

    let enrolled =
        swimbook_db::repositories::lesson::is_enrolled(&mut *tx, lesson_id, payload.swimmer_id)
            .await
            .map_err(SwimError::Database)?;
    if enrolled {
        return Err(AppError(SwimError::Conflict(format!(
            "Swimmer {} is already enrolled in lesson {}",
            payload.swimmer_id, lesson_id
        ))));
    }

    let (_, entries) = load_snapshot(&mut tx, lesson_id).await?;
    if entries
        .iter()
        .any(|e| e.is_active() && e.swimmer_id == payload.swimmer_id)
    {
        return Err(AppError(SwimError::Conflict(format!(
            "Swimmer {} is already on the waitlist for lesson {}",
            payload.swimmer_id, lesson_id
        ))));
    }

    let row = swimbook_db::repositories::waitlist::create_entry(
        &mut tx,
        lesson_id,
        payload.swimmer_id,
        next_position(&entries),
    )
    .await
    .map_err(SwimError::Database)?;

    // No-op for a contiguous sequence; otherwise closes gaps left by an
    // earlier partial write, new entry included.
    let (plan, _) = repair_positions(&mut tx, lesson_id).await?;
    commit(tx).await?;

    let mut response = row.to_response()?;
    if let Some(assignment) = plan.iter().find(|a| a.id == row.id) {
        response.position = assignment.position;
    }

    tracing::info!(
        "Swimmer {} joined waitlist for lesson {} at position {}",
        payload.swimmer_id, lesson_id, response.position
    );
    Ok(Json(response))
}

#[axum::debug_handler]
pub async fn get_waitlist(
    State(state): State<Arc<ApiState>>,
    Path(lesson_id): Path<Uuid>,
) -> Result<Json<WaitlistResponse>, AppError> {
    swimbook_db::repositories::lesson::get_lesson_by_id(&state.db_pool, lesson_id)
        .await
        .map_err(SwimError::Database)?
        .ok_or_else(|| not_found_lesson(lesson_id))?;

    let rows = swimbook_db::repositories::waitlist::get_entries_by_lesson(&state.db_pool, lesson_id)
        .await
        .map_err(SwimError::Database)?;
    let entries = to_entries(&rows)?;
    let plan = reorder_positions(&entries);

    Ok(Json(WaitlistResponse {
        lesson_id,
        entries: present_active(&rows, &plan)?,
    }))
}

#[axum::debug_handler]
pub async fn get_next_candidate(
    State(state): State<Arc<ApiState>>,
    Path(lesson_id): Path<Uuid>,
    Query(query): Query<NextCandidateQuery>,
) -> Result<Json<NextCandidateResponse>, AppError> {
    let lesson = swimbook_db::repositories::lesson::get_lesson_by_id(&state.db_pool, lesson_id)
        .await
        .map_err(SwimError::Database)?
        .ok_or_else(|| not_found_lesson(lesson_id))?;

    let rows = swimbook_db::repositories::waitlist::get_entries_by_lesson(&state.db_pool, lesson_id)
        .await
        .map_err(SwimError::Database)?;
    let entries = to_entries(&rows)?;

    // Eligibility is a booking rule, not a sequencing one: resolve it here
    // and hand the sequencer a plain predicate.
    let levels: HashMap<Uuid, i32> = if query.eligible_only.unwrap_or(false) {
        let swimmer_ids: Vec<Uuid> = entries
            .iter()
            .filter(|e| e.is_active())
            .map(|e| e.swimmer_id)
            .collect();
        swimbook_db::repositories::swimmer::get_swimmers_by_ids(&state.db_pool, &swimmer_ids)
            .await
            .map_err(SwimError::Database)?
            .into_iter()
            .map(|s| (s.id, s.level))
            .collect()
    } else {
        HashMap::new()
    };

    let candidate = next_candidate(&entries, |entry| {
        query.eligible_only != Some(true) || levels.get(&entry.swimmer_id) == Some(&lesson.level)
    })
    .map(|entry| entry.id);

    let plan = reorder_positions(&entries);
    let candidate = match candidate {
        Some(id) => present_active(&rows, &plan)?
            .into_iter()
            .find(|response| response.id == id),
        None => None,
    };

    Ok(Json(NextCandidateResponse {
        lesson_id,
        candidate,
    }))
}

async fn finish_withdrawal(
    conn: &mut PgConnection,
    entries: &[WaitlistEntry],
    plan: PromotionPlan,
    reason: ExitReason,
) -> Result<WithdrawResponse, AppError> {
    let row = swimbook_db::repositories::waitlist::deactivate_entry(&mut *conn, plan.entry.id, reason)
        .await
        .map_err(SwimError::Database)?;
    persist_plan(conn, entries, &plan.positions).await?;

    Ok(WithdrawResponse {
        entry: row.to_response()?,
        positions: plan.positions,
    })
}

#[axum::debug_handler]
pub async fn promote_entry(
    State(state): State<Arc<ApiState>>,
    Path((lesson_id, entry_id)): Path<(Uuid, Uuid)>,
) -> Result<Json<WithdrawResponse>, AppError> {
    let mut tx = begin(&state).await?;
    let lesson = lock_lesson(&mut tx, lesson_id).await?;

    let (_, entries) = load_snapshot(&mut tx, lesson_id).await?;
    let plan = promote(&entries, entry_id)?;

    let enrolled = swimbook_db::repositories::lesson::count_enrollments(&mut *tx, lesson_id)
        .await
        .map_err(SwimError::Database)?;
    if enrolled >= i64::from(lesson.capacity) {
        tracing::warn!(
            "Refusing promotion of entry {}: lesson {} is full ({}/{})",
            entry_id, lesson_id, enrolled, lesson.capacity
        );
        return Err(AppError(SwimError::Conflict(format!(
            "Lesson {} is full",
            lesson_id
        ))));
    }

    swimbook_db::repositories::lesson::enroll_swimmer(&mut tx, lesson_id, plan.entry.swimmer_id)
        .await
        .map_err(SwimError::Database)?;

    let response = finish_withdrawal(&mut tx, &entries, plan, ExitReason::Promoted).await?;
    commit(tx).await?;

    tracing::info!(
        "Promoted swimmer {} from waitlist into lesson {}",
        response.entry.swimmer_id, lesson_id
    );
    Ok(Json(response))
}

#[axum::debug_handler]
pub async fn cancel_entry(
    State(state): State<Arc<ApiState>>,
    Path((lesson_id, entry_id)): Path<(Uuid, Uuid)>,
) -> Result<Json<WithdrawResponse>, AppError> {
    let mut tx = begin(&state).await?;
    lock_lesson(&mut tx, lesson_id).await?;

    let (_, entries) = load_snapshot(&mut tx, lesson_id).await?;
    let plan = cancel(&entries, entry_id)?;

    let response = finish_withdrawal(&mut tx, &entries, plan, ExitReason::Cancelled).await?;
    commit(tx).await?;

    tracing::info!("Cancelled waitlist entry {} for lesson {}", entry_id, lesson_id);
    Ok(Json(response))
}

#[axum::debug_handler]
pub async fn reorder_waitlist(
    State(state): State<Arc<ApiState>>,
    Path(lesson_id): Path<Uuid>,
) -> Result<Json<ReorderResponse>, AppError> {
    let mut tx = begin(&state).await?;
    lock_lesson(&mut tx, lesson_id).await?;

    let (positions, updated) = repair_positions(&mut tx, lesson_id).await?;
    commit(tx).await?;

    Ok(Json(ReorderResponse {
        lesson_id,
        updated: updated as usize,
        positions,
    }))
}
