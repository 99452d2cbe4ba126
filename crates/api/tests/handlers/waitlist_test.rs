use axum::{Json, http::StatusCode};
use mockall::predicate;
use pretty_assertions::assert_eq;
use swimbook_api::middleware::error_handling::AppError;
use swimbook_core::{
    errors::SwimError,
    models::waitlist::{
        EntryStatus, ExitReason, PositionAssignment, WaitlistEntry, WaitlistEntryResponse,
        WithdrawResponse,
    },
    waitlist::{changed_positions, next_position, promote, reorder_positions},
};
use swimbook_db::models::DbWaitlistEntry;
use test_log::test;
use uuid::Uuid;

use crate::test_utils::{TestContext, lesson, waitlist};

fn to_entries(rows: &[DbWaitlistEntry]) -> Result<Vec<WaitlistEntry>, AppError> {
    Ok(rows
        .iter()
        .map(DbWaitlistEntry::to_entry)
        .collect::<Result<Vec<_>, _>>()?)
}

fn withdrawn(row: &DbWaitlistEntry, reason: ExitReason) -> DbWaitlistEntry {
    DbWaitlistEntry {
        status: EntryStatus::Inactive.as_str().to_string(),
        exit_reason: Some(reason.as_str().to_string()),
        ..row.clone()
    }
}

// Mirrors the promote handler with the repositories swapped for mocks
async fn test_promote_wrapper(
    ctx: &TestContext,
    lesson_id: Uuid,
    entry_id: Uuid,
) -> Result<Json<WithdrawResponse>, AppError> {
    let lesson = ctx
        .lesson_repo
        .lock_lesson(lesson_id)
        .await?
        .ok_or_else(|| SwimError::NotFound(format!("Lesson with ID {} not found", lesson_id)))?;

    let rows = ctx.waitlist_repo.get_entries_by_lesson(lesson_id).await?;
    let entries = to_entries(&rows)?;
    let plan = promote(&entries, entry_id)?;

    let enrolled = ctx.lesson_repo.count_enrollments(lesson_id).await?;
    if enrolled >= i64::from(lesson.capacity) {
        return Err(AppError(SwimError::Conflict(format!(
            "Lesson {} is full",
            lesson_id
        ))));
    }

    ctx.lesson_repo
        .enroll_swimmer(lesson_id, plan.entry.swimmer_id)
        .await?;
    let row = ctx
        .waitlist_repo
        .deactivate_entry(plan.entry.id, ExitReason::Promoted)
        .await?;
    ctx.waitlist_repo
        .apply_positions(changed_positions(&entries, &plan.positions))
        .await?;

    Ok(Json(WithdrawResponse {
        entry: row.to_response()?,
        positions: plan.positions,
    }))
}

// Mirrors the join handler, including the repair pass it runs after the
// insert
async fn test_join_wrapper(
    ctx: &TestContext,
    lesson_id: Uuid,
    swimmer_id: Uuid,
) -> Result<Json<WaitlistEntryResponse>, AppError> {
    ctx.lesson_repo
        .lock_lesson(lesson_id)
        .await?
        .ok_or_else(|| SwimError::NotFound(format!("Lesson with ID {} not found", lesson_id)))?;

    if ctx.lesson_repo.is_enrolled(lesson_id, swimmer_id).await? {
        return Err(AppError(SwimError::Conflict(format!(
            "Swimmer {} is already enrolled in lesson {}",
            swimmer_id, lesson_id
        ))));
    }

    let rows = ctx.waitlist_repo.get_entries_by_lesson(lesson_id).await?;
    let entries = to_entries(&rows)?;

    if entries
        .iter()
        .any(|e| e.is_active() && e.swimmer_id == swimmer_id)
    {
        return Err(AppError(SwimError::Conflict(format!(
            "Swimmer {} is already on the waitlist for lesson {}",
            swimmer_id, lesson_id
        ))));
    }

    let row = ctx
        .waitlist_repo
        .create_entry(lesson_id, swimmer_id, next_position(&entries))
        .await?;

    let refreshed = to_entries(&ctx.waitlist_repo.get_entries_by_lesson(lesson_id).await?)?;
    let plan = reorder_positions(&refreshed);
    ctx.waitlist_repo
        .apply_positions(changed_positions(&refreshed, &plan))
        .await?;

    let mut response = row.to_response()?;
    if let Some(assignment) = plan.iter().find(|a| a.id == row.id) {
        response.position = assignment.position;
    }
    Ok(Json(response))
}

fn new_entry(lesson_id: Uuid, swimmer_id: Uuid, position: i32) -> DbWaitlistEntry {
    DbWaitlistEntry {
        id: Uuid::new_v4(),
        lesson_id,
        swimmer_id,
        position,
        status: EntryStatus::Active.as_str().to_string(),
        exit_reason: None,
        created_at: chrono::Utc::now(),
    }
}

/// Join setup for a lesson with room: the first read returns `before`, reads
/// after the insert also return `created`.
fn expect_join(ctx: &mut TestContext, before: Vec<DbWaitlistEntry>, created: DbWaitlistEntry) {
    ctx.lesson_repo
        .expect_lock_lesson()
        .returning(|id| Ok(Some(lesson(id, 1, 6))));
    ctx.lesson_repo
        .expect_is_enrolled()
        .returning(|_, _| Ok(false));

    let inserted = created.clone();
    let mut reads = 0;
    ctx.waitlist_repo
        .expect_get_entries_by_lesson()
        .returning(move |_| {
            reads += 1;
            let mut rows = before.clone();
            if reads > 1 {
                rows.push(inserted.clone());
            }
            Ok(rows)
        });
    ctx.waitlist_repo
        .expect_create_entry()
        .with(
            predicate::eq(created.lesson_id),
            predicate::eq(created.swimmer_id),
            predicate::eq(created.position),
        )
        .times(1)
        .returning(move |_, _, _| Ok(created.clone()));
}

#[test(tokio::test)]
async fn test_promote_middle_entry_closes_gap() {
    let mut ctx = TestContext::new();
    let lesson_id = Uuid::new_v4();
    let rows = waitlist(lesson_id, 4);
    let (a, b, c, d) = (rows[0].id, rows[1].id, rows[2].id, rows[3].id);
    let b_swimmer = rows[1].swimmer_id;
    let b_row = withdrawn(&rows[1], ExitReason::Promoted);

    ctx.lesson_repo
        .expect_lock_lesson()
        .with(predicate::eq(lesson_id))
        .returning(move |id| Ok(Some(lesson(id, 1, 6))));
    ctx.lesson_repo
        .expect_count_enrollments()
        .returning(|_| Ok(5));
    ctx.lesson_repo
        .expect_enroll_swimmer()
        .with(predicate::eq(lesson_id), predicate::eq(b_swimmer))
        .times(1)
        .returning(|lesson_id, swimmer_id| {
            Ok(swimbook_db::models::DbEnrollment {
                lesson_id,
                swimmer_id,
                created_at: chrono::Utc::now(),
            })
        });

    let snapshot = rows.clone();
    ctx.waitlist_repo
        .expect_get_entries_by_lesson()
        .returning(move |_| Ok(snapshot.clone()));
    ctx.waitlist_repo
        .expect_deactivate_entry()
        .with(predicate::eq(b), predicate::eq(ExitReason::Promoted))
        .times(1)
        .returning(move |_, _| Ok(b_row.clone()));
    // A keeps position 1, so only C and D are written
    ctx.waitlist_repo
        .expect_apply_positions()
        .with(predicate::eq(vec![
            PositionAssignment { id: c, position: 2 },
            PositionAssignment { id: d, position: 3 },
        ]))
        .times(1)
        .returning(|assignments| Ok(assignments.len() as u64));

    let Json(response) = test_promote_wrapper(&ctx, lesson_id, b).await.unwrap();

    assert_eq!(response.entry.id, b);
    assert_eq!(response.entry.status, EntryStatus::Inactive);
    assert_eq!(response.entry.exit_reason, Some(ExitReason::Promoted));
    assert_eq!(
        response.positions,
        vec![
            PositionAssignment { id: a, position: 1 },
            PositionAssignment { id: c, position: 2 },
            PositionAssignment { id: d, position: 3 },
        ]
    );
}

#[test(tokio::test)]
async fn test_promote_into_full_lesson_is_refused() {
    let mut ctx = TestContext::new();
    let lesson_id = Uuid::new_v4();
    let rows = waitlist(lesson_id, 2);
    let head = rows[0].id;

    ctx.lesson_repo
        .expect_lock_lesson()
        .returning(|id| Ok(Some(lesson(id, 1, 4))));
    ctx.lesson_repo
        .expect_count_enrollments()
        .returning(|_| Ok(4));
    ctx.lesson_repo.expect_enroll_swimmer().times(0);
    ctx.waitlist_repo
        .expect_get_entries_by_lesson()
        .returning(move |_| Ok(rows.clone()));
    ctx.waitlist_repo.expect_deactivate_entry().times(0);
    ctx.waitlist_repo.expect_apply_positions().times(0);

    let err = test_promote_wrapper(&ctx, lesson_id, head).await.unwrap_err();
    assert!(matches!(err.0, SwimError::Conflict(_)));
    assert_eq!(err.status(), StatusCode::CONFLICT);
}

#[test(tokio::test)]
async fn test_promote_unknown_entry_is_not_found() {
    let mut ctx = TestContext::new();
    let lesson_id = Uuid::new_v4();
    let rows = waitlist(lesson_id, 3);

    ctx.lesson_repo
        .expect_lock_lesson()
        .returning(|id| Ok(Some(lesson(id, 1, 6))));
    ctx.waitlist_repo
        .expect_get_entries_by_lesson()
        .returning(move |_| Ok(rows.clone()));
    ctx.lesson_repo.expect_enroll_swimmer().times(0);

    let err = test_promote_wrapper(&ctx, lesson_id, Uuid::new_v4())
        .await
        .unwrap_err();
    assert_eq!(err.status(), StatusCode::NOT_FOUND);
}

#[test(tokio::test)]
async fn test_promote_missing_lesson_is_not_found() {
    let mut ctx = TestContext::new();

    ctx.lesson_repo.expect_lock_lesson().returning(|_| Ok(None));
    ctx.waitlist_repo.expect_get_entries_by_lesson().times(0);

    let err = test_promote_wrapper(&ctx, Uuid::new_v4(), Uuid::new_v4())
        .await
        .unwrap_err();
    assert_eq!(err.status(), StatusCode::NOT_FOUND);
}

#[test(tokio::test)]
async fn test_storage_failure_surfaces_as_server_error() {
    let mut ctx = TestContext::new();

    ctx.lesson_repo
        .expect_lock_lesson()
        .returning(|_| Err(eyre::eyre!("connection reset")));

    let err = test_promote_wrapper(&ctx, Uuid::new_v4(), Uuid::new_v4())
        .await
        .unwrap_err();
    assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
}

#[test(tokio::test)]
async fn test_join_appends_after_last_active_position() {
    let mut ctx = TestContext::new();
    let lesson_id = Uuid::new_v4();
    let mut rows = waitlist(lesson_id, 3);
    // A withdrawn entry does not hold a place
    rows[2] = withdrawn(&rows[2], ExitReason::Cancelled);
    let created = new_entry(lesson_id, Uuid::new_v4(), 3);
    let swimmer_id = created.swimmer_id;

    expect_join(&mut ctx, rows, created);
    // Already contiguous, nothing to repair
    ctx.waitlist_repo
        .expect_apply_positions()
        .with(predicate::eq(Vec::<PositionAssignment>::new()))
        .times(1)
        .returning(|_| Ok(0));

    let Json(response) = test_join_wrapper(&ctx, lesson_id, swimmer_id).await.unwrap();
    assert_eq!(response.position, 3);
    assert_eq!(response.status, EntryStatus::Active);
}

#[test(tokio::test)]
async fn test_join_into_gapped_list_is_renumbered() {
    let mut ctx = TestContext::new();
    let lesson_id = Uuid::new_v4();
    let mut rows = waitlist(lesson_id, 2);
    // Left behind by an interrupted write
    rows[1].position = 4;
    let second = rows[1].id;
    let created = new_entry(lesson_id, Uuid::new_v4(), 5);
    let (created_id, swimmer_id) = (created.id, created.swimmer_id);

    expect_join(&mut ctx, rows, created);
    ctx.waitlist_repo
        .expect_apply_positions()
        .with(predicate::eq(vec![
            PositionAssignment { id: second, position: 2 },
            PositionAssignment { id: created_id, position: 3 },
        ]))
        .times(1)
        .returning(|assignments| Ok(assignments.len() as u64));

    let Json(response) = test_join_wrapper(&ctx, lesson_id, swimmer_id).await.unwrap();
    assert_eq!(response.id, created_id);
    assert_eq!(response.position, 3);
}

#[test(tokio::test)]
async fn test_join_when_enrolled_is_a_conflict() {
    let mut ctx = TestContext::new();
    let lesson_id = Uuid::new_v4();
    let swimmer_id = Uuid::new_v4();

    ctx.lesson_repo
        .expect_lock_lesson()
        .returning(|id| Ok(Some(lesson(id, 1, 6))));
    ctx.lesson_repo
        .expect_is_enrolled()
        .with(predicate::eq(lesson_id), predicate::eq(swimmer_id))
        .returning(|_, _| Ok(true));
    ctx.waitlist_repo.expect_get_entries_by_lesson().times(0);
    ctx.waitlist_repo.expect_create_entry().times(0);

    let err = test_join_wrapper(&ctx, lesson_id, swimmer_id)
        .await
        .unwrap_err();
    assert!(matches!(err.0, SwimError::Conflict(_)));
    assert_eq!(err.status(), StatusCode::CONFLICT);
}

#[test(tokio::test)]
async fn test_join_twice_is_a_conflict() {
    let mut ctx = TestContext::new();
    let lesson_id = Uuid::new_v4();
    let rows = waitlist(lesson_id, 2);
    let already_waiting = rows[1].swimmer_id;

    ctx.lesson_repo
        .expect_lock_lesson()
        .returning(|id| Ok(Some(lesson(id, 1, 6))));
    ctx.lesson_repo
        .expect_is_enrolled()
        .returning(|_, _| Ok(false));
    ctx.waitlist_repo
        .expect_get_entries_by_lesson()
        .returning(move |_| Ok(rows.clone()));
    ctx.waitlist_repo.expect_create_entry().times(0);

    let err = test_join_wrapper(&ctx, lesson_id, already_waiting)
        .await
        .unwrap_err();
    assert_eq!(err.status(), StatusCode::CONFLICT);
}

#[test]
fn test_stored_gap_is_presented_contiguously() {
    let lesson_id = Uuid::new_v4();
    let mut rows = waitlist(lesson_id, 3);
    // Left behind by an interrupted write
    rows[1].position = 5;
    rows[2].position = 9;

    let entries = to_entries(&rows).unwrap();
    let plan = reorder_positions(&entries);

    let positions: Vec<i32> = plan.iter().map(|a| a.position).collect();
    assert_eq!(positions, vec![1, 2, 3]);
    assert_eq!(changed_positions(&entries, &plan).len(), 2);
}
