use crate::models::DbWaitlistEntry;
use chrono::Utc;
use eyre::{eyre, Result};
use sqlx::{PgConnection, PgExecutor};
use swimbook_core::models::waitlist::{EntryStatus, ExitReason, PositionAssignment};
use uuid::Uuid;

/// All entries for a lesson, inactive ones included, in queue order.
pub async fn get_entries_by_lesson<'e, E>(executor: E, lesson_id: Uuid) -> Result<Vec<DbWaitlistEntry>>
where
    E: PgExecutor<'e>,
{
    let entries = sqlx::query_as::<_, DbWaitlistEntry>(
        r#"
        SELECT id, lesson_id, swimmer_id, position, status, exit_reason, created_at
        FROM waitlist_entries
        WHERE lesson_id = $1
        ORDER BY position ASC, created_at ASC
        "#,
    )
    .bind(lesson_id)
    .fetch_all(executor)
    .await?;

    Ok(entries)
}

pub async fn create_entry(
    conn: &mut PgConnection,
    lesson_id: Uuid,
    swimmer_id: Uuid,
    position: i32,
) -> Result<DbWaitlistEntry> {
    let id = Uuid::new_v4();
    let now = Utc::now();

    tracing::debug!(
        "Creating waitlist entry: id={}, lesson_id={}, swimmer_id={}, position={}",
        id, lesson_id, swimmer_id, position
    );

    let entry = sqlx::query_as::<_, DbWaitlistEntry>(
        r#"
        INSERT INTO waitlist_entries (id, lesson_id, swimmer_id, position, status, created_at)
        VALUES ($1, $2, $3, $4, $5, $6)
        RETURNING id, lesson_id, swimmer_id, position, status, exit_reason, created_at
        "#,
    )
    .bind(id)
    .bind(lesson_id)
    .bind(swimmer_id)
    .bind(position)
    .bind(EntryStatus::Active.as_str())
    .bind(now)
    .fetch_one(conn)
    .await?;

    Ok(entry)
}

/// Marks an active entry inactive and records why. The position is left as
/// it was; only active entries take part in numbering.
pub async fn deactivate_entry(
    conn: &mut PgConnection,
    id: Uuid,
    reason: ExitReason,
) -> Result<DbWaitlistEntry> {
    tracing::debug!("Deactivating waitlist entry: id={}, reason={}", id, reason.as_str());

    let entry = sqlx::query_as::<_, DbWaitlistEntry>(
        r#"
        UPDATE waitlist_entries
        SET status = $2, exit_reason = $3
        WHERE id = $1 AND status = $4
        RETURNING id, lesson_id, swimmer_id, position, status, exit_reason, created_at
        "#,
    )
    .bind(id)
    .bind(EntryStatus::Inactive.as_str())
    .bind(reason.as_str())
    .bind(EntryStatus::Active.as_str())
    .fetch_optional(conn)
    .await?
    .ok_or_else(|| eyre!("Active waitlist entry {} disappeared during update", id))?;

    Ok(entry)
}

/// Writes a batch of position assignments in a single statement and returns
/// the number of rows touched.
pub async fn apply_positions(
    conn: &mut PgConnection,
    assignments: &[PositionAssignment],
) -> Result<u64> {
    if assignments.is_empty() {
        return Ok(0);
    }

    let ids: Vec<Uuid> = assignments.iter().map(|a| a.id).collect();
    let positions: Vec<i32> = assignments.iter().map(|a| a.position).collect();

    let result = sqlx::query(
        r#"
        UPDATE waitlist_entries AS w
        SET position = v.position
        FROM UNNEST($1::uuid[], $2::int4[]) AS v(id, position)
        WHERE w.id = v.id
        "#,
    )
    .bind(ids)
    .bind(positions)
    .execute(conn)
    .await?;

    tracing::debug!("Applied {} waitlist position updates", result.rows_affected());
    Ok(result.rows_affected())
}
