use crate::models::DbCoverageRequest;
use chrono::Utc;
use eyre::Result;
use sqlx::{PgConnection, PgExecutor, Pool, Postgres};
use swimbook_core::models::coverage::CoverageStatus;
use uuid::Uuid;

pub async fn create_coverage_request(
    conn: &mut PgConnection,
    lesson_id: Uuid,
    requesting_instructor_id: Uuid,
    note: Option<&str>,
) -> Result<DbCoverageRequest> {
    let id = Uuid::new_v4();
    let now = Utc::now();

    let request = sqlx::query_as::<_, DbCoverageRequest>(
        r#"
        INSERT INTO coverage_requests (id, lesson_id, requesting_instructor_id, status, note, created_at)
        VALUES ($1, $2, $3, $4, $5, $6)
        RETURNING id, lesson_id, requesting_instructor_id, covering_instructor_id,
                  status, note, created_at, resolved_at
        "#,
    )
    .bind(id)
    .bind(lesson_id)
    .bind(requesting_instructor_id)
    .bind(CoverageStatus::Open.as_str())
    .bind(note)
    .bind(now)
    .fetch_one(conn)
    .await?;

    Ok(request)
}

/// Whether the lesson already has a request waiting for a taker.
pub async fn has_open_coverage_request<'e, E>(executor: E, lesson_id: Uuid) -> Result<bool>
where
    E: PgExecutor<'e>,
{
    let open = sqlx::query_scalar::<_, bool>(
        r#"
        SELECT EXISTS (
            SELECT 1 FROM coverage_requests
            WHERE lesson_id = $1 AND status = $2
        )
        "#,
    )
    .bind(lesson_id)
    .bind(CoverageStatus::Open.as_str())
    .fetch_one(executor)
    .await?;

    Ok(open)
}

pub async fn get_open_coverage_requests(pool: &Pool<Postgres>) -> Result<Vec<DbCoverageRequest>> {
    let requests = sqlx::query_as::<_, DbCoverageRequest>(
        r#"
        SELECT id, lesson_id, requesting_instructor_id, covering_instructor_id,
               status, note, created_at, resolved_at
        FROM coverage_requests
        WHERE status = $1
        ORDER BY created_at ASC
        "#,
    )
    .bind(CoverageStatus::Open.as_str())
    .fetch_all(pool)
    .await?;

    Ok(requests)
}

pub async fn lock_coverage_request(
    conn: &mut PgConnection,
    id: Uuid,
) -> Result<Option<DbCoverageRequest>> {
    let request = sqlx::query_as::<_, DbCoverageRequest>(
        r#"
        SELECT id, lesson_id, requesting_instructor_id, covering_instructor_id,
               status, note, created_at, resolved_at
        FROM coverage_requests
        WHERE id = $1
        FOR UPDATE
        "#,
    )
    .bind(id)
    .fetch_optional(conn)
    .await?;

    Ok(request)
}

/// Moves a request out of `open`. `covering_instructor_id` is set for a
/// filled request and left empty for a cancelled one.
pub async fn resolve_coverage_request(
    conn: &mut PgConnection,
    id: Uuid,
    status: CoverageStatus,
    covering_instructor_id: Option<Uuid>,
) -> Result<DbCoverageRequest> {
    let now = Utc::now();

    tracing::debug!("Resolving coverage request: id={}, status={}", id, status);

    let request = sqlx::query_as::<_, DbCoverageRequest>(
        r#"
        UPDATE coverage_requests
        SET status = $2, covering_instructor_id = $3, resolved_at = $4
        WHERE id = $1
        RETURNING id, lesson_id, requesting_instructor_id, covering_instructor_id,
                  status, note, created_at, resolved_at
        "#,
    )
    .bind(id)
    .bind(status.as_str())
    .bind(covering_instructor_id)
    .bind(now)
    .fetch_one(conn)
    .await?;

    Ok(request)
}
