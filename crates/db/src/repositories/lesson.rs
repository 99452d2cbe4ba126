use crate::models::{DbEnrollment, DbLesson};
use chrono::Utc;
use eyre::Result;
use sqlx::{PgConnection, PgExecutor, Pool, Postgres};
use swimbook_core::models::lesson::LessonSchedule;
use uuid::Uuid;

const LESSON_COLUMNS: &str = "id, name, level, capacity, instructor_id, start_date, end_date, \
     meeting_days, start_time, end_time, created_at";

pub async fn create_lesson(
    pool: &Pool<Postgres>,
    name: &str,
    level: i32,
    capacity: i32,
    instructor_id: Option<Uuid>,
    schedule: Option<&LessonSchedule>,
) -> Result<DbLesson> {
    let id = Uuid::new_v4();
    let now = Utc::now();

    tracing::debug!(
        "Creating lesson: id={}, name={}, capacity={}, scheduled={}",
        id, name, capacity, schedule.is_some()
    );

    let meeting_days: Option<Vec<String>> =
        schedule.map(|s| s.meeting_days.iter().cloned().collect());

    let lesson = sqlx::query_as::<_, DbLesson>(&format!(
        r#"
        INSERT INTO lessons (id, name, level, capacity, instructor_id, start_date, end_date,
                             meeting_days, start_time, end_time, created_at)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
        RETURNING {}
        "#,
        LESSON_COLUMNS
    ))
    .bind(id)
    .bind(name)
    .bind(level)
    .bind(capacity)
    .bind(instructor_id)
    .bind(schedule.map(|s| s.start_date))
    .bind(schedule.map(|s| s.end_date))
    .bind(meeting_days)
    .bind(schedule.map(|s| s.start_time))
    .bind(schedule.map(|s| s.end_time))
    .bind(now)
    .fetch_one(pool)
    .await?;

    Ok(lesson)
}

pub async fn get_lesson_by_id<'e, E>(executor: E, id: Uuid) -> Result<Option<DbLesson>>
where
    E: PgExecutor<'e>,
{
    let lesson = sqlx::query_as::<_, DbLesson>(&format!(
        "SELECT {} FROM lessons WHERE id = $1",
        LESSON_COLUMNS
    ))
    .bind(id)
    .fetch_optional(executor)
    .await?;

    Ok(lesson)
}

/// Loads the lesson and holds a row lock on it until the surrounding
/// transaction ends. Every waitlist or coverage change for the lesson takes
/// this lock first, so at most one of them is in flight per lesson.
pub async fn lock_lesson(conn: &mut PgConnection, id: Uuid) -> Result<Option<DbLesson>> {
    tracing::debug!("Locking lesson: id={}", id);

    let lesson = sqlx::query_as::<_, DbLesson>(&format!(
        "SELECT {} FROM lessons WHERE id = $1 FOR UPDATE",
        LESSON_COLUMNS
    ))
    .bind(id)
    .fetch_optional(conn)
    .await?;

    Ok(lesson)
}

pub async fn get_lessons_by_instructor<'e, E>(
    executor: E,
    instructor_id: Uuid,
) -> Result<Vec<DbLesson>>
where
    E: PgExecutor<'e>,
{
    let lessons = sqlx::query_as::<_, DbLesson>(&format!(
        r#"
        SELECT {}
        FROM lessons
        WHERE instructor_id = $1
        ORDER BY start_date ASC NULLS LAST, start_time ASC NULLS LAST
        "#,
        LESSON_COLUMNS
    ))
    .bind(instructor_id)
    .fetch_all(executor)
    .await?;

    Ok(lessons)
}

pub async fn update_lesson_instructor(
    conn: &mut PgConnection,
    id: Uuid,
    instructor_id: Uuid,
) -> Result<DbLesson> {
    let lesson = sqlx::query_as::<_, DbLesson>(&format!(
        r#"
        UPDATE lessons
        SET instructor_id = $2
        WHERE id = $1
        RETURNING {}
        "#,
        LESSON_COLUMNS
    ))
    .bind(id)
    .bind(instructor_id)
    .fetch_one(conn)
    .await?;

    Ok(lesson)
}

pub async fn count_enrollments<'e, E>(executor: E, lesson_id: Uuid) -> Result<i64>
where
    E: PgExecutor<'e>,
{
    let count = sqlx::query_scalar::<_, i64>(
        r#"
        SELECT COUNT(*)
        FROM enrollments
        WHERE lesson_id = $1
        "#,
    )
    .bind(lesson_id)
    .fetch_one(executor)
    .await?;

    Ok(count)
}

pub async fn is_enrolled<'e, E>(executor: E, lesson_id: Uuid, swimmer_id: Uuid) -> Result<bool>
where
    E: PgExecutor<'e>,
{
    let enrolled = sqlx::query_scalar::<_, bool>(
        r#"
        SELECT EXISTS (
            SELECT 1
            FROM enrollments
            WHERE lesson_id = $1 AND swimmer_id = $2
        );
        "#,
    )
    .bind(lesson_id)
    .bind(swimmer_id)
    .fetch_one(executor)
    .await?;

    Ok(enrolled)
}

pub async fn enroll_swimmer(
    conn: &mut PgConnection,
    lesson_id: Uuid,
    swimmer_id: Uuid,
) -> Result<DbEnrollment> {
    let now = Utc::now();

    let enrollment = sqlx::query_as::<_, DbEnrollment>(
        r#"
        INSERT INTO enrollments (lesson_id, swimmer_id, created_at)
        VALUES ($1, $2, $3)
        RETURNING lesson_id, swimmer_id, created_at
        "#,
    )
    .bind(lesson_id)
    .bind(swimmer_id)
    .bind(now)
    .fetch_one(conn)
    .await?;

    Ok(enrollment)
}
