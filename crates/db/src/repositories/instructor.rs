use crate::models::DbInstructor;
use chrono::Utc;
use eyre::Result;
use sqlx::{Pool, Postgres};
use uuid::Uuid;

pub async fn create_instructor(
    pool: &Pool<Postgres>,
    name: &str,
    email: &str,
) -> Result<DbInstructor> {
    let id = Uuid::new_v4();
    let now = Utc::now();

    let instructor = sqlx::query_as::<_, DbInstructor>(
        r#"
        INSERT INTO instructors (id, name, email, created_at)
        VALUES ($1, $2, $3, $4)
        RETURNING id, name, email, created_at
        "#,
    )
    .bind(id)
    .bind(name)
    .bind(email)
    .bind(now)
    .fetch_one(pool)
    .await?;

    Ok(instructor)
}

pub async fn get_instructor_by_id(
    pool: &Pool<Postgres>,
    id: Uuid,
) -> Result<Option<DbInstructor>> {
    let instructor = sqlx::query_as::<_, DbInstructor>(
        r#"
        SELECT id, name, email, created_at
        FROM instructors
        WHERE id = $1
        "#,
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;

    Ok(instructor)
}
