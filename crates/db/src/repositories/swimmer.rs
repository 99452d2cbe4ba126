use crate::models::DbSwimmer;
use chrono::Utc;
use eyre::Result;
use sqlx::{PgExecutor, Pool, Postgres};
use uuid::Uuid;

pub async fn create_swimmer(
    pool: &Pool<Postgres>,
    name: &str,
    email: &str,
    level: i32,
) -> Result<DbSwimmer> {
    let id = Uuid::new_v4();
    let now = Utc::now();

    tracing::debug!("Creating swimmer: id={}, level={}", id, level);

    let swimmer = sqlx::query_as::<_, DbSwimmer>(
        r#"
        INSERT INTO swimmers (id, name, email, level, created_at)
        VALUES ($1, $2, $3, $4, $5)
        RETURNING id, name, email, level, created_at
        "#,
    )
    .bind(id)
    .bind(name)
    .bind(email)
    .bind(level)
    .bind(now)
    .fetch_one(pool)
    .await?;

    Ok(swimmer)
}

pub async fn get_swimmer_by_id<'e, E>(executor: E, id: Uuid) -> Result<Option<DbSwimmer>>
where
    E: PgExecutor<'e>,
{
    let swimmer = sqlx::query_as::<_, DbSwimmer>(
        r#"
        SELECT id, name, email, level, created_at
        FROM swimmers
        WHERE id = $1
        "#,
    )
    .bind(id)
    .fetch_optional(executor)
    .await?;

    Ok(swimmer)
}

pub async fn get_swimmers_by_ids<'e, E>(executor: E, ids: &[Uuid]) -> Result<Vec<DbSwimmer>>
where
    E: PgExecutor<'e>,
{
    let swimmers = sqlx::query_as::<_, DbSwimmer>(
        r#"
        SELECT id, name, email, level, created_at
        FROM swimmers
        WHERE id = ANY($1)
        "#,
    )
    .bind(ids)
    .fetch_all(executor)
    .await?;

    Ok(swimmers)
}
