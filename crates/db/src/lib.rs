pub mod models;
pub mod repositories;
pub mod schema;

pub mod mock;

use eyre::Result;
use sqlx::postgres::PgPoolOptions;
use sqlx::{Pool, Postgres, Transaction};

pub type DbPool = Pool<Postgres>;

pub async fn create_pool(database_url: &str, max_connections: u32) -> Result<DbPool> {
    let pool = PgPoolOptions::new()
        .max_connections(max_connections)
        .connect(database_url)
        .await?;

    Ok(pool)
}

/// Opens a transaction. Waitlist and coverage updates run inside one so the
/// row locks taken by `lock_lesson` hold until commit.
pub async fn begin(pool: &DbPool) -> Result<Transaction<'static, Postgres>> {
    Ok(pool.begin().await?)
}
