use eyre::Result;
use sqlx::{Pool, Postgres};
use tracing::info;

pub async fn initialize_database(pool: &Pool<Postgres>) -> Result<()> {
    info!("Initializing database schema...");

    // Create swimmers table
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS swimmers (
            id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
            name VARCHAR(255) NOT NULL,
            email VARCHAR(255) NOT NULL UNIQUE,
            level INTEGER NOT NULL DEFAULT 0 CHECK (level >= 0),
            created_at TIMESTAMP WITH TIME ZONE NOT NULL DEFAULT NOW()
        );
        "#,
    )
    .execute(pool)
    .await?;

    // Create instructors table
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS instructors (
            id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
            name VARCHAR(255) NOT NULL,
            email VARCHAR(255) NOT NULL UNIQUE,
            created_at TIMESTAMP WITH TIME ZONE NOT NULL DEFAULT NOW()
        );
        "#,
    )
    .execute(pool)
    .await?;

    // Create lessons table. Schedule columns stay nullable for draft lessons.
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS lessons (
            id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
            name VARCHAR(255) NOT NULL,
            level INTEGER NOT NULL DEFAULT 0,
            capacity INTEGER NOT NULL CHECK (capacity > 0),
            instructor_id UUID NULL REFERENCES instructors(id),
            start_date DATE NULL,
            end_date DATE NULL,
            meeting_days TEXT[] NULL,
            start_time TIME NULL,
            end_time TIME NULL,
            created_at TIMESTAMP WITH TIME ZONE NOT NULL DEFAULT NOW()
        );
        "#,
    )
    .execute(pool)
    .await?;

    // Create enrollments table
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS enrollments (
            lesson_id UUID NOT NULL REFERENCES lessons(id),
            swimmer_id UUID NOT NULL REFERENCES swimmers(id),
            created_at TIMESTAMP WITH TIME ZONE NOT NULL DEFAULT NOW(),
            PRIMARY KEY (lesson_id, swimmer_id)
        );
        "#,
    )
    .execute(pool)
    .await?;

    // Create waitlist_entries table
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS waitlist_entries (
            id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
            lesson_id UUID NOT NULL REFERENCES lessons(id),
            swimmer_id UUID NOT NULL REFERENCES swimmers(id),
            position INTEGER NOT NULL CHECK (position > 0),
            status VARCHAR(16) NOT NULL DEFAULT 'active'
                CHECK (status IN ('active', 'inactive')),
            exit_reason VARCHAR(16) NULL
                CHECK (exit_reason IN ('promoted', 'cancelled')),
            created_at TIMESTAMP WITH TIME ZONE NOT NULL DEFAULT NOW()
        );
        "#,
    )
    .execute(pool)
    .await?;

    // Create coverage_requests table
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS coverage_requests (
            id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
            lesson_id UUID NOT NULL REFERENCES lessons(id),
            requesting_instructor_id UUID NOT NULL REFERENCES instructors(id),
            covering_instructor_id UUID NULL REFERENCES instructors(id),
            status VARCHAR(16) NOT NULL DEFAULT 'open'
                CHECK (status IN ('open', 'filled', 'cancelled')),
            note TEXT NULL,
            created_at TIMESTAMP WITH TIME ZONE NOT NULL DEFAULT NOW(),
            resolved_at TIMESTAMP WITH TIME ZONE NULL
        );
        "#,
    )
    .execute(pool)
    .await?;

    // Create indexes (prepared statements take one command each)
    let indexes = [
        "CREATE INDEX IF NOT EXISTS idx_lessons_instructor_id ON lessons(instructor_id)",
        "CREATE INDEX IF NOT EXISTS idx_enrollments_swimmer_id ON enrollments(swimmer_id)",
        "CREATE INDEX IF NOT EXISTS idx_waitlist_entries_lesson_id ON waitlist_entries(lesson_id)",
        "CREATE INDEX IF NOT EXISTS idx_waitlist_entries_active \
            ON waitlist_entries(lesson_id, position) WHERE status = 'active'",
        "CREATE UNIQUE INDEX IF NOT EXISTS idx_waitlist_entries_one_active_per_swimmer \
            ON waitlist_entries(lesson_id, swimmer_id) WHERE status = 'active'",
        "CREATE INDEX IF NOT EXISTS idx_coverage_requests_status ON coverage_requests(status)",
        "CREATE INDEX IF NOT EXISTS idx_coverage_requests_lesson_id ON coverage_requests(lesson_id)",
        "CREATE UNIQUE INDEX IF NOT EXISTS idx_coverage_requests_one_open_per_lesson \
            ON coverage_requests(lesson_id) WHERE status = 'open'",
    ];
    for statement in indexes {
        sqlx::query(statement).execute(pool).await?;
    }

    info!("Database schema initialized successfully.");
    Ok(())
}
