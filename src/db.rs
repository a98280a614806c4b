use sqlx::SqlitePool;

const SCHEMA: &[&str] = &[
    r#"
    CREATE TABLE IF NOT EXISTS users (
        id              INTEGER PRIMARY KEY AUTOINCREMENT,
        name            TEXT    NOT NULL,
        email           TEXT    NOT NULL UNIQUE,
        password_hash   TEXT    NOT NULL,
        created_at      TEXT    NOT NULL DEFAULT CURRENT_TIMESTAMP
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS subjects (
        id              INTEGER PRIMARY KEY AUTOINCREMENT,
        subject_name    TEXT    NOT NULL,
        user_id         INTEGER NOT NULL REFERENCES users(id)
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS attendance (
        id               INTEGER PRIMARY KEY AUTOINCREMENT,
        subject_id       INTEGER NOT NULL REFERENCES subjects(id),
        type             TEXT    NOT NULL CHECK (type IN ('class', 'lab')),
        total_classes    INTEGER NOT NULL DEFAULT 0,
        attended_classes INTEGER NOT NULL DEFAULT 0,
        UNIQUE (subject_id, type)
    )
    "#,
];

pub async fn init_db(database_url: &str) -> anyhow::Result<SqlitePool> {
    let pool = SqlitePool::connect(database_url).await?;
    init_schema(&pool).await?;
    Ok(pool)
}

pub async fn init_schema(pool: &SqlitePool) -> anyhow::Result<()> {
    for stmt in SCHEMA {
        sqlx::query(stmt).execute(pool).await?;
    }
    Ok(())
}
