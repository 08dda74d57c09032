use std::str::FromStr;

use anyhow::{Context, Result};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::SqlitePool;
use tracing::info;

const SCHEMA: &[&str] = &[
    r#"CREATE TABLE IF NOT EXISTS history_entries (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    input_text TEXT NOT NULL,
    tone TEXT NOT NULL,
    corrected TEXT NOT NULL DEFAULT '',
    professional TEXT NOT NULL DEFAULT '',
    casual TEXT NOT NULL DEFAULT '',
    genz TEXT NOT NULL DEFAULT '',
    created_at TEXT NOT NULL
)"#,
    "CREATE INDEX IF NOT EXISTS idx_history_entries_created_at ON history_entries (created_at)",
];

/// Creates the SQLite connection pool and makes sure the schema exists.
///
/// The database file is created on first use. `sqlite::memory:` gets a single
/// connection, since every connection would otherwise see its own empty database.
pub async fn create_pool(database_url: &str) -> Result<SqlitePool> {
    info!("Opening SQLite database at {database_url}");

    let options = SqliteConnectOptions::from_str(database_url)
        .with_context(|| format!("Invalid DATABASE_URL '{database_url}'"))?
        .create_if_missing(true);

    let in_memory = database_url.contains(":memory:");
    let pool = SqlitePoolOptions::new()
        .max_connections(if in_memory { 1 } else { 5 })
        .idle_timeout(None)
        .max_lifetime(None)
        .connect_with(options)
        .await?;

    for statement in SCHEMA {
        sqlx::query(statement).execute(&pool).await?;
    }

    info!("SQLite pool established");
    Ok(pool)
}
