//! History store — append-only record of past rewrites.
//!
//! `AppState` holds an `Arc<dyn HistoryStore>`; the rewrite flow never touches
//! SQLite directly. Entries are never edited and only ever removed all at once.

pub mod handlers;

use anyhow::Result;
use async_trait::async_trait;
use sqlx::SqlitePool;
use tracing::info;

use crate::models::history::{HistoryEntry, HistoryEntryRow, NewHistoryEntry};

#[async_trait]
pub trait HistoryStore: Send + Sync {
    /// Inserts an entry and returns its id. Ids only ever grow.
    async fn append(&self, entry: NewHistoryEntry) -> Result<i64>;

    /// Full snapshot, newest first.
    async fn list_recent(&self) -> Result<Vec<HistoryEntry>>;

    async fn get(&self, id: i64) -> Result<Option<HistoryEntry>>;

    async fn clear_all(&self) -> Result<()>;

    /// Entries whose input contains `query`, ignoring case. Newest first.
    async fn search(&self, query: &str) -> Result<Vec<HistoryEntry>> {
        let needle = query.trim().to_lowercase();
        let entries = self.list_recent().await?;
        if needle.is_empty() {
            return Ok(entries);
        }
        Ok(entries
            .into_iter()
            .filter(|e| e.input_text.to_lowercase().contains(&needle))
            .collect())
    }
}

/// SQLite-backed history store. Survives restarts until cleared.
pub struct SqliteHistoryStore {
    pool: SqlitePool,
}

impl SqliteHistoryStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl HistoryStore for SqliteHistoryStore {
    async fn append(&self, entry: NewHistoryEntry) -> Result<i64> {
        let NewHistoryEntry {
            input_text,
            tone,
            result,
            created_at,
        } = entry;

        let id = sqlx::query(
            r#"
            INSERT INTO history_entries
                (input_text, tone, corrected, professional, casual, genz, created_at)
            VALUES (?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(input_text)
        .bind(tone)
        .bind(result.corrected)
        .bind(result.professional)
        .bind(result.casual)
        .bind(result.genz)
        .bind(created_at)
        .execute(&self.pool)
        .await?
        .last_insert_rowid();

        info!("History entry {id} saved");
        Ok(id)
    }

    async fn list_recent(&self) -> Result<Vec<HistoryEntry>> {
        let rows = sqlx::query_as::<_, HistoryEntryRow>(
            "SELECT * FROM history_entries ORDER BY created_at DESC, id DESC",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(HistoryEntry::from).collect())
    }

    async fn get(&self, id: i64) -> Result<Option<HistoryEntry>> {
        let row = sqlx::query_as::<_, HistoryEntryRow>("SELECT * FROM history_entries WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.map(HistoryEntry::from))
    }

    async fn clear_all(&self) -> Result<()> {
        let deleted = sqlx::query("DELETE FROM history_entries")
            .execute(&self.pool)
            .await?
            .rows_affected();

        info!("History cleared ({deleted} entries)");
        Ok(())
    }
}
