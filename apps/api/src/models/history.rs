use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::FromRow;

use crate::rewrite::reply_parser::RewriteResult;

/// Raw `history_entries` row.
#[derive(Debug, Clone, FromRow)]
pub struct HistoryEntryRow {
    pub id: i64,
    pub input_text: String,
    pub tone: String,
    pub corrected: String,
    pub professional: String,
    pub casual: String,
    pub genz: String,
    pub created_at: DateTime<Utc>,
}

/// One persisted rewrite: the input, the tone it ran with, and its four variants.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HistoryEntry {
    pub id: i64,
    pub input_text: String,
    pub tone: String,
    #[serde(flatten)]
    pub result: RewriteResult,
    pub created_at: DateTime<Utc>,
}

impl From<HistoryEntryRow> for HistoryEntry {
    fn from(row: HistoryEntryRow) -> Self {
        Self {
            id: row.id,
            input_text: row.input_text,
            tone: row.tone,
            result: RewriteResult {
                corrected: row.corrected,
                professional: row.professional,
                casual: row.casual,
                genz: row.genz,
            },
            created_at: row.created_at,
        }
    }
}

/// Insert form of a history entry; the store assigns the id.
#[derive(Debug, Clone)]
pub struct NewHistoryEntry {
    pub input_text: String,
    pub tone: String,
    pub result: RewriteResult,
    pub created_at: DateTime<Utc>,
}
