// SQLite persistence for recorded picks.

use std::sync::{Mutex, MutexGuard};

use anyhow::{Context, Result};
use mockdraft_core::draft::pick::PickRecord;
use rusqlite::{params, Connection};

/// SQLite-backed store of every recorded pick, scoped by draft id, plus a
/// small key-value table for session metadata.
pub struct Database {
    conn: Mutex<Connection>,
}

impl Database {
    /// Open (or create) a SQLite database at `path` and ensure all tables
    /// exist. Pass `":memory:"` for an ephemeral in-memory database.
    pub fn open(path: &str) -> Result<Self> {
        let conn = Connection::open(path)
            .with_context(|| format!("failed to open database at {path}"))?;

        conn.execute_batch(
            "PRAGMA journal_mode = WAL;
             PRAGMA busy_timeout = 5000;",
        )
        .context("failed to set database pragmas")?;

        conn.execute_batch(
            "
            CREATE TABLE IF NOT EXISTS draft_picks (
                draft_id     TEXT NOT NULL,
                overall_pick INTEGER NOT NULL,
                round        INTEGER NOT NULL,
                manager      TEXT NOT NULL,
                player_name  TEXT NOT NULL,
                category     TEXT,
                record_json  TEXT NOT NULL,
                timestamp    TEXT NOT NULL DEFAULT (strftime('%Y-%m-%dT%H:%M:%fZ', 'now')),
                PRIMARY KEY (draft_id, overall_pick)
            );

            CREATE TABLE IF NOT EXISTS draft_state (
                key   TEXT PRIMARY KEY,
                value TEXT NOT NULL
            );
            ",
        )
        .context("failed to create database schema")?;

        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// A poisoned lock still holds a usable connection; every write is a
    /// single statement or transaction.
    fn conn(&self) -> MutexGuard<'_, Connection> {
        self.conn.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Record one pick. Re-recording the same pick number for a draft is a
    /// no-op.
    pub fn record_pick(&self, record: &PickRecord, draft_id: &str) -> Result<()> {
        let conn = self.conn();
        let record_json = serde_json::to_string(record).context("failed to serialize pick")?;
        conn.execute(
            "INSERT OR IGNORE INTO draft_picks
                (draft_id, overall_pick, round, manager, player_name, category, record_json)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            params![
                draft_id,
                record.overall_pick,
                record.round,
                record.manager,
                record.player_label(),
                record.category.map(|c| c.key()),
                record_json,
            ],
        )
        .context("failed to record draft pick")?;
        Ok(())
    }

    /// Load the picks of one draft, in pick order.
    pub fn load_picks(&self, draft_id: &str) -> Result<Vec<PickRecord>> {
        let conn = self.conn();
        let mut stmt = conn
            .prepare(
                "SELECT record_json FROM draft_picks WHERE draft_id = ?1 ORDER BY overall_pick",
            )
            .context("failed to prepare load_picks query")?;

        let rows = stmt
            .query_map(params![draft_id], |row| row.get::<_, String>(0))
            .context("failed to query draft picks")?
            .collect::<std::result::Result<Vec<_>, _>>()
            .context("failed to map draft pick rows")?;

        rows.iter()
            .map(|json| serde_json::from_str::<PickRecord>(json).context("failed to deserialize stored pick"))
            .collect()
    }

    /// Number of picks recorded for a draft.
    pub fn pick_count(&self, draft_id: &str) -> Result<usize> {
        let conn = self.conn();
        let count: i64 = conn
            .query_row(
                "SELECT COUNT(*) FROM draft_picks WHERE draft_id = ?1",
                params![draft_id],
                |row| row.get(0),
            )
            .context("failed to count draft picks")?;
        Ok(count as usize)
    }

    /// Persist a JSON value under `key`, replacing any previous value.
    pub fn save_state(&self, key: &str, value: &serde_json::Value) -> Result<()> {
        let conn = self.conn();
        let json_str =
            serde_json::to_string(value).context("failed to serialize state value")?;
        conn.execute(
            "INSERT OR REPLACE INTO draft_state (key, value) VALUES (?1, ?2)",
            params![key, json_str],
        )
        .context("failed to save state")?;
        Ok(())
    }

    /// Load a saved JSON value by `key`.
    pub fn load_state(&self, key: &str) -> Result<Option<serde_json::Value>> {
        let conn = self.conn();
        let mut stmt = conn
            .prepare("SELECT value FROM draft_state WHERE key = ?1")
            .context("failed to prepare load_state query")?;

        let mut rows = stmt
            .query_map(params![key], |row| row.get::<_, String>(0))
            .context("failed to query draft state")?;

        match rows.next() {
            Some(row_result) => {
                let json_str = row_result.context("failed to read state row")?;
                let value = serde_json::from_str(&json_str)
                    .context("failed to deserialize state value")?;
                Ok(Some(value))
            }
            None => Ok(None),
        }
    }

    /// Delete one draft's picks. Other drafts are untouched.
    pub fn clear_draft(&self, draft_id: &str) -> Result<()> {
        let mut conn = self.conn();
        let tx = conn.transaction().context("failed to begin transaction")?;
        tx.execute("DELETE FROM draft_picks WHERE draft_id = ?1", params![draft_id])
            .context("failed to delete draft picks")?;
        tx.commit().context("failed to commit clear_draft")?;
        Ok(())
    }

    // ------------------------------------------------------------------
    // Draft ID management
    // ------------------------------------------------------------------

    const DRAFT_ID_KEY: &'static str = "current_draft_id";

    pub fn get_draft_id(&self) -> Result<Option<String>> {
        let value = self.load_state(Self::DRAFT_ID_KEY)?;
        Ok(value.and_then(|v| v.as_str().map(|s| s.to_string())))
    }

    pub fn set_draft_id(&self, draft_id: &str) -> Result<()> {
        self.save_state(
            Self::DRAFT_ID_KEY,
            &serde_json::Value::String(draft_id.to_string()),
        )
    }

    /// New draft id from the current UTC time, e.g.
    /// `draft_20260228_143022_123`.
    pub fn generate_draft_id() -> String {
        chrono::Utc::now().format("draft_%Y%m%d_%H%M%S_%3f").to_string()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
