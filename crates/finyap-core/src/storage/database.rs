//! SQLite-based play history and statistics.
//!
//! Provides persistent storage for:
//! - The sentence catalog (one row per distinct source text)
//! - Single-guess play log
//! - Completed sentence results with per-word attempt details
//! - Key-value store for application state

use std::path::Path;

use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension};
use serde::{Deserialize, Serialize};

use crate::content::{ScenarioStat, Sentence, SentenceId};
use crate::error::{DatabaseError, Result};
use crate::session::{GuessLog, Recorder, SentenceResult, WordAttempt};

use super::data_dir;
use super::migrations;

/// A sentence result read back from storage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredResult {
    pub completed_at: DateTime<Utc>,
    pub result: SentenceResult,
}

/// SQLite database for play history.
pub struct Database {
    conn: Connection,
}

impl Database {
    /// Get a reference to the underlying SQLite connection.
    pub fn conn(&self) -> &Connection {
        &self.conn
    }

    /// Open the database at `~/.config/finyap/finyap.db`.
    ///
    /// Creates the database file and schema if they don't exist.
    ///
    /// # Errors
    /// Returns an error if the database cannot be opened or migrated.
    pub fn open() -> Result<Self> {
        Self::open_at(data_dir()?.join("finyap.db"))
    }

    /// Open (or create) the database at an explicit path.
    ///
    /// # Errors
    /// Returns an error if the database cannot be opened or migrated.
    pub fn open_at(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let conn = Connection::open(path).map_err(|source| DatabaseError::OpenFailed {
            path: path.to_path_buf(),
            source,
        })?;
        tracing::debug!(path = %path.display(), "opened database");
        Self::with_connection(conn)
    }

    /// Open an in-memory database.
    ///
    /// # Errors
    /// Returns an error if the schema cannot be created.
    pub fn open_memory() -> Result<Self> {
        let conn = Connection::open_in_memory().map_err(|source| DatabaseError::OpenFailed {
            path: ":memory:".into(),
            source,
        })?;
        Self::with_connection(conn)
    }

    fn with_connection(conn: Connection) -> Result<Self> {
        migrations::migrate(&conn).map_err(|e| DatabaseError::MigrationFailed(e.to_string()))?;
        Ok(Self { conn })
    }

    /// Make sure every sentence has a row and give each its row id.
    ///
    /// Sentences are keyed by source text; an existing row keeps its id and
    /// scenario, so history survives file renames and reordering.
    ///
    /// # Errors
    /// Returns an error if any insert or lookup fails; nothing is written then.
    pub fn sync_sentences(&mut self, sentences: &mut [Sentence]) -> Result<()> {
        let tx = self.conn.transaction()?;
        {
            let mut insert = tx.prepare(
                "INSERT OR IGNORE INTO sentences (scenario, source_text, translation)
                 VALUES (?1, ?2, ?3)",
            )?;
            let mut lookup = tx.prepare("SELECT id FROM sentences WHERE source_text = ?1")?;

            for sentence in sentences.iter_mut() {
                insert.execute(params![
                    sentence.scenario(),
                    sentence.text(),
                    sentence.translation()
                ])?;
                let id: SentenceId = lookup
                    .query_row(params![sentence.text()], |row| row.get(0))
                    .optional()?
                    .ok_or_else(|| DatabaseError::MissingSentence(sentence.text().to_string()))?;
                sentence.assign_id(id);
            }
        }
        tx.commit()?;
        tracing::info!(count = sentences.len(), "synced sentences");
        Ok(())
    }

    /// Per-scenario history, alphabetical by scenario name.
    ///
    /// A play is one completed sentence result; scenarios never played
    /// report zero plays.
    ///
    /// # Errors
    /// Returns an error if the query fails.
    pub fn scenario_stats(&self) -> Result<Vec<ScenarioStat>> {
        let mut stmt = self.conn.prepare(
            "SELECT
                s.scenario,
                COUNT(sr.id),
                COALESCE(SUM(CASE WHEN sr.was_successful = 1 THEN 1 ELSE 0 END), 0),
                COUNT(DISTINCT s.id)
             FROM sentences s
             LEFT JOIN sentence_results sr ON s.id = sr.sentence_id
             GROUP BY s.scenario
             ORDER BY s.scenario ASC",
        )?;
        let rows = stmt.query_map([], |row| {
            Ok(ScenarioStat {
                name: row.get(0)?,
                total_plays: row.get(1)?,
                correct_plays: row.get(2)?,
                sentence_count: row.get(3)?,
            })
        })?;
        let stats = rows.collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(stats)
    }

    /// Latest results for one sentence, newest first.
    ///
    /// # Errors
    /// Returns an error if the query fails or a stored row is malformed.
    pub fn recent_results(
        &self,
        sentence_id: SentenceId,
        limit: usize,
    ) -> Result<Vec<StoredResult>> {
        let mut stmt = self.conn.prepare(
            "SELECT completed_at, total_duration_ms, was_successful, attempt_details
             FROM sentence_results
             WHERE sentence_id = ?1
             ORDER BY completed_at DESC, id DESC
             LIMIT ?2",
        )?;
        let limit = i64::try_from(limit).unwrap_or(i64::MAX);
        let rows = stmt.query_map(params![sentence_id, limit], |row| {
            Ok((
                row.get::<_, String>(0)?,
                row.get::<_, u64>(1)?,
                row.get::<_, bool>(2)?,
                row.get::<_, Option<String>>(3)?,
            ))
        })?;

        let mut out = Vec::new();
        for row in rows {
            let (completed_at, total_duration_ms, success, details) = row?;
            let completed_at = DateTime::parse_from_rfc3339(&completed_at)
                .map_err(|e| DatabaseError::QueryFailed(format!("bad completed_at: {e}")))?
                .with_timezone(&Utc);
            let attempts: Vec<WordAttempt> = match details {
                Some(json) if !json.is_empty() => serde_json::from_str(&json)?,
                _ => Vec::new(),
            };
            out.push(StoredResult {
                completed_at,
                result: SentenceResult {
                    sentence_id,
                    success,
                    total_duration_ms,
                    attempts,
                },
            });
        }
        Ok(out)
    }

    /// Get a value from the kv store.
    ///
    /// # Errors
    /// Returns an error if the query fails.
    pub fn kv_get(&self, key: &str) -> Result<Option<String>> {
        let value = self
            .conn
            .query_row("SELECT value FROM kv WHERE key = ?1", params![key], |row| {
                row.get::<_, String>(0)
            })
            .optional()?;
        Ok(value)
    }

    /// Set a value in the kv store.
    ///
    /// # Errors
    /// Returns an error if the write fails.
    pub fn kv_set(&self, key: &str, value: &str) -> Result<()> {
        self.conn.execute(
            "INSERT OR REPLACE INTO kv (key, value) VALUES (?1, ?2)",
            params![key, value],
        )?;
        Ok(())
    }
}

impl Recorder for Database {
    fn log_play(&self, log: &GuessLog) -> Result<()> {
        self.conn.execute(
            "INSERT INTO plays (sentence_id, was_correct, played_at) VALUES (?1, ?2, ?3)",
            params![log.sentence_id, log.correct, log.at.to_rfc3339()],
        )?;
        Ok(())
    }

    fn log_sentence_result(&self, result: &SentenceResult) -> Result<()> {
        let details = result.attempts_json()?;
        self.conn.execute(
            "INSERT INTO sentence_results
                (sentence_id, completed_at, total_duration_ms, was_successful, attempt_details)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                result.sentence_id,
                Utc::now().to_rfc3339(),
                result.total_duration_ms,
                result.success,
                details,
            ],
        )?;
        tracing::debug!(
            sentence_id = result.sentence_id,
            success = result.success,
            "stored sentence result"
        );
        Ok(())
    }
}
