//! Run history store
//!
//! Every analysis command records what it ran into a small SQLite database
//! under `.lrt/history.db`: a ULID run ID, the UTC timestamp, the command
//! line, a SHA-256 digest of the input file and a JSON summary of the
//! headline results. `lrt history` reads it back.

use std::path::Path;

use chrono::{DateTime, Utc};
use rusqlite::{Connection, OptionalExtension};
use sha2::{Digest, Sha256};
use thiserror::Error;
use ulid::Ulid;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("history database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("failed to read input for digest: {0}")]
    Io(#[from] std::io::Error),

    #[error("malformed run summary: {0}")]
    Summary(#[from] serde_json::Error),

    #[error("no run matches '{0}'")]
    NotFound(String),
}

/// One recorded analysis run
#[derive(Debug, Clone)]
pub struct RunRecord {
    /// ULID, lexically ordered by creation time
    pub id: String,
    pub timestamp: DateTime<Utc>,
    /// Command group and subcommand, e.g. "predict part-stress"
    pub command: String,
    /// Input file the run read, relative to where it was invoked
    pub input_path: String,
    /// SHA-256 hex digest of the input file contents
    pub input_digest: String,
    /// Headline results as JSON
    pub summary: serde_json::Value,
}

impl RunRecord {
    /// Build a record for a run that just finished, digesting the input file
    pub fn new(
        command: impl Into<String>,
        input_path: &Path,
        summary: serde_json::Value,
    ) -> Result<Self, StoreError> {
        let body = std::fs::read(input_path)?;
        let digest = hex_digest(&body);

        Ok(Self {
            id: Ulid::new().to_string(),
            timestamp: Utc::now(),
            command: command.into(),
            input_path: input_path.display().to_string(),
            input_digest: digest,
            summary,
        })
    }
}

/// SHA-256 digest as lowercase hex
pub fn hex_digest(body: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(body);
    let digest = hasher.finalize();
    digest.iter().map(|b| format!("{:02x}", b)).collect()
}

/// SQLite-backed store of past analysis runs
pub struct HistoryStore {
    conn: Connection,
}

impl HistoryStore {
    /// Open (and create if missing) the store at `path`
    pub fn open(path: &Path) -> Result<Self, StoreError> {
        let conn = Connection::open(path)?;
        conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS runs (
                id           TEXT PRIMARY KEY,
                timestamp    TEXT NOT NULL,
                command      TEXT NOT NULL,
                input_path   TEXT NOT NULL,
                input_digest TEXT NOT NULL,
                summary      TEXT NOT NULL
            );
            CREATE INDEX IF NOT EXISTS idx_runs_timestamp ON runs (timestamp);",
        )?;
        Ok(Self { conn })
    }

    /// In-memory store for tests
    pub fn open_in_memory() -> Result<Self, StoreError> {
        let conn = Connection::open_in_memory()?;
        conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS runs (
                id           TEXT PRIMARY KEY,
                timestamp    TEXT NOT NULL,
                command      TEXT NOT NULL,
                input_path   TEXT NOT NULL,
                input_digest TEXT NOT NULL,
                summary      TEXT NOT NULL
            );",
        )?;
        Ok(Self { conn })
    }

    /// Insert one run
    pub fn record(&self, run: &RunRecord) -> Result<(), StoreError> {
        self.conn.execute(
            "INSERT INTO runs (id, timestamp, command, input_path, input_digest, summary)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            (
                &run.id,
                run.timestamp.to_rfc3339(),
                &run.command,
                &run.input_path,
                &run.input_digest,
                run.summary.to_string(),
            ),
        )?;
        Ok(())
    }

    /// Most recent runs, newest first
    pub fn list(&self, limit: usize) -> Result<Vec<RunRecord>, StoreError> {
        let mut stmt = self.conn.prepare(
            "SELECT id, timestamp, command, input_path, input_digest, summary
             FROM runs ORDER BY timestamp DESC, id DESC LIMIT ?1",
        )?;
        let rows = stmt.query_map([limit], row_to_record)?;

        let mut runs = Vec::new();
        for row in rows {
            runs.push(parse_record(row?)?);
        }
        Ok(runs)
    }

    /// Fetch one run by full ID or unique prefix
    pub fn get(&self, id: &str) -> Result<RunRecord, StoreError> {
        let pattern = format!("{}%", id);
        let raw = self
            .conn
            .query_row(
                "SELECT id, timestamp, command, input_path, input_digest, summary
                 FROM runs WHERE id LIKE ?1 ORDER BY id LIMIT 1",
                [&pattern],
                row_to_record,
            )
            .optional()?;

        match raw {
            Some(row) => parse_record(row),
            None => Err(StoreError::NotFound(id.to_string())),
        }
    }

    /// Delete every recorded run, returning how many were removed
    pub fn clear(&self) -> Result<usize, StoreError> {
        Ok(self.conn.execute("DELETE FROM runs", [])?)
    }
}

type RawRecord = (String, String, String, String, String, String);

fn row_to_record(row: &rusqlite::Row<'_>) -> rusqlite::Result<RawRecord> {
    Ok((
        row.get(0)?,
        row.get(1)?,
        row.get(2)?,
        row.get(3)?,
        row.get(4)?,
        row.get(5)?,
    ))
}

fn parse_record(raw: RawRecord) -> Result<RunRecord, StoreError> {
    let (id, timestamp, command, input_path, input_digest, summary) = raw;
    Ok(RunRecord {
        id,
        timestamp: DateTime::parse_from_rfc3339(&timestamp)
            .map(|t| t.with_timezone(&Utc))
            .unwrap_or_else(|_| Utc::now()),
        command,
        input_path,
        input_digest,
        summary: serde_json::from_str(&summary)?,
    })
}
