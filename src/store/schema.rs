use crate::error::TrackerResult;
use rusqlite::{Connection, ErrorCode};

const CREATE_TABLES: &str = r#"
CREATE TABLE IF NOT EXISTS tasks (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT NOT NULL,
    tags TEXT,
    start_time TEXT NOT NULL,
    end_time TEXT,
    duration_seconds INTEGER,
    is_running INTEGER DEFAULT 0
);

CREATE TABLE IF NOT EXISTS settings (
    key TEXT PRIMARY KEY,
    value TEXT
);

CREATE INDEX IF NOT EXISTS idx_tasks_start_time ON tasks(start_time);
"#;

/// At most one row may carry is_running = 1
const CREATE_SINGLE_RUNNING_INDEX: &str = "CREATE UNIQUE INDEX IF NOT EXISTS idx_tasks_single_running \
     ON tasks(is_running) WHERE is_running = 1";

/// Idempotently create the tables and indexes.
///
/// A database written by an older build may already hold several running rows;
/// the unique index is skipped in that case and the guarded insert in
/// `TaskStore::start_task_at` remains the only check.
pub fn initialize(conn: &Connection) -> TrackerResult<()> {
    conn.execute_batch(CREATE_TABLES)?;

    match conn.execute_batch(CREATE_SINGLE_RUNNING_INDEX) {
        Ok(()) => Ok(()),
        Err(rusqlite::Error::SqliteFailure(err, _)) if err.code == ErrorCode::ConstraintViolation => {
            Ok(())
        }
        Err(e) => Err(e.into()),
    }
}
