use super::schema;
use crate::domain::{elapsed_seconds, format_timestamp, parse_timestamp, split_tags, TaskRecord, Theme};
use crate::error::{TrackerError, TrackerResult};
use chrono::{Local, NaiveDate, NaiveDateTime};
use rusqlite::{params, Connection, OptionalExtension, Row};
use std::collections::BTreeSet;
use std::path::Path;

/// Default page size for the history list
pub const DEFAULT_HISTORY_LIMIT: usize = 100;

/// Settings key holding the theme preference
pub const THEME_KEY: &str = "dark_mode";

const TASK_COLUMNS: &str = "id, name, tags, start_time, end_time, duration_seconds, is_running";

const INSERT_RUNNING_TASK: &str = "INSERT INTO tasks (name, tags, start_time, is_running)
     SELECT ?1, ?2, ?3, 1
     WHERE NOT EXISTS (SELECT 1 FROM tasks WHERE is_running = 1)";
const SELECT_START_TIME: &str = "SELECT start_time FROM tasks WHERE id = ?1";
const FINISH_TASK: &str =
    "UPDATE tasks SET end_time = ?1, duration_seconds = ?2, is_running = 0 WHERE id = ?3";
const UPDATE_TASK: &str = "UPDATE tasks SET name = ?1, tags = ?2, start_time = ?3, end_time = ?4, duration_seconds = ?5
     WHERE id = ?6";
const DELETE_TASK: &str = "DELETE FROM tasks WHERE id = ?1";
const SELECT_TAGS: &str = "SELECT DISTINCT tags FROM tasks WHERE tags IS NOT NULL AND tags != ''";
const SELECT_SETTING: &str = "SELECT value FROM settings WHERE key = ?1";
const UPSERT_SETTING: &str = "INSERT INTO settings (key, value) VALUES (?1, ?2)
     ON CONFLICT(key) DO UPDATE SET value = excluded.value";

/// SQLite-backed store for task and setting records.
///
/// Every operation is a single synchronous statement against one held connection.
pub struct TaskStore {
    conn: Connection,
}

impl TaskStore {
    /// Open (or create) the database at `path` and ensure the schema exists
    pub fn open(path: &Path) -> TrackerResult<Self> {
        let conn = Connection::open(path)?;
        Self::from_connection(conn)
    }

    /// Open an in-memory database (used by tests)
    pub fn open_in_memory() -> TrackerResult<Self> {
        let conn = Connection::open_in_memory()?;
        Self::from_connection(conn)
    }

    fn from_connection(conn: Connection) -> TrackerResult<Self> {
        let store = Self { conn };
        store.initialize()?;
        Ok(store)
    }

    /// Ensure the tasks and settings tables exist. Safe to call repeatedly.
    pub fn initialize(&self) -> TrackerResult<()> {
        schema::initialize(&self.conn)
    }

    /// Start a task now
    pub fn start_task(&self, name: &str, tags: &str) -> TrackerResult<i64> {
        self.start_task_at(name, tags, Local::now().naive_local())
    }

    /// Insert a running task started at `at`, returning its id.
    ///
    /// Refuses with `AlreadyRunning` when another task is still running.
    pub fn start_task_at(&self, name: &str, tags: &str, at: NaiveDateTime) -> TrackerResult<i64> {
        let inserted = self
            .conn
            .execute(INSERT_RUNNING_TASK, params![name, tags, format_timestamp(at)])?;

        if inserted == 0 {
            let running_id = self.get_running_task()?.map(|task| task.id).unwrap_or_default();
            return Err(TrackerError::AlreadyRunning(running_id));
        }

        Ok(self.conn.last_insert_rowid())
    }

    /// Stop a task now
    pub fn stop_task(&self, id: i64) -> TrackerResult<()> {
        self.stop_task_at(id, Local::now().naive_local())
    }

    /// Close the task at `at`. Unknown ids are ignored.
    pub fn stop_task_at(&self, id: i64, at: NaiveDateTime) -> TrackerResult<()> {
        let start: Option<String> = self
            .conn
            .query_row(SELECT_START_TIME, params![id], |row| row.get(0))
            .optional()?;

        let Some(start) = start else {
            return Ok(());
        };

        let duration = elapsed_seconds(parse_timestamp(&start)?, at);
        self.conn
            .execute(FINISH_TASK, params![format_timestamp(at), duration, id])?;
        Ok(())
    }

    /// The most recently started running task, if any
    pub fn get_running_task(&self) -> TrackerResult<Option<TaskRecord>> {
        let sql = format!(
            "SELECT {} FROM tasks WHERE is_running = 1 ORDER BY start_time DESC LIMIT 1",
            TASK_COLUMNS
        );
        Ok(self.conn.query_row(&sql, [], map_task).optional()?)
    }

    /// Point lookup by id
    pub fn get_task(&self, id: i64) -> TrackerResult<Option<TaskRecord>> {
        let sql = format!("SELECT {} FROM tasks WHERE id = ?1", TASK_COLUMNS);
        Ok(self.conn.query_row(&sql, params![id], map_task).optional()?)
    }

    /// Newest-first history, at most `limit` rows
    pub fn get_all_tasks(&self, limit: usize) -> TrackerResult<Vec<TaskRecord>> {
        let sql = format!(
            "SELECT {} FROM tasks ORDER BY start_time DESC LIMIT ?1",
            TASK_COLUMNS
        );
        let limit = i64::try_from(limit).unwrap_or(i64::MAX);
        self.query_tasks(&sql, params![limit])
    }

    /// Tasks whose start date lies in `[start_date, end_date]`, newest first
    pub fn get_tasks_by_date_range(
        &self,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> TrackerResult<Vec<TaskRecord>> {
        let sql = format!(
            "SELECT {} FROM tasks WHERE date(start_time) BETWEEN ?1 AND ?2 ORDER BY start_time DESC",
            TASK_COLUMNS
        );
        self.query_tasks(
            &sql,
            params![
                start_date.format("%Y-%m-%d").to_string(),
                end_date.format("%Y-%m-%d").to_string()
            ],
        )
    }

    /// Overwrite a task's fields and recompute its duration from the new times.
    ///
    /// Both timestamps are parsed before anything is written. `end < start`
    /// is stored as a negative duration. Unknown ids are ignored.
    pub fn update_task(
        &self,
        id: i64,
        name: &str,
        tags: &str,
        start_time: &str,
        end_time: &str,
    ) -> TrackerResult<()> {
        let start = parse_timestamp(start_time)?;
        let end = parse_timestamp(end_time)?;
        let duration = elapsed_seconds(start, end);

        self.conn.execute(
            UPDATE_TASK,
            params![
                name,
                tags,
                format_timestamp(start),
                format_timestamp(end),
                duration,
                id
            ],
        )?;
        Ok(())
    }

    /// Remove a task. Unknown ids are ignored.
    pub fn delete_task(&self, id: i64) -> TrackerResult<()> {
        self.conn.execute(DELETE_TASK, params![id])?;
        Ok(())
    }

    /// Every distinct trimmed tag across all tasks, sorted
    pub fn get_all_tags(&self) -> TrackerResult<Vec<String>> {
        let mut stmt = self.conn.prepare(SELECT_TAGS)?;
        let rows = stmt.query_map([], |row| row.get::<_, String>(0))?;

        let mut tags = BTreeSet::new();
        for row in rows {
            let raw = row?;
            tags.extend(split_tags(&raw).map(str::to_string));
        }
        Ok(tags.into_iter().collect())
    }

    /// Look up a setting, falling back to `default` when absent
    pub fn get_setting(&self, key: &str, default: &str) -> TrackerResult<String> {
        let value: Option<Option<String>> = self
            .conn
            .query_row(SELECT_SETTING, params![key], |row| row.get(0))
            .optional()?;
        Ok(value.flatten().unwrap_or_else(|| default.to_string()))
    }

    /// Insert or overwrite a setting
    pub fn set_setting(&self, key: &str, value: &str) -> TrackerResult<()> {
        self.conn.execute(UPSERT_SETTING, params![key, value])?;
        Ok(())
    }

    /// Persisted theme preference (dark unless set otherwise)
    pub fn theme(&self) -> TrackerResult<Theme> {
        let value = self.get_setting(THEME_KEY, Theme::Dark.to_setting())?;
        Ok(Theme::from_setting(&value))
    }

    pub fn set_theme(&self, theme: Theme) -> TrackerResult<()> {
        self.set_setting(THEME_KEY, theme.to_setting())
    }

    fn query_tasks(&self, sql: &str, params: impl rusqlite::Params) -> TrackerResult<Vec<TaskRecord>> {
        let mut stmt = self.conn.prepare(sql)?;
        let rows = stmt.query_map(params, map_task)?;

        let mut tasks = Vec::new();
        for row in rows {
            tasks.push(row?);
        }
        Ok(tasks)
    }
}

fn map_task(row: &Row<'_>) -> rusqlite::Result<TaskRecord> {
    Ok(TaskRecord {
        id: row.get(0)?,
        name: row.get(1)?,
        tags: row.get::<_, Option<String>>(2)?.unwrap_or_default(),
        start_time: row.get(3)?,
        end_time: row.get(4)?,
        duration_seconds: row.get(5)?,
        is_running: row.get::<_, Option<i64>>(6)?.unwrap_or(0) != 0,
    })
}
