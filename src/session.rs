use crate::domain::{format_hms, SummaryPeriod, TaskRecord};
use crate::error::{TrackerError, TrackerResult};
use crate::report::{generate_summary, SummaryWindow};
use crate::store::TaskStore;
use crate::ticker::Ticker;
use chrono::{Local, NaiveDate, NaiveDateTime};
use std::time::Instant;

/// Coordinates the single running task on top of the store.
///
/// Idle when `current_task_id` is `None`, Tracking otherwise. The store's
/// `is_running` flag is the source of truth; `open` and `recover` resync from it.
pub struct Session {
    store: TaskStore,
    current_task_id: Option<i64>,
    ticker: Ticker,
}

impl Session {
    /// Wrap a store and pick up a task left running by a previous run
    pub fn open(store: TaskStore) -> TrackerResult<Self> {
        let mut session = Self {
            store,
            current_task_id: None,
            ticker: Ticker::default(),
        };
        session.recover()?;
        Ok(session)
    }

    /// Re-read the running task from the store and enter the matching state
    pub fn recover(&mut self) -> TrackerResult<Option<TaskRecord>> {
        let running = self.store.get_running_task()?;
        match &running {
            Some(task) => {
                if self.current_task_id != Some(task.id) {
                    self.ticker.start(Instant::now());
                }
                self.current_task_id = Some(task.id);
            }
            None => {
                self.current_task_id = None;
                self.ticker.cancel();
            }
        }
        Ok(running)
    }

    pub fn store(&self) -> &TaskStore {
        &self.store
    }

    pub fn current_task_id(&self) -> Option<i64> {
        self.current_task_id
    }

    pub fn is_tracking(&self) -> bool {
        self.current_task_id.is_some()
    }

    pub fn ticker(&self) -> &Ticker {
        &self.ticker
    }

    /// Start tracking a new task now
    pub fn start(&mut self, name: &str, tags: &str) -> TrackerResult<i64> {
        self.start_at(name, tags, Local::now().naive_local())
    }

    /// Start tracking a new task at `at`.
    ///
    /// Blank names and starting while already tracking are rejected without
    /// touching the store.
    pub fn start_at(&mut self, name: &str, tags: &str, at: NaiveDateTime) -> TrackerResult<i64> {
        let name = name.trim();
        if name.is_empty() {
            return Err(TrackerError::validation("Please enter a task name."));
        }
        if let Some(id) = self.current_task_id {
            return Err(TrackerError::AlreadyRunning(id));
        }

        let id = self.store.start_task_at(name, tags.trim(), at)?;
        self.current_task_id = Some(id);
        self.ticker.start(Instant::now());
        Ok(id)
    }

    /// Stop the running task now. Returns the stopped id, or `None` when idle.
    pub fn stop(&mut self) -> TrackerResult<Option<i64>> {
        self.stop_at(Local::now().naive_local())
    }

    /// Stop the running task at `at`. State is only cleared once the store accepted the stop.
    pub fn stop_at(&mut self, at: NaiveDateTime) -> TrackerResult<Option<i64>> {
        let Some(id) = self.current_task_id else {
            return Ok(None);
        };

        self.store.stop_task_at(id, at)?;
        self.current_task_id = None;
        self.ticker.cancel();
        Ok(Some(id))
    }

    /// Stop when tracking, otherwise start `name`. Returns whether a task is now tracked.
    pub fn toggle(&mut self, name: &str, tags: &str) -> TrackerResult<bool> {
        if self.is_tracking() {
            self.stop()?;
        } else {
            self.start(name, tags)?;
        }
        Ok(self.is_tracking())
    }

    /// Seconds elapsed on the running task as of `now`; `None` when idle
    pub fn elapsed_at(&self, now: NaiveDateTime) -> TrackerResult<Option<i64>> {
        if !self.is_tracking() {
            return Ok(None);
        }
        let running = self.store.get_running_task()?;
        Ok(running.and_then(|task| task.elapsed_at(now)))
    }

    /// Fire the display tick if it is due, returning the elapsed time as "HH:MM:SS".
    ///
    /// Read-only with respect to the store.
    pub fn tick(&mut self, now: Instant) -> TrackerResult<Option<String>> {
        if !self.ticker.is_due(now) {
            return Ok(None);
        }
        self.ticker.fired(now);
        let elapsed = self.elapsed_at(Local::now().naive_local())?;
        Ok(elapsed.map(format_hms))
    }

    /// Render the summary for `period` as seen on `today`
    pub fn summary_for(&self, period: SummaryPeriod, today: NaiveDate) -> TrackerResult<String> {
        let window = SummaryWindow::resolve(period, today)?;
        let records = self.store.get_tasks_by_date_range(window.start, window.end)?;
        Ok(generate_summary(&records, &window.title))
    }

    pub fn daily_summary(&self) -> TrackerResult<String> {
        self.summary_for(SummaryPeriod::Daily, today())
    }

    pub fn weekly_summary(&self) -> TrackerResult<String> {
        self.summary_for(SummaryPeriod::Weekly, today())
    }

    pub fn monthly_summary(&self) -> TrackerResult<String> {
        self.summary_for(SummaryPeriod::Monthly, today())
    }

    pub fn custom_range_summary(&self, month: u32, year: i32) -> TrackerResult<String> {
        self.summary_for(SummaryPeriod::Month { month, year }, today())
    }
}

fn today() -> NaiveDate {
    Local::now().date_naive()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn at(d: u32, h: u32, m: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2026, 10, d)
            .unwrap()
            .and_hms_opt(h, m, 0)
            .unwrap()
    }

    fn session() -> Session {
        Session::open(TaskStore::open_in_memory().unwrap()).unwrap()
    }

    fn running_count(session: &Session) -> usize {
        session
            .store()
            .get_all_tasks(100)
            .unwrap()
            .iter()
            .filter(|t| t.is_running)
            .count()
    }

    #[test]
    fn test_starts_idle() {
        let session = session();
        assert!(!session.is_tracking());
        assert!(!session.ticker().is_active());
    }

    #[test]
    fn test_start_and_stop() {
        let mut session = session();
        let id = session.start_at("  Design review ", " ux ", at(19, 9, 0)).unwrap();

        assert_eq!(session.current_task_id(), Some(id));
        assert!(session.ticker().is_active());
        let running = session.store().get_running_task().unwrap().unwrap();
        assert_eq!(running.id, id);
        assert_eq!(running.name, "Design review");
        assert_eq!(running.tags, "ux");

        assert_eq!(session.stop_at(at(19, 9, 45)).unwrap(), Some(id));
        assert!(!session.is_tracking());
        assert!(!session.ticker().is_active());
        assert!(session.store().get_running_task().unwrap().is_none());
        let stopped = session.store().get_task(id).unwrap().unwrap();
        assert_eq!(stopped.duration_seconds, Some(45 * 60));
    }

    #[test]
    fn test_blank_name_rejected() {
        let mut session = session();
        let err = session.start("   ", "tag").unwrap_err();
        assert!(matches!(err, TrackerError::Validation(_)));
        assert!(!session.is_tracking());
        assert!(session.store().get_all_tasks(10).unwrap().is_empty());
    }

    #[test]
    fn test_start_while_tracking_rejected() {
        let mut session = session();
        let id = session.start_at("first", "", at(19, 9, 0)).unwrap();

        let err = session.start_at("second", "", at(19, 9, 5)).unwrap_err();
        assert!(matches!(err, TrackerError::AlreadyRunning(running) if running == id));
        assert_eq!(running_count(&session), 1);
    }

    #[test]
    fn test_stop_when_idle_is_noop() {
        let mut session = session();
        assert_eq!(session.stop().unwrap(), None);
    }

    #[test]
    fn test_toggle() {
        let mut session = session();
        assert!(session.toggle("focus", "").unwrap());
        assert_eq!(running_count(&session), 1);
        assert!(!session.toggle("ignored", "").unwrap());
        assert_eq!(running_count(&session), 0);
    }

    #[test]
    fn test_recovers_running_task_on_open() {
        let store = TaskStore::open_in_memory().unwrap();
        let id = store.start_task_at("left running", "", at(19, 8, 0)).unwrap();

        let session = Session::open(store).unwrap();
        assert_eq!(session.current_task_id(), Some(id));
        assert!(session.ticker().is_active());
    }

    #[test]
    fn test_recover_after_external_stop() {
        let mut session = session();
        let id = session.start_at("shared", "", at(19, 9, 0)).unwrap();
        session.store().stop_task_at(id, at(19, 9, 30)).unwrap();

        assert!(session.recover().unwrap().is_none());
        assert!(!session.is_tracking());
    }

    #[test]
    fn test_elapsed_at() {
        let mut session = session();
        assert_eq!(session.elapsed_at(at(19, 10, 0)).unwrap(), None);

        let start = at(19, 9, 0);
        session.start_at("timer", "", start).unwrap();
        let now = start + Duration::seconds(3723);
        assert_eq!(session.elapsed_at(now).unwrap(), Some(3723));
    }

    #[test]
    fn test_tick_only_when_due() {
        let mut session = session();
        let now = Instant::now();
        assert_eq!(session.tick(now).unwrap(), None);

        session.start("ticking", "").unwrap();
        let first = session.tick(Instant::now()).unwrap();
        assert!(first.is_some());
        assert_eq!(session.tick(Instant::now()).unwrap(), None);
    }

    #[test]
    fn test_summary_for_window() {
        let mut session = session();
        session.start_at("taskA", "x", at(19, 9, 0)).unwrap();
        session.stop_at(at(19, 10, 0)).unwrap();
        session.start_at("taskA", "x", at(19, 11, 0)).unwrap();
        session.stop_at(at(19, 11, 30)).unwrap();
        session.start_at("yesterday", "", at(18, 11, 0)).unwrap();
        session.stop_at(at(18, 12, 0)).unwrap();

        let today = NaiveDate::from_ymd_opt(2026, 10, 19).unwrap();
        let daily = session.summary_for(SummaryPeriod::Daily, today).unwrap();
        assert!(daily.contains("  taskA: 1.50h"));
        assert!(daily.contains("  x: 1.50h"));
        assert!(daily.ends_with("TOTAL: 1.50 hours"));
        assert!(!daily.contains("yesterday"));

        let month = session
            .summary_for(SummaryPeriod::Month { month: 10, year: 2026 }, today)
            .unwrap();
        assert!(month.starts_with("October 2026 Summary"));
        assert!(month.ends_with("TOTAL: 2.50 hours"));
    }

    #[test]
    fn test_empty_summary_message() {
        let session = session();
        let today = NaiveDate::from_ymd_opt(2026, 10, 19).unwrap();
        assert_eq!(
            session.summary_for(SummaryPeriod::Weekly, today).unwrap(),
            "No tasks found for weekly summary."
        );
    }

    #[test]
    fn test_named_summaries_on_empty_store() {
        let session = session();
        assert_eq!(session.daily_summary().unwrap(), "No tasks found for daily summary.");
        assert_eq!(session.weekly_summary().unwrap(), "No tasks found for weekly summary.");
        assert_eq!(session.monthly_summary().unwrap(), "No tasks found for monthly summary.");
        assert_eq!(
            session.custom_range_summary(2, 2024).unwrap(),
            "No tasks found for february 2024 summary."
        );
        assert!(matches!(
            session.custom_range_summary(13, 2024),
            Err(TrackerError::Validation(_))
        ));
    }
}
