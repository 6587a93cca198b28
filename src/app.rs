use crate::domain::{format_hms, SummaryPeriod, TaskRecord, Theme, UiMode, EDIT_FORMAT};
use crate::error::TrackerError;
use crate::session::Session;
use crate::store::DEFAULT_HISTORY_LIMIT;
use anyhow::Result;
use chrono::{Datelike, Local};
use std::time::Instant;

/// Idle timer text
pub const IDLE_TIMER: &str = "00:00:00";

/// New-task input (always visible above the history)
#[derive(Debug, Clone, Default)]
pub struct TaskForm {
    pub name: String,
    pub tags: String, // Comma-separated tags
    pub editing_field: usize, // 0 = name, 1 = tags
}

/// Edit form for an existing history row
#[derive(Debug, Clone)]
pub struct EditForm {
    pub task_id: i64,
    pub name: String,
    pub tags: String,
    pub start: String,
    pub end: String,
    pub editing_field: usize, // 0 = name, 1 = tags, 2 = start, 3 = end
    stored_start: String,
    stored_end: String,
}

impl EditForm {
    pub const FIELD_COUNT: usize = 4;

    fn from_task(task: &TaskRecord) -> Self {
        let stored_end = task.end_time.clone().unwrap_or_default();
        Self {
            task_id: task.id,
            name: task.name.clone(),
            tags: task.tags.clone(),
            start: edit_text(&task.start_time),
            end: edit_text(&stored_end),
            editing_field: 0,
            stored_start: task.start_time.clone(),
            stored_end,
        }
    }

    /// Start time to save: the stored value unless the field was changed
    fn start_to_save(&self) -> &str {
        unchanged_or(&self.start, &self.stored_start)
    }

    /// End time to save: the stored value unless the field was changed
    fn end_to_save(&self) -> &str {
        unchanged_or(&self.end, &self.stored_end)
    }

    fn field_mut(&mut self) -> &mut String {
        match self.editing_field {
            0 => &mut self.name,
            1 => &mut self.tags,
            2 => &mut self.start,
            _ => &mut self.end,
        }
    }
}

/// Month/year selection for a custom summary
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MonthPicker {
    pub month: u32,
    pub year: i32,
}

impl MonthPicker {
    /// How many years back the picker may go
    pub const YEARS_BACK: i32 = 5;

    fn current() -> Self {
        let today = Local::now().date_naive();
        Self {
            month: today.month(),
            year: today.year(),
        }
    }

    pub fn next_month(&mut self) {
        self.month = if self.month == 12 { 1 } else { self.month + 1 };
    }

    pub fn previous_month(&mut self) {
        self.month = if self.month == 1 { 12 } else { self.month - 1 };
    }

    /// Move the year by `delta`, staying within the last `YEARS_BACK` years
    pub fn shift_year(&mut self, delta: i32, current_year: i32) {
        self.year = (self.year + delta).clamp(current_year - Self::YEARS_BACK, current_year);
    }
}

/// Main application state
pub struct AppState {
    pub session: Session,
    pub history: Vec<TaskRecord>,
    pub known_tags: Vec<String>,
    pub selected_index: usize,
    pub ui_mode: UiMode,
    pub task_form: TaskForm,
    pub edit_form: Option<EditForm>,
    pub month_picker: Option<MonthPicker>,
    pub summary_text: Option<String>,
    pub pending_delete: Option<TaskRecord>,
    pub timer_display: String,
    pub active_label: String,
    pub status_message: Option<String>,
    pub theme: Theme,
    pub summary_scroll: u16,
}

impl AppState {
    pub fn new(session: Session) -> Result<Self> {
        let theme = session.store().theme()?;

        let mut app = Self {
            session,
            history: Vec::new(),
            known_tags: Vec::new(),
            selected_index: 0,
            ui_mode: UiMode::Normal,
            task_form: TaskForm::default(),
            edit_form: None,
            month_picker: None,
            summary_text: None,
            pending_delete: None,
            timer_display: IDLE_TIMER.to_string(),
            active_label: "No active task".to_string(),
            status_message: None,
            theme,
            summary_scroll: 0,
        };

        app.refresh_history()?;
        app.refresh_tags()?;
        app.load_running_task()?;
        Ok(app)
    }

    /// Mirror a task left running by a previous run into the form and labels
    fn load_running_task(&mut self) -> Result<()> {
        if let Some(task) = self.session.recover()? {
            log::info!("resuming running task {} ({})", task.id, task.name);
            self.active_label = format!("Active: {}", task.name);
            self.task_form.name = task.name;
            self.task_form.tags = task.tags;
        }
        Ok(())
    }

    pub fn refresh_history(&mut self) -> Result<()> {
        self.history = self.session.store().get_all_tasks(DEFAULT_HISTORY_LIMIT)?;
        if self.selected_index >= self.history.len() {
            self.selected_index = self.history.len().saturating_sub(1);
        }
        Ok(())
    }

    pub fn refresh_tags(&mut self) -> Result<()> {
        self.known_tags = self.session.store().get_all_tags()?;
        Ok(())
    }

    /// Show an error in the status line instead of aborting the UI
    fn report_error(&mut self, err: impl std::fmt::Display) {
        log::warn!("{}", err);
        self.status_message = Some(err.to_string());
    }

    fn report_tracker<T>(&mut self, result: Result<T, TrackerError>) -> Option<T> {
        match result {
            Ok(value) => Some(value),
            Err(err) => {
                self.report_error(err);
                None
            }
        }
    }

    fn report_refresh(&mut self) {
        if let Err(err) = self.refresh_history().and_then(|_| self.refresh_tags()) {
            self.report_error(err);
        }
    }

    pub fn is_tracking(&self) -> bool {
        self.session.is_tracking()
    }

    /// Start or stop depending on state
    pub fn toggle_task(&mut self) {
        if self.is_tracking() {
            self.stop_task();
        } else {
            self.start_task();
        }
    }

    /// Start a task from the form contents
    pub fn start_task(&mut self) {
        let name = self.task_form.name.trim().to_string();
        let tags = self.task_form.tags.trim().to_string();

        let started = self.session.start(&name, &tags);
        if let Some(id) = self.report_tracker(started) {
            log::info!("started task {} ({})", id, name);
            self.active_label = format!("Active: {}", name);
            self.status_message = None;
            self.ui_mode = UiMode::Normal;
            self.report_refresh();
        }
    }

    /// Stop the running task and reset the form
    pub fn stop_task(&mut self) {
        let stopped = self.session.stop();
        if let Some(Some(id)) = self.report_tracker(stopped) {
            log::info!("stopped task {}", id);
            self.timer_display = IDLE_TIMER.to_string();
            self.active_label = "No active task".to_string();
            self.task_form = TaskForm::default();
            self.status_message = None;
            self.report_refresh();
        }
    }

    /// Refresh the timer display when the tick is due
    pub fn tick(&mut self, now: Instant) {
        let ticked = self.session.tick(now);
        if let Some(Some(elapsed)) = self.report_tracker(ticked) {
            self.timer_display = elapsed;
        }
    }

    pub fn move_selection_up(&mut self) {
        if self.selected_index > 0 {
            self.selected_index -= 1;
        }
    }

    pub fn move_selection_down(&mut self) {
        if self.selected_index + 1 < self.history.len() {
            self.selected_index += 1;
        }
    }

    pub fn selected_task(&self) -> Option<&TaskRecord> {
        self.history.get(self.selected_index)
    }

    /// Copy the selected row's name and tags into the form (only while idle)
    pub fn resume_selected(&mut self) {
        if self.is_tracking() {
            return;
        }
        if let Some(task) = self.selected_task().cloned() {
            self.task_form.name = task.name;
            self.task_form.tags = task.tags;
            self.task_form.editing_field = 0;
        }
    }

    pub fn start_entering_task(&mut self) {
        if self.is_tracking() {
            self.status_message = Some("Stop the running task first.".to_string());
            return;
        }
        self.task_form.editing_field = 0;
        self.ui_mode = UiMode::EnteringTask;
    }

    pub fn task_form_toggle_field(&mut self) {
        self.task_form.editing_field = (self.task_form.editing_field + 1) % 2;
    }

    pub fn task_form_add_char(&mut self, c: char) {
        match self.task_form.editing_field {
            0 => self.task_form.name.push(c),
            _ => self.task_form.tags.push(c),
        }
    }

    pub fn task_form_backspace(&mut self) {
        match self.task_form.editing_field {
            0 => self.task_form.name.pop(),
            _ => self.task_form.tags.pop(),
        };
    }

    pub fn cancel_entering_task(&mut self) {
        self.ui_mode = UiMode::Normal;
    }

    /// Complete the last tag being typed from the known tags. Returns whether the tags changed.
    pub fn complete_tag(&mut self) -> bool {
        let (head, partial) = match self.task_form.tags.rfind(',') {
            Some(pos) => self.task_form.tags.split_at(pos + 1),
            None => ("", self.task_form.tags.as_str()),
        };
        let prefix = partial.trim();
        if prefix.is_empty() {
            return false;
        }

        let lowered = prefix.to_lowercase();
        let Some(tag) = self
            .known_tags
            .iter()
            .find(|tag| tag.to_lowercase().starts_with(&lowered))
        else {
            return false;
        };

        let separator = if head.is_empty() { "" } else { " " };
        let completed = format!("{}{}{}", head, separator, tag);
        if completed == self.task_form.tags {
            return false;
        }
        self.task_form.tags = completed;
        true
    }

    /// Open the edit form for the selected row. The running row must be stopped first.
    pub fn start_edit_selected(&mut self) {
        let Some(task) = self.selected_task() else {
            return;
        };
        if task.is_running {
            self.status_message = Some("Stop the running task before editing it.".to_string());
            return;
        }
        self.edit_form = Some(EditForm::from_task(task));
        self.ui_mode = UiMode::EditingTask;
    }

    pub fn edit_form_toggle_field(&mut self) {
        if let Some(form) = &mut self.edit_form {
            form.editing_field = (form.editing_field + 1) % EditForm::FIELD_COUNT;
        }
    }

    pub fn edit_form_add_char(&mut self, c: char) {
        if let Some(form) = &mut self.edit_form {
            form.field_mut().push(c);
        }
    }

    pub fn edit_form_backspace(&mut self) {
        if let Some(form) = &mut self.edit_form {
            form.field_mut().pop();
        }
    }

    /// Save the edit form. A parse failure keeps the form open with the error shown.
    pub fn submit_edit_form(&mut self) {
        let Some(form) = self.edit_form.clone() else {
            return;
        };

        if form.name.trim().is_empty() {
            self.status_message = Some("Please enter a task name.".to_string());
            return;
        }

        let updated = self.session.store().update_task(
            form.task_id,
            form.name.trim(),
            form.tags.trim(),
            form.start_to_save(),
            form.end_to_save(),
        );
        if self.report_tracker(updated).is_some() {
            log::info!("updated task {}", form.task_id);
            self.edit_form = None;
            self.ui_mode = UiMode::Normal;
            self.status_message = None;
            self.report_refresh();
        }
    }

    pub fn cancel_edit_form(&mut self) {
        self.edit_form = None;
        self.ui_mode = UiMode::Normal;
    }

    /// Ask for confirmation before deleting the selected row
    pub fn request_delete_selected(&mut self) {
        if let Some(task) = self.selected_task().cloned() {
            self.pending_delete = Some(task);
            self.ui_mode = UiMode::ConfirmDelete;
        }
    }

    pub fn confirm_delete(&mut self) {
        if let Some(task) = self.pending_delete.take() {
            let deleted = self.session.store().delete_task(task.id);
            if self.report_tracker(deleted).is_some() {
                log::info!("deleted task {}", task.id);
                if self.session.current_task_id() == Some(task.id) {
                    // The running row is gone; drop back to idle
                    let recovered = self.session.recover();
                    self.report_tracker(recovered);
                    self.timer_display = IDLE_TIMER.to_string();
                    self.active_label = "No active task".to_string();
                    self.task_form = TaskForm::default();
                }
                self.report_refresh();
            }
        }
        self.ui_mode = UiMode::Normal;
    }

    pub fn cancel_delete(&mut self) {
        self.pending_delete = None;
        self.ui_mode = UiMode::Normal;
    }

    /// Render a summary into the summary modal
    pub fn show_summary(&mut self, period: SummaryPeriod) {
        let today = Local::now().date_naive();
        let rendered = self.session.summary_for(period, today);
        if let Some(text) = self.report_tracker(rendered) {
            self.summary_text = Some(text);
            self.summary_scroll = 0;
            self.ui_mode = UiMode::Summary;
        }
    }

    pub fn close_summary(&mut self) {
        self.summary_text = None;
        self.ui_mode = UiMode::Normal;
    }

    pub fn scroll_summary_up(&mut self) {
        self.summary_scroll = self.summary_scroll.saturating_sub(1);
    }

    pub fn scroll_summary_down(&mut self) {
        let lines = self
            .summary_text
            .as_deref()
            .map(|t| t.lines().count())
            .unwrap_or(0);
        if usize::from(self.summary_scroll) + 1 < lines {
            self.summary_scroll += 1;
        }
    }

    pub fn open_month_picker(&mut self) {
        self.month_picker = Some(MonthPicker::current());
        self.ui_mode = UiMode::MonthPicker;
    }

    pub fn month_picker_shift_month(&mut self, forward: bool) {
        if let Some(picker) = &mut self.month_picker {
            if forward {
                picker.next_month();
            } else {
                picker.previous_month();
            }
        }
    }

    pub fn month_picker_shift_year(&mut self, delta: i32) {
        let current_year = Local::now().year();
        if let Some(picker) = &mut self.month_picker {
            picker.shift_year(delta, current_year);
        }
    }

    pub fn submit_month_picker(&mut self) {
        if let Some(picker) = self.month_picker.take() {
            self.show_summary(SummaryPeriod::Month {
                month: picker.month,
                year: picker.year,
            });
            if self.ui_mode == UiMode::MonthPicker {
                self.ui_mode = UiMode::Normal;
            }
        }
    }

    pub fn cancel_month_picker(&mut self) {
        self.month_picker = None;
        self.ui_mode = UiMode::Normal;
    }

    /// Flip dark/light and persist the choice
    pub fn toggle_theme(&mut self) {
        let next = self.theme.toggled();
        let saved = self.session.store().set_theme(next);
        if self.report_tracker(saved).is_some() {
            self.theme = next;
        }
    }

    /// Total tracked today, for the timer pane footer
    pub fn today_total(&self) -> String {
        let today = Local::now().date_naive();
        let total: i64 = self
            .history
            .iter()
            .filter(|task| task.started_at().map(|s| s.date()) == Some(today))
            .filter_map(|task| task.duration_seconds)
            .sum();
        format_hms(total)
    }
}

/// Keep the stored text (full precision) when the shown field is untouched
fn unchanged_or<'a>(shown: &'a str, stored: &'a str) -> &'a str {
    if shown == edit_text(stored) {
        stored
    } else {
        shown
    }
}

/// Stored timestamp as shown in the edit form
fn edit_text(stored: &str) -> String {
    match crate::domain::parse_timestamp(stored) {
        Ok(ts) => ts.format(EDIT_FORMAT).to_string(),
        Err(_) => stored.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::TaskStore;
    use chrono::{Duration, NaiveDate};

    fn create_test_app() -> AppState {
        let store = TaskStore::open_in_memory().unwrap();
        AppState::new(Session::open(store).unwrap()).unwrap()
    }

    fn create_app_with_history() -> AppState {
        let store = TaskStore::open_in_memory().unwrap();
        let start = NaiveDate::from_ymd_opt(2026, 10, 18)
            .unwrap()
            .and_hms_opt(9, 0, 0)
            .unwrap();
        for (i, name) in ["older", "newer"].iter().enumerate() {
            let at = start + Duration::hours(i as i64);
            let id = store.start_task_at(name, "work, deep", at).unwrap();
            store.stop_task_at(id, at + Duration::minutes(30)).unwrap();
        }
        AppState::new(Session::open(store).unwrap()).unwrap()
    }

    fn type_text(app: &mut AppState, text: &str) {
        for c in text.chars() {
            app.task_form_add_char(c);
        }
    }

    #[test]
    fn test_app_state_new() {
        let app = create_test_app();
        assert!(app.history.is_empty());
        assert_eq!(app.ui_mode, UiMode::Normal);
        assert_eq!(app.timer_display, IDLE_TIMER);
        assert_eq!(app.theme, Theme::Dark);
    }

    #[test]
    fn test_start_requires_name() {
        let mut app = create_test_app();
        app.toggle_task();
        assert!(!app.is_tracking());
        assert_eq!(app.status_message.as_deref(), Some("Please enter a task name."));
    }

    #[test]
    fn test_toggle_start_then_stop() {
        let mut app = create_test_app();
        app.start_entering_task();
        type_text(&mut app, "Write tests");
        app.task_form_toggle_field();
        type_text(&mut app, "rust");

        app.toggle_task();
        assert!(app.is_tracking());
        assert_eq!(app.active_label, "Active: Write tests");
        assert_eq!(app.history.len(), 1);
        assert_eq!(app.known_tags, vec!["rust"]);

        app.toggle_task();
        assert!(!app.is_tracking());
        assert_eq!(app.timer_display, IDLE_TIMER);
        assert!(app.task_form.name.is_empty());
        assert!(!app.history[0].is_running);
    }

    #[test]
    fn test_running_task_restored_into_form() {
        let store = TaskStore::open_in_memory().unwrap();
        store.start_task("Carry over", "ops").unwrap();

        let app = AppState::new(Session::open(store).unwrap()).unwrap();
        assert!(app.is_tracking());
        assert_eq!(app.task_form.name, "Carry over");
        assert_eq!(app.task_form.tags, "ops");
        assert_eq!(app.active_label, "Active: Carry over");
    }

    #[test]
    fn test_move_selection() {
        let mut app = create_app_with_history();
        assert_eq!(app.selected_task().unwrap().name, "newer");

        app.move_selection_down();
        assert_eq!(app.selected_index, 1);
        app.move_selection_down();
        assert_eq!(app.selected_index, 1);

        app.move_selection_up();
        app.move_selection_up();
        assert_eq!(app.selected_index, 0);
    }

    #[test]
    fn test_resume_selected_prefills_form() {
        let mut app = create_app_with_history();
        app.move_selection_down();
        app.resume_selected();
        assert_eq!(app.task_form.name, "older");
        assert_eq!(app.task_form.tags, "work, deep");
    }

    #[test]
    fn test_complete_tag() {
        let mut app = create_app_with_history();
        app.task_form.tags = "work, de".to_string();
        assert!(app.complete_tag());
        assert_eq!(app.task_form.tags, "work, deep");

        // Already complete
        assert!(!app.complete_tag());

        app.task_form.tags = "WO".to_string();
        assert!(app.complete_tag());
        assert_eq!(app.task_form.tags, "work");

        app.task_form.tags = "zzz".to_string();
        assert!(!app.complete_tag());
        assert_eq!(app.task_form.tags, "zzz");
    }

    #[test]
    fn test_edit_selected_task() {
        let mut app = create_app_with_history();
        app.start_edit_selected();
        assert_eq!(app.ui_mode, UiMode::EditingTask);

        let form = app.edit_form.as_mut().unwrap();
        assert_eq!(form.start, "2026-10-18 10:00:00");
        assert_eq!(form.end, "2026-10-18 10:30:00");
        form.end = "2026-10-18 11:00:00".to_string();

        app.submit_edit_form();
        assert_eq!(app.ui_mode, UiMode::Normal);
        assert_eq!(app.history[0].duration_seconds, Some(3600));
    }

    #[test]
    fn test_edit_with_bad_time_keeps_form_open() {
        let mut app = create_app_with_history();
        app.start_edit_selected();
        app.edit_form.as_mut().unwrap().start = "garbage".to_string();

        app.submit_edit_form();
        assert_eq!(app.ui_mode, UiMode::EditingTask);
        assert!(app.edit_form.is_some());
        assert!(app.status_message.as_deref().unwrap().contains("garbage"));
        assert_eq!(app.history[0].duration_seconds, Some(1800));
    }

    #[test]
    fn test_rename_keeps_stored_times() {
        let store = TaskStore::open_in_memory().unwrap();
        let start = NaiveDate::from_ymd_opt(2026, 10, 18)
            .unwrap()
            .and_hms_milli_opt(9, 0, 0, 700)
            .unwrap();
        let id = store.start_task_at("sub-second", "", start).unwrap();
        store
            .stop_task_at(id, start + Duration::milliseconds(29 * 60 * 1000 + 59_500))
            .unwrap();
        let before = store.get_task(id).unwrap().unwrap();
        assert_eq!(before.duration_seconds, Some(1799));

        let mut app = AppState::new(Session::open(store).unwrap()).unwrap();
        app.start_edit_selected();
        app.edit_form.as_mut().unwrap().name = "renamed".to_string();
        app.submit_edit_form();

        let after = app.session.store().get_task(id).unwrap().unwrap();
        assert_eq!(after.name, "renamed");
        assert_eq!(after.start_time, before.start_time);
        assert_eq!(after.end_time, before.end_time);
        assert_eq!(after.duration_seconds, Some(1799));
    }

    #[test]
    fn test_running_task_cannot_be_edited() {
        let mut app = create_test_app();
        app.task_form.name = "live".to_string();
        app.start_task();
        assert!(app.is_tracking());

        app.start_edit_selected();
        assert_eq!(app.ui_mode, UiMode::Normal);
        assert!(app.edit_form.is_none());
        assert!(app.status_message.as_deref().unwrap().contains("Stop the running task"));
        let task = app.session.store().get_running_task().unwrap().unwrap();
        assert!(task.end_time.is_none());
    }

    #[test]
    fn test_edit_form_typing() {
        let mut app = create_app_with_history();
        app.start_edit_selected();
        app.edit_form_toggle_field();
        app.edit_form_backspace();
        app.edit_form_add_char('!');
        assert_eq!(app.edit_form.as_ref().unwrap().tags, "work, dee!");
    }

    #[test]
    fn test_delete_requires_confirmation() {
        let mut app = create_app_with_history();
        app.request_delete_selected();
        assert_eq!(app.ui_mode, UiMode::ConfirmDelete);

        app.cancel_delete();
        assert_eq!(app.history.len(), 2);

        app.request_delete_selected();
        app.confirm_delete();
        assert_eq!(app.history.len(), 1);
        assert_eq!(app.history[0].name, "older");
        assert_eq!(app.ui_mode, UiMode::Normal);
    }

    #[test]
    fn test_deleting_running_task_returns_to_idle() {
        let mut app = create_test_app();
        app.task_form.name = "doomed".to_string();
        app.start_task();
        assert!(app.is_tracking());

        app.request_delete_selected();
        app.confirm_delete();
        assert!(!app.is_tracking());
        assert!(app.history.is_empty());
    }

    #[test]
    fn test_show_summary() {
        let mut app = create_test_app();
        app.show_summary(SummaryPeriod::Daily);
        assert_eq!(app.ui_mode, UiMode::Summary);
        assert_eq!(app.summary_text.as_deref(), Some("No tasks found for daily summary."));

        app.close_summary();
        assert_eq!(app.ui_mode, UiMode::Normal);
        assert!(app.summary_text.is_none());
    }

    #[test]
    fn test_month_picker() {
        let mut picker = MonthPicker { month: 12, year: 2026 };
        picker.next_month();
        assert_eq!(picker.month, 1);
        picker.previous_month();
        assert_eq!(picker.month, 12);

        picker.shift_year(1, 2026);
        assert_eq!(picker.year, 2026);
        picker.shift_year(-10, 2026);
        assert_eq!(picker.year, 2021);
    }

    #[test]
    fn test_month_picker_submit_opens_summary() {
        let mut app = create_app_with_history();
        app.open_month_picker();
        app.month_picker = Some(MonthPicker { month: 10, year: 2026 });
        app.submit_month_picker();

        assert_eq!(app.ui_mode, UiMode::Summary);
        let text = app.summary_text.as_deref().unwrap();
        assert!(text.starts_with("October 2026 Summary"));
        assert!(text.contains("  work: 1.00h"));
    }

    #[test]
    fn test_toggle_theme_persists() {
        let mut app = create_test_app();
        app.toggle_theme();
        assert_eq!(app.theme, Theme::Light);
        assert_eq!(app.session.store().theme().unwrap(), Theme::Light);
    }
}
