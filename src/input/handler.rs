use crate::app::AppState;
use crate::domain::{SummaryPeriod, UiMode};
use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

/// Handle keyboard input events. Returns `true` when the app should quit.
pub fn handle_key(app: &mut AppState, key: KeyEvent) -> Result<bool> {
    // Ctrl+C always quits
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        return Ok(true);
    }

    match app.ui_mode {
        UiMode::Normal => handle_normal_mode(app, key),
        UiMode::EnteringTask => handle_task_form_mode(app, key),
        UiMode::EditingTask => handle_edit_form_mode(app, key),
        UiMode::Summary => handle_summary_mode(app, key),
        UiMode::MonthPicker => handle_month_picker_mode(app, key),
        UiMode::ConfirmDelete => handle_confirm_delete_mode(app, key),
    }
}

/// Handle keys in normal mode
fn handle_normal_mode(app: &mut AppState, key: KeyEvent) -> Result<bool> {
    match key.code {
        // Navigation
        KeyCode::Up | KeyCode::Char('k') => {
            app.move_selection_up();
            Ok(false)
        }
        KeyCode::Down | KeyCode::Char('j') => {
            app.move_selection_down();
            Ok(false)
        }

        // Start/stop
        KeyCode::Enter | KeyCode::Char(' ') => {
            app.toggle_task();
            Ok(false)
        }

        // Type a new task
        KeyCode::Char('a') | KeyCode::Char('n') => {
            app.start_entering_task();
            Ok(false)
        }

        // Reuse the selected row's name/tags
        KeyCode::Char('r') | KeyCode::Char('R') => {
            app.resume_selected();
            Ok(false)
        }

        // Edit selected row
        KeyCode::Char('e') | KeyCode::Char('E') => {
            app.start_edit_selected();
            Ok(false)
        }

        // Delete selected row
        KeyCode::Char('x') | KeyCode::Char('X') | KeyCode::Delete => {
            app.request_delete_selected();
            Ok(false)
        }

        // Summaries
        KeyCode::Char('d') | KeyCode::Char('D') => {
            app.show_summary(SummaryPeriod::Daily);
            Ok(false)
        }
        KeyCode::Char('w') | KeyCode::Char('W') => {
            app.show_summary(SummaryPeriod::Weekly);
            Ok(false)
        }
        KeyCode::Char('m') | KeyCode::Char('M') => {
            app.show_summary(SummaryPeriod::Monthly);
            Ok(false)
        }
        KeyCode::Char('c') | KeyCode::Char('C') => {
            app.open_month_picker();
            Ok(false)
        }

        // Theme
        KeyCode::Char('t') | KeyCode::Char('T') => {
            app.toggle_theme();
            Ok(false)
        }

        // Dismiss status message
        KeyCode::Esc => {
            app.status_message = None;
            Ok(false)
        }

        // Quit
        KeyCode::Char('q') | KeyCode::Char('Q') => Ok(true),

        _ => Ok(false),
    }
}

/// Handle keys while typing a new task
fn handle_task_form_mode(app: &mut AppState, key: KeyEvent) -> Result<bool> {
    match key.code {
        KeyCode::Enter => app.start_task(),
        KeyCode::Esc => app.cancel_entering_task(),
        // Tab completes a partial tag, otherwise it moves to the other field
        KeyCode::Tab => {
            if app.task_form.editing_field != 1 || !app.complete_tag() {
                app.task_form_toggle_field();
            }
        }
        KeyCode::BackTab => app.task_form_toggle_field(),
        KeyCode::Backspace => app.task_form_backspace(),
        KeyCode::Char(c) => app.task_form_add_char(c),
        _ => {}
    }
    Ok(false)
}

/// Handle keys in the edit form
fn handle_edit_form_mode(app: &mut AppState, key: KeyEvent) -> Result<bool> {
    match key.code {
        KeyCode::Enter => app.submit_edit_form(),
        KeyCode::Esc => app.cancel_edit_form(),
        KeyCode::Tab | KeyCode::Down => app.edit_form_toggle_field(),
        KeyCode::Backspace => app.edit_form_backspace(),
        KeyCode::Char(c) => app.edit_form_add_char(c),
        _ => {}
    }
    Ok(false)
}

/// Handle keys while a summary is shown
fn handle_summary_mode(app: &mut AppState, key: KeyEvent) -> Result<bool> {
    match key.code {
        KeyCode::Up | KeyCode::Char('k') => app.scroll_summary_up(),
        KeyCode::Down | KeyCode::Char('j') => app.scroll_summary_down(),
        KeyCode::Esc | KeyCode::Enter | KeyCode::Char('q') => app.close_summary(),
        _ => {}
    }
    Ok(false)
}

/// Handle keys in the month/year picker
fn handle_month_picker_mode(app: &mut AppState, key: KeyEvent) -> Result<bool> {
    match key.code {
        KeyCode::Left | KeyCode::Char('h') => app.month_picker_shift_month(false),
        KeyCode::Right | KeyCode::Char('l') => app.month_picker_shift_month(true),
        KeyCode::Up | KeyCode::Char('k') => app.month_picker_shift_year(1),
        KeyCode::Down | KeyCode::Char('j') => app.month_picker_shift_year(-1),
        KeyCode::Enter => app.submit_month_picker(),
        KeyCode::Esc => app.cancel_month_picker(),
        _ => {}
    }
    Ok(false)
}

/// Handle keys in the delete confirmation
fn handle_confirm_delete_mode(app: &mut AppState, key: KeyEvent) -> Result<bool> {
    match key.code {
        KeyCode::Char('y') | KeyCode::Char('Y') => app.confirm_delete(),
        KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => app.cancel_delete(),
        _ => {}
    }
    Ok(false)
}
