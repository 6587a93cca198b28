pub mod history_pane;
pub mod input_form;
pub mod keybindings;
pub mod layout;
pub mod modal;
pub mod styles;
pub mod tags_pane;
pub mod timer_pane;

use crate::app::AppState;
use crate::domain::UiMode;
use history_pane::render_history_pane;
use input_form::render_edit_form;
use keybindings::render_keybindings;
use layout::create_layout;
use modal::{render_confirm_delete, render_month_picker, render_summary_modal};
use ratatui::{
    text::{Line, Span},
    widgets::{Block, Paragraph},
    Frame,
};
use styles::{default_style, error_style};
use tags_pane::render_tags_pane;
use timer_pane::render_timer_pane;

/// Main render function - draws the entire UI
pub fn render(f: &mut Frame, app: &AppState) {
    let size = f.size();

    // Paint the themed background first
    f.render_widget(Block::default().style(default_style(app.theme)), size);

    let layout = create_layout(size);

    render_keybindings(f, app.ui_mode, layout.keybindings_area);
    render_timer_pane(f, app, layout.timer_area);
    render_history_pane(f, app, layout.history_area);
    render_tags_pane(f, app, layout.tags_area);

    if let Some(message) = &app.status_message {
        let status = Paragraph::new(Line::from(Span::styled(format!(" {}", message), error_style())));
        f.render_widget(status, layout.status_area);
    }

    match app.ui_mode {
        UiMode::EditingTask => render_edit_form(f, app, size),
        UiMode::Summary => render_summary_modal(f, app, size),
        UiMode::MonthPicker => render_month_picker(f, app, size),
        UiMode::ConfirmDelete => render_confirm_delete(f, app, size),
        UiMode::Normal | UiMode::EnteringTask => {}
    }
}
