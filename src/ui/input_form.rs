use crate::app::AppState;
use crate::ui::{
    layout::create_modal_area,
    styles::{modal_bg_style, modal_title_style},
};
use ratatui::{
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};

const FIELD_LABELS: [&str; 4] = [
    "Task Name:",
    "Tags:",
    "Start Time (YYYY-MM-DD HH:MM:SS):",
    "End Time (YYYY-MM-DD HH:MM:SS):",
];

/// Render the edit form for an existing task
pub fn render_edit_form(f: &mut Frame, app: &AppState, area: Rect) {
    if let Some(form) = &app.edit_form {
        let modal_area = create_modal_area(area, 17);

        // Clear the area behind the form
        f.render_widget(Clear, modal_area);

        let values = [&form.name, &form.tags, &form.start, &form.end];
        let mut lines = Vec::new();
        lines.push(Line::raw(""));

        for (idx, (label, value)) in FIELD_LABELS.iter().zip(values).enumerate() {
            let editing = form.editing_field == idx;
            let label_text = if editing {
                format!("{} (editing)", label)
            } else {
                label.to_string()
            };
            lines.push(Line::raw(label_text));

            lines.push(Line::from(vec![
                Span::raw("> "),
                Span::styled(value.as_str(), modal_title_style(app.theme)),
                if editing {
                    Span::styled("█", modal_title_style(app.theme)) // Cursor
                } else {
                    Span::raw("")
                },
            ]));
            lines.push(Line::raw(""));
        }

        // Instructions
        lines.push(Line::raw("Tab to switch fields  ·  Enter to save  ·  Esc to cancel"));

        let paragraph = Paragraph::new(lines)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .title(Span::styled(
                        format!(" Edit Task #{} ", form.task_id),
                        modal_title_style(app.theme),
                    ))
                    .style(modal_bg_style(app.theme)),
            )
            .wrap(Wrap { trim: false });

        f.render_widget(paragraph, modal_area);
    }
}
