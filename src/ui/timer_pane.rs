use crate::app::AppState;
use crate::domain::UiMode;
use crate::ui::styles::{border_style, default_style, idle_style, running_style, tag_style, title_style};
use ratatui::{
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

/// One labelled form field, with a cursor when it is being edited
fn form_line<'a>(label: &'a str, value: &'a str, editing: bool, app: &AppState) -> Line<'a> {
    let mut spans = vec![
        Span::styled(label, title_style(app.theme)),
        Span::styled(value, default_style(app.theme)),
    ];
    if editing {
        spans.push(Span::styled("█", title_style(app.theme)));
    }
    Line::from(spans)
}

/// Render the timer, the active task label and the new-task form
pub fn render_timer_pane(f: &mut Frame, app: &AppState, area: Rect) {
    let tracking = app.is_tracking();
    let typing = app.ui_mode == UiMode::EnteringTask;

    let timer_style = if tracking { running_style() } else { idle_style() };

    let mut lines = vec![
        Line::from(vec![
            Span::styled("  ⏱  ", timer_style),
            Span::styled(app.timer_display.as_str(), timer_style),
            Span::raw("   "),
            Span::styled(app.active_label.as_str(), default_style(app.theme)),
        ]),
        Line::raw(""),
        form_line(
            "  Task: ",
            &app.task_form.name,
            typing && app.task_form.editing_field == 0,
            app,
        ),
        form_line(
            "  Tags: ",
            &app.task_form.tags,
            typing && app.task_form.editing_field == 1,
            app,
        ),
        Line::raw(""),
    ];

    lines.push(Line::from(vec![
        Span::styled("  Today: ", title_style(app.theme)),
        Span::styled(app.today_total(), tag_style()),
    ]));

    let paragraph = Paragraph::new(lines)
        .style(default_style(app.theme))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(border_style())
                .title(Span::styled(" TimePunch ", title_style(app.theme))),
        );

    f.render_widget(paragraph, area);
}
