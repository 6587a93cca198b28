use crate::app::AppState;
use crate::ui::{
    layout::create_modal_area,
    styles::{modal_bg_style, modal_title_style},
};
use crate::domain::month_name;
use ratatui::{
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};

/// Render the summary report
pub fn render_summary_modal(f: &mut Frame, app: &AppState, area: Rect) {
    if let Some(text) = &app.summary_text {
        let height = (text.lines().count() as u16).saturating_add(4).max(8);
        let modal_area = create_modal_area(area, height);

        // Clear the area behind the modal
        f.render_widget(Clear, modal_area);

        let lines: Vec<Line> = text.lines().map(Line::raw).collect();

        let paragraph = Paragraph::new(lines)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .title(Span::styled(" Summary ", modal_title_style(app.theme)))
                    .style(modal_bg_style(app.theme)),
            )
            .wrap(Wrap { trim: false })
            .scroll((app.summary_scroll, 0));

        f.render_widget(paragraph, modal_area);
    }
}

/// Render the month/year picker for custom summaries
pub fn render_month_picker(f: &mut Frame, app: &AppState, area: Rect) {
    if let Some(picker) = &app.month_picker {
        let modal_area = create_modal_area(area, 9);

        f.render_widget(Clear, modal_area);

        let lines = vec![
            Line::raw(""),
            Line::raw("  Select month and year:"),
            Line::raw(""),
            Line::from(vec![
                Span::raw("  ◀ "),
                Span::styled(
                    format!("{} {}", month_name(picker.month).unwrap_or("?"), picker.year),
                    modal_title_style(app.theme),
                ),
                Span::raw(" ▶"),
            ]),
            Line::raw(""),
            Line::from(vec![
                Span::styled("  [Enter]", modal_title_style(app.theme)),
                Span::raw(" Generate  "),
                Span::styled("[Esc]", modal_title_style(app.theme)),
                Span::raw(" Cancel"),
            ]),
        ];

        let paragraph = Paragraph::new(lines).block(
            Block::default()
                .borders(Borders::ALL)
                .title(Span::styled(" Custom Range Summary ", modal_title_style(app.theme)))
                .style(modal_bg_style(app.theme)),
        );

        f.render_widget(paragraph, modal_area);
    }
}

/// Render the delete confirmation
pub fn render_confirm_delete(f: &mut Frame, app: &AppState, area: Rect) {
    if let Some(task) = &app.pending_delete {
        let modal_area = create_modal_area(area, 7);

        f.render_widget(Clear, modal_area);

        let lines = vec![
            Line::raw(""),
            Line::raw(format!("  Delete task '{}'?", task.name)),
            Line::raw(""),
            Line::from(vec![
                Span::styled("  [y]", modal_title_style(app.theme)),
                Span::raw(" Yes  "),
                Span::styled("[n]", modal_title_style(app.theme)),
                Span::raw(" No"),
            ]),
        ];

        let paragraph = Paragraph::new(lines)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .title(Span::styled(" Confirm Delete ", modal_title_style(app.theme)))
                    .style(modal_bg_style(app.theme)),
            )
            .wrap(Wrap { trim: false });

        f.render_widget(paragraph, modal_area);
    }
}
