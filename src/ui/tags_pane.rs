use crate::app::AppState;
use crate::ui::styles::{border_style, default_style, tag_style, title_style};
use ratatui::{
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

/// Render the known tags (used for Tab completion in the form)
pub fn render_tags_pane(f: &mut Frame, app: &AppState, area: Rect) {
    let lines: Vec<Line> = if app.known_tags.is_empty() {
        vec![Line::styled("  (none yet)", default_style(app.theme))]
    } else {
        app.known_tags
            .iter()
            .map(|tag| Line::from(Span::styled(format!("  #{}", tag), tag_style())))
            .collect()
    };

    let paragraph = Paragraph::new(lines)
        .style(default_style(app.theme))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(border_style())
                .title(Span::styled(" Tags ", title_style(app.theme))),
        )
        .wrap(Wrap { trim: false });

    f.render_widget(paragraph, area);
}
