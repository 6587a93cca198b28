use crate::app::AppState;
use crate::domain::TaskRecord;
use crate::ui::styles::{
    border_style, default_style, running_style, selected_style, tag_style, title_style,
};
use ratatui::{
    layout::Rect,
    style::Style,
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph},
    Frame,
};

const NAME_WIDTH: usize = 28;
const TAGS_WIDTH: usize = 18;

/// Pad or cut `text` to exactly `width` characters
fn fit(text: &str, width: usize) -> String {
    let count = text.chars().count();
    if count > width {
        let cut: String = text.chars().take(width.saturating_sub(1)).collect();
        format!("{}…", cut)
    } else {
        format!("{}{}", text, " ".repeat(width - count))
    }
}

fn header_line(app: &AppState) -> Line<'static> {
    Line::from(Span::styled(
        format!(
            "{} {} {:<11} {:<11} {}",
            fit("Task", NAME_WIDTH),
            fit("Tags", TAGS_WIDTH),
            "Start",
            "End",
            "Duration"
        ),
        title_style(app.theme),
    ))
}

fn task_line(task: &TaskRecord) -> Line<'static> {
    let end_style = if task.is_running {
        running_style()
    } else {
        Style::default()
    };

    Line::from(vec![
        Span::raw(format!("{} ", fit(&task.name, NAME_WIDTH))),
        Span::styled(format!("{} ", fit(&task.tags, TAGS_WIDTH)), tag_style()),
        Span::raw(format!("{:<11} ", task.start_display())),
        Span::styled(format!("{:<11} ", task.end_display()), end_style),
        Span::raw(task.duration_display()),
    ])
}

/// Render the history list (newest first)
pub fn render_history_pane(f: &mut Frame, app: &AppState, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(border_style())
        .title(Span::styled(
            format!(" History ({}) ", app.history.len()),
            title_style(app.theme),
        ));

    if app.history.is_empty() {
        let empty = Paragraph::new("  No tasks yet. Press 'a' to type one, Enter to start.")
            .style(default_style(app.theme))
            .block(block);
        f.render_widget(empty, area);
        return;
    }

    let mut items = vec![ListItem::new(header_line(app))];
    items.extend(app.history.iter().map(|task| ListItem::new(task_line(task))));

    let list = List::new(items)
        .block(block)
        .style(default_style(app.theme))
        .highlight_style(selected_style(app.theme));

    // Row 0 is the header
    let mut state = ListState::default();
    state.select(Some(app.selected_index + 1));

    f.render_stateful_widget(list, area, &mut state);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fit_pads_and_truncates() {
        assert_eq!(fit("abc", 5), "abc  ");
        assert_eq!(fit("abcdef", 4), "abc…");
        assert_eq!(fit("", 2), "  ");
    }
}
