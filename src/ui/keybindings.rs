use crate::domain::UiMode;
use crate::ui::styles::hint_style;
use ratatui::{layout::Rect, text::{Line, Span}, widgets::Paragraph, Frame};

/// Hints for the current mode
fn hints_for(mode: UiMode) -> Vec<&'static str> {
    match mode {
        UiMode::Normal => vec![
            " Enter start/stop   ",
            "a new   ",
            "r reuse   ",
            "e edit   ",
            "x delete   ",
            "d/w/m summary   ",
            "c month   ",
            "t theme   ",
            "q quit",
        ],
        UiMode::EnteringTask => vec![" Tab switch field / complete tag   ", "Enter start   ", "Esc cancel"],
        UiMode::EditingTask => vec![" Tab next field   ", "Enter save   ", "Esc cancel"],
        UiMode::Summary => vec![" ↑/↓ scroll   ", "Esc close"],
        UiMode::MonthPicker => vec![" ←/→ month   ", "↑/↓ year   ", "Enter show   ", "Esc cancel"],
        UiMode::ConfirmDelete => vec![" y delete   ", "n keep"],
    }
}

/// Render the keybindings hint bar
pub fn render_keybindings(f: &mut Frame, mode: UiMode, area: Rect) {
    let hints = Line::from(hints_for(mode).into_iter().map(Span::raw).collect::<Vec<_>>());
    let paragraph = Paragraph::new(hints).style(hint_style());
    f.render_widget(paragraph, area);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normal_mode_lists_quit() {
        assert!(hints_for(UiMode::Normal).iter().any(|h| h.contains("q quit")));
        assert!(!hints_for(UiMode::EnteringTask).iter().any(|h| h.contains("quit")));
    }
}
