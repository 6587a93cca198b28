use ratatui::layout::{Constraint, Direction, Layout, Rect};

/// Main layout structure
pub struct MainLayout {
    pub keybindings_area: Rect,
    pub timer_area: Rect,
    pub history_area: Rect,
    pub tags_area: Rect,
    pub status_area: Rect,
}

/// Create the main layout
/// - Top bar: keybindings (1 row)
/// - Timer pane with the new-task form (8 rows)
/// - History (75%) | Known tags (25%)
/// - Status line (1 row)
pub fn create_layout(area: Rect) -> MainLayout {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // Keybindings bar
            Constraint::Length(8), // Timer + form
            Constraint::Min(0),    // History + tags
            Constraint::Length(1), // Status line
        ])
        .split(area);

    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(75), Constraint::Percentage(25)])
        .split(rows[2]);

    MainLayout {
        keybindings_area: rows[0],
        timer_area: rows[1],
        history_area: columns[0],
        tags_area: columns[1],
        status_area: rows[3],
    }
}

/// Create a centered modal area, 60% wide and `height` rows tall (clamped to the screen)
pub fn create_modal_area(area: Rect, height: u16) -> Rect {
    let height = height.min(area.height);
    let width = area.width * 3 / 5;
    Rect::new(
        area.x + (area.width - width) / 2,
        area.y + (area.height - height) / 2,
        width,
        height,
    )
}
