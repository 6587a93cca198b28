use crate::domain::Theme;
use ratatui::style::{Color, Modifier, Style};

fn foreground(theme: Theme) -> Color {
    match theme {
        Theme::Dark => Color::White,
        Theme::Light => Color::Black,
    }
}

fn background(theme: Theme) -> Color {
    match theme {
        Theme::Dark => Color::Reset,
        Theme::Light => Color::White,
    }
}

/// Default text style
pub fn default_style(theme: Theme) -> Style {
    Style::default().fg(foreground(theme)).bg(background(theme))
}

/// Selected row highlight style
pub fn selected_style(theme: Theme) -> Style {
    let bg = match theme {
        Theme::Dark => Color::LightCyan,
        Theme::Light => Color::Blue,
    };
    let fg = match theme {
        Theme::Dark => Color::Black,
        Theme::Light => Color::White,
    };
    Style::default().fg(fg).bg(bg).add_modifier(Modifier::BOLD)
}

/// Running timer / running row style
pub fn running_style() -> Style {
    Style::default()
        .fg(Color::Magenta)
        .add_modifier(Modifier::BOLD)
}

/// Idle timer style
pub fn idle_style() -> Style {
    Style::default().fg(Color::Gray)
}

/// Title style for panes
pub fn title_style(theme: Theme) -> Style {
    let fg = match theme {
        Theme::Dark => Color::Cyan,
        Theme::Light => Color::Blue,
    };
    Style::default().fg(fg).add_modifier(Modifier::BOLD)
}

/// Border style
pub fn border_style() -> Style {
    Style::default().fg(Color::Gray)
}

/// Modal background style
pub fn modal_bg_style(theme: Theme) -> Style {
    match theme {
        Theme::Dark => Style::default().bg(Color::DarkGray).fg(Color::White),
        Theme::Light => Style::default().bg(Color::Gray).fg(Color::Black),
    }
}

/// Modal title style
pub fn modal_title_style(theme: Theme) -> Style {
    let fg = match theme {
        Theme::Dark => Color::Yellow,
        Theme::Light => Color::Blue,
    };
    Style::default().fg(fg).add_modifier(Modifier::BOLD)
}

/// Keybinding hint style
pub fn hint_style() -> Style {
    Style::default().fg(Color::DarkGray)
}

/// Error message style
pub fn error_style() -> Style {
    Style::default()
        .fg(Color::Red)
        .add_modifier(Modifier::BOLD)
}

/// Tag badge style
pub fn tag_style() -> Style {
    Style::default().fg(Color::Blue)
}
