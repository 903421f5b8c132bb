use ratatui::style::{Color, Modifier, Style};

pub const BG: Color = Color::Rgb(20, 17, 22);
pub const SURFACE: Color = Color::Rgb(32, 27, 35);
pub const BORDER: Color = Color::Rgb(64, 54, 70);
pub const TEXT: Color = Color::Rgb(232, 222, 230);
pub const TEXT_DIM: Color = Color::Rgb(138, 124, 140);
pub const ROSE: Color = Color::Rgb(214, 112, 140);
pub const GREEN: Color = Color::Rgb(96, 160, 110);
pub const AMBER: Color = Color::Rgb(214, 150, 66);
pub const BLUE: Color = Color::Rgb(98, 142, 204);
pub const RED: Color = Color::Rgb(190, 84, 74);
pub const HIGHLIGHT: Color = Color::Rgb(56, 44, 60);

pub fn base() -> Style {
    Style::default().fg(TEXT).bg(BG)
}

pub fn dim() -> Style {
    Style::default().fg(TEXT_DIM)
}

pub fn rose() -> Style {
    Style::default().fg(ROSE)
}

pub fn green() -> Style {
    Style::default().fg(GREEN)
}

pub fn amber() -> Style {
    Style::default().fg(AMBER)
}

pub fn blue() -> Style {
    Style::default().fg(BLUE)
}

pub fn red() -> Style {
    Style::default().fg(RED)
}

pub fn bold() -> Style {
    Style::default().fg(TEXT).add_modifier(Modifier::BOLD)
}

pub fn surface() -> Style {
    Style::default().fg(TEXT).bg(SURFACE)
}

pub fn border() -> Style {
    Style::default().fg(BORDER)
}

pub fn selected() -> Style {
    Style::default().bg(HIGHLIGHT).add_modifier(Modifier::BOLD)
}

/// Colour for a status cell, keyed by the wire value.
pub fn status_style(label: &str) -> Style {
    match label {
        "PENDING" | "SCHEDULED" | "IN_REVIEW" => amber(),
        "ACTIVE" | "IN_PROGRESS" => blue(),
        "COMPLETED" | "ACCEPTED" => green(),
        "CANCELED" | "REJECTED" | "INACTIVE" => red(),
        _ => Style::default().fg(TEXT),
    }
}
