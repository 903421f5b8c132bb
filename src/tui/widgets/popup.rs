use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Clear, Paragraph, Wrap},
    Frame,
};

use crate::forms::{RegionForm, ZoneManagerForm};
use crate::tui::theme;

/// Rect of `width`×`height` centred in `area`, clipped to fit.
pub fn centered(area: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 2,
        width,
        height,
    }
}

fn frame_block(title: &str, border: Style) -> Block<'_> {
    Block::default()
        .title(Span::styled(format!(" {} ", title), theme::rose()))
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(border)
        .style(theme::surface())
}

fn show(frame: &mut Frame, area: Rect, title: &str, border: Style, lines: Vec<Line>) {
    frame.render_widget(Clear, area);
    let paragraph = Paragraph::new(lines)
        .block(frame_block(title, border))
        .wrap(Wrap { trim: false });
    frame.render_widget(paragraph, area);
}

pub fn render_detail(frame: &mut Frame, title: &str, fields: &[(&'static str, String)]) {
    let height = (fields.len() as u16).saturating_add(6);
    let area = centered(frame.area(), 76, height);

    let mut lines = vec![Line::from("")];
    for (label, value) in fields {
        lines.push(Line::from(vec![
            Span::styled(format!("  {:<18}", label), theme::dim()),
            Span::styled(value.as_str(), theme::bold()),
        ]));
    }
    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled("  [Esc] close", theme::dim())));

    show(frame, area, title, theme::rose(), lines);
}

pub fn render_confirm(frame: &mut Frame, message: &str) {
    let area = centered(frame.area(), 60, 7);
    let lines = vec![
        Line::from(""),
        Line::from(Span::styled(format!("  {}", message), theme::bold())),
        Line::from(""),
        Line::from(vec![
            Span::styled("  [y]", theme::red()),
            Span::styled(" delete   ", theme::dim()),
            Span::styled("[n]", theme::rose()),
            Span::styled(" keep", theme::dim()),
        ]),
    ];
    show(frame, area, "Confirm", theme::red(), lines);
}

pub fn render_search(frame: &mut Frame, buffer: &str) {
    let area = centered(frame.area(), 56, 6);
    let lines = vec![
        Line::from(""),
        Line::from(vec![
            Span::styled("  Search: ", theme::dim()),
            Span::styled(buffer, theme::rose().add_modifier(Modifier::BOLD)),
            Span::styled("█", theme::amber()),
        ]),
        Line::from(""),
        Line::from(Span::styled("  [Enter] apply  ·  [Esc] cancel", theme::dim())),
    ];
    show(frame, area, "Search", theme::amber(), lines);
}

pub fn render_help(frame: &mut Frame) {
    let area = centered(frame.area(), 64, 24);
    let bindings = [
        ("1-9, 0", "Switch screen"),
        ("↑ ↓", "Select row"),
        ("← →", "Previous / next page"),
        ("/", "Search"),
        ("f", "Cycle status filter"),
        ("g", "Cycle region filter"),
        ("v", "Cycle service filter"),
        ("x", "Reset filters"),
        ("Enter", "Details or status menu"),
        ("s", "Change status"),
        ("d", "Delete (doulas, zone managers)"),
        ("a", "Toggle active (zone managers)"),
        ("n", "New region / zone manager"),
        ("e", "Edit region"),
        ("r", "Refresh"),
        ("?", "Toggle help"),
        ("Esc", "Close popup / quit"),
    ];
    let mut lines = vec![Line::from("")];
    for (key, label) in bindings {
        lines.push(Line::from(vec![
            Span::styled(format!("  {:<10}", key), theme::rose()),
            Span::styled(label, theme::dim()),
        ]));
    }
    show(frame, area, "Keybindings", theme::rose(), lines);
}

fn field_line(label: &str, value: &str, focused: bool) -> Line<'static> {
    let (marker, label_style) = if focused {
        ("▸ ", theme::rose().add_modifier(Modifier::BOLD))
    } else {
        ("  ", theme::dim())
    };
    let mut spans = vec![
        Span::styled(marker.to_string(), theme::rose()),
        Span::styled(format!("{:<15}", label), label_style),
        Span::styled(value.to_string(), theme::bold()),
    ];
    if focused {
        spans.push(Span::styled("█", theme::amber()));
    }
    Line::from(spans)
}

fn error_lines(error: Option<&str>, lines: &mut Vec<Line>) {
    if let Some(err) = error {
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(format!("  ✗ {}", err), theme::red())));
    }
}

pub fn render_region_form(frame: &mut Frame, form: &RegionForm) {
    let height = if form.error.is_some() { 17 } else { 15 };
    let area = centered(frame.area(), 64, height);

    let mut lines = vec![Line::from("")];
    for (i, label) in RegionForm::FIELDS.iter().enumerate() {
        lines.push(field_line(label, &form.value(i), form.focus == i));
    }
    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        "  [Tab] next  ·  [Space] toggle active  ·  [Enter] save  ·  [Esc] cancel",
        theme::dim(),
    )));
    error_lines(form.error.as_deref(), &mut lines);

    let title = if form.is_edit() { "Edit Region" } else { "New Region" };
    let border = if form.error.is_some() { theme::red() } else { theme::amber() };
    show(frame, area, title, border, lines);
}

pub fn render_zone_manager_form(frame: &mut Frame, form: &ZoneManagerForm) {
    let visible_regions = form.available.len().min(8) as u16;
    let height = 14 + visible_regions + if form.error.is_some() { 2 } else { 0 };
    let area = centered(frame.area(), 70, height);

    let mut lines = vec![Line::from("")];
    for (i, label) in ZoneManagerForm::FIELDS.iter().enumerate() {
        lines.push(field_line(label, &form.value(i), form.focus == i));
        if i == 2 {
            if let Some(hint) = form.phone_hint() {
                lines.push(Line::from(Span::styled(format!("                   {}", hint), theme::amber())));
            }
        }
    }

    lines.push(Line::from(""));
    if form.available.is_empty() {
        lines.push(Line::from(Span::styled("  No unassigned regions available", theme::dim())));
    }
    let start = form.region_cursor.saturating_sub(7);
    for (i, choice) in form.available.iter().enumerate().skip(start).take(8) {
        let mark = if form.is_selected(&choice.id) { "[x]" } else { "[ ]" };
        let style = if form.on_regions() && i == form.region_cursor {
            theme::selected()
        } else {
            theme::dim()
        };
        lines.push(Line::from(Span::styled(format!("    {} {}", mark, choice.name), style)));
    }

    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        "  [Tab] next  ·  [↑↓ Space] pick regions  ·  [Enter] create  ·  [Esc] cancel",
        theme::dim(),
    )));
    error_lines(form.error.as_deref(), &mut lines);

    let border = if form.error.is_some() { theme::red() } else { theme::amber() };
    show(frame, area, "New Zone Manager", border, lines);
}
