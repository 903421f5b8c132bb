use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::Modifier,
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Paragraph, Tabs},
    Frame,
};

use crate::tui::app::View;
use crate::tui::theme;

pub fn render(frame: &mut Frame, area: Rect, view: View, admin: &str) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(theme::rose().add_modifier(Modifier::BOLD))
        .style(theme::base());
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(1), Constraint::Length(1)])
        .split(inner);

    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Min(0), Constraint::Length(36)])
        .split(rows[0]);

    let title = Line::from(vec![
        Span::styled("  doula admin  ", theme::rose().add_modifier(Modifier::BOLD)),
        Span::styled("·  ", theme::dim()),
        Span::styled(view.title(), theme::bold()),
    ]);
    frame.render_widget(Paragraph::new(title), columns[0]);

    let who = Line::from(vec![
        Span::styled("signed in as ", theme::dim()),
        Span::styled(admin, theme::rose()),
        Span::raw("  "),
    ]);
    frame.render_widget(Paragraph::new(who).alignment(Alignment::Right), columns[1]);

    let titles: Vec<Line> = View::ALL
        .iter()
        .map(|v| {
            Line::from(vec![
                Span::styled(format!("{} ", v.hotkey()), theme::dim()),
                Span::raw(v.short_title()),
            ])
        })
        .collect();
    let selected = View::ALL.iter().position(|v| *v == view).unwrap_or(0);
    let tabs = Tabs::new(titles)
        .select(selected)
        .style(theme::dim())
        .highlight_style(theme::rose().add_modifier(Modifier::BOLD))
        .divider(Span::styled("│", theme::border()));
    frame.render_widget(tabs, rows[1]);
}
