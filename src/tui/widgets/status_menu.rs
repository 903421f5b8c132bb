use ratatui::{
    style::Modifier,
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Clear, Paragraph},
    Frame,
};

use crate::tui::theme;
use crate::tui::widgets::popup::centered;
use crate::workflow::{StatusMenu, WorkflowStatus};

pub fn render<S: WorkflowStatus>(frame: &mut Frame, menu: &StatusMenu<S>, noun: &str) {
    let Some(current) = menu.current() else {
        return;
    };
    let options = menu.options();
    let height = options.len().max(1) as u16 + 7;
    let area = centered(frame.area(), 44, height);
    frame.render_widget(Clear, area);

    let mut lines = vec![
        Line::from(""),
        Line::from(vec![
            Span::styled("  Current: ", theme::dim()),
            Span::styled(current.label(), theme::status_style(current.as_str())),
        ]),
        Line::from(""),
    ];

    if options.is_empty() {
        lines.push(Line::from(Span::styled(
            format!("  {} is final", current.label()),
            theme::dim(),
        )));
    }
    for (i, option) in options.iter().enumerate() {
        let selected = i == menu.cursor();
        let marker = if selected { "▸ " } else { "  " };
        let style = if selected {
            theme::status_style(option.as_str()).add_modifier(Modifier::BOLD)
        } else {
            theme::status_style(option.as_str())
        };
        lines.push(Line::from(vec![
            Span::styled(format!("  {}", marker), theme::rose()),
            Span::styled(option.label(), style),
        ]));
    }

    lines.push(Line::from(""));
    if menu.is_updating() {
        lines.push(Line::from(Span::styled("  updating…", theme::amber())));
    } else {
        lines.push(Line::from(Span::styled("  [Enter] apply  ·  [Esc] close", theme::dim())));
    }

    let block = Block::default()
        .title(Span::styled(format!(" {} status ", noun), theme::rose()))
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(theme::amber())
        .style(theme::surface());
    frame.render_widget(Paragraph::new(lines).block(block), area);
}
