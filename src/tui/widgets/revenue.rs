use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Paragraph},
    Frame,
};
use tui_big_text::{BigText, PixelSize};

use crate::listing::{ListFilter, RevenueFilter};
use crate::models::RevenueTotal;
use crate::tui::theme;

pub fn render(
    frame: &mut Frame,
    area: Rect,
    filter: &RevenueFilter,
    total: Option<&RevenueTotal>,
    loading: bool,
    error: Option<&str>,
) {
    let block = Block::default()
        .title(Span::styled(" Total revenue ", theme::rose()))
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(theme::border())
        .style(theme::surface());
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Length(2),
            Constraint::Length(8),
            Constraint::Min(0),
        ])
        .split(inner);

    frame.render_widget(
        Paragraph::new(Line::from(vec![
            Span::styled(" Filters: ", theme::dim()),
            Span::styled(filter.summary(), theme::bold()),
        ])),
        chunks[0],
    );

    let status = match (loading, error) {
        (true, _) => Some(Span::styled(" loading…", theme::amber())),
        (false, Some(err)) => Some(Span::styled(format!(" ✗ {}", err), theme::red())),
        _ => None,
    };

    match total {
        Some(total) => {
            let big = BigText::builder()
                .pixel_size(PixelSize::Quadrant)
                .style(theme::rose())
                .lines(vec![Line::from(total.formatted())])
                .build();
            let number_area = Rect {
                x: chunks[2].x + 2,
                width: chunks[2].width.saturating_sub(2),
                ..chunks[2]
            };
            frame.render_widget(big, number_area);
        }
        None if !loading => {
            frame.render_widget(
                Paragraph::new(Span::styled("  No revenue loaded yet", theme::dim())),
                chunks[2],
            );
        }
        None => {}
    }

    if let Some(status) = status {
        frame.render_widget(Paragraph::new(Line::from(status)), chunks[3]);
    }
}
