use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Cell, Paragraph, Row, Table, TableState},
    Frame,
};

use crate::listing::{Keyed, ListController, ListFilter};
use crate::models::Tabular;
use crate::tui::theme;

/// Filter bar, table and paging footer for one list screen.
pub fn render<F, E>(frame: &mut Frame, area: Rect, title: &str, list: &ListController<F, E>)
where
    F: ListFilter,
    E: Keyed + Clone + Tabular,
{
    let block = Block::default()
        .title(Span::styled(format!(" {} ", title), theme::rose()))
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(theme::border())
        .style(theme::surface());
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // filters
            Constraint::Length(1),
            Constraint::Min(0),    // rows
            Constraint::Length(1), // footer
        ])
        .split(inner);

    let mut filter_spans = vec![
        Span::styled(" Filters: ", theme::dim()),
        Span::styled(list.filter().summary(), theme::bold()),
    ];
    if list.loading() {
        filter_spans.push(Span::styled("   loading…", theme::amber()));
    }
    frame.render_widget(Paragraph::new(Line::from(filter_spans)), chunks[0]);

    render_rows(frame, chunks[2], list);

    let pagination = list.pagination();
    let footer = Line::from(vec![
        Span::styled(format!(" {}", pagination.showing_label()), theme::dim()),
        Span::styled("  ·  ", theme::border()),
        Span::styled(pagination.page_label(), theme::dim()),
    ]);
    frame.render_widget(Paragraph::new(footer), chunks[3]);
}

fn render_rows<F, E>(frame: &mut Frame, area: Rect, list: &ListController<F, E>)
where
    F: ListFilter,
    E: Keyed + Clone + Tabular,
{
    if list.items().is_empty() {
        let message = match (list.loading(), list.error()) {
            (true, _) => Span::styled("  Loading…", theme::amber()),
            (false, Some(err)) => Span::styled(format!("  ✗ {}", err), theme::red()),
            (false, None) => Span::styled("  Nothing matches these filters.", theme::dim()),
        };
        frame.render_widget(Paragraph::new(vec![Line::from(""), Line::from(message)]), area);
        return;
    }

    let header = Row::new(E::HEADERS.iter().map(|h| Cell::from(*h)))
        .style(theme::bold())
        .bottom_margin(1);

    let rows: Vec<Row> = list
        .items()
        .iter()
        .map(|item| {
            let status = item.status_label();
            let cells = item.cells().into_iter().map(|text| match status {
                Some(label) if label == text => {
                    Cell::from(Span::styled(text, theme::status_style(label)))
                }
                _ => Cell::from(text),
            });
            Row::new(cells)
        })
        .collect();

    let widths: Vec<Constraint> = E::WIDTHS.iter().map(|w| Constraint::Fill(*w)).collect();

    let table = Table::new(rows, widths)
        .header(header)
        .column_spacing(2)
        .row_highlight_style(theme::selected())
        .highlight_symbol("▸ ");

    let mut state = TableState::default().with_selected(Some(list.selected()));
    frame.render_stateful_widget(table, area, &mut state);

    // A failed refresh keeps the old rows; flag it on the last line.
    if let Some(err) = list.error() {
        let line_area = Rect {
            y: area.y + area.height.saturating_sub(1),
            height: 1,
            ..area
        };
        frame.render_widget(
            Paragraph::new(Span::styled(format!("  ✗ {}", err), theme::red())),
            line_area,
        );
    }
}
