use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::Modifier,
    text::{Line, Span},
    widgets::{BarChart, Block, BorderType, Borders, LineGauge, Paragraph, Row, Table},
    Frame,
};

use crate::analytics::{humanize, DashboardSnapshot};
use crate::listing::Choice;
use crate::models::{ActivityPoint, CountSummary, Tabular, UserSummary};
use crate::tui::theme;

fn panel(title: &str) -> Block<'_> {
    Block::default()
        .title(Span::styled(format!(" {} ", title), theme::rose()))
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(theme::border())
        .style(theme::surface())
}

fn placeholder(frame: &mut Frame, area: Rect, title: &str, text: &str) {
    let paragraph = Paragraph::new(vec![
        Line::from(""),
        Line::from(Span::styled(format!("  {}", text), theme::dim())),
    ])
    .block(panel(title));
    frame.render_widget(paragraph, area);
}

pub fn render(
    frame: &mut Frame,
    area: Rect,
    snapshot: Option<&DashboardSnapshot>,
    loading: bool,
    region: Option<&Choice>,
) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Length(9),
            Constraint::Min(8),
            Constraint::Length(9),
        ])
        .split(area);

    let scope = region.map(|r| r.name.as_str()).unwrap_or("All regions");
    let mut banner = vec![
        Span::styled(" Region: ", theme::dim()),
        Span::styled(scope, theme::bold()),
    ];
    if loading {
        banner.push(Span::styled("   loading…", theme::amber()));
    }
    frame.render_widget(Paragraph::new(Line::from(banner)), rows[0]);

    let cards = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Ratio(1, 3),
            Constraint::Ratio(1, 3),
            Constraint::Ratio(1, 3),
        ])
        .split(rows[1]);

    // Skeleton until every section has resolved one way or the other.
    let Some(snapshot) = snapshot.filter(|_| !loading) else {
        placeholder(frame, cards[0], "Users", "Loading…");
        placeholder(frame, cards[1], "Bookings", "Loading…");
        placeholder(frame, cards[2], "Meetings", "Loading…");
        placeholder(frame, rows[2], "Daily activity", "Loading…");
        placeholder(frame, rows[3], "Recent users", "Loading…");
        return;
    };

    count_card(frame, cards[0], "Users", snapshot.users.as_ref());
    count_card(frame, cards[1], "Bookings", snapshot.bookings.as_ref());
    count_card(frame, cards[2], "Meetings", snapshot.meetings.as_ref());

    match snapshot.activity.as_deref() {
        Some(series) if !series.is_empty() => activity_chart(frame, rows[2], series, snapshot.activity_peak()),
        Some(_) => placeholder(frame, rows[2], "Daily activity", "No activity recorded"),
        None => placeholder(frame, rows[2], "Daily activity", "Unavailable"),
    }

    match snapshot.recent_users.as_deref() {
        Some(users) => recent_users(frame, rows[3], users),
        None => placeholder(frame, rows[3], "Recent users", "Unavailable"),
    }
}

fn count_card(frame: &mut Frame, area: Rect, title: &str, summary: Option<&CountSummary>) {
    let Some(summary) = summary else {
        placeholder(frame, area, title, "Unavailable");
        return;
    };

    let block = panel(title);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let ratios = summary.ratios();
    let shown = ratios.len().min(inner.height.saturating_sub(2) as usize);
    let mut constraints = vec![Constraint::Length(2)];
    constraints.extend(std::iter::repeat_n(Constraint::Length(1), shown));
    constraints.push(Constraint::Min(0));
    let lines = Layout::default()
        .direction(Direction::Vertical)
        .constraints(constraints)
        .split(inner);

    let headline = Paragraph::new(Line::from(vec![
        Span::styled(" ", theme::dim()),
        Span::styled(
            summary.total().to_string(),
            theme::rose().add_modifier(Modifier::BOLD),
        ),
        Span::styled(" total", theme::dim()),
    ]));
    frame.render_widget(headline, lines[0]);

    for (i, (key, value, share)) in ratios.iter().take(shown).enumerate() {
        let gauge = LineGauge::default()
            .ratio(*share)
            .label(Span::styled(
                format!(" {:<12}{:>5}", humanize(key), value),
                theme::dim(),
            ))
            .filled_style(theme::rose())
            .unfilled_style(theme::border());
        frame.render_widget(gauge, lines[i + 1]);
    }
}

fn activity_chart(frame: &mut Frame, area: Rect, series: &[ActivityPoint], peak: u64) {
    // Dates are long; the tail (MM-DD) is enough under a bar.
    let labels: Vec<String> = series
        .iter()
        .map(|p| {
            let chars: Vec<char> = p.label.chars().collect();
            chars[chars.len().saturating_sub(5)..].iter().collect()
        })
        .collect();
    let data: Vec<(&str, u64)> = labels
        .iter()
        .zip(series)
        .map(|(label, point)| (label.as_str(), point.total()))
        .collect();

    let chart = BarChart::default()
        .block(panel("Daily activity"))
        .data(data.as_slice())
        .bar_width(5)
        .bar_gap(1)
        .max(peak.max(1))
        .bar_style(theme::rose())
        .value_style(theme::bold())
        .label_style(theme::dim());
    frame.render_widget(chart, area);
}

fn recent_users(frame: &mut Frame, area: Rect, users: &[UserSummary]) {
    if users.is_empty() {
        placeholder(frame, area, "Recent users", "No users yet");
        return;
    }
    let header = Row::new(UserSummary::HEADERS.iter().copied()).style(theme::bold());
    let rows: Vec<Row> = users.iter().map(|u| Row::new(u.cells())).collect();
    let widths: Vec<Constraint> = UserSummary::WIDTHS
        .iter()
        .map(|w| Constraint::Fill(*w))
        .collect();
    let table = Table::new(rows, widths)
        .header(header)
        .column_spacing(2)
        .block(panel("Recent users"));
    frame.render_widget(table, area);
}
