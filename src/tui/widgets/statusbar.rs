use ratatui::{
    layout::{Alignment, Rect},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

use crate::notify::{Notice, NoticeLevel};
use crate::tui::theme;

/// Key hints, replaced by the newest live notice while one is showing.
pub fn render(frame: &mut Frame, area: Rect, hints: &[(&str, &str)], notice: Option<&Notice>) {
    let line = match notice {
        Some(notice) => {
            let (icon, style) = match notice.level {
                NoticeLevel::Success => ("✓ ", theme::green()),
                NoticeLevel::Error => ("✗ ", theme::red()),
                NoticeLevel::Info => ("· ", theme::blue()),
            };
            Line::from(vec![
                Span::styled(icon, style),
                Span::styled(notice.message.as_str(), style),
            ])
        }
        None => {
            let mut spans = Vec::new();
            for (key, label) in hints {
                spans.push(Span::styled(*key, theme::rose()));
                spans.push(Span::styled(format!(" {}  ", label), theme::dim()));
            }
            Line::from(spans)
        }
    };

    let paragraph = Paragraph::new(line).alignment(Alignment::Center);
    frame.render_widget(paragraph, area);
}
