use anyhow::{anyhow, Result};
use chrono::{DateTime, NaiveDate, NaiveDateTime};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

fn parse_any(raw: &str) -> Option<NaiveDateTime> {
    let raw = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.naive_utc());
    }
    if let Ok(dt) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f") {
        return Some(dt);
    }
    NaiveDate::parse_from_str(raw.get(..10).unwrap_or(raw), "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
}

/// "2025-01-05T00:00:00.000Z" → "5 Jan 2025". Unparseable input is echoed.
pub fn format_date(raw: &str) -> String {
    if raw.trim().is_empty() {
        return "—".to_string();
    }
    match parse_any(raw) {
        Some(dt) => dt.format("%-d %b %Y").to_string(),
        None => raw.to_string(),
    }
}

pub fn format_datetime(raw: &str) -> String {
    if raw.trim().is_empty() {
        return "—".to_string();
    }
    match parse_any(raw) {
        Some(dt) => dt.format("%-d %b %Y, %H:%M").to_string(),
        None => raw.to_string(),
    }
}

/// Start of the given day as an ISO-8601 UTC timestamp for query params.
pub fn iso_start_of_day(date: NaiveDate) -> String {
    format!("{}T00:00:00.000Z", date.format("%Y-%m-%d"))
}

pub fn parse_date(s: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d")
        .map_err(|_| anyhow!("'{}' is not a date (expected YYYY-MM-DD)", s))
}

/// Indian digit grouping: 1234567 → "₹12,34,567".
pub fn format_inr(amount: f64) -> String {
    let negative = amount < 0.0;
    let rounded = (amount.abs() * 100.0).round() / 100.0;
    let whole = rounded.trunc() as u64;
    let paise = ((rounded - rounded.trunc()) * 100.0).round() as u64;

    let digits = whole.to_string();
    let grouped = if digits.len() <= 3 {
        digits
    } else {
        let (head, tail) = digits.split_at(digits.len() - 3);
        let mut groups: Vec<&str> = Vec::new();
        let mut end = head.len();
        while end > 0 {
            let start = end.saturating_sub(2);
            groups.push(&head[start..end]);
            end = start;
        }
        groups.reverse();
        format!("{},{}", groups.join(","), tail)
    };

    let sign = if negative { "-" } else { "" };
    if paise > 0 {
        format!("{}₹{}.{:02}", sign, grouped, paise)
    } else {
        format!("{}₹{}", sign, grouped)
    }
}

/// Amounts sometimes arrive as decimal strings.
pub fn format_inr_text(raw: &str) -> String {
    match raw.trim().parse::<f64>() {
        Ok(v) => format_inr(v),
        Err(_) => raw.to_string(),
    }
}

pub fn stars(rating: u8) -> String {
    let filled = rating.min(5) as usize;
    format!("{}{}", "★".repeat(filled), "☆".repeat(5 - filled))
}

/// Cut to a display width, marking the cut with an ellipsis.
pub fn truncate(s: &str, width: usize) -> String {
    if UnicodeWidthStr::width(s) <= width {
        return s.to_string();
    }
    if width == 0 {
        return String::new();
    }
    let mut out = String::new();
    let mut used = 0;
    for c in s.chars() {
        let w = UnicodeWidthChar::width(c).unwrap_or(0);
        if used + w + 1 > width {
            break;
        }
        out.push(c);
        used += w;
    }
    out.push('…');
    out
}

/// Pad to a display width (wide glyphs count double).
pub fn pad(s: &str, width: usize) -> String {
    let w = UnicodeWidthStr::width(s);
    if w >= width {
        s.to_string()
    } else {
        format!("{}{}", s, " ".repeat(width - w))
    }
}

/// Create a simple ASCII progress bar
pub fn progress_bar(filled: u64, total: u64, width: usize) -> String {
    if total == 0 {
        return "░".repeat(width);
    }
    let ratio = (filled as f64 / total as f64).min(1.0);
    let filled_count = (ratio * width as f64).round() as usize;
    let empty_count = width.saturating_sub(filled_count);
    format!("{}{}", "█".repeat(filled_count), "░".repeat(empty_count))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dates_render_day_month_year() {
        assert_eq!(format_date("2025-01-05T00:00:00.000Z"), "5 Jan 2025");
        assert_eq!(format_date("2024-12-31"), "31 Dec 2024");
        assert_eq!(format_date(""), "—");
        assert_eq!(format_date("soon"), "soon");
        assert_eq!(format_datetime("2025-03-01T14:05:00Z"), "1 Mar 2025, 14:05");
    }

    #[test]
    fn iso_bounds() {
        let d = parse_date("2025-02-10").unwrap();
        assert_eq!(iso_start_of_day(d), "2025-02-10T00:00:00.000Z");
        assert!(parse_date("10/02/2025").is_err());
    }

    #[test]
    fn rupees_use_indian_grouping() {
        assert_eq!(format_inr(0.0), "₹0");
        assert_eq!(format_inr(999.0), "₹999");
        assert_eq!(format_inr(4500.0), "₹4,500");
        assert_eq!(format_inr(1234567.0), "₹12,34,567");
        assert_eq!(format_inr(125000.5), "₹1,25,000.50");
        assert_eq!(format_inr_text("n/a"), "n/a");
    }

    #[test]
    fn truncate_respects_width() {
        assert_eq!(truncate("Postpartum care", 8), "Postpar…");
        assert_eq!(truncate("Asha", 8), "Asha");
        assert_eq!(pad("ab", 4), "ab  ");
        assert_eq!(stars(3), "★★★☆☆");
        assert_eq!(progress_bar(1, 4, 8), "██░░░░░░");
    }
}
