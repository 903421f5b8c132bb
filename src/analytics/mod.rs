pub mod dashboard;

pub use dashboard::{load_dashboard, DashboardSnapshot};

/// Label formatting for count keys like `IN_PROGRESS` or `byRole.doula`.
pub fn humanize(key: &str) -> String {
    let last = key.rsplit('.').next().unwrap_or(key);
    let spaced = last.replace('_', " ");
    let mut out = String::new();
    let mut prev_lower = false;
    for c in spaced.chars() {
        if c.is_uppercase() && prev_lower {
            out.push(' ');
        }
        prev_lower = c.is_lowercase();
        out.push(c);
    }
    let lower = out.to_lowercase();
    let mut chars = lower.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn humanized_labels() {
        assert_eq!(humanize("IN_PROGRESS"), "In progress");
        assert_eq!(humanize("byRole.doula"), "Doula");
        assert_eq!(humanize("activeUsers"), "Active users");
        assert_eq!(humanize(""), "");
    }
}
