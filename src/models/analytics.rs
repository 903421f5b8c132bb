use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::listing::Keyed;
use crate::models::common::or_dash;
use crate::models::Tabular;
use crate::utils::format::{format_date, format_inr};

/// Label → count map returned by the `/analytics/counts/*` endpoints.
/// Nested objects are flattened with a dotted key; non-numeric leaves are
/// dropped.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CountSummary {
    pub counts: BTreeMap<String, u64>,
}

fn flatten_counts(prefix: &str, value: &Value, out: &mut BTreeMap<String, u64>) {
    match value {
        Value::Number(n) => {
            if let Some(v) = n.as_u64().or_else(|| n.as_f64().map(|f| f.max(0.0) as u64)) {
                out.insert(prefix.to_string(), v);
            }
        }
        Value::Object(map) => {
            for (k, v) in map {
                let key = if prefix.is_empty() {
                    k.clone()
                } else {
                    format!("{}.{}", prefix, k)
                };
                flatten_counts(&key, v, out);
            }
        }
        _ => {}
    }
}

impl CountSummary {
    pub fn from_value(value: &Value) -> Self {
        let data = value.get("data").unwrap_or(value);
        let mut counts = BTreeMap::new();
        flatten_counts("", data, &mut counts);
        Self { counts }
    }

    pub fn get(&self, key: &str) -> Option<u64> {
        self.counts.get(key).copied()
    }

    /// Headline number: explicit `total` if present, else the sum.
    pub fn total(&self) -> u64 {
        self.get("total")
            .unwrap_or_else(|| self.counts.values().sum())
    }

    /// Per-label share of the total, excluding the `total` key itself.
    pub fn ratios(&self) -> Vec<(String, u64, f64)> {
        let total = self.total();
        self.counts
            .iter()
            .filter(|(k, _)| k.as_str() != "total")
            .map(|(k, v)| {
                let share = if total == 0 { 0.0 } else { *v as f64 / total as f64 };
                (k.clone(), *v, share.min(1.0))
            })
            .collect()
    }
}

/// One bar in the daily activity series.
#[derive(Debug, Clone, PartialEq)]
pub struct ActivityPoint {
    pub label: String,
    pub values: BTreeMap<String, u64>,
}

impl ActivityPoint {
    pub fn total(&self) -> u64 {
        self.values.values().sum()
    }

    fn from_entry(entry: &Value) -> Option<Self> {
        let map = entry.as_object()?;
        let label = ["date", "day", "label"]
            .iter()
            .find_map(|k| map.get(*k).and_then(Value::as_str))?
            .to_string();
        let values = map
            .iter()
            .filter_map(|(k, v)| v.as_u64().map(|n| (k.clone(), n)))
            .collect();
        Some(Self { label, values })
    }

    /// Accepts `{data: [...]}` or a bare array; unlabeled entries are skipped.
    pub fn series_from_value(value: &Value) -> Vec<Self> {
        let data = value.get("data").unwrap_or(value);
        data.as_array()
            .map(|entries| entries.iter().filter_map(Self::from_entry).collect())
            .unwrap_or_default()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum UserRole {
    Admin,
    ZoneManager,
    Doula,
    Client,
    #[serde(other)]
    Unknown,
}

impl UserRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            UserRole::Admin => "ADMIN",
            UserRole::ZoneManager => "ZONE_MANAGER",
            UserRole::Doula => "DOULA",
            UserRole::Client => "CLIENT",
            UserRole::Unknown => "UNKNOWN",
        }
    }
}

impl std::str::FromStr for UserRole {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().replace('-', "_").as_str() {
            "ADMIN" => Ok(UserRole::Admin),
            "ZONE_MANAGER" | "ZONEMANAGER" => Ok(UserRole::ZoneManager),
            "DOULA" => Ok(UserRole::Doula),
            "CLIENT" => Ok(UserRole::Client),
            _ => Err(anyhow::anyhow!("Unknown role: {}", s)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserSummary {
    #[serde(alias = "userId", default)]
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub role: Option<UserRole>,
    #[serde(alias = "is_active", default)]
    pub is_active: Option<bool>,
    #[serde(default)]
    pub created_at: String,
}

impl Keyed for UserSummary {
    fn key(&self) -> &str {
        &self.id
    }
}

impl Tabular for UserSummary {
    const HEADERS: &'static [&'static str] = &["Name", "Email", "Role", "Joined"];
    const WIDTHS: &'static [u16] = &[24, 32, 16, 14];

    fn cells(&self) -> Vec<String> {
        vec![
            or_dash(Some(&self.name)),
            or_dash(Some(&self.email)),
            self.role.map(|r| r.as_str().to_string()).unwrap_or_else(|| or_dash(None)),
            format_date(&self.created_at),
        ]
    }
}

fn default_currency() -> String {
    "INR".to_string()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RevenueTotal {
    #[serde(default)]
    pub total_revenue: f64,
    #[serde(default = "default_currency")]
    pub currency: String,
}

impl RevenueTotal {
    pub fn formatted(&self) -> String {
        if self.currency.eq_ignore_ascii_case("INR") {
            format_inr(self.total_revenue)
        } else {
            format!("{} {:.2}", self.currency, self.total_revenue)
        }
    }
}

impl Default for RevenueTotal {
    fn default() -> Self {
        Self {
            total_revenue: 0.0,
            currency: default_currency(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn counts_flatten_nested_objects() {
        let summary = CountSummary::from_value(&json!({
            "data": { "total": 40, "active": 30, "byRole": { "doula": 12, "client": 28 }, "note": "x" }
        }));
        assert_eq!(summary.total(), 40);
        assert_eq!(summary.get("byRole.doula"), Some(12));
        assert_eq!(summary.get("note"), None);
    }

    #[test]
    fn ratios_skip_total_key() {
        let summary = CountSummary::from_value(&json!({ "total": 10, "completed": 4, "pending": 6 }));
        let ratios = summary.ratios();
        assert_eq!(ratios.len(), 2);
        assert_eq!(ratios[0].0, "completed");
        assert!((ratios[0].2 - 0.4).abs() < 1e-9);
    }

    #[test]
    fn ratios_without_total_use_sum() {
        let summary = CountSummary::from_value(&json!({ "a": 1, "b": 3 }));
        assert_eq!(summary.total(), 4);
        assert!((summary.ratios()[1].2 - 0.75).abs() < 1e-9);
    }

    #[test]
    fn activity_series_reads_dates() {
        let series = ActivityPoint::series_from_value(&json!({
            "data": [
                { "date": "2025-01-01", "bookings": 3, "meetings": 2 },
                { "day": "Tue", "bookings": 1 },
                { "bookings": 9 }
            ]
        }));
        assert_eq!(series.len(), 2);
        assert_eq!(series[0].total(), 5);
        assert_eq!(series[1].label, "Tue");
    }

    #[test]
    fn revenue_defaults_currency() {
        let r: RevenueTotal = serde_json::from_value(json!({ "totalRevenue": 125000.5 })).unwrap();
        assert_eq!(r.currency, "INR");
        assert_eq!(RevenueTotal::default().total_revenue, 0.0);
        assert_eq!(r.formatted(), "₹1,25,000.50");
        let usd = RevenueTotal { total_revenue: 12.5, currency: "USD".into() };
        assert_eq!(usd.formatted(), "USD 12.50");
    }
}
