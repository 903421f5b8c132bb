use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::listing::Keyed;
use crate::models::common::{or_dash, ProfileRef, ServicePricingRef};
use crate::models::{Describe, Tabular, TimeShift};
use crate::utils::format::{format_date, format_inr_text};
use crate::workflow::HasStatus;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ScheduleStatus {
    Pending,
    InProgress,
    Completed,
    Canceled,
    #[serde(other)]
    Unknown,
}

impl ScheduleStatus {
    pub const ALL: [ScheduleStatus; 4] = [
        ScheduleStatus::Pending,
        ScheduleStatus::InProgress,
        ScheduleStatus::Completed,
        ScheduleStatus::Canceled,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ScheduleStatus::Pending => "PENDING",
            ScheduleStatus::InProgress => "IN_PROGRESS",
            ScheduleStatus::Completed => "COMPLETED",
            ScheduleStatus::Canceled => "CANCELED",
            ScheduleStatus::Unknown => "UNKNOWN",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            ScheduleStatus::Pending => "Pending",
            ScheduleStatus::InProgress => "In progress",
            ScheduleStatus::Completed => "Completed",
            ScheduleStatus::Canceled => "Canceled",
            ScheduleStatus::Unknown => "Unknown",
        }
    }
}

impl std::fmt::Display for ScheduleStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

impl FromStr for ScheduleStatus {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().replace('-', "_").as_str() {
            "PENDING" => Ok(ScheduleStatus::Pending),
            "IN_PROGRESS" | "INPROGRESS" => Ok(ScheduleStatus::InProgress),
            "COMPLETED" => Ok(ScheduleStatus::Completed),
            "CANCELED" | "CANCELLED" => Ok(ScheduleStatus::Canceled),
            _ => Err(anyhow::anyhow!("Unknown schedule status: {}", s)),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleRegion {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub region_name: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceBookingRef {
    #[serde(default)]
    pub total_amount: Option<String>,
    #[serde(default)]
    pub region: Option<ScheduleRegion>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Schedule {
    pub id: String,
    #[serde(default)]
    pub date: String,
    #[serde(rename = "timeshift", default = "unknown_shift")]
    pub time_shift: TimeShift,
    pub status: ScheduleStatus,
    #[serde(rename = "DoulaProfile", default)]
    pub doula_profile: Option<ProfileRef>,
    #[serde(rename = "ServicePricing", default)]
    pub service_pricing: Option<ServicePricingRef>,
    #[serde(default)]
    pub service_booking: Option<ServiceBookingRef>,
    #[serde(default)]
    pub client: Option<ProfileRef>,
}

fn unknown_shift() -> TimeShift {
    TimeShift::Unknown
}

impl Schedule {
    pub fn doula_name(&self) -> String {
        or_dash(self.doula_profile.as_ref().and_then(ProfileRef::name))
    }

    pub fn client_name(&self) -> String {
        or_dash(self.client.as_ref().and_then(ProfileRef::name))
    }

    pub fn service_name(&self) -> String {
        or_dash(self.service_pricing.as_ref().and_then(ServicePricingRef::service_name))
    }

    pub fn region_name(&self) -> String {
        or_dash(
            self.service_booking
                .as_ref()
                .and_then(|b| b.region.as_ref())
                .map(|r| r.region_name.as_str()),
        )
    }

    pub fn amount(&self) -> String {
        self.service_booking
            .as_ref()
            .and_then(|b| b.total_amount.as_deref())
            .map(format_inr_text)
            .unwrap_or_else(|| or_dash(None))
    }
}

impl Keyed for Schedule {
    fn key(&self) -> &str {
        &self.id
    }
}

impl HasStatus for Schedule {
    type Status = ScheduleStatus;

    fn status(&self) -> ScheduleStatus {
        self.status
    }

    fn set_status(&mut self, status: ScheduleStatus) {
        self.status = status;
    }
}

impl Tabular for Schedule {
    const HEADERS: &'static [&'static str] =
        &["Date", "Shift", "Doula", "Client", "Service", "Region", "Status"];
    const WIDTHS: &'static [u16] = &[12, 10, 16, 16, 16, 14, 12];

    fn cells(&self) -> Vec<String> {
        vec![
            format_date(&self.date),
            self.time_shift.display_name().to_string(),
            self.doula_name(),
            self.client_name(),
            self.service_name(),
            self.region_name(),
            self.status.as_str().to_string(),
        ]
    }

    fn status_label(&self) -> Option<&str> {
        Some(self.status.as_str())
    }
}

impl Describe for Schedule {
    fn title(&self) -> String {
        format!("Schedule {}", self.id)
    }

    fn detail_lines(&self) -> Vec<(&'static str, String)> {
        vec![
            ("Date", format_date(&self.date)),
            ("Shift", self.time_shift.display_name().to_string()),
            ("Doula", self.doula_name()),
            ("Client", self.client_name()),
            ("Service", self.service_name()),
            ("Region", self.region_name()),
            ("Amount", self.amount()),
            ("Status", self.status.display_name().to_string()),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn schedule_flattens_nested_names() {
        let s: Schedule = serde_json::from_value(json!({
            "id": "sc-1",
            "date": "2025-03-02",
            "timeshift": "NIGHT",
            "status": "IN_PROGRESS",
            "DoulaProfile": { "user": { "name": "Asha", "email": "asha@example.com" } },
            "ServicePricing": { "service": { "name": "Night care" } },
            "serviceBooking": { "totalAmount": "4500", "region": { "id": "r1", "regionName": "Pune" } }
        }))
        .unwrap();
        assert_eq!(s.time_shift, TimeShift::Night);
        assert_eq!(s.status, ScheduleStatus::InProgress);
        assert_eq!(s.doula_name(), "Asha");
        assert_eq!(s.client_name(), "—");
        assert_eq!(s.service_name(), "Night care");
        assert_eq!(s.region_name(), "Pune");
        assert_eq!(s.amount(), "₹4,500");
    }
}
