use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::listing::Keyed;
use crate::models::common::{or_dash, ProfileRef};
use crate::models::{Describe, Tabular};
use crate::utils::format::format_date;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MeetingStatus {
    Scheduled,
    Completed,
    Canceled,
    #[serde(other)]
    Unknown,
}

impl MeetingStatus {
    pub const ALL: [MeetingStatus; 3] = [
        MeetingStatus::Scheduled,
        MeetingStatus::Completed,
        MeetingStatus::Canceled,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            MeetingStatus::Scheduled => "SCHEDULED",
            MeetingStatus::Completed => "COMPLETED",
            MeetingStatus::Canceled => "CANCELED",
            MeetingStatus::Unknown => "UNKNOWN",
        }
    }
}

impl FromStr for MeetingStatus {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "SCHEDULED" => Ok(MeetingStatus::Scheduled),
            "COMPLETED" => Ok(MeetingStatus::Completed),
            "CANCELED" | "CANCELLED" => Ok(MeetingStatus::Canceled),
            _ => Err(anyhow::anyhow!("Unknown meeting status: {}", s)),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MeetingEnquiry {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub meetings_time_slots: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Meeting {
    pub id: String,
    pub status: MeetingStatus,
    #[serde(default)]
    pub date: String,
    #[serde(default)]
    pub start_time: Option<String>,
    #[serde(default)]
    pub end_time: Option<String>,
    #[serde(default)]
    pub service_name: String,
    #[serde(default)]
    pub remarks: Option<String>,
    #[serde(default)]
    pub link: Option<String>,
    #[serde(default)]
    pub enquiry: MeetingEnquiry,
    #[serde(rename = "ZoneManagerProfile", default)]
    pub zone_manager_profile: Option<ProfileRef>,
}

impl Meeting {
    /// The enquiry's slot is stored as "HH:MM-HH:MM".
    pub fn time_slot(&self) -> String {
        let slot = self.enquiry.meetings_time_slots.trim();
        match slot.split_once('-') {
            Some((start, end)) => format!("{} – {}", start.trim(), end.trim()),
            None if !slot.is_empty() => slot.to_string(),
            None => match (&self.start_time, &self.end_time) {
                (Some(s), Some(e)) => format!("{} – {}", s, e),
                _ => or_dash(None),
            },
        }
    }

    pub fn zone_manager_name(&self) -> String {
        or_dash(self.zone_manager_profile.as_ref().and_then(ProfileRef::name))
    }
}

impl Keyed for Meeting {
    fn key(&self) -> &str {
        &self.id
    }
}

impl Tabular for Meeting {
    const HEADERS: &'static [&'static str] = &["Client", "Date", "Slot", "Service", "Status", "Remarks"];
    const WIDTHS: &'static [u16] = &[18, 12, 14, 18, 12, 26];

    fn cells(&self) -> Vec<String> {
        vec![
            or_dash(Some(&self.enquiry.name)),
            format_date(&self.date),
            self.time_slot(),
            or_dash(Some(&self.service_name)),
            self.status.as_str().to_string(),
            or_dash(self.remarks.as_deref()),
        ]
    }

    fn status_label(&self) -> Option<&str> {
        Some(self.status.as_str())
    }
}

impl Describe for Meeting {
    fn title(&self) -> String {
        format!("Meeting with {}", or_dash(Some(&self.enquiry.name)))
    }

    fn detail_lines(&self) -> Vec<(&'static str, String)> {
        vec![
            ("Status", self.status.as_str().to_string()),
            ("Date", format_date(&self.date)),
            ("Slot", self.time_slot()),
            ("Service", or_dash(Some(&self.service_name))),
            ("Name", or_dash(Some(&self.enquiry.name))),
            ("Email", or_dash(Some(&self.enquiry.email))),
            ("Phone", or_dash(Some(&self.enquiry.phone))),
            ("Zone manager", self.zone_manager_name()),
            ("Link", or_dash(self.link.as_deref())),
            ("Remarks", or_dash(self.remarks.as_deref())),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn slot_is_split_from_enquiry() {
        let m: Meeting = serde_json::from_value(json!({
            "id": "m1",
            "status": "SCHEDULED",
            "date": "2025-02-10T00:00:00.000Z",
            "serviceName": "Consultation",
            "enquiry": { "name": "Ritu", "email": "r@x.in", "phone": "9876543210",
                         "meetingsTimeSlots": "10:00-10:30" }
        }))
        .unwrap();
        assert_eq!(m.time_slot(), "10:00 – 10:30");
        assert_eq!(m.zone_manager_name(), "—");
        assert_eq!(m.cells()[0], "Ritu");
    }

    #[test]
    fn slot_falls_back_to_start_end() {
        let m: Meeting = serde_json::from_value(json!({
            "id": "m2", "status": "COMPLETED", "startTime": "09:00", "endTime": "09:45"
        }))
        .unwrap();
        assert_eq!(m.time_slot(), "09:00 – 09:45");
    }
}
