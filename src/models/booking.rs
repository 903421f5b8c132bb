use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::listing::Keyed;
use crate::models::common::or_dash;
use crate::models::{Describe, Tabular};
use crate::utils::format::format_date;
use crate::workflow::HasStatus;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BookingStatus {
    Pending,
    Active,
    Completed,
    Canceled,
    #[serde(other)]
    Unknown,
}

impl BookingStatus {
    pub const ALL: [BookingStatus; 4] = [
        BookingStatus::Pending,
        BookingStatus::Active,
        BookingStatus::Completed,
        BookingStatus::Canceled,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            BookingStatus::Pending => "PENDING",
            BookingStatus::Active => "ACTIVE",
            BookingStatus::Completed => "COMPLETED",
            BookingStatus::Canceled => "CANCELED",
            BookingStatus::Unknown => "UNKNOWN",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            BookingStatus::Pending => "Pending",
            BookingStatus::Active => "Active",
            BookingStatus::Completed => "Completed",
            BookingStatus::Canceled => "Canceled",
            BookingStatus::Unknown => "Unknown",
        }
    }
}

impl std::fmt::Display for BookingStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

impl FromStr for BookingStatus {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "PENDING" => Ok(BookingStatus::Pending),
            "ACTIVE" => Ok(BookingStatus::Active),
            "COMPLETED" => Ok(BookingStatus::Completed),
            "CANCELED" | "CANCELLED" => Ok(BookingStatus::Canceled),
            _ => Err(anyhow::anyhow!("Unknown booking status: {}", s)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TimeShift {
    #[serde(rename = "MORNING")]
    Morning,
    #[serde(rename = "NIGHT")]
    Night,
    #[serde(rename = "FULLDAY")]
    FullDay,
    #[serde(other)]
    Unknown,
}

impl TimeShift {
    pub const ALL: [TimeShift; 3] = [TimeShift::Morning, TimeShift::Night, TimeShift::FullDay];

    pub fn as_str(&self) -> &'static str {
        match self {
            TimeShift::Morning => "MORNING",
            TimeShift::Night => "NIGHT",
            TimeShift::FullDay => "FULLDAY",
            TimeShift::Unknown => "UNKNOWN",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            TimeShift::Morning => "Morning",
            TimeShift::Night => "Night",
            TimeShift::FullDay => "Full day",
            TimeShift::Unknown => "—",
        }
    }
}

impl FromStr for TimeShift {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().replace(['-', '_', ' '], "").as_str() {
            "MORNING" => Ok(TimeShift::Morning),
            "NIGHT" => Ok(TimeShift::Night),
            "FULLDAY" => Ok(TimeShift::FullDay),
            _ => Err(anyhow::anyhow!("Unknown time shift: {}", s)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Booking {
    pub booking_id: String,
    #[serde(default)]
    pub client_name: String,
    #[serde(default)]
    pub client_user_id: String,
    #[serde(default)]
    pub doula_name: String,
    #[serde(default)]
    pub doula_user_id: String,
    #[serde(default)]
    pub service_name: String,
    #[serde(default)]
    pub service_id: String,
    #[serde(default)]
    pub region_id: String,
    #[serde(default)]
    pub region_name: String,
    #[serde(rename = "start_date", default)]
    pub start_date: String,
    #[serde(rename = "end_date", default)]
    pub end_date: String,
    #[serde(default)]
    pub time_shift: Option<TimeShift>,
    pub status: BookingStatus,
    #[serde(default)]
    pub is_paid: bool,
}

impl Booking {
    pub fn date_range(&self) -> String {
        format!("{} → {}", format_date(&self.start_date), format_date(&self.end_date))
    }
}

impl Keyed for Booking {
    fn key(&self) -> &str {
        &self.booking_id
    }
}

impl HasStatus for Booking {
    type Status = BookingStatus;

    fn status(&self) -> BookingStatus {
        self.status
    }

    fn set_status(&mut self, status: BookingStatus) {
        self.status = status;
    }
}

impl Tabular for Booking {
    const HEADERS: &'static [&'static str] =
        &["Client", "Doula", "Service", "Region", "Dates", "Shift", "Status", "Paid"];
    const WIDTHS: &'static [u16] = &[14, 14, 14, 12, 20, 8, 10, 6];

    fn cells(&self) -> Vec<String> {
        vec![
            or_dash(Some(&self.client_name)),
            or_dash(Some(&self.doula_name)),
            or_dash(Some(&self.service_name)),
            or_dash(Some(&self.region_name)),
            self.date_range(),
            self.time_shift
                .map(|s| s.display_name().to_string())
                .unwrap_or_else(|| "—".to_string()),
            self.status.as_str().to_string(),
            if self.is_paid { "Yes" } else { "No" }.to_string(),
        ]
    }

    fn status_label(&self) -> Option<&str> {
        Some(self.status.as_str())
    }
}

impl Describe for Booking {
    fn title(&self) -> String {
        format!("Booking {}", self.booking_id)
    }

    fn detail_lines(&self) -> Vec<(&'static str, String)> {
        vec![
            ("Client", or_dash(Some(&self.client_name))),
            ("Doula", or_dash(Some(&self.doula_name))),
            ("Service", or_dash(Some(&self.service_name))),
            ("Region", or_dash(Some(&self.region_name))),
            ("Dates", self.date_range()),
            (
                "Shift",
                self.time_shift.unwrap_or(TimeShift::Unknown).display_name().to_string(),
            ),
            ("Status", self.status.display_name().to_string()),
            ("Paid", if self.is_paid { "Yes" } else { "No" }.to_string()),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn booking_reads_wire_names() {
        let b: Booking = serde_json::from_value(json!({
            "bookingId": "bk-1",
            "clientName": "Meera",
            "doulaName": "Asha",
            "serviceName": "Postpartum care",
            "regionName": "Pune",
            "start_date": "2025-01-05T00:00:00.000Z",
            "end_date": "2025-01-12T00:00:00.000Z",
            "timeShift": "FULLDAY",
            "status": "ACTIVE",
            "isPaid": true
        }))
        .unwrap();
        assert_eq!(b.key(), "bk-1");
        assert_eq!(b.time_shift, Some(TimeShift::FullDay));
        assert_eq!(b.status, BookingStatus::Active);
        assert!(b.is_paid);
        assert_eq!(b.date_range(), "5 Jan 2025 → 12 Jan 2025");
    }

    #[test]
    fn unexpected_status_is_unknown() {
        let b: Booking = serde_json::from_value(json!({
            "bookingId": "bk-2",
            "status": "ON_HOLD"
        }))
        .unwrap();
        assert_eq!(b.status, BookingStatus::Unknown);
    }

    #[test]
    fn status_parses_both_spellings() {
        assert_eq!("cancelled".parse::<BookingStatus>().unwrap(), BookingStatus::Canceled);
        assert_eq!("ACTIVE".parse::<BookingStatus>().unwrap(), BookingStatus::Active);
        assert!("paused".parse::<BookingStatus>().is_err());
        assert_eq!("full-day".parse::<TimeShift>().unwrap(), TimeShift::FullDay);
    }
}
