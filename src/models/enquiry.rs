use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::listing::Keyed;
use crate::models::common::or_dash;
use crate::models::{Describe, Tabular};
use crate::utils::format::{format_date, format_datetime};
use crate::workflow::HasStatus;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EnquiryStatus {
    Pending,
    InReview,
    Accepted,
    Rejected,
    #[serde(other)]
    Unknown,
}

impl EnquiryStatus {
    pub const ALL: [EnquiryStatus; 4] = [
        EnquiryStatus::Pending,
        EnquiryStatus::InReview,
        EnquiryStatus::Accepted,
        EnquiryStatus::Rejected,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            EnquiryStatus::Pending => "PENDING",
            EnquiryStatus::InReview => "IN_REVIEW",
            EnquiryStatus::Accepted => "ACCEPTED",
            EnquiryStatus::Rejected => "REJECTED",
            EnquiryStatus::Unknown => "UNKNOWN",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            EnquiryStatus::Pending => "Pending",
            EnquiryStatus::InReview => "In review",
            EnquiryStatus::Accepted => "Accepted",
            EnquiryStatus::Rejected => "Rejected",
            EnquiryStatus::Unknown => "Unknown",
        }
    }
}

impl FromStr for EnquiryStatus {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().replace('-', "_").as_str() {
            "PENDING" => Ok(EnquiryStatus::Pending),
            "IN_REVIEW" | "INREVIEW" => Ok(EnquiryStatus::InReview),
            "ACCEPTED" => Ok(EnquiryStatus::Accepted),
            "REJECTED" => Ok(EnquiryStatus::Rejected),
            _ => Err(anyhow::anyhow!("Unknown enquiry status: {}", s)),
        }
    }
}

/// A doula applicant's join request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DoulaEnquiry {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub phone: String,
    pub status: EnquiryStatus,
    #[serde(default)]
    pub created_at: String,
    #[serde(default)]
    pub updated_at: String,
}

impl Keyed for DoulaEnquiry {
    fn key(&self) -> &str {
        &self.id
    }
}

impl HasStatus for DoulaEnquiry {
    type Status = EnquiryStatus;

    fn status(&self) -> EnquiryStatus {
        self.status
    }

    fn set_status(&mut self, status: EnquiryStatus) {
        self.status = status;
    }
}

impl Tabular for DoulaEnquiry {
    const HEADERS: &'static [&'static str] = &["Name", "Email", "Phone", "Status", "Received"];
    const WIDTHS: &'static [u16] = &[20, 28, 14, 12, 14];

    fn cells(&self) -> Vec<String> {
        vec![
            or_dash(Some(&self.name)),
            or_dash(Some(&self.email)),
            or_dash(Some(&self.phone)),
            self.status.as_str().to_string(),
            format_date(&self.created_at),
        ]
    }

    fn status_label(&self) -> Option<&str> {
        Some(self.status.as_str())
    }
}

impl Describe for DoulaEnquiry {
    fn title(&self) -> String {
        format!("Enquiry from {}", self.name)
    }

    fn detail_lines(&self) -> Vec<(&'static str, String)> {
        vec![
            ("Name", or_dash(Some(&self.name))),
            ("Email", or_dash(Some(&self.email))),
            ("Phone", or_dash(Some(&self.phone))),
            ("Status", self.status.display_name().to_string()),
            ("Received", format_datetime(&self.created_at)),
            ("Updated", format_datetime(&self.updated_at)),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::workflow::WorkflowStatus;
    use serde_json::json;

    #[test]
    fn unexpected_status_is_unknown() {
        let rows: Vec<DoulaEnquiry> = serde_json::from_value(json!([
            { "id": "e1", "name": "Kavya", "status": "IN_REVIEW" },
            { "id": "e2", "name": "Ritu", "status": "ON_HOLD" }
        ]))
        .unwrap();
        assert_eq!(rows[0].status, EnquiryStatus::InReview);
        assert_eq!(rows[1].status, EnquiryStatus::Unknown);
        assert!(rows[1].status.next_statuses().is_empty());
        assert!(!EnquiryStatus::ALL.contains(&EnquiryStatus::Unknown));
    }
}
