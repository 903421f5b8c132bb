use serde::{Deserialize, Serialize};

use crate::listing::Keyed;
use crate::models::common::{lenient_names, or_dash};
use crate::models::{Describe, Tabular};

fn active_label(active: bool) -> &'static str {
    if active { "ACTIVE" } else { "INACTIVE" }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ZoneManager {
    pub user_id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default, deserialize_with = "lenient_names")]
    pub regions: Vec<String>,
    #[serde(rename = "is_active", default)]
    pub is_active: bool,
}

impl Keyed for ZoneManager {
    fn key(&self) -> &str {
        &self.user_id
    }
}

impl Tabular for ZoneManager {
    const HEADERS: &'static [&'static str] = &["Name", "Regions", "Phone", "Email", "Status"];
    const WIDTHS: &'static [u16] = &[20, 26, 14, 26, 10];

    fn cells(&self) -> Vec<String> {
        vec![
            or_dash(Some(&self.name)),
            or_dash(Some(&self.regions.join(", "))),
            or_dash(Some(&self.phone)),
            or_dash(Some(&self.email)),
            active_label(self.is_active).to_string(),
        ]
    }

    fn status_label(&self) -> Option<&str> {
        Some(active_label(self.is_active))
    }
}

/// Full record from the detail endpoint, including the doulas under the
/// manager's regions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ZoneManagerDetail {
    #[serde(default)]
    pub user_id: Option<String>,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub phone: String,
    #[serde(rename = "is_active", default)]
    pub is_active: bool,
    #[serde(default, deserialize_with = "lenient_names")]
    pub regions: Vec<String>,
    #[serde(default, deserialize_with = "lenient_names")]
    pub doulas: Vec<String>,
}

impl Describe for ZoneManagerDetail {
    fn title(&self) -> String {
        "Zone Manager Details".to_string()
    }

    fn detail_lines(&self) -> Vec<(&'static str, String)> {
        vec![
            ("Name", or_dash(Some(&self.name))),
            ("Email", or_dash(Some(&self.email))),
            ("Phone", or_dash(Some(&self.phone))),
            ("Status", if self.is_active { "Active" } else { "Inactive" }.to_string()),
            ("Regions", or_dash(Some(&self.regions.join(", ")))),
            ("Doulas", or_dash(Some(&self.doulas.join(", ")))),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn detail_reads_region_objects() {
        let d: ZoneManagerDetail = serde_json::from_value(json!({
            "name": "Kavya",
            "email": "kavya@example.com",
            "phone": "9123456780",
            "is_active": false,
            "regions": [{ "regionName": "Pune" }, { "regionName": "Nashik" }],
            "doulas": [{ "name": "Asha" }]
        }))
        .unwrap();
        assert_eq!(d.regions, vec!["Pune", "Nashik"]);
        let lines = d.detail_lines();
        assert_eq!(lines[3], ("Status", "Inactive".to_string()));
        assert_eq!(lines[5].1, "Asha");
    }
}
