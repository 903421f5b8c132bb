use serde::{Deserialize, Serialize};

use crate::listing::Keyed;
use crate::models::common::{lenient_text, or_dash};
use crate::models::{Describe, Tabular};

fn default_true() -> bool {
    true
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Region {
    pub region_id: String,
    #[serde(default)]
    pub region_name: String,
    #[serde(default, deserialize_with = "lenient_text")]
    pub pincode: Option<String>,
    #[serde(default)]
    pub district: Option<String>,
    #[serde(default)]
    pub state: Option<String>,
    #[serde(default)]
    pub country: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub latitude: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub longitude: Option<String>,
    #[serde(rename = "is_active", default = "default_true")]
    pub is_active: bool,
    #[serde(default)]
    pub zone_manager_id: Option<String>,
}

impl Region {
    pub fn is_assigned(&self) -> bool {
        self.zone_manager_id.as_deref().is_some_and(|id| !id.is_empty())
    }
}

impl Keyed for Region {
    fn key(&self) -> &str {
        &self.region_id
    }
}

impl Tabular for Region {
    const HEADERS: &'static [&'static str] = &["Name", "District", "State", "Pincode", "Zone manager", "Status"];
    const WIDTHS: &'static [u16] = &[22, 18, 16, 10, 14, 10];

    fn cells(&self) -> Vec<String> {
        vec![
            or_dash(Some(&self.region_name)),
            or_dash(self.district.as_deref()),
            or_dash(self.state.as_deref()),
            or_dash(self.pincode.as_deref()),
            if self.is_assigned() { "Assigned" } else { "Unassigned" }.to_string(),
            if self.is_active { "ACTIVE" } else { "INACTIVE" }.to_string(),
        ]
    }

    fn status_label(&self) -> Option<&str> {
        Some(if self.is_active { "ACTIVE" } else { "INACTIVE" })
    }
}

impl Describe for Region {
    fn title(&self) -> String {
        self.region_name.clone()
    }

    fn detail_lines(&self) -> Vec<(&'static str, String)> {
        vec![
            ("Pincode", or_dash(self.pincode.as_deref())),
            ("District", or_dash(self.district.as_deref())),
            ("State", or_dash(self.state.as_deref())),
            ("Country", or_dash(self.country.as_deref())),
            (
                "Coordinates",
                match (&self.latitude, &self.longitude) {
                    (Some(lat), Some(lng)) => format!("{}, {}", lat, lng),
                    _ => or_dash(None),
                },
            ),
            ("Active", if self.is_active { "Yes" } else { "No" }.to_string()),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn numeric_coordinates_become_text() {
        let r: Region = serde_json::from_value(json!({
            "regionId": "r1",
            "regionName": "Pune",
            "pincode": 411001,
            "latitude": 18.5204,
            "longitude": "73.8567",
            "zoneManagerId": null
        }))
        .unwrap();
        assert_eq!(r.pincode.as_deref(), Some("411001"));
        assert_eq!(r.latitude.as_deref(), Some("18.5204"));
        assert!(r.is_active);
        assert!(!r.is_assigned());
    }
}
