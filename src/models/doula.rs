use serde::{Deserialize, Serialize};

use crate::listing::Keyed;
use crate::models::common::{lenient_names, or_dash};
use crate::models::{Describe, Tabular};
use crate::utils::format::format_date;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Availability {
    Available,
    Unavailable,
}

impl Availability {
    pub const ALL: [Availability; 2] = [Availability::Available, Availability::Unavailable];

    pub fn as_str(&self) -> &'static str {
        match self {
            Availability::Available => "AVAILABLE",
            Availability::Unavailable => "UNAVAILABLE",
        }
    }
}

impl std::str::FromStr for Availability {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "AVAILABLE" => Ok(Availability::Available),
            "UNAVAILABLE" => Ok(Availability::Unavailable),
            _ => Err(anyhow::anyhow!("Unknown availability: {}", s)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Doula {
    pub user_id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub profile_id: Option<String>,
    #[serde(rename = "profile_image", default)]
    pub profile_image: Option<String>,
    #[serde(default)]
    pub yoe: Option<u32>,
    #[serde(default, deserialize_with = "lenient_names")]
    pub service_names: Vec<String>,
    #[serde(default, deserialize_with = "lenient_names")]
    pub region_names: Vec<String>,
    #[serde(default)]
    pub ratings: Option<f64>,
    #[serde(default)]
    pub reviews_count: Option<u32>,
    #[serde(default)]
    pub next_immediate_availability_date: Option<String>,
    #[serde(default)]
    pub is_active: bool,
}

impl Doula {
    pub fn profile_image_url(&self, image_base_url: Option<&str>) -> Option<String> {
        let image = self.profile_image.as_deref().filter(|i| !i.is_empty())?;
        if image.starts_with("http://") || image.starts_with("https://") {
            return Some(image.to_string());
        }
        Some(match image_base_url {
            Some(base) => format!("{}/{}", base.trim_end_matches('/'), image.trim_start_matches('/')),
            None => image.to_string(),
        })
    }

    pub fn availability(&self) -> String {
        match self.next_immediate_availability_date.as_deref() {
            Some(date) if !date.is_empty() => format_date(date),
            _ => "Unavailable".to_string(),
        }
    }

    pub fn rating_label(&self) -> String {
        match self.ratings {
            Some(r) => format!("{:.1} ({})", r, self.reviews_count.unwrap_or(0)),
            None => or_dash(None),
        }
    }
}

impl Keyed for Doula {
    fn key(&self) -> &str {
        &self.user_id
    }
}

impl Tabular for Doula {
    const HEADERS: &'static [&'static str] =
        &["Name", "Services", "Regions", "Exp", "Rating", "Next available", "Status"];
    const WIDTHS: &'static [u16] = &[18, 22, 18, 6, 10, 14, 10];

    fn cells(&self) -> Vec<String> {
        vec![
            or_dash(Some(&self.name)),
            or_dash(Some(&self.service_names.join(", "))),
            or_dash(Some(&self.region_names.join(", "))),
            format!("{}y", self.yoe.unwrap_or(0)),
            self.rating_label(),
            self.availability(),
            if self.is_active { "ACTIVE" } else { "INACTIVE" }.to_string(),
        ]
    }

    fn status_label(&self) -> Option<&str> {
        Some(if self.is_active { "ACTIVE" } else { "INACTIVE" })
    }
}

impl Describe for Doula {
    fn title(&self) -> String {
        self.name.clone()
    }

    fn detail_lines(&self) -> Vec<(&'static str, String)> {
        vec![
            ("Email", or_dash(Some(&self.email))),
            ("Experience", format!("{} years", self.yoe.unwrap_or(0))),
            ("Services", or_dash(Some(&self.service_names.join(", ")))),
            ("Regions", or_dash(Some(&self.region_names.join(", ")))),
            ("Rating", self.rating_label()),
            ("Next available", self.availability()),
            ("Active", if self.is_active { "Yes" } else { "No" }.to_string()),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample() -> Doula {
        serde_json::from_value(json!({
            "userId": "u1",
            "name": "Asha",
            "email": "asha@example.com",
            "profile_image": "uploads/asha.png",
            "serviceNames": [{ "serviceName": "Postpartum" }, "Lactation"],
            "regionNames": [{ "name": "Pune" }],
            "ratings": 4.56,
            "reviewsCount": 12,
            "isActive": true
        }))
        .unwrap()
    }

    #[test]
    fn wire_lists_are_flattened() {
        let d = sample();
        assert_eq!(d.service_names, vec!["Postpartum", "Lactation"]);
        assert_eq!(d.region_names, vec!["Pune"]);
        assert_eq!(d.rating_label(), "4.6 (12)");
        assert_eq!(d.availability(), "Unavailable");
    }

    #[test]
    fn image_url_joins_base() {
        let d = sample();
        assert_eq!(
            d.profile_image_url(Some("https://cdn.example.com/")).as_deref(),
            Some("https://cdn.example.com/uploads/asha.png")
        );
        assert_eq!(d.profile_image_url(None).as_deref(), Some("uploads/asha.png"));
    }
}
