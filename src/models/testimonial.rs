use serde::{Deserialize, Serialize};

use crate::listing::Keyed;
use crate::models::common::{or_dash, ProfileRef, RegionRef, ServicePricingRef, UserRef};
use crate::models::{Describe, Tabular};
use crate::utils::format::{format_date, format_datetime, stars};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DoulaProfileRef {
    #[serde(default)]
    pub user: Option<UserRef>,
    #[serde(rename = "Region", default)]
    pub regions: Vec<RegionRef>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Testimonial {
    pub id: String,
    #[serde(default)]
    pub ratings: u8,
    #[serde(default)]
    pub reviews: String,
    #[serde(default)]
    pub created_at: String,
    #[serde(default)]
    pub client: Option<ProfileRef>,
    #[serde(rename = "DoulaProfile", default)]
    pub doula_profile: Option<DoulaProfileRef>,
    #[serde(rename = "ServicePricing", default)]
    pub service_pricing: Option<ServicePricingRef>,
}

impl Testimonial {
    pub fn client_name(&self) -> String {
        or_dash(self.client.as_ref().and_then(ProfileRef::name))
    }

    pub fn doula_user(&self) -> Option<&UserRef> {
        self.doula_profile.as_ref().and_then(|d| d.user.as_ref())
    }

    pub fn doula_name(&self) -> String {
        or_dash(self.doula_user().map(|u| u.name.as_str()))
    }

    pub fn service_name(&self) -> String {
        or_dash(self.service_pricing.as_ref().and_then(ServicePricingRef::service_name))
    }

    pub fn regions(&self) -> String {
        let names: Vec<&str> = self
            .doula_profile
            .as_ref()
            .map(|d| d.regions.iter().map(|r| r.region_name.as_str()).collect())
            .unwrap_or_default();
        or_dash(Some(&names.join(", ")))
    }
}

/// Summary numbers shown above the testimonial table. Computed from the
/// rows on the current page, the total from the list meta.
#[derive(Debug, Clone, PartialEq)]
pub struct TestimonialStats {
    pub total: u64,
    pub average: f64,
    pub five_star: usize,
}

impl TestimonialStats {
    pub fn from_page(items: &[Testimonial], total: u64) -> Self {
        let average = if items.is_empty() {
            0.0
        } else {
            items.iter().map(|t| t.ratings as f64).sum::<f64>() / items.len() as f64
        };
        Self {
            total,
            average,
            five_star: items.iter().filter(|t| t.ratings == 5).count(),
        }
    }
}

impl Keyed for Testimonial {
    fn key(&self) -> &str {
        &self.id
    }
}

impl Tabular for Testimonial {
    const HEADERS: &'static [&'static str] = &["Client", "Doula", "Service", "Rating", "Review", "Date"];
    const WIDTHS: &'static [u16] = &[16, 16, 16, 8, 32, 12];

    fn cells(&self) -> Vec<String> {
        vec![
            self.client_name(),
            self.doula_name(),
            self.service_name(),
            stars(self.ratings),
            or_dash(Some(&self.reviews)),
            format_date(&self.created_at),
        ]
    }
}

impl Describe for Testimonial {
    fn title(&self) -> String {
        format!("{} → {}", self.client_name(), self.doula_name())
    }

    fn detail_lines(&self) -> Vec<(&'static str, String)> {
        let client = self.client.as_ref();
        let doula = self.doula_user();
        vec![
            ("Service", self.service_name()),
            ("Rating", format!("{} {}", self.ratings, stars(self.ratings))),
            ("Review", or_dash(Some(&self.reviews))),
            ("Client email", or_dash(client.and_then(ProfileRef::email))),
            ("Client phone", or_dash(client.and_then(ProfileRef::phone))),
            ("Doula email", or_dash(doula.map(|u| u.email.as_str()))),
            ("Doula phone", or_dash(doula.and_then(|u| u.phone.as_deref()))),
            ("Doula regions", self.regions()),
            ("Submitted", format_datetime(&self.created_at)),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn rated(id: &str, ratings: u8) -> Testimonial {
        serde_json::from_value(json!({ "id": id, "ratings": ratings, "reviews": "ok" })).unwrap()
    }

    #[test]
    fn stats_average_and_five_star() {
        let items = vec![rated("a", 5), rated("b", 4), rated("c", 5), rated("d", 3)];
        let stats = TestimonialStats::from_page(&items, 17);
        assert_eq!(stats.total, 17);
        assert_eq!(stats.five_star, 2);
        assert!((stats.average - 4.25).abs() < f64::EPSILON);
        assert_eq!(TestimonialStats::from_page(&[], 0).average, 0.0);
    }

    #[test]
    fn nested_doula_regions() {
        let t: Testimonial = serde_json::from_value(json!({
            "id": "t1",
            "ratings": 5,
            "reviews": "Wonderful support",
            "DoulaProfile": {
                "user": { "name": "Asha", "email": "a@x.in", "phone": "999" },
                "Region": [{ "regionName": "Pune", "state": "MH", "country": "IN" }]
            },
            "ServicePricing": { "service": { "name": "Postpartum", "description": "" } }
        }))
        .unwrap();
        assert_eq!(t.doula_name(), "Asha");
        assert_eq!(t.regions(), "Pune");
        assert_eq!(t.client_name(), "—");
        assert_eq!(t.title(), "— → Asha");
    }
}
