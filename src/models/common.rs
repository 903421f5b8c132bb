use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

pub const EMPTY_CELL: &str = "—";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UserRef {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub phone: Option<String>,
}

/// `{ user: {...} }` wrapper the backend uses for client and doula profiles.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProfileRef {
    #[serde(default)]
    pub user: Option<UserRef>,
}

impl ProfileRef {
    pub fn name(&self) -> Option<&str> {
        self.user.as_ref().map(|u| u.name.as_str())
    }

    pub fn email(&self) -> Option<&str> {
        self.user.as_ref().map(|u| u.email.as_str())
    }

    pub fn phone(&self) -> Option<&str> {
        self.user.as_ref().and_then(|u| u.phone.as_deref())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ServiceRef {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ServicePricingRef {
    #[serde(default)]
    pub service: Option<ServiceRef>,
}

impl ServicePricingRef {
    pub fn service_name(&self) -> Option<&str> {
        self.service.as_ref().map(|s| s.name.as_str())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegionRef {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub region_name: String,
    #[serde(default)]
    pub state: Option<String>,
    #[serde(default)]
    pub country: Option<String>,
}

/// Selectable option for filter dropdowns (services).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Service {
    pub id: String,
    pub name: String,
}

pub fn or_dash(value: Option<&str>) -> String {
    match value {
        Some(v) if !v.trim().is_empty() => v.to_string(),
        _ => EMPTY_CELL.to_string(),
    }
}

fn name_of(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Object(map) => ["name", "serviceName", "regionName"]
            .iter()
            .find_map(|k| map.get(*k).and_then(Value::as_str))
            .map(str::to_string),
        _ => None,
    }
}

/// Name lists arrive either as plain strings or as `{ name }` /
/// `{ serviceName }` / `{ regionName }` objects depending on the endpoint.
pub fn lenient_names<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<Vec<Value>> = Option::deserialize(deserializer)?;
    Ok(raw
        .unwrap_or_default()
        .iter()
        .filter_map(name_of)
        .collect())
}

/// Accepts a string or a number and keeps it as text (coordinates, pincodes).
pub fn lenient_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<Value> = Option::deserialize(deserializer)?;
    Ok(match raw {
        Some(Value::String(s)) => Some(s),
        Some(Value::Number(n)) => Some(n.to_string()),
        _ => None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[derive(Deserialize)]
    struct Names {
        #[serde(default, deserialize_with = "lenient_names")]
        names: Vec<String>,
        #[serde(default, deserialize_with = "lenient_text")]
        lat: Option<String>,
    }

    #[test]
    fn names_accept_strings_and_objects() {
        let parsed: Names = serde_json::from_value(json!({
            "names": ["Pune", {"name": "Mumbai"}, {"serviceName": "Postpartum"}, 7],
            "lat": 18.52
        }))
        .unwrap();
        assert_eq!(parsed.names, vec!["Pune", "Mumbai", "Postpartum"]);
        assert_eq!(parsed.lat.as_deref(), Some("18.52"));
    }

    #[test]
    fn null_names_are_empty() {
        let parsed: Names = serde_json::from_value(json!({ "names": null })).unwrap();
        assert!(parsed.names.is_empty());
        assert!(parsed.lat.is_none());
    }

    #[test]
    fn dash_for_blank() {
        assert_eq!(or_dash(None), EMPTY_CELL);
        assert_eq!(or_dash(Some("  ")), EMPTY_CELL);
        assert_eq!(or_dash(Some("Asha")), "Asha");
    }
}
