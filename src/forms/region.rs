use log::info;
use serde::Serialize;

use super::{blank, edit_text, SubmitError, ValidationError};
use crate::api::{AdminClient, Transport};
use crate::models::Region;
use crate::notify::Notices;

/// Validated region payload, in the backend's field names.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RegionDraft {
    pub region_name: String,
    pub pincode: String,
    pub district: String,
    pub state: String,
    pub country: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub latitude: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub longitude: Option<String>,
    #[serde(rename = "is_active")]
    pub is_active: bool,
}

/// Draft state of the create/edit region popup.
#[derive(Debug, Clone, PartialEq)]
pub struct RegionForm {
    /// Set when editing an existing region.
    pub region_id: Option<String>,
    pub region_name: String,
    pub pincode: String,
    pub district: String,
    pub state: String,
    pub country: String,
    pub latitude: String,
    pub longitude: String,
    pub is_active: bool,
    pub focus: usize,
    pub error: Option<String>,
}

impl Default for RegionForm {
    fn default() -> Self {
        Self {
            region_id: None,
            region_name: String::new(),
            pincode: String::new(),
            district: String::new(),
            state: String::new(),
            country: "India".to_string(),
            latitude: String::new(),
            longitude: String::new(),
            is_active: true,
            focus: 0,
            error: None,
        }
    }
}

fn coordinate(
    raw: &str,
    field: &'static str,
    limit: f64,
) -> Result<Option<String>, ValidationError> {
    if blank(raw) {
        return Ok(None);
    }
    let out_of_range = ValidationError::OutOfRange {
        field,
        min: -limit,
        max: limit,
    };
    match raw.trim().parse::<f64>() {
        Ok(v) if v.is_finite() && (-limit..=limit).contains(&v) => Ok(Some(raw.trim().to_string())),
        _ => Err(out_of_range),
    }
}

impl RegionForm {
    pub const FIELDS: [&'static str; 8] = [
        "Region name",
        "Pincode",
        "District",
        "State",
        "Country",
        "Latitude",
        "Longitude",
        "Active",
    ];
    const ACTIVE_FIELD: usize = 7;

    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_region(region: &Region) -> Self {
        Self {
            region_id: Some(region.region_id.clone()),
            region_name: region.region_name.clone(),
            pincode: region.pincode.clone().unwrap_or_default(),
            district: region.district.clone().unwrap_or_default(),
            state: region.state.clone().unwrap_or_default(),
            country: region.country.clone().unwrap_or_default(),
            latitude: region.latitude.clone().unwrap_or_default(),
            longitude: region.longitude.clone().unwrap_or_default(),
            is_active: region.is_active,
            focus: 0,
            error: None,
        }
    }

    pub fn is_edit(&self) -> bool {
        self.region_id.is_some()
    }

    pub fn value(&self, index: usize) -> String {
        match index {
            0 => self.region_name.clone(),
            1 => self.pincode.clone(),
            2 => self.district.clone(),
            3 => self.state.clone(),
            4 => self.country.clone(),
            5 => self.latitude.clone(),
            6 => self.longitude.clone(),
            Self::ACTIVE_FIELD => if self.is_active { "[x]" } else { "[ ]" }.to_string(),
            _ => String::new(),
        }
    }

    fn focused_text(&mut self) -> Option<&mut String> {
        match self.focus {
            0 => Some(&mut self.region_name),
            1 => Some(&mut self.pincode),
            2 => Some(&mut self.district),
            3 => Some(&mut self.state),
            4 => Some(&mut self.country),
            5 => Some(&mut self.latitude),
            6 => Some(&mut self.longitude),
            _ => None,
        }
    }

    pub fn next_field(&mut self) {
        self.focus = (self.focus + 1) % Self::FIELDS.len();
    }

    pub fn prev_field(&mut self) {
        self.focus = (self.focus + Self::FIELDS.len() - 1) % Self::FIELDS.len();
    }

    pub fn input(&mut self, c: char) {
        if self.focus == Self::ACTIVE_FIELD {
            if c == ' ' {
                self.is_active = !self.is_active;
            }
            return;
        }
        if let Some(field) = self.focused_text() {
            edit_text(field, c);
        }
    }

    pub fn backspace(&mut self) {
        if let Some(field) = self.focused_text() {
            field.pop();
        }
    }

    pub fn validate(&self) -> Result<RegionDraft, ValidationError> {
        let required = [
            (Self::FIELDS[0], &self.region_name),
            (Self::FIELDS[1], &self.pincode),
            (Self::FIELDS[2], &self.district),
            (Self::FIELDS[3], &self.state),
            (Self::FIELDS[4], &self.country),
        ];
        let missing: Vec<&'static str> = required
            .iter()
            .filter(|(_, v)| blank(v))
            .map(|(name, _)| *name)
            .collect();
        if !missing.is_empty() {
            return Err(ValidationError::MissingFields(missing));
        }

        Ok(RegionDraft {
            region_name: self.region_name.trim().to_string(),
            pincode: self.pincode.trim().to_string(),
            district: self.district.trim().to_string(),
            state: self.state.trim().to_string(),
            country: self.country.trim().to_string(),
            latitude: coordinate(&self.latitude, "Latitude", 90.0)?,
            longitude: coordinate(&self.longitude, "Longitude", 180.0)?,
            is_active: self.is_active,
        })
    }
}

/// Validate, then create or update. Invalid drafts never reach the
/// transport; on any failure the form keeps its contents.
pub fn submit_region<T: Transport>(
    client: &AdminClient<T>,
    form: &mut RegionForm,
    notices: &mut Notices,
) -> Result<(), SubmitError> {
    let draft = match form.validate() {
        Ok(draft) => draft,
        Err(e) => {
            form.error = Some(e.to_string());
            notices.error(e.to_string());
            return Err(e.into());
        }
    };

    let result = match form.region_id.as_deref() {
        Some(id) => client.update_region(id, &draft),
        None => client.create_region(&draft),
    };

    match result {
        Ok(()) => {
            let verb = if form.is_edit() { "updated" } else { "created" };
            info!("Region {} {}", draft.region_name, verb);
            notices.success(format!("Region {} {}", draft.region_name, verb));
            form.error = None;
            Ok(())
        }
        Err(e) => {
            let message = format!("Failed to save region: {}", e.summary());
            form.error = Some(message.clone());
            notices.error(message);
            Err(e.into())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::mock::MockTransport;
    use crate::api::Method;
    use crate::notify::NoticeLevel;
    use serde_json::json;

    fn filled() -> RegionForm {
        RegionForm {
            region_name: "Pune West".into(),
            pincode: "411057".into(),
            district: "Pune".into(),
            state: "Maharashtra".into(),
            country: "India".into(),
            latitude: "18.59".into(),
            longitude: "73.74".into(),
            ..RegionForm::default()
        }
    }

    #[test]
    fn blank_required_field_sends_nothing() {
        let client = AdminClient::new(MockTransport::new().ok(Method::Post, "/regions", json!({})));
        let mut notices = Notices::new(4);
        let mut form = RegionForm {
            district: "  ".into(),
            ..filled()
        };

        let result = submit_region(&client, &mut form, &mut notices);

        assert_eq!(
            result,
            Err(SubmitError::Invalid(ValidationError::MissingFields(vec!["District"])))
        );
        assert!(client.transport().requests().is_empty());
        assert_eq!(notices.latest().unwrap().level, NoticeLevel::Error);
        assert_eq!(form.district, "  ");
        assert!(form.error.as_deref().unwrap().starts_with("Please fill all required fields"));
    }

    #[test]
    fn coordinates_must_be_in_range() {
        let form = RegionForm {
            latitude: "95".into(),
            ..filled()
        };
        assert!(matches!(
            form.validate(),
            Err(ValidationError::OutOfRange { field: "Latitude", .. })
        ));
        let form = RegionForm {
            longitude: "east".into(),
            ..filled()
        };
        assert!(form.validate().is_err());
        let form = RegionForm {
            latitude: String::new(),
            longitude: String::new(),
            ..filled()
        };
        assert_eq!(form.validate().unwrap().latitude, None);
    }

    #[test]
    fn create_posts_draft() {
        let client = AdminClient::new(MockTransport::new().ok(Method::Post, "/regions", json!({})));
        let mut notices = Notices::new(4);
        let mut form = filled();

        submit_region(&client, &mut form, &mut notices).unwrap();

        let request = client.transport().last_request().unwrap();
        assert_eq!(request.method, Method::Post);
        match request.body {
            crate::api::Body::Json(body) => {
                assert_eq!(body["regionName"], "Pune West");
                assert_eq!(body["is_active"], true);
                assert_eq!(body["latitude"], "18.59");
            }
            other => panic!("unexpected body {:?}", other),
        }
        assert_eq!(notices.latest().unwrap().message, "Region Pune West created");
    }

    #[test]
    fn edit_puts_to_region_path() {
        let client =
            AdminClient::new(MockTransport::new().fail(Method::Put, "/regions/r1", 500));
        let mut notices = Notices::new(4);
        let mut form = RegionForm {
            region_id: Some("r1".into()),
            ..filled()
        };

        assert!(submit_region(&client, &mut form, &mut notices).is_err());
        assert_eq!(client.transport().last_request().unwrap().path, "/regions/r1");
        assert_eq!(form.region_name, "Pune West");
        assert_eq!(notices.latest().unwrap().level, NoticeLevel::Error);
    }

    #[test]
    fn field_navigation_and_toggle() {
        let mut form = RegionForm::new();
        form.input('P');
        form.prev_field();
        assert_eq!(form.focus, 7);
        form.input(' ');
        assert!(!form.is_active);
        form.next_field();
        form.backspace();
        assert_eq!(form.region_name, "");
    }
}
