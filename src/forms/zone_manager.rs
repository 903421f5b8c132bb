use std::path::PathBuf;
use std::sync::LazyLock;

use log::info;
use regex::Regex;

use super::{blank, edit_text, SubmitError, ValidationError};
use crate::api::{AdminClient, Transport};
use crate::listing::Choice;
use crate::notify::Notices;

static EMAIL_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("valid regex"));

pub fn is_valid_email(email: &str) -> bool {
    EMAIL_PATTERN.is_match(email)
}

const PHONE_DIGITS: usize = 10;

#[derive(Debug, Clone, PartialEq)]
pub struct ZoneManagerDraft {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub region_ids: Vec<String>,
    pub profile_image: Option<PathBuf>,
}

/// Create-zone-manager popup. Only unassigned regions are offered.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ZoneManagerForm {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub image_path: String,
    pub available: Vec<Choice>,
    pub selected: Vec<Choice>,
    pub region_cursor: usize,
    pub focus: usize,
    pub error: Option<String>,
}

impl ZoneManagerForm {
    pub const FIELDS: [&'static str; 5] = ["Name", "Email", "Phone", "Regions", "Profile image"];
    const REGIONS_FIELD: usize = 3;

    pub fn new(available: Vec<Choice>) -> Self {
        Self {
            available,
            ..Self::default()
        }
    }

    /// Digits only, capped at ten.
    pub fn set_phone(&mut self, raw: &str) {
        self.phone = raw.chars().filter(char::is_ascii_digit).take(PHONE_DIGITS).collect();
    }

    /// Live hint shown under the phone field while typing.
    pub fn phone_hint(&self) -> Option<&'static str> {
        (!self.phone.is_empty() && self.phone.len() < PHONE_DIGITS)
            .then_some("Phone number must be 10 digits")
    }

    pub fn toggle_region(&mut self, choice: &Choice) {
        if let Some(pos) = self.selected.iter().position(|c| c.id == choice.id) {
            self.selected.remove(pos);
        } else {
            self.selected.push(choice.clone());
        }
    }

    pub fn is_selected(&self, id: &str) -> bool {
        self.selected.iter().any(|c| c.id == id)
    }

    pub fn on_regions(&self) -> bool {
        self.focus == Self::REGIONS_FIELD
    }

    pub fn value(&self, index: usize) -> String {
        match index {
            0 => self.name.clone(),
            1 => self.email.clone(),
            2 => self.phone.clone(),
            3 => self
                .selected
                .iter()
                .map(|c| c.name.as_str())
                .collect::<Vec<_>>()
                .join(", "),
            4 => self.image_path.clone(),
            _ => String::new(),
        }
    }

    pub fn next_field(&mut self) {
        self.focus = (self.focus + 1) % Self::FIELDS.len();
    }

    pub fn prev_field(&mut self) {
        self.focus = (self.focus + Self::FIELDS.len() - 1) % Self::FIELDS.len();
    }

    pub fn move_region_cursor(&mut self, delta: i32) {
        if self.available.is_empty() {
            return;
        }
        let len = self.available.len() as i64;
        self.region_cursor = (self.region_cursor as i64 + delta as i64).rem_euclid(len) as usize;
    }

    pub fn input(&mut self, c: char) {
        match self.focus {
            0 => edit_text(&mut self.name, c),
            1 => edit_text(&mut self.email, c),
            2 => {
                let next = format!("{}{}", self.phone, c);
                self.set_phone(&next);
            }
            Self::REGIONS_FIELD => {
                if c == ' ' {
                    if let Some(choice) = self.available.get(self.region_cursor).cloned() {
                        self.toggle_region(&choice);
                    }
                }
            }
            4 => edit_text(&mut self.image_path, c),
            _ => {}
        }
    }

    pub fn backspace(&mut self) {
        match self.focus {
            0 => {
                self.name.pop();
            }
            1 => {
                self.email.pop();
            }
            2 => {
                self.phone.pop();
            }
            4 => {
                self.image_path.pop();
            }
            _ => {}
        }
    }

    pub fn validate(&self) -> Result<ZoneManagerDraft, ValidationError> {
        let mut missing = Vec::new();
        for (name, value) in [
            (Self::FIELDS[0], &self.name),
            (Self::FIELDS[1], &self.email),
            (Self::FIELDS[2], &self.phone),
        ] {
            if blank(value) {
                missing.push(name);
            }
        }
        if self.selected.is_empty() {
            missing.push(Self::FIELDS[Self::REGIONS_FIELD]);
        }
        if !missing.is_empty() {
            return Err(ValidationError::MissingFields(missing));
        }
        if self.phone.len() != PHONE_DIGITS || !self.phone.chars().all(|c| c.is_ascii_digit()) {
            return Err(ValidationError::InvalidPhone);
        }
        let email = self.email.trim();
        if !is_valid_email(email) {
            return Err(ValidationError::InvalidEmail);
        }

        Ok(ZoneManagerDraft {
            name: self.name.trim().to_string(),
            email: email.to_string(),
            phone: self.phone.clone(),
            region_ids: self.selected.iter().map(|c| c.id.clone()).collect(),
            profile_image: (!blank(&self.image_path))
                .then(|| PathBuf::from(self.image_path.trim())),
        })
    }
}

pub fn submit_zone_manager<T: Transport>(
    client: &AdminClient<T>,
    form: &mut ZoneManagerForm,
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

    match client.create_zone_manager(&draft) {
        Ok(()) => {
            info!("Zone manager {} created", draft.email);
            notices.success("Zone Manager created successfully");
            form.error = None;
            Ok(())
        }
        Err(e) => {
            let message = format!("Failed to create Zone Manager: {}", e.summary());
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
    use crate::api::{Body, FormPart, Method};
    use serde_json::json;

    fn filled() -> ZoneManagerForm {
        let pune = Choice::new("r1", "Pune");
        let mut form = ZoneManagerForm::new(vec![pune.clone(), Choice::new("r2", "Nashik")]);
        form.name = "Ravi Kumar".into();
        form.email = "ravi@example.in".into();
        form.set_phone("98765 43210");
        form.toggle_region(&pune);
        form
    }

    #[test]
    fn phone_is_digits_only() {
        let mut form = ZoneManagerForm::default();
        form.set_phone("+91-98765-43210-99");
        assert_eq!(form.phone, "9198765432");
        form.set_phone("987");
        assert_eq!(form.phone_hint(), Some("Phone number must be 10 digits"));
        form.focus = 2;
        form.input('x');
        assert_eq!(form.phone, "987");
    }

    #[test]
    fn validation_order() {
        let mut form = filled();
        form.selected.clear();
        assert_eq!(
            form.validate(),
            Err(ValidationError::MissingFields(vec!["Regions"]))
        );

        let mut form = filled();
        form.set_phone("98765");
        assert_eq!(form.validate(), Err(ValidationError::InvalidPhone));

        let mut form = filled();
        form.email = "ravi@example".into();
        assert_eq!(form.validate(), Err(ValidationError::InvalidEmail));
        assert_eq!(
            ValidationError::InvalidEmail.to_string(),
            "Please enter a valid email address"
        );
    }

    #[test]
    fn email_pattern() {
        assert!(is_valid_email("a@b.co"));
        assert!(!is_valid_email("a b@c.in"));
        assert!(!is_valid_email("@c.in"));
        assert!(!is_valid_email("ab@cin"));
    }

    #[test]
    fn invalid_form_sends_nothing() {
        let client = AdminClient::new(MockTransport::new().ok(Method::Post, "/zonemanager", json!({})));
        let mut notices = Notices::new(4);
        let mut form = filled();
        form.name.clear();

        assert!(submit_zone_manager(&client, &mut form, &mut notices).is_err());
        assert!(client.transport().requests().is_empty());
        assert_eq!(form.email, "ravi@example.in");
    }

    #[test]
    fn create_sends_multipart() {
        let client = AdminClient::new(MockTransport::new().ok(Method::Post, "/zonemanager", json!({})));
        let mut notices = Notices::new(4);
        let mut form = filled();

        submit_zone_manager(&client, &mut form, &mut notices).unwrap();

        let request = client.transport().last_request().unwrap();
        let Body::Multipart(parts) = request.body else {
            panic!("expected multipart body");
        };
        assert!(parts.contains(&("regionIds".to_string(), FormPart::Text(r#"["r1"]"#.to_string()))));
        assert!(parts.contains(&("phone".to_string(), FormPart::Text("9876543210".to_string()))));
        assert!(!parts.iter().any(|(name, _)| name == "profile_image"));
        assert_eq!(notices.latest().unwrap().message, "Zone Manager created successfully");
    }

    #[test]
    fn region_picker_toggles() {
        let mut form = filled();
        form.focus = 3;
        form.move_region_cursor(1);
        form.input(' ');
        assert!(form.is_selected("r2"));
        form.input(' ');
        assert!(!form.is_selected("r2"));
        assert_eq!(form.value(3), "Pune");
    }
}
