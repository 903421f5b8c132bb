pub mod region;
pub mod zone_manager;

use thiserror::Error;

use crate::error::ApiError;

pub use region::{submit_region, RegionDraft, RegionForm};
pub use zone_manager::{submit_zone_manager, ZoneManagerDraft, ZoneManagerForm};

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    #[error("Please fill all required fields ({})", .0.join(", "))]
    MissingFields(Vec<&'static str>),

    #[error("Please enter a valid 10-digit phone number")]
    InvalidPhone,

    #[error("Please enter a valid email address")]
    InvalidEmail,

    #[error("{field} must be a number between {min} and {max}")]
    OutOfRange {
        field: &'static str,
        min: f64,
        max: f64,
    },
}

/// Either the draft never left the form or the backend refused it.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SubmitError {
    #[error(transparent)]
    Invalid(#[from] ValidationError),

    #[error(transparent)]
    Api(#[from] ApiError),
}

/// Single-line text input shared by the form popups.
pub(crate) fn edit_text(target: &mut String, c: char) {
    if !c.is_control() {
        target.push(c);
    }
}

pub(crate) fn blank(value: &str) -> bool {
    value.trim().is_empty()
}
