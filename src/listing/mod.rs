pub mod controller;
pub mod filters;
pub mod pagination;

pub use controller::{FetchOutcome, ListController, ListQuery};
pub use filters::{
    next_choice, BookingFilter, Choice, DoulaFilter, EnquiryFilter, ListFilter, MeetingFilter, RegionFilter,
    RevenueFilter, ScheduleFilter, TestimonialFilter, ZoneManagerFilter,
};
pub use pagination::Pagination;

/// Rows are addressed by their backend id.
pub trait Keyed {
    fn key(&self) -> &str;
}
