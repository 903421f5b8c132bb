pub mod analytics;
pub mod booking;
pub mod common;
pub mod doula;
pub mod enquiry;
pub mod meeting;
pub mod region;
pub mod schedule;
pub mod testimonial;
pub mod zone_manager;

pub use analytics::{ActivityPoint, CountSummary, RevenueTotal, UserSummary};
pub use booking::{Booking, BookingStatus, TimeShift};
pub use common::Service;
pub use doula::{Availability, Doula};
pub use enquiry::{DoulaEnquiry, EnquiryStatus};
pub use meeting::{Meeting, MeetingStatus};
pub use region::Region;
pub use schedule::{Schedule, ScheduleStatus};
pub use testimonial::{Testimonial, TestimonialStats};
pub use zone_manager::{ZoneManager, ZoneManagerDetail};

/// Row shape shared by the CLI tables and the TUI list screens.
pub trait Tabular {
    const HEADERS: &'static [&'static str];
    /// Relative column widths, one per header.
    const WIDTHS: &'static [u16];

    fn cells(&self) -> Vec<String>;

    /// Status text used to colour the row's status cell.
    fn status_label(&self) -> Option<&str> {
        None
    }
}

/// Labelled fields for a detail view.
pub trait Describe {
    fn title(&self) -> String;
    fn detail_lines(&self) -> Vec<(&'static str, String)>;
}
