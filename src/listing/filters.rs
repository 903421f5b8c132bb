use chrono::NaiveDate;

use crate::models::{
    Availability, BookingStatus, EnquiryStatus, MeetingStatus, Region, ScheduleStatus, Service,
    TimeShift,
};
use crate::utils::format::iso_start_of_day;

/// A selectable reference (region, service, doula): the id goes on the wire,
/// the name is what the admin sees.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Choice {
    pub id: String,
    pub name: String,
}

impl Choice {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
        }
    }
}

impl From<&Region> for Choice {
    fn from(r: &Region) -> Self {
        Choice::new(r.region_id.clone(), r.region_name.clone())
    }
}

impl From<&Service> for Choice {
    fn from(s: &Service) -> Self {
        Choice::new(s.id.clone(), s.name.clone())
    }
}

/// Entity-specific filter state. Every implementation owns the mapping from
/// its fields to query params; blank values never reach the wire.
pub trait ListFilter: Clone + Default + PartialEq + Send + 'static {
    fn to_params(&self) -> Vec<(String, String)>;

    /// `None` when the screen has no free-text search.
    fn search_text(&self) -> Option<&str> {
        None
    }

    fn set_search(&mut self, _text: &str) {}

    /// Step the primary status filter: unset → each value → unset.
    fn cycle_status(&mut self) {}

    fn region(&self) -> Option<&Choice> {
        None
    }

    fn set_region(&mut self, _region: Option<Choice>) {}

    fn service(&self) -> Option<&Choice> {
        None
    }

    fn set_service(&mut self, _service: Option<Choice>) {}

    fn summary(&self) -> String;
}

/// Advance through `all`, wrapping back to `None` after the last value.
pub fn cycle<T: Copy + PartialEq>(current: Option<T>, all: &[T]) -> Option<T> {
    match current {
        None => all.first().copied(),
        Some(value) => {
            let next = all.iter().position(|v| *v == value).map(|i| i + 1);
            next.and_then(|i| all.get(i).copied())
        }
    }
}

/// `cycle` for lookup choices, matched by id.
pub fn next_choice(current: Option<&Choice>, all: &[Choice]) -> Option<Choice> {
    match current {
        None => all.first().cloned(),
        Some(choice) => all
            .iter()
            .position(|c| c.id == choice.id)
            .and_then(|i| all.get(i + 1))
            .cloned(),
    }
}

fn push(params: &mut Vec<(String, String)>, key: &str, value: Option<&str>) {
    if let Some(v) = value {
        let v = v.trim();
        if !v.is_empty() {
            params.push((key.to_string(), v.to_string()));
        }
    }
}

fn push_iso(params: &mut Vec<(String, String)>, key: &str, date: Option<NaiveDate>) {
    if let Some(d) = date {
        params.push((key.to_string(), iso_start_of_day(d)));
    }
}

fn push_day(params: &mut Vec<(String, String)>, key: &str, date: Option<NaiveDate>) {
    if let Some(d) = date {
        params.push((key.to_string(), d.format("%Y-%m-%d").to_string()));
    }
}

fn describe(parts: Vec<Option<String>>) -> String {
    let active: Vec<String> = parts.into_iter().flatten().collect();
    if active.is_empty() {
        "no filters".to_string()
    } else {
        active.join(" · ")
    }
}

fn labelled(label: &str, value: Option<&str>) -> Option<String> {
    value
        .filter(|v| !v.trim().is_empty())
        .map(|v| format!("{}: {}", label, v))
}

fn date_span(from: Option<NaiveDate>, to: Option<NaiveDate>) -> Option<String> {
    match (from, to) {
        (None, None) => None,
        (from, to) => Some(format!(
            "dates: {} → {}",
            from.map(|d| d.to_string()).unwrap_or_else(|| "…".into()),
            to.map(|d| d.to_string()).unwrap_or_else(|| "…".into())
        )),
    }
}

// ─── Bookings ────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, PartialEq)]
pub struct BookingFilter {
    pub search: String,
    pub service: Option<Choice>,
    pub status: Option<BookingStatus>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub region: Option<Choice>,
}

impl ListFilter for BookingFilter {
    fn to_params(&self) -> Vec<(String, String)> {
        let mut p = Vec::new();
        push(&mut p, "search", Some(&self.search));
        push(&mut p, "serviceId", self.service.as_ref().map(|c| c.id.as_str()));
        push(&mut p, "status", self.status.map(|s| s.as_str()));
        push_day(&mut p, "startDate", self.start_date);
        push_day(&mut p, "endDate", self.end_date);
        push(&mut p, "regionId", self.region.as_ref().map(|c| c.id.as_str()));
        p
    }

    fn search_text(&self) -> Option<&str> {
        Some(&self.search)
    }

    fn set_search(&mut self, text: &str) {
        self.search = text.to_string();
    }

    fn cycle_status(&mut self) {
        self.status = cycle(self.status, &BookingStatus::ALL);
    }

    fn region(&self) -> Option<&Choice> {
        self.region.as_ref()
    }

    fn set_region(&mut self, region: Option<Choice>) {
        self.region = region;
    }

    fn service(&self) -> Option<&Choice> {
        self.service.as_ref()
    }

    fn set_service(&mut self, service: Option<Choice>) {
        self.service = service;
    }

    fn summary(&self) -> String {
        describe(vec![
            labelled("search", Some(&self.search)),
            labelled("status", self.status.map(|s| s.display_name())),
            labelled("service", self.service.as_ref().map(|c| c.name.as_str())),
            labelled("region", self.region.as_ref().map(|c| c.name.as_str())),
            date_span(self.start_date, self.end_date),
        ])
    }
}

// ─── Schedules ───────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ScheduleFilter {
    pub status: Option<ScheduleStatus>,
    pub time_shift: Option<TimeShift>,
    pub service: Option<Choice>,
    pub region: Option<Choice>,
    pub doula_id: Option<String>,
    pub date1: Option<NaiveDate>,
    pub date2: Option<NaiveDate>,
}

impl ListFilter for ScheduleFilter {
    fn to_params(&self) -> Vec<(String, String)> {
        let mut p = Vec::new();
        push(&mut p, "status", self.status.map(|s| s.as_str()));
        push(&mut p, "timeshift", self.time_shift.map(|s| s.as_str()));
        push(&mut p, "serviceId", self.service.as_ref().map(|c| c.id.as_str()));
        push(&mut p, "regionId", self.region.as_ref().map(|c| c.id.as_str()));
        push(&mut p, "doulaId", self.doula_id.as_deref());
        push_iso(&mut p, "date1", self.date1);
        push_iso(&mut p, "date2", self.date2);
        p
    }

    fn cycle_status(&mut self) {
        self.status = cycle(self.status, &ScheduleStatus::ALL);
    }

    fn region(&self) -> Option<&Choice> {
        self.region.as_ref()
    }

    fn set_region(&mut self, region: Option<Choice>) {
        self.region = region;
    }

    fn service(&self) -> Option<&Choice> {
        self.service.as_ref()
    }

    fn set_service(&mut self, service: Option<Choice>) {
        self.service = service;
    }

    fn summary(&self) -> String {
        describe(vec![
            labelled("status", self.status.map(|s| s.display_name())),
            labelled("shift", self.time_shift.map(|s| s.display_name())),
            labelled("service", self.service.as_ref().map(|c| c.name.as_str())),
            labelled("region", self.region.as_ref().map(|c| c.name.as_str())),
            labelled("doula", self.doula_id.as_deref()),
            date_span(self.date1, self.date2),
        ])
    }
}

// ─── Meetings ────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, PartialEq)]
pub struct MeetingFilter {
    /// Free text is matched against the meeting id by the backend.
    pub meeting_id: String,
    pub service: Option<Choice>,
    pub status: Option<MeetingStatus>,
    pub date1: Option<NaiveDate>,
    pub date2: Option<NaiveDate>,
    pub region: Option<Choice>,
    pub zone_manager_id: Option<String>,
}

impl ListFilter for MeetingFilter {
    fn to_params(&self) -> Vec<(String, String)> {
        let mut p = Vec::new();
        push(&mut p, "meetingId", Some(&self.meeting_id));
        push(&mut p, "serviceId", self.service.as_ref().map(|c| c.id.as_str()));
        push(&mut p, "status", self.status.map(|s| s.as_str()));
        push_iso(&mut p, "date1", self.date1);
        push_iso(&mut p, "date2", self.date2);
        push(&mut p, "regionId", self.region.as_ref().map(|c| c.id.as_str()));
        push(&mut p, "zoneManagerId", self.zone_manager_id.as_deref());
        p
    }

    fn search_text(&self) -> Option<&str> {
        Some(&self.meeting_id)
    }

    fn set_search(&mut self, text: &str) {
        self.meeting_id = text.to_string();
    }

    fn cycle_status(&mut self) {
        self.status = cycle(self.status, &MeetingStatus::ALL);
    }

    fn region(&self) -> Option<&Choice> {
        self.region.as_ref()
    }

    fn set_region(&mut self, region: Option<Choice>) {
        self.region = region;
    }

    fn service(&self) -> Option<&Choice> {
        self.service.as_ref()
    }

    fn set_service(&mut self, service: Option<Choice>) {
        self.service = service;
    }

    fn summary(&self) -> String {
        describe(vec![
            labelled("meeting", Some(&self.meeting_id)),
            labelled("status", self.status.map(|s| s.as_str())),
            labelled("service", self.service.as_ref().map(|c| c.name.as_str())),
            labelled("region", self.region.as_ref().map(|c| c.name.as_str())),
            labelled("zone manager", self.zone_manager_id.as_deref()),
            date_span(self.date1, self.date2),
        ])
    }
}

// ─── Doula enquiries ─────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, PartialEq)]
pub struct EnquiryFilter {
    pub status: Option<EnquiryStatus>,
}

impl ListFilter for EnquiryFilter {
    fn to_params(&self) -> Vec<(String, String)> {
        let mut p = Vec::new();
        push(&mut p, "status", self.status.map(|s| s.as_str()));
        p
    }

    fn cycle_status(&mut self) {
        self.status = cycle(self.status, &EnquiryStatus::ALL);
    }

    fn summary(&self) -> String {
        describe(vec![labelled("status", self.status.map(|s| s.display_name()))])
    }
}

// ─── Doulas ──────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, PartialEq)]
pub struct DoulaFilter {
    pub search: String,
    /// Doulas are filtered by service and region *name*, not id.
    pub service_name: Option<String>,
    pub availability: Option<Availability>,
    pub is_active: Option<bool>,
    pub region: Option<Choice>,
}

impl ListFilter for DoulaFilter {
    fn to_params(&self) -> Vec<(String, String)> {
        let mut p = Vec::new();
        push(&mut p, "search", Some(&self.search));
        push(&mut p, "serviceName", self.service_name.as_deref());
        if let Some(a) = self.availability {
            p.push(("isAvailable".into(), (a == Availability::Available).to_string()));
        }
        if let Some(active) = self.is_active {
            p.push(("isActive".into(), active.to_string()));
        }
        push(&mut p, "regionName", self.region.as_ref().map(|c| c.name.as_str()));
        p
    }

    fn search_text(&self) -> Option<&str> {
        Some(&self.search)
    }

    fn set_search(&mut self, text: &str) {
        self.search = text.to_string();
    }

    fn cycle_status(&mut self) {
        self.availability = cycle(self.availability, &Availability::ALL);
    }

    fn region(&self) -> Option<&Choice> {
        self.region.as_ref()
    }

    fn set_region(&mut self, region: Option<Choice>) {
        self.region = region;
    }

    fn summary(&self) -> String {
        describe(vec![
            labelled("search", Some(&self.search)),
            labelled("availability", self.availability.map(|a| a.as_str())),
            labelled(
                "active",
                self.is_active.map(|a| if a { "yes" } else { "no" }),
            ),
            labelled("service", self.service_name.as_deref()),
            labelled("region", self.region.as_ref().map(|c| c.name.as_str())),
        ])
    }
}

// ─── Zone managers ───────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ZoneManagerFilter {
    pub search: String,
    pub region: Option<Choice>,
    pub is_active: Option<bool>,
}

impl ListFilter for ZoneManagerFilter {
    fn to_params(&self) -> Vec<(String, String)> {
        let mut p = Vec::new();
        push(&mut p, "search", Some(&self.search));
        push(&mut p, "regionId", self.region.as_ref().map(|c| c.id.as_str()));
        if let Some(active) = self.is_active {
            p.push(("is_active".into(), active.to_string()));
        }
        p
    }

    fn search_text(&self) -> Option<&str> {
        Some(&self.search)
    }

    fn set_search(&mut self, text: &str) {
        self.search = text.to_string();
    }

    fn cycle_status(&mut self) {
        self.is_active = cycle(self.is_active, &[true, false]);
    }

    fn region(&self) -> Option<&Choice> {
        self.region.as_ref()
    }

    fn set_region(&mut self, region: Option<Choice>) {
        self.region = region;
    }

    fn summary(&self) -> String {
        describe(vec![
            labelled("search", Some(&self.search)),
            labelled("region", self.region.as_ref().map(|c| c.name.as_str())),
            labelled(
                "status",
                self.is_active.map(|a| if a { "active" } else { "inactive" }),
            ),
        ])
    }
}

// ─── Regions ─────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, PartialEq)]
pub struct RegionFilter {
    pub search: String,
}

impl ListFilter for RegionFilter {
    fn to_params(&self) -> Vec<(String, String)> {
        let mut p = Vec::new();
        push(&mut p, "search", Some(&self.search));
        p
    }

    fn search_text(&self) -> Option<&str> {
        Some(&self.search)
    }

    fn set_search(&mut self, text: &str) {
        self.search = text.to_string();
    }

    fn summary(&self) -> String {
        describe(vec![labelled("search", Some(&self.search))])
    }
}

// ─── Testimonials ────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, PartialEq)]
pub struct TestimonialFilter {
    pub doula_id: Option<String>,
    pub service: Option<Choice>,
    pub ratings: Option<u8>,
    pub date1: Option<NaiveDate>,
    pub date2: Option<NaiveDate>,
}

impl ListFilter for TestimonialFilter {
    fn to_params(&self) -> Vec<(String, String)> {
        let mut p = Vec::new();
        push(&mut p, "doulaId", self.doula_id.as_deref());
        push(&mut p, "serviceId", self.service.as_ref().map(|c| c.id.as_str()));
        if let Some(r) = self.ratings {
            p.push(("ratings".into(), r.to_string()));
        }
        push_iso(&mut p, "date1", self.date1);
        push_iso(&mut p, "date2", self.date2);
        p
    }

    /// Steps through 5★ down to 1★.
    fn cycle_status(&mut self) {
        self.ratings = cycle(self.ratings, &[5, 4, 3, 2, 1]);
    }

    fn service(&self) -> Option<&Choice> {
        self.service.as_ref()
    }

    fn set_service(&mut self, service: Option<Choice>) {
        self.service = service;
    }

    fn summary(&self) -> String {
        describe(vec![
            self.ratings.map(|r| format!("rating: {}★", r)),
            labelled("doula", self.doula_id.as_deref()),
            labelled("service", self.service.as_ref().map(|c| c.name.as_str())),
            date_span(self.date1, self.date2),
        ])
    }
}

// ─── Revenue ─────────────────────────────────────────────────────────────────

/// Revenue is a single aggregate, not a list, but shares the filter shape.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RevenueFilter {
    pub doula_id: Option<String>,
    pub region: Option<Choice>,
    pub service: Option<Choice>,
    pub date1: Option<NaiveDate>,
    pub date2: Option<NaiveDate>,
}

impl ListFilter for RevenueFilter {
    fn to_params(&self) -> Vec<(String, String)> {
        let mut p = Vec::new();
        push(&mut p, "doulaId", self.doula_id.as_deref());
        push(&mut p, "regionId", self.region.as_ref().map(|c| c.id.as_str()));
        push(&mut p, "serviceId", self.service.as_ref().map(|c| c.id.as_str()));
        push_day(&mut p, "date1", self.date1);
        push_day(&mut p, "date2", self.date2);
        p
    }

    /// The free-text box edits the doula id here.
    fn search_text(&self) -> Option<&str> {
        Some(self.doula_id.as_deref().unwrap_or(""))
    }

    fn set_search(&mut self, text: &str) {
        let text = text.trim();
        self.doula_id = (!text.is_empty()).then(|| text.to_string());
    }

    fn region(&self) -> Option<&Choice> {
        self.region.as_ref()
    }

    fn set_region(&mut self, region: Option<Choice>) {
        self.region = region;
    }

    fn service(&self) -> Option<&Choice> {
        self.service.as_ref()
    }

    fn set_service(&mut self, service: Option<Choice>) {
        self.service = service;
    }

    fn summary(&self) -> String {
        describe(vec![
            labelled("doula", self.doula_id.as_deref()),
            labelled("region", self.region.as_ref().map(|c| c.name.as_str())),
            labelled("service", self.service.as_ref().map(|c| c.name.as_str())),
            date_span(self.date1, self.date2),
        ])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn keys(params: &[(String, String)]) -> Vec<&str> {
        params.iter().map(|(k, _)| k.as_str()).collect()
    }

    #[test]
    fn blank_values_are_omitted() {
        let filter = BookingFilter {
            search: "   ".into(),
            status: Some(BookingStatus::Active),
            ..Default::default()
        };
        assert_eq!(
            filter.to_params(),
            vec![("status".to_string(), "ACTIVE".to_string())]
        );
        assert!(BookingFilter::default().to_params().is_empty());
    }

    #[test]
    fn booking_dates_stay_plain() {
        let filter = BookingFilter {
            start_date: NaiveDate::from_ymd_opt(2025, 1, 5),
            region: Some(Choice::new("r1", "Pune")),
            ..Default::default()
        };
        let params = filter.to_params();
        assert_eq!(keys(&params), vec!["startDate", "regionId"]);
        assert_eq!(params[0].1, "2025-01-05");
    }

    #[test]
    fn schedule_dates_are_iso() {
        let filter = ScheduleFilter {
            time_shift: Some(TimeShift::FullDay),
            date1: NaiveDate::from_ymd_opt(2025, 2, 1),
            ..Default::default()
        };
        let params = filter.to_params();
        assert_eq!(params[0], ("timeshift".to_string(), "FULLDAY".to_string()));
        assert_eq!(params[1], ("date1".to_string(), "2025-02-01T00:00:00.000Z".to_string()));
    }

    #[test]
    fn doulas_filter_by_region_name() {
        let mut filter = DoulaFilter::default();
        filter.set_region(Some(Choice::new("r9", "Nashik")));
        filter.cycle_status();
        let params = filter.to_params();
        assert!(params.contains(&("regionName".to_string(), "Nashik".to_string())));
        assert!(params.contains(&("isAvailable".to_string(), "true".to_string())));
    }

    #[test]
    fn cycle_wraps_to_unset() {
        let all = [1, 2, 3];
        assert_eq!(cycle(None, &all), Some(1));
        assert_eq!(cycle(Some(2), &all), Some(3));
        assert_eq!(cycle(Some(3), &all), None);
    }

    #[test]
    fn summary_lists_active_filters() {
        assert_eq!(EnquiryFilter::default().summary(), "no filters");
        let filter = ZoneManagerFilter {
            search: "ravi".into(),
            is_active: Some(false),
            ..Default::default()
        };
        assert_eq!(filter.summary(), "search: ravi · status: inactive");
    }

    #[test]
    fn choices_cycle_back_to_unset() {
        let all = vec![Choice::new("r1", "Pune"), Choice::new("r2", "Nashik")];
        let first = next_choice(None, &all);
        assert_eq!(first.as_ref().map(|c| c.id.as_str()), Some("r1"));
        let second = next_choice(first.as_ref(), &all);
        assert_eq!(second.as_ref().map(|c| c.id.as_str()), Some("r2"));
        assert_eq!(next_choice(second.as_ref(), &all), None);
        assert_eq!(next_choice(None, &[]), None);
    }

    #[test]
    fn revenue_search_edits_doula() {
        let mut filter = RevenueFilter::default();
        filter.set_search("  d-42 ");
        assert_eq!(filter.doula_id.as_deref(), Some("d-42"));
        filter.set_search("   ");
        assert_eq!(filter.doula_id, None);
    }
}
