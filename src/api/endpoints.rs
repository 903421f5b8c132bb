use log::debug;
use serde_json::{json, Value};

use super::client::AdminClient;
use super::envelope::Page;
use super::transport::{ApiRequest, Body, FormPart, Transport};
use crate::config::Session;
use crate::error::ApiError;
use crate::forms::{RegionDraft, ZoneManagerDraft};
use crate::listing::{
    BookingFilter, DoulaFilter, EnquiryFilter, ListFilter, ListQuery, MeetingFilter,
    RegionFilter, RevenueFilter, ScheduleFilter, TestimonialFilter, ZoneManagerFilter,
};
use crate::models::{
    ActivityPoint, Booking, BookingStatus, CountSummary, Doula, DoulaEnquiry, EnquiryStatus,
    Meeting, Region, RevenueTotal, Schedule, ScheduleStatus, Service, Testimonial, UserSummary,
    ZoneManager, ZoneManagerDetail,
};

/// Region lookups for pickers are not paginated in the UI.
const LOOKUP_LIMIT: u32 = 100;

fn region_param(region_id: Option<&str>) -> Vec<(String, String)> {
    region_id
        .filter(|id| !id.is_empty())
        .map(|id| vec![("regionId".to_string(), id.to_string())])
        .unwrap_or_default()
}

impl<T: Transport> AdminClient<T> {
    // ─── Auth ────────────────────────────────────────────────────────────

    pub fn send_otp(&self, email: &str) -> Result<(), ApiError> {
        self.send_unit(ApiRequest::post(
            "/auth/send-otp",
            Body::Json(json!({ "email": email })),
        ))
    }

    pub fn verify_otp(&self, email: &str, otp: &str) -> Result<Session, ApiError> {
        self.send_item(ApiRequest::post(
            "/auth/verify-otp",
            Body::Json(json!({ "email": email, "otp": otp })),
        ))
    }

    // ─── Bookings ────────────────────────────────────────────────────────

    pub fn list_bookings(&self, query: &ListQuery<BookingFilter>) -> Result<Page<Booking>, ApiError> {
        self.get_list("/service-booked", query.params())
    }

    pub fn update_booking_status(&self, id: &str, status: BookingStatus) -> Result<(), ApiError> {
        debug!("booking {} → {}", id, status.as_str());
        self.send_unit(ApiRequest::patch(
            format!("/service-booked/bookings/{}/status", id),
            Body::Json(json!({ "status": status.as_str() })),
        ))
    }

    // ─── Schedules ───────────────────────────────────────────────────────

    pub fn list_schedules(&self, query: &ListQuery<ScheduleFilter>) -> Result<Page<Schedule>, ApiError> {
        self.get_list("/service-booked/schedules/list/admin", query.params())
    }

    pub fn update_schedule_status(&self, id: &str, status: ScheduleStatus) -> Result<(), ApiError> {
        debug!("schedule {} → {}", id, status.as_str());
        self.send_unit(ApiRequest::patch(
            format!("/service-booked/schedules/{}/status", id),
            Body::Json(json!({ "status": status.as_str() })),
        ))
    }

    // ─── Meetings ────────────────────────────────────────────────────────

    pub fn list_meetings(&self, query: &ListQuery<MeetingFilter>) -> Result<Page<Meeting>, ApiError> {
        self.get_list("/service-booked/meetings/list/admin", query.params())
    }

    pub fn get_meeting(&self, id: &str) -> Result<Meeting, ApiError> {
        self.get_item(&format!("/service-booked/meetings/list/admin/{}", id))
    }

    // ─── Doula enquiries ─────────────────────────────────────────────────

    pub fn list_enquiries(&self, query: &ListQuery<EnquiryFilter>) -> Result<Page<DoulaEnquiry>, ApiError> {
        self.get_list("/doula-join-enquiries", query.params())
    }

    /// The backend expects the whole record back, not just the status.
    pub fn update_enquiry_status(
        &self,
        enquiry: &DoulaEnquiry,
        status: EnquiryStatus,
    ) -> Result<(), ApiError> {
        self.send_unit(ApiRequest::patch(
            format!("/doula-join-enquiries/{}", enquiry.id),
            Body::Json(json!({
                "name": enquiry.name,
                "email": enquiry.email,
                "phone": enquiry.phone,
                "status": status.as_str(),
            })),
        ))
    }

    // ─── Doulas ──────────────────────────────────────────────────────────

    pub fn list_doulas(&self, query: &ListQuery<DoulaFilter>) -> Result<Page<Doula>, ApiError> {
        self.get_list("/doula", query.params())
    }

    pub fn delete_doula(&self, id: &str) -> Result<(), ApiError> {
        self.send_unit(ApiRequest::delete(format!("/doula/{}", id)))
    }

    pub fn list_services(&self) -> Result<Vec<Service>, ApiError> {
        self.get_vec("/services", Vec::new())
    }

    // ─── Zone managers ───────────────────────────────────────────────────

    pub fn list_zone_managers(
        &self,
        query: &ListQuery<ZoneManagerFilter>,
    ) -> Result<Page<ZoneManager>, ApiError> {
        self.get_list("/zonemanager", query.params())
    }

    pub fn get_zone_manager(&self, id: &str) -> Result<ZoneManagerDetail, ApiError> {
        self.get_item(&format!("/zonemanager/{}", id))
    }

    pub fn create_zone_manager(&self, draft: &ZoneManagerDraft) -> Result<(), ApiError> {
        let region_ids = serde_json::to_string(&draft.region_ids)?;
        let mut parts = vec![
            ("name".to_string(), FormPart::Text(draft.name.clone())),
            ("email".to_string(), FormPart::Text(draft.email.clone())),
            ("phone".to_string(), FormPart::Text(draft.phone.clone())),
            ("regionIds".to_string(), FormPart::Text(region_ids)),
        ];
        if let Some(path) = &draft.profile_image {
            parts.push(("profile_image".to_string(), FormPart::File(path.clone())));
        }
        self.send_unit(ApiRequest::post("/zonemanager", Body::Multipart(parts)))
    }

    pub fn set_zone_manager_active(&self, id: &str, active: bool) -> Result<(), ApiError> {
        self.send_unit(ApiRequest::patch(
            format!("/zonemanager/{}/status", id),
            Body::Json(json!({ "is_active": active })),
        ))
    }

    pub fn delete_zone_manager(&self, id: &str) -> Result<(), ApiError> {
        self.send_unit(ApiRequest::delete(format!("/zonemanager/{}", id)))
    }

    // ─── Regions ─────────────────────────────────────────────────────────

    pub fn list_regions(&self, query: &ListQuery<RegionFilter>) -> Result<Page<Region>, ApiError> {
        self.get_list("/regions", query.params())
    }

    /// First page of regions, large enough for filter pickers.
    pub fn all_regions(&self) -> Result<Vec<Region>, ApiError> {
        let query = ListQuery {
            filter: RegionFilter::default(),
            page: 1,
            limit: LOOKUP_LIMIT,
        };
        Ok(self.list_regions(&query)?.items)
    }

    pub fn get_region(&self, id: &str) -> Result<Region, ApiError> {
        self.get_item(&format!("/regions/{}", id))
    }

    pub fn create_region(&self, draft: &RegionDraft) -> Result<(), ApiError> {
        self.send_unit(ApiRequest::post("/regions", Body::Json(serde_json::to_value(draft)?)))
    }

    pub fn update_region(&self, id: &str, draft: &RegionDraft) -> Result<(), ApiError> {
        self.send_unit(ApiRequest::put(
            format!("/regions/{}", id),
            Body::Json(serde_json::to_value(draft)?),
        ))
    }

    // ─── Testimonials ────────────────────────────────────────────────────

    pub fn list_testimonials(
        &self,
        query: &ListQuery<TestimonialFilter>,
    ) -> Result<Page<Testimonial>, ApiError> {
        self.get_list("/service-booked/testimonials/list/admin", query.params())
    }

    pub fn get_testimonial(&self, id: &str) -> Result<Testimonial, ApiError> {
        self.get_item(&format!("/service-booked/testimonials/list/admin/{}", id))
    }

    // ─── Analytics ───────────────────────────────────────────────────────

    pub fn user_counts(&self, region_id: Option<&str>) -> Result<CountSummary, ApiError> {
        let value = self.get_value("/analytics/counts/user", region_param(region_id))?;
        Ok(CountSummary::from_value(&value))
    }

    pub fn booking_counts(&self, region_id: Option<&str>) -> Result<CountSummary, ApiError> {
        let value = self.get_value("/analytics/counts/booking", region_param(region_id))?;
        Ok(CountSummary::from_value(&value))
    }

    pub fn meeting_counts(&self, region_id: Option<&str>) -> Result<CountSummary, ApiError> {
        let value = self.get_value("/analytics/counts/meeting", region_param(region_id))?;
        Ok(CountSummary::from_value(&value))
    }

    pub fn daily_activity(&self) -> Result<Vec<ActivityPoint>, ApiError> {
        let value = self.get_value("/analytics/daily-activity", Vec::new())?;
        Ok(ActivityPoint::series_from_value(&value))
    }

    pub fn recent_users(&self, limit: u32) -> Result<Page<UserSummary>, ApiError> {
        self.get_list(
            "/analytics/user/list",
            vec![
                ("page".to_string(), "1".to_string()),
                ("limit".to_string(), limit.to_string()),
            ],
        )
    }

    // ─── Revenue ─────────────────────────────────────────────────────────

    pub fn revenue_total(&self, filter: &RevenueFilter) -> Result<RevenueTotal, ApiError> {
        let value = self.get_value("/analytics/revenue/total", filter.to_params())?;
        match value.get("data") {
            Some(Value::Null) | None => Ok(RevenueTotal::default()),
            Some(data) => Ok(serde_json::from_value(data.clone())?),
        }
    }
}
