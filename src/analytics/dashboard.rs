use std::thread;

use log::{info, warn};

use crate::api::{AdminClient, Transport};
use crate::error::ApiError;
use crate::models::{ActivityPoint, CountSummary, UserSummary};

pub const RECENT_USERS: u32 = 5;

/// The five dashboard aggregates. A section that failed to load stays
/// `None` and is rendered as a placeholder; the others still show.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DashboardSnapshot {
    pub users: Option<CountSummary>,
    pub bookings: Option<CountSummary>,
    pub meetings: Option<CountSummary>,
    pub activity: Option<Vec<ActivityPoint>>,
    pub recent_users: Option<Vec<UserSummary>>,
    pub errors: Vec<String>,
}

impl DashboardSnapshot {
    pub fn loaded_sections(&self) -> usize {
        [
            self.users.is_some(),
            self.bookings.is_some(),
            self.meetings.is_some(),
            self.activity.is_some(),
            self.recent_users.is_some(),
        ]
        .iter()
        .filter(|loaded| **loaded)
        .count()
    }

    /// Highest daily total, for scaling the activity bars.
    pub fn activity_peak(&self) -> u64 {
        self.activity
            .as_ref()
            .and_then(|series| series.iter().map(ActivityPoint::total).max())
            .unwrap_or(0)
    }
}

fn keep<T>(section: &str, result: Result<T, ApiError>, errors: &mut Vec<String>) -> Option<T> {
    match result {
        Ok(value) => Some(value),
        Err(e) => {
            warn!("Dashboard section '{}' failed: {}", section, e);
            errors.push(format!("{}: {}", section, e.summary()));
            None
        }
    }
}

fn joined<T>(handle: thread::ScopedJoinHandle<'_, Result<T, ApiError>>) -> Result<T, ApiError> {
    handle
        .join()
        .unwrap_or_else(|_| Err(ApiError::Network("worker thread panicked".to_string())))
}

/// Fetch all five sections at once. No retries: whatever failed is
/// reported in `errors` and left empty.
pub fn load_dashboard<T: Transport>(
    client: &AdminClient<T>,
    region_id: Option<&str>,
) -> DashboardSnapshot {
    let (users, bookings, meetings, activity, recent) = thread::scope(|s| {
        let users = s.spawn(|| client.user_counts(region_id));
        let bookings = s.spawn(|| client.booking_counts(region_id));
        let meetings = s.spawn(|| client.meeting_counts(region_id));
        let activity = s.spawn(|| client.daily_activity());
        let recent = s.spawn(|| client.recent_users(RECENT_USERS).map(|page| page.items));
        (
            joined(users),
            joined(bookings),
            joined(meetings),
            joined(activity),
            joined(recent),
        )
    });

    let mut errors = Vec::new();
    let users = keep("Users", users, &mut errors);
    let bookings = keep("Bookings", bookings, &mut errors);
    let meetings = keep("Meetings", meetings, &mut errors);
    let activity = keep("Daily activity", activity, &mut errors);
    let recent_users = keep("Recent users", recent, &mut errors);

    let snapshot = DashboardSnapshot {
        users,
        bookings,
        meetings,
        activity,
        recent_users,
        errors,
    };
    info!("Dashboard loaded {}/5 sections", snapshot.loaded_sections());
    snapshot
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::mock::MockTransport;
    use crate::api::Method;
    use serde_json::json;

    fn healthy() -> MockTransport {
        MockTransport::new()
            .ok(Method::Get, "/analytics/counts/user", json!({ "data": { "total": 40, "active": 31 } }))
            .ok(Method::Get, "/analytics/counts/meeting", json!({ "data": { "SCHEDULED": 3 } }))
            .ok(
                Method::Get,
                "/analytics/daily-activity",
                json!({ "data": [{ "date": "2025-01-01", "bookings": 2 }, { "date": "2025-01-02", "bookings": 7 }] }),
            )
            .ok(
                Method::Get,
                "/analytics/user/list",
                json!({ "data": [{ "id": "u1", "name": "Meera", "email": "m@x.in", "role": "CLIENT" }], "meta": { "total": 1 } }),
            )
    }

    #[test]
    fn failed_section_stays_empty() {
        let client = AdminClient::new(healthy().fail(Method::Get, "/analytics/counts/booking", 500));

        let snapshot = load_dashboard(&client, Some("r1"));

        assert!(snapshot.bookings.is_none());
        assert_eq!(snapshot.users.as_ref().unwrap().total(), 40);
        assert_eq!(snapshot.meetings.as_ref().unwrap().total(), 3);
        assert_eq!(snapshot.recent_users.as_ref().unwrap().len(), 1);
        assert_eq!(snapshot.loaded_sections(), 4);
        assert_eq!(snapshot.errors.len(), 1);
        assert!(snapshot.errors[0].starts_with("Bookings"));
        assert_eq!(snapshot.activity_peak(), 7);
    }

    #[test]
    fn all_five_calls_issued_once() {
        let client = AdminClient::new(healthy());
        load_dashboard(&client, None);
        let requests = client.transport().requests();
        assert_eq!(requests.len(), 5);
        assert!(requests.iter().all(|r| r.method == Method::Get));
    }
}
