use anyhow::{anyhow, Context, Result};
use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use crate::analytics::{humanize, load_dashboard};
use crate::api::{AdminClient, Page, Transport};
use crate::cli::args::{
    BookingCommands, ConfigCommands, DateRange, DoulaCommands, EnquiryCommands, MeetingCommands,
    RegionCommands, RegionFields, ScheduleCommands, TestimonialCommands, ZoneManagerCommands,
};
use crate::config::{AppConfig, SessionStore};
use crate::error::ApiError;
use crate::forms::{RegionForm, ZoneManagerForm};
use crate::listing::{
    BookingFilter, Choice, DoulaFilter, EnquiryFilter, FetchOutcome, Keyed, ListController,
    ListFilter, ListQuery, MeetingFilter, RegionFilter, RevenueFilter, ScheduleFilter,
    TestimonialFilter, ZoneManagerFilter,
};
use crate::models::{
    BookingStatus, Describe, EnquiryStatus, ScheduleStatus, Tabular, TestimonialStats,
};
use crate::notify::{NoticeLevel, Notices};
use crate::utils::format::{pad, parse_date, progress_bar, truncate};
use crate::workflow::{check_transition, HasStatus, WorkflowStatus};

// ─── ANSI helpers ────────────────────────────────────────────────────────────

macro_rules! print_colored {
    ($color:expr, $($arg:tt)*) => {{
        print!("{}", $color);
        print!($($arg)*);
        print!("\x1b[0m");
    }};
}

macro_rules! println_colored {
    ($color:expr, $($arg:tt)*) => {{
        print!("{}", $color);
        print!($($arg)*);
        println!("\x1b[0m");
    }};
}

const GREEN: &str = "\x1b[32m";
const AMBER: &str = "\x1b[33m";
const RED: &str = "\x1b[31m";
const BLUE: &str = "\x1b[34m";
const DIM: &str = "\x1b[2m";
const BOLD: &str = "\x1b[1m";
const ROSE: &str = "\x1b[38;2;214;112;140m";

/// Rows scanned per request when looking a record up by id.
const LOCATE_LIMIT: u32 = 100;
const LOCATE_MAX_PAGES: u32 = 20;

fn status_color(label: &str) -> &'static str {
    match label {
        "PENDING" | "SCHEDULED" | "IN_REVIEW" => AMBER,
        "ACTIVE" | "IN_PROGRESS" => BLUE,
        "COMPLETED" | "ACCEPTED" => GREEN,
        "CANCELED" | "REJECTED" | "INACTIVE" => RED,
        _ => "",
    }
}

fn print_table<E: Tabular>(rows: &[E]) {
    let widths: Vec<usize> = E::WIDTHS.iter().map(|w| *w as usize).collect();

    print!("  ");
    for (header, width) in E::HEADERS.iter().zip(&widths) {
        print_colored!(BOLD, "{} ", pad(header, *width));
    }
    println!();
    println_colored!(DIM, "  {}", "─".repeat(widths.iter().map(|w| w + 1).sum()));

    for row in rows {
        let status = row.status_label();
        print!("  ");
        for (cell, width) in row.cells().iter().zip(&widths) {
            let text = pad(&truncate(cell, *width), *width);
            match status {
                Some(label) if label == cell => print_colored!(status_color(label), "{} ", text),
                _ => print!("{} ", text),
            }
        }
        println!();
    }
}

fn print_detail<D: Describe>(item: &D) {
    println!();
    println_colored!(ROSE, "  {}", item.title());
    println!();
    for (label, value) in item.detail_lines() {
        print_colored!(DIM, "  {:<16}", label);
        println!("{}", value);
    }
    println!();
}

fn print_notices(notices: &Notices) {
    for notice in notices.iter() {
        match notice.level {
            NoticeLevel::Success => println_colored!(GREEN, "  ✓ {}", notice.message),
            NoticeLevel::Error => println_colored!(RED, "  ✗ {}", notice.message),
            NoticeLevel::Info => println_colored!(DIM, "  {}", notice.message),
        }
    }
}

fn prompt(message: &str) -> Result<String> {
    print!("{}", message);
    io::stdout().flush()?;
    let mut buf = String::new();
    io::stdin().lock().read_line(&mut buf)?;
    Ok(buf.trim().to_string())
}

fn confirm(message: &str) -> Result<bool> {
    let answer = prompt(&format!("  {} [y/N] ", message))?;
    Ok(matches!(answer.to_lowercase().as_str(), "y" | "yes"))
}

fn dates(range: &DateRange) -> Result<(Option<chrono::NaiveDate>, Option<chrono::NaiveDate>)> {
    let from = range.from.as_deref().map(parse_date).transpose()?;
    let to = range.to.as_deref().map(parse_date).transpose()?;
    Ok((from, to))
}

fn id_choice(id: Option<String>) -> Option<Choice> {
    id.filter(|v| !v.trim().is_empty())
        .map(|v| Choice::new(v.clone(), v))
}

fn parsed<S>(raw: Option<&str>) -> Result<Option<S>>
where
    S: std::str::FromStr<Err = anyhow::Error>,
{
    raw.map(str::parse).transpose()
}

/// One filtered page, printed as a table with the paging footer.
fn show_list<F, E>(
    noun: &str,
    filter: F,
    page: u32,
    page_size: u32,
    load: impl FnOnce(&ListQuery<F>) -> Result<Page<E>, ApiError>,
) -> Result<ListController<F, E>>
where
    F: ListFilter,
    E: Keyed + Clone + Tabular,
{
    let mut list = ListController::new(page_size).with_query(filter, page);
    if let FetchOutcome::Failed(message) = list.refresh(load) {
        return Err(anyhow!("Failed to load {}: {}", noun, message));
    }

    println!();
    println_colored!(DIM, "  Filters: {}", list.filter().summary());
    println!();
    if list.items().is_empty() {
        println_colored!(DIM, "  No {} found.", noun);
    } else {
        print_table(list.items());
    }
    println!();
    let pagination = list.pagination();
    println_colored!(
        DIM,
        "  {} · {}",
        pagination.showing_label(),
        pagination.page_label()
    );
    println!();
    Ok(list)
}

/// Walk pages until the row with `id` turns up.
fn locate<F, E>(
    filter: F,
    id: &str,
    load: impl Fn(&ListQuery<F>) -> Result<Page<E>, ApiError>,
) -> Result<Option<E>, ApiError>
where
    F: ListFilter,
    E: Keyed + Clone,
{
    for page in 1..=LOCATE_MAX_PAGES {
        let query = ListQuery {
            filter: filter.clone(),
            page,
            limit: LOCATE_LIMIT,
        };
        let result = load(&query)?;
        if let Some(found) = result.items.iter().find(|e| e.key() == id) {
            return Ok(Some(found.clone()));
        }
        if page >= result.meta.pages_for(LOCATE_LIMIT) {
            break;
        }
    }
    Ok(None)
}

/// Check the transition table against the row's current status, then
/// send the update.
fn change_status<E, S>(
    noun: &str,
    id: &str,
    row: Option<E>,
    target: S,
    send: impl FnOnce(&E) -> Result<(), ApiError>,
) -> Result<()>
where
    E: HasStatus<Status = S>,
    S: WorkflowStatus,
{
    let row = row.ok_or_else(|| anyhow!("{} '{}' not found", noun, id))?;
    check_transition(row.status(), target)?;
    send(&row).with_context(|| format!("Failed to update {} status", noun.to_lowercase()))?;
    println_colored!(GREEN, "  ✓ {} {} → {}", noun, id, target.label());
    Ok(())
}

fn delete_row(noun: &str, id: &str, yes: bool, send: impl FnOnce() -> Result<(), ApiError>) -> Result<()> {
    if !yes && !confirm(&format!("Delete {} {}? This cannot be undone.", noun, id))? {
        println_colored!(DIM, "  Cancelled.");
        return Ok(());
    }
    send().with_context(|| format!("Failed to delete {}", noun))?;
    println_colored!(GREEN, "  ✓ {} {} deleted", noun, id);
    Ok(())
}

// ─── Session ─────────────────────────────────────────────────────────────────

pub fn handle_login<T: Transport>(
    client: &AdminClient<T>,
    store: &SessionStore,
    email: &str,
    otp: Option<String>,
) -> Result<()> {
    let email = email.trim();
    if !crate::forms::zone_manager::is_valid_email(email) {
        return Err(anyhow!("Please enter a valid email address"));
    }
    let code = match otp {
        Some(code) => code,
        None => {
            client
                .send_otp(email)
                .map_err(|e| anyhow!("Unauthorized email or OTP failed: {}", e.summary()))?;
            println_colored!(GREEN, "  ✓ OTP sent to {}", email);
            prompt("  Enter OTP: ")?
        }
    };
    let session = client
        .verify_otp(email, code.trim())
        .map_err(|e| anyhow!("Invalid OTP or unauthorized admin: {}", e.summary()))?;
    store.save(&session)?;
    println_colored!(GREEN, "  ✓ Signed in as {}", session.display_name());
    Ok(())
}

pub fn handle_logout(store: &SessionStore) -> Result<()> {
    store.clear()?;
    println_colored!(DIM, "  Signed out.");
    Ok(())
}

pub fn handle_whoami(store: &SessionStore) -> Result<()> {
    match store.load() {
        Some(session) => {
            println_colored!(BOLD, "  {}", session.display_name());
            println_colored!(DIM, "  {}", session.user.email);
            if let Some(role) = &session.user.role {
                println_colored!(DIM, "  {}", role);
            }
        }
        None => println_colored!(AMBER, "  Not signed in. Run `doula-admin login <email>`."),
    }
    Ok(())
}

// ─── Bookings ────────────────────────────────────────────────────────────────

#[allow(clippy::too_many_arguments)]
pub fn handle_bookings<T: Transport>(
    client: &AdminClient<T>,
    page_size: u32,
    action: Option<&BookingCommands>,
    search: Option<String>,
    status: Option<&str>,
    service: Option<String>,
    region: Option<String>,
    range: &DateRange,
    page: u32,
) -> Result<()> {
    if let Some(BookingCommands::SetStatus { id, status }) = action {
        let target: BookingStatus = status.parse()?;
        let row = locate(BookingFilter::default(), id, |q| client.list_bookings(q))?;
        return change_status("Booking", id, row, target, |b| {
            client.update_booking_status(&b.booking_id, target)
        });
    }

    let (start_date, end_date) = dates(range)?;
    let filter = BookingFilter {
        search: search.unwrap_or_default(),
        service: id_choice(service),
        status: parsed(status)?,
        start_date,
        end_date,
        region: id_choice(region),
    };
    show_list("bookings", filter, page, page_size, |q| client.list_bookings(q))?;
    Ok(())
}

// ─── Schedules ───────────────────────────────────────────────────────────────

#[allow(clippy::too_many_arguments)]
pub fn handle_schedules<T: Transport>(
    client: &AdminClient<T>,
    page_size: u32,
    action: Option<&ScheduleCommands>,
    status: Option<&str>,
    shift: Option<&str>,
    service: Option<String>,
    region: Option<String>,
    doula: Option<String>,
    range: &DateRange,
    page: u32,
) -> Result<()> {
    if let Some(ScheduleCommands::SetStatus { id, status }) = action {
        let target: ScheduleStatus = status.parse()?;
        let row = locate(ScheduleFilter::default(), id, |q| client.list_schedules(q))?;
        return change_status("Schedule", id, row, target, |s| {
            client.update_schedule_status(&s.id, target)
        });
    }

    let (date1, date2) = dates(range)?;
    let filter = ScheduleFilter {
        status: parsed(status)?,
        time_shift: parsed(shift)?,
        service: id_choice(service),
        region: id_choice(region),
        doula_id: doula,
        date1,
        date2,
    };
    show_list("schedules", filter, page, page_size, |q| client.list_schedules(q))?;
    Ok(())
}

// ─── Meetings ────────────────────────────────────────────────────────────────

#[allow(clippy::too_many_arguments)]
pub fn handle_meetings<T: Transport>(
    client: &AdminClient<T>,
    page_size: u32,
    action: Option<&MeetingCommands>,
    search: Option<String>,
    status: Option<&str>,
    service: Option<String>,
    region: Option<String>,
    zone_manager: Option<String>,
    range: &DateRange,
    page: u32,
) -> Result<()> {
    if let Some(MeetingCommands::Show { id }) = action {
        let meeting = client.get_meeting(id).context("Failed to load meeting")?;
        print_detail(&meeting);
        return Ok(());
    }

    let (date1, date2) = dates(range)?;
    let filter = MeetingFilter {
        meeting_id: search.unwrap_or_default(),
        service: id_choice(service),
        status: parsed(status)?,
        date1,
        date2,
        region: id_choice(region),
        zone_manager_id: zone_manager,
    };
    show_list("meetings", filter, page, page_size, |q| client.list_meetings(q))?;
    Ok(())
}

// ─── Doula enquiries ─────────────────────────────────────────────────────────

pub fn handle_enquiries<T: Transport>(
    client: &AdminClient<T>,
    page_size: u32,
    action: Option<&EnquiryCommands>,
    status: Option<&str>,
    page: u32,
) -> Result<()> {
    if let Some(EnquiryCommands::SetStatus { id, status }) = action {
        let target: EnquiryStatus = status.parse()?;
        let row = locate(EnquiryFilter::default(), id, |q| client.list_enquiries(q))?;
        return change_status("Enquiry", id, row, target, |e| {
            client.update_enquiry_status(e, target)
        });
    }

    let filter = EnquiryFilter {
        status: parsed(status)?,
    };
    show_list("enquiries", filter, page, page_size, |q| client.list_enquiries(q))?;
    Ok(())
}

// ─── Doulas ──────────────────────────────────────────────────────────────────

#[allow(clippy::too_many_arguments)]
pub fn handle_doulas<T: Transport>(
    client: &AdminClient<T>,
    page_size: u32,
    action: Option<&DoulaCommands>,
    search: Option<String>,
    service: Option<String>,
    region: Option<String>,
    availability: Option<&str>,
    active: Option<bool>,
    page: u32,
) -> Result<()> {
    if let Some(DoulaCommands::Delete { id, yes }) = action {
        return delete_row("doula", id, *yes, || client.delete_doula(id));
    }

    let filter = DoulaFilter {
        search: search.unwrap_or_default(),
        service_name: service,
        availability: parsed(availability)?,
        is_active: active,
        region: region.map(|name| Choice::new(String::new(), name)),
    };
    let list = show_list("doulas", filter, page, page_size, |q| client.list_doulas(q))?;
    if client.image_base_url().is_some() {
        for doula in list.items() {
            if let Some(url) = doula.profile_image_url(client.image_base_url()) {
                println_colored!(DIM, "  {:<24} {}", truncate(&doula.name, 24), url);
            }
        }
    }
    Ok(())
}

// ─── Zone managers ───────────────────────────────────────────────────────────

pub fn handle_zone_managers<T: Transport>(
    client: &AdminClient<T>,
    page_size: u32,
    action: Option<&ZoneManagerCommands>,
    search: Option<String>,
    region: Option<String>,
    active: Option<bool>,
    page: u32,
) -> Result<()> {
    match action {
        Some(ZoneManagerCommands::Show { id }) => {
            let detail = client.get_zone_manager(id).context("Failed to load zone manager")?;
            print_detail(&detail);
        }
        Some(ZoneManagerCommands::Create {
            name,
            email,
            phone,
            regions,
            image,
        }) => {
            let mut form = ZoneManagerForm::new(Vec::new());
            form.name = name.clone();
            form.email = email.clone();
            form.phone = phone.trim().to_string();
            form.selected = regions.iter().map(|id| Choice::new(id.clone(), id.clone())).collect();
            form.image_path = image.clone().unwrap_or_default();
            if let Some(path) = image {
                if !PathBuf::from(path).is_file() {
                    return Err(anyhow!("Profile image {} does not exist", path));
                }
            }
            let mut notices = Notices::new(60);
            let result = crate::forms::submit_zone_manager(client, &mut form, &mut notices);
            print_notices(&notices);
            result?;
        }
        Some(ZoneManagerCommands::Activate { id }) => {
            client
                .set_zone_manager_active(id, true)
                .context("Failed to activate zone manager")?;
            println_colored!(GREEN, "  ✓ Zone manager {} activated", id);
        }
        Some(ZoneManagerCommands::Deactivate { id }) => {
            client
                .set_zone_manager_active(id, false)
                .context("Failed to deactivate zone manager")?;
            println_colored!(AMBER, "  ✓ Zone manager {} deactivated", id);
        }
        Some(ZoneManagerCommands::Delete { id, yes }) => {
            delete_row("zone manager", id, *yes, || client.delete_zone_manager(id))?;
        }
        None => {
            let filter = ZoneManagerFilter {
                search: search.unwrap_or_default(),
                region: id_choice(region),
                is_active: active,
            };
            show_list("zone managers", filter, page, page_size, |q| {
                client.list_zone_managers(q)
            })?;
        }
    }
    Ok(())
}

// ─── Regions ─────────────────────────────────────────────────────────────────

fn overlay(form: &mut RegionForm, fields: &RegionFields) {
    let pairs = [
        (&mut form.region_name, &fields.name),
        (&mut form.pincode, &fields.pincode),
        (&mut form.district, &fields.district),
        (&mut form.state, &fields.state),
        (&mut form.country, &fields.country),
        (&mut form.latitude, &fields.lat),
        (&mut form.longitude, &fields.lng),
    ];
    for (target, value) in pairs {
        if let Some(v) = value {
            *target = v.clone();
        }
    }
    if fields.inactive {
        form.is_active = false;
    } else if fields.active {
        form.is_active = true;
    }
}

pub fn handle_regions<T: Transport>(
    client: &AdminClient<T>,
    page_size: u32,
    action: Option<&RegionCommands>,
    search: Option<String>,
    page: u32,
) -> Result<()> {
    let mut notices = Notices::new(60);
    match action {
        Some(RegionCommands::Show { id }) => {
            let region = client.get_region(id).context("Failed to load region")?;
            print_detail(&region);
        }
        Some(RegionCommands::Create { fields }) => {
            let mut form = RegionForm::new();
            overlay(&mut form, fields);
            let result = crate::forms::submit_region(client, &mut form, &mut notices);
            print_notices(&notices);
            result?;
        }
        Some(RegionCommands::Update { id, fields }) => {
            let current = client.get_region(id).context("Failed to load region")?;
            let mut form = RegionForm::from_region(&current);
            overlay(&mut form, fields);
            let result = crate::forms::submit_region(client, &mut form, &mut notices);
            print_notices(&notices);
            result?;
        }
        None => {
            let filter = RegionFilter {
                search: search.unwrap_or_default(),
            };
            show_list("regions", filter, page, page_size, |q| client.list_regions(q))?;
        }
    }
    Ok(())
}

// ─── Testimonials ────────────────────────────────────────────────────────────

#[allow(clippy::too_many_arguments)]
pub fn handle_testimonials<T: Transport>(
    client: &AdminClient<T>,
    page_size: u32,
    action: Option<&TestimonialCommands>,
    doula: Option<String>,
    service: Option<String>,
    rating: Option<u8>,
    range: &DateRange,
    page: u32,
) -> Result<()> {
    if let Some(TestimonialCommands::Show { id }) = action {
        let testimonial = client.get_testimonial(id).context("Failed to load testimonial")?;
        print_detail(&testimonial);
        return Ok(());
    }

    let (date1, date2) = dates(range)?;
    let filter = TestimonialFilter {
        doula_id: doula,
        service: id_choice(service),
        ratings: rating,
        date1,
        date2,
    };
    let list = show_list("testimonials", filter, page, page_size, |q| {
        client.list_testimonials(q)
    })?;
    let stats = TestimonialStats::from_page(list.items(), list.pagination().total);
    println_colored!(
        ROSE,
        "  {} reviews · average {:.1} on this page · {} five-star",
        stats.total,
        stats.average,
        stats.five_star
    );
    println!();
    Ok(())
}

// ─── Revenue ─────────────────────────────────────────────────────────────────

pub fn handle_revenue<T: Transport>(
    client: &AdminClient<T>,
    doula: Option<String>,
    region: Option<String>,
    service: Option<String>,
    range: &DateRange,
) -> Result<()> {
    let (date1, date2) = dates(range)?;
    let filter = RevenueFilter {
        doula_id: doula,
        region: id_choice(region),
        service: id_choice(service),
        date1,
        date2,
    };
    let total = client
        .revenue_total(&filter)
        .context("Failed to load revenue")?;

    println!();
    println_colored!(DIM, "  Filters: {}", filter.summary());
    println!();
    print_colored!(BOLD, "  Total revenue  ");
    println_colored!(GREEN, "{}", total.formatted());
    println!();
    Ok(())
}

// ─── Dashboard ───────────────────────────────────────────────────────────────

pub fn handle_dashboard<T: Transport>(client: &AdminClient<T>, region: Option<&str>) -> Result<()> {
    let snapshot = load_dashboard(client, region);
    const BAR: usize = 24;

    println!();
    let sections = [
        ("Users", &snapshot.users),
        ("Bookings", &snapshot.bookings),
        ("Meetings", &snapshot.meetings),
    ];
    for (title, counts) in sections {
        match counts {
            Some(counts) => {
                print_colored!(ROSE, "  {:<10}", title);
                println_colored!(BOLD, "{}", counts.total());
                for (label, value, share) in counts.ratios() {
                    println!(
                        "    {:<18} {:>6}  {} {:>3.0}%",
                        truncate(&humanize(&label), 18),
                        value,
                        progress_bar((share * 1000.0) as u64, 1000, BAR),
                        share * 100.0
                    );
                }
            }
            None => println_colored!(DIM, "  {:<10}unavailable", title),
        }
        println!();
    }

    println_colored!(ROSE, "  Daily activity");
    match &snapshot.activity {
        Some(series) if !series.is_empty() => {
            let peak = snapshot.activity_peak();
            for point in series {
                println!(
                    "    {:<12} {} {}",
                    truncate(&point.label, 12),
                    progress_bar(point.total(), peak, BAR),
                    point.total()
                );
            }
        }
        Some(_) => println_colored!(DIM, "    No activity recorded"),
        None => println_colored!(DIM, "    unavailable"),
    }
    println!();

    println_colored!(ROSE, "  Recent users");
    match &snapshot.recent_users {
        Some(users) if !users.is_empty() => print_table(users),
        Some(_) => println_colored!(DIM, "    No users yet"),
        None => println_colored!(DIM, "    unavailable"),
    }
    println!();

    for error in &snapshot.errors {
        println_colored!(RED, "  ✗ {}", error);
    }
    Ok(())
}

// ─── Config ──────────────────────────────────────────────────────────────────

pub fn handle_config(config: &AppConfig, action: &ConfigCommands) -> Result<()> {
    match action {
        ConfigCommands::Show => {
            let text = toml::to_string_pretty(config).context("Serializing config")?;
            println!("{}", text);
        }
        ConfigCommands::Path => {
            println!("{}", AppConfig::config_path()?.display());
        }
        ConfigCommands::SetApiUrl { url } => {
            // Persist against the file, not the env/flag-overridden copy.
            let mut stored = AppConfig::load().context("Loading config")?;
            stored.api.base_url = url.trim().trim_end_matches('/').to_string();
            stored.save()?;
            println_colored!(GREEN, "  ✓ API URL set to {}", stored.api.base_url);
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::mock::MockTransport;
    use crate::api::Method;
    use serde_json::json;

    fn bookings_page() -> serde_json::Value {
        json!({
            "data": [{ "bookingId": "bk-9", "status": "COMPLETED" }],
            "meta": { "total": 1, "page": 1, "limit": 100, "totalPages": 1 }
        })
    }

    #[test]
    fn illegal_transition_sends_no_patch() {
        let client = AdminClient::new(
            MockTransport::new()
                .ok(Method::Get, "/service-booked", bookings_page())
                .ok(Method::Patch, "/service-booked/bookings/bk-9/status", json!({})),
        );
        let action = BookingCommands::SetStatus {
            id: "bk-9".into(),
            status: "pending".into(),
        };

        let result = handle_bookings(
            &client, 10, Some(&action), None, None, None, None, &DateRange::default(), 1,
        );

        assert!(result.is_err());
        let requests = client.transport().requests();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].method, Method::Get);
    }

    #[test]
    fn legal_transition_patches() {
        let client = AdminClient::new(
            MockTransport::new()
                .ok(
                    Method::Get,
                    "/service-booked",
                    json!({ "data": [{ "bookingId": "bk-1", "status": "PENDING" }], "meta": { "total": 1 } }),
                )
                .ok(Method::Patch, "/service-booked/bookings/bk-1/status", json!({})),
        );
        let row = locate(BookingFilter::default(), "bk-1", |q| client.list_bookings(q)).unwrap();
        change_status("Booking", "bk-1", row, BookingStatus::Active, |b| {
            client.update_booking_status(&b.booking_id, BookingStatus::Active)
        })
        .unwrap();
        assert_eq!(client.transport().last_request().unwrap().method, Method::Patch);
    }

    /// Bookings backend whose search only matches client names.
    struct NameSearchBackend {
        requests: std::sync::Mutex<Vec<crate::api::transport::ApiRequest>>,
    }

    impl Transport for NameSearchBackend {
        fn send(&self, request: crate::api::transport::ApiRequest) -> Result<serde_json::Value, ApiError> {
            let reply = match (request.method, request.path.as_str()) {
                (Method::Get, "/service-booked") => {
                    let matches = request
                        .query_value("search")
                        .is_none_or(|s| "meera".contains(&s.to_lowercase()));
                    let rows = if matches {
                        vec![json!({ "bookingId": "bk-1", "clientName": "Meera", "status": "PENDING" })]
                    } else {
                        Vec::new()
                    };
                    let total = rows.len();
                    Ok(json!({ "data": rows, "meta": { "total": total } }))
                }
                (Method::Patch, "/service-booked/bookings/bk-1/status") => Ok(json!({})),
                _ => Err(ApiError::Http {
                    status: 404,
                    message: "no route".into(),
                }),
            };
            self.requests.lock().unwrap().push(request);
            reply
        }
    }

    #[test]
    fn set_status_finds_booking_by_id_not_search() {
        let client = AdminClient::new(NameSearchBackend {
            requests: Default::default(),
        });
        let action = BookingCommands::SetStatus {
            id: "bk-1".into(),
            status: "ACTIVE".into(),
        };

        handle_bookings(
            &client, 10, Some(&action), None, None, None, None, &DateRange::default(), 1,
        )
        .unwrap();

        let requests = client.transport().requests.lock().unwrap().clone();
        assert_eq!(requests[0].query_value("search"), None);
        let patch = requests.last().unwrap();
        assert_eq!(patch.method, Method::Patch);
        assert_eq!(patch.path, "/service-booked/bookings/bk-1/status");
    }

    #[test]
    fn create_refuses_phone_that_is_not_ten_digits() {
        let client = AdminClient::new(MockTransport::new().ok(Method::Post, "/zonemanager", json!({})));
        let action = ZoneManagerCommands::Create {
            name: "Anita".into(),
            email: "anita@example.com".into(),
            phone: "+91 98765 43210".into(),
            regions: vec!["r1".into()],
            image: None,
        };

        let result = handle_zone_managers(&client, 10, Some(&action), None, None, None, 1);

        assert!(result.is_err());
        assert!(client.transport().requests().is_empty());
    }

    #[test]
    fn locate_stops_at_last_page() {
        let client = AdminClient::new(MockTransport::new().ok(
            Method::Get,
            "/doula-join-enquiries",
            json!({ "data": [], "meta": { "total": 0 } }),
        ));
        let found = locate(EnquiryFilter::default(), "e1", |q| client.list_enquiries(q)).unwrap();
        assert!(found.is_none());
        assert_eq!(client.transport().requests().len(), 1);
    }

    #[test]
    fn region_overlay_keeps_unset_fields() {
        let mut form = RegionForm {
            region_name: "Pune".into(),
            district: "Pune".into(),
            ..RegionForm::default()
        };
        overlay(
            &mut form,
            &RegionFields {
                district: Some("Haveli".into()),
                inactive: true,
                ..RegionFields::default()
            },
        );
        assert_eq!(form.region_name, "Pune");
        assert_eq!(form.district, "Haveli");
        assert!(!form.is_active);
    }

    #[test]
    fn list_failure_is_an_error() {
        let client = AdminClient::new(MockTransport::new().fail(Method::Get, "/regions", 500));
        let result = handle_regions(&client, 10, None, None, 1);
        assert!(result.unwrap_err().to_string().contains("Failed to load regions"));
    }
}
