use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use log::{debug, info, warn};
use ratatui::{
    layout::{Constraint, Direction, Layout},
    widgets::Block,
    DefaultTerminal, Frame,
};
use std::collections::HashSet;
use std::sync::mpsc::Sender;
use std::sync::Arc;
use std::thread;

use crate::analytics::{load_dashboard, DashboardSnapshot};
use crate::api::{AdminClient, Page, Transport};
use crate::config::{AppConfig, Session};
use crate::error::ApiError;
use crate::forms::{submit_region, submit_zone_manager, RegionForm, ZoneManagerForm};
use crate::listing::{
    next_choice, BookingFilter, Choice, DoulaFilter, EnquiryFilter, FetchOutcome, Keyed,
    ListController, ListFilter, ListQuery, MeetingFilter, RegionFilter, RevenueFilter,
    ScheduleFilter, TestimonialFilter, ZoneManagerFilter,
};
use crate::models::{
    Booking, BookingStatus, Describe, Doula, DoulaEnquiry, EnquiryStatus, Meeting, Region,
    RevenueTotal, Schedule, ScheduleStatus, Testimonial, ZoneManager,
};
use crate::notify::Notices;
use crate::tui::events::{Event, EventHandler};
use crate::tui::theme;
use crate::tui::widgets::{dashboard, header, popup, revenue, status_menu, statusbar, table};
use crate::workflow::{apply_transition, HasStatus, StatusMenu, WorkflowStatus};

pub type Client = AdminClient<Box<dyn Transport>>;

type Slot<F, E> = fn(&mut App) -> &mut ListController<F, E>;
type Loader<F, E> = fn(&Client, &ListQuery<F>) -> Result<Page<E>, ApiError>;
type MenuSlot<F, E, S> = fn(&mut App) -> (&mut ListController<F, E>, &mut StatusMenu<S>, &mut Notices);
type StatusSender<E, S> = fn(&Client, &E, S) -> Result<(), ApiError>;
type DetailLoader<D> = fn(&Client, &str) -> Result<D, ApiError>;

/// Worker-side notice queues are drained into the app's right away.
const SCRATCH_NOTICE_SECS: u64 = 60;

/// Run `$method(slot, loader, args..)` against the list behind the current
/// screen. Non-list screens are skipped.
macro_rules! on_list {
    ($app:ident, $method:ident $(, $arg:expr)*) => {
        match $app.view {
            View::Bookings => $app.$method(|a| &mut a.bookings, |c, q| c.list_bookings(q) $(, $arg)*),
            View::Schedules => $app.$method(|a| &mut a.schedules, |c, q| c.list_schedules(q) $(, $arg)*),
            View::Meetings => $app.$method(|a| &mut a.meetings, |c, q| c.list_meetings(q) $(, $arg)*),
            View::Enquiries => $app.$method(|a| &mut a.enquiries, |c, q| c.list_enquiries(q) $(, $arg)*),
            View::Doulas => $app.$method(|a| &mut a.doulas, |c, q| c.list_doulas(q) $(, $arg)*),
            View::ZoneManagers => {
                $app.$method(|a| &mut a.zone_managers, |c, q| c.list_zone_managers(q) $(, $arg)*)
            }
            View::Regions => $app.$method(|a| &mut a.regions, |c, q| c.list_regions(q) $(, $arg)*),
            View::Testimonials => {
                $app.$method(|a| &mut a.testimonials, |c, q| c.list_testimonials(q) $(, $arg)*)
            }
            View::Dashboard | View::Revenue => {}
        }
    };
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum View {
    Dashboard,
    Bookings,
    Schedules,
    Meetings,
    Enquiries,
    Doulas,
    ZoneManagers,
    Regions,
    Testimonials,
    Revenue,
}

impl View {
    pub const ALL: [View; 10] = [
        View::Dashboard,
        View::Bookings,
        View::Schedules,
        View::Meetings,
        View::Enquiries,
        View::Doulas,
        View::ZoneManagers,
        View::Regions,
        View::Testimonials,
        View::Revenue,
    ];

    pub fn title(&self) -> &'static str {
        match self {
            View::Dashboard => "Dashboard",
            View::Bookings => "Bookings",
            View::Schedules => "Doula Schedules",
            View::Meetings => "Meetings",
            View::Enquiries => "Doula Enquiries",
            View::Doulas => "Doulas",
            View::ZoneManagers => "Zone Managers",
            View::Regions => "Regions",
            View::Testimonials => "Testimonials",
            View::Revenue => "Revenue",
        }
    }

    pub fn short_title(&self) -> &'static str {
        match self {
            View::Dashboard => "Home",
            View::Bookings => "Bookings",
            View::Schedules => "Schedules",
            View::Meetings => "Meetings",
            View::Enquiries => "Enquiries",
            View::Doulas => "Doulas",
            View::ZoneManagers => "Zones",
            View::Regions => "Regions",
            View::Testimonials => "Reviews",
            View::Revenue => "Revenue",
        }
    }

    /// `1`–`9` then `0` for the tenth tab.
    pub fn hotkey(&self) -> char {
        let index = View::ALL.iter().position(|v| v == self).unwrap_or(0);
        if index == 9 {
            '0'
        } else {
            char::from(b'1' + index as u8)
        }
    }

    pub fn from_hotkey(c: char) -> Option<View> {
        View::ALL.iter().copied().find(|v| v.hotkey() == c)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum DeleteTarget {
    Doula(String),
    ZoneManager(String),
}

#[derive(Debug, Clone, PartialEq)]
pub enum Popup {
    Help,
    Search { buffer: String },
    Detail { title: String, fields: Vec<(&'static str, String)> },
    Confirm { message: String, target: DeleteTarget },
    RegionForm(RegionForm),
    ZoneManagerForm(ZoneManagerForm),
}

pub struct App {
    pub view: View,
    pub popup: Option<Popup>,
    pub should_quit: bool,
    pub admin: String,
    pub notices: Notices,
    client: Arc<Client>,
    tx: Sender<Event>,
    visited: HashSet<View>,
    saving: bool,

    pub dashboard: Option<DashboardSnapshot>,
    pub dashboard_loading: bool,
    pub dashboard_region: Option<Choice>,
    dashboard_seq: u64,

    pub bookings: ListController<BookingFilter, Booking>,
    pub booking_menu: StatusMenu<BookingStatus>,
    pub schedules: ListController<ScheduleFilter, Schedule>,
    pub schedule_menu: StatusMenu<ScheduleStatus>,
    pub meetings: ListController<MeetingFilter, Meeting>,
    pub enquiries: ListController<EnquiryFilter, DoulaEnquiry>,
    pub enquiry_menu: StatusMenu<EnquiryStatus>,
    pub doulas: ListController<DoulaFilter, Doula>,
    pub zone_managers: ListController<ZoneManagerFilter, ZoneManager>,
    pub regions: ListController<RegionFilter, Region>,
    pub testimonials: ListController<TestimonialFilter, Testimonial>,

    pub revenue_filter: RevenueFilter,
    pub revenue: Option<RevenueTotal>,
    pub revenue_loading: bool,
    pub revenue_error: Option<String>,
    revenue_seq: u64,

    // Lookups for the region/service filter cycles.
    pub region_choices: Vec<Choice>,
    pub service_choices: Vec<Choice>,
}

impl App {
    pub fn new(client: Arc<Client>, tx: Sender<Event>, config: &AppConfig, admin: String) -> Self {
        let limit = config.ui.page_size.max(1);
        App {
            view: View::Dashboard,
            popup: None,
            should_quit: false,
            admin,
            notices: Notices::new(config.ui.notice_secs),
            client,
            tx,
            visited: HashSet::new(),
            saving: false,
            dashboard: None,
            dashboard_loading: false,
            dashboard_region: None,
            dashboard_seq: 0,
            bookings: ListController::new(limit),
            booking_menu: StatusMenu::new(),
            schedules: ListController::new(limit),
            schedule_menu: StatusMenu::new(),
            meetings: ListController::new(limit),
            enquiries: ListController::new(limit),
            enquiry_menu: StatusMenu::new(),
            doulas: ListController::new(limit),
            zone_managers: ListController::new(limit),
            regions: ListController::new(limit),
            testimonials: ListController::new(limit),
            revenue_filter: RevenueFilter::default(),
            revenue: None,
            revenue_loading: false,
            revenue_error: None,
            revenue_seq: 0,
            region_choices: Vec::new(),
            service_choices: Vec::new(),
        }
    }

    /// Initial loads: lookups plus whatever the first screen shows.
    pub fn start(&mut self) {
        self.load_lookups();
        self.visited.insert(self.view);
        self.refresh_current();
    }

    pub fn tick(&mut self) {
        self.notices.prune();
    }

    // ─── Workers ─────────────────────────────────────────────────────────

    /// Run `work` off the UI thread and hand its result to `apply` back on
    /// it. A closed channel means the UI is gone and the result is dropped.
    fn spawn<R: Send + 'static>(
        &self,
        work: impl FnOnce(&Client) -> R + Send + 'static,
        apply: impl FnOnce(&mut App, R) + Send + 'static,
    ) {
        let client = Arc::clone(&self.client);
        let tx = self.tx.clone();
        thread::spawn(move || {
            let result = work(&client);
            let update = Box::new(move |app: &mut App| apply(app, result));
            if tx.send(Event::Update(update)).is_err() {
                debug!("UI closed; dropping worker result");
            }
        });
    }

    fn fetch<F, E>(&mut self, slot: Slot<F, E>, load: Loader<F, E>)
    where
        F: ListFilter,
        E: Keyed + Clone + Send + 'static,
    {
        let ticket = slot(self).begin_fetch();
        self.spawn(
            move |client| {
                let result = load(client, &ticket.query);
                (ticket, result)
            },
            move |app, (ticket, result)| {
                if let FetchOutcome::Failed(message) = slot(app).complete_fetch(ticket, result) {
                    app.notices.error(format!("Failed to load data: {}", message));
                }
            },
        );
    }

    fn load_lookups(&mut self) {
        self.spawn(
            |client| client.all_regions(),
            |app, result| match result {
                Ok(regions) => app.region_choices = regions.iter().map(Choice::from).collect(),
                Err(e) => warn!("Region lookup failed: {}", e),
            },
        );
        self.spawn(
            |client| client.list_services(),
            |app, result| match result {
                Ok(services) => app.service_choices = services.iter().map(Choice::from).collect(),
                Err(e) => warn!("Service lookup failed: {}", e),
            },
        );
    }

    fn reload_dashboard(&mut self) {
        self.dashboard_seq += 1;
        let seq = self.dashboard_seq;
        self.dashboard_loading = true;
        let region = self.dashboard_region.as_ref().map(|r| r.id.clone());
        self.spawn(
            move |client| load_dashboard(client, region.as_deref()),
            move |app, snapshot| {
                if seq != app.dashboard_seq {
                    return;
                }
                app.dashboard_loading = false;
                if !snapshot.errors.is_empty() {
                    app.notices.error(format!(
                        "Some dashboard sections failed to load: {}",
                        snapshot.errors.join("; ")
                    ));
                }
                app.dashboard = Some(snapshot);
            },
        );
    }

    fn fetch_revenue(&mut self) {
        self.revenue_seq += 1;
        let seq = self.revenue_seq;
        self.revenue_loading = true;
        let filter = self.revenue_filter.clone();
        self.spawn(
            move |client| client.revenue_total(&filter),
            move |app, result| {
                if seq != app.revenue_seq {
                    return;
                }
                app.revenue_loading = false;
                match result {
                    Ok(total) => {
                        app.revenue = Some(total);
                        app.revenue_error = None;
                    }
                    Err(e) => {
                        let message = e.summary();
                        app.notices.error(format!("Failed to load revenue: {}", message));
                        app.revenue_error = Some(message);
                    }
                }
            },
        );
    }

    fn refresh_current(&mut self) {
        match self.view {
            View::Dashboard => self.reload_dashboard(),
            View::Revenue => self.fetch_revenue(),
            _ => on_list!(self, fetch),
        }
    }

    fn switch_view(&mut self, view: View) {
        if self.view == view {
            return;
        }
        self.view = view;
        if self.visited.insert(view) {
            self.refresh_current();
        }
    }

    // ─── Keys ────────────────────────────────────────────────────────────

    pub fn handle_key(&mut self, key: KeyEvent) {
        // Only handle actual key presses; some terminals also report release/repeat
        if key.kind != KeyEventKind::Press {
            return;
        }
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            self.should_quit = true;
            return;
        }
        if self.popup.is_some() {
            self.handle_popup_key(key.code);
            return;
        }
        match self.view {
            View::Bookings if self.booking_menu.is_open() => {
                self.menu_key(
                    |a| (&mut a.bookings, &mut a.booking_menu, &mut a.notices),
                    |c, b: &Booking, s| c.update_booking_status(&b.booking_id, s),
                    "Booking",
                    key.code,
                );
                return;
            }
            View::Schedules if self.schedule_menu.is_open() => {
                self.menu_key(
                    |a| (&mut a.schedules, &mut a.schedule_menu, &mut a.notices),
                    |c, s: &Schedule, status| c.update_schedule_status(&s.id, status),
                    "Schedule",
                    key.code,
                );
                return;
            }
            View::Enquiries if self.enquiry_menu.is_open() => {
                self.menu_key(
                    |a| (&mut a.enquiries, &mut a.enquiry_menu, &mut a.notices),
                    |c, e: &DoulaEnquiry, s| c.update_enquiry_status(e, s),
                    "Enquiry",
                    key.code,
                );
                return;
            }
            _ => {}
        }

        match key.code {
            KeyCode::Esc | KeyCode::Char('q') => self.should_quit = true,
            KeyCode::Char('?') => self.popup = Some(Popup::Help),
            KeyCode::Char(c) if View::from_hotkey(c).is_some() => {
                if let Some(view) = View::from_hotkey(c) {
                    self.switch_view(view);
                }
            }
            code => match self.view {
                View::Dashboard => self.dashboard_key(code),
                View::Revenue => self.revenue_key(code),
                _ => {
                    if !self.screen_action(code) {
                        on_list!(self, list_key, code);
                    }
                }
            },
        }
    }

    /// Keys every list screen shares: selection, paging, filters, refresh.
    fn list_key<F, E>(&mut self, slot: Slot<F, E>, load: Loader<F, E>, code: KeyCode)
    where
        F: ListFilter,
        E: Keyed + Clone + Send + 'static,
    {
        let refetch = match code {
            KeyCode::Up => {
                slot(self).select_prev();
                false
            }
            KeyCode::Down => {
                slot(self).select_next();
                false
            }
            KeyCode::Left => slot(self).prev_page(),
            KeyCode::Right => slot(self).next_page(),
            KeyCode::Char('x') => slot(self).reset_filters(),
            KeyCode::Char('f') => slot(self).update_filter(|f| f.cycle_status()),
            KeyCode::Char('g') => {
                let current = slot(self).filter().region().cloned();
                let next = next_choice(current.as_ref(), &self.region_choices);
                slot(self).update_filter(|f| f.set_region(next))
            }
            KeyCode::Char('v') => {
                let current = slot(self).filter().service().cloned();
                let next = next_choice(current.as_ref(), &self.service_choices);
                slot(self).update_filter(|f| f.set_service(next))
            }
            KeyCode::Char('/') => {
                match slot(self).filter().search_text().map(str::to_string) {
                    Some(buffer) => self.popup = Some(Popup::Search { buffer }),
                    None => self.notices.info("This screen has no search"),
                }
                false
            }
            KeyCode::Char('r') => true,
            _ => false,
        };
        if refetch {
            self.fetch(slot, load);
        }
    }

    fn search_list<F, E>(&mut self, slot: Slot<F, E>, load: Loader<F, E>, text: &str)
    where
        F: ListFilter,
        E: Keyed + Clone + Send + 'static,
    {
        if slot(self).update_filter(|f| f.set_search(text)) {
            self.fetch(slot, load);
        }
    }

    fn menu_key<F, E, S>(
        &mut self,
        slot: MenuSlot<F, E, S>,
        send: StatusSender<E, S>,
        noun: &'static str,
        code: KeyCode,
    ) where
        F: ListFilter,
        E: Keyed + Clone + HasStatus<Status = S> + Send + 'static,
        S: WorkflowStatus,
    {
        let (list, menu, _) = slot(self);
        if menu.is_updating() {
            return;
        }
        match code {
            KeyCode::Up => menu.move_cursor(-1),
            KeyCode::Down => menu.move_cursor(1),
            KeyCode::Esc => menu.close(),
            KeyCode::Enter => {
                let Some((key, target)) = menu.begin_update() else {
                    return;
                };
                let Some(row) = list.find(&key).cloned() else {
                    menu.close();
                    return;
                };
                info!("{} {} → {} requested", noun, key, target.as_str());
                self.spawn(
                    move |client| send(client, &row, target),
                    move |app, result| {
                        let (list, menu, notices) = slot(app);
                        apply_transition(list, menu, notices, &key, target, result, noun);
                    },
                );
            }
            _ => {}
        }
    }

    fn open_menu<F, E, S>(&mut self, slot: MenuSlot<F, E, S>)
    where
        F: ListFilter,
        E: Keyed + Clone + HasStatus<Status = S>,
        S: WorkflowStatus,
    {
        let (list, menu, _) = slot(self);
        if let Some(row) = list.selected_item() {
            let key = row.key().to_string();
            menu.open(&key, row.status());
        }
    }

    fn show_detail<D: Describe>(&mut self, item: &D) {
        self.popup = Some(Popup::Detail {
            title: item.title(),
            fields: item.detail_lines(),
        });
    }

    fn fetch_detail<D>(&mut self, load: DetailLoader<D>, id: String, noun: &'static str)
    where
        D: Describe + Send + 'static,
    {
        self.spawn(
            move |client| load(client, &id),
            move |app, result| match result {
                Ok(item) => app.show_detail(&item),
                Err(e) => app
                    .notices
                    .error(format!("Failed to load {}: {}", noun, e.summary())),
            },
        );
    }

    /// Screen-specific actions. Returns false to fall through to the
    /// shared list keys.
    fn screen_action(&mut self, code: KeyCode) -> bool {
        match (self.view, code) {
            (View::Bookings, KeyCode::Enter | KeyCode::Char('s')) => {
                self.open_menu(|a| (&mut a.bookings, &mut a.booking_menu, &mut a.notices));
            }
            (View::Schedules, KeyCode::Enter | KeyCode::Char('s')) => {
                self.open_menu(|a| (&mut a.schedules, &mut a.schedule_menu, &mut a.notices));
            }
            (View::Enquiries, KeyCode::Enter | KeyCode::Char('s')) => {
                self.open_menu(|a| (&mut a.enquiries, &mut a.enquiry_menu, &mut a.notices));
            }
            (View::Bookings, KeyCode::Char('i')) => {
                if let Some(row) = self.bookings.selected_item().cloned() {
                    self.show_detail(&row);
                }
            }
            (View::Schedules, KeyCode::Char('i')) => {
                if let Some(row) = self.schedules.selected_item().cloned() {
                    self.show_detail(&row);
                }
            }
            (View::Enquiries, KeyCode::Char('i')) => {
                if let Some(row) = self.enquiries.selected_item().cloned() {
                    self.show_detail(&row);
                }
            }
            (View::Meetings, KeyCode::Enter) => {
                if let Some(id) = self.meetings.selected_item().map(|m| m.key().to_string()) {
                    self.fetch_detail(|c, id| c.get_meeting(id), id, "meeting");
                }
            }
            (View::Testimonials, KeyCode::Enter) => {
                if let Some(id) = self.testimonials.selected_item().map(|t| t.key().to_string()) {
                    self.fetch_detail(|c, id| c.get_testimonial(id), id, "testimonial");
                }
            }
            (View::ZoneManagers, KeyCode::Enter) => {
                if let Some(id) = self.zone_managers.selected_item().map(|z| z.key().to_string()) {
                    self.fetch_detail(|c, id| c.get_zone_manager(id), id, "zone manager");
                }
            }
            (View::Doulas, KeyCode::Enter) => {
                if let Some(doula) = self.doulas.selected_item().cloned() {
                    let mut fields = doula.detail_lines();
                    if let Some(url) = doula.profile_image_url(self.client.image_base_url()) {
                        fields.push(("Photo", url));
                    }
                    self.popup = Some(Popup::Detail {
                        title: doula.title(),
                        fields,
                    });
                }
            }
            (View::Regions, KeyCode::Enter) => {
                if let Some(row) = self.regions.selected_item().cloned() {
                    self.show_detail(&row);
                }
            }
            (View::Doulas, KeyCode::Char('d')) => {
                if let Some(doula) = self.doulas.selected_item() {
                    self.popup = Some(Popup::Confirm {
                        message: format!("Delete doula {}? This cannot be undone.", doula.name),
                        target: DeleteTarget::Doula(doula.key().to_string()),
                    });
                }
            }
            (View::ZoneManagers, KeyCode::Char('d')) => {
                if let Some(zm) = self.zone_managers.selected_item() {
                    self.popup = Some(Popup::Confirm {
                        message: format!("Delete zone manager {}? This cannot be undone.", zm.name),
                        target: DeleteTarget::ZoneManager(zm.key().to_string()),
                    });
                }
            }
            (View::ZoneManagers, KeyCode::Char('a')) => self.toggle_zone_manager(),
            (View::ZoneManagers, KeyCode::Char('n')) => self.open_zone_manager_form(),
            (View::Regions, KeyCode::Char('n')) => {
                self.popup = Some(Popup::RegionForm(RegionForm::new()));
            }
            (View::Regions, KeyCode::Char('e')) => {
                if let Some(region) = self.regions.selected_item() {
                    self.popup = Some(Popup::RegionForm(RegionForm::from_region(region)));
                }
            }
            _ => return false,
        }
        true
    }

    fn dashboard_key(&mut self, code: KeyCode) {
        match code {
            KeyCode::Char('g') => {
                self.dashboard_region = next_choice(self.dashboard_region.as_ref(), &self.region_choices);
                self.reload_dashboard();
            }
            KeyCode::Char('x') if self.dashboard_region.is_some() => {
                self.dashboard_region = None;
                self.reload_dashboard();
            }
            KeyCode::Char('r') => self.reload_dashboard(),
            _ => {}
        }
    }

    fn revenue_key(&mut self, code: KeyCode) {
        let before = self.revenue_filter.clone();
        match code {
            KeyCode::Char('g') => {
                let next = next_choice(self.revenue_filter.region(), &self.region_choices);
                self.revenue_filter.set_region(next);
            }
            KeyCode::Char('v') => {
                let next = next_choice(self.revenue_filter.service(), &self.service_choices);
                self.revenue_filter.set_service(next);
            }
            KeyCode::Char('x') => self.revenue_filter = RevenueFilter::default(),
            KeyCode::Char('/') => {
                let buffer = self.revenue_filter.search_text().unwrap_or_default().to_string();
                self.popup = Some(Popup::Search { buffer });
                return;
            }
            KeyCode::Char('r') => {
                self.fetch_revenue();
                return;
            }
            _ => return,
        }
        if self.revenue_filter != before {
            self.fetch_revenue();
        }
    }

    fn submit_search(&mut self, text: String) {
        if self.view == View::Revenue {
            let before = self.revenue_filter.clone();
            self.revenue_filter.set_search(&text);
            if self.revenue_filter != before {
                self.fetch_revenue();
            }
            return;
        }
        on_list!(self, search_list, &text);
    }

    // ─── Mutations ───────────────────────────────────────────────────────

    fn delete(&mut self, target: DeleteTarget) {
        match target {
            DeleteTarget::Doula(id) => self.spawn(
                {
                    let id = id.clone();
                    move |client| client.delete_doula(&id)
                },
                move |app, result| match app.doulas.remove_after(&id, |_| result) {
                    Ok(_) => app.notices.success("Doula deleted successfully"),
                    Err(e) => app
                        .notices
                        .error(format!("Failed to delete doula: {}", e.summary())),
                },
            ),
            DeleteTarget::ZoneManager(id) => self.spawn(
                {
                    let id = id.clone();
                    move |client| client.delete_zone_manager(&id)
                },
                move |app, result| match app.zone_managers.remove_after(&id, |_| result) {
                    Ok(_) => app.notices.success("Zone Manager deleted successfully"),
                    Err(e) => app
                        .notices
                        .error(format!("Failed to delete Zone Manager: {}", e.summary())),
                },
            ),
        }
    }

    fn toggle_zone_manager(&mut self) {
        let Some(zm) = self.zone_managers.selected_item() else {
            return;
        };
        let id = zm.key().to_string();
        let target = !zm.is_active;
        self.spawn(
            {
                let id = id.clone();
                move |client| client.set_zone_manager_active(&id, target)
            },
            move |app, result| match result {
                Ok(()) => {
                    app.zone_managers.patch(&id, |row| row.is_active = target);
                    let verb = if target { "activated" } else { "deactivated" };
                    app.notices.success(format!("Zone Manager {}", verb));
                }
                Err(e) => app
                    .notices
                    .error(format!("Failed to update Zone Manager: {}", e.summary())),
            },
        );
    }

    /// Only regions without a zone manager can be assigned, so the picker
    /// loads the full region list first.
    fn open_zone_manager_form(&mut self) {
        self.spawn(
            |client| client.all_regions(),
            |app, result| match result {
                Ok(regions) => {
                    let available = regions
                        .iter()
                        .filter(|r| !r.is_assigned())
                        .map(Choice::from)
                        .collect();
                    app.region_choices = regions.iter().map(Choice::from).collect();
                    app.popup = Some(Popup::ZoneManagerForm(ZoneManagerForm::new(available)));
                }
                Err(e) => app
                    .notices
                    .error(format!("Failed to load regions: {}", e.summary())),
            },
        );
    }

    fn save_region(&mut self, form: &mut RegionForm) {
        if self.saving {
            return;
        }
        if let Err(e) = form.validate() {
            form.error = Some(e.to_string());
            self.notices.error(e.to_string());
            return;
        }
        self.saving = true;
        let mut draft = form.clone();
        self.spawn(
            move |client| {
                let mut scratch = Notices::new(SCRATCH_NOTICE_SECS);
                let result = submit_region(client, &mut draft, &mut scratch);
                (draft, scratch, result)
            },
            |app, (draft, scratch, result)| {
                app.saving = false;
                app.notices.absorb(scratch);
                match result {
                    Ok(()) => {
                        app.popup = None;
                        app.fetch(|a| &mut a.regions, |c, q| c.list_regions(q));
                        app.load_lookups();
                    }
                    Err(_) => {
                        if let Some(Popup::RegionForm(open)) = app.popup.as_mut() {
                            open.error = draft.error;
                        }
                    }
                }
            },
        );
    }

    fn save_zone_manager(&mut self, form: &mut ZoneManagerForm) {
        if self.saving {
            return;
        }
        if let Err(e) = form.validate() {
            form.error = Some(e.to_string());
            self.notices.error(e.to_string());
            return;
        }
        self.saving = true;
        let mut draft = form.clone();
        self.spawn(
            move |client| {
                let mut scratch = Notices::new(SCRATCH_NOTICE_SECS);
                let result = submit_zone_manager(client, &mut draft, &mut scratch);
                (draft, scratch, result)
            },
            |app, (draft, scratch, result)| {
                app.saving = false;
                app.notices.absorb(scratch);
                match result {
                    Ok(()) => {
                        app.popup = None;
                        app.fetch(|a| &mut a.zone_managers, |c, q| c.list_zone_managers(q));
                    }
                    Err(_) => {
                        if let Some(Popup::ZoneManagerForm(open)) = app.popup.as_mut() {
                            open.error = draft.error;
                        }
                    }
                }
            },
        );
    }

    fn handle_popup_key(&mut self, code: KeyCode) {
        let Some(current) = self.popup.take() else {
            return;
        };
        self.popup = match current {
            Popup::Help => match code {
                KeyCode::Esc | KeyCode::Char('?') | KeyCode::Char('q') => None,
                _ => Some(Popup::Help),
            },
            detail @ Popup::Detail { .. } => match code {
                KeyCode::Esc | KeyCode::Enter | KeyCode::Char('q') => None,
                _ => Some(detail),
            },
            Popup::Search { mut buffer } => match code {
                KeyCode::Esc => None,
                KeyCode::Enter => {
                    self.submit_search(buffer);
                    None
                }
                KeyCode::Backspace => {
                    buffer.pop();
                    Some(Popup::Search { buffer })
                }
                KeyCode::Char(c) => {
                    buffer.push(c);
                    Some(Popup::Search { buffer })
                }
                _ => Some(Popup::Search { buffer }),
            },
            Popup::Confirm { message, target } => match code {
                KeyCode::Char('y') | KeyCode::Char('Y') => {
                    self.delete(target);
                    None
                }
                KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => None,
                _ => Some(Popup::Confirm { message, target }),
            },
            Popup::RegionForm(mut form) => {
                match code {
                    KeyCode::Esc if !self.saving => return,
                    KeyCode::Tab | KeyCode::Down => form.next_field(),
                    KeyCode::BackTab | KeyCode::Up => form.prev_field(),
                    KeyCode::Backspace => form.backspace(),
                    KeyCode::Enter => self.save_region(&mut form),
                    KeyCode::Char(c) => form.input(c),
                    _ => {}
                }
                Some(Popup::RegionForm(form))
            }
            Popup::ZoneManagerForm(mut form) => {
                match code {
                    KeyCode::Esc if !self.saving => return,
                    KeyCode::Tab => form.next_field(),
                    KeyCode::BackTab => form.prev_field(),
                    KeyCode::Up if form.on_regions() => form.move_region_cursor(-1),
                    KeyCode::Down if form.on_regions() => form.move_region_cursor(1),
                    KeyCode::Up => form.prev_field(),
                    KeyCode::Down => form.next_field(),
                    KeyCode::Backspace => form.backspace(),
                    KeyCode::Enter => self.save_zone_manager(&mut form),
                    KeyCode::Char(c) => form.input(c),
                    _ => {}
                }
                Some(Popup::ZoneManagerForm(form))
            }
        };
    }

    // ─── Drawing ─────────────────────────────────────────────────────────

    fn hints(&self) -> Vec<(&'static str, &'static str)> {
        let mut hints = match self.view {
            View::Dashboard => vec![("[g]", "region"), ("[r]", "refresh")],
            View::Revenue => vec![
                ("[/]", "doula"),
                ("[g]", "region"),
                ("[v]", "service"),
                ("[x]", "reset"),
            ],
            _ => vec![
                ("[/]", "search"),
                ("[f]", "status"),
                ("[g]", "region"),
                ("[←→]", "page"),
                ("[x]", "reset"),
            ],
        };
        match self.view {
            View::Bookings | View::Schedules | View::Enquiries => hints.push(("[s]", "status")),
            View::Doulas => hints.push(("[d]", "delete")),
            View::ZoneManagers => {
                hints.extend([("[n]", "new"), ("[a]", "active"), ("[d]", "delete")])
            }
            View::Regions => hints.extend([("[n]", "new"), ("[e]", "edit")]),
            _ => {}
        }
        hints.extend([("[?]", "help"), ("[Esc]", "quit")]);
        hints
    }

    pub fn draw(&self, frame: &mut Frame) {
        let area = frame.area();
        frame.render_widget(Block::default().style(theme::base()), area);

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(4), // header + tabs
                Constraint::Min(0),    // body
                Constraint::Length(1), // status bar
            ])
            .split(area);

        header::render(frame, chunks[0], self.view, &self.admin);

        let body = chunks[1];
        let title = self.view.title();
        match self.view {
            View::Dashboard => dashboard::render(
                frame,
                body,
                self.dashboard.as_ref(),
                self.dashboard_loading,
                self.dashboard_region.as_ref(),
            ),
            View::Bookings => table::render(frame, body, title, &self.bookings),
            View::Schedules => table::render(frame, body, title, &self.schedules),
            View::Meetings => table::render(frame, body, title, &self.meetings),
            View::Enquiries => table::render(frame, body, title, &self.enquiries),
            View::Doulas => table::render(frame, body, title, &self.doulas),
            View::ZoneManagers => table::render(frame, body, title, &self.zone_managers),
            View::Regions => table::render(frame, body, title, &self.regions),
            View::Testimonials => table::render(frame, body, title, &self.testimonials),
            View::Revenue => revenue::render(
                frame,
                body,
                &self.revenue_filter,
                self.revenue.as_ref(),
                self.revenue_loading,
                self.revenue_error.as_deref(),
            ),
        }

        statusbar::render(frame, chunks[2], &self.hints(), self.notices.latest());

        match self.view {
            View::Bookings if self.booking_menu.is_open() => {
                status_menu::render(frame, &self.booking_menu, "Booking")
            }
            View::Schedules if self.schedule_menu.is_open() => {
                status_menu::render(frame, &self.schedule_menu, "Schedule")
            }
            View::Enquiries if self.enquiry_menu.is_open() => {
                status_menu::render(frame, &self.enquiry_menu, "Enquiry")
            }
            _ => {}
        }

        match &self.popup {
            Some(Popup::Help) => popup::render_help(frame),
            Some(Popup::Search { buffer }) => popup::render_search(frame, buffer),
            Some(Popup::Detail { title, fields }) => popup::render_detail(frame, title, fields),
            Some(Popup::Confirm { message, .. }) => popup::render_confirm(frame, message),
            Some(Popup::RegionForm(form)) => popup::render_region_form(frame, form),
            Some(Popup::ZoneManagerForm(form)) => popup::render_zone_manager_form(frame, form),
            None => {}
        }
    }
}

fn event_loop(terminal: &mut DefaultTerminal, app: &mut App, events: &EventHandler) -> Result<()> {
    loop {
        terminal.draw(|frame| app.draw(frame))?;

        match events.next()? {
            Event::Key(key) => {
                app.handle_key(key);
                if app.should_quit {
                    break;
                }
            }
            Event::Tick => app.tick(),
            Event::Update(update) => update(app),
        }
    }
    Ok(())
}

/// Run the TUI event loop.
pub fn run(client: Client, config: &AppConfig, session: Option<Session>) -> Result<()> {
    let events = EventHandler::new(config.ui.tick_rate_ms);
    let admin = session
        .as_ref()
        .map(|s| s.display_name().to_string())
        .unwrap_or_else(|| "nobody".to_string());

    let mut app = App::new(Arc::new(client), events.sender(), config, admin);
    if session.is_none() {
        app.notices
            .info("Not signed in. Run `doula-admin login <email>` first.");
    }
    app.start();

    let mut terminal = ratatui::init();
    let outcome = event_loop(&mut terminal, &mut app, &events);
    ratatui::restore();
    outcome
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::mock::MockTransport;
    use crate::api::Method;
    use crate::notify::NoticeLevel;
    use serde_json::{json, Value};
    use std::sync::mpsc::{self, Receiver};
    use std::time::Duration;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn app_with(mock: MockTransport) -> (App, Arc<MockTransport>, Receiver<Event>) {
        let mock = Arc::new(mock);
        let transport: Box<dyn Transport> = Box::new(Arc::clone(&mock));
        let (tx, rx) = mpsc::channel();
        let app = App::new(
            Arc::new(AdminClient::new(transport)),
            tx,
            &AppConfig::default(),
            "Asha".to_string(),
        );
        (app, mock, rx)
    }

    /// Apply the next `n` worker results.
    fn settle(app: &mut App, rx: &Receiver<Event>, n: usize) {
        for _ in 0..n {
            match rx.recv_timeout(Duration::from_secs(5)) {
                Ok(Event::Update(update)) => update(app),
                Ok(other) => panic!("unexpected event {:?}", other),
                Err(e) => panic!("worker never reported back: {}", e),
            }
        }
    }

    fn booking(id: &str, status: &str) -> Value {
        json!({ "bookingId": id, "clientName": "Meera", "status": status })
    }

    fn bookings_page() -> Value {
        json!({
            "data": [booking("b1", "PENDING"), booking("b2", "COMPLETED")],
            "meta": { "total": 2, "page": 1, "limit": 10 }
        })
    }

    fn on_bookings(app: &mut App, rx: &Receiver<Event>) {
        app.handle_key(key(KeyCode::Char('2')));
        settle(app, rx, 1);
        assert_eq!(app.view, View::Bookings);
    }

    #[test]
    fn hotkeys_cover_every_tab() {
        assert_eq!(View::Dashboard.hotkey(), '1');
        assert_eq!(View::Revenue.hotkey(), '0');
        assert_eq!(View::from_hotkey('7'), Some(View::ZoneManagers));
        assert_eq!(View::from_hotkey('x'), None);
    }

    #[test]
    fn first_visit_loads_the_list() {
        let (mut app, mock, rx) = app_with(MockTransport::new().ok(Method::Get, "/service-booked", bookings_page()));
        on_bookings(&mut app, &rx);

        assert_eq!(app.bookings.items().len(), 2);
        assert_eq!(mock.requests().len(), 1);

        // Returning to a visited tab does not refetch.
        app.visited.insert(View::Dashboard);
        app.handle_key(key(KeyCode::Char('1')));
        app.handle_key(key(KeyCode::Char('2')));
        assert_eq!(mock.requests().len(), 1);
    }

    #[test]
    fn status_change_patches_row() {
        let mock = MockTransport::new()
            .ok(Method::Get, "/service-booked", bookings_page())
            .ok(Method::Patch, "/service-booked/bookings/b1/status", json!({ "success": true }));
        let (mut app, _mock, rx) = app_with(mock);
        on_bookings(&mut app, &rx);

        app.handle_key(key(KeyCode::Enter));
        assert!(app.booking_menu.is_open_for("b1"));
        app.handle_key(key(KeyCode::Enter)); // first option: Active
        assert!(app.booking_menu.is_updating());

        // Locked while the PATCH is in flight.
        app.handle_key(key(KeyCode::Esc));
        assert!(app.booking_menu.is_open());

        settle(&mut app, &rx, 1);
        assert!(!app.booking_menu.is_open());
        assert_eq!(app.bookings.items()[0].status, BookingStatus::Active);
        assert_eq!(app.notices.latest().unwrap().level, NoticeLevel::Success);
    }

    #[test]
    fn failed_status_change_keeps_old_status() {
        let mock = MockTransport::new()
            .ok(Method::Get, "/service-booked", bookings_page())
            .fail(Method::Patch, "/service-booked/bookings/b1/status", 500);
        let (mut app, _mock, rx) = app_with(mock);
        on_bookings(&mut app, &rx);

        app.handle_key(key(KeyCode::Char('s')));
        app.handle_key(key(KeyCode::Enter));
        settle(&mut app, &rx, 1);

        assert_eq!(app.bookings.items()[0].status, BookingStatus::Pending);
        let notice = app.notices.latest().unwrap();
        assert_eq!(notice.level, NoticeLevel::Error);
        assert!(notice.message.starts_with("Failed to update booking status"));
    }

    #[test]
    fn final_status_offers_nothing() {
        let (mut app, mock, rx) = app_with(MockTransport::new().ok(Method::Get, "/service-booked", bookings_page()));
        on_bookings(&mut app, &rx);

        app.handle_key(key(KeyCode::Down));
        app.handle_key(key(KeyCode::Enter));
        assert!(app.booking_menu.options().is_empty());
        app.handle_key(key(KeyCode::Enter));
        assert!(!app.booking_menu.is_updating());
        assert_eq!(mock.requests().len(), 1);
    }

    #[test]
    fn search_resets_page_and_refetches() {
        let (mut app, mock, rx) = app_with(MockTransport::new().ok(Method::Get, "/service-booked", bookings_page()));
        on_bookings(&mut app, &rx);

        app.handle_key(key(KeyCode::Char('/')));
        for c in "meera".chars() {
            app.handle_key(key(KeyCode::Char(c)));
        }
        app.handle_key(key(KeyCode::Enter));
        settle(&mut app, &rx, 1);

        assert!(app.popup.is_none());
        assert_eq!(app.bookings.filter().search, "meera");
        let last = mock.last_request().unwrap();
        assert_eq!(last.query_value("search"), Some("meera"));
        assert_eq!(last.query_value("page"), Some("1"));
    }

    #[test]
    fn delete_waits_for_confirmation() {
        let mock = MockTransport::new()
            .ok(
                Method::Get,
                "/doula",
                json!({ "data": [{ "userId": "d1", "name": "Lata" }], "meta": { "total": 1 } }),
            )
            .ok(Method::Delete, "/doula/d1", json!({}));
        let (mut app, mock, rx) = app_with(mock);
        app.handle_key(key(KeyCode::Char('6')));
        settle(&mut app, &rx, 1);

        app.handle_key(key(KeyCode::Char('d')));
        app.handle_key(key(KeyCode::Char('n')));
        assert!(app.popup.is_none());
        assert_eq!(app.doulas.items().len(), 1);

        app.handle_key(key(KeyCode::Char('d')));
        app.handle_key(key(KeyCode::Char('y')));
        settle(&mut app, &rx, 1);

        assert!(app.doulas.items().is_empty());
        assert_eq!(app.doulas.pagination().total, 0);
        assert_eq!(mock.last_request().unwrap().method, Method::Delete);
        assert_eq!(app.notices.latest().unwrap().message, "Doula deleted successfully");
    }

    #[test]
    fn invalid_region_form_sends_nothing() {
        let mock = MockTransport::new()
            .ok(Method::Get, "/regions", json!({ "data": [], "meta": { "total": 0 } }));
        let (mut app, mock, rx) = app_with(mock);
        app.handle_key(key(KeyCode::Char('8')));
        settle(&mut app, &rx, 1);

        app.handle_key(key(KeyCode::Char('n')));
        for c in "Pune".chars() {
            app.handle_key(key(KeyCode::Char(c)));
        }
        app.handle_key(key(KeyCode::Enter));

        match &app.popup {
            Some(Popup::RegionForm(form)) => {
                assert!(form.error.as_deref().unwrap().starts_with("Please fill all required fields"));
                assert_eq!(form.region_name, "Pune");
            }
            other => panic!("form should stay open, got {:?}", other),
        }
        assert_eq!(app.notices.latest().unwrap().level, NoticeLevel::Error);
        assert_eq!(mock.requests().len(), 1);
    }

    #[test]
    fn revenue_filter_change_refetches() {
        let mock = MockTransport::new().ok(
            Method::Get,
            "/analytics/revenue/total",
            json!({ "data": { "totalRevenue": 125000.0, "currency": "INR" } }),
        );
        let (mut app, mock, rx) = app_with(mock);
        app.region_choices = vec![Choice::new("r1", "Pune")];
        app.handle_key(key(KeyCode::Char('0')));
        settle(&mut app, &rx, 1);
        assert_eq!(app.revenue.as_ref().unwrap().formatted(), "₹1,25,000");

        app.handle_key(key(KeyCode::Char('g')));
        settle(&mut app, &rx, 1);
        assert_eq!(mock.last_request().unwrap().query_value("regionId"), Some("r1"));
    }
}
