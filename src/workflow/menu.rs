use log::info;

use super::status::{HasStatus, WorkflowStatus};
use crate::error::ApiError;
use crate::listing::{Keyed, ListController, ListFilter};
use crate::notify::Notices;

#[derive(Debug, Clone)]
struct OpenMenu<S> {
    key: String,
    current: S,
    cursor: usize,
    updating: bool,
}

/// Per-screen status dropdown. At most one row's menu is open at a time.
#[derive(Debug, Clone)]
pub struct StatusMenu<S> {
    open: Option<OpenMenu<S>>,
}

impl<S> Default for StatusMenu<S> {
    fn default() -> Self {
        Self { open: None }
    }
}

impl<S: WorkflowStatus> StatusMenu<S> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Opens the menu for `key`, closing any other row's menu.
    pub fn open(&mut self, key: &str, current: S) {
        self.open = Some(OpenMenu {
            key: key.to_string(),
            current,
            cursor: 0,
            updating: false,
        });
    }

    pub fn close(&mut self) {
        self.open = None;
    }

    pub fn is_open(&self) -> bool {
        self.open.is_some()
    }

    pub fn is_open_for(&self, key: &str) -> bool {
        self.open.as_ref().is_some_and(|m| m.key == key)
    }

    pub fn current(&self) -> Option<S> {
        self.open.as_ref().map(|m| m.current)
    }

    pub fn options(&self) -> &'static [S] {
        self.open
            .as_ref()
            .map(|m| m.current.next_statuses())
            .unwrap_or(&[])
    }

    pub fn cursor(&self) -> usize {
        self.open.as_ref().map(|m| m.cursor).unwrap_or(0)
    }

    pub fn move_cursor(&mut self, delta: i32) {
        let len = self.options().len();
        if let Some(menu) = self.open.as_mut() {
            if menu.updating || len == 0 {
                return;
            }
            let next = (menu.cursor as i64 + delta as i64).rem_euclid(len as i64);
            menu.cursor = next as usize;
        }
    }

    /// Locks the menu and yields the row and target status to send.
    /// `None` while an update is already in flight or nothing is selectable.
    pub fn begin_update(&mut self) -> Option<(String, S)> {
        let options = self.options();
        let menu = self.open.as_mut()?;
        if menu.updating {
            return None;
        }
        let target = *options.get(menu.cursor)?;
        menu.updating = true;
        Some((menu.key.clone(), target))
    }

    pub fn finish_update(&mut self) {
        self.close();
    }

    pub fn is_updating(&self) -> bool {
        self.open.as_ref().is_some_and(|m| m.updating)
    }
}

/// Settle a status PATCH: on success the row takes the new status, on
/// failure it keeps the old one. The menu closes either way.
pub fn apply_transition<F, E>(
    list: &mut ListController<F, E>,
    menu: &mut StatusMenu<E::Status>,
    notices: &mut Notices,
    key: &str,
    target: E::Status,
    result: Result<(), ApiError>,
    noun: &str,
) -> bool
where
    F: ListFilter,
    E: Keyed + Clone + HasStatus,
{
    menu.finish_update();
    match result {
        Ok(()) => {
            list.patch(key, |row| row.set_status(target));
            info!("{} {} → {}", noun, key, target.as_str());
            notices.success(format!("{} status updated to {}", noun, target.label()));
            true
        }
        Err(e) => {
            notices.error(format!("Failed to update {} status: {}", noun.to_lowercase(), e.summary()));
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::{Meta, Page};
    use crate::listing::BookingFilter;
    use crate::models::{Booking, BookingStatus};
    use crate::notify::NoticeLevel;
    use serde_json::json;

    fn bookings() -> ListController<BookingFilter, Booking> {
        let rows: Vec<Booking> = serde_json::from_value(json!([
            { "bookingId": "b1", "status": "PENDING" },
            { "bookingId": "b2", "status": "COMPLETED" }
        ]))
        .unwrap();
        let mut list = ListController::new(10);
        list.refresh(|_| Ok(Page::new(rows, Meta { total: 2, ..Meta::default() })));
        list
    }

    #[test]
    fn one_menu_at_a_time() {
        let mut menu = StatusMenu::new();
        menu.open("b1", BookingStatus::Pending);
        menu.open("b2", BookingStatus::Active);
        assert!(!menu.is_open_for("b1"));
        assert!(menu.is_open_for("b2"));
        menu.close();
        assert!(!menu.is_open());
    }

    #[test]
    fn cursor_wraps_and_locks_while_updating() {
        let mut menu = StatusMenu::new();
        menu.open("b1", BookingStatus::Pending);
        menu.move_cursor(-1);
        assert_eq!(menu.cursor(), 2);
        let (key, target) = menu.begin_update().unwrap();
        assert_eq!((key.as_str(), target), ("b1", BookingStatus::Canceled));
        assert!(menu.is_updating());
        menu.move_cursor(1);
        assert_eq!(menu.cursor(), 2);
        assert!(menu.begin_update().is_none());
    }

    #[test]
    fn terminal_status_has_nothing_to_pick() {
        let mut menu = StatusMenu::new();
        menu.open("b2", BookingStatus::Completed);
        assert!(menu.options().is_empty());
        assert!(menu.begin_update().is_none());
    }

    #[test]
    fn successful_patch_updates_row() {
        let mut list = bookings();
        let mut menu = StatusMenu::new();
        let mut notices = Notices::new(4);
        menu.open("b1", BookingStatus::Pending);
        let (key, target) = menu.begin_update().unwrap();

        assert!(apply_transition(&mut list, &mut menu, &mut notices, &key, target, Ok(()), "Booking"));
        assert_eq!(list.find("b1").unwrap().status, BookingStatus::Active);
        assert!(!menu.is_open());
        assert_eq!(notices.latest().unwrap().level, NoticeLevel::Success);
    }

    #[test]
    fn failed_patch_leaves_status() {
        let mut list = bookings();
        let mut menu = StatusMenu::new();
        let mut notices = Notices::new(4);
        menu.open("b1", BookingStatus::Pending);
        let (key, target) = menu.begin_update().unwrap();

        let err = Err(ApiError::Http { status: 500, message: "boom".into() });
        assert!(!apply_transition(&mut list, &mut menu, &mut notices, &key, target, err, "Booking"));
        assert_eq!(list.find("b1").unwrap().status, BookingStatus::Pending);
        assert!(!menu.is_open());
        let notice = notices.latest().unwrap();
        assert_eq!(notice.level, NoticeLevel::Error);
        assert_eq!(notice.message, "Failed to update booking status: boom");
    }
}
