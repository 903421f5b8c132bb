use log::{debug, warn};

use super::{Keyed, ListFilter, Pagination};
use crate::api::Page;
use crate::error::ApiError;

/// Snapshot of what a fetch asked for.
#[derive(Debug, Clone, PartialEq)]
pub struct ListQuery<F> {
    pub filter: F,
    pub page: u32,
    pub limit: u32,
}

impl<F: ListFilter> ListQuery<F> {
    pub fn params(&self) -> Vec<(String, String)> {
        let mut params = vec![
            ("page".to_string(), self.page.to_string()),
            ("limit".to_string(), self.limit.to_string()),
        ];
        params.extend(self.filter.to_params());
        params
    }
}

/// Handed out by `begin_fetch`; only the most recent ticket may land.
#[derive(Debug, Clone)]
pub struct FetchTicket<F> {
    seq: u64,
    pub query: ListQuery<F>,
}

impl<F> FetchTicket<F> {
    pub fn seq(&self) -> u64 {
        self.seq
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum FetchOutcome {
    Applied,
    /// A newer fetch was started after this one; the response was dropped.
    Stale,
    Failed(String),
}

/// State of one list screen: filter, paging, the current page of rows and
/// the fetch bookkeeping around them.
#[derive(Debug, Clone)]
pub struct ListController<F, E> {
    filter: F,
    pagination: Pagination,
    items: Vec<E>,
    loading: bool,
    error: Option<String>,
    selected: usize,
    issued: u64,
}

impl<F: ListFilter, E: Keyed + Clone> ListController<F, E> {
    pub fn new(limit: u32) -> Self {
        Self {
            filter: F::default(),
            pagination: Pagination::new(limit),
            items: Vec::new(),
            loading: false,
            error: None,
            selected: 0,
            issued: 0,
        }
    }

    /// Seed filter and page before the first fetch; no totals to clamp
    /// against yet.
    pub fn with_query(mut self, filter: F, page: u32) -> Self {
        self.filter = filter;
        self.pagination.page = page.max(1);
        self
    }

    pub fn filter(&self) -> &F {
        &self.filter
    }

    pub fn pagination(&self) -> &Pagination {
        &self.pagination
    }

    pub fn items(&self) -> &[E] {
        &self.items
    }

    pub fn loading(&self) -> bool {
        self.loading
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn query(&self) -> ListQuery<F> {
        ListQuery {
            filter: self.filter.clone(),
            page: self.pagination.page,
            limit: self.pagination.limit,
        }
    }

    // ─── Filters & paging ────────────────────────────────────────────────

    /// Returns true when the filter actually changed (page reset to 1, a
    /// refetch is due).
    pub fn update_filter(&mut self, change: impl FnOnce(&mut F)) -> bool {
        let before = self.filter.clone();
        change(&mut self.filter);
        if self.filter == before {
            return false;
        }
        self.pagination.page = 1;
        self.selected = 0;
        true
    }

    pub fn reset_filters(&mut self) -> bool {
        let changed = self.filter != F::default() || self.pagination.page != 1;
        self.filter = F::default();
        self.pagination.page = 1;
        self.selected = 0;
        changed
    }

    pub fn set_page(&mut self, page: u32) -> bool {
        let target = self.pagination.clamp(page);
        if target == self.pagination.page {
            return false;
        }
        self.pagination.page = target;
        self.selected = 0;
        true
    }

    pub fn next_page(&mut self) -> bool {
        self.set_page(self.pagination.page.saturating_add(1))
    }

    pub fn prev_page(&mut self) -> bool {
        self.set_page(self.pagination.page.saturating_sub(1))
    }

    // ─── Fetching ────────────────────────────────────────────────────────

    pub fn begin_fetch(&mut self) -> FetchTicket<F> {
        self.issued += 1;
        self.loading = true;
        FetchTicket {
            seq: self.issued,
            query: self.query(),
        }
    }

    pub fn complete_fetch(
        &mut self,
        ticket: FetchTicket<F>,
        result: Result<Page<E>, ApiError>,
    ) -> FetchOutcome {
        if ticket.seq != self.issued {
            debug!("Dropping stale page response #{} (latest #{})", ticket.seq, self.issued);
            return FetchOutcome::Stale;
        }
        self.loading = false;
        match result {
            Ok(page) => {
                self.items = page.items;
                self.pagination.apply_meta(&page.meta);
                self.error = None;
                if self.selected >= self.items.len() {
                    self.selected = self.items.len().saturating_sub(1);
                }
                FetchOutcome::Applied
            }
            Err(e) => {
                warn!("List fetch failed: {}", e);
                let message = e.summary();
                self.error = Some(message.clone());
                FetchOutcome::Failed(message)
            }
        }
    }

    /// Blocking fetch for one-shot callers.
    pub fn refresh(
        &mut self,
        fetcher: impl FnOnce(&ListQuery<F>) -> Result<Page<E>, ApiError>,
    ) -> FetchOutcome {
        let ticket = self.begin_fetch();
        let result = fetcher(&ticket.query);
        self.complete_fetch(ticket, result)
    }

    // ─── Local mutations ─────────────────────────────────────────────────

    pub fn find(&self, key: &str) -> Option<&E> {
        self.items.iter().find(|e| e.key() == key)
    }

    pub fn patch(&mut self, key: &str, change: impl FnOnce(&mut E)) -> bool {
        match self.items.iter_mut().find(|e| e.key() == key) {
            Some(item) => {
                change(item);
                true
            }
            None => false,
        }
    }

    pub fn remove(&mut self, key: &str) -> Option<E> {
        let index = self.items.iter().position(|e| e.key() == key)?;
        let removed = self.items.remove(index);
        self.pagination.total = self.pagination.total.saturating_sub(1);
        if self.selected >= self.items.len() {
            self.selected = self.items.len().saturating_sub(1);
        }
        Some(removed)
    }

    /// Run the delete call and drop the row only once it has succeeded.
    pub fn remove_after(
        &mut self,
        key: &str,
        op: impl FnOnce(&str) -> Result<(), ApiError>,
    ) -> Result<Option<E>, ApiError> {
        op(key)?;
        Ok(self.remove(key))
    }

    // ─── Selection ───────────────────────────────────────────────────────

    pub fn selected(&self) -> usize {
        self.selected
    }

    pub fn select_next(&mut self) {
        if self.selected + 1 < self.items.len() {
            self.selected += 1;
        }
    }

    pub fn select_prev(&mut self) {
        self.selected = self.selected.saturating_sub(1);
    }

    pub fn selected_item(&self) -> Option<&E> {
        self.items.get(self.selected)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::Meta;
    use crate::listing::RegionFilter;

    #[derive(Debug, Clone, PartialEq)]
    struct Row(String);

    impl Keyed for Row {
        fn key(&self) -> &str {
            &self.0
        }
    }

    fn page_of(ids: &[&str], total: u64) -> Page<Row> {
        Page::new(
            ids.iter().map(|id| Row(id.to_string())).collect(),
            Meta {
                total,
                limit: 10,
                ..Meta::default()
            },
        )
    }

    fn loaded(total: u64) -> ListController<RegionFilter, Row> {
        let mut list = ListController::new(10);
        list.refresh(|_| Ok(page_of(&["a", "b", "c"], total)));
        list
    }

    #[test]
    fn filter_change_resets_page() {
        let mut list = loaded(23);
        assert!(list.set_page(3));
        assert!(list.update_filter(|f| f.search = "pune".into()));
        assert_eq!(list.pagination().page, 1);
        assert_eq!(list.query().params()[0], ("page".to_string(), "1".to_string()));
    }

    #[test]
    fn unchanged_filter_keeps_page() {
        let mut list = loaded(23);
        list.set_page(2);
        assert!(!list.update_filter(|f| f.search = String::new()));
        assert_eq!(list.pagination().page, 2);
    }

    #[test]
    fn third_page_label() {
        let mut list = loaded(23);
        list.set_page(3);
        list.refresh(|q| {
            assert_eq!(q.page, 3);
            Ok(page_of(&["u", "v", "w"], 23))
        });
        assert_eq!(list.pagination().showing_label(), "Showing 21–23 of 23");
    }

    #[test]
    fn paging_clamps() {
        let mut list = loaded(23);
        assert!(!list.prev_page());
        assert!(list.set_page(99));
        assert_eq!(list.pagination().page, 3);
        assert!(!list.next_page());
    }

    #[test]
    fn stale_ticket_is_discarded() {
        let mut list: ListController<RegionFilter, Row> = ListController::new(10);
        let slow = list.begin_fetch();
        list.update_filter(|f| f.search = "a".into());
        let fresh = list.begin_fetch();

        assert_eq!(list.complete_fetch(fresh, Ok(page_of(&["fresh"], 1))), FetchOutcome::Applied);
        assert_eq!(list.complete_fetch(slow, Ok(page_of(&["old"], 9))), FetchOutcome::Stale);
        assert_eq!(list.items()[0].0, "fresh");
        assert_eq!(list.pagination().total, 1);
    }

    #[test]
    fn failure_keeps_previous_rows() {
        let mut list = loaded(3);
        let outcome = list.refresh(|_| Err(ApiError::Network("down".into())));
        assert!(matches!(outcome, FetchOutcome::Failed(_)));
        assert_eq!(list.items().len(), 3);
        assert_eq!(list.error(), Some("Network error: down"));
        assert!(!list.loading());
    }

    #[test]
    fn delete_only_after_success() {
        let mut list = loaded(3);

        let err = list.remove_after("b", |_| {
            Err(ApiError::Http {
                status: 500,
                message: "boom".into(),
            })
        });
        assert!(err.is_err());
        assert_eq!(list.items().len(), 3);
        assert_eq!(list.pagination().total, 3);

        let removed = list.remove_after("b", |_| Ok(())).unwrap();
        assert_eq!(removed, Some(Row("b".into())));
        assert_eq!(list.items().len(), 2);
        assert_eq!(list.pagination().total, 2);
    }

    #[test]
    fn selection_follows_rows() {
        let mut list = loaded(3);
        list.select_next();
        list.select_next();
        list.select_next();
        assert_eq!(list.selected_item(), Some(&Row("c".into())));
        list.remove("c");
        assert_eq!(list.selected_item(), Some(&Row("b".into())));
        list.select_prev();
        list.select_prev();
        assert_eq!(list.selected(), 0);
    }

    #[test]
    fn patch_by_key() {
        let mut list = loaded(3);
        assert!(list.patch("a", |r| r.0 = "z".into()));
        assert!(!list.patch("missing", |_| {}));
        assert!(list.find("z").is_some());
    }
}
