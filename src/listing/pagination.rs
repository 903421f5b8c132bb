use crate::api::Meta;

/// Page/limit cursor plus the totals reported by the last response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pagination {
    pub page: u32,
    pub limit: u32,
    pub total: u64,
    pub total_pages: u32,
}

impl Pagination {
    pub fn new(limit: u32) -> Self {
        Self {
            page: 1,
            limit: limit.max(1),
            total: 0,
            total_pages: 1,
        }
    }

    /// 1-based inclusive row range of the current page; `(0, 0)` when empty.
    pub fn visible_range(&self) -> (u64, u64) {
        if self.total == 0 {
            return (0, 0);
        }
        let limit = self.limit as u64;
        let from = ((self.page.max(1) as u64 - 1) * limit + 1).min(self.total);
        let to = (self.page as u64 * limit).min(self.total);
        (from, to)
    }

    pub fn showing_label(&self) -> String {
        let (from, to) = self.visible_range();
        format!("Showing {}–{} of {}", from, to, self.total)
    }

    pub fn page_label(&self) -> String {
        format!("Page {} of {}", self.page, self.total_pages.max(1))
    }

    pub fn apply_meta(&mut self, meta: &Meta) {
        self.total = meta.total;
        self.total_pages = meta.pages_for(self.limit);
    }

    pub fn clamp(&self, page: u32) -> u32 {
        page.clamp(1, self.total_pages.max(1))
    }

    pub fn has_next(&self) -> bool {
        self.page < self.total_pages
    }

    pub fn has_prev(&self) -> bool {
        self.page > 1
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(page: u32, total: u64) -> Pagination {
        let mut p = Pagination::new(10);
        p.apply_meta(&Meta {
            total,
            ..Meta::default()
        });
        p.page = page;
        p
    }

    #[test]
    fn last_partial_page() {
        let p = at(3, 23);
        assert_eq!(p.total_pages, 3);
        assert_eq!(p.visible_range(), (21, 23));
        assert_eq!(p.showing_label(), "Showing 21–23 of 23");
        assert_eq!(p.page_label(), "Page 3 of 3");
        assert!(!p.has_next());
        assert!(p.has_prev());
    }

    #[test]
    fn empty_collection() {
        let p = at(1, 0);
        assert_eq!(p.showing_label(), "Showing 0–0 of 0");
        assert_eq!(p.page_label(), "Page 1 of 1");
        assert!(!p.has_next());
        assert!(!p.has_prev());
    }

    #[test]
    fn clamp_stays_in_bounds() {
        let p = at(1, 23);
        assert_eq!(p.clamp(0), 1);
        assert_eq!(p.clamp(9), 3);
        assert_eq!(p.clamp(2), 2);
    }
}
