//! Prev/next pagination bounded by the last known page count.

use crate::query::QueryChange;

/// Snapshot of the pager: the stored page and the total page count.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Pagination {
    page: u32,
    total: u32,
}

impl Pagination {
    pub fn new(page: u32, total: u32) -> Self {
        Self { page, total }
    }

    pub fn total(&self) -> u32 {
        self.total
    }

    /// Page number shown to the user. An empty result shows 0 without
    /// touching the stored page.
    pub fn displayed_page(&self) -> u32 {
        if self.total > 0 {
            self.page
        } else {
            0
        }
    }

    pub fn can_prev(&self) -> bool {
        self.page > 1
    }

    pub fn can_next(&self) -> bool {
        self.page < self.total
    }

    /// Page change for the "Prev" affordance, if permitted.
    pub fn prev_page(&self) -> Option<QueryChange> {
        self.can_prev().then(|| QueryChange::Page(self.page - 1))
    }

    /// Page change for the "Next" affordance, if permitted.
    pub fn next_page(&self) -> Option<QueryChange> {
        self.can_next().then(|| QueryChange::Page(self.page + 1))
    }

    /// "current / total"
    pub fn label(&self) -> String {
        format!("{} / {}", self.displayed_page(), self.total)
    }
}
