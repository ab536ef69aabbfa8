//! Query parameter model and the sort-toggle state machine.
//!
//! A `QueryParam` holds one sort value per sortable column plus the page
//! cursor. It is owned by a page controller and only changes through
//! `QueryParam::apply`; tables describe the change they want as a
//! `QueryChange` and hand it back up.

/// Sort direction for a single column.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SortOrder {
    #[default]
    Unsorted,
    Ascending,
    Descending,
}

impl SortOrder {
    /// Wire value sent to the API ("", "ASC" or "DESC").
    pub fn as_str(self) -> &'static str {
        match self {
            SortOrder::Unsorted => "",
            SortOrder::Ascending => "ASC",
            SortOrder::Descending => "DESC",
        }
    }

    /// Parse an exact wire value. Anything else is `None`.
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "" => Some(SortOrder::Unsorted),
            "ASC" => Some(SortOrder::Ascending),
            "DESC" => Some(SortOrder::Descending),
            _ => None,
        }
    }

    /// Next state in the header-click cycle.
    ///
    /// Unsorted only appears once: after the first click the column
    /// alternates between ascending and descending until cleared.
    pub fn next(self) -> Self {
        match self {
            SortOrder::Unsorted => SortOrder::Ascending,
            SortOrder::Ascending => SortOrder::Descending,
            SortOrder::Descending => SortOrder::Ascending,
        }
    }

    pub fn is_sorted(self) -> bool {
        self != SortOrder::Unsorted
    }

    /// Arrow shown next to a sorted header.
    pub fn arrow(self) -> &'static str {
        match self {
            SortOrder::Unsorted => "",
            SortOrder::Ascending => "↑",
            SortOrder::Descending => "↓",
        }
    }
}

/// Next sort value for a raw wire string. Unknown values restart at ascending.
pub fn next_sort_value(value: &str) -> SortOrder {
    SortOrder::parse(value)
        .map(SortOrder::next)
        .unwrap_or(SortOrder::Ascending)
}

/// A requested change to the query model.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum QueryChange {
    Sort { key: &'static str, order: SortOrder },
    Page(u32),
}

/// Change produced by clicking a column header.
pub fn toggle_sort(key: &'static str, current: SortOrder) -> QueryChange {
    QueryChange::Sort {
        key,
        order: current.next(),
    }
}

/// Change produced by the clear ("×") affordance.
pub fn clear_sort(key: &'static str) -> QueryChange {
    QueryChange::Sort {
        key,
        order: SortOrder::Unsorted,
    }
}

/// Sort and page selections driving a list request.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct QueryParam {
    sorts: Vec<(&'static str, SortOrder)>,
    page: u32,
}

impl QueryParam {
    /// Defaults for the given sortable keys: everything unsorted, page 1.
    pub fn new(sort_keys: &[&'static str]) -> Self {
        Self {
            sorts: sort_keys
                .iter()
                .map(|key| (*key, SortOrder::Unsorted))
                .collect(),
            page: 1,
        }
    }

    pub fn page(&self) -> u32 {
        self.page
    }

    /// Current sort for `key`, or `None` if the key is not sortable here.
    pub fn sort(&self, key: &str) -> Option<SortOrder> {
        self.sorts
            .iter()
            .find(|(k, _)| *k == key)
            .map(|(_, order)| *order)
    }

    /// All sortable keys with their current value, in column order.
    pub fn sorts(&self) -> &[(&'static str, SortOrder)] {
        &self.sorts
    }

    /// Sorted columns only, in column order. This order is the precedence
    /// sent to the API when more than one column is sorted.
    pub fn active_sorts(&self) -> impl Iterator<Item = (&'static str, SortOrder)> + '_ {
        self.sorts
            .iter()
            .filter(|(_, order)| order.is_sorted())
            .copied()
    }

    /// Apply a change. Returns true if the model actually changed.
    ///
    /// Unknown sort keys are ignored and pages below 1 clamp to 1.
    pub fn apply(&mut self, change: QueryChange) -> bool {
        match change {
            QueryChange::Sort { key, order } => {
                match self.sorts.iter_mut().find(|(k, _)| *k == key) {
                    Some((_, current)) if *current != order => {
                        *current = order;
                        true
                    }
                    _ => false,
                }
            }
            QueryChange::Page(page) => {
                let page = page.max(1);
                if self.page != page {
                    self.page = page;
                    true
                } else {
                    false
                }
            }
        }
    }

    /// Request query pairs: sorted columns first (column order), then the page.
    pub fn to_pairs(&self) -> Vec<(String, String)> {
        let mut pairs: Vec<(String, String)> = self
            .active_sorts()
            .map(|(key, order)| (key.to_string(), order.as_str().to_string()))
            .collect();
        pairs.push(("page".to_string(), self.page.to_string()));
        pairs
    }
}
