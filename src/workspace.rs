//! Workspace module for managing page tabs.
//!
//! Each tab wraps one page controller behind the object-safe `ConsolePage`
//! trait, together with its own row/column selection.

use std::time::Instant;

use ratatui::widgets::TableState;

use crate::controller::PageController;
use crate::form::FormState;
use crate::models::RecordId;
use crate::resource::Resource;
use crate::session::SessionEvent;
use crate::state::{DetailRenderData, PageRenderData};
use crate::table::{TableAction, TableRecord};

/// Table interaction addressed by row/column position.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TableIntent {
    ToggleSort(usize),
    ClearSort(usize),
    PrevPage,
    NextPage,
    Edit(usize),
    Delete(usize),
}

/// What the shell needs from a page, independent of its record type.
pub trait ConsolePage {
    fn title(&self) -> &'static str;
    fn activate(&mut self);
    fn on_session_change(&mut self, event: SessionEvent);
    fn refresh(&mut self);
    fn pump(&mut self) -> bool;
    fn expire_notifications(&mut self, now: Instant);
    fn row_count(&self) -> usize;
    fn column_count(&self) -> usize;
    fn row_id(&self, row: usize) -> Option<RecordId>;
    /// Run an intent through the table view and act on what it emits.
    fn table_intent(&mut self, intent: TableIntent);
    fn delete(&mut self, id: RecordId);
    fn open_add(&mut self);
    fn is_detail_open(&self) -> bool;
    fn form_mut(&mut self) -> &mut FormState;
    fn confirm(&mut self) -> bool;
    fn cancel(&mut self);
    fn render_data(&self, now: Instant) -> PageRenderData;
}

impl<R: Resource> ConsolePage for PageController<R> {
    fn title(&self) -> &'static str {
        R::TITLE
    }

    fn activate(&mut self) {
        PageController::activate(self);
    }

    fn on_session_change(&mut self, event: SessionEvent) {
        PageController::on_session_change(self, event);
    }

    fn refresh(&mut self) {
        self.fetch();
    }

    fn pump(&mut self) -> bool {
        PageController::pump(self)
    }

    fn expire_notifications(&mut self, now: Instant) {
        PageController::expire_notifications(self, now);
    }

    fn row_count(&self) -> usize {
        self.records().len()
    }

    fn column_count(&self) -> usize {
        R::COLUMNS.len()
    }

    fn row_id(&self, row: usize) -> Option<RecordId> {
        self.records().get(row).map(TableRecord::id)
    }

    fn table_intent(&mut self, intent: TableIntent) {
        let mut actions: Vec<TableAction> = Vec::new();
        {
            let table = self.table();
            let mut emit = |action| actions.push(action);
            match intent {
                TableIntent::ToggleSort(col) => table.toggle_column(col, &mut emit),
                TableIntent::ClearSort(col) => table.clear_column(col, &mut emit),
                TableIntent::PrevPage => table.prev_page(&mut emit),
                TableIntent::NextPage => table.next_page(&mut emit),
                TableIntent::Edit(row) => table.edit_row(row, &mut emit),
                TableIntent::Delete(row) => table.delete_row(row, &mut emit),
            }
        }
        for action in actions {
            self.handle(action);
        }
    }

    fn delete(&mut self, id: RecordId) {
        PageController::delete(self, id);
    }

    fn open_add(&mut self) {
        PageController::open_add(self);
    }

    fn is_detail_open(&self) -> bool {
        PageController::is_detail_open(self)
    }

    fn form_mut(&mut self) -> &mut FormState {
        PageController::form_mut(self)
    }

    fn confirm(&mut self) -> bool {
        PageController::confirm(self)
    }

    fn cancel(&mut self) {
        PageController::cancel(self);
    }

    fn render_data(&self, now: Instant) -> PageRenderData {
        let table = self.table();
        let pager = table.pagination();
        let detail = self.is_detail_open().then(|| {
            let form = self.form();
            DetailRenderData {
                title: self.detail_title(),
                labels: form.specs().iter().map(|s| s.label).collect(),
                placeholders: form.specs().iter().map(|s| s.placeholder).collect(),
                required: form.specs().iter().map(|s| s.required).collect(),
                values: form.values().to_vec(),
                file_input: form.file_input().to_string(),
                chosen_file: self.chosen_file().map(|f| f.file_name()),
                uploaded_cover: self.uploaded_cover().to_string(),
                focus: form.focus(),
            }
        });
        PageRenderData {
            name: R::TITLE.to_string(),
            headers: table.header_labels(),
            widths: table.columns().iter().map(|c| c.width_pct).collect(),
            rows: table.rows(),
            pagination_label: pager.label(),
            can_prev: pager.can_prev(),
            can_next: pager.can_next(),
            loading: self.is_loading(),
            upload_percent: self.upload_percent(),
            status: self
                .toasts()
                .current(now)
                .map(|n| (n.severity, n.message.clone())),
            detail,
        }
    }
}

/// A single tab: one page and its selection state.
pub struct Tab {
    pub page: Box<dyn ConsolePage>,
    /// Row selection state
    pub table_state: TableState,
    /// Selected column index
    pub selected_col: usize,
}

impl Tab {
    pub fn new(page: Box<dyn ConsolePage>) -> Self {
        Self {
            page,
            table_state: TableState::default().with_selected(Some(0)),
            selected_col: 0,
        }
    }

    pub fn name(&self) -> &'static str {
        self.page.title()
    }

    /// Keep the selection inside the current rows after a reload.
    pub fn clamp_selection(&mut self) {
        let rows = self.page.row_count();
        let selected = self.table_state.selected().unwrap_or(0);
        self.table_state
            .select(Some(selected.min(rows.saturating_sub(1))));
        let cols = self.page.column_count();
        self.selected_col = self.selected_col.min(cols.saturating_sub(1));
    }

    pub fn selected_row(&self) -> usize {
        self.table_state.selected().unwrap_or(0)
    }
}

/// Workspace managing page tabs.
#[derive(Default)]
pub struct Workspace {
    /// Collection of tabs
    pub tabs: Vec<Tab>,
    /// Index of the currently active tab
    pub active_idx: usize,
}

impl Workspace {
    /// Create a new empty workspace.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a tab for `page`. Returns the index of the new tab.
    pub fn add_tab(&mut self, page: Box<dyn ConsolePage>) -> usize {
        self.tabs.push(Tab::new(page));
        self.tabs.len() - 1
    }

    /// Get a reference to the active tab, if any.
    pub fn active_tab(&self) -> Option<&Tab> {
        self.tabs.get(self.active_idx)
    }

    /// Get a mutable reference to the active tab, if any.
    pub fn active_tab_mut(&mut self) -> Option<&mut Tab> {
        self.tabs.get_mut(self.active_idx)
    }

    /// Switch to the tab at the given index.
    /// Index is clamped to valid range.
    pub fn switch_to(&mut self, idx: usize) {
        if !self.tabs.is_empty() {
            self.active_idx = idx.min(self.tabs.len() - 1);
        }
    }

    /// Switch to the next tab (wraps around).
    pub fn next_tab(&mut self) {
        if !self.tabs.is_empty() {
            self.active_idx = (self.active_idx + 1) % self.tabs.len();
        }
    }

    /// Switch to the previous tab (wraps around).
    pub fn prev_tab(&mut self) {
        if !self.tabs.is_empty() {
            if self.active_idx == 0 {
                self.active_idx = self.tabs.len() - 1;
            } else {
                self.active_idx -= 1;
            }
        }
    }

    /// Returns the number of tabs.
    pub fn tab_count(&self) -> usize {
        self.tabs.len()
    }

    /// Returns the names of all tabs (for rendering tab bar).
    pub fn tab_names(&self) -> Vec<&str> {
        self.tabs.iter().map(|t| t.name()).collect()
    }

    /// Initial load for every page.
    pub fn activate_all(&mut self) {
        for tab in &mut self.tabs {
            tab.page.activate();
        }
    }

    /// Deliver a session transition to every page.
    pub fn broadcast(&mut self, event: SessionEvent) {
        for tab in &mut self.tabs {
            tab.page.on_session_change(event);
        }
    }

    /// Apply finished calls on every page and expire old notifications.
    /// Returns true if any call finished.
    pub fn pump_all(&mut self, now: Instant) -> bool {
        let mut changed = false;
        for tab in &mut self.tabs {
            tab.page.expire_notifications(now);
            if tab.page.pump() {
                tab.clamp_selection();
                changed = true;
            }
        }
        changed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Minimal page used to exercise tab bookkeeping.
    struct StubPage {
        title: &'static str,
        rows: usize,
        form: FormState,
    }

    impl StubPage {
        fn boxed(title: &'static str, rows: usize) -> Box<dyn ConsolePage> {
            Box::new(Self {
                title,
                rows,
                form: FormState::new(&[]),
            })
        }
    }

    impl ConsolePage for StubPage {
        fn title(&self) -> &'static str {
            self.title
        }
        fn activate(&mut self) {}
        fn on_session_change(&mut self, _event: SessionEvent) {}
        fn refresh(&mut self) {}
        fn pump(&mut self) -> bool {
            false
        }
        fn expire_notifications(&mut self, _now: Instant) {}
        fn row_count(&self) -> usize {
            self.rows
        }
        fn column_count(&self) -> usize {
            3
        }
        fn row_id(&self, row: usize) -> Option<RecordId> {
            (row < self.rows).then_some(row as RecordId)
        }
        fn table_intent(&mut self, _intent: TableIntent) {}
        fn delete(&mut self, _id: RecordId) {}
        fn open_add(&mut self) {}
        fn is_detail_open(&self) -> bool {
            false
        }
        fn form_mut(&mut self) -> &mut FormState {
            &mut self.form
        }
        fn confirm(&mut self) -> bool {
            false
        }
        fn cancel(&mut self) {}
        fn render_data(&self, _now: Instant) -> PageRenderData {
            PageRenderData {
                name: self.title.to_string(),
                headers: Vec::new(),
                widths: Vec::new(),
                rows: Vec::new(),
                pagination_label: "0 / 0".to_string(),
                can_prev: false,
                can_next: false,
                loading: false,
                upload_percent: None,
                status: None,
                detail: None,
            }
        }
    }

    #[test]
    fn test_workspace_new() {
        let ws = Workspace::new();
        assert_eq!(ws.tab_count(), 0);
        assert!(ws.active_tab().is_none());
    }

    #[test]
    fn test_switch_tabs() {
        let mut ws = Workspace::new();
        ws.add_tab(StubPage::boxed("Music", 2));
        ws.add_tab(StubPage::boxed("Albums", 2));
        ws.add_tab(StubPage::boxed("Plans", 2));

        assert_eq!(ws.active_idx, 0);
        ws.next_tab();
        ws.next_tab();
        assert_eq!(ws.active_idx, 2);

        // Wrap around
        ws.next_tab();
        assert_eq!(ws.active_idx, 0);

        ws.prev_tab();
        assert_eq!(ws.active_idx, 2);

        // Clamp to valid range
        ws.switch_to(100);
        assert_eq!(ws.active_idx, 2);
        assert_eq!(ws.tab_names(), vec!["Music", "Albums", "Plans"]);
    }

    #[test]
    fn test_clamp_selection_after_shrink() {
        let mut tab = Tab::new(StubPage::boxed("Music", 2));
        tab.table_state.select(Some(9));
        tab.selected_col = 7;
        tab.clamp_selection();
        assert_eq!(tab.selected_row(), 1);
        assert_eq!(tab.selected_col, 2);
    }

    #[test]
    fn test_clamp_selection_empty_page() {
        let mut tab = Tab::new(StubPage::boxed("Music", 0));
        tab.table_state.select(Some(3));
        tab.clamp_selection();
        assert_eq!(tab.selected_row(), 0);
    }
}
