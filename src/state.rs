//! Application state types for the console.
//!
//! Contains the input mode and the pre-computed render data for a page, so
//! drawing never needs to borrow a controller.

use crate::models::RecordId;
use crate::notify::Severity;
use crate::table::DisplayRow;

/// Application mode for handling different input states.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AppMode {
    Normal,                  // Table navigation
    Form,                    // Add/edit detail view
    ConfirmDelete(RecordId), // 'd' pressed, waiting for y/n
    TokenInput,              // 't' pressed, entering an API token
}

/// Data needed to render one page.
#[derive(Debug, Clone)]
pub struct PageRenderData {
    /// Tab title
    pub name: String,
    /// Header labels including sort markers
    pub headers: Vec<String>,
    /// Column widths in percent
    pub widths: Vec<u16>,
    pub rows: Vec<DisplayRow>,
    /// "current / total"
    pub pagination_label: String,
    pub can_prev: bool,
    pub can_next: bool,
    /// True while any API call is in flight
    pub loading: bool,
    /// Cover upload percentage while a save is in flight
    pub upload_percent: Option<u8>,
    /// Newest live notification
    pub status: Option<(Severity, String)>,
    /// Present while the detail view is open
    pub detail: Option<DetailRenderData>,
}

/// Data needed to render the add/edit form.
#[derive(Debug, Clone)]
pub struct DetailRenderData {
    /// "Add Album" / "Edit Album"
    pub title: String,
    pub labels: Vec<&'static str>,
    pub placeholders: Vec<&'static str>,
    pub required: Vec<bool>,
    pub values: Vec<String>,
    pub file_input: String,
    /// Name of the file picked for upload, if any
    pub chosen_file: Option<String>,
    /// Current cover shown while editing
    pub uploaded_cover: String,
    pub focus: usize,
}
