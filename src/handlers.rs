//! Keyboard input handlers for the console.
//!
//! Contains handler functions for the different application modes and the
//! KeyAction enum describing what the main loop should do next.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::models::RecordId;
use crate::state::AppMode;
use crate::workspace::{Tab, TableIntent};

/// Result of handling a key event.
/// Tells the main loop what action to take after the handler returns.
#[derive(Debug, PartialEq, Eq)]
pub enum KeyAction {
    /// No action needed
    None,
    /// Exit the application
    Quit,
    /// Change input mode
    ModeChange(AppMode),
    /// Perform a workspace operation
    Workspace(WorkspaceOp),
}

/// Operations on the workspace that need to be performed in main.rs
/// (because they require mutable workspace access while we hold a tab borrow)
#[derive(Debug, PartialEq, Eq)]
pub enum WorkspaceOp {
    /// Switch to next tab
    NextTab,
    /// Switch to previous tab
    PrevTab,
    /// Switch to specific tab by index
    SwitchTo(usize),
}

/// Handle key events in normal (table) mode.
pub fn handle_normal_mode(key: &KeyEvent, tab: &mut Tab, tab_count: usize) -> KeyAction {
    let row_count = tab.page.row_count();
    match key.code {
        // Quit on 'q' or Ctrl+C
        KeyCode::Char('q') => KeyAction::Quit,
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => KeyAction::Quit,

        // Vertical navigation (bounded by row count)
        KeyCode::Char('j') | KeyCode::Down => {
            let selected = tab.selected_row();
            if selected + 1 < row_count {
                tab.table_state.select(Some(selected + 1));
            }
            KeyAction::None
        }
        KeyCode::Char('k') | KeyCode::Up => {
            let selected = tab.selected_row();
            if selected > 0 {
                tab.table_state.select(Some(selected - 1));
            }
            KeyAction::None
        }
        KeyCode::Char('g') | KeyCode::Home => {
            tab.table_state.select(Some(0));
            KeyAction::None
        }
        KeyCode::Char('G') | KeyCode::End => {
            tab.table_state.select(Some(row_count.saturating_sub(1)));
            KeyAction::None
        }

        // Column selection (sort target)
        KeyCode::Char('h') | KeyCode::Left => {
            tab.selected_col = tab.selected_col.saturating_sub(1);
            KeyAction::None
        }
        KeyCode::Char('l') | KeyCode::Right => {
            if tab.selected_col + 1 < tab.page.column_count() {
                tab.selected_col += 1;
            }
            KeyAction::None
        }

        // Sort toggle / clear on the selected column
        KeyCode::Char('s') | KeyCode::Enter => {
            tab.page.table_intent(TableIntent::ToggleSort(tab.selected_col));
            KeyAction::None
        }
        KeyCode::Char('x') => {
            tab.page.table_intent(TableIntent::ClearSort(tab.selected_col));
            KeyAction::None
        }

        // Pagination
        KeyCode::Char('[') | KeyCode::PageUp => {
            tab.page.table_intent(TableIntent::PrevPage);
            KeyAction::None
        }
        KeyCode::Char(']') | KeyCode::PageDown => {
            tab.page.table_intent(TableIntent::NextPage);
            KeyAction::None
        }

        KeyCode::Char('r') => {
            tab.page.refresh();
            KeyAction::None
        }

        // Sign in/out with a token
        KeyCode::Char('t') => KeyAction::ModeChange(AppMode::TokenInput),

        // Detail view
        KeyCode::Char('a') => {
            tab.page.open_add();
            KeyAction::ModeChange(AppMode::Form)
        }
        KeyCode::Char('e') => {
            tab.page.table_intent(TableIntent::Edit(tab.selected_row()));
            if tab.page.is_detail_open() {
                KeyAction::ModeChange(AppMode::Form)
            } else {
                KeyAction::None
            }
        }
        KeyCode::Char('d') => match tab.page.row_id(tab.selected_row()) {
            Some(id) => KeyAction::ModeChange(AppMode::ConfirmDelete(id)),
            None => KeyAction::None,
        },

        // Tab navigation
        KeyCode::Tab if tab_count > 1 => KeyAction::Workspace(WorkspaceOp::NextTab),
        KeyCode::BackTab if tab_count > 1 => KeyAction::Workspace(WorkspaceOp::PrevTab),

        // Direct tab selection with number keys 1-9
        KeyCode::Char(c @ '1'..='9') => {
            let idx = (c as usize) - ('1' as usize);
            if idx < tab_count {
                KeyAction::Workspace(WorkspaceOp::SwitchTo(idx))
            } else {
                KeyAction::None
            }
        }

        _ => KeyAction::None,
    }
}

/// Handle key events in the add/edit form.
///
/// Returns true when the form is done (saved or cancelled) and the app
/// should return to Normal mode.
pub fn handle_form_mode(key: &KeyEvent, tab: &mut Tab) -> bool {
    let page = &mut tab.page;
    match key.code {
        // Cancel and return to normal mode
        KeyCode::Esc => {
            page.cancel();
            true
        }

        // Save: Ctrl+S anywhere, or Enter on the file input
        KeyCode::Char('s') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            page.confirm();
            !page.is_detail_open()
        }
        KeyCode::Enter => {
            if page.form_mut().is_file_focused() {
                page.confirm();
                !page.is_detail_open()
            } else {
                page.form_mut().focus_next();
                false
            }
        }

        KeyCode::Tab | KeyCode::Down => {
            page.form_mut().focus_next();
            false
        }
        KeyCode::BackTab | KeyCode::Up => {
            page.form_mut().focus_prev();
            false
        }

        // Text input
        KeyCode::Char(c) => {
            page.form_mut().push_char(c);
            false
        }

        // Backspace
        KeyCode::Backspace => {
            page.form_mut().pop_char();
            false
        }

        _ => false,
    }
}

/// Handle the y/n prompt for deleting `id`.
///
/// Any key other than 'y' cancels. Always returns to Normal mode.
pub fn handle_confirm_delete(key: &KeyEvent, tab: &mut Tab, id: RecordId) {
    if let KeyCode::Char('y') | KeyCode::Char('Y') = key.code {
        tab.page.delete(id);
    }
}

/// Outcome of a key press in token input mode.
#[derive(Debug, PartialEq, Eq)]
pub enum TokenInput {
    /// Still typing
    Pending,
    /// Esc pressed
    Cancelled,
    /// Enter pressed; an empty token means sign out
    Submitted(String),
}

/// Handle key events in token input mode.
pub fn handle_token_input(key: &KeyEvent, input_buffer: &mut String) -> TokenInput {
    match key.code {
        // Cancel and return to normal mode
        KeyCode::Esc => {
            input_buffer.clear();
            TokenInput::Cancelled
        }

        KeyCode::Enter => {
            let token = input_buffer.trim().to_string();
            input_buffer.clear();
            TokenInput::Submitted(token)
        }

        // Text input
        KeyCode::Char(c) => {
            input_buffer.push(c);
            TokenInput::Pending
        }

        // Backspace
        KeyCode::Backspace => {
            input_buffer.pop();
            TokenInput::Pending
        }

        _ => TokenInput::Pending,
    }
}
