//! Rendering functions for the terminal UI.
//!
//! Everything here draws from `PageRenderData`; no controller is borrowed
//! while a frame is being built.

use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Cell, Clear, Paragraph, Row, Table, TableState},
};

use crate::notify::Severity;
use crate::state::{AppMode, DetailRenderData, PageRenderData};
use crate::table::DisplayRow;
use crate::workspace::Workspace;

/// Build tab bar string for multi-tab display.
/// Format: "1:Music [2:Albums] | " with numbers matching keyboard shortcuts.
pub fn build_tab_bar(workspace: &Workspace) -> String {
    if workspace.tab_count() < 2 {
        return String::new();
    }
    let names: Vec<String> = workspace
        .tab_names()
        .iter()
        .enumerate()
        .map(|(i, name)| {
            if i == workspace.active_idx {
                format!("[{}:{}]", i + 1, name)
            } else {
                format!("{}:{}", i + 1, name)
            }
        })
        .collect();
    format!("{} | ", names.join(" "))
}

/// Build context-appropriate controls hint string.
pub fn build_controls_hint(mode: AppMode, tab_count: usize) -> String {
    match mode {
        AppMode::Normal => {
            let tab_controls = if tab_count > 1 { "Tab/1-9: page, " } else { "" };
            format!(
                "{}h/l: column, s: sort, x: clear sort, [/]: prev/next, a: add, e: edit, d: delete, r: reload, t: token, q: quit",
                tab_controls
            )
        }
        AppMode::Form => {
            "Tab/Up/Down: field, Ctrl+S: save, Enter on file: save, Esc: cancel".to_string()
        }
        AppMode::ConfirmDelete(_) => "y: delete, any other key: keep".to_string(),
        AppMode::TokenInput => "Enter: sign in (empty signs out), Esc: cancel".to_string(),
    }
}

/// Title line for a page: tab bar, page name, pager and loading marker.
/// A running upload shows its percentage instead of the plain marker.
pub fn build_page_title(tab_bar: &str, page: &PageRenderData) -> String {
    let prev = if page.can_prev { "◀ " } else { "  " };
    let next = if page.can_next { " ▶" } else { "  " };
    let loading = match (page.upload_percent, page.loading) {
        (Some(percent), _) => format!(" (uploading {}%)", percent),
        (None, true) => " (loading…)".to_string(),
        (None, false) => String::new(),
    };
    format!(
        " {}{} [{}{}{}]{} ",
        tab_bar, page.name, prev, page.pagination_label, next, loading
    )
}

fn severity_style(severity: Severity) -> Style {
    match severity {
        Severity::Success => Style::default().fg(Color::Green),
        Severity::Warning => Style::default().fg(Color::Yellow),
        Severity::Error => Style::default().fg(Color::Red),
    }
}

/// Render the record table of a page.
pub fn render_table(
    frame: &mut Frame,
    area: Rect,
    page: &PageRenderData,
    title: String,
    selected_col: usize,
    table_state: &mut TableState,
) {
    let header_cells: Vec<Cell> = page
        .headers
        .iter()
        .map(|h| Cell::from(h.as_str()).style(Style::default().add_modifier(Modifier::BOLD)))
        .collect();
    let header_row = Row::new(header_cells).style(Style::default().fg(Color::Yellow));

    let rows: Vec<Row> = page
        .rows
        .iter()
        .map(|row| Row::new(row.cells.iter().map(|c| Cell::from(c.as_str()))))
        .collect();

    let widths: Vec<Constraint> = page
        .widths
        .iter()
        .map(|w| Constraint::Percentage(*w))
        .collect();

    let table = Table::new(rows, widths)
        .header(header_row)
        .block(
            Block::default()
                .title(title)
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Yellow)),
        )
        .row_highlight_style(Style::default().add_modifier(Modifier::REVERSED))
        .column_highlight_style(Style::default().fg(Color::Cyan))
        .highlight_symbol(">> ");

    table_state.select_column(Some(selected_col));
    frame.render_stateful_widget(table, area, table_state);
}

/// Lines of the detail form, one per input plus the file input.
pub fn build_form_lines(detail: &DetailRenderData) -> Vec<Line<'static>> {
    let mut lines = Vec::new();
    for (idx, label) in detail.labels.iter().enumerate() {
        let focused = idx == detail.focus;
        let marker = if focused { "> " } else { "  " };
        let required = if detail.required.get(idx).copied().unwrap_or(false) {
            "*"
        } else {
            ""
        };
        let value = detail.values.get(idx).cloned().unwrap_or_default();
        let value_span = if value.is_empty() {
            Span::styled(
                detail.placeholders.get(idx).copied().unwrap_or("").to_string(),
                Style::default().fg(Color::DarkGray),
            )
        } else {
            Span::raw(value)
        };
        let label_style = if focused {
            Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)
        } else {
            Style::default()
        };
        lines.push(Line::from(vec![
            Span::raw(marker),
            Span::styled(format!("{}{}: ", label, required), label_style),
            value_span,
        ]));
    }

    let file_focused = detail.focus == detail.labels.len();
    let file_marker = if file_focused { "> " } else { "  " };
    let file_style = if file_focused {
        Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)
    } else {
        Style::default()
    };
    lines.push(Line::from(vec![
        Span::raw(file_marker),
        Span::styled("Cover Image File: ", file_style),
        Span::raw(detail.file_input.clone()),
    ]));

    let chosen = match (&detail.chosen_file, detail.uploaded_cover.is_empty()) {
        (Some(name), _) => format!("  Selected: {}", name),
        (None, false) => format!("  Current: {}", detail.uploaded_cover),
        (None, true) => "  No file selected".to_string(),
    };
    lines.push(Line::styled(chosen, Style::default().fg(Color::Gray)));
    lines
}

/// Render the add/edit form centered over `area`.
pub fn render_form(frame: &mut Frame, area: Rect, detail: &DetailRenderData) {
    let lines = build_form_lines(detail);
    let height = (lines.len() as u16 + 2).min(area.height);
    let vertical = Layout::vertical([
        Constraint::Fill(1),
        Constraint::Length(height),
        Constraint::Fill(1),
    ])
    .split(area);
    let horizontal = Layout::horizontal([
        Constraint::Fill(1),
        Constraint::Percentage(70),
        Constraint::Fill(1),
    ])
    .split(vertical[1]);

    let form = Paragraph::new(lines).block(
        Block::default()
            .title(format!(" {} ", detail.title))
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Cyan)),
    );
    frame.render_widget(Clear, horizontal[1]);
    frame.render_widget(form, horizontal[1]);
}

/// Render the bottom bar: the token prompt or delete prompt when active,
/// else the live notification, else the key hint.
pub fn render_status_bar(
    frame: &mut Frame,
    area: Rect,
    mode: AppMode,
    page: &PageRenderData,
    tab_count: usize,
    input_buffer: &str,
) {
    let (text, style) = match (&page.status, mode) {
        (_, AppMode::TokenInput) => (
            format!("Token: {}", "*".repeat(input_buffer.chars().count())),
            Style::default().fg(Color::Cyan),
        ),
        (_, AppMode::ConfirmDelete(id)) => (
            format!("Delete record {}? (y/N)", id),
            Style::default().fg(Color::Red),
        ),
        (Some((severity, message)), _) => (message.clone(), severity_style(*severity)),
        (None, _) => (
            build_controls_hint(mode, tab_count),
            Style::default().fg(Color::DarkGray),
        ),
    };
    let bar = Paragraph::new(text)
        .style(style)
        .block(Block::default().borders(Borders::ALL));
    frame.render_widget(bar, area);
}

/// Width of each column: the widest of its header and cells.
pub fn calculate_widths(headers: &[String], rows: &[DisplayRow]) -> Vec<usize> {
    let mut widths: Vec<usize> = headers.iter().map(|h| h.chars().count()).collect();
    for row in rows {
        for (i, cell) in row.cells.iter().enumerate() {
            if let Some(width) = widths.get_mut(i) {
                *width = (*width).max(cell.chars().count());
            }
        }
    }
    widths
}

/// Plain-text rendering of a page for non-interactive output.
pub fn format_plain_table(page: &PageRenderData) -> String {
    let widths = calculate_widths(&page.headers, &page.rows);
    let format_line = |cells: &[String]| -> String {
        cells
            .iter()
            .zip(&widths)
            .map(|(cell, width)| format!("{:<width$}", cell, width = *width))
            .collect::<Vec<_>>()
            .join(" | ")
            .trim_end()
            .to_string()
    };

    let mut out = String::new();
    out.push_str(&format_line(&page.headers));
    out.push('\n');
    let rule: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
    out.push_str(&rule.join("-+-"));
    out.push('\n');
    for row in &page.rows {
        out.push_str(&format_line(&row.cells));
        out.push('\n');
    }
    out.push_str(&format!("Page {}\n", page.pagination_label));
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn page() -> PageRenderData {
        PageRenderData {
            name: "Albums".to_string(),
            headers: vec!["Name ↑ ×".to_string()],
            widths: vec![100],
            rows: Vec::new(),
            pagination_label: "1 / 3".to_string(),
            can_prev: false,
            can_next: true,
            loading: true,
            upload_percent: None,
            status: None,
            detail: None,
        }
    }

    #[test]
    fn test_page_title_shows_pager_and_loading() {
        let title = build_page_title("", &page());
        assert_eq!(title, " Albums [  1 / 3 ▶] (loading…) ");
    }

    #[test]
    fn test_page_title_shows_upload_percentage() {
        let mut data = page();
        data.upload_percent = Some(42);
        let title = build_page_title("1:Music [2:Albums] | ", &data);
        assert_eq!(title, " 1:Music [2:Albums] | Albums [  1 / 3 ▶] (uploading 42%) ");
    }

    #[test]
    fn test_controls_hint_depends_on_mode() {
        assert!(build_controls_hint(AppMode::Normal, 2).starts_with("Tab/1-9"));
        assert!(!build_controls_hint(AppMode::Normal, 1).contains("Tab/1-9"));
        assert!(build_controls_hint(AppMode::Form, 1).contains("Esc: cancel"));
    }

    #[test]
    fn test_form_lines_show_placeholder_and_file() {
        let detail = DetailRenderData {
            title: "Add Album".to_string(),
            labels: vec!["Album Name", "Short Description"],
            placeholders: vec!["Enter Album Name", "Enter Short Description"],
            required: vec![true, true],
            values: vec!["Blue".to_string(), String::new()],
            file_input: "/tmp/c.png".to_string(),
            chosen_file: None,
            uploaded_cover: String::new(),
            focus: 2,
        };
        let lines = build_form_lines(&detail);
        assert_eq!(lines.len(), 4);
        let text: Vec<String> = lines.iter().map(|l| l.to_string()).collect();
        assert_eq!(text[0], "  Album Name*: Blue");
        assert_eq!(text[1], "  Short Description*: Enter Short Description");
        assert_eq!(text[2], "> Cover Image File: /tmp/c.png");
        assert_eq!(text[3], "  No file selected");
    }

    #[test]
    fn test_plain_table_pads_columns() {
        let mut data = page();
        data.headers = vec!["Name".to_string(), "Release Date".to_string()];
        data.rows = vec![DisplayRow {
            id: 7,
            cells: vec!["Blue Train".to_string(), "1958-01-01".to_string()],
        }];
        let text = format_plain_table(&data);
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "Name       | Release Date");
        assert_eq!(lines[1], "-----------+-------------");
        assert_eq!(lines[2], "Blue Train | 1958-01-01");
        assert_eq!(lines[3], "Page 1 / 3");
    }
}
