//! Stateless table projection.
//!
//! A `TableView` borrows the records and query model owned by a page
//! controller and turns them into header labels and display rows. User
//! intents (sort, page, edit, delete) are emitted as `TableAction`s through
//! a callback; the view itself never mutates anything.

use crate::models::{format_release_date, Album, Music, RecordId, DEFAULT_COVER_IMAGE};
use crate::pagination::Pagination;
use crate::query::{clear_sort, toggle_sort, QueryChange, QueryParam, SortOrder};

/// Static description of one table column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Column {
    pub label: &'static str,
    /// Query key used to sort by this column, if sortable.
    pub sort_key: Option<&'static str>,
    /// Share of the table width, in percent.
    pub width_pct: u16,
}

impl Column {
    pub const fn fixed(label: &'static str, width_pct: u16) -> Self {
        Self {
            label,
            sort_key: None,
            width_pct,
        }
    }

    pub const fn sortable(label: &'static str, key: &'static str, width_pct: u16) -> Self {
        Self {
            label,
            sort_key: Some(key),
            width_pct,
        }
    }
}

pub const MUSIC_COLUMNS: &[Column] = &[
    Column::fixed("Cover", 15),
    Column::sortable("Title", "title", 30),
    Column::sortable("Album", "albumName", 15),
    Column::sortable("Artist", "artistName", 20),
    Column::sortable("Release Date", "releaseDate", 20),
];

pub const ALBUM_COLUMNS: &[Column] = &[
    Column::fixed("Cover", 15),
    Column::sortable("Name", "name", 30),
    Column::fixed("Description", 35),
    Column::sortable("Release Date", "releaseDate", 20),
];

/// Sortable keys of a column set, in column order.
pub fn sort_keys(columns: &[Column]) -> Vec<&'static str> {
    columns.iter().filter_map(|c| c.sort_key).collect()
}

/// A record that can be shown as a table row.
pub trait TableRecord {
    fn id(&self) -> RecordId;

    /// One display cell per column of the record's column set.
    fn cells(&self) -> Vec<String>;
}

/// Join related names with ", " and no trailing separator.
pub fn join_names<'a, I>(names: I) -> String
where
    I: IntoIterator<Item = &'a str>,
{
    names.into_iter().collect::<Vec<_>>().join(", ")
}

/// Last path segment of a cover reference, or the default cover's.
pub fn cover_label(cover: Option<&str>) -> String {
    let cover = cover.filter(|c| !c.is_empty()).unwrap_or(DEFAULT_COVER_IMAGE);
    cover
        .rsplit('/')
        .find(|segment| !segment.is_empty())
        .unwrap_or(cover)
        .to_string()
}

impl TableRecord for Music {
    fn id(&self) -> RecordId {
        self.id
    }

    fn cells(&self) -> Vec<String> {
        vec![
            cover_label(self.cover_image.as_deref()),
            self.title.clone(),
            join_names(self.albums.iter().map(|a| a.name.as_str())),
            self.singer
                .as_ref()
                .map(|s| s.display_name())
                .unwrap_or_default(),
            format_release_date(self.release_date.as_deref()),
        ]
    }
}

impl TableRecord for Album {
    fn id(&self) -> RecordId {
        self.id
    }

    fn cells(&self) -> Vec<String> {
        vec![
            cover_label(self.image.as_deref()),
            self.name.clone(),
            self.description.clone(),
            format_release_date(self.release_date.as_deref()),
        ]
    }
}

/// One projected row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisplayRow {
    pub id: RecordId,
    pub cells: Vec<String>,
}

/// Intent raised by the table for its owner to act on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TableAction {
    ChangeQuery(QueryChange),
    Edit(RecordId),
    Delete(RecordId),
}

/// Borrowed projection of a page's records.
pub struct TableView<'a, R> {
    columns: &'a [Column],
    records: &'a [R],
    query: &'a QueryParam,
    total_count: u32,
}

impl<'a, R: TableRecord> TableView<'a, R> {
    pub fn new(
        columns: &'a [Column],
        records: &'a [R],
        query: &'a QueryParam,
        total_count: u32,
    ) -> Self {
        Self {
            columns,
            records,
            query,
            total_count,
        }
    }

    pub fn columns(&self) -> &'a [Column] {
        self.columns
    }

    fn sort_of(&self, column: &Column) -> SortOrder {
        column
            .sort_key
            .and_then(|key| self.query.sort(key))
            .unwrap_or_default()
    }

    /// Header text with the sort arrow and the clear marker when sorted.
    pub fn header_labels(&self) -> Vec<String> {
        self.columns
            .iter()
            .map(|column| {
                let order = self.sort_of(column);
                if order.is_sorted() {
                    format!("{} {} ×", column.label, order.arrow())
                } else {
                    column.label.to_string()
                }
            })
            .collect()
    }

    pub fn rows(&self) -> Vec<DisplayRow> {
        self.records
            .iter()
            .map(|record| DisplayRow {
                id: record.id(),
                cells: record.cells(),
            })
            .collect()
    }

    pub fn row_count(&self) -> usize {
        self.records.len()
    }

    pub fn pagination(&self) -> Pagination {
        Pagination::new(self.query.page(), self.total_count)
    }

    /// Header click on column `col`. Non-sortable columns do nothing.
    pub fn toggle_column(&self, col: usize, emit: &mut impl FnMut(TableAction)) {
        if let Some(column) = self.columns.get(col) {
            if let Some(key) = column.sort_key {
                emit(TableAction::ChangeQuery(toggle_sort(
                    key,
                    self.sort_of(column),
                )));
            }
        }
    }

    /// Clear the sort on column `col`. Only offered while the column is sorted.
    pub fn clear_column(&self, col: usize, emit: &mut impl FnMut(TableAction)) {
        if let Some(column) = self.columns.get(col) {
            if let Some(key) = column.sort_key {
                if self.sort_of(column).is_sorted() {
                    emit(TableAction::ChangeQuery(clear_sort(key)));
                }
            }
        }
    }

    pub fn prev_page(&self, emit: &mut impl FnMut(TableAction)) {
        if let Some(change) = self.pagination().prev_page() {
            emit(TableAction::ChangeQuery(change));
        }
    }

    pub fn next_page(&self, emit: &mut impl FnMut(TableAction)) {
        if let Some(change) = self.pagination().next_page() {
            emit(TableAction::ChangeQuery(change));
        }
    }

    pub fn edit_row(&self, row: usize, emit: &mut impl FnMut(TableAction)) {
        if let Some(record) = self.records.get(row) {
            emit(TableAction::Edit(record.id()));
        }
    }

    pub fn delete_row(&self, row: usize, emit: &mut impl FnMut(TableAction)) {
        if let Some(record) = self.records.get(row) {
            emit(TableAction::Delete(record.id()));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cover_label() {
        assert_eq!(cover_label(Some("https://cdn/x/cover.jpg")), "cover.jpg");
        assert_eq!(cover_label(None), "default-cover.png");
        assert_eq!(cover_label(Some("")), "default-cover.png");
    }

    #[test]
    fn test_sort_keys_skip_fixed_columns() {
        assert_eq!(
            sort_keys(MUSIC_COLUMNS),
            vec!["title", "albumName", "artistName", "releaseDate"]
        );
        assert_eq!(sort_keys(ALBUM_COLUMNS), vec!["name", "releaseDate"]);
    }

    #[test]
    fn test_every_record_fills_every_column() {
        let music = Music {
            id: 1,
            title: "t".into(),
            cover_image: None,
            albums: vec![],
            singer: None,
            release_date: None,
        };
        assert_eq!(music.cells().len(), MUSIC_COLUMNS.len());

        let album = Album {
            id: 1,
            name: "n".into(),
            description: String::new(),
            image: None,
            release_date: None,
        };
        assert_eq!(album.cells().len(), ALBUM_COLUMNS.len());
    }
}
