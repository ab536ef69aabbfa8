//! Integration tests for the query model and the sort-toggle cycle.

use catalog_admin::query::{clear_sort, next_sort_value, toggle_sort, QueryChange, QueryParam, SortOrder};

#[test]
fn test_header_clicks_cycle_asc_desc_asc() {
    let mut query = QueryParam::new(&["title", "releaseDate"]);

    for expected in [SortOrder::Ascending, SortOrder::Descending, SortOrder::Ascending] {
        let current = query.sort("title").unwrap_or_default();
        assert!(query.apply(toggle_sort("title", current)), "Toggle should change the query");
        assert_eq!(query.sort("title"), Some(expected), "Unexpected sort after toggle");
    }
    assert_eq!(
        query.sort("releaseDate"),
        Some(SortOrder::Unsorted),
        "Other columns should be untouched"
    );
}

#[test]
fn test_clear_resets_single_column() {
    let mut query = QueryParam::new(&["name", "releaseDate"]);
    query.apply(toggle_sort("name", SortOrder::Unsorted));
    query.apply(toggle_sort("releaseDate", SortOrder::Unsorted));

    assert!(query.apply(clear_sort("name")), "Clearing a sorted column should change the query");
    assert_eq!(query.sort("name"), Some(SortOrder::Unsorted));
    assert_eq!(
        query.sort("releaseDate"),
        Some(SortOrder::Ascending),
        "Clearing one column must not touch another"
    );
    assert!(!query.apply(clear_sort("name")), "Clearing twice is a no-op");
}

#[test]
fn test_unrecognized_value_restarts_at_ascending() {
    assert_eq!(next_sort_value("sideways"), SortOrder::Ascending);
    assert_eq!(next_sort_value("DESC"), SortOrder::Ascending);
    assert_eq!(next_sort_value("ASC"), SortOrder::Descending);
}

#[test]
fn test_pairs_send_sorted_columns_in_column_order() {
    let mut query = QueryParam::new(&["title", "albumName", "artistName", "releaseDate"]);
    query.apply(QueryChange::Sort {
        key: "releaseDate",
        order: SortOrder::Descending,
    });
    query.apply(QueryChange::Sort {
        key: "title",
        order: SortOrder::Ascending,
    });
    query.apply(QueryChange::Page(3));

    assert_eq!(
        query.to_pairs(),
        vec![
            ("title".to_string(), "ASC".to_string()),
            ("releaseDate".to_string(), "DESC".to_string()),
            ("page".to_string(), "3".to_string()),
        ],
        "Unsorted columns are omitted and the page always goes last"
    );
}

#[test]
fn test_page_never_drops_below_one() {
    let mut query = QueryParam::new(&[]);
    assert!(!query.apply(QueryChange::Page(0)), "Page 0 clamps to the current page 1");
    assert_eq!(query.page(), 1);
}
