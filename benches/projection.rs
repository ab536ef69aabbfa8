use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use catalog_admin::models::{AlbumRef, Music, Singer};
use catalog_admin::query::{QueryChange, QueryParam, SortOrder};
use catalog_admin::render::{calculate_widths, format_plain_table};
use catalog_admin::state::PageRenderData;
use catalog_admin::table::{sort_keys, TableView, MUSIC_COLUMNS};

/// Music records with a few albums each and mixed date formats.
fn create_records(num_rows: usize) -> Vec<Music> {
    (1..=num_rows)
        .map(|i| Music {
            id: i as u64,
            title: format!("Track {}", i),
            cover_image: (i % 3 != 0).then(|| format!("/uploads/cover_{}.png", i)),
            albums: (0..i % 4)
                .map(|a| AlbumRef {
                    id: Some(a as u64),
                    name: format!("Album {}", a),
                })
                .collect(),
            singer: Some(Singer {
                first_name: Some(format!("First{}", i)),
                last_name: (i % 2 == 0).then(|| format!("Last{}", i)),
            }),
            release_date: Some(if i % 2 == 0 {
                "2021-06-01T12:30:00Z".to_string()
            } else {
                "2019-02-03".to_string()
            }),
        })
        .collect()
}

fn sorted_query() -> QueryParam {
    let mut query = QueryParam::new(&sort_keys(MUSIC_COLUMNS));
    query.apply(QueryChange::Sort {
        key: "title",
        order: SortOrder::Ascending,
    });
    query
}

/// Benchmark projecting records into display rows (date parsing, name joins).
fn bench_table_rows(c: &mut Criterion) {
    let mut group = c.benchmark_group("table_rows");
    let query = sorted_query();

    for num_rows in [10, 100, 1_000, 10_000] {
        let records = create_records(num_rows);

        group.bench_with_input(BenchmarkId::new("rows", num_rows), &records, |b, records| {
            b.iter(|| {
                let view = TableView::new(MUSIC_COLUMNS, black_box(records), &query, 5);
                black_box((view.header_labels(), view.rows()))
            });
        });
    }

    group.finish();
}

/// Benchmark width calculation and plain-text output used by `catadm list`.
fn bench_plain_output(c: &mut Criterion) {
    let mut group = c.benchmark_group("plain_output");
    let query = sorted_query();

    for num_rows in [100, 1_000, 10_000] {
        let records = create_records(num_rows);
        let view = TableView::new(MUSIC_COLUMNS, &records, &query, 5);
        let page = PageRenderData {
            name: "Music".to_string(),
            headers: view.header_labels(),
            widths: MUSIC_COLUMNS.iter().map(|c| c.width_pct).collect(),
            rows: view.rows(),
            pagination_label: view.pagination().label(),
            can_prev: false,
            can_next: true,
            loading: false,
            upload_percent: None,
            status: None,
            detail: None,
        };

        group.bench_with_input(BenchmarkId::new("widths", num_rows), &page, |b, page| {
            b.iter(|| black_box(calculate_widths(&page.headers, black_box(&page.rows))));
        });
        group.bench_with_input(BenchmarkId::new("format", num_rows), &page, |b, page| {
            b.iter(|| black_box(format_plain_table(black_box(page))));
        });
    }

    group.finish();
}

criterion_group!(benches, bench_table_rows, bench_plain_output);
criterion_main!(benches);
