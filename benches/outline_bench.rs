//! Benchmarks for heading extraction and scroll-sync lookup.
//!
//! Run with: `cargo bench --bench outline_bench`

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use docbridge::{extract, HeadingLocator, SnapshotView};

/// Generate editor markup of approximately `target_bytes`, with a heading
/// every few blocks.
fn generate_markup(target_bytes: usize) -> String {
    let paragraph = "<p>Lorem ipsum dolor sit amet, consectetur adipiscing elit. \
        Sed do eiusmod <strong>tempor</strong> incididunt ut labore et dolore magna aliqua.</p>\n";

    let table = "<table><tr><td>Cell</td><td>Value &amp; more</td></tr></table>\n";

    let mut html = String::with_capacity(target_bytes + 1024);
    let mut section = 0;

    while html.len() < target_bytes {
        if section % 4 == 0 {
            html.push_str(&format!("<h1>Chapter {section}</h1>\n"));
        } else {
            html.push_str(&format!("<h2 class=\"sub\">Section {section}</h2>\n"));
        }
        html.push_str(paragraph);
        html.push_str(table);
        html.push_str(paragraph);
        section += 1;
    }

    html
}

fn bench_extract(c: &mut Criterion) {
    let mut group = c.benchmark_group("extract");

    let sizes: &[(usize, &str)] = &[
        (1_024, "1KB"),
        (10_240, "10KB"),
        (51_200, "50KB"),
        (204_800, "200KB"),
    ];

    for &(size, label) in sizes {
        let html = generate_markup(size);

        group.throughput(Throughput::Bytes(html.len() as u64));
        group.bench_with_input(BenchmarkId::new("fresh", label), &html, |b, html| {
            b.iter(|| black_box(extract(black_box(html))));
        });

        // Markup that already carries ids, as re-sent by the editor
        let annotated = extract(&html).html_with_ids;
        group.bench_with_input(BenchmarkId::new("annotated", label), &annotated, |b, html| {
            b.iter(|| black_box(extract(black_box(html))));
        });
    }

    group.finish();
}

fn bench_locate(c: &mut Criterion) {
    let mut body = String::new();
    for i in 0..200 {
        body.push_str(&format!("<h2 data-top=\"{}\">Section {i}</h2><p>text</p>", i * 40));
    }
    let snapshot = format!(
        "<div class=\"a4-container\" data-top=\"0\" data-scroll-top=\"0\">\
         <div class=\"w-e-text-container\">{body}</div></div>"
    );
    let view = SnapshotView::parse(&snapshot);
    let locator = HeadingLocator::new();

    c.bench_function("locate_last_of_200", |b| {
        b.iter(|| black_box(locator.locate(&view, black_box("Section 199"))));
    });
}

criterion_group!(benches, bench_extract, bench_locate);
criterion_main!(benches);
