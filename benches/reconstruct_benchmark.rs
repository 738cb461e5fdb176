//! Benchmarks for row reconstruction and page parsing.
//!
//! Run with: cargo bench

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Document, Object};

use pdftables::{sort_into_rows, BBox, PdfTables, TextFragment, DEFAULT_TOLERANCE};

/// A `rows` x `cols` grid of cells, shuffled out of reading order.
fn grid(rows: usize, cols: usize) -> Vec<TextFragment> {
    let mut frags: Vec<TextFragment> = (0..rows)
        .flat_map(|r| {
            (0..cols).map(move |c| {
                let x0 = 40.0 + c as f32 * 60.0;
                let y0 = 780.0 - r as f32 * 14.0;
                TextFragment::new(format!("r{}c{}", r, c), BBox::new(x0, y0, x0 + 50.0, y0 + 10.0))
            })
        })
        .collect();
    // deterministic interleave
    let len = frags.len();
    for i in 0..len {
        frags.swap(i, (i * 7919) % len);
    }
    frags
}

/// A synthetic PDF of `pages` pages, each a 40 x 6 table.
fn create_test_pdf(pages: usize) -> Vec<u8> {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();
    let font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica",
    });

    let mut kids: Vec<Object> = Vec::new();
    for _ in 0..pages {
        let mut operations: Vec<Operation> = Vec::new();
        for r in 0..40i64 {
            for c in 0..6i64 {
                operations.extend([
                    Operation::new("BT", vec![]),
                    Operation::new("Tf", vec!["F1".into(), 9.into()]),
                    Operation::new("Td", vec![(40 + c * 90).into(), (760 - r * 18).into()]),
                    Operation::new("Tj", vec![Object::string_literal(format!("{}.{}", r, c))]),
                    Operation::new("ET", vec![]),
                ]);
            }
        }
        let data = Content { operations }.encode().unwrap_or_default();
        let content_id = doc.add_object(lopdf::Stream::new(dictionary! {}, data));
        kids.push(
            doc.add_object(dictionary! {
                "Type" => "Page",
                "Parent" => pages_id,
                "Contents" => content_id,
                "Resources" => dictionary! { "Font" => dictionary! { "F1" => font_id } },
            })
            .into(),
        );
    }

    let count = kids.len() as i64;
    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! { "Type" => "Pages", "Kids" => kids, "Count" => count }),
    );
    let catalog_id = doc.add_object(dictionary! { "Type" => "Catalog", "Pages" => pages_id });
    doc.trailer.set("Root", catalog_id);

    let mut buf = Vec::new();
    let _ = doc.save_to(&mut buf);
    buf
}

/// Benchmark row clustering at various sizes.
fn bench_sort_into_rows(c: &mut Criterion) {
    let mut group = c.benchmark_group("sort_into_rows");

    for (rows, cols) in [(10, 4), (50, 8), (200, 12)] {
        let frags = grid(rows, cols);
        group.bench_with_input(
            BenchmarkId::from_parameter(format!("{}x{}", rows, cols)),
            &frags,
            |b, frags| b.iter(|| sort_into_rows(black_box(frags.clone()), DEFAULT_TOLERANCE)),
        );
    }

    group.finish();
}

/// Benchmark the whole bytes-to-tables pipeline.
fn bench_extract_bytes(c: &mut Criterion) {
    let mut group = c.benchmark_group("extract_bytes");
    let extractor = PdfTables::new();

    for page_count in [1, 5, 10] {
        let data = create_test_pdf(page_count);
        group.bench_function(format!("{}_pages", page_count), |b| {
            b.iter(|| extractor.extract_bytes(black_box(&data)));
        });
    }

    group.finish();
}

criterion_group!(benches, bench_sort_into_rows, bench_extract_bytes);
criterion_main!(benches);
