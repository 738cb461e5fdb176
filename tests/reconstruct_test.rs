//! Row reconstruction properties.

use std::cmp::Ordering;

use pdftables::{sort_into_rows, BBox, Row, TextFragment, DEFAULT_TOLERANCE};

fn frag(text: &str, x0: f32, y0: f32) -> TextFragment {
    TextFragment::new(text, BBox::new(x0, y0, x0 + 40.0, y0 + 12.0))
}

fn cells(rows: &[Row]) -> Vec<Vec<&str>> {
    rows.iter().map(Row::cells).collect()
}

/// Deterministic scatter of fragments over a page.
fn scattered(n: usize) -> Vec<TextFragment> {
    let mut state: u32 = 0x2545_f491;
    let mut next = move || {
        state ^= state << 13;
        state ^= state >> 17;
        state ^= state << 5;
        state
    };
    (0..n)
        .map(|i| {
            let x = (next() % 550) as f32;
            let y = (next() % 780) as f32;
            frag(&format!("f{}", i), x, y)
        })
        .collect()
}

#[test]
fn test_every_fragment_lands_in_exactly_one_row() {
    for tolerance in [0.0, 0.01, DEFAULT_TOLERANCE, 0.5] {
        let input = scattered(300);
        let rows = sort_into_rows(input.clone(), tolerance);

        let mut out: Vec<&str> = rows.iter().flat_map(Row::cells).collect();
        let mut expected: Vec<&str> = input.iter().map(TextFragment::text).collect();
        out.sort_unstable();
        expected.sort_unstable();
        assert_eq!(out, expected, "tolerance {}", tolerance);
        assert!(rows.iter().all(|r| !r.is_empty()));
    }
}

#[test]
fn test_rows_are_ordered_left_to_right() {
    let rows = sort_into_rows(scattered(300), DEFAULT_TOLERANCE);
    for row in &rows {
        assert!(row.fragments.windows(2).all(|w| w[0].x0() <= w[1].x0()));
    }
}

#[test]
fn test_row_seeds_are_non_increasing() {
    let rows = sort_into_rows(scattered(300), DEFAULT_TOLERANCE);
    assert!(rows.windows(2).all(|w| w[0].seed_y >= w[1].seed_y));
}

#[test]
fn test_nan_coordinates_keep_rows_ordered() {
    let input: Vec<TextFragment> = scattered(200)
        .into_iter()
        .enumerate()
        .map(|(i, f)| {
            if i % 3 == 0 {
                frag(f.text(), f.x0(), f32::NAN)
            } else {
                f
            }
        })
        .collect();
    let rows = sort_into_rows(input, DEFAULT_TOLERANCE);

    assert_eq!(rows.iter().map(Row::len).sum::<usize>(), 200);
    assert!(rows
        .windows(2)
        .all(|w| w[0].seed_y.total_cmp(&w[1].seed_y) != Ordering::Less));
    for row in rows.iter().filter(|r| r.seed_y.is_nan()) {
        assert_eq!(row.len(), 1);
    }
}

#[test]
fn test_seed_is_highest_fragment_of_its_row() {
    let rows = sort_into_rows(scattered(300), DEFAULT_TOLERANCE);
    for row in &rows {
        assert!(row.fragments.iter().all(|f| f.y0() <= row.seed_y));
    }
}

#[test]
fn test_tolerance_boundary() {
    // 109 seeds the row and 100 lies inside (98.1, 119.9).
    let same = sort_into_rows(vec![frag("a", 0.0, 100.0), frag("b", 50.0, 109.0)], 0.1);
    assert_eq!(cells(&same), vec![vec!["a", "b"]]);
    assert_eq!(same[0].seed_y, 109.0);

    // Seed 100: the band is (90, 110).
    let inside = sort_into_rows(vec![frag("a", 0.0, 100.0), frag("b", 50.0, 90.5)], 0.1);
    assert_eq!(inside.len(), 1);

    let outside = sort_into_rows(vec![frag("a", 0.0, 100.0), frag("b", 50.0, 89.5)], 0.1);
    assert_eq!(cells(&outside), vec![vec!["a"], vec!["b"]]);
}

#[test]
fn test_zero_seed_absorbs_nothing() {
    let rows = sort_into_rows(
        vec![frag("zero", 0.0, 0.0), frag("near", 10.0, 0.0), frag("neg", 20.0, -0.5)],
        DEFAULT_TOLERANCE,
    );
    assert_eq!(rows.len(), 3);
    assert_eq!(rows[0].seed_y, 0.0);
    assert_eq!(rows[0].len(), 1);
}

#[test]
fn test_empty_input_yields_no_rows() {
    assert!(sort_into_rows(Vec::new(), DEFAULT_TOLERANCE).is_empty());
}

#[test]
fn test_band_widens_away_from_origin() {
    // 20pt apart: one row near the top of the page, two rows near the bottom.
    let top = sort_into_rows(vec![frag("a", 0.0, 700.0), frag("b", 0.0, 680.0)], 0.1);
    let bottom = sort_into_rows(vec![frag("a", 0.0, 100.0), frag("b", 0.0, 80.0)], 0.1);
    assert_eq!(top.len(), 1);
    assert_eq!(bottom.len(), 2);
}
