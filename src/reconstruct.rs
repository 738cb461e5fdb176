//! Row and column reconstruction from positioned fragments.
//!
//! Fragments are sorted by their lower Y bound, highest first, and swept
//! once. A fragment joins the current row when its Y lies strictly inside
//! `(seed_y * (1 - tolerance), seed_y * (1 + tolerance))`, otherwise it seeds
//! a new row. Each row is then sorted left to right by `x0`.
//!
//! The band is multiplicative: it widens with distance from the origin and
//! collapses to nothing for a seed at `y0 == 0`. For a negative seed the lower
//! bound exceeds the upper one, so such a seed never absorbs another fragment.
//! Existing outputs depend on this arithmetic, so it is kept as is.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::model::{PageLayout, Row, Table, TextFragment};

/// Default row tolerance (10%).
pub const DEFAULT_TOLERANCE: f32 = 0.1;

/// Options for row reconstruction.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TableOptions {
    /// Fraction of the row seed's Y used as the grouping band
    pub tolerance: f32,
}

impl TableOptions {
    /// Create options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the row tolerance fraction.
    pub fn with_tolerance(mut self, tolerance: f32) -> Self {
        self.tolerance = tolerance;
        self
    }

    /// Reject tolerances that cannot describe a band.
    pub fn validate(&self) -> Result<()> {
        if self.tolerance.is_finite() && self.tolerance >= 0.0 {
            Ok(())
        } else {
            Err(Error::InvalidTolerance(self.tolerance))
        }
    }
}

impl Default for TableOptions {
    fn default() -> Self {
        Self {
            tolerance: DEFAULT_TOLERANCE,
        }
    }
}

/// Cluster fragments into rows.
///
/// Rows come out top to bottom in the order of the descending Y sort, and
/// every input fragment lands in exactly one row. Fragments with equal keys
/// keep their input order. An empty input yields no rows.
pub fn sort_into_rows(fragments: Vec<TextFragment>, tolerance: f32) -> Vec<Row> {
    let mut sorted = fragments;
    sorted.sort_by(|a, b| descending(a.y0(), b.y0()));

    let lower = 1.0 - tolerance;
    let upper = 1.0 + tolerance;

    let mut rows = sorted.into_iter().fold(Vec::<Row>::new(), |mut rows, frag| {
        match rows.last_mut() {
            Some(row) if row.seed_y * lower < frag.y0() && frag.y0() < row.seed_y * upper => {
                row.fragments.push(frag);
            }
            _ => rows.push(Row::seeded(frag)),
        }
        rows
    });

    for row in &mut rows {
        row.fragments.sort_by(|a, b| ascending(a.x0(), b.x0()));
    }

    rows
}

// Total order: NaN sorts above every number, so it leads the descending
// sort and seeds rows of its own.
fn descending(a: f32, b: f32) -> Ordering {
    b.total_cmp(&a)
}

fn ascending(a: f32, b: f32) -> Ordering {
    a.total_cmp(&b)
}

/// Reconstructs tables from page layouts.
#[derive(Debug, Clone, Default)]
pub struct TableReconstructor {
    options: TableOptions,
}

impl TableReconstructor {
    /// Create a reconstructor with default options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a reconstructor with validated options.
    pub fn with_options(options: TableOptions) -> Result<Self> {
        options.validate()?;
        Ok(Self { options })
    }

    pub fn options(&self) -> &TableOptions {
        &self.options
    }

    /// Cluster a fragment sequence into rows.
    pub fn rows(&self, fragments: Vec<TextFragment>) -> Vec<Row> {
        sort_into_rows(fragments, self.options.tolerance)
    }

    /// Reconstruct the table of one page.
    pub fn reconstruct(&self, page: &PageLayout) -> Table {
        let fragments = crate::extract::page_fragments(page);
        let count = fragments.len();
        let rows = self.rows(fragments);

        log::debug!(
            "Page {}: {} fragments into {} rows (tolerance {})",
            page.number,
            count,
            rows.len(),
            self.options.tolerance
        );

        Table::new(page.number, rows)
    }
}
