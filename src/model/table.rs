//! Table types.

use serde::{Deserialize, Serialize};

use super::{BBox, TextFragment};

/// A reconstructed table: the rows of one page, top to bottom.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Table {
    /// Page the rows were taken from (1-indexed)
    pub page_number: u32,

    /// Rows in reading order
    pub rows: Vec<Row>,
}

impl Table {
    /// Create a table for a page.
    pub fn new(page_number: u32, rows: Vec<Row>) -> Self {
        Self { page_number, rows }
    }

    /// Get the number of rows.
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Number of cells in the widest row.
    pub fn column_count(&self) -> usize {
        self.rows.iter().map(Row::len).max().unwrap_or(0)
    }

    /// Total number of fragments across all rows.
    pub fn fragment_count(&self) -> usize {
        self.rows.iter().map(Row::len).sum()
    }

    /// Check if the table is empty.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Fragments in row order.
    pub fn fragments(&self) -> impl Iterator<Item = &TextFragment> {
        self.rows.iter().flat_map(|r| r.fragments.iter())
    }

    /// Get plain text representation of the table.
    pub fn plain_text(&self) -> String {
        self.rows
            .iter()
            .map(|row| row.plain_text())
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// A table row: fragments whose lower Y bound fell within the tolerance band
/// of the row seed, ordered left to right.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Row {
    /// Lower Y bound of the fragment that started the row
    pub seed_y: f32,

    /// Fragments in the row
    pub fragments: Vec<TextFragment>,
}

impl Row {
    /// Start a row from its seed fragment.
    pub fn seeded(seed: TextFragment) -> Self {
        Self {
            seed_y: seed.y0(),
            fragments: vec![seed],
        }
    }

    pub fn len(&self) -> usize {
        self.fragments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fragments.is_empty()
    }

    /// Cell texts in order.
    pub fn cells(&self) -> Vec<&str> {
        self.fragments.iter().map(TextFragment::text).collect()
    }

    /// Union of the fragment boxes.
    pub fn bbox(&self) -> Option<BBox> {
        self.fragments
            .iter()
            .map(TextFragment::bbox)
            .reduce(|a, b| a.union(&b))
    }

    /// Get plain text representation.
    pub fn plain_text(&self) -> String {
        self.cells().join("\t")
    }
}
