//! Plain text rendering of reconstructed tables.

use crate::model::Table;

/// Render tables as tab-separated rows, one blank line between pages.
pub fn to_text(tables: &[Table]) -> String {
    tables
        .iter()
        .filter(|t| !t.is_empty())
        .map(Table::plain_text)
        .collect::<Vec<_>>()
        .join("\n\n")
}
