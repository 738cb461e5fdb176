//! Output formats for fragments and reconstructed tables.

pub mod csv;
mod json;
mod text;

pub use self::csv::{to_csv, CsvLayout, TableWriter};
pub use json::{to_json, JsonFormat};
pub use text::to_text;
