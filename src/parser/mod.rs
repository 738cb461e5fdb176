//! Layout provider: turns PDF pages into layout trees.

mod document;
mod interpreter;
mod layout;
mod objects;
mod options;
mod text;

pub use document::PdfDocument;
pub use options::{ErrorMode, Granularity, LayoutParams, PageSelection, ParseOptions};
