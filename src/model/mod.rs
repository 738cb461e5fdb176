//! Data model: geometry, fragments, layout trees and tables.

mod fragment;
mod geometry;
mod layout;
mod metadata;
mod table;

pub use fragment::TextFragment;
pub use geometry::BBox;
pub use layout::{Figure, ImageBox, LayoutNode, PageLayout, TextBox};
pub use metadata::Metadata;
pub(crate) use metadata::parse_pdf_date;
pub use table::{Row, Table};
