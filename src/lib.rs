//! # pdftables
//!
//! Table extraction from PDF page geometry.
//!
//! Each page is turned into a layout tree of positioned text lines, text
//! boxes, figures and images. The tree is flattened into text fragments,
//! and the fragments are clustered into rows by their lower Y bound and
//! ordered left to right within each row.
//!
//! ## Quick Start
//!
//! ```no_run
//! use pdftables::{extract_tables, write_csv, CsvLayout, ParseOptions, TableOptions};
//!
//! fn main() -> pdftables::Result<()> {
//!     let tables = extract_tables("report.pdf", &ParseOptions::default(), &TableOptions::default())?;
//!     for table in &tables {
//!         println!("page {}: {} rows", table.page_number, table.row_count());
//!     }
//!     write_csv("report.csv", &tables, CsvLayout::Records)?;
//!     Ok(())
//! }
//! ```
//!
//! ## Pipeline
//!
//! - [`parser`]: lopdf-backed layout provider ([`PdfDocument`])
//! - [`extract`]: depth-first flattening of layout trees
//! - [`reconstruct`]: row clustering ([`TableReconstructor`])
//! - [`render`]: CSV, JSON and text output

pub mod error;
pub mod extract;
pub mod model;
pub mod parser;
pub mod reconstruct;
pub mod render;

// Re-export commonly used types
pub use error::{Error, Result};
pub use extract::PlainText;
pub use model::{
    BBox, Figure, ImageBox, LayoutNode, Metadata, PageLayout, Row, Table, TextBox, TextFragment,
};
pub use parser::{ErrorMode, Granularity, LayoutParams, PageSelection, ParseOptions, PdfDocument};
pub use reconstruct::{sort_into_rows, TableOptions, TableReconstructor, DEFAULT_TOLERANCE};
pub use render::{CsvLayout, JsonFormat, TableWriter};

use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

/// Open a PDF document with default options.
///
/// # Example
///
/// ```no_run
/// let doc = pdftables::open("report.pdf").unwrap();
/// println!("Pages: {}", doc.page_count());
/// ```
pub fn open<P: AsRef<Path>>(path: P) -> Result<PdfDocument> {
    PdfDocument::open(path)
}

/// Parse every page of a PDF file into layout trees.
pub fn parse_file<P: AsRef<Path>>(path: P) -> Result<Vec<PageLayout>> {
    PdfDocument::open(path)?.parse_pages()
}

/// Parse the selected pages of a PDF file with custom options.
///
/// # Example
///
/// ```no_run
/// use pdftables::{parse_file_with_options, PageSelection, ParseOptions};
///
/// let options = ParseOptions::new()
///     .lenient()
///     .with_pages(PageSelection::Range(1..=3));
/// let pages = parse_file_with_options("report.pdf", options).unwrap();
/// ```
pub fn parse_file_with_options<P: AsRef<Path>>(
    path: P,
    options: ParseOptions,
) -> Result<Vec<PageLayout>> {
    PdfDocument::open_with_options(path, options)?.parse_pages()
}

/// Flatten the selected pages of a PDF file into text fragments.
///
/// Returns `(page_number, fragments)` pairs in page order, fragments in
/// layout-tree order.
pub fn extract_page_fragments<P: AsRef<Path>>(
    path: P,
    options: &ParseOptions,
) -> Result<Vec<(u32, Vec<TextFragment>)>> {
    let pages = parse_file_with_options(path, options.clone())?;
    Ok(pages
        .iter()
        .map(|page| (page.number, extract::page_fragments(page)))
        .collect())
}

/// Reconstruct one table per selected page.
///
/// # Example
///
/// ```no_run
/// use pdftables::{extract_tables, ParseOptions, TableOptions};
///
/// let options = TableOptions::new().with_tolerance(0.05);
/// let tables = extract_tables("report.pdf", &ParseOptions::default(), &options).unwrap();
/// ```
pub fn extract_tables<P: AsRef<Path>>(
    path: P,
    parse_options: &ParseOptions,
    table_options: &TableOptions,
) -> Result<Vec<Table>> {
    let reconstructor = TableReconstructor::with_options(*table_options)?;
    let pages = parse_file_with_options(path, parse_options.clone())?;
    Ok(pages.iter().map(|page| reconstructor.reconstruct(page)).collect())
}

/// Write tables to a CSV file.
///
/// The file is created (or truncated) before any record is written, so a
/// failed run may leave a partial file behind.
pub fn write_csv<P: AsRef<Path>>(path: P, tables: &[Table], layout: CsvLayout) -> Result<()> {
    let file = File::create(path)?;
    let mut writer = TableWriter::new(BufWriter::new(file));
    for table in tables {
        writer.write_table(table, layout)?;
    }
    writer.flush()
}

/// Builder for the whole open, parse, reconstruct pipeline.
///
/// # Example
///
/// ```no_run
/// use pdftables::PdfTables;
///
/// let tables = PdfTables::new()
///     .with_tolerance(0.05)
///     .lenient()
///     .extract("report.pdf")?;
/// # Ok::<(), pdftables::Error>(())
/// ```
#[derive(Debug, Clone, Default)]
pub struct PdfTables {
    parse_options: ParseOptions,
    table_options: TableOptions,
}

impl PdfTables {
    /// Create a new builder with default options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Enable lenient parsing mode.
    pub fn lenient(mut self) -> Self {
        self.parse_options = self.parse_options.lenient();
        self
    }

    /// Set page selection.
    pub fn with_pages(mut self, pages: PageSelection) -> Self {
        self.parse_options = self.parse_options.with_pages(pages);
        self
    }

    /// Set layout granularity.
    pub fn with_granularity(mut self, granularity: Granularity) -> Self {
        self.parse_options = self.parse_options.with_granularity(granularity);
        self
    }

    /// Set the row tolerance fraction.
    pub fn with_tolerance(mut self, tolerance: f32) -> Self {
        self.table_options = self.table_options.with_tolerance(tolerance);
        self
    }

    /// Extract tables from a PDF file.
    pub fn extract<P: AsRef<Path>>(&self, path: P) -> Result<Vec<Table>> {
        extract_tables(path, &self.parse_options, &self.table_options)
    }

    /// Extract tables from PDF bytes.
    pub fn extract_bytes(&self, data: &[u8]) -> Result<Vec<Table>> {
        let reconstructor = TableReconstructor::with_options(self.table_options)?;
        let doc = PdfDocument::from_bytes_with_options(data, self.parse_options.clone())?;
        Ok(doc
            .parse_pages()?
            .iter()
            .map(|page| reconstructor.reconstruct(page))
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder() {
        let builder = PdfTables::new()
            .lenient()
            .with_tolerance(0.2)
            .with_granularity(Granularity::Boxes)
            .with_pages(PageSelection::Range(1..=2));

        assert_eq!(builder.parse_options.error_mode, ErrorMode::Lenient);
        assert_eq!(builder.parse_options.layout.granularity, Granularity::Boxes);
        assert_eq!(builder.table_options.tolerance, 0.2);
        assert!(!builder.parse_options.pages.includes(3));
    }

    #[test]
    fn test_builder_rejects_bad_tolerance_before_parsing() {
        let result = PdfTables::new().with_tolerance(-1.0).extract_bytes(b"not a pdf");
        assert!(matches!(result, Err(Error::InvalidTolerance(_))));
    }

    #[test]
    fn test_extract_bytes_unknown_magic() {
        let result = PdfTables::new().extract_bytes(&[0xFF, 0xFE, 0x00, 0x01]);
        assert!(matches!(result, Err(Error::UnknownFormat)));
    }

    #[test]
    fn test_open_missing_file() {
        assert!(matches!(open("/no/such/file.pdf"), Err(Error::Io(_))));
    }

    #[test]
    fn test_write_csv_creates_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.csv");
        let frag = TextFragment::new("x", BBox::new(1.0, 2.0, 3.0, 4.0));
        let tables = vec![Table::new(1, vec![Row::seeded(frag)])];

        write_csv(&path, &tables, CsvLayout::Records).unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "1,2,3,4,x\n");
    }
}
