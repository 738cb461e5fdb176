//! PDF document handle backed by lopdf.

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use lopdf::Document as LopdfDocument;

use crate::error::{Error, Result};
use crate::model::{parse_pdf_date, Metadata, PageLayout};

use super::interpreter::ContentInterpreter;
use super::layout::LayoutAnalyzer;
use super::objects::{dict_get, get_rect, inherited};
use super::options::{ErrorMode, ParseOptions};

/// PDF magic bytes: %PDF-
const PDF_MAGIC: &[u8] = b"%PDF-";

/// US Letter, used when a page declares no usable MediaBox.
const DEFAULT_PAGE_SIZE: (f32, f32) = (612.0, 792.0);

/// An open PDF document.
pub struct PdfDocument {
    doc: LopdfDocument,
    options: ParseOptions,
}

impl PdfDocument {
    /// Open a PDF file.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::open_with_options(path, ParseOptions::default())
    }

    /// Open a PDF file with custom options.
    pub fn open_with_options<P: AsRef<Path>>(path: P, options: ParseOptions) -> Result<Self> {
        let path = path.as_ref();

        let mut header = Vec::with_capacity(16);
        BufReader::new(File::open(path)?)
            .take(16)
            .read_to_end(&mut header)?;
        check_header(&header)?;

        let doc = LopdfDocument::load(path)?;
        log::debug!("Opened {} ({} pages)", path.display(), doc.get_pages().len());
        Ok(Self { doc, options })
    }

    /// Load a PDF from bytes.
    pub fn from_bytes(data: &[u8]) -> Result<Self> {
        Self::from_bytes_with_options(data, ParseOptions::default())
    }

    /// Load a PDF from bytes with custom options.
    pub fn from_bytes_with_options(data: &[u8], options: ParseOptions) -> Result<Self> {
        check_header(data)?;
        let doc = LopdfDocument::load_mem(data)?;
        Ok(Self { doc, options })
    }

    /// Load a PDF from a reader.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        Self::from_reader_with_options(reader, ParseOptions::default())
    }

    /// Load a PDF from a reader with custom options.
    pub fn from_reader_with_options<R: Read>(mut reader: R, options: ParseOptions) -> Result<Self> {
        let mut data = Vec::new();
        reader.read_to_end(&mut data)?;
        Self::from_bytes_with_options(&data, options)
    }

    pub fn options(&self) -> &ParseOptions {
        &self.options
    }

    /// Get the number of pages.
    pub fn page_count(&self) -> u32 {
        self.doc.get_pages().len() as u32
    }

    /// Check if the document is encrypted.
    pub fn is_encrypted(&self) -> bool {
        self.doc.is_encrypted()
    }

    /// Get PDF version.
    pub fn version(&self) -> String {
        self.doc.version.to_string()
    }

    /// Read the document information dictionary.
    pub fn metadata(&self) -> Metadata {
        let mut metadata = Metadata::with_version(self.version());
        metadata.page_count = self.page_count();
        metadata.encrypted = self.is_encrypted();

        let info = self
            .doc
            .trailer
            .get(b"Info")
            .ok()
            .and_then(|i| i.as_reference().ok())
            .and_then(|id| self.doc.get_dictionary(id).ok());

        if let Some(info) = info {
            let field = |key: &[u8]| dict_get(&self.doc, info, key).and_then(pdf_string);
            metadata.title = field(b"Title");
            metadata.author = field(b"Author");
            metadata.creator = field(b"Creator");
            metadata.producer = field(b"Producer");
            metadata.created = field(b"CreationDate").and_then(|d| parse_pdf_date(&d));
            metadata.modified = field(b"ModDate").and_then(|d| parse_pdf_date(&d));
        }

        metadata
    }

    /// Parse the layout tree of one page (1-indexed).
    ///
    /// Ignores the page selection. In lenient mode a page whose content
    /// cannot be decoded comes back empty instead of failing.
    pub fn parse_page(&self, page_num: u32) -> Result<PageLayout> {
        let pages = self.doc.get_pages();
        let page_id = *pages
            .get(&page_num)
            .ok_or(Error::PageOutOfRange(page_num, pages.len() as u32))?;

        let (width, height) = inherited(&self.doc, page_id, b"MediaBox")
            .and_then(|mb| get_rect(&self.doc, mb))
            .map(|[x0, y0, x1, y1]| (x1 - x0, y1 - y0))
            .unwrap_or(DEFAULT_PAGE_SIZE);
        let mut page = PageLayout::new(page_num, width, height);

        match ContentInterpreter::new(&self.doc).run_page(page_id) {
            Ok(items) => {
                page.children = LayoutAnalyzer::new(self.options.layout).analyze(items);
            }
            Err(e) if self.options.error_mode == ErrorMode::Lenient => {
                log::warn!("Skipping content of page {}: {}", page_num, e);
            }
            Err(e) => return Err(e),
        }

        Ok(page)
    }

    /// Parse every selected page, in page order.
    pub fn parse_pages(&self) -> Result<Vec<PageLayout>> {
        self.doc
            .get_pages()
            .into_keys()
            .filter(|n| self.options.pages.includes(*n))
            .map(|n| self.parse_page(n))
            .collect()
    }
}

/// Verify the `%PDF-x.y` header.
fn check_header(data: &[u8]) -> Result<()> {
    let rest = data.strip_prefix(PDF_MAGIC).ok_or(Error::UnknownFormat)?;
    let version = rest.get(..3).ok_or(Error::UnknownFormat)?;

    match version {
        [major, b'.', minor] if major.is_ascii_digit() && minor.is_ascii_digit() => Ok(()),
        _ => Err(Error::UnsupportedVersion(
            String::from_utf8_lossy(version).to_string(),
        )),
    }
}

/// Decode a PDF text string (UTF-16BE with BOM, else PDFDocEncoding-ish).
fn pdf_string(obj: &lopdf::Object) -> Option<String> {
    match obj {
        lopdf::Object::String(bytes, _) => Some(super::text::decode_text_fallback(bytes)),
        lopdf::Object::Name(bytes) => Some(String::from_utf8_lossy(bytes).to_string()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_check_header() {
        assert!(check_header(b"%PDF-1.7\n%\xe2\xe3\xcf\xd3").is_ok());
        assert!(check_header(b"%PDF-2.0").is_ok());
        assert!(matches!(check_header(b"<!DOCTYPE html>"), Err(Error::UnknownFormat)));
        assert!(matches!(check_header(b"%PDF"), Err(Error::UnknownFormat)));
        assert!(matches!(
            check_header(b"%PDF-x.y"),
            Err(Error::UnsupportedVersion(v)) if v == "x.y"
        ));
    }

    #[test]
    fn test_from_bytes_rejects_non_pdf() {
        assert!(matches!(
            PdfDocument::from_bytes(b"hello world, not a pdf"),
            Err(Error::UnknownFormat)
        ));
    }

    #[test]
    fn test_open_missing_file() {
        let result = PdfDocument::open("/nonexistent/definitely/missing.pdf");
        assert!(matches!(result, Err(Error::Io(_))));
    }
}
