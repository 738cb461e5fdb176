//! Parsing options and configuration.

use std::ops::RangeInclusive;

use crate::error::{Error, Result};

/// Options for parsing PDF documents into page layouts.
#[derive(Debug, Clone, Default)]
pub struct ParseOptions {
    /// Error handling mode
    pub error_mode: ErrorMode,

    /// Page selection (which pages to parse)
    pub pages: PageSelection,

    /// Layout analysis parameters
    pub layout: LayoutParams,
}

impl ParseOptions {
    /// Create new parse options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set error mode.
    pub fn with_error_mode(mut self, mode: ErrorMode) -> Self {
        self.error_mode = mode;
        self
    }

    /// Enable lenient mode (pages that fail to decode come back empty).
    pub fn lenient(mut self) -> Self {
        self.error_mode = ErrorMode::Lenient;
        self
    }

    /// Set page selection.
    pub fn with_pages(mut self, pages: PageSelection) -> Self {
        self.pages = pages;
        self
    }

    /// Set layout analysis parameters.
    pub fn with_layout(mut self, layout: LayoutParams) -> Self {
        self.layout = layout;
        self
    }

    /// Set the granularity of top-level text nodes.
    pub fn with_granularity(mut self, granularity: Granularity) -> Self {
        self.layout.granularity = granularity;
        self
    }
}

/// Error handling mode during parsing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ErrorMode {
    /// Fail on any error
    #[default]
    Strict,
    /// Skip undecodable page content and continue
    Lenient,
}

/// Which text nodes the layout analyzer emits at page level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Granularity {
    /// Emit every text line on its own
    #[default]
    Lines,
    /// Group lines into text boxes
    Boxes,
}

/// Layout analysis thresholds, all relative to glyph height.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LayoutParams {
    /// Minimum vertical overlap (fraction of the smaller height) for two
    /// spans to share a line
    pub line_overlap: f32,

    /// Maximum horizontal gap between spans of one line
    pub char_margin: f32,

    /// Maximum vertical gap between lines of one box
    pub line_margin: f32,

    /// Top-level text node granularity
    pub granularity: Granularity,
}

impl Default for LayoutParams {
    fn default() -> Self {
        Self {
            line_overlap: 0.5,
            char_margin: 2.0,
            line_margin: 0.5,
            granularity: Granularity::Lines,
        }
    }
}

/// Page selection.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum PageSelection {
    /// All pages
    #[default]
    All,
    /// A range of pages (inclusive, 1-indexed)
    Range(RangeInclusive<u32>),
    /// Specific pages (1-indexed, sorted, no duplicates)
    Pages(Vec<u32>),
    /// Disjoint ranges in ascending order, as parsed from a comma list
    Ranges(Vec<RangeInclusive<u32>>),
}

impl PageSelection {
    /// Check if a page number should be included.
    pub fn includes(&self, page: u32) -> bool {
        match self {
            PageSelection::All => true,
            PageSelection::Range(range) => range.contains(&page),
            PageSelection::Pages(pages) => pages.binary_search(&page).is_ok(),
            PageSelection::Ranges(ranges) => ranges.iter().any(|r| r.contains(&page)),
        }
    }

    /// Parse a page selection string (e.g., "1-10", "1,3,5,7-10", "all").
    pub fn parse(s: &str) -> Result<Self> {
        let s = s.trim();
        if s.is_empty() || s.eq_ignore_ascii_case("all") {
            return Ok(PageSelection::All);
        }

        if !s.contains(',') {
            if let Some((start, end)) = s.split_once('-') {
                let (start, end) = (page_number(start, s)?, page_number(end, s)?);
                return Ok(PageSelection::Range(ordered(start, end, s)?));
            }
        }

        let mut ranges = Vec::new();
        for part in s.split(',') {
            let range = match part.split_once('-') {
                Some((start, end)) => ordered(page_number(start, s)?, page_number(end, s)?, s)?,
                None => {
                    let n = page_number(part, s)?;
                    n..=n
                }
            };
            ranges.push(range);
        }
        Ok(PageSelection::Ranges(merge(ranges)))
    }
}

/// Sort ranges and join the ones that overlap or touch.
fn merge(mut ranges: Vec<RangeInclusive<u32>>) -> Vec<RangeInclusive<u32>> {
    ranges.sort_by_key(|r| *r.start());
    let mut merged: Vec<RangeInclusive<u32>> = Vec::with_capacity(ranges.len());
    for range in ranges {
        match merged.last_mut() {
            Some(last) if *range.start() <= last.end().saturating_add(1) => {
                let end = (*last.end()).max(*range.end());
                *last = *last.start()..=end;
            }
            _ => merged.push(range),
        }
    }
    merged
}

fn page_number(part: &str, whole: &str) -> Result<u32> {
    match part.trim().parse::<u32>() {
        Ok(0) | Err(_) => Err(Error::InvalidPageRange(whole.to_string())),
        Ok(n) => Ok(n),
    }
}

fn ordered(start: u32, end: u32, whole: &str) -> Result<RangeInclusive<u32>> {
    if start > end {
        return Err(Error::InvalidPageRange(whole.to_string()));
    }
    Ok(start..=end)
}
