//! Content stream interpretation.
//!
//! Walks the operators of a page (or form) content stream and records every
//! text-showing operation as a positioned span, every image placement, and
//! every form XObject as a nested item list. Positions are in default user
//! space: text space is mapped through the text matrix and the CTM.

use lopdf::content::Content;
use lopdf::{Dictionary, Document as LopdfDocument, Object, ObjectId};

use crate::error::{Error, Result};
use crate::model::{BBox, ImageBox};

use super::objects::{as_array, as_dict, dict_get, get_number, get_rect, inherited};
use super::text::{decode_text_fallback, is_spaceless_script_char};

/// Form XObjects nested deeper than this are not entered.
const MAX_FORM_DEPTH: usize = 32;

/// Glyph box relative to the baseline, in units of font size.
const ASCENT: f32 = 0.8;
const DESCENT: f32 = 0.2;

/// `TJ` adjustments beyond this (thousandths of an em) read as a word break.
const TJ_SPACE_THRESHOLD: f32 = 200.0;

/// One text-showing operation.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct TextSpan {
    pub text: String,
    pub bbox: BBox,
}

/// Something painted by a content stream, in stream order.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum ContentItem {
    Span(TextSpan),
    Form {
        name: String,
        bbox: Option<BBox>,
        items: Vec<ContentItem>,
    },
    Image(ImageBox),
}

/// A PDF transformation matrix `[a b c d e f]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct Matrix {
    a: f32,
    b: f32,
    c: f32,
    d: f32,
    e: f32,
    f: f32,
}

impl Default for Matrix {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Matrix {
    pub const IDENTITY: Matrix = Matrix::new(1.0, 0.0, 0.0, 1.0, 0.0, 0.0);

    pub const fn new(a: f32, b: f32, c: f32, d: f32, e: f32, f: f32) -> Self {
        Self { a, b, c, d, e, f }
    }

    pub const fn translation(tx: f32, ty: f32) -> Self {
        Self::new(1.0, 0.0, 0.0, 1.0, tx, ty)
    }

    fn from_operands(operands: &[Object]) -> Option<Self> {
        if operands.len() < 6 {
            return None;
        }
        let n: Vec<f32> = operands[..6].iter().filter_map(get_number).collect();
        (n.len() == 6).then(|| Self::new(n[0], n[1], n[2], n[3], n[4], n[5]))
    }

    /// `self × other`: apply `self` first, then `other`.
    pub fn concat(&self, other: &Matrix) -> Matrix {
        Matrix::new(
            self.a * other.a + self.b * other.c,
            self.a * other.b + self.b * other.d,
            self.c * other.a + self.d * other.c,
            self.c * other.b + self.d * other.d,
            self.e * other.a + self.f * other.c + other.e,
            self.e * other.b + self.f * other.d + other.f,
        )
    }

    pub fn apply(&self, x: f32, y: f32) -> (f32, f32) {
        (
            self.a * x + self.c * y + self.e,
            self.b * x + self.d * y + self.f,
        )
    }

    /// Bounding box of a rectangle after transformation.
    pub fn transform_rect(&self, x0: f32, y0: f32, x1: f32, y1: f32) -> BBox {
        let corners = [(x0, y0), (x1, y0), (x0, y1), (x1, y1)].map(|(x, y)| self.apply(x, y));
        BBox::from_points(corners).unwrap_or_default()
    }
}

/// Glyph advance widths of a font, in thousandths of an em.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct FontMetrics {
    first_char: u32,
    widths: Vec<f32>,
    default_width: f32,
    two_byte: bool,
}

impl Default for FontMetrics {
    fn default() -> Self {
        Self {
            first_char: 0,
            widths: Vec::new(),
            default_width: 500.0,
            two_byte: false,
        }
    }
}

impl FontMetrics {
    fn from_font(doc: &LopdfDocument, font: &Dictionary) -> Self {
        let subtype = font.get(b"Subtype").and_then(Object::as_name).unwrap_or(b"");

        if subtype == b"Type0" {
            let default_width = dict_get(doc, font, b"DescendantFonts")
                .and_then(|d| as_array(doc, d))
                .and_then(|arr| arr.first())
                .and_then(|d| as_dict(doc, d))
                .and_then(|d| dict_get(doc, d, b"DW"))
                .and_then(get_number)
                .unwrap_or(1000.0);
            return Self {
                default_width,
                two_byte: true,
                ..Self::default()
            };
        }

        let first_char = dict_get(doc, font, b"FirstChar")
            .and_then(get_number)
            .unwrap_or(0.0) as u32;
        let widths: Vec<f32> = dict_get(doc, font, b"Widths")
            .and_then(|w| as_array(doc, w))
            .map(|arr| arr.iter().filter_map(get_number).collect())
            .unwrap_or_default();
        let missing = dict_get(doc, font, b"FontDescriptor")
            .and_then(|fd| as_dict(doc, fd))
            .and_then(|fd| dict_get(doc, fd, b"MissingWidth"))
            .and_then(get_number)
            .filter(|w| *w > 0.0);

        Self {
            first_char,
            default_width: missing.unwrap_or(500.0),
            widths,
            two_byte: false,
        }
    }

    fn code_width(&self, code: u32) -> f32 {
        code.checked_sub(self.first_char)
            .and_then(|i| self.widths.get(i as usize))
            .copied()
            .unwrap_or(self.default_width)
    }

    /// Total width (thousandths of an em), glyph count and single-byte space
    /// count of a string operand.
    fn measure(&self, bytes: &[u8]) -> (f32, usize, usize) {
        if self.two_byte {
            let glyphs = bytes.len().div_ceil(2);
            return (glyphs as f32 * self.default_width, glyphs, 0);
        }
        let width = bytes.iter().map(|&b| self.code_width(u32::from(b))).sum();
        let spaces = bytes.iter().filter(|&&b| b == b' ').count();
        (width, bytes.len(), spaces)
    }
}

/// Graphics state saved by `q` and restored by `Q`.
#[derive(Debug, Clone)]
struct GraphicsState<'a> {
    ctm: Matrix,
    font: Option<&'a Dictionary>,
    metrics: FontMetrics,
    font_size: f32,
    char_spacing: f32,
    word_spacing: f32,
    horizontal_scale: f32,
    leading: f32,
}

impl GraphicsState<'_> {
    fn new(ctm: Matrix) -> Self {
        Self {
            ctm,
            font: None,
            metrics: FontMetrics::default(),
            font_size: 12.0,
            char_spacing: 0.0,
            word_spacing: 0.0,
            horizontal_scale: 1.0,
            leading: 0.0,
        }
    }
}

/// Text object state between `BT` and `ET`.
#[derive(Debug, Clone, Copy, Default)]
struct TextObject {
    tm: Matrix,
    tlm: Matrix,
}

impl TextObject {
    fn move_line(&mut self, tx: f32, ty: f32) {
        self.tlm = Matrix::translation(tx, ty).concat(&self.tlm);
        self.tm = self.tlm;
    }
}

/// Interprets content streams of one document.
pub(crate) struct ContentInterpreter<'a> {
    doc: &'a LopdfDocument,
}

impl<'a> ContentInterpreter<'a> {
    pub fn new(doc: &'a LopdfDocument) -> Self {
        Self { doc }
    }

    /// Interpret the content of a page.
    pub fn run_page(&self, page_id: ObjectId) -> Result<Vec<ContentItem>> {
        let content = self.page_content(page_id)?;
        let resources = inherited(self.doc, page_id, b"Resources").and_then(|r| as_dict(self.doc, r));
        self.run(&content, resources, Matrix::IDENTITY, 0)
    }

    /// Concatenated, decompressed content streams of a page.
    fn page_content(&self, page_id: ObjectId) -> Result<Vec<u8>> {
        let page_dict = self.doc.get_dictionary(page_id)?;

        let Ok(contents) = page_dict.get(b"Contents") else {
            return Ok(Vec::new());
        };

        let refs: Vec<&Object> = match contents {
            Object::Array(arr) => arr.iter().collect(),
            other => match as_array(self.doc, other) {
                Some(arr) => arr.iter().collect(),
                None => vec![other],
            },
        };

        let mut content = Vec::new();
        for obj in refs {
            let Ok(id) = obj.as_reference() else { continue };
            match self.doc.get_object(id) {
                Ok(Object::Stream(s)) => {
                    let data = s.decompressed_content().unwrap_or_else(|_| s.content.clone());
                    content.extend_from_slice(&data);
                    content.push(b'\n');
                }
                _ => return Err(Error::PdfParse(format!("Invalid content stream {:?}", id))),
            }
        }
        Ok(content)
    }

    fn run(
        &self,
        content: &[u8],
        resources: Option<&'a Dictionary>,
        ctm: Matrix,
        depth: usize,
    ) -> Result<Vec<ContentItem>> {
        let content = Content::decode(content).map_err(|e| Error::PdfParse(e.to_string()))?;

        let mut items = Vec::new();
        let mut gs = GraphicsState::new(ctm);
        let mut stack: Vec<GraphicsState<'a>> = Vec::new();
        let mut text = TextObject::default();

        for op in &content.operations {
            let operands = op.operands.as_slice();
            let num = |i: usize| operands.get(i).and_then(get_number);

            match op.operator.as_str() {
                "q" => stack.push(gs.clone()),
                "Q" => match stack.pop() {
                    Some(saved) => gs = saved,
                    None => log::debug!("Unbalanced Q operator"),
                },
                "cm" => {
                    if let Some(m) = Matrix::from_operands(operands) {
                        gs.ctm = m.concat(&gs.ctm);
                    }
                }
                "BT" => text = TextObject::default(),
                "ET" => {}
                "Tf" => {
                    if let Some(Object::Name(name)) = operands.first() {
                        gs.font = self.font(resources, name);
                        gs.metrics = gs
                            .font
                            .map(|f| FontMetrics::from_font(self.doc, f))
                            .unwrap_or_default();
                    }
                    gs.font_size = num(1).unwrap_or(gs.font_size);
                }
                "Tc" => gs.char_spacing = num(0).unwrap_or(0.0),
                "Tw" => gs.word_spacing = num(0).unwrap_or(0.0),
                "Tz" => gs.horizontal_scale = num(0).unwrap_or(100.0) / 100.0,
                "TL" => gs.leading = num(0).unwrap_or(0.0),
                "Td" => text.move_line(num(0).unwrap_or(0.0), num(1).unwrap_or(0.0)),
                "TD" => {
                    let ty = num(1).unwrap_or(0.0);
                    gs.leading = -ty;
                    text.move_line(num(0).unwrap_or(0.0), ty);
                }
                "Tm" => {
                    if let Some(m) = Matrix::from_operands(operands) {
                        text.tm = m;
                        text.tlm = m;
                    }
                }
                "T*" => text.move_line(0.0, -gs.leading),
                "Tj" => {
                    if let Some(s @ Object::String(..)) = operands.first() {
                        self.push_span(&mut items, &gs, &mut text, std::slice::from_ref(s));
                    }
                }
                "TJ" => {
                    if let Some(Object::Array(arr)) = operands.first() {
                        self.push_span(&mut items, &gs, &mut text, arr);
                    }
                }
                "'" | "\"" => {
                    if op.operator == "\"" {
                        gs.word_spacing = num(0).unwrap_or(gs.word_spacing);
                        gs.char_spacing = num(1).unwrap_or(gs.char_spacing);
                    }
                    text.move_line(0.0, -gs.leading);
                    let idx = if op.operator == "\"" { 2 } else { 0 };
                    if let Some(s @ Object::String(..)) = operands.get(idx) {
                        self.push_span(&mut items, &gs, &mut text, std::slice::from_ref(s));
                    }
                }
                "Do" => {
                    if let Some(Object::Name(name)) = operands.first() {
                        if let Some(item) = self.xobject(resources, name, &gs, depth)? {
                            items.push(item);
                        }
                    }
                }
                _ => {}
            }
        }

        Ok(items)
    }

    /// Show the strings of a `Tj`/`TJ`/`'`/`"` operation and record a span.
    fn push_span(
        &self,
        items: &mut Vec<ContentItem>,
        gs: &GraphicsState<'a>,
        text: &mut TextObject,
        pieces: &[Object],
    ) {
        let encoding = gs.font.and_then(|f| f.get_font_encoding(self.doc).ok());
        let size = gs.font_size;
        let hscale = gs.horizontal_scale;

        let mut combined = String::new();
        let mut bbox: Option<BBox> = None;

        for piece in pieces {
            match piece {
                Object::String(bytes, _) => {
                    let decoded = match encoding {
                        Some(ref enc) => LopdfDocument::decode_text(enc, bytes)
                            .unwrap_or_else(|_| decode_text_fallback(bytes)),
                        None => decode_text_fallback(bytes),
                    };

                    let (width, glyphs, spaces) = gs.metrics.measure(bytes);
                    let tx = (width / 1000.0 * size
                        + gs.char_spacing * glyphs as f32
                        + gs.word_spacing * spaces as f32)
                        * hscale;

                    let trm = text.tm.concat(&gs.ctm);
                    let glyph_box = trm.transform_rect(0.0, -DESCENT * size, tx, ASCENT * size);
                    if !decoded.trim().is_empty() {
                        bbox = Some(bbox.map_or(glyph_box, |b| b.union(&glyph_box)));
                    }
                    combined.push_str(&decoded);
                    text.tm = Matrix::translation(tx, 0.0).concat(&text.tm);
                }
                other => {
                    let Some(adjust) = get_number(other) else { continue };
                    text.tm = Matrix::translation(-adjust / 1000.0 * size * hscale, 0.0)
                        .concat(&text.tm);
                    if -adjust > TJ_SPACE_THRESHOLD {
                        let breaks_word = combined
                            .chars()
                            .last()
                            .is_some_and(|c| !c.is_whitespace() && !is_spaceless_script_char(c));
                        if breaks_word {
                            combined.push(' ');
                        }
                    }
                }
            }
        }

        let trimmed = combined.trim();
        if let (false, Some(bbox)) = (trimmed.is_empty(), bbox) {
            items.push(ContentItem::Span(TextSpan {
                text: trimmed.to_string(),
                bbox,
            }));
        }
    }

    fn font(&self, resources: Option<&'a Dictionary>, name: &[u8]) -> Option<&'a Dictionary> {
        let fonts = dict_get(self.doc, resources?, b"Font").and_then(|f| as_dict(self.doc, f))?;
        dict_get(self.doc, fonts, name).and_then(|f| as_dict(self.doc, f))
    }

    /// Handle a `Do` operation: recurse into forms, place images.
    fn xobject(
        &self,
        resources: Option<&'a Dictionary>,
        name: &[u8],
        gs: &GraphicsState<'a>,
        depth: usize,
    ) -> Result<Option<ContentItem>> {
        let display = String::from_utf8_lossy(name).to_string();
        let stream = resources
            .and_then(|r| dict_get(self.doc, r, b"XObject"))
            .and_then(|x| as_dict(self.doc, x))
            .and_then(|x| dict_get(self.doc, x, name));
        let Some(Object::Stream(stream)) = stream else {
            log::warn!("XObject /{} not found in resources", display);
            return Ok(None);
        };

        let subtype = stream.dict.get(b"Subtype").and_then(Object::as_name).unwrap_or(b"");
        match subtype {
            b"Form" => {
                if depth >= MAX_FORM_DEPTH {
                    log::warn!("Form XObject /{} nested too deep, skipped", display);
                    return Ok(None);
                }
                let matrix = stream
                    .dict
                    .get(b"Matrix")
                    .ok()
                    .and_then(|m| as_array(self.doc, m))
                    .and_then(|m| Matrix::from_operands(m))
                    .unwrap_or_default();
                let ctm = matrix.concat(&gs.ctm);
                let form_resources = dict_get(self.doc, &stream.dict, b"Resources")
                    .and_then(|r| as_dict(self.doc, r))
                    .or(resources);
                let bbox = stream
                    .dict
                    .get(b"BBox")
                    .ok()
                    .and_then(|b| get_rect(self.doc, b))
                    .map(|[x0, y0, x1, y1]| ctm.transform_rect(x0, y0, x1, y1));

                let data = stream
                    .decompressed_content()
                    .unwrap_or_else(|_| stream.content.clone());
                let items = self.run(&data, form_resources, ctm, depth + 1)?;

                Ok(Some(ContentItem::Form {
                    name: display,
                    bbox,
                    items,
                }))
            }
            b"Image" => {
                let dim = |key: &[u8]| {
                    stream
                        .dict
                        .get(key)
                        .ok()
                        .and_then(|v| v.as_i64().ok())
                        .and_then(|v| u32::try_from(v).ok())
                };
                Ok(Some(ContentItem::Image(ImageBox {
                    bbox: gs.ctm.transform_rect(0.0, 0.0, 1.0, 1.0),
                    width: dim(b"Width"),
                    height: dim(b"Height"),
                    name: display,
                })))
            }
            other => {
                log::warn!(
                    "Unsupported XObject subtype /{} for /{}",
                    String::from_utf8_lossy(other),
                    display
                );
                Ok(None)
            }
        }
    }
}
