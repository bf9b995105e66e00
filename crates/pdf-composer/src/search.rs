//! Positioned text extraction and exact-substring search on a page.
//!
//! The content stream is interpreted just far enough to know where every glyph of a
//! simple font is drawn. Glyphs are grouped into lines by baseline, and each line keeps one
//! box per character so a match can be mapped back to a rectangle in user space.
//! Composite (Type0) fonts are skipped.

use crate::error::ComposerError;
use crate::pages::{inherited_attribute, number, resolve};
use log::trace;
use lopdf::content::Content;
use lopdf::{Dictionary, Document, Object, ObjectId};
use prepender_types::{encoding, Rect, StandardFont};
use std::collections::HashMap;

const DEFAULT_GLYPH_WIDTH: f32 = 500.0;
/// Fraction of the font size below the baseline covered by a glyph box.
const DESCENT: f32 = 0.2;
/// Fraction of the font size a gap must exceed to count as a word break.
const WORD_GAP: f32 = 0.15;

type Matrix = [f32; 6];

const IDENTITY: Matrix = [1.0, 0.0, 0.0, 1.0, 0.0, 0.0];

fn multiply(m: &Matrix, n: &Matrix) -> Matrix {
    [
        m[0] * n[0] + m[1] * n[2],
        m[0] * n[1] + m[1] * n[3],
        m[2] * n[0] + m[3] * n[2],
        m[2] * n[1] + m[3] * n[3],
        m[4] * n[0] + m[5] * n[2] + n[4],
        m[4] * n[1] + m[5] * n[3] + n[5],
    ]
}

fn translate(tx: f32, ty: f32) -> Matrix {
    [1.0, 0.0, 0.0, 1.0, tx, ty]
}

#[derive(Debug, Clone)]
enum FontWidths {
    Table {
        first_char: u32,
        widths: Vec<f32>,
        missing: f32,
    },
    Standard(StandardFont),
    Unknown,
}

#[derive(Debug, Clone)]
struct FontInfo {
    widths: FontWidths,
    composite: bool,
}

impl FontInfo {
    fn width(&self, code: u8) -> f32 {
        match &self.widths {
            FontWidths::Table {
                first_char,
                widths,
                missing,
            } => (code as u32)
                .checked_sub(*first_char)
                .and_then(|i| widths.get(i as usize).copied())
                .unwrap_or(*missing),
            FontWidths::Standard(font) => font.width(code) as f32,
            FontWidths::Unknown => DEFAULT_GLYPH_WIDTH,
        }
    }
}

fn load_font(doc: &Document, font: &Dictionary) -> FontInfo {
    let subtype = font.get(b"Subtype").and_then(|s| s.as_name()).unwrap_or(b"");
    if subtype == b"Type0" {
        return FontInfo {
            widths: FontWidths::Unknown,
            composite: true,
        };
    }

    let table = font.get(b"Widths").ok().and_then(|w| {
        let arr = resolve(doc, w).ok()?.as_array().ok()?;
        let widths = arr
            .iter()
            .map(|v| resolve(doc, v).ok().and_then(number).unwrap_or(0.0))
            .collect::<Vec<_>>();
        let first_char = font
            .get(b"FirstChar")
            .ok()
            .and_then(number)
            .unwrap_or(0.0) as u32;
        Some((first_char, widths))
    });
    let base_font = font
        .get(b"BaseFont")
        .and_then(|b| b.as_name())
        .map(|b| String::from_utf8_lossy(b).into_owned())
        .unwrap_or_default();
    let standard = StandardFont::from_base_font(&base_font);

    let widths = match (table, standard) {
        (Some((first_char, widths)), standard) => FontWidths::Table {
            first_char,
            widths,
            missing: standard.map_or(DEFAULT_GLYPH_WIDTH, |s| s.width(b' ') as f32),
        },
        (None, Some(standard)) => FontWidths::Standard(standard),
        (None, None) => FontWidths::Unknown,
    };
    FontInfo {
        widths,
        composite: false,
    }
}

fn page_fonts(doc: &Document, page_id: ObjectId) -> Result<HashMap<Vec<u8>, FontInfo>, ComposerError> {
    let mut fonts = HashMap::new();
    let Some(resources) = inherited_attribute(doc, page_id, b"Resources")? else {
        return Ok(fonts);
    };
    let Ok(resources) = resolve(doc, &resources)?.as_dict() else {
        return Ok(fonts);
    };
    let Ok(font_dict) = resources.get(b"Font") else {
        return Ok(fonts);
    };
    let Ok(font_dict) = resolve(doc, font_dict)?.as_dict() else {
        return Ok(fonts);
    };
    for (name, value) in font_dict.iter() {
        if let Ok(font) = resolve(doc, value)?.as_dict() {
            fonts.insert(name.clone(), load_font(doc, font));
        }
    }
    Ok(fonts)
}

#[derive(Debug, Clone)]
struct Glyph {
    ch: char,
    x: f32,
    baseline: f32,
    width: f32,
    size: f32,
}

impl Glyph {
    fn rect(&self) -> Rect {
        Rect::new(
            self.x,
            self.baseline - self.size * DESCENT,
            self.width,
            self.size * (1.0 + DESCENT),
        )
    }
}

#[derive(Debug, Clone)]
struct GraphicsState {
    ctm: Matrix,
    font: Option<Vec<u8>>,
    font_size: f32,
    char_spacing: f32,
    word_spacing: f32,
    h_scale: f32,
    leading: f32,
    rise: f32,
}

impl Default for GraphicsState {
    fn default() -> Self {
        Self {
            ctm: IDENTITY,
            font: None,
            font_size: 0.0,
            char_spacing: 0.0,
            word_spacing: 0.0,
            h_scale: 1.0,
            leading: 0.0,
            rise: 0.0,
        }
    }
}

struct Interpreter<'f> {
    fonts: &'f HashMap<Vec<u8>, FontInfo>,
    state: GraphicsState,
    stack: Vec<GraphicsState>,
    tm: Matrix,
    tlm: Matrix,
    glyphs: Vec<Glyph>,
}

impl<'f> Interpreter<'f> {
    fn new(fonts: &'f HashMap<Vec<u8>, FontInfo>) -> Self {
        Self {
            fonts,
            state: GraphicsState::default(),
            stack: Vec::new(),
            tm: IDENTITY,
            tlm: IDENTITY,
            glyphs: Vec::new(),
        }
    }

    fn move_line(&mut self, tx: f32, ty: f32) {
        self.tlm = multiply(&translate(tx, ty), &self.tlm);
        self.tm = self.tlm;
    }

    fn next_line(&mut self) {
        let leading = self.state.leading;
        self.move_line(0.0, -leading);
    }

    fn show(&mut self, bytes: &[u8]) {
        let fonts = self.fonts;
        let Some(font) = self.state.font.as_ref().and_then(|f| fonts.get(f)) else {
            return;
        };
        if font.composite {
            return;
        }
        let st = &self.state;
        for &code in bytes {
            let w0 = font.width(code) / 1000.0;
            let spacing = st.char_spacing + if code == b' ' { st.word_spacing } else { 0.0 };
            let glyph_advance = w0 * st.font_size * st.h_scale;
            let advance = (w0 * st.font_size + spacing) * st.h_scale;

            let trm = multiply(&self.tm, &st.ctm);
            let x_scale = (trm[0] * trm[0] + trm[1] * trm[1]).sqrt();
            let y_scale = (trm[2] * trm[2] + trm[3] * trm[3]).sqrt();
            let x = trm[4] + st.rise * trm[2];
            let y = trm[5] + st.rise * trm[3];

            self.glyphs.push(Glyph {
                ch: encoding::decode_byte(code),
                x,
                baseline: y,
                width: glyph_advance * x_scale,
                size: st.font_size * y_scale,
            });
            self.tm = multiply(&translate(advance, 0.0), &self.tm);
        }
    }

    fn adjust(&mut self, amount: f32) {
        let tx = -amount / 1000.0 * self.state.font_size * self.state.h_scale;
        self.tm = multiply(&translate(tx, 0.0), &self.tm);
    }

    fn run(&mut self, content: &Content) {
        for op in &content.operations {
            let nums: Vec<f32> = op.operands.iter().filter_map(number).collect();
            match op.operator.as_str() {
                "q" => self.stack.push(self.state.clone()),
                "Q" => {
                    if let Some(state) = self.stack.pop() {
                        self.state = state;
                    }
                }
                "cm" if nums.len() == 6 => {
                    let m = [nums[0], nums[1], nums[2], nums[3], nums[4], nums[5]];
                    self.state.ctm = multiply(&m, &self.state.ctm);
                }
                "BT" => {
                    self.tm = IDENTITY;
                    self.tlm = IDENTITY;
                }
                "Tf" => {
                    if let Some(Ok(name)) = op.operands.first().map(|o| o.as_name()) {
                        self.state.font = Some(name.to_vec());
                    }
                    if let Some(size) = op.operands.get(1).and_then(number) {
                        self.state.font_size = size;
                    }
                }
                "Tc" if !nums.is_empty() => self.state.char_spacing = nums[0],
                "Tw" if !nums.is_empty() => self.state.word_spacing = nums[0],
                "Tz" if !nums.is_empty() => self.state.h_scale = nums[0] / 100.0,
                "TL" if !nums.is_empty() => self.state.leading = nums[0],
                "Ts" if !nums.is_empty() => self.state.rise = nums[0],
                "Td" if nums.len() == 2 => self.move_line(nums[0], nums[1]),
                "TD" if nums.len() == 2 => {
                    self.state.leading = -nums[1];
                    self.move_line(nums[0], nums[1]);
                }
                "Tm" if nums.len() == 6 => {
                    self.tlm = [nums[0], nums[1], nums[2], nums[3], nums[4], nums[5]];
                    self.tm = self.tlm;
                }
                "T*" => self.next_line(),
                "Tj" => {
                    if let Some(Object::String(bytes, _)) = op.operands.first() {
                        self.show(bytes);
                    }
                }
                "'" => {
                    self.next_line();
                    if let Some(Object::String(bytes, _)) = op.operands.first() {
                        self.show(bytes);
                    }
                }
                "\"" => {
                    if nums.len() >= 2 {
                        self.state.word_spacing = nums[0];
                        self.state.char_spacing = nums[1];
                    }
                    self.next_line();
                    if let Some(Object::String(bytes, _)) = op.operands.get(2) {
                        self.show(bytes);
                    }
                }
                "TJ" => {
                    if let Some(Ok(items)) = op.operands.first().map(|o| o.as_array()) {
                        for item in items {
                            match item {
                                Object::String(bytes, _) => self.show(bytes),
                                other => {
                                    if let Some(n) = number(other) {
                                        self.adjust(n);
                                    }
                                }
                            }
                        }
                    }
                }
                _ => {}
            }
        }
    }
}

/// A line of text on a page with one box per character of [`TextLine::text`].
#[derive(Debug, Clone)]
pub struct TextLine {
    pub text: String,
    pub baseline: f32,
    boxes: Vec<Rect>,
}

impl TextLine {
    /// Bounding box of the characters in `start..start + len`.
    pub fn span_rect(&self, start: usize, len: usize) -> Option<Rect> {
        let boxes = self.boxes.get(start..start + len)?;
        let (first, rest) = boxes.split_first()?;
        Some(rest.iter().fold(*first, |acc, r| acc.union(r)))
    }
}

fn group_lines(mut glyphs: Vec<Glyph>) -> Vec<TextLine> {
    // Top of the page first, then left to right.
    glyphs.sort_by(|a, b| b.baseline.total_cmp(&a.baseline).then(a.x.total_cmp(&b.x)));

    let mut rows: Vec<Vec<Glyph>> = Vec::new();
    for glyph in glyphs {
        match rows.last_mut() {
            Some(row)
                if (row[0].baseline - glyph.baseline).abs()
                    <= 0.3 * row[0].size.max(glyph.size).max(1.0) =>
            {
                row.push(glyph)
            }
            _ => rows.push(vec![glyph]),
        }
    }

    rows.into_iter()
        .map(|mut row| {
            row.sort_by(|a, b| a.x.total_cmp(&b.x));
            let baseline = row[0].baseline;
            let mut text = String::new();
            let mut boxes = Vec::with_capacity(row.len());
            let mut prev: Option<&Glyph> = None;
            for glyph in &row {
                if let Some(p) = prev {
                    let gap = glyph.x - (p.x + p.width);
                    if gap > WORD_GAP * glyph.size && p.ch != ' ' && glyph.ch != ' ' {
                        text.push(' ');
                        boxes.push(Rect::new(p.x + p.width, p.rect().y, gap, p.rect().height));
                    }
                }
                text.push(glyph.ch);
                boxes.push(glyph.rect());
                prev = Some(glyph);
            }
            TextLine {
                text,
                baseline,
                boxes,
            }
        })
        .collect()
}

/// Lines of text on a page, top to bottom.
pub fn page_text_lines(doc: &Document, page_id: ObjectId) -> Result<Vec<TextLine>, ComposerError> {
    let fonts = page_fonts(doc, page_id)?;
    let data = doc.get_page_content(page_id)?;
    let content = Content::decode(&data)?;
    let mut interpreter = Interpreter::new(&fonts);
    interpreter.run(&content);
    Ok(group_lines(interpreter.glyphs))
}

/// Every non-overlapping occurrence of `needle` in `lines`, in reading order.
/// Matches do not span lines.
pub fn find_text(lines: &[TextLine], needle: &str) -> Vec<Rect> {
    let needle: Vec<char> = needle.chars().collect();
    if needle.is_empty() {
        return Vec::new();
    }
    let mut hits = Vec::new();
    for line in lines {
        let chars: Vec<char> = line.text.chars().collect();
        let mut i = 0;
        while i + needle.len() <= chars.len() {
            if chars[i..i + needle.len()] == needle[..] {
                if let Some(rect) = line.span_rect(i, needle.len()) {
                    hits.push(rect);
                }
                i += needle.len();
            } else {
                i += 1;
            }
        }
    }
    trace!("Text search found {} match(es) in {} line(s)", hits.len(), lines.len());
    hits
}
