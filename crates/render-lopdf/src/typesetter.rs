use crate::error::RenderError;
use crate::flow::{FlowItem, FontVariant, Paragraph, TextAlign, WrapMode};
use crate::page::{PageContext, TextFragment};
use crate::wrapper::{break_lines, LineLayout};
use log::debug;
use lopdf::{dictionary, Dictionary, Document, Object, ObjectId, Stream};
use prepender_types::{PageGeometry, Rect};
use std::ops::Range;

const EPSILON: f32 = 0.01;

/// Where one line of a paragraph was drawn.
#[derive(Debug, Clone, PartialEq)]
pub struct PlacedLine {
    /// Zero-based index into the typeset document's pages.
    pub page_index: usize,
    /// Line box in PDF user space; the width is the rendered width of the text.
    pub rect: Rect,
    pub baseline: f32,
    pub chars: Range<usize>,
    pub font_size: f32,
}

impl PlacedLine {
    pub fn char_count(&self) -> usize {
        self.chars.len()
    }
}

/// Line placements for one paragraph of the flow.
#[derive(Debug, Clone, PartialEq)]
pub struct ParagraphPlacement {
    pub flow_index: usize,
    pub lines: Vec<PlacedLine>,
}

impl ParagraphPlacement {
    /// The line that shows `char_index`. Offsets that fall on a consumed break space resolve
    /// to the following line.
    pub fn line_containing(&self, char_index: usize) -> Option<&PlacedLine> {
        self.lines
            .iter()
            .find(|l| l.chars.contains(&char_index))
            .or_else(|| self.lines.iter().find(|l| l.chars.start > char_index))
            .or_else(|| self.lines.last())
    }
}

/// The result of a typesetting run.
#[derive(Debug, Clone)]
pub struct TypesetDocument {
    pub bytes: Vec<u8>,
    pub page_count: usize,
    pub paragraphs: Vec<ParagraphPlacement>,
}

impl TypesetDocument {
    pub fn placement(&self, flow_index: usize) -> Option<&ParagraphPlacement> {
        self.paragraphs.iter().find(|p| p.flow_index == flow_index)
    }
}

struct DrawnLine {
    flow_index: usize,
    line: LineLayout,
    origin_x: f32,
    baseline: f32,
    word_spacing: f32,
}

struct FlowLayout {
    pages: Vec<Vec<DrawnLine>>,
    paragraphs: Vec<ParagraphPlacement>,
}

struct Cursor {
    y: f32,
    page_has_content: bool,
}

/// Sets a flow of paragraphs on fixed-size pages.
#[derive(Debug, Clone, Copy)]
pub struct Typesetter {
    geometry: PageGeometry,
}

impl Typesetter {
    pub fn new(geometry: PageGeometry) -> Self {
        Self { geometry }
    }

    pub fn geometry(&self) -> &PageGeometry {
        &self.geometry
    }

    pub fn typeset(&self, flow: &[FlowItem]) -> Result<TypesetDocument, RenderError> {
        if self.geometry.content_width() <= 0.0 || self.geometry.content_height() <= 0.0 {
            return Err(RenderError::Layout(format!(
                "margins leave no printable area on a {}x{} page",
                self.geometry.width(),
                self.geometry.height()
            )));
        }
        let layout = self.layout(flow);
        let page_count = layout.pages.len();
        let bytes = self.render(&layout, flow)?;
        debug!(
            "Typeset {} flow items into {} page(s), {} bytes",
            flow.len(),
            page_count,
            bytes.len()
        );
        Ok(TypesetDocument {
            bytes,
            page_count,
            paragraphs: layout.paragraphs,
        })
    }

    fn layout(&self, flow: &[FlowItem]) -> FlowLayout {
        let mut layout = FlowLayout {
            pages: vec![Vec::new()],
            paragraphs: Vec::new(),
        };
        let mut cursor = Cursor {
            y: self.geometry.content_top(),
            page_has_content: false,
        };

        for (flow_index, item) in flow.iter().enumerate() {
            match item {
                FlowItem::PageBreak => self.new_page(&mut layout, &mut cursor),
                FlowItem::Spacer(height) => {
                    cursor.y = (cursor.y - height).max(self.geometry.margins.bottom);
                }
                FlowItem::Paragraph(paragraph) => {
                    let placement = self.place_paragraph(flow_index, paragraph, &mut layout, &mut cursor);
                    layout.paragraphs.push(placement);
                }
            }
        }
        layout
    }

    fn new_page(&self, layout: &mut FlowLayout, cursor: &mut Cursor) {
        layout.pages.push(Vec::new());
        cursor.y = self.geometry.content_top();
        cursor.page_has_content = false;
    }

    fn place_paragraph(
        &self,
        flow_index: usize,
        paragraph: &Paragraph,
        layout: &mut FlowLayout,
        cursor: &mut Cursor,
    ) -> ParagraphPlacement {
        let style = &paragraph.style;
        let bottom = self.geometry.margins.bottom;
        let max_width = self.geometry.content_width() - style.left_indent;

        if cursor.page_has_content {
            cursor.y -= style.space_before;
        }

        let lines = break_lines(paragraph, max_width);
        let line_count = lines.len();

        if paragraph.wrap == WrapMode::KeepTogether && cursor.page_has_content {
            let needed = line_count as f32 * style.leading;
            if cursor.y - needed < bottom - EPSILON && needed <= self.geometry.content_height() {
                self.new_page(layout, cursor);
            }
        }

        let mut placed = Vec::with_capacity(line_count);
        for (i, line) in lines.into_iter().enumerate() {
            if cursor.y - style.leading < bottom - EPSILON && cursor.page_has_content {
                self.new_page(layout, cursor);
            }

            let is_last = i + 1 == line_count;
            let slack = (max_width - line.width).max(0.0);
            let (offset, word_spacing) = match style.align {
                TextAlign::Left => (0.0, 0.0),
                TextAlign::Center => (slack / 2.0, 0.0),
                TextAlign::Right => (slack, 0.0),
                TextAlign::Justify if !is_last && line.space_count > 0 => {
                    (0.0, slack / line.space_count as f32)
                }
                TextAlign::Justify => (0.0, 0.0),
            };

            let line_top = cursor.y;
            cursor.y -= style.leading;
            let baseline =
                line_top - style.font_size * 0.8 - (style.leading - style.font_size) / 2.0;
            let origin_x = self.geometry.margins.left + style.left_indent + offset;
            let width = line.width + word_spacing * line.space_count as f32;
            let page_index = layout.pages.len() - 1;

            placed.push(PlacedLine {
                page_index,
                rect: Rect::new(origin_x, cursor.y, width, style.leading),
                baseline,
                chars: line.chars.clone(),
                font_size: style.font_size,
            });
            layout.pages[page_index].push(DrawnLine {
                flow_index,
                line,
                origin_x,
                baseline,
                word_spacing,
            });
            cursor.page_has_content = true;
        }

        cursor.y -= style.space_after;
        ParagraphPlacement {
            flow_index,
            lines: placed,
        }
    }

    fn render(&self, layout: &FlowLayout, flow: &[FlowItem]) -> Result<Vec<u8>, RenderError> {
        let mut doc = Document::with_version("1.7");
        let pages_id = doc.new_object_id();
        let resources_id = add_font_resources(&mut doc);

        let media_box: Vec<Object> = vec![
            0.into(),
            0.into(),
            self.geometry.width().into(),
            self.geometry.height().into(),
        ];

        let mut kids = Vec::with_capacity(layout.pages.len());
        for page_lines in &layout.pages {
            let mut ctx = PageContext::new();
            for drawn in page_lines {
                let FlowItem::Paragraph(paragraph) = &flow[drawn.flow_index] else {
                    return Err(RenderError::Layout(format!(
                        "flow item {} is not a paragraph",
                        drawn.flow_index
                    )));
                };
                for item in &drawn.line.items {
                    let run = &paragraph.runs[item.run_index];
                    let spaces_in_item = item.text.chars().filter(|c| *c == ' ').count();
                    let rendered_width = item.width + drawn.word_spacing * spaces_in_item as f32;
                    ctx.draw_text(&TextFragment {
                        text: &item.text,
                        font: run.font,
                        font_size: paragraph.style.font_size,
                        color: run.color,
                        x: drawn.origin_x
                            + item.x
                            + drawn.word_spacing * item.spaces_before as f32,
                        baseline: drawn.baseline,
                        word_spacing: drawn.word_spacing,
                        underline_width: run.underline.then_some(rendered_width),
                    });
                }
            }
            let content_id = doc.add_object(Stream::new(dictionary! {}, ctx.finish().encode()?));
            let page_id = doc.add_object(dictionary! {
                "Type" => "Page",
                "Parent" => pages_id,
                "MediaBox" => media_box.clone(),
                "Contents" => content_id,
                "Resources" => resources_id,
            });
            kids.push(Object::Reference(page_id));
        }

        let page_count = kids.len() as i64;
        doc.objects.insert(
            pages_id,
            Object::Dictionary(dictionary! {
                "Type" => "Pages",
                "Kids" => kids,
                "Count" => page_count,
            }),
        );
        let catalog_id = doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        });
        doc.trailer.set("Root", catalog_id);

        let mut bytes = Vec::new();
        doc.save_to(&mut bytes)?;
        Ok(bytes)
    }
}

fn add_font_resources(doc: &mut Document) -> ObjectId {
    let mut fonts = Dictionary::new();
    for variant in FontVariant::ALL {
        let widths: Vec<Object> = variant
            .metrics()
            .widths_array()
            .into_iter()
            .map(|w| Object::Integer(w as i64))
            .collect();
        let font_id = doc.add_object(dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => variant.base_font(),
            "Encoding" => "WinAnsiEncoding",
            "FirstChar" => 32,
            "LastChar" => 255,
            "Widths" => widths,
        });
        fonts.set(variant.resource_name(), font_id);
    }
    doc.add_object(dictionary! { "Font" => fonts })
}
