//! Content stream drawing for a single page.

use crate::flow::FontVariant;
use lopdf::content::{Content, Operation};
use lopdf::{Object, StringFormat};
use prepender_types::{encoding, Color};

/// Text drawing state tracked across `BT`/`ET` blocks so repeated operators are elided.
#[derive(Default, Clone, PartialEq)]
struct PageRenderState {
    font: Option<(FontVariant, f32)>,
    fill_color: Option<Color>,
    word_spacing: f32,
}

/// A fragment of text positioned at its baseline.
pub(crate) struct TextFragment<'a> {
    pub text: &'a str,
    pub font: FontVariant,
    pub font_size: f32,
    pub color: Color,
    pub x: f32,
    pub baseline: f32,
    pub word_spacing: f32,
    pub underline_width: Option<f32>,
}

pub(crate) struct PageContext {
    content: Content,
    state: PageRenderState,
    underlines: Vec<Operation>,
}

impl PageContext {
    pub fn new() -> Self {
        Self {
            content: Content { operations: vec![] },
            state: PageRenderState::default(),
            underlines: vec![],
        }
    }

    pub fn finish(mut self) -> Content {
        if !self.underlines.is_empty() {
            self.content.operations.append(&mut self.underlines);
        }
        self.content
    }

    fn set_font(&mut self, font: FontVariant, size: f32) {
        if self.state.font != Some((font, size)) {
            self.content.operations.push(Operation::new(
                "Tf",
                vec![Object::Name(font.resource_name().as_bytes().to_vec()), size.into()],
            ));
            self.state.font = Some((font, size));
        }
    }

    fn set_fill_color(&mut self, color: Color) {
        if self.state.fill_color != Some(color) {
            let [r, g, b] = color.to_pdf_rgb();
            self.content
                .operations
                .push(Operation::new("rg", vec![r.into(), g.into(), b.into()]));
            self.state.fill_color = Some(color);
        }
    }

    fn set_word_spacing(&mut self, spacing: f32) {
        if self.state.word_spacing != spacing {
            self.content
                .operations
                .push(Operation::new("Tw", vec![spacing.into()]));
            self.state.word_spacing = spacing;
        }
    }

    pub fn draw_text(&mut self, fragment: &TextFragment<'_>) {
        if fragment.text.is_empty() {
            return;
        }
        self.content.operations.push(Operation::new("BT", vec![]));
        self.set_font(fragment.font, fragment.font_size);
        self.set_fill_color(fragment.color);
        self.set_word_spacing(fragment.word_spacing);
        self.content.operations.push(Operation::new(
            "Td",
            vec![fragment.x.into(), fragment.baseline.into()],
        ));
        self.content.operations.push(Operation::new(
            "Tj",
            vec![Object::String(encoding::encode(fragment.text), StringFormat::Literal)],
        ));
        self.content.operations.push(Operation::new("ET", vec![]));

        if let Some(width) = fragment.underline_width {
            self.push_underline(fragment, width);
        }
    }

    fn push_underline(&mut self, fragment: &TextFragment<'_>, width: f32) {
        let [r, g, b] = fragment.color.to_pdf_rgb();
        let y = fragment.baseline - fragment.font_size * 0.1;
        let thickness = (fragment.font_size * 0.05).max(0.5);
        self.underlines.extend([
            Operation::new("q", vec![]),
            Operation::new("RG", vec![r.into(), g.into(), b.into()]),
            Operation::new("w", vec![thickness.into()]),
            Operation::new("m", vec![fragment.x.into(), y.into()]),
            Operation::new("l", vec![(fragment.x + width).into(), y.into()]),
            Operation::new("S", vec![]),
            Operation::new("Q", vec![]),
        ]);
    }
}
