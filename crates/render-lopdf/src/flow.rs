use prepender_types::{Color, StandardFont};

/// Horizontal alignment of the lines in a paragraph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TextAlign {
    #[default]
    Left,
    Center,
    Right,
    Justify,
}

/// How a paragraph behaves when it does not fit the available width or the rest of the page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WrapMode {
    /// Wrap to the frame width; lines flow across page breaks.
    #[default]
    Wrap,
    /// Wrap, but move the whole paragraph to a new page if it would be split.
    KeepTogether,
    /// Never wrap; the paragraph is set on a single line even if it overruns the margin.
    NoWrap,
}

/// One of the four Helvetica faces the typesetter registers on every page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct FontVariant {
    pub bold: bool,
    pub italic: bool,
}

impl FontVariant {
    pub const REGULAR: FontVariant = FontVariant { bold: false, italic: false };
    pub const BOLD: FontVariant = FontVariant { bold: true, italic: false };
    pub const ITALIC: FontVariant = FontVariant { bold: false, italic: true };
    pub const BOLD_ITALIC: FontVariant = FontVariant { bold: true, italic: true };

    pub const ALL: [FontVariant; 4] = [
        FontVariant::REGULAR,
        FontVariant::BOLD,
        FontVariant::ITALIC,
        FontVariant::BOLD_ITALIC,
    ];

    pub fn base_font(self) -> &'static str {
        match (self.bold, self.italic) {
            (false, false) => "Helvetica",
            (true, false) => "Helvetica-Bold",
            (false, true) => "Helvetica-Oblique",
            (true, true) => "Helvetica-BoldOblique",
        }
    }

    /// Name of the font in the page `/Resources` dictionary.
    pub fn resource_name(self) -> &'static str {
        match (self.bold, self.italic) {
            (false, false) => "F1",
            (true, false) => "F2",
            (false, true) => "F3",
            (true, true) => "F4",
        }
    }

    pub fn metrics(self) -> StandardFont {
        if self.bold {
            StandardFont::HelveticaBold
        } else {
            StandardFont::Helvetica
        }
    }
}

/// A run of text sharing one font, color and decoration.
#[derive(Debug, Clone, PartialEq)]
pub struct TextRun {
    pub text: String,
    pub font: FontVariant,
    pub color: Color,
    pub underline: bool,
}

impl TextRun {
    pub fn plain(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            font: FontVariant::REGULAR,
            color: Color::BLACK,
            underline: false,
        }
    }

    pub fn with_font(mut self, font: FontVariant) -> Self {
        self.font = font;
        self
    }

    pub fn with_color(mut self, color: Color) -> Self {
        self.color = color;
        self
    }

    pub fn underlined(mut self) -> Self {
        self.underline = true;
        self
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ParagraphStyle {
    pub font_size: f32,
    pub leading: f32,
    pub space_before: f32,
    pub space_after: f32,
    pub left_indent: f32,
    pub align: TextAlign,
}

impl Default for ParagraphStyle {
    fn default() -> Self {
        Self {
            font_size: 11.0,
            leading: 13.2,
            space_before: 0.0,
            space_after: 6.0,
            left_indent: 0.0,
            align: TextAlign::Left,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Paragraph {
    pub runs: Vec<TextRun>,
    pub style: ParagraphStyle,
    pub wrap: WrapMode,
}

impl Paragraph {
    pub fn new(runs: Vec<TextRun>, style: ParagraphStyle) -> Self {
        Self {
            runs,
            style,
            wrap: WrapMode::Wrap,
        }
    }

    pub fn with_wrap(mut self, wrap: WrapMode) -> Self {
        self.wrap = wrap;
        self
    }

    /// The paragraph text with run boundaries removed.
    pub fn plain_text(&self) -> String {
        self.runs.iter().map(|r| r.text.as_str()).collect()
    }

    /// Length in characters; offsets into a paragraph are always counted in chars.
    pub fn char_count(&self) -> usize {
        self.runs.iter().map(|r| r.text.chars().count()).sum()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum FlowItem {
    Paragraph(Paragraph),
    /// Vertical gap in points.
    Spacer(f32),
    /// Always starts a new page.
    PageBreak,
}
