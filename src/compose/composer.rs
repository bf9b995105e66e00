use super::anchors::{estimate, AnchorPosition, PendingLink};
use super::styles::{with_overrides, StyleSheet};
use crate::config::PrependConfig;
use crate::error::PrependError;
use crate::links::LinkTargets;
use crate::markup::{link_markup, FormattedText, MarkerFormatter, Span};
use crate::schema::{
    Alignment, Bullet, ContentElement, ContentItem, OverflowBehavior, PageHeading, PageSpec, Specification,
};
use log::{debug, warn};
use prepender_render_lopdf::{FlowItem, FontVariant, Paragraph, ParagraphStyle, TextRun, Typesetter, WrapMode};

const BULLET: &str = "\u{2022} ";
const ITEM_SEPARATOR: &str = ", ";
const HEADING_GAP: f32 = 12.0;

/// The rendered prefix of one composition pass.
#[derive(Debug, Clone)]
pub struct ComposedPrefix {
    pub bytes: Vec<u8>,
    pub page_count: u32,
    pub anchors: Vec<AnchorPosition>,
}

/// Turns a [`Specification`] into prefix pages.
///
/// Each call to [`compose`](PageComposer::compose) lays the whole specification out again and
/// reports one [`AnchorPosition`] per link item rendered.
#[derive(Debug, Clone)]
pub struct PageComposer<'s> {
    spec: &'s Specification,
    formatter: MarkerFormatter,
    styles: StyleSheet,
    config: PrependConfig,
}

impl<'s> PageComposer<'s> {
    pub fn new(spec: &'s Specification, config: PrependConfig) -> Result<Self, PrependError> {
        let defaults = &spec.defaults;
        Ok(Self {
            spec,
            formatter: MarkerFormatter::new(&defaults.bold_marker, &defaults.italic_marker)?,
            styles: StyleSheet::from_defaults(defaults),
            config,
        })
    }

    pub fn compose<T: LinkTargets>(&self, links: &mut T) -> Result<ComposedPrefix, PrependError> {
        let mut flow = FlowBuilder::default();
        for (i, page) in self.spec.pages.iter().enumerate() {
            if i > 0 {
                flow.items.push(FlowItem::PageBreak);
            }
            self.add_page(&mut flow, page, links);
        }

        let typeset = Typesetter::new(self.spec.defaults.geometry()).typeset(&flow.items)?;

        let mut anchors = Vec::with_capacity(flow.links.len());
        for link in &flow.links {
            let estimated = typeset
                .placement(link.flow_index)
                .and_then(|placement| estimate(placement, link, self.config.min_link_width));
            match estimated {
                Some(anchor) => anchors.push(anchor),
                None => warn!("Link '{}' was not placed by the typesetter", link.text),
            }
        }

        debug!(
            "Composed {} page(s) with {} link anchor(s)",
            typeset.page_count,
            anchors.len()
        );
        Ok(ComposedPrefix {
            bytes: typeset.bytes,
            page_count: typeset.page_count as u32,
            anchors,
        })
    }

    fn add_page<T: LinkTargets>(&self, flow: &mut FlowBuilder, page: &PageSpec, links: &mut T) {
        if let Some(heading) = &page.page_heading {
            flow.push_paragraph(self.page_heading(heading));
            flow.items.push(FlowItem::Spacer(HEADING_GAP));
        }
        for element in &page.content {
            match element {
                ContentElement::SectionHeading(h) => {
                    let style = with_overrides(&self.styles.section_heading, h.font_size, h.alignment);
                    let text = self.formatter.format(&h.text).emphasize(h.bold, h.italic);
                    debug!("Section heading: {text}");
                    flow.push_paragraph(Paragraph::new(spans_to_runs(&text), style));
                }
                ContentElement::SectionSubheading(h) => {
                    let style = with_overrides(&self.styles.section_subheading, h.font_size, h.alignment);
                    let text = self.formatter.format(&h.text).emphasize(h.bold, h.italic);
                    debug!("Section subheading: {text}");
                    flow.push_paragraph(Paragraph::new(spans_to_runs(&text), style));
                }
                ContentElement::BulletPoint(b) => self.add_bullet(flow, b, &self.styles.bullet, links),
                ContentElement::IndentedBulletPoint(b) => {
                    self.add_bullet(flow, b, &self.styles.indented_bullet, links)
                }
            }
        }
    }

    /// Page headings take their emphasis as a whole; markers in them are left as written.
    fn page_heading(&self, heading: &PageHeading) -> Paragraph {
        let style = with_overrides(&self.styles.page_heading, heading.font_size, heading.alignment);
        let run = TextRun::plain(heading.text.as_str()).with_font(FontVariant {
            bold: heading.bold,
            italic: heading.italic,
        });
        Paragraph::new(vec![run], style)
    }

    fn add_bullet<T: LinkTargets>(
        &self,
        flow: &mut FlowBuilder,
        bullet: &Bullet,
        base: &ParagraphStyle,
        links: &mut T,
    ) {
        let style = with_overrides(base, bullet.font_size, Alignment::Left);
        let flow_index = flow.items.len();
        let mut line = RunBuilder::default();

        line.push(TextRun::plain(BULLET));
        line.push_formatted(&self.formatter.format(&bullet.label));
        line.push(TextRun::plain(" "));
        for (i, item) in bullet.content.iter().enumerate() {
            if i > 0 {
                line.push(TextRun::plain(ITEM_SEPARATOR));
            }
            match item {
                ContentItem::Text(text) => line.push_formatted(&self.formatter.format(text)),
                ContentItem::Link(link) => {
                    let target_page = links.target_for(link.target_page);
                    let chars = line.push(
                        TextRun::plain(link.text.as_str())
                            .with_color(self.config.link_color)
                            .underlined(),
                    );
                    debug!(
                        "Link {} -> original page {} (final page {target_page}), chars {chars:?}",
                        link_markup(&link.text),
                        link.target_page
                    );
                    flow.links.push(PendingLink {
                        flow_index,
                        text: link.text.clone(),
                        target_page,
                        chars,
                    });
                }
            }
        }

        let wrap = match bullet.overflow_behavior {
            OverflowBehavior::Wrap => WrapMode::Wrap,
            OverflowBehavior::WrapWithPageBreak => WrapMode::KeepTogether,
            OverflowBehavior::NoWrap => WrapMode::NoWrap,
        };
        flow.push_paragraph(Paragraph::new(line.runs, style).with_wrap(wrap));
    }
}

#[derive(Default)]
struct FlowBuilder {
    items: Vec<FlowItem>,
    links: Vec<PendingLink>,
}

impl FlowBuilder {
    fn push_paragraph(&mut self, paragraph: Paragraph) {
        self.items.push(FlowItem::Paragraph(paragraph));
    }
}

/// Accumulates runs while tracking the plain-text character offset.
#[derive(Default)]
struct RunBuilder {
    runs: Vec<TextRun>,
    chars: usize,
}

impl RunBuilder {
    /// Returns the character range the run occupies.
    fn push(&mut self, run: TextRun) -> std::ops::Range<usize> {
        let start = self.chars;
        self.chars += run.text.chars().count();
        if !run.text.is_empty() {
            self.runs.push(run);
        }
        start..self.chars
    }

    fn push_formatted(&mut self, text: &FormattedText) {
        for span in &text.spans {
            self.push(span_run(span));
        }
    }
}

fn span_run(span: &Span) -> TextRun {
    TextRun::plain(span.text.as_str()).with_font(FontVariant {
        bold: span.bold,
        italic: span.italic,
    })
}

fn spans_to_runs(text: &FormattedText) -> Vec<TextRun> {
    text.spans.iter().map(span_run).collect()
}
