//! Inline bold/italic markers.
//!
//! `**bold**` and `_italic_` (markers are configurable) become typed [`Span`]s; the markers
//! themselves never reach the page. Reserved markup characters need no escaping because spans
//! carry their style out of band. [`FormattedText`] renders back to tagged markup with
//! escaping for logs and diagnostics.

use regex::Regex;
use std::fmt;
use std::ops::Range;

/// A run of text with uniform emphasis.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Span {
    pub text: String,
    pub bold: bool,
    pub italic: bool,
}

impl Span {
    pub fn plain(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            bold: false,
            italic: false,
        }
    }
}

/// The spans produced from one piece of marked-up text.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FormattedText {
    pub spans: Vec<Span>,
}

impl FormattedText {
    /// Text with every marker removed.
    pub fn plain_text(&self) -> String {
        self.spans.iter().map(|s| s.text.as_str()).collect()
    }

    pub fn char_count(&self) -> usize {
        self.spans.iter().map(|s| s.text.chars().count()).sum()
    }

    /// Forces emphasis onto every span, on top of what the markers set.
    pub fn emphasize(mut self, bold: bool, italic: bool) -> Self {
        for span in &mut self.spans {
            span.bold |= bold;
            span.italic |= italic;
        }
        self
    }

    fn push(&mut self, c: char, bold: bool, italic: bool) {
        match self.spans.last_mut() {
            Some(last) if last.bold == bold && last.italic == italic => last.text.push(c),
            _ => self.spans.push(Span {
                text: c.to_string(),
                bold,
                italic,
            }),
        }
    }
}

/// Renders `<b>`/`<i>` tagged markup with `&`, `<` and `>` escaped.
impl fmt::Display for FormattedText {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for span in &self.spans {
            let text = escape_markup(&span.text);
            match (span.bold, span.italic) {
                (true, true) => write!(f, "<i><b>{text}</b></i>")?,
                (true, false) => write!(f, "<b>{text}</b>")?,
                (false, true) => write!(f, "<i>{text}</i>")?,
                (false, false) => f.write_str(&text)?,
            }
        }
        Ok(())
    }
}

pub fn escape_markup(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            _ => out.push(c),
        }
    }
    out
}

/// Tagged markup for link text: blue and underlined.
pub fn link_markup(text: &str) -> String {
    format!(r#"<font color="blue"><u>{}</u></font>"#, escape_markup(text))
}

/// Converts paired markers into styled spans.
#[derive(Debug, Clone)]
pub struct MarkerFormatter {
    bold: Regex,
    italic: Regex,
    apply_bold: bool,
    apply_italic: bool,
}

impl MarkerFormatter {
    /// Markers are matched literally. Empty markers are rejected during validation.
    pub fn new(bold_marker: &str, italic_marker: &str) -> Result<Self, regex::Error> {
        Ok(Self {
            bold: pair_pattern(bold_marker)?,
            italic: pair_pattern(italic_marker)?,
            apply_bold: true,
            apply_italic: true,
        })
    }

    /// When disabled the markers are still stripped but no bold is applied.
    pub fn with_bold(mut self, apply: bool) -> Self {
        self.apply_bold = apply;
        self
    }

    /// When disabled the markers are still stripped but no italic is applied.
    pub fn with_italic(mut self, apply: bool) -> Self {
        self.apply_italic = apply;
        self
    }

    pub fn format(&self, text: &str) -> FormattedText {
        // Byte ranges in `text`: bold marker text to drop, and bold interiors.
        let mut bold_markers = Vec::new();
        let mut bold = Vec::new();
        for (whole, inner) in pairs(&self.bold, text) {
            bold_markers.push(whole.start..inner.start);
            bold_markers.push(inner.end..whole.end);
            bold.push(inner);
        }

        // Italics are matched with bold markers removed so they may span bold text.
        // `origin[k]` is the offset in `text` of the k-th char of `stripped`.
        let mut stripped = String::with_capacity(text.len());
        let mut origin = Vec::new();
        for (i, c) in text.char_indices() {
            if !bold_markers.iter().any(|r| r.contains(&i)) {
                stripped.push(c);
                origin.push(i);
            }
        }

        // Byte ranges in `stripped`.
        let mut italic_markers = Vec::new();
        let mut italic = Vec::new();
        for (whole, inner) in pairs(&self.italic, &stripped) {
            italic_markers.push(whole.start..inner.start);
            italic_markers.push(inner.end..whole.end);
            italic.push(inner);
        }

        let mut out = FormattedText::default();
        for ((j, c), i) in stripped.char_indices().zip(origin) {
            if italic_markers.iter().any(|r| r.contains(&j)) {
                continue;
            }
            let in_bold = bold.iter().any(|r| r.contains(&i));
            let in_italic = italic.iter().any(|r| r.contains(&j));
            out.push(c, in_bold && self.apply_bold, in_italic && self.apply_italic);
        }
        out
    }
}

/// Whole-match and interior byte ranges of every non-overlapping marker pair.
fn pairs(pattern: &Regex, text: &str) -> Vec<(Range<usize>, Range<usize>)> {
    pattern
        .captures_iter(text)
        .filter_map(|caps| Some((caps.get(0)?.range(), caps.get(1)?.range())))
        .collect()
}

fn pair_pattern(marker: &str) -> Result<Regex, regex::Error> {
    let m = regex::escape(marker);
    Regex::new(&format!("{m}(.+?){m}"))
}
