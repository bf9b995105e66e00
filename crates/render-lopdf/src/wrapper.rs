use crate::flow::{Paragraph, WrapMode};
use prepender_types::encoding;
use std::ops::Range;

/// A single line produced by [`break_lines`].
#[derive(Debug, Clone, PartialEq)]
pub struct LineLayout {
    pub items: Vec<LineItem>,
    /// Natural width, excluding the spaces dropped at the break.
    pub width: f32,
    /// Inter-word spaces inside the line.
    pub space_count: usize,
    /// Character range of the paragraph text that is visible on this line.
    pub chars: Range<usize>,
}

/// A contiguous slice of one run placed on a line.
#[derive(Debug, Clone, PartialEq)]
pub struct LineItem {
    pub run_index: usize,
    pub text: String,
    /// Offset from the line start before alignment is applied.
    pub x: f32,
    pub width: f32,
    pub start_char: usize,
    /// Spaces on the line before this item, used to shift items when justifying.
    pub spaces_before: usize,
}

impl LineItem {
    fn end_char(&self) -> usize {
        self.start_char + self.text.chars().count()
    }
}

#[derive(Debug, Clone)]
struct Token {
    run_index: usize,
    start: usize,
    text: String,
    width: f32,
    is_space: bool,
}

enum Unit {
    Space(Token),
    Word(Vec<Token>),
}

#[derive(Default)]
struct LineBuilder {
    items: Vec<LineItem>,
    width: f32,
    space_count: usize,
}

impl LineBuilder {
    fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    fn push(&mut self, token: &Token) {
        let spaces = if token.is_space { token.text.chars().count() } else { 0 };
        match self.items.last_mut() {
            Some(last) if last.run_index == token.run_index && last.end_char() == token.start => {
                last.text.push_str(&token.text);
                last.width += token.width;
            }
            _ => self.items.push(LineItem {
                run_index: token.run_index,
                text: token.text.clone(),
                x: self.width,
                width: token.width,
                start_char: token.start,
                spaces_before: self.space_count,
            }),
        }
        self.width += token.width;
        self.space_count += spaces;
    }

    fn finish(self) -> LineLayout {
        let start = self.items.first().map(|i| i.start_char).unwrap_or(0);
        let end = self.items.last().map(|i| i.end_char()).unwrap_or(start);
        LineLayout {
            items: self.items,
            width: self.width,
            space_count: self.space_count,
            chars: start..end,
        }
    }
}

fn tokenize(paragraph: &Paragraph) -> Vec<Token> {
    let size = paragraph.style.font_size;
    let mut tokens: Vec<Token> = Vec::new();
    let mut pos = 0usize;

    for (run_index, run) in paragraph.runs.iter().enumerate() {
        let metrics = run.font.metrics();
        for ch in run.text.chars() {
            let is_space = ch.is_whitespace();
            let ch = if is_space { ' ' } else { ch };
            let width = metrics.width(encoding::encode_char(ch)) as f32 * size / 1000.0;
            match tokens.last_mut() {
                Some(t) if t.run_index == run_index && t.is_space == is_space => {
                    t.text.push(ch);
                    t.width += width;
                }
                _ => tokens.push(Token {
                    run_index,
                    start: pos,
                    text: ch.to_string(),
                    width,
                    is_space,
                }),
            }
            pos += 1;
        }
    }
    tokens
}

fn group_units(tokens: Vec<Token>) -> Vec<Unit> {
    let mut units = Vec::new();
    let mut word: Vec<Token> = Vec::new();
    for token in tokens {
        if token.is_space {
            if !word.is_empty() {
                units.push(Unit::Word(std::mem::take(&mut word)));
            }
            units.push(Unit::Space(token));
        } else {
            word.push(token);
        }
    }
    if !word.is_empty() {
        units.push(Unit::Word(word));
    }
    units
}

/// Splits a token into one token per character.
fn split_chars(token: &Token, size: f32, paragraph: &Paragraph) -> Vec<Token> {
    let metrics = paragraph.runs[token.run_index].font.metrics();
    token
        .text
        .chars()
        .enumerate()
        .map(|(i, ch)| Token {
            run_index: token.run_index,
            start: token.start + i,
            text: ch.to_string(),
            width: metrics.width(encoding::encode_char(ch)) as f32 * size / 1000.0,
            is_space: false,
        })
        .collect()
}

/// Greedy line breaking at spaces. Words wider than `max_width` are broken between
/// characters. Spaces at a break are consumed and never rendered.
pub fn break_lines(paragraph: &Paragraph, max_width: f32) -> Vec<LineLayout> {
    let max_width = match paragraph.wrap {
        WrapMode::NoWrap => f32::INFINITY,
        _ => max_width,
    };
    let size = paragraph.style.font_size;

    let mut lines = Vec::new();
    let mut current = LineBuilder::default();
    let mut pending: Vec<Token> = Vec::new();

    for unit in group_units(tokenize(paragraph)) {
        match unit {
            Unit::Space(token) => {
                if !current.is_empty() {
                    pending.push(token);
                }
            }
            Unit::Word(tokens) => {
                let word_width: f32 = tokens.iter().map(|t| t.width).sum();
                let pending_width: f32 = pending.iter().map(|t| t.width).sum();

                if !current.is_empty() && current.width + pending_width + word_width > max_width {
                    lines.push(std::mem::take(&mut current).finish());
                    pending.clear();
                }

                if current.is_empty() && word_width > max_width {
                    for token in &tokens {
                        for piece in split_chars(token, size, paragraph) {
                            if !current.is_empty() && current.width + piece.width > max_width {
                                lines.push(std::mem::take(&mut current).finish());
                            }
                            current.push(&piece);
                        }
                    }
                    continue;
                }

                for space in pending.drain(..) {
                    current.push(&space);
                }
                for token in &tokens {
                    current.push(token);
                }
            }
        }
    }
    if !current.is_empty() {
        lines.push(current.finish());
    }
    lines
}
