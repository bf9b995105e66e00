//! Paragraph styles for each kind of generated element.

use crate::schema::{Alignment, Defaults};
use prepender_render_lopdf::{ParagraphStyle, TextAlign};

const LEADING_FACTOR: f32 = 1.2;

impl From<Alignment> for TextAlign {
    fn from(alignment: Alignment) -> Self {
        match alignment {
            Alignment::Left => TextAlign::Left,
            Alignment::Center => TextAlign::Center,
            Alignment::Right => TextAlign::Right,
            Alignment::Justify => TextAlign::Justify,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct StyleSheet {
    pub normal: ParagraphStyle,
    pub page_heading: ParagraphStyle,
    pub section_heading: ParagraphStyle,
    pub section_subheading: ParagraphStyle,
    pub bullet: ParagraphStyle,
    pub indented_bullet: ParagraphStyle,
}

impl StyleSheet {
    pub fn from_defaults(defaults: &Defaults) -> Self {
        let size = defaults.font_size as f32;
        let normal = ParagraphStyle {
            font_size: size,
            leading: size * LEADING_FACTOR,
            space_before: 0.0,
            space_after: 6.0,
            left_indent: 0.0,
            align: TextAlign::Left,
        };
        let page_heading = ParagraphStyle {
            font_size: 18.0,
            leading: 22.0,
            space_after: 12.0,
            ..normal.clone()
        };
        let section_heading = ParagraphStyle {
            font_size: 14.0,
            leading: 18.0,
            space_before: 12.0,
            ..normal.clone()
        };
        let section_subheading = ParagraphStyle {
            font_size: 12.0,
            leading: 15.0,
            space_before: 6.0,
            ..normal.clone()
        };
        let bullet = ParagraphStyle {
            left_indent: 20.0,
            space_before: 3.0,
            space_after: 3.0,
            ..normal.clone()
        };
        let indented_bullet = ParagraphStyle {
            left_indent: 40.0,
            ..bullet.clone()
        };
        Self {
            normal,
            page_heading,
            section_heading,
            section_subheading,
            bullet,
            indented_bullet,
        }
    }
}

/// Applies element-level overrides. Either override also resets the leading to 1.2x the size.
pub fn with_overrides(base: &ParagraphStyle, font_size: Option<u32>, alignment: Alignment) -> ParagraphStyle {
    if font_size.is_none() && alignment == Alignment::Left {
        return base.clone();
    }
    let size = font_size.map_or(base.font_size, |s| s as f32);
    ParagraphStyle {
        font_size: size,
        leading: size * LEADING_FACTOR,
        align: alignment.into(),
        ..base.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bullets_follow_the_default_size() {
        let sheet = StyleSheet::from_defaults(&Defaults {
            font_size: 10,
            ..Defaults::default()
        });
        assert_eq!(sheet.bullet.font_size, 10.0);
        assert_eq!(sheet.indented_bullet.left_indent, 40.0);
        assert_eq!(sheet.page_heading.font_size, 18.0);
    }

    #[test]
    fn overrides_reset_leading() {
        let sheet = StyleSheet::from_defaults(&Defaults::default());
        assert_eq!(with_overrides(&sheet.section_heading, None, Alignment::Left), sheet.section_heading);

        let sized = with_overrides(&sheet.section_heading, Some(20), Alignment::Left);
        assert_eq!(sized.font_size, 20.0);
        assert!((sized.leading - 24.0).abs() < 1e-4);

        let centered = with_overrides(&sheet.section_heading, None, Alignment::Center);
        assert_eq!(centered.font_size, 14.0);
        assert!((centered.leading - 16.8).abs() < 1e-4);
        assert_eq!(centered.align, TextAlign::Center);
        assert_eq!(centered.space_before, 12.0);
    }
}
