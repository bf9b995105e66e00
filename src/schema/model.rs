//! The deserialized form of a prepend specification.
//!
//! Field names are camelCase on the wire; the snake_case spellings are accepted too.

use prepender_types::{Margins, PageGeometry, PageSize};
use serde::{Deserialize, Serialize};

pub const MIN_FONT_SIZE: u32 = 6;
pub const MAX_FONT_SIZE: u32 = 72;

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
pub struct Specification {
    #[serde(default)]
    pub defaults: Defaults,
    pub pages: Vec<PageSpec>,
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct Defaults {
    #[serde(alias = "font_size")]
    pub font_size: u32,
    #[serde(alias = "bold_marker")]
    pub bold_marker: String,
    #[serde(alias = "italic_marker")]
    pub italic_marker: String,
    #[serde(alias = "page_size")]
    pub page_size: PageSize,
    #[serde(alias = "left_margin")]
    pub left_margin: f32,
    #[serde(alias = "right_margin")]
    pub right_margin: f32,
    #[serde(alias = "top_margin")]
    pub top_margin: f32,
    #[serde(alias = "bottom_margin")]
    pub bottom_margin: f32,
}

impl Default for Defaults {
    fn default() -> Self {
        Self {
            font_size: 11,
            bold_marker: "**".to_string(),
            italic_marker: "_".to_string(),
            page_size: PageSize::Letter,
            left_margin: 72.0,
            right_margin: 72.0,
            top_margin: 72.0,
            bottom_margin: 72.0,
        }
    }
}

impl Defaults {
    pub fn margins(&self) -> Margins {
        Margins {
            top: self.top_margin,
            right: self.right_margin,
            bottom: self.bottom_margin,
            left: self.left_margin,
        }
    }

    pub fn geometry(&self) -> PageGeometry {
        PageGeometry::new(self.page_size, self.margins())
    }
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct PageSpec {
    #[serde(default, alias = "page_heading", skip_serializing_if = "Option::is_none")]
    pub page_heading: Option<PageHeading>,
    #[serde(default)]
    pub content: Vec<ContentElement>,
}

#[derive(Deserialize, Serialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub enum Alignment {
    #[default]
    Left,
    Center,
    Right,
    Justify,
}

#[derive(Deserialize, Serialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub enum OverflowBehavior {
    NoWrap,
    #[default]
    Wrap,
    WrapWithPageBreak,
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PageHeading {
    pub text: String,
    #[serde(default, alias = "font_size", skip_serializing_if = "Option::is_none")]
    pub font_size: Option<u32>,
    #[serde(default)]
    pub bold: bool,
    #[serde(default)]
    pub italic: bool,
    #[serde(default)]
    pub alignment: Alignment,
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum ContentElement {
    SectionHeading(SectionHeading),
    SectionSubheading(SectionSubheading),
    BulletPoint(Bullet),
    IndentedBulletPoint(Bullet),
}

impl ContentElement {
    /// Link items carried by the element, in order.
    pub fn links(&self) -> impl Iterator<Item = &LinkItem> {
        let items: &[ContentItem] = match self {
            ContentElement::BulletPoint(b) | ContentElement::IndentedBulletPoint(b) => &b.content,
            _ => &[],
        };
        items.iter().filter_map(|item| match item {
            ContentItem::Link(link) => Some(link),
            ContentItem::Text(_) => None,
        })
    }
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SectionHeading {
    pub text: String,
    #[serde(default, alias = "font_size", skip_serializing_if = "Option::is_none")]
    pub font_size: Option<u32>,
    #[serde(default = "enabled")]
    pub bold: bool,
    #[serde(default)]
    pub italic: bool,
    #[serde(default)]
    pub alignment: Alignment,
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SectionSubheading {
    pub text: String,
    #[serde(default, alias = "font_size", skip_serializing_if = "Option::is_none")]
    pub font_size: Option<u32>,
    #[serde(default)]
    pub bold: bool,
    #[serde(default = "enabled")]
    pub italic: bool,
    #[serde(default)]
    pub alignment: Alignment,
}

fn enabled() -> bool {
    true
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Bullet {
    pub label: String,
    pub content: Vec<ContentItem>,
    #[serde(default, alias = "font_size", skip_serializing_if = "Option::is_none")]
    pub font_size: Option<u32>,
    #[serde(default, alias = "overflow_behavior")]
    pub overflow_behavior: OverflowBehavior,
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
#[serde(untagged)]
pub enum ContentItem {
    Text(String),
    Link(LinkItem),
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct LinkItem {
    pub text: String,
    /// 1-based page of the original document.
    #[serde(alias = "target_page")]
    pub target_page: u32,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn element_defaults_follow_kind() {
        let page: PageSpec = serde_json::from_value(json!({
            "content": [
                { "type": "sectionHeading", "text": "H" },
                { "type": "sectionSubheading", "text": "S" },
                { "type": "bulletPoint", "label": "L", "content": ["a"] }
            ]
        }))
        .unwrap();
        let ContentElement::SectionHeading(h) = &page.content[0] else { panic!() };
        assert!(h.bold && !h.italic);
        let ContentElement::SectionSubheading(s) = &page.content[1] else { panic!() };
        assert!(!s.bold && s.italic);
        let ContentElement::BulletPoint(b) = &page.content[2] else { panic!() };
        assert_eq!(b.overflow_behavior, OverflowBehavior::Wrap);
    }

    #[test]
    fn snake_case_aliases_are_accepted() {
        let spec: Specification = serde_json::from_value(json!({
            "defaults": { "font_size": 12, "page_size": "a4" },
            "pages": [{
                "page_heading": { "text": "T", "font_size": 20 },
                "content": [{
                    "type": "bulletPoint",
                    "label": "L",
                    "content": [{ "text": "go", "target_page": 3 }],
                    "overflow_behavior": "noWrap"
                }]
            }]
        }))
        .unwrap();
        assert_eq!(spec.defaults.font_size, 12);
        assert_eq!(spec.defaults.page_size, PageSize::A4);
        assert_eq!(spec.defaults.bold_marker, "**");
        assert_eq!(spec.pages[0].page_heading.as_ref().unwrap().font_size, Some(20));
        let links: Vec<_> = spec.pages[0].content[0].links().collect();
        assert_eq!(links, vec![&LinkItem { text: "go".into(), target_page: 3 }]);
    }

    #[test]
    fn geometry_uses_margins() {
        let defaults = Defaults {
            left_margin: 36.0,
            ..Defaults::default()
        };
        let geometry = defaults.geometry();
        assert_eq!(geometry.content_width(), 612.0 - 36.0 - 72.0);
    }
}
