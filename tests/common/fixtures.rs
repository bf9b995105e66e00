#![allow(dead_code)]

use serde_json::{json, Value};

/// A specification with default settings
pub fn spec(pages: Vec<Value>) -> Value {
    json!({ "pages": pages })
}

/// A specification with explicit defaults
pub fn spec_with_defaults(defaults: Value, pages: Vec<Value>) -> Value {
    json!({ "defaults": defaults, "pages": pages })
}

pub fn page(content: Vec<Value>) -> Value {
    json!({ "content": content })
}

pub fn page_with_heading(heading: &str, content: Vec<Value>) -> Value {
    json!({ "pageHeading": { "text": heading }, "content": content })
}

pub fn section_heading(text: &str) -> Value {
    json!({ "type": "sectionHeading", "text": text })
}

pub fn section_subheading(text: &str) -> Value {
    json!({ "type": "sectionSubheading", "text": text })
}

pub fn bullet(label: &str, items: Vec<Value>) -> Value {
    json!({ "type": "bulletPoint", "label": label, "content": items })
}

pub fn indented_bullet(label: &str, items: Vec<Value>) -> Value {
    json!({ "type": "indentedBulletPoint", "label": label, "content": items })
}

/// A content item linking to a page of the original document
pub fn link(text: &str, target_page: u32) -> Value {
    json!({ "text": text, "targetPage": target_page })
}

pub fn text(text: &str) -> Value {
    json!(text)
}

/// A table of contents that links to every listed original page, one bullet per entry
pub fn toc(entries: &[(&str, u32)]) -> Value {
    let bullets = entries
        .iter()
        .enumerate()
        .map(|(i, (title, page))| bullet(&format!("{}.", i + 1), vec![link(title, *page)]))
        .collect();
    spec(vec![page_with_heading("Contents", bullets)])
}
