//! Exhaustive validation of a raw JSON specification.
//!
//! Runs before deserialization so that every problem is reported at once, each with the path
//! of the offending value.

use super::model::{MAX_FONT_SIZE, MIN_FONT_SIZE};
use crate::error::{FieldError, ValidationErrors};
use prepender_types::PageSize;
use serde_json::{Map, Value};

const ALIGNMENTS: [&str; 4] = ["left", "center", "right", "justify"];
const OVERFLOW_BEHAVIORS: [&str; 3] = ["noWrap", "wrap", "wrapWithPageBreak"];
const ELEMENT_TYPES: [&str; 4] = [
    "sectionHeading",
    "sectionSubheading",
    "bulletPoint",
    "indentedBulletPoint",
];

/// Checks `value` against the specification schema, collecting every violation.
pub fn validate_value(value: &Value) -> Result<(), ValidationErrors> {
    let mut v = Validator::default();
    v.root(value);
    if v.errors.is_empty() {
        Ok(())
    } else {
        Err(ValidationErrors { errors: v.errors })
    }
}

#[derive(Default)]
struct Validator {
    path: Vec<String>,
    errors: Vec<FieldError>,
}

/// Looks a field up by its camelCase name, then its snake_case alias.
fn field<'a>(obj: &'a Map<String, Value>, name: &str, alias: &str) -> Option<&'a Value> {
    obj.get(name).or_else(|| obj.get(alias)).filter(|v| !v.is_null())
}

impl Validator {
    fn error(&mut self, message: impl Into<String>) {
        self.errors.push(FieldError::new(self.path.join(" -> "), message));
    }

    fn at<F: FnOnce(&mut Self)>(&mut self, segment: impl ToString, f: F) {
        self.path.push(segment.to_string());
        f(self);
        self.path.pop();
    }

    fn object<'a>(&mut self, value: &'a Value) -> Option<&'a Map<String, Value>> {
        let obj = value.as_object();
        if obj.is_none() {
            self.error("expected an object");
        }
        obj
    }

    fn root(&mut self, value: &Value) {
        let Some(obj) = self.object(value) else { return };
        if let Some(defaults) = field(obj, "defaults", "defaults") {
            self.at("defaults", |v| v.defaults(defaults));
        }
        match obj.get("pages") {
            None | Some(Value::Null) => self.at("pages", |v| v.error("field required")),
            Some(Value::Array(pages)) if pages.is_empty() => {
                self.at("pages", |v| v.error("must contain at least one page"))
            }
            Some(Value::Array(pages)) => self.at("pages", |v| {
                for (i, page) in pages.iter().enumerate() {
                    v.at(i, |v| v.page(page));
                }
            }),
            Some(_) => self.at("pages", |v| v.error("expected a list")),
        }
    }

    fn defaults(&mut self, value: &Value) {
        let Some(obj) = self.object(value) else { return };
        if let Some(size) = field(obj, "fontSize", "font_size") {
            self.at("fontSize", |v| v.font_size(size));
        }

        let bold = field(obj, "boldMarker", "bold_marker");
        let italic = field(obj, "italicMarker", "italic_marker");
        if let Some(marker) = bold {
            self.at("boldMarker", |v| v.marker(marker));
        }
        if let Some(marker) = italic {
            self.at("italicMarker", |v| v.marker(marker));
        }
        let bold = bold.and_then(Value::as_str).unwrap_or("**");
        let italic = italic.and_then(Value::as_str).unwrap_or("_");
        if !bold.is_empty() && bold == italic {
            self.at("italicMarker", |v| v.error("must differ from boldMarker"));
        }

        let mut dimensions = Some(PageSize::Letter.dimensions_pt());
        if let Some(size) = field(obj, "pageSize", "page_size") {
            dimensions = None;
            self.at("pageSize", |v| dimensions = v.page_size(size));
        }

        let mut margins = [72.0_f64; 4];
        let mut margins_ok = true;
        for (i, (name, alias)) in [
            ("leftMargin", "left_margin"),
            ("rightMargin", "right_margin"),
            ("topMargin", "top_margin"),
            ("bottomMargin", "bottom_margin"),
        ]
        .into_iter()
        .enumerate()
        {
            let Some(margin) = field(obj, name, alias) else { continue };
            self.at(name, |v| match margin.as_f64() {
                Some(m) if m >= 0.0 => margins[i] = m,
                Some(_) => {
                    margins_ok = false;
                    v.error("must be greater than or equal to 0");
                }
                None => {
                    margins_ok = false;
                    v.error("expected a number");
                }
            });
        }

        if let (Some((width, height)), true) = (dimensions, margins_ok) {
            let [left, right, top, bottom] = margins;
            if f64::from(width) - left - right <= 0.0 || f64::from(height) - top - bottom <= 0.0 {
                self.error("margins leave no room for content");
            }
        }
    }

    fn page_size(&mut self, value: &Value) -> Option<(f32, f32)> {
        match value {
            Value::String(name) => match PageSize::parse(name) {
                Ok(size) => Some(size.dimensions_pt()),
                Err(_) => {
                    self.error("expected 'letter', 'a4' or 'legal'");
                    None
                }
            },
            Value::Object(obj) => {
                let mut dims = [0.0_f32; 2];
                let mut ok = true;
                for (i, name) in ["width", "height"].into_iter().enumerate() {
                    self.at(name, |v| match obj.get(name).and_then(Value::as_f64) {
                        Some(d) if d > 0.0 => dims[i] = d as f32,
                        Some(_) => {
                            ok = false;
                            v.error("must be greater than 0");
                        }
                        None => {
                            ok = false;
                            v.error("expected a number");
                        }
                    });
                }
                ok.then_some((dims[0], dims[1]))
            }
            _ => {
                self.error("expected a page size name or {width, height}");
                None
            }
        }
    }

    fn marker(&mut self, value: &Value) {
        match value.as_str() {
            Some("") => self.error("must not be empty"),
            Some(_) => {}
            None => self.error("expected a string"),
        }
    }

    fn font_size(&mut self, value: &Value) {
        match value.as_u64() {
            Some(size) if (u64::from(MIN_FONT_SIZE)..=u64::from(MAX_FONT_SIZE)).contains(&size) => {}
            Some(_) => self.error(format!(
                "must be between {MIN_FONT_SIZE} and {MAX_FONT_SIZE}"
            )),
            None if value.as_i64().is_some() => self.error(format!(
                "must be between {MIN_FONT_SIZE} and {MAX_FONT_SIZE}"
            )),
            None => self.error("expected an integer"),
        }
    }

    fn page(&mut self, value: &Value) {
        let Some(obj) = self.object(value) else { return };
        if let Some(heading) = field(obj, "pageHeading", "page_heading") {
            self.at("pageHeading", |v| v.heading(heading));
        }
        match field(obj, "content", "content") {
            None => {}
            Some(Value::Array(elements)) => self.at("content", |v| {
                for (i, element) in elements.iter().enumerate() {
                    v.at(i, |v| v.element(element));
                }
            }),
            Some(_) => self.at("content", |v| v.error("expected a list")),
        }
    }

    /// Text, size, emphasis and alignment fields shared by every heading kind.
    fn heading(&mut self, value: &Value) {
        let Some(obj) = self.object(value) else { return };
        self.heading_fields(obj);
    }

    fn heading_fields(&mut self, obj: &Map<String, Value>) {
        self.required_string(obj, "text");
        self.optional_font_size(obj);
        for flag in ["bold", "italic"] {
            if let Some(value) = field(obj, flag, flag) {
                if !value.is_boolean() {
                    self.at(flag, |v| v.error("expected a boolean"));
                }
            }
        }
        if let Some(value) = field(obj, "alignment", "alignment") {
            self.at("alignment", |v| v.one_of(value, &ALIGNMENTS));
        }
    }

    fn element(&mut self, value: &Value) {
        let Some(obj) = self.object(value) else { return };
        let kind = match obj.get("type") {
            None | Some(Value::Null) => {
                self.at("type", |v| v.error("field required"));
                return;
            }
            Some(Value::String(kind)) if ELEMENT_TYPES.contains(&kind.as_str()) => kind.as_str(),
            Some(_) => {
                self.at("type", |v| {
                    v.error(format!("expected one of {}", ELEMENT_TYPES.join(", ")))
                });
                return;
            }
        };
        match kind {
            "sectionHeading" | "sectionSubheading" => self.heading_fields(obj),
            _ => self.bullet(obj),
        }
    }

    fn bullet(&mut self, obj: &Map<String, Value>) {
        self.required_string(obj, "label");
        self.optional_font_size(obj);
        if let Some(value) = field(obj, "overflowBehavior", "overflow_behavior") {
            self.at("overflowBehavior", |v| v.one_of(value, &OVERFLOW_BEHAVIORS));
        }
        match field(obj, "content", "content") {
            None => self.at("content", |v| v.error("field required")),
            Some(Value::Array(items)) if items.is_empty() => {
                self.at("content", |v| v.error("content list cannot be empty"))
            }
            Some(Value::Array(items)) => self.at("content", |v| {
                for (i, item) in items.iter().enumerate() {
                    v.at(i, |v| v.item(item));
                }
            }),
            Some(_) => self.at("content", |v| v.error("expected a list")),
        }
    }

    fn item(&mut self, value: &Value) {
        match value {
            Value::String(_) => {}
            Value::Object(obj) => {
                self.required_string(obj, "text");
                match field(obj, "targetPage", "target_page") {
                    None => self.at("targetPage", |v| v.error("field required")),
                    Some(page) => self.at("targetPage", |v| match page.as_i64() {
                        Some(p) if p >= 1 && p <= i64::from(u32::MAX) => {}
                        Some(_) => v.error("must be greater than or equal to 1"),
                        None => v.error("expected an integer"),
                    }),
                }
            }
            _ => self.error("expected a string or a {text, targetPage} link"),
        }
    }

    fn required_string(&mut self, obj: &Map<String, Value>, name: &str) {
        match obj.get(name) {
            None | Some(Value::Null) => self.at(name, |v| v.error("field required")),
            Some(Value::String(_)) => {}
            Some(_) => self.at(name, |v| v.error("expected a string")),
        }
    }

    fn optional_font_size(&mut self, obj: &Map<String, Value>) {
        if let Some(size) = field(obj, "fontSize", "font_size") {
            self.at("fontSize", |v| v.font_size(size));
        }
    }

    fn one_of(&mut self, value: &Value, allowed: &[&str]) {
        if !value.as_str().is_some_and(|s| allowed.contains(&s)) {
            self.error(format!("expected one of {}", allowed.join(", ")));
        }
    }
}
