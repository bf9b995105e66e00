//! The JSON document specification: models, validation and parsing.

pub mod model;
pub mod parser;
pub mod validate;

pub use model::{
    Alignment, Bullet, ContentElement, ContentItem, Defaults, LinkItem, OverflowBehavior, PageHeading,
    PageSpec, SectionHeading, SectionSubheading, Specification,
};
pub use parser::{parse_file, parse_reader, parse_str, parse_value};
pub use validate::validate_value;
