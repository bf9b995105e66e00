pub mod color;
pub mod encoding;
pub mod geometry;
pub mod metrics;
pub mod page;

pub use color::Color;
pub use geometry::Rect;
pub use metrics::StandardFont;
pub use page::{Margins, PageGeometry, PageSize};
