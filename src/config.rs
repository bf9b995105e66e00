use prepender_types::Color;

/// Settings that are not part of the document specification itself.
#[derive(Debug, Clone, PartialEq)]
pub struct PrependConfig {
    /// Color of link text on the generated pages.
    pub link_color: Color,
    /// Lower bound for the width of an estimated link rectangle, in points.
    pub min_link_width: f32,
    /// Compress content streams in the final document.
    pub compress: bool,
}

impl Default for PrependConfig {
    fn default() -> Self {
        Self {
            link_color: Color::BLUE,
            min_link_width: 20.0,
            compress: false,
        }
    }
}

impl PrependConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_link_color(mut self, color: Color) -> Self {
        self.link_color = color;
        self
    }

    pub fn with_min_link_width(mut self, width: f32) -> Self {
        self.min_link_width = width;
        self
    }

    pub fn with_compression(mut self, compress: bool) -> Self {
        self.compress = compress;
        self
    }
}
