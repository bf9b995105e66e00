//! Advance widths for the standard 14 fonts that the prefix pages are set in.
//!
//! Widths are in thousandths of an em and indexed by WinAnsi code.

const FIRST_CODE: u8 = 32;

#[rustfmt::skip]
const HELVETICA: [u16; 95] = [
    278, 278, 355, 556, 556, 889, 667, 191, 333, 333, 389, 584, 278, 333, 278, 278,
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, 278, 278, 584, 584, 584, 556,
    1015, 667, 667, 722, 722, 667, 611, 778, 722, 278, 500, 667, 556, 833, 722, 778,
    667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, 278, 278, 278, 469, 556,
    333, 556, 556, 500, 556, 556, 278, 556, 556, 222, 222, 500, 222, 833, 556, 556,
    556, 556, 333, 500, 278, 556, 500, 722, 500, 500, 500, 334, 260, 334, 584,
];

#[rustfmt::skip]
const HELVETICA_BOLD: [u16; 95] = [
    278, 333, 474, 556, 556, 889, 722, 238, 333, 333, 389, 584, 278, 333, 278, 278,
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, 333, 333, 584, 584, 584, 611,
    975, 722, 722, 722, 722, 667, 611, 778, 722, 278, 556, 722, 611, 833, 722, 778,
    667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, 333, 278, 333, 584, 556,
    333, 556, 611, 556, 611, 556, 333, 611, 611, 278, 278, 556, 278, 889, 611, 611,
    611, 611, 389, 556, 333, 611, 556, 778, 556, 556, 500, 389, 280, 389, 584,
];

/// Width used for codes the tables do not cover.
pub const DEFAULT_WIDTH: u16 = 556;

/// Fonts with known metrics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StandardFont {
    Helvetica,
    HelveticaBold,
    Courier,
}

impl StandardFont {
    /// Maps a `/BaseFont` name (optionally with a subset tag like `ABCDEF+`) to a known font.
    /// Oblique variants share the upright widths.
    pub fn from_base_font(name: &str) -> Option<Self> {
        let name = match name.split_once('+') {
            Some((tag, rest)) if tag.len() == 6 => rest,
            _ => name,
        };
        if name.starts_with("Helvetica") || name.starts_with("Arial") {
            if name.contains("Bold") {
                Some(StandardFont::HelveticaBold)
            } else {
                Some(StandardFont::Helvetica)
            }
        } else if name.starts_with("Courier") {
            Some(StandardFont::Courier)
        } else {
            None
        }
    }

    pub fn width(self, code: u8) -> u16 {
        if self == StandardFont::Courier {
            return 600;
        }
        let bold = self == StandardFont::HelveticaBold;
        match code {
            FIRST_CODE..=126 => {
                let idx = (code - FIRST_CODE) as usize;
                if bold { HELVETICA_BOLD[idx] } else { HELVETICA[idx] }
            }
            0x80 => 556,
            0x85 | 0x89 | 0x97 => 1000,
            0x91 | 0x92 => if bold { 278 } else { 222 },
            0x93 | 0x94 => if bold { 500 } else { 333 },
            0x95 => 350,
            0x96 => 556,
            0xA0 => 278,
            _ => DEFAULT_WIDTH,
        }
    }

    /// Width of already-encoded text in points.
    pub fn measure(self, encoded: &[u8], font_size: f32) -> f32 {
        let units: u32 = encoded.iter().map(|&b| self.width(b) as u32).sum();
        units as f32 * font_size / 1000.0
    }

    /// The full `/Widths` array for codes `32..=255`.
    pub fn widths_array(self) -> Vec<u16> {
        (FIRST_CODE..=255).map(|c| self.width(c)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_widths() {
        assert_eq!(StandardFont::Helvetica.width(b' '), 278);
        assert_eq!(StandardFont::Helvetica.width(b'W'), 944);
        assert_eq!(StandardFont::HelveticaBold.width(b'b'), 611);
        assert_eq!(StandardFont::Helvetica.width(b'~'), 584);
        assert_eq!(StandardFont::Helvetica.width(0x95), 350);
    }

    #[test]
    fn base_font_resolution() {
        assert_eq!(
            StandardFont::from_base_font("Helvetica-BoldOblique"),
            Some(StandardFont::HelveticaBold)
        );
        assert_eq!(
            StandardFont::from_base_font("ABCDEF+Arial"),
            Some(StandardFont::Helvetica)
        );
        assert_eq!(StandardFont::from_base_font("Times-Roman"), None);
    }

    #[test]
    fn measure_scales_with_size() {
        let w = StandardFont::Helvetica.measure(b"ab", 10.0);
        assert!((w - 11.12).abs() < 1e-4);
        assert_eq!(StandardFont::Helvetica.widths_array().len(), 224);
    }
}
