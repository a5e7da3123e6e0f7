//! Fonts used by the report and text measurement

use crate::constants::DEFAULT_CHAR_WIDTH_RATIO;

/// The two built-in faces a report is set in
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FontFace {
    Regular,
    Bold,
}

impl FontFace {
    /// Name of the face in the page resource dictionary
    pub fn resource_name(&self) -> &'static str {
        match self {
            FontFace::Regular => "F1",
            FontFace::Bold => "F1-Bold",
        }
    }

    /// Standard Type1 font backing the face
    pub fn base_font(&self) -> &'static str {
        match self {
            FontFace::Regular => "Helvetica",
            FontFace::Bold => "Helvetica-Bold",
        }
    }
}

/// Trait for measuring text width.
///
/// Layout only ever asks for widths; a better estimate makes wrapping and
/// therefore page breaking more faithful to what the viewer draws.
pub trait FontMetrics: Send + Sync {
    /// Width of a single character in points at the given font size
    fn char_width(&self, ch: char, font_size: f64) -> f64;

    /// Total width of a string in points at the given font size
    fn text_width(&self, text: &str, font_size: f64) -> f64 {
        text.chars().map(|ch| self.char_width(ch, font_size)).sum()
    }
}

/// Fixed average-character-width estimate.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HeuristicMetrics {
    /// Average character width as a fraction of the font size
    pub char_width_ratio: f64,
}

impl HeuristicMetrics {
    pub fn new(char_width_ratio: f64) -> Self {
        Self { char_width_ratio }
    }
}

impl Default for HeuristicMetrics {
    fn default() -> Self {
        Self::new(DEFAULT_CHAR_WIDTH_RATIO)
    }
}

impl FontMetrics for HeuristicMetrics {
    fn char_width(&self, _ch: char, font_size: f64) -> f64 {
        font_size * self.char_width_ratio
    }
}

/// TrueType font metrics using ttf-parser for glyph advance measurement.
///
/// The font is only measured, never embedded: pass the metrics of a face that
/// resembles Helvetica (Arial, Liberation Sans, ...) to tighten wrapping.
#[cfg(feature = "ttf-parser")]
pub struct TtfFontMetrics {
    font_data: Vec<u8>,
    units_per_em: f64,
}

#[cfg(feature = "ttf-parser")]
impl TtfFontMetrics {
    /// Create new font metrics from raw TTF/TTC font data.
    pub fn new(font_data: Vec<u8>) -> crate::Result<Self> {
        let face = ttf_parser::Face::parse(&font_data, 0).map_err(|e| {
            crate::error::ReportError::InvalidLayout(format!("Failed to parse font: {e}"))
        })?;
        let units_per_em = f64::from(face.units_per_em());
        Ok(Self {
            font_data,
            units_per_em,
        })
    }

    fn advance(&self, face: &ttf_parser::Face<'_>, ch: char, font_size: f64) -> f64 {
        face.glyph_index(ch)
            .and_then(|gid| face.glyph_hor_advance(gid))
            .map(|advance| f64::from(advance) / self.units_per_em * font_size)
            .unwrap_or(font_size * DEFAULT_CHAR_WIDTH_RATIO)
    }
}

#[cfg(feature = "ttf-parser")]
impl FontMetrics for TtfFontMetrics {
    fn char_width(&self, ch: char, font_size: f64) -> f64 {
        match ttf_parser::Face::parse(&self.font_data, 0) {
            Ok(face) => self.advance(&face, ch, font_size),
            Err(_) => font_size * DEFAULT_CHAR_WIDTH_RATIO,
        }
    }

    fn text_width(&self, text: &str, font_size: f64) -> f64 {
        match ttf_parser::Face::parse(&self.font_data, 0) {
            Ok(face) => text
                .chars()
                .map(|ch| self.advance(&face, ch, font_size))
                .sum(),
            Err(_) => text.chars().count() as f64 * font_size * DEFAULT_CHAR_WIDTH_RATIO,
        }
    }
}

#[cfg(feature = "ttf-parser")]
impl std::fmt::Debug for TtfFontMetrics {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TtfFontMetrics")
            .field("units_per_em", &self.units_per_em)
            .field("font_data_len", &self.font_data.len())
            .finish()
    }
}
