//! Styling for report blocks

use crate::constants::*;

/// RGB color representation
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

impl Color {
    /// Create a new RGB color (values should be 0.0-1.0)
    pub fn rgb(r: f32, g: f32, b: f32) -> Self {
        Self {
            r: r.clamp(0.0, 1.0),
            g: g.clamp(0.0, 1.0),
            b: b.clamp(0.0, 1.0),
        }
    }

    pub fn black() -> Self {
        Self::rgb(0.0, 0.0, 0.0)
    }

    /// Gray color
    pub fn gray(level: f32) -> Self {
        let l = level.clamp(0.0, 1.0);
        Self::rgb(l, l, l)
    }

    pub fn light_gray() -> Self {
        Self::gray(0.88)
    }
}

impl Default for Color {
    fn default() -> Self {
        Self::black()
    }
}

/// Horizontal text alignment within a column
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Alignment {
    #[default]
    Left,
    Center,
    Right,
}

/// Padding inside table cells
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Padding {
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
    pub left: f64,
}

impl Padding {
    /// Create uniform padding
    pub fn uniform(value: f64) -> Self {
        Self {
            top: value,
            right: value,
            bottom: value,
            left: value,
        }
    }

    /// Create padding with vertical and horizontal values
    pub fn symmetric(vertical: f64, horizontal: f64) -> Self {
        Self {
            top: vertical,
            bottom: vertical,
            left: horizontal,
            right: horizontal,
        }
    }

    pub fn horizontal(&self) -> f64 {
        self.left + self.right
    }

    pub fn vertical(&self) -> f64 {
        self.top + self.bottom
    }
}

impl Default for Padding {
    fn default() -> Self {
        Self::uniform(DEFAULT_PADDING)
    }
}

/// Typography and decoration shared by every block of a report
#[derive(Debug, Clone)]
pub struct ReportStyle {
    pub font_size: f64,
    pub title_font_size: f64,
    pub heading_font_size: f64,
    pub footer_font_size: f64,
    pub line_height_multiplier: f64,
    /// Space below every title block
    pub title_spacing: f64,
    pub cell_padding: Padding,
    pub header_background: Option<Color>,
    pub rule_color: Color,
    pub rule_width: f64,
    /// Repeat the table header row at the top of every continuation page
    pub repeat_table_header: bool,
    /// chrono format string for the generation footer
    pub footer_date_format: String,
}

impl Default for ReportStyle {
    fn default() -> Self {
        Self {
            font_size: DEFAULT_FONT_SIZE,
            title_font_size: TITLE_FONT_SIZE,
            heading_font_size: HEADING_FONT_SIZE,
            footer_font_size: FOOTER_FONT_SIZE,
            line_height_multiplier: DEFAULT_LINE_HEIGHT_MULTIPLIER,
            title_spacing: TITLE_SPACING,
            cell_padding: Padding::default(),
            header_background: Some(Color::light_gray()),
            rule_color: Color::gray(0.6),
            rule_width: DEFAULT_RULE_WIDTH,
            repeat_table_header: false,
            footer_date_format: "%B %-d, %Y %H:%M".to_string(),
        }
    }
}

impl ReportStyle {
    /// Set the body font size
    pub fn with_font_size(mut self, size: f64) -> Self {
        self.font_size = size;
        self
    }

    /// Set the cell padding
    pub fn with_cell_padding(mut self, padding: Padding) -> Self {
        self.cell_padding = padding;
        self
    }

    /// Repeat the table header on continuation pages
    pub fn with_repeated_table_header(mut self, repeat: bool) -> Self {
        self.repeat_table_header = repeat;
        self
    }

    /// Set the header row background (None draws no fill)
    pub fn with_header_background(mut self, color: Option<Color>) -> Self {
        self.header_background = color;
        self
    }

    /// Line height for text set at `font_size`
    pub fn line_height(&self, font_size: f64) -> f64 {
        font_size * self.line_height_multiplier
    }

    /// Line height of body text
    pub fn body_line_height(&self) -> f64 {
        self.line_height(self.font_size)
    }

    /// Height of a table row holding a single line in every cell
    pub fn single_row_height(&self) -> f64 {
        self.body_line_height() + self.cell_padding.vertical()
    }
}
