//! Constants for page dimensions, typography and the program report layout

/// Standard A4 page width in points
pub const A4_WIDTH: f64 = 595.0;

/// Standard A4 page height in points
pub const A4_HEIGHT: f64 = 842.0;

/// US Letter page width in points
pub const LETTER_WIDTH: f64 = 612.0;

/// US Letter page height in points
pub const LETTER_HEIGHT: f64 = 792.0;

/// Default page margin in points (all four sides)
pub const DEFAULT_MARGIN: f64 = 50.0;

/// Default character width ratio for text estimation
/// (average character width as a fraction of font size)
pub const DEFAULT_CHAR_WIDTH_RATIO: f64 = 0.5;

/// Default line height multiplier
pub const DEFAULT_LINE_HEIGHT_MULTIPLIER: f64 = 1.2;

/// Default body font size in points
pub const DEFAULT_FONT_SIZE: f64 = 10.0;

/// Font size of a strong (document) title
pub const TITLE_FONT_SIZE: f64 = 18.0;

/// Font size of a normal-emphasis title (section heading)
pub const HEADING_FONT_SIZE: f64 = 13.0;

/// Font size of the generation footer
pub const FOOTER_FONT_SIZE: f64 = 8.0;

/// Vertical space added below every title block
pub const TITLE_SPACING: f64 = 10.0;

/// Default cell padding in points
pub const DEFAULT_PADDING: f64 = 4.0;

/// Default rule width in points
pub const DEFAULT_RULE_WIDTH: f64 = 0.5;

/// Placeholder printed for any missing optional value
pub const PLACEHOLDER: &str = "-";

/// Exercise table columns: label and relative weight of the printable width
pub const PROGRAM_COLUMNS: [(&str, f64); 9] = [
    ("Movement", 0.20),
    ("Intensity", 0.10),
    ("Weight", 0.10),
    ("RPE", 0.05),
    ("Sets", 0.05),
    ("Reps", 0.05),
    ("Tempo", 0.10),
    ("Rest", 0.10),
    ("Notes", 0.25),
];
