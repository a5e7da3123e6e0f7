//! Physical page description

use crate::Result;
use crate::constants::*;
use crate::error::ReportError;

/// Page margins in points, clockwise from the top
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Margins {
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
    pub left: f64,
}

impl Margins {
    /// Create margins where all values are equal
    pub fn all(value: f64) -> Self {
        Self {
            top: value,
            right: value,
            bottom: value,
            left: value,
        }
    }

    /// Create margins from individual top, right, bottom and left values
    pub fn trbl(top: f64, right: f64, bottom: f64, left: f64) -> Self {
        Self {
            top,
            right,
            bottom,
            left,
        }
    }
}

impl Default for Margins {
    fn default() -> Self {
        Self::all(DEFAULT_MARGIN)
    }
}

/// Immutable page dimensions with the printable area derived up front.
///
/// All values are in points. The printable area is what remains of the page
/// once the margins are taken away; a geometry whose margins leave no
/// printable area cannot be constructed.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageGeometry {
    width: f64,
    height: f64,
    margins: Margins,
    printable_width: f64,
    printable_height: f64,
}

impl PageGeometry {
    /// Create a geometry, validating that the margins leave a printable area
    pub fn new(width: f64, height: f64, margins: Margins) -> Result<Self> {
        let all = [
            width,
            height,
            margins.top,
            margins.right,
            margins.bottom,
            margins.left,
        ];
        if all.iter().any(|v| !v.is_finite()) {
            return Err(ReportError::InvalidLayout(
                "Page dimensions and margins must be finite".to_string(),
            ));
        }
        if [margins.top, margins.right, margins.bottom, margins.left]
            .iter()
            .any(|m| *m < 0.0)
        {
            return Err(ReportError::InvalidLayout(
                "Margins must not be negative".to_string(),
            ));
        }
        if width <= margins.left + margins.right {
            return Err(ReportError::InvalidLayout(format!(
                "Page width {width} leaves no room inside margins {} + {}",
                margins.left, margins.right
            )));
        }
        if height <= margins.top + margins.bottom {
            return Err(ReportError::InvalidLayout(format!(
                "Page height {height} leaves no room inside margins {} + {}",
                margins.top, margins.bottom
            )));
        }

        Ok(Self {
            width,
            height,
            margins,
            printable_width: width - margins.left - margins.right,
            printable_height: height - margins.top - margins.bottom,
        })
    }

    /// A4 portrait with the default 50pt margins
    pub fn a4() -> Self {
        Self::fixed(A4_WIDTH, A4_HEIGHT)
    }

    /// US Letter portrait with the default 50pt margins
    pub fn letter() -> Self {
        Self::fixed(LETTER_WIDTH, LETTER_HEIGHT)
    }

    // Only for the built-in sizes, which always leave a printable area.
    fn fixed(width: f64, height: f64) -> Self {
        let margins = Margins::default();
        Self {
            width,
            height,
            margins,
            printable_width: width - margins.left - margins.right,
            printable_height: height - margins.top - margins.bottom,
        }
    }

    pub fn width(&self) -> f64 {
        self.width
    }

    pub fn height(&self) -> f64 {
        self.height
    }

    pub fn margins(&self) -> Margins {
        self.margins
    }

    pub fn printable_width(&self) -> f64 {
        self.printable_width
    }

    pub fn printable_height(&self) -> f64 {
        self.printable_height
    }

    /// Convert a distance below the top margin into a PDF y coordinate
    /// (PDF space grows upwards from the bottom edge)
    pub fn pdf_y(&self, offset: f64) -> f64 {
        self.height - self.margins.top - offset
    }

    /// Convert a distance from the left margin into a PDF x coordinate
    pub fn pdf_x(&self, offset: f64) -> f64 {
        self.margins.left + offset
    }
}

impl Default for PageGeometry {
    fn default() -> Self {
        Self::a4()
    }
}
