//! Column width calculation for table blocks

use crate::Result;
use crate::block::ColumnSpec;
use crate::error::ReportError;
use tracing::trace;

/// Resolve relative column weights into absolute widths.
///
/// Each width is `weight / sum(weights) * printable_width`, so the widths
/// always add back up to `printable_width` and keep the ratios of the weights.
pub fn compute_widths(printable_width: f64, weights: &[f64]) -> Result<Vec<f64>> {
    if weights.is_empty() {
        return Err(ReportError::InvalidLayout(
            "Table has no columns".to_string(),
        ));
    }
    if !printable_width.is_finite() || printable_width <= 0.0 {
        return Err(ReportError::InvalidLayout(format!(
            "Printable width must be positive, got {printable_width}"
        )));
    }
    if let Some((i, weight)) = weights
        .iter()
        .enumerate()
        .find(|(_, w)| !w.is_finite() || **w <= 0.0)
    {
        return Err(ReportError::InvalidLayout(format!(
            "Column {i} has weight {weight}, weights must be positive"
        )));
    }

    let total: f64 = weights.iter().sum();
    let widths: Vec<f64> = weights
        .iter()
        .map(|w| w / total * printable_width)
        .collect();

    trace!("Resolved column widths: {:?}", widths);
    Ok(widths)
}

/// Absolute column widths and x-offsets for one table, computed once and
/// shared by its header row and every data row.
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnPlan {
    widths: Vec<f64>,
    offsets: Vec<f64>,
}

impl ColumnPlan {
    /// Build the plan for `spec` across the given printable width
    pub fn new(printable_width: f64, spec: &ColumnSpec) -> Result<Self> {
        let widths = compute_widths(printable_width, &spec.weights())?;
        let offsets = widths
            .iter()
            .scan(0.0, |running, width| {
                let offset = *running;
                *running += width;
                Some(offset)
            })
            .collect();
        Ok(Self { widths, offsets })
    }

    pub fn widths(&self) -> &[f64] {
        &self.widths
    }

    /// Offsets of each column's left edge from the left margin
    pub fn offsets(&self) -> &[f64] {
        &self.offsets
    }

    pub fn len(&self) -> usize {
        self.widths.len()
    }

    pub fn is_empty(&self) -> bool {
        self.widths.is_empty()
    }

    pub fn total_width(&self) -> f64 {
        self.widths.iter().sum()
    }
}
