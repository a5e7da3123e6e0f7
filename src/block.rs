//! Content blocks a report is built from

use crate::Result;
use crate::error::ReportError;
use crate::style::Alignment;
use tracing::trace;

/// A named table column with its share of the printable width
#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    pub label: String,
    pub weight: f64,
    pub alignment: Alignment,
}

impl Column {
    /// Create a left-aligned column
    pub fn new<S: Into<String>>(label: S, weight: f64) -> Self {
        Self {
            label: label.into(),
            weight,
            alignment: Alignment::Left,
        }
    }

    /// Set the column's text alignment
    pub fn aligned(mut self, alignment: Alignment) -> Self {
        self.alignment = alignment;
        self
    }
}

/// Ordered columns of a table. The order is fixed for the whole table.
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnSpec {
    columns: Vec<Column>,
}

impl ColumnSpec {
    pub fn new(columns: Vec<Column>) -> Self {
        Self { columns }
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    pub fn weights(&self) -> Vec<f64> {
        self.columns.iter().map(|c| c.weight).collect()
    }

    /// Validate that there is at least one column and every weight is positive
    pub fn validate(&self) -> Result<()> {
        if self.columns.is_empty() {
            return Err(ReportError::InvalidLayout(
                "Table has no columns".to_string(),
            ));
        }
        for column in &self.columns {
            if !column.weight.is_finite() || column.weight <= 0.0 {
                return Err(ReportError::InvalidLayout(format!(
                    "Column '{}' has weight {}, weights must be positive",
                    column.label, column.weight
                )));
            }
        }
        Ok(())
    }
}

/// Weight of a title block
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Emphasis {
    /// Section heading
    Normal,
    /// Document title
    #[default]
    Strong,
}

/// One unit of document content. A block is never split across pages,
/// except a table, which may break between rows.
#[derive(Debug, Clone, PartialEq)]
pub enum ContentBlock {
    Title {
        text: String,
        emphasis: Emphasis,
    },
    KeyValue {
        pairs: Vec<(String, String)>,
    },
    Paragraph {
        label: Option<String>,
        text: String,
    },
    Table {
        columns: ColumnSpec,
        rows: Vec<Vec<String>>,
    },
    Spacer {
        height: f64,
    },
}

impl ContentBlock {
    /// Create a strong title
    pub fn title<S: Into<String>>(text: S) -> Self {
        ContentBlock::Title {
            text: text.into(),
            emphasis: Emphasis::Strong,
        }
    }

    /// Create a section heading
    pub fn heading<S: Into<String>>(text: S) -> Self {
        ContentBlock::Title {
            text: text.into(),
            emphasis: Emphasis::Normal,
        }
    }

    pub fn key_value<K, V>(pairs: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        ContentBlock::KeyValue {
            pairs: pairs
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }

    pub fn paragraph<S: Into<String>>(label: Option<&str>, text: S) -> Self {
        ContentBlock::Paragraph {
            label: label.map(str::to_string),
            text: text.into(),
        }
    }

    pub fn table(columns: ColumnSpec, rows: Vec<Vec<String>>) -> Self {
        ContentBlock::Table { columns, rows }
    }

    pub fn spacer(height: f64) -> Self {
        ContentBlock::Spacer { height }
    }

    /// Short name of the block kind, used in logs and errors
    pub fn kind(&self) -> &'static str {
        match self {
            ContentBlock::Title { .. } => "title",
            ContentBlock::KeyValue { .. } => "key/value block",
            ContentBlock::Paragraph { .. } => "paragraph",
            ContentBlock::Table { .. } => "table",
            ContentBlock::Spacer { .. } => "spacer",
        }
    }

    /// Check the block's structure before any rendering starts
    pub fn validate(&self) -> Result<()> {
        match self {
            ContentBlock::Table { columns, rows } => {
                columns.validate()?;
                for (i, row) in rows.iter().enumerate() {
                    if row.len() != columns.len() {
                        return Err(ReportError::InvalidLayout(format!(
                            "Row {} has {} cells, expected {}",
                            i,
                            row.len(),
                            columns.len()
                        )));
                    }
                }
                trace!("Validated table with {} rows", rows.len());
                Ok(())
            }
            ContentBlock::Spacer { height } if !height.is_finite() || *height < 0.0 => Err(
                ReportError::InvalidLayout(format!("Spacer height {height} is not valid")),
            ),
            _ => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn two_columns() -> ColumnSpec {
        ColumnSpec::new(vec![Column::new("A", 1.0), Column::new("B", 1.0)])
    }

    #[test]
    fn test_table_validation() {
        let ok = ContentBlock::table(two_columns(), vec![vec!["1".into(), "2".into()]]);
        assert!(ok.validate().is_ok());

        let short_row = ContentBlock::table(two_columns(), vec![vec!["1".into()]]);
        assert!(matches!(
            short_row.validate(),
            Err(ReportError::InvalidLayout(_))
        ));
    }

    #[test]
    fn test_zero_weight_column_rejected() {
        let spec = ColumnSpec::new(vec![Column::new("A", 1.0), Column::new("B", 0.0)]);
        assert!(spec.validate().is_err());
        assert!(ColumnSpec::new(vec![]).validate().is_err());
    }

    #[test]
    fn test_negative_spacer_rejected() {
        assert!(ContentBlock::spacer(-1.0).validate().is_err());
        assert!(ContentBlock::spacer(12.0).validate().is_ok());
    }

    #[test]
    fn test_builders() {
        let kv = ContentBlock::key_value([("Goal", "Strength")]);
        assert_eq!(
            kv,
            ContentBlock::KeyValue {
                pairs: vec![("Goal".to_string(), "Strength".to_string())]
            }
        );
        assert_eq!(ContentBlock::heading("Exercises").kind(), "title");
    }
}
