//! Training program records and their report layout
//!
//! Missing optional values are replaced by [`PLACEHOLDER`] while the blocks
//! are built, so rendering never sees an absent value.

use crate::Result;
use crate::block::{Column, ColumnSpec, ContentBlock};
use crate::constants::{PLACEHOLDER, PROGRAM_COLUMNS};
use crate::style::Alignment;
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::trace;

/// Space between the program details and the exercise table
const SECTION_SPACING: f64 = 12.0;

/// A scalar that may arrive as a JSON string or number
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Integer(i64),
    Float(f64),
    Text(String),
}

impl FieldValue {
    /// Whether the value would print as nothing
    pub fn is_blank(&self) -> bool {
        matches!(self, FieldValue::Text(s) if s.trim().is_empty())
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::Integer(v) => write!(f, "{v}"),
            FieldValue::Float(v) => write!(f, "{v}"),
            FieldValue::Text(s) => f.write_str(s.trim()),
        }
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        FieldValue::Text(value.to_string())
    }
}

impl From<i64> for FieldValue {
    fn from(value: i64) -> Self {
        FieldValue::Integer(value)
    }
}

impl From<f64> for FieldValue {
    fn from(value: f64) -> Self {
        FieldValue::Float(value)
    }
}

/// One row of a program's exercise list
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Exercise {
    pub movement: String,
    pub intensity: Option<FieldValue>,
    pub weight_used: Option<FieldValue>,
    pub rpe: Option<FieldValue>,
    pub sets: Option<FieldValue>,
    pub reps: Option<FieldValue>,
    pub tempo: Option<FieldValue>,
    pub rest: Option<FieldValue>,
    pub notes: Option<FieldValue>,
}

impl Exercise {
    pub fn new<S: Into<String>>(movement: S) -> Self {
        Self {
            movement: movement.into(),
            ..Default::default()
        }
    }

    /// Table cells in column order, with placeholders for missing values
    pub fn cells(&self) -> Vec<String> {
        vec![
            text_or_placeholder(Some(&self.movement)),
            value_or_placeholder(self.intensity.as_ref()),
            value_or_placeholder(self.weight_used.as_ref()),
            value_or_placeholder(self.rpe.as_ref()),
            value_or_placeholder(self.sets.as_ref()),
            value_or_placeholder(self.reps.as_ref()),
            value_or_placeholder(self.tempo.as_ref()),
            value_or_placeholder(self.rest.as_ref()),
            value_or_placeholder(self.notes.as_ref()),
        ]
    }
}

/// A training program as handed over by the data layer
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrainingProgram {
    pub id: Option<FieldValue>,
    pub title: String,
    pub goal_type: Option<String>,
    pub difficulty: Option<String>,
    pub description: Option<String>,
    #[serde(default)]
    pub exercises: Vec<Exercise>,
}

impl TrainingProgram {
    pub fn new<S: Into<String>>(title: S) -> Self {
        Self {
            title: title.into(),
            ..Default::default()
        }
    }

    /// Parse a program record from JSON
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn with_exercise(mut self, exercise: Exercise) -> Self {
        self.exercises.push(exercise);
        self
    }

    /// The nine fixed exercise table columns
    pub fn exercise_columns() -> ColumnSpec {
        ColumnSpec::new(
            PROGRAM_COLUMNS
                .iter()
                .map(|(label, weight)| {
                    let alignment = match *label {
                        "RPE" | "Sets" | "Reps" => Alignment::Center,
                        _ => Alignment::Left,
                    };
                    Column::new(*label, *weight).aligned(alignment)
                })
                .collect(),
        )
    }

    /// Build the report: title, details, description and the exercise table
    pub fn to_blocks(&self) -> Vec<ContentBlock> {
        let mut blocks = vec![
            ContentBlock::title(text_or_placeholder(Some(&self.title))),
            ContentBlock::key_value([
                ("Goal", text_or_placeholder(self.goal_type.as_deref())),
                ("Difficulty", text_or_placeholder(self.difficulty.as_deref())),
                ("Exercises", self.exercises.len().to_string()),
            ]),
            ContentBlock::paragraph(
                Some("Description"),
                text_or_placeholder(self.description.as_deref()),
            ),
            ContentBlock::spacer(SECTION_SPACING),
        ];

        if !self.exercises.is_empty() {
            blocks.push(ContentBlock::heading("Exercises"));
            blocks.push(ContentBlock::table(
                Self::exercise_columns(),
                self.exercises.iter().map(Exercise::cells).collect(),
            ));
        }

        trace!("Built {} blocks for '{}'", blocks.len(), self.title);
        blocks
    }

    /// File name for a generated document: `program_<id>_<timestamp>.pdf`
    pub fn file_name(&self, timestamp_millis: i64) -> String {
        let id = self
            .id
            .as_ref()
            .filter(|id| !id.is_blank())
            .map(|id| sanitize(&id.to_string()))
            .filter(|id| !id.is_empty())
            .unwrap_or_else(|| "draft".to_string());
        format!("program_{id}_{timestamp_millis}.pdf")
    }
}

fn text_or_placeholder(value: Option<&str>) -> String {
    match value.map(str::trim) {
        Some(text) if !text.is_empty() => text.to_string(),
        _ => PLACEHOLDER.to_string(),
    }
}

fn value_or_placeholder(value: Option<&FieldValue>) -> String {
    match value {
        Some(v) if !v.is_blank() => v.to_string(),
        _ => PLACEHOLDER.to_string(),
    }
}

fn sanitize(id: &str) -> String {
    id.chars()
        .filter(|c| c.is_ascii_alphanumeric() || *c == '-' || *c == '_')
        .collect()
}
