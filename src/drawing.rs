//! PDF content operations for one page

use crate::font::FontFace;
use crate::style::Color;
use crate::text::encode_win_ansi;
use lopdf::content::{Content, Operation};
use lopdf::{Object, StringFormat};
use tracing::trace;

/// Content stream operations accumulated for a single page.
///
/// Coordinates are PDF user space: origin at the bottom-left corner, y up.
#[derive(Debug, Default)]
pub struct PageCanvas {
    operations: Vec<Operation>,
}

impl PageCanvas {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn operations(&self) -> &[Operation] {
        &self.operations
    }

    pub fn is_empty(&self) -> bool {
        self.operations.is_empty()
    }

    /// Draw one line of text with its baseline starting at (x, y)
    pub fn text(&mut self, x: f64, y: f64, face: FontFace, font_size: f64, text: &str) {
        if text.is_empty() {
            return;
        }
        self.operations.extend([
            Operation::new("BT", vec![]),
            Operation::new(
                "Tf",
                vec![
                    Object::Name(face.resource_name().as_bytes().to_vec()),
                    real(font_size),
                ],
            ),
            Operation::new("rg", color_operands(Color::black())),
            Operation::new("Td", vec![real(x), real(y)]),
            Operation::new(
                "Tj",
                vec![Object::String(encode_win_ansi(text), StringFormat::Literal)],
            ),
            Operation::new("ET", vec![]),
        ]);
    }

    /// Draw a filled rectangle with its lower-left corner at (x, y)
    pub fn fill_rect(&mut self, x: f64, y: f64, width: f64, height: f64, color: Color) {
        self.operations.extend([
            Operation::new("q", vec![]),
            Operation::new("rg", color_operands(color)),
            Operation::new("re", vec![real(x), real(y), real(width), real(height)]),
            Operation::new("f", vec![]),
            Operation::new("Q", vec![]),
        ]);
    }

    /// Stroke a horizontal line
    pub fn horizontal_rule(&mut self, start_x: f64, end_x: f64, y: f64, color: Color, width: f64) {
        self.operations.extend([
            Operation::new("q", vec![]),
            Operation::new("RG", color_operands(color)),
            Operation::new("w", vec![real(width)]),
            Operation::new("m", vec![real(start_x), real(y)]),
            Operation::new("l", vec![real(end_x), real(y)]),
            Operation::new("S", vec![]),
            Operation::new("Q", vec![]),
        ]);
    }

    /// Consume the canvas into an encodable content stream
    pub fn into_content(self) -> Content {
        trace!("Finished page with {} operations", self.operations.len());
        Content {
            operations: self.operations,
        }
    }
}

fn real(value: f64) -> Object {
    (value as f32).into()
}

fn color_operands(color: Color) -> Vec<Object> {
    vec![color.r.into(), color.g.into(), color.b.into()]
}
