//! A paginated report layout engine for PDFs built on lopdf
//!
//! A report is an ordered list of [`ContentBlock`]s (titles, key/value
//! details, paragraphs, tables and spacers). The [`DocumentAssembler`] lays
//! them out on fixed-size pages, breaking pages between blocks and between
//! table rows but never inside either, and writes the finished document to
//! a [`Sink`].

use std::path::{Path, PathBuf};
use tracing::{debug, instrument};

pub mod block;
pub mod constants;
pub mod document;
pub mod drawing;
pub mod error;
pub mod font;
pub mod geometry;
pub mod layout;
pub mod pagination;
pub mod program;
pub mod render;
pub mod report;
pub mod sink;
pub mod style;
pub mod text;

pub use block::{Column, ColumnSpec, ContentBlock, Emphasis};
pub use document::{AssemblerState, DocumentAssembler, RenderedDocument};
pub use error::{ReportError, Result};
pub use font::{FontMetrics, HeuristicMetrics};
#[cfg(feature = "ttf-parser")]
pub use font::TtfFontMetrics;
pub use geometry::{Margins, PageGeometry};
pub use layout::{ColumnPlan, compute_widths};
pub use pagination::{Cursor, NoChrome, PageBreaker, PageChrome, RepeatedTitle};
pub use program::{Exercise, FieldValue, TrainingProgram};
pub use report::{LayoutReport, PageReport, Placement, PlacementKind};
pub use sink::{BufferSink, FileSink, Sink};
pub use style::{Alignment, Color, Padding, ReportStyle};

/// Where a rendered program document should go
#[derive(Debug, Clone, PartialEq)]
pub enum Destination {
    /// Write to exactly this path
    File(PathBuf),
    /// Write into this directory under a generated `program_<id>_<timestamp>.pdf`
    Directory(PathBuf),
}

impl Destination {
    /// Concrete file path for `program`
    pub fn resolve(&self, program: &TrainingProgram) -> PathBuf {
        match self {
            Destination::File(path) => path.clone(),
            Destination::Directory(dir) => {
                dir.join(program.file_name(chrono::Utc::now().timestamp_millis()))
            }
        }
    }
}

/// Result of [`render_program_document`]
#[derive(Debug, Clone, PartialEq)]
pub enum RenderOutput {
    /// The complete PDF in memory
    Buffer(Vec<u8>),
    /// Path of the written PDF
    File(PathBuf),
}

impl RenderOutput {
    pub fn as_path(&self) -> Option<&Path> {
        match self {
            RenderOutput::File(path) => Some(path),
            RenderOutput::Buffer(_) => None,
        }
    }

    pub fn into_bytes(self) -> Option<Vec<u8>> {
        match self {
            RenderOutput::Buffer(bytes) => Some(bytes),
            RenderOutput::File(_) => None,
        }
    }
}

/// The default assembler for a program: A4, standard style, PDF title set
pub fn program_assembler(program: &TrainingProgram) -> DocumentAssembler {
    DocumentAssembler::new(PageGeometry::a4()).with_title(program.title.clone())
}

/// Render a training program to PDF.
///
/// Without a destination the document is returned in memory; otherwise it is
/// written atomically to the destination and its path returned.
pub fn render_program_document(
    program: &TrainingProgram,
    destination: Option<&Destination>,
) -> Result<RenderOutput> {
    render_program_document_with(program_assembler(program), program, destination)
}

/// Like [`render_program_document`] with a caller-configured assembler
#[instrument(skip_all, fields(title = %program.title, exercises = program.exercises.len()))]
pub fn render_program_document_with(
    mut assembler: DocumentAssembler,
    program: &TrainingProgram,
    destination: Option<&Destination>,
) -> Result<RenderOutput> {
    let blocks = program.to_blocks();
    match destination {
        None => {
            let rendered = assembler.render(&blocks, &mut BufferSink::new())?;
            debug!("Rendered {} bytes", rendered.output.len());
            Ok(RenderOutput::Buffer(rendered.output))
        }
        Some(destination) => {
            let mut sink = FileSink::new(destination.resolve(program));
            let rendered = assembler.render(&blocks, &mut sink)?;
            debug!("Rendered {}", rendered.output.display());
            Ok(RenderOutput::File(rendered.output))
        }
    }
}

/// Async variant of [`render_program_document_with`]: layout runs inline,
/// file output is written through tokio and awaited to completion.
#[cfg(feature = "async")]
pub async fn render_program_document_async(
    mut assembler: DocumentAssembler,
    program: &TrainingProgram,
    destination: Option<&Destination>,
) -> Result<RenderOutput> {
    let blocks = program.to_blocks();
    let rendered = assembler.render(&blocks, &mut BufferSink::new())?;
    match destination {
        None => Ok(RenderOutput::Buffer(rendered.output)),
        Some(destination) => {
            let path = destination.resolve(program);
            let path = sink::write_atomic(&path, &rendered.output).await?;
            Ok(RenderOutput::File(path))
        }
    }
}
