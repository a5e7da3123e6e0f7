//! Error types for the lopdf-report library

use thiserror::Error;

/// Result type alias using ReportError
pub type Result<T> = std::result::Result<T, ReportError>;

/// Errors that can occur while laying out or writing a report
#[derive(Debug, Error)]
pub enum ReportError {
    /// Malformed column specification or page geometry
    #[error("Invalid layout: {0}")]
    InvalidLayout(String),

    /// A block (or a single table row) cannot fit on an empty page
    #[error("{kind} needs {height:.1}pt but an empty page holds only {available:.1}pt")]
    BlockTooLarge {
        kind: &'static str,
        height: f64,
        available: f64,
    },

    /// The output destination failed
    #[error("Sink write failed: {0}")]
    SinkWrite(#[from] std::io::Error),

    /// Error from the underlying lopdf library
    #[error("PDF operation failed: {0}")]
    Pdf(#[from] lopdf::Error),

    /// The assembler has already rendered a document
    #[error("Document assembler is already finalized")]
    AlreadyFinalized,

    /// The program record could not be parsed
    #[error("Invalid program record: {0}")]
    InvalidInput(#[from] serde_json::Error),
}
