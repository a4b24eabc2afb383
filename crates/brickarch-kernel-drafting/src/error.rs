//! Error types for arch drawing.

use brickarch_kernel_layout::ArchError;
use thiserror::Error;

/// Errors that can occur while drawing an arch.
#[derive(Error, Debug)]
pub enum DraftingError {
    /// The arch could not be laid out.
    #[error(transparent)]
    Layout(#[from] ArchError),

    /// A polygon had too few vertices to close.
    #[error("closed polygon needs at least 3 vertices, got {0}")]
    DegeneratePolygon(usize),

    /// Writing the drawing failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serializing the drawing failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type for drafting operations.
pub type Result<T> = std::result::Result<T, DraftingError>;
