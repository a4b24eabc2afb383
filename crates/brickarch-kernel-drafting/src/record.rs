//! In-memory drawing host.

use std::io::Write;

use brickarch_kernel_layout::Point2D;
use serde::{Deserialize, Serialize};

use crate::drawing::ArchDrawing;
use crate::error::{DraftingError, Result};

/// One call made on a [`DrawingRecord`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum DrawCall {
    /// A closed polygon.
    ClosedPolygon {
        /// Vertices in drawing order.
        points: Vec<Point2D>,
    },
    /// A linear dimension.
    LinearDimension {
        /// Start of the measured segment.
        extension1: Point2D,
        /// End of the measured segment.
        extension2: Point2D,
        /// A point on the dimension line.
        definition: Point2D,
    },
}

/// Records drawing calls in order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DrawingRecord {
    /// Calls in the order they were made.
    pub calls: Vec<DrawCall>,
}

impl DrawingRecord {
    /// Create an empty record.
    pub fn new() -> Self {
        Self::default()
    }

    /// Recorded polygons.
    pub fn polygons(&self) -> impl Iterator<Item = &[Point2D]> {
        self.calls.iter().filter_map(|call| match call {
            DrawCall::ClosedPolygon { points } => Some(points.as_slice()),
            DrawCall::LinearDimension { .. } => None,
        })
    }

    /// Number of recorded dimensions.
    pub fn num_dimensions(&self) -> usize {
        self.calls
            .iter()
            .filter(|call| matches!(call, DrawCall::LinearDimension { .. }))
            .count()
    }

    /// Pretty-printed JSON of the record.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Write the record as JSON.
    pub fn write_json(&self, mut writer: impl Write) -> Result<()> {
        serde_json::to_writer_pretty(&mut writer, self)?;
        writeln!(writer)?;
        Ok(())
    }
}

impl ArchDrawing for DrawingRecord {
    fn draw_closed_polygon(&mut self, points: &[Point2D]) -> Result<()> {
        if points.len() < 3 {
            return Err(DraftingError::DegeneratePolygon(points.len()));
        }
        self.calls.push(DrawCall::ClosedPolygon {
            points: points.to_vec(),
        });
        Ok(())
    }

    fn draw_linear_dimension(
        &mut self,
        extension1: Point2D,
        extension2: Point2D,
        definition: Point2D,
    ) -> Result<()> {
        self.calls.push(DrawCall::LinearDimension {
            extension1,
            extension2,
            definition,
        });
        Ok(())
    }
}
