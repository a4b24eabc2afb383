//! Dimension annotations for a solved arch.
//!
//! Each annotation is a linear dimension request in the form drafting hosts
//! expect: two extension points on the measured geometry and a definition
//! point that fixes where the dimension line is drawn.

use brickarch_kernel_math::{left_normal, Point2, Tolerance};
use serde::{Deserialize, Serialize};

use crate::solver::ResolvedArch;
use crate::types::Point2D;

/// What a dimension measures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DimensionLabel {
    /// Span along the springing line.
    BottomLength,
    /// Length of the top edge.
    TopLength,
    /// Top width of the keystone brick.
    BrickWidth,
    /// Rise of the arch.
    ArchHeight,
}

/// A linear dimension request.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LinearDimension {
    /// What is measured.
    pub label: DimensionLabel,
    /// Start of the measured segment.
    pub extension1: Point2D,
    /// End of the measured segment.
    pub extension2: Point2D,
    /// A point on the dimension line.
    pub definition: Point2D,
}

impl LinearDimension {
    /// Create a new dimension request.
    pub fn new(
        label: DimensionLabel,
        extension1: Point2D,
        extension2: Point2D,
        definition: Point2D,
    ) -> Self {
        Self {
            label,
            extension1,
            extension2,
            definition,
        }
    }

    /// The measured distance.
    pub fn measurement(&self) -> f64 {
        self.extension1.distance(&self.extension2)
    }

    /// Check if the measured segment has zero length.
    pub fn is_degenerate(&self, tolerance: &Tolerance) -> bool {
        tolerance.is_zero(self.measurement())
    }

    /// End points of the dimension line, see [`dimension_line`].
    pub fn dimension_line(&self) -> (Point2D, Point2D) {
        dimension_line(self.extension1, self.extension2, self.definition)
    }

    /// Midpoint of the dimension line, where the measurement text goes.
    pub fn text_position(&self) -> Point2D {
        let (a, b) = self.dimension_line();
        Point2D::new((a.x + b.x) / 2.0, (a.y + b.y) / 2.0)
    }
}

/// End points of a linear dimension line.
///
/// The line runs parallel to the measured segment through the definition
/// point. A degenerate segment collapses to its first extension point.
pub fn dimension_line(
    extension1: Point2D,
    extension2: Point2D,
    definition: Point2D,
) -> (Point2D, Point2D) {
    let p1: Point2 = extension1.into();
    let p2: Point2 = extension2.into();
    let Some(normal) = left_normal(&(p2 - p1)) else {
        return (extension1, extension1);
    };
    let reach = (Point2::from(definition) - p1).dot(&normal);
    let shift = normal * reach;
    ((p1 + shift).into(), (p2 + shift).into())
}

/// Dimension requests for the length, width and height of an arch.
///
/// `offset` is the gap between the arch outline and each dimension line.
/// The keystone width sits one further offset above the top length.
pub fn annotate(resolved: &ResolvedArch, offset: f64) -> Vec<LinearDimension> {
    let bottom = resolved.bottom_row();
    let top = resolved.top_row();
    let height = resolved.arch_height;
    let keystone = resolved.keystone_index();

    let bottom_left = Point2D::new(bottom.offset, 0.0);
    let bottom_right = Point2D::new(bottom.offset + bottom.length, 0.0);
    let top_left = Point2D::new(0.0, height);
    let top_right = Point2D::new(top.length, height);

    let key_left = Point2D::new(top.left(keystone, resolved.joint_size), height);
    let key_right = Point2D::new(top.right(keystone, resolved.joint_size), height);

    vec![
        LinearDimension::new(
            DimensionLabel::BottomLength,
            bottom_left,
            bottom_right,
            Point2D::new(bottom_left.x, -offset),
        ),
        LinearDimension::new(
            DimensionLabel::TopLength,
            top_left,
            top_right,
            Point2D::new(top_left.x, height + offset),
        ),
        LinearDimension::new(
            DimensionLabel::BrickWidth,
            key_left,
            key_right,
            Point2D::new(key_left.x, height + 2.0 * offset),
        ),
        LinearDimension::new(
            DimensionLabel::ArchHeight,
            Point2D::ORIGIN,
            top_left,
            Point2D::new(-offset, 0.0),
        ),
    ]
}
