//! The drawing seam between arch layouts and drafting hosts.

use brickarch_kernel_layout::{ArchLayout, Point2D};
use brickarch_kernel_math::Tolerance;
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::error::Result;

/// A host that can draw arch geometry.
///
/// Implementations receive bricks as closed polygons and dimensions as
/// linear dimension requests. Hosts decide layers, styles and units.
pub trait ArchDrawing {
    /// Draw a closed polygon through `points` in order.
    fn draw_closed_polygon(&mut self, points: &[Point2D]) -> Result<()>;

    /// Draw a linear dimension measuring `extension1` to `extension2`, with
    /// the dimension line passing through `definition`.
    fn draw_linear_dimension(
        &mut self,
        extension1: Point2D,
        extension2: Point2D,
        definition: Point2D,
    ) -> Result<()>;
}

/// Options for [`draw_arch`].
#[derive(Debug, Clone, Copy)]
pub struct DrawOptions {
    /// Draw the dimension annotations.
    pub dimensions: bool,
    /// Dimensions shorter than this are skipped.
    pub tolerance: Tolerance,
}

impl Default for DrawOptions {
    fn default() -> Self {
        Self {
            dimensions: true,
            tolerance: Tolerance::DEFAULT,
        }
    }
}

/// What [`draw_arch`] sent to the host.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DrawSummary {
    /// Closed polygons drawn.
    pub polygons: usize,
    /// Linear dimensions drawn.
    pub dimensions: usize,
}

/// Draw an arch layout on a host.
///
/// Every present brick of every course becomes one closed polygon. Absent
/// slots are skipped. Dimensions follow unless disabled.
pub fn draw_arch<D: ArchDrawing + ?Sized>(
    layout: &ArchLayout,
    drawing: &mut D,
    options: &DrawOptions,
) -> Result<DrawSummary> {
    let mut summary = DrawSummary::default();

    debug!(courses = layout.courses.len(), "drawing bricks");
    for course in &layout.courses {
        for brick in course.bricks() {
            trace!(course = course.index, brick = brick.index, kind = ?brick.kind, "brick");
            drawing.draw_closed_polygon(brick.outline())?;
            summary.polygons += 1;
        }
    }

    if options.dimensions {
        debug!(count = layout.dimensions.len(), "drawing dimensions");
        for dimension in &layout.dimensions {
            if dimension.is_degenerate(&options.tolerance) {
                debug!(label = ?dimension.label, "skipping zero length dimension");
                continue;
            }
            drawing.draw_linear_dimension(
                dimension.extension1,
                dimension.extension2,
                dimension.definition,
            )?;
            summary.dimensions += 1;
        }
    }

    debug!(
        polygons = summary.polygons,
        dimensions = summary.dimensions,
        "finished drawing"
    );
    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::DraftingError;
    use brickarch_kernel_layout::{ArchSpec, BrickSizing, CourseMode, SkewInput};

    #[derive(Default)]
    struct Counter {
        polygons: Vec<usize>,
        dimensions: usize,
    }

    impl ArchDrawing for Counter {
        fn draw_closed_polygon(&mut self, points: &[Point2D]) -> Result<()> {
            self.polygons.push(points.len());
            Ok(())
        }

        fn draw_linear_dimension(&mut self, _: Point2D, _: Point2D, _: Point2D) -> Result<()> {
            self.dimensions += 1;
            Ok(())
        }
    }

    struct Failing;

    impl ArchDrawing for Failing {
        fn draw_closed_polygon(&mut self, points: &[Point2D]) -> Result<()> {
            Err(DraftingError::DegeneratePolygon(points.len()))
        }

        fn draw_linear_dimension(&mut self, _: Point2D, _: Point2D, _: Point2D) -> Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_draw_full_brick_arch() {
        let layout = ArchLayout::build(&ArchSpec::default(), CourseMode::FullBrick, 50.0).unwrap();
        let mut counter = Counter::default();
        let summary = draw_arch(&layout, &mut counter, &DrawOptions::default()).unwrap();

        assert_eq!(summary.polygons, 17);
        assert_eq!(summary.dimensions, 4);
        assert!(counter.polygons.iter().all(|&n| n == 4));
        assert_eq!(counter.dimensions, 4);
    }

    #[test]
    fn test_draw_skips_absent_slots() {
        let mode = CourseMode::SingleJoint { invert: false };
        let layout = ArchLayout::build(&ArchSpec::default(), mode, 50.0).unwrap();
        let mut counter = Counter::default();
        let summary = draw_arch(&layout, &mut counter, &DrawOptions::default()).unwrap();

        // 9 full bricks and 8 split columns of two halves each.
        assert_eq!(summary.polygons, 25);
        assert_eq!(counter.polygons.len(), 25);
    }

    #[test]
    fn test_draw_without_dimensions() {
        let layout = ArchLayout::build(&ArchSpec::default(), CourseMode::FullBrick, 50.0).unwrap();
        let options = DrawOptions {
            dimensions: false,
            ..DrawOptions::default()
        };
        let mut counter = Counter::default();
        let summary = draw_arch(&layout, &mut counter, &options).unwrap();

        assert_eq!(summary.dimensions, 0);
        assert_eq!(counter.dimensions, 0);
    }

    #[test]
    fn test_draw_skips_zero_length_dimensions() {
        // The solver never yields a zero length dimension, so collapse one.
        let spec = ArchSpec::new(
            100.0,
            50.0,
            0.0,
            BrickSizing::Count(1),
            SkewInput::Length(0.0),
        );
        let mut layout = ArchLayout::build(&spec, CourseMode::FullBrick, 10.0).unwrap();
        layout.dimensions[0].extension2 = layout.dimensions[0].extension1;

        let mut counter = Counter::default();
        let summary = draw_arch(&layout, &mut counter, &DrawOptions::default()).unwrap();
        assert_eq!(summary.dimensions, 3);
    }

    #[test]
    fn test_draw_propagates_host_errors() {
        let layout = ArchLayout::build(&ArchSpec::default(), CourseMode::FullBrick, 50.0).unwrap();
        let err = draw_arch(&layout, &mut Failing, &DrawOptions::default()).unwrap_err();
        assert!(matches!(err, DraftingError::DegeneratePolygon(4)));
    }
}
