#![warn(missing_docs)]

//! Drawing adapters for flat brick arches.
//!
//! An [`ArchDrawing`] host receives bricks as closed polygons and dimensions
//! as linear dimension requests. Two hosts ship with this crate:
//!
//! - [`DrawingRecord`]: records calls in memory and serializes them to JSON
//! - [`DxfArchDocument`]: writes ASCII DXF with brick and dimension layers
//!
//! # Example
//!
//! ```ignore
//! use brickarch_kernel_drafting::{draw_arch, DrawOptions, DxfArchDocument};
//! use brickarch_kernel_layout::{ArchLayout, ArchSpec, CourseMode};
//!
//! let layout = ArchLayout::build(&ArchSpec::default(), CourseMode::FullBrick, 50.0)?;
//! let mut doc = DxfArchDocument::default();
//! draw_arch(&layout, &mut doc, &DrawOptions::default())?;
//! doc.export("arch.dxf")?;
//! ```

pub mod drawing;
pub mod dxf;
pub mod error;
pub mod record;

pub use drawing::{draw_arch, ArchDrawing, DrawOptions, DrawSummary};
pub use dxf::{DxfArchDocument, DxfLayer, DxfLayers};
pub use error::{DraftingError, Result};
pub use record::{DrawCall, DrawingRecord};

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use brickarch_kernel_layout::{ArchLayout, ArchSpec, BrickSizing, CourseMode, SkewInput};

    #[test]
    fn test_recorded_bricks_tile_the_bottom_edge() {
        let spec = ArchSpec::new(
            800.0,
            150.0,
            5.0,
            BrickSizing::Count(15),
            SkewInput::Angle(10.0),
        );
        let layout = ArchLayout::build(&spec, CourseMode::FullBrick, 30.0).unwrap();
        let mut record = DrawingRecord::new();
        let summary = draw_arch(&layout, &mut record, &DrawOptions::default()).unwrap();
        assert_eq!(summary.polygons, 15);

        let polygons: Vec<_> = record.polygons().collect();
        let skew = layout.resolved.skew_length;
        assert_abs_diff_eq!(polygons[0][0].x, skew, epsilon = 1e-9);
        for pair in polygons.windows(2) {
            // Bottom-right of one brick to bottom-left of the next is a joint.
            assert_abs_diff_eq!(pair[1][0].x - pair[0][1].x, 5.0, epsilon = 1e-9);
        }
        let last = polygons[14];
        assert_abs_diff_eq!(last[1].x, skew + 800.0, epsilon = 1e-2);
    }

    #[test]
    fn test_same_layout_draws_identically_on_both_hosts() {
        let layout =
            ArchLayout::build(&ArchSpec::default(), CourseMode::SingleJoint { invert: false }, 50.0)
                .unwrap();

        let mut record = DrawingRecord::new();
        let mut doc = DxfArchDocument::default();
        let a = draw_arch(&layout, &mut record, &DrawOptions::default()).unwrap();
        let b = draw_arch(&layout, &mut doc, &DrawOptions::default()).unwrap();

        assert_eq!(a, b);
        assert_eq!(record.polygons().count(), doc.num_polygons());
        assert_eq!(record.num_dimensions(), doc.num_dimensions());
    }
}
