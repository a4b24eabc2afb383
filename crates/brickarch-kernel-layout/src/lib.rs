#![warn(missing_docs)]

//! Brick layout solver and course geometry for flat brick arches.
//!
//! A flat arch is a trapezoid: the bottom edge spans the opening and the top
//! edge is longer by one skew length on each side. This crate solves the
//! brick count and per-row widths for such an arch, generates the corner
//! points of every brick and produces dimension requests for drawing hosts.
//!
//! # Example
//!
//! ```ignore
//! use brickarch_kernel_layout::{ArchLayout, ArchSpec, CourseMode};
//!
//! let layout = ArchLayout::build(&ArchSpec::default(), CourseMode::FullBrick, 50.0)?;
//!
//! println!("Bricks: {}", layout.resolved.brick_count);
//! for brick in layout.bricks() {
//!     println!("{:?}", brick.outline());
//! }
//! ```

pub mod annotation;
pub mod course;
pub mod error;
pub mod solver;
pub mod spec;
pub mod types;

pub use annotation::{annotate, dimension_line, DimensionLabel, LinearDimension};
pub use course::{generate, Brick, BrickKind, BrickSlot, Course};
pub use error::{ArchError, ConfigurationError, GeometryError, Result};
pub use solver::{
    count_bricks, length_at_depth, resolve, single_width, JointRows, ResolvedArch, Row,
};
pub use spec::{
    ArchRequest, ArchSpec, BrickSizing, CountPolicy, CourseMode, RawArchInput, SkewInput,
};
pub use types::{BoundingBox2D, Point2D};

use serde::{Deserialize, Serialize};
use tracing::debug;

/// Everything one arch invocation produces.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArchLayout {
    /// Solved dimensions.
    pub resolved: ResolvedArch,
    /// Course arrangement the courses were generated with.
    pub mode: CourseMode,
    /// Courses of brick slots, bottom course first.
    pub courses: Vec<Course>,
    /// Dimension requests.
    pub dimensions: Vec<LinearDimension>,
}

impl ArchLayout {
    /// Solve, generate and annotate an arch.
    ///
    /// Fails with the solver's error before any geometry is produced, or
    /// when two courses are asked of an arch too shallow for the joint.
    pub fn build(spec: &ArchSpec, mode: CourseMode, dimension_offset: f64) -> Result<Self> {
        debug!(?spec, ?mode, "calculating dimensions");
        let resolved = resolve(spec)?;

        let courses = generate(&resolved, mode)?;

        debug!(offset = dimension_offset, "calculating dimension annotations");
        let dimensions = annotate(&resolved, dimension_offset);

        Ok(Self {
            resolved,
            mode,
            courses,
            dimensions,
        })
    }

    /// Build from a validated request.
    pub fn from_request(request: &ArchRequest, dimension_offset: f64) -> Result<Self> {
        Self::build(&request.spec, request.courses, dimension_offset)
    }

    /// All present bricks, course by course.
    pub fn bricks(&self) -> impl Iterator<Item = &Brick> {
        self.courses.iter().flat_map(Course::bricks)
    }

    /// Number of present bricks over all courses.
    pub fn num_bricks(&self) -> usize {
        self.courses.iter().map(Course::num_present).sum()
    }

    /// Bounds of all bricks.
    pub fn bounds(&self) -> BoundingBox2D {
        let mut bb = BoundingBox2D::empty();
        for corner in self.bricks().flat_map(|b| b.outline().iter()) {
            bb.include_point(*corner);
        }
        bb
    }
}
