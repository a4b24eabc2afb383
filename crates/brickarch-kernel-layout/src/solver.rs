//! Brick layout solver.
//!
//! Turns an [`ArchSpec`] into a [`ResolvedArch`]: skew length, top length,
//! odd brick count and the per-brick width on every row the generator
//! needs (bottom, top, and both edges of the horizontal joint when the arch
//! is tall enough to hold one).

use brickarch_kernel_math::{
    angle_from_legs, opposite_from_adjacent, round_dimension, to_degrees, to_radians,
};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::{ConfigurationError, GeometryError, Result};
use crate::spec::{ArchSpec, BrickSizing, CountPolicy, SkewInput};

/// One horizontal line through the arch at which brick corners sit.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Row {
    /// Height above the springing line.
    pub y: f64,
    /// X of the first brick's left corner.
    pub offset: f64,
    /// Total length of the row, bricks and joints.
    pub length: f64,
    /// Width of each brick on this row.
    pub width: f64,
}

impl Row {
    /// X of brick `index`'s left corner on this row.
    pub fn left(&self, index: usize, joint_size: f64) -> f64 {
        self.offset + index as f64 * (self.width + joint_size)
    }

    /// X of brick `index`'s right corner on this row.
    pub fn right(&self, index: usize, joint_size: f64) -> f64 {
        self.left(index, joint_size) + self.width
    }
}

/// Both edges of the horizontal joint used in two-course arches.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct JointRows {
    /// Top of the lower half bricks.
    pub lower: Row,
    /// Bottom of the upper half bricks.
    pub upper: Row,
}

impl JointRows {
    /// Height of one half brick.
    pub fn small_height(&self) -> f64 {
        self.lower.y
    }
}

/// Solved arch dimensions. Immutable once built.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ResolvedArch {
    /// Span at the springing line.
    pub bottom_length: f64,
    /// Rise of the arch.
    pub arch_height: f64,
    /// Mortar joint size.
    pub joint_size: f64,
    /// Horizontal offset of each end between bottom and top.
    pub skew_length: f64,
    /// Skew angle in degrees, for display.
    pub skew_angle: f64,
    /// Length of the top edge.
    pub top_length: f64,
    /// Number of brick columns.
    pub brick_count: u32,
    /// Per-brick width along the bottom edge.
    pub bottom_width: f64,
    /// Per-brick width along the top edge.
    pub top_width: f64,
    /// Rows at the edges of the horizontal joint. `None` when the arch is
    /// not taller than one joint, so only a single course fits.
    pub joint: Option<JointRows>,
}

impl ResolvedArch {
    /// The bottom edge row.
    pub fn bottom_row(&self) -> Row {
        Row {
            y: 0.0,
            offset: self.skew_length,
            length: self.bottom_length,
            width: self.bottom_width,
        }
    }

    /// The top edge row. Its left end is the drawing's x origin.
    pub fn top_row(&self) -> Row {
        Row {
            y: self.arch_height,
            offset: 0.0,
            length: self.top_length,
            width: self.top_width,
        }
    }

    /// Skew angle in radians.
    pub fn skew_angle_radians(&self) -> f64 {
        to_radians(self.skew_angle)
    }

    /// Rows of the horizontal joint, for a two-course layout.
    pub fn joint_rows(&self) -> Result<&JointRows> {
        self.joint.as_ref().ok_or_else(|| {
            ConfigurationError::JointTooLarge {
                height: self.arch_height,
                joint: self.joint_size,
            }
            .into()
        })
    }

    /// Index of the centre brick.
    pub fn keystone_index(&self) -> usize {
        self.brick_count as usize / 2
    }

    /// Row length at `depth` below the top edge.
    ///
    /// The skew offset is interpolated linearly between the top
    /// (depth 0, the full top length) and the bottom (depth equal to the
    /// arch height, the bottom length).
    pub fn length_at_depth(&self, depth: f64) -> f64 {
        length_at_depth(
            self.bottom_length,
            self.skew_length,
            self.arch_height,
            depth,
        )
    }
}

/// Solve an arch.
///
/// Fails fast on invalid input. Nothing is clamped or corrected.
pub fn resolve(spec: &ArchSpec) -> Result<ResolvedArch> {
    validate(spec)?;
    debug!(
        bottom_length = spec.bottom_length,
        arch_height = spec.arch_height,
        joint_size = spec.joint_size,
        "calculating arch dimensions"
    );

    let (skew_length, skew_angle) = match spec.skew {
        SkewInput::Angle(degrees) => {
            let radians = to_radians(degrees);
            debug!(degrees, radians, "skew angle");
            (
                round_dimension(opposite_from_adjacent(radians, spec.arch_height)),
                degrees,
            )
        }
        SkewInput::Length(length) => {
            (length, to_degrees(angle_from_legs(length, spec.arch_height)))
        }
    };
    debug!(skew_length, skew_angle, "skew resolved");

    let top_length = spec.bottom_length + 2.0 * skew_length;
    debug!(top_length, "top length");

    let brick_count = match spec.sizing {
        BrickSizing::Width(width) => count_bricks(top_length, spec.joint_size, width),
        BrickSizing::Count(count) => {
            if count % 2 == 0 {
                match spec.count_policy {
                    CountPolicy::RequireOdd => {
                        return Err(ConfigurationError::EvenBrickCount(count).into())
                    }
                    CountPolicy::AsGiven => {
                        warn!(count, "even brick count leaves the arch without a keystone")
                    }
                }
            }
            count
        }
    };
    debug!(brick_count, "brick count");

    let bottom_width = positive_width(
        "bottom",
        single_width(spec.bottom_length, brick_count, spec.joint_size),
    )?;
    let top_width = positive_width(
        "top",
        single_width(top_length, brick_count, spec.joint_size),
    )?;
    debug!(bottom_width, top_width, "single brick widths");

    let row_at = |y: f64| {
        let length = length_at_depth(
            spec.bottom_length,
            skew_length,
            spec.arch_height,
            spec.arch_height - y,
        );
        Row {
            y,
            offset: skew_length * (1.0 - y / spec.arch_height),
            length,
            width: single_width(length, brick_count, spec.joint_size),
        }
    };
    let joint = if spec.arch_height > spec.joint_size {
        let small_height = (spec.arch_height - spec.joint_size) / 2.0;
        let rows = JointRows {
            lower: row_at(small_height),
            upper: row_at(small_height + spec.joint_size),
        };
        debug!(
            small_height,
            lower_width = rows.lower.width,
            upper_width = rows.upper.width,
            "horizontal joint rows"
        );
        Some(rows)
    } else {
        debug!("arch too shallow for a horizontal joint");
        None
    };

    Ok(ResolvedArch {
        bottom_length: spec.bottom_length,
        arch_height: spec.arch_height,
        joint_size: spec.joint_size,
        skew_length,
        skew_angle,
        top_length,
        brick_count,
        bottom_width,
        top_width,
        joint,
    })
}

/// Number of bricks needed to fill `length` with bricks no wider than
/// `brick_width`, rounded up to the next odd number so that the arch has a
/// centred keystone.
pub fn count_bricks(length: f64, joint_size: f64, brick_width: f64) -> u32 {
    let brick_and_joint = brick_width + joint_size;
    let count = ((length + joint_size) / brick_and_joint).ceil() as u32;
    if count % 2 == 1 {
        count
    } else {
        count + 1
    }
}

/// Width of one brick when `count` bricks and their joints fill `length`,
/// rounded to dimension precision.
pub fn single_width(length: f64, count: u32, joint_size: f64) -> f64 {
    let just_bricks = length - f64::from(count.saturating_sub(1)) * joint_size;
    round_dimension(just_bricks / f64::from(count))
}

/// Row length at `depth` below the top edge of an arch.
pub fn length_at_depth(bottom_length: f64, skew_length: f64, arch_height: f64, depth: f64) -> f64 {
    bottom_length + 2.0 * skew_length * (1.0 - depth / arch_height)
}

fn positive_width(row: &'static str, width: f64) -> Result<f64> {
    if width > 0.0 {
        Ok(width)
    } else {
        Err(ConfigurationError::NonPositiveWidth { row, width }.into())
    }
}

fn validate(spec: &ArchSpec) -> Result<()> {
    let mut scalars = vec![
        ("bottom_length", spec.bottom_length),
        ("arch_height", spec.arch_height),
        ("joint_size", spec.joint_size),
    ];
    match spec.sizing {
        BrickSizing::Width(width) => scalars.push(("brick_width", width)),
        BrickSizing::Count(_) => {}
    }
    match spec.skew {
        SkewInput::Angle(angle) => scalars.push(("skew", angle)),
        SkewInput::Length(length) => scalars.push(("skew_length", length)),
    }
    for (field, value) in scalars {
        if !value.is_finite() {
            return Err(ConfigurationError::NotFinite(field).into());
        }
    }

    // The tangent needs a real triangle before anything else is solved.
    if let SkewInput::Angle(angle) = spec.skew {
        if spec.arch_height <= 0.0 {
            return Err(GeometryError::NonPositiveHeight(spec.arch_height).into());
        }
        if angle >= 90.0 {
            return Err(GeometryError::SkewAngleOutOfRange(angle).into());
        }
    }

    require_positive("bottom_length", spec.bottom_length)?;
    require_positive("arch_height", spec.arch_height)?;
    require_non_negative("joint_size", spec.joint_size)?;
    match spec.sizing {
        BrickSizing::Width(width) => require_positive("brick_width", width)?,
        BrickSizing::Count(0) => return Err(ConfigurationError::ZeroBrickCount.into()),
        BrickSizing::Count(_) => {}
    }
    match spec.skew {
        SkewInput::Angle(angle) => require_non_negative("skew", angle)?,
        SkewInput::Length(length) => require_non_negative("skew_length", length)?,
    }
    Ok(())
}

fn require_positive(field: &'static str, value: f64) -> Result<()> {
    if value > 0.0 {
        Ok(())
    } else {
        Err(ConfigurationError::NotPositive { field, value }.into())
    }
}

fn require_non_negative(field: &'static str, value: f64) -> Result<()> {
    if value >= 0.0 {
        Ok(())
    } else {
        Err(ConfigurationError::Negative { field, value }.into())
    }
}
