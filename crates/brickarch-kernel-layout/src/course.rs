//! Course geometry generator.
//!
//! Expands a [`ResolvedArch`] into courses of brick quadrilaterals. The top
//! edge of the arch is the reference line at `x = 0`; the bottom edge starts
//! one skew length to the right.

use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::error::Result;
use crate::solver::{ResolvedArch, Row};
use crate::spec::CourseMode;
use crate::types::{BoundingBox2D, Point2D};

/// Which part of a brick column a brick occupies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BrickKind {
    /// Spans the full arch height.
    Full,
    /// Spans from the bottom edge to the horizontal joint.
    LowerHalf,
    /// Spans from the horizontal joint to the top edge.
    UpperHalf,
}

/// A single brick outline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Brick {
    /// Column index, counted from the left.
    pub index: usize,
    /// Part of the column this brick occupies.
    pub kind: BrickKind,
    /// Bottom-left, bottom-right, top-right, top-left.
    pub corners: [Point2D; 4],
}

impl Brick {
    /// The brick in column `index` between two rows.
    pub fn between(
        index: usize,
        kind: BrickKind,
        lower: &Row,
        upper: &Row,
        joint_size: f64,
    ) -> Self {
        Self {
            index,
            kind,
            corners: [
                Point2D::new(lower.left(index, joint_size), lower.y),
                Point2D::new(lower.right(index, joint_size), lower.y),
                Point2D::new(upper.right(index, joint_size), upper.y),
                Point2D::new(upper.left(index, joint_size), upper.y),
            ],
        }
    }

    /// Corners as a closed polygon, in drawing order.
    pub fn outline(&self) -> &[Point2D] {
        &self.corners
    }

    /// Width along the bottom edge.
    pub fn bottom_width(&self) -> f64 {
        self.corners[1].x - self.corners[0].x
    }

    /// Width along the top edge.
    pub fn top_width(&self) -> f64 {
        self.corners[2].x - self.corners[3].x
    }

    /// Vertical extent.
    pub fn height(&self) -> f64 {
        self.corners[3].y - self.corners[0].y
    }
}

/// One slot of a course. A column that has no brick in this course is
/// explicitly absent rather than left out, so slot `i` is always column `i`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BrickSlot {
    /// A brick occupies this column in this course.
    Present(Brick),
    /// A full-height brick from another course covers this column.
    Absent,
}

impl BrickSlot {
    /// The brick, if present.
    pub fn brick(&self) -> Option<&Brick> {
        match self {
            BrickSlot::Present(brick) => Some(brick),
            BrickSlot::Absent => None,
        }
    }

    /// Whether the slot holds a brick.
    pub fn is_present(&self) -> bool {
        matches!(self, BrickSlot::Present(_))
    }
}

/// One horizontal layer of bricks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Course {
    /// Course index, 0 for the bottom course.
    pub index: usize,
    /// One slot per brick column.
    pub slots: Vec<BrickSlot>,
}

impl Course {
    /// Number of slots (equal to the brick count).
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// Whether the course has no slots.
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// The brick in column `index`, if present.
    pub fn brick(&self, index: usize) -> Option<&Brick> {
        self.slots.get(index).and_then(BrickSlot::brick)
    }

    /// Iterate over the bricks that are present.
    pub fn bricks(&self) -> impl Iterator<Item = &Brick> {
        self.slots.iter().filter_map(BrickSlot::brick)
    }

    /// Number of bricks present.
    pub fn num_present(&self) -> usize {
        self.slots.iter().filter(|s| s.is_present()).count()
    }

    /// Bounding box of every present brick.
    pub fn bounds(&self) -> BoundingBox2D {
        let mut bounds = BoundingBox2D::empty();
        for brick in self.bricks() {
            for corner in brick.corners {
                bounds.include_point(corner);
            }
        }
        bounds
    }
}

/// Generate the courses of an arch.
///
/// Returns one course for [`CourseMode::FullBrick`] and two for
/// [`CourseMode::SingleJoint`]. In two-course mode, full-height bricks live
/// in course 0 and leave their course 1 slot absent; half-height columns put
/// their lower half in course 0 and their upper half in course 1.
///
/// Fails with [`ConfigurationError::JointTooLarge`] when two courses are
/// asked of an arch with no room for the horizontal joint. One course never
/// fails.
///
/// [`ConfigurationError::JointTooLarge`]: crate::error::ConfigurationError::JointTooLarge
pub fn generate(resolved: &ResolvedArch, mode: CourseMode) -> Result<Vec<Course>> {
    debug!(
        brick_count = resolved.brick_count,
        courses = mode.course_count(),
        "calculating corner points"
    );

    let joint_size = resolved.joint_size;
    let bottom = resolved.bottom_row();
    let top = resolved.top_row();
    let count = resolved.brick_count as usize;

    let courses = match mode {
        CourseMode::FullBrick => {
            let slots = (0..count)
                .map(|i| {
                    BrickSlot::Present(Brick::between(
                        i,
                        BrickKind::Full,
                        &bottom,
                        &top,
                        joint_size,
                    ))
                })
                .collect();
            vec![Course { index: 0, slots }]
        }
        CourseMode::SingleJoint { .. } => {
            let joint = resolved.joint_rows()?;
            let mut lower = Vec::with_capacity(count);
            let mut upper = Vec::with_capacity(count);
            for i in 0..count {
                if mode.is_full_height(i) {
                    lower.push(BrickSlot::Present(Brick::between(
                        i,
                        BrickKind::Full,
                        &bottom,
                        &top,
                        joint_size,
                    )));
                    upper.push(BrickSlot::Absent);
                } else {
                    lower.push(BrickSlot::Present(Brick::between(
                        i,
                        BrickKind::LowerHalf,
                        &bottom,
                        &joint.lower,
                        joint_size,
                    )));
                    upper.push(BrickSlot::Present(Brick::between(
                        i,
                        BrickKind::UpperHalf,
                        &joint.upper,
                        &top,
                        joint_size,
                    )));
                }
            }
            vec![
                Course {
                    index: 0,
                    slots: lower,
                },
                Course {
                    index: 1,
                    slots: upper,
                },
            ]
        }
    };

    for course in &courses {
        for brick in course.bricks() {
            trace!(
                course = course.index,
                brick = brick.index,
                kind = ?brick.kind,
                corners = ?brick.corners,
                "brick corners"
            );
        }
    }
    Ok(courses)
}
