//! Arch input model.
//!
//! [`ArchSpec`] is the validated-by-construction input to the solver: the
//! width/count and angle/length alternatives are enums, so a spec can never
//! carry both or neither. [`RawArchInput`] is the loose field bag read from
//! job files and command lines; converting it is where the both/neither
//! checks happen.

use serde::{Deserialize, Serialize};

use crate::error::{ConfigurationError, Result};

/// How the brick columns are sized.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BrickSizing {
    /// Maximum brick width in mm. The count is derived and forced odd.
    Width(f64),
    /// Exact number of brick columns.
    Count(u32),
}

/// How the skew of the arch ends is given.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SkewInput {
    /// Angle of the end faces from vertical, in degrees.
    Angle(f64),
    /// Horizontal offset between the bottom and top corner at each end, in mm.
    Length(f64),
}

/// Validation applied to a brick count supplied directly.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CountPolicy {
    /// Use the count as given, even or odd.
    #[default]
    AsGiven,
    /// Reject even counts, which leave the arch without a keystone.
    RequireOdd,
}

/// Course arrangement of the arch.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CourseMode {
    /// One course. Every brick spans the full arch height.
    #[default]
    FullBrick,
    /// Two courses split by a horizontal joint, alternating full-height
    /// bricks with pairs of half bricks.
    SingleJoint {
        /// Make odd-indexed columns full height instead of even ones.
        invert: bool,
    },
}

impl CourseMode {
    /// Build a mode from a course count of 1 or 2.
    ///
    /// `invert` only matters for two courses.
    pub fn from_count(count: u8, invert: bool) -> Result<Self> {
        match count {
            1 => Ok(CourseMode::FullBrick),
            2 => Ok(CourseMode::SingleJoint { invert }),
            other => Err(ConfigurationError::UnsupportedCourseCount(other).into()),
        }
    }

    /// Number of courses this mode produces.
    pub fn course_count(&self) -> usize {
        match self {
            CourseMode::FullBrick => 1,
            CourseMode::SingleJoint { .. } => 2,
        }
    }

    /// Whether brick column `index` spans the full arch height.
    ///
    /// In two-course mode a column is full height when `index mod 2` equals
    /// the invert flag as an integer.
    pub fn is_full_height(&self, index: usize) -> bool {
        match self {
            CourseMode::FullBrick => true,
            CourseMode::SingleJoint { invert } => index % 2 == usize::from(*invert),
        }
    }
}

/// Dimensions of a flat brick arch, in millimetres.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ArchSpec {
    /// Span at the springing line (the bottom edge).
    pub bottom_length: f64,
    /// Rise from the bottom edge to the top edge.
    pub arch_height: f64,
    /// Mortar gap between neighbouring bricks.
    pub joint_size: f64,
    /// Brick width or brick count.
    pub sizing: BrickSizing,
    /// Skew angle or skew length.
    pub skew: SkewInput,
    /// Validation for directly supplied counts.
    #[serde(default)]
    pub count_policy: CountPolicy,
}

impl ArchSpec {
    /// Create a spec with the default count policy.
    pub fn new(
        bottom_length: f64,
        arch_height: f64,
        joint_size: f64,
        sizing: BrickSizing,
        skew: SkewInput,
    ) -> Self {
        Self {
            bottom_length,
            arch_height,
            joint_size,
            sizing,
            skew,
            count_policy: CountPolicy::default(),
        }
    }

    /// Replace the count policy.
    pub fn with_count_policy(mut self, count_policy: CountPolicy) -> Self {
        self.count_policy = count_policy;
        self
    }
}

impl Default for ArchSpec {
    /// A 1000 mm span, 200 mm rise arch of 65 mm bricks with 5 mm joints,
    /// skewed 20°.
    fn default() -> Self {
        Self::new(
            1000.0,
            200.0,
            5.0,
            BrickSizing::Width(65.0),
            SkewInput::Angle(20.0),
        )
    }
}

/// A validated spec together with its course arrangement.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ArchRequest {
    /// Arch dimensions.
    pub spec: ArchSpec,
    /// Course arrangement.
    pub courses: CourseMode,
}

/// Loosely typed arch input as read from job files and command lines.
///
/// Every field is optional so that several sources can be layered with
/// [`RawArchInput::overlay`] before validation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RawArchInput {
    /// Span at the springing line.
    pub bottom_length: Option<f64>,
    /// Rise of the arch.
    pub arch_height: Option<f64>,
    /// Mortar joint size.
    pub joint_size: Option<f64>,
    /// Maximum brick width; exclusive with `brick_count`.
    pub brick_width: Option<f64>,
    /// Brick count; exclusive with `brick_width`.
    pub brick_count: Option<u32>,
    /// Skew angle in degrees; exclusive with `skew_length`.
    pub skew: Option<f64>,
    /// Skew length in mm; exclusive with `skew`.
    pub skew_length: Option<f64>,
    /// Number of courses, 1 or 2.
    pub courses: Option<u8>,
    /// Swap full and half brick columns in two-course mode.
    pub invert: Option<bool>,
    /// Validation for directly supplied counts.
    pub count_policy: Option<CountPolicy>,
}

impl RawArchInput {
    /// The compiled defaults, see [`ArchSpec::default`].
    pub fn defaults() -> Self {
        Self::from(ArchRequest {
            spec: ArchSpec::default(),
            courses: CourseMode::default(),
        })
    }

    /// Layer `upper` on top of `self`.
    ///
    /// Scalar fields take `upper`'s value when it has one. The exclusive
    /// pairs are replaced as a whole: if `upper` sets either member of a
    /// pair, both members come from `upper`.
    pub fn overlay(mut self, upper: &RawArchInput) -> Self {
        fn take<T: Copy>(base: &mut Option<T>, upper: Option<T>) {
            if upper.is_some() {
                *base = upper;
            }
        }

        take(&mut self.bottom_length, upper.bottom_length);
        take(&mut self.arch_height, upper.arch_height);
        take(&mut self.joint_size, upper.joint_size);
        take(&mut self.courses, upper.courses);
        take(&mut self.invert, upper.invert);
        take(&mut self.count_policy, upper.count_policy);

        if upper.brick_width.is_some() || upper.brick_count.is_some() {
            self.brick_width = upper.brick_width;
            self.brick_count = upper.brick_count;
        }
        if upper.skew.is_some() || upper.skew_length.is_some() {
            self.skew = upper.skew;
            self.skew_length = upper.skew_length;
        }
        self
    }

    /// Validate field presence and build a typed request.
    ///
    /// Only presence is checked here. Value ranges are checked by
    /// [`crate::resolve`].
    pub fn into_request(self) -> Result<ArchRequest> {
        let sizing = match (self.brick_width, self.brick_count) {
            (Some(_), Some(_)) => {
                return Err(ConfigurationError::BothSupplied {
                    first: "brick_width",
                    second: "brick_count",
                }
                .into())
            }
            (Some(width), None) => BrickSizing::Width(width),
            (None, Some(count)) => BrickSizing::Count(count),
            (None, None) => {
                return Err(ConfigurationError::NeitherSupplied {
                    first: "brick_width",
                    second: "brick_count",
                }
                .into())
            }
        };

        let skew = match (self.skew, self.skew_length) {
            (Some(_), Some(_)) => {
                return Err(ConfigurationError::BothSupplied {
                    first: "skew",
                    second: "skew_length",
                }
                .into())
            }
            (Some(angle), None) => SkewInput::Angle(angle),
            (None, Some(length)) => SkewInput::Length(length),
            (None, None) => {
                return Err(ConfigurationError::NeitherSupplied {
                    first: "skew",
                    second: "skew_length",
                }
                .into())
            }
        };

        let spec = ArchSpec {
            bottom_length: self
                .bottom_length
                .ok_or(ConfigurationError::Missing("bottom_length"))?,
            arch_height: self
                .arch_height
                .ok_or(ConfigurationError::Missing("arch_height"))?,
            joint_size: self
                .joint_size
                .ok_or(ConfigurationError::Missing("joint_size"))?,
            sizing,
            skew,
            count_policy: self.count_policy.unwrap_or_default(),
        };
        let courses = CourseMode::from_count(self.courses.unwrap_or(1), self.invert.unwrap_or(false))?;

        Ok(ArchRequest { spec, courses })
    }
}

impl From<ArchRequest> for RawArchInput {
    fn from(request: ArchRequest) -> Self {
        let spec = request.spec;
        let (brick_width, brick_count) = match spec.sizing {
            BrickSizing::Width(width) => (Some(width), None),
            BrickSizing::Count(count) => (None, Some(count)),
        };
        let (skew, skew_length) = match spec.skew {
            SkewInput::Angle(angle) => (Some(angle), None),
            SkewInput::Length(length) => (None, Some(length)),
        };
        let invert = match request.courses {
            CourseMode::FullBrick => false,
            CourseMode::SingleJoint { invert } => invert,
        };
        Self {
            bottom_length: Some(spec.bottom_length),
            arch_height: Some(spec.arch_height),
            joint_size: Some(spec.joint_size),
            brick_width,
            brick_count,
            skew,
            skew_length,
            courses: Some(request.courses.course_count() as u8),
            invert: Some(invert),
            count_policy: Some(spec.count_policy),
        }
    }
}
