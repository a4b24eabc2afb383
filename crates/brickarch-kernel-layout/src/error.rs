//! Error types for arch solving.

use thiserror::Error;

/// Errors that can occur while validating or solving an arch.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ArchError {
    /// The supplied dimensions are inconsistent or out of range.
    #[error("configuration error: {0}")]
    Configuration(#[from] ConfigurationError),

    /// The dimensions cannot describe an arch at all.
    #[error("geometry error: {0}")]
    Geometry(#[from] GeometryError),
}

/// Invalid or inconsistent input dimensions.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigurationError {
    /// Both members of a mutually exclusive pair were supplied.
    #[error("{first} and {second} are mutually exclusive; supply only one")]
    BothSupplied {
        /// First field of the pair.
        first: &'static str,
        /// Second field of the pair.
        second: &'static str,
    },

    /// Neither member of a mutually exclusive pair was supplied.
    #[error("one of {first} or {second} is required")]
    NeitherSupplied {
        /// First field of the pair.
        first: &'static str,
        /// Second field of the pair.
        second: &'static str,
    },

    /// A required field was not supplied.
    #[error("{0} is required")]
    Missing(&'static str),

    /// A field holds NaN or infinity.
    #[error("{0} must be a finite number")]
    NotFinite(&'static str),

    /// A dimension that must be strictly positive is zero or negative.
    #[error("{field} must be positive, got {value}")]
    NotPositive {
        /// Offending field.
        field: &'static str,
        /// Supplied value.
        value: f64,
    },

    /// A dimension that may be zero is negative.
    #[error("{field} must not be negative, got {value}")]
    Negative {
        /// Offending field.
        field: &'static str,
        /// Supplied value.
        value: f64,
    },

    /// A brick count of zero.
    #[error("brick count must be at least 1")]
    ZeroBrickCount,

    /// An even brick count under a policy that requires a keystone.
    #[error("brick count {0} is even; an odd count is required for a keystone brick")]
    EvenBrickCount(u32),

    /// A solved per-brick width that is zero or negative.
    #[error("{row} brick width resolves to {width}; bricks would overlap")]
    NonPositiveWidth {
        /// Row the width was solved for.
        row: &'static str,
        /// Solved width.
        width: f64,
    },

    /// Two courses were asked of an arch not taller than one joint.
    #[error("two courses need an arch height above the joint size; got height {height}, joint {joint}")]
    JointTooLarge {
        /// Arch height.
        height: f64,
        /// Joint size.
        joint: f64,
    },

    /// A course count other than 1 or 2.
    #[error("unsupported course count {0}; expected 1 or 2")]
    UnsupportedCourseCount(u8),
}

/// Dimensions for which the arch geometry is undefined.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GeometryError {
    /// An angle skew needs a positive height to produce a length.
    #[error("arch height must be positive to derive the skew from an angle, got {0}")]
    NonPositiveHeight(f64),

    /// The tangent of the skew angle is unbounded at 90°.
    #[error("skew angle must be below 90 degrees, got {0}")]
    SkewAngleOutOfRange(f64),
}

/// Result type for arch operations.
pub type Result<T> = std::result::Result<T, ArchError>;
