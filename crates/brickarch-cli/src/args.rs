//! Command-line flags shared by the arch commands.

use std::path::PathBuf;

use brickarch_kernel_layout::{CountPolicy, RawArchInput};
use clap::{Args, ValueEnum};

use crate::config::{OutputConfig, OutputFormat};

/// Arch dimensions. Anything left out comes from the job file or defaults.
#[derive(Args, Debug, Clone, Default)]
pub struct ArchArgs {
    /// Span at the springing line
    #[arg(long = "length", value_name = "MM")]
    pub bottom_length: Option<f64>,

    /// Rise of the arch
    #[arg(long = "height", value_name = "MM")]
    pub arch_height: Option<f64>,

    /// Mortar joint size
    #[arg(long = "joint", value_name = "MM")]
    pub joint_size: Option<f64>,

    /// Maximum brick width; the brick count is derived and made odd
    #[arg(long, value_name = "MM", conflicts_with = "brick_count")]
    pub brick_width: Option<f64>,

    /// Number of bricks
    #[arg(long, value_name = "N")]
    pub brick_count: Option<u32>,

    /// Skew angle of the end faces
    #[arg(long, value_name = "DEGREES", conflicts_with = "skew_length")]
    pub skew: Option<f64>,

    /// Horizontal overhang of the top edge on each side
    #[arg(long, value_name = "MM")]
    pub skew_length: Option<f64>,

    /// Number of courses (1 or 2)
    #[arg(long, value_name = "N")]
    pub courses: Option<u8>,

    /// Make odd columns full height in a two-course arch
    #[arg(long, conflicts_with = "no_invert")]
    pub invert: bool,

    /// Make even columns full height, overriding the job file
    #[arg(long)]
    pub no_invert: bool,

    /// Reject an even brick count instead of warning
    #[arg(long, conflicts_with = "allow_even")]
    pub require_odd: bool,

    /// Accept an even brick count, overriding the job file
    #[arg(long)]
    pub allow_even: bool,
}

impl ArchArgs {
    /// The flags as the top layer of arch input.
    pub fn to_raw(&self) -> RawArchInput {
        RawArchInput {
            bottom_length: self.bottom_length,
            arch_height: self.arch_height,
            joint_size: self.joint_size,
            brick_width: self.brick_width,
            brick_count: self.brick_count,
            skew: self.skew,
            skew_length: self.skew_length,
            courses: self.courses,
            invert: switch(self.invert, self.no_invert),
            count_policy: switch(self.require_odd, self.allow_even).map(|strict| {
                if strict {
                    CountPolicy::RequireOdd
                } else {
                    CountPolicy::AsGiven
                }
            }),
        }
    }
}

/// A flag pair as an optional override: `Some(true)` for `on`, `Some(false)`
/// for `off`, `None` when neither was passed.
fn switch(on: bool, off: bool) -> Option<bool> {
    match (on, off) {
        (true, _) => Some(true),
        (false, true) => Some(false),
        (false, false) => None,
    }
}

/// Drawing output flags.
#[derive(Args, Debug, Clone, Default)]
pub struct OutputArgs {
    /// Output format [default: dxf]
    #[arg(long, value_enum)]
    pub format: Option<OutputFormat>,

    /// Output file (default: stdout)
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Leave out dimension annotations
    #[arg(long)]
    pub no_dimensions: bool,

    /// Distance between the arch and its dimension lines
    #[arg(long, value_name = "MM")]
    pub dimension_offset: Option<f64>,
}

impl OutputArgs {
    /// The flags as the top layer of output settings.
    pub fn to_config(&self) -> OutputConfig {
        OutputConfig {
            format: self.format,
            dimensions: self.no_dimensions.then_some(false),
            dimension_offset: self.dimension_offset,
            ..OutputConfig::default()
        }
    }
}

/// How `solve` prints its result.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum ReportFormat {
    /// Aligned text.
    #[default]
    Text,
    /// JSON object.
    Json,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[derive(Parser, Debug)]
    struct TestCli {
        #[command(flatten)]
        arch: ArchArgs,
        #[command(flatten)]
        output: OutputArgs,
    }

    fn parse(args: &[&str]) -> Result<TestCli, clap::Error> {
        TestCli::try_parse_from(std::iter::once("brickarch").chain(args.iter().copied()))
    }

    #[test]
    fn test_arch_flags_map_to_raw_input() {
        let cli = parse(&[
            "--length",
            "800",
            "--height",
            "150",
            "--joint",
            "5",
            "--brick-count",
            "15",
            "--skew-length",
            "40",
            "--courses",
            "2",
            "--invert",
            "--require-odd",
        ])
        .unwrap();

        let raw = cli.arch.to_raw();
        assert_eq!(raw.bottom_length, Some(800.0));
        assert_eq!(raw.arch_height, Some(150.0));
        assert_eq!(raw.joint_size, Some(5.0));
        assert_eq!(raw.brick_count, Some(15));
        assert_eq!(raw.brick_width, None);
        assert_eq!(raw.skew_length, Some(40.0));
        assert_eq!(raw.courses, Some(2));
        assert_eq!(raw.invert, Some(true));
        assert_eq!(raw.count_policy, Some(CountPolicy::RequireOdd));
    }

    #[test]
    fn test_absent_flags_leave_lower_layers() {
        let cli = parse(&[]).unwrap();
        assert_eq!(cli.arch.to_raw(), RawArchInput::default());
        assert_eq!(cli.output.to_config(), OutputConfig::default());
    }

    #[test]
    fn test_exclusive_flags_conflict() {
        assert!(parse(&["--brick-width", "65", "--brick-count", "17"]).is_err());
        assert!(parse(&["--skew", "20", "--skew-length", "40"]).is_err());
    }

    #[test]
    fn test_negative_flags_override_lower_layers() {
        let cli = parse(&["--no-invert", "--allow-even"]).unwrap();
        let raw = cli.arch.to_raw();
        assert_eq!(raw.invert, Some(false));
        assert_eq!(raw.count_policy, Some(CountPolicy::AsGiven));

        let job = RawArchInput {
            invert: Some(true),
            count_policy: Some(CountPolicy::RequireOdd),
            ..RawArchInput::default()
        };
        let layered = job.overlay(&raw);
        assert_eq!(layered.invert, Some(false));
        assert_eq!(layered.count_policy, Some(CountPolicy::AsGiven));

        assert!(parse(&["--invert", "--no-invert"]).is_err());
        assert!(parse(&["--require-odd", "--allow-even"]).is_err());
    }

    #[test]
    fn test_output_flags() {
        let cli = parse(&[
            "--format",
            "json",
            "-o",
            "arch.json",
            "--no-dimensions",
            "--dimension-offset",
            "25",
        ])
        .unwrap();
        assert_eq!(cli.output.output, Some(PathBuf::from("arch.json")));

        let config = cli.output.to_config();
        assert_eq!(config.format, Some(OutputFormat::Json));
        assert_eq!(config.dimensions, Some(false));
        assert_eq!(config.dimension_offset, Some(25.0));
    }
}
