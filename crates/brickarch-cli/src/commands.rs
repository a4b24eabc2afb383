//! Command implementations.

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

use anyhow::{Context, Result};
use brickarch_kernel_drafting::{
    draw_arch, DrawCall, DrawOptions, DrawSummary, DrawingRecord, DxfArchDocument,
};
use brickarch_kernel_layout::{resolve, ArchLayout, ArchRequest, RawArchInput, ResolvedArch};
use serde::Serialize;
use tracing::{debug, info};

use crate::args::{ArchArgs, OutputArgs, ReportFormat};
use crate::config::{JobFile, OutputFormat};

/// Draw a flat arch to DXF or JSON.
pub fn flat(config: Option<&Path>, arch: &ArchArgs, output: &OutputArgs) -> Result<()> {
    let job = load_job(config)?;
    let request = arch_request(&job.arch, arch)?;
    let settings = job.output.overlay(output.to_config()).resolve()?;

    let layout = ArchLayout::from_request(&request, settings.dimension_offset)
        .context("failed to lay out arch")?;
    info!(
        bricks = layout.resolved.brick_count,
        courses = layout.courses.len(),
        "arch solved"
    );

    let options = DrawOptions {
        dimensions: settings.dimensions,
        ..DrawOptions::default()
    };

    let summary = match settings.format {
        OutputFormat::Dxf => {
            let mut doc = DxfArchDocument::new(settings.layers);
            let summary = draw_arch(&layout, &mut doc, &options)?;
            match &output.output {
                Some(path) => doc
                    .export(path)
                    .with_context(|| format!("failed to write {}", path.display()))?,
                None => doc.export_to_writer(io::stdout().lock())?,
            }
            summary
        }
        OutputFormat::Json => {
            let mut record = DrawingRecord::new();
            let summary = draw_arch(&layout, &mut record, &options)?;
            let drawing = JsonDrawing {
                arch: &layout.resolved,
                summary,
                calls: &record.calls,
            };
            write_json(output.output.as_deref(), &drawing)?;
            summary
        }
    };

    if let Some(path) = &output.output {
        println!(
            "Drew {} bricks and {} dimensions to {}",
            summary.polygons,
            summary.dimensions,
            path.display()
        );
    }
    Ok(())
}

/// Print the solved dimensions of an arch.
pub fn solve(config: Option<&Path>, arch: &ArchArgs, format: ReportFormat) -> Result<()> {
    let job = load_job(config)?;
    let request = arch_request(&job.arch, arch)?;
    let resolved = resolve(&request.spec).context("failed to solve arch")?;
    if request.courses.course_count() == 2 {
        resolved.joint_rows().context("failed to solve arch")?;
    }

    match format {
        ReportFormat::Text => print!("{}", text_report(&resolved, &request)),
        ReportFormat::Json => {
            let report = SolveReport {
                arch: resolved,
                skew_angle_radians: resolved.skew_angle_radians(),
                courses: request.courses.course_count(),
            };
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
    }
    Ok(())
}

#[derive(Serialize)]
struct JsonDrawing<'a> {
    arch: &'a ResolvedArch,
    summary: DrawSummary,
    calls: &'a [DrawCall],
}

#[derive(Serialize)]
struct SolveReport {
    #[serde(flatten)]
    arch: ResolvedArch,
    skew_angle_radians: f64,
    courses: usize,
}

fn load_job(config: Option<&Path>) -> Result<JobFile> {
    match config {
        Some(path) => {
            debug!(path = %path.display(), "loading job file");
            JobFile::load(path)
        }
        None => Ok(JobFile::default()),
    }
}

/// Layer defaults, job file and flags into a validated request.
fn arch_request(job: &RawArchInput, flags: &ArchArgs) -> Result<ArchRequest> {
    let raw = RawArchInput::defaults()
        .overlay(job)
        .overlay(&flags.to_raw());
    debug!(?raw, "layered arch input");
    raw.into_request().context("invalid arch configuration")
}

fn write_json(path: Option<&Path>, value: &impl Serialize) -> Result<()> {
    let mut writer: Box<dyn Write> = match path {
        Some(path) => Box::new(BufWriter::new(
            File::create(path).with_context(|| format!("failed to create {}", path.display()))?,
        )),
        None => Box::new(io::stdout().lock()),
    };
    serde_json::to_writer_pretty(&mut writer, value)?;
    writeln!(writer)?;
    writer.flush()?;
    Ok(())
}

fn text_report(arch: &ResolvedArch, request: &ArchRequest) -> String {
    let mut lines = vec![
        format!("bottom length  {:.3} mm", arch.bottom_length),
        format!("top length     {:.3} mm", arch.top_length),
        format!("arch height    {:.3} mm", arch.arch_height),
        format!("joint size     {:.3} mm", arch.joint_size),
        format!(
            "skew           {:.3} mm ({:.3} deg, {:.4} rad)",
            arch.skew_length,
            arch.skew_angle,
            arch.skew_angle_radians()
        ),
        format!("brick count    {}", arch.brick_count),
        format!("bottom width   {:.3} mm", arch.bottom_width),
        format!("top width      {:.3} mm", arch.top_width),
    ];
    if let (2, Some(joint)) = (request.courses.course_count(), &arch.joint) {
        lines.push(format!("half height    {:.3} mm", joint.small_height()));
        lines.push(format!(
            "joint widths   {:.3} / {:.3} mm",
            joint.lower.width, joint.upper.width
        ));
    }
    let mut report = lines.join("\n");
    report.push('\n');
    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use brickarch_kernel_layout::{ArchSpec, BrickSizing, CourseMode};
    use std::fs;

    fn flags() -> ArchArgs {
        ArchArgs::default()
    }

    #[test]
    fn test_arch_request_uses_defaults() {
        let request = arch_request(&RawArchInput::default(), &flags()).unwrap();
        assert_eq!(request.spec, ArchSpec::default());
        assert_eq!(request.courses, CourseMode::FullBrick);
    }

    #[test]
    fn test_flags_override_job_file() {
        let job = RawArchInput {
            bottom_length: Some(1200.0),
            brick_count: Some(19),
            ..RawArchInput::default()
        };
        let args = ArchArgs {
            bottom_length: Some(900.0),
            brick_width: Some(70.0),
            ..flags()
        };
        let request = arch_request(&job, &args).unwrap();
        assert_eq!(request.spec.bottom_length, 900.0);
        assert_eq!(request.spec.sizing, BrickSizing::Width(70.0));
    }

    #[test]
    fn test_invalid_request_has_context() {
        let args = ArchArgs {
            courses: Some(3),
            ..flags()
        };
        let err = arch_request(&RawArchInput::default(), &args).unwrap_err();
        assert!(err.to_string().contains("invalid arch configuration"));
    }

    #[test]
    fn test_text_report() {
        let request = arch_request(&RawArchInput::default(), &flags()).unwrap();
        let arch = resolve(&request.spec).unwrap();
        let report = text_report(&arch, &request);
        assert!(report.contains("brick count    17"));
        assert!(report.contains("skew           72.794 mm (20.000 deg"));
        assert!(!report.contains("half height"));

        let two = ArchRequest {
            courses: CourseMode::SingleJoint { invert: false },
            ..request
        };
        assert!(text_report(&arch, &two).contains("half height    97.500 mm"));
    }

    #[test]
    fn test_solve_shallow_arch() {
        let args = ArchArgs {
            arch_height: Some(4.0),
            ..flags()
        };
        solve(None, &args, ReportFormat::Text).unwrap();

        let two = ArchArgs {
            courses: Some(2),
            ..args
        };
        let err = solve(None, &two, ReportFormat::Text).unwrap_err();
        assert!(err.to_string().contains("failed to solve arch"));
    }

    #[test]
    fn test_flat_writes_dxf_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("arch.dxf");
        let output = OutputArgs {
            output: Some(path.clone()),
            ..OutputArgs::default()
        };
        flat(None, &flags(), &output).unwrap();

        let content = fs::read_to_string(&path).unwrap();
        assert_eq!(content.matches("\nLWPOLYLINE\n").count(), 17);
        assert!(content.ends_with("0\nEOF\n"));
    }

    #[test]
    fn test_flat_writes_json_from_job_file() {
        let dir = tempfile::tempdir().unwrap();
        let job = dir.path().join("job.toml");
        fs::write(
            &job,
            "[arch]\ncourses = 2\n\n[output]\nformat = \"json\"\ndimensions = false\n",
        )
        .unwrap();
        let path = dir.path().join("arch.json");
        let output = OutputArgs {
            output: Some(path.clone()),
            ..OutputArgs::default()
        };
        flat(Some(job.as_path()), &flags(), &output).unwrap();

        let value: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(value["arch"]["brick_count"], 17);
        assert_eq!(value["summary"]["polygons"], 25);
        assert_eq!(value["summary"]["dimensions"], 0);
        assert_eq!(value["calls"].as_array().unwrap().len(), 25);
    }

    #[test]
    fn test_flat_reports_solver_errors() {
        let args = ArchArgs {
            joint_size: Some(-1.0),
            ..flags()
        };
        let err = flat(None, &args, &OutputArgs::default()).unwrap_err();
        assert!(err.to_string().contains("failed to lay out arch"));
    }
}
