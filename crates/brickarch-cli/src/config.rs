//! Job files and output settings.
//!
//! A job file carries an `[arch]` table of arch inputs and an `[output]`
//! table of drawing options. Values are layered: compiled defaults, then the
//! job file, then command-line flags.

use std::fs;
use std::path::Path;

use anyhow::{bail, Context, Result};
use brickarch_kernel_drafting::{DxfLayer, DxfLayers};
use brickarch_kernel_layout::RawArchInput;
use clap::ValueEnum;
use serde::{Deserialize, Serialize};

/// Default distance between the arch and its dimension lines, in mm.
pub const DEFAULT_DIMENSION_OFFSET: f64 = 50.0;

/// Drawing output format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// ASCII DXF drawing.
    #[default]
    Dxf,
    /// JSON list of drawing calls.
    Json,
}

/// The `[output]` table of a job file. Every field is optional.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct OutputConfig {
    pub format: Option<OutputFormat>,
    pub dimensions: Option<bool>,
    pub dimension_offset: Option<f64>,
    pub brick_layer: Option<String>,
    pub dimension_layer: Option<String>,
}

impl OutputConfig {
    /// Layer `upper` on top of `self`, field by field.
    pub fn overlay(self, upper: OutputConfig) -> Self {
        Self {
            format: upper.format.or(self.format),
            dimensions: upper.dimensions.or(self.dimensions),
            dimension_offset: upper.dimension_offset.or(self.dimension_offset),
            brick_layer: upper.brick_layer.or(self.brick_layer),
            dimension_layer: upper.dimension_layer.or(self.dimension_layer),
        }
    }

    /// Fill in defaults and validate.
    pub fn resolve(self) -> Result<OutputSettings> {
        let dimension_offset = self.dimension_offset.unwrap_or(DEFAULT_DIMENSION_OFFSET);
        if !dimension_offset.is_finite() || dimension_offset < 0.0 {
            bail!("dimension offset must be a non-negative number, got {dimension_offset}");
        }

        let mut layers = DxfLayers::default();
        if let Some(name) = self.brick_layer {
            layers.bricks = DxfLayer::new(layer_name(name)?, layers.bricks.color);
        }
        if let Some(name) = self.dimension_layer {
            layers.dimensions = DxfLayer::new(layer_name(name)?, layers.dimensions.color);
        }

        Ok(OutputSettings {
            format: self.format.unwrap_or_default(),
            dimensions: self.dimensions.unwrap_or(true),
            dimension_offset,
            layers,
        })
    }
}

fn layer_name(name: String) -> Result<String> {
    let name = name.trim().to_string();
    if name.is_empty() {
        bail!("layer name must not be empty");
    }
    // A DXF group value ends at the first line break.
    if name.chars().any(char::is_control) {
        bail!("layer name {name:?} must not contain control characters");
    }
    Ok(name)
}

/// Fully resolved output settings.
#[derive(Debug, Clone, PartialEq)]
pub struct OutputSettings {
    pub format: OutputFormat,
    pub dimensions: bool,
    pub dimension_offset: f64,
    pub layers: DxfLayers,
}

/// A job file as loaded from disk.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct JobFile {
    pub arch: RawArchInput,
    pub output: OutputConfig,
}

impl JobFile {
    /// Load a job file, TOML or JSON by extension.
    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("failed to read job file {}", path.display()))?;

        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("")
            .to_lowercase();
        match ext.as_str() {
            "toml" => toml::from_str(&text)
                .with_context(|| format!("invalid job file {}", path.display())),
            "json" => serde_json::from_str(&text)
                .with_context(|| format!("invalid job file {}", path.display())),
            _ => bail!(
                "unsupported job file format '{}', expected .toml or .json",
                ext
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_job(name: &str, contents: &str) -> (tempfile::TempDir, std::path::PathBuf) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(name);
        let mut file = fs::File::create(&path).unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        (dir, path)
    }

    #[test]
    fn test_load_toml_job() {
        let (_dir, path) = write_job(
            "job.toml",
            r#"
            [arch]
            bottom_length = 1200.0
            brick_count = 19
            courses = 2

            [output]
            format = "json"
            brick_layer = "ARCH"
            "#,
        );
        let job = JobFile::load(&path).unwrap();
        assert_eq!(job.arch.bottom_length, Some(1200.0));
        assert_eq!(job.arch.brick_count, Some(19));
        assert_eq!(job.arch.courses, Some(2));
        assert_eq!(job.output.format, Some(OutputFormat::Json));
        assert_eq!(job.output.brick_layer.as_deref(), Some("ARCH"));
    }

    #[test]
    fn test_load_json_job() {
        let (_dir, path) = write_job(
            "job.json",
            r#"{ "arch": { "skew_length": 40.0 }, "output": { "dimensions": false } }"#,
        );
        let job = JobFile::load(&path).unwrap();
        assert_eq!(job.arch.skew_length, Some(40.0));
        assert_eq!(job.output.dimensions, Some(false));
    }

    #[test]
    fn test_unknown_keys_rejected() {
        let (_dir, path) = write_job("job.toml", "[arch]\nspan = 100.0\n");
        assert!(JobFile::load(&path).is_err());

        let (_dir, path) = write_job("job.toml", "[drawing]\nformat = \"dxf\"\n");
        assert!(JobFile::load(&path).is_err());
    }

    #[test]
    fn test_unsupported_extension() {
        let (_dir, path) = write_job("job.yaml", "arch: {}\n");
        let err = JobFile::load(&path).unwrap_err();
        assert!(err.to_string().contains("unsupported job file format"));
    }

    #[test]
    fn test_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = JobFile::load(&dir.path().join("absent.toml")).unwrap_err();
        assert!(err.to_string().contains("failed to read job file"));
    }

    #[test]
    fn test_output_defaults() {
        let settings = OutputConfig::default().resolve().unwrap();
        assert_eq!(settings.format, OutputFormat::Dxf);
        assert!(settings.dimensions);
        assert_eq!(settings.dimension_offset, DEFAULT_DIMENSION_OFFSET);
        assert_eq!(settings.layers, DxfLayers::default());
    }

    #[test]
    fn test_output_overlay() {
        let file = OutputConfig {
            format: Some(OutputFormat::Json),
            dimension_offset: Some(20.0),
            dimension_layer: Some("DIMS".to_string()),
            ..OutputConfig::default()
        };
        let flags = OutputConfig {
            format: Some(OutputFormat::Dxf),
            dimensions: Some(false),
            ..OutputConfig::default()
        };
        let settings = file.overlay(flags).resolve().unwrap();
        assert_eq!(settings.format, OutputFormat::Dxf);
        assert!(!settings.dimensions);
        assert_eq!(settings.dimension_offset, 20.0);
        assert_eq!(settings.layers.dimensions.name, "DIMS");
        assert_eq!(settings.layers.bricks.name, "BRICKS");
    }

    #[test]
    fn test_output_validation() {
        let negative = OutputConfig {
            dimension_offset: Some(-1.0),
            ..OutputConfig::default()
        };
        assert!(negative.resolve().is_err());

        let blank = OutputConfig {
            brick_layer: Some("  ".to_string()),
            ..OutputConfig::default()
        };
        assert!(blank.resolve().is_err());

        let multiline = OutputConfig {
            dimension_layer: Some("DIMS\n0\nEOF".to_string()),
            ..OutputConfig::default()
        };
        let err = multiline.resolve().unwrap_err();
        assert!(err.to_string().contains("control characters"));

        let tab = OutputConfig {
            brick_layer: Some("BRI\tCKS".to_string()),
            ..OutputConfig::default()
        };
        assert!(tab.resolve().is_err());
    }
}
