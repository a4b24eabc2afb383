//! DXF output for arch drawings.
//!
//! Writes an ASCII DXF with an `AC1009` header, a linetype table and one
//! layer each for bricks and dimensions. This is not strict R12: the header
//! also sets `$INSUNITS` and bricks are closed LWPOLYLINEs, both from later
//! releases that current readers accept. There is no portable associative
//! dimension, so each dimension is exploded into two extension LINEs, the
//! dimension LINE and a TEXT carrying the measurement.

use std::fmt::Display;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use brickarch_kernel_layout::{dimension_line, Point2D};
use brickarch_kernel_math::{angle_from_legs, round_dimension, to_degrees, DIMENSION_PRECISION};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::drawing::ArchDrawing;
use crate::error::{DraftingError, Result};

/// A named DXF layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DxfLayer {
    /// Layer name.
    pub name: String,
    /// AutoCAD color index.
    pub color: i16,
}

impl DxfLayer {
    /// Create a layer.
    pub fn new(name: impl Into<String>, color: i16) -> Self {
        Self {
            name: name.into(),
            color,
        }
    }
}

/// Layers used by [`DxfArchDocument`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DxfLayers {
    /// Layer for brick outlines.
    pub bricks: DxfLayer,
    /// Layer for dimension lines and text.
    pub dimensions: DxfLayer,
}

impl Default for DxfLayers {
    fn default() -> Self {
        Self {
            bricks: DxfLayer::new("BRICKS", 7),
            dimensions: DxfLayer::new("DIMENSIONS", 1),
        }
    }
}

struct DxfDimension {
    extension1: Point2D,
    extension2: Point2D,
    definition: Point2D,
}

/// DXF document builder for arches.
///
/// Buffers drawing calls and writes them on [`export`](Self::export).
pub struct DxfArchDocument {
    layers: DxfLayers,
    text_height: f64,
    polygons: Vec<Vec<Point2D>>,
    dimensions: Vec<DxfDimension>,
}

impl DxfArchDocument {
    /// Default height of dimension text in mm.
    pub const DEFAULT_TEXT_HEIGHT: f64 = 10.0;

    /// Create an empty document on the given layers.
    pub fn new(layers: DxfLayers) -> Self {
        Self {
            layers,
            text_height: Self::DEFAULT_TEXT_HEIGHT,
            polygons: Vec::new(),
            dimensions: Vec::new(),
        }
    }

    /// Set the dimension text height.
    pub fn with_text_height(mut self, text_height: f64) -> Self {
        self.text_height = text_height;
        self
    }

    /// Layers of this document.
    pub fn layers(&self) -> &DxfLayers {
        &self.layers
    }

    /// Number of buffered polygons.
    pub fn num_polygons(&self) -> usize {
        self.polygons.len()
    }

    /// Number of buffered dimensions.
    pub fn num_dimensions(&self) -> usize {
        self.dimensions.len()
    }

    /// Export to a DXF file.
    pub fn export(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        debug!(path = %path.display(), "writing DXF");
        let file = File::create(path)?;
        let mut writer = BufWriter::new(file);
        self.export_to_writer(&mut writer)?;
        writer.flush()?;
        Ok(())
    }

    /// Export to a writer.
    pub fn export_to_writer(&self, mut writer: impl Write) -> Result<()> {
        self.write_header(&mut writer)?;
        self.write_tables(&mut writer)?;
        self.write_entities(&mut writer)?;
        pair(&mut writer, 0, "EOF")?;
        Ok(())
    }

    fn write_header(&self, writer: &mut impl Write) -> std::io::Result<()> {
        pair(writer, 0, "SECTION")?;
        pair(writer, 2, "HEADER")?;
        pair(writer, 9, "$ACADVER")?;
        pair(writer, 1, "AC1009")?;
        pair(writer, 9, "$INSUNITS")?;
        pair(writer, 70, 4)?; // Millimeters
        pair(writer, 0, "ENDSEC")
    }

    fn write_tables(&self, writer: &mut impl Write) -> std::io::Result<()> {
        pair(writer, 0, "SECTION")?;
        pair(writer, 2, "TABLES")?;

        pair(writer, 0, "TABLE")?;
        pair(writer, 2, "LTYPE")?;
        pair(writer, 70, 1)?;
        pair(writer, 0, "LTYPE")?;
        pair(writer, 2, "CONTINUOUS")?;
        pair(writer, 70, 0)?;
        pair(writer, 3, "Solid line")?;
        pair(writer, 72, 65)?;
        pair(writer, 73, 0)?;
        pair(writer, 40, "0.0")?;
        pair(writer, 0, "ENDTAB")?;

        pair(writer, 0, "TABLE")?;
        pair(writer, 2, "LAYER")?;
        pair(writer, 70, 2)?;
        for layer in [&self.layers.bricks, &self.layers.dimensions] {
            pair(writer, 0, "LAYER")?;
            pair(writer, 2, &layer.name)?;
            pair(writer, 70, 0)?;
            pair(writer, 62, layer.color)?;
            pair(writer, 6, "CONTINUOUS")?;
        }
        pair(writer, 0, "ENDTAB")?;

        pair(writer, 0, "ENDSEC")
    }

    fn write_entities(&self, writer: &mut impl Write) -> std::io::Result<()> {
        pair(writer, 0, "SECTION")?;
        pair(writer, 2, "ENTITIES")?;

        for points in &self.polygons {
            self.write_polygon(writer, points)?;
        }
        for dimension in &self.dimensions {
            self.write_dimension(writer, dimension)?;
        }

        pair(writer, 0, "ENDSEC")
    }

    fn write_polygon(&self, writer: &mut impl Write, points: &[Point2D]) -> std::io::Result<()> {
        pair(writer, 0, "LWPOLYLINE")?;
        pair(writer, 8, &self.layers.bricks.name)?;
        pair(writer, 90, points.len())?;
        pair(writer, 70, 1)?; // Closed
        for p in points {
            point(writer, 10, p)?;
        }
        Ok(())
    }

    fn write_dimension(&self, writer: &mut impl Write, dim: &DxfDimension) -> std::io::Result<()> {
        let layer = &self.layers.dimensions.name;
        let (start, end) = dimension_line(dim.extension1, dim.extension2, dim.definition);

        write_line(writer, layer, &dim.extension1, &start)?;
        write_line(writer, layer, &dim.extension2, &end)?;
        write_line(writer, layer, &start, &end)?;

        let middle = Point2D::new((start.x + end.x) / 2.0, (start.y + end.y) / 2.0);
        let rotation = to_degrees(angle_from_legs(end.y - start.y, end.x - start.x));
        let text = format_measurement(dim.extension1.distance(&dim.extension2));

        pair(writer, 0, "TEXT")?;
        pair(writer, 8, layer)?;
        point(writer, 10, &middle)?;
        pair(writer, 40, format!("{:.6}", self.text_height))?;
        pair(writer, 1, text)?;
        pair(writer, 50, format!("{:.6}", rotation))?;
        pair(writer, 72, 1)?; // Centered
        point(writer, 11, &middle)?;
        pair(writer, 73, 1)?; // Bottom
        Ok(())
    }
}

impl Default for DxfArchDocument {
    fn default() -> Self {
        Self::new(DxfLayers::default())
    }
}

impl ArchDrawing for DxfArchDocument {
    fn draw_closed_polygon(&mut self, points: &[Point2D]) -> Result<()> {
        if points.len() < 3 {
            return Err(DraftingError::DegeneratePolygon(points.len()));
        }
        self.polygons.push(points.to_vec());
        Ok(())
    }

    fn draw_linear_dimension(
        &mut self,
        extension1: Point2D,
        extension2: Point2D,
        definition: Point2D,
    ) -> Result<()> {
        self.dimensions.push(DxfDimension {
            extension1,
            extension2,
            definition,
        });
        Ok(())
    }
}

fn pair(writer: &mut impl Write, code: u16, value: impl Display) -> std::io::Result<()> {
    writeln!(writer, "{}", code)?;
    writeln!(writer, "{}", value)
}

/// Writes `p` with group codes `x_code` and `x_code + 10`.
fn point(writer: &mut impl Write, x_code: u16, p: &Point2D) -> std::io::Result<()> {
    pair(writer, x_code, format!("{:.6}", p.x))?;
    pair(writer, x_code + 10, format!("{:.6}", p.y))
}

fn write_line(
    writer: &mut impl Write,
    layer: &str,
    start: &Point2D,
    end: &Point2D,
) -> std::io::Result<()> {
    pair(writer, 0, "LINE")?;
    pair(writer, 8, layer)?;
    point(writer, 10, start)?;
    point(writer, 11, end)
}

/// Measurement text at dimension precision without trailing zeros.
fn format_measurement(value: f64) -> String {
    let rounded = round_dimension(value);
    let text = format!("{:.*}", DIMENSION_PRECISION as usize, rounded);
    text.trim_end_matches('0').trim_end_matches('.').to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::drawing::{draw_arch, DrawOptions};
    use brickarch_kernel_layout::{ArchLayout, ArchSpec, CourseMode};
    use std::fs;

    fn default_document(mode: CourseMode) -> DxfArchDocument {
        let layout = ArchLayout::build(&ArchSpec::default(), mode, 50.0).unwrap();
        let mut doc = DxfArchDocument::default();
        draw_arch(&layout, &mut doc, &DrawOptions::default()).unwrap();
        doc
    }

    fn to_string(doc: &DxfArchDocument) -> String {
        let mut buf = Vec::new();
        doc.export_to_writer(&mut buf).unwrap();
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn test_format_measurement() {
        assert_eq!(format_measurement(1000.0), "1000");
        assert_eq!(format_measurement(72.794), "72.794");
        assert_eq!(format_measurement(62.68), "62.68");
        assert_eq!(format_measurement(48.66666), "48.667");
    }

    #[test]
    fn test_dxf_structure() {
        let doc = default_document(CourseMode::FullBrick);
        assert_eq!(doc.num_polygons(), 17);
        assert_eq!(doc.num_dimensions(), 4);

        let content = to_string(&doc);
        assert!(content.starts_with("0\nSECTION\n2\nHEADER\n"));
        assert!(content.contains("$ACADVER\n1\nAC1009\n9\n$INSUNITS\n70\n4\n"));
        assert!(content.contains("TABLES"));
        assert!(content.contains("BRICKS"));
        assert!(content.contains("DIMENSIONS"));
        assert!(content.ends_with("0\nEOF\n"));

        assert_eq!(content.matches("\nLWPOLYLINE\n").count(), 17);
        // Three lines per dimension.
        assert_eq!(content.matches("\nLINE\n").count(), 12);
        assert_eq!(content.matches("\nTEXT\n").count(), 4);
        assert!(content.contains("\n1\n1000\n"));
        assert!(content.contains("\n1\n200\n"));
    }

    #[test]
    fn test_dxf_two_courses() {
        let doc = default_document(CourseMode::SingleJoint { invert: true });
        let content = to_string(&doc);
        assert_eq!(content.matches("\nLWPOLYLINE\n").count(), 26);
    }

    #[test]
    fn test_dxf_custom_layers() {
        let layers = DxfLayers {
            bricks: DxfLayer::new("ARCH", 3),
            dimensions: DxfLayer::new("DIMS", 5),
        };
        let mut doc = DxfArchDocument::new(layers).with_text_height(2.5);
        doc.draw_closed_polygon(&[
            Point2D::new(0.0, 0.0),
            Point2D::new(10.0, 0.0),
            Point2D::new(10.0, 10.0),
        ])
        .unwrap();
        doc.draw_linear_dimension(
            Point2D::new(0.0, 0.0),
            Point2D::new(0.0, 10.0),
            Point2D::new(-5.0, 0.0),
        )
        .unwrap();

        let content = to_string(&doc);
        assert!(content.contains("LWPOLYLINE\n8\nARCH\n90\n3\n70\n1\n"));
        assert!(content.contains("TEXT\n8\nDIMS\n"));
        assert!(content.contains("\n40\n2.500000\n"));
        assert!(content.contains("\n50\n90.000000\n"));
        assert!(!content.contains("BRICKS"));
    }

    #[test]
    fn test_dxf_rejects_open_polygon() {
        let mut doc = DxfArchDocument::default();
        let err = doc.draw_closed_polygon(&[Point2D::ORIGIN]).unwrap_err();
        assert!(matches!(err, DraftingError::DegeneratePolygon(1)));
    }

    #[test]
    fn test_dxf_export_file() {
        let doc = default_document(CourseMode::FullBrick);
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("arch.dxf");
        doc.export(&path).unwrap();

        let content = fs::read_to_string(&path).unwrap();
        assert_eq!(content, to_string(&doc));
    }
}
