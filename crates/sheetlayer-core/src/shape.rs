//! Vector overlay shapes

use std::fmt;

use crate::anchor::{Anchor, Extent, PixelBox};
use crate::color::Color;
use crate::error::{OverlayError, Result};
use crate::geometry::SheetGeometry;

/// Geometry of a shape, from its preset identifier
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Geometry {
    Ellipse,
    Rect,
    RoundedRect,
    Triangle,
    /// Any other preset; the preset identifier is kept for reporting
    Other(String),
}

impl Geometry {
    /// Map a DrawingML `prst` value
    pub fn from_preset(prst: &str) -> Self {
        match prst {
            "ellipse" => Geometry::Ellipse,
            "rect" => Geometry::Rect,
            "roundRect" => Geometry::RoundedRect,
            "triangle" => Geometry::Triangle,
            other => Geometry::Other(other.to_string()),
        }
    }

    /// Attribute value written into output documents
    pub fn as_str(&self) -> &'static str {
        match self {
            Geometry::Ellipse => "ellipse",
            Geometry::Rect => "rect",
            Geometry::RoundedRect => "rounded_rect",
            Geometry::Triangle => "triangle",
            Geometry::Other(_) => "other",
        }
    }

    /// Parse the attribute value written by [`Geometry::as_str`]
    pub fn from_attr(value: &str) -> Self {
        match value {
            "ellipse" => Geometry::Ellipse,
            "rect" => Geometry::Rect,
            "rounded_rect" => Geometry::RoundedRect,
            "triangle" => Geometry::Triangle,
            other => Geometry::Other(other.to_string()),
        }
    }
}

impl fmt::Display for Geometry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Geometry::Other(prst) => write!(f, "other({})", prst),
            g => f.write_str(g.as_str()),
        }
    }
}

/// A color with opacity (0.0 = transparent, 1.0 = opaque)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Paint {
    pub color: Color,
    pub alpha: f64,
}

impl Paint {
    /// Fully opaque paint
    pub const fn opaque(color: Color) -> Self {
        Self { color, alpha: 1.0 }
    }

    /// Paint with alpha, clamped to [0, 1]
    pub fn with_alpha(color: Color, alpha: f64) -> Self {
        Self {
            color,
            alpha: alpha.clamp(0.0, 1.0),
        }
    }
}

/// Fill as written in the drawing
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum FillSpec {
    /// No fill node at all
    #[default]
    Unspecified,
    /// Explicit `noFill`
    None,
    /// `solidFill`
    Solid(Paint),
}

/// Outline as written in the drawing
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum StrokeSpec {
    /// No outline node, or an outline without a color
    #[default]
    Unspecified,
    /// Explicit `noFill` inside the outline
    None,
    /// Solid outline; the width stays in EMU until projection
    Solid { color: Color, width_emu: Option<i64> },
}

/// One vector overlay shape in document-native units
#[derive(Debug, Clone, PartialEq)]
pub struct ShapeRecord {
    id: String,
    anchor: Anchor,
    extent: Option<Extent>,
    /// Display name from the drawing (`cNvPr@name`)
    pub name: Option<String>,
    /// Preset geometry
    pub geometry: Geometry,
    /// Fill node state
    pub fill: FillSpec,
    /// Outline node state
    pub stroke: StrokeSpec,
    /// Text content, runs concatenated and paragraphs joined by newlines
    pub text: Option<String>,
    /// Font size in hundredths of a point, from the first run that sets one
    pub font_size: Option<u32>,
    /// Color of the first run that sets one
    pub text_color: Option<Color>,
}

impl ShapeRecord {
    /// Create a shape record.
    ///
    /// An explicit extent takes precedence over the anchor span and must not be
    /// negative.
    pub fn new<S: Into<String>>(
        id: S,
        geometry: Geometry,
        anchor: Anchor,
        extent: Option<Extent>,
    ) -> Result<Self> {
        let id = id.into();
        if id.is_empty() {
            return Err(OverlayError::parse("shape without an id"));
        }
        if let Some(ext) = extent {
            if ext.cx < 0 || ext.cy < 0 {
                return Err(OverlayError::parse(format!(
                    "shape {} has negative extent {}x{}",
                    id, ext.cx, ext.cy
                )));
            }
        }
        Ok(Self {
            id,
            anchor,
            extent,
            name: None,
            geometry,
            fill: FillSpec::Unspecified,
            stroke: StrokeSpec::Unspecified,
            text: None,
            font_size: None,
            text_color: None,
        })
    }

    /// Stable identifier
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Cell anchor
    pub fn anchor(&self) -> &Anchor {
        &self.anchor
    }

    /// Explicit extent, if the drawing carried one
    pub fn extent(&self) -> Option<Extent> {
        self.extent
    }

    /// Effective fill (unspecified and explicit none both mean no fill)
    pub fn fill_paint(&self) -> Option<Paint> {
        match self.fill {
            FillSpec::Solid(paint) => Some(paint),
            FillSpec::Unspecified | FillSpec::None => None,
        }
    }

    /// Effective stroke color and width in EMU
    pub fn stroke_line(&self) -> Option<(Color, Option<i64>)> {
        match self.stroke {
            StrokeSpec::Solid { color, width_emu } => Some((color, width_emu)),
            StrokeSpec::Unspecified | StrokeSpec::None => None,
        }
    }

    /// Font size in points
    pub fn font_size_pt(&self) -> Option<f64> {
        self.font_size.map(|sz| f64::from(sz) / 100.0)
    }

    /// Resolve to an absolute pixel box on a sheet.
    ///
    /// Fails with [`OverlayError::InvalidAnchor`] when the anchor runs backwards
    /// once its offsets are laid out on `geometry`.
    pub fn place(&self, geometry: &SheetGeometry) -> Result<PlacedShape> {
        let span = self.anchor.resolve(geometry)?;
        let bbox = match self.extent {
            Some(ext) => {
                let (w, h) = ext.to_pixels();
                PixelBox::new(span.x, span.y, w, h)
            }
            None => span,
        };
        Ok(PlacedShape {
            shape: self.clone(),
            bbox,
        })
    }
}

/// A shape with its absolute pixel bounding box
#[derive(Debug, Clone, PartialEq)]
pub struct PlacedShape {
    pub shape: ShapeRecord,
    pub bbox: PixelBox,
}
