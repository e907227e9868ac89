//! Re-projection of sheet-space shapes into an image's own pixel space

use crate::color::Color;
use crate::error::{OverlayError, Result};
use crate::image::ImageRecord;
use crate::shape::{Geometry, Paint, PlacedShape};
use crate::units::length_to_pixels;

/// Outline width used when an outline sets a color but no width (0.75pt)
pub const DEFAULT_STROKE_WIDTH_EMU: i64 = 9525;

/// Font size assumed for shape text that sets none
pub const DEFAULT_FONT_SIZE_PT: f64 = 11.0;

/// Ratio between an image's intrinsic and nominal sizes
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScaleFactors {
    pub scale_x: f64,
    pub scale_y: f64,
}

impl ScaleFactors {
    /// Compute `intrinsic / nominal` per axis.
    ///
    /// Fails with [`OverlayError::InvalidScale`] instead of producing NaN or
    /// infinity when the nominal size is zero, negative or not finite.
    pub fn new(intrinsic: (u32, u32), nominal: (f64, f64)) -> Result<Self> {
        let (nominal_w, nominal_h) = nominal;
        let valid = |v: f64| v.is_finite() && v > 0.0;
        if !valid(nominal_w) || !valid(nominal_h) {
            return Err(OverlayError::InvalidScale {
                width: nominal_w,
                height: nominal_h,
            });
        }
        Ok(Self {
            scale_x: f64::from(intrinsic.0) / nominal_w,
            scale_y: f64::from(intrinsic.1) / nominal_h,
        })
    }

    /// Scale factors of an image record
    pub fn for_image(image: &ImageRecord) -> Result<Self> {
        Self::new(image.intrinsic_size_px(), image.nominal_size_px())
    }

    /// Identity scale
    pub const fn identity() -> Self {
        Self {
            scale_x: 1.0,
            scale_y: 1.0,
        }
    }

    /// Project a placed shape relative to an image origin.
    ///
    /// Position and size scale per axis. Font size and outline width both use
    /// `scale_x` only, so text and strokes are distorted when the axes differ.
    pub fn project(&self, image_origin: (f64, f64), placed: &PlacedShape) -> ProjectedShape {
        let shape = &placed.shape;
        let rel_x = placed.bbox.x - image_origin.0;
        let rel_y = placed.bbox.y - image_origin.1;

        let stroke = shape.stroke_line().map(|(color, width_emu)| {
            let width_px = length_to_pixels(width_emu.unwrap_or(DEFAULT_STROKE_WIDTH_EMU));
            (color, width_px * self.scale_x)
        });

        ProjectedShape {
            id: shape.id().to_string(),
            name: shape.name.clone(),
            geometry: shape.geometry.clone(),
            x: rel_x * self.scale_x,
            y: rel_y * self.scale_y,
            w: placed.bbox.w * self.scale_x,
            h: placed.bbox.h * self.scale_y,
            font_px: shape
                .font_size_pt()
                .or_else(|| shape.text.as_ref().map(|_| DEFAULT_FONT_SIZE_PT))
                .map(|pt| pt * self.scale_x),
            fill: shape.fill_paint(),
            stroke,
            text: shape.text.clone(),
            text_color: shape.text_color,
        }
    }
}

/// A shape expressed in the pixel space of one image
#[derive(Debug, Clone, PartialEq)]
pub struct ProjectedShape {
    pub id: String,
    pub name: Option<String>,
    pub geometry: Geometry,
    pub x: f64,
    pub y: f64,
    pub w: f64,
    pub h: f64,
    /// Scaled font size in pixels; set whenever the shape has text
    pub font_px: Option<f64>,
    pub fill: Option<Paint>,
    /// Outline color and scaled width in pixels
    pub stroke: Option<(Color, f64)>,
    pub text: Option<String>,
    pub text_color: Option<Color>,
}

impl ProjectedShape {
    /// Horizontal center
    pub fn center_x(&self) -> f64 {
        self.x + self.w / 2.0
    }

    /// Vertical center
    pub fn center_y(&self) -> f64 {
        self.y + self.h / 2.0
    }
}
