//! Embedded raster assets

use crate::anchor::{Anchor, PixelBox};
use crate::error::{OverlayError, Result};
use crate::geometry::SheetGeometry;

/// One embedded raster image with its resolved placement
#[derive(Debug, Clone, PartialEq)]
pub struct ImageRecord {
    id: String,
    anchor: Anchor,
    anchor_px: (f64, f64),
    nominal_size_px: (f64, f64),
    intrinsic_size_px: (u32, u32),
    bytes: Vec<u8>,
    /// Name of the sheet the image sits on
    pub sheet: String,
    /// Display name from the drawing (`cNvPr@name`)
    pub name: Option<String>,
    /// Detected raster format (lowercase extension, e.g. "png")
    pub format: Option<String>,
}

impl ImageRecord {
    /// Create an image record, resolving its anchor against the sheet geometry.
    ///
    /// The intrinsic size must be non-zero and the anchor must not run backwards
    /// on the sheet. The nominal size may be zero (such images are exported but
    /// never matched).
    pub fn new<S: Into<String>, T: Into<String>>(
        id: S,
        sheet: T,
        anchor: Anchor,
        geometry: &SheetGeometry,
        intrinsic_size_px: (u32, u32),
        bytes: Vec<u8>,
    ) -> Result<Self> {
        let id = id.into();
        if intrinsic_size_px.0 == 0 || intrinsic_size_px.1 == 0 {
            return Err(OverlayError::decode(format!(
                "image {} has empty intrinsic size {}x{}",
                id, intrinsic_size_px.0, intrinsic_size_px.1
            )));
        }
        let span = anchor.resolve(geometry)?;
        Ok(Self {
            id,
            anchor,
            anchor_px: (span.x, span.y),
            nominal_size_px: (span.w, span.h),
            intrinsic_size_px,
            bytes,
            sheet: sheet.into(),
            name: None,
            format: None,
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

    /// Absolute pixel position of the top-left corner
    pub fn anchor_px(&self) -> (f64, f64) {
        self.anchor_px
    }

    /// Size the sheet gives the image, computed from cell geometry
    pub fn nominal_size_px(&self) -> (f64, f64) {
        self.nominal_size_px
    }

    /// True decoded pixel dimensions
    pub fn intrinsic_size_px(&self) -> (u32, u32) {
        self.intrinsic_size_px
    }

    /// Raw encoded payload
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Take ownership of the payload
    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }

    /// Absolute pixel box at nominal size
    pub fn bbox(&self) -> PixelBox {
        PixelBox::new(
            self.anchor_px.0,
            self.anchor_px.1,
            self.nominal_size_px.0,
            self.nominal_size_px.1,
        )
    }

    /// Whether the nominal size can be used for matching and scaling
    pub fn has_valid_nominal_size(&self) -> bool {
        let (w, h) = self.nominal_size_px;
        w.is_finite() && h.is_finite() && w > 0.0 && h > 0.0
    }
}
