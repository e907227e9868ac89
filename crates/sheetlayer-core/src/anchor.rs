//! Cell anchors and pixel boxes

use crate::error::{OverlayError, Result};
use crate::geometry::SheetGeometry;
use crate::units::{anchor_point_to_pixels, length_to_pixels};

/// A position expressed as a cell plus sub-cell offsets in EMU
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct AnchorPoint {
    /// Column index (0-based)
    pub col: u16,
    /// Row index (0-based)
    pub row: u32,
    /// Horizontal offset from the cell's left edge, in EMU
    pub col_off: i64,
    /// Vertical offset from the cell's top edge, in EMU
    pub row_off: i64,
}

impl AnchorPoint {
    /// Create a new anchor point
    pub const fn new(col: u16, row: u32, col_off: i64, row_off: i64) -> Self {
        Self {
            col,
            row,
            col_off,
            row_off,
        }
    }

    /// Shift the offsets by an extent, keeping the cell
    pub fn offset_by(&self, extent: Extent) -> Self {
        Self {
            col_off: self.col_off + extent.cx,
            row_off: self.row_off + extent.cy,
            ..*self
        }
    }
}

/// An explicit size in EMU
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Extent {
    /// Width in EMU
    pub cx: i64,
    /// Height in EMU
    pub cy: i64,
}

impl Extent {
    /// Create a new extent
    pub const fn new(cx: i64, cy: i64) -> Self {
        Self { cx, cy }
    }

    /// Size in pixels
    pub fn to_pixels(&self) -> (f64, f64) {
        (length_to_pixels(self.cx), length_to_pixels(self.cy))
    }
}

/// A From/To anchor pair.
///
/// Offsets may run past the end of their cell, so whether `to` lies after
/// `from` is only known against a sheet's geometry; see [`Anchor::resolve`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Anchor {
    from: AnchorPoint,
    to: AnchorPoint,
}

impl Anchor {
    /// Create an anchor from two points.
    ///
    /// Fails when an offset is negative.
    pub fn new(from: AnchorPoint, to: AnchorPoint) -> Result<Self> {
        for point in [&from, &to] {
            if point.col_off < 0 || point.row_off < 0 {
                return Err(OverlayError::InvalidAnchor(format!(
                    "negative offset ({}, {})",
                    point.col_off, point.row_off
                )));
            }
        }
        Ok(Self { from, to })
    }

    /// Create an anchor from a start point and an explicit extent
    pub fn from_extent(from: AnchorPoint, extent: Extent) -> Result<Self> {
        if extent.cx < 0 || extent.cy < 0 {
            return Err(OverlayError::InvalidAnchor(format!(
                "negative extent {}x{}",
                extent.cx, extent.cy
            )));
        }
        Self::new(from, from.offset_by(extent))
    }

    /// Start point
    pub fn from(&self) -> &AnchorPoint {
        &self.from
    }

    /// End point
    pub fn to(&self) -> &AnchorPoint {
        &self.to
    }

    /// Absolute pixel position of the start point
    pub fn origin_px(&self, geometry: &SheetGeometry) -> (f64, f64) {
        anchor_point_to_pixels(geometry, &self.from)
    }

    /// Absolute pixel box spanned from `from` to `to`, possibly with negative size
    pub fn to_pixel_box(&self, geometry: &SheetGeometry) -> PixelBox {
        let (x1, y1) = anchor_point_to_pixels(geometry, &self.from);
        let (x2, y2) = anchor_point_to_pixels(geometry, &self.to);
        PixelBox::new(x1, y1, x2 - x1, y2 - y1)
    }

    /// Absolute pixel box, failing when `to` lies left of or above `from`
    pub fn resolve(&self, geometry: &SheetGeometry) -> Result<PixelBox> {
        let span = self.to_pixel_box(geometry);
        if span.w < 0.0 || span.h < 0.0 {
            return Err(OverlayError::InvalidAnchor(format!(
                "end ({:.2}, {:.2}) lies before start ({:.2}, {:.2})",
                span.right(),
                span.bottom(),
                span.x,
                span.y
            )));
        }
        Ok(span)
    }
}

/// Axis-aligned box in absolute sheet pixels
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PixelBox {
    pub x: f64,
    pub y: f64,
    pub w: f64,
    pub h: f64,
}

impl PixelBox {
    /// Create a new box
    pub const fn new(x: f64, y: f64, w: f64, h: f64) -> Self {
        Self { x, y, w, h }
    }

    /// Right edge
    pub fn right(&self) -> f64 {
        self.x + self.w
    }

    /// Bottom edge
    pub fn bottom(&self) -> f64 {
        self.y + self.h
    }

    /// Whether both dimensions are strictly positive
    pub fn has_area(&self) -> bool {
        self.w > 0.0 && self.h > 0.0
    }

    /// Open-interval intersection test.
    ///
    /// Two boxes overlap unless one lies entirely left, right, above or below the
    /// other. Boxes that only share an edge do not overlap; containment does.
    pub fn overlaps(&self, other: &PixelBox) -> bool {
        !(self.right() <= other.x
            || other.right() <= self.x
            || self.bottom() <= other.y
            || other.bottom() <= self.y)
    }
}
