//! # sheetlayer-core
//!
//! Core data structures and geometry for the sheetlayer overlay pipeline.
//!
//! This crate provides the pieces that do not touch any file format:
//! - [`SheetGeometry`] and the [`units`] conversions from cell anchors to pixels
//! - [`ShapeRecord`] and [`ImageRecord`], the immutable records produced by parsing
//! - [`match_overlays`] and [`bind_sheet`], which pair images with the shapes
//!   drawn over them
//! - [`ScaleFactors`], which re-projects shapes into an image's own pixel space
//!
//! ## Example
//!
//! ```rust
//! use sheetlayer_core::{Anchor, AnchorPoint, Extent, ScaleFactors, SheetGeometry};
//!
//! let geometry = SheetGeometry::default();
//! let anchor = Anchor::from_extent(AnchorPoint::new(0, 0, 0, 0), Extent::new(952_500, 952_500)).unwrap();
//! let bbox = anchor.to_pixel_box(&geometry);
//! assert_eq!((bbox.w, bbox.h), (100.0, 100.0));
//!
//! let scale = ScaleFactors::new((400, 200), (bbox.w, bbox.h)).unwrap();
//! assert_eq!((scale.scale_x, scale.scale_y), (4.0, 2.0));
//! ```

pub mod address;
pub mod anchor;
pub mod binding;
pub mod color;
pub mod error;
pub mod geometry;
pub mod image;
pub mod matcher;
pub mod scale;
pub mod shape;
pub mod units;

// Re-exports for convenience
pub use address::{cell_reference, column_to_letters};
pub use anchor::{Anchor, AnchorPoint, Extent, PixelBox};
pub use binding::{bind_sheet, OverlayBinding};
pub use color::Color;
pub use error::{Diagnostic, DiagnosticKind, OverlayError, Result};
pub use geometry::SheetGeometry;
pub use image::ImageRecord;
pub use matcher::match_overlays;
pub use scale::{ProjectedShape, ScaleFactors};
pub use shape::{FillSpec, Geometry, Paint, PlacedShape, ShapeRecord, StrokeSpec};
pub use units::{cell_anchor_to_pixels, length_to_pixels};

/// Maximum number of rows in a worksheet (Excel limit)
pub const MAX_ROWS: u32 = 1_048_576;

/// Maximum number of columns in a worksheet (Excel limit)
pub const MAX_COLS: u16 = 16_384;
