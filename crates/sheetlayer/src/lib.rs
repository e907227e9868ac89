//! # sheetlayer
//!
//! Turns the raster images of a spreadsheet, together with the vector shapes
//! drawn over them, into layered SVG documents.
//!
//! For every embedded image, sheetlayer finds the shapes whose footprint overlaps
//! it, re-projects them from sheet coordinates into the image's own pixel space
//! and writes:
//! - `{stem}.svg`: the image as an embedded PNG plus one editable, tagged group
//!   per shape (ellipse, rectangle, rounded rectangle, triangle, text)
//! - `{stem}.jpg`: a flattened preview of the same composition
//!
//! ## Example
//!
//! ```rust,no_run
//! use sheetlayer::prelude::*;
//!
//! let options = PipelineOptions {
//!     emit: EmitOptions::with_output_dir("out"),
//!     ..Default::default()
//! };
//! let report = convert("book.xlsx", &options).unwrap();
//! for diagnostic in &report.diagnostics {
//!     eprintln!("{}", diagnostic);
//! }
//! ```

pub mod pipeline;
pub mod prelude;
pub mod report;

pub use pipeline::{convert, inspect, Pipeline, PipelineOptions};
pub use report::RunReport;

// Re-export core types
pub use sheetlayer_core::{
    bind_sheet, cell_reference, match_overlays, Anchor, AnchorPoint, Color, Diagnostic,
    DiagnosticKind, Extent, Geometry, ImageRecord, OverlayBinding, OverlayError, PixelBox,
    PlacedShape, ProjectedShape, ScaleFactors, SheetGeometry, ShapeRecord,
};
pub use sheetlayer_core::address::anchor_reference;
pub use sheetlayer_core::units::normalize_anchor_point;

// Re-export I/O types
pub use sheetlayer_render::{
    extract_base_image, list_overlay_shapes, overlays_only, CompositeEmitter, EmitOptions,
    EmittedFiles, RenderError, StemSet,
};
pub use sheetlayer_xlsx::{ExtractOptions, SheetObjects, XlsxError, XlsxPackage};
