//! # sheetlayer-render
//!
//! Output side of the sheetlayer pipeline.
//!
//! Each [`OverlayBinding`](sheetlayer_core::OverlayBinding) becomes:
//! - an SVG document with the base image embedded as a PNG `data:` URI and one
//!   tagged `<g>` group per overlay shape, drawn with native SVG primitives
//! - a flattened JPEG preview (overlay rasterized with resvg over the base image)
//!
//! The [`overlay`] module reads emitted documents back: it can extract the
//! base image, list the overlay groups or strip the base layer.

pub mod emitter;
pub mod error;
pub mod overlay;
pub mod payload;
pub mod preview;
pub mod svg;

pub use emitter::{
    output_stem, CompositeEmitter, EmitOptions, EmittedFiles, RenderedBinding, StemSet,
};
pub use error::{RenderError, RenderResult};
pub use overlay::{extract_base_image, list_overlay_shapes, overlays_only, OverlayShapeRef};
pub use payload::{data_uri, decode_data_uri, png_data_uri, DataUri};
pub use preview::{render_preview, JPEG_QUALITY};
pub use svg::SvgDocument;
