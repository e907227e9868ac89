//! Render error types

use thiserror::Error;

/// Result type for render operations
pub type RenderResult<T> = std::result::Result<T, RenderError>;

/// Errors that can occur while producing or reading output documents
#[derive(Debug, Error)]
pub enum RenderError {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Raster decode or encode error
    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),

    /// SVG could not be parsed for rasterization
    #[error("SVG error: {0}")]
    Svg(#[from] resvg::usvg::Error),

    /// XML error while reading an output document
    #[error("XML error: {0}")]
    Xml(#[from] quick_xml::Error),

    /// Invalid base64 payload
    #[error("Base64 error: {0}")]
    Base64(#[from] base64::DecodeError),

    /// Raster canvas could not be created
    #[error("Raster error: {0}")]
    Raster(String),

    /// Inline payload missing or not understood
    #[error("Payload error: {0}")]
    Payload(String),

    /// Core error
    #[error("Core error: {0}")]
    Core(#[from] sheetlayer_core::OverlayError),
}
