//! Embedded image extraction
//!
//! Only the image header is decoded here; pixels are decoded later, and only
//! when a preview is rendered.

use std::io::Cursor;

use image::{ImageFormat, ImageReader, Limits};

use crate::drawing::PictureAnchor;
use sheetlayer_core::{ImageRecord, OverlayError, SheetGeometry};

/// Limits applied while probing embedded images
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExtractOptions {
    /// Maximum accepted width in pixels
    pub max_width: u32,
    /// Maximum accepted height in pixels
    pub max_height: u32,
    /// Maximum bytes a decoder may allocate
    pub max_alloc: u64,
}

impl Default for ExtractOptions {
    fn default() -> Self {
        Self {
            max_width: 16_384,
            max_height: 16_384,
            max_alloc: 512 * 1024 * 1024,
        }
    }
}

impl ExtractOptions {
    fn limits(&self) -> Limits {
        let mut limits = Limits::default();
        limits.max_image_width = Some(self.max_width);
        limits.max_image_height = Some(self.max_height);
        limits.max_alloc = Some(self.max_alloc);
        limits
    }
}

/// Intrinsic pixel size and detected format of an encoded image
pub fn probe_image(
    bytes: &[u8],
    options: &ExtractOptions,
) -> Result<((u32, u32), Option<ImageFormat>), OverlayError> {
    let mut reader = ImageReader::new(Cursor::new(bytes))
        .with_guessed_format()
        .map_err(|e| OverlayError::decode(e.to_string()))?;
    let format = reader.format();
    if format.is_none() {
        return Err(OverlayError::decode("unrecognized image format"));
    }
    reader.limits(options.limits());
    let size = reader
        .into_dimensions()
        .map_err(|e| OverlayError::decode(e.to_string()))?;
    Ok((size, format))
}

/// Turn a picture anchor and its media bytes into an [`ImageRecord`].
///
/// Undecodable payloads and empty images fail with [`OverlayError::Decode`].
pub fn extract_image(
    picture: &PictureAnchor,
    sheet: &str,
    bytes: Vec<u8>,
    geometry: &SheetGeometry,
    options: &ExtractOptions,
) -> Result<ImageRecord, OverlayError> {
    let (size, format) = probe_image(&bytes, options)?;
    let mut record = ImageRecord::new(
        picture.id.clone(),
        sheet,
        picture.anchor,
        geometry,
        size,
        bytes,
    )?;
    record.name = picture.name.clone();
    record.format = format
        .and_then(|f| f.extensions_str().first())
        .map(|ext| ext.to_string());
    Ok(record)
}
