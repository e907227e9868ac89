//! Inline payloads: base images embedded as `data:` URIs

use std::io::Cursor;

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use image::{ColorType, DynamicImage, ImageFormat};

use crate::error::{RenderError, RenderResult};

/// MIME type of the embedded base image
pub const PNG_MIME: &str = "image/png";

/// A decoded `data:` URI
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataUri {
    pub mime: String,
    pub bytes: Vec<u8>,
}

impl DataUri {
    /// Decode the payload as an image
    pub fn to_image(&self) -> RenderResult<DynamicImage> {
        Ok(image::load_from_memory(&self.bytes)?)
    }
}

/// Encode an image as PNG.
///
/// Color types PNG cannot hold (floating point) are converted to RGBA8 first.
pub fn encode_png(image: &DynamicImage) -> RenderResult<Vec<u8>> {
    let mut out = Cursor::new(Vec::new());
    match image.color() {
        ColorType::L8
        | ColorType::La8
        | ColorType::Rgb8
        | ColorType::Rgba8
        | ColorType::L16
        | ColorType::La16
        | ColorType::Rgb16
        | ColorType::Rgba16 => image.write_to(&mut out, ImageFormat::Png)?,
        _ => DynamicImage::ImageRgba8(image.to_rgba8()).write_to(&mut out, ImageFormat::Png)?,
    }
    Ok(out.into_inner())
}

/// Build a base64 `data:` URI
pub fn data_uri(mime: &str, bytes: &[u8]) -> String {
    format!("data:{};base64,{}", mime, STANDARD.encode(bytes))
}

/// Re-encode an image as PNG and wrap it in a `data:` URI
pub fn png_data_uri(image: &DynamicImage) -> RenderResult<String> {
    Ok(data_uri(PNG_MIME, &encode_png(image)?))
}

/// Decode a base64 `data:` URI
pub fn decode_data_uri(uri: &str) -> RenderResult<DataUri> {
    let rest = uri
        .trim()
        .strip_prefix("data:")
        .ok_or_else(|| RenderError::Payload("not a data URI".into()))?;
    let (header, payload) = rest
        .split_once(',')
        .ok_or_else(|| RenderError::Payload("data URI without payload".into()))?;
    let mime = header
        .strip_suffix(";base64")
        .ok_or_else(|| RenderError::Payload("data URI is not base64 encoded".into()))?;

    // Encoders may wrap long payloads
    let payload: String = payload.chars().filter(|c| !c.is_ascii_whitespace()).collect();
    Ok(DataUri {
        mime: mime.to_string(),
        bytes: STANDARD.decode(payload)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{ImageBuffer, Rgba};

    fn checkerboard() -> DynamicImage {
        DynamicImage::ImageRgba8(ImageBuffer::from_fn(7, 5, |x, y| {
            if (x + y) % 2 == 0 {
                Rgba([255, 0, 0, 255])
            } else {
                Rgba([0, 0, 255, 128])
            }
        }))
    }

    #[test]
    fn test_payload_preserves_pixels() {
        let original = checkerboard();
        let uri = png_data_uri(&original).unwrap();
        assert!(uri.starts_with("data:image/png;base64,"));

        let decoded = decode_data_uri(&uri).unwrap();
        assert_eq!(decoded.mime, PNG_MIME);
        let image = decoded.to_image().unwrap();
        assert_eq!(image.to_rgba8().as_raw(), original.to_rgba8().as_raw());
    }

    #[test]
    fn test_float_images_are_converted() {
        let float = DynamicImage::ImageRgb32F(ImageBuffer::from_pixel(2, 2, image::Rgb([1.0, 0.0, 0.0])));
        let png = encode_png(&float).unwrap();
        let back = image::load_from_memory(&png).unwrap();
        assert_eq!(back.to_rgba8().get_pixel(0, 0).0, [255, 0, 0, 255]);
    }

    #[test]
    fn test_wrapped_payload() {
        let uri = "data:text/plain;base64,aGVs\n bG8=";
        assert_eq!(decode_data_uri(uri).unwrap().bytes, b"hello");
    }

    #[test]
    fn test_rejects_other_uris() {
        for uri in [
            "https://example.com/a.png",
            "data:image/png;base64",
            "data:text/plain,hello",
            "data:image/png;base64,@@@",
        ] {
            assert!(decode_data_uri(uri).is_err(), "{}", uri);
        }
    }
}
