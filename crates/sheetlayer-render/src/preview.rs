//! Flattened raster previews

use image::codecs::jpeg::JpegEncoder;
use image::{DynamicImage, Rgb, RgbImage};
use resvg::tiny_skia::{Pixmap, Transform};
use resvg::usvg::{Options, Tree};

use crate::error::{RenderError, RenderResult};

/// JPEG quality of every preview
pub const JPEG_QUALITY: u8 = 95;

/// Rasterize an SVG document onto a transparent canvas of the given size
pub fn rasterize_svg(svg: &str, width: u32, height: u32, options: &Options) -> RenderResult<Pixmap> {
    let tree = Tree::from_str(svg, options)?;
    let mut pixmap = Pixmap::new(width, height)
        .ok_or_else(|| RenderError::Raster(format!("cannot allocate a {}x{} canvas", width, height)))?;
    resvg::render(&tree, Transform::default(), &mut pixmap.as_mut());
    Ok(pixmap)
}

/// Flatten the base image onto white and composite the overlay on top.
///
/// The overlay is premultiplied RGBA as produced by resvg. Pixels outside the
/// overlay canvas keep the base color.
pub fn flatten_preview(base: &DynamicImage, overlay: Option<&Pixmap>) -> RgbImage {
    let rgba = base.to_rgba8();
    let (width, height) = rgba.dimensions();
    let mut out = RgbImage::new(width, height);

    for (x, y, px) in rgba.enumerate_pixels() {
        let alpha = f32::from(px[3]) / 255.0;
        let mut rgb = [0f32; 3];
        for (c, value) in rgb.iter_mut().enumerate() {
            *value = f32::from(px[c]) * alpha + 255.0 * (1.0 - alpha);
        }

        if let Some(top) = overlay.and_then(|pixmap| pixmap.pixel(x, y)) {
            let top_alpha = f32::from(top.alpha()) / 255.0;
            let src = [top.red(), top.green(), top.blue()];
            for (value, s) in rgb.iter_mut().zip(src) {
                *value = f32::from(s) + *value * (1.0 - top_alpha);
            }
        }

        out.put_pixel(x, y, Rgb(rgb.map(|v| v.round().clamp(0.0, 255.0) as u8)));
    }
    out
}

/// Encode an RGB raster as JPEG
pub fn encode_jpeg(image: &RgbImage, quality: u8) -> RenderResult<Vec<u8>> {
    let mut out = Vec::new();
    image.write_with_encoder(JpegEncoder::new_with_quality(&mut out, quality))?;
    Ok(out)
}

/// Render a complete preview: base image, optional overlay document, JPEG
pub fn render_preview(
    base: &DynamicImage,
    overlay_svg: Option<&str>,
    options: &Options,
) -> RenderResult<Vec<u8>> {
    let overlay = match overlay_svg {
        Some(svg) => Some(rasterize_svg(svg, base.width(), base.height(), options)?),
        None => None,
    };
    encode_jpeg(&flatten_preview(base, overlay.as_ref()), JPEG_QUALITY)
}
