//! SVG documents: a base image layer plus one native element group per shape

use sheetlayer_core::{Color, Geometry, ProjectedShape};

/// `id` of the embedded base image element
pub const BASE_IMAGE_ID: &str = "base-image";
/// `id` of the overlay group
pub const OVERLAY_GROUP_ID: &str = "overlay-shapes";
/// `data-role` of the base image element
pub const ROLE_BASE_IMAGE: &str = "base-image";
/// `data-role` of the overlay group
pub const ROLE_OVERLAY: &str = "overlay";

/// Baseline offset below the vertical center, as a fraction of the font size
pub const TEXT_DESCENT: f64 = 0.35;
/// Distance between text lines, as a fraction of the font size
pub const LINE_HEIGHT: f64 = 1.2;
/// Corner radius of rounded rectangles, as a fraction of the shorter side
pub const ROUNDED_RECT_RADIUS: f64 = 1.0 / 6.0;
/// Default font stack for shape text
pub const DEFAULT_FONT_FAMILY: &str = "Calibri, Arial, sans-serif";

/// Format a coordinate rounded to 2 decimals, without trailing zeros
pub fn fmt_num(value: f64) -> String {
    if !value.is_finite() {
        return "0".to_string();
    }
    let rounded = (value * 100.0).round() / 100.0;
    if rounded == 0.0 {
        return "0".to_string();
    }
    let s = format!("{:.2}", rounded);
    s.trim_end_matches('0').trim_end_matches('.').to_string()
}

/// Escape text for use in XML content and attribute values
pub fn escape_xml(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}

fn paint_attrs(shape: &ProjectedShape) -> String {
    let mut attrs = String::new();
    match shape.fill {
        Some(paint) => {
            attrs.push_str(&format!(r#" fill="{}""#, paint.color));
            if paint.alpha < 1.0 {
                attrs.push_str(&format!(r#" fill-opacity="{}""#, fmt_num(paint.alpha)));
            }
        }
        None => attrs.push_str(r#" fill="none""#),
    }
    match shape.stroke {
        Some((color, width)) => {
            attrs.push_str(&format!(
                r#" stroke="{}" stroke-width="{}""#,
                color,
                fmt_num(width)
            ));
        }
        None => attrs.push_str(r#" stroke="none""#),
    }
    attrs
}

/// The native SVG primitive of a shape
pub fn shape_primitive(shape: &ProjectedShape) -> String {
    let (x, y, w, h) = (shape.x, shape.y, shape.w, shape.h);
    match &shape.geometry {
        Geometry::Ellipse => format!(
            r#"<ellipse cx="{}" cy="{}" rx="{}" ry="{}"{}/>"#,
            fmt_num(shape.center_x()),
            fmt_num(shape.center_y()),
            fmt_num(w / 2.0),
            fmt_num(h / 2.0),
            paint_attrs(shape)
        ),
        Geometry::Rect => format!(
            r#"<rect x="{}" y="{}" width="{}" height="{}"{}/>"#,
            fmt_num(x),
            fmt_num(y),
            fmt_num(w),
            fmt_num(h),
            paint_attrs(shape)
        ),
        Geometry::RoundedRect => {
            let radius = fmt_num(w.min(h) * ROUNDED_RECT_RADIUS);
            format!(
                r#"<rect x="{}" y="{}" width="{}" height="{}" rx="{}" ry="{}"{}/>"#,
                fmt_num(x),
                fmt_num(y),
                fmt_num(w),
                fmt_num(h),
                radius,
                radius,
                paint_attrs(shape)
            )
        }
        Geometry::Triangle => format!(
            r#"<polygon points="{},{} {},{} {},{}"{}/>"#,
            fmt_num(shape.center_x()),
            fmt_num(y),
            fmt_num(x + w),
            fmt_num(y + h),
            fmt_num(x),
            fmt_num(y + h),
            paint_attrs(shape)
        ),
        // Unrecognized presets are drawn as their bounding box outline
        Geometry::Other(_) => {
            let (color, width) = shape.stroke.unwrap_or((Color::BLACK, 1.0));
            format!(
                r#"<rect x="{}" y="{}" width="{}" height="{}" fill="none" stroke="{}" stroke-width="{}"/>"#,
                fmt_num(x),
                fmt_num(y),
                fmt_num(w),
                fmt_num(h),
                color,
                fmt_num(width)
            )
        }
    }
}

/// The text element of a shape, centered in its box; one `<tspan>` per line
pub fn shape_text(shape: &ProjectedShape, font_family: &str) -> Option<String> {
    let text = shape.text.as_deref()?;
    let font_px = shape.font_px?;
    let lines: Vec<&str> = text.split('\n').collect();
    let line_height = font_px * LINE_HEIGHT;
    let cx = fmt_num(shape.center_x());

    let mut out = format!(
        r#"<text x="{}" y="{}" font-size="{}" font-family="{}" fill="{}" text-anchor="middle">"#,
        cx,
        fmt_num(shape.center_y() + TEXT_DESCENT * font_px),
        fmt_num(font_px),
        escape_xml(font_family),
        shape.text_color.unwrap_or(Color::BLACK)
    );

    // Center the block of lines around the baseline of a single line
    let mut pending_dy = -(lines.len() as f64 - 1.0) * line_height / 2.0;
    for (i, line) in lines.iter().enumerate() {
        if i > 0 {
            pending_dy += line_height;
        }
        if line.is_empty() {
            continue;
        }
        if pending_dy == 0.0 {
            out.push_str(&format!(r#"<tspan x="{}">{}</tspan>"#, cx, escape_xml(line)));
        } else {
            out.push_str(&format!(
                r#"<tspan x="{}" dy="{}">{}</tspan>"#,
                cx,
                fmt_num(pending_dy),
                escape_xml(line)
            ));
        }
        pending_dy = 0.0;
    }
    out.push_str("</text>");
    Some(out)
}

/// XML `id` for a shape group: prefixed so it starts with a letter and never
/// clashes with the document's own groups, other characters mapped to `_`
fn element_id(shape_id: &str) -> String {
    let mut id = String::from("shape-");
    id.extend(shape_id.chars().map(|c| {
        if c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.') {
            c
        } else {
            '_'
        }
    }));
    id
}

/// The tagged group of one shape
pub fn shape_group(shape: &ProjectedShape, font_family: &str) -> String {
    let mut out = format!(
        r#"<g id="{}" data-shape-id="{}" data-geometry="{}""#,
        element_id(&shape.id),
        escape_xml(&shape.id),
        shape.geometry.as_str()
    );
    if let Some(name) = &shape.name {
        out.push_str(&format!(r#" data-name="{}""#, escape_xml(name)));
    }
    out.push('>');
    out.push_str(&shape_primitive(shape));
    if let Some(text) = shape_text(shape, font_family) {
        out.push_str(&text);
    }
    out.push_str("</g>");
    out
}

/// Builder for one output document
#[derive(Debug, Clone)]
pub struct SvgDocument<'a> {
    width: u32,
    height: u32,
    base_href: Option<&'a str>,
    overlay: Option<&'a [ProjectedShape]>,
    font_family: &'a str,
}

impl<'a> SvgDocument<'a> {
    /// Empty document of the given pixel size
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            base_href: None,
            overlay: None,
            font_family: DEFAULT_FONT_FAMILY,
        }
    }

    /// Embed the base image from a `data:` URI
    pub fn with_base_image(mut self, href: &'a str) -> Self {
        self.base_href = Some(href);
        self
    }

    /// Add the overlay group with these shapes, in order
    pub fn with_overlay(mut self, shapes: &'a [ProjectedShape]) -> Self {
        self.overlay = Some(shapes);
        self
    }

    /// Font stack for shape text
    pub fn with_font_family(mut self, family: &'a str) -> Self {
        self.font_family = family;
        self
    }

    /// Serialize the document
    pub fn to_svg(&self) -> String {
        let mut out = format!(
            r#"<?xml version="1.0" encoding="UTF-8"?>
<svg xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}" viewBox="0 0 {w} {h}">"#,
            w = self.width,
            h = self.height
        );

        if let Some(href) = self.base_href {
            out.push_str(&format!(
                r#"
  <image id="{}" data-role="{}" x="0" y="0" width="{}" height="{}" href="{}"/>"#,
                BASE_IMAGE_ID,
                ROLE_BASE_IMAGE,
                self.width,
                self.height,
                escape_xml(href)
            ));
        }

        if let Some(shapes) = self.overlay {
            out.push_str(&format!(
                r#"
  <g id="{}" data-role="{}">"#,
                OVERLAY_GROUP_ID, ROLE_OVERLAY
            ));
            for shape in shapes {
                out.push_str("\n    ");
                out.push_str(&shape_group(shape, self.font_family));
            }
            out.push_str("\n  </g>");
        }

        out.push_str("\n</svg>\n");
        out
    }
}
