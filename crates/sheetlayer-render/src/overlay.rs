//! Reading emitted documents back: base image extraction, overlay listing and
//! the overlays-only variant

use quick_xml::events::{BytesStart, Event};
use quick_xml::reader::Reader;
use quick_xml::writer::Writer;

use crate::error::{RenderError, RenderResult};
use crate::payload::{decode_data_uri, DataUri};
use crate::svg::{BASE_IMAGE_ID, OVERLAY_GROUP_ID, ROLE_BASE_IMAGE, ROLE_OVERLAY};
use sheetlayer_core::Geometry;

/// A shape group found in an emitted document
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OverlayShapeRef {
    pub id: String,
    pub geometry: Geometry,
    pub name: Option<String>,
}

fn attr_string(e: &BytesStart, key: &[u8]) -> Option<String> {
    e.attributes()
        .flatten()
        .find(|attr| attr.key.local_name().as_ref() == key)
        .and_then(|attr| attr.unescape_value().ok().map(|s| s.to_string()))
}

fn has_tag(e: &BytesStart, id: &str, role: &str) -> bool {
    attr_string(e, b"id").as_deref() == Some(id) || attr_string(e, b"data-role").as_deref() == Some(role)
}

fn is_base_image(e: &BytesStart) -> bool {
    e.local_name().as_ref() == b"image" && has_tag(e, BASE_IMAGE_ID, ROLE_BASE_IMAGE)
}

fn is_overlay_group(e: &BytesStart) -> bool {
    e.local_name().as_ref() == b"g" && has_tag(e, OVERLAY_GROUP_ID, ROLE_OVERLAY)
}

/// Decode the embedded base image of a document
pub fn extract_base_image(svg: &str) -> RenderResult<DataUri> {
    let mut reader = Reader::from_str(svg);
    loop {
        match reader.read_event()? {
            Event::Start(e) | Event::Empty(e) if is_base_image(&e) => {
                let href = attr_string(&e, b"href")
                    .ok_or_else(|| RenderError::Payload("base image without href".into()))?;
                return decode_data_uri(&href);
            }
            Event::Eof => break,
            _ => {}
        }
    }
    Err(RenderError::Payload("no base image element".into()))
}

/// List the shape groups inside the overlay group, in document order
pub fn list_overlay_shapes(svg: &str) -> RenderResult<Vec<OverlayShapeRef>> {
    let mut reader = Reader::from_str(svg);
    let mut shapes = Vec::new();
    let mut depth = 0usize;
    let mut overlay_depth: Option<usize> = None;

    let shape_ref = |e: &BytesStart| {
        attr_string(e, b"data-shape-id").map(|id| OverlayShapeRef {
            id,
            geometry: attr_string(e, b"data-geometry")
                .map(|g| Geometry::from_attr(&g))
                .unwrap_or_else(|| Geometry::Other(String::new())),
            name: attr_string(e, b"data-name"),
        })
    };

    loop {
        match reader.read_event()? {
            Event::Start(e) => {
                depth += 1;
                if overlay_depth.is_none() && is_overlay_group(&e) {
                    overlay_depth = Some(depth);
                } else if overlay_depth.is_some() && e.local_name().as_ref() == b"g" {
                    shapes.extend(shape_ref(&e));
                }
            }
            Event::Empty(e) => {
                if overlay_depth.is_some() && e.local_name().as_ref() == b"g" {
                    shapes.extend(shape_ref(&e));
                }
            }
            Event::End(_) => {
                if overlay_depth == Some(depth) {
                    overlay_depth = None;
                }
                depth = depth.saturating_sub(1);
            }
            Event::Eof => break,
            _ => {}
        }
    }
    Ok(shapes)
}

/// Remove the base image element and keep everything else byte for byte
pub fn overlays_only(svg: &str) -> RenderResult<String> {
    let mut reader = Reader::from_str(svg);
    let mut writer = Writer::new(Vec::new());
    let mut skip_depth = 0usize;
    let mut removed = false;

    loop {
        let event = reader.read_event()?;
        match &event {
            Event::Eof => break,
            Event::Start(e) if skip_depth == 0 && is_base_image(e) => {
                skip_depth = 1;
                removed = true;
                continue;
            }
            Event::Empty(e) if skip_depth == 0 && is_base_image(e) => {
                removed = true;
                continue;
            }
            Event::Start(_) if skip_depth > 0 => {
                skip_depth += 1;
                continue;
            }
            Event::End(_) if skip_depth > 0 => {
                skip_depth -= 1;
                continue;
            }
            _ if skip_depth > 0 => continue,
            _ => {}
        }
        writer.write_event(event)?;
    }

    if !removed {
        return Err(RenderError::Payload("no base image element".into()));
    }
    String::from_utf8(writer.into_inner()).map_err(|e| RenderError::Payload(e.to_string()))
}
