//! Worksheet layout: column widths, row heights and the drawing reference

use std::io::BufRead;

use quick_xml::events::{BytesStart, Event};
use quick_xml::reader::Reader;

use crate::error::{XlsxError, XlsxResult};
use sheetlayer_core::{SheetGeometry, MAX_COLS};

/// Everything the overlay pipeline needs from a worksheet part
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SheetLayout {
    pub geometry: SheetGeometry,
    /// Relationship id of the sheet's `<drawing r:id="..."/>`
    pub drawing_rel_id: Option<String>,
}

fn is_true(value: &str) -> bool {
    value == "1" || value == "true"
}

fn attr_string(e: &BytesStart, key: &[u8]) -> Option<String> {
    e.attributes()
        .flatten()
        .find(|attr| attr.key.local_name().as_ref() == key)
        .and_then(|attr| attr.unescape_value().ok().map(|s| s.to_string()))
}

/// Read the layout of a worksheet part.
///
/// Cell data is skipped. Widths and heights are taken whenever present, since
/// that is what the sheet renders with regardless of the `custom*` flags.
pub fn read_sheet_layout<B: BufRead>(reader: B) -> XlsxResult<SheetLayout> {
    let mut xml_reader = Reader::from_reader(reader);
    xml_reader.trim_text(true);

    let mut buf = Vec::new();
    let mut layout = SheetLayout::default();

    loop {
        match xml_reader.read_event_into(&mut buf) {
            Ok(Event::Start(e)) | Ok(Event::Empty(e)) => match e.local_name().as_ref() {
                b"sheetFormatPr" => {
                    if let Some(w) = attr_string(&e, b"defaultColWidth").and_then(|s| s.parse().ok()) {
                        layout.geometry.default_column_width = w;
                    }
                    if let Some(h) = attr_string(&e, b"defaultRowHeight").and_then(|s| s.parse().ok()) {
                        layout.geometry.default_row_height = h;
                    }
                }
                b"col" => {
                    let mut min: Option<u32> = None;
                    let mut max: Option<u32> = None;
                    let mut width: Option<f64> = None;
                    let mut hidden = false;
                    for attr in e.attributes().flatten() {
                        match attr.key.as_ref() {
                            b"min" => {
                                min = attr.unescape_value().ok().and_then(|s| s.parse().ok());
                            }
                            b"max" => {
                                max = attr.unescape_value().ok().and_then(|s| s.parse().ok());
                            }
                            b"width" => {
                                width = attr.unescape_value().ok().and_then(|s| s.parse().ok());
                            }
                            b"hidden" => {
                                hidden = attr.unescape_value().ok().map_or(false, |s| is_true(&s));
                            }
                            _ => {}
                        }
                    }
                    if let (Some(min), Some(max)) = (min, max) {
                        let first = min.saturating_sub(1);
                        let last = max.saturating_sub(1).min(u32::from(MAX_COLS) - 1);
                        for col in first..=last {
                            // bounded by MAX_COLS above
                            let col = col as u16;
                            if let Some(w) = width {
                                layout.geometry.set_column_width(col, w);
                            }
                            if hidden {
                                layout.geometry.set_column_hidden(col, true);
                            }
                        }
                    }
                }
                b"row" => {
                    let mut row_num: Option<u32> = None;
                    let mut ht: Option<f64> = None;
                    let mut hidden = false;
                    for attr in e.attributes().flatten() {
                        match attr.key.as_ref() {
                            b"r" => {
                                row_num = attr.unescape_value().ok().and_then(|s| s.parse().ok());
                            }
                            b"ht" => {
                                ht = attr.unescape_value().ok().and_then(|s| s.parse().ok());
                            }
                            b"hidden" => {
                                hidden = attr.unescape_value().ok().map_or(false, |s| is_true(&s));
                            }
                            _ => {}
                        }
                    }
                    if let Some(r) = row_num {
                        let row_idx = r.saturating_sub(1); // 1-based to 0-based
                        if let Some(h) = ht {
                            layout.geometry.set_row_height(row_idx, h);
                        }
                        if hidden {
                            layout.geometry.set_row_hidden(row_idx, true);
                        }
                    }
                }
                b"drawing" => {
                    layout.drawing_rel_id = attr_string(&e, b"id");
                }
                _ => {}
            },
            Ok(Event::Eof) => break,
            Err(e) => return Err(XlsxError::Xml(e)),
            _ => {}
        }
        buf.clear();
    }

    Ok(layout)
}
