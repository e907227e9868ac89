//! DrawingML drawing parts (`xl/drawings/drawingN.xml`)
//!
//! A drawing part holds one anchor element per object. Top-level shapes
//! (`xdr:sp`) become [`ShapeRecord`]s and pictures (`xdr:pic`) become
//! [`PictureAnchor`]s pointing at their media relationship. Group shapes,
//! connectors and graphic frames are skipped.

use std::collections::HashSet;
use std::io::BufRead;

use quick_xml::events::{BytesStart, Event};
use quick_xml::reader::Reader;

use crate::error::{XlsxError, XlsxResult};
use sheetlayer_core::{
    Anchor, AnchorPoint, Color, Diagnostic, Extent, FillSpec, Geometry, OverlayError, Paint,
    ShapeRecord, StrokeSpec,
};

/// A picture placed on the sheet, not yet decoded
#[derive(Debug, Clone, PartialEq)]
pub struct PictureAnchor {
    pub id: String,
    pub name: Option<String>,
    /// Relationship id of the media part (`a:blip@r:embed`)
    pub embed: String,
    pub anchor: Anchor,
}

/// Result of parsing one drawing part
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DrawingPart {
    /// Shapes in document order
    pub shapes: Vec<ShapeRecord>,
    /// Pictures in document order
    pub pictures: Vec<PictureAnchor>,
    /// Objects that could not be turned into records
    pub diagnostics: Vec<Diagnostic>,
    /// Group shapes, connectors and graphic frames that were ignored
    pub skipped: usize,
    /// Shapes dropped for malformed anchors
    pub shapes_skipped: usize,
    /// Pictures dropped for malformed anchors or a missing image reference
    pub pictures_skipped: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum AnchorKind {
    TwoCell,
    OneCell,
    Absolute,
}

impl AnchorKind {
    fn from_local(name: &[u8]) -> Option<Self> {
        match name {
            b"twoCellAnchor" => Some(AnchorKind::TwoCell),
            b"oneCellAnchor" => Some(AnchorKind::OneCell),
            b"absoluteAnchor" => Some(AnchorKind::Absolute),
            _ => None,
        }
    }

    fn element(&self) -> &'static str {
        match self {
            AnchorKind::TwoCell => "twoCellAnchor",
            AnchorKind::OneCell => "oneCellAnchor",
            AnchorKind::Absolute => "absoluteAnchor",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Marker {
    From,
    To,
}

#[derive(Debug, Default)]
struct PointBuilder {
    col: Option<u16>,
    row: Option<u32>,
    col_off: Option<i64>,
    row_off: Option<i64>,
}

impl PointBuilder {
    fn set(&mut self, field: &[u8], value: &str) {
        let value = value.trim();
        match field {
            b"col" => self.col = value.parse().ok(),
            b"row" => self.row = value.parse().ok(),
            b"colOff" => self.col_off = value.parse().ok(),
            b"rowOff" => self.row_off = value.parse().ok(),
            _ => {}
        }
    }

    fn build(&self) -> Option<AnchorPoint> {
        Some(AnchorPoint::new(
            self.col?,
            self.row?,
            self.col_off.unwrap_or(0),
            self.row_off.unwrap_or(0),
        ))
    }
}

#[derive(Debug)]
struct AnchorBuilder {
    kind: AnchorKind,
    from: PointBuilder,
    to: PointBuilder,
    ext: Option<Extent>,
    pos: Option<(i64, i64)>,
    shapes: Vec<ShapeBuilder>,
    pictures: Vec<PictureBuilder>,
}

impl AnchorBuilder {
    fn new(kind: AnchorKind) -> Self {
        Self {
            kind,
            from: PointBuilder::default(),
            to: PointBuilder::default(),
            ext: None,
            pos: None,
            shapes: Vec::new(),
            pictures: Vec::new(),
        }
    }

    /// Resolve the anchor of one object; `own_extent` is the object's `xfrm` extent
    fn resolve(&self, own_extent: Option<Extent>) -> Result<Anchor, OverlayError> {
        let missing = |what: &str| {
            OverlayError::parse(format!("{} without {}", self.kind.element(), what))
        };
        match self.kind {
            AnchorKind::TwoCell => {
                let from = self.from.build().ok_or_else(|| missing("a complete from marker"))?;
                match (self.to.build(), own_extent) {
                    (Some(to), _) => Anchor::new(from, to),
                    (None, Some(ext)) => Anchor::from_extent(from, ext),
                    (None, None) => Err(missing("a to marker or extent")),
                }
            }
            AnchorKind::OneCell => {
                let from = self.from.build().ok_or_else(|| missing("a complete from marker"))?;
                let ext = self.ext.or(own_extent).ok_or_else(|| missing("an extent"))?;
                Anchor::from_extent(from, ext)
            }
            AnchorKind::Absolute => {
                let (x, y) = self.pos.ok_or_else(|| missing("a position"))?;
                let ext = self.ext.or(own_extent).ok_or_else(|| missing("an extent"))?;
                Anchor::from_extent(AnchorPoint::new(0, 0, x, y), ext)
            }
        }
    }
}

#[derive(Debug, Default)]
struct ShapeBuilder {
    cnv_id: Option<String>,
    name: Option<String>,
    prst: Option<String>,
    extent: Option<Extent>,
    fill: FillSpec,
    line_none: bool,
    line_color: Option<Color>,
    line_width: Option<i64>,
    paragraphs: Vec<String>,
    font_size: Option<u32>,
    text_color: Option<Color>,
}

impl ShapeBuilder {
    fn stroke(&self) -> StrokeSpec {
        if self.line_none {
            StrokeSpec::None
        } else if let Some(color) = self.line_color {
            StrokeSpec::Solid {
                color,
                width_emu: self.line_width,
            }
        } else {
            StrokeSpec::Unspecified
        }
    }

    fn text(&mut self) -> Option<String> {
        let mut paragraphs = std::mem::take(&mut self.paragraphs);
        while paragraphs.last().map_or(false, |p| p.is_empty()) {
            paragraphs.pop();
        }
        if paragraphs.is_empty() {
            None
        } else {
            Some(paragraphs.join("\n"))
        }
    }
}

#[derive(Debug, Default)]
struct PictureBuilder {
    cnv_id: Option<String>,
    name: Option<String>,
    embed: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ColorTarget {
    Fill,
    Stroke,
    Text,
}

#[derive(Debug)]
struct PendingColor {
    target: ColorTarget,
    color: Option<Color>,
    alpha: Option<f64>,
}

const COLOR_ELEMENTS: [&[u8]; 4] = [b"srgbClr", b"sysClr", b"schemeClr", b"prstClr"];

fn attr_string(e: &BytesStart, key: &[u8]) -> Option<String> {
    e.attributes()
        .flatten()
        .find(|attr| attr.key.local_name().as_ref() == key)
        .and_then(|attr| attr.unescape_value().ok().map(|s| s.to_string()))
}

fn attr_i64(e: &BytesStart, key: &[u8]) -> Option<i64> {
    attr_string(e, key).and_then(|s| s.trim().parse().ok())
}

fn resolve_color(e: &BytesStart) -> Option<Color> {
    match e.local_name().as_ref() {
        b"srgbClr" => attr_string(e, b"val").and_then(|v| Color::from_hex(&v)),
        b"sysClr" => attr_string(e, b"lastClr")
            .and_then(|v| Color::from_hex(&v))
            .or_else(|| match attr_string(e, b"val").as_deref() {
                Some("window") => Some(Color::WHITE),
                Some("windowText") => Some(Color::BLACK),
                _ => None,
            }),
        b"schemeClr" => attr_string(e, b"val").and_then(|v| Color::from_scheme(&v)),
        b"prstClr" => attr_string(e, b"val").and_then(|v| Color::from_preset(&v)),
        _ => None,
    }
}

struct DrawingParser<'a> {
    part: &'a str,
    /// Local names of the currently open ancestors
    stack: Vec<Vec<u8>>,
    anchor: Option<AnchorBuilder>,
    shape: Option<ShapeBuilder>,
    picture: Option<PictureBuilder>,
    marker: Option<Marker>,
    color: Option<PendingColor>,
    used_ids: HashSet<String>,
    ordinal: usize,
    out: DrawingPart,
}

impl<'a> DrawingParser<'a> {
    fn new(part: &'a str) -> Self {
        Self {
            part,
            stack: Vec::new(),
            anchor: None,
            shape: None,
            picture: None,
            marker: None,
            color: None,
            used_ids: HashSet::new(),
            ordinal: 0,
            out: DrawingPart::default(),
        }
    }

    fn ancestor(&self, depth: usize) -> &[u8] {
        self.stack
            .len()
            .checked_sub(depth + 1)
            .and_then(|i| self.stack.get(i))
            .map_or(&[], Vec::as_slice)
    }

    fn in_element(&self, name: &[u8]) -> bool {
        self.stack.iter().any(|n| n.as_slice() == name)
    }

    /// Handle an opening (or empty) element; `self.stack` holds its ancestors
    fn open(&mut self, e: &BytesStart) {
        let name = e.local_name();
        let name = name.as_ref();
        let parent = self.ancestor(0).to_vec();
        let parent_is_anchor = AnchorKind::from_local(&parent).is_some();

        if let Some(kind) = AnchorKind::from_local(name) {
            self.anchor = Some(AnchorBuilder::new(kind));
            return;
        }

        match name {
            b"from" if parent_is_anchor => self.marker = Some(Marker::From),
            b"to" if parent_is_anchor => self.marker = Some(Marker::To),
            b"pos" if parent_is_anchor => {
                if let (Some(anchor), Some(x), Some(y)) =
                    (self.anchor.as_mut(), attr_i64(e, b"x"), attr_i64(e, b"y"))
                {
                    anchor.pos = Some((x, y));
                }
            }
            b"ext" if parent_is_anchor => {
                if let (Some(anchor), Some(cx), Some(cy)) =
                    (self.anchor.as_mut(), attr_i64(e, b"cx"), attr_i64(e, b"cy"))
                {
                    anchor.ext = Some(Extent::new(cx, cy));
                }
            }
            b"ext" if parent == b"xfrm" && self.ancestor(1) == b"spPr" => {
                if let (Some(shape), Some(cx), Some(cy)) =
                    (self.shape.as_mut(), attr_i64(e, b"cx"), attr_i64(e, b"cy"))
                {
                    shape.extent = Some(Extent::new(cx, cy));
                }
            }
            b"sp" if parent_is_anchor => self.shape = Some(ShapeBuilder::default()),
            b"pic" if parent_is_anchor => self.picture = Some(PictureBuilder::default()),
            b"grpSp" | b"cxnSp" | b"graphicFrame" if parent_is_anchor => {
                self.out.skipped += 1;
                log::debug!(
                    "{}: skipping {} object",
                    self.part,
                    String::from_utf8_lossy(name)
                );
            }
            b"cNvPr" => {
                let id = attr_string(e, b"id");
                let display = attr_string(e, b"name").filter(|n| !n.is_empty());
                if parent == b"nvSpPr" {
                    if let Some(shape) = self.shape.as_mut() {
                        shape.cnv_id = id;
                        shape.name = display;
                    }
                } else if parent == b"nvPicPr" {
                    if let Some(picture) = self.picture.as_mut() {
                        picture.cnv_id = id;
                        picture.name = display;
                    }
                }
            }
            b"blip" if self.in_element(b"blipFill") => {
                if let Some(picture) = self.picture.as_mut() {
                    picture.embed = attr_string(e, b"embed");
                }
            }
            b"prstGeom" if parent == b"spPr" => {
                if let Some(shape) = self.shape.as_mut() {
                    shape.prst = attr_string(e, b"prst");
                }
            }
            b"ln" if parent == b"spPr" => {
                if let Some(shape) = self.shape.as_mut() {
                    shape.line_width = attr_i64(e, b"w");
                }
            }
            b"noFill" => {
                let in_ln = parent == b"ln" && self.ancestor(1) == b"spPr";
                if let Some(shape) = self.shape.as_mut() {
                    if parent == b"spPr" {
                        shape.fill = FillSpec::None;
                    } else if in_ln {
                        shape.line_none = true;
                    }
                }
            }
            _ if COLOR_ELEMENTS.contains(&name) && parent == b"solidFill" => {
                let target = match self.ancestor(1) {
                    b"spPr" => Some(ColorTarget::Fill),
                    b"ln" if self.ancestor(2) == b"spPr" => Some(ColorTarget::Stroke),
                    b"rPr" => Some(ColorTarget::Text),
                    _ => None,
                };
                if let (Some(target), true) = (target, self.shape.is_some()) {
                    self.color = Some(PendingColor {
                        target,
                        color: resolve_color(e),
                        alpha: None,
                    });
                }
            }
            b"alpha" if COLOR_ELEMENTS.contains(&parent.as_slice()) => {
                if let Some(pending) = self.color.as_mut() {
                    // 1/1000 of a percent
                    pending.alpha = attr_i64(e, b"val").map(|v| v as f64 / 100_000.0);
                }
            }
            b"p" if parent == b"txBody" => {
                if let Some(shape) = self.shape.as_mut() {
                    shape.paragraphs.push(String::new());
                }
            }
            b"br" if parent == b"p" && self.in_element(b"txBody") => {
                if let Some(paragraph) = self.shape.as_mut().and_then(|s| s.paragraphs.last_mut()) {
                    paragraph.push('\n');
                }
            }
            b"rPr" if self.in_element(b"txBody") => {
                if let Some(shape) = self.shape.as_mut() {
                    if shape.font_size.is_none() {
                        shape.font_size = attr_string(e, b"sz").and_then(|s| s.parse().ok());
                    }
                }
            }
            _ => {}
        }
    }

    /// Handle a closing (or empty) element; `self.stack` holds its ancestors
    fn close(&mut self, name: &[u8]) {
        let parent_is_anchor = AnchorKind::from_local(self.ancestor(0)).is_some();

        if COLOR_ELEMENTS.contains(&name) {
            self.commit_color();
            return;
        }

        match name {
            b"from" | b"to" if parent_is_anchor => self.marker = None,
            b"sp" if parent_is_anchor => {
                if let (Some(shape), Some(anchor)) = (self.shape.take(), self.anchor.as_mut()) {
                    anchor.shapes.push(shape);
                }
            }
            b"pic" if parent_is_anchor => {
                if let (Some(picture), Some(anchor)) = (self.picture.take(), self.anchor.as_mut()) {
                    anchor.pictures.push(picture);
                }
            }
            _ if AnchorKind::from_local(name).is_some() => {
                if let Some(anchor) = self.anchor.take() {
                    self.finish_anchor(anchor);
                }
            }
            _ => {}
        }
    }

    fn text(&mut self, text: &str) {
        let current = self.ancestor(0).to_vec();

        if let Some(marker) = self.marker {
            if let Some(anchor) = self.anchor.as_mut() {
                match marker {
                    Marker::From => anchor.from.set(&current, text),
                    Marker::To => anchor.to.set(&current, text),
                }
            }
            return;
        }

        if current == b"t" && self.in_element(b"txBody") {
            if let Some(shape) = self.shape.as_mut() {
                if shape.paragraphs.is_empty() {
                    shape.paragraphs.push(String::new());
                }
                if let Some(paragraph) = shape.paragraphs.last_mut() {
                    paragraph.push_str(text);
                }
            }
        }
    }

    fn commit_color(&mut self) {
        let Some(pending) = self.color.take() else {
            return;
        };
        let Some(shape) = self.shape.as_mut() else {
            return;
        };
        let Some(color) = pending.color else {
            log::debug!("{}: unresolved color for {:?}", self.part, pending.target);
            return;
        };
        match pending.target {
            ColorTarget::Fill => {
                shape.fill = FillSpec::Solid(match pending.alpha {
                    Some(alpha) => Paint::with_alpha(color, alpha),
                    None => Paint::opaque(color),
                });
            }
            ColorTarget::Stroke => shape.line_color = Some(color),
            ColorTarget::Text => {
                if shape.text_color.is_none() {
                    shape.text_color = Some(color);
                }
            }
        }
    }

    fn allocate_id(&mut self, kind: &str, cnv_id: Option<&str>) -> String {
        self.ordinal += 1;
        let base = match cnv_id {
            Some(id) if !id.is_empty() => format!("{}-{}-{}", self.part, kind, id),
            _ => format!("{}-{}-n{}", self.part, kind, self.ordinal),
        };
        let id = if self.used_ids.contains(&base) {
            format!("{}-{}", base, self.ordinal)
        } else {
            base
        };
        self.used_ids.insert(id.clone());
        id
    }

    fn finish_anchor(&mut self, mut anchor: AnchorBuilder) {
        for mut builder in std::mem::take(&mut anchor.shapes) {
            let id = self.allocate_id("shape", builder.cnv_id.as_deref());
            let geometry = builder
                .prst
                .as_deref()
                .map(Geometry::from_preset)
                .unwrap_or_else(|| Geometry::Other("custom".to_string()));

            let record = anchor
                .resolve(builder.extent)
                .and_then(|resolved| ShapeRecord::new(id.clone(), geometry, resolved, builder.extent));
            match record {
                Ok(mut shape) => {
                    shape.fill = builder.fill;
                    shape.stroke = builder.stroke();
                    shape.text = builder.text();
                    shape.font_size = builder.font_size;
                    shape.text_color = builder.text_color;
                    shape.name = builder.name.take();
                    self.out.shapes.push(shape);
                }
                Err(err) => {
                    log::warn!("{}: skipping shape {}: {}", self.part, id, err);
                    self.out.diagnostics.push(Diagnostic::new(id, &err));
                    self.out.shapes_skipped += 1;
                }
            }
        }

        for builder in std::mem::take(&mut anchor.pictures) {
            let id = self.allocate_id("image", builder.cnv_id.as_deref());
            let resolved = anchor.resolve(None).and_then(|resolved| {
                builder
                    .embed
                    .clone()
                    .map(|embed| (resolved, embed))
                    .ok_or_else(|| OverlayError::parse("picture without an embedded image reference"))
            });
            match resolved {
                Ok((resolved, embed)) => self.out.pictures.push(PictureAnchor {
                    id,
                    name: builder.name,
                    embed,
                    anchor: resolved,
                }),
                Err(err) => {
                    log::warn!("{}: skipping picture {}: {}", self.part, id, err);
                    self.out.diagnostics.push(Diagnostic::new(id, &err));
                    self.out.pictures_skipped += 1;
                }
            }
        }
    }
}

/// Parse a drawing part.
///
/// `part` is a short key for the part (e.g. `"drawing1"`) used to build stable
/// object identifiers of the form `{part}-shape-{cNvPr id}`. Objects with missing
/// anchor data are reported in [`DrawingPart::diagnostics`] and skipped; malformed
/// XML fails the whole part.
pub fn parse_drawing<B: BufRead>(reader: B, part: &str) -> XlsxResult<DrawingPart> {
    // Text is not trimmed: spaces at run boundaries are significant
    let mut xml_reader = Reader::from_reader(reader);

    let mut buf = Vec::new();
    let mut parser = DrawingParser::new(part);

    loop {
        match xml_reader.read_event_into(&mut buf) {
            Ok(Event::Start(e)) => {
                parser.open(&e);
                parser.stack.push(e.local_name().as_ref().to_vec());
            }
            Ok(Event::Empty(e)) => {
                parser.open(&e);
                parser.close(e.local_name().as_ref());
            }
            Ok(Event::End(e)) => {
                parser.stack.pop();
                parser.close(e.local_name().as_ref());
            }
            Ok(Event::Text(e)) => {
                let text = e.unescape()?;
                parser.text(&text);
            }
            Ok(Event::Eof) => break,
            Err(e) => return Err(XlsxError::Xml(e)),
            _ => {}
        }
        buf.clear();
    }

    Ok(parser.out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use sheetlayer_core::DiagnosticKind;

    const DRAWING: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<xdr:wsDr xmlns:xdr="http://schemas.openxmlformats.org/drawingml/2006/spreadsheetDrawing"
          xmlns:a="http://schemas.openxmlformats.org/drawingml/2006/main"
          xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships">
  <xdr:twoCellAnchor editAs="oneCell">
    <xdr:from><xdr:col>1</xdr:col><xdr:colOff>0</xdr:colOff><xdr:row>0</xdr:row><xdr:rowOff>66675</xdr:rowOff></xdr:from>
    <xdr:to><xdr:col>4</xdr:col><xdr:colOff>9525</xdr:colOff><xdr:row>12</xdr:row><xdr:rowOff>0</xdr:rowOff></xdr:to>
    <xdr:pic>
      <xdr:nvPicPr><xdr:cNvPr id="2" name="Picture 1"/><xdr:cNvPicPr/></xdr:nvPicPr>
      <xdr:blipFill><a:blip r:embed="rId1"/><a:stretch><a:fillRect/></a:stretch></xdr:blipFill>
      <xdr:spPr><a:prstGeom prst="rect"><a:avLst/></a:prstGeom></xdr:spPr>
    </xdr:pic>
    <xdr:clientData/>
  </xdr:twoCellAnchor>
  <xdr:twoCellAnchor>
    <xdr:from><xdr:col>2</xdr:col><xdr:colOff>0</xdr:colOff><xdr:row>3</xdr:row><xdr:rowOff>0</xdr:rowOff></xdr:from>
    <xdr:to><xdr:col>3</xdr:col><xdr:colOff>0</xdr:colOff><xdr:row>5</xdr:row><xdr:rowOff>0</xdr:rowOff></xdr:to>
    <xdr:sp macro="" textlink="">
      <xdr:nvSpPr><xdr:cNvPr id="3" name="Oval 2"/><xdr:cNvSpPr/></xdr:nvSpPr>
      <xdr:spPr>
        <a:xfrm><a:off x="1219200" y="571500"/><a:ext cx="952500" cy="419100"/></a:xfrm>
        <a:prstGeom prst="ellipse"><a:avLst/></a:prstGeom>
        <a:solidFill><a:srgbClr val="FFFF00"><a:alpha val="50000"/></a:srgbClr></a:solidFill>
        <a:ln w="19050"><a:solidFill><a:schemeClr val="accent1"><a:shade val="50000"/></a:schemeClr></a:solidFill></a:ln>
      </xdr:spPr>
      <xdr:style><a:lnRef idx="2"><a:schemeClr val="accent2"/></a:lnRef></xdr:style>
      <xdr:txBody>
        <a:bodyPr rtlCol="0" anchor="ctr"/>
        <a:p><a:r><a:rPr lang="en-US" sz="1400"><a:solidFill><a:srgbClr val="FF0000"/></a:solidFill></a:rPr><a:t>Check </a:t></a:r><a:r><a:rPr sz="1800"/><a:t>this &amp; that</a:t></a:r></a:p>
        <a:p><a:fld id="{1}" type="slidenum"><a:t>2</a:t></a:fld></a:p>
        <a:p><a:endParaRPr lang="en-US"/></a:p>
      </xdr:txBody>
    </xdr:sp>
    <xdr:clientData/>
  </xdr:twoCellAnchor>
  <xdr:oneCellAnchor>
    <xdr:from><xdr:col>0</xdr:col><xdr:colOff>0</xdr:colOff><xdr:row>1</xdr:row><xdr:rowOff>0</xdr:rowOff></xdr:from>
    <xdr:ext cx="190500" cy="95250"/>
    <xdr:sp>
      <xdr:nvSpPr><xdr:cNvPr id="4" name="Box"/><xdr:cNvSpPr/></xdr:nvSpPr>
      <xdr:spPr>
        <a:prstGeom prst="rect"/>
        <a:noFill/>
        <a:ln><a:noFill/></a:ln>
      </xdr:spPr>
    </xdr:sp>
    <xdr:clientData/>
  </xdr:oneCellAnchor>
  <xdr:twoCellAnchor>
    <xdr:from><xdr:col>0</xdr:col><xdr:colOff>0</xdr:colOff><xdr:row>0</xdr:row><xdr:rowOff>0</xdr:rowOff></xdr:from>
    <xdr:to><xdr:col>2</xdr:col><xdr:colOff>0</xdr:colOff><xdr:row>2</xdr:row><xdr:rowOff>0</xdr:rowOff></xdr:to>
    <xdr:grpSp>
      <xdr:nvGrpSpPr><xdr:cNvPr id="5" name="Group"/><xdr:cNvGrpSpPr/></xdr:nvGrpSpPr>
      <xdr:grpSpPr/>
      <xdr:sp><xdr:nvSpPr><xdr:cNvPr id="6" name="Inner"/><xdr:cNvSpPr/></xdr:nvSpPr><xdr:spPr><a:prstGeom prst="rect"/></xdr:spPr></xdr:sp>
    </xdr:grpSp>
    <xdr:clientData/>
  </xdr:twoCellAnchor>
  <xdr:absoluteAnchor>
    <xdr:pos x="95250" y="190500"/>
    <xdr:ext cx="952500" cy="952500"/>
    <xdr:sp>
      <xdr:nvSpPr><xdr:cNvPr id="7" name="Star"/><xdr:cNvSpPr/></xdr:nvSpPr>
      <xdr:spPr><a:prstGeom prst="star5"/><a:solidFill><a:schemeClr val="accent6"/></a:solidFill></xdr:spPr>
    </xdr:sp>
    <xdr:clientData/>
  </xdr:absoluteAnchor>
</xdr:wsDr>"#;

    fn parse(xml: &str) -> DrawingPart {
        parse_drawing(xml.as_bytes(), "drawing1").unwrap()
    }

    #[test]
    fn test_picture_anchor() {
        let part = parse(DRAWING);
        assert_eq!(part.pictures.len(), 1);

        let pic = &part.pictures[0];
        assert_eq!(pic.id, "drawing1-image-2");
        assert_eq!(pic.name.as_deref(), Some("Picture 1"));
        assert_eq!(pic.embed, "rId1");
        assert_eq!(*pic.anchor.from(), AnchorPoint::new(1, 0, 0, 66675));
        assert_eq!(*pic.anchor.to(), AnchorPoint::new(4, 12, 9525, 0));
    }

    #[test]
    fn test_shapes_in_document_order() {
        let part = parse(DRAWING);
        let ids: Vec<&str> = part.shapes.iter().map(|s| s.id()).collect();
        assert_eq!(
            ids,
            vec!["drawing1-shape-3", "drawing1-shape-4", "drawing1-shape-7"]
        );
        assert_eq!(part.skipped, 1);
        assert!(part.diagnostics.is_empty());
    }

    #[test]
    fn test_shape_styling_and_text() {
        let part = parse(DRAWING);
        let oval = &part.shapes[0];

        assert_eq!(oval.name.as_deref(), Some("Oval 2"));
        assert_eq!(oval.geometry, Geometry::Ellipse);
        assert_eq!(oval.extent(), Some(Extent::new(952500, 419100)));
        assert_eq!(oval.fill, FillSpec::Solid(Paint::with_alpha(Color::YELLOW, 0.5)));
        assert_eq!(
            oval.stroke,
            StrokeSpec::Solid {
                color: Color::from_hex("4472C4").unwrap(),
                width_emu: Some(19050),
            }
        );
        assert_eq!(oval.text.as_deref(), Some("Check this & that\n2"));
        assert_eq!(oval.font_size, Some(1400));
        assert_eq!(oval.text_color, Some(Color::RED));
    }

    #[test]
    fn test_one_cell_anchor_and_explicit_none() {
        let part = parse(DRAWING);
        let boxed = &part.shapes[1];

        assert_eq!(*boxed.anchor().from(), AnchorPoint::new(0, 1, 0, 0));
        assert_eq!(*boxed.anchor().to(), AnchorPoint::new(0, 1, 190500, 95250));
        assert_eq!(boxed.fill, FillSpec::None);
        assert_eq!(boxed.stroke, StrokeSpec::None);
        assert_eq!(boxed.text, None);
        assert_eq!(boxed.font_size, None);
    }

    #[test]
    fn test_absolute_anchor_and_other_geometry() {
        let part = parse(DRAWING);
        let star = &part.shapes[2];

        assert_eq!(*star.anchor().from(), AnchorPoint::new(0, 0, 95250, 190500));
        assert_eq!(star.geometry, Geometry::Other("star5".to_string()));
        assert_eq!(
            star.fill,
            FillSpec::Solid(Paint::opaque(Color::from_hex("70AD47").unwrap()))
        );
        assert_eq!(star.stroke, StrokeSpec::Unspecified);
    }

    #[test]
    fn test_missing_anchor_data_is_reported() {
        let xml = r#"<xdr:wsDr xmlns:xdr="x" xmlns:a="a">
  <xdr:twoCellAnchor>
    <xdr:from><xdr:col>1</xdr:col><xdr:row>1</xdr:row></xdr:from>
    <xdr:sp><xdr:nvSpPr><xdr:cNvPr id="9" name="Lost"/></xdr:nvSpPr><xdr:spPr><a:prstGeom prst="rect"/></xdr:spPr></xdr:sp>
  </xdr:twoCellAnchor>
  <xdr:twoCellAnchor>
    <xdr:from><xdr:col>1</xdr:col><xdr:row>1</xdr:row></xdr:from>
    <xdr:sp><xdr:nvSpPr><xdr:cNvPr id="10" name="Sized"/></xdr:nvSpPr>
      <xdr:spPr><a:xfrm><a:ext cx="9525" cy="19050"/></a:xfrm><a:prstGeom prst="roundRect"/></xdr:spPr></xdr:sp>
  </xdr:twoCellAnchor>
</xdr:wsDr>"#;

        let part = parse(xml);
        assert_eq!(part.diagnostics.len(), 1);
        assert_eq!(part.diagnostics[0].subject, "drawing1-shape-9");
        assert_eq!(part.diagnostics[0].kind, DiagnosticKind::Parse);
        assert_eq!(part.shapes_skipped, 1);
        assert_eq!(part.pictures_skipped, 0);

        assert_eq!(part.shapes.len(), 1);
        let sized = &part.shapes[0];
        assert_eq!(sized.geometry, Geometry::RoundedRect);
        assert_eq!(*sized.anchor().to(), AnchorPoint::new(1, 1, 9525, 19050));
    }

    #[test]
    fn test_picture_without_embed_is_reported() {
        let xml = r#"<wsDr><oneCellAnchor>
  <from><col>0</col><row>0</row></from><ext cx="10" cy="10"/>
  <pic><nvPicPr><cNvPr id="2" name="Broken"/></nvPicPr><blipFill/></pic>
</oneCellAnchor></wsDr>"#;

        let part = parse(xml);
        assert!(part.pictures.is_empty());
        assert_eq!(part.diagnostics.len(), 1);
        assert_eq!(part.diagnostics[0].subject, "drawing1-image-2");
        assert_eq!(part.pictures_skipped, 1);
        assert_eq!(part.shapes_skipped, 0);
    }

    #[test]
    fn test_duplicate_and_missing_ids_stay_unique() {
        let shape = |id: &str| {
            format!(
                r#"<oneCellAnchor><from><col>0</col><row>0</row></from><ext cx="10" cy="10"/>
<sp><nvSpPr>{}</nvSpPr><spPr><prstGeom prst="rect"/></spPr></sp></oneCellAnchor>"#,
                id
            )
        };
        let xml = format!(
            "<wsDr>{}{}{}</wsDr>",
            shape(r#"<cNvPr id="3"/>"#),
            shape(r#"<cNvPr id="3"/>"#),
            shape("")
        );

        let part = parse(&xml);
        let ids: Vec<&str> = part.shapes.iter().map(|s| s.id()).collect();
        assert_eq!(
            ids,
            vec!["drawing1-shape-3", "drawing1-shape-3-2", "drawing1-shape-n3"]
        );
    }

    #[test]
    fn test_malformed_xml_fails_part() {
        let xml = "<wsDr><twoCellAnchor><sp></twoCellAnchor></wsDr>";
        assert!(parse_drawing(xml.as_bytes(), "drawing1").is_err());
    }

    #[test]
    fn test_empty_drawing() {
        let part = parse(r#"<xdr:wsDr xmlns:xdr="x"/>"#);
        assert_eq!(part, DrawingPart::default());
    }
}
