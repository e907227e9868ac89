//! Reading drawing objects from a generated workbook

use std::io::{Cursor, Write};

use image::{ImageBuffer, ImageFormat, Rgb};
use sheetlayer_core::{DiagnosticKind, Geometry};
use sheetlayer_xlsx::{ExtractOptions, XlsxPackage};

const CONTENT_TYPES: &str = r#"<?xml version="1.0"?><Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types"><Default Extension="xml" ContentType="application/xml"/><Default Extension="png" ContentType="image/png"/></Types>"#;

const WORKBOOK: &str = r#"<?xml version="1.0"?><workbook xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main" xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships"><sheets><sheet name="Sheet1" sheetId="1" r:id="rId1"/><sheet name="Broken" sheetId="2" r:id="rId2"/></sheets></workbook>"#;

const WORKBOOK_RELS: &str = r#"<?xml version="1.0"?><Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships"><Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/worksheet" Target="worksheets/sheet1.xml"/><Relationship Id="rId2" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/worksheet" Target="worksheets/sheet2.xml"/></Relationships>"#;

const SHEET: &str = r#"<?xml version="1.0"?><worksheet xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main" xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships"><sheetData/><drawing r:id="rId1"/></worksheet>"#;

const SHEET_RELS: &str = r#"<?xml version="1.0"?><Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships"><Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/drawing" Target="../drawings/drawing1.xml"/></Relationships>"#;

const DRAWING: &str = r#"<?xml version="1.0"?>
<xdr:wsDr xmlns:xdr="http://schemas.openxmlformats.org/drawingml/2006/spreadsheetDrawing" xmlns:a="http://schemas.openxmlformats.org/drawingml/2006/main" xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships">
  <xdr:oneCellAnchor>
    <xdr:from><xdr:col>0</xdr:col><xdr:colOff>0</xdr:colOff><xdr:row>0</xdr:row><xdr:rowOff>0</xdr:rowOff></xdr:from>
    <xdr:ext cx="1905000" cy="952500"/>
    <xdr:pic>
      <xdr:nvPicPr><xdr:cNvPr id="2" name="Photo"/><xdr:cNvPicPr/></xdr:nvPicPr>
      <xdr:blipFill><a:blip r:embed="rId1"/></xdr:blipFill>
      <xdr:spPr/>
    </xdr:pic>
    <xdr:clientData/>
  </xdr:oneCellAnchor>
  <xdr:oneCellAnchor>
    <xdr:from><xdr:col>5</xdr:col><xdr:colOff>0</xdr:colOff><xdr:row>5</xdr:row><xdr:rowOff>0</xdr:rowOff></xdr:from>
    <xdr:ext cx="95250" cy="95250"/>
    <xdr:pic>
      <xdr:nvPicPr><xdr:cNvPr id="3" name="Dangling"/><xdr:cNvPicPr/></xdr:nvPicPr>
      <xdr:blipFill><a:blip r:embed="rId9"/></xdr:blipFill>
      <xdr:spPr/>
    </xdr:pic>
    <xdr:clientData/>
  </xdr:oneCellAnchor>
  <xdr:twoCellAnchor>
    <xdr:from><xdr:col>0</xdr:col><xdr:colOff>95250</xdr:colOff><xdr:row>0</xdr:row><xdr:rowOff>95250</xdr:rowOff></xdr:from>
    <xdr:to><xdr:col>1</xdr:col><xdr:colOff>0</xdr:colOff><xdr:row>2</xdr:row><xdr:rowOff>0</xdr:rowOff></xdr:to>
    <xdr:sp>
      <xdr:nvSpPr><xdr:cNvPr id="4" name="Ring"/><xdr:cNvSpPr/></xdr:nvSpPr>
      <xdr:spPr><a:prstGeom prst="ellipse"/><a:noFill/><a:ln w="28575"><a:solidFill><a:srgbClr val="FF0000"/></a:solidFill></a:ln></xdr:spPr>
    </xdr:sp>
    <xdr:clientData/>
  </xdr:twoCellAnchor>
</xdr:wsDr>"#;

const DRAWING_RELS: &str = r#"<?xml version="1.0"?><Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships"><Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/image" Target="../media/image1.png"/></Relationships>"#;

fn png(width: u32, height: u32) -> Vec<u8> {
    let img: ImageBuffer<Rgb<u8>, Vec<u8>> = ImageBuffer::from_pixel(width, height, Rgb([0, 128, 255]));
    let mut out = Cursor::new(Vec::new());
    img.write_to(&mut out, ImageFormat::Png).unwrap();
    out.into_inner()
}

fn workbook() -> Vec<u8> {
    let mut buf = Vec::new();
    {
        let mut zip = zip::ZipWriter::new(Cursor::new(&mut buf));
        let options = zip::write::SimpleFileOptions::default();
        let parts: [(&str, Vec<u8>); 8] = [
            ("[Content_Types].xml", CONTENT_TYPES.into()),
            ("xl/workbook.xml", WORKBOOK.into()),
            ("xl/_rels/workbook.xml.rels", WORKBOOK_RELS.into()),
            ("xl/worksheets/sheet1.xml", SHEET.into()),
            ("xl/worksheets/_rels/sheet1.xml.rels", SHEET_RELS.into()),
            ("xl/drawings/drawing1.xml", DRAWING.into()),
            ("xl/drawings/_rels/drawing1.xml.rels", DRAWING_RELS.into()),
            ("xl/media/image1.png", png(400, 200)),
        ];
        for (name, data) in parts {
            zip.start_file(name, options).unwrap();
            zip.write_all(&data).unwrap();
        }
        zip.finish().unwrap();
    }
    buf
}

#[test]
fn test_collects_images_and_shapes() {
    let mut package = XlsxPackage::new(Cursor::new(workbook())).unwrap();
    let sheet = package.sheets()[0].clone();
    let objects = package.sheet_objects(&sheet, &ExtractOptions::default());

    assert_eq!(objects.images.len(), 1);
    let image = &objects.images[0];
    assert_eq!(image.id(), "drawing1-image-2");
    assert_eq!(image.intrinsic_size_px(), (400, 200));
    assert_eq!(image.nominal_size_px(), (200.0, 100.0));

    assert_eq!(objects.shapes.len(), 1);
    assert_eq!(objects.shapes[0].geometry, Geometry::Ellipse);

    assert_eq!(objects.diagnostics.len(), 1);
    assert_eq!(objects.diagnostics[0].subject, "drawing1-image-3");
    assert_eq!(objects.diagnostics[0].kind, DiagnosticKind::MissingData);
    assert_eq!(objects.images_excluded, 1);
}

#[test]
fn test_missing_worksheet_part_is_a_diagnostic() {
    let mut package = XlsxPackage::new(Cursor::new(workbook())).unwrap();
    let sheet = package.sheets()[1].clone();
    let objects = package.sheet_objects(&sheet, &ExtractOptions::default());

    assert!(objects.images.is_empty());
    assert!(objects.shapes.is_empty());
    assert_eq!(objects.diagnostics.len(), 1);
    assert_eq!(objects.diagnostics[0].subject, "Broken");
    assert_eq!(objects.diagnostics[0].kind, DiagnosticKind::MissingData);
}
