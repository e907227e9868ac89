//! Emitted documents read back through the overlay helpers

use std::io::Cursor;

use image::{GenericImageView, ImageBuffer, ImageFormat, Rgba};
use pretty_assertions::assert_eq;
use sheetlayer_core::{
    bind_sheet, Anchor, AnchorPoint, Color, Extent, FillSpec, Geometry, ImageRecord, Paint,
    SheetGeometry, ShapeRecord,
};
use sheetlayer_render::{
    extract_base_image, list_overlay_shapes, overlays_only, CompositeEmitter, EmitOptions,
};

const EMU_PER_PX: i64 = 9525;

fn checkerboard() -> Vec<u8> {
    let img = ImageBuffer::from_fn(16, 8, |x, y| {
        if (x + y) % 2 == 0 {
            Rgba([255u8, 0, 0, 255])
        } else {
            Rgba([0u8, 128, 0, 255])
        }
    });
    let mut out = Cursor::new(Vec::new());
    img.write_to(&mut out, ImageFormat::Png).unwrap();
    out.into_inner()
}

fn emitter() -> CompositeEmitter {
    CompositeEmitter::new(EmitOptions {
        load_system_fonts: false,
        write_preview: false,
        ..EmitOptions::default()
    })
}

#[test]
fn test_base_image_pixels_survive_embedding() {
    let bytes = checkerboard();
    let geo = SheetGeometry::default();
    let image = ImageRecord::new(
        "drawing1-image-1",
        "Sheet1",
        Anchor::from_extent(AnchorPoint::new(0, 0, 0, 0), Extent::new(16 * EMU_PER_PX, 8 * EMU_PER_PX))
            .unwrap(),
        &geo,
        (16, 8),
        bytes.clone(),
    )
    .unwrap();

    let (bindings, diagnostics) = bind_sheet(vec![image], &[]);
    assert!(diagnostics.is_empty());
    let rendered = emitter().render(&bindings[0], "checker").unwrap();
    let svg = rendered.svg.unwrap();

    let payload = extract_base_image(&svg).unwrap();
    assert_eq!(payload.mime, "image/png");
    let decoded = payload.to_image().unwrap();
    let original = image::load_from_memory(&bytes).unwrap();
    assert_eq!(decoded.dimensions(), (16, 8));
    assert_eq!(decoded.to_rgba8().into_raw(), original.to_rgba8().into_raw());
}

#[test]
fn test_overlay_groups_match_bound_shapes() {
    let geo = SheetGeometry::default();
    let image = ImageRecord::new(
        "drawing1-image-1",
        "Sheet1",
        Anchor::from_extent(AnchorPoint::new(0, 0, 0, 0), Extent::new(16 * EMU_PER_PX, 8 * EMU_PER_PX))
            .unwrap(),
        &geo,
        (16, 8),
        checkerboard(),
    )
    .unwrap();

    let mut callout = ShapeRecord::new(
        "drawing1-shape-2",
        Geometry::Ellipse,
        Anchor::from_extent(
            AnchorPoint::new(0, 0, 2 * EMU_PER_PX, 2 * EMU_PER_PX),
            Extent::new(4 * EMU_PER_PX, 4 * EMU_PER_PX),
        )
        .unwrap(),
        None,
    )
    .unwrap();
    callout.name = Some("Callout".to_string());
    callout.fill = FillSpec::Solid(Paint::opaque(Color::YELLOW));
    let badge = ShapeRecord::new(
        "drawing1-shape-3",
        Geometry::Other("star5".to_string()),
        Anchor::from_extent(
            AnchorPoint::new(0, 0, 8 * EMU_PER_PX, 0),
            Extent::new(4 * EMU_PER_PX, 4 * EMU_PER_PX),
        )
        .unwrap(),
        None,
    )
    .unwrap();
    let far_away = ShapeRecord::new(
        "drawing1-shape-4",
        Geometry::Rect,
        Anchor::from_extent(AnchorPoint::new(20, 20, 0, 0), Extent::new(EMU_PER_PX, EMU_PER_PX))
            .unwrap(),
        None,
    )
    .unwrap();
    let placed: Vec<_> = [callout, badge, far_away].iter().map(|s| s.place(&geo).unwrap()).collect();

    let (bindings, _) = bind_sheet(vec![image], &placed);
    let svg = emitter().render(&bindings[0], "layers").unwrap().svg.unwrap();

    let listed = list_overlay_shapes(&svg).unwrap();
    let ids: Vec<&str> = listed.iter().map(|s| s.id.as_str()).collect();
    assert_eq!(ids, vec!["drawing1-shape-2", "drawing1-shape-3"]);
    assert_eq!(listed[0].geometry, Geometry::Ellipse);
    assert_eq!(listed[0].name.as_deref(), Some("Callout"));

    let stripped = overlays_only(&svg).unwrap();
    assert!(extract_base_image(&stripped).is_err());
    assert_eq!(list_overlay_shapes(&stripped).unwrap(), listed);
}
