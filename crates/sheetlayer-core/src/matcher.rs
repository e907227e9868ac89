//! Overlay matching between images and shapes on one sheet

use crate::image::ImageRecord;
use crate::shape::PlacedShape;

/// For every image, the indices of the shapes overlapping it.
///
/// The outer vector is parallel to `images`; each inner vector lists shape
/// indices in parse order. Images without a usable nominal size get no matches.
/// A shape overlapping several images appears in each of their lists.
pub fn match_overlays(images: &[ImageRecord], shapes: &[PlacedShape]) -> Vec<Vec<usize>> {
    images
        .iter()
        .map(|image| {
            if !image.has_valid_nominal_size() {
                return Vec::new();
            }
            let image_box = image.bbox();
            shapes
                .iter()
                .enumerate()
                .filter(|(_, placed)| placed.bbox.overlaps(&image_box))
                .map(|(idx, _)| idx)
                .collect()
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::anchor::{Anchor, AnchorPoint, PixelBox};
    use crate::geometry::SheetGeometry;
    use crate::shape::{Geometry, ShapeRecord};
    use pretty_assertions::assert_eq;

    fn image_at(id: &str, x_px: i64, y_px: i64, w_px: i64, h_px: i64) -> ImageRecord {
        let geo = SheetGeometry::default();
        let from = AnchorPoint::new(0, 0, x_px * 9525, y_px * 9525);
        let to = AnchorPoint::new(0, 0, (x_px + w_px) * 9525, (y_px + h_px) * 9525);
        let anchor = Anchor::new(from, to).unwrap();
        ImageRecord::new(id, "Sheet1", anchor, &geo, (100, 100), Vec::new()).unwrap()
    }

    fn shape_at(id: &str, x: f64, y: f64, w: f64, h: f64) -> PlacedShape {
        let point = AnchorPoint::default();
        let anchor = Anchor::new(point, point).unwrap();
        PlacedShape {
            shape: ShapeRecord::new(id, Geometry::Rect, anchor, None).unwrap(),
            bbox: PixelBox::new(x, y, w, h),
        }
    }

    #[test]
    fn test_many_to_many() {
        let images = vec![image_at("a", 0, 0, 100, 100), image_at("b", 90, 0, 100, 100)];
        let shapes = vec![
            shape_at("left", 10.0, 10.0, 20.0, 20.0),
            shape_at("straddle", 80.0, 10.0, 30.0, 20.0),
            shape_at("right", 150.0, 10.0, 20.0, 20.0),
            shape_at("far", 500.0, 500.0, 20.0, 20.0),
        ];

        let matches = match_overlays(&images, &shapes);
        assert_eq!(matches, vec![vec![0, 1], vec![1, 2]]);
    }

    #[test]
    fn test_touching_edge_is_not_matched() {
        let images = vec![image_at("a", 0, 0, 100, 100)];
        let shapes = vec![
            shape_at("touch", 100.0, 0.0, 20.0, 20.0),
            shape_at("contained", 10.0, 10.0, 5.0, 5.0),
        ];
        assert_eq!(match_overlays(&images, &shapes), vec![vec![1]]);
    }

    #[test]
    fn test_degenerate_image_gets_no_matches() {
        let images = vec![image_at("flat", 0, 0, 0, 0)];
        let shapes = vec![shape_at("s", -10.0, -10.0, 50.0, 50.0)];
        assert_eq!(match_overlays(&images, &shapes), vec![Vec::<usize>::new()]);
    }

    #[test]
    fn test_no_images() {
        let shapes = vec![shape_at("s", 0.0, 0.0, 5.0, 5.0)];
        assert!(match_overlays(&[], &shapes).is_empty());
    }
}
