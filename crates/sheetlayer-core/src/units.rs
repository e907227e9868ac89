//! Unit conversion between document-native lengths and pixels
//!
//! Drawing positions are stored as a cell (row, column) plus sub-cell offsets in
//! EMU. Column widths are stored in characters and row heights in points, and each
//! uses its own pixel factor. All conversions are plain `f64` arithmetic; rounding
//! only happens when output is formatted.

use crate::anchor::AnchorPoint;
use crate::geometry::SheetGeometry;
use crate::{MAX_COLS, MAX_ROWS};

/// EMU per inch
pub const EMU_PER_INCH: f64 = 914_400.0;

/// Screen pixels per inch
pub const PIXELS_PER_INCH: f64 = 96.0;

/// EMU per pixel (914400 / 96 = 9525)
pub const EMU_PER_PIXEL: f64 = EMU_PER_INCH / PIXELS_PER_INCH;

/// Pixels per character of column width
pub const PIXELS_PER_CHARACTER: f64 = 7.0;

/// Pixels per point of row height
pub const PIXELS_PER_POINT: f64 = 1.33;

/// Convert a length in EMU to pixels
pub fn length_to_pixels(emu: i64) -> f64 {
    emu as f64 / EMU_PER_PIXEL
}

/// Convert a length in pixels back to EMU (rounded to the nearest unit)
pub fn pixels_to_length(px: f64) -> i64 {
    (px * EMU_PER_PIXEL).round() as i64
}

/// Convert a column width in characters to pixels
pub fn column_width_to_pixels(width: f64) -> f64 {
    width * PIXELS_PER_CHARACTER
}

/// Convert a row height in points to pixels
pub fn row_height_to_pixels(height: f64) -> f64 {
    height * PIXELS_PER_POINT
}

/// Absolute pixel position of the top-left corner of a cell
pub fn cell_anchor_to_pixels(geometry: &SheetGeometry, row: u32, col: u16) -> (f64, f64) {
    (geometry.column_offset_px(col), geometry.row_offset_px(row))
}

/// Absolute pixel position of an anchor point (cell corner plus offsets)
pub fn anchor_point_to_pixels(geometry: &SheetGeometry, point: &AnchorPoint) -> (f64, f64) {
    let (x, y) = cell_anchor_to_pixels(geometry, point.row, point.col);
    (
        x + length_to_pixels(point.col_off),
        y + length_to_pixels(point.row_off),
    )
}

/// Find the cell containing an absolute pixel position.
///
/// Returns an [`AnchorPoint`] whose offsets (in EMU) are measured from the
/// top-left corner of that cell. A position exactly on a cell boundary belongs to
/// the next cell. Negative coordinates clamp to the sheet origin.
pub fn pixels_to_cell_anchor(geometry: &SheetGeometry, x: f64, y: f64) -> AnchorPoint {
    let mut col: u16 = 0;
    let mut remaining_x = x.max(0.0);
    while col < MAX_COLS - 1 {
        let width = geometry.column_width_px(col);
        if remaining_x < width {
            break;
        }
        remaining_x -= width;
        col += 1;
    }

    let mut row: u32 = 0;
    let mut remaining_y = y.max(0.0);
    while row < MAX_ROWS - 1 {
        let height = geometry.row_height_px(row);
        if remaining_y < height {
            break;
        }
        remaining_y -= height;
        row += 1;
    }

    AnchorPoint::new(col, row, pixels_to_length(remaining_x), pixels_to_length(remaining_y))
}

/// Re-express an anchor point so its offsets fall inside its cell.
///
/// Points derived by adding an extent to a start offset can overflow their cell;
/// this walks the geometry to the cell that actually contains them.
pub fn normalize_anchor_point(geometry: &SheetGeometry, point: &AnchorPoint) -> AnchorPoint {
    let (x, y) = anchor_point_to_pixels(geometry, point);
    pixels_to_cell_anchor(geometry, x, y)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_emu_per_pixel() {
        assert_eq!(EMU_PER_PIXEL, 9525.0);
        assert_eq!(length_to_pixels(0), 0.0);
        assert_eq!(length_to_pixels(9525), 1.0);
        assert_eq!(length_to_pixels(4762), 4762.0 / 9525.0);
    }

    #[test]
    fn test_width_and_height_factors_differ() {
        // 10 characters wide vs 10 points tall
        assert_eq!(column_width_to_pixels(10.0), 70.0);
        assert!((row_height_to_pixels(10.0) - 13.3).abs() < 1e-12);
    }

    #[test]
    fn test_cell_anchor_to_pixels_defaults() {
        let geo = SheetGeometry::default();
        assert_eq!(cell_anchor_to_pixels(&geo, 0, 0), (0.0, 0.0));

        let (x, y) = cell_anchor_to_pixels(&geo, 2, 3);
        assert!((x - 3.0 * 8.43 * 7.0).abs() < 1e-9);
        assert!((y - 2.0 * 15.0 * 1.33).abs() < 1e-9);
    }

    #[test]
    fn test_anchor_point_adds_offsets() {
        let mut geo = SheetGeometry::default();
        geo.set_column_width(0, 10.0);
        let point = AnchorPoint::new(1, 1, 9525 * 5, 9525 * 2);
        let (x, y) = anchor_point_to_pixels(&geo, &point);
        assert!((x - 75.0).abs() < 1e-9);
        assert!((y - (19.95 + 2.0)).abs() < 1e-9);
    }

    #[test]
    fn test_pixels_to_cell_anchor_inside_cell() {
        let geo = SheetGeometry::default();
        // Column B starts at 59.01px, row 3 at 39.9px
        let point = pixels_to_cell_anchor(&geo, 70.0, 45.0);
        assert_eq!(point.col, 1);
        assert_eq!(point.row, 2);
        assert_eq!(point.col_off, pixels_to_length(70.0 - 59.01));
    }

    #[test]
    fn test_normalize_overflowing_offset() {
        let geo = SheetGeometry::default();
        // 100px into column A overflows into column B
        let point = AnchorPoint::new(0, 0, pixels_to_length(100.0), 0);
        let normalized = normalize_anchor_point(&geo, &point);
        assert_eq!(normalized.col, 1);
        assert_eq!(normalized.row, 0);
    }

    #[test]
    fn test_negative_position_clamps() {
        let geo = SheetGeometry::default();
        let point = pixels_to_cell_anchor(&geo, -5.0, -1.0);
        assert_eq!(point, AnchorPoint::new(0, 0, 0, 0));
    }

    proptest! {
        #[test]
        fn prop_length_to_pixels_is_division(v in 0i64..10_000_000_000) {
            prop_assert_eq!(length_to_pixels(v), v as f64 / 9525.0);
        }

        #[test]
        fn prop_cell_corners_round_trip(row in 0u32..200, col in 0u16..60) {
            let mut geo = SheetGeometry::default();
            geo.set_column_width(3, 15.0);
            geo.set_row_height(10, 4.0);
            let (x, y) = cell_anchor_to_pixels(&geo, row, col);
            // Nudge inside the cell to stay clear of boundary rounding
            let point = pixels_to_cell_anchor(&geo, x + 0.25, y + 0.25);
            prop_assert_eq!(point.col, col);
            prop_assert_eq!(point.row, row);
        }
    }
}
