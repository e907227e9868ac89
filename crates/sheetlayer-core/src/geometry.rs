//! Per-sheet column width and row height tables

use std::collections::{BTreeMap, BTreeSet};

use crate::units::{column_width_to_pixels, row_height_to_pixels};

/// Default column width in characters
pub const DEFAULT_COLUMN_WIDTH: f64 = 8.43;

/// Default row height in points
pub const DEFAULT_ROW_HEIGHT: f64 = 15.0;

/// Column widths and row heights of one worksheet.
///
/// Only columns and rows with custom sizes (or hidden ones) are stored; everything
/// else uses the sheet defaults. Widths are in characters and heights in points,
/// exactly as the worksheet XML stores them.
#[derive(Debug, Clone, PartialEq)]
pub struct SheetGeometry {
    /// Default column width in characters (default: 8.43)
    pub default_column_width: f64,
    /// Default row height in points (default: 15.0)
    pub default_row_height: f64,
    column_widths: BTreeMap<u16, f64>,
    row_heights: BTreeMap<u32, f64>,
    hidden_columns: BTreeSet<u16>,
    hidden_rows: BTreeSet<u32>,
}

impl Default for SheetGeometry {
    fn default() -> Self {
        Self {
            default_column_width: DEFAULT_COLUMN_WIDTH,
            default_row_height: DEFAULT_ROW_HEIGHT,
            column_widths: BTreeMap::new(),
            row_heights: BTreeMap::new(),
            hidden_columns: BTreeSet::new(),
            hidden_rows: BTreeSet::new(),
        }
    }
}

impl SheetGeometry {
    /// Create a geometry table with default sizes everywhere
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a custom column width (characters)
    pub fn set_column_width(&mut self, col: u16, width: f64) {
        self.column_widths.insert(col, width);
    }

    /// Set a custom row height (points)
    pub fn set_row_height(&mut self, row: u32, height: f64) {
        self.row_heights.insert(row, height);
    }

    /// Hide or unhide a column
    pub fn set_column_hidden(&mut self, col: u16, hidden: bool) {
        if hidden {
            self.hidden_columns.insert(col);
        } else {
            self.hidden_columns.remove(&col);
        }
    }

    /// Hide or unhide a row
    pub fn set_row_hidden(&mut self, row: u32, hidden: bool) {
        if hidden {
            self.hidden_rows.insert(row);
        } else {
            self.hidden_rows.remove(&row);
        }
    }

    /// Column width in characters (custom or default)
    pub fn column_width(&self, col: u16) -> f64 {
        self.column_widths
            .get(&col)
            .copied()
            .unwrap_or(self.default_column_width)
    }

    /// Row height in points (custom or default)
    pub fn row_height(&self, row: u32) -> f64 {
        self.row_heights
            .get(&row)
            .copied()
            .unwrap_or(self.default_row_height)
    }

    /// Rendered width of a column in pixels (zero when hidden)
    pub fn column_width_px(&self, col: u16) -> f64 {
        if self.hidden_columns.contains(&col) {
            return 0.0;
        }
        column_width_to_pixels(self.column_width(col))
    }

    /// Rendered height of a row in pixels (zero when hidden)
    pub fn row_height_px(&self, row: u32) -> f64 {
        if self.hidden_rows.contains(&row) {
            return 0.0;
        }
        row_height_to_pixels(self.row_height(row))
    }

    /// Sum of the pixel widths of all columns strictly before `col`
    pub fn column_offset_px(&self, col: u16) -> f64 {
        let default = column_width_to_pixels(self.default_column_width);
        let overridden: BTreeSet<u16> = self
            .column_widths
            .range(..col)
            .map(|(c, _)| *c)
            .chain(self.hidden_columns.range(..col).copied())
            .collect();

        let mut total = f64::from(col) * default;
        for c in overridden {
            total += self.column_width_px(c) - default;
        }
        total
    }

    /// Sum of the pixel heights of all rows strictly before `row`
    pub fn row_offset_px(&self, row: u32) -> f64 {
        let default = row_height_to_pixels(self.default_row_height);
        let overridden: BTreeSet<u32> = self
            .row_heights
            .range(..row)
            .map(|(r, _)| *r)
            .chain(self.hidden_rows.range(..row).copied())
            .collect();

        let mut total = f64::from(row) * default;
        for r in overridden {
            total += self.row_height_px(r) - default;
        }
        total
    }

    /// Whether any custom size or hidden flag is recorded
    pub fn has_custom_settings(&self) -> bool {
        !self.column_widths.is_empty()
            || !self.row_heights.is_empty()
            || !self.hidden_columns.is_empty()
            || !self.hidden_rows.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let geo = SheetGeometry::new();
        assert!((geo.row_height(0) - 15.0).abs() < 0.001);
        assert!((geo.column_width(0) - 8.43).abs() < 0.001);
        assert!(!geo.has_custom_settings());
    }

    #[test]
    fn test_custom_sizes() {
        let mut geo = SheetGeometry::new();
        geo.set_row_height(5, 30.0);
        geo.set_column_width(3, 20.0);

        assert!((geo.row_height(5) - 30.0).abs() < 0.001);
        assert!((geo.column_width(3) - 20.0).abs() < 0.001);
        assert!((geo.column_width_px(3) - 140.0).abs() < 1e-9);
        assert!((geo.row_height_px(5) - 39.9).abs() < 1e-9);
    }

    #[test]
    fn test_offsets_match_naive_sum() {
        let mut geo = SheetGeometry::new();
        geo.set_column_width(1, 12.0);
        geo.set_column_width(4, 2.5);
        geo.set_row_height(0, 40.0);
        geo.set_row_height(7, 9.0);

        let naive_x: f64 = (0..6).map(|c| geo.column_width_px(c)).sum();
        let naive_y: f64 = (0..9).map(|r| geo.row_height_px(r)).sum();
        assert!((geo.column_offset_px(6) - naive_x).abs() < 1e-9);
        assert!((geo.row_offset_px(9) - naive_y).abs() < 1e-9);

        // Sizes at or after the index do not count
        assert!((geo.column_offset_px(1) - 59.01).abs() < 1e-9);
    }

    #[test]
    fn test_hidden_columns_and_rows_collapse() {
        let mut geo = SheetGeometry::new();
        geo.set_column_width(1, 20.0);
        geo.set_column_hidden(1, true);
        geo.set_row_hidden(0, true);

        assert_eq!(geo.column_width_px(1), 0.0);
        assert!((geo.column_offset_px(2) - 59.01).abs() < 1e-9);
        assert_eq!(geo.row_offset_px(1), 0.0);

        geo.set_column_hidden(1, false);
        assert!((geo.column_offset_px(2) - (59.01 + 140.0)).abs() < 1e-9);
    }
}
