//! A1-style cell references for naming outputs and reports

use crate::anchor::AnchorPoint;

/// Convert a 0-based column index to letters (0 = A, 25 = Z, 26 = AA)
pub fn column_to_letters(col: u16) -> String {
    let mut result = String::new();
    let mut n = col as u32 + 1; // 1-based for calculation

    while n > 0 {
        n -= 1;
        let c = ((n % 26) as u8 + b'A') as char;
        result.insert(0, c);
        n /= 26;
    }

    result
}

/// Format a 0-based (row, col) pair as an A1 reference
pub fn cell_reference(row: u32, col: u16) -> String {
    format!("{}{}", column_to_letters(col), row + 1)
}

/// A1 reference of the cell an anchor point lies in
pub fn anchor_reference(point: &AnchorPoint) -> String {
    cell_reference(point.row, point.col)
}
