//! # sheetlayer-xlsx
//!
//! Reads the pieces of an XLSX package the overlay pipeline needs: worksheet
//! column and row sizes, DrawingML drawing parts and embedded images.
//!
//! ## Example
//!
//! ```rust,no_run
//! use sheetlayer_xlsx::{ExtractOptions, XlsxPackage};
//!
//! let mut package = XlsxPackage::open("input.xlsx").unwrap();
//! for sheet in package.sheets().to_vec() {
//!     let objects = package.sheet_objects(&sheet, &ExtractOptions::default());
//!     println!("{}: {} images, {} shapes", sheet.name, objects.images.len(), objects.shapes.len());
//! }
//! ```

pub mod drawing;
pub mod error;
pub mod extract;
pub mod objects;
pub mod package;
pub mod rels;
pub mod sheet;

pub use drawing::{parse_drawing, DrawingPart, PictureAnchor};
pub use error::{XlsxError, XlsxResult};
pub use extract::{extract_image, probe_image, ExtractOptions};
pub use objects::SheetObjects;
pub use package::{LoadedDrawing, SheetEntry, XlsxPackage};
pub use rels::Relationship;
pub use sheet::{read_sheet_layout, SheetLayout};
