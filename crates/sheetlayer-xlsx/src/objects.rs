//! Per-sheet collection of images and shapes

use std::io::{Read, Seek};

use crate::extract::{extract_image, ExtractOptions};
use crate::package::{SheetEntry, XlsxPackage};
use sheetlayer_core::{Diagnostic, ImageRecord, OverlayError, SheetGeometry, ShapeRecord};

/// Every drawing object of one worksheet, with the geometry needed to place it
#[derive(Debug, Clone)]
pub struct SheetObjects {
    pub sheet: SheetEntry,
    pub geometry: SheetGeometry,
    /// Decodable images, in drawing order
    pub images: Vec<ImageRecord>,
    /// Shapes, in drawing order
    pub shapes: Vec<ShapeRecord>,
    /// Problems with individual objects or parts of this sheet
    pub diagnostics: Vec<Diagnostic>,
    /// Drawing objects of unsupported kinds
    pub skipped: usize,
    /// Shapes dropped for malformed anchors
    pub shapes_skipped: usize,
    /// Pictures dropped for a malformed anchor or reference, or missing or undecodable media
    pub images_excluded: usize,
}

impl SheetObjects {
    fn empty(sheet: &SheetEntry) -> Self {
        Self {
            sheet: sheet.clone(),
            geometry: SheetGeometry::default(),
            images: Vec::new(),
            shapes: Vec::new(),
            diagnostics: Vec::new(),
            skipped: 0,
            shapes_skipped: 0,
            images_excluded: 0,
        }
    }
}

impl<R: Read + Seek> XlsxPackage<R> {
    /// Collect the images and shapes of a worksheet.
    ///
    /// Never fails: a missing or unreadable part is recorded as a diagnostic and
    /// the sheet continues with what could be read (default geometry, no drawing).
    pub fn sheet_objects(&mut self, sheet: &SheetEntry, options: &ExtractOptions) -> SheetObjects {
        let mut objects = SheetObjects::empty(sheet);

        let drawing_path = match self.sheet_layout(sheet) {
            Ok((layout, drawing_path)) => {
                objects.geometry = layout.geometry;
                drawing_path
            }
            Err(err) => {
                log::warn!("{}: using default geometry: {}", sheet.name, err);
                let err = OverlayError::MissingCollaboratorData(format!(
                    "worksheet {} unreadable, using default geometry: {}",
                    sheet.path, err
                ));
                objects.diagnostics.push(Diagnostic::new(&sheet.name, &err));
                return objects;
            }
        };

        let Some(drawing_path) = drawing_path else {
            log::debug!("{}: no drawing", sheet.name);
            return objects;
        };

        let loaded = match self.load_drawing(&drawing_path) {
            Ok(loaded) => loaded,
            Err(err) => {
                log::warn!("{}: drawing {} skipped: {}", sheet.name, drawing_path, err);
                let err = OverlayError::parse(err.to_string());
                objects.diagnostics.push(Diagnostic::new(&drawing_path, &err));
                return objects;
            }
        };

        let part = loaded.part;
        objects.shapes = part.shapes;
        objects.diagnostics.extend(part.diagnostics);
        objects.skipped = part.skipped;
        objects.shapes_skipped = part.shapes_skipped;
        objects.images_excluded = part.pictures_skipped;

        for picture in &part.pictures {
            let bytes = match loaded.media.get(&picture.embed) {
                Some(media_path) => self.read_part(media_path).map_err(|err| {
                    OverlayError::MissingCollaboratorData(format!("{}: {}", media_path, err))
                }),
                None => Err(OverlayError::MissingCollaboratorData(format!(
                    "no image relationship {}",
                    picture.embed
                ))),
            };
            let record = bytes.and_then(|bytes| {
                extract_image(picture, &sheet.name, bytes, &objects.geometry, options)
            });
            match record {
                Ok(image) => objects.images.push(image),
                Err(err) => {
                    log::warn!("{}: image {} skipped: {}", sheet.name, picture.id, err);
                    objects.diagnostics.push(Diagnostic::new(&picture.id, &err));
                    objects.images_excluded += 1;
                }
            }
        }

        log::debug!(
            "{}: {} image(s), {} shape(s), {} skipped",
            sheet.name,
            objects.images.len(),
            objects.shapes.len(),
            objects.skipped
        );
        objects
    }
}
