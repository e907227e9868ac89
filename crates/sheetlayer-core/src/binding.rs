//! Image-to-shape bindings

use crate::error::{Diagnostic, Result};
use crate::image::ImageRecord;
use crate::matcher::match_overlays;
use crate::scale::{ProjectedShape, ScaleFactors};
use crate::shape::PlacedShape;

/// An image, the shapes overlapping it (in parse order) and its scale factors.
///
/// `scale` is `None` when the image's nominal size is degenerate; such bindings
/// never carry shapes and are exported as the base image alone.
#[derive(Debug, Clone, PartialEq)]
pub struct OverlayBinding {
    pub image: ImageRecord,
    pub shapes: Vec<PlacedShape>,
    pub scale: Option<ScaleFactors>,
}

impl OverlayBinding {
    /// Project every bound shape into the image's pixel space
    pub fn project(&self) -> Result<Vec<ProjectedShape>> {
        if self.shapes.is_empty() {
            return Ok(Vec::new());
        }
        let scale = match self.scale {
            Some(scale) => scale,
            None => ScaleFactors::for_image(&self.image)?,
        };
        let origin = self.image.anchor_px();
        Ok(self
            .shapes
            .iter()
            .map(|placed| scale.project(origin, placed))
            .collect())
    }

    /// Whether an overlay layer will be emitted
    pub fn has_overlay(&self) -> bool {
        self.scale.is_some()
    }
}

/// Bind the images of one sheet to the shapes overlapping them.
///
/// Every image yields exactly one binding. Images whose scale cannot be computed
/// get a base-image-only binding and an `InvalidScale` diagnostic.
pub fn bind_sheet(
    images: Vec<ImageRecord>,
    shapes: &[PlacedShape],
) -> (Vec<OverlayBinding>, Vec<Diagnostic>) {
    let matches = match_overlays(&images, shapes);
    let mut diagnostics = Vec::new();

    let bindings = images
        .into_iter()
        .zip(matches)
        .map(|(image, indices)| match ScaleFactors::for_image(&image) {
            Ok(scale) => OverlayBinding {
                shapes: indices.into_iter().map(|i| shapes[i].clone()).collect(),
                image,
                scale: Some(scale),
            },
            Err(err) => {
                diagnostics.push(Diagnostic::new(image.id(), &err));
                OverlayBinding {
                    image,
                    shapes: Vec::new(),
                    scale: None,
                }
            }
        })
        .collect();

    (bindings, diagnostics)
}
