//! End-to-end conversion: workbook in, one SVG and one preview per image out
//!
//! Only failing to open the workbook aborts a run. Everything else (a broken
//! drawing part, an undecodable image, a degenerate anchor, a failed write) is
//! recorded in the [`RunReport`] and the run carries on.
//!
//! # Example
//!
//! ```rust,no_run
//! use sheetlayer::{EmitOptions, Pipeline, PipelineOptions};
//!
//! let options = PipelineOptions {
//!     emit: EmitOptions::with_output_dir("out"),
//!     ..Default::default()
//! };
//! let report = Pipeline::new(options).run("book.xlsx").unwrap();
//! println!("{}", report);
//! ```

use std::io::{Read, Seek};
use std::path::Path;

use crate::report::RunReport;
use sheetlayer_core::{bind_sheet, Diagnostic, PlacedShape};
use sheetlayer_render::{output_stem, CompositeEmitter, EmitOptions, StemSet};
use sheetlayer_xlsx::{ExtractOptions, SheetObjects, XlsxPackage, XlsxResult};

/// Options for a conversion run
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PipelineOptions {
    /// Limits for reading embedded images
    pub extract: ExtractOptions,
    /// Output directory and artifact selection
    pub emit: EmitOptions,
}

/// A configured conversion run
pub struct Pipeline {
    options: PipelineOptions,
    emitter: CompositeEmitter,
}

impl Pipeline {
    /// Create a pipeline; fonts for preview text are loaded here, once
    pub fn new(options: PipelineOptions) -> Self {
        let emitter = CompositeEmitter::new(options.emit.clone());
        Self { options, emitter }
    }

    /// Pipeline options
    pub fn options(&self) -> &PipelineOptions {
        &self.options
    }

    /// Convert every worksheet of the workbook at `input`
    pub fn run<P: AsRef<Path>>(&self, input: P) -> XlsxResult<RunReport> {
        let input = input.as_ref();
        log::info!("converting {}", input.display());
        let mut package = XlsxPackage::open(input)?;
        Ok(self.run_package(&mut package))
    }

    /// Convert every worksheet of an opened package
    pub fn run_package<R: Read + Seek>(&self, package: &mut XlsxPackage<R>) -> RunReport {
        let mut report = RunReport::default();
        let mut stems = StemSet::new();
        for sheet in package.sheets().to_vec() {
            let objects = package.sheet_objects(&sheet, &self.options.extract);
            report.merge(self.process_sheet(objects, &mut stems));
        }
        log::info!(
            "{} image(s) emitted, {} excluded, {} diagnostic(s)",
            report.images_emitted,
            report.images_excluded,
            report.diagnostics.len()
        );
        report
    }

    /// Bind and emit the images of one worksheet.
    ///
    /// Output stems are claimed from `stems`, so files from different sheets of
    /// one run never overwrite each other.
    pub fn process_sheet(&self, objects: SheetObjects, stems: &mut StemSet) -> RunReport {
        let SheetObjects {
            sheet,
            geometry,
            images,
            shapes,
            diagnostics,
            skipped,
            shapes_skipped,
            images_excluded,
        } = objects;

        let mut report = RunReport {
            sheets: 1,
            images_excluded,
            shapes_skipped: skipped + shapes_skipped,
            diagnostics,
            ..Default::default()
        };

        let mut placed: Vec<PlacedShape> = Vec::with_capacity(shapes.len());
        for shape in &shapes {
            match shape.place(&geometry) {
                Ok(placement) => placed.push(placement),
                Err(err) => {
                    log::warn!("{}: skipping shape {}: {}", sheet.name, shape.id(), err);
                    report.shapes_skipped += 1;
                    report.diagnostics.push(Diagnostic::new(shape.id(), &err));
                }
            }
        }
        let (bindings, bind_diagnostics) = bind_sheet(images, &placed);
        report.diagnostics.extend(bind_diagnostics);

        for (i, binding) in bindings.iter().enumerate() {
            let stem = stems.claim(output_stem(&binding.image, &geometry, i + 1));
            match self.emitter.emit(binding, &stem) {
                Ok(files) => {
                    report.images_emitted += 1;
                    report.shapes_bound += files.shape_count;
                    report.outputs.push(files);
                }
                Err(err) => {
                    log::warn!("{}: image {} not written: {}", sheet.name, binding.image.id(), err);
                    report.images_excluded += 1;
                    report
                        .diagnostics
                        .push(Diagnostic::emit(binding.image.id(), err));
                }
            }
        }
        report
    }
}

/// Convert a workbook with the given options
pub fn convert<P: AsRef<Path>>(input: P, options: &PipelineOptions) -> XlsxResult<RunReport> {
    Pipeline::new(options.clone()).run(input)
}

/// Read every worksheet's images and shapes without writing anything
pub fn inspect<P: AsRef<Path>>(input: P, options: &ExtractOptions) -> XlsxResult<Vec<SheetObjects>> {
    let mut package = XlsxPackage::open(input)?;
    let sheets = package.sheets().to_vec();
    Ok(sheets
        .iter()
        .map(|sheet| package.sheet_objects(sheet, options))
        .collect())
}
