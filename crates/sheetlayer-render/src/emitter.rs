//! Composite emitter: one layered SVG and one flattened preview per binding

use std::collections::HashSet;
use std::fs;
use std::io::Cursor;
use std::path::{Path, PathBuf};

use image::{DynamicImage, ImageReader, Limits};
use resvg::usvg;

use crate::error::RenderResult;
use crate::payload::png_data_uri;
use crate::preview::render_preview;
use crate::svg::{SvgDocument, DEFAULT_FONT_FAMILY};
use sheetlayer_core::address::anchor_reference;
use sheetlayer_core::units::normalize_anchor_point;
use sheetlayer_core::{ImageRecord, OverlayBinding, SheetGeometry};

/// Emitter configuration
#[derive(Debug, Clone, PartialEq)]
pub struct EmitOptions {
    /// Directory all artifacts are written to (created if missing)
    pub output_dir: PathBuf,
    /// Write `{stem}.svg`
    pub write_svg: bool,
    /// Write `{stem}.jpg`
    pub write_preview: bool,
    /// Also write `{stem}.overlays.svg` without the base image
    pub write_overlays_only: bool,
    /// Load system fonts for rasterizing shape text
    pub load_system_fonts: bool,
    /// Font stack written on text elements
    pub font_family: String,
    /// Maximum bytes the base image decoder may allocate
    pub max_decode_alloc: u64,
}

impl Default for EmitOptions {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("output"),
            write_svg: true,
            write_preview: true,
            write_overlays_only: false,
            load_system_fonts: true,
            font_family: DEFAULT_FONT_FAMILY.to_string(),
            max_decode_alloc: 512 * 1024 * 1024,
        }
    }
}

impl EmitOptions {
    /// Options writing to the given directory
    pub fn with_output_dir<P: Into<PathBuf>>(output_dir: P) -> Self {
        Self {
            output_dir: output_dir.into(),
            ..Default::default()
        }
    }
}

/// In-memory artifacts of one binding
#[derive(Debug, Clone, PartialEq)]
pub struct RenderedBinding {
    pub stem: String,
    pub svg: Option<String>,
    pub overlays_svg: Option<String>,
    /// JPEG bytes
    pub preview: Option<Vec<u8>>,
    /// Number of shapes in the overlay group
    pub shape_count: usize,
}

/// Files written for one binding
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EmittedFiles {
    pub stem: String,
    pub svg: Option<PathBuf>,
    pub overlays_svg: Option<PathBuf>,
    pub preview: Option<PathBuf>,
    pub shape_count: usize,
}

impl EmittedFiles {
    /// All written paths
    pub fn paths(&self) -> impl Iterator<Item = &Path> {
        [&self.svg, &self.overlays_svg, &self.preview]
            .into_iter()
            .flatten()
            .map(PathBuf::as_path)
    }
}

/// Output file stem: `{sheet}_{index}_{from cell}-{to cell}`.
///
/// `index` is the 1-based position of the image on its sheet. The sheet name is
/// reduced to characters that are safe in file names.
pub fn output_stem(image: &ImageRecord, geometry: &SheetGeometry, index: usize) -> String {
    let sheet: String = image
        .sheet
        .chars()
        .map(|c| {
            if c.is_alphanumeric() || c == '-' || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect();
    let anchor = image.anchor();
    let from = anchor_reference(anchor.from());
    let to = anchor_reference(&normalize_anchor_point(geometry, anchor.to()));
    format!("{}_{}_{}-{}", sheet, index, from, to)
}

/// Output stems already handed out during a run.
///
/// Distinct sheet names can reduce to the same stem ("A B" and "A_B"), and
/// names differing only in case collide on case-insensitive file systems. A
/// repeated stem gets a numeric suffix: `Sheet1_1_A1-D6_2`.
#[derive(Debug, Default)]
pub struct StemSet {
    taken: HashSet<String>,
}

impl StemSet {
    /// Create an empty set
    pub fn new() -> Self {
        Self::default()
    }

    /// Reserve `stem`, or the first free suffixed variant of it
    pub fn claim(&mut self, stem: String) -> String {
        if self.taken.insert(stem.to_lowercase()) {
            return stem;
        }
        let mut n = 2;
        loop {
            let candidate = format!("{}_{}", stem, n);
            if self.taken.insert(candidate.to_lowercase()) {
                return candidate;
            }
            n += 1;
        }
    }

    /// Number of stems handed out
    pub fn len(&self) -> usize {
        self.taken.len()
    }

    /// Whether no stem has been handed out
    pub fn is_empty(&self) -> bool {
        self.taken.is_empty()
    }
}

/// Renders bindings to layered SVG documents and JPEG previews.
///
/// The font database is loaded once per emitter.
pub struct CompositeEmitter {
    options: EmitOptions,
    svg_options: usvg::Options<'static>,
}

impl CompositeEmitter {
    /// Create an emitter
    pub fn new(options: EmitOptions) -> Self {
        let mut svg_options = usvg::Options::default();
        if options.load_system_fonts && options.write_preview {
            svg_options.fontdb_mut().load_system_fonts();
            log::debug!("loaded {} font faces", svg_options.fontdb.len());
        }
        Self {
            options,
            svg_options,
        }
    }

    /// Emitter configuration
    pub fn options(&self) -> &EmitOptions {
        &self.options
    }

    fn decode_base(&self, bytes: &[u8]) -> RenderResult<DynamicImage> {
        let mut reader = ImageReader::new(Cursor::new(bytes)).with_guessed_format()?;
        let mut limits = Limits::default();
        limits.max_alloc = Some(self.options.max_decode_alloc);
        reader.limits(limits);
        Ok(reader.decode()?)
    }

    /// Render one binding in memory.
    ///
    /// Degenerate bindings (no scale) yield documents with the base image only.
    pub fn render(&self, binding: &OverlayBinding, stem: &str) -> RenderResult<RenderedBinding> {
        let base = self.decode_base(binding.image.bytes())?;
        let (width, height) = (base.width(), base.height());

        let shapes = if binding.has_overlay() {
            Some(binding.project()?)
        } else {
            None
        };
        let font_family = self.options.font_family.as_str();

        let overlay_doc = |with_base: Option<&str>| {
            let mut doc = SvgDocument::new(width, height).with_font_family(font_family);
            if let Some(href) = with_base {
                doc = doc.with_base_image(href);
            }
            if let Some(shapes) = shapes.as_deref() {
                doc = doc.with_overlay(shapes);
            }
            doc.to_svg()
        };

        let svg = if self.options.write_svg {
            let href = png_data_uri(&base)?;
            Some(overlay_doc(Some(href.as_str())))
        } else {
            None
        };

        let overlays_svg = if self.options.write_overlays_only {
            Some(overlay_doc(None))
        } else {
            None
        };

        let preview = if self.options.write_preview {
            let layer = match shapes.as_deref() {
                Some(list) if !list.is_empty() => Some(overlay_doc(None)),
                _ => None,
            };
            Some(render_preview(&base, layer.as_deref(), &self.svg_options)?)
        } else {
            None
        };

        Ok(RenderedBinding {
            stem: stem.to_string(),
            svg,
            overlays_svg,
            preview,
            shape_count: shapes.map_or(0, |s| s.len()),
        })
    }

    /// Render one binding and write its artifacts under `stem`
    pub fn emit(&self, binding: &OverlayBinding, stem: &str) -> RenderResult<EmittedFiles> {
        let rendered = self.render(binding, stem)?;
        self.write(&rendered)
    }

    /// Write rendered artifacts to the output directory
    pub fn write(&self, rendered: &RenderedBinding) -> RenderResult<EmittedFiles> {
        let dir = &self.options.output_dir;
        fs::create_dir_all(dir)?;

        let mut files = EmittedFiles {
            stem: rendered.stem.clone(),
            shape_count: rendered.shape_count,
            ..Default::default()
        };

        if let Some(svg) = &rendered.svg {
            let path = dir.join(format!("{}.svg", rendered.stem));
            fs::write(&path, svg)?;
            files.svg = Some(path);
        }
        if let Some(svg) = &rendered.overlays_svg {
            let path = dir.join(format!("{}.overlays.svg", rendered.stem));
            fs::write(&path, svg)?;
            files.overlays_svg = Some(path);
        }
        if let Some(jpeg) = &rendered.preview {
            let path = dir.join(format!("{}.jpg", rendered.stem));
            fs::write(&path, jpeg)?;
            files.preview = Some(path);
        }

        log::info!(
            "wrote {} ({} shape{})",
            rendered.stem,
            rendered.shape_count,
            if rendered.shape_count == 1 { "" } else { "s" }
        );
        Ok(files)
    }
}
