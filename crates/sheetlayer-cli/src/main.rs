//! sheetlayer CLI - layered SVG overlays from spreadsheet images

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use sheetlayer::prelude::*;
use sheetlayer::{
    anchor_reference, extract_base_image, normalize_anchor_point, overlays_only, Anchor,
    PixelBox,
};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "sheetlayer")]
#[command(
    author,
    version,
    about = "Export spreadsheet images with the shapes drawn over them as layered SVG"
)]
struct Cli {
    /// Log more (-v: info, -vv: debug); RUST_LOG overrides
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Write an SVG and a JPEG preview for every image in a workbook
    Convert {
        /// Input workbook (xlsx, xlsm)
        input: PathBuf,

        /// Output directory
        #[arg(short, long, default_value = "output")]
        output_dir: PathBuf,

        /// Skip the JPEG previews
        #[arg(long)]
        no_preview: bool,

        /// Skip the SVG documents
        #[arg(long)]
        no_svg: bool,

        /// Also write `.overlays.svg` files without the base image
        #[arg(long)]
        overlays_only: bool,

        /// Do not load system fonts (preview text is not drawn)
        #[arg(long)]
        no_system_fonts: bool,

        /// Font stack written on shape text
        #[arg(long)]
        font_family: Option<String>,
    },

    /// Show the images and shapes of every sheet
    Inspect {
        /// Input workbook
        input: PathBuf,
    },

    /// Remove the base image from an emitted SVG, keeping the overlay
    Strip {
        /// Emitted SVG document
        input: PathBuf,

        /// Output file (default: `<input>.overlays.svg`)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Extract the embedded base image of an emitted SVG
    Unpack {
        /// Emitted SVG document
        input: PathBuf,

        /// Output image file
        #[arg(short, long)]
        output: PathBuf,
    },
}

fn init_logging(verbose: u8) {
    let default = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Commands::Convert {
            input,
            output_dir,
            no_preview,
            no_svg,
            overlays_only,
            no_system_fonts,
            font_family,
        } => {
            if no_preview && no_svg && !overlays_only {
                bail!("Nothing to write: --no-svg and --no-preview together need --overlays-only");
            }
            let mut emit = EmitOptions::with_output_dir(output_dir);
            emit.write_preview = !no_preview;
            emit.write_svg = !no_svg;
            emit.write_overlays_only = overlays_only;
            emit.load_system_fonts = !no_system_fonts;
            if let Some(family) = font_family {
                emit.font_family = family;
            }
            convert_workbook(
                &input,
                PipelineOptions {
                    emit,
                    ..Default::default()
                },
            )
        }
        Commands::Inspect { input } => show_objects(&input),
        Commands::Strip { input, output } => strip(&input, output.as_deref()),
        Commands::Unpack { input, output } => unpack(&input, &output),
    }
}

fn convert_workbook(input: &Path, options: PipelineOptions) -> Result<()> {
    let output_dir = options.emit.output_dir.clone();
    let report = Pipeline::new(options)
        .run(input)
        .with_context(|| format!("Failed to open '{}'", input.display()))?;

    tracing::debug!(outputs = report.outputs.len(), "run finished");
    println!("{}", report);
    if report.images_emitted > 0 {
        eprintln!(
            "Wrote {} image(s) to '{}'",
            report.images_emitted,
            output_dir.display()
        );
    }
    Ok(())
}

fn describe(anchor: &Anchor, bbox: &PixelBox, geometry: &SheetGeometry) -> String {
    format!(
        "{}:{} at ({:.1}, {:.1}) size {:.1}x{:.1}",
        anchor_reference(anchor.from()),
        anchor_reference(&normalize_anchor_point(geometry, anchor.to())),
        bbox.x,
        bbox.y,
        bbox.w,
        bbox.h
    )
}

fn show_objects(input: &Path) -> Result<()> {
    let sheets = inspect(input, &ExtractOptions::default())
        .with_context(|| format!("Failed to open '{}'", input.display()))?;

    println!("File: {}", input.display());
    println!("Sheets: {}", sheets.len());

    for objects in &sheets {
        let geometry = &objects.geometry;
        println!();
        println!("  Sheet {}: \"{}\"", objects.sheet.index, objects.sheet.name);

        println!("    Images: {}", objects.images.len());
        for image in &objects.images {
            let (w, h) = image.intrinsic_size_px();
            println!(
                "      {} {} [{}x{} {}]",
                image.id(),
                describe(image.anchor(), &image.bbox(), geometry),
                w,
                h,
                image.format.as_deref().unwrap_or("?")
            );
        }

        println!("    Shapes: {}", objects.shapes.len());
        for shape in &objects.shapes {
            let placement = match shape.place(geometry) {
                Ok(placed) => describe(shape.anchor(), &placed.bbox, geometry),
                Err(err) => err.to_string(),
            };
            println!(
                "      {} {} {}{}",
                shape.id(),
                shape.geometry,
                placement,
                shape
                    .name
                    .as_deref()
                    .map(|name| format!(" \"{}\"", name))
                    .unwrap_or_default()
            );
        }

        if objects.skipped > 0 {
            println!("    Skipped objects: {}", objects.skipped);
        }
        if objects.shapes_skipped > 0 {
            println!("    Malformed shapes: {}", objects.shapes_skipped);
        }
        if objects.images_excluded > 0 {
            println!("    Excluded images: {}", objects.images_excluded);
        }
        for diagnostic in &objects.diagnostics {
            println!("    {}", diagnostic);
        }
    }

    Ok(())
}

fn strip(input: &Path, output: Option<&Path>) -> Result<()> {
    let svg = std::fs::read_to_string(input)
        .with_context(|| format!("Failed to read '{}'", input.display()))?;
    let stripped = overlays_only(&svg)
        .with_context(|| format!("Failed to strip '{}'", input.display()))?;

    let output = match output {
        Some(path) => path.to_path_buf(),
        None => input.with_extension("overlays.svg"),
    };
    std::fs::write(&output, stripped)
        .with_context(|| format!("Failed to write '{}'", output.display()))?;
    eprintln!("Wrote '{}'", output.display());
    Ok(())
}

fn unpack(input: &Path, output: &Path) -> Result<()> {
    let svg = std::fs::read_to_string(input)
        .with_context(|| format!("Failed to read '{}'", input.display()))?;
    let payload = extract_base_image(&svg)
        .with_context(|| format!("No embedded base image in '{}'", input.display()))?;

    std::fs::write(output, &payload.bytes)
        .with_context(|| format!("Failed to write '{}'", output.display()))?;
    eprintln!(
        "Wrote {} bytes ({}) to '{}'",
        payload.bytes.len(),
        payload.mime,
        output.display()
    );
    Ok(())
}
