//! PrintKit command-line exporter.
//!
//! Loads a persisted design and writes each page's derivatives into an
//! output directory. Image sources are read from the local filesystem.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use clap::{Parser, ValueEnum};
use kurbo::Size;
use printkit_core::Design;
use printkit_core::shapes::ShapeTable;
use printkit_render::{
    CancellationToken, DEFAULT_RESOLUTION, ExportConfig, Exporter, FsAssetFetcher, PageInput,
};

/// Output derivative.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, ValueEnum)]
pub enum OutputFormat {
    Svg,
    Png,
    /// PDF, or PNG when print output is unavailable
    Print,
    Thumbnail,
}

#[derive(Debug, Clone, Parser)]
#[command(name = "printkit", about = "Export PrintKit designs to print-ready artwork", version)]
pub struct CliArgs {
    /// Design JSON file
    pub input: PathBuf,

    /// Directory the exported files are written to
    #[arg(short, long = "out", default_value = "out")]
    pub output: PathBuf,

    /// Document units per physical unit
    #[arg(short, long, env = "PRINTKIT_RESOLUTION", default_value_t = DEFAULT_RESOLUTION)]
    pub resolution: f64,

    /// Formats to write, comma separated
    #[arg(
        short,
        long,
        value_enum,
        value_delimiter = ',',
        default_values_t = vec![OutputFormat::Svg, OutputFormat::Png, OutputFormat::Print]
    )]
    pub formats: Vec<OutputFormat>,

    /// Root directory for image sources (defaults to the input's directory)
    #[arg(long, env = "PRINTKIT_ASSETS")]
    pub assets: Option<PathBuf>,

    /// Export only this page (1-based)
    #[arg(long)]
    pub page: Option<usize>,

    /// Largest thumbnail edge in pixels
    #[arg(long, default_value_t = 256)]
    pub thumbnail_size: u32,
}

impl From<&CliArgs> for ExportConfig {
    fn from(args: &CliArgs) -> Self {
        ExportConfig::default()
            .with_resolution(args.resolution)
            .with_thumbnail_max_px(args.thumbnail_size)
    }
}

/// File stem for a page: `01-front`, `02-back`, ...
pub fn page_stem(index: usize, label: &str) -> String {
    let slug: String = label
        .trim()
        .chars()
        .map(|c| if c.is_alphanumeric() { c.to_ascii_lowercase() } else { '-' })
        .collect();
    let slug = slug.split('-').filter(|s| !s.is_empty()).collect::<Vec<_>>().join("-");
    if slug.is_empty() {
        format!("{:02}", index + 1)
    } else {
        format!("{:02}-{}", index + 1, slug)
    }
}

/// Export the design named by `args`, returning the files written.
pub fn run(args: &CliArgs) -> Result<Vec<PathBuf>> {
    let json = fs::read_to_string(&args.input)
        .with_context(|| format!("Failed to read {}", args.input.display()))?;
    let design = Design::from_json(&json)
        .with_context(|| format!("Failed to load design {}", args.input.display()))?;

    let pages: Vec<(usize, &printkit_core::Page)> = match args.page {
        Some(n) if n == 0 || n > design.pages.len() => {
            bail!("Page {} out of range (design has {})", n, design.pages.len())
        }
        Some(n) => vec![(n - 1, &design.pages[n - 1])],
        None => design.pages.iter().enumerate().collect(),
    };

    let asset_root = match &args.assets {
        Some(root) => root.clone(),
        None => args
            .input
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_default(),
    };
    let fetcher = FsAssetFetcher::new(asset_root);
    let exporter = Exporter::new(ShapeTable::standard(), ExportConfig::from(args));
    let canvas = Size::new(design.canvas_width, design.canvas_height);

    fs::create_dir_all(&args.output)
        .with_context(|| format!("Failed to create {}", args.output.display()))?;

    let wants = |format: OutputFormat| args.formats.contains(&format);
    let mut written = Vec::new();
    for (index, page) in pages {
        let stem = page_stem(index, &page.label);
        let input = PageInput::new(&page.elements, canvas, design.size_unit);
        log::info!("Exporting page '{}' ({} elements)", page.label, page.elements.len());

        if wants(OutputFormat::Svg) || wants(OutputFormat::Png) || wants(OutputFormat::Print) {
            let export = pollster::block_on(exporter.export_svg(
                input,
                &fetcher,
                &CancellationToken::new(),
            ))
            .with_context(|| format!("Failed to export page '{}'", page.label))?;
            for src in &export.fallbacks {
                log::warn!("Page '{}' references {} externally", page.label, src);
            }

            if wants(OutputFormat::Svg) {
                written.push(write(&args.output, &format!("{stem}.svg"), export.svg.as_bytes())?);
            }
            if wants(OutputFormat::Png) || wants(OutputFormat::Print) {
                let png = exporter
                    .render_png(&export.svg)
                    .with_context(|| format!("Failed to rasterize page '{}'", page.label))?;
                if wants(OutputFormat::Png) {
                    written.push(write(&args.output, &format!("{stem}.png"), &png)?);
                }
                if wants(OutputFormat::Print) {
                    let print = exporter.print(&page.label, png, input);
                    let name = format!("{stem}.print.{}", print.extension());
                    written.push(write(&args.output, &name, print.bytes())?);
                }
            }
        }

        if wants(OutputFormat::Thumbnail) {
            let png = exporter
                .thumbnail_png(input)
                .with_context(|| format!("Failed to render thumbnail for '{}'", page.label))?;
            written.push(write(&args.output, &format!("{stem}.thumb.png"), &png)?);
        }
    }
    Ok(written)
}

fn write(dir: &Path, name: &str, bytes: &[u8]) -> Result<PathBuf> {
    let path = dir.join(name);
    fs::write(&path, bytes).with_context(|| format!("Failed to write {}", path.display()))?;
    log::info!("Wrote {} ({} bytes)", path.display(), bytes.len());
    Ok(path)
}
